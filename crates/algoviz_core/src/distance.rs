//! Tentative path lengths with an explicit "unreachable" marker.
//!
//! Distances are exact integers internally. The unreachable marker only turns
//! into the string `"Infinity"` when serialized, since JSON has no native
//! infinity.

use indexmap::IndexMap;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wire representation of [`Distance::Infinite`].
pub const INFINITY_LITERAL: &str = "Infinity";

/// Best known distance of every node, in graph order.
pub type DistanceMap = IndexMap<String, Distance>;

/// A path length from the start node, or the absence of any known path.
///
/// `Infinite` orders after every finite value, so a frontier of
/// `(Distance, node)` pairs pops reachable nodes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Distance {
    /// A known path of this total weight exists.
    Finite(u64),
    /// No path has been found (yet).
    Infinite,
}

impl Distance {
    /// The distance of the start node to itself.
    pub const ZERO: Distance = Distance::Finite(0);

    /// Returns `true` if a path is known.
    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Returns the finite value, if any.
    pub fn value(&self) -> Option<u64> {
        match self {
            Distance::Finite(v) => Some(*v),
            Distance::Infinite => None,
        }
    }

    /// Extends this distance by one edge.
    ///
    /// Saturates to `Infinite` on overflow; an unreachable node stays unreachable.
    pub fn add_weight(self, weight: u64) -> Distance {
        match self {
            Distance::Finite(v) => v.checked_add(weight).map_or(Distance::Infinite, Distance::Finite),
            Distance::Infinite => Distance::Infinite,
        }
    }
}

impl From<u64> for Distance {
    fn from(v: u64) -> Self {
        Distance::Finite(v)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(v) => write!(f, "{}", v),
            Distance::Infinite => f.write_str(INFINITY_LITERAL),
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Distance::Finite(v) => serializer.serialize_u64(*v),
            Distance::Infinite => serializer.serialize_str(INFINITY_LITERAL),
        }
    }
}

struct DistanceVisitor;

impl<'de> Visitor<'de> for DistanceVisitor {
    type Value = Distance;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a non-negative integer or the string \"{}\"", INFINITY_LITERAL)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Distance, E> {
        Ok(Distance::Finite(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Distance, E> {
        u64::try_from(v)
            .map(Distance::Finite)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Distance, E> {
        if v == INFINITY_LITERAL {
            Ok(Distance::Infinite)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Distance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DistanceVisitor)
    }
}
