//! AVL insertion with rotation tracking.
//!
//! [`AvlTree`] is a plain owned-subtree AVL tree (`Option<Box<Node>>` links, no
//! parent pointers). Rebalancing happens on the unwind path of a recursive
//! insert: each call hands back the new root of its subtree, so a rotation is
//! just a different node being returned.
//!
//! Each insertion reports the rotation it triggered, if any. AVL insertion needs
//! at most one (single or double) rotation, at the lowest unbalanced ancestor of
//! the new leaf; after it the subtree regains its pre-insert height and nothing
//! above can become unbalanced.
//!
//! [`insert_key_sequence`] turns a caller-supplied list of keys into the full
//! step trace consumed by the visualization front end.
//!
//! # Examples
//!
//! ```
//! use algoviz_core::avl::{AvlTree, RotationKind};
//!
//! let mut tree = AvlTree::new();
//! assert!(tree.insert(30).is_none());
//! assert!(tree.insert(20).is_none());
//!
//! let rotation = tree.insert(10).unwrap();
//! assert_eq!(rotation.kind, RotationKind::LL);
//! assert_eq!(rotation.nodes, vec![30, 20]);
//! assert_eq!(tree.root().map(|n| n.key()), Some(20));
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

type Link = Option<Box<Node>>;

/// A node of the AVL tree.
///
/// Each node exclusively owns its children. `height` is 1 for a leaf.
#[derive(Debug, Clone)]
pub struct Node {
    key: i64,
    height: u32,
    left: Link,
    right: Link,
}

impl Node {
    fn new(key: i64) -> Self {
        Self {
            key,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn link_height(link: &Link) -> u32 {
        link.as_ref().map_or(0, |n| n.height)
    }

    fn update_height(&mut self) {
        self.height = 1 + Self::link_height(&self.left).max(Self::link_height(&self.right));
    }

    pub fn key(&self) -> i64 {
        self.key
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    /// `height(left) - height(right)`, absent children counting as 0.
    pub fn balance_factor(&self) -> i64 {
        i64::from(Self::link_height(&self.left)) - i64::from(Self::link_height(&self.right))
    }
}

/// The four rebalancing cases, named after the path from the unbalanced node
/// down to the inserted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationKind {
    /// Left child's left subtree grew: single right rotation.
    #[serde(rename = "LL Rotation")]
    LL,
    /// Right child's right subtree grew: single left rotation.
    #[serde(rename = "RR Rotation")]
    RR,
    /// Left child's right subtree grew: left-rotate the child, then right-rotate.
    #[serde(rename = "LR Rotation")]
    LR,
    /// Right child's left subtree grew: right-rotate the child, then left-rotate.
    #[serde(rename = "RL Rotation")]
    RL,
}

impl RotationKind {
    /// Human-readable explanation shown next to the rotation.
    pub fn description(&self) -> &'static str {
        match self {
            RotationKind::LL => "Left subtree is too heavy. Performing right rotation.",
            RotationKind::RR => "Right subtree is too heavy. Performing left rotation.",
            RotationKind::LR => "Left-Right imbalance. Performing double rotation.",
            RotationKind::RL => "Right-Left imbalance. Performing double rotation.",
        }
    }

    pub fn is_double(&self) -> bool {
        matches!(self, RotationKind::LR | RotationKind::RL)
    }
}

/// A rebalancing rotation performed by a single insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub kind: RotationKind,
    /// Key of the node that ended up as the root of the rebalanced subtree.
    pub pivot: i64,
    /// Keys directly involved: the unbalanced node and its child, plus the
    /// inserted key for double rotations.
    pub nodes: Vec<i64>,
}

impl Rotation {
    /// The wire form attached to tree snapshots.
    pub fn info(&self) -> RotationInfo {
        RotationInfo {
            kind: self.kind,
            description: self.kind.description().to_string(),
            nodes: self.nodes.clone(),
        }
    }
}

/// Rotation details as serialized inside a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationInfo {
    #[serde(rename = "type")]
    pub kind: RotationKind,
    pub description: String,
    pub nodes: Vec<i64>,
}

/// Serializable snapshot of a (sub)tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub key: i64,
    pub height: u32,
    /// Set only on the new local root of the rotation performed by the
    /// insertion this snapshot was taken after.
    pub rotation_info: Option<RotationInfo>,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    /// Keys in sorted (in-order) order.
    pub fn keys(&self) -> Vec<i64> {
        let mut out = Vec::new();
        self.collect_keys(&mut out);
        out
    }

    fn collect_keys(&self, out: &mut Vec<i64>) {
        if let Some(left) = &self.left {
            left.collect_keys(out);
        }
        out.push(self.key);
        if let Some(right) = &self.right {
            right.collect_keys(out);
        }
    }
}

/// An AVL tree of unique integer keys.
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    root: Link,
    len: usize,
    rotations: usize,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree, 0 when empty.
    pub fn height(&self) -> u32 {
        Node::link_height(&self.root)
    }

    /// Total number of rebalancing actions (single or double) applied so far.
    pub fn rotation_count(&self) -> usize {
        self.rotations
    }

    pub fn contains(&self, key: i64) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    pub fn in_order(&self) -> Vec<i64> {
        fn walk(link: &Link, out: &mut Vec<i64>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(node.key);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// Inserts `key`, rebalancing on the way back up.
    ///
    /// Returns the rotation this insertion triggered, if any. Inserting a key
    /// that is already present changes nothing and returns `None`.
    pub fn insert(&mut self, key: i64) -> Option<Rotation> {
        let mut ctx = InsertCtx::default();
        self.root = Some(insert_at(self.root.take(), key, &mut ctx));
        if ctx.inserted {
            self.len += 1;
        }
        self.rotations += ctx.applied;
        if let Some(rotation) = &ctx.rotation {
            log::trace!(
                "insert {}: {:?} rotation around {:?}, new local root {}",
                key,
                rotation.kind,
                rotation.nodes,
                rotation.pivot
            );
        }
        ctx.rotation
    }

    /// Serializable copy of the current tree, attaching `rotation` (if given)
    /// to the node it names as pivot.
    pub fn snapshot(&self, rotation: Option<&Rotation>) -> Option<TreeNode> {
        self.root.as_deref().map(|root| snapshot_node(root, rotation))
    }
}

#[derive(Default)]
struct InsertCtx {
    inserted: bool,
    applied: usize,
    rotation: Option<Rotation>,
}

fn insert_at(link: Link, key: i64, ctx: &mut InsertCtx) -> Box<Node> {
    let mut node = match link {
        Some(node) => node,
        None => {
            ctx.inserted = true;
            return Box::new(Node::new(key));
        }
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_at(node.left.take(), key, ctx)),
        Ordering::Greater => node.right = Some(insert_at(node.right.take(), key, ctx)),
        Ordering::Equal => return node,
    }

    node.update_height();
    rebalance(node, key, ctx)
}

fn rebalance(mut node: Box<Node>, key: i64, ctx: &mut InsertCtx) -> Box<Node> {
    let balance = node.balance_factor();
    let (kind, child_key) = if balance > 1 {
        let Some(left) = node.left.as_ref() else {
            return node;
        };
        if key < left.key {
            (RotationKind::LL, left.key)
        } else {
            (RotationKind::LR, left.key)
        }
    } else if balance < -1 {
        let Some(right) = node.right.as_ref() else {
            return node;
        };
        if key > right.key {
            (RotationKind::RR, right.key)
        } else {
            (RotationKind::RL, right.key)
        }
    } else {
        return node;
    };

    let mut involved = vec![node.key, child_key];
    let new_root = match kind {
        RotationKind::LL => rotate_right(node),
        RotationKind::RR => rotate_left(node),
        RotationKind::LR => {
            node.left = node.left.take().map(rotate_left);
            involved.push(key);
            rotate_right(node)
        }
        RotationKind::RL => {
            node.right = node.right.take().map(rotate_right);
            involved.push(key);
            rotate_left(node)
        }
    };

    ctx.applied += 1;
    // Only the lowest unbalanced ancestor is recorded.
    if ctx.rotation.is_none() {
        ctx.rotation = Some(Rotation {
            kind,
            pivot: new_root.key,
            nodes: involved,
        });
    }
    new_root
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

fn snapshot_node(node: &Node, rotation: Option<&Rotation>) -> TreeNode {
    TreeNode {
        key: node.key,
        height: node.height,
        rotation_info: rotation.filter(|r| r.pivot == node.key).map(Rotation::info),
        left: node.left.as_deref().map(|n| Box::new(snapshot_node(n, rotation))),
        right: node.right.as_deref().map(|n| Box::new(snapshot_node(n, rotation))),
    }
}

/// One frame of an AVL insertion trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvlStep {
    pub description: String,
    /// Tree at this point; `None` for the initial empty tree.
    pub tree: Option<TreeNode>,
    /// The full deduplicated key list (initial step only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_key: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_type: Option<RotationKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub involved_nodes: Option<Vec<i64>>,
}

impl AvlStep {
    fn initial(keys: &[i64]) -> Self {
        Self {
            description: "Initialize empty AVL Tree".to_string(),
            tree: None,
            keys: Some(keys.to_vec()),
            current_key: None,
            rotation_type: None,
            rotation_description: None,
            involved_nodes: None,
        }
    }

    fn before(key: i64, tree: Option<TreeNode>) -> Self {
        Self {
            description: format!("Preparing to insert {}", key),
            tree,
            keys: None,
            current_key: Some(key),
            rotation_type: None,
            rotation_description: None,
            involved_nodes: None,
        }
    }

    fn after(key: i64, tree: Option<TreeNode>, rotation: Option<&Rotation>) -> Self {
        Self {
            description: format!("Inserted {}", key),
            tree,
            keys: None,
            current_key: Some(key),
            rotation_type: rotation.map(|r| r.kind),
            rotation_description: rotation.map(|r| r.kind.description().to_string()),
            involved_nodes: rotation.map(|r| r.nodes.clone()),
        }
    }

    pub fn has_rotation(&self) -> bool {
        self.rotation_type.is_some()
    }
}

/// Full result of an insertion run: `{steps, finalTree}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvlTrace {
    pub steps: Vec<AvlStep>,
    pub final_tree: Option<TreeNode>,
}

/// Converts a caller-supplied value into an integer key.
///
/// Integers pass through, finite floats are truncated toward zero and strings
/// are trimmed and parsed as base-10 integers. Anything else is rejected,
/// booleans included: `true` is not read as the key 1.
pub fn parse_key(value: &serde_json::Value) -> Result<i64> {
    use serde_json::Value;

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Error::invalid(format!("Invalid key: {}. All keys must be integers.", shown))
    })
}

/// Validates `keys`, drops repeats (first occurrence wins) and traces the
/// insertion of the survivors into one fresh tree.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `keys` is empty or any element is not
/// integer-convertible (see [`parse_key`]).
pub fn insert_key_sequence(keys: &[serde_json::Value]) -> Result<AvlTrace> {
    if keys.is_empty() {
        return Err(Error::invalid("Keys list cannot be empty"));
    }

    let mut seen = HashSet::with_capacity(keys.len());
    let mut unique = Vec::with_capacity(keys.len());
    for value in keys {
        let key = parse_key(value)?;
        if seen.insert(key) {
            unique.push(key);
        }
    }

    Ok(trace_insertions(&unique))
}

/// Traces the insertion of already-validated keys, in order.
///
/// Produces an initial empty-tree step, then a "before" and an "after" step
/// per key. Keys repeated in `keys` are no-ops but still get their two steps.
///
/// The "after" snapshot tags the new local root of any rotation, but the
/// step-level rotation fields are only filled when that rotation rebalanced
/// the root itself.
pub fn trace_insertions(keys: &[i64]) -> AvlTrace {
    let mut tree = AvlTree::new();
    let mut steps = Vec::with_capacity(1 + 2 * keys.len());
    steps.push(AvlStep::initial(keys));

    for &key in keys {
        steps.push(AvlStep::before(key, tree.snapshot(None)));
        let rotation = tree.insert(key);
        let snapshot = tree.snapshot(rotation.as_ref());
        let at_root = rotation
            .as_ref()
            .filter(|r| tree.root().map(Node::key) == Some(r.pivot));
        steps.push(AvlStep::after(key, snapshot, at_root));
    }

    log::debug!(
        "traced {} AVL insertions: {} steps, {} rotations, height {}",
        keys.len(),
        steps.len(),
        tree.rotation_count(),
        tree.height()
    );

    AvlTrace {
        steps,
        final_tree: tree.snapshot(None),
    }
}
