//! AlgoViz Core - instrumented algorithm engines
//!
//! Two independent, side-effect-free engines that run a classic algorithm and
//! hand back the result together with an ordered trace of every decision made
//! along the way, ready to be animated by a front end.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     AlgoViz Core                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌────────────────────────┐   ┌──────────────────────────┐  │
//! │  │       AVL Engine       │   │     Dijkstra Engine      │  │
//! │  │  insert + rotations    │   │  relaxation loop         │  │
//! │  │  → AvlTrace            │   │  + Observer → trace      │  │
//! │  └────────────────────────┘   └──────────────────────────┘  │
//! │               │                            │                 │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │   Step-trace data model: TreeNode, Distance, steps   │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call builds its own tree, graph and step list; nothing is shared
//! between calls.
//!
//! # Quick Start
//!
//! ```
//! use algoviz_core::{avl, dijkstra, Distance, Graph};
//! use serde_json::json;
//!
//! let trace = avl::insert_key_sequence(&[json!(30), json!(20), json!(10)])?;
//! assert_eq!(trace.final_tree.unwrap().key, 20);
//!
//! let mut graph = Graph::new();
//! graph.add_edge("A", "B", 5);
//! graph.make_undirected();
//! let run = dijkstra::trace(&graph, "B")?;
//! assert_eq!(run.distances["A"], Distance::Finite(5));
//! # Ok::<(), algoviz_core::Error>(())
//! ```

pub mod avl;
pub mod dijkstra;
pub mod distance;
pub mod error;
pub mod graph;

pub use avl::{AvlStep, AvlTrace, AvlTree, RotationInfo, RotationKind, TreeNode};
pub use dijkstra::{DijkstraStep, DijkstraTrace, Observer};
pub use distance::{Distance, DistanceMap};
pub use error::{Error, Result};
pub use graph::{Graph, RawAdjacency};
