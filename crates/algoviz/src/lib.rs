//! # AlgoViz - Algorithm Trace Server
//!
//! HTTP front end for the [`algoviz_core`] engines. Each request runs one
//! algorithm to completion and answers with its full step-by-step trace, ready
//! to be replayed by a visualization client.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  HTTP Server (port 5000)                             │
//! │  ├── POST /api/avl-tree    → AVL insertion trace     │
//! │  ├── POST /api/dijkstra    → Dijkstra trace          │
//! │  ├── GET  /api/algorithms  → Algorithm listing       │
//! │  └── GET  /api/health      → Health check            │
//! ├──────────────────────────────────────────────────────┤
//! │  algoviz_core (blocking pool)                        │
//! │  ├── avl::insert_key_sequence                        │
//! │  └── dijkstra::trace                                 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use algoviz::{ServerConfig, TraceServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = TraceServer::new(ServerConfig::default());
//!     server.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! The handlers can also be exercised without a socket:
//!
//! ```
//! use algoviz::api::{run_avl, AvlRequest};
//!
//! let trace = run_avl(AvlRequest {
//!     keys: Some(vec![30.into(), 20.into(), 10.into()]),
//! })
//! .unwrap();
//! assert_eq!(trace.final_tree.unwrap().key, 20);
//! ```

pub mod api;
pub mod error;
pub mod server;

pub use api::{create_router, AlgorithmInfo, AvlRequest, DijkstraRequest};
pub use error::{Error, Result};
pub use server::{ServerConfig, TraceServer};

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
