//! Wide-area network graphs on a globe
//!
//! A standalone library that places network nodes on a sphere, links each
//! node to its nearest neighbors in four directions, and finds shortest paths
//! between nodes. Rendering and animation are left to the host engine
//! (Bevy, Godot, etc.), which reads nodes, links and paths from here.
//!
//! # Quick Start
//!
//! ```rust
//! use globe_network::*;
//!
//! let config = GlobeConfigBuilder::new()
//!     .node_count(24)
//!     .radius(5.0).unwrap()
//!     .angle_threshold(60.0).unwrap()
//!     .build().unwrap();
//!
//! let globe = NetworkGlobe::generate(config).unwrap();
//!
//! let path = globe.find_path_by_name("Node0", "Node12").unwrap();
//! if path.is_found() {
//!     println!("route of {} hops, length {:.2}", path.hop_count(), path.total_distance());
//! } else {
//!     println!("no route");
//! }
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-node lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, nodes, edges and paths

pub mod error;
pub mod config;
pub mod node;
pub mod graph;
pub mod generation;
pub mod pathfinding;
pub mod globe;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{GlobeError, Result};
pub use config::{GlobeConfig, GlobeConfigBuilder, DEFAULT_ANGLE_THRESHOLD_DEGREES};
pub use node::{Node, NodeId};
pub use graph::{Edge, NodeGraph};
pub use generation::{connect_neighbors, distribute_nodes, distribute_nodes_jittered, generate_graph};
pub use pathfinding::{find_path, reachable_from, Path};
pub use globe::NetworkGlobe;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
