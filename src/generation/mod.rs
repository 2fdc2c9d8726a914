//! Network graph construction
//!
//! Places nodes on the sphere with the Fibonacci spiral and links each node
//! to its directional nearest neighbors.

mod fibonacci;
mod neighbors;

pub use fibonacci::{distribute_nodes, distribute_nodes_jittered, fibonacci_sphere_directions};
pub use neighbors::{connect_neighbors, select_directional_neighbors, DirectionalPicks, TangentFrame};

use crate::config::GlobeConfig;
use crate::error::Result;
use crate::graph::NodeGraph;

/// Build a fully connected-up graph for one generation batch
///
/// Places the configured nodes, then links directional neighbors using the
/// configured angle threshold.
pub fn generate_graph(config: &GlobeConfig, generation: u64) -> Result<NodeGraph> {
    config.validate()?;

    // Step 1: Place nodes on the sphere
    let nodes = distribute_nodes_jittered(
        config.node_count,
        config.radius,
        &config.names,
        generation,
        config.jitter,
        config.seed,
    )?;

    // Step 2: Link directional neighbors
    let mut graph = NodeGraph::new(generation, nodes)?;
    connect_neighbors(&mut graph, config.angle_threshold_degrees)?;

    Ok(graph)
}
