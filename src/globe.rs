//! NetworkGlobe main structure

use glam::Vec3;
use tracing::info;

use crate::config::GlobeConfig;
use crate::error::{GlobeError, Result};
use crate::generation::generate_graph;
use crate::graph::{Edge, NodeGraph};
use crate::node::{Node, NodeId};
use crate::pathfinding::{find_path, Path};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated network on a globe
///
/// Holds the current generation's graph together with the configuration that
/// produced it. Regenerating swaps in a complete new graph in one step; handles
/// from the previous generation stop resolving.
///
/// # Examples
///
/// ```
/// use globe_network::*;
///
/// let config = GlobeConfigBuilder::new()
///     .node_count(30)
///     .build()
///     .unwrap();
///
/// let globe = NetworkGlobe::generate(config).unwrap();
/// println!("{} nodes, {} links", globe.node_count(), globe.graph().edge_count());
///
/// let path = globe.find_path_by_name("Node0", "Node29").unwrap();
/// if path.is_found() {
///     println!("{} hops", path.hop_count());
/// }
/// ```
#[derive(Clone)]
pub struct NetworkGlobe {
    config: GlobeConfig,
    graph: NodeGraph,

    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl NetworkGlobe {
    /// Generate the first network for `config`
    pub fn generate(config: GlobeConfig) -> Result<Self> {
        Self::build(config, 0)
    }

    fn build(config: GlobeConfig, generation: u64) -> Result<Self> {
        let graph = generate_graph(&config, generation)?;

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(graph.nodes());

        info!(
            generation,
            nodes = graph.len(),
            edges = graph.edge_count(),
            "generated globe network"
        );

        Ok(Self {
            config,
            graph,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Replace the whole network with one built from `config`
    ///
    /// The new batch gets the next generation number. On error the current
    /// network is kept unchanged.
    pub fn regenerate(&mut self, config: GlobeConfig) -> Result<()> {
        let generation = self.graph.generation() + 1;
        *self = Self::build(config, generation)?;
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    #[inline]
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.graph.generation()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// All nodes, for drawing markers
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    /// Get a node by handle, `None` if stale or foreign
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.graph.get(id)
    }

    #[inline]
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.graph.node_by_name(name)
    }

    /// Neighbor handles of a node; empty for stale or foreign handles
    #[inline]
    pub fn get_neighbors(&self, id: NodeId) -> &[NodeId] {
        self.graph.neighbors(id)
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// Endpoint positions of every link, for drawing connection lines
    pub fn connection_segments(&self) -> Vec<(Vec3, Vec3)> {
        self.graph.connection_segments()
    }

    /// Find the shortest path between two nodes
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for stale or foreign handles
    pub fn find_path(&self, start: NodeId, end: NodeId) -> Result<Path> {
        find_path(&self.graph, start, end)
    }

    /// Find the shortest path between two nodes given by name
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either name is unknown
    pub fn find_path_by_name(&self, start: &str, end: &str) -> Result<Path> {
        let start = self.require_named(start)?;
        let end = self.require_named(end)?;
        self.find_path(start, end)
    }

    fn require_named(&self, name: &str) -> Result<NodeId> {
        self.graph
            .node_by_name(name)
            .map(Node::id)
            .ok_or_else(|| GlobeError::InvalidArgument(format!("unknown node '{}'", name)))
    }

    /// Positions along a path, for animating travel along it
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the path came from another generation
    pub fn path_positions(&self, path: &Path) -> Result<Vec<Vec3>> {
        path.nodes()
            .iter()
            .map(|&id| self.graph.node(id).map(Node::position))
            .collect()
    }

    /// Find the node nearest to a position (requires spatial-index feature)
    ///
    /// Returns `None` when the globe has no nodes.
    ///
    /// # Example
    ///
    /// ```
    /// # use globe_network::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let globe = NetworkGlobe::generate(GlobeConfig::default()).unwrap();
    /// let hit = globe.nodes()[3].position() * 1.01;
    /// assert_eq!(globe.find_node_at(hit), Some(globe.nodes()[3].id()));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_node_at(&self, position: Vec3) -> Option<NodeId> {
        self.spatial_index
            .find_nearest(position)
            .map(|index| self.graph.nodes()[index].id())
    }
}
