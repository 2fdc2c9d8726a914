//! Node graph for one generation batch
//!
//! Owns the nodes, their adjacency lists and the pair-to-edge lookup.

use glam::Vec3;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GlobeError, Result};
use crate::node::{Node, NodeId};

/// Undirected edge between two nodes
///
/// The weight is the straight-line distance between the endpoints at the
/// moment the edge was created.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: f32,
}

impl Edge {
    /// The endpoint opposite to `id`, or `None` if `id` is not an endpoint
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if id == self.a {
            Some(self.b)
        } else if id == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Unordered index pair used as the edge lookup key
type PairKey = (usize, usize);

fn pair_key(a: NodeId, b: NodeId) -> PairKey {
    let (i, j) = (a.index(), b.index());
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

/// The nodes and edges of one generation batch
///
/// Adjacency is symmetric: every edge appears in both endpoints' neighbor lists,
/// in insertion order. There are no self-loops and no parallel edges.
///
/// # Example
///
/// ```
/// use globe_network::*;
///
/// let nodes = distribute_nodes(6, 5.0, &[], 0).unwrap();
/// let mut graph = NodeGraph::new(0, nodes).unwrap();
/// connect_neighbors(&mut graph, 180.0).unwrap();
///
/// for node in graph.nodes() {
///     for &neighbor in graph.neighbors(node.id()) {
///         assert!(graph.neighbors(neighbor).contains(&node.id()));
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NodeGraph {
    generation: u64,
    nodes: Vec<Node>,
    adjacency: Vec<Vec<NodeId>>,
    edges: Vec<Edge>,
    edge_lookup: HashMap<PairKey, usize>,
    by_name: HashMap<String, NodeId>,
}

impl NodeGraph {
    /// Take ownership of one batch of nodes, without edges
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a node belongs to another generation, is
    /// out of index order, or repeats a name.
    pub fn new(generation: u64, nodes: Vec<Node>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(nodes.len());

        for (index, node) in nodes.iter().enumerate() {
            if node.generation() != generation {
                return Err(GlobeError::InvalidArgument(format!(
                    "node '{}' belongs to generation {}, graph is generation {}",
                    node.name(),
                    node.generation(),
                    generation
                )));
            }
            if node.id().index() != index {
                return Err(GlobeError::InvalidArgument(format!(
                    "node '{}' has index {} but sits at position {}",
                    node.name(),
                    node.id().index(),
                    index
                )));
            }
            if by_name.insert(node.name().to_string(), node.id()).is_some() {
                return Err(GlobeError::InvalidArgument(format!(
                    "duplicate node name '{}'",
                    node.name()
                )));
            }
        }

        Ok(Self {
            generation,
            adjacency: vec![Vec::new(); nodes.len()],
            nodes,
            edges: Vec::new(),
            edge_lookup: HashMap::new(),
            by_name,
        })
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in generation order
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in creation order
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `id` refers to a node of this graph and generation
    pub fn contains(&self, id: NodeId) -> bool {
        id.generation() == self.generation && id.index() < self.nodes.len()
    }

    /// Look up a node, returning `None` for foreign or stale handles
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if self.contains(id) {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Look up a node
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for foreign or stale handles
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or_else(|| {
            GlobeError::InvalidArgument(format!(
                "node {} of generation {} is not in graph generation {}",
                id.index(),
                id.generation(),
                self.generation
            ))
        })
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|id| &self.nodes[id.index()])
    }

    /// Resolve a node record to its handle in this graph
    ///
    /// Uses the full equality contract, so a node from a previous batch with
    /// the same name does not resolve.
    pub fn id_of(&self, node: &Node) -> Option<NodeId> {
        self.node_by_name(node.name())
            .filter(|candidate| *candidate == node)
            .map(Node::id)
    }

    /// Neighbor handles of a node, in insertion order
    ///
    /// Returns an empty slice for foreign or stale handles.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        if self.contains(id) {
            &self.adjacency[id.index()]
        } else {
            &[]
        }
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    pub fn is_neighbor(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    /// The edge joining two nodes, in either direction
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        self.edge_lookup
            .get(&pair_key(a, b))
            .map(|&edge_idx| &self.edges[edge_idx])
    }

    /// Insert an undirected edge weighted by the current endpoint distance
    ///
    /// Returns `Ok(false)` if the edge already exists.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for foreign handles or a self-loop
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        let weight = self.node(a)?.distance_to(self.node(b)?);
        if a == b {
            return Err(GlobeError::InvalidArgument(format!(
                "self-loop on node '{}'",
                self.nodes[a.index()].name()
            )));
        }

        let key = pair_key(a, b);
        if self.edge_lookup.contains_key(&key) {
            return Ok(false);
        }

        self.edge_lookup.insert(key, self.edges.len());
        self.edges.push(Edge { a, b, weight });
        self.adjacency[a.index()].push(b);
        self.adjacency[b.index()].push(a);
        Ok(true)
    }

    /// Remove every edge, keeping the nodes
    pub fn clear_edges(&mut self) {
        self.edges.clear();
        self.edge_lookup.clear();
        for list in &mut self.adjacency {
            list.clear();
        }
    }

    /// Endpoint positions of every edge, for drawing connection lines
    pub fn connection_segments(&self) -> Vec<(Vec3, Vec3)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    self.nodes[e.a.index()].position(),
                    self.nodes[e.b.index()].position(),
                )
            })
            .collect()
    }

    /// Sum of all edge weights
    pub fn total_length(&self) -> f32 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}
