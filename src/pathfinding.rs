//! Shortest paths over the node graph
//!
//! A query runs in two phases: a breadth-first discovery of the nodes
//! reachable from the start, then Dijkstra's algorithm restricted to that set,
//! with edge weights equal to the straight-line distance between endpoints.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::graph::NodeGraph;
use crate::node::NodeId;

/// Result of a path query
///
/// A real path holds at least two nodes, from start to end inclusive, each
/// adjacent to the next. Shorter results mean no path: a single `[end]` when
/// the end is unreachable, or a single `[start]` when start and end coincide.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    nodes: Vec<NodeId>,
    distance: f32,
}

impl Path {
    fn single(node: NodeId, distance: f32) -> Self {
        Self {
            nodes: vec![node],
            distance,
        }
    }

    /// Whether this is a real path between two distinct nodes
    #[inline]
    pub fn is_found(&self) -> bool {
        self.nodes.len() >= 2
    }

    /// Nodes from start to end inclusive
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges walked
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Sum of edge weights along the path
    ///
    /// Infinite when the end is unreachable, zero when start equals end.
    #[inline]
    pub fn total_distance(&self) -> f32 {
        self.distance
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

/// Nodes reachable from `start`, in breadth-first discovery order
///
/// The start node is always first.
///
/// # Errors
///
/// Returns `InvalidArgument` if `start` is not a node of this graph generation
pub fn reachable_from(graph: &NodeGraph, start: NodeId) -> Result<Vec<NodeId>> {
    graph.node(start)?;

    let mut visited = HashSet::new();
    let mut frontier = VecDeque::new();
    let mut order = Vec::new();

    visited.insert(start);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        order.push(current);
        for &neighbor in graph.neighbors(current) {
            if visited.insert(neighbor) {
                frontier.push_back(neighbor);
            }
        }
    }

    Ok(order)
}

/// Priority queue entry: lowest distance first, then earliest discovery
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f32,
    order: usize,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the shortest path from `start` to `end`
///
/// Among unprocessed nodes with equal tentative distance, the one discovered
/// first by the breadth-first phase is processed first, so results are
/// deterministic. The search stops as soon as `end` is selected.
///
/// "No path" is not an error: check [`Path::is_found`].
///
/// # Errors
///
/// Returns `InvalidArgument` if either node is not in this graph generation
///
/// # Example
///
/// ```
/// use globe_network::*;
///
/// let nodes = distribute_nodes(20, 5.0, &[], 0).unwrap();
/// let mut graph = NodeGraph::new(0, nodes).unwrap();
/// connect_neighbors(&mut graph, 60.0).unwrap();
///
/// let start = graph.nodes()[0].id();
/// let end = graph.nodes()[19].id();
/// let path = find_path(&graph, start, end).unwrap();
/// if path.is_found() {
///     assert_eq!(path.nodes().first(), Some(&start));
///     assert_eq!(path.nodes().last(), Some(&end));
/// }
/// ```
pub fn find_path(graph: &NodeGraph, start: NodeId, end: NodeId) -> Result<Path> {
    graph.node(end)?;

    // Discovery phase
    let reachable = reachable_from(graph, start)?;

    if start == end {
        return Ok(Path::single(start, 0.0));
    }

    let discovery: HashMap<NodeId, usize> = reachable
        .iter()
        .enumerate()
        .map(|(order, &id)| (id, order))
        .collect();

    // Relaxation phase
    let mut distances: HashMap<NodeId, f32> = reachable
        .iter()
        .map(|&id| (id, f32::INFINITY))
        .collect();
    let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
    let mut processed: HashSet<NodeId> = HashSet::with_capacity(reachable.len());
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    queue.push(Frontier {
        distance: 0.0,
        order: 0,
        node: start,
    });

    while let Some(Frontier { distance, node, .. }) = queue.pop() {
        if !processed.insert(node) {
            continue;
        }
        if node == end {
            break;
        }

        for &neighbor in graph.neighbors(node) {
            if processed.contains(&neighbor) {
                continue;
            }
            let weight = match graph.edge_between(node, neighbor) {
                Some(edge) => edge.weight,
                None => continue,
            };

            let candidate = distance + weight;
            let current = distances.get(&neighbor).copied().unwrap_or(f32::INFINITY);
            if candidate < current {
                distances.insert(neighbor, candidate);
                previous.insert(neighbor, node);
                queue.push(Frontier {
                    distance: candidate,
                    order: discovery.get(&neighbor).copied().unwrap_or(usize::MAX),
                    node: neighbor,
                });
            }
        }
    }

    let path = reconstruct(start, end, &previous, &distances);
    debug!(
        reachable = reachable.len(),
        hops = path.hop_count(),
        distance = path.total_distance(),
        found = path.is_found(),
        "path query"
    );
    Ok(path)
}

/// Walk predecessor links back from `end`, then reverse
fn reconstruct(
    start: NodeId,
    end: NodeId,
    previous: &HashMap<NodeId, NodeId>,
    distances: &HashMap<NodeId, f32>,
) -> Path {
    let mut nodes = vec![end];
    let mut current = end;

    while current != start {
        match previous.get(&current) {
            Some(&prev) => {
                nodes.push(prev);
                current = prev;
            }
            None => return Path::single(end, f32::INFINITY),
        }
    }

    nodes.reverse();
    Path {
        nodes,
        distance: distances.get(&end).copied().unwrap_or(f32::INFINITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlobeError;
    use crate::generation::{connect_neighbors, distribute_nodes};
    use crate::node::Node;
    use glam::Vec3;

    fn graph_from_positions(positions: &[Vec3]) -> NodeGraph {
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Node::new(NodeId::new(i, 0), format!("N{}", i), p))
            .collect();
        NodeGraph::new(0, nodes).unwrap()
    }

    fn id(index: usize) -> NodeId {
        NodeId::new(index, 0)
    }

    fn path_weight(graph: &NodeGraph, path: &Path) -> f32 {
        path.nodes()
            .windows(2)
            .map(|pair| graph.edge_between(pair[0], pair[1]).unwrap().weight)
            .sum()
    }

    /// Shortest simple-path weight by exhaustive search
    fn brute_force(graph: &NodeGraph, start: NodeId, end: NodeId) -> Option<f32> {
        fn walk(
            graph: &NodeGraph,
            current: NodeId,
            end: NodeId,
            so_far: f32,
            visited: &mut Vec<NodeId>,
            best: &mut Option<f32>,
        ) {
            if current == end {
                if best.map_or(true, |b| so_far < b) {
                    *best = Some(so_far);
                }
                return;
            }
            for &next in graph.neighbors(current) {
                if visited.contains(&next) {
                    continue;
                }
                let weight = graph.edge_between(current, next).unwrap().weight;
                visited.push(next);
                walk(graph, next, end, so_far + weight, visited, best);
                visited.pop();
            }
        }

        let mut best = None;
        walk(graph, start, end, 0.0, &mut vec![start], &mut best);
        best
    }

    #[test]
    fn test_triangle_direct_paths() {
        let s = 3.0_f32.sqrt() / 2.0;
        let mut graph = graph_from_positions(&[
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-0.5, s, 0.0),
            Vec3::new(-0.5, -s, 0.0),
        ]);
        connect_neighbors(&mut graph, 180.0).unwrap();

        for (a, b) in [(0, 1), (0, 2), (1, 2), (2, 0)] {
            let path = find_path(&graph, id(a), id(b)).unwrap();
            assert_eq!(path.nodes(), &[id(a), id(b)]);
            let direct = graph.nodes()[a].distance_to(&graph.nodes()[b]);
            assert!((path.total_distance() - direct).abs() < 1e-5);
        }
    }

    #[test]
    fn test_same_start_and_end() {
        let mut graph = graph_from_positions(&[Vec3::X, Vec3::Y]);
        connect_neighbors(&mut graph, 180.0).unwrap();

        let path = find_path(&graph, id(0), id(0)).unwrap();
        assert_eq!(path.nodes(), &[id(0)]);
        assert!(!path.is_found());
        assert_eq!(path.hop_count(), 0);
    }

    #[test]
    fn test_disjoint_clusters() {
        let mut graph = graph_from_positions(&[
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.1, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.1, 0.0),
        ]);
        graph.add_edge(id(0), id(1)).unwrap();
        graph.add_edge(id(2), id(3)).unwrap();

        let path = find_path(&graph, id(0), id(3)).unwrap();
        assert!(path.len() < 2);
        assert_eq!(path.nodes(), &[id(3)]);
        assert!(path.total_distance().is_infinite());
    }

    #[test]
    fn test_isolated_start() {
        let graph = graph_from_positions(&[Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(reachable_from(&graph, id(0)).unwrap(), vec![id(0)]);

        let path = find_path(&graph, id(0), id(2)).unwrap();
        assert!(!path.is_found());
    }

    #[test]
    fn test_prefers_lighter_route() {
        // 0 -- 1 -- 2 is shorter than the direct 0 -- 2 detour via 3
        let mut graph = graph_from_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 5.0, 0.0),
        ]);
        graph.add_edge(id(0), id(3)).unwrap();
        graph.add_edge(id(3), id(2)).unwrap();
        graph.add_edge(id(0), id(1)).unwrap();
        graph.add_edge(id(1), id(2)).unwrap();

        let path = find_path(&graph, id(0), id(2)).unwrap();
        assert_eq!(path.nodes(), &[id(0), id(1), id(2)]);
        assert!((path.total_distance() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_follow_discovery_order() {
        // Square: two equal-length routes from 0 to 2
        let mut graph = graph_from_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]);
        graph.add_edge(id(0), id(3)).unwrap();
        graph.add_edge(id(0), id(1)).unwrap();
        graph.add_edge(id(3), id(2)).unwrap();
        graph.add_edge(id(1), id(2)).unwrap();

        // Node 3 is discovered before node 1, so it is settled first
        // and becomes the predecessor of 2
        let path = find_path(&graph, id(0), id(2)).unwrap();
        assert_eq!(path.nodes(), &[id(0), id(3), id(2)]);

        for _ in 0..5 {
            assert_eq!(find_path(&graph, id(0), id(2)).unwrap(), path);
        }
    }

    #[test]
    fn test_reachable_breadth_first_order() {
        let mut graph = graph_from_positions(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(9.0, 9.0, 9.0),
        ]);
        graph.add_edge(id(0), id(1)).unwrap();
        graph.add_edge(id(1), id(2)).unwrap();
        graph.add_edge(id(0), id(3)).unwrap();

        let order = reachable_from(&graph, id(0)).unwrap();
        assert_eq!(order, vec![id(0), id(1), id(3), id(2)]);
    }

    #[test]
    fn test_optimal_against_brute_force() {
        for count in 3..=8 {
            let nodes = distribute_nodes(count, 1.0, &[], 0).unwrap();
            let mut graph = NodeGraph::new(0, nodes).unwrap();
            connect_neighbors(&mut graph, 120.0).unwrap();

            for a in 0..count {
                for b in 0..count {
                    if a == b {
                        continue;
                    }
                    let path = find_path(&graph, id(a), id(b)).unwrap();
                    match brute_force(&graph, id(a), id(b)) {
                        Some(best) => {
                            assert!(path.is_found());
                            assert!(
                                (path.total_distance() - best).abs() < 1e-4,
                                "{} -> {}: dijkstra {} vs brute force {}",
                                a,
                                b,
                                path.total_distance(),
                                best
                            );
                            assert!((path_weight(&graph, &path) - path.total_distance()).abs() < 1e-5);
                        }
                        None => assert!(!path.is_found()),
                    }
                }
            }
        }
    }

    #[test]
    fn test_path_nodes_are_adjacent() {
        let nodes = distribute_nodes(60, 5.0, &[], 0).unwrap();
        let mut graph = NodeGraph::new(0, nodes).unwrap();
        connect_neighbors(&mut graph, 60.0).unwrap();

        let path = find_path(&graph, id(0), id(59)).unwrap();
        if path.is_found() {
            assert_eq!(path.nodes()[0], id(0));
            assert_eq!(*path.nodes().last().unwrap(), id(59));
            for pair in path.nodes().windows(2) {
                assert!(graph.is_neighbor(pair[0], pair[1]));
            }
        }
    }

    #[test]
    fn test_foreign_handles_rejected() {
        let graph = graph_from_positions(&[Vec3::X, Vec3::Y]);
        let stale = NodeId::new(0, 1);

        assert!(matches!(
            find_path(&graph, stale, id(1)),
            Err(GlobeError::InvalidArgument(_))
        ));
        assert!(find_path(&graph, id(0), stale).is_err());
        assert!(find_path(&graph, id(0), id(7)).is_err());
        assert!(reachable_from(&graph, id(7)).is_err());
    }
}
