//! Directional nearest-neighbor linking
//!
//! Each node looks at its surroundings in a local tangent frame and links to
//! the nearest node in each of four directions: right, left, front and back.
//!
//! # Algorithm
//!
//! For every node `from`:
//! 1. Build a rotation taking `from`'s radial direction onto the local up axis (+Y),
//!    so local X (right/left) and local Z (front/back) span the tangent plane
//! 2. Skip candidates whose great-circle angle from `from` exceeds the threshold
//! 3. Per bucket, keep the candidate with the smallest straight-line distance.
//!    The X buckets and Z buckets are compared independently, so one candidate
//!    can win a right/left bucket and a front/back bucket at once
//! 4. Link `from` to every winner, skipping pairs that are already linked
//!
//! Edges added while processing other nodes are kept, so a node's final degree
//! can exceed four.
//!
//! Frame convention: the radial (outward) direction is local +Y; local X and Z
//! lie in the tangent plane.

use glam::{Quat, Vec3};
use tracing::debug;

use crate::config::validate_angle_threshold;
use crate::error::Result;
use crate::graph::NodeGraph;
use crate::node::{great_circle_angle, Node, NodeId};

/// Radial axis of every local tangent frame
const LOCAL_UP: Vec3 = Vec3::Y;

/// Below this, a direction is treated as parallel to the up axis
const PARALLEL_EPSILON: f32 = 1e-6;

/// Rotation from world space into a node's local tangent frame
#[derive(Debug, Clone, Copy)]
pub struct TangentFrame {
    rotation: Quat,
}

impl TangentFrame {
    /// Frame whose up axis is the direction of `position` from the sphere center
    ///
    /// Built from an explicit axis and angle (Rodrigues rotation), taking the
    /// radial direction onto +Y by the shortest arc.
    pub fn at(position: Vec3) -> Self {
        let direction = position.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Self {
                rotation: Quat::IDENTITY,
            };
        }

        let axis = direction.cross(LOCAL_UP);
        let sin = axis.length();
        let cos = direction.dot(LOCAL_UP);

        let rotation = if sin < PARALLEL_EPSILON {
            if cos > 0.0 {
                Quat::IDENTITY
            } else {
                // Antipodal: any perpendicular axis works
                Quat::from_axis_angle(Vec3::X, std::f32::consts::PI)
            }
        } else {
            Quat::from_axis_angle(axis / sin, sin.atan2(cos))
        };

        Self { rotation }
    }

    /// Express a world-space offset in local coordinates
    #[inline]
    pub fn to_local(&self, offset: Vec3) -> Vec3 {
        self.rotation * offset
    }
}

/// Nearest candidate per direction, as (node, straight-line distance)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionalPicks {
    pub right: Option<(NodeId, f32)>,
    pub left: Option<(NodeId, f32)>,
    pub front: Option<(NodeId, f32)>,
    pub back: Option<(NodeId, f32)>,
}

impl DirectionalPicks {
    /// Winning nodes in right, left, front, back order (may repeat)
    pub fn winners(&self) -> impl Iterator<Item = NodeId> + '_ {
        [self.right, self.left, self.front, self.back]
            .into_iter()
            .flatten()
            .map(|(id, _)| id)
    }
}

fn keep_nearest(slot: &mut Option<(NodeId, f32)>, id: NodeId, distance: f32) {
    if slot.map_or(true, |(_, best)| distance < best) {
        *slot = Some((id, distance));
    }
}

/// Pick the nearest candidate in each direction around `from`
///
/// Candidates further than `max_angle` radians around the sphere are ignored.
/// Ties keep the earlier candidate in `nodes` order.
pub fn select_directional_neighbors(nodes: &[Node], from: &Node, max_angle: f32) -> DirectionalPicks {
    let frame = TangentFrame::at(from.position());
    let mut picks = DirectionalPicks::default();

    for to in nodes {
        if to.id() == from.id() {
            continue;
        }
        if great_circle_angle(from.position(), to.position()) > max_angle {
            continue;
        }

        let local = frame.to_local(to.position() - from.position());
        let distance = from.distance_to(to);

        if local.x > 0.0 {
            keep_nearest(&mut picks.right, to.id(), distance);
        } else if local.x < 0.0 {
            keep_nearest(&mut picks.left, to.id(), distance);
        }

        if local.z > 0.0 {
            keep_nearest(&mut picks.front, to.id(), distance);
        } else if local.z < 0.0 {
            keep_nearest(&mut picks.back, to.id(), distance);
        }
    }

    picks
}

/// Rebuild every edge of the graph from directional nearest neighbors
///
/// Existing edges are cleared first. Returns the number of edges created.
///
/// # Errors
///
/// Returns `InvalidConfig` if the threshold is outside [0, 180] degrees; the
/// graph is left untouched in that case.
///
/// # Example
///
/// ```rust
/// use globe_network::*;
///
/// let nodes = distribute_nodes(30, 5.0, &[], 0).unwrap();
/// let mut graph = NodeGraph::new(0, nodes).unwrap();
/// let edges = connect_neighbors(&mut graph, DEFAULT_ANGLE_THRESHOLD_DEGREES).unwrap();
/// assert_eq!(edges, graph.edge_count());
/// ```
pub fn connect_neighbors(graph: &mut NodeGraph, angle_threshold_degrees: f32) -> Result<usize> {
    validate_angle_threshold(angle_threshold_degrees)?;
    graph.clear_edges();

    if graph.len() < 2 {
        return Ok(0);
    }

    let max_angle = angle_threshold_degrees.to_radians();
    for index in 0..graph.len() {
        let from = &graph.nodes()[index];
        let from_id = from.id();
        let picks = select_directional_neighbors(graph.nodes(), from, max_angle);

        for to in picks.winners() {
            graph.add_edge(from_id, to)?;
        }
    }

    debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        threshold = angle_threshold_degrees,
        "connected directional neighbors"
    );

    Ok(graph.edge_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::distribute_nodes;

    fn graph_from_positions(positions: &[Vec3]) -> NodeGraph {
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Node::new(NodeId::new(i, 0), format!("N{}", i), p))
            .collect();
        NodeGraph::new(0, nodes).unwrap()
    }

    fn fibonacci_graph(count: usize, radius: f32) -> NodeGraph {
        NodeGraph::new(0, distribute_nodes(count, radius, &[], 0).unwrap()).unwrap()
    }

    fn edge_set(graph: &NodeGraph) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = graph
            .edges()
            .iter()
            .map(|e| {
                let (i, j) = (e.a.index(), e.b.index());
                (i.min(j), i.max(j))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_frame_maps_radial_to_up() {
        for position in [
            Vec3::new(3.0, 4.0, 5.0),
            Vec3::new(-1.0, 0.2, 0.0),
            Vec3::Y * 2.0,
            -Vec3::Y * 2.0,
            Vec3::Z,
        ] {
            let local = TangentFrame::at(position).to_local(position.normalize());
            assert!(
                (local - Vec3::Y).length() < 1e-5,
                "{:?} mapped to {:?}",
                position,
                local
            );
        }
    }

    #[test]
    fn test_frame_preserves_length() {
        let frame = TangentFrame::at(Vec3::new(1.0, 2.0, -3.0));
        let offset = Vec3::new(0.3, -0.7, 2.0);
        assert!((frame.to_local(offset).length() - offset.length()).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_links_all_pairs() {
        let s = 3.0_f32.sqrt() / 2.0;
        let mut graph = graph_from_positions(&[
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-0.5, s, 0.0),
            Vec3::new(-0.5, -s, 0.0),
        ]);

        let created = connect_neighbors(&mut graph, 180.0).unwrap();
        assert_eq!(created, 3);
        assert_eq!(edge_set(&graph), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_fewer_than_two_nodes() {
        let mut empty = graph_from_positions(&[]);
        assert_eq!(connect_neighbors(&mut empty, 60.0).unwrap(), 0);

        let mut single = graph_from_positions(&[Vec3::X]);
        assert_eq!(connect_neighbors(&mut single, 180.0).unwrap(), 0);
        assert!(single.neighbors(NodeId::new(0, 0)).is_empty());
    }

    #[test]
    fn test_far_side_never_linked() {
        // Antipodal pair: 180 degrees apart
        let mut graph = graph_from_positions(&[Vec3::X, -Vec3::X]);
        connect_neighbors(&mut graph, 60.0).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_symmetry_and_no_self_loops() {
        let mut graph = fibonacci_graph(80, 5.0);
        connect_neighbors(&mut graph, 60.0).unwrap();
        assert!(graph.edge_count() > 0);

        for node in graph.nodes() {
            let id = node.id();
            assert!(!graph.neighbors(id).contains(&id), "self-loop on {}", node.name());
            for &other in graph.neighbors(id) {
                assert!(
                    graph.neighbors(other).contains(&id),
                    "{} lists {} but not the reverse",
                    node.name(),
                    graph.nodes()[other.index()].name()
                );
            }
        }
    }

    #[test]
    fn test_no_duplicate_neighbors() {
        let mut graph = fibonacci_graph(60, 2.0);
        connect_neighbors(&mut graph, 60.0).unwrap();

        for node in graph.nodes() {
            let mut list: Vec<_> = graph.neighbors(node.id()).to_vec();
            let before = list.len();
            list.sort();
            list.dedup();
            assert_eq!(before, list.len());
        }
    }

    #[test]
    fn test_angular_filter() {
        for threshold in [20.0, 45.0, 60.0] {
            let mut graph = fibonacci_graph(40, 3.0);
            connect_neighbors(&mut graph, threshold).unwrap();

            for edge in graph.edges() {
                let a = &graph.nodes()[edge.a.index()];
                let b = &graph.nodes()[edge.b.index()];
                assert!(a.angle_to(b).to_degrees() <= threshold + 1e-3);
            }
        }
    }

    #[test]
    fn test_weights_are_creation_distances() {
        let mut graph = fibonacci_graph(30, 4.0);
        connect_neighbors(&mut graph, 60.0).unwrap();

        for edge in graph.edges() {
            let a = &graph.nodes()[edge.a.index()];
            let b = &graph.nodes()[edge.b.index()];
            assert_eq!(edge.weight, a.distance_to(b));
        }
    }

    #[test]
    fn test_every_node_links_its_nearest_candidate() {
        let mut graph = fibonacci_graph(50, 1.0);
        connect_neighbors(&mut graph, 60.0).unwrap();

        // The globally nearest candidate wins whichever buckets it falls into
        for from in graph.nodes() {
            let nearest = graph
                .nodes()
                .iter()
                .filter(|n| n.id() != from.id())
                .min_by(|a, b| from.distance_to(a).total_cmp(&from.distance_to(b)))
                .unwrap();
            assert!(graph.is_neighbor(from.id(), nearest.id()));
        }
    }

    #[test]
    fn test_reconnect_is_idempotent() {
        let mut graph = fibonacci_graph(40, 5.0);
        connect_neighbors(&mut graph, 60.0).unwrap();
        let first = edge_set(&graph);

        connect_neighbors(&mut graph, 60.0).unwrap();
        assert_eq!(first, edge_set(&graph));

        let mut fresh = fibonacci_graph(40, 5.0);
        connect_neighbors(&mut fresh, 60.0).unwrap();
        assert_eq!(first, edge_set(&fresh));
    }

    #[test]
    fn test_clears_previous_edges() {
        let mut graph = fibonacci_graph(20, 1.0);
        graph.add_edge(NodeId::new(0, 0), NodeId::new(19, 0)).unwrap();

        connect_neighbors(&mut graph, 10.0).unwrap();
        let a = &graph.nodes()[0];
        let b = &graph.nodes()[19];
        if a.angle_to(b).to_degrees() > 10.0 {
            assert!(!graph.is_neighbor(a.id(), b.id()));
        }
    }

    #[test]
    fn test_invalid_threshold_leaves_graph_untouched() {
        let mut graph = fibonacci_graph(10, 1.0);
        connect_neighbors(&mut graph, 90.0).unwrap();
        let before = edge_set(&graph);

        assert!(connect_neighbors(&mut graph, -5.0).is_err());
        assert!(connect_neighbors(&mut graph, f32::NAN).is_err());
        assert_eq!(before, edge_set(&graph));
    }

    #[test]
    fn test_picks_one_per_axis_side() {
        let from = Node::new(NodeId::new(0, 0), "from", Vec3::Y);
        let nodes = vec![
            from.clone(),
            Node::new(NodeId::new(1, 0), "r", Vec3::new(0.2, 1.0, 0.05).normalize()),
            Node::new(NodeId::new(2, 0), "r_far", Vec3::new(0.5, 1.0, 0.05).normalize()),
            Node::new(NodeId::new(3, 0), "l", Vec3::new(-0.3, 1.0, -0.01).normalize()),
        ];

        let picks = select_directional_neighbors(&nodes, &from, std::f32::consts::PI);
        assert_eq!(picks.right.map(|(id, _)| id.index()), Some(1));
        assert_eq!(picks.left.map(|(id, _)| id.index()), Some(3));
        // Candidate 1 is also the nearest with positive local z
        assert_eq!(picks.front.map(|(id, _)| id.index()), Some(1));
        assert_eq!(picks.back.map(|(id, _)| id.index()), Some(3));
        assert_eq!(picks.winners().count(), 4);
    }
}
