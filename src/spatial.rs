//! Spatial indexing for picking nodes by position
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::node::Node;

/// KD-tree over node positions
///
/// Turns a 3D position (a click or ray hit on the globe) into the index of
/// the nearest node in O(log n).
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f32, usize, 3, 32>>,
}

impl SpatialIndex {
    /// Build the index from node positions, in node order
    ///
    /// # Example
    ///
    /// ```
    /// use globe_network::*;
    ///
    /// let nodes = distribute_nodes(3, 1.0, &[], 0).unwrap();
    /// let index = SpatialIndex::new(&nodes);
    /// assert_eq!(index.find_nearest(nodes[2].position()), Some(2));
    /// ```
    pub fn new(nodes: &[Node]) -> Self {
        if nodes.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f32; 3]> = nodes
            .iter()
            .map(|n| {
                let p = n.position();
                [p.x, p.y, p.z]
            })
            .collect();

        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Index of the node nearest to `position`, or `None` for an empty index
    pub fn find_nearest(&self, position: Vec3) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y, position.z]);
        Some(result.item as usize)
    }
}
