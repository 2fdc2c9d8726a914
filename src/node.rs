//! Network Node Structure
//!
//! Represents a single network endpoint placed on the globe surface.

use glam::Vec3;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to a node inside one generation batch
///
/// Carries the batch generation so that a handle kept across a regeneration
/// is rejected instead of silently resolving to an unrelated node.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

impl NodeId {
    /// Create a handle for the node at `index` in batch `generation`
    pub fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    /// Position of the node in its graph's node list
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// Generation batch this handle belongs to
    #[inline]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// A single network node on the globe surface
///
/// Nodes are immutable once created. Adjacency is owned by the
/// [`NodeGraph`](crate::graph::NodeGraph) that holds the node.
///
/// # Equality
///
/// Two nodes are equal only if their name, position (bit-for-bit, with
/// `-0.0` treated as `0.0`) and generation all match. Hashing combines the
/// same three fields, so nodes from an older batch never collide with their
/// replacements in a set or map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    position: Vec3,
}

impl Node {
    /// Create a new node
    ///
    /// This is typically called by the distributor, not by user code.
    pub fn new(id: NodeId, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.id.generation
    }

    /// Straight-line distance to another node (the edge weight)
    #[inline]
    pub fn distance_to(&self, other: &Node) -> f32 {
        self.position.distance(other.position)
    }

    /// Great-circle angle in radians between the two positions, seen from the sphere center
    pub fn angle_to(&self, other: &Node) -> f32 {
        great_circle_angle(self.position, other.position)
    }

    /// Arc distance along a sphere of the given radius
    pub fn arc_distance_to(&self, other: &Node, sphere_radius: f32) -> f32 {
        sphere_radius * self.angle_to(other)
    }

    /// Coordinate bits with signed zero folded to +0.0
    fn position_bits(&self) -> [u32; 3] {
        fn bits(v: f32) -> u32 {
            if v == 0.0 {
                0.0_f32.to_bits()
            } else {
                v.to_bits()
            }
        }
        [bits(self.position.x), bits(self.position.y), bits(self.position.z)]
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.position_bits() == other.position_bits()
            && self.id.generation == other.id.generation
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.position_bits().hash(state);
        self.id.generation.hash(state);
    }
}

/// Angle in radians between two vectors from the origin
///
/// Returns 0 when either vector has zero length.
pub fn great_circle_angle(a: Vec3, b: Vec3) -> f32 {
    let lengths = a.length() * b.length();
    if lengths == 0.0 {
        return 0.0;
    }
    // Clamp to avoid numerical issues with acos
    (a.dot(b) / lengths).clamp(-1.0, 1.0).acos()
}
