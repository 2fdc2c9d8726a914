//! Fibonacci Sphere Node Distribution
//!
//! Places nodes on a sphere using the Fibonacci spiral (golden ratio) method,
//! with optional seeded jitter for a less regular layout.
//!
//! # Algorithm
//!
//! For node `i` of `n`:
//! - Inclination: `acos(1 - 2i/n)`, evenly spaced in z from the north pole
//! - Azimuth: `i * 2πφ`, an irrational step so no two nodes share a meridian
//!
//! The unit direction is scaled to the sphere radius.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f32::consts::PI;

use crate::config::{resolve_name, validate_jitter, validate_radius, validate_unique_names};
use crate::error::Result;
use crate::node::{Node, NodeId};

/// Golden ratio φ = (1 + √5) / 2
const PHI: f32 = 1.618_034;

/// Unit directions of the Fibonacci sphere, in index order
///
/// # Example
///
/// ```rust
/// use globe_network::generation::fibonacci_sphere_directions;
///
/// let dirs = fibonacci_sphere_directions(100);
/// assert_eq!(dirs.len(), 100);
/// assert!(dirs.iter().all(|d| (d.length() - 1.0).abs() < 1e-5));
/// ```
pub fn fibonacci_sphere_directions(count: usize) -> Vec<Vec3> {
    let n = count as f32;

    (0..count)
        .map(|i| {
            let i_f = i as f32;
            let t = i_f / n;
            let inclination = (1.0 - 2.0 * t).acos();
            let azimuth = i_f * (2.0 * PI * PHI);

            Vec3::new(
                inclination.sin() * azimuth.cos(),
                inclination.sin() * azimuth.sin(),
                inclination.cos(),
            )
            .normalize()
        })
        .collect()
}

/// Place `count` named nodes on a sphere of the given radius
///
/// Node `i` takes `names[i]` when present, otherwise `Node{i}`. The output is
/// fully determined by the inputs.
///
/// # Errors
///
/// Returns `InvalidConfig` if radius is not positive or names collide.
/// Nothing is produced on error.
///
/// # Example
///
/// ```rust
/// use globe_network::*;
///
/// let nodes = distribute_nodes(1, 5.0, &[], 0).unwrap();
/// assert_eq!(nodes[0].name(), "Node0");
/// assert!((nodes[0].position().length() - 5.0).abs() < 1e-5);
/// ```
pub fn distribute_nodes(
    count: usize,
    radius: f32,
    names: &[Option<String>],
    generation: u64,
) -> Result<Vec<Node>> {
    distribute_nodes_jittered(count, radius, names, generation, 0.0, 0)
}

/// Place nodes like [`distribute_nodes`], adding seeded tangential jitter
///
/// `jitter` is a fraction of the average angular spacing between nodes.
/// A jitter of 0 gives exactly the same positions as `distribute_nodes`.
///
/// # Errors
///
/// Returns `InvalidConfig` for a non-positive radius, jitter outside [0, 1]
/// or colliding names.
pub fn distribute_nodes_jittered(
    count: usize,
    radius: f32,
    names: &[Option<String>],
    generation: u64,
    jitter: f32,
    seed: u64,
) -> Result<Vec<Node>> {
    validate_radius(radius)?;
    validate_jitter(jitter)?;
    validate_unique_names(count, names)?;

    let mut directions = fibonacci_sphere_directions(count);
    if jitter > 0.0 && count > 0 {
        apply_jitter(&mut directions, jitter, seed);
    }

    Ok(directions
        .into_iter()
        .enumerate()
        .map(|(i, direction)| {
            Node::new(
                NodeId::new(i, generation),
                resolve_name(names, i),
                direction * radius,
            )
        })
        .collect())
}

/// Offset each unit direction within its tangent plane, then re-normalize
fn apply_jitter(directions: &mut [Vec3], strength: f32, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Average angular spacing between points (approximate)
    let avg_spacing = (4.0 * PI / directions.len() as f32).sqrt();
    let jitter_amount = avg_spacing * strength;

    // Tiny strengths can underflow to zero, leaving an empty sampling range
    if jitter_amount <= 0.0 {
        return;
    }

    for base in directions.iter_mut() {
        let jitter_theta: f32 = rng.gen_range(0.0..2.0 * PI);
        let jitter_mag: f32 = rng.gen_range(0.0..jitter_amount);

        // Orthonormal basis for the tangent plane
        let up = if base.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
        let tangent1 = base.cross(up).normalize();
        let tangent2 = base.cross(tangent1).normalize();

        *base = (*base
            + tangent1 * jitter_mag * jitter_theta.cos()
            + tangent2 * jitter_mag * jitter_theta.sin())
        .normalize();
    }
}
