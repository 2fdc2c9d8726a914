//! Globe Network Configuration and Builder
//!
//! This module provides configuration types for deterministic globe network generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::collections::HashSet;

use crate::error::{GlobeError, Result};

/// Default maximum great-circle angle (degrees) between two linked nodes
pub const DEFAULT_ANGLE_THRESHOLD_DEGREES: f32 = 60.0;

/// Default number of nodes placed on the globe
pub const DEFAULT_NODE_COUNT: usize = 24;

/// Default globe radius in world units
pub const DEFAULT_RADIUS: f32 = 5.0;

/// Configuration for deterministic globe network generation
///
/// The same configuration always produces the same node positions, names and edges.
///
/// # Example
///
/// ```rust
/// use globe_network::*;
///
/// let config = GlobeConfigBuilder::new()
///     .node_count(12)
///     .radius(5.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: GlobeConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    /// Number of nodes to place on the sphere
    pub node_count: usize,

    /// Sphere radius in world units
    pub radius: f32,

    /// Optional custom names, by node index
    ///
    /// Missing entries (or `None`) fall back to `Node{i}`.
    pub names: Vec<Option<String>>,

    /// Maximum great-circle angle, in degrees, between two nodes that may be linked
    pub angle_threshold_degrees: f32,

    /// Tangential jitter as a fraction of the average node spacing
    ///
    /// - 0.0: exact Fibonacci spiral (default)
    /// - 0.5: strong jitter, breaks up the spiral pattern
    pub jitter: f32,

    /// Random seed for the jitter; unused when `jitter` is 0
    pub seed: u64,
}

impl GlobeConfig {
    /// Check every field, returning the first violation found
    pub fn validate(&self) -> Result<()> {
        validate_radius(self.radius)?;
        validate_angle_threshold(self.angle_threshold_degrees)?;
        validate_jitter(self.jitter)?;
        validate_unique_names(self.node_count, &self.names)
    }

    /// Resolve the name of the node at `index`
    pub fn name_for(&self, index: usize) -> String {
        resolve_name(&self.names, index)
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            radius: DEFAULT_RADIUS,
            names: Vec::new(),
            angle_threshold_degrees: DEFAULT_ANGLE_THRESHOLD_DEGREES,
            jitter: 0.0,
            seed: 0,
        }
    }
}

/// Builder for creating GlobeConfig with validation
///
/// # Example
///
/// ```rust
/// use globe_network::*;
///
/// let config = GlobeConfigBuilder::new()
///     .node_count(3)
///     .names(["Tokyo", "Paris", "Lima"])
///     .angle_threshold(120.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.name_for(1), "Paris");
/// ```
#[derive(Debug, Clone)]
pub struct GlobeConfigBuilder {
    node_count: usize,
    radius: f32,
    names: Vec<Option<String>>,
    angle_threshold_degrees: f32,
    jitter: f32,
    seed: u64,
}

impl GlobeConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - node_count: 24
    /// - radius: 5.0
    /// - names: none (all nodes named `Node{i}`)
    /// - angle_threshold: 60 degrees
    /// - jitter: 0.0
    /// - seed: 0
    pub fn new() -> Self {
        let defaults = GlobeConfig::default();
        Self {
            node_count: defaults.node_count,
            radius: defaults.radius,
            names: defaults.names,
            angle_threshold_degrees: defaults.angle_threshold_degrees,
            jitter: defaults.jitter,
            seed: defaults.seed,
        }
    }

    /// Set the number of nodes
    pub fn node_count(mut self, count: usize) -> Self {
        self.node_count = count;
        self
    }

    /// Set the sphere radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius is not a positive finite number
    pub fn radius(mut self, radius: f32) -> Result<Self> {
        validate_radius(radius)?;
        self.radius = radius;
        Ok(self)
    }

    /// Set custom names for the first nodes, in index order
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(|n| Some(n.into())).collect();
        self
    }

    /// Set the name of a single node, leaving earlier unnamed slots on the fallback
    pub fn name_at(mut self, index: usize, name: impl Into<String>) -> Self {
        if self.names.len() <= index {
            self.names.resize(index + 1, None);
        }
        self.names[index] = Some(name.into());
        self
    }

    /// Set the maximum great-circle angle between linked nodes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if degrees is not within [0, 180]
    pub fn angle_threshold(mut self, degrees: f32) -> Result<Self> {
        validate_angle_threshold(degrees)?;
        self.angle_threshold_degrees = degrees;
        Ok(self)
    }

    /// Set the tangential jitter strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if strength is not within [0, 1]
    pub fn jitter(mut self, strength: f32) -> Result<Self> {
        validate_jitter(strength)?;
        self.jitter = strength;
        Ok(self)
    }

    /// Set the random seed used for jitter
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if two nodes would end up with the same name
    pub fn build(self) -> Result<GlobeConfig> {
        let config = GlobeConfig {
            node_count: self.node_count,
            radius: self.radius,
            names: self.names,
            angle_threshold_degrees: self.angle_threshold_degrees,
            jitter: self.jitter,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for GlobeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_radius(radius: f32) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GlobeError::InvalidConfig(format!(
            "radius must be positive (got {})",
            radius
        )));
    }
    Ok(())
}

pub(crate) fn validate_angle_threshold(degrees: f32) -> Result<()> {
    if !(0.0..=180.0).contains(&degrees) {
        return Err(GlobeError::InvalidConfig(format!(
            "angle threshold must be within [0, 180] degrees (got {})",
            degrees
        )));
    }
    Ok(())
}

pub(crate) fn validate_jitter(strength: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&strength) {
        return Err(GlobeError::InvalidConfig(format!(
            "jitter must be within [0, 1] (got {})",
            strength
        )));
    }
    Ok(())
}

/// Names must be unique across the whole batch, fallbacks included
pub(crate) fn validate_unique_names(count: usize, names: &[Option<String>]) -> Result<()> {
    let mut seen = HashSet::with_capacity(count);
    for index in 0..count {
        let name = resolve_name(names, index);
        if !seen.insert(name.clone()) {
            return Err(GlobeError::InvalidConfig(format!(
                "duplicate node name '{}' at index {}",
                name, index
            )));
        }
    }
    Ok(())
}

pub(crate) fn resolve_name(names: &[Option<String>], index: usize) -> String {
    match names.get(index) {
        Some(Some(name)) => name.clone(),
        _ => format!("Node{}", index),
    }
}
