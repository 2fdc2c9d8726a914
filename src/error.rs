//! Error types for globe network generation and queries

/// Errors that can occur while building or querying a globe network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GlobeError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A node handle or name does not refer to a node of the current graph
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for globe network operations
pub type Result<T> = std::result::Result<T, GlobeError>;
