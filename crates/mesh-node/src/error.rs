//! Error types for the node.

use mesh_routing::RoutingError;

/// Errors that can occur during node operation.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("subnet of {owner}: {source}")]
    Subnet {
        owner: String,
        #[source]
        source: RoutingError,
    },
    #[error("script {name} exited with {status}")]
    Script { name: String, status: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
