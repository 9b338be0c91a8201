//! Routing layer error types.

use mesh_core::SubnetParseError;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("invalid subnet '{text}': {source}")]
    InvalidSubnet {
        text: String,
        #[source]
        source: SubnetParseError,
    },
}

impl RoutingError {
    pub(crate) fn invalid_subnet(text: &str, source: SubnetParseError) -> Self {
        RoutingError::InvalidSubnet {
            text: text.to_string(),
            source,
        }
    }
}
