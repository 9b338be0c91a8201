//! Mesh VPN node: the daemon-side half of subnet routing.
//!
//! This crate loads the node configuration, keeps the node registry that
//! answers reachability queries, runs `subnet-up`/`subnet-down` scripts and
//! renders the administrative subnet dump. Routing decisions themselves live
//! in `mesh-routing`.

pub mod config;
pub mod dump;
pub mod error;
pub mod logging;
pub mod node;
pub mod registry;
pub mod script;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::Node;
pub use registry::NodeRegistry;
