//! Subnet routing for the mesh VPN.
//!
//! This crate decides which node owns the route to a MAC, IPv4 or IPv6
//! destination. It holds the route store, the ordering policy, the per-family
//! lookup cache and the longest-prefix matching engine.

pub mod cache;
pub mod error;
pub mod matching;
pub mod shared;
pub mod store;
pub mod table;

pub use cache::LookupCache;
pub use error::RoutingError;
pub use matching::{AllReachable, Reachability};
pub use shared::SharedSubnetTable;
pub use store::{Route, RouteId, RouteStore};
pub use table::SubnetTable;
