//! Route store: every subnet announced in the mesh, indexed globally and
//! per owning node.
//!
//! Both indices are sorted by the ordering policy in [`policy`], which puts
//! the most specific prefixes first so that an in-order scan is a
//! longest-prefix-first scan.

pub mod policy;
pub mod table;
pub mod types;

pub use policy::{compare_routes, compare_subnets};
pub use table::RouteStore;
pub use types::{Route, RouteId};
