//! Longest-prefix matching with a reachability preference.

use std::collections::{HashMap, HashSet};

use mesh_core::{Address, NodeName};

use crate::store::Route;

/// Read-only view of the node registry used while matching.
///
/// Reachability may change at any time without notifying the route table.
/// Cached lookups can therefore lag behind reachability changes until the
/// next route mutation.
pub trait Reachability {
    fn is_reachable(&self, node: &NodeName) -> bool;
}

impl<F> Reachability for F
where
    F: Fn(&NodeName) -> bool,
{
    fn is_reachable(&self, node: &NodeName) -> bool {
        self(node)
    }
}

/// Reachability from a set of live node names.
impl Reachability for HashSet<NodeName> {
    fn is_reachable(&self, node: &NodeName) -> bool {
        self.contains(node)
    }
}

/// Reachability from a name to status map; unknown names are unreachable.
impl Reachability for HashMap<NodeName, bool> {
    fn is_reachable(&self, node: &NodeName) -> bool {
        self.get(node).copied().unwrap_or(false)
    }
}

/// Treats every node as reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllReachable;

impl Reachability for AllReachable {
    fn is_reachable(&self, _node: &NodeName) -> bool {
        true
    }
}

/// Pick the route for `address` from `candidates` in policy order.
///
/// The first containing route with a reachable owner wins and ends the
/// scan. Without one, the last containing route seen (the shortest prefix)
/// is returned even though its owner is down.
pub fn best_match<'a, I, R>(candidates: I, address: &Address, reach: &R) -> Option<&'a Route>
where
    I: IntoIterator<Item = &'a Route>,
    R: Reachability + ?Sized,
{
    let mut fallback = None;
    for route in candidates {
        if !route.subnet().contains(address) {
            continue;
        }
        if reach.is_reachable(route.owner()) {
            return Some(route);
        }
        fallback = Some(route);
    }
    fallback
}
