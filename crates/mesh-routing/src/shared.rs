//! Thread-safe handle to a [`SubnetTable`].
//!
//! A single mutex covers both the store and the cache. A lookup holds the
//! lock from cache probe through scan to cache fill, and a mutation holds it
//! from store change through cache flush, so a lookup can never repopulate
//! the cache with a result computed before a concurrent mutation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mesh_core::{Address, NodeName, Subnet};

use crate::error::RoutingError;
use crate::matching::Reachability;
use crate::store::{Route, RouteId};
use crate::table::SubnetTable;

#[derive(Clone, Default)]
pub struct SharedSubnetTable {
    inner: Arc<Mutex<SubnetTable>>,
}

impl SharedSubnetTable {
    pub fn new(table: SubnetTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    /// Lock the table. Every critical section leaves the table consistent,
    /// so a poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, SubnetTable> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, owner: NodeName, subnet: Subnet) -> RouteId {
        self.lock().add(owner, subnet)
    }

    pub fn add_spec(&self, owner: NodeName, text: &str) -> Result<RouteId, RoutingError> {
        self.lock().add_spec(owner, text)
    }

    pub fn remove(&self, owner: &NodeName, subnet: &Subnet) -> Option<Route> {
        self.lock().remove(owner, subnet)
    }

    pub fn remove_owner(&self, owner: &NodeName) -> Vec<Route> {
        self.lock().remove_owner(owner)
    }

    /// Look up `address` and return a copy of the matching route.
    pub fn lookup<R>(&self, address: &Address, reach: &R) -> Option<Route>
    where
        R: Reachability + ?Sized,
    {
        self.lock().lookup(address, reach).cloned()
    }

    /// Copy of every route in policy order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Route> {
        self.lock().routes().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::AllReachable;
    use std::net::Ipv4Addr;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let shared = SharedSubnetTable::default();
        let other = shared.clone();
        other.add_spec(NodeName::from("a"), "10.0.0.0/8").unwrap();
        assert_eq!(shared.len(), 1);
        assert!(!shared.is_empty());
    }

    #[test]
    fn test_concurrent_lookups_observe_mutations() {
        let shared = SharedSubnetTable::default();
        let addr = Address::Ipv4(Ipv4Addr::new(10, 0, 0, 1));
        let node = NodeName::from("a");
        let subnet: Subnet = "10.0.0.0/8".parse().unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let _ = shared.lookup(&addr, &AllReachable);
                    }
                })
            })
            .collect();

        for _ in 0..200 {
            shared.add(node.clone(), subnet);
            shared.remove(&node, &subnet);
        }
        for reader in readers {
            reader.join().unwrap();
        }

        // Nothing is stored, and no stale positive result survives.
        assert!(shared.lookup(&addr, &AllReachable).is_none());
        shared.add(node.clone(), subnet);
        assert_eq!(
            shared.lookup(&addr, &AllReachable).unwrap().owner(),
            &node
        );
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn test_remove_owner() {
        let shared = SharedSubnetTable::default();
        let node = NodeName::from("a");
        shared.add_spec(node.clone(), "10.0.0.0/8").unwrap();
        shared.add_spec(node.clone(), "10.1.0.0/16").unwrap();
        assert_eq!(shared.remove_owner(&node).len(), 2);
        assert!(shared.is_empty());
    }
}
