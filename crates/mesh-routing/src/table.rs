//! The routing context: route store plus lookup cache.

use std::net::{Ipv4Addr, Ipv6Addr};

use mesh_core::{Address, MacAddr, NodeName, Subnet, SubnetKind};

use crate::cache::{CacheProbe, LookupCache};
use crate::error::RoutingError;
use crate::matching::{Reachability, best_match};
use crate::store::{Route, RouteId, RouteStore};

/// Owns every route known to the daemon and answers "who owns this address".
///
/// Every mutation flushes the lookup cache, so a cached result never
/// outlives the store state it was computed from. References returned by
/// lookups borrow the table and cannot be held across a mutation.
#[must_use]
#[derive(Default)]
pub struct SubnetTable {
    store: RouteStore,
    cache: LookupCache,
}

impl SubnetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `subnet` as owned by `owner`.
    pub fn add(&mut self, owner: NodeName, subnet: Subnet) -> RouteId {
        tracing::debug!(%owner, %subnet, "adding subnet");
        let id = self.store.insert(owner, subnet);
        self.cache.flush();
        id
    }

    /// Parse a route specification and add it.
    pub fn add_spec(&mut self, owner: NodeName, text: &str) -> Result<RouteId, RoutingError> {
        let subnet = text
            .parse()
            .map_err(|e| RoutingError::invalid_subnet(text, e))?;
        Ok(self.add(owner, subnet))
    }

    /// Remove one route of `owner` equal to `subnet`.
    ///
    /// Removing a route that is not stored changes nothing and returns `None`.
    pub fn remove(&mut self, owner: &NodeName, subnet: &Subnet) -> Option<Route> {
        let removed = self.store.remove(owner, subnet);
        match &removed {
            Some(_) => tracing::debug!(%owner, %subnet, "removed subnet"),
            None => tracing::trace!(%owner, %subnet, "subnet to remove not present"),
        }
        self.cache.flush();
        removed
    }

    /// Remove every route of `owner`.
    pub fn remove_owner(&mut self, owner: &NodeName) -> Vec<Route> {
        let removed = self.store.remove_owner(owner);
        tracing::debug!(%owner, count = removed.len(), "removed all subnets of node");
        self.cache.flush();
        removed
    }

    /// Drop every route and invalidate the cache.
    pub fn clear(&mut self) {
        self.store.clear();
        self.cache.flush();
    }

    #[must_use]
    pub fn get(&self, id: RouteId) -> Option<&Route> {
        self.store.get(id)
    }

    /// Exact lookup within one owner's routes.
    #[must_use]
    pub fn lookup_local(&self, owner: &NodeName, probe: &Subnet) -> Option<&Route> {
        self.store.lookup_local(owner, probe)
    }

    /// Route for a hardware address. MAC lookups are not cached.
    #[must_use]
    pub fn lookup_mac(&self, address: MacAddr) -> Option<&Route> {
        self.store.find_mac(address)
    }

    /// Route for an IPv4 destination.
    pub fn lookup_ipv4<R>(&mut self, address: Ipv4Addr, reach: &R) -> Option<&Route>
    where
        R: Reachability + ?Sized,
    {
        let id = match self.cache.ipv4.probe(&address) {
            CacheProbe::Hit(id) => {
                tracing::trace!(%address, "ipv4 subnet cache hit");
                id
            }
            CacheProbe::Miss => {
                let id = best_match(
                    self.store.family(SubnetKind::Ipv4),
                    &Address::Ipv4(address),
                    reach,
                )
                .map(Route::id);
                tracing::trace!(%address, found = id.is_some(), "ipv4 subnet cache miss");
                self.cache.ipv4.store(address, id);
                id
            }
        };
        id.and_then(|id| self.store.get(id))
    }

    /// Route for an IPv6 destination.
    pub fn lookup_ipv6<R>(&mut self, address: Ipv6Addr, reach: &R) -> Option<&Route>
    where
        R: Reachability + ?Sized,
    {
        let id = match self.cache.ipv6.probe(&address) {
            CacheProbe::Hit(id) => {
                tracing::trace!(%address, "ipv6 subnet cache hit");
                id
            }
            CacheProbe::Miss => {
                let id = best_match(
                    self.store.family(SubnetKind::Ipv6),
                    &Address::Ipv6(address),
                    reach,
                )
                .map(Route::id);
                tracing::trace!(%address, found = id.is_some(), "ipv6 subnet cache miss");
                self.cache.ipv6.store(address, id);
                id
            }
        };
        id.and_then(|id| self.store.get(id))
    }

    /// Route for any destination address.
    pub fn lookup<R>(&mut self, address: &Address, reach: &R) -> Option<&Route>
    where
        R: Reachability + ?Sized,
    {
        match address {
            Address::Mac(mac) => self.lookup_mac(*mac),
            Address::Ipv4(addr) => self.lookup_ipv4(*addr, reach),
            Address::Ipv6(addr) => self.lookup_ipv6(*addr, reach),
        }
    }

    /// Every route in policy order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.store.iter()
    }

    /// Routes of one node in policy order.
    pub fn routes_of(&self, owner: &NodeName) -> impl Iterator<Item = &Route> {
        self.store.iter_owner(owner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn owner_len(&self, owner: &NodeName) -> usize {
        self.store.owner_len(owner)
    }

    pub fn store(&self) -> &RouteStore {
        &self.store
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }
}
