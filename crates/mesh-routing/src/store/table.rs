//! Dual-indexed route store.

use std::collections::{BTreeSet, HashMap};
use std::net::{Ipv4Addr, Ipv6Addr};

use mesh_core::{Ipv4Net, Ipv6Net, MacAddr, Net, NodeName, Subnet, SubnetKind};

use super::policy::compare_subnets;
use super::types::{Route, RouteId, RouteKey};

/// All routes, owned by an arena and indexed twice.
///
/// Every route appears in the global index and in exactly one per-owner
/// index. Both are updated together by [`insert`](Self::insert) and the
/// removal methods, so no route is ever visible in only one of them.
#[must_use]
pub struct RouteStore {
    routes: HashMap<RouteId, Route>,
    global: BTreeSet<RouteKey>,
    local: HashMap<NodeName, BTreeSet<RouteKey>>,
    next_id: u64,
    floor_owner: NodeName,
}

impl RouteStore {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            global: BTreeSet::new(),
            local: HashMap::new(),
            next_id: 1,
            floor_owner: NodeName::new(""),
        }
    }

    /// Store `subnet` as owned by `owner`.
    ///
    /// Duplicates under the ordering policy are kept side by side.
    pub fn insert(&mut self, owner: NodeName, subnet: Subnet) -> RouteId {
        let id = RouteId(self.next_id);
        self.next_id += 1;

        let route = Route::new(id, subnet, owner);
        self.global.insert(route.key());
        self.local
            .entry(route.owner().clone())
            .or_default()
            .insert(route.key());
        self.routes.insert(id, route);
        id
    }

    /// Remove one route of `owner` equal to `subnet`. Absent routes are a no-op.
    pub fn remove(&mut self, owner: &NodeName, subnet: &Subnet) -> Option<Route> {
        let id = self.lookup_local(owner, subnet)?.id();
        self.remove_id(id)
    }

    /// Remove a route by handle from both indices.
    pub fn remove_id(&mut self, id: RouteId) -> Option<Route> {
        let route = self.routes.remove(&id)?;
        let key = route.key();
        self.global.remove(&key);
        if let Some(local) = self.local.get_mut(route.owner()) {
            local.remove(&key);
            if local.is_empty() {
                self.local.remove(route.owner());
            }
        }
        Some(route)
    }

    /// Remove every route of `owner`, returned in local-index order.
    pub fn remove_owner(&mut self, owner: &NodeName) -> Vec<Route> {
        let Some(local) = self.local.remove(owner) else {
            return Vec::new();
        };
        local
            .into_iter()
            .filter_map(|key| {
                self.global.remove(&key);
                self.routes.remove(&key.id)
            })
            .collect()
    }

    /// Drop every route.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.global.clear();
        self.local.clear();
    }

    #[must_use]
    pub fn get(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(&id)
    }

    /// Exact lookup of `probe` among `owner`'s routes.
    ///
    /// Matches on family, address, prefix and weight; there are no prefix
    /// semantics here.
    #[must_use]
    pub fn lookup_local(&self, owner: &NodeName, probe: &Subnet) -> Option<&Route> {
        let local = self.local.get(owner)?;
        let key = local
            .range(RouteKey::floor(*probe, &self.floor_owner)..)
            .next()
            .filter(|key| compare_subnets(&key.subnet, probe).is_eq())?;
        self.routes.get(&key.id)
    }

    /// First route, in policy order, whose MAC address equals `address`.
    #[must_use]
    pub fn find_mac(&self, address: MacAddr) -> Option<&Route> {
        let floor = RouteKey::floor(Subnet::mac(address, i32::MIN), &self.floor_owner);
        let key = self
            .global
            .range(floor..)
            .next()
            .filter(|key| key.subnet.net == Net::Mac(address))?;
        self.routes.get(&key.id)
    }

    /// Routes of one family in policy order, most specific first.
    pub fn family(&self, kind: SubnetKind) -> impl Iterator<Item = &Route> {
        let floor = match kind {
            SubnetKind::Mac => Subnet::mac(MacAddr::default(), i32::MIN),
            SubnetKind::Ipv4 => Subnet::new(
                Net::Ipv4(Ipv4Net::host(Ipv4Addr::UNSPECIFIED)),
                i32::MIN,
            ),
            SubnetKind::Ipv6 => Subnet::new(
                Net::Ipv6(Ipv6Net::host(Ipv6Addr::UNSPECIFIED)),
                i32::MIN,
            ),
        };
        self.global
            .range(RouteKey::floor(floor, &self.floor_owner)..)
            .take_while(move |key| key.subnet.kind() == kind)
            .filter_map(move |key| self.routes.get(&key.id))
    }

    /// Every route in policy order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.global.iter().filter_map(move |key| self.routes.get(&key.id))
    }

    /// Routes of `owner` in policy order.
    pub fn iter_owner(&self, owner: &NodeName) -> impl Iterator<Item = &Route> {
        self.local
            .get(owner)
            .into_iter()
            .flatten()
            .filter_map(move |key| self.routes.get(&key.id))
    }

    /// Names of nodes that currently own at least one route.
    pub fn owners(&self) -> impl Iterator<Item = &NodeName> {
        self.local.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[must_use]
    pub fn owner_len(&self, owner: &NodeName) -> usize {
        self.local.get(owner).map_or(0, BTreeSet::len)
    }

    /// Whether the global index and the per-owner indices hold exactly the
    /// same routes.
    #[must_use]
    pub fn indices_consistent(&self) -> bool {
        let local_total: usize = self.local.values().map(BTreeSet::len).sum();
        local_total == self.global.len()
            && self.global.len() == self.routes.len()
            && self.local.iter().all(|(owner, keys)| {
                keys.iter()
                    .all(|key| &key.owner == owner && self.global.contains(key))
            })
    }
}

impl Default for RouteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> NodeName {
        NodeName::from(s)
    }

    fn s(text: &str) -> Subnet {
        text.parse().unwrap()
    }

    fn texts<'a>(routes: impl Iterator<Item = &'a Route>) -> Vec<String> {
        routes.map(|r| r.subnet().to_string()).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RouteStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.indices_consistent());
    }

    #[test]
    fn test_insert_indexes_both_views() {
        let mut store = RouteStore::new();
        let id = store.insert(name("alpha"), s("10.0.0.0/8"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.owner_len(&name("alpha")), 1);
        assert_eq!(store.get(id).unwrap().owner(), &name("alpha"));
        assert_eq!(store.iter().count(), 1);
        assert_eq!(store.iter_owner(&name("alpha")).count(), 1);
        assert!(store.indices_consistent());
    }

    #[test]
    fn test_duplicates_coexist() {
        let mut store = RouteStore::new();
        let a = store.insert(name("alpha"), s("10.0.0.0/8"));
        let b = store.insert(name("alpha"), s("10.0.0.0/8"));
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.owner_len(&name("alpha")), 2);

        store.remove(&name("alpha"), &s("10.0.0.0/8")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.indices_consistent());
    }

    #[test]
    fn test_global_order() {
        let mut store = RouteStore::new();
        store.insert(name("b"), s("fe80:0:0:0:0:0:0:0/64"));
        store.insert(name("b"), s("10.0.0.0/8#5"));
        store.insert(name("a"), s("10.0.0.0/24"));
        store.insert(name("a"), s("2:0:0:0:0:1"));
        store.insert(name("a"), s("10.0.0.0/8#5"));
        store.insert(name("c"), s("10.0.0.0/8#1"));

        assert_eq!(
            texts(store.iter()),
            vec![
                "2:0:0:0:0:1#10",
                "10.0.0.0/24#10",
                "10.0.0.0/8#1",
                "10.0.0.0/8#5",
                "10.0.0.0/8#5",
                "fe80:0:0:0:0:0:0:0/64#10",
            ]
        );
        let owners: Vec<_> = store
            .iter()
            .filter(|r| r.subnet() == &s("10.0.0.0/8#5"))
            .map(|r| r.owner().as_str())
            .collect();
        assert_eq!(owners, vec!["a", "b"]);
    }

    #[test]
    fn test_family_iteration() {
        let mut store = RouteStore::new();
        store.insert(name("a"), s("2:0:0:0:0:1"));
        store.insert(name("a"), s("0.0.0.0/0"));
        store.insert(name("a"), s("255.255.255.255"));
        store.insert(name("a"), s("0:0:0:0:0:0:0:1"));

        assert_eq!(
            texts(store.family(SubnetKind::Ipv4)),
            vec!["255.255.255.255/32#10", "0.0.0.0/0#10"]
        );
        assert_eq!(
            texts(store.family(SubnetKind::Ipv6)),
            vec!["0:0:0:0:0:0:0:1/128#10"]
        );
        assert_eq!(texts(store.family(SubnetKind::Mac)), vec!["2:0:0:0:0:1#10"]);
    }

    #[test]
    fn test_lookup_local_is_exact() {
        let mut store = RouteStore::new();
        store.insert(name("alpha"), s("10.0.0.0/8#5"));
        store.insert(name("beta"), s("10.0.0.0/16"));

        assert!(store.lookup_local(&name("alpha"), &s("10.0.0.0/8#5")).is_some());
        // Weight is part of identity.
        assert!(store.lookup_local(&name("alpha"), &s("10.0.0.0/8")).is_none());
        // Containment does not count.
        assert!(store.lookup_local(&name("alpha"), &s("10.1.0.0/16")).is_none());
        // Other owners are not searched.
        assert!(store.lookup_local(&name("alpha"), &s("10.0.0.0/16")).is_none());
        assert!(store.lookup_local(&name("gamma"), &s("10.0.0.0/16")).is_none());
    }

    #[test]
    fn test_find_mac_prefers_lowest_weight() {
        let mut store = RouteStore::new();
        let mac: MacAddr = "2:0:0:0:0:1".parse().unwrap();
        store.insert(name("alpha"), Subnet::mac(mac, 20));
        store.insert(name("beta"), Subnet::mac(mac, 5));
        store.insert(name("gamma"), s("2:0:0:0:0:2#1"));

        let found = store.find_mac(mac).unwrap();
        assert_eq!(found.owner(), &name("beta"));
        assert!(store.find_mac("2:0:0:0:0:3".parse().unwrap()).is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = RouteStore::new();
        store.insert(name("alpha"), s("10.0.0.0/8"));
        assert!(store.remove(&name("alpha"), &s("10.0.0.0/16")).is_none());
        assert!(store.remove(&name("beta"), &s("10.0.0.0/8")).is_none());
        assert!(store.remove_id(RouteId(999)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_drops_empty_owner_index() {
        let mut store = RouteStore::new();
        store.insert(name("alpha"), s("10.0.0.0/8"));
        store.remove(&name("alpha"), &s("10.0.0.0/8")).unwrap();
        assert_eq!(store.owners().count(), 0);
        assert!(store.is_empty());
        assert!(store.indices_consistent());
    }

    #[test]
    fn test_remove_owner() {
        let mut store = RouteStore::new();
        store.insert(name("alpha"), s("10.0.0.0/8"));
        store.insert(name("alpha"), s("10.1.0.0/16"));
        store.insert(name("beta"), s("10.2.0.0/16"));

        let removed = store.remove_owner(&name("alpha"));
        assert_eq!(
            texts(removed.iter()),
            vec!["10.1.0.0/16#10", "10.0.0.0/8#10"]
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.owner_len(&name("alpha")), 0);
        assert!(store.remove_owner(&name("alpha")).is_empty());
        assert!(store.indices_consistent());
    }

    #[test]
    fn test_empty_owner_name_is_still_found() {
        let mut store = RouteStore::new();
        store.insert(name(""), s("10.0.0.0/8"));
        assert!(store.lookup_local(&name(""), &s("10.0.0.0/8")).is_some());
        assert_eq!(store.family(SubnetKind::Ipv4).count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = RouteStore::new();
        store.insert(name("alpha"), s("10.0.0.0/8"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.iter_owner(&name("alpha")).count(), 0);
    }
}
