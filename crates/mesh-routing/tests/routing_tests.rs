//! End-to-end tests for subnet routing decisions.

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use mesh_core::{Address, NodeName, Subnet};
use mesh_routing::{AllReachable, SubnetTable};

fn name(s: &str) -> NodeName {
    NodeName::from(s)
}

fn subnet(text: &str) -> Subnet {
    text.parse().unwrap()
}

fn reachable(names: &[&str]) -> HashSet<NodeName> {
    names.iter().map(|n| name(n)).collect()
}

fn owner_v4(table: &mut SubnetTable, addr: [u8; 4], reach: &HashSet<NodeName>) -> Option<String> {
    table
        .lookup_ipv4(Ipv4Addr::from(addr), reach)
        .map(|r| r.owner().to_string())
}

#[test]
fn containment_of_slash_24() {
    let mut table = SubnetTable::new();
    table.add(name("a"), subnet("10.0.0.0/24"));
    let reach = reachable(&["a"]);

    assert_eq!(owner_v4(&mut table, [10, 0, 0, 1], &reach).as_deref(), Some("a"));
    assert_eq!(owner_v4(&mut table, [10, 0, 0, 255], &reach).as_deref(), Some("a"));
    assert_eq!(owner_v4(&mut table, [10, 0, 1, 1], &reach), None);
}

#[test]
fn unreachable_longer_prefix_loses_to_reachable_shorter() {
    let mut table = SubnetTable::new();
    table.add(name("A"), subnet("10.0.0.0/8#10"));
    table.add(name("B"), subnet("10.0.0.0/24#10"));

    let owner = owner_v4(&mut table, [10, 0, 0, 5], &reachable(&["A"]));
    assert_eq!(owner.as_deref(), Some("A"));
}

#[test]
fn reachable_longer_prefix_wins() {
    let mut table = SubnetTable::new();
    table.add(name("B"), subnet("10.0.0.0/24#10"));
    table.add(name("A"), subnet("10.0.0.0/8#10"));

    let owner = owner_v4(&mut table, [10, 0, 0, 5], &reachable(&["A", "B"]));
    assert_eq!(owner.as_deref(), Some("B"));
}

#[test]
fn reachability_overrides_specificity() {
    let mut table = SubnetTable::new();
    table.add(name("B"), subnet("10.0.0.0/24"));
    table.add(name("A"), subnet("10.0.0.0/16"));

    let owner = owner_v4(&mut table, [10, 0, 0, 9], &reachable(&["A"]));
    assert_eq!(owner.as_deref(), Some("A"));
}

#[test]
fn all_unreachable_falls_back_to_last_containing_route() {
    let mut table = SubnetTable::new();
    table.add(name("A"), subnet("10.0.0.0/8"));
    table.add(name("B"), subnet("10.0.0.0/24"));
    table.add(name("C"), subnet("10.0.0.0/16"));
    // Sorts after the /8 but does not contain the address.
    table.add(name("D"), subnet("11.0.0.0/8"));

    let owner = owner_v4(&mut table, [10, 0, 0, 9], &reachable(&[]));
    assert_eq!(owner.as_deref(), Some("A"));

    // A reachable owner still wins over the fallback.
    table.remove(&name("D"), &subnet("11.0.0.0/8"));
    let owner = owner_v4(&mut table, [10, 0, 0, 9], &reachable(&["C"]));
    assert_eq!(owner.as_deref(), Some("C"));
}

#[test]
fn equal_prefix_prefers_lower_weight_then_owner_name() {
    let mut table = SubnetTable::new();
    table.add(name("zeta"), subnet("10.0.0.0/24#5"));
    table.add(name("alpha"), subnet("10.0.0.0/24#5"));
    table.add(name("beta"), subnet("10.0.0.0/24#1"));
    let all = reachable(&["zeta", "alpha", "beta"]);

    assert_eq!(owner_v4(&mut table, [10, 0, 0, 1], &all).as_deref(), Some("beta"));

    table.remove(&name("beta"), &subnet("10.0.0.0/24#1")).unwrap();
    assert_eq!(owner_v4(&mut table, [10, 0, 0, 1], &all).as_deref(), Some("alpha"));
}

#[test]
fn cache_reflects_every_mutation() {
    let mut table = SubnetTable::new();
    let reach = reachable(&["a", "b"]);
    let addr = [10, 0, 0, 1];

    assert_eq!(owner_v4(&mut table, addr, &reach), None);

    table.add(name("a"), subnet("10.0.0.0/8"));
    assert_eq!(owner_v4(&mut table, addr, &reach).as_deref(), Some("a"));

    table.add(name("b"), subnet("10.0.0.0/16"));
    assert_eq!(owner_v4(&mut table, addr, &reach).as_deref(), Some("b"));

    table.remove(&name("b"), &subnet("10.0.0.0/16"));
    assert_eq!(owner_v4(&mut table, addr, &reach).as_deref(), Some("a"));

    table.remove_owner(&name("a"));
    assert_eq!(owner_v4(&mut table, addr, &reach), None);
}

#[test]
fn repeated_lookup_is_stable_and_pure() {
    let mut table = SubnetTable::new();
    table.add(name("a"), subnet("10.0.0.0/8"));
    table.add(name("b"), subnet("fe80:0:0:0:0:0:0:0/10"));
    let before: Vec<String> = table.routes().map(|r| r.subnet().to_string()).collect();

    let addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 7);
    let first = table.lookup_ipv6(addr, &AllReachable).map(|r| r.id());
    let second = table.lookup_ipv6(addr, &AllReachable).map(|r| r.id());
    assert!(first.is_some());
    assert_eq!(first, second);

    let after: Vec<String> = table.routes().map(|r| r.subnet().to_string()).collect();
    assert_eq!(before, after);
}

#[test]
fn three_addresses_cycle_through_two_slots() {
    let mut table = SubnetTable::new();
    table.add(name("a"), subnet("10.0.0.0/8"));

    for last in [1, 2, 3] {
        table.lookup_ipv4(Ipv4Addr::new(10, 0, 0, last), &AllReachable);
    }
    assert_eq!(table.cache().ipv4.len(), 2);
    assert_eq!(
        table.cache().ipv4.probe(&Ipv4Addr::new(10, 0, 0, 1)),
        mesh_routing::cache::CacheProbe::Miss
    );
}

#[test]
fn local_and_global_views_agree() {
    let mut table = SubnetTable::new();
    for (owner, text) in [
        ("a", "10.0.0.0/8"),
        ("a", "2:0:0:0:0:1"),
        ("b", "10.0.0.0/8"),
        ("b", "fe80:0:0:0:0:0:0:0/64"),
        ("c", "192.168.0.1"),
    ] {
        table.add(name(owner), subnet(text));
    }
    table.remove(&name("a"), &subnet("10.0.0.0/8"));

    assert!(table.store().indices_consistent());
    for owner in ["a", "b", "c"] {
        let local: Vec<_> = table.routes_of(&name(owner)).map(|r| r.id()).collect();
        let global: Vec<_> = table
            .routes()
            .filter(|r| r.owner().as_str() == owner)
            .map(|r| r.id())
            .collect();
        assert_eq!(local, global, "views disagree for {owner}");
    }
}

#[test]
fn mac_lookup_is_exact() {
    let mut table = SubnetTable::new();
    table.add(name("a"), subnet("2:0:0:0:0:1#10"));
    let hit: Address = "2:0:0:0:0:1".parse().unwrap();
    let miss: Address = "2:0:0:0:0:10".parse().unwrap();

    assert_eq!(
        table.lookup(&hit, &AllReachable).unwrap().owner(),
        &name("a")
    );
    assert!(table.lookup(&miss, &AllReachable).is_none());
}

#[test]
fn lookup_local_ignores_other_owners() {
    let mut table = SubnetTable::new();
    table.add(name("a"), subnet("10.0.0.0/8"));
    table.add(name("b"), subnet("10.0.0.0/8"));

    let found = table.lookup_local(&name("b"), &subnet("10.0.0.0/8")).unwrap();
    assert_eq!(found.owner(), &name("b"));
    assert!(table.lookup_local(&name("c"), &subnet("10.0.0.0/8")).is_none());
}
