//! Ordering policy shared by the global and per-owner indices.
//!
//! 1. Family: MAC < IPv4 < IPv6.
//! 2. IP families: prefix length, descending.
//! 3. Address bytes.
//! 4. Weight, ascending.
//! 5. Owner name, only when both sides have an owner.
//!
//! A probe without an owner therefore compares equal to every stored route
//! with the same subnet and weight.

use core::cmp::Ordering;

use mesh_core::{Net, NodeName, Subnet};

/// Compare two subnets on family, prefix, address and weight.
#[must_use]
pub fn compare_subnets(a: &Subnet, b: &Subnet) -> Ordering {
    let by_net = match (&a.net, &b.net) {
        (Net::Mac(x), Net::Mac(y)) => x.octets().cmp(&y.octets()),
        (Net::Ipv4(x), Net::Ipv4(y)) => y
            .prefix_len()
            .cmp(&x.prefix_len())
            .then_with(|| x.address().octets().cmp(&y.address().octets())),
        (Net::Ipv6(x), Net::Ipv6(y)) => y
            .prefix_len()
            .cmp(&x.prefix_len())
            .then_with(|| x.address().octets().cmp(&y.address().octets())),
        _ => a.kind().cmp(&b.kind()),
    };
    by_net.then_with(|| a.weight.cmp(&b.weight))
}

/// Full policy including the owner tie-break.
#[must_use]
pub fn compare_routes(
    a: &Subnet,
    a_owner: Option<&NodeName>,
    b: &Subnet,
    b_owner: Option<&NodeName>,
) -> Ordering {
    compare_subnets(a, b).then_with(|| match (a_owner, b_owner) {
        (Some(x), Some(y)) => x.cmp(y),
        _ => Ordering::Equal,
    })
}
