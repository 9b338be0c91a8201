//! Route store types.

use core::cmp::Ordering;

use mesh_core::{NodeName, Subnet};

use super::policy::compare_routes;

/// Stable handle of a stored route. Never reused within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub u64);

/// A subnet together with the node that announced it.
///
/// Routes are immutable once stored. Changing a route means removing it and
/// adding the new subnet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    id: RouteId,
    subnet: Subnet,
    owner: NodeName,
}

impl Route {
    pub(crate) fn new(id: RouteId, subnet: Subnet, owner: NodeName) -> Self {
        Self { id, subnet, owner }
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn subnet(&self) -> &Subnet {
        &self.subnet
    }

    pub fn owner(&self) -> &NodeName {
        &self.owner
    }

    pub(crate) fn key(&self) -> RouteKey {
        RouteKey {
            subnet: self.subnet,
            owner: self.owner.clone(),
            id: self.id,
        }
    }
}

/// Index key: the ordering fields of a route plus its handle.
///
/// The handle is the last tie-break, which turns the ordered set into a
/// multiset: routes equal under the policy coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteKey {
    pub(crate) subnet: Subnet,
    pub(crate) owner: NodeName,
    pub(crate) id: RouteId,
}

impl RouteKey {
    /// Smallest key that compares `>=` every stored key with `subnet`.
    ///
    /// Stored handles start at 1 and the empty name sorts first.
    pub(crate) fn floor(subnet: Subnet, floor_owner: &NodeName) -> Self {
        Self {
            subnet,
            owner: floor_owner.clone(),
            id: RouteId(0),
        }
    }
}

impl Ord for RouteKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_routes(
            &self.subnet,
            Some(&self.owner),
            &other.subnet,
            Some(&other.owner),
        )
        .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for RouteKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
