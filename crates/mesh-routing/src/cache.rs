//! Two-slot lookup cache in front of the IPv4 and IPv6 scans.
//!
//! Each family keeps the results of its last two distinct lookups, including
//! "no route" results. Slots are replaced alternately rather than by
//! recency: a third address always evicts the older of the two. Any change
//! to the route store flushes both families.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::store::RouteId;

/// Number of cached lookups per address family.
pub const CACHE_SLOTS: usize = 2;

/// Result of probing the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheProbe {
    /// A previous lookup of this address resolved to this route, or to none.
    Hit(Option<RouteId>),
    Miss,
}

#[derive(Debug, Clone, Copy)]
struct Slot<A> {
    address: A,
    route: Option<RouteId>,
    valid: bool,
}

/// Fixed two-entry cache for one address family.
#[derive(Debug, Clone)]
pub struct SlotCache<A> {
    slots: [Slot<A>; CACHE_SLOTS],
    last: usize,
}

impl<A: Copy + Eq> SlotCache<A> {
    /// Create a cache with every slot invalid. `placeholder` is never returned.
    pub fn new(placeholder: A) -> Self {
        let empty = Slot {
            address: placeholder,
            route: None,
            valid: false,
        };
        Self {
            slots: [empty; CACHE_SLOTS],
            last: 0,
        }
    }

    pub fn probe(&self, address: &A) -> CacheProbe {
        self.slots
            .iter()
            .find(|slot| slot.valid && slot.address == *address)
            .map_or(CacheProbe::Miss, |slot| CacheProbe::Hit(slot.route))
    }

    /// Record a lookup result in the slot after the one written last.
    pub fn store(&mut self, address: A, route: Option<RouteId>) {
        self.last = (self.last + 1) % CACHE_SLOTS;
        self.slots[self.last] = Slot {
            address,
            route,
            valid: true,
        };
    }

    /// Invalidate every slot.
    pub fn flush(&mut self) {
        for slot in &mut self.slots {
            slot.valid = false;
        }
    }

    /// Number of valid slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.valid).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lookup caches for both IP families.
#[derive(Debug, Clone)]
pub struct LookupCache {
    pub ipv4: SlotCache<Ipv4Addr>,
    pub ipv6: SlotCache<Ipv6Addr>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self {
            ipv4: SlotCache::new(Ipv4Addr::UNSPECIFIED),
            ipv6: SlotCache::new(Ipv6Addr::UNSPECIFIED),
        }
    }

    /// Invalidate both families.
    pub fn flush(&mut self) {
        self.ipv4.flush();
        self.ipv6.flush();
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new()
    }
}
