//! The subnet model: an address pattern plus a routing weight.

use core::net::{Ipv4Addr, Ipv6Addr};

use crate::constants::{DEFAULT_WEIGHT, IPV4_MAX_PREFIX, IPV6_MAX_PREFIX};
use crate::error::SubnetParseError;
use crate::types::{Address, MacAddr};

/// Address family of a subnet.
///
/// Declaration order is the cross-family sort order of the route store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SubnetKind {
    Mac = 0,
    Ipv4 = 1,
    Ipv6 = 2,
}

/// An IPv4 network: address plus prefix length in `0..=32`.
///
/// Host bits below the prefix are kept as given; containment masks both
/// sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Net {
    address: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Net {
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Result<Self, SubnetParseError> {
        if prefix_len > IPV4_MAX_PREFIX {
            return Err(SubnetParseError::PrefixOutOfRange {
                max: IPV4_MAX_PREFIX,
                actual: i32::from(prefix_len),
            });
        }
        Ok(Self {
            address,
            prefix_len,
        })
    }

    /// A single-host network (`/32`).
    pub const fn host(address: Ipv4Addr) -> Self {
        Self {
            address,
            prefix_len: IPV4_MAX_PREFIX,
        }
    }

    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    fn mask(&self) -> u32 {
        u32::MAX
            .checked_shl(u32::from(IPV4_MAX_PREFIX - self.prefix_len))
            .unwrap_or(0)
    }

    /// Whether the first `prefix_len` bits of `addr` equal this network's.
    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(addr) & mask == u32::from(self.address) & mask
    }
}

/// An IPv6 network: address plus prefix length in `0..=128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Net {
    address: Ipv6Addr,
    prefix_len: u8,
}

impl Ipv6Net {
    pub fn new(address: Ipv6Addr, prefix_len: u8) -> Result<Self, SubnetParseError> {
        if prefix_len > IPV6_MAX_PREFIX {
            return Err(SubnetParseError::PrefixOutOfRange {
                max: IPV6_MAX_PREFIX,
                actual: i32::from(prefix_len),
            });
        }
        Ok(Self {
            address,
            prefix_len,
        })
    }

    /// A single-host network (`/128`).
    pub const fn host(address: Ipv6Addr) -> Self {
        Self {
            address,
            prefix_len: IPV6_MAX_PREFIX,
        }
    }

    pub const fn address(&self) -> Ipv6Addr {
        self.address
    }

    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    fn mask(&self) -> u128 {
        u128::MAX
            .checked_shl(u32::from(IPV6_MAX_PREFIX - self.prefix_len))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, addr: Ipv6Addr) -> bool {
        let mask = self.mask();
        u128::from(addr) & mask == u128::from(self.address) & mask
    }
}

/// The address pattern of a subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Net {
    /// Exact hardware address; MAC subnets have no prefix.
    Mac(MacAddr),
    Ipv4(Ipv4Net),
    Ipv6(Ipv6Net),
}

impl Net {
    pub const fn kind(&self) -> SubnetKind {
        match self {
            Net::Mac(_) => SubnetKind::Mac,
            Net::Ipv4(_) => SubnetKind::Ipv4,
            Net::Ipv6(_) => SubnetKind::Ipv6,
        }
    }

    /// Whether `addr` falls inside this pattern. Families never match each other.
    #[must_use]
    pub fn contains(&self, addr: &Address) -> bool {
        match (self, addr) {
            (Net::Mac(mac), Address::Mac(other)) => mac == other,
            (Net::Ipv4(net), Address::Ipv4(other)) => net.contains(*other),
            (Net::Ipv6(net), Address::Ipv6(other)) => net.contains(*other),
            _ => false,
        }
    }
}

/// A route specification: address pattern and weight (lower is preferred).
///
/// Subnets are plain values; ownership is attached when a subnet is added
/// to a route store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    pub net: Net,
    pub weight: i32,
}

impl Subnet {
    pub const fn new(net: Net, weight: i32) -> Self {
        Self { net, weight }
    }

    pub const fn mac(address: MacAddr, weight: i32) -> Self {
        Self::new(Net::Mac(address), weight)
    }

    pub fn ipv4(address: Ipv4Addr, prefix_len: u8, weight: i32) -> Result<Self, SubnetParseError> {
        Ok(Self::new(Net::Ipv4(Ipv4Net::new(address, prefix_len)?), weight))
    }

    pub fn ipv6(address: Ipv6Addr, prefix_len: u8, weight: i32) -> Result<Self, SubnetParseError> {
        Ok(Self::new(Net::Ipv6(Ipv6Net::new(address, prefix_len)?), weight))
    }

    pub const fn kind(&self) -> SubnetKind {
        self.net.kind()
    }

    /// Prefix length for IP subnets, `None` for MAC.
    #[must_use]
    pub const fn prefix_len(&self) -> Option<u8> {
        match &self.net {
            Net::Mac(_) => None,
            Net::Ipv4(net) => Some(net.prefix_len()),
            Net::Ipv6(net) => Some(net.prefix_len()),
        }
    }

    #[must_use]
    pub fn contains(&self, addr: &Address) -> bool {
        self.net.contains(addr)
    }
}

impl From<Net> for Subnet {
    fn from(net: Net) -> Self {
        Self::new(net, DEFAULT_WEIGHT)
    }
}
