//! Subnet constants.

/// Weight assigned when a route specification omits `#weight`.
pub const DEFAULT_WEIGHT: i32 = 10;

/// Longest IPv4 prefix, also the implicit prefix of a bare IPv4 address.
pub const IPV4_MAX_PREFIX: u8 = 32;

/// Longest IPv6 prefix, also the implicit prefix of a bare IPv6 address.
pub const IPV6_MAX_PREFIX: u8 = 128;

pub const MAC_LENGTH: usize = 6;
pub const IPV4_OCTETS: usize = 4;
pub const IPV6_HEXTETS: usize = 8;

/// Upper bound on the length of a rendered route specification.
///
/// Eight four-digit hextets, seven colons, `/128` and an `i32` weight.
pub const MAX_SUBNET_TEXT: usize = 39 + 4 + 12;
