//! Text form of route specifications.
//!
//! Accepted forms, tried in this order (the weight suffix is optional and
//! defaults to [`DEFAULT_WEIGHT`]):
//!
//! 1. `a.b.c.d/prefix#weight`
//! 2. `h:h:h:h:h:h:h:h/prefix#weight`
//! 3. `a.b.c.d#weight` (prefix 32)
//! 4. `h:h:h:h:h:h:h:h#weight` (prefix 128)
//! 5. `h:h:h:h:h:h#weight` (MAC address)
//!
//! The rendered form always carries the explicit prefix and weight, and is
//! byte-stable: it is what gets written to host files and exchanged between
//! nodes.

use core::fmt;
use core::net::{Ipv4Addr, Ipv6Addr};
use core::str::FromStr;

use crate::constants::{
    DEFAULT_WEIGHT, IPV4_MAX_PREFIX, IPV4_OCTETS, IPV6_HEXTETS, IPV6_MAX_PREFIX, MAC_LENGTH,
};
use crate::error::SubnetParseError;
use crate::subnet::{Ipv4Net, Ipv6Net, Net, Subnet};
use crate::types::MacAddr;

impl FromStr for Subnet {
    type Err = SubnetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SubnetParseError::Empty);
        }

        let (body, weight) = match s.split_once('#') {
            Some((body, weight)) => (body, parse_weight(weight)?),
            None => (s, DEFAULT_WEIGHT),
        };
        let (address, prefix) = match body.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (body, None),
        };

        let net = if address.contains('.') {
            let address = parse_ipv4(address)?;
            let prefix_len = match prefix {
                Some(p) => parse_prefix(p, IPV4_MAX_PREFIX)?,
                None => IPV4_MAX_PREFIX,
            };
            Net::Ipv4(Ipv4Net::new(address, prefix_len)?)
        } else {
            match address.split(':').count() {
                IPV6_HEXTETS => {
                    let address = parse_ipv6(address)?;
                    let prefix_len = match prefix {
                        Some(p) => parse_prefix(p, IPV6_MAX_PREFIX)?,
                        None => IPV6_MAX_PREFIX,
                    };
                    Net::Ipv6(Ipv6Net::new(address, prefix_len)?)
                }
                MAC_LENGTH => {
                    if prefix.is_some() {
                        return Err(SubnetParseError::UnexpectedPrefix);
                    }
                    Net::Mac(address.parse()?)
                }
                _ => return Err(SubnetParseError::UnrecognizedForm),
            }
        };

        Ok(Subnet { net, weight })
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.net {
            Net::Mac(mac) => write!(f, "{mac}#{}", self.weight),
            Net::Ipv4(net) => write!(
                f,
                "{}/{}#{}",
                net.address(),
                net.prefix_len(),
                self.weight
            ),
            Net::Ipv6(net) => {
                let [a, b, c, d, e, g, h, i] = net.address().segments();
                write!(
                    f,
                    "{a:x}:{b:x}:{c:x}:{d:x}:{e:x}:{g:x}:{h:x}:{i:x}/{}#{}",
                    net.prefix_len(),
                    self.weight
                )
            }
        }
    }
}

impl FromStr for MacAddr {
    type Err = SubnetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; MAC_LENGTH];
        let mut groups = s.split(':');
        for byte in &mut bytes {
            let group = groups.next().ok_or(SubnetParseError::UnrecognizedForm)?;
            let value = parse_hextet(group)?;
            *byte = u8::try_from(value).map_err(|_| SubnetParseError::MacByteOutOfRange(value))?;
        }
        if groups.next().is_some() {
            return Err(SubnetParseError::UnrecognizedForm);
        }
        Ok(MacAddr(bytes))
    }
}

fn parse_weight(s: &str) -> Result<i32, SubnetParseError> {
    s.parse().map_err(|_| SubnetParseError::InvalidWeight)
}

fn parse_prefix(s: &str, max: u8) -> Result<u8, SubnetParseError> {
    let actual: i32 = s.parse().map_err(|_| SubnetParseError::InvalidPrefix)?;
    u8::try_from(actual)
        .ok()
        .filter(|p| *p <= max)
        .ok_or(SubnetParseError::PrefixOutOfRange { max, actual })
}

fn parse_ipv4(s: &str) -> Result<Ipv4Addr, SubnetParseError> {
    let mut octets = [0u8; IPV4_OCTETS];
    let mut parts = s.split('.');
    for octet in &mut octets {
        let part = parts.next().ok_or(SubnetParseError::UnrecognizedForm)?;
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SubnetParseError::InvalidOctet);
        }
        let value: u16 = part.parse().map_err(|_| SubnetParseError::InvalidOctet)?;
        *octet = u8::try_from(value).map_err(|_| SubnetParseError::OctetOutOfRange(value))?;
    }
    if parts.next().is_some() {
        return Err(SubnetParseError::UnrecognizedForm);
    }
    Ok(Ipv4Addr::from(octets))
}

/// Hextets are given in host order; `Ipv6Addr` keeps them in network order.
fn parse_ipv6(s: &str) -> Result<Ipv6Addr, SubnetParseError> {
    let mut segments = [0u16; IPV6_HEXTETS];
    let mut parts = s.split(':');
    for segment in &mut segments {
        let part = parts.next().ok_or(SubnetParseError::UnrecognizedForm)?;
        *segment = parse_hextet(part)?;
    }
    if parts.next().is_some() {
        return Err(SubnetParseError::UnrecognizedForm);
    }
    Ok(Ipv6Addr::from(segments))
}

fn parse_hextet(s: &str) -> Result<u16, SubnetParseError> {
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SubnetParseError::InvalidHextet);
    }
    u16::from_str_radix(s, 16).map_err(|_| SubnetParseError::InvalidHextet)
}
