//! Error types for the mesh-core crate.

use core::fmt;

/// Reasons a route specification string is rejected.
///
/// Parsing never yields a partial subnet: any of these aborts the whole
/// specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubnetParseError {
    Empty,
    InvalidWeight,
    InvalidPrefix,
    PrefixOutOfRange { max: u8, actual: i32 },
    InvalidOctet,
    OctetOutOfRange(u16),
    InvalidHextet,
    MacByteOutOfRange(u16),
    /// A `/prefix` was given for a MAC address, which only matches exactly.
    UnexpectedPrefix,
    UnrecognizedForm,
}

impl fmt::Display for SubnetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetParseError::Empty => write!(f, "empty subnet specification"),
            SubnetParseError::InvalidWeight => write!(f, "invalid weight"),
            SubnetParseError::InvalidPrefix => write!(f, "invalid prefix length"),
            SubnetParseError::PrefixOutOfRange { max, actual } => {
                write!(f, "prefix length out of range: {actual} not in 0..={max}")
            }
            SubnetParseError::InvalidOctet => write!(f, "invalid IPv4 octet"),
            SubnetParseError::OctetOutOfRange(v) => write!(f, "IPv4 octet out of range: {v}"),
            SubnetParseError::InvalidHextet => write!(f, "invalid hex group"),
            SubnetParseError::MacByteOutOfRange(v) => {
                write!(f, "MAC address byte out of range: 0x{v:x}")
            }
            SubnetParseError::UnexpectedPrefix => {
                write!(f, "MAC address subnets do not take a prefix length")
            }
            SubnetParseError::UnrecognizedForm => write!(f, "unrecognized subnet specification"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SubnetParseError {}
