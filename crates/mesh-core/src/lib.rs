//! Core value types and the route specification codec for the mesh VPN.
//!
//! This crate defines the subnet model (MAC, IPv4 and IPv6 patterns with a
//! weight), node identities, and the compact text form used on the wire and
//! in configuration files (`10.0.0.0/8#10`, `fe80:0:0:0:0:0:0:0/64`,
//! `0:1a:2b:3c:4d:5e#5`).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod codec;
pub mod constants;
pub mod error;
pub mod subnet;
pub mod types;

pub use constants::DEFAULT_WEIGHT;
pub use error::SubnetParseError;
pub use subnet::{Ipv4Net, Ipv6Net, Net, Subnet, SubnetKind};
pub use types::{Address, InvalidLength, MacAddr, NodeName};
