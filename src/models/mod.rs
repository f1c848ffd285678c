//! Core value types.
//!
//! - [`Address`] - fixed-width IPv4/IPv6 address with masking and stepping
//! - [`Network`] - address plus prefix length with containment tests

mod address;
mod network;

// Re-export public types
pub use address::{Address, Family, IPV4_LEN, IPV6_LEN};
pub use network::Network;
