//! Error types for address and network operations.

use thiserror::Error;

/// Failure kinds reported by the strict APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("address space overflow detected")]
    AddressSpaceOverflow,

    #[error("mixing IPv4 and IPv6 is invalid")]
    MixedFamily,

    #[error("not a valid base network address: {0}")]
    NotABaseAddress(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NetError>;
