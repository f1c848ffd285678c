//! Text to byte conversion for addresses and networks.
//!
//! Accepts `addr`, `addr/cidr` and bracketed IPv6 forms such as `[::1]` or
//! `[fe80::]/10`. Address syntax itself is delegated to [`std::net::IpAddr`].

use crate::config::Mode;
use crate::error::{NetError, Result};
use crate::models::{Address, Network};
use std::net::IpAddr;

/// Raw result of parsing: network-order bytes and a prefix length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub bytes: Vec<u8>,
    pub cidr: u8,
}

/// Parse `text`, returning `None` on any failure.
pub fn parse(text: &str) -> Option<Parsed> {
    match try_parse(text) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!("parse({text}) failed: {e}");
            None
        }
    }
}

/// Parse `text` into bytes and a prefix length; a missing prefix means a host network.
pub fn try_parse(text: &str) -> Result<Parsed> {
    let text = text.trim();
    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() > 2 {
        return Err(NetError::InvalidAddress(format!(
            "more than one '/' was detected in {text}"
        )));
    }

    let addr_text = parts[0].trim_start_matches('[').trim_end_matches(']');
    let addr: IpAddr = addr_text
        .parse()
        .map_err(|_| NetError::InvalidAddress(addr_text.to_string()))?;
    let bytes = match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    };
    let max_cidr = (bytes.len() * 8) as u8;

    let cidr = match parts.get(1) {
        Some(cidr_text) => {
            let cidr: u8 = cidr_text
                .trim()
                .parse()
                .map_err(|_| NetError::InvalidCidr(cidr_text.to_string()))?;
            if cidr > max_cidr {
                return Err(NetError::InvalidCidr(format!("{cidr} > {max_cidr}")));
            }
            cidr
        }
        None => max_cidr,
    };

    Ok(Parsed { bytes, cidr })
}

/// Parse `text` as a network aligned to its prefix.
///
/// Lenient mode masks off host bits, strict mode rejects them.
pub fn base_network(text: &str, mode: Mode) -> Result<Network> {
    let parsed = try_parse(text)?;
    let addr = Address::try_from_bytes(&parsed.bytes)?;
    Network::base(addr, parsed.cidr, mode)
}
