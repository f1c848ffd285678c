//! Fixed-width IP address buffer.
//!
//! Provides [`Address`], holding either 4 (IPv4) or 16 (IPv6) bytes in network
//! byte order, along with masking and ripple-carry stepping by prefix length.

use crate::error::{NetError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Number of bytes in an IPv4 address.
pub const IPV4_LEN: usize = 4;
/// Number of bytes in an IPv6 address.
pub const IPV6_LEN: usize = 16;

/// Byte masks keeping the `n` most significant bits, indexed by `n`.
const KEEP_HIGH_BITS: [u8; 9] = [0x00, 0x80, 0xC0, 0xE0, 0xF0, 0xF8, 0xFC, 0xFE, 0xFF];

/// Address family, derived from the byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    fn from_len(len: usize) -> Option<Family> {
        match len {
            IPV4_LEN => Some(Family::V4),
            IPV6_LEN => Some(Family::V6),
            _ => None,
        }
    }

    /// Number of bytes used by addresses of this family.
    pub const fn byte_len(self) -> usize {
        match self {
            Family::V4 => IPV4_LEN,
            Family::V6 => IPV6_LEN,
        }
    }

    /// Longest valid prefix length for this family.
    pub const fn max_cidr(self) -> u8 {
        (self.byte_len() * 8) as u8
    }
}

/// An IPv4 or IPv6 address, or the invalid sentinel.
///
/// The derived ordering compares the length tag first, so every IPv4 address
/// sorts before every IPv6 address. Bytes past the length tag are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address {
    len: u8,
    bytes: [u8; IPV6_LEN],
}

impl Address {
    /// The invalid sentinel.
    pub fn invalid() -> Address {
        Address::default()
    }

    /// Build an address from 4 or 16 bytes, returning the invalid sentinel for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Address {
        Address::try_from_bytes(bytes).unwrap_or_default()
    }

    /// Build an address from 4 or 16 bytes.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Address> {
        if Family::from_len(bytes.len()).is_none() {
            return Err(NetError::InvalidAddress(format!(
                "expected 4 or 16 bytes, got {}",
                bytes.len()
            )));
        }
        let mut address = Address {
            len: bytes.len() as u8,
            bytes: [0; IPV6_LEN],
        };
        address.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(address)
    }

    /// The address bytes, empty for the invalid sentinel.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Owned copy of the address bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Byte at `index`, reading zero past the end of the address.
    pub fn byte_at(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0)
    }

    pub fn is_valid(&self) -> bool {
        Family::from_len(self.len as usize).is_some()
    }

    pub fn family(&self) -> Option<Family> {
        Family::from_len(self.len as usize)
    }

    pub fn is_ipv4(&self) -> bool {
        self.family() == Some(Family::V4)
    }

    pub fn is_ipv6(&self) -> bool {
        self.family() == Some(Family::V6)
    }

    /// Number of bytes, 0 for the invalid sentinel.
    pub fn byte_len(&self) -> usize {
        self.len as usize
    }

    /// Number of bits, 0 for the invalid sentinel.
    pub fn max_cidr(&self) -> u8 {
        self.len * 8
    }

    pub(crate) fn invalidate(&mut self) {
        *self = Address::invalid();
    }

    /// Compare two addresses, `None` if either one is invalid.
    pub fn compare(&self, other: &Address) -> Option<Ordering> {
        if !self.is_valid() || !other.is_valid() {
            return None;
        }
        Some(self.cmp(other))
    }

    /// Zero every bit past `cidr`.
    pub fn apply_subnet_mask(&mut self, cidr: u8) -> &mut Self {
        let max = self.max_cidr();
        if cidr >= max {
            return self;
        }
        let mut host_bits = (max - cidr) as usize;
        for byte in self.bytes[..self.len as usize].iter_mut().rev() {
            if host_bits == 0 {
                break;
            }
            let cleared = host_bits.min(8);
            *byte &= KEEP_HIGH_BITS[8 - cleared];
            host_bits -= cleared;
        }
        self
    }

    /// Set every bit past `cidr` to one.
    pub fn fill_host_bits(&mut self, cidr: u8) -> &mut Self {
        let max = self.max_cidr();
        if cidr >= max {
            return self;
        }
        let mut host_bits = (max - cidr) as usize;
        for byte in self.bytes[..self.len as usize].iter_mut().rev() {
            if host_bits == 0 {
                break;
            }
            let filled = host_bits.min(8);
            *byte |= !KEEP_HIGH_BITS[8 - filled];
            host_bits -= filled;
        }
        self
    }

    /// Copy of this address masked to `cidr`.
    pub fn masked(&self, cidr: u8) -> Address {
        let mut address = *self;
        address.apply_subnet_mask(cidr);
        address
    }

    /// True if masking to `cidr` would leave this address unchanged.
    pub fn is_base_address(&self, cidr: u8) -> bool {
        if !self.is_valid() || cidr > self.max_cidr() {
            return false;
        }
        cidr == self.max_cidr() || self.masked(cidr) == *self
    }

    /// Add one step of size `2^(bits - cidr)`, carrying into more significant bytes.
    pub fn increase(&mut self, cidr: u8) -> Result<()> {
        self.offset(cidr, true)
    }

    /// Subtract one step of size `2^(bits - cidr)`, borrowing from more significant bytes.
    pub fn decrease(&mut self, cidr: u8) -> Result<()> {
        self.offset(cidr, false)
    }

    /// Step to the following address.
    pub fn next(&mut self) -> Result<()> {
        self.increase(self.max_cidr())
    }

    /// Step to the preceding address.
    pub fn previous(&mut self) -> Result<()> {
        self.decrease(self.max_cidr())
    }

    fn offset(&mut self, cidr: u8, forwards: bool) -> Result<()> {
        if !self.is_valid() {
            return Err(NetError::InvalidAddress(
                "cannot offset an invalid address".to_string(),
            ));
        }
        let max = self.max_cidr();
        if cidr == 0 || cidr > max {
            return Err(NetError::InvalidCidr(format!(
                "step {cidr} outside 1..={max}"
            )));
        }

        let mut target = (cidr as usize - 1) / 8;
        let mut increment: i32 = 1 << (8 - (cidr as usize - target * 8));
        loop {
            let current = self.bytes[target] as i32;
            let value = if forwards {
                current + increment
            } else {
                current - increment
            };
            if (0..=255).contains(&value) {
                self.bytes[target] = value as u8;
                return Ok(());
            }
            if target == 0 {
                log::trace!("address space overflow stepping {self} by /{cidr}");
                self.invalidate();
                return Err(NetError::AddressSpaceOverflow);
            }
            // carry or borrow one unit into the next more significant byte
            self.bytes[target] = value.rem_euclid(256) as u8;
            target -= 1;
            increment = 1;
        }
    }

    /// Convert to a std address, `None` for the invalid sentinel.
    pub fn to_ip_addr(&self) -> Option<IpAddr> {
        match self.family()? {
            Family::V4 => {
                let octets: [u8; IPV4_LEN] = self.bytes[..IPV4_LEN].try_into().ok()?;
                Some(IpAddr::V4(Ipv4Addr::from(octets)))
            }
            Family::V6 => Some(IpAddr::V6(Ipv6Addr::from(self.bytes))),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Address {
        Address::from_bytes(&addr.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Address {
        Address::from_bytes(&addr.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Address {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_ip_addr() {
            Some(addr) => write!(f, "{addr}"),
            None => Ok(()),
        }
    }
}

impl FromStr for Address {
    type Err = NetError;

    /// Parse an address, ignoring any `/cidr` suffix.
    fn from_str(s: &str) -> Result<Address> {
        let parsed = crate::parse::try_parse(s)?;
        Address::try_from_bytes(&parsed.bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(|e| de::Error::custom(format!("{e}: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address::from_bytes(&[a, b, c, d])
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(v4(10, 0, 0, 1).is_valid());
        assert!(Address::from_bytes(&[0; 16]).is_valid());
        assert!(!Address::from_bytes(&[1, 2, 3]).is_valid());
        assert!(!Address::from_bytes(&[]).is_valid());
        assert!(matches!(
            Address::try_from_bytes(&[1, 2, 3, 4, 5]),
            Err(NetError::InvalidAddress(_))
        ));
        assert_eq!(v4(10, 1, 2, 3).to_bytes(), vec![10, 1, 2, 3]);
        assert!(Address::invalid().as_bytes().is_empty());
    }

    #[test]
    fn test_increase_decrease() {
        let mut ip = v4(192, 168, 0, 0);
        ip.increase(32).unwrap();
        assert_eq!(ip, v4(192, 168, 0, 1));

        let mut ip = v4(192, 168, 0, 0);
        ip.decrease(32).unwrap();
        assert_eq!(ip, v4(192, 167, 255, 255));

        let mut ip = v4(192, 168, 255, 0);
        ip.increase(24).unwrap();
        assert_eq!(ip, v4(192, 169, 0, 0), "carry should ripple one byte up");

        let mut ip = v4(10, 0, 0, 0);
        ip.increase(9).unwrap();
        assert_eq!(ip, v4(10, 128, 0, 0));
    }

    #[test]
    fn test_overflow_invalidates() {
        let mut ip = v4(255, 255, 255, 255);
        assert_eq!(ip.increase(32), Err(NetError::AddressSpaceOverflow));
        assert!(!ip.is_valid());
        assert!(ip.as_bytes().is_empty());

        let mut ip = v4(0, 0, 0, 0);
        assert_eq!(ip.decrease(32), Err(NetError::AddressSpaceOverflow));
        assert!(!ip.is_valid());

        // stays invalid
        assert!(matches!(ip.increase(32), Err(NetError::InvalidAddress(_))));
        assert!(!ip.is_valid());
    }

    #[test]
    fn test_invalid_step_does_not_mutate() {
        let mut ip = v4(10, 0, 0, 1);
        assert!(matches!(ip.increase(0), Err(NetError::InvalidCidr(_))));
        assert!(matches!(ip.increase(33), Err(NetError::InvalidCidr(_))));
        assert_eq!(ip, v4(10, 0, 0, 1));
    }

    #[test]
    fn test_ipv6_carry() {
        let mut bytes = [0xffu8; 16];
        bytes[0] = 0x20;
        let mut ip = Address::from_bytes(&bytes);
        ip.next().unwrap();
        let mut expected = [0u8; 16];
        expected[0] = 0x21;
        assert_eq!(ip, Address::from_bytes(&expected));
        ip.previous().unwrap();
        assert_eq!(ip, Address::from_bytes(&bytes));
    }

    #[test]
    fn test_apply_subnet_mask() {
        let ip = v4(192, 168, 1, 42);
        assert_eq!(ip.masked(24), v4(192, 168, 1, 0));
        assert_eq!(ip.masked(16), v4(192, 168, 0, 0));
        assert_eq!(ip.masked(8), v4(192, 0, 0, 0));
        assert_eq!(ip.masked(0), v4(0, 0, 0, 0));
        assert_eq!(ip.masked(32), ip);
        assert_eq!(ip.masked(33), ip);
        assert_eq!(v4(10, 255, 255, 255).masked(11), v4(10, 224, 0, 0));
    }

    #[test]
    fn test_fill_host_bits() {
        let mut ip = v4(192, 168, 0, 0);
        ip.fill_host_bits(24);
        assert_eq!(ip, v4(192, 168, 0, 255));
        let mut ip = v4(10, 0, 0, 0);
        ip.fill_host_bits(11);
        assert_eq!(ip, v4(10, 31, 255, 255));
    }

    #[test]
    fn test_is_base_address() {
        assert!(v4(192, 168, 0, 0).is_base_address(24));
        assert!(v4(192, 168, 0, 0).is_base_address(16));
        assert!(!v4(192, 168, 0, 1).is_base_address(24));
        assert!(v4(192, 168, 0, 1).is_base_address(32));
        assert!(!v4(192, 168, 0, 0).is_base_address(33));
        assert!(v4(0, 0, 0, 0).is_base_address(0));
        assert!(!Address::invalid().is_base_address(0));
    }

    #[test]
    fn test_compare_families() {
        let v4_max = v4(255, 255, 255, 255);
        let v6_zero = Address::from_bytes(&[0; 16]);
        assert_eq!(v4_max.compare(&v6_zero), Some(Ordering::Less));
        assert_eq!(v6_zero.compare(&v4_max), Some(Ordering::Greater));
        assert_eq!(
            v4(10, 0, 0, 1).compare(&v4(10, 0, 0, 2)),
            Some(Ordering::Less)
        );
        assert_eq!(v4(10, 0, 0, 1).compare(&v4(10, 0, 0, 1)), Some(Ordering::Equal));
        assert_eq!(v4(10, 0, 0, 1).compare(&Address::invalid()), None);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(v4(192, 168, 0, 1).to_string(), "192.168.0.1");
        assert_eq!(Address::invalid().to_string(), "");
        let ip: Address = "ffff:fc00::1:1234".parse().unwrap();
        assert_eq!(ip.to_string(), "ffff:fc00::1:1234");
        assert!(ip.is_ipv6());
        let ip: Address = "10.0.0.7/24".parse().unwrap();
        assert_eq!(ip, v4(10, 0, 0, 7));
        assert!("foobar".parse::<Address>().is_err());
    }

    #[test]
    fn test_serde_string_form() {
        let ip = v4(10, 1, 2, 3);
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"10.1.2.3\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
        assert!(serde_json::from_str::<Address>("\"10.1.2\"").is_err());
    }
}
