//! Network (address plus prefix length) model.
//!
//! Provides [`Network`] with stepping, range-end computation and the
//! containment, intersection and adjacency tests used by the processing code.

use super::{Address, Family};
use crate::config::Mode;
use crate::error::{NetError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An address paired with a prefix length, or the invalid sentinel.
///
/// The derived ordering is `(family, address bytes, cidr)`: on equal base
/// addresses the wider network (smaller cidr) sorts first. The base address is
/// not required to be aligned to the prefix unless built through [`Network::base`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Network {
    addr: Address,
    cidr: u8,
}

impl Network {
    /// The invalid sentinel.
    pub fn invalid() -> Network {
        Network::default()
    }

    /// Pair `addr` with `cidr`, returning the invalid sentinel if either is out of range.
    pub fn new(addr: Address, cidr: u8) -> Network {
        Network::try_new(addr, cidr).unwrap_or_default()
    }

    pub fn try_new(addr: Address, cidr: u8) -> Result<Network> {
        if !addr.is_valid() {
            return Err(NetError::InvalidAddress(
                "network base address is invalid".to_string(),
            ));
        }
        if cidr > addr.max_cidr() {
            return Err(NetError::InvalidCidr(format!(
                "{cidr} > {max}",
                max = addr.max_cidr()
            )));
        }
        Ok(Network { addr, cidr })
    }

    /// Single-address network (`/32` or `/128`).
    pub fn host(addr: Address) -> Network {
        Network::new(addr, addr.max_cidr())
    }

    pub fn from_bytes(bytes: &[u8], cidr: u8) -> Network {
        Network::new(Address::from_bytes(bytes), cidr)
    }

    pub fn try_from_bytes(bytes: &[u8], cidr: u8) -> Result<Network> {
        Network::try_new(Address::try_from_bytes(bytes)?, cidr)
    }

    /// Build a network whose base is aligned to `cidr`.
    ///
    /// Lenient mode masks off host bits; strict mode rejects them.
    pub fn base(addr: Address, cidr: u8, mode: Mode) -> Result<Network> {
        let mut net = Network::try_new(addr, cidr)?;
        if !net.addr.is_base_address(cidr) {
            if mode.is_strict() {
                return Err(NetError::NotABaseAddress(net.to_string()));
            }
            net.addr.apply_subnet_mask(cidr);
        }
        Ok(net)
    }

    /// Copy of this network with host bits cleared.
    pub fn normalized(&self) -> Network {
        let mut net = *self;
        net.addr.apply_subnet_mask(net.cidr);
        net
    }

    pub fn addr(&self) -> &Address {
        &self.addr
    }

    pub fn cidr(&self) -> u8 {
        self.cidr
    }

    pub fn family(&self) -> Option<Family> {
        self.addr.family()
    }

    pub fn is_valid(&self) -> bool {
        self.addr.is_valid() && self.cidr <= self.addr.max_cidr()
    }

    /// Change the prefix length, keeping the base address as is.
    pub fn set_cidr(&mut self, cidr: u8) -> Result<()> {
        if !self.is_valid() {
            return Err(NetError::InvalidAddress(
                "cannot resize an invalid network".to_string(),
            ));
        }
        if cidr > self.addr.max_cidr() {
            return Err(NetError::InvalidCidr(format!(
                "{cidr} > {max}",
                max = self.addr.max_cidr()
            )));
        }
        self.cidr = cidr;
        Ok(())
    }

    fn invalidate(&mut self) {
        *self = Network::invalid();
    }

    /// Advance by one network of the same size.
    pub fn next(&mut self) -> Result<()> {
        self.step(true)
    }

    /// Step back by one network of the same size.
    pub fn previous(&mut self) -> Result<()> {
        self.step(false)
    }

    fn step(&mut self, forwards: bool) -> Result<()> {
        if !self.is_valid() {
            return Err(NetError::InvalidAddress(
                "cannot step an invalid network".to_string(),
            ));
        }
        // a /0 spans the whole address space
        if self.cidr == 0 {
            self.invalidate();
            return Err(NetError::AddressSpaceOverflow);
        }
        let result = if forwards {
            self.addr.increase(self.cidr)
        } else {
            self.addr.decrease(self.cidr)
        };
        if result.is_err() {
            self.invalidate();
        }
        result
    }

    /// The base address with host bits cleared.
    pub fn base_address(&self) -> Address {
        if !self.is_valid() {
            return Address::invalid();
        }
        self.addr.masked(self.cidr)
    }

    /// The highest address in this network.
    pub fn last_addr(&self) -> Address {
        let mut last = self.base_address();
        last.fill_host_bits(self.cidr);
        last
    }

    /// Broadcast address; identical to [`Network::last_addr`].
    pub fn broadcast(&self) -> Address {
        self.last_addr()
    }

    /// Compare two networks, `None` if either is invalid.
    pub fn compare(&self, other: &Network) -> Option<Ordering> {
        if !self.is_valid() || !other.is_valid() {
            return None;
        }
        Some(self.cmp(other))
    }

    fn same_family(&self, other: &Network) -> bool {
        self.is_valid() && other.is_valid() && self.family() == other.family()
    }

    /// True if every address of `other` lies within this network.
    pub fn contains(&self, other: &Network) -> bool {
        if !self.same_family(other) {
            return false;
        }
        if self.cidr == 0 {
            return true;
        }
        if other.cidr == 0 {
            return false;
        }
        if self.addr > other.addr {
            return false;
        }

        let mut next = *self;
        if next.next().is_err() {
            // we already reach the top of the address space
            return true;
        }
        let mut other_next = *other;
        if other_next.next().is_err() {
            return false;
        }
        next.addr >= other_next.addr
    }

    pub fn contains_address(&self, addr: &Address) -> bool {
        self.contains(&Network::host(*addr))
    }

    /// True if the two networks share at least one address.
    pub fn intersects(&self, other: &Network) -> bool {
        if !self.same_family(other) {
            return false;
        }
        if self.cidr == 0 || other.cidr == 0 {
            return true;
        }
        let (earlier, later) = match self.addr.cmp(&other.addr) {
            Ordering::Equal => return true,
            Ordering::Less => (self, other),
            Ordering::Greater => (other, self),
        };
        let mut advanced = *earlier;
        if advanced.next().is_err() {
            return true;
        }
        advanced.addr > later.addr
    }

    /// True if one network ends exactly where the other begins.
    pub fn adjacent(&self, other: &Network) -> bool {
        if !self.same_family(other) {
            return false;
        }
        if self.cidr == 0 || other.cidr == 0 {
            return false;
        }
        let (earlier, later) = match self.addr.cmp(&other.addr) {
            Ordering::Equal => return false,
            Ordering::Less => (self, other),
            Ordering::Greater => (other, self),
        };
        let mut advanced = *earlier;
        if advanced.next().is_err() {
            return false;
        }
        advanced.addr == later.addr
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}/{}", self.addr, self.cidr)
    }
}

impl FromStr for Network {
    type Err = NetError;

    /// Parse `addr/cidr` or a bare address (host network), keeping host bits as given.
    fn from_str(s: &str) -> Result<Network> {
        let parsed = crate::parse::try_parse(s)?;
        Network::try_from_bytes(&parsed.bytes, parsed.cidr)
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Network::from_str(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Network {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_validates() {
        let addr: Address = "10.0.0.0".parse().unwrap();
        assert!(Network::new(addr, 32).is_valid());
        assert!(!Network::new(addr, 33).is_valid());
        assert!(matches!(
            Network::try_new(addr, 33),
            Err(NetError::InvalidCidr(_))
        ));
        assert!(!Network::new(Address::invalid(), 0).is_valid());
        assert!(matches!(
            Network::try_from_bytes(&[1, 2, 3], 8),
            Err(NetError::InvalidAddress(_))
        ));
        assert_eq!(Network::from_bytes(&[10, 0, 0, 0], 8), net("10.0.0.0/8"));
    }

    #[test]
    fn test_base_modes() {
        let addr: Address = "192.168.200.113".parse().unwrap();
        let lenient = Network::base(addr, 24, Mode::Lenient).unwrap();
        assert_eq!(lenient.to_string(), "192.168.200.0/24");
        assert!(matches!(
            Network::base(addr, 24, Mode::Strict),
            Err(NetError::NotABaseAddress(_))
        ));
        let aligned: Address = "192.168.200.0".parse().unwrap();
        assert!(Network::base(aligned, 24, Mode::Strict).is_ok());
    }

    #[test]
    fn test_next_previous() {
        let mut n = net("192.168.0.0/24");
        n.next().unwrap();
        assert_eq!(n, net("192.168.1.0/24"));
        n.previous().unwrap();
        n.previous().unwrap();
        assert_eq!(n, net("192.167.255.0/24"));

        let mut n = net("10.1.1.0/28");
        n.next().unwrap();
        assert_eq!(n, net("10.1.1.16/28"));

        let mut top = net("255.255.255.0/24");
        assert_eq!(top.next(), Err(NetError::AddressSpaceOverflow));
        assert!(!top.is_valid());

        let mut all = net("0.0.0.0/0");
        assert_eq!(all.next(), Err(NetError::AddressSpaceOverflow));
        assert!(!all.is_valid());
    }

    #[test]
    fn test_last_addr() {
        assert_eq!(net("192.168.0.0/24").last_addr().to_string(), "192.168.0.255");
        assert_eq!(net("192.168.1.0/8").last_addr().to_string(), "192.255.255.255");
        assert_eq!(net("10.0.0.7/32").last_addr().to_string(), "10.0.0.7");
        assert_eq!(net("0.0.0.0/0").last_addr().to_string(), "255.255.255.255");
        assert_eq!(
            net("ffff:fc00::/64").broadcast().to_string(),
            "ffff:fc00::ffff:ffff:ffff:ffff"
        );
        assert!(!Network::invalid().last_addr().is_valid());
    }

    #[test]
    fn test_base_address() {
        assert_eq!(
            net("192.168.200.113/24").base_address().to_string(),
            "192.168.200.0"
        );
        assert_eq!(
            net("ffff:fc00::1:1234/64").base_address().to_string(),
            "ffff:fc00::"
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            net("192.168.0.0/24").compare(&net("192.168.1.0/24")),
            Some(Ordering::Less)
        );
        assert_eq!(
            net("192.168.0.0/23").compare(&net("192.168.0.0/24")),
            Some(Ordering::Less),
            "wider network sorts first on equal base"
        );
        assert_eq!(
            net("192.168.0.0/24").compare(&net("192.168.0.0/23")),
            Some(Ordering::Greater)
        );
        assert!(net("255.255.255.255/32") < net("::/0"));
        assert_eq!(net("10.0.0.0/8").compare(&Network::invalid()), None);
    }

    #[test]
    fn test_contains() {
        assert!(net("192.168.0.0/16").contains(&net("192.168.0.0/24")));
        assert!(net("192.168.0.0/16").contains(&net("192.168.255.0/24")));
        assert!(!net("192.168.0.0/24").contains(&net("192.168.0.0/16")));
        assert!(!net("192.168.0.0/24").contains(&net("192.168.1.0/24")));
        assert!(net("192.168.0.0/24").contains(&net("192.168.0.0/24")));
        assert!(net("0.0.0.0/0").contains(&net("10.0.0.0/8")));
        assert!(!net("10.0.0.0/8").contains(&net("0.0.0.0/0")));
        assert!(net("255.0.0.0/8").contains(&net("255.255.255.255/32")));
        assert!(!net("254.0.0.0/8").contains(&net("255.255.255.255/32")));
        assert!(!net("0.0.0.0/0").contains(&net("::/0")), "mixed families");

        let addr: Address = "192.168.0.100".parse().unwrap();
        assert!(net("192.168.0.0/24").contains_address(&addr));
    }

    #[test]
    fn test_intersects() {
        assert!(!net("192.168.0.0/24").intersects(&net("192.168.1.0/24")));
        assert!(net("192.168.0.0/23").intersects(&net("192.168.1.0/24")));
        assert!(net("192.168.1.0/24").intersects(&net("192.168.0.0/23")));
        assert!(net("192.168.1.0/24").intersects(&net("192.168.1.0/25")));
        assert!(net("0.0.0.0/0").intersects(&net("10.0.0.0/8")));
        assert!(net("255.0.0.0/8").intersects(&net("255.255.0.0/16")));
        assert!(!net("10.0.0.0/8").intersects(&net("::/0")));
    }

    #[test]
    fn test_adjacent() {
        assert!(net("192.168.0.0/25").adjacent(&net("192.168.0.128/25")));
        assert!(net("192.168.0.128/25").adjacent(&net("192.168.0.0/25")));
        assert!(net("192.168.0.0/24").adjacent(&net("192.168.1.0/26")));
        assert!(!net("192.168.0.0/25").adjacent(&net("192.168.0.0/25")));
        assert!(!net("192.168.0.0/25").adjacent(&net("192.168.1.0/25")));
        assert!(!net("0.0.0.0/0").adjacent(&net("10.0.0.0/8")));
        assert!(!net("255.255.255.0/24").adjacent(&net("0.0.0.0/24")));
    }

    #[test]
    fn test_display_parse() {
        assert_eq!(net("10.0.0.0/8").to_string(), "10.0.0.0/8");
        assert_eq!(net("::1").to_string(), "::1/128");
        assert_eq!(net("192.168.1.1").cidr(), 32);
        assert_eq!(net("[fe80::]/10").to_string(), "fe80::/10");
        assert_eq!(Network::invalid().to_string(), "");
        assert!("10.0.0.0/33".parse::<Network>().is_err());
        assert!("foobar".parse::<Network>().is_err());
    }

    #[test]
    fn test_serde_string_form() {
        let n = net("10.18.126.0/24");
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"10.18.126.0/24\"");
        let back: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
        let list: Vec<Network> = serde_json::from_str(r#"["10.0.0.0/8", "::/0"]"#).unwrap();
        assert_eq!(list.len(), 2);
        assert!(serde_json::from_str::<Network>("\"10.0.0.0/40\"").is_err());
    }
}
