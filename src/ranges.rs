//! Well-known address ranges.
//!
//! Classifies addresses against the special-purpose blocks of RFC 1918,
//! RFC 3171, RFC 3927, RFC 4291, RFC 5735, RFC 6598 and friends.

use crate::models::{Address, Family, Network};
use lazy_static::lazy_static;

/// Named special-purpose range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Unspecified,
    Broadcast,
    Multicast,
    LinkLocal,
    Loopback,
    CarrierGradeNat,
    Private,
    Reserved,
    UniqueLocal,
    Ipv4Mapped,
    Rfc6145,
    Rfc6052,
    SixToFour,
    Teredo,
}

fn v4(octets: [u8; 4], cidr: u8) -> Network {
    Network::from_bytes(&octets, cidr)
}

fn v6(segments: [u16; 8], cidr: u8) -> Network {
    let bytes: Vec<u8> = segments.iter().flat_map(|s| s.to_be_bytes()).collect();
    Network::from_bytes(&bytes, cidr)
}

lazy_static! {
    static ref IPV4_RANGES: Vec<(RangeKind, Network)> = vec![
        (RangeKind::Unspecified, v4([0, 0, 0, 0], 8)),
        (RangeKind::Broadcast, v4([255, 255, 255, 255], 32)),
        (RangeKind::Multicast, v4([224, 0, 0, 0], 4)),
        (RangeKind::LinkLocal, v4([169, 254, 0, 0], 16)),
        (RangeKind::Loopback, v4([127, 0, 0, 0], 8)),
        (RangeKind::CarrierGradeNat, v4([100, 64, 0, 0], 10)),
        (RangeKind::Private, v4([10, 0, 0, 0], 8)),
        (RangeKind::Private, v4([172, 16, 0, 0], 12)),
        (RangeKind::Private, v4([192, 168, 0, 0], 16)),
        (RangeKind::Reserved, v4([192, 0, 0, 0], 24)),
        (RangeKind::Reserved, v4([192, 0, 2, 0], 24)),
        (RangeKind::Reserved, v4([192, 88, 99, 0], 24)),
        (RangeKind::Reserved, v4([198, 51, 100, 0], 24)),
        (RangeKind::Reserved, v4([203, 0, 113, 0], 24)),
        (RangeKind::Reserved, v4([240, 0, 0, 0], 24)),
    ];
    static ref IPV6_RANGES: Vec<(RangeKind, Network)> = vec![
        (RangeKind::Unspecified, v6([0, 0, 0, 0, 0, 0, 0, 0], 128)),
        (RangeKind::LinkLocal, v6([0xfe80, 0, 0, 0, 0, 0, 0, 0], 10)),
        (RangeKind::Multicast, v6([0xff00, 0, 0, 0, 0, 0, 0, 0], 8)),
        (RangeKind::Loopback, v6([0, 0, 0, 0, 0, 0, 0, 1], 128)),
        (RangeKind::UniqueLocal, v6([0xfc00, 0, 0, 0, 0, 0, 0, 0], 7)),
        (RangeKind::Ipv4Mapped, v6([0, 0, 0, 0, 0, 0xffff, 0, 0], 96)),
        (RangeKind::Rfc6145, v6([0, 0, 0, 0, 0xffff, 0, 0, 0], 96)),
        (RangeKind::Rfc6052, v6([0x64, 0xff9b, 0, 0, 0, 0, 0, 0], 96)),
        (RangeKind::SixToFour, v6([0x2002, 0, 0, 0, 0, 0, 0, 0], 16)),
        (RangeKind::Teredo, v6([0x2001, 0, 0, 0, 0, 0, 0, 0], 32)),
        (RangeKind::Reserved, v6([0x2001, 0xdb8, 0, 0, 0, 0, 0, 0], 32)),
    ];
}

fn table(address: &Address) -> &'static [(RangeKind, Network)] {
    match address.family() {
        Some(Family::V4) => IPV4_RANGES.as_slice(),
        Some(Family::V6) => IPV6_RANGES.as_slice(),
        None => &[],
    }
}

/// True if `address` falls inside any block of the given kind.
pub fn check(address: &Address, kind: RangeKind) -> bool {
    table(address)
        .iter()
        .any(|(k, net)| *k == kind && net.contains_address(address))
}

/// Every range kind `address` belongs to, in table order without repeats.
pub fn classify(address: &Address) -> Vec<RangeKind> {
    let mut kinds = Vec::new();
    for (kind, net) in table(address) {
        if net.contains_address(address) && !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    kinds
}
