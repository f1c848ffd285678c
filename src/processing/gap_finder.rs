//! Gap finding inside an aggregate network.
//!
//! Identifies the unused CIDR blocks between allocated subnets.

use crate::error::{NetError, Result};
use crate::models::{Address, Network};

/// Find the maximal CIDR blocks of `aggregate` not covered by `used`.
///
/// `used` must be sorted and summarized (see
/// [`summarize_networks`](super::summarize_networks)) and lie inside `aggregate`.
/// The returned gaps are in ascending order; together with `used` they
/// summarize back to `aggregate`.
///
/// # Returns
/// * `Err(NetError::MixedFamily)` - if `used` holds networks of another family
/// * `Err(NetError::InvalidAddress)` - if `aggregate` is invalid
pub fn find_unused_subnets(aggregate: &Network, used: &[Network]) -> Result<Vec<Network>> {
    if !aggregate.is_valid() {
        return Err(NetError::InvalidAddress(
            "aggregate network is invalid".to_string(),
        ));
    }
    if used
        .iter()
        .any(|net| net.is_valid() && net.family() != aggregate.family())
    {
        return Err(NetError::MixedFamily);
    }

    let aggregate = aggregate.normalized();
    let max_cidr = aggregate.addr().max_cidr();
    let last = aggregate.last_addr();
    let mut gaps = Vec::new();
    let mut idx = 0;
    let mut candidate = aggregate;

    while *candidate.addr() <= last {
        // shrink until the candidate is aligned and inside the aggregate
        while !candidate.addr().is_base_address(candidate.cidr()) || !aggregate.contains(&candidate)
        {
            candidate.set_cidr(candidate.cidr() + 1)?;
        }

        while idx < used.len() && is_behind(&used[idx], candidate.addr()) {
            idx += 1;
        }

        if idx < used.len() && candidate.intersects(&used[idx]) {
            if candidate.cidr() < max_cidr {
                candidate.set_cidr(candidate.cidr() + 1)?;
                continue;
            }
            // a single address still overlaps: jump past the used entry
            let mut after = used[idx].normalized();
            match after.next() {
                Ok(()) => {}
                Err(NetError::AddressSpaceOverflow) => break,
                Err(e) => return Err(e),
            }
            candidate = Network::try_new(*after.addr(), aggregate.cidr())?;
            idx += 1;
        } else {
            log::trace!("found gap {candidate}");
            gaps.push(candidate);
            match candidate.next() {
                Ok(()) => {}
                Err(NetError::AddressSpaceOverflow) => break,
                Err(e) => return Err(e),
            }
            candidate.set_cidr(aggregate.cidr())?;
        }
    }

    log::debug!(
        "found {} unused subnets in {aggregate} around {} used",
        gaps.len(),
        used.len()
    );
    Ok(gaps)
}

/// True if `net` is invalid or ends before `addr`.
fn is_behind(net: &Network, addr: &Address) -> bool {
    !net.is_valid() || net.last_addr() < *addr
}
