//! Address range to CIDR block expansion.

use crate::error::{NetError, Result};
use crate::models::{Address, Network};

/// Cover the interval between two addresses with the fewest aligned CIDR blocks.
///
/// The bounds may be given in either order and are both included. Blocks are
/// returned in ascending order, contiguous and non-overlapping.
///
/// # Examples
/// ```
/// use cidr_algebra::models::Address;
/// use cidr_algebra::processing::range_of_networks;
/// let start: Address = "192.168.1.2".parse().unwrap();
/// let stop: Address = "192.168.1.5".parse().unwrap();
/// let blocks = range_of_networks(&start, &stop).unwrap();
/// assert_eq!(blocks[0].to_string(), "192.168.1.2/31");
/// assert_eq!(blocks[1].to_string(), "192.168.1.4/31");
/// ```
pub fn range_of_networks(start: &Address, stop: &Address) -> Result<Vec<Network>> {
    if !start.is_valid() || !stop.is_valid() {
        return Err(NetError::InvalidAddress(
            "range bound is invalid".to_string(),
        ));
    }
    if start.family() != stop.family() {
        return Err(NetError::MixedFamily);
    }
    let (mut current, stop) = if start <= stop {
        (*start, *stop)
    } else {
        (*stop, *start)
    };

    let max_cidr = current.max_cidr();
    let mut blocks = Vec::new();
    while current <= stop {
        let cidr = (0..=max_cidr)
            .find(|&cidr| fits(&current, cidr, &stop))
            .unwrap_or(max_cidr);
        let block = Network::try_new(current, cidr)?;
        log::trace!("range block {block}");
        blocks.push(block);

        if cidr == 0 {
            break;
        }
        match current.increase(cidr) {
            Ok(()) => {}
            Err(NetError::AddressSpaceOverflow) => break,
            Err(e) => return Err(e),
        }
    }
    Ok(blocks)
}

/// The block at `current` with prefix `cidr` is aligned and ends at or before `stop`.
fn fits(current: &Address, cidr: u8, stop: &Address) -> bool {
    current.is_base_address(cidr) && Network::new(*current, cidr).last_addr() <= *stop
}
