//! CIDR summarization.
//!
//! Reduces a sorted network list to the minimal covering set: contained
//! entries are dropped and aligned siblings are merged into their parent.

use super::sort::sort_networks;
use crate::config::Mode;
use crate::error::Result;
use crate::models::Network;
use crate::parse::base_network;

/// Summarize a list already ordered by [`sort_networks`].
///
/// Invalid entries are skipped. The output keeps the sorted order.
pub fn summarize_sorted_networks(sorted: &[Network]) -> Vec<Network> {
    let mut summarized: Vec<Network> = Vec::with_capacity(sorted.len());
    for net in sorted {
        if !net.is_valid() {
            log::warn!("Warning: skipping invalid network during summarize");
            continue;
        }
        if let Some(last) = summarized.last() {
            if last.contains(net) {
                log::trace!("{last} already contains {net}");
                continue;
            }
        }
        summarized.push(*net);
        merge_tail_siblings(&mut summarized);
    }
    log::debug!(
        "summarized {} networks into {}",
        sorted.len(),
        summarized.len()
    );
    summarized
}

/// Repeatedly merge the last two entries while they are aligned siblings.
fn merge_tail_siblings(summarized: &mut Vec<Network>) {
    while summarized.len() >= 2 {
        let n = summarized.len();
        let (even, odd) = (summarized[n - 2], summarized[n - 1]);
        if !is_sibling_pair(&even, &odd) {
            break;
        }
        summarized.pop();
        let parent = &mut summarized[n - 2];
        let parent_cidr = even.cidr() - 1;
        *parent = Network::new(even.addr().masked(parent_cidr), parent_cidr);
        log::trace!("merged {even} and {odd} into {parent}");
    }
}

/// `even` must be the lower half of its parent and `odd` must follow it directly.
fn is_sibling_pair(even: &Network, odd: &Network) -> bool {
    even.cidr() == odd.cidr()
        && even.cidr() > 0
        && even.addr().is_base_address(even.cidr() - 1)
        && even.adjacent(odd)
}

/// Normalize, sort and summarize any collection of networks.
pub fn summarize_networks<I>(networks: I) -> Vec<Network>
where
    I: IntoIterator<Item = Network>,
{
    let mut normalized: Vec<Network> = networks
        .into_iter()
        .filter(|net| net.is_valid())
        .map(|net| net.normalized())
        .collect();
    sort_networks(&mut normalized);
    summarize_sorted_networks(&normalized)
}

/// Parse, sort and summarize textual networks.
///
/// Lenient mode skips unparsable entries and masks host bits; strict mode
/// returns the first error encountered.
pub fn summarize_strs<S: AsRef<str>>(texts: &[S], mode: Mode) -> Result<Vec<Network>> {
    let mut networks = Vec::with_capacity(texts.len());
    for text in texts {
        match base_network(text.as_ref(), mode) {
            Ok(net) => networks.push(net),
            Err(e) if !mode.is_strict() => {
                log::warn!("Warning: skipping {}: {e}", text.as_ref());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summarize_networks(networks))
}
