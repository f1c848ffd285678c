//! Network ordering.
//!
//! Two interchangeable sorts over the key `(family, address bytes, cidr)`:
//! - [`insertion_sort_networks`] - binary-search insertion into a growing list
//! - [`radix_sort_networks`] - in-place MSD radix (American flag) sort

use crate::models::{Network, IPV6_LEN};
use std::cmp::Ordering;

const BUCKETS: usize = 256;
/// Key level holding the address length tag.
const LENGTH_LEVEL: usize = 0;
/// Key level holding the prefix length, after all address bytes.
const CIDR_LEVEL: usize = IPV6_LEN + 1;

/// Sort networks in place with the radix sort.
pub fn sort_networks(networks: &mut [Network]) {
    radix_sort_networks(networks);
}

/// Index of an exact match in `sorted`, or the position where `target` would be inserted.
pub fn binary_search_for_insertion_index(target: &Network, sorted: &[Network]) -> usize {
    let mut left = 0;
    let mut right = sorted.len();
    while left < right {
        let middle = left + (right - left) / 2;
        match sorted[middle].cmp(target) {
            Ordering::Equal => return middle,
            Ordering::Less => left = middle + 1,
            Ordering::Greater => right = middle,
        }
    }
    left
}

/// Sort by inserting each network at its binary-searched position. Duplicates are kept.
pub fn insertion_sort_networks(networks: &[Network]) -> Vec<Network> {
    let mut sorted: Vec<Network> = Vec::with_capacity(networks.len());
    for net in networks {
        let idx = binary_search_for_insertion_index(net, &sorted);
        sorted.insert(idx, *net);
    }
    sorted
}

/// Counting-sort scratch reused by every level of the radix recursion.
struct RadixScratch {
    counts: [usize; BUCKETS],
    heads: [usize; BUCKETS],
    tails: [usize; BUCKETS],
}

impl RadixScratch {
    fn new() -> RadixScratch {
        RadixScratch {
            counts: [0; BUCKETS],
            heads: [0; BUCKETS],
            tails: [0; BUCKETS],
        }
    }
}

/// In-place MSD radix sort: length tag, then address bytes, then cidr.
pub fn radix_sort_networks(networks: &mut [Network]) {
    let mut scratch = RadixScratch::new();
    radix_sort_level(networks, LENGTH_LEVEL, &mut scratch);
}

fn radix_key(net: &Network, level: usize) -> usize {
    match level {
        LENGTH_LEVEL => net.addr().byte_len(),
        CIDR_LEVEL => net.cidr() as usize,
        // bytes past an IPv4 address read as zero; the length level already split the families
        _ => net.addr().byte_at(level - 1) as usize,
    }
}

fn radix_sort_level(networks: &mut [Network], level: usize, scratch: &mut RadixScratch) {
    if networks.len() < 2 {
        return;
    }

    scratch.counts.fill(0);
    for net in networks.iter() {
        scratch.counts[radix_key(net, level)] += 1;
    }

    let mut total = 0;
    for bucket in 0..BUCKETS {
        scratch.heads[bucket] = total;
        total += scratch.counts[bucket];
        scratch.tails[bucket] = total;
    }
    // bucket boundaries must survive the recursion, which reuses the scratch
    let ends = scratch.tails;

    for bucket in 0..BUCKETS {
        while scratch.heads[bucket] < scratch.tails[bucket] {
            let idx = scratch.heads[bucket];
            let key = radix_key(&networks[idx], level);
            if key == bucket {
                scratch.heads[bucket] += 1;
            } else {
                networks.swap(idx, scratch.heads[key]);
                scratch.heads[key] += 1;
            }
        }
    }

    if level == CIDR_LEVEL {
        return;
    }
    let mut start = 0;
    for end in ends {
        if end - start > 1 {
            radix_sort_level(&mut networks[start..end], level + 1, scratch);
        }
        start = end;
    }
}
