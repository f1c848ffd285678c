//! Batch algorithms over networks.
//!
//! This module contains the algorithms built on the [`models`](crate::models) types:
//! - [`sort`] - total ordering (radix and binary-search insertion)
//! - [`summarize`] - CIDR aggregation
//! - [`gap_finder`] - unused subnets within an aggregate
//! - [`range`] - address range to CIDR blocks
//! - [`matcher`] - containment queries over a summarized index

mod gap_finder;
mod matcher;
mod range;
mod sort;
mod summarize;

// Re-export public functions
pub use gap_finder::find_unused_subnets;
pub use matcher::Matcher;
pub use range::range_of_networks;
pub use sort::{
    binary_search_for_insertion_index, insertion_sort_networks, radix_sort_networks,
    sort_networks,
};
pub use summarize::{summarize_networks, summarize_sorted_networks, summarize_strs};
