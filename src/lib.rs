//! IPv4/IPv6 address and CIDR algebra.
//!
//! - [`models`] - [`Address`] and [`Network`] value types with ordering,
//!   masking, ripple-carry stepping and containment tests
//! - [`processing`] - sorting, summarization, gap finding, range expansion
//!   and the [`Matcher`](processing::Matcher) index
//! - [`parse`] - text to bytes for addresses and networks
//! - [`ranges`] - well-known special-purpose ranges
//!
//! ```
//! use cidr_algebra::config::Mode;
//! use cidr_algebra::processing::summarize_strs;
//! let summary = summarize_strs(&["192.168.0.0/25", "192.168.0.128/25"], Mode::Strict).unwrap();
//! assert_eq!(summary[0].to_string(), "192.168.0.0/24");
//! ```

pub mod config;
mod error;
pub mod models;
pub mod parse;
pub mod processing;
pub mod ranges;

pub use error::{NetError, Result};
pub use models::{Address, Family, Network};
