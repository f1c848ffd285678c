//! Prefix matching over a summarized network index.

use super::sort::{binary_search_for_insertion_index, sort_networks};
use super::summarize::summarize_sorted_networks;
use crate::config::Mode;
use crate::models::{Address, Network};
use crate::parse::base_network;

/// A sorted, summarized set of networks answering containment queries.
///
/// # Examples
/// ```
/// use cidr_algebra::processing::Matcher;
/// let matcher = Matcher::from_strs(&["192.168.0.0/24", "192.168.4.0/23"]);
/// assert!(matcher.has_str("192.168.5.0"));
/// assert!(!matcher.has_str("192.168.1.1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    sorted: Vec<Network>,
}

impl Matcher {
    /// Build the index: mask every network to its base, sort, then summarize once.
    pub fn new<I>(networks: I) -> Matcher
    where
        I: IntoIterator<Item = Network>,
    {
        let mut subnets: Vec<Network> = networks
            .into_iter()
            .filter_map(|net| Network::base(*net.addr(), net.cidr(), Mode::Lenient).ok())
            .collect();
        sort_networks(&mut subnets);
        let sorted = summarize_sorted_networks(&subnets);
        log::debug!(
            "Matcher built from {} networks, {} after summarize",
            subnets.len(),
            sorted.len()
        );
        Matcher { sorted }
    }

    /// Build the index from text, skipping anything that does not parse.
    pub fn from_strs<S: AsRef<str>>(networks: &[S]) -> Matcher {
        let parsed = networks
            .iter()
            .filter_map(|s| match base_network(s.as_ref(), Mode::Lenient) {
                Ok(net) => Some(net),
                Err(e) => {
                    log::warn!("Warning: Matcher skipping {}: {e}", s.as_ref());
                    None
                }
            })
            .collect::<Vec<Network>>();
        Matcher::new(parsed)
    }

    /// True if some indexed network contains `query`.
    pub fn has(&self, query: &Network) -> bool {
        self.get(query).is_some()
    }

    pub fn has_address(&self, addr: &Address) -> bool {
        self.has(&Network::host(*addr))
    }

    /// Parse `query` as an address or network and test it; unparsable text never matches.
    pub fn has_str(&self, query: &str) -> bool {
        base_network(query, Mode::Lenient)
            .map(|net| self.has(&net))
            .unwrap_or(false)
    }

    /// The indexed network containing `query`, if any.
    pub fn get(&self, query: &Network) -> Option<Network> {
        if !query.is_valid() {
            return None;
        }
        let query = query.normalized();
        let idx = binary_search_for_insertion_index(&query, &self.sorted);
        if let Some(net) = self.sorted.get(idx) {
            if net.contains(&query) {
                return Some(*net);
            }
        }
        if idx > 0 && self.sorted[idx - 1].contains(&query) {
            return Some(self.sorted[idx - 1]);
        }
        None
    }

    /// Insert a network, skipping exact duplicates.
    ///
    /// Siblings added this way are not merged with existing entries.
    pub fn add(&mut self, network: &Network) -> &mut Self {
        let net = match Network::base(*network.addr(), network.cidr(), Mode::Lenient) {
            Ok(net) => net,
            Err(e) => {
                log::warn!("Warning: Matcher::add ignoring invalid network: {e}");
                return self;
            }
        };
        let idx = binary_search_for_insertion_index(&net, &self.sorted);
        if self.sorted.get(idx) == Some(&net) {
            return self;
        }
        self.sorted.insert(idx, net);
        self
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// The indexed networks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.sorted.iter()
    }
}

impl FromIterator<Network> for Matcher {
    fn from_iter<I: IntoIterator<Item = Network>>(iter: I) -> Matcher {
        Matcher::new(iter)
    }
}
