//! Canonical collaboration pairs and their accumulated weights.

use crate::metadata::types::ArtistId;
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Unordered pair of two distinct artists.
///
/// The ids are stored sorted, so `(a, b)` and `(b, a)` compare and hash equal.
/// A self-pair cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollaborationPair {
    first: ArtistId,
    second: ArtistId,
}

impl CollaborationPair {
    /// Returns `None` when both ids are the same artist.
    pub fn new(a: ArtistId, b: ArtistId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller id.
    pub fn first(&self) -> &ArtistId {
        &self.first
    }

    /// The lexicographically larger id.
    pub fn second(&self) -> &ArtistId {
        &self.second
    }

    pub fn contains(&self, id: &ArtistId) -> bool {
        &self.first == id || &self.second == id
    }

    pub fn endpoints(&self) -> [&ArtistId; 2] {
        [&self.first, &self.second]
    }
}

/// Co-occurrence counter keyed by canonical pair.
///
/// Weights can only grow: the only mutation is `increment`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeWeights {
    weights: BTreeMap<CollaborationPair, u64>,
}

impl EdgeWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation of `pair` and returns the new weight.
    pub fn increment(&mut self, pair: CollaborationPair) -> u64 {
        let weight = self.weights.entry(pair).or_insert(0);
        *weight += 1;
        *weight
    }

    pub fn get(&self, pair: &CollaborationPair) -> u64 {
        self.weights.get(pair).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CollaborationPair, u64> {
        self.weights.iter()
    }

    /// Every artist that appears as an endpoint of at least one pair.
    pub fn endpoints(&self) -> BTreeSet<ArtistId> {
        self.weights
            .keys()
            .flat_map(|pair| pair.endpoints())
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a EdgeWeights {
    type Item = (&'a CollaborationPair, &'a u64);
    type IntoIter = btree_map::Iter<'a, CollaborationPair, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }
}
