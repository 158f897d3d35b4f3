//! Collaboration graph construction.
//!
//! - `pairs`: canonical artist pairs and monotonic edge weights
//! - `extractor`: pair extraction from one artist's discography
//! - `traversal`: level-by-level breadth-first expansion from the seeds
//! - `resolver`: batch lookup of endpoint profiles the traversal never fetched

pub mod extractor;
pub mod pairs;
pub mod resolver;
pub mod traversal;

pub use extractor::{CollaborationExtractor, collect_collaborations, extract_pairs};
pub use pairs::{CollaborationPair, EdgeWeights};
pub use resolver::{MissingProfileResolver, ResolveReport};
pub use traversal::{
    CollectionState, TraversalConfig, TraversalEngine, TraversalPhase, TraversalReport,
};

#[cfg(test)]
mod tests;
