//! Fills in profiles for artists seen only as collaboration endpoints.
//!
//! Ids the service cannot resolve stay absent from the node registry, so edges
//! that reference them keep a dangling endpoint in the output.

use crate::config::MAX_API_PAGE;
use crate::graph::traversal::CollectionState;
use crate::logger;
use crate::metadata::source::MetadataSource;
use crate::metadata::types::ArtistId;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    /// Ids that were missing a profile when resolution started.
    pub requested: usize,
    pub resolved: usize,
    /// Ids returned as null or lost to a failed batch call.
    pub unresolved: Vec<ArtistId>,
    /// Batch calls that failed outright.
    pub failed_batches: usize,
}

pub struct MissingProfileResolver<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
    batch_size: usize,
    batch_delay: Duration,
}

impl<'a, S: MetadataSource + ?Sized> MissingProfileResolver<'a, S> {
    /// `batch_size` is clamped to `1..=50`, the service's batch limit.
    pub fn new(source: &'a S, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            source,
            batch_size: batch_size.clamp(1, MAX_API_PAGE),
            batch_delay,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Fetches every missing endpoint profile and merges the results into `state.nodes`.
    pub async fn resolve(&self, state: &mut CollectionState) -> ResolveReport {
        let missing: Vec<ArtistId> = state.missing_profiles().into_iter().collect();
        let mut report = ResolveReport {
            requested: missing.len(),
            ..ResolveReport::default()
        };

        if missing.is_empty() {
            logger::info("No missing profiles to resolve");
            return report;
        }

        logger::info(&format!(
            "Resolving {} missing profiles in batches of {}",
            missing.len(),
            self.batch_size
        ));

        let total_batches = missing.len().div_ceil(self.batch_size);
        for (index, chunk) in missing.chunks(self.batch_size).enumerate() {
            match self.source.fetch_artists_batch(chunk).await {
                Ok(profiles) => {
                    for (id, profile) in chunk.iter().zip(profiles) {
                        match profile {
                            Some(profile) => {
                                // Keyed by the requested id so the edge endpoint resolves.
                                state.nodes.entry(id.clone()).or_insert(profile);
                                report.resolved += 1;
                            }
                            None => report.unresolved.push(id.clone()),
                        }
                    }
                }
                Err(e) => {
                    logger::warn(&format!(
                        "Batch {}/{} failed: {}",
                        index + 1,
                        total_batches,
                        e
                    ));
                    report.failed_batches += 1;
                    report.unresolved.extend(chunk.iter().cloned());
                }
            }

            if index + 1 < total_batches && !self.batch_delay.is_zero() {
                sleep(self.batch_delay).await;
            }
        }

        if !report.unresolved.is_empty() {
            logger::warn(&format!(
                "{} endpoint profiles could not be resolved",
                report.unresolved.len()
            ));
        }
        logger::info(&format!(
            "Resolved {}/{} missing profiles",
            report.resolved, report.requested
        ));

        report
    }
}
