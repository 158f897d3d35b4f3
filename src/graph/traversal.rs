//! Breadth-first expansion of the collaboration graph.
//!
//! The engine walks discrete depth levels `0..max_depth`. Each level processes
//! its queue in order: fetch and cache the artist's profile, scan the
//! discography for collaboration pairs, add one weight per returned pair,
//! queue unvisited endpoints for the next level, mark the artist visited and
//! pause. Failures are recorded per artist and never abort the run.
//!
//! ```text
//! Idle -> LevelInProgress(d) -> LevelComplete(d) -> LevelInProgress(d + 1) ... -> Done
//! ```
//!
//! Weights are added once per discovering scan, so a pair found from both of
//! its endpoints' scans is counted twice.

use crate::config::Config;
use crate::error::CollabError;
use crate::graph::extractor::collect_collaborations;
use crate::graph::pairs::EdgeWeights;
use crate::logger;
use crate::metadata::source::MetadataSource;
use crate::metadata::types::{ArtistId, ArtistProfile};
use crate::utilities::dedup_preserving_order;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tokio::time::sleep;

/// Everything accumulated during one collection run.
#[derive(Clone, Debug, Default)]
pub struct CollectionState {
    /// Profiles by id, fetched at most once each.
    pub nodes: BTreeMap<ArtistId, ArtistProfile>,
    pub edges: EdgeWeights,
    /// Artists whose profile and discography were both processed.
    pub visited: BTreeSet<ArtistId>,
    /// Artists abandoned for this run after a failed fetch.
    pub failed: BTreeSet<ArtistId>,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose visited set is pre-populated, e.g. from a previous run.
    pub fn with_visited<I>(visited: I) -> Self
    where
        I: IntoIterator<Item = ArtistId>,
    {
        Self {
            visited: visited.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_visited(&self, id: &ArtistId) -> bool {
        self.visited.contains(id)
    }

    /// Edge endpoints that have no profile in the node registry.
    pub fn missing_profiles(&self) -> BTreeSet<ArtistId> {
        self.edges
            .endpoints()
            .into_iter()
            .filter(|id| !self.nodes.contains_key(id))
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct TraversalConfig {
    pub max_depth: usize,
    /// Pause after each successfully processed artist.
    pub artist_delay: Duration,
    /// Pause before each album track listing.
    pub album_delay: Duration,
}

impl TraversalConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.collection.max_depth,
            artist_delay: config.pacing.artist_delay(),
            album_delay: config.pacing.album_delay(),
        }
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPhase {
    Idle,
    LevelInProgress(usize),
    LevelComplete(usize),
    Done,
}

/// Which fetch failed for an artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Profile,
    Collaborations,
}

#[derive(Debug, Clone)]
pub struct ArtistFailure {
    pub id: ArtistId,
    pub depth: usize,
    pub stage: FailureStage,
    pub error: String,
}

#[derive(Debug, Default, Clone)]
pub struct TraversalReport {
    /// Levels whose queue was processed.
    pub levels_run: usize,
    /// Artists fully processed this run.
    pub processed: usize,
    /// Queue entries skipped because they were already visited or had failed.
    pub skipped: usize,
    pub failures: Vec<ArtistFailure>,
    /// Size of the deduplicated frontier left when the depth cap was reached.
    pub unexpanded: usize,
}

/// Result of processing one queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistOutcome {
    Processed { pairs: usize },
    Skipped,
}

pub struct TraversalEngine<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
    config: TraversalConfig,
    state: CollectionState,
    phase: TraversalPhase,
    report: TraversalReport,
}

impl<'a, S: MetadataSource + ?Sized> TraversalEngine<'a, S> {
    pub fn new(source: &'a S, config: TraversalConfig) -> Self {
        Self::with_state(source, config, CollectionState::new())
    }

    pub fn with_state(source: &'a S, config: TraversalConfig, state: CollectionState) -> Self {
        Self {
            source,
            config,
            state,
            phase: TraversalPhase::Idle,
            report: TraversalReport::default(),
        }
    }

    pub fn phase(&self) -> TraversalPhase {
        self.phase
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn report(&self) -> &TraversalReport {
        &self.report
    }

    pub fn into_parts(self) -> (CollectionState, TraversalReport) {
        (self.state, self.report)
    }

    /// Expands from `seeds` until the depth cap is reached or the frontier is empty.
    pub async fn run(&mut self, seeds: Vec<ArtistId>) {
        if self.phase != TraversalPhase::Idle {
            logger::warn("Traversal already ran; ignoring second run request");
            return;
        }

        logger::info(&format!(
            "Starting collection from {} seeds with max depth {}",
            seeds.len(),
            self.config.max_depth
        ));

        let mut queue = dedup_preserving_order(seeds);
        for depth in 0..self.config.max_depth {
            if queue.is_empty() {
                break;
            }
            self.phase = TraversalPhase::LevelInProgress(depth);
            logger::info(&format!(
                "Level {}: {} artists queued",
                depth + 1,
                queue.len()
            ));

            let next = self.run_level(depth, &queue).await;

            self.phase = TraversalPhase::LevelComplete(depth);
            self.report.levels_run += 1;
            queue = dedup_preserving_order(next);

            logger::info(&format!(
                "Level {} complete: {} artists visited, {} edges, {} discovered for next level",
                depth + 1,
                self.state.visited.len(),
                self.state.edges.len(),
                queue.len()
            ));
        }

        self.report.unexpanded = queue.len();
        self.phase = TraversalPhase::Done;
    }

    /// Processes one level's queue and returns the raw next-level queue.
    async fn run_level(&mut self, depth: usize, queue: &[ArtistId]) -> Vec<ArtistId> {
        let mut next = Vec::new();
        for id in queue {
            match self.process_artist(id, depth, &mut next).await {
                Ok(ArtistOutcome::Processed { .. }) => {
                    self.report.processed += 1;
                    if !self.config.artist_delay.is_zero() {
                        sleep(self.config.artist_delay).await;
                    }
                }
                Ok(ArtistOutcome::Skipped) => self.report.skipped += 1,
                Err(failure) => {
                    logger::warn(&format!(
                        "Skipping {} at level {} ({:?} fetch failed): {}",
                        failure.id,
                        depth + 1,
                        failure.stage,
                        failure.error
                    ));
                    self.state.failed.insert(failure.id.clone());
                    self.report.failures.push(failure);
                }
            }
        }
        next
    }

    /// Processes a single artist, appending unvisited collaborators to `next`.
    pub async fn process_artist(
        &mut self,
        id: &ArtistId,
        depth: usize,
        next: &mut Vec<ArtistId>,
    ) -> Result<ArtistOutcome, ArtistFailure> {
        if self.state.is_visited(id) || self.state.failed.contains(id) {
            return Ok(ArtistOutcome::Skipped);
        }

        let fail = |stage: FailureStage, err: CollabError| ArtistFailure {
            id: id.clone(),
            depth,
            stage,
            error: err.to_string(),
        };

        if !self.state.nodes.contains_key(id) {
            let profile = self
                .source
                .fetch_artist(id)
                .await
                .map_err(|e| fail(FailureStage::Profile, e))?;
            self.state.nodes.insert(id.clone(), profile);
        }

        let pairs = collect_collaborations(self.source, id, self.config.album_delay)
            .await
            .map_err(|e| fail(FailureStage::Collaborations, e))?;

        for pair in &pairs {
            self.state.edges.increment(pair.clone());
            for endpoint in pair.endpoints() {
                if endpoint != id && !self.state.is_visited(endpoint) {
                    next.push(endpoint.clone());
                }
            }
        }

        self.state.visited.insert(id.clone());

        let name = self
            .state
            .nodes
            .get(id)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        logger::info(&format!(
            "Processed: {} ({} collaborations)",
            name,
            pairs.len()
        ));

        Ok(ArtistOutcome::Processed { pairs: pairs.len() })
    }
}
