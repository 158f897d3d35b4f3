use crate::graph::pairs::CollaborationPair;
use crate::graph::traversal::{
    ArtistOutcome, CollectionState, FailureStage, TraversalConfig, TraversalEngine,
    TraversalPhase,
};
use crate::metadata::types::ArtistId;
use crate::test_utilities::{Call, FakeSource, track};
use std::time::Duration;

fn config(max_depth: usize) -> TraversalConfig {
    TraversalConfig {
        max_depth,
        artist_delay: Duration::ZERO,
        album_delay: Duration::ZERO,
    }
}

fn id(s: &str) -> ArtistId {
    ArtistId::from(s)
}

fn pair(a: &str, b: &str) -> CollaborationPair {
    CollaborationPair::new(id(a), id(b)).unwrap()
}

/// X has two tracks: [X, Y] and [X, Y, Z].
fn xyz_source() -> FakeSource {
    FakeSource::new()
        .with_artist("x", "X")
        .with_artist("y", "Y")
        .with_artist("z", "Z")
        .with_album(
            "x",
            "al1",
            vec![track("t1", &["x", "y"]), track("t2", &["x", "y", "z"])],
        )
}

#[tokio::test]
async fn single_level_scan_weights_each_pair_once() {
    let source = xyz_source();
    let mut engine = TraversalEngine::new(&source, config(1));
    assert_eq!(engine.phase(), TraversalPhase::Idle);

    engine.run(vec![id("x")]).await;
    assert_eq!(engine.phase(), TraversalPhase::Done);

    let (state, report) = engine.into_parts();
    assert_eq!(state.edges.len(), 3);
    assert_eq!(state.edges.get(&pair("x", "y")), 1);
    assert_eq!(state.edges.get(&pair("x", "z")), 1);
    assert_eq!(state.edges.get(&pair("y", "z")), 1);

    // Y and Z are endpoints only; their profiles are left for the resolver.
    assert_eq!(state.nodes.keys().cloned().collect::<Vec<_>>(), vec![id("x")]);
    assert_eq!(state.missing_profiles().len(), 2);
    assert_eq!(report.levels_run, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(report.unexpanded, 2);
    assert_eq!(source.artist_calls("y"), 0);
}

#[tokio::test]
async fn second_level_counts_pairs_found_from_both_ends() {
    let source = xyz_source().with_album("y", "al2", vec![track("t9", &["y", "x"])]);
    let mut engine = TraversalEngine::new(&source, config(2));

    engine.run(vec![id("x")]).await;

    let (state, report) = engine.into_parts();
    // (x, y) surfaced by both x's and y's scans.
    assert_eq!(state.edges.get(&pair("x", "y")), 2);
    assert_eq!(state.edges.get(&pair("y", "z")), 1);
    assert!(state.visited.contains(&id("y")));
    assert!(state.visited.contains(&id("z")));
    assert_eq!(report.levels_run, 2);
    assert_eq!(report.processed, 3);
}

#[tokio::test]
async fn pre_visited_artist_is_never_fetched() {
    let source = xyz_source();
    let state = CollectionState::with_visited(vec![id("x")]);
    let mut engine = TraversalEngine::with_state(&source, config(3), state);

    engine.run(vec![id("x")]).await;

    assert!(source.calls().is_empty());
    assert!(engine.state().edges.is_empty());
    assert_eq!(engine.report().skipped, 1);
}

#[tokio::test]
async fn empty_frontier_stops_before_depth_cap() {
    let source = FakeSource::new()
        .with_artist("solo", "Solo")
        .with_album("solo", "al1", vec![track("t1", &["solo"])]);
    let mut engine = TraversalEngine::new(&source, config(5));

    engine.run(vec![id("solo")]).await;

    assert_eq!(engine.report().levels_run, 1);
    assert_eq!(engine.phase(), TraversalPhase::Done);
    assert_eq!(source.calls().len(), 3);
}

#[tokio::test]
async fn profile_failure_skips_artist_without_marking_visited() {
    let source = xyz_source()
        .failing_profile("broken")
        .with_artist("w", "W")
        .with_album("w", "al3", vec![track("t5", &["w", "v"])]);
    let mut engine = TraversalEngine::new(&source, config(1));

    engine.run(vec![id("broken"), id("w"), id("broken")]).await;

    let (state, report) = engine.into_parts();
    assert!(!state.visited.contains(&id("broken")));
    assert!(state.failed.contains(&id("broken")));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, FailureStage::Profile);
    assert_eq!(report.processed, 1);
    assert_eq!(state.edges.get(&pair("v", "w")), 1);
    // Duplicate seeds are collapsed, so the broken profile is requested once.
    assert_eq!(source.artist_calls("broken"), 1);
}

#[tokio::test]
async fn discography_failure_keeps_profile_but_not_visited() {
    let source = xyz_source().failing_discography("x");
    let mut engine = TraversalEngine::new(&source, config(1));

    engine.run(vec![id("x")]).await;

    let (state, report) = engine.into_parts();
    assert!(state.nodes.contains_key(&id("x")));
    assert!(!state.visited.contains(&id("x")));
    assert!(state.edges.is_empty());
    assert_eq!(report.failures[0].stage, FailureStage::Collaborations);
}

#[tokio::test]
async fn process_artist_queues_unvisited_endpoints_with_duplicates() {
    let source = xyz_source();
    let mut engine = TraversalEngine::new(&source, config(1));
    let mut next = Vec::new();

    let outcome = engine.process_artist(&id("x"), 0, &mut next).await.unwrap();

    assert_eq!(outcome, ArtistOutcome::Processed { pairs: 3 });
    assert!(!next.contains(&id("x")));
    assert_eq!(next.iter().filter(|a| **a == id("y")).count(), 2);
    assert_eq!(next.iter().filter(|a| **a == id("z")).count(), 2);

    let again = engine.process_artist(&id("x"), 0, &mut next).await.unwrap();
    assert_eq!(again, ArtistOutcome::Skipped);
}

#[tokio::test]
async fn cached_profile_is_not_refetched() {
    let source = xyz_source();
    let mut state = CollectionState::new();
    state
        .nodes
        .insert(id("x"), crate::test_utilities::profile("x", "Cached X"));
    let mut engine = TraversalEngine::with_state(&source, config(1), state);

    engine.run(vec![id("x")]).await;

    assert_eq!(source.artist_calls("x"), 0);
    assert_eq!(engine.state().nodes[&id("x")].name, "Cached X");
    assert_eq!(source.calls()[0], Call::Discography("x".into()));
}

#[tokio::test]
async fn empty_seed_list_finishes_immediately() {
    let source = FakeSource::new();
    let mut engine = TraversalEngine::new(&source, config(2));
    engine.run(Vec::new()).await;

    assert_eq!(engine.phase(), TraversalPhase::Done);
    assert_eq!(engine.report().levels_run, 0);
}
