//! End-to-end runs behind each CLI command.

use crate::analysis::countries::{NationalityRow, build_country_graph};
use crate::analysis::genres::{map_nodes, mapped_genre_counts};
use crate::config::Config;
use crate::dataset::reader::{read_edges, read_nodes, read_rows};
use crate::dataset::writer::{DatasetSummary, EDGES_FILE, NODES_FILE, write_dataset, write_rows};
use crate::error::CollabResult;
use crate::graph::resolver::{MissingProfileResolver, ResolveReport};
use crate::graph::traversal::{TraversalConfig, TraversalEngine, TraversalReport};
use crate::logger;
use crate::metadata::source::MetadataSource;
use crate::seeds::{load_raw_ids, load_seeds, resolve_seeds, write_seeds};
use std::path::Path;

#[derive(Debug, Default)]
pub struct CollectionSummary {
    pub seeds: usize,
    pub traversal: TraversalReport,
    pub resolve: ResolveReport,
    /// `None` when there was nothing to collect.
    pub dataset: Option<DatasetSummary>,
}

/// Seeds, traversal, missing-profile resolution, then the node and edge tables.
///
/// Seed file problems abort before any request. Per-artist failures are
/// only reported.
pub async fn run_collection<S>(
    source: &S,
    config: &Config,
    seeds_path: &Path,
    output_dir: &Path,
) -> CollabResult<CollectionSummary>
where
    S: MetadataSource + ?Sized,
{
    config.validate()?;
    let seeds = load_seeds(seeds_path)?;
    if seeds.is_empty() {
        logger::warn(&format!(
            "No seeds found in {}; nothing to collect",
            seeds_path.display()
        ));
        return Ok(CollectionSummary::default());
    }

    let seed_ids = seeds.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
    let mut engine = TraversalEngine::new(source, TraversalConfig::from_config(config));
    engine.run(seed_ids).await;
    let (mut state, traversal) = engine.into_parts();

    let resolver = MissingProfileResolver::new(
        source,
        config.collection.batch_size,
        config.pacing.batch_delay(),
    );
    let resolve = resolver.resolve(&mut state).await;

    let dataset = write_dataset(output_dir, &state)?;

    logger::info(&format!(
        "Collection finished: {} artists processed, {} failed, {} nodes, {} edges",
        traversal.processed,
        traversal.failures.len(),
        dataset.node_count,
        dataset.edge_count
    ));

    Ok(CollectionSummary {
        seeds: seeds.len(),
        traversal,
        resolve,
        dataset: Some(dataset),
    })
}

/// Builds a seed file from a list of raw ids. Returns the number of entries written.
pub async fn run_resolve_seeds<S>(source: &S, ids_path: &Path, output: &Path) -> CollabResult<usize>
where
    S: MetadataSource + ?Sized,
{
    let ids = load_raw_ids(ids_path)?;
    let entries = resolve_seeds(source, &ids).await;
    write_seeds(output, &entries)?;
    logger::info(&format!(
        "Wrote {} of {} seeds to {}",
        entries.len(),
        ids.len(),
        output.display()
    ));
    Ok(entries.len())
}

/// Adds the macro-genre column to a node table.
pub fn run_map_genres(nodes_path: &Path, output: &Path) -> CollabResult<usize> {
    let rows = map_nodes(read_nodes(nodes_path)?);
    write_rows(output, &rows)?;

    let with_mapping = rows.iter().filter(|r| !r.genres_mapped.is_empty()).count();
    logger::info(&format!(
        "Mapped genres for {}/{} artists into {}",
        with_mapping,
        rows.len(),
        output.display()
    ));
    for (genre, count) in mapped_genre_counts(&rows).into_iter().take(20) {
        logger::info(&format!("  {}: {}", genre, count));
    }
    Ok(rows.len())
}

/// Writes the country graph tables into `output_dir`.
pub fn run_country_graph(
    nationalities_path: &Path,
    edges_path: &Path,
    output_dir: &Path,
) -> CollabResult<DatasetSummary> {
    let nationalities: Vec<NationalityRow> = read_rows(nationalities_path)?;
    let edges = read_edges(edges_path)?;
    let graph = build_country_graph(&nationalities, &edges);

    let nodes_path = output_dir.join(NODES_FILE);
    let edges_path = output_dir.join(EDGES_FILE);
    write_rows(&nodes_path, &graph.nodes)?;
    write_rows(&edges_path, &graph.edges)?;

    logger::info(&format!(
        "Country graph: {} countries, {} links, total weight {}",
        graph.nodes.len(),
        graph.edges.len(),
        graph.total_weight()
    ));

    Ok(DatasetSummary {
        nodes_path,
        edges_path,
        node_count: graph.nodes.len(),
        edge_count: graph.edges.len(),
    })
}
