use clap::{Parser, Subcommand};
use collab_graph::config::load_config;
use collab_graph::logger::{self, StdoutLogger, init_logger};
use collab_graph::metadata::SpotifyClient;
use collab_graph::pipeline::{
    run_collection, run_country_graph, run_map_genres, run_resolve_seeds,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "collab-graph")]
#[command(about = "Artist collaboration graph collector", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl collaborations from the seed artists and write nodes.csv / edges.csv
    Collect {
        #[arg(long, default_value = "seeds.txt")]
        seeds: PathBuf,
        /// Directory for the node and edge tables
        #[arg(long, default_value = "data/raw")]
        output: PathBuf,
        #[arg(long)]
        max_depth: Option<usize>,
        #[arg(long)]
        batch_size: Option<usize>,
        /// Pause between artists, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Build a seed file from a list of raw artist ids
    ResolveSeeds {
        #[arg(long)]
        ids: PathBuf,
        #[arg(long, default_value = "seeds.txt")]
        output: PathBuf,
    },
    /// Add a macro-genre column to a node table
    MapGenres {
        #[arg(long)]
        nodes: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Aggregate an edge table into a country collaboration graph
    CountryGraph {
        #[arg(long)]
        nationalities: PathBuf,
        #[arg(long)]
        edges: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    init_logger(StdoutLogger::new(config.logging.min_level()));

    match cli.command {
        Commands::Collect {
            seeds,
            output,
            max_depth,
            batch_size,
            delay_ms,
        } => {
            if let Some(depth) = max_depth {
                config.collection.max_depth = depth;
            }
            if let Some(size) = batch_size {
                config.collection.batch_size = size;
            }
            if let Some(delay) = delay_ms {
                config.pacing.artist_delay_ms = delay;
            }
            config.validate()?;

            let client = SpotifyClient::from_env(&config.api, config.collection.page_size)?;
            let summary = run_collection(&client, &config, &seeds, &output).await?;
            if !summary.traversal.failures.is_empty() {
                logger::warn(&format!(
                    "{} artists were skipped after failed fetches",
                    summary.traversal.failures.len()
                ));
            }
        }
        Commands::ResolveSeeds { ids, output } => {
            config.validate()?;
            let client = SpotifyClient::from_env(&config.api, config.collection.page_size)?;
            run_resolve_seeds(&client, &ids, &output).await?;
        }
        Commands::MapGenres { nodes, output } => {
            run_map_genres(&nodes, &output)?;
        }
        Commands::CountryGraph {
            nationalities,
            edges,
            output,
        } => {
            run_country_graph(&nationalities, &edges, &output)?;
        }
    }

    logger::flush();
    Ok(())
}
