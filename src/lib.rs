pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod logger;
pub mod metadata;
pub mod pipeline;
pub mod seeds;
pub mod utilities;

#[cfg(test)]
mod test_utilities;
