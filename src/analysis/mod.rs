//! Post-processing of the persisted tables.
//!
//! - `genres`: collapses fine-grained genres into a small set of macro genres
//! - `countries`: aggregates artist collaborations into a country graph

pub mod countries;
pub mod genres;
