//! World Setup
//!
//! World construction and agent population.

pub mod population;

pub use population::{
    build_world, sample_position, spawn_population, spawn_summary, PlacementFailure, SetupError,
    SpawnSummary,
};
