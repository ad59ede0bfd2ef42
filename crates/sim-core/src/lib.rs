//! Residential Sorting Simulation Engine
//!
//! Public API for the simulation engine: agent groups placed inside a
//! polygonal district move step-by-step under group-dependent
//! attraction/repulsion forces, a centering bias toward the district
//! centroid, and Gaussian noise, constrained by the district boundary and
//! a minimum inter-agent spacing preference.
//!
//! The per-step update is strictly sequential and order-dependent (a
//! Gauss-Seidel style sweep over the agent roster); see
//! [`components::AgentRoster`] for the ordering contract and
//! [`systems::run_step`] for the step pipeline.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod boundary;
pub mod components;
pub mod config;
pub mod output;
pub mod provider;
pub mod setup;
pub mod systems;

pub use boundary::{BoundaryGeometry, InvalidBoundary, SimBoundary};
pub use components::*;
pub use config::{ConfigError, SimConfig};
pub use provider::{BoundaryProvider, BoundarySelection, BuiltinBoundaries, ProviderError};
pub use setup::{build_world, spawn_summary, PlacementFailure, SetupError, SpawnSummary};
pub use systems::{run_step, ForceModel, StepReport};

/// Seeded random number generator resource.
///
/// The single source of randomness for population sampling and force
/// noise. Seeding it and fixing the configuration makes whole-run
/// trajectories bit-reproducible.
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
