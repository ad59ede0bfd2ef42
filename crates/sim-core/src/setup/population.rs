//! Agent Population
//!
//! Rejection-samples initial agent positions near the district centroid
//! and spawns one entity per agent, group by group in configuration
//! order. Initial placement enforces containment but NOT the spacing
//! constraint: two agents may legitimately start closer than
//! `min_distance`. That asymmetry is part of the model.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use thiserror::Error;

use crate::boundary::{BoundaryGeometry, SimBoundary};
use crate::components::{Agent, AgentId, AgentRoster, GroupMembership, Position};
use crate::config::{ConfigError, SimConfig};
use crate::output::SnapshotTracker;
use crate::systems::ForceModel;

/// Rejection sampling exhausted its retry budget.
///
/// The sampling window around the centroid can be a poor fit for thin or
/// highly concave boundaries (or ones whose centroid falls inside a
/// hole); the caller can recover by choosing another boundary or window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no contained position found for {agent_id} after {attempts} attempts")]
pub struct PlacementFailure {
    pub agent_id: String,
    pub attempts: u32,
}

/// Any failure while building a simulation world.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Placement(#[from] PlacementFailure),
}

/// Counts of spawned agents for driver reporting.
#[derive(Debug, Clone, Default)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub by_group: Vec<(String, usize)>,
}

/// Draws `centroid + uniform_offset(±window, ±window)` until the draw is
/// contained, up to `max_attempts`. No spacing check is applied here.
pub fn sample_position(
    geometry: &BoundaryGeometry,
    window: f64,
    max_attempts: u32,
    agent_id: &str,
    rng: &mut SmallRng,
) -> Result<Position, PlacementFailure> {
    let centroid = geometry.centroid();
    for attempt in 0..max_attempts {
        let candidate = Position::new(
            centroid.x + rng.gen_range(-window..window),
            centroid.y + rng.gen_range(-window..window),
        );
        if geometry.contains(candidate.coord()) {
            return Ok(candidate);
        }
        tracing::trace!(agent_id, attempt, "placement draw rejected");
    }
    Err(PlacementFailure {
        agent_id: agent_id.to_string(),
        attempts: max_attempts,
    })
}

/// Spawns the configured population and inserts the [`AgentRoster`].
///
/// Groups are populated in configuration order; within a group, agents
/// are numbered from zero. The resulting roster order is the per-step
/// update order for the whole run.
pub fn spawn_population(
    world: &mut World,
    geometry: &BoundaryGeometry,
    config: &SimConfig,
    rng: &mut SmallRng,
) -> Result<SpawnSummary, PlacementFailure> {
    let mut roster = AgentRoster::new();
    let mut summary = SpawnSummary::default();

    for (group_index, group) in config.groups.iter().enumerate() {
        for i in 0..group.population {
            let agent_id = format!("agent_{}_{:04}", group.name, i);
            let position = sample_position(
                geometry,
                config.placement.window,
                config.placement.max_attempts,
                &agent_id,
                rng,
            )?;
            let entity = world
                .spawn((
                    Agent,
                    AgentId(agent_id.clone()),
                    GroupMembership {
                        group: group.name.clone(),
                        group_index,
                    },
                    position,
                ))
                .id();
            roster.push(AgentId(agent_id), entity);
        }
        summary.total_agents += group.population;
        summary.by_group.push((group.name.clone(), group.population));
    }

    world.insert_resource(roster);
    Ok(summary)
}

/// Builds a ready-to-step world: validates the configuration, spawns the
/// population inside the boundary, and inserts all engine resources.
pub fn build_world(
    config: SimConfig,
    boundary: SimBoundary,
    rng: &mut SmallRng,
) -> Result<World, SetupError> {
    config.validate()?;
    let force_model = ForceModel::from_config(&config)?;

    let mut world = World::new();
    spawn_population(&mut world, &boundary.geometry, &config, rng)?;
    world.insert_resource(SnapshotTracker::new(config.simulation.snapshot_interval));
    world.insert_resource(force_model);
    world.insert_resource(boundary);
    world.insert_resource(config);
    Ok(world)
}

/// Recounts the spawned population from the world, for reporting.
pub fn spawn_summary(world: &World) -> SpawnSummary {
    let mut summary = SpawnSummary::default();
    let Some(roster) = world.get_resource::<AgentRoster>() else {
        return summary;
    };
    for entry in roster.iter() {
        let Some(membership) = world.get::<GroupMembership>(entry.entity) else {
            continue;
        };
        summary.total_agents += 1;
        match summary
            .by_group
            .iter_mut()
            .find(|(name, _)| name == &membership.group)
        {
            Some((_, count)) => *count += 1,
            None => summary.by_group.push((membership.group.clone(), 1)),
        }
    }
    summary
}
