//! Step Engine
//!
//! One `run_step` call advances every agent once, in roster insertion
//! order. The sweep is sequential by contract: each agent's force
//! computation and spacing check read the positions already committed by
//! agents earlier in the same step. Per agent the pipeline is: raw force
//! vector, cap to `max_step_size`, spacing check (silent rejection),
//! boundary projection, commit, bounding-box clamp.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

use super::forces::{AgentState, ForceModel};
use crate::boundary::SimBoundary;
use crate::components::{AgentRoster, GroupMembership, Position};
use crate::config::SimConfig;

/// Outcome counts for one step, for driver reporting.
///
/// `moved` counts committed agents, including projected ones; `rejected`
/// counts agents left stationary by the spacing constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub moved: usize,
    pub rejected: usize,
    pub projected: usize,
}

/// Advances the simulation by one step.
///
/// Processes agents in roster insertion order; later agents observe the
/// moves committed earlier in the same step. Runs no convergence test --
/// the caller decides how many steps to take.
pub fn run_step(world: &mut World, rng: &mut SmallRng) -> StepReport {
    let roster_entries: Vec<(crate::components::AgentId, Entity)> = world
        .resource::<AgentRoster>()
        .iter()
        .map(|e| (e.agent_id.clone(), e.entity))
        .collect();

    let mut agents: Vec<AgentState> = Vec::with_capacity(roster_entries.len());
    let mut entities: Vec<Entity> = Vec::with_capacity(roster_entries.len());
    for (agent_id, entity) in &roster_entries {
        let Some(membership) = world.get::<GroupMembership>(*entity) else {
            continue;
        };
        let Some(position) = world.get::<Position>(*entity) else {
            continue;
        };
        agents.push(AgentState {
            agent_id: agent_id.clone(),
            group_index: membership.group_index,
            position: position.coord(),
        });
        entities.push(*entity);
    }

    let config = world.resource::<SimConfig>();
    let min_distance = config.movement.min_distance;
    let max_step_size = config.movement.max_step_size;
    let model = world.resource::<ForceModel>();
    let geometry = &world.resource::<SimBoundary>().geometry;
    let centroid = geometry.centroid();
    let bounds = geometry.bounds();

    let mut report = StepReport::default();
    for i in 0..agents.len() {
        let vector = model.net_displacement(i, &agents, centroid, rng);
        let position = agents[i].position;

        let mut proposed = position + vector;
        let displacement = vector.x.hypot(vector.y);
        if displacement > max_step_size {
            proposed = position + vector * (max_step_size / displacement);
        }

        let focal_id = agents[i].agent_id.clone();
        let too_close = agents.iter().any(|other| {
            other.agent_id != focal_id
                && (proposed.x - other.position.x).hypot(proposed.y - other.position.y)
                    < min_distance
        });
        if too_close {
            report.rejected += 1;
            tracing::debug!(agent = %focal_id.0, "move rejected by spacing constraint");
            continue;
        }

        let mut committed = proposed;
        if !geometry.contains(committed) {
            committed = geometry.project_to_boundary(committed);
            report.projected += 1;
            tracing::debug!(agent = %focal_id.0, "proposal projected back onto the boundary");
        }

        // Clamp into the bounding box as a last resort. For concave
        // boundaries the box is larger than the polygon, so this alone
        // does not guarantee containment; see DESIGN.md before changing.
        committed.x = committed.x.clamp(bounds.min().x, bounds.max().x);
        committed.y = committed.y.clamp(bounds.min().y, bounds.max().y);

        agents[i].position = committed;
        report.moved += 1;
    }

    for (agent, entity) in agents.iter().zip(&entities) {
        if let Some(mut position) = world.get_mut::<Position>(*entity) {
            position.x = agent.position.x;
            position.y = agent.position.y;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryGeometry;
    use crate::components::{Agent, AgentId};
    use crate::config::GroupConfig;
    use geo::{LineString, Polygon};
    use rand::SeedableRng;

    fn unit_square() -> BoundaryGeometry {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        );
        BoundaryGeometry::new(polygon).unwrap()
    }

    fn quiet_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.groups = vec![
            GroupConfig {
                name: "majority".to_string(),
                population: 2,
            },
            GroupConfig {
                name: "minority".to_string(),
                population: 1,
            },
        ];
        config.movement.min_distance = 0.0;
        config.forces.noise_std = 0.0;
        config
    }

    /// Spawns agents at fixed positions, bypassing the sampler.
    fn fixed_world(
        config: SimConfig,
        geometry: BoundaryGeometry,
        agents: &[(&str, &str, f64, f64)],
    ) -> World {
        let mut world = World::new();
        let mut roster = AgentRoster::new();
        for (id, group, x, y) in agents {
            let group_index = config.group_index(group).unwrap();
            let entity = world
                .spawn((
                    Agent,
                    AgentId(id.to_string()),
                    GroupMembership {
                        group: group.to_string(),
                        group_index,
                    },
                    Position::new(*x, *y),
                ))
                .id();
            roster.push(AgentId(id.to_string()), entity);
        }
        world.insert_resource(roster);
        world.insert_resource(ForceModel::from_config(&config).unwrap());
        world.insert_resource(SimBoundary {
            name: "square_district".to_string(),
            geometry,
        });
        world.insert_resource(config);
        world
    }

    fn position_of(world: &World, id: &str) -> Position {
        let roster = world.resource::<AgentRoster>();
        let entity = roster.entity_of(&AgentId(id.to_string())).unwrap();
        *world.get::<Position>(entity).unwrap()
    }

    #[test]
    fn test_lone_agent_at_centroid_stays_put() {
        let mut world = fixed_world(
            quiet_config(),
            unit_square(),
            &[("agent_majority_0000", "majority", 0.5, 0.5)],
        );
        let mut rng = SmallRng::seed_from_u64(1);
        let report = run_step(&mut world, &mut rng);
        assert_eq!(
            report,
            StepReport {
                moved: 1,
                rejected: 0,
                projected: 0
            }
        );
        assert_eq!(position_of(&world, "agent_majority_0000"), Position::new(0.5, 0.5));
    }

    #[test]
    fn test_repulsion_projects_back_onto_boundary() {
        // The majority agent is repelled past the right edge by the
        // nearby minority agent; the proposal is pulled back onto the
        // exterior ring.
        let mut config = quiet_config();
        config.movement.max_step_size = 0.3;
        let mut world = fixed_world(
            config,
            unit_square(),
            &[
                ("agent_majority_0000", "majority", 0.9, 0.5),
                ("agent_minority_0000", "minority", 0.85, 0.5),
            ],
        );
        let mut rng = SmallRng::seed_from_u64(1);
        let report = run_step(&mut world, &mut rng);
        assert_eq!(report.projected, 1);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.moved, 2);

        let majority = position_of(&world, "agent_majority_0000");
        assert!((majority.x - 1.0).abs() < 1e-12);
        assert!((majority.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_committed_positions_stay_in_bounding_box() {
        let mut config = quiet_config();
        config.forces.noise_std = 0.05;
        let mut world = fixed_world(
            config,
            unit_square(),
            &[
                ("agent_majority_0000", "majority", 0.45, 0.5),
                ("agent_majority_0001", "majority", 0.55, 0.5),
                ("agent_minority_0000", "minority", 0.5, 0.45),
            ],
        );
        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..20 {
            run_step(&mut world, &mut rng);
        }
        for id in [
            "agent_majority_0000",
            "agent_majority_0001",
            "agent_minority_0000",
        ] {
            let position = position_of(&world, id);
            assert!((0.0..=1.0).contains(&position.x));
            assert!((0.0..=1.0).contains(&position.y));
        }
    }
}
