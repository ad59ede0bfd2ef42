//! Snapshot Generation
//!
//! Assembles a [`StepSnapshot`] from the world after population and after
//! each step, and writes snapshots as JSON for the external renderer.
//! Agents appear in roster order, so a snapshot is also a record of the
//! engine's update order.

use bevy_ecs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use sim_snapshots::{generate_snapshot_id, AgentPoint, BoundaryInfo, BoundsSnapshot, StepSnapshot};

use crate::boundary::SimBoundary;
use crate::components::{AgentRoster, GroupMembership, Position};

/// Resource tracking snapshot ids and the emission interval.
#[derive(Resource, Debug)]
pub struct SnapshotTracker {
    next_snapshot_id: u64,
    snapshot_interval: u64,
}

impl SnapshotTracker {
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
        }
    }

    /// True when a periodic snapshot is due after `step`.
    pub fn should_snapshot(&self, step: u64) -> bool {
        step % self.snapshot_interval == 0
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Failure while serializing or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write snapshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Captures every agent's position, in roster order.
pub fn generate_snapshot(world: &mut World, step: u64, triggered_by: &str) -> StepSnapshot {
    let snapshot_id = world.resource_mut::<SnapshotTracker>().next_id();
    let mut snapshot = StepSnapshot::new(snapshot_id, step, triggered_by);

    let boundary = world.resource::<SimBoundary>();
    let bounds = boundary.geometry.bounds();
    snapshot.boundary = BoundaryInfo {
        name: boundary.name.clone(),
        bounds: BoundsSnapshot {
            min_x: bounds.min().x,
            min_y: bounds.min().y,
            max_x: bounds.max().x,
            max_y: bounds.max().y,
        },
    };

    let roster = world.resource::<AgentRoster>();
    for entry in roster.iter() {
        let Some(membership) = world.get::<GroupMembership>(entry.entity) else {
            continue;
        };
        let Some(position) = world.get::<Position>(entry.entity) else {
            continue;
        };
        snapshot.agents.push(AgentPoint {
            agent_id: entry.agent_id.0.clone(),
            group: membership.group.clone(),
            x: position.x,
            y: position.y,
        });
    }

    snapshot
}

/// Writes a snapshot to `<output_dir>/snapshots/<id>.json`.
pub fn write_snapshot_to_dir(
    snapshot: &StepSnapshot,
    output_dir: &Path,
) -> Result<PathBuf, SnapshotError> {
    let dir = output_dir.join("snapshots");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.json", snapshot.snapshot_id));
    fs::write(&path, snapshot.to_json()?)?;
    Ok(path)
}

/// Mirrors the latest snapshot to `<output_dir>/current_state.json`.
pub fn write_current_state(
    snapshot: &StepSnapshot,
    output_dir: &Path,
) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("current_state.json");
    fs::write(&path, snapshot.to_json()?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryGeometry;
    use crate::config::{GroupConfig, SimConfig};
    use crate::setup::build_world;
    use geo::{LineString, Polygon};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn test_world() -> World {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        );
        let boundary = SimBoundary {
            name: "square_district".to_string(),
            geometry: BoundaryGeometry::new(polygon).unwrap(),
        };
        let mut config = SimConfig::default();
        config.groups = vec![
            GroupConfig {
                name: "majority".to_string(),
                population: 4,
            },
            GroupConfig {
                name: "minority".to_string(),
                population: 2,
            },
        ];
        let mut rng = SmallRng::seed_from_u64(21);
        build_world(config, boundary, &mut rng).unwrap()
    }

    #[test]
    fn test_tracker_ids_and_interval() {
        let mut tracker = SnapshotTracker::new(5);
        assert!(tracker.should_snapshot(0));
        assert!(!tracker.should_snapshot(3));
        assert!(tracker.should_snapshot(10));
        assert_eq!(tracker.next_id(), "snap_000001");
        assert_eq!(tracker.next_id(), "snap_000002");
        assert_eq!(tracker.snapshot_count(), 2);
    }

    #[test]
    fn test_snapshot_matches_world() {
        let mut world = test_world();
        let snapshot = generate_snapshot(&mut world, 0, "population");

        assert_eq!(snapshot.snapshot_id, "snap_000001");
        assert_eq!(snapshot.step, 0);
        assert_eq!(snapshot.boundary.name, "square_district");
        assert_eq!(snapshot.boundary.bounds.max_x, 1.0);
        assert_eq!(snapshot.agents.len(), 6);
        assert_eq!(snapshot.group_count("majority"), 4);
        assert_eq!(snapshot.group_count("minority"), 2);
        // roster order: majority block first, then minority
        assert_eq!(snapshot.agents[0].agent_id, "agent_majority_0000");
        assert_eq!(snapshot.agents[4].agent_id, "agent_minority_0000");

        let roster = world.resource::<AgentRoster>().clone();
        for (point, entry) in snapshot.agents.iter().zip(roster.iter()) {
            let position = world.get::<Position>(entry.entity).unwrap();
            assert_eq!(point.x, position.x);
            assert_eq!(point.y, position.y);
        }
    }

    #[test]
    fn test_write_snapshot_files() {
        let mut world = test_world();
        let snapshot = generate_snapshot(&mut world, 0, "population");
        let dir = tempfile::tempdir().unwrap();

        let path = write_snapshot_to_dir(&snapshot, dir.path()).unwrap();
        assert!(path.ends_with("snapshots/snap_000001.json"));
        let parsed = StepSnapshot::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, snapshot);

        let current = write_current_state(&snapshot, dir.path()).unwrap();
        let parsed = StepSnapshot::from_json(&fs::read_to_string(&current).unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
