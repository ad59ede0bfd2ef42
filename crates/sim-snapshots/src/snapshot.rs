//! Snapshot Types
//!
//! Serialization structs for per-step simulation snapshots.
//!
//! A snapshot captures every agent's position at a point in the run, in
//! the engine's update order. Agent order is meaningful: index i in
//! [`StepSnapshot::agents`] is the i-th agent processed each step, so
//! downstream tools can correlate agents across snapshots by index as
//! well as by id.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Axis-aligned bounding box of the boundary polygon.
///
/// Renderers use this to fix plot limits across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsSnapshot {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Identifying information for the boundary the run was constrained by.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryInfo {
    /// Name the boundary was selected by.
    pub name: String,
    #[serde(default)]
    pub bounds: BoundsSnapshot,
}

/// One agent's state at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPoint {
    pub agent_id: String,
    /// Group label (e.g. "majority", "minority").
    pub group: String,
    pub x: f64,
    pub y: f64,
}

/// Complete state of the simulation after one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub snapshot_id: String,
    /// Step this snapshot was taken after; 0 is the initial population.
    pub step: u64,
    /// What caused this snapshot ("population", "periodic", "run_end").
    pub triggered_by: String,
    #[serde(default)]
    pub boundary: BoundaryInfo,
    /// Agents in update order.
    pub agents: Vec<AgentPoint>,
}

impl StepSnapshot {
    /// Creates an empty snapshot shell for the given step.
    pub fn new(snapshot_id: impl Into<String>, step: u64, triggered_by: impl Into<String>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            step,
            triggered_by: triggered_by.into(),
            boundary: BoundaryInfo::default(),
            agents: Vec::new(),
        }
    }

    /// Number of agents whose group label matches `group`.
    pub fn group_count(&self, group: &str) -> usize {
        self.agents.iter().filter(|a| a.group == group).count()
    }

    /// Serializes to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
