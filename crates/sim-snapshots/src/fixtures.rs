//! Sample data fixtures for testing.
//!
//! This module provides ready-made snapshot data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // sim-snapshots = { path = "../sim-snapshots", features = ["test-fixtures"] }
//!
//! use sim_snapshots::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! ```

use crate::StepSnapshot;

/// Returns a sample snapshot from the fixtures file.
///
/// Contains a unit-square boundary and four agents (three majority, one
/// minority) after one step.
pub fn sample_snapshot() -> StepSnapshot {
    let json = include_str!("../tests/fixtures/sample_snapshot.json");
    StepSnapshot::from_json(json).expect("Failed to parse sample_snapshot.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_snapshot_parses() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.step, 1);
        assert_eq!(snapshot.agents.len(), 4);
        assert_eq!(snapshot.group_count("majority"), 3);
        assert_eq!(snapshot.group_count("minority"), 1);
    }
}
