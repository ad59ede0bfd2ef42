//! Shared snapshot types for the residential sorting simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine serializes one [`StepSnapshot`] after population and after
//! every step; renderer/reporter tools deserialize them from JSON without
//! depending on the engine itself.

pub mod snapshot;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use snapshot::{
    generate_snapshot_id, AgentPoint, BoundaryInfo, BoundsSnapshot, StepSnapshot,
};
