//! Output Generation
//!
//! Snapshot assembly and JSON file writing for the external
//! renderer/reporter.

pub mod snapshot;

pub use snapshot::{
    generate_snapshot, write_current_state, write_snapshot_to_dir, SnapshotError, SnapshotTracker,
};
