//! Simulation Systems
//!
//! The force-field computation and the sequential per-step update engine.

pub mod forces;
pub mod step;

pub use forces::{AgentState, ForceModel, EFFECT_EPSILON};
pub use step::{run_step, StepReport};
