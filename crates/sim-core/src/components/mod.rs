//! ECS Components
//!
//! Components for individual agents and the ordered roster resource.

pub mod agent;
pub mod roster;

pub use agent::{Agent, AgentId, GroupMembership, Position};
pub use roster::{AgentRoster, RosterEntry};
