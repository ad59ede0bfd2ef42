//! Agent Components
//!
//! Components for individual agents: identity, group, and position.

use bevy_ecs::prelude::*;
use geo::{coord, Coord};
use serde::{Deserialize, Serialize};

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Unique identifier for an agent - fixed at creation
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// Group an agent belongs to - fixed at creation
#[derive(Component, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    /// Group label as configured (e.g. "majority").
    pub group: String,
    /// Dense index into the configured group table; used to look up
    /// pair coefficients without string comparisons.
    pub group_index: usize,
}

/// An agent's position, rewritten in place each step.
///
/// Coordinates share the boundary polygon's reference system.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The position as a geometry coordinate.
    pub fn coord(&self) -> Coord<f64> {
        coord! { x: self.x, y: self.y }
    }
}

impl From<Coord<f64>> for Position {
    fn from(c: Coord<f64>) -> Self {
        Self { x: c.x, y: c.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_coord_round_trip() {
        let position = Position::new(0.25, -1.5);
        let back = Position::from(position.coord());
        assert_eq!(back, position);
    }
}
