//! Agent Roster
//!
//! The ordered population of a run. Insertion order is a contract, not an
//! accident: [`crate::systems::run_step`] processes agents in exactly this
//! order, and each agent's move reads the positions already committed by
//! agents earlier in the same step (a sequential Gauss-Seidel sweep, not a
//! synchronous batch). Reordering the roster therefore changes
//! trajectories.
//!
//! The roster is fixed after population: agents are never added or
//! removed during a run.

use bevy_ecs::prelude::*;

use super::agent::AgentId;

/// One roster slot: a stable agent id and its entity.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub agent_id: AgentId,
    pub entity: Entity,
}

/// Ordered mapping from agent id to entity, in insertion order.
#[derive(Resource, Debug, Clone, Default)]
pub struct AgentRoster {
    entries: Vec<RosterEntry>,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an agent; position in the roster is permanent.
    pub fn push(&mut self, agent_id: AgentId, entity: Entity) {
        self.entries.push(RosterEntry { agent_id, entity });
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }

    /// Looks up the entity for an agent id.
    pub fn entity_of(&self, agent_id: &AgentId) -> Option<Entity> {
        self.entries
            .iter()
            .find(|e| &e.agent_id == agent_id)
            .map(|e| e.entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
