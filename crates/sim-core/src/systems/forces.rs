//! Force Field
//!
//! Computes the raw, uncapped displacement vector for one focal agent:
//! an inverse-square group-pair term per neighbor, one 2-D Gaussian noise
//! draw per neighbor visited, and a centripetal pull toward the district
//! centroid. Capping and constraint resolution happen in
//! [`super::step`], not here.

use bevy_ecs::prelude::*;
use geo::{coord, Coord};
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};

use crate::components::AgentId;
use crate::config::{ConfigError, SimConfig};

/// Singularity guard added to the squared distance in the inverse-square
/// effect.
pub const EFFECT_EPSILON: f64 = 1e-6;

/// One agent's state as seen by the force field during a step.
///
/// The step engine keeps these current as it commits moves, so later
/// agents in the same step observe earlier agents' new positions.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub agent_id: AgentId,
    pub group_index: usize,
    pub position: Coord<f64>,
}

/// Precomputed force parameters for a run.
#[derive(Resource, Debug, Clone)]
pub struct ForceModel {
    /// Dense row-major N×N matrix of ordered (focal, other) coefficients.
    matrix: Vec<f64>,
    group_count: usize,
    centering_strength: f64,
    noise: Normal<f64>,
}

impl ForceModel {
    /// Builds the coefficient matrix and noise distribution from the
    /// configuration. Pairs not listed contribute 0.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        let group_count = config.groups.len();
        let mut matrix = vec![0.0; group_count * group_count];
        for pair in &config.forces.pairs {
            let focal = config.group_index(&pair.focal).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown focal group '{}'", pair.focal))
            })?;
            let other = config.group_index(&pair.other).ok_or_else(|| {
                ConfigError::Invalid(format!("unknown other group '{}'", pair.other))
            })?;
            matrix[focal * group_count + other] = pair.coefficient;
        }
        let noise = Normal::new(0.0, config.forces.noise_std)
            .map_err(|e| ConfigError::Invalid(format!("bad noise_std: {}", e)))?;
        Ok(Self {
            matrix,
            group_count,
            centering_strength: config.forces.centering_strength,
            noise,
        })
    }

    /// Coefficient applied to the focal agent for one neighbor.
    pub fn pair_coefficient(&self, focal: usize, other: usize) -> f64 {
        self.matrix[focal * self.group_count + other]
    }

    /// Raw displacement vector for the agent at `focal`, summed over every
    /// other agent plus the centering term toward `centroid`.
    ///
    /// Neighbors are identified by stable agent id, never by slot. An
    /// exactly coincident neighbor is skipped entirely: no directional
    /// term and no noise draw. Every visited neighbor contributes one
    /// independent 2-D Gaussian draw, so noise variance grows with
    /// population size.
    pub fn net_displacement(
        &self,
        focal: usize,
        agents: &[AgentState],
        centroid: Coord<f64>,
        rng: &mut SmallRng,
    ) -> Coord<f64> {
        let focal_agent = &agents[focal];
        let mut vector = coord! { x: 0.0, y: 0.0 };

        for other in agents {
            if other.agent_id == focal_agent.agent_id {
                continue;
            }
            let offset = other.position - focal_agent.position;
            let distance = offset.x.hypot(offset.y);
            if distance == 0.0 {
                continue;
            }
            let direction = offset / distance;
            let effect = 1.0 / (distance * distance + EFFECT_EPSILON);
            let coefficient = self.pair_coefficient(focal_agent.group_index, other.group_index);
            vector = vector + direction * (coefficient * effect);

            vector.x += self.noise.sample(rng);
            vector.y += self.noise.sample(rng);
        }

        let offset = centroid - focal_agent.position;
        let distance = offset.x.hypot(offset.y);
        if distance == 0.0 {
            return vector;
        }
        let direction = offset / distance;
        let effect = 1.0 / (distance * distance + EFFECT_EPSILON);
        vector + direction * (self.centering_strength * effect)
    }
}
