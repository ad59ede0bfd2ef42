//! Configuration System
//!
//! Loads tuning parameters from tuning.toml for easy adjustment without
//! recompiling. Every parameter has a default carrying the original design
//! constants, so a missing file is not an error. Validation happens once,
//! up front: a configuration that passes [`SimConfig::validate`] cannot
//! fail mid-run.

use bevy_ecs::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    pub groups: Vec<GroupConfig>,
    pub movement: MovementConfig,
    pub placement: PlacementConfig,
    pub forces: ForcesConfig,
}

/// Run-length parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Number of steps to run; the engine runs exactly this many.
    pub steps: u64,
    /// Interval between snapshot emissions (in steps).
    pub snapshot_interval: u64,
}

/// One agent group and its population size
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub population: usize,
}

/// Per-step movement constraints
#[derive(Debug, Clone, Deserialize)]
pub struct MovementConfig {
    /// Minimum allowed distance between any two committed positions.
    pub min_distance: f64,
    /// Maximum displacement magnitude per step; larger proposals are
    /// rescaled to exactly this length.
    pub max_step_size: f64,
}

/// Initial placement sampling parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PlacementConfig {
    /// Half-width of the uniform sampling window around the centroid.
    pub window: f64,
    /// Retry budget per agent before placement fails.
    pub max_attempts: u32,
}

/// Force field tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ForcesConfig {
    /// Strength of the centripetal pull toward the district centroid,
    /// applied to every agent regardless of group.
    pub centering_strength: f64,
    /// Standard deviation of the per-neighbor Gaussian noise term.
    pub noise_std: f64,
    /// Ordered group-pair coefficients; pairs not listed contribute 0.
    pub pairs: Vec<PairCoefficient>,
}

/// Directional force coefficient for one ordered (focal, other) group pair
#[derive(Debug, Clone, Deserialize)]
pub struct PairCoefficient {
    pub focal: String,
    pub other: String,
    /// Positive attracts the focal agent toward the other, negative repels.
    pub coefficient: f64,
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the given path, or fall back to defaults
    /// when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Index of the named group in the group table.
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    /// Total population across all groups.
    pub fn total_population(&self) -> usize {
        self.groups.iter().map(|g| g.population).sum()
    }

    /// Fail-fast sanity checks; called once at world construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.is_empty() {
            return Err(ConfigError::Invalid("at least one group is required".into()));
        }
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(ConfigError::Invalid("group names must be non-empty".into()));
            }
            if group.population == 0 {
                return Err(ConfigError::Invalid(format!(
                    "group '{}' must have a positive population",
                    group.name
                )));
            }
        }
        for (i, group) in self.groups.iter().enumerate() {
            if self.groups[..i].iter().any(|g| g.name == group.name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate group name '{}'",
                    group.name
                )));
            }
        }
        if self.simulation.steps == 0 {
            return Err(ConfigError::Invalid("steps must be at least 1".into()));
        }
        if self.simulation.snapshot_interval == 0 {
            return Err(ConfigError::Invalid(
                "snapshot_interval must be at least 1".into(),
            ));
        }
        if !self.movement.min_distance.is_finite() || self.movement.min_distance < 0.0 {
            return Err(ConfigError::Invalid(
                "min_distance must be finite and non-negative".into(),
            ));
        }
        if !self.movement.max_step_size.is_finite() || self.movement.max_step_size <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_step_size must be finite and positive".into(),
            ));
        }
        if !self.placement.window.is_finite() || self.placement.window <= 0.0 {
            return Err(ConfigError::Invalid(
                "placement window must be finite and positive".into(),
            ));
        }
        if self.placement.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "placement max_attempts must be at least 1".into(),
            ));
        }
        if !self.forces.noise_std.is_finite() || self.forces.noise_std < 0.0 {
            return Err(ConfigError::Invalid(
                "noise_std must be finite and non-negative".into(),
            ));
        }
        if !self.forces.centering_strength.is_finite() {
            return Err(ConfigError::Invalid("centering_strength must be finite".into()));
        }
        for (i, pair) in self.forces.pairs.iter().enumerate() {
            if self.group_index(&pair.focal).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "force pair references unknown focal group '{}'",
                    pair.focal
                )));
            }
            if self.group_index(&pair.other).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "force pair references unknown other group '{}'",
                    pair.other
                )));
            }
            if !pair.coefficient.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "force pair ({}, {}) coefficient must be finite",
                    pair.focal, pair.other
                )));
            }
            if self.forces.pairs[..i]
                .iter()
                .any(|p| p.focal == pair.focal && p.other == pair.other)
            {
                return Err(ConfigError::Invalid(format!(
                    "duplicate force pair ({}, {})",
                    pair.focal, pair.other
                )));
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                steps: 10,
                snapshot_interval: 1,
            },
            groups: vec![
                GroupConfig {
                    name: "majority".to_string(),
                    population: 400,
                },
                GroupConfig {
                    name: "minority".to_string(),
                    population: 50,
                },
            ],
            movement: MovementConfig {
                min_distance: 0.1,
                max_step_size: 0.1,
            },
            placement: PlacementConfig {
                window: 0.05,
                max_attempts: 1000,
            },
            forces: ForcesConfig {
                centering_strength: 0.001,
                noise_std: 0.05,
                pairs: vec![
                    PairCoefficient {
                        focal: "majority".to_string(),
                        other: "minority".to_string(),
                        coefficient: -0.001,
                    },
                    PairCoefficient {
                        focal: "majority".to_string(),
                        other: "majority".to_string(),
                        coefficient: 0.0001,
                    },
                    PairCoefficient {
                        focal: "minority".to_string(),
                        other: "minority".to_string(),
                        coefficient: 0.0,
                    },
                    PairCoefficient {
                        focal: "minority".to_string(),
                        other: "majority".to_string(),
                        coefficient: 0.00005,
                    },
                ],
            },
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
