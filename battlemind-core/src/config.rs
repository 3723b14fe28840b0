//! Configuration for the battlemind decision engine.
//!
//! Every tunable that shapes play lives here and loads from TOML, so a
//! personality can be retuned without recompiling. Defaults reproduce the
//! competitive baseline agent.

use serde::{Deserialize, Serialize};

use crate::error::{MindError, Result};

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindConfig {
    /// Goal and action selection tunables.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Drive evaluator tunables.
    #[serde(default)]
    pub drives: DriveConfig,
    /// Type-effectiveness reasoning tunables.
    #[serde(default)]
    pub efficacy: EfficacyConfig,
    /// Assumptions about the opponent's hidden roster.
    #[serde(default)]
    pub opponent: OpponentConfig,
}

impl MindConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`MindError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| MindError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// Stochastic selection tunables for goals and actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Boltzmann temperature for goal selection. Low temperature keeps the
    /// choice close to argmax while preserving genuine randomness.
    #[serde(default = "default_goal_temperature")]
    pub goal_temperature: f64,
    /// Activation below which a goal cannot be chosen at all.
    #[serde(default = "default_activation_threshold")]
    pub goal_threshold: f64,
    /// A previously selected goal is retained until its own activation
    /// drops to or below this value, even when sampling picks a rival.
    #[serde(default = "default_stickiness_threshold")]
    pub stickiness_threshold: f64,
    /// Boltzmann temperature for the final action pick.
    #[serde(default = "default_action_temperature")]
    pub action_temperature: f64,
    /// Weight below which a candidate action is dropped before the pick.
    #[serde(default = "default_activation_threshold")]
    pub action_threshold: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            goal_temperature: default_goal_temperature(),
            goal_threshold: default_activation_threshold(),
            stickiness_threshold: default_stickiness_threshold(),
            action_temperature: default_action_temperature(),
            action_threshold: default_activation_threshold(),
        }
    }
}

/// Drive evaluator tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// HP fraction the keep-healthy drive peaks at.
    #[serde(default = "default_healthy_target")]
    pub healthy_target: f64,
    /// Width (σ) of the keep-healthy Gaussian.
    #[serde(default = "default_healthy_sigma")]
    pub healthy_sigma: f64,
    /// Fixed strength of the prevent-type-disadvantage drive.
    #[serde(default = "default_type_disadvantage_strength")]
    pub prevent_type_disadvantage: f64,
    /// Fixed strength of the have-super-effective-move-available drive.
    #[serde(default = "default_super_effective_strength")]
    pub have_super_effective_move: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            healthy_target: default_healthy_target(),
            healthy_sigma: default_healthy_sigma(),
            prevent_type_disadvantage: default_type_disadvantage_strength(),
            have_super_effective_move: default_super_effective_strength(),
        }
    }
}

/// Type-effectiveness reasoning tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficacyConfig {
    /// Minimum damage multiplier for a move or switch to count as
    /// meaningfully effective.
    #[serde(default = "default_effective_threshold")]
    pub effective_threshold: f64,
}

impl Default for EfficacyConfig {
    fn default() -> Self {
        Self {
            effective_threshold: default_effective_threshold(),
        }
    }
}

/// Assumptions about the parts of the opponent's roster we cannot see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentConfig {
    /// Roster size the format guarantees; unseen slots are assumed alive.
    #[serde(default = "default_team_size")]
    pub assumed_team_size: u32,
    /// Move slots per creature the format guarantees.
    #[serde(default = "default_moves_per_pokemon")]
    pub assumed_moves_per_pokemon: u32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            assumed_team_size: default_team_size(),
            assumed_moves_per_pokemon: default_moves_per_pokemon(),
        }
    }
}

fn default_goal_temperature() -> f64 {
    0.05
}

fn default_action_temperature() -> f64 {
    0.2
}

fn default_activation_threshold() -> f64 {
    0.001
}

fn default_stickiness_threshold() -> f64 {
    1.0
}

fn default_healthy_target() -> f64 {
    0.8
}

fn default_healthy_sigma() -> f64 {
    0.15
}

fn default_type_disadvantage_strength() -> f64 {
    2.5
}

fn default_super_effective_strength() -> f64 {
    1.0
}

fn default_effective_threshold() -> f64 {
    0.9
}

fn default_team_size() -> u32 {
    6
}

fn default_moves_per_pokemon() -> u32 {
    4
}
