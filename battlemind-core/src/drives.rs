//! Drives — scalar competing objectives and their evaluators.
//!
//! Each evaluator is a pure function from the turn's perception to a
//! strength in [0, 5]. Evaluators must tolerate missing facts: an empty
//! group is a meaningful input (usually strength 0), never a panic.
//!
//! The configured subset of evaluators is a *personality*: an injected
//! drive → evaluator map. Drives without an evaluator read strength 0.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{DriveConfig, OpponentConfig};
use crate::fact::Fact;
use crate::perception::{Concept, Perception};

/// The fixed drive taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    /// Do not let the active creature faint.
    KeepPokemonAlive,
    /// Preserve material advantage over the opponent.
    HaveMorePokemonThanOpponent,
    /// Knock out the opponent's active creature.
    KoOpponent,
    /// Deal damage this turn.
    DoDamage,
    /// Keep the active creature near full health.
    KeepHealthy,
    /// Raise our own stats.
    BuffSelf,
    /// Lower the opponent's stats.
    DebuffOpponent,
    /// Stop the opponent from setting up.
    PreventOpponentBuff,
    /// Hold a favorable type matchup.
    KeepTypeAdvantage,
    /// Escape an unfavorable type matchup.
    PreventTypeDisadvantage,
    /// Have a super-effective move ready.
    HaveSuperEffectiveMoveAvailable,
    /// Learn what the opponent is hiding.
    RevealHiddenInformation,
}

impl Drive {
    /// Every drive, in taxonomy order.
    pub const ALL: [Drive; 12] = [
        Drive::KeepPokemonAlive,
        Drive::HaveMorePokemonThanOpponent,
        Drive::KoOpponent,
        Drive::DoDamage,
        Drive::KeepHealthy,
        Drive::BuffSelf,
        Drive::DebuffOpponent,
        Drive::PreventOpponentBuff,
        Drive::KeepTypeAdvantage,
        Drive::PreventTypeDisadvantage,
        Drive::HaveSuperEffectiveMoveAvailable,
        Drive::RevealHiddenInformation,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Drive::KeepPokemonAlive => "keep_pokemon_alive",
            Drive::HaveMorePokemonThanOpponent => "have_more_pokemon_than_opponent",
            Drive::KoOpponent => "ko_opponent",
            Drive::DoDamage => "do_damage",
            Drive::KeepHealthy => "keep_healthy",
            Drive::BuffSelf => "buff_self",
            Drive::DebuffOpponent => "debuff_opponent",
            Drive::PreventOpponentBuff => "prevent_opponent_buff",
            Drive::KeepTypeAdvantage => "keep_type_advantage",
            Drive::PreventTypeDisadvantage => "prevent_type_disadvantage",
            Drive::HaveSuperEffectiveMoveAvailable => "have_super_effective_move_available",
            Drive::RevealHiddenInformation => "reveal_hidden_information",
        }
    }
}

impl fmt::Display for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The per-turn drive-strength vector. Unlisted drives read 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveStrengths {
    strengths: HashMap<Drive, f64>,
}

impl DriveStrengths {
    /// An all-zero vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one drive's strength.
    pub fn set(&mut self, drive: Drive, strength: f64) {
        self.strengths.insert(drive, strength);
    }

    /// One drive's strength, 0.0 when unset.
    #[must_use]
    pub fn get(&self, drive: Drive) -> f64 {
        self.strengths.get(&drive).copied().unwrap_or(0.0)
    }

    /// Iterate over explicitly set (drive, strength) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Drive, f64)> + '_ {
        self.strengths.iter().map(|(d, s)| (*d, *s))
    }
}

/// A pure strength function for one drive.
pub trait DriveEvaluator: Send + Sync {
    /// Evaluate the drive against the current perception.
    ///
    /// Must return a value in [0, 5] for well-formed input and must treat
    /// empty groups as valid input rather than failing.
    fn evaluate(&self, perception: &Perception) -> f64;
}

/// Whether any damage can be dealt this turn: both sides have an active
/// creature and the server is not forcing a switch.
fn can_do_damage(perception: &Perception) -> bool {
    if perception.group(Concept::ActivePokemon).is_empty() {
        return false;
    }
    if perception.group(Concept::OpponentActivePokemon).is_empty() {
        return false;
    }
    !is_force_switch_turn(perception)
}

fn is_force_switch_turn(perception: &Perception) -> bool {
    battle_metadata(perception)
        .and_then(|metadata| metadata.flag("force_switch"))
        .unwrap_or(false)
}

fn battle_metadata(perception: &Perception) -> Option<Fact> {
    perception.group(Concept::Battle).get("metadata").cloned()
}

/// Flat 5.0 whenever damage is currently possible.
#[derive(Debug, Default)]
pub struct DoDamageEvaluator;

impl DriveEvaluator for DoDamageEvaluator {
    fn evaluate(&self, perception: &Perception) -> f64 {
        if can_do_damage(perception) { 5.0 } else { 0.0 }
    }
}

/// Rises as the opponent's active creature nears zero HP.
///
/// strength = (100 − hp%) / 20 + 0.05, clamped at 5, so a full-health
/// opponent still registers a small pull and a nearly fainted one maxes
/// the drive out.
#[derive(Debug, Default)]
pub struct KoOpponentEvaluator;

impl DriveEvaluator for KoOpponentEvaluator {
    fn evaluate(&self, perception: &Perception) -> f64 {
        if !can_do_damage(perception) {
            return 0.0;
        }
        let pool = perception.group(Concept::OpponentActivePokemon);
        let Some(opponent) = pool.only() else {
            return 0.0;
        };
        // Unreadable HP is treated as full health: keep the floor only.
        let hp_pct = opponent.number("hp_percentage").unwrap_or(100.0);
        ((100.0 - hp_pct) / 20.0 + 0.05).min(5.0)
    }
}

/// Scales with how much HP the active creature has already lost.
///
/// Clamps to 5.0 at 1 HP (one hit from fainting), floors at 0.05 near
/// full health or when HP cannot be read (never exactly 0 — total apathy
/// about survival is never correct), and reads 0 when there is no active
/// creature or no switch option exists at all.
#[derive(Debug, Default)]
pub struct KeepPokemonAliveEvaluator;

impl DriveEvaluator for KeepPokemonAliveEvaluator {
    fn evaluate(&self, perception: &Perception) -> f64 {
        let pool = perception.group(Concept::ActivePokemon);
        let Some(active) = pool.only() else {
            return 0.0;
        };
        if perception.group(Concept::AvailableSwitches).is_empty() {
            // Nowhere to retreat to; the drive has nothing to ask for.
            return 0.0;
        }

        let (Some(hp), Some(max_hp)) = (active.number("hp"), active.number("max_hp")) else {
            return 0.05;
        };
        if max_hp <= 0.0 {
            return 0.05;
        }
        if hp == 1.0 {
            return 5.0;
        }

        let deficit = 1.0 - hp / max_hp;
        if deficit <= 0.01 {
            0.05
        } else {
            deficit * 5.0
        }
    }
}

/// Gaussian-shaped preference for staying near a target HP fraction.
///
/// strength = 5 · exp(−½((x − target)/σ)²), peaking at exactly 5 when the
/// active creature sits on the target. Zero when no switches are
/// available — keeping healthy only matters if repositioning is possible.
#[derive(Debug)]
pub struct KeepHealthyEvaluator {
    target: f64,
    sigma: f64,
}

impl KeepHealthyEvaluator {
    /// Build with a target HP fraction and Gaussian width.
    #[must_use]
    pub fn new(target: f64, sigma: f64) -> Self {
        Self { target, sigma }
    }
}

impl DriveEvaluator for KeepHealthyEvaluator {
    fn evaluate(&self, perception: &Perception) -> f64 {
        let pool = perception.group(Concept::ActivePokemon);
        let Some(active) = pool.only() else {
            return 0.0;
        };
        if perception.group(Concept::AvailableSwitches).is_empty() {
            return 0.0;
        }

        let (Some(hp), Some(max_hp)) = (active.number("hp"), active.number("max_hp")) else {
            return 0.05;
        };
        if max_hp <= 0.0 {
            return 0.05;
        }

        let x = hp / max_hp;
        let z = (x - self.target) / self.sigma;
        5.0 * (-0.5 * z * z).exp()
    }
}

/// Flat 5.0 exactly when the current turn is a forced switch — type
/// positioning only matters while a switch is imminent.
#[derive(Debug, Default)]
pub struct KeepTypeAdvantageEvaluator;

impl DriveEvaluator for KeepTypeAdvantageEvaluator {
    fn evaluate(&self, perception: &Perception) -> f64 {
        if is_force_switch_turn(perception) { 5.0 } else { 0.0 }
    }
}

/// Scales with the fraction of opponent information still hidden.
///
/// Information is counted over four categories for an assumed roster of
/// `assumed_team_size`: unseen party slots, unseen move slots, unseen
/// abilities and unseen items. Fainted creatures contribute no unknowns
/// beyond their slot — their details no longer matter. An item or ability
/// revealed to be none counts as known.
#[derive(Debug)]
pub struct RevealHiddenInformationEvaluator {
    team_size: u32,
    moves_per_pokemon: u32,
}

impl RevealHiddenInformationEvaluator {
    /// Build from the opponent-roster assumptions.
    #[must_use]
    pub fn new(opponent: &OpponentConfig) -> Self {
        Self {
            team_size: opponent.assumed_team_size,
            moves_per_pokemon: opponent.assumed_moves_per_pokemon,
        }
    }
}

impl DriveEvaluator for RevealHiddenInformationEvaluator {
    fn evaluate(&self, perception: &Perception) -> f64 {
        let roster = perception.attend(&[Concept::OpponentTeam]);

        let team_size = u64::from(self.team_size);
        let moves_each = u64::from(self.moves_per_pokemon);

        let total_pokemon = team_size;
        let total_moves = team_size * moves_each;
        let total_abilities = team_size;
        let total_items = team_size;

        let revealed = roster.len() as u64;
        let unseen_slots = total_pokemon.saturating_sub(revealed);

        // Unseen party members hide everything they carry.
        let mut unknown_pokemon = unseen_slots;
        let mut unknown_moves = unseen_slots * moves_each;
        let mut unknown_abilities = unseen_slots;
        let mut unknown_items = unseen_slots;

        // Cap at the assumed size; a roster larger than assumed adds no
        // unknowns.
        unknown_pokemon = unknown_pokemon.min(total_pokemon);

        for pokemon in roster.facts() {
            if pokemon.flag("fainted").unwrap_or(false) {
                continue;
            }
            let known_moves = pokemon.texts("move").len() as u64;
            unknown_moves += moves_each.saturating_sub(known_moves);
            unknown_abilities += u64::from(attribute_is_hidden(pokemon, "ability"));
            unknown_items += u64::from(attribute_is_hidden(pokemon, "item"));
        }

        let unknown = unknown_pokemon + unknown_moves + unknown_abilities + unknown_items;
        let total = total_pokemon + total_moves + total_abilities + total_items;
        if total == 0 {
            return 0.0;
        }

        5.0 * (unknown as f64 / total as f64)
    }
}

fn attribute_is_hidden(fact: &Fact, name: &str) -> bool {
    match fact.feature(name).single() {
        Some(value) => value.is_unknown(),
        // No attribute at all is treated as hidden: the builder always
        // emits a marker for revealed-but-absent information.
        None => true,
    }
}

/// Returns a fixed configured strength. Used for drives that matter to
/// the goal bank but have no bespoke logic yet.
#[derive(Debug)]
pub struct ConstantDriveEvaluator {
    strength: f64,
}

impl ConstantDriveEvaluator {
    /// Build with the fixed strength to report.
    #[must_use]
    pub fn new(strength: f64) -> Self {
        Self { strength }
    }
}

impl DriveEvaluator for ConstantDriveEvaluator {
    fn evaluate(&self, _perception: &Perception) -> f64 {
        self.strength
    }
}

/// An injected drive → evaluator map: the agent's personality.
#[derive(Default)]
pub struct Personality {
    evaluators: HashMap<Drive, Box<dyn DriveEvaluator>>,
}

impl Personality {
    /// An empty personality. Every drive reads 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an evaluator for a drive, replacing any existing one.
    pub fn with(mut self, drive: Drive, evaluator: impl DriveEvaluator + 'static) -> Self {
        self.evaluators.insert(drive, Box::new(evaluator));
        self
    }

    /// The competitive baseline personality.
    #[must_use]
    pub fn competitive(drives: &DriveConfig, opponent: &OpponentConfig) -> Self {
        Self::new()
            .with(Drive::KeepPokemonAlive, KeepPokemonAliveEvaluator)
            .with(Drive::KoOpponent, KoOpponentEvaluator)
            .with(Drive::DoDamage, DoDamageEvaluator)
            .with(
                Drive::KeepHealthy,
                KeepHealthyEvaluator::new(drives.healthy_target, drives.healthy_sigma),
            )
            .with(Drive::KeepTypeAdvantage, KeepTypeAdvantageEvaluator)
            .with(
                Drive::PreventTypeDisadvantage,
                ConstantDriveEvaluator::new(drives.prevent_type_disadvantage),
            )
            .with(
                Drive::HaveSuperEffectiveMoveAvailable,
                ConstantDriveEvaluator::new(drives.have_super_effective_move),
            )
            .with(
                Drive::RevealHiddenInformation,
                RevealHiddenInformationEvaluator::new(opponent),
            )
    }

    /// Run every configured evaluator against the perception, producing
    /// the turn's drive-strength vector. Unconfigured drives stay at 0.
    #[must_use]
    pub fn arbitrate(&self, perception: &Perception) -> DriveStrengths {
        let mut strengths = DriveStrengths::new();
        for drive in Drive::ALL {
            if let Some(evaluator) = self.evaluators.get(&drive) {
                strengths.set(drive, evaluator.evaluate(perception));
            }
        }
        strengths
    }
}

impl fmt::Debug for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Personality")
            .field("drives", &self.evaluators.keys().collect::<Vec<_>>())
            .finish()
    }
}
