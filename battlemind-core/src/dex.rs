//! Reference Data Store — immutable species/move lookup tables and the
//! standard 18×18 type chart.
//!
//! Loaded once at startup and never mutated afterwards. Unknown
//! identifiers are not errors at this layer: lookups return `None` and
//! callers decide whether to warn and fall back to neutral effectiveness.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The eighteen creature/move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    /// Normal.
    Normal,
    /// Fire.
    Fire,
    /// Water.
    Water,
    /// Electric.
    Electric,
    /// Grass.
    Grass,
    /// Ice.
    Ice,
    /// Fighting.
    Fighting,
    /// Poison.
    Poison,
    /// Ground.
    Ground,
    /// Flying.
    Flying,
    /// Psychic.
    Psychic,
    /// Bug.
    Bug,
    /// Rock.
    Rock,
    /// Ghost.
    Ghost,
    /// Dragon.
    Dragon,
    /// Dark.
    Dark,
    /// Steel.
    Steel,
    /// Fairy.
    Fairy,
}

impl PokemonType {
    /// Lowercase type name as it appears in perception attributes.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Electric => "electric",
            PokemonType::Grass => "grass",
            PokemonType::Ice => "ice",
            PokemonType::Fighting => "fighting",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Flying => "flying",
            PokemonType::Psychic => "psychic",
            PokemonType::Bug => "bug",
            PokemonType::Rock => "rock",
            PokemonType::Ghost => "ghost",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Steel => "steel",
            PokemonType::Fairy => "fairy",
        }
    }

    /// Damage multiplier of this type attacking one defending type.
    ///
    /// Gen-6+ chart. Unlisted matchups are neutral 1.0×.
    #[must_use]
    pub fn against(&self, defender: PokemonType) -> f64 {
        use PokemonType::*;
        match (self, defender) {
            (Normal, Ghost) => 0.0,
            (Normal, Rock | Steel) => 0.5,

            (Fire, Grass | Ice | Bug | Steel) => 2.0,
            (Fire, Fire | Water | Rock | Dragon) => 0.5,

            (Water, Fire | Ground | Rock) => 2.0,
            (Water, Water | Grass | Dragon) => 0.5,

            (Electric, Water | Flying) => 2.0,
            (Electric, Electric | Grass | Dragon) => 0.5,
            (Electric, Ground) => 0.0,

            (Grass, Water | Ground | Rock) => 2.0,
            (Grass, Fire | Grass | Poison | Flying | Bug | Dragon | Steel) => 0.5,

            (Ice, Grass | Ground | Flying | Dragon) => 2.0,
            (Ice, Fire | Water | Ice | Steel) => 0.5,

            (Fighting, Normal | Ice | Rock | Dark | Steel) => 2.0,
            (Fighting, Poison | Flying | Psychic | Bug | Fairy) => 0.5,
            (Fighting, Ghost) => 0.0,

            (Poison, Grass | Fairy) => 2.0,
            (Poison, Poison | Ground | Rock | Ghost) => 0.5,
            (Poison, Steel) => 0.0,

            (Ground, Fire | Electric | Poison | Rock | Steel) => 2.0,
            (Ground, Grass | Bug) => 0.5,
            (Ground, Flying) => 0.0,

            (Flying, Grass | Fighting | Bug) => 2.0,
            (Flying, Electric | Rock | Steel) => 0.5,

            (Psychic, Fighting | Poison) => 2.0,
            (Psychic, Psychic | Steel) => 0.5,
            (Psychic, Dark) => 0.0,

            (Bug, Grass | Psychic | Dark) => 2.0,
            (Bug, Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy) => 0.5,

            (Rock, Fire | Ice | Flying | Bug) => 2.0,
            (Rock, Fighting | Ground | Steel) => 0.5,

            (Ghost, Psychic | Ghost) => 2.0,
            (Ghost, Dark) => 0.5,
            (Ghost, Normal) => 0.0,

            (Dragon, Dragon) => 2.0,
            (Dragon, Steel) => 0.5,
            (Dragon, Fairy) => 0.0,

            (Dark, Psychic | Ghost) => 2.0,
            (Dark, Fighting | Dark | Fairy) => 0.5,

            (Steel, Ice | Rock | Fairy) => 2.0,
            (Steel, Fire | Water | Electric | Steel) => 0.5,

            (Fairy, Fighting | Dragon | Dark) => 2.0,
            (Fairy, Fire | Poison | Steel) => 0.5,

            _ => 1.0,
        }
    }

    /// Damage multiplier of this type attacking a 1–2 type defender:
    /// the product of the per-type multipliers.
    #[must_use]
    pub fn against_all(&self, defenders: &[PokemonType]) -> f64 {
        defenders.iter().map(|d| self.against(*d)).product()
    }
}

impl FromStr for PokemonType {
    type Err = UnknownType;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use PokemonType::*;
        let ty = match s.to_ascii_lowercase().as_str() {
            "normal" => Normal,
            "fire" => Fire,
            "water" => Water,
            "electric" => Electric,
            "grass" => Grass,
            "ice" => Ice,
            "fighting" => Fighting,
            "poison" => Poison,
            "ground" => Ground,
            "flying" => Flying,
            "psychic" => Psychic,
            "bug" => Bug,
            "rock" => Rock,
            "ghost" => Ghost,
            "dragon" => Dragon,
            "dark" => Dark,
            "steel" => Steel,
            "fairy" => Fairy,
            other => return Err(UnknownType(other.to_string())),
        };
        Ok(ty)
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type name that is not one of the eighteen known types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type name: {}", self.0)
    }
}

impl std::error::Error for UnknownType {}

/// The largest multiplier the chart can produce against a dual-typed
/// defender (2.0 × 2.0). Reasoning paths normalize by this.
pub const MAX_EFFICACY: f64 = 4.0;

/// Map a damage multiplier to a resistance score.
///
/// Defensive reasoning rewards *taking* little damage, so the chart is
/// inverted: immunities and double resists score 4×, double weaknesses
/// score 0.25×.
#[must_use]
pub fn resistance_score(damage_multiplier: f64) -> f64 {
    if damage_multiplier <= 0.25 {
        4.0
    } else if damage_multiplier <= 0.5 {
        2.0
    } else if damage_multiplier < 2.0 {
        1.0
    } else if damage_multiplier < 4.0 {
        0.5
    } else {
        0.25
    }
}

/// Damage category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCategory {
    /// Damaging, uses Attack/Defense.
    Physical,
    /// Damaging, uses Sp. Atk/Sp. Def.
    Special,
    /// Non-damaging.
    Status,
}

/// Static attributes of one move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveData {
    /// Move type.
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    /// Base power (0 for status moves).
    pub base_power: u32,
    /// Accuracy in percent; 100 for moves that cannot miss.
    pub accuracy: u32,
    /// Damage category.
    pub category: MoveCategory,
    /// Move priority bracket.
    pub priority: i32,
}

/// The six base stats of a species.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaseStats {
    /// Hit points.
    pub hp: u32,
    /// Attack.
    pub attack: u32,
    /// Defense.
    pub defense: u32,
    /// Special attack.
    pub special_attack: u32,
    /// Special defense.
    pub special_defense: u32,
    /// Speed.
    pub speed: u32,
}

/// Static attributes of one species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesData {
    /// The species' 1–2 types.
    pub types: Vec<PokemonType>,
    /// Base stat line.
    pub base_stats: BaseStats,
    /// Weight in kilograms.
    pub weight_kg: f64,
}

/// Immutable species/move lookup tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dex {
    moves: HashMap<String, MoveData>,
    species: HashMap<String, SpeciesData>,
}

impl Dex {
    /// An empty dex. Useful for tests that register a handful of entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dex from its JSON representation.
    ///
    /// # Errors
    /// Returns [`MindError::ReferenceData`](crate::MindError::ReferenceData)
    /// on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dex from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Register a move. Intended for construction and test fixtures.
    pub fn insert_move(&mut self, id: impl Into<String>, data: MoveData) {
        self.moves.insert(id.into(), data);
    }

    /// Register a species. Intended for construction and test fixtures.
    pub fn insert_species(&mut self, id: impl Into<String>, data: SpeciesData) {
        self.species.insert(id.into(), data);
    }

    /// Look up a move by identifier.
    #[must_use]
    pub fn move_data(&self, id: &str) -> Option<&MoveData> {
        self.moves.get(id)
    }

    /// Look up a species by identifier.
    #[must_use]
    pub fn species(&self, id: &str) -> Option<&SpeciesData> {
        self.species.get(id)
    }

    /// Number of registered moves.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Number of registered species.
    #[must_use]
    pub fn species_count(&self) -> usize {
        self.species.len()
    }
}
