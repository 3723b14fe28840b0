//! Inbound battle-snapshot data model.
//!
//! One [`BattleSnapshot`] arrives per turn from the external game client.
//! It is a plain read-only description of everything the player is allowed
//! to know: exact stats for our own side, revealed-only information for
//! the opponent's. The perception builder is a pure function of this type.

use serde::{Deserialize, Serialize};

use crate::dex::PokemonType;

/// Identifier of one ongoing battle. All cross-turn state (sticky goal,
/// gate values) is keyed by this, never shared globally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub String);

impl BattleId {
    /// Wrap a battle tag from the game server.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl std::fmt::Display for BattleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A possibly hidden piece of opponent information.
///
/// `Unrevealed` (the battle has not shown it yet) is distinct from
/// `Absent` (revealed to be none): an opponent whose item was knocked off
/// is *known* to hold nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Revealed<T> {
    /// Not yet revealed.
    Unrevealed,
    /// Revealed to be none.
    Absent,
    /// Revealed value.
    Known(T),
}

impl<T> Revealed<T> {
    /// Whether the information is still hidden.
    #[must_use]
    pub fn is_unrevealed(&self) -> bool {
        matches!(self, Revealed::Unrevealed)
    }

    /// The revealed value, if any.
    #[must_use]
    pub fn known(&self) -> Option<&T> {
        match self {
            Revealed::Known(v) => Some(v),
            _ => None,
        }
    }
}

/// Hit points as far as the player can see them.
///
/// Exact values for our own creatures; the server only shows a
/// percentage-of-max for the opponent's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hp {
    /// Exact current and maximum HP (own side).
    Exact {
        /// Current HP.
        current: u32,
        /// Maximum HP.
        max: u32,
    },
    /// Percentage of maximum HP in [0, 100] (opponent side).
    Percent(f64),
}

/// The six battle stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
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

/// The six stat-boost stages, each in [-6, 6].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostBlock {
    /// Attack stage.
    pub attack: i8,
    /// Defense stage.
    pub defense: i8,
    /// Special attack stage.
    pub special_attack: i8,
    /// Special defense stage.
    pub special_defense: i8,
    /// Speed stage.
    pub speed: i8,
    /// Accuracy stage.
    pub accuracy: i8,
    /// Evasion stage.
    pub evasion: i8,
}

/// One known move slot on a creature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    /// Move identifier.
    pub id: String,
    /// Remaining uses.
    pub pp: u32,
}

/// Everything the player can see about one creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSnapshot {
    /// Species identifier.
    pub species: String,
    /// Level.
    pub level: u32,
    /// The creature's 1–2 types.
    pub types: Vec<PokemonType>,
    /// Whether it has fainted.
    pub fainted: bool,
    /// Whether it is currently on the field.
    pub active: bool,
    /// Major status condition, if any.
    pub status: Option<String>,
    /// Volatile statuses currently applied (confusion, substitute, ...).
    pub volatile_statuses: Vec<String>,
    /// Effective stats (own side) or best-known estimates.
    pub stats: StatBlock,
    /// Visible hit points.
    pub hp: Hp,
    /// Held item, as far as revealed.
    pub item: Revealed<String>,
    /// Ability, as far as revealed.
    pub ability: Revealed<String>,
    /// Known moves. For our own creatures these are the learned moves;
    /// for the opponent, every move it has ever revealed.
    pub moves: Vec<MoveSlot>,
    /// Current stat-boost stages.
    pub boosts: BoostBlock,
    /// Whether it has terastallized.
    pub terastallized: bool,
}

/// One side condition with its stacking state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConditionSnapshot {
    /// Condition identifier (e.g. `"spikes"`, `"reflect"`).
    pub name: String,
    /// Layer count for stackable conditions; start turn for timed ones.
    /// The perception builder decides which reading applies.
    pub value: u32,
}

/// The complete view of one battle at the start of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    /// Battle identifier.
    pub battle_id: BattleId,
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Whether the server is forcing a switch this turn.
    pub force_switch: bool,
    /// Whether the server is waiting on the opponent (no action needed).
    pub wait: bool,
    /// Our account name.
    pub player_name: String,
    /// Opponent account name.
    pub opponent_name: String,
    /// Our full roster, active creature included.
    pub team: Vec<PokemonSnapshot>,
    /// The opponent's revealed roster, active creature included.
    pub opponent_team: Vec<PokemonSnapshot>,
    /// Moves we may legally pick this turn.
    pub available_moves: Vec<MoveSlot>,
    /// Species we may legally switch to this turn.
    pub available_switches: Vec<String>,
    /// Conditions on our side.
    pub side_conditions: Vec<SideConditionSnapshot>,
    /// Conditions on the opponent's side.
    pub opponent_side_conditions: Vec<SideConditionSnapshot>,
    /// Current weather, if any.
    pub weather: Option<String>,
    /// Whole-field effects (terrains, trick room, gravity).
    pub field_effects: Vec<String>,
}

impl BattleSnapshot {
    /// Our active creature, if one is on the field.
    #[must_use]
    pub fn active(&self) -> Option<&PokemonSnapshot> {
        self.team.iter().find(|p| p.active)
    }

    /// The opponent's active creature, if revealed and on the field.
    #[must_use]
    pub fn opponent_active(&self) -> Option<&PokemonSnapshot> {
        self.opponent_team.iter().find(|p| p.active)
    }
}

impl Hp {
    /// Current HP as a fraction of maximum, in [0, 1].
    ///
    /// Returns `None` for an exact reading with `max == 0`.
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        match self {
            Hp::Exact { current, max } => {
                if *max == 0 {
                    None
                } else {
                    Some(f64::from(*current) / f64::from(*max))
                }
            }
            Hp::Percent(pct) => Some(pct / 100.0),
        }
    }

    /// Percentage of maximum HP in [0, 100].
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.fraction().map(|f| f * 100.0)
    }
}
