//! The search-oracle boundary.
//!
//! The look-ahead search itself is an external collaborator: given a
//! fully specified battle state and a restricted option set it returns
//! the "safest" (minimax-optimal against a modeled adversary) option
//! string. This module defines that contract and the conversion from our
//! perception format to the oracle's state representation. Hidden
//! opponent attributes are passed through as unknown; probabilistic
//! inference over them is the oracle's own business.

use serde::{Deserialize, Serialize};

use crate::error::{MindError, Result};
use crate::fact::Fact;
use crate::perception::{Concept, Perception};

/// Prefix the oracle uses to disambiguate a switch from a move in its
/// returned option string.
pub const SWITCH_PREFIX: &str = "switch ";

/// Which options the oracle may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionSet {
    /// Any legal move or switch.
    Unrestricted,
    /// Moves only.
    MovesOnly,
    /// Switches only.
    SwitchesOnly,
}

/// One creature in the oracle's state representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OraclePokemon {
    /// Species identifier.
    pub species: String,
    /// Level.
    pub level: u32,
    /// Type names.
    pub types: Vec<String>,
    /// Current HP. For the opponent this is a percentage reading scaled
    /// by the oracle's own stat inference.
    pub hp: f64,
    /// Maximum HP, when exactly known.
    pub max_hp: Option<f64>,
    /// Major status condition, if any.
    pub status: Option<String>,
    /// Volatile statuses.
    pub volatile_statuses: Vec<String>,
    /// Known moves.
    pub moves: Vec<String>,
    /// Held item, if revealed.
    pub item: Option<String>,
    /// Ability, if revealed.
    pub ability: Option<String>,
    /// Stat-boost stages as (stat, stage) pairs.
    pub boosts: Vec<(String, i32)>,
    /// Whether it has terastallized.
    pub terastallized: bool,
}

/// One player's side in the oracle's state representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleSide {
    /// Account name.
    pub name: String,
    /// Active creature, if any.
    pub active: Option<OraclePokemon>,
    /// Reserve creatures.
    pub reserve: Vec<OraclePokemon>,
    /// Side conditions as (name, value) pairs.
    pub side_conditions: Vec<(String, u32)>,
}

/// The fully specified battle state handed to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleState {
    /// Battle identifier string.
    pub battle_tag: String,
    /// Turn number.
    pub turn: u32,
    /// Whether this is a forced-switch turn.
    pub force_switch: bool,
    /// Whether the server is waiting on the opponent.
    pub wait: bool,
    /// Our side.
    pub user: OracleSide,
    /// The opponent's side.
    pub opponent: OracleSide,
    /// Current weather, if any.
    pub weather: Option<String>,
    /// Current terrain/field effect, if any.
    pub field: Option<String>,
    /// Whether trick room is up.
    pub trick_room: bool,
}

impl OracleState {
    /// Build the oracle state from the turn's perception.
    ///
    /// # Errors
    /// Returns [`MindError::IncompletePerception`] when the battle
    /// metadata fact is missing — everything else degrades to empty or
    /// unknown fields.
    pub fn from_perception(perception: &Perception) -> Result<Self> {
        let battle_pool = perception.group(Concept::Battle);
        let Some(metadata) = battle_pool.get("metadata") else {
            return Err(MindError::IncompletePerception {
                concept: Concept::Battle,
                fact: "metadata".to_string(),
            });
        };

        let players = perception.group(Concept::Players);
        let player_name = |id: &str| {
            players
                .get(id)
                .and_then(|p| p.text("name").map(str::to_string))
                .unwrap_or_default()
        };

        let fields = perception.group(Concept::FieldEffects);
        let trick_room = fields.contains("trickroom");
        let field = fields.facts().map(|f| f.id().to_string()).find(|id| id != "trickroom");

        Ok(Self {
            battle_tag: metadata.text("battle_tag").unwrap_or_default().to_string(),
            turn: metadata.number("turn").unwrap_or(0.0) as u32,
            force_switch: metadata.flag("force_switch").unwrap_or(false),
            wait: metadata.flag("wait").unwrap_or(false),
            user: Self::user_side(perception, player_name("self")),
            opponent: Self::opponent_side(perception, player_name("opponent")),
            weather: perception
                .group(Concept::Weather)
                .facts()
                .next()
                .map(|f| f.id().to_string()),
            field,
            trick_room,
        })
    }

    fn user_side(perception: &Perception, name: String) -> OracleSide {
        let active = perception
            .group(Concept::ActivePokemon)
            .only()
            .map(convert_pokemon);

        // The reserve the oracle may search over is exactly the set of
        // legal switch targets, with details pulled from the team facts.
        let team = perception.group(Concept::Team);
        let reserve = perception
            .group(Concept::AvailableSwitches)
            .facts()
            .filter_map(|switch| team.get(switch.id()))
            .map(convert_pokemon)
            .collect();

        OracleSide {
            name,
            active,
            reserve,
            side_conditions: conditions(perception, Concept::SideConditions),
        }
    }

    fn opponent_side(perception: &Perception, name: String) -> OracleSide {
        let active_pool = perception.group(Concept::OpponentActivePokemon);
        let active = active_pool.only().map(convert_pokemon);

        let reserve = perception
            .group(Concept::OpponentTeam)
            .facts()
            .filter(|p| !active_pool.contains(p.id()))
            .map(convert_pokemon)
            .collect();

        OracleSide {
            name,
            active,
            reserve,
            side_conditions: conditions(perception, Concept::OpponentSideConditions),
        }
    }
}

fn conditions(perception: &Perception, concept: Concept) -> Vec<(String, u32)> {
    perception
        .group(concept)
        .facts()
        .map(|f| {
            let value = f
                .number("layers")
                .or_else(|| f.number("start_turn"))
                .unwrap_or(0.0) as u32;
            (f.id().to_string(), value)
        })
        .collect()
}

fn convert_pokemon(fact: &Fact) -> OraclePokemon {
    let hp = fact
        .number("hp")
        .or_else(|| fact.number("hp_percentage"))
        .unwrap_or(0.0);

    let boosts = [
        ("attack", "boost_attack"),
        ("defense", "boost_defense"),
        ("special_attack", "boost_special_attack"),
        ("special_defense", "boost_special_defense"),
        ("speed", "boost_speed"),
        ("accuracy", "boost_accuracy"),
        ("evasion", "boost_evasion"),
    ]
    .into_iter()
    .filter_map(|(stat, attr)| fact.number(attr).map(|v| (stat.to_string(), v as i32)))
    .collect();

    OraclePokemon {
        species: fact.id().to_string(),
        level: fact.number("level").unwrap_or(100.0) as u32,
        types: fact.texts("type").iter().map(|t| t.to_string()).collect(),
        hp,
        max_hp: fact.number("max_hp"),
        status: fact.text("status").map(str::to_string),
        volatile_statuses: fact
            .texts("volatile_status")
            .iter()
            .map(|v| v.to_string())
            .collect(),
        moves: fact.texts("move").iter().map(|m| m.to_string()).collect(),
        item: fact.text("item").map(str::to_string),
        ability: fact.text("ability").map(str::to_string),
        boosts,
        terastallized: fact.flag("terastallized").unwrap_or(false),
    }
}

/// The external game-tree search procedure.
pub trait SearchOracle: Send + Sync {
    /// Return the safest option for `state`, drawn from `options`.
    ///
    /// A switch is returned as [`SWITCH_PREFIX`] followed by the target
    /// species; a move is returned as the bare move identifier. `None`
    /// means the oracle could not decide.
    ///
    /// # Errors
    /// Returns [`MindError::Oracle`] on internal search failure; callers
    /// degrade this to "no decision" rather than aborting the turn.
    fn pick_safest(&self, state: &OracleState, options: OptionSet) -> Result<Option<String>>;
}
