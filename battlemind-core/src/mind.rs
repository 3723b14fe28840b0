//! The decision engine — one perception-to-action pass per turn.
//!
//! A [`Mind`] owns everything with cross-turn lifetime: configuration,
//! personality, goal bank, reference data, the search oracle, the sticky
//! goal selector and the control gates. Each call to [`Mind::decide`]
//! runs the full pipeline — perceive, arbitrate drives, activate and
//! select a goal, decide effort, run the eligible reasoning paths, merge
//! and pick — and returns at most one action. `None` is a legitimate
//! outcome: it means no candidate cleared the salience floor and the
//! caller should fall back to whatever default the game client uses.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::aggregate::{Action, merge_paths, pick_action};
use crate::config::MindConfig;
use crate::dex::Dex;
use crate::drives::Personality;
use crate::effort::{Effort, decide_effort};
use crate::error::{MindError, Result};
use crate::gate::GateStore;
use crate::goals::{Goal, GoalBank, GoalSelector};
use crate::observation::perceive;
use crate::oracle::SearchOracle;
use crate::paths::{
    DefensiveSwitchesPath, EffectiveMovesPath, EffectiveSwitchesPath, GenerateAndTestPath,
    PathContext, ReasoningPath,
};
use crate::perception::{Concept, FactPool};
use crate::snapshot::{BattleId, BattleSnapshot};

/// The full decision engine for one agent across its concurrent battles.
pub struct Mind<O: SearchOracle> {
    config: MindConfig,
    personality: Personality,
    goal_bank: GoalBank,
    dex: Dex,
    oracle: O,
    selector: GoalSelector,
    effort_gate: GateStore<Effort>,
    goal_gate: GateStore<Goal>,
    effective_moves: EffectiveMovesPath,
    effective_switches: EffectiveSwitchesPath,
    defensive_switches: DefensiveSwitchesPath,
    generate_and_test: GenerateAndTestPath,
    rng: StdRng,
}

impl<O: SearchOracle> Mind<O> {
    /// Build an engine with the competitive baseline personality and
    /// goal bank.
    #[must_use]
    pub fn new(config: MindConfig, dex: Dex, oracle: O) -> Self {
        let personality = Personality::competitive(&config.drives, &config.opponent);
        let goal_bank = GoalBank::competitive();
        let threshold = config.efficacy.effective_threshold;
        Self {
            config,
            personality,
            goal_bank,
            dex,
            oracle,
            selector: GoalSelector::new(),
            effort_gate: GateStore::new(),
            goal_gate: GateStore::new(),
            effective_moves: EffectiveMovesPath::new(threshold),
            effective_switches: EffectiveSwitchesPath::new(threshold),
            defensive_switches: DefensiveSwitchesPath::new(threshold),
            generate_and_test: GenerateAndTestPath,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the personality. Useful for non-baseline agents.
    #[must_use]
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    /// Replace the goal bank.
    #[must_use]
    pub fn with_goal_bank(mut self, goal_bank: GoalBank) -> Self {
        self.goal_bank = goal_bank;
        self
    }

    /// Seed the internal sampler for reproducible play.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &MindConfig {
        &self.config
    }

    /// The search oracle.
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The effort level last decided for a battle.
    #[must_use]
    pub fn current_effort(&self, battle: &BattleId) -> Option<Effort> {
        self.effort_gate.read(battle)
    }

    /// The goal last committed to for a battle.
    #[must_use]
    pub fn current_goal(&self, battle: &BattleId) -> Option<Goal> {
        self.goal_gate.read(battle)
    }

    /// Run one full decision pass over a turn snapshot.
    ///
    /// # Errors
    /// Propagates perception and state-conversion failures. An oracle
    /// failure is logged and degraded to "the search endorsed nothing"
    /// rather than aborting the turn.
    pub fn decide(&mut self, snapshot: &BattleSnapshot) -> Result<Option<Action>> {
        let battle = &snapshot.battle_id;
        let perception = perceive(snapshot);

        let strengths = self.personality.arbitrate(&perception);
        let activations = self.goal_bank.activate(&strengths);
        let goal = self
            .selector
            .select(battle, &activations, &self.config.selection, &mut self.rng);

        let effort = decide_effort(
            &perception.group(Concept::Team),
            &perception.group(Concept::OpponentTeam),
            self.config.opponent.assumed_team_size,
        );

        self.effort_gate.write(battle, effort);
        match &goal {
            Some(goal) => self.goal_gate.write(battle, goal.clone()),
            None => self.goal_gate.clear(battle),
        }
        debug!(%battle, %effort, goal = ?goal.as_ref().map(|g| g.name.as_str()), "gates set");

        let ctx = PathContext {
            dex: &self.dex,
            oracle: &self.oracle,
            effort: Some(effort),
            goal: goal.as_ref(),
        };

        let search_pool = match self.generate_and_test.run(&perception, &ctx) {
            Ok(pool) => pool,
            Err(MindError::Oracle(reason)) => {
                warn!(%battle, reason, "search failed, deciding without it");
                FactPool::new()
            }
            Err(other) => return Err(other),
        };

        let pools = [
            self.effective_moves.run(&perception, &ctx)?,
            self.effective_switches.run(&perception, &ctx)?,
            self.defensive_switches.run(&perception, &ctx)?,
            search_pool,
        ];

        let merged = merge_paths(&pools);
        Ok(pick_action(
            &merged,
            self.config.selection.action_threshold,
            self.config.selection.action_temperature,
            &mut self.rng,
        ))
    }

    /// Release all per-battle state once a battle is over.
    pub fn end_battle(&mut self, battle: &BattleId) {
        self.selector.forget(battle);
        self.effort_gate.clear(battle);
        self.goal_gate.clear(battle);
        debug!(%battle, "battle state released");
    }
}

impl<O: SearchOracle + std::fmt::Debug> std::fmt::Debug for Mind<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mind")
            .field("personality", &self.personality)
            .field("oracle", &self.oracle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{BaseStats, MoveCategory, MoveData, PokemonType, SpeciesData};
    use crate::oracle::{OptionSet, OracleState};
    use crate::snapshot::{
        BoostBlock, Hp, MoveSlot, PokemonSnapshot, Revealed, StatBlock,
    };

    #[derive(Debug)]
    struct FixedOracle(Option<&'static str>);

    impl SearchOracle for FixedOracle {
        fn pick_safest(&self, _: &OracleState, _: OptionSet) -> Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    #[derive(Debug)]
    struct FailingOracle;

    impl SearchOracle for FailingOracle {
        fn pick_safest(&self, _: &OracleState, _: OptionSet) -> Result<Option<String>> {
            Err(MindError::Oracle("search exploded".to_string()))
        }
    }

    fn member(species: &str, fainted: bool, active: bool) -> PokemonSnapshot {
        PokemonSnapshot {
            species: species.to_string(),
            level: 84,
            types: vec![PokemonType::Water],
            fainted,
            active,
            status: None,
            volatile_statuses: vec![],
            stats: StatBlock::default(),
            hp: Hp::Exact {
                current: if fainted { 0 } else { 240 },
                max: 240,
            },
            item: Revealed::Known("leftovers".to_string()),
            ability: Revealed::Known("torrent".to_string()),
            moves: vec![],
            boosts: BoostBlock::default(),
            terastallized: false,
        }
    }

    fn opponent_member(species: &str, fainted: bool, active: bool) -> PokemonSnapshot {
        let mut m = member(species, fainted, active);
        m.types = vec![PokemonType::Ground, PokemonType::Rock];
        m.hp = Hp::Percent(64.0);
        m.moves = vec![
            MoveSlot { id: "earthquake".to_string(), pp: 16 },
            MoveSlot { id: "stoneedge".to_string(), pp: 8 },
            MoveSlot { id: "rockslide".to_string(), pp: 16 },
            MoveSlot { id: "protect".to_string(), pp: 16 },
        ];
        m
    }

    fn move_data(ty: PokemonType) -> MoveData {
        MoveData {
            move_type: ty,
            base_power: 90,
            accuracy: 100,
            category: MoveCategory::Special,
            priority: 0,
        }
    }

    fn test_dex() -> Dex {
        let mut dex = Dex::new();
        dex.insert_move("surf", move_data(PokemonType::Water));
        dex.insert_move("ember", move_data(PokemonType::Fire));
        for species in ["blastoise", "lapras", "quagsire", "pelipper", "azumarill", "gyarados"] {
            dex.insert_species(
                species,
                SpeciesData {
                    types: vec![PokemonType::Water],
                    base_stats: BaseStats {
                        hp: 80,
                        attack: 80,
                        defense: 80,
                        special_attack: 80,
                        special_defense: 80,
                        speed: 80,
                    },
                    weight_kg: 40.0,
                },
            );
        }
        dex
    }

    /// We are up six-to-four on material with a revealed opponent, so the
    /// engine should run on autopilot with a move goal.
    fn ahead_snapshot() -> BattleSnapshot {
        BattleSnapshot {
            battle_id: BattleId::new("battle-gen9ou-1"),
            turn: 12,
            force_switch: false,
            wait: false,
            player_name: "us".to_string(),
            opponent_name: "them".to_string(),
            team: vec![
                member("blastoise", false, true),
                member("lapras", false, false),
                member("quagsire", false, false),
                member("pelipper", false, false),
                member("azumarill", false, false),
                member("gyarados", false, false),
            ],
            opponent_team: vec![
                opponent_member("golem", false, true),
                opponent_member("onix", true, false),
                opponent_member("rhydon", true, false),
            ],
            available_moves: vec![
                MoveSlot { id: "surf".to_string(), pp: 24 },
                MoveSlot { id: "ember".to_string(), pp: 25 },
            ],
            available_switches: vec!["lapras".to_string()],
            side_conditions: vec![],
            opponent_side_conditions: vec![],
            weather: None,
            field_effects: vec![],
        }
    }

    /// Even material, so the engine should hand the turn to the search.
    fn even_snapshot() -> BattleSnapshot {
        let mut snapshot = ahead_snapshot();
        snapshot.opponent_team = vec![opponent_member("golem", false, true)];
        snapshot
    }

    #[test]
    fn ahead_on_material_plays_the_super_effective_move_on_autopilot() {
        let mut mind = Mind::new(MindConfig::default(), test_dex(), FixedOracle(None))
            .with_seed(11);
        let snapshot = ahead_snapshot();

        let action = mind.decide(&snapshot).unwrap();

        // Water hits (ground, rock) for 4×; fire is resisted and cut, so
        // surf is the only candidate left after the threshold.
        assert_eq!(action, Some(Action::UseMove("surf".to_string())));
        assert_eq!(
            mind.current_effort(&snapshot.battle_id),
            Some(Effort::Autopilot)
        );
        let goal = mind.current_goal(&snapshot.battle_id).unwrap();
        assert_eq!(goal.name, "deal_damage");
    }

    #[test]
    fn even_material_defers_to_the_search() {
        let mut mind = Mind::new(MindConfig::default(), test_dex(), FixedOracle(Some("surf")))
            .with_seed(3);
        let snapshot = even_snapshot();

        let action = mind.decide(&snapshot).unwrap();

        assert_eq!(action, Some(Action::UseMove("surf".to_string())));
        assert_eq!(
            mind.current_effort(&snapshot.battle_id),
            Some(Effort::TryHard)
        );
    }

    #[test]
    fn oracle_failure_degrades_to_no_action() {
        let mut mind = Mind::new(MindConfig::default(), test_dex(), FailingOracle).with_seed(3);
        let snapshot = even_snapshot();

        // Under try-hard the heuristic paths are all ineligible, so a
        // failed search leaves nothing to endorse.
        let action = mind.decide(&snapshot).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn undecided_oracle_yields_no_action() {
        let mut mind = Mind::new(MindConfig::default(), test_dex(), FixedOracle(None))
            .with_seed(3);
        let snapshot = even_snapshot();

        let action = mind.decide(&snapshot).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn end_battle_releases_all_per_battle_state() {
        let mut mind = Mind::new(MindConfig::default(), test_dex(), FixedOracle(None))
            .with_seed(11);
        let snapshot = ahead_snapshot();

        mind.decide(&snapshot).unwrap();
        assert!(mind.current_effort(&snapshot.battle_id).is_some());
        assert!(mind.current_goal(&snapshot.battle_id).is_some());

        mind.end_battle(&snapshot.battle_id);
        assert_eq!(mind.current_effort(&snapshot.battle_id), None);
        assert_eq!(mind.current_goal(&snapshot.battle_id), None);
    }
}
