//! Reasoning paths — gated candidate-action generators.
//!
//! Each path declares the (effort, goal-kind) combination it is eligible
//! under and checks the gates *before* doing any work: an ineligible path
//! short-circuits to an empty pool without invoking its computation.
//! Gating after the fact would waste exactly the computation the effort
//! gate exists to save.
//!
//! All paths emit the same representation — a weighted fact pool over
//! action identifiers — so the aggregator can merge them uniformly.

use tracing::warn;

use crate::dex::{Dex, MAX_EFFICACY, PokemonType, resistance_score};
use crate::effort::Effort;
use crate::error::Result;
use crate::goals::{Goal, GoalKind};
use crate::oracle::{OptionSet, OracleState, SWITCH_PREFIX, SearchOracle};
use crate::perception::{Concept, FactPool, Perception};

/// Everything a reasoning path may consult besides the perception.
pub struct PathContext<'a> {
    /// Reference data tables.
    pub dex: &'a Dex,
    /// The external search oracle.
    pub oracle: &'a dyn SearchOracle,
    /// The effort gate's current signal, if written.
    pub effort: Option<Effort>,
    /// The goal gate's current content, if written.
    pub goal: Option<&'a Goal>,
}

/// A conditionally executed candidate generator.
pub trait ReasoningPath {
    /// Whether the current gate signals allow this path to run.
    fn eligible(&self, ctx: &PathContext<'_>) -> bool;

    /// The underlying computation. Only called when eligible.
    fn generate(&self, perception: &Perception, ctx: &PathContext<'_>) -> Result<FactPool>;

    /// Run the path: empty pool without touching the computation when the
    /// gates do not match, the generated candidates otherwise.
    fn run(&self, perception: &Perception, ctx: &PathContext<'_>) -> Result<FactPool> {
        if !self.eligible(ctx) {
            return Ok(FactPool::new());
        }
        self.generate(perception, ctx)
    }
}

/// Whether the active goal calls for the given action kind. A goal of
/// kind `Any` matches both; no goal at all matches neither.
fn goal_kind_matches(goal: Option<&Goal>, required: GoalKind) -> bool {
    match goal {
        Some(goal) => goal.kind == required || goal.kind == GoalKind::Any,
        None => false,
    }
}

/// The opponent's active typing, parsed from perception.
fn opponent_types(perception: &Perception) -> Vec<PokemonType> {
    perception
        .group(Concept::ActiveOpponentType)
        .facts()
        .filter_map(|f| match f.id().parse::<PokemonType>() {
            Ok(ty) => Some(ty),
            Err(_) => {
                warn!(type_name = f.id(), "unrecognized opponent type, ignoring");
                None
            }
        })
        .collect()
}

/// Scores available moves by type effectiveness against the opponent's
/// active typing. Eligible under autopilot effort with a move goal.
#[derive(Debug)]
pub struct EffectiveMovesPath {
    threshold: f64,
}

impl EffectiveMovesPath {
    /// Build with the meaningfully-effective cutoff.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ReasoningPath for EffectiveMovesPath {
    fn eligible(&self, ctx: &PathContext<'_>) -> bool {
        ctx.effort == Some(Effort::Autopilot) && goal_kind_matches(ctx.goal, GoalKind::Move)
    }

    fn generate(&self, perception: &Perception, ctx: &PathContext<'_>) -> Result<FactPool> {
        let defenders = opponent_types(perception);
        let mut pool = FactPool::new();

        for (fact, _) in perception.group(Concept::AvailableMoves).iter() {
            let multiplier = match ctx.dex.move_data(fact.id()) {
                Some(data) => data.move_type.against_all(&defenders),
                None => {
                    warn!(move_id = fact.id(), "unknown move, assuming neutral efficacy");
                    1.0
                }
            };
            if multiplier >= self.threshold {
                pool.insert(fact.clone(), multiplier);
            }
        }

        Ok(pool.normalized_by(MAX_EFFICACY))
    }
}

/// Scores available switch candidates by how hard their own typing hits
/// the opponent. Eligible under autopilot effort with a switch goal.
#[derive(Debug)]
pub struct EffectiveSwitchesPath {
    threshold: f64,
}

impl EffectiveSwitchesPath {
    /// Build with the meaningfully-effective cutoff.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ReasoningPath for EffectiveSwitchesPath {
    fn eligible(&self, ctx: &PathContext<'_>) -> bool {
        ctx.effort == Some(Effort::Autopilot) && goal_kind_matches(ctx.goal, GoalKind::Switch)
    }

    fn generate(&self, perception: &Perception, ctx: &PathContext<'_>) -> Result<FactPool> {
        let defenders = opponent_types(perception);
        let candidates = perception.group(Concept::AvailableSwitches);
        let candidate_count = candidates.len();
        let mut pool = FactPool::new();

        for (fact, _) in candidates.iter() {
            let attackers = candidate_types(fact.id(), perception, ctx.dex);
            let offense: f64 = attackers
                .iter()
                .map(|ty| ty.against_all(&defenders))
                .product();
            if offense >= self.threshold {
                pool.insert(fact.clone(), offense);
            }
        }

        Ok(pool.normalized_by(MAX_EFFICACY * candidate_count as f64))
    }
}

/// Scores available switch candidates by how well their typing *resists*
/// the opponent's attacking types, via the inverse multiplier table.
/// Eligible under autopilot effort with a switch goal.
#[derive(Debug)]
pub struct DefensiveSwitchesPath {
    threshold: f64,
}

impl DefensiveSwitchesPath {
    /// Build with the meaningfully-resistant cutoff.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ReasoningPath for DefensiveSwitchesPath {
    fn eligible(&self, ctx: &PathContext<'_>) -> bool {
        ctx.effort == Some(Effort::Autopilot) && goal_kind_matches(ctx.goal, GoalKind::Switch)
    }

    fn generate(&self, perception: &Perception, ctx: &PathContext<'_>) -> Result<FactPool> {
        let attackers = opponent_types(perception);
        let candidates = perception.group(Concept::AvailableSwitches);
        let candidate_count = candidates.len();
        let mut pool = FactPool::new();

        for (fact, _) in candidates.iter() {
            let defense_types = candidate_types(fact.id(), perception, ctx.dex);
            let resistance: f64 = attackers
                .iter()
                .map(|ty| resistance_score(ty.against_all(&defense_types)))
                .product();
            if resistance >= self.threshold {
                pool.insert(fact.clone(), resistance);
            }
        }

        Ok(pool.normalized_by(MAX_EFFICACY * candidate_count as f64))
    }
}

/// A switch candidate's own typing, from reference data first and the
/// team perception as fallback. Unknown species read as typeless, which
/// scores neutral 1.0 products.
fn candidate_types(species: &str, perception: &Perception, dex: &Dex) -> Vec<PokemonType> {
    if let Some(data) = dex.species(species) {
        return data.types.clone();
    }
    let team = perception.group(Concept::Team);
    if let Some(member) = team.get(species) {
        let parsed: Vec<PokemonType> = member
            .texts("type")
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect();
        if !parsed.is_empty() {
            return parsed;
        }
    }
    warn!(species, "unknown switch candidate, assuming neutral typing");
    Vec::new()
}

/// The generate-and-test path: delegates to the external look-ahead
/// search. Eligible under try-hard effort; the active goal's kind only
/// restricts the option set handed to the oracle, not the search itself.
#[derive(Debug, Default)]
pub struct GenerateAndTestPath;

impl ReasoningPath for GenerateAndTestPath {
    fn eligible(&self, ctx: &PathContext<'_>) -> bool {
        ctx.effort == Some(Effort::TryHard)
    }

    fn generate(&self, perception: &Perception, ctx: &PathContext<'_>) -> Result<FactPool> {
        let state = OracleState::from_perception(perception)?;
        let options = match ctx.goal.map(|g| g.kind) {
            Some(GoalKind::Move) => OptionSet::MovesOnly,
            Some(GoalKind::Switch) => OptionSet::SwitchesOnly,
            Some(GoalKind::Any) | None => OptionSet::Unrestricted,
        };

        let mut pool = FactPool::new();
        if let Some(choice) = ctx.oracle.pick_safest(&state, options)? {
            let fact = match choice.strip_prefix(SWITCH_PREFIX) {
                Some(target) => {
                    crate::fact::Fact::grouped(target, Concept::AvailableSwitches)
                }
                None => crate::fact::Fact::grouped(choice, Concept::AvailableMoves),
            };
            pool.insert(fact, 1.0);
        }
        Ok(pool)
    }
}
