//! Goals — aggregating drives into one strategic intent per turn.
//!
//! The goal bank is a static table mapping each named goal to the drives
//! that feed it and the kind of action it calls for. Activation projects
//! the turn's drive-strength vector through that table; selection is
//! Boltzmann sampling with an activation floor and *stickiness*: the
//! previous turn's goal is retained until its own activation drops to or
//! below a threshold, so near-tied goals cannot make the agent flip
//! strategy every turn on perceptual noise.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SelectionConfig;
use crate::drives::{Drive, DriveStrengths};
use crate::sampling::boltzmann_pick;
use crate::snapshot::BattleId;

/// The kind of action a goal calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Either a move or a switch.
    Any,
    /// Use a move this turn.
    Move,
    /// Switch out this turn.
    Switch,
}

/// A named strategic intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    /// Goal identifier.
    pub name: String,
    /// The action kind this goal calls for.
    pub kind: GoalKind,
}

impl Goal {
    /// Build a goal.
    pub fn new(name: impl Into<String>, kind: GoalKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How a goal combines its constituent drive strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Activation is the strongest constituent drive.
    Max,
    /// Activation is the sum of constituent drives.
    Sum,
}

/// One goal bank entry.
#[derive(Debug, Clone)]
pub struct GoalDef {
    /// The goal itself.
    pub goal: Goal,
    /// Drives feeding this goal.
    pub drives: Vec<Drive>,
    /// Bottom-up aggregation policy for this goal.
    pub aggregation: Aggregation,
}

/// The static table of goals the agent can pursue.
#[derive(Debug, Clone, Default)]
pub struct GoalBank {
    entries: Vec<GoalDef>,
}

impl GoalBank {
    /// An empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a goal with its feeding drives.
    pub fn define(
        mut self,
        goal: Goal,
        drives: Vec<Drive>,
        aggregation: Aggregation,
    ) -> Self {
        self.entries.push(GoalDef {
            goal,
            drives,
            aggregation,
        });
        self
    }

    /// The competitive baseline goal bank. All goals aggregate by max so
    /// one strong drive is enough to light its goal up.
    #[must_use]
    pub fn competitive() -> Self {
        Self::new()
            .define(
                Goal::new("deal_damage", GoalKind::Move),
                vec![Drive::DoDamage, Drive::RevealHiddenInformation],
                Aggregation::Max,
            )
            .define(
                Goal::new("advance_game", GoalKind::Move),
                vec![Drive::KoOpponent, Drive::RevealHiddenInformation],
                Aggregation::Max,
            )
            .define(
                Goal::new("preserve", GoalKind::Switch),
                vec![Drive::KeepPokemonAlive, Drive::HaveMorePokemonThanOpponent],
                Aggregation::Max,
            )
            .define(
                Goal::new("initiate_advantage", GoalKind::Switch),
                vec![Drive::RevealHiddenInformation, Drive::KeepTypeAdvantage],
                Aggregation::Max,
            )
            .define(
                Goal::new("reposition", GoalKind::Switch),
                vec![
                    Drive::KeepHealthy,
                    Drive::PreventTypeDisadvantage,
                    Drive::RevealHiddenInformation,
                ],
                Aggregation::Max,
            )
    }

    /// The registered goal definitions.
    #[must_use]
    pub fn entries(&self) -> &[GoalDef] {
        &self.entries
    }

    /// Project a drive-strength vector through the bank, producing one
    /// activation scalar per goal.
    #[must_use]
    pub fn activate(&self, strengths: &DriveStrengths) -> Vec<(Goal, f64)> {
        self.entries
            .iter()
            .map(|def| {
                let values = def.drives.iter().map(|d| strengths.get(*d));
                let activation = match def.aggregation {
                    Aggregation::Max => values.fold(0.0, f64::max),
                    Aggregation::Sum => values.sum(),
                };
                (def.goal.clone(), activation)
            })
            .collect()
    }
}

/// The sticky goal selector.
///
/// Holds the only cross-turn state of the motivation stage: the goal each
/// ongoing battle committed to last turn, keyed by battle identifier so
/// concurrent battles cannot leak intent into one another.
#[derive(Debug, Default)]
pub struct GoalSelector {
    previous: HashMap<BattleId, Goal>,
}

impl GoalSelector {
    /// A selector with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select this turn's goal.
    ///
    /// Samples a challenger from the thresholded activations, then applies
    /// stickiness: a differing challenger only displaces the previous goal
    /// once the previous goal's *current* activation has dropped to or
    /// below the stickiness threshold.
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        battle: &BattleId,
        activations: &[(Goal, f64)],
        config: &SelectionConfig,
        rng: &mut R,
    ) -> Option<Goal> {
        let eligible: Vec<(Goal, f64)> = activations
            .iter()
            .filter(|(_, a)| *a > config.goal_threshold)
            .cloned()
            .collect();
        let sampled = boltzmann_pick(&eligible, config.goal_temperature, rng).cloned();

        let selected = match (self.previous.get(battle), sampled) {
            (Some(previous), Some(challenger)) if challenger != *previous => {
                let previous_activation = activations
                    .iter()
                    .find(|(g, _)| g == previous)
                    .map_or(0.0, |(_, a)| *a);
                if previous_activation > config.stickiness_threshold {
                    debug!(%previous, %challenger, previous_activation,
                           "sticking with previous goal");
                    Some(previous.clone())
                } else {
                    debug!(%previous, %challenger, previous_activation,
                           "previous goal has faded, switching");
                    Some(challenger)
                }
            }
            (_, Some(challenger)) => Some(challenger),
            (Some(previous), None) => {
                // Nothing clears the activation floor this turn; hold the
                // previous intent only while it is still strong.
                let previous_activation = activations
                    .iter()
                    .find(|(g, _)| g == previous)
                    .map_or(0.0, |(_, a)| *a);
                (previous_activation > config.stickiness_threshold)
                    .then(|| previous.clone())
            }
            (None, None) => None,
        };

        match &selected {
            Some(goal) => {
                self.previous.insert(battle.clone(), goal.clone());
            }
            None => {
                self.previous.remove(battle);
            }
        }
        selected
    }

    /// The goal this battle committed to last turn, if any.
    #[must_use]
    pub fn previous(&self, battle: &BattleId) -> Option<&Goal> {
        self.previous.get(battle)
    }

    /// Forget a finished battle's goal memory.
    pub fn forget(&mut self, battle: &BattleId) {
        self.previous.remove(battle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn config() -> SelectionConfig {
        SelectionConfig::default()
    }

    fn battle() -> BattleId {
        BattleId::new("battle-test-1")
    }

    #[test]
    fn activation_uses_the_per_goal_policy() {
        let bank = GoalBank::new()
            .define(
                Goal::new("max_goal", GoalKind::Move),
                vec![Drive::DoDamage, Drive::KoOpponent],
                Aggregation::Max,
            )
            .define(
                Goal::new("sum_goal", GoalKind::Move),
                vec![Drive::DoDamage, Drive::KoOpponent],
                Aggregation::Sum,
            );

        let mut strengths = DriveStrengths::new();
        strengths.set(Drive::DoDamage, 2.0);
        strengths.set(Drive::KoOpponent, 3.0);

        let activations = bank.activate(&strengths);
        assert_eq!(activations[0].1, 3.0);
        assert_eq!(activations[1].1, 5.0);
    }

    #[test]
    fn unfed_goals_activate_at_zero() {
        let bank = GoalBank::competitive();
        let activations = bank.activate(&DriveStrengths::new());
        assert!(activations.iter().all(|(_, a)| *a == 0.0));
    }

    #[test]
    fn below_threshold_goals_cannot_be_chosen() {
        let mut selector = GoalSelector::new();
        let mut rng = StdRng::seed_from_u64(1);
        let activations = vec![(Goal::new("faint_hope", GoalKind::Move), 0.0005)];
        let selected = selector.select(&battle(), &activations, &config(), &mut rng);
        assert_eq!(selected, None);
    }

    #[test]
    fn previous_goal_sticks_while_still_active() {
        let mut selector = GoalSelector::new();
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config();
        let b = battle();

        let deal_damage = Goal::new("deal_damage", GoalKind::Move);
        let preserve = Goal::new("preserve", GoalKind::Switch);

        // Turn 1: deal_damage dominates outright.
        let selected = selector.select(
            &b,
            &[(deal_damage.clone(), 5.0), (preserve.clone(), 0.1)],
            &cfg,
            &mut rng,
        );
        assert_eq!(selected, Some(deal_damage.clone()));

        // Turn 2: preserve now dominates the sampling, but deal_damage is
        // still above the stickiness threshold and must be re-emitted.
        let selected = selector.select(
            &b,
            &[(deal_damage.clone(), 2.0), (preserve.clone(), 5.0)],
            &cfg,
            &mut rng,
        );
        assert_eq!(selected, Some(deal_damage));
    }

    #[test]
    fn faded_goal_yields_to_the_challenger() {
        let mut selector = GoalSelector::new();
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config();
        let b = battle();

        let deal_damage = Goal::new("deal_damage", GoalKind::Move);
        let preserve = Goal::new("preserve", GoalKind::Switch);

        selector.select(
            &b,
            &[(deal_damage.clone(), 5.0), (preserve.clone(), 0.1)],
            &cfg,
            &mut rng,
        );

        // deal_damage has dropped to the stickiness threshold (not above),
        // so the dominant challenger takes over.
        let selected = selector.select(
            &b,
            &[(deal_damage, 1.0), (preserve.clone(), 5.0)],
            &cfg,
            &mut rng,
        );
        assert_eq!(selected, Some(preserve));
    }

    #[test]
    fn stickiness_is_scoped_per_battle() {
        let mut selector = GoalSelector::new();
        let mut rng = StdRng::seed_from_u64(9);
        let cfg = config();

        let deal_damage = Goal::new("deal_damage", GoalKind::Move);
        let preserve = Goal::new("preserve", GoalKind::Switch);

        let first = BattleId::new("battle-1");
        let second = BattleId::new("battle-2");

        selector.select(&first, &[(deal_damage.clone(), 5.0)], &cfg, &mut rng);

        // A fresh battle has no previous goal to stick to.
        let selected = selector.select(
            &second,
            &[(deal_damage, 2.0), (preserve.clone(), 5.0)],
            &cfg,
            &mut rng,
        );
        assert_eq!(selected, Some(preserve));
    }

    #[test]
    fn forget_clears_a_battle() {
        let mut selector = GoalSelector::new();
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = config();
        let b = battle();
        let goal = Goal::new("deal_damage", GoalKind::Move);

        selector.select(&b, &[(goal.clone(), 5.0)], &cfg, &mut rng);
        assert_eq!(selector.previous(&b), Some(&goal));

        selector.forget(&b);
        assert_eq!(selector.previous(&b), None);
    }
}
