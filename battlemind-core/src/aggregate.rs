//! Action aggregation — merging path endorsements into one choice.
//!
//! Every reasoning path emits a weighted pool over the same action
//! vocabulary, so paths combine by elementwise max: an action endorsed
//! strongly by any one path keeps that endorsement regardless of what the
//! others think. The merged pool is floored by a salience threshold and
//! the survivors are Boltzmann-sampled, which keeps the pick mostly-greedy
//! while leaving near-ties genuinely stochastic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fact::Fact;
use crate::oracle::SWITCH_PREFIX;
use crate::perception::{Concept, FactPool};
use crate::sampling::boltzmann_index;

/// A concrete action the agent has committed to this turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Use the named move.
    UseMove(String),
    /// Switch to the named team member.
    Switch(String),
}

impl Action {
    /// The option string the game server expects.
    #[must_use]
    pub fn command(&self) -> String {
        match self {
            Action::UseMove(id) => id.clone(),
            Action::Switch(target) => format!("{SWITCH_PREFIX}{target}"),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command())
    }
}

/// Merge the pools produced by this turn's reasoning paths.
#[must_use]
pub fn merge_paths(pools: &[FactPool]) -> FactPool {
    let mut merged = FactPool::new();
    for pool in pools {
        merged.merge_max(pool);
    }
    merged
}

/// Pick the turn's action from a merged endorsement pool.
///
/// Entries at or below `threshold` are discarded first; `None` means
/// nothing cleared the floor and the caller should fall back to a default
/// choice outside this engine.
pub fn pick_action<R: Rng + ?Sized>(
    merged: &FactPool,
    threshold: f64,
    temperature: f64,
    rng: &mut R,
) -> Option<Action> {
    let eligible = merged.thresholded(threshold);
    if eligible.is_empty() {
        debug!(candidates = merged.len(), "no action cleared the salience floor");
        return None;
    }

    let entries: Vec<(&Fact, f64)> = eligible.iter().collect();
    let weights: Vec<f64> = entries.iter().map(|(_, w)| *w).collect();
    let index = boltzmann_index(&weights, temperature, rng)?;
    let (fact, weight) = entries[index];

    let action = action_for(fact);
    debug!(%action, weight, candidates = entries.len(), "picked action");
    Some(action)
}

/// Classify an endorsed fact as a move or a switch by its group tag; the
/// oracle's switch prefix covers ungrouped facts.
fn action_for(fact: &Fact) -> Action {
    match fact.group() {
        Some(Concept::AvailableSwitches) => Action::Switch(fact.id().to_string()),
        Some(_) => Action::UseMove(fact.id().to_string()),
        None => match fact.id().strip_prefix(SWITCH_PREFIX) {
            Some(target) => Action::Switch(target.to_string()),
            None => Action::UseMove(fact.id().to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn move_fact(id: &str) -> Fact {
        Fact::grouped(id, Concept::AvailableMoves)
    }

    fn switch_fact(id: &str) -> Fact {
        Fact::grouped(id, Concept::AvailableSwitches)
    }

    #[test]
    fn merge_keeps_the_strongest_endorsement_per_action() {
        let mut a = FactPool::new();
        a.insert(move_fact("surf"), 0.5);
        let mut b = FactPool::new();
        b.insert(move_fact("surf"), 0.25);
        b.insert(switch_fact("lapras"), 0.75);

        let merged = merge_paths(&[a, b]);
        assert_eq!(merged.weight_of("surf"), 0.5);
        assert_eq!(merged.weight_of("lapras"), 0.75);
    }

    #[test]
    fn empty_and_thresholded_out_pools_yield_no_action() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_action(&FactPool::new(), 0.001, 0.2, &mut rng), None);

        let mut faint = FactPool::new();
        faint.insert(move_fact("splash"), 0.0005);
        assert_eq!(pick_action(&faint, 0.001, 0.2, &mut rng), None);
    }

    #[test]
    fn dominant_action_wins_at_low_temperature() {
        let mut pool = FactPool::new();
        pool.insert(move_fact("thunderbolt"), 1.0);
        pool.insert(move_fact("tackle"), 0.1);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let action = pick_action(&pool, 0.001, 0.01, &mut rng);
            assert_eq!(action, Some(Action::UseMove("thunderbolt".to_string())));
        }
    }

    #[test]
    fn switch_facts_become_switch_actions() {
        let mut pool = FactPool::new();
        pool.insert(switch_fact("gliscor"), 1.0);

        let mut rng = StdRng::seed_from_u64(1);
        let action = pick_action(&pool, 0.001, 0.2, &mut rng);
        assert_eq!(action, Some(Action::Switch("gliscor".to_string())));
    }

    #[test]
    fn ungrouped_prefixed_facts_are_classified_by_prefix() {
        let mut pool = FactPool::new();
        pool.insert(Fact::new("switch lapras"), 1.0);

        let mut rng = StdRng::seed_from_u64(1);
        let action = pick_action(&pool, 0.001, 0.2, &mut rng);
        assert_eq!(action, Some(Action::Switch("lapras".to_string())));
    }

    #[test]
    fn commands_round_trip_the_switch_prefix() {
        assert_eq!(Action::UseMove("surf".to_string()).command(), "surf");
        assert_eq!(
            Action::Switch("lapras".to_string()).command(),
            "switch lapras"
        );
    }
}
