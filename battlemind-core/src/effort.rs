//! Effort — deciding between cheap heuristics and expensive search.
//!
//! A binary classifier over team composition: when we are losing on
//! material (or tied) the turn is worth a deep look-ahead, otherwise the
//! cheap type-effectiveness heuristics are enough. The decision is pure
//! and memoryless; it is published through a [`GateStore`](crate::gate::GateStore)
//! so downstream reasoning paths can consult it without knowing who
//! decided.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::perception::FactPool;

/// The per-turn compute budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    /// Spend compute on the look-ahead search.
    TryHard,
    /// Use cheap heuristics only.
    Autopilot,
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Effort::TryHard => "try_hard",
            Effort::Autopilot => "autopilot",
        })
    }
}

/// Decide the turn's effort level from the two rosters.
///
/// Our usable count is the number of non-fainted creatures we can see
/// (we see our whole team). The opponent's is `assumed_team_size` minus
/// their known fainted count — unseen party slots are assumed alive.
/// Losing or tied on material means try-hard.
#[must_use]
pub fn decide_effort(
    team: &FactPool,
    opponent_team: &FactPool,
    assumed_team_size: u32,
) -> Effort {
    let usable = team
        .facts()
        .filter(|p| !p.flag("fainted").unwrap_or(false))
        .count() as u32;

    let opponent_fainted = opponent_team
        .facts()
        .filter(|p| p.flag("fainted").unwrap_or(false))
        .count() as u32;
    let opponent_usable = assumed_team_size.saturating_sub(opponent_fainted);

    let effort = if usable <= opponent_usable {
        Effort::TryHard
    } else {
        Effort::Autopilot
    };
    debug!(usable, opponent_usable, %effort, "decided effort level");
    effort
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::{Attribute, Fact};
    use crate::perception::Concept;

    fn roster(concept: Concept, members: &[(&str, bool)]) -> FactPool {
        let mut pool = FactPool::new();
        for (species, fainted) in members {
            pool.insert(
                Fact::instance(
                    *species,
                    concept,
                    vec![Attribute::new("fainted", *fainted)],
                ),
                1.0,
            );
        }
        pool
    }

    #[test]
    fn ahead_on_material_means_autopilot() {
        // 4 usable of 4 vs an assumed 6 with 3 known fainted = 3 usable.
        let team = roster(
            Concept::Team,
            &[("a", false), ("b", false), ("c", false), ("d", false)],
        );
        let opponent = roster(
            Concept::OpponentTeam,
            &[("x", true), ("y", true), ("z", true)],
        );
        assert_eq!(decide_effort(&team, &opponent, 6), Effort::Autopilot);
    }

    #[test]
    fn behind_on_material_means_try_hard() {
        let team = roster(Concept::Team, &[("a", false), ("b", true)]);
        let opponent = roster(Concept::OpponentTeam, &[("x", false)]);
        assert_eq!(decide_effort(&team, &opponent, 6), Effort::TryHard);
    }

    #[test]
    fn equal_counts_mean_try_hard() {
        // Boundary: usable <= opponent_usable includes equality.
        let team = roster(
            Concept::Team,
            &[
                ("a", false),
                ("b", false),
                ("c", false),
                ("d", false),
                ("e", false),
                ("f", false),
            ],
        );
        let opponent = roster(Concept::OpponentTeam, &[]);
        assert_eq!(decide_effort(&team, &opponent, 6), Effort::TryHard);
    }

    #[test]
    fn unseen_opponents_are_assumed_alive() {
        // Opponent revealed nothing: all six assumed usable.
        let team = roster(
            Concept::Team,
            &[("a", false), ("b", false), ("c", false), ("d", false), ("e", false)],
        );
        let opponent = FactPool::new();
        assert_eq!(decide_effort(&team, &opponent, 6), Effort::TryHard);
    }
}
