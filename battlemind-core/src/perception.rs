//! Grouped perception — the structured fact base one turn reasons over.
//!
//! A [`Perception`] maps named [`Concept`] groups to weighted sets of
//! facts. It is built fresh every turn and carries no cross-turn identity.
//! Downstream consumers never see the whole perception directly: they
//! narrow it through [`Perception::attend`], the uniform attention filter
//! that yields only the groups a component declares interest in.

use std::collections::HashMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{MindError, Result};
use crate::fact::Fact;

/// A named perception category.
///
/// The set of groups is fixed; the perception builder registers the
/// subset it will populate and writes into unregistered groups fail fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concept {
    /// Battle metadata: tag, turn, force-switch flag.
    Battle,
    /// The two player identities.
    Players,
    /// Our active creature (0 or 1 fact instance).
    ActivePokemon,
    /// Our full roster.
    Team,
    /// The opponent's active creature (0 or 1 fact instance).
    OpponentActivePokemon,
    /// The opponent's revealed roster.
    OpponentTeam,
    /// The opponent's active creature's 1–2 types as bare facts.
    ActiveOpponentType,
    /// Conditions on our side of the field.
    SideConditions,
    /// Conditions on the opponent's side of the field.
    OpponentSideConditions,
    /// Current weather, if any.
    Weather,
    /// Whole-field effects (terrains, trick room).
    FieldEffects,
    /// Moves we may legally select this turn.
    AvailableMoves,
    /// Switch targets we may legally select this turn.
    AvailableSwitches,
}

impl Concept {
    /// Every concept group, in the order the perception builder emits them.
    pub const ALL: [Concept; 13] = [
        Concept::Battle,
        Concept::Players,
        Concept::ActivePokemon,
        Concept::Team,
        Concept::OpponentActivePokemon,
        Concept::OpponentTeam,
        Concept::ActiveOpponentType,
        Concept::SideConditions,
        Concept::OpponentSideConditions,
        Concept::Weather,
        Concept::FieldEffects,
        Concept::AvailableMoves,
        Concept::AvailableSwitches,
    ];

    /// Stable lowercase name of the group.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Concept::Battle => "battle",
            Concept::Players => "players",
            Concept::ActivePokemon => "active_pokemon",
            Concept::Team => "team",
            Concept::OpponentActivePokemon => "opponent_active_pokemon",
            Concept::OpponentTeam => "opponent_team",
            Concept::ActiveOpponentType => "active_opponent_type",
            Concept::SideConditions => "side_conditions",
            Concept::OpponentSideConditions => "opponent_side_conditions",
            Concept::Weather => "weather",
            Concept::FieldEffects => "field_effects",
            Concept::AvailableMoves => "available_moves",
            Concept::AvailableSwitches => "available_switches",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A weighted set of facts, keyed by fact identity.
///
/// Weights are salience scalars, typically 1.0 from perception and
/// arbitrary non-negative scores inside reasoning paths. Lookups of
/// unlisted facts read as weight 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactPool {
    entries: Vec<(Fact, f64)>,
}

impl FactPool {
    /// An empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact, replacing any existing entry of the same identity.
    pub fn insert(&mut self, fact: Fact, weight: f64) {
        if let Some(slot) = self.entries.iter_mut().find(|(f, _)| *f == fact) {
            *slot = (fact, weight);
        } else {
            self.entries.push((fact, weight));
        }
    }

    /// Insert a fact, keeping the larger weight if it is already present.
    pub fn insert_max(&mut self, fact: Fact, weight: f64) {
        if let Some(slot) = self.entries.iter_mut().find(|(f, _)| *f == fact) {
            if weight > slot.1 {
                *slot = (fact, weight);
            }
        } else {
            self.entries.push((fact, weight));
        }
    }

    /// The weight of a fact, 0.0 when unlisted.
    #[must_use]
    pub fn weight(&self, fact: &Fact) -> f64 {
        self.entries
            .iter()
            .find(|(f, _)| f == fact)
            .map_or(0.0, |(_, w)| *w)
    }

    /// The weight of a fact addressed by bare identifier.
    #[must_use]
    pub fn weight_of(&self, id: &str) -> f64 {
        self.weight(&Fact::new(id))
    }

    /// The stored (annotated) fact matching an identifier, if listed.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Fact> {
        let probe = Fact::new(id);
        self.entries.iter().map(|(f, _)| f).find(|f| **f == probe)
    }

    /// Whether a fact of this identity is listed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The sole fact in the pool, if it holds exactly one.
    #[must_use]
    pub fn only(&self) -> Option<&Fact> {
        match self.entries.as_slice() {
            [(fact, _)] => Some(fact),
            _ => None,
        }
    }

    /// Number of listed facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool lists no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (fact, weight) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fact, f64)> {
        self.entries.iter().map(|(f, w)| (f, *w))
    }

    /// Iterate over the facts alone.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.entries.iter().map(|(f, _)| f)
    }

    /// The maximum weight in the pool, 0.0 when empty.
    #[must_use]
    pub fn max_weight(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, w)| OrderedFloat(*w))
            .max()
            .map_or(0.0, |w| w.0)
    }

    /// Keep only entries whose weight strictly exceeds `threshold`.
    #[must_use]
    pub fn thresholded(&self, threshold: f64) -> FactPool {
        FactPool {
            entries: self
                .entries
                .iter()
                .filter(|(_, w)| *w > threshold)
                .cloned()
                .collect(),
        }
    }

    /// Divide all weights by `divisor`. No-op on an empty pool.
    #[must_use]
    pub fn normalized_by(&self, divisor: f64) -> FactPool {
        FactPool {
            entries: self
                .entries
                .iter()
                .map(|(f, w)| (f.clone(), w / divisor))
                .collect(),
        }
    }

    /// Merge another pool in, keeping the elementwise maximum weight per
    /// fact. An action endorsed strongly by one path must not be diluted
    /// by another, so summation is wrong here.
    pub fn merge_max(&mut self, other: &FactPool) {
        for (fact, weight) in other.iter() {
            self.insert_max(fact.clone(), weight);
        }
    }
}

impl FromIterator<(Fact, f64)> for FactPool {
    fn from_iter<I: IntoIterator<Item = (Fact, f64)>>(iter: I) -> Self {
        let mut pool = FactPool::new();
        for (fact, weight) in iter {
            pool.insert(fact, weight);
        }
        pool
    }
}

/// A full-turn perception: concept group → weighted fact set.
///
/// Invariant: every fact stored under a group carries that group's tag.
#[derive(Debug, Clone, Default)]
pub struct Perception {
    groups: HashMap<Concept, FactPool>,
}

impl Perception {
    /// A perception registered over the given groups, all initially empty.
    #[must_use]
    pub fn with_groups(concepts: &[Concept]) -> Self {
        let mut groups = HashMap::with_capacity(concepts.len());
        for concept in concepts {
            groups.insert(*concept, FactPool::new());
        }
        Self { groups }
    }

    /// A perception registered over every known concept group.
    #[must_use]
    pub fn full() -> Self {
        Self::with_groups(&Concept::ALL)
    }

    /// Add a bare fact to a group with the given salience.
    ///
    /// # Errors
    /// Fails fast with [`MindError::UnregisteredConcept`] when the group
    /// was not registered at construction.
    pub fn add(&mut self, concept: Concept, id: impl Into<String>, weight: f64) -> Result<()> {
        let fact = Fact::grouped(id, concept);
        self.add_fact(concept, fact, weight)
    }

    /// Add a fact instance (grouped fact with attributes) to a group.
    ///
    /// # Errors
    /// Fails fast with [`MindError::UnregisteredConcept`] when the group
    /// was not registered at construction.
    pub fn add_instance(
        &mut self,
        concept: Concept,
        id: impl Into<String>,
        attributes: Vec<crate::fact::Attribute>,
        weight: f64,
    ) -> Result<()> {
        let fact = Fact::instance(id, concept, attributes);
        self.add_fact(concept, fact, weight)
    }

    fn add_fact(&mut self, concept: Concept, fact: Fact, weight: f64) -> Result<()> {
        let Some(pool) = self.groups.get_mut(&concept) else {
            return Err(MindError::UnregisteredConcept { concept });
        };
        pool.insert(fact, weight);
        Ok(())
    }

    /// The fact pool of one group. Empty (not an error) when the group is
    /// unregistered or unpopulated.
    #[must_use]
    pub fn group(&self, concept: Concept) -> FactPool {
        self.groups.get(&concept).cloned().unwrap_or_default()
    }

    /// The attention filter: a single pool holding only facts whose group
    /// tag is in `concepts`, weights preserved. Absent groups contribute
    /// nothing.
    #[must_use]
    pub fn attend(&self, concepts: &[Concept]) -> FactPool {
        let mut attended = FactPool::new();
        for concept in concepts {
            if let Some(pool) = self.groups.get(concept) {
                attended.merge_max(pool);
            }
        }
        attended
    }

    /// Whether any registered group holds at least one fact.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(FactPool::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Attribute;

    #[test]
    fn attention_restricts_to_requested_groups() {
        let mut perception = Perception::full();
        perception.add(Concept::Team, "drapion", 1.0).unwrap();
        perception.add(Concept::Team, "snorlax", 1.0).unwrap();
        perception
            .add(Concept::OpponentTeam, "joltik", 0.7)
            .unwrap();

        let attended = perception.attend(&[Concept::OpponentTeam]);
        assert_eq!(attended.len(), 1);
        assert_eq!(attended.weight_of("joltik"), 0.7);
        assert!(!attended.contains("drapion"));
    }

    #[test]
    fn attention_on_absent_group_is_empty_not_an_error() {
        let perception = Perception::with_groups(&[Concept::Team]);
        let attended = perception.attend(&[Concept::Weather, Concept::FieldEffects]);
        assert!(attended.is_empty());
    }

    #[test]
    fn write_to_unregistered_group_fails_fast() {
        let mut perception = Perception::with_groups(&[Concept::Team]);
        let err = perception.add(Concept::Weather, "sandstorm", 1.0);
        assert!(matches!(
            err,
            Err(MindError::UnregisteredConcept {
                concept: Concept::Weather
            })
        ));
    }

    #[test]
    fn group_facts_carry_their_group_tag() {
        let mut perception = Perception::full();
        perception
            .add_instance(
                Concept::ActivePokemon,
                "garchomp",
                vec![Attribute::new("hp", 180.0)],
                1.0,
            )
            .unwrap();

        let pool = perception.group(Concept::ActivePokemon);
        let fact = pool.only().unwrap();
        assert_eq!(fact.group(), Some(Concept::ActivePokemon));
        assert_eq!(fact.number("hp"), Some(180.0));
    }

    #[test]
    fn pool_lookup_ignores_annotations() {
        let mut pool = FactPool::new();
        pool.insert(
            Fact::instance(
                "thunderbolt",
                Concept::AvailableMoves,
                vec![Attribute::new("type", "electric")],
            ),
            0.9,
        );
        assert_eq!(pool.weight_of("thunderbolt"), 0.9);
    }

    #[test]
    fn merge_max_keeps_strongest_endorsement() {
        let mut a = FactPool::new();
        a.insert(Fact::new("surf"), 0.5);
        let mut b = FactPool::new();
        b.insert(Fact::new("surf"), 0.25);
        b.insert(Fact::new("icebeam"), 1.0);

        a.merge_max(&b);
        assert_eq!(a.weight_of("surf"), 0.5);
        assert_eq!(a.weight_of("icebeam"), 1.0);
    }
}
