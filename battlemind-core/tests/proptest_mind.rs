//! Property-Based Tests for Battlemind Core
//!
//! Uses `proptest` to verify arbitration invariants under random inputs:
//! drive strengths stay bounded whatever the battle looks like, sampling
//! never indexes out of bounds, and pool operations respect their
//! documented floors.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use battlemind_core::config::MindConfig;
use battlemind_core::dex::PokemonType;
use battlemind_core::drives::{Drive, Personality};
use battlemind_core::effort::{Effort, decide_effort};
use battlemind_core::fact::Fact;
use battlemind_core::observation::perceive;
use battlemind_core::perception::{Concept, FactPool};
use battlemind_core::sampling::boltzmann_index;
use battlemind_core::snapshot::{
    BattleId, BattleSnapshot, BoostBlock, Hp, MoveSlot, PokemonSnapshot, Revealed, StatBlock,
};

// ---------------------------------------------------------------------------
// Strategy helpers — generate arbitrary battle snapshots
// ---------------------------------------------------------------------------

fn member(index: usize, hp_frac: f64, fainted: bool, active: bool, own: bool) -> PokemonSnapshot {
    let max = 240u32;
    let current = (hp_frac * f64::from(max)).round() as u32;
    PokemonSnapshot {
        species: format!("species{index}"),
        level: 80,
        types: vec![PokemonType::Water],
        fainted,
        active,
        status: None,
        volatile_statuses: vec![],
        stats: StatBlock::default(),
        hp: if own {
            Hp::Exact { current, max }
        } else {
            Hp::Percent(hp_frac * 100.0)
        },
        item: if own {
            Revealed::Known("leftovers".to_string())
        } else {
            Revealed::Unrevealed
        },
        ability: Revealed::Unrevealed,
        moves: vec![MoveSlot {
            id: format!("move{index}"),
            pp: 10,
        }],
        boosts: BoostBlock::default(),
        terastallized: false,
    }
}

prop_compose! {
    fn arb_roster(own: bool)(
        hp_fracs in prop::collection::vec(0.0..=1.0f64, 1..=6),
        fainted in prop::collection::vec(any::<bool>(), 6),
    ) -> Vec<PokemonSnapshot> {
        hp_fracs
            .iter()
            .enumerate()
            .map(|(i, frac)| member(i, *frac, fainted[i], i == 0 && !fainted[i], own))
            .collect()
    }
}

prop_compose! {
    fn arb_snapshot()(
        team in arb_roster(true),
        opponents in arb_roster(false),
        force_switch in any::<bool>(),
        move_count in 0usize..=4,
        switch_count in 0usize..=5,
    ) -> BattleSnapshot {
        let available_moves = (0..move_count)
            .map(|i| MoveSlot { id: format!("move{i}"), pp: 10 })
            .collect();
        let available_switches = team
            .iter()
            .skip(1)
            .filter(|p| !p.fainted)
            .take(switch_count)
            .map(|p| p.species.clone())
            .collect();
        BattleSnapshot {
            battle_id: BattleId::new("battle-prop-1"),
            turn: 5,
            force_switch,
            wait: false,
            player_name: "us".to_string(),
            opponent_name: "them".to_string(),
            team,
            opponent_team: opponents,
            available_moves,
            available_switches,
            side_conditions: vec![],
            opponent_side_conditions: vec![],
            weather: None,
            field_effects: vec![],
        }
    }
}

// ---------------------------------------------------------------------------
// Property: every drive strength stays within [0, 5]
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn drive_strengths_stay_bounded(snapshot in arb_snapshot()) {
        let config = MindConfig::default();
        let personality = Personality::competitive(&config.drives, &config.opponent);
        let perception = perceive(&snapshot);
        let strengths = personality.arbitrate(&perception);

        for drive in Drive::ALL {
            let strength = strengths.get(drive);
            prop_assert!(
                (0.0..=5.0).contains(&strength),
                "{drive} out of range: {strength}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property: Boltzmann sampling never indexes out of bounds
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn boltzmann_index_is_always_in_bounds(
        weights in prop::collection::vec(0.0..10.0f64, 0..20),
        temperature in 0.001..5.0f64,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        match boltzmann_index(&weights, temperature, &mut rng) {
            Some(index) => prop_assert!(index < weights.len()),
            None => prop_assert!(weights.is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Property: pool thresholding and merging respect their documented floors
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn thresholding_never_keeps_weak_entries(
        weights in prop::collection::vec(0.0..1.0f64, 0..12),
        threshold in 0.0..1.0f64,
    ) {
        let pool: FactPool = weights
            .iter()
            .enumerate()
            .map(|(i, w)| (Fact::new(format!("fact{i}")), *w))
            .collect();

        let kept = pool.thresholded(threshold);
        for (_, weight) in kept.iter() {
            prop_assert!(weight > threshold);
        }
    }

    #[test]
    fn merge_max_is_an_upper_bound(
        left in prop::collection::vec(0.0..1.0f64, 1..8),
        right in prop::collection::vec(0.0..1.0f64, 1..8),
    ) {
        let a: FactPool = left
            .iter()
            .enumerate()
            .map(|(i, w)| (Fact::new(format!("fact{i}")), *w))
            .collect();
        let b: FactPool = right
            .iter()
            .enumerate()
            .map(|(i, w)| (Fact::new(format!("fact{i}")), *w))
            .collect();

        let mut merged = a.clone();
        merged.merge_max(&b);
        for (fact, weight) in a.iter() {
            prop_assert!(merged.weight(fact) >= weight);
        }
        for (fact, weight) in b.iter() {
            prop_assert!(merged.weight(fact) >= weight);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: the effort split is exactly the material comparison
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn effort_matches_the_material_comparison(
        own_fainted in prop::collection::vec(any::<bool>(), 1..=6),
        opponent_fainted in prop::collection::vec(any::<bool>(), 0..=6),
    ) {
        let mut team = FactPool::new();
        for (i, fainted) in own_fainted.iter().enumerate() {
            team.insert(
                Fact::instance(
                    format!("own{i}"),
                    Concept::Team,
                    vec![battlemind_core::fact::Attribute::new("fainted", *fainted)],
                ),
                1.0,
            );
        }
        let mut opponents = FactPool::new();
        for (i, fainted) in opponent_fainted.iter().enumerate() {
            opponents.insert(
                Fact::instance(
                    format!("opp{i}"),
                    Concept::OpponentTeam,
                    vec![battlemind_core::fact::Attribute::new("fainted", *fainted)],
                ),
                1.0,
            );
        }

        let usable = own_fainted.iter().filter(|f| !**f).count() as u32;
        let opponent_usable =
            6u32.saturating_sub(opponent_fainted.iter().filter(|f| **f).count() as u32);
        let expected = if usable <= opponent_usable {
            Effort::TryHard
        } else {
            Effort::Autopilot
        };

        prop_assert_eq!(decide_effort(&team, &opponents, 6), expected);
    }
}
