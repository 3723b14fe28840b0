//! Perception Builder — turning a battle snapshot into a grouped fact base.
//!
//! A pure function of the snapshot: calling it twice on the same input
//! yields attribute-wise equal perceptions. Every concept group is
//! registered up front so later writes cannot silently invent groups.

use crate::fact::{Attribute, AttributeValue};
use crate::perception::{Concept, Perception};
use crate::snapshot::{
    BattleSnapshot, Hp, PokemonSnapshot, Revealed, SideConditionSnapshot,
};

/// Side conditions that stack in layers rather than expire after a fixed
/// number of turns. Everything else is treated as timed and carries a
/// `start_turn` attribute.
const STACKABLE_CONDITIONS: [&str; 2] = ["spikes", "toxicspikes"];

/// Build the full-turn perception from a battle snapshot.
#[must_use]
pub fn perceive(snapshot: &BattleSnapshot) -> Perception {
    let mut perception = Perception::full();

    // Registered groups are fixed and the writes below only address them,
    // so the unregistered-concept error cannot fire here.
    let _ = build(&mut perception, snapshot);

    perception
}

fn build(
    perception: &mut Perception,
    snapshot: &BattleSnapshot,
) -> crate::error::Result<()> {
    perception.add_instance(
        Concept::Battle,
        "metadata",
        vec![
            Attribute::new("battle_tag", snapshot.battle_id.0.clone()),
            Attribute::new("turn", snapshot.turn),
            Attribute::new("force_switch", snapshot.force_switch),
            Attribute::new("wait", snapshot.wait),
        ],
        1.0,
    )?;

    perception.add_instance(
        Concept::Players,
        "self",
        vec![Attribute::new("name", snapshot.player_name.clone())],
        1.0,
    )?;
    perception.add_instance(
        Concept::Players,
        "opponent",
        vec![Attribute::new("name", snapshot.opponent_name.clone())],
        1.0,
    )?;

    for pokemon in &snapshot.team {
        let attributes = pokemon_attributes(pokemon, true);
        if pokemon.active {
            perception.add_instance(
                Concept::ActivePokemon,
                pokemon.species.clone(),
                attributes.clone(),
                1.0,
            )?;
        }
        perception.add_instance(Concept::Team, pokemon.species.clone(), attributes, 1.0)?;
    }

    for pokemon in &snapshot.opponent_team {
        let attributes = pokemon_attributes(pokemon, false);
        if pokemon.active {
            perception.add_instance(
                Concept::OpponentActivePokemon,
                pokemon.species.clone(),
                attributes.clone(),
                1.0,
            )?;
            for ty in &pokemon.types {
                perception.add(Concept::ActiveOpponentType, ty.as_str(), 1.0)?;
            }
        }
        perception.add_instance(
            Concept::OpponentTeam,
            pokemon.species.clone(),
            attributes,
            1.0,
        )?;
    }

    side_conditions(
        perception,
        Concept::SideConditions,
        &snapshot.side_conditions,
    )?;
    side_conditions(
        perception,
        Concept::OpponentSideConditions,
        &snapshot.opponent_side_conditions,
    )?;

    if let Some(weather) = &snapshot.weather {
        perception.add(Concept::Weather, weather.clone(), 1.0)?;
    }
    for effect in &snapshot.field_effects {
        perception.add(Concept::FieldEffects, effect.clone(), 1.0)?;
    }

    for slot in &snapshot.available_moves {
        perception.add(Concept::AvailableMoves, slot.id.clone(), 1.0)?;
    }
    for species in &snapshot.available_switches {
        perception.add(Concept::AvailableSwitches, species.clone(), 1.0)?;
    }

    Ok(())
}

fn side_conditions(
    perception: &mut Perception,
    concept: Concept,
    conditions: &[SideConditionSnapshot],
) -> crate::error::Result<()> {
    for condition in conditions {
        let attribute = if STACKABLE_CONDITIONS.contains(&condition.name.as_str()) {
            Attribute::new("layers", condition.value)
        } else {
            Attribute::new("start_turn", condition.value)
        };
        perception.add_instance(concept, condition.name.clone(), vec![attribute], 1.0)?;
    }
    Ok(())
}

fn pokemon_attributes(pokemon: &PokemonSnapshot, own_side: bool) -> Vec<Attribute> {
    let mut attrs = Vec::with_capacity(24);

    for ty in &pokemon.types {
        attrs.push(Attribute::new("type", ty.as_str()));
    }
    attrs.push(Attribute::new("level", pokemon.level));
    attrs.push(Attribute::new("fainted", pokemon.fainted));
    attrs.push(Attribute::new("active", pokemon.active));

    if let Some(status) = &pokemon.status {
        attrs.push(Attribute::new("status", status.clone()));
    }
    for volatile in &pokemon.volatile_statuses {
        attrs.push(Attribute::new("volatile_status", volatile.clone()));
    }

    attrs.push(Attribute::new("stat_hp", pokemon.stats.hp));
    attrs.push(Attribute::new("stat_attack", pokemon.stats.attack));
    attrs.push(Attribute::new("stat_defense", pokemon.stats.defense));
    attrs.push(Attribute::new("stat_special_attack", pokemon.stats.special_attack));
    attrs.push(Attribute::new("stat_special_defense", pokemon.stats.special_defense));
    attrs.push(Attribute::new("stat_speed", pokemon.stats.speed));

    match pokemon.hp {
        Hp::Exact { current, max } => {
            attrs.push(Attribute::new("hp", current));
            attrs.push(Attribute::new("max_hp", max));
        }
        Hp::Percent(pct) => {
            attrs.push(Attribute::new("hp_percentage", pct));
        }
    }

    attrs.push(revealed_attribute("item", &pokemon.item));
    attrs.push(revealed_attribute("ability", &pokemon.ability));

    // Owner moves are only useful while they have PP left; opponent moves
    // are knowledge and stay listed regardless.
    for slot in &pokemon.moves {
        if own_side && slot.pp == 0 {
            continue;
        }
        attrs.push(Attribute::new("move", slot.id.clone()));
    }

    attrs.push(Attribute::new("boost_attack", i32::from(pokemon.boosts.attack)));
    attrs.push(Attribute::new("boost_defense", i32::from(pokemon.boosts.defense)));
    attrs.push(Attribute::new(
        "boost_special_attack",
        i32::from(pokemon.boosts.special_attack),
    ));
    attrs.push(Attribute::new(
        "boost_special_defense",
        i32::from(pokemon.boosts.special_defense),
    ));
    attrs.push(Attribute::new("boost_speed", i32::from(pokemon.boosts.speed)));
    attrs.push(Attribute::new("boost_accuracy", i32::from(pokemon.boosts.accuracy)));
    attrs.push(Attribute::new("boost_evasion", i32::from(pokemon.boosts.evasion)));

    attrs.push(Attribute::new("terastallized", pokemon.terastallized));

    attrs
}

fn revealed_attribute(name: &str, value: &Revealed<String>) -> Attribute {
    match value {
        Revealed::Unrevealed => Attribute::unknown(name),
        Revealed::Absent => Attribute::new(name, AttributeValue::Text("none".to_string())),
        Revealed::Known(v) => Attribute::new(name, v.clone()),
    }
}
