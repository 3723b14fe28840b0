//! Gates — small persistent control-signal stores.
//!
//! A gate decouples a decision (which goal kind is active, how much
//! effort to spend) from the reasoning paths that consult it: the writer
//! does not know which paths exist, and paths check the gate before doing
//! any work. One process may run many battles concurrently, so every
//! value is keyed by battle identifier — gate state must never leak
//! between battles.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::snapshot::BattleId;

/// A per-battle store of one control signal.
#[derive(Debug, Default)]
pub struct GateStore<T> {
    values: RwLock<HashMap<BattleId, T>>,
}

impl<T: Clone + Eq + Hash> GateStore<T> {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Write this battle's current signal, replacing any previous value.
    pub fn write(&self, battle: &BattleId, value: T) {
        self.values.write().insert(battle.clone(), value);
    }

    /// Read this battle's current signal, if one has been written.
    #[must_use]
    pub fn read(&self, battle: &BattleId) -> Option<T> {
        self.values.read().get(battle).cloned()
    }

    /// Whether this battle's signal currently matches `value`.
    #[must_use]
    pub fn matches(&self, battle: &BattleId, value: &T) -> bool {
        self.read(battle).as_ref() == Some(value)
    }

    /// Drop this battle's signal. Called when a battle ends.
    pub fn clear(&self, battle: &BattleId) {
        self.values.write().remove(battle);
    }
}
