//! # Battlemind Core Library
//!
//! Goal-driven action arbitration for a turn-based battle agent.
//!
//! Each turn the engine runs one pass of a motivated-cognition pipeline
//! (Maslow-style drives feeding goals, a dual-process effort split in the
//! spirit of Kahneman's System 1/System 2):
//!
//! 1. **Perceive** — flatten the game snapshot into grouped weighted facts.
//! 2. **Arbitrate drives** — score every drive in `[0, 5]` from perception.
//! 3. **Select a goal** — project drives through the goal bank, Boltzmann
//!    sample, apply stickiness so intent survives perceptual noise.
//! 4. **Decide effort** — try-hard (external look-ahead search) when level
//!    or behind on material, autopilot (type heuristics) when ahead.
//! 5. **Reason** — run only the paths the effort and goal gates admit.
//! 6. **Act** — max-merge the path endorsements, floor, sample once.
//!
//! The engine is deliberately stateless across turns except for the sticky
//! goal memory and the control gates, both keyed by battle so one process
//! can play many battles at once.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod aggregate;
pub mod config;
pub mod dex;
pub mod drives;
pub mod effort;
pub mod error;
pub mod fact;
pub mod gate;
pub mod goals;
pub mod mind;
pub mod observation;
pub mod oracle;
pub mod paths;
pub mod perception;
pub mod sampling;
pub mod snapshot;

pub use aggregate::Action;
pub use config::MindConfig;
pub use dex::Dex;
pub use error::{MindError, Result};
pub use mind::Mind;
pub use oracle::{OptionSet, OracleState, SearchOracle};
pub use snapshot::{BattleId, BattleSnapshot};
