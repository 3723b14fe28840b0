//! Error types for the battlemind core library.
//!
//! The error taxonomy is deliberately small. Missing facts are *not*
//! errors (evaluators treat an empty group as a meaningful input) and
//! unknown move/species identifiers degrade to neutral effectiveness with
//! a warning. Only programming errors and boundary failures surface here.

use thiserror::Error;

use crate::perception::Concept;

/// Top-level error type for all battlemind operations.
#[derive(Error, Debug)]
pub enum MindError {
    /// A fact was written into a concept group the perception was not
    /// built with. This is a programming error in the perception builder,
    /// not a runtime battle condition, and fails fast.
    #[error("Concept {concept} is not registered in this perception")]
    UnregisteredConcept {
        /// The group that was addressed.
        concept: Concept,
    },

    /// A perception handed to the oracle converter was missing a fact the
    /// search state cannot be built without (e.g. battle metadata).
    #[error("Cannot build search state: missing required fact {fact:?} in group {concept}")]
    IncompletePerception {
        /// The group that was consulted.
        concept: Concept,
        /// The fact identifier that was expected.
        fact: String,
    },

    /// The external search oracle failed to produce a result.
    #[error("Search oracle failure: {0}")]
    Oracle(String),

    /// Configuration error (invalid TOML, out-of-range tunable).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference data could not be parsed.
    #[error("Reference data error: {0}")]
    ReferenceData(#[from] serde_json::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MindError>;
