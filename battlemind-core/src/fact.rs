//! Facts — the atomic units of perception.
//!
//! A [`Fact`] is an opaque identifier for a concept instance (a species
//! name, a move id, a condition name). Facts may be annotated with the
//! [`Concept`](crate::perception::Concept) group they were perceived under
//! and with an ordered attribute list, but **identity is by identifier
//! alone**: a bare `Fact::new("pikachu")` compares equal to (and hashes
//! identically with) a fully annotated instance of the same id. This is
//! intentional — it lets a consumer look a fact up in a pool whether or
//! not it holds the annotated or the bare version.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::perception::Concept;

/// The value carried by one attribute of a fact instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// A textual value (a type name, a status name, an item id).
    Text(String),
    /// A numeric value (a stat, an HP total, a layer count).
    Number(f64),
    /// A boolean flag (fainted, active, terastallized).
    Flag(bool),
    /// The attribute exists but its value has not been revealed yet.
    Unknown,
}

impl AttributeValue {
    /// The value as text, if it is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a number, if it is numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a flag, if it is boolean.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttributeValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this value is the unrevealed marker.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, AttributeValue::Unknown)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<u32> for AttributeValue {
    fn from(n: u32) -> Self {
        AttributeValue::Number(f64::from(n))
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        AttributeValue::Number(f64::from(n))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Flag(b)
    }
}

/// One (name, value) pair attached to a fact instance.
///
/// Names may repeat — a dual-typed creature carries two `type` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, e.g. `"type"`, `"hp"`, `"fainted"`.
    pub name: String,
    /// Attribute value.
    pub value: AttributeValue,
}

impl Attribute {
    /// Build an attribute from a name and anything convertible to a value.
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Build an attribute carrying the unrevealed marker.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Unknown,
        }
    }
}

/// Result of looking up an attribute by name on a fact.
///
/// The one-vs-many-vs-absent trilemma is deliberate: some attributes are
/// scalar (`hp`), some repeat (`type`, `move`), some may be missing
/// entirely. Collapsing these cases silently invites bugs, so the lookup
/// forces the caller to say which shape it expects.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue<'a> {
    /// No attribute of that name exists on the fact.
    Absent,
    /// Exactly one attribute of that name exists.
    One(&'a AttributeValue),
    /// Several attributes share the name, in perception order.
    Many(Vec<&'a AttributeValue>),
}

impl<'a> FeatureValue<'a> {
    /// The single value, if exactly one exists.
    #[must_use]
    pub fn single(&self) -> Option<&'a AttributeValue> {
        match self {
            FeatureValue::One(v) => Some(v),
            _ => None,
        }
    }

    /// All values, in order. Empty when absent.
    #[must_use]
    pub fn values(&self) -> Vec<&'a AttributeValue> {
        match self {
            FeatureValue::Absent => Vec::new(),
            FeatureValue::One(v) => vec![v],
            FeatureValue::Many(vs) => vs.clone(),
        }
    }
}

/// An atomic labeled perception unit.
///
/// Equality and hashing consider only [`Fact::id`]; the group tag and the
/// attribute list are annotations that do not participate in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    id: String,
    group: Option<Concept>,
    attributes: Vec<Attribute>,
}

impl Fact {
    /// A bare fact with no group or attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: None,
            attributes: Vec::new(),
        }
    }

    /// A fact tagged with the concept group it was perceived under.
    pub fn grouped(id: impl Into<String>, group: Concept) -> Self {
        Self {
            id: id.into(),
            group: Some(group),
            attributes: Vec::new(),
        }
    }

    /// A grouped fact carrying an ordered attribute list.
    pub fn instance(id: impl Into<String>, group: Concept, attributes: Vec<Attribute>) -> Self {
        Self {
            id: id.into(),
            group: Some(group),
            attributes,
        }
    }

    /// The fact identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The group this fact was perceived under, if any.
    #[must_use]
    pub fn group(&self) -> Option<Concept> {
        self.group
    }

    /// The full attribute list, in perception order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up attributes by name, preserving the one/many/absent shape.
    #[must_use]
    pub fn feature(&self, name: &str) -> FeatureValue<'_> {
        let mut found: Vec<&AttributeValue> = self
            .attributes
            .iter()
            .filter(|a| a.name == name)
            .map(|a| &a.value)
            .collect();
        match found.len() {
            0 => FeatureValue::Absent,
            1 => FeatureValue::One(found.remove(0)),
            _ => FeatureValue::Many(found),
        }
    }

    /// Scalar numeric attribute, if present with that shape.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.feature(name).single().and_then(AttributeValue::as_number)
    }

    /// Scalar textual attribute, if present with that shape.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.feature(name).single().and_then(AttributeValue::as_text)
    }

    /// Scalar boolean attribute, if present with that shape.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.feature(name).single().and_then(AttributeValue::as_flag)
    }

    /// All textual values sharing the name (e.g. the 1–2 `type` entries).
    #[must_use]
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.feature(name)
            .values()
            .into_iter()
            .filter_map(AttributeValue::as_text)
            .collect()
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group {
            Some(group) => write!(f, "{}|{}", self.id, group),
            None => write!(f, "{}", self.id),
        }
    }
}
