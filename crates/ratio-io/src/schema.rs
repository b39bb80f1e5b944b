//! Raw serde records mirroring the interchange document, before name
//! resolution. The `"type"` discrimination field maps to a closed enum;
//! records with unknown tags fail to deserialize.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_some_true() -> Option<bool> {
    Some(true)
}

/// Tolerance for single elements written without list brackets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// A factor position: a full record, or the name of one defined earlier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorSource {
    Name(String),
    Record(Box<RawFactor>),
}

/// An enactment position: a full record, or a name reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnactmentSource {
    Name(String),
    Record(RawEnactment),
}

/// A factor record, discriminated by its `"type"` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawFactor {
    Entity(RawEntity),
    Fact(RawFact),
    Exhibit(RawExhibit),
    Evidence(RawEvidence),
    Pleading(RawPleading),
    Allegation(RawAllegation),
}

impl RawFactor {
    pub(crate) fn name(&self) -> Option<&str> {
        match self {
            RawFactor::Entity(r) => r.name.as_deref(),
            RawFactor::Fact(r) => r.name.as_deref(),
            RawFactor::Exhibit(r) => r.name.as_deref(),
            RawFactor::Evidence(r) => r.name.as_deref(),
            RawFactor::Pleading(r) => r.name.as_deref(),
            RawFactor::Allegation(r) => r.name.as_deref(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            RawFactor::Entity(_) => "entity",
            RawFactor::Fact(_) => "fact",
            RawFactor::Exhibit(_) => "exhibit",
            RawFactor::Evidence(_) => "evidence",
            RawFactor::Pleading(_) => "pleading",
            RawFactor::Allegation(_) => "allegation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub generic: bool,
    #[serde(default)]
    pub plural: bool,
}

/// A quantity: a bare number, or a `"35 feet"` magnitude-with-unit string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPredicate {
    pub content: String,
    #[serde(default = "default_some_true")]
    pub truth: Option<bool>,
    #[serde(default)]
    pub reciprocal: bool,
    #[serde(default)]
    pub comparison: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<RawQuantity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFact {
    pub predicate: RawPredicate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_factors: Option<OneOrMany<FactorSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_of_proof: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub absent: bool,
    #[serde(default)]
    pub generic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExhibit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_attribution: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub absent: bool,
    #[serde(default)]
    pub generic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhibit: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_effect: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub absent: bool,
    #[serde(default)]
    pub generic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPleading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filer: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub absent: bool,
    #[serde(default)]
    pub generic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAllegation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pleading: Option<FactorSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub absent: bool,
    #[serde(default)]
    pub generic: bool,
}

/// A pre-resolved legislative citation: the source path and the selected
/// text itself. `"exact"` is accepted as an alias for `"text"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnactment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: String,
    #[serde(alias = "exact")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHolding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<OneOrMany<FactorSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<OneOrMany<FactorSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub despite: Option<OneOrMany<FactorSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enactments: Option<OneOrMany<EnactmentSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enactments_despite: Option<OneOrMany<EnactmentSource>>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub universal: bool,
    #[serde(default = "default_true")]
    pub rule_valid: bool,
    #[serde(default = "default_true")]
    pub decided: bool,
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default)]
    pub generic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A whole interchange document: a bare list of holdings, or an object
/// carrying pre-declared `mentioned_factors` alongside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDocument {
    Holdings(Vec<RawHolding>),
    Document {
        #[serde(default)]
        mentioned_factors: Vec<RawFactor>,
        holdings: Vec<RawHolding>,
    },
}
