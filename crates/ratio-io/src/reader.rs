//! Turning raw interchange records into validated core structures.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use ratio_core::{
    Enactment, Entity, Exhibit, Fact, Factor, FactorGroup, Holding, Pleading, Predicate,
    Procedure, Quantity, Rule, Sign, StandardOfProof, Term,
};

use crate::load_error::LoadError;
use crate::name_index::{index_document, Mentioned};
use crate::schema::{
    EnactmentSource, FactorSource, OneOrMany, RawDocument, RawFactor, RawHolding, RawPredicate,
    RawQuantity,
};

/// Depth bound on name-reference chains. Anything deeper is a cycle:
/// references may only point at previously defined objects.
const MAX_REFERENCE_DEPTH: usize = 32;

static QUANTITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*(.*?)\s*$").expect("valid regex"));

/// Load holdings from an interchange JSON string.
pub fn read_holdings_json(json: &str) -> Result<Vec<Holding>, LoadError> {
    let document: RawDocument = serde_json::from_str(json)?;
    read_document(&document)
}

/// Load holdings from an already-parsed raw document, resolving every
/// name reference before construction.
pub fn read_document(document: &RawDocument) -> Result<Vec<Holding>, LoadError> {
    let loader = Loader {
        mentioned: index_document(document),
    };
    let holdings = match document {
        RawDocument::Holdings(raw) => raw,
        RawDocument::Document { holdings, .. } => holdings,
    };
    let loaded = holdings
        .iter()
        .map(|raw| loader.holding(raw))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(holdings = loaded.len(), "loaded interchange document");
    Ok(loaded)
}

struct Loader {
    mentioned: Mentioned,
}

impl Loader {
    fn holding(&self, raw: &RawHolding) -> Result<Holding, LoadError> {
        let outputs = self.factor_group(&raw.outputs)?;
        let inputs = self.factor_group(&raw.inputs)?;
        let despite = self.factor_group(&raw.despite)?;
        let procedure = Procedure::new(outputs, inputs, despite)?;
        let mut rule = Rule::new(procedure)
            .with_mandatory(raw.mandatory)
            .with_universal(raw.universal)
            .with_generic(raw.generic)
            .with_enactments(self.enactment_group(&raw.enactments)?)
            .with_enactments_despite(self.enactment_group(&raw.enactments_despite)?);
        if let Some(name) = &raw.name {
            rule = rule.with_name(name.clone());
        }
        Ok(Holding::build(rule, raw.rule_valid, raw.decided, raw.exclusive)?)
    }

    fn factor_group(
        &self,
        group: &Option<OneOrMany<FactorSource>>,
    ) -> Result<FactorGroup, LoadError> {
        let sources = match group {
            None => Vec::new(),
            Some(group) => group.clone().into_vec(),
        };
        let factors = sources
            .iter()
            .map(|source| self.factor(source, 0))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FactorGroup::new(factors))
    }

    fn enactment_group(
        &self,
        group: &Option<OneOrMany<EnactmentSource>>,
    ) -> Result<Vec<Enactment>, LoadError> {
        let sources = match group {
            None => Vec::new(),
            Some(group) => group.clone().into_vec(),
        };
        sources
            .iter()
            .map(|source| self.enactment(source))
            .collect()
    }

    fn enactment(&self, source: &EnactmentSource) -> Result<Enactment, LoadError> {
        let record = match source {
            EnactmentSource::Name(name) => self.mentioned.enactment(name)?,
            EnactmentSource::Record(record) => record,
        };
        let mut enactment = Enactment::new(record.source.clone(), record.text.clone());
        if let Some(name) = &record.name {
            enactment = enactment.with_name(name.clone());
        }
        Ok(enactment)
    }

    fn resolve<'a>(
        &'a self,
        source: &'a FactorSource,
        depth: usize,
    ) -> Result<&'a RawFactor, LoadError> {
        match source {
            FactorSource::Name(name) => {
                if depth >= MAX_REFERENCE_DEPTH {
                    return Err(LoadError::ReferenceCycle { name: name.clone() });
                }
                self.mentioned.factor(name)
            }
            FactorSource::Record(record) => Ok(&**record),
        }
    }

    fn factor(&self, source: &FactorSource, depth: usize) -> Result<Factor, LoadError> {
        let record = self.resolve(source, depth)?;
        match record {
            RawFactor::Entity(_) => Err(LoadError::KindMismatch {
                name: record.name().unwrap_or("<anonymous>").to_string(),
                expected: "factor",
                found: "entity",
            }),
            _ => self.factor_from_record(record, depth),
        }
    }

    fn term(&self, source: &FactorSource, depth: usize) -> Result<Term, LoadError> {
        let record = self.resolve(source, depth)?;
        match record {
            RawFactor::Entity(raw) => Ok(Term::Entity(Entity {
                name: raw.name.clone(),
                generic: raw.generic,
                plural: raw.plural,
            })),
            _ => Ok(Term::Factor(Box::new(
                self.factor_from_record(record, depth)?,
            ))),
        }
    }

    fn entity(&self, source: &FactorSource, depth: usize) -> Result<Entity, LoadError> {
        let record = self.resolve(source, depth)?;
        match record {
            RawFactor::Entity(raw) => Ok(Entity {
                name: raw.name.clone(),
                generic: raw.generic,
                plural: raw.plural,
            }),
            other => Err(LoadError::KindMismatch {
                name: other.name().unwrap_or("<anonymous>").to_string(),
                expected: "entity",
                found: other.kind(),
            }),
        }
    }

    fn fact(&self, source: &FactorSource, depth: usize) -> Result<Fact, LoadError> {
        let record = self.resolve(source, depth)?;
        match self.factor_from_record(record, depth)? {
            Factor::Fact(fact) => Ok(fact),
            other => Err(LoadError::KindMismatch {
                name: record.name().unwrap_or("<anonymous>").to_string(),
                expected: "fact",
                found: other.kind().as_str(),
            }),
        }
    }

    fn exhibit(&self, source: &FactorSource, depth: usize) -> Result<Exhibit, LoadError> {
        let record = self.resolve(source, depth)?;
        match self.factor_from_record(record, depth)? {
            Factor::Exhibit(exhibit) => Ok(exhibit),
            other => Err(LoadError::KindMismatch {
                name: record.name().unwrap_or("<anonymous>").to_string(),
                expected: "exhibit",
                found: other.kind().as_str(),
            }),
        }
    }

    fn pleading(&self, source: &FactorSource, depth: usize) -> Result<Pleading, LoadError> {
        let record = self.resolve(source, depth)?;
        match self.factor_from_record(record, depth)? {
            Factor::Pleading(pleading) => Ok(pleading),
            other => Err(LoadError::KindMismatch {
                name: record.name().unwrap_or("<anonymous>").to_string(),
                expected: "pleading",
                found: other.kind().as_str(),
            }),
        }
    }

    fn factor_from_record(&self, record: &RawFactor, depth: usize) -> Result<Factor, LoadError> {
        let depth = depth + 1;
        match record {
            RawFactor::Entity(_) => Err(LoadError::KindMismatch {
                name: record.name().unwrap_or("<anonymous>").to_string(),
                expected: "factor",
                found: "entity",
            }),
            RawFactor::Fact(raw) => {
                let predicate = self.predicate(&raw.predicate)?;
                let sources = match &raw.context_factors {
                    None => Vec::new(),
                    Some(group) => group.clone().into_vec(),
                };
                let terms = sources
                    .iter()
                    .map(|source| self.term(source, depth))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut fact = Fact::new(predicate, terms)?;
                if let Some(standard) = &raw.standard_of_proof {
                    fact = fact.with_standard_of_proof(StandardOfProof::parse(standard)?);
                }
                if let Some(name) = &raw.name {
                    fact = fact.with_name(name.clone());
                }
                Ok(Factor::Fact(
                    fact.with_absent(raw.absent).with_generic(raw.generic),
                ))
            }
            RawFactor::Exhibit(raw) => Ok(Factor::Exhibit(Exhibit {
                form: raw.form.clone(),
                statement: raw
                    .statement
                    .as_ref()
                    .map(|s| self.fact(s, depth))
                    .transpose()?,
                stated_by: raw
                    .statement_attribution
                    .as_ref()
                    .map(|s| self.entity(s, depth))
                    .transpose()?,
                name: raw.name.clone(),
                absent: raw.absent,
                generic: raw.generic,
            })),
            RawFactor::Evidence(raw) => Ok(Factor::Evidence(ratio_core::Evidence {
                exhibit: raw
                    .exhibit
                    .as_ref()
                    .map(|s| self.exhibit(s, depth))
                    .transpose()?,
                to_effect: raw
                    .to_effect
                    .as_ref()
                    .map(|s| self.fact(s, depth))
                    .transpose()?,
                name: raw.name.clone(),
                absent: raw.absent,
                generic: raw.generic,
            })),
            RawFactor::Pleading(raw) => Ok(Factor::Pleading(Pleading {
                filer: raw
                    .filer
                    .as_ref()
                    .map(|s| self.entity(s, depth))
                    .transpose()?,
                name: raw.name.clone(),
                absent: raw.absent,
                generic: raw.generic,
            })),
            RawFactor::Allegation(raw) => Ok(Factor::Allegation(ratio_core::Allegation {
                statement: raw
                    .statement
                    .as_ref()
                    .map(|s| self.fact(s, depth))
                    .transpose()?,
                pleading: raw
                    .pleading
                    .as_ref()
                    .map(|s| self.pleading(s, depth))
                    .transpose()?,
                name: raw.name.clone(),
                absent: raw.absent,
                generic: raw.generic,
            })),
        }
    }

    fn predicate(&self, raw: &RawPredicate) -> Result<Predicate, LoadError> {
        let sign = if raw.comparison.is_empty() {
            None
        } else {
            Some(Sign::parse(&raw.comparison)?)
        };
        let quantity = raw.quantity.as_ref().map(parse_quantity).transpose()?;
        Ok(Predicate::build(
            raw.content.clone(),
            raw.truth,
            sign,
            quantity,
            raw.reciprocal,
        )?)
    }
}

fn parse_quantity(raw: &RawQuantity) -> Result<Quantity, LoadError> {
    match raw {
        RawQuantity::Number(magnitude) => Ok(Quantity::dimensionless(*magnitude)),
        RawQuantity::Text(text) => {
            let captures = QUANTITY_PATTERN
                .captures(text)
                .ok_or_else(|| LoadError::BadQuantity { value: text.clone() })?;
            let magnitude: f64 =
                captures[1]
                    .parse()
                    .map_err(|_| LoadError::BadQuantity { value: text.clone() })?;
            let unit = captures[2].trim();
            if unit.is_empty() {
                Ok(Quantity::dimensionless(magnitude))
            } else {
                Ok(Quantity::new(magnitude, unit))
            }
        }
    }
}
