//! Serializing core structures back to interchange records.

use ratio_core::{
    Enactment, Entity, Fact, Factor, Holding, Quantity, Sign, Term,
};

use crate::schema::{
    EnactmentSource, FactorSource, OneOrMany, RawDocument, RawEnactment, RawEntity, RawFact,
    RawFactor, RawHolding, RawPredicate, RawQuantity,
};

/// Dump holdings as a raw document (the bare-list form).
pub fn dump_holdings(holdings: &[Holding]) -> RawDocument {
    RawDocument::Holdings(holdings.iter().map(raw_holding).collect())
}

/// Dump holdings as pretty-printed interchange JSON.
pub fn dump_holdings_json(holdings: &[Holding]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&dump_holdings(holdings))
}

fn raw_holding(holding: &Holding) -> RawHolding {
    let rule = holding.rule();
    RawHolding {
        outputs: factor_sources(rule.outputs().factors()),
        inputs: factor_sources(rule.inputs().factors()),
        despite: factor_sources(rule.despite().factors()),
        enactments: enactment_sources(rule.enactments()),
        enactments_despite: enactment_sources(rule.enactments_despite()),
        mandatory: rule.is_mandatory(),
        universal: rule.is_universal(),
        rule_valid: holding.is_valid(),
        decided: holding.is_decided(),
        exclusive: holding.is_exclusive(),
        generic: rule.is_generic(),
        name: rule.name().map(str::to_string),
    }
}

fn factor_sources(factors: &[Factor]) -> Option<OneOrMany<FactorSource>> {
    if factors.is_empty() {
        return None;
    }
    Some(OneOrMany::Many(
        factors
            .iter()
            .map(|factor| FactorSource::Record(Box::new(raw_factor(factor))))
            .collect(),
    ))
}

fn enactment_sources(enactments: &[Enactment]) -> Option<OneOrMany<EnactmentSource>> {
    if enactments.is_empty() {
        return None;
    }
    Some(OneOrMany::Many(
        enactments
            .iter()
            .map(|enactment| {
                EnactmentSource::Record(RawEnactment {
                    name: enactment.name.clone(),
                    source: enactment.source.clone(),
                    text: enactment.text.clone(),
                })
            })
            .collect(),
    ))
}

fn raw_factor(factor: &Factor) -> RawFactor {
    match factor {
        Factor::Fact(fact) => RawFactor::Fact(raw_fact(fact)),
        Factor::Exhibit(exhibit) => RawFactor::Exhibit(crate::schema::RawExhibit {
            form: exhibit.form.clone(),
            statement: exhibit
                .statement
                .as_ref()
                .map(|s| FactorSource::Record(Box::new(RawFactor::Fact(raw_fact(s))))),
            statement_attribution: exhibit
                .stated_by
                .as_ref()
                .map(|e| FactorSource::Record(Box::new(RawFactor::Entity(raw_entity(e))))),
            name: exhibit.name.clone(),
            absent: exhibit.absent,
            generic: exhibit.generic,
        }),
        Factor::Evidence(evidence) => RawFactor::Evidence(crate::schema::RawEvidence {
            exhibit: evidence
                .exhibit
                .as_ref()
                .map(|e| FactorSource::Record(Box::new(raw_factor(&Factor::Exhibit(e.clone()))))),
            to_effect: evidence
                .to_effect
                .as_ref()
                .map(|s| FactorSource::Record(Box::new(RawFactor::Fact(raw_fact(s))))),
            name: evidence.name.clone(),
            absent: evidence.absent,
            generic: evidence.generic,
        }),
        Factor::Pleading(pleading) => RawFactor::Pleading(crate::schema::RawPleading {
            filer: pleading
                .filer
                .as_ref()
                .map(|e| FactorSource::Record(Box::new(RawFactor::Entity(raw_entity(e))))),
            name: pleading.name.clone(),
            absent: pleading.absent,
            generic: pleading.generic,
        }),
        Factor::Allegation(allegation) => RawFactor::Allegation(crate::schema::RawAllegation {
            statement: allegation
                .statement
                .as_ref()
                .map(|s| FactorSource::Record(Box::new(RawFactor::Fact(raw_fact(s))))),
            pleading: allegation
                .pleading
                .as_ref()
                .map(|p| FactorSource::Record(Box::new(raw_factor(&Factor::Pleading(p.clone()))))),
            name: allegation.name.clone(),
            absent: allegation.absent,
            generic: allegation.generic,
        }),
    }
}

fn raw_fact(fact: &Fact) -> RawFact {
    let predicate = fact.predicate();
    let terms: Vec<FactorSource> = fact.terms().iter().map(raw_term).collect();
    RawFact {
        predicate: RawPredicate {
            content: predicate.content().to_string(),
            truth: predicate.truth(),
            reciprocal: predicate.reciprocal(),
            comparison: predicate
                .sign()
                .map(|s: Sign| s.as_str().to_string())
                .unwrap_or_default(),
            quantity: predicate.quantity().map(raw_quantity),
        },
        context_factors: if terms.is_empty() {
            None
        } else {
            Some(OneOrMany::Many(terms))
        },
        standard_of_proof: fact.standard_of_proof().map(|s| s.as_str().to_string()),
        name: fact.name.clone(),
        absent: fact.absent,
        generic: fact.generic,
    }
}

fn raw_term(term: &Term) -> FactorSource {
    match term {
        Term::Entity(entity) => FactorSource::Record(Box::new(RawFactor::Entity(raw_entity(entity)))),
        Term::Factor(factor) => FactorSource::Record(Box::new(raw_factor(factor))),
    }
}

fn raw_entity(entity: &Entity) -> RawEntity {
    RawEntity {
        name: entity.name.clone(),
        generic: entity.generic,
        plural: entity.plural,
    }
}

fn raw_quantity(quantity: &Quantity) -> RawQuantity {
    if quantity.unit == "dimensionless" {
        RawQuantity::Number(quantity.magnitude)
    } else {
        RawQuantity::Text(format!("{} {}", quantity.magnitude, quantity.unit))
    }
}
