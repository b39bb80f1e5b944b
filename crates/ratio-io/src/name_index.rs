//! Document-scoped index of named objects.
//!
//! Built in one pass over the raw document, consulted while resolving
//! name references, and discarded when loading completes. The core crate
//! never sees it.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::load_error::LoadError;
use crate::schema::{
    EnactmentSource, FactorSource, OneOrMany, RawDocument, RawEnactment, RawFactor, RawHolding,
};

#[derive(Debug, Default)]
pub(crate) struct Mentioned {
    factors: FxHashMap<String, RawFactor>,
    enactments: FxHashMap<String, RawEnactment>,
}

impl Mentioned {
    pub(crate) fn factor(&self, name: &str) -> Result<&RawFactor, LoadError> {
        self.factors.get(name).ok_or_else(|| LoadError::UnknownName {
            name: name.to_string(),
        })
    }

    pub(crate) fn enactment(&self, name: &str) -> Result<&RawEnactment, LoadError> {
        self.enactments
            .get(name)
            .ok_or_else(|| LoadError::UnknownName {
                name: name.to_string(),
            })
    }

    fn insert_factor(&mut self, record: &RawFactor) {
        if let Some(name) = record.name() {
            self.factors.insert(name.to_string(), record.clone());
        }
    }

    fn insert_enactment(&mut self, record: &RawEnactment) {
        if let Some(name) = &record.name {
            self.enactments.insert(name.clone(), record.clone());
        }
    }
}

/// Collect every named record in the document, including records nested
/// inside other records, so later references can be expanded.
pub(crate) fn index_document(document: &RawDocument) -> Mentioned {
    let mut mentioned = Mentioned::default();
    match document {
        RawDocument::Holdings(holdings) => {
            for holding in holdings {
                collect_holding(holding, &mut mentioned);
            }
        }
        RawDocument::Document {
            mentioned_factors,
            holdings,
        } => {
            for factor in mentioned_factors {
                collect_factor(factor, &mut mentioned);
            }
            for holding in holdings {
                collect_holding(holding, &mut mentioned);
            }
        }
    }
    debug!(
        factors = mentioned.factors.len(),
        enactments = mentioned.enactments.len(),
        "indexed named objects"
    );
    mentioned
}

fn collect_holding(holding: &RawHolding, mentioned: &mut Mentioned) {
    for group in [&holding.outputs, &holding.inputs, &holding.despite]
        .into_iter()
        .flatten()
    {
        collect_sources(group, mentioned);
    }
    for group in [&holding.enactments, &holding.enactments_despite]
        .into_iter()
        .flatten()
    {
        let sources: Vec<&EnactmentSource> = match group {
            OneOrMany::One(source) => vec![source],
            OneOrMany::Many(sources) => sources.iter().collect(),
        };
        for source in sources {
            if let EnactmentSource::Record(record) = source {
                mentioned.insert_enactment(record);
            }
        }
    }
}

fn collect_sources(group: &OneOrMany<FactorSource>, mentioned: &mut Mentioned) {
    let sources: Vec<&FactorSource> = match group {
        OneOrMany::One(source) => vec![source],
        OneOrMany::Many(sources) => sources.iter().collect(),
    };
    for source in sources {
        collect_source(source, mentioned);
    }
}

fn collect_source(source: &FactorSource, mentioned: &mut Mentioned) {
    if let FactorSource::Record(record) = source {
        collect_factor(record, mentioned);
    }
}

fn collect_factor(record: &RawFactor, mentioned: &mut Mentioned) {
    match record {
        RawFactor::Entity(_) => {}
        RawFactor::Fact(fact) => {
            if let Some(group) = &fact.context_factors {
                collect_sources(group, mentioned);
            }
        }
        RawFactor::Exhibit(exhibit) => {
            for nested in [&exhibit.statement, &exhibit.statement_attribution]
                .into_iter()
                .flatten()
            {
                collect_source(nested, mentioned);
            }
        }
        RawFactor::Evidence(evidence) => {
            for nested in [&evidence.exhibit, &evidence.to_effect]
                .into_iter()
                .flatten()
            {
                collect_source(nested, mentioned);
            }
        }
        RawFactor::Pleading(pleading) => {
            if let Some(nested) = &pleading.filer {
                collect_source(nested, mentioned);
            }
        }
        RawFactor::Allegation(allegation) => {
            for nested in [&allegation.statement, &allegation.pleading]
                .into_iter()
                .flatten()
            {
                collect_source(nested, mentioned);
            }
        }
    }
    mentioned.insert_factor(record);
}
