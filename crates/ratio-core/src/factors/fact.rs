use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::FactorError;
use crate::matching::ContextRegister;
use crate::predicates::Predicate;
use crate::terms::{Term, TermSequence};

/// How certain a factual finding must be. Ordered from weakest to
/// strongest; a finding under a stronger standard implies the same finding
/// under a weaker one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardOfProof {
    Scintilla,
    SubstantialEvidence,
    Preponderance,
    ClearAndConvincing,
    BeyondReasonableDoubt,
}

impl StandardOfProof {
    pub fn parse(value: &str) -> Result<Self, FactorError> {
        match value {
            "scintilla of evidence" => Ok(Self::Scintilla),
            "substantial evidence" => Ok(Self::SubstantialEvidence),
            "preponderance of evidence" => Ok(Self::Preponderance),
            "clear and convincing" => Ok(Self::ClearAndConvincing),
            "beyond reasonable doubt" => Ok(Self::BeyondReasonableDoubt),
            other => Err(FactorError::UnknownStandardOfProof {
                value: other.to_string(),
            }),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scintilla => "scintilla of evidence",
            Self::SubstantialEvidence => "substantial evidence",
            Self::Preponderance => "preponderance of evidence",
            Self::ClearAndConvincing => "clear and convincing",
            Self::BeyondReasonableDoubt => "beyond reasonable doubt",
        }
    }
}

impl fmt::Display for StandardOfProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An assertion accepted as factual by a court: a predicate plus the
/// ordered context terms that fill its slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    predicate: Predicate,
    terms: TermSequence,
    standard_of_proof: Option<StandardOfProof>,
    pub name: Option<String>,
    pub absent: bool,
    pub generic: bool,
}

impl Fact {
    /// Build a fact, checking the term count against the predicate's
    /// participant slots.
    pub fn new(predicate: Predicate, terms: Vec<Term>) -> Result<Self, FactorError> {
        let expected = predicate.context_slots();
        if terms.len() != expected {
            return Err(FactorError::ContextCountMismatch {
                content: predicate.content().to_string(),
                expected,
                actual: terms.len(),
            });
        }
        Ok(Self {
            predicate,
            terms: TermSequence::from_vec(terms),
            standard_of_proof: None,
            name: None,
            absent: false,
            generic: false,
        })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn standard_of_proof(&self) -> Option<StandardOfProof> {
        self.standard_of_proof
    }

    pub fn with_standard_of_proof(mut self, standard: StandardOfProof) -> Self {
        self.standard_of_proof = Some(standard);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_absent(mut self, absent: bool) -> Self {
        self.absent = absent;
        self
    }

    pub fn with_generic(mut self, generic: bool) -> Self {
        self.generic = generic;
        self
    }

    /// Standards of proof compare as a gate on implication: both absent, or
    /// the implying fact's standard at least as strong.
    pub(crate) fn standard_allows_implication(&self, other: &Fact) -> bool {
        match (self.standard_of_proof, other.standard_of_proof) {
            (None, None) => true,
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }

    pub(crate) fn new_context(&self, register: &ContextRegister) -> Fact {
        let mut mapped = self.clone();
        mapped.terms = self
            .terms
            .iter()
            .map(|term| term.new_context(register))
            .collect();
        mapped
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        let mut text = format!("the fact that {}", self.predicate.sentence(&rendered));
        if let Some(standard) = self.standard_of_proof {
            text.push_str(&format!(" by the standard {standard}"));
        }
        if self.generic {
            text = format!("<{text}>");
        }
        if self.absent {
            text = format!("absence of {text}");
        }
        write!(f, "{text}")
    }
}
