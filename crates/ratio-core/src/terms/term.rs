use std::fmt;

use serde::{Deserialize, Serialize};

use crate::factors::Factor;
use crate::matching::{ContextRegister, Operation};
use crate::terms::Entity;

/// Anything that can fill an ordered context slot of a factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Entity(Entity),
    Factor(Box<Factor>),
}

impl Term {
    pub fn is_generic(&self) -> bool {
        match self {
            Term::Entity(e) => e.generic,
            Term::Factor(f) => f.is_generic(),
        }
    }

    /// Canonical string form, used as the key in a context register.
    pub fn registry_key(&self) -> String {
        self.to_string()
    }

    /// The generic terms reachable from this term, outermost first.
    pub fn generic_terms(&self) -> Vec<Term> {
        match self {
            Term::Entity(e) => {
                if e.generic {
                    vec![self.clone()]
                } else {
                    Vec::new()
                }
            }
            Term::Factor(f) => f.generic_terms(),
        }
    }

    pub fn means(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Entity(a), Term::Entity(b)) => a.means(b),
            (Term::Factor(a), Term::Factor(b)) => a.means(b),
            _ => false,
        }
    }

    pub fn implies(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Entity(a), Term::Entity(b)) => a.implies(b),
            (Term::Factor(a), Term::Factor(b)) => a.implies(b),
            _ => false,
        }
    }

    /// Whether a register may sensibly pair `self` with `other` at all:
    /// entities pair with entities of matching plurality, factors with
    /// factors of the same kind.
    pub(crate) fn pairable_with(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Entity(a), Term::Entity(b)) => a.plural == b.plural,
            (Term::Factor(a), Term::Factor(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }

    /// Ways to extend `seed` so that `self` stands in `operation` to `other`.
    pub(crate) fn witnesses(
        &self,
        other: &Term,
        operation: Operation,
        seed: &ContextRegister,
    ) -> Vec<ContextRegister> {
        match (self, other) {
            (Term::Entity(a), Term::Entity(b)) => {
                let holds = match operation {
                    Operation::Implies => a.implies(b),
                    Operation::SameMeaning => a.means(b),
                    Operation::Comparable => a.implies(b) || b.implies(a),
                };
                if !holds {
                    Vec::new()
                } else if a.generic || b.generic {
                    seed.try_extended(self, other).into_iter().collect()
                } else {
                    vec![seed.clone()]
                }
            }
            (Term::Factor(a), Term::Factor(b)) => a.witnesses(operation, b, seed),
            _ => Vec::new(),
        }
    }

    /// Replace this term (or its nested generic terms) per `register`.
    pub fn new_context(&self, register: &ContextRegister) -> Term {
        if let Some(replacement) = register.get(self) {
            return replacement.clone();
        }
        match self {
            Term::Entity(_) => self.clone(),
            Term::Factor(f) => Term::Factor(Box::new(f.new_context(register))),
        }
    }
}

impl From<Entity> for Term {
    fn from(entity: Entity) -> Self {
        Term::Entity(entity)
    }
}

impl From<Factor> for Term {
    fn from(factor: Factor) -> Self {
        Term::Factor(Box::new(factor))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Entity(e) => e.fmt(f),
            Term::Factor(factor) => factor.fmt(f),
        }
    }
}
