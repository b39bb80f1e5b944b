use std::fmt;

use super::Holding;
use crate::matching::ContextRegister;

/// The relation a witness mapping establishes between two holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Implication,
    Contradiction,
    SameMeaning,
}

impl Relation {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Implication => "IMPLIES",
            Self::Contradiction => "CONTRADICTS",
            Self::SameMeaning => "MEANS",
        }
    }
}

/// A witness mapping packaged with the two holdings it relates, for an
/// external renderer. The `context` pairs the analogous generic terms of
/// the two holdings.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub left: Holding,
    pub right: Holding,
    pub context: ContextRegister,
    pub relation: Relation,
}

impl Explanation {
    pub fn new(
        left: Holding,
        right: Holding,
        context: ContextRegister,
        relation: Relation,
    ) -> Self {
        Self {
            left,
            right,
            context,
            relation,
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.relation.as_str(), self.right)?;
        let prose = self.context.prose();
        if !prose.is_empty() {
            write!(f, ", in the context where {prose}")?;
        }
        Ok(())
    }
}
