use std::fmt;

use serde::{Deserialize, Serialize};

use super::{range_implies, ranges_disjoint, Quantity};
use crate::errors::PredicateError;

/// A comparison operator against a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Equal,
    NotEqual,
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
}

impl Sign {
    /// Parse an interchange form. `==` and `!=` normalize to the canonical
    /// `=` and `<>`.
    pub fn parse(value: &str) -> Result<Self, PredicateError> {
        match value {
            "=" | "==" => Ok(Self::Equal),
            "<>" | "!=" => Ok(Self::NotEqual),
            ">=" => Ok(Self::GreaterOrEqual),
            ">" => Ok(Self::Greater),
            "<=" => Ok(Self::LessOrEqual),
            "<" => Ok(Self::Less),
            other => Err(PredicateError::UnknownSign {
                value: other.to_string(),
            }),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterOrEqual => ">=",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::Less => "<",
        }
    }

    /// The sign selecting exactly the values this one excludes.
    pub const fn opposite(&self) -> Sign {
        match self {
            Self::Equal => Self::NotEqual,
            Self::NotEqual => Self::Equal,
            Self::GreaterOrEqual => Self::Less,
            Self::Greater => Self::LessOrEqual,
            Self::LessOrEqual => Self::Greater,
            Self::Less => Self::GreaterOrEqual,
        }
    }

    const fn phrase(&self) -> &'static str {
        match self {
            Self::Equal => "exactly equal to",
            Self::NotEqual => "not equal to",
            Self::GreaterOrEqual => "at least",
            Self::Greater => "greater than",
            Self::LessOrEqual => "no more than",
            Self::Less => "less than",
        }
    }
}

/// Which slot permutations a reciprocal predicate licenses.
///
/// The ordinary reading of a symmetric relation makes only its first two
/// participants interchangeable; `AllSlots` tries every permutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReciprocalScope {
    #[default]
    AdjacentPair,
    AllSlots,
}

/// A statement about real events or a legal conclusion.
///
/// The `content` template holds `{}` slots for context terms. When a
/// quantity is present, the final `{}` belongs to the quantity comparison
/// and the remaining slots are the participant slots. A predicate whose
/// factor is marked absent carries no truth value (`truth: None`, the
/// "whether" form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    content: String,
    truth: Option<bool>,
    reciprocal: bool,
    sign: Option<Sign>,
    quantity: Option<Quantity>,
    reciprocal_scope: ReciprocalScope,
}

impl Predicate {
    /// A plain true statement with no quantity.
    pub fn new(content: impl Into<String>) -> Result<Self, PredicateError> {
        Self::build(content, Some(true), None, None, false)
    }

    /// Build a predicate, normalizing as the interchange format does: a
    /// false truth over a comparison flips the comparison instead, and a
    /// quantity with no sign defaults to `=`.
    pub fn build(
        content: impl Into<String>,
        truth: Option<bool>,
        sign: Option<Sign>,
        quantity: Option<Quantity>,
        reciprocal: bool,
    ) -> Result<Self, PredicateError> {
        let content = content.into();
        let mut truth = truth;
        let mut sign = sign;
        if sign.is_some() && quantity.is_none() {
            return Err(PredicateError::SignWithoutQuantity);
        }
        if let Some(q) = &quantity {
            if !q.magnitude.is_finite() {
                return Err(PredicateError::NonFiniteQuantity {
                    magnitude: q.magnitude,
                });
            }
            let placeholders = content.matches("{}").count();
            if placeholders == 0 {
                return Err(PredicateError::MissingQuantitySlot { content });
            }
            if sign.is_none() {
                sign = Some(Sign::Equal);
            }
            if truth == Some(false) {
                truth = Some(true);
                sign = sign.map(|s| s.opposite());
            }
        }
        let slots = content.matches("{}").count() - usize::from(quantity.is_some());
        if reciprocal && slots < 2 {
            return Err(PredicateError::ReciprocalNeedsPair { content, slots });
        }
        Ok(Self {
            content,
            truth,
            reciprocal,
            sign,
            quantity,
            reciprocal_scope: ReciprocalScope::default(),
        })
    }

    pub fn with_reciprocal_scope(mut self, scope: ReciprocalScope) -> Self {
        self.reciprocal_scope = scope;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn truth(&self) -> Option<bool> {
        self.truth
    }

    pub fn reciprocal(&self) -> bool {
        self.reciprocal
    }

    pub fn reciprocal_scope(&self) -> ReciprocalScope {
        self.reciprocal_scope
    }

    pub fn sign(&self) -> Option<Sign> {
        self.sign
    }

    pub fn quantity(&self) -> Option<&Quantity> {
        self.quantity.as_ref()
    }

    /// Number of context terms needed to fill the participant slots.
    pub fn context_slots(&self) -> usize {
        self.content.matches("{}").count() - usize::from(self.quantity.is_some())
    }

    /// A copy with the opposite truth value.
    pub fn negated(&self) -> Predicate {
        let mut negated = self.clone();
        negated.truth = self.truth.map(|t| !t);
        negated
    }

    fn same_template(&self, other: &Predicate) -> bool {
        self.content.eq_ignore_ascii_case(&other.content) && self.reciprocal == other.reciprocal
    }

    /// Whether the two predicates say the same thing.
    pub fn means(&self, other: &Predicate) -> bool {
        self.same_template(other)
            && self.truth == other.truth
            && self.sign == other.sign
            && self.quantity == other.quantity
    }

    /// Whether `self` implies `other`: the same statement, or a numeric
    /// constraint whose solution set is contained in `other`'s.
    pub fn implies(&self, other: &Predicate) -> bool {
        if !self.same_template(other) {
            return false;
        }
        if other.truth.is_none() {
            // Anything with this content settles the "whether" form.
            return true;
        }
        if self.truth.is_none() {
            return false;
        }
        if self.means(other) {
            return true;
        }
        match (self.sign, &self.quantity, other.sign, &other.quantity) {
            (Some(sa), Some(qa), Some(sb), Some(qb)) if qa.same_unit(qb) => {
                range_implies(sa, qa.magnitude, sb, qb.magnitude)
            }
            _ => false,
        }
    }

    /// Whether `self` and `other` cannot both hold: complementary truth over
    /// the same content, or disjoint numeric ranges.
    pub fn contradicts(&self, other: &Predicate) -> bool {
        if !self.same_template(other) {
            return false;
        }
        if self.truth.is_none() || other.truth.is_none() {
            return false;
        }
        match (&self.quantity, &other.quantity) {
            (Some(qa), Some(qb)) => {
                if !qa.same_unit(qb) {
                    return false;
                }
                let (Some(sa), Some(sb)) = (self.sign, other.sign) else {
                    return false;
                };
                ranges_disjoint(sa, qa.magnitude, sb, qb.magnitude)
            }
            (None, None) => self.truth != other.truth,
            _ => false,
        }
    }

    /// Substitute rendered terms into the template, appending the quantity
    /// comparison in its slot.
    pub fn sentence(&self, terms: &[String]) -> String {
        let mut fillers: Vec<String> = terms.iter().take(self.context_slots()).cloned().collect();
        while fillers.len() < self.context_slots() {
            fillers.push("{}".to_string());
        }
        if let (Some(sign), Some(quantity)) = (self.sign, &self.quantity) {
            fillers.push(format!("{} {}", sign.phrase(), quantity));
        }
        let pieces: Vec<&str> = self.content.split("{}").collect();
        let mut filled = String::new();
        for (i, piece) in pieces.iter().enumerate() {
            filled.push_str(piece);
            if let Some(filler) = fillers.get(i) {
                filled.push_str(filler);
            }
        }
        let prefix = match self.truth {
            None => "whether ",
            Some(false) => "it is false that ",
            Some(true) => "",
        };
        format!("{prefix}{filled}")
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sentence(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(sign: Sign, magnitude: f64) -> Predicate {
        Predicate::build(
            "the distance between {} and {} was {}",
            Some(true),
            Some(sign),
            Some(Quantity::new(magnitude, "feet")),
            true,
        )
        .expect("valid predicate")
    }

    #[test]
    fn sign_without_quantity_is_rejected() {
        let err = Predicate::build(
            "{} was tall",
            Some(true),
            Some(Sign::Greater),
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, PredicateError::SignWithoutQuantity));
    }

    #[test]
    fn reciprocal_needs_two_slots() {
        let err = Predicate::build("{} was burned", Some(true), None, None, true).unwrap_err();
        assert!(matches!(
            err,
            PredicateError::ReciprocalNeedsPair { slots: 1, .. }
        ));
    }

    #[test]
    fn false_comparison_normalizes_to_opposite_sign() {
        let p = Predicate::build(
            "the weight of {} was {}",
            Some(false),
            Some(Sign::Greater),
            Some(Quantity::new(5.0, "pounds")),
            false,
        )
        .expect("valid predicate");
        assert_eq!(p.truth(), Some(true));
        assert_eq!(p.sign(), Some(Sign::LessOrEqual));
    }

    #[test]
    fn quantity_subsumption() {
        // "exactly 8" implies "at least 5", but not the reverse.
        let exactly_8 = distance(Sign::Equal, 8.0);
        let at_least_5 = distance(Sign::GreaterOrEqual, 5.0);
        assert!(exactly_8.implies(&at_least_5));
        assert!(!at_least_5.implies(&exactly_8));
        // "at least 12" implies "at least 5"; "at least 5" implies neither.
        let at_least_12 = distance(Sign::GreaterOrEqual, 12.0);
        assert!(at_least_12.implies(&at_least_5));
        assert!(!at_least_5.implies(&at_least_12));
    }

    #[test]
    fn different_units_never_compare() {
        let feet = distance(Sign::GreaterOrEqual, 20.0);
        let metres = Predicate::build(
            "the distance between {} and {} was {}",
            Some(true),
            Some(Sign::GreaterOrEqual),
            Some(Quantity::new(3.0, "metres")),
            true,
        )
        .expect("valid predicate");
        assert!(!feet.implies(&metres));
        assert!(!feet.contradicts(&metres));
    }

    #[test]
    fn quantity_ranges_contradict_when_disjoint() {
        let at_least_20 = distance(Sign::GreaterOrEqual, 20.0);
        let under_10 = distance(Sign::Less, 10.0);
        assert!(at_least_20.contradicts(&under_10));
        assert!(under_10.contradicts(&at_least_20));
        let at_least_5 = distance(Sign::GreaterOrEqual, 5.0);
        assert!(!at_least_20.contradicts(&at_least_5));
    }

    #[test]
    fn plain_truth_contradiction() {
        let shot = Predicate::new("{} shot {}").expect("valid predicate");
        let not_shot = shot.negated();
        assert!(shot.contradicts(&not_shot));
        assert!(!shot.contradicts(&shot.clone()));
        assert_eq!(not_shot.truth(), Some(false));
    }

    #[test]
    fn whether_form_is_implied_not_implying() {
        let shot = Predicate::new("{} shot {}").expect("valid predicate");
        let whether = Predicate::build("{} shot {}", None, None, None, false).expect("valid");
        assert!(shot.implies(&whether));
        assert!(!whether.implies(&shot));
        assert!(!whether.contradicts(&shot));
    }

    #[test]
    fn sentence_renders_quantity_slot() {
        let p = distance(Sign::GreaterOrEqual, 35.0);
        let text = p.sentence(&["<the stockpile>".into(), "<the workshop>".into()]);
        assert_eq!(
            text,
            "the distance between <the stockpile> and <the workshop> was at least 35 feet"
        );
    }
}
