use std::fmt;
use std::iter;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Explanation, Relation};
use crate::errors::HoldingError;
use crate::matching::{reversed_iter, single, ContextRegister, WitnessIter};
use crate::rules::Rule;
use crate::terms::Term;

/// A court's announcement that it posits or rejects a rule.
///
/// `rule_valid: false` asserts the rule's negation; `decided: false` marks
/// non-binding dicta, neither accepting nor rejecting; `exclusive` asserts
/// that the rule's inputs are the only way to reach its output, which
/// additionally commits the court to one contrapositive rule per input.
/// Comparisons normalize all of this before delegating to the rule layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    rule: Rule,
    rule_valid: bool,
    decided: bool,
    exclusive: bool,
    generic: bool,
}

impl Holding {
    /// A decided holding accepting `rule`.
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            rule_valid: true,
            decided: true,
            exclusive: false,
            generic: false,
        }
    }

    /// Build a holding with explicit posture flags, validating the
    /// preconditions of the `exclusive` contrapositive expansion.
    pub fn build(
        rule: Rule,
        rule_valid: bool,
        decided: bool,
        exclusive: bool,
    ) -> Result<Self, HoldingError> {
        if exclusive {
            if !rule_valid {
                return Err(HoldingError::ExclusiveMustBeValid);
            }
            if !decided {
                return Err(HoldingError::ExclusiveMustBeDecided);
            }
            let outputs = rule.outputs();
            if outputs.len() != 1 {
                return Err(HoldingError::ExclusiveNeedsSingleOutput {
                    outputs: outputs.len(),
                });
            }
            if outputs.factors()[0].is_absent() {
                return Err(HoldingError::ExclusiveAbsentOutput);
            }
            if rule.inputs().is_empty() {
                return Err(HoldingError::ExclusiveNeedsInputs);
            }
        }
        Ok(Self {
            rule,
            rule_valid,
            decided,
            exclusive,
            generic: false,
        })
    }

    pub fn with_generic(mut self, generic: bool) -> Self {
        self.generic = generic;
        self
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn is_valid(&self) -> bool {
        self.rule_valid
    }

    pub fn is_decided(&self) -> bool {
        self.decided
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }

    pub fn generic_terms(&self) -> Vec<Term> {
        self.rule.generic_terms()
    }

    pub fn new_context(&self, register: &ContextRegister) -> Holding {
        let mut mapped = self.clone();
        mapped.rule = self.rule.new_context(register);
        mapped
    }

    /// A copy asserting the opposite of this holding's posture toward the
    /// rule. Negation discards exclusivity: rejecting a rule says nothing
    /// about whether its inputs were the only route to its output.
    pub fn negated(&self) -> Holding {
        let mut negated = self.clone();
        negated.rule_valid = !self.rule_valid;
        negated.exclusive = false;
        negated
    }

    /// This holding's meaning as nonexclusive holdings: itself with the
    /// `exclusive` flag cleared, plus one contrapositive holding per input
    /// when the flag was set.
    pub fn nonexclusive_holdings(&self) -> Vec<Holding> {
        if !self.exclusive {
            return vec![self.clone()];
        }
        let mut base = self.clone();
        base.exclusive = false;
        let mut expanded = vec![base];
        expanded.extend(self.rule.contrapositives().into_iter().map(|rule| Holding {
            rule,
            rule_valid: true,
            decided: true,
            exclusive: false,
            generic: false,
        }));
        expanded
    }

    /// Registers under which everything `other` asserts (including its
    /// contrapositives) follows from what `self` asserts, under one
    /// consistent mapping.
    pub fn explanations_implication(
        &self,
        other: &Holding,
        context: &ContextRegister,
    ) -> WitnessIter {
        let available = Arc::new(self.nonexclusive_holdings());
        let need = other.nonexclusive_holdings();
        expansion_implication(available, need, context.clone())
    }

    pub fn implies(&self, other: &Holding) -> bool {
        self.explanations_implication(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Witness explanations that the two holdings cannot both be good law.
    /// Each pair of nonexclusive expansions is tried; the explanation
    /// carries the specific pair that conflicts.
    pub fn explanations_contradiction(
        &self,
        other: &Holding,
        context: &ContextRegister,
    ) -> Box<dyn Iterator<Item = Explanation>> {
        let mut pairs = Vec::new();
        for mine in self.nonexclusive_holdings() {
            for theirs in other.nonexclusive_holdings() {
                pairs.push((mine.clone(), theirs));
            }
        }
        let seed = context.clone();
        Box::new(pairs.into_iter().flat_map(move |(mine, theirs)| {
            let left = mine.clone();
            let right = theirs.clone();
            mine.contradicts_if_not_exclusive(&theirs, &seed)
                .map(move |register| {
                    Explanation::new(
                        left.clone(),
                        right.clone(),
                        register,
                        Relation::Contradiction,
                    )
                })
        }))
    }

    pub fn contradicts(&self, other: &Holding) -> bool {
        self.explanations_contradiction(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    pub fn explanations_same_meaning(
        &self,
        other: &Holding,
        context: &ContextRegister,
    ) -> WitnessIter {
        if self.rule_valid != other.rule_valid
            || self.decided != other.decided
            || self.exclusive != other.exclusive
        {
            return Box::new(iter::empty());
        }
        self.rule.explanations_same_meaning(&other.rule, context)
    }

    pub fn means(&self, other: &Holding) -> bool {
        self.explanations_same_meaning(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// First witness that `self` implies `other`, packaged for rendering.
    pub fn explain_implication(&self, other: &Holding) -> Option<Explanation> {
        self.explanations_implication(other, &ContextRegister::new())
            .next()
            .map(|register| {
                Explanation::new(
                    self.clone(),
                    other.clone(),
                    register,
                    Relation::Implication,
                )
            })
    }

    /// First witness that the holdings conflict, packaged for rendering.
    pub fn explain_contradiction(&self, other: &Holding) -> Option<Explanation> {
        self.explanations_contradiction(other, &ContextRegister::new())
            .next()
    }

    /// Combine with another holding by discharging its rule's inputs from
    /// this one's outputs. Only decided holdings accepting their rules
    /// combine; the result keeps this holding's posture.
    pub fn add(&self, other: &Holding) -> Option<Holding> {
        if !(self.decided && other.decided && self.rule_valid && other.rule_valid) {
            return None;
        }
        for mine in self.nonexclusive_holdings() {
            for theirs in other.nonexclusive_holdings() {
                if let Some(rule) = mine.rule.add(&theirs.rule) {
                    return Some(Holding {
                        rule,
                        rule_valid: true,
                        decided: true,
                        exclusive: false,
                        generic: self.generic,
                    });
                }
            }
        }
        None
    }

    // ---- internals ---------------------------------------------------------

    /// Implication between two already-nonexclusive holdings, honoring the
    /// decided and validity flags.
    fn pair_implication(&self, other: &Holding, seed: &ContextRegister) -> WitnessIter {
        if self.decided && other.decided {
            return self.implies_if_decided(other, seed);
        }
        if !self.decided && !other.decided {
            // An undecided holding implies only the statement that the
            // same rule, or its negation, is likewise undecided.
            let negated = other.negated();
            return Box::new(
                self.explanations_same_meaning(other, seed)
                    .chain(self.explanations_same_meaning(&negated, seed)),
            );
        }
        Box::new(iter::empty())
    }

    /// Implication with both sides treated as decided: equal validity
    /// delegates to rule implication (reversed when both reject), mixed
    /// validity to rule contradiction.
    fn implies_if_decided(&self, other: &Holding, seed: &ContextRegister) -> WitnessIter {
        match (self.rule_valid, other.rule_valid) {
            (true, true) => self.rule.explanations_implication(&other.rule, seed),
            (false, false) => reversed_iter(
                other
                    .rule
                    .explanations_implication(&self.rule, &seed.reversed()),
            ),
            _ => self.rule.explanations_contradiction(&other.rule, seed),
        }
    }

    /// Contradiction between two already-nonexclusive holdings: a decided
    /// holding contradicts another by implying its negation; an undecided
    /// one contradicts whatever settles the same rule either way.
    fn contradicts_if_not_exclusive(&self, other: &Holding, seed: &ContextRegister) -> WitnessIter {
        if !other.decided {
            return Box::new(iter::empty());
        }
        if self.decided {
            let negated = other.negated();
            return self.implies_if_decided(&negated, seed);
        }
        let reversed_seed = seed.reversed();
        let first = reversed_iter(other.implies_if_decided(self, &reversed_seed));
        let second = reversed_iter(other.implies_if_decided(&self.negated(), &reversed_seed));
        Box::new(first.chain(second))
    }
}

/// Backtracking pairing of every needed holding with some available one,
/// sharing one register across the whole expansion.
fn expansion_implication(
    available: Arc<Vec<Holding>>,
    mut need: Vec<Holding>,
    seed: ContextRegister,
) -> WitnessIter {
    let Some(target) = need.pop() else {
        return single(seed);
    };
    let target = Arc::new(target);
    Box::new((0..available.len()).flat_map(move |index| {
        let candidate = available[index].clone();
        let rest = need.clone();
        let available = Arc::clone(&available);
        let target = Arc::clone(&target);
        Box::new(
            candidate
                .pair_implication(&target, &seed)
                .flat_map(move |register| {
                    expansion_implication(Arc::clone(&available), rest.clone(), register)
                }),
        ) as WitnessIter
    }))
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if !self.decided {
            "consider UNDECIDED"
        } else if self.rule_valid {
            "ACCEPT"
        } else {
            "REJECT"
        };
        let exclusive = if self.exclusive {
            " as the EXCLUSIVE way to reach its result"
        } else {
            ""
        };
        write!(f, "the holding to {action}{exclusive} {}", self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HoldingError;
    use crate::factors::{Fact, Factor};
    use crate::predicates::Predicate;
    use crate::procedures::Procedure;
    use crate::terms::Entity;

    fn fact(content: &str, names: &[&str]) -> Factor {
        let predicate = Predicate::new(content).expect("valid predicate");
        let terms = names
            .iter()
            .map(|n| Term::Entity(Entity::new(*n)))
            .collect();
        Factor::Fact(Fact::new(predicate, terms).expect("valid fact"))
    }

    fn simple_rule() -> Rule {
        Rule::new(
            Procedure::new(
                vec![fact("{} was liable to {}", &["Alice", "Bob"])],
                vec![fact("{} was negligent toward {}", &["Alice", "Bob"])],
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        )
        .with_mandatory(true)
        .with_universal(true)
    }

    #[test]
    fn rejecting_contradicts_accepting() {
        let accept = Holding::new(simple_rule());
        let reject = Holding::build(simple_rule(), false, true, false).expect("valid holding");
        assert!(accept.contradicts(&reject));
        assert!(reject.contradicts(&accept));
        assert!(!accept.contradicts(&accept.clone()));
    }

    #[test]
    fn undecided_contradicts_what_settles_it() {
        let settled = Holding::new(simple_rule());
        let undecided = Holding::build(simple_rule(), true, false, false).expect("valid holding");
        assert!(undecided.contradicts(&settled));
        assert!(!undecided.contradicts(&undecided.clone()));
        // An undecided holding implies itself but not the settled form.
        assert!(undecided.implies(&undecided.clone()));
        assert!(!undecided.implies(&settled));
        assert!(!settled.implies(&undecided));
    }

    #[test]
    fn exclusive_validation() {
        let no_inputs = Rule::new(
            Procedure::new(
                vec![fact("{} was liable to {}", &["Alice", "Bob"])],
                Vec::<Factor>::new(),
                Vec::<Factor>::new(),
            )
            .expect("valid procedure"),
        );
        assert!(matches!(
            Holding::build(no_inputs, true, true, true),
            Err(HoldingError::ExclusiveNeedsInputs)
        ));
        assert!(matches!(
            Holding::build(simple_rule(), false, true, true),
            Err(HoldingError::ExclusiveMustBeValid)
        ));
        assert!(Holding::build(simple_rule(), true, true, true).is_ok());
    }

    #[test]
    fn exclusive_holding_expands_to_contrapositives() {
        let exclusive = Holding::build(simple_rule(), true, true, true).expect("valid holding");
        let expanded = exclusive.nonexclusive_holdings();
        assert_eq!(expanded.len(), 2);
        // The contrapositive: absent the negligence input, liability is
        // absent too, with flipped modality flags.
        let contrapositive = &expanded[1];
        assert!(!contrapositive.rule().is_mandatory());
        assert!(!contrapositive.rule().is_universal());
        assert!(contrapositive.rule().outputs().factors()[0].is_absent());
        assert!(contrapositive.rule().inputs().factors()[0].is_absent());
    }
}
