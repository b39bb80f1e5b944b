use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Factor;
use crate::matching::{group_witnesses, ContextRegister, Operation, WitnessIter};

/// An unordered collection of factors used together in a comparison:
/// the inputs, outputs, or despite factors of a procedure.
///
/// Membership, not position, is what matters, and duplicates carry no
/// information: members with the same meaning collapse at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorGroup(Vec<Factor>);

impl FactorGroup {
    pub fn new(factors: Vec<Factor>) -> Self {
        let mut members: Vec<Factor> = Vec::with_capacity(factors.len());
        for factor in factors {
            if !members.iter().any(|kept| kept.means(&factor)) {
                members.push(factor);
            }
        }
        Self(members)
    }

    pub fn factors(&self) -> &[Factor] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Factor> {
        self.0.iter()
    }

    pub fn to_vec(&self) -> Vec<Factor> {
        self.0.clone()
    }

    pub(crate) fn shared(&self) -> Arc<Vec<Factor>> {
        Arc::new(self.0.clone())
    }

    /// Registers under which every factor of `other` is implied by some
    /// factor of `self`.
    pub fn explanations_implication(
        &self,
        other: &FactorGroup,
        context: &ContextRegister,
    ) -> WitnessIter {
        group_witnesses(
            self.shared(),
            other.to_vec(),
            Operation::Implies,
            context.clone(),
        )
    }

    pub fn implies(&self, other: &FactorGroup) -> bool {
        self.explanations_implication(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Registers under which every factor of `other` has a same-meaning
    /// counterpart in `self`.
    pub fn explanations_has_all_factors_of(
        &self,
        other: &FactorGroup,
        context: &ContextRegister,
    ) -> WitnessIter {
        group_witnesses(
            self.shared(),
            other.to_vec(),
            Operation::SameMeaning,
            context.clone(),
        )
    }

    pub fn has_all_factors_of(&self, other: &FactorGroup) -> bool {
        self.explanations_has_all_factors_of(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Registers under which every factor of `self` has a same-meaning
    /// counterpart in `other`, oriented self -> other.
    pub fn explanations_shares_all_factors_with(
        &self,
        other: &FactorGroup,
        context: &ContextRegister,
    ) -> WitnessIter {
        let reversed_seed = context.reversed();
        Box::new(
            group_witnesses(
                other.shared(),
                self.to_vec(),
                Operation::SameMeaning,
                reversed_seed,
            )
            .map(|register| register.reversed()),
        )
    }

    /// Registers under which the two groups have the same meaning: each
    /// covers all factors of the other, under one consistent mapping.
    pub fn explanations_same_meaning(
        &self,
        other: &FactorGroup,
        context: &ContextRegister,
    ) -> WitnessIter {
        let left = self.clone();
        let right = other.clone();
        Box::new(
            self.explanations_shares_all_factors_with(other, context)
                .flat_map(move |register| {
                    left.explanations_has_all_factors_of(&right, &register)
                }),
        )
    }

    pub fn means(&self, other: &FactorGroup) -> bool {
        self.explanations_same_meaning(other, &ContextRegister::new())
            .next()
            .is_some()
    }

    /// Whether some pair of members contradicts under assignments
    /// compatible with `context`.
    pub fn contradicts(&self, other: &FactorGroup, context: &ContextRegister) -> bool {
        self.0.iter().any(|mine| {
            other
                .0
                .iter()
                .any(|theirs| !mine.explanations_contradiction(theirs, context).is_empty())
        })
    }

    /// Whether no member of `self` can be made to contradict a member of
    /// `other` without breaking the assignments already in `context`.
    pub fn consistent_with(&self, other: &FactorGroup, context: &ContextRegister) -> bool {
        !self.contradicts(other, context)
    }
}

impl From<Vec<Factor>> for FactorGroup {
    fn from(factors: Vec<Factor>) -> Self {
        FactorGroup::new(factors)
    }
}

impl From<Factor> for FactorGroup {
    fn from(factor: Factor) -> Self {
        FactorGroup::new(vec![factor])
    }
}

impl<'a> IntoIterator for &'a FactorGroup {
    type Item = &'a Factor;
    type IntoIter = std::slice::Iter<'a, Factor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FactorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(|factor| factor.to_string()).collect();
        write!(f, "[{}]", items.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::Fact;
    use crate::predicates::Predicate;
    use crate::terms::{Entity, Term};

    fn fact(content: &str, names: &[&str]) -> Factor {
        let predicate = Predicate::new(content).expect("valid predicate");
        let terms = names
            .iter()
            .map(|n| Term::Entity(Entity::new(*n)))
            .collect();
        Factor::Fact(Fact::new(predicate, terms).expect("valid fact"))
    }

    #[test]
    fn same_meaning_duplicates_collapse() {
        let group = FactorGroup::new(vec![
            fact("{} was tall", &["Alice"]),
            fact("{} was tall", &["Bob"]),
            fact("{} was rich", &["Alice"]),
        ]);
        // The two tall-facts differ only by a generic rename.
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn group_implication_ignores_order_and_extras() {
        let broad = FactorGroup::new(vec![
            fact("{} was tall", &["Alice"]),
            fact("{} was rich", &["Alice"]),
        ]);
        let narrow = FactorGroup::new(vec![fact("{} was rich", &["Craig"])]);
        assert!(broad.implies(&narrow));
        assert!(!narrow.implies(&broad));
    }

    #[test]
    fn group_equivalence_requires_both_directions() {
        let a = FactorGroup::new(vec![
            fact("{} was tall", &["Alice"]),
            fact("{} was rich", &["Bob"]),
        ]);
        let b = FactorGroup::new(vec![
            fact("{} was rich", &["Dan"]),
            fact("{} was tall", &["Craig"]),
        ]);
        assert!(a.means(&b));
        let c = FactorGroup::new(vec![fact("{} was tall", &["Craig"])]);
        assert!(!a.means(&c));
    }

    #[test]
    fn consistency_respects_fixed_assignments() {
        let a = FactorGroup::new(vec![fact("{} was tall", &["Alice"])]);
        let b = FactorGroup::new(vec![fact("{} was tall", &["Bob"]).with_absent(true)]);
        // With a free mapping the contradiction is reachable.
        assert!(!a.consistent_with(&b, &ContextRegister::new()));
        // Pinning Alice to some other entity forecloses it.
        let pinned = ContextRegister::new()
            .try_extended(
                &Term::Entity(Entity::new("Alice")),
                &Term::Entity(Entity::new("Craig")),
            )
            .expect("fresh pair");
        assert!(a.consistent_with(&b, &pinned));
    }
}
