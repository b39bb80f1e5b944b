use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Allegation, Evidence, Exhibit, Fact, Pleading};
use crate::matching::{dedup_registers, ordered_witnesses, ContextRegister, Operation};
use crate::predicates::ReciprocalScope;
use crate::terms::Term;

/// Discriminant of the closed [`Factor`] union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorKind {
    Fact,
    Exhibit,
    Evidence,
    Pleading,
    Allegation,
}

impl FactorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fact => "fact",
            Self::Exhibit => "exhibit",
            Self::Evidence => "evidence",
            Self::Pleading => "pleading",
            Self::Allegation => "allegation",
        }
    }
}

/// A typed legal proposition.
///
/// Comparisons between factors are existential searches for a consistent
/// renaming of generic terms; the methods here return every witness
/// register found (the vectors are small, bounded by slot permutations).
/// Two factors of different kinds never relate, except that a factor
/// marked `generic` is a wildcard within its own kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Factor {
    Fact(Fact),
    Exhibit(Exhibit),
    Evidence(Evidence),
    Pleading(Pleading),
    Allegation(Allegation),
}

impl Factor {
    pub fn kind(&self) -> FactorKind {
        match self {
            Factor::Fact(_) => FactorKind::Fact,
            Factor::Exhibit(_) => FactorKind::Exhibit,
            Factor::Evidence(_) => FactorKind::Evidence,
            Factor::Pleading(_) => FactorKind::Pleading,
            Factor::Allegation(_) => FactorKind::Allegation,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Factor::Fact(f) => f.name.as_deref(),
            Factor::Exhibit(f) => f.name.as_deref(),
            Factor::Evidence(f) => f.name.as_deref(),
            Factor::Pleading(f) => f.name.as_deref(),
            Factor::Allegation(f) => f.name.as_deref(),
        }
    }

    pub fn is_generic(&self) -> bool {
        match self {
            Factor::Fact(f) => f.generic,
            Factor::Exhibit(f) => f.generic,
            Factor::Evidence(f) => f.generic,
            Factor::Pleading(f) => f.generic,
            Factor::Allegation(f) => f.generic,
        }
    }

    pub fn is_absent(&self) -> bool {
        match self {
            Factor::Fact(f) => f.absent,
            Factor::Exhibit(f) => f.absent,
            Factor::Evidence(f) => f.absent,
            Factor::Pleading(f) => f.absent,
            Factor::Allegation(f) => f.absent,
        }
    }

    pub fn with_absent(mut self, absent: bool) -> Self {
        match &mut self {
            Factor::Fact(f) => f.absent = absent,
            Factor::Exhibit(f) => f.absent = absent,
            Factor::Evidence(f) => f.absent = absent,
            Factor::Pleading(f) => f.absent = absent,
            Factor::Allegation(f) => f.absent = absent,
        }
        self
    }

    pub fn with_generic(mut self, generic: bool) -> Self {
        match &mut self {
            Factor::Fact(f) => f.generic = generic,
            Factor::Exhibit(f) => f.generic = generic,
            Factor::Evidence(f) => f.generic = generic,
            Factor::Pleading(f) => f.generic = generic,
            Factor::Allegation(f) => f.generic = generic,
        }
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = Some(name.into());
        match &mut self {
            Factor::Fact(f) => f.name = name,
            Factor::Exhibit(f) => f.name = name,
            Factor::Evidence(f) => f.name = name,
            Factor::Pleading(f) => f.name = name,
            Factor::Allegation(f) => f.name = name,
        }
        self
    }

    /// This factor as a term, for use as a register key or a nested slot.
    pub fn as_term(&self) -> Term {
        Term::Factor(Box::new(self.clone()))
    }

    /// The ordered context slots whose positions carry the correspondence
    /// between two factors of the same kind.
    pub(crate) fn context_slots(&self) -> Vec<Option<Term>> {
        match self {
            Factor::Fact(f) => f.terms().iter().cloned().map(Some).collect(),
            Factor::Exhibit(f) => vec![
                f.statement.clone().map(|s| Factor::Fact(s).as_term()),
                f.stated_by.clone().map(Term::Entity),
            ],
            Factor::Evidence(f) => vec![
                f.exhibit.clone().map(|e| Factor::Exhibit(e).as_term()),
                f.to_effect.clone().map(|s| Factor::Fact(s).as_term()),
            ],
            Factor::Pleading(f) => vec![f.filer.clone().map(Term::Entity)],
            Factor::Allegation(f) => vec![
                f.statement.clone().map(|s| Factor::Fact(s).as_term()),
                f.pleading.clone().map(|p| Factor::Pleading(p).as_term()),
            ],
        }
    }

    /// Slot orders to try when matching. Only a fact with a reciprocal
    /// predicate licenses more than the identity order.
    fn slot_permutations(&self) -> Vec<Vec<Option<Term>>> {
        let slots = self.context_slots();
        let Factor::Fact(fact) = self else {
            return vec![slots];
        };
        if !fact.predicate().reciprocal() || slots.len() < 2 {
            return vec![slots];
        }
        match fact.predicate().reciprocal_scope() {
            ReciprocalScope::AdjacentPair => {
                let mut swapped = slots.clone();
                swapped.swap(0, 1);
                vec![slots, swapped]
            }
            ReciprocalScope::AllSlots => permutations(&slots),
        }
    }

    /// The generic terms reachable from this factor, outermost first. A
    /// generic factor is itself the only generic term it exposes.
    pub fn generic_terms(&self) -> Vec<Term> {
        if self.is_generic() {
            return vec![self.as_term()];
        }
        let mut out: Vec<Term> = Vec::new();
        for slot in self.context_slots().into_iter().flatten() {
            for generic in slot.generic_terms() {
                if !out.contains(&generic) {
                    out.push(generic);
                }
            }
        }
        out
    }

    /// A copy with generic terms replaced per `register` (left keys become
    /// their right counterparts).
    pub fn new_context(&self, register: &ContextRegister) -> Factor {
        if let Some(Term::Factor(replacement)) = register.get(&self.as_term()) {
            if replacement.kind() == self.kind() {
                return (**replacement).clone();
            }
        }
        match self {
            Factor::Fact(f) => Factor::Fact(f.new_context(register)),
            Factor::Exhibit(f) => {
                let mut mapped = f.clone();
                mapped.statement = f.statement.as_ref().map(|s| map_fact(s, register));
                mapped.stated_by = f.stated_by.as_ref().map(|e| map_entity(e, register));
                Factor::Exhibit(mapped)
            }
            Factor::Evidence(f) => {
                let mut mapped = f.clone();
                mapped.exhibit = f.exhibit.as_ref().map(|e| map_exhibit(e, register));
                mapped.to_effect = f.to_effect.as_ref().map(|s| map_fact(s, register));
                Factor::Evidence(mapped)
            }
            Factor::Pleading(f) => {
                let mut mapped = f.clone();
                mapped.filer = f.filer.as_ref().map(|e| map_entity(e, register));
                Factor::Pleading(mapped)
            }
            Factor::Allegation(f) => {
                let mut mapped = f.clone();
                mapped.statement = f.statement.as_ref().map(|s| map_fact(s, register));
                mapped.pleading = f.pleading.as_ref().map(|p| map_pleading(p, register));
                Factor::Allegation(mapped)
            }
        }
    }

    // ---- comparison API ----------------------------------------------------

    pub fn implies(&self, other: &Factor) -> bool {
        !self
            .explanations_implication(other, &ContextRegister::new())
            .is_empty()
    }

    pub fn contradicts(&self, other: &Factor) -> bool {
        !self
            .explanations_contradiction(other, &ContextRegister::new())
            .is_empty()
    }

    pub fn means(&self, other: &Factor) -> bool {
        !self
            .explanations_same_meaning(other, &ContextRegister::new())
            .is_empty()
    }

    pub fn consistent_with(&self, other: &Factor) -> bool {
        !self
            .explanations_consistent_with(other, &ContextRegister::new())
            .is_empty()
    }

    pub(crate) fn witnesses(
        &self,
        operation: Operation,
        other: &Factor,
        seed: &ContextRegister,
    ) -> Vec<ContextRegister> {
        match operation {
            Operation::Implies => self.explanations_implication(other, seed),
            Operation::SameMeaning => self.explanations_same_meaning(other, seed),
            Operation::Comparable => {
                let mut out = self.explanations_implication(other, seed);
                out.extend(reverse_all(
                    other.explanations_implication(self, &seed.reversed()),
                ));
                dedup_registers(out)
            }
        }
    }

    /// Registers under which `self` implies `other`. An absent factor
    /// implies another absent factor when the present form of the second
    /// implies the present form of the first, so mixed polarities route
    /// through the opposite test with the register reversed both ways.
    pub fn explanations_implication(
        &self,
        other: &Factor,
        context: &ContextRegister,
    ) -> Vec<ContextRegister> {
        if self.kind() != other.kind() {
            return Vec::new();
        }
        match (self.is_absent(), other.is_absent()) {
            (false, false) => self.implies_if_present(other, context),
            (false, true) => self.contradicts_if_present(other, context),
            (true, true) => reverse_all(other.implies_if_present(self, &context.reversed())),
            (true, false) => reverse_all(other.contradicts_if_present(self, &context.reversed())),
        }
    }

    /// Registers under which `self` and `other` cannot both be established.
    pub fn explanations_contradiction(
        &self,
        other: &Factor,
        context: &ContextRegister,
    ) -> Vec<ContextRegister> {
        if self.kind() != other.kind() {
            return Vec::new();
        }
        match (self.is_absent(), other.is_absent()) {
            (false, false) => self.contradicts_if_present(other, context),
            (false, true) => self.implies_if_present(other, context),
            (true, false) => reverse_all(other.implies_if_present(self, &context.reversed())),
            (true, true) => reverse_all(other.contradicts_if_present(self, &context.reversed())),
        }
    }

    /// Registers under which the two factors say the same thing.
    pub fn explanations_same_meaning(
        &self,
        other: &Factor,
        context: &ContextRegister,
    ) -> Vec<ContextRegister> {
        if self.kind() != other.kind()
            || self.is_absent() != other.is_absent()
            || self.is_generic() != other.is_generic()
        {
            return Vec::new();
        }
        if self.is_generic() {
            return context
                .try_extended(&self.as_term(), &other.as_term())
                .into_iter()
                .collect();
        }
        self.means_if_concrete(other, context)
    }

    /// Registers under which the two factors do not contradict: every
    /// possible assignment of generic terms is tried, and those that leave
    /// no contradiction reachable are the witnesses.
    pub fn explanations_consistent_with(
        &self,
        other: &Factor,
        context: &ContextRegister,
    ) -> Vec<ContextRegister> {
        self.possible_contexts(other, context)
            .into_iter()
            .filter(|candidate| self.explanations_contradiction(other, candidate).is_empty())
            .collect()
    }

    // ---- internals ---------------------------------------------------------

    fn implies_if_present(&self, other: &Factor, context: &ContextRegister) -> Vec<ContextRegister> {
        let mut out = Vec::new();
        if other.is_generic() {
            if let Some(register) = context.try_extended(&self.as_term(), &other.as_term()) {
                out.push(register);
            }
        }
        if !self.is_generic() {
            out.extend(self.implies_if_concrete(other, context));
        }
        dedup_registers(out)
    }

    fn implies_if_concrete(
        &self,
        other: &Factor,
        context: &ContextRegister,
    ) -> Vec<ContextRegister> {
        let gate = match (self, other) {
            (Factor::Fact(a), Factor::Fact(b)) => {
                a.standard_allows_implication(b) && a.predicate().implies(b.predicate())
            }
            (Factor::Exhibit(a), Factor::Exhibit(b)) => b.form.is_none() || a.form == b.form,
            _ => true,
        };
        if !gate {
            return Vec::new();
        }
        self.context_witnesses(other, Operation::Implies, context)
    }

    fn means_if_concrete(&self, other: &Factor, context: &ContextRegister) -> Vec<ContextRegister> {
        let gate = match (self, other) {
            (Factor::Fact(a), Factor::Fact(b)) => {
                a.predicate().means(b.predicate())
                    && a.standard_of_proof() == b.standard_of_proof()
            }
            (Factor::Exhibit(a), Factor::Exhibit(b)) => a.form == b.form,
            _ => true,
        };
        if !gate {
            return Vec::new();
        }
        self.context_witnesses(other, Operation::SameMeaning, context)
    }

    /// Contradiction between present forms. Only facts contradict directly;
    /// every other kind contradicts solely through opposite `absent` flags.
    fn contradicts_if_present(
        &self,
        other: &Factor,
        context: &ContextRegister,
    ) -> Vec<ContextRegister> {
        match (self, other) {
            (Factor::Fact(a), Factor::Fact(b)) if a.predicate().contradicts(b.predicate()) => {
                self.context_witnesses(other, Operation::Comparable, context)
            }
            _ => Vec::new(),
        }
    }

    /// Pair the ordered context slots of `self` (in each licensed
    /// permutation) against the slots of `other`.
    fn context_witnesses(
        &self,
        other: &Factor,
        operation: Operation,
        seed: &ContextRegister,
    ) -> Vec<ContextRegister> {
        let other_slots = other.context_slots();
        let mut out = Vec::new();
        for permutation in self.slot_permutations() {
            out.extend(ordered_witnesses(&permutation, &other_slots, operation, seed));
        }
        dedup_registers(out)
    }

    /// All injective assignments of this factor's generic terms to
    /// compatible generic terms of `other`, extending `context`. A generic
    /// term with no compatible partner stays unassigned.
    fn possible_contexts(&self, other: &Factor, context: &ContextRegister) -> Vec<ContextRegister> {
        let right = other.generic_terms();
        let mut registers = vec![context.clone()];
        for left in self.generic_terms() {
            let mut next = Vec::new();
            for register in &registers {
                if register.get(&left).is_some() {
                    next.push(register.clone());
                    continue;
                }
                let mut extended = false;
                for candidate in &right {
                    if left.pairable_with(candidate) {
                        if let Some(r) = register.try_extended(&left, candidate) {
                            next.push(r);
                            extended = true;
                        }
                    }
                }
                if !extended {
                    next.push(register.clone());
                }
            }
            registers = dedup_registers(next);
        }
        registers
    }
}

fn reverse_all(registers: Vec<ContextRegister>) -> Vec<ContextRegister> {
    registers.into_iter().map(|r| r.reversed()).collect()
}

fn permutations(slots: &[Option<Term>]) -> Vec<Vec<Option<Term>>> {
    if slots.len() <= 1 {
        return vec![slots.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..slots.len() {
        let mut rest = slots.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

fn map_entity(entity: &crate::terms::Entity, register: &ContextRegister) -> crate::terms::Entity {
    match register.get(&Term::Entity(entity.clone())) {
        Some(Term::Entity(replacement)) => replacement.clone(),
        _ => entity.clone(),
    }
}

fn map_fact(fact: &Fact, register: &ContextRegister) -> Fact {
    match Factor::Fact(fact.clone()).new_context(register) {
        Factor::Fact(mapped) => mapped,
        _ => fact.clone(),
    }
}

fn map_exhibit(exhibit: &Exhibit, register: &ContextRegister) -> Exhibit {
    match Factor::Exhibit(exhibit.clone()).new_context(register) {
        Factor::Exhibit(mapped) => mapped,
        _ => exhibit.clone(),
    }
}

fn map_pleading(pleading: &Pleading, register: &ContextRegister) -> Pleading {
    match Factor::Pleading(pleading.clone()).new_context(register) {
        Factor::Pleading(mapped) => mapped,
        _ => pleading.clone(),
    }
}

impl From<Fact> for Factor {
    fn from(fact: Fact) -> Self {
        Factor::Fact(fact)
    }
}

impl From<Exhibit> for Factor {
    fn from(exhibit: Exhibit) -> Self {
        Factor::Exhibit(exhibit)
    }
}

impl From<Evidence> for Factor {
    fn from(evidence: Evidence) -> Self {
        Factor::Evidence(evidence)
    }
}

impl From<Pleading> for Factor {
    fn from(pleading: Pleading) -> Self {
        Factor::Pleading(pleading)
    }
}

impl From<Allegation> for Factor {
    fn from(allegation: Allegation) -> Self {
        Factor::Allegation(allegation)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Fact(x) => x.fmt(f),
            Factor::Exhibit(x) => x.fmt(f),
            Factor::Evidence(x) => x.fmt(f),
            Factor::Pleading(x) => x.fmt(f),
            Factor::Allegation(x) => x.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{Predicate, Quantity, Sign};
    use crate::terms::Entity;

    fn fact(content: &str, names: &[&str]) -> Factor {
        let predicate = Predicate::new(content).expect("valid predicate");
        let terms = names
            .iter()
            .map(|n| Term::Entity(Entity::new(*n)))
            .collect();
        Factor::Fact(Fact::new(predicate, terms).expect("valid fact"))
    }

    #[test]
    fn implication_renames_generic_entities() {
        let left = fact("{} was a method of operation", &["the Lotus menu hierarchy"]);
        let right = fact("{} was a method of operation", &["the Java API"]);
        assert!(left.implies(&right));
        let witness = &left.explanations_implication(&right, &ContextRegister::new())[0];
        assert_eq!(
            witness.get(&Term::Entity(Entity::new("the Lotus menu hierarchy"))),
            Some(&Term::Entity(Entity::new("the Java API")))
        );
    }

    #[test]
    fn different_kinds_never_relate() {
        let a_fact = fact("{} was on fire", &["the house"]);
        let pleading = Factor::Pleading(Pleading::default());
        assert!(!a_fact.implies(&pleading));
        assert!(!a_fact.contradicts(&pleading));
    }

    #[test]
    fn generic_factor_is_a_wildcard_within_its_kind() {
        let concrete = fact("{} was on fire", &["the house"]);
        let wildcard = fact("{} happened", &["the event"]).with_generic(true);
        assert!(concrete.implies(&wildcard));
        assert!(!wildcard.implies(&concrete));
    }

    #[test]
    fn absent_factor_contradicts_its_present_form() {
        let present = fact("{} was on fire", &["the house"]);
        let absent = present.clone().with_absent(true);
        assert!(present.contradicts(&absent));
        assert!(absent.contradicts(&present));
        assert!(!present.contradicts(&present.clone()));
    }

    #[test]
    fn absent_implication_reverses_direction() {
        // The absence of a weak statement implies the absence of a strong
        // one: no "at least 5 feet" means no "exactly 8 feet" either.
        let quantified = |sign, magnitude| {
            Factor::Fact(
                Fact::new(
                    Predicate::build(
                        "the height of {} was {}",
                        Some(true),
                        Some(sign),
                        Some(Quantity::new(magnitude, "feet")),
                        false,
                    )
                    .expect("valid predicate"),
                    vec![Term::Entity(Entity::new("the fence"))],
                )
                .expect("valid fact"),
            )
        };
        let no_weak = quantified(Sign::GreaterOrEqual, 5.0).with_absent(true);
        let no_strong = quantified(Sign::Equal, 8.0).with_absent(true);
        assert!(no_weak.implies(&no_strong));
        assert!(!no_strong.implies(&no_weak));
    }

    #[test]
    fn reciprocal_predicate_tries_swapped_slots() {
        let near = |reciprocal: bool| {
            Predicate::build("{} was near {}", Some(true), None, None, reciprocal)
                .expect("valid predicate")
        };
        let pair = |predicate: Predicate, first: &str, second: &str| {
            Factor::Fact(
                Fact::new(
                    predicate,
                    vec![
                        Term::Entity(Entity::concrete(first)),
                        Term::Entity(Entity::concrete(second)),
                    ],
                )
                .expect("valid fact"),
            )
        };
        // Concrete entities must match identically, so only the swapped
        // slot order lets these two facts correspond.
        let left = pair(near(true), "the barn", "the house");
        let right = pair(near(true), "the house", "the barn");
        assert!(left.implies(&right));
        assert!(left.means(&right));
        // Without the reciprocal flag the same slot contents fail.
        let rigid_left = pair(near(false), "the barn", "the house");
        let rigid_right = pair(near(false), "the house", "the barn");
        assert!(!rigid_left.implies(&rigid_right));
    }

    #[test]
    fn all_slots_scope_permutes_every_position() {
        use crate::predicates::ReciprocalScope;

        let met = |scope: ReciprocalScope| {
            Predicate::build("{} and {} and {} met together", Some(true), None, None, true)
                .expect("valid predicate")
                .with_reciprocal_scope(scope)
        };
        let meeting = |predicate: Predicate, order: [&str; 3]| {
            Factor::Fact(
                Fact::new(
                    predicate,
                    order
                        .iter()
                        .map(|n| Term::Entity(Entity::concrete(*n)))
                        .collect(),
                )
                .expect("valid fact"),
            )
        };
        // A rotation is beyond the adjacent-pair swap but within the full
        // permutation group.
        let adjacent = meeting(met(ReciprocalScope::AdjacentPair), ["Alice", "Bob", "Craig"]);
        let adjacent_rotated = meeting(met(ReciprocalScope::AdjacentPair), ["Bob", "Craig", "Alice"]);
        assert!(!adjacent.implies(&adjacent_rotated));

        let full = meeting(met(ReciprocalScope::AllSlots), ["Alice", "Bob", "Craig"]);
        let full_rotated = meeting(met(ReciprocalScope::AllSlots), ["Bob", "Craig", "Alice"]);
        assert!(full.implies(&full_rotated));
    }

    #[test]
    fn standard_of_proof_orders_implication() {
        use crate::factors::StandardOfProof;

        let found = |standard: Option<StandardOfProof>| {
            let fact = Fact::new(
                Predicate::new("{} committed the burglary").expect("valid predicate"),
                vec![Term::Entity(Entity::new("Alice"))],
            )
            .expect("valid fact");
            Factor::Fact(match standard {
                Some(s) => fact.with_standard_of_proof(s),
                None => fact,
            })
        };
        let beyond_doubt = found(Some(StandardOfProof::BeyondReasonableDoubt));
        let preponderance = found(Some(StandardOfProof::Preponderance));
        let bare = found(None);
        assert!(beyond_doubt.implies(&preponderance));
        assert!(!preponderance.implies(&beyond_doubt));
        // A finding with a standard never implies one without, or the
        // other way around.
        assert!(!beyond_doubt.implies(&bare));
        assert!(!bare.implies(&preponderance));
    }

    #[test]
    fn consistency_is_weaker_than_implication() {
        let tall = fact("{} was tall", &["Alice"]);
        let rich = fact("{} was rich", &["Bob"]);
        assert!(tall.consistent_with(&rich));
        assert!(!tall.implies(&rich));
        let not_tall = tall.clone().with_absent(true);
        assert!(!tall.consistent_with(&not_tall));
    }

    #[test]
    fn nested_evidence_compares_recursively() {
        let statement = |who: &str| {
            Fact::new(
                Predicate::new("{} committed the burglary").expect("valid"),
                vec![Term::Entity(Entity::new(who))],
            )
            .expect("valid fact")
        };
        let evidence = |who: &str| {
            Factor::Evidence(Evidence {
                exhibit: Some(Exhibit {
                    form: Some("testimony".to_string()),
                    statement: Some(statement(who)),
                    stated_by: Some(Entity::new("the witness")),
                    ..Default::default()
                }),
                to_effect: Some(statement(who)),
                ..Default::default()
            })
        };
        assert!(evidence("Alice").implies(&evidence("Bob")));
        // One consistent mapping must hold across the nested structure.
        let witness =
            &evidence("Alice").explanations_implication(&evidence("Bob"), &ContextRegister::new())
                [0];
        assert_eq!(
            witness.get(&Term::Entity(Entity::new("Alice"))),
            Some(&Term::Entity(Entity::new("Bob")))
        );
    }
}
