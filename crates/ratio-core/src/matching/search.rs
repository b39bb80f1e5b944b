use std::iter;
use std::sync::Arc;

use crate::factors::Factor;
use crate::matching::{ContextRegister, Operation};
use crate::terms::Term;

/// A lazy, restartable stream of complete context assignments. An empty
/// stream means no mapping exists; pulling one item and dropping the rest
/// is the supported way to ask a bare existence question.
pub type WitnessIter = Box<dyn Iterator<Item = ContextRegister>>;

pub(crate) fn single(register: ContextRegister) -> WitnessIter {
    Box::new(iter::once(register))
}

pub(crate) fn reversed_iter(iter: WitnessIter) -> WitnessIter {
    Box::new(iter.map(|register| register.reversed()))
}

/// Drop registers whose pair sets duplicate an earlier one.
pub(crate) fn dedup_registers(registers: Vec<ContextRegister>) -> Vec<ContextRegister> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for register in registers {
        let key = register.key_pairs();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(register);
        }
    }
    out
}

/// Ways to extend `seed` so that each left slot stands in `operation` to
/// the right slot at the same position.
///
/// A populated left slot over an empty right one asserts more than is
/// needed and passes; an empty left slot cannot satisfy a populated right
/// one and kills the comparison.
pub(crate) fn ordered_witnesses(
    left: &[Option<Term>],
    right: &[Option<Term>],
    operation: Operation,
    seed: &ContextRegister,
) -> Vec<ContextRegister> {
    let mut registers = vec![seed.clone()];
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).and_then(|slot| slot.as_ref());
        let r = right.get(i).and_then(|slot| slot.as_ref());
        let mut next = Vec::new();
        for register in &registers {
            match (l, r) {
                (None, None) | (Some(_), None) => next.push(register.clone()),
                (None, Some(_)) => {}
                (Some(l), Some(r)) => next.extend(l.witnesses(r, operation, register)),
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        registers = dedup_registers(next);
    }
    registers
}

/// Backtracking search pairing every factor in `need` with some factor in
/// `available`, under one consistent register.
///
/// The factors of `available` may go unused; each needed factor must find
/// a partner whose own witnesses extend the register built so far. Results
/// stream lazily: a branch is expanded only when the caller pulls past it.
pub(crate) fn group_witnesses(
    available: Arc<Vec<Factor>>,
    mut need: Vec<Factor>,
    operation: Operation,
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
        let leaf_witnesses = candidate.witnesses(operation, &target, &seed);
        Box::new(leaf_witnesses.into_iter().flat_map(move |register| {
            group_witnesses(Arc::clone(&available), rest.clone(), operation, register)
        })) as WitnessIter
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::Fact;
    use crate::predicates::Predicate;
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
    fn group_search_finds_consistent_pairing() {
        let available = Arc::new(vec![
            fact("{} sent a message to {}", &["Alice", "Bob"]),
            fact("{} owed a duty to {}", &["Alice", "Bob"]),
        ]);
        let need = vec![
            fact("{} sent a message to {}", &["Craig", "Dan"]),
            fact("{} owed a duty to {}", &["Craig", "Dan"]),
        ];
        let witness = group_witnesses(
            available,
            need,
            Operation::Implies,
            ContextRegister::new(),
        )
        .next()
        .expect("one witness");
        assert_eq!(
            witness.get(&Term::Entity(Entity::new("Alice"))),
            Some(&Term::Entity(Entity::new("Craig")))
        );
    }

    #[test]
    fn group_search_rejects_crossed_entities() {
        // The same generic entity must map the same way in both facts, so
        // a pairing that crosses Alice to both Craig and Dan has no witness.
        let available = Arc::new(vec![
            fact("{} sent a message to {}", &["Alice", "Bob"]),
            fact("{} owed a duty to {}", &["Bob", "Alice"]),
        ]);
        let need = vec![
            fact("{} sent a message to {}", &["Craig", "Dan"]),
            fact("{} owed a duty to {}", &["Craig", "Dan"]),
        ];
        assert!(group_witnesses(
            available,
            need,
            Operation::Implies,
            ContextRegister::new(),
        )
        .next()
        .is_none());
    }

    #[test]
    fn unused_available_factors_are_allowed() {
        let available = Arc::new(vec![
            fact("{} was on fire", &["the house"]),
            fact("{} sent a message to {}", &["Alice", "Bob"]),
        ]);
        let need = vec![fact("{} sent a message to {}", &["Craig", "Dan"])];
        assert!(group_witnesses(
            available,
            need,
            Operation::Implies,
            ContextRegister::new(),
        )
        .next()
        .is_some());
    }

    #[test]
    fn empty_need_yields_the_seed() {
        let witnesses: Vec<_> = group_witnesses(
            Arc::new(Vec::new()),
            Vec::new(),
            Operation::Implies,
            ContextRegister::new(),
        )
        .collect();
        assert_eq!(witnesses.len(), 1);
    }
}
