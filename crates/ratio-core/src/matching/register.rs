use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::terms::Term;

/// A mapping of corresponding generic terms from two different contexts.
///
/// The register is a partial bijection: each left-side term pairs with at
/// most one right-side term and vice versa, so the same generic entity must
/// map the same way everywhere it recurs. Terms are keyed by their
/// canonical string form.
#[derive(Debug, Clone, Default)]
pub struct ContextRegister {
    pairs: Vec<(Term, Term)>,
    forward: FxHashMap<String, usize>,
    reverse: FxHashMap<String, usize>,
}

impl ContextRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// The right-side counterpart assigned to `left`, if any.
    pub fn get(&self, left: &Term) -> Option<&Term> {
        self.forward
            .get(&left.registry_key())
            .map(|&i| &self.pairs[i].1)
    }

    /// The left-side term assigned to `right`, if any.
    pub fn get_reverse(&self, right: &Term) -> Option<&Term> {
        self.reverse
            .get(&right.registry_key())
            .map(|&i| &self.pairs[i].0)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &(Term, Term)> {
        self.pairs.iter()
    }

    fn insert(&mut self, left: Term, right: Term) {
        let index = self.pairs.len();
        self.forward.insert(left.registry_key(), index);
        self.reverse.insert(right.registry_key(), index);
        self.pairs.push((left, right));
    }

    /// A copy of `self` extended with `left -> right`, or `None` if either
    /// side is already assigned to something else.
    pub fn try_extended(&self, left: &Term, right: &Term) -> Option<ContextRegister> {
        let left_key = left.registry_key();
        let right_key = right.registry_key();
        if let Some(&i) = self.forward.get(&left_key) {
            if self.pairs[i].1.registry_key() == right_key {
                return Some(self.clone());
            }
            debug!(
                left = %left_key,
                assigned = %self.pairs[i].1,
                rejected = %right_key,
                "context register conflict"
            );
            return None;
        }
        if let Some(&i) = self.reverse.get(&right_key) {
            debug!(
                right = %right_key,
                assigned = %self.pairs[i].0,
                rejected = %left_key,
                "context register conflict"
            );
            return None;
        }
        let mut extended = self.clone();
        extended.insert(left.clone(), right.clone());
        Some(extended)
    }

    /// Merge two registers, or `None` if any term would be paired two ways.
    pub fn merged_with(&self, incoming: &ContextRegister) -> Option<ContextRegister> {
        let mut merged = self.clone();
        for (left, right) in incoming.pairs() {
            merged = merged.try_extended(left, right)?;
        }
        Some(merged)
    }

    /// Swap the two sides of every pair.
    pub fn reversed(&self) -> ContextRegister {
        let mut out = ContextRegister::new();
        for (left, right) in &self.pairs {
            out.insert(right.clone(), left.clone());
        }
        out
    }

    /// Pair keys in canonical order, for equality and deduplication.
    pub(crate) fn key_pairs(&self) -> BTreeMap<String, String> {
        self.pairs
            .iter()
            .map(|(l, r)| (l.registry_key(), r.registry_key()))
            .collect()
    }

    /// Prose statement matching analogous terms, for presentation:
    /// "`<the Java API>` is like `<the Lotus menu hierarchy>`".
    pub fn prose(&self) -> String {
        let clauses: Vec<String> = self
            .pairs
            .iter()
            .map(|(l, r)| {
                let verb = match l {
                    Term::Entity(e) if e.plural => "are",
                    _ => "is",
                };
                format!("{l} {verb} like {r}")
            })
            .collect();
        match clauses.len() {
            0 => String::new(),
            1 => clauses.into_iter().next().unwrap_or_default(),
            _ => {
                let (last, rest) = clauses.split_last().expect("len > 1");
                format!("{}, and {}", rest.join(", "), last)
            }
        }
    }
}

impl PartialEq for ContextRegister {
    fn eq(&self, other: &Self) -> bool {
        self.key_pairs() == other.key_pairs()
    }
}

impl Eq for ContextRegister {}

impl fmt::Display for ContextRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .pairs
            .iter()
            .map(|(l, r)| format!("{l} -> {r}"))
            .collect();
        write!(f, "ContextRegister({})", items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::Entity;

    fn term(name: &str) -> Term {
        Term::Entity(Entity::new(name))
    }

    #[test]
    fn extension_is_consistent() {
        let register = ContextRegister::new();
        let r = register
            .try_extended(&term("Alice"), &term("Craig"))
            .expect("fresh pair");
        // Same assignment again is fine.
        assert!(r.try_extended(&term("Alice"), &term("Craig")).is_some());
        // Conflicting assignment for the same key is not.
        assert!(r.try_extended(&term("Alice"), &term("Dan")).is_none());
        // Nor may two keys share one value.
        assert!(r.try_extended(&term("Bob"), &term("Craig")).is_none());
    }

    #[test]
    fn merge_detects_cross_conflicts() {
        let a = ContextRegister::new()
            .try_extended(&term("Alice"), &term("Craig"))
            .expect("pair");
        let b = ContextRegister::new()
            .try_extended(&term("Alice"), &term("Dan"))
            .expect("pair");
        assert!(a.merged_with(&b).is_none());
        let c = ContextRegister::new()
            .try_extended(&term("Bob"), &term("Dan"))
            .expect("pair");
        let merged = a.merged_with(&c).expect("disjoint registers merge");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn reversal_swaps_sides() {
        let a = ContextRegister::new()
            .try_extended(&term("Alice"), &term("Craig"))
            .expect("pair");
        let rev = a.reversed();
        assert_eq!(rev.get(&term("Craig")), Some(&term("Alice")));
        assert_eq!(rev.reversed(), a);
    }
}
