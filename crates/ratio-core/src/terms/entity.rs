use std::fmt;

use serde::{Deserialize, Serialize};

/// A named or anonymous participant in a legal proposition.
///
/// A generic entity stands for any instance of its kind: two generic
/// entities of matching plurality are always mutually substitutable, no
/// matter what they are called. A concrete entity (`generic: false`) refers
/// to one specific named thing and matches only itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: Option<String>,
    pub generic: bool,
    pub plural: bool,
}

impl Entity {
    /// A named generic entity, the common case.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            generic: true,
            plural: false,
        }
    }

    /// A concrete entity referring to one specific named thing.
    pub fn concrete(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            generic: false,
            plural: false,
        }
    }

    pub fn with_plural(mut self, plural: bool) -> Self {
        self.plural = plural;
        self
    }

    /// Whether `self` and `other` have the same meaning.
    pub fn means(&self, other: &Entity) -> bool {
        if self.generic && other.generic {
            self.plural == other.plural
        } else {
            self == other
        }
    }

    /// Whether `self` implies `other`. Anything of matching plurality
    /// implies a generic entity; only identity implies a concrete one.
    pub fn implies(&self, other: &Entity) -> bool {
        if other.generic {
            self.plural == other.plural
        } else {
            self == other
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("");
        if self.generic {
            write!(f, "<{name}>")
        } else {
            write!(f, "{name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_entities_are_interchangeable() {
        let alice = Entity::new("Alice");
        let bob = Entity::new("Bob");
        assert!(alice.means(&bob));
        assert!(alice.implies(&bob));
    }

    #[test]
    fn plurality_blocks_substitution() {
        let crowd = Entity::new("the shareholders").with_plural(true);
        let alice = Entity::new("Alice");
        assert!(!crowd.means(&alice));
        assert!(!alice.implies(&crowd));
    }

    #[test]
    fn concrete_entities_match_only_themselves() {
        let lotus = Entity::concrete("Lotus Development Corporation");
        let borland = Entity::concrete("Borland International");
        assert!(!lotus.means(&borland));
        assert!(lotus.means(&lotus.clone()));
        // A concrete entity still implies a generic placeholder.
        assert!(lotus.implies(&Entity::new("a company")));
        assert!(!Entity::new("a company").implies(&lotus));
    }
}
