use std::fmt;

use serde::{Deserialize, Serialize};

/// A passage of legislative text cited in support of a rule.
///
/// The citation arrives pre-resolved: `text` is the selected passage
/// itself, supplied by an external resolver before any comparison runs.
/// The only contract this engine consumes is containment: an enactment
/// implies another when its selected text contains the other's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enactment {
    pub source: String,
    pub text: String,
    pub name: Option<String>,
}

impl Enactment {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn trimmed(&self) -> &str {
        self.text.trim_matches(|c: char| ",:;. ".contains(c))
    }

    /// Whether `self`'s selected text contains all of `other`'s.
    pub fn implies(&self, other: &Enactment) -> bool {
        self.text.contains(other.trimmed())
    }

    /// Whether both cite the same passage of the same source.
    pub fn means(&self, other: &Enactment) -> bool {
        self.source == other.source && self.trimmed() == other.trimmed()
    }
}

impl fmt::Display for Enactment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.source)
    }
}

/// Drop enactments whose selected text is already implied by another in
/// the list.
pub fn consolidate_enactments(enactments: Vec<Enactment>) -> Vec<Enactment> {
    let mut consolidated: Vec<Enactment> = Vec::new();
    for incoming in enactments {
        if consolidated.iter().any(|kept| kept.implies(&incoming)) {
            continue;
        }
        consolidated.retain(|kept| !incoming.implies(kept));
        consolidated.push(incoming);
    }
    consolidated
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSISTENCE: &str = "/us/usc/t17/s102/a";

    #[test]
    fn containment_is_implication() {
        let whole = Enactment::new(
            SUBSISTENCE,
            "Copyright protection subsists, in accordance with this title, \
             in original works of authorship fixed in any tangible medium of expression",
        );
        let fragment = Enactment::new(SUBSISTENCE, "in original works of authorship");
        assert!(whole.implies(&fragment));
        assert!(!fragment.implies(&whole));
        assert!(!whole.means(&fragment));
    }

    #[test]
    fn edge_punctuation_is_ignored() {
        let a = Enactment::new(SUBSISTENCE, "original works of authorship");
        let b = Enactment::new(SUBSISTENCE, "original works of authorship;");
        assert!(a.means(&b));
        assert!(a.implies(&b));
    }

    #[test]
    fn consolidation_drops_implied_citations() {
        let whole = Enactment::new(SUBSISTENCE, "in original works of authorship fixed");
        let fragment = Enactment::new(SUBSISTENCE, "original works of authorship");
        let other = Enactment::new("/us/const/amendment-I", "freedom of speech");
        let consolidated =
            consolidate_enactments(vec![fragment.clone(), whole.clone(), other.clone()]);
        assert_eq!(consolidated.len(), 2);
        assert!(consolidated.iter().any(|e| e.means(&whole)));
        assert!(consolidated.iter().any(|e| e.means(&other)));
    }
}
