use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Fact, Pleading};

/// A formal assertion of a fact, made in a pleading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allegation {
    pub statement: Option<Fact>,
    pub pleading: Option<Pleading>,
    pub name: Option<String>,
    pub absent: bool,
    pub generic: bool,
}

impl fmt::Display for Allegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::from("the allegation");
        if let Some(statement) = &self.statement {
            text.push_str(&format!(" of {statement}"));
        }
        if let Some(pleading) = &self.pleading {
            text.push_str(&format!(", found in {pleading}"));
        }
        if self.generic {
            text = format!("<{text}>");
        }
        if self.absent {
            text = format!("absence of {text}");
        }
        write!(f, "{text}")
    }
}
