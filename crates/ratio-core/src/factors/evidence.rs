use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Exhibit, Fact};

/// An exhibit admitted to aid a factual determination, together with the
/// fact it tends to prove.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub exhibit: Option<Exhibit>,
    pub to_effect: Option<Fact>,
    pub name: Option<String>,
    pub absent: bool,
    pub generic: bool,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::from("the evidence");
        if let Some(exhibit) = &self.exhibit {
            text.push_str(&format!(" of {exhibit}"));
        }
        if let Some(to_effect) = &self.to_effect {
            text.push_str(&format!(", which supports {to_effect}"));
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
