use std::fmt;

use serde::{Deserialize, Serialize};

use crate::terms::Entity;

/// A document filed by a party, identified by its filer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pleading {
    pub filer: Option<Entity>,
    pub name: Option<String>,
    pub absent: bool,
    pub generic: bool,
}

impl fmt::Display for Pleading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::from("the pleading");
        if let Some(filer) = &self.filer {
            text.push_str(&format!(" filed by {filer}"));
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
