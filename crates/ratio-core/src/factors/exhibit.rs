use std::fmt;

use serde::{Deserialize, Serialize};

use super::Fact;
use crate::terms::Entity;

/// A source of information for use in litigation: a form descriptor, the
/// statement it makes, and the entity the statement is attributed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exhibit {
    pub form: Option<String>,
    pub statement: Option<Fact>,
    pub stated_by: Option<Entity>,
    pub name: Option<String>,
    pub absent: bool,
    pub generic: bool,
}

impl fmt::Display for Exhibit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::from("the exhibit");
        if let Some(form) = &self.form {
            text.push_str(&format!(" in the form of {form}"));
        }
        if let Some(statement) = &self.statement {
            text.push_str(&format!(" asserting {statement}"));
        }
        if let Some(stated_by) = &self.stated_by {
            text.push_str(&format!(", stated by {stated_by}"));
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
