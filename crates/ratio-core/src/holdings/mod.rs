//! A court's posture toward a rule, and witness explanations.

mod explanation;
mod holding;

pub use explanation::{Explanation, Relation};
pub use holding::Holding;
