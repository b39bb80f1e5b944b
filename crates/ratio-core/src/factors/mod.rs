//! Typed legal propositions: the inputs and outputs of legal rules.
//!
//! [`Factor`] is a closed union over five kinds of proposition. Every
//! variant carries an optional nickname, a `generic` flag (the whole factor
//! as an interchangeable placeholder) and an `absent` flag (asserting the
//! non-occurrence of the proposition). [`FactorGroup`] is the unordered
//! collection used for a procedure's inputs, outputs, and despite factors.

mod allegation;
mod evidence;
mod exhibit;
mod factor;
mod fact;
mod group;
mod pleading;

pub use allegation::Allegation;
pub use evidence::Evidence;
pub use exhibit::Exhibit;
pub use fact::{Fact, StandardOfProof};
pub use factor::{Factor, FactorKind};
pub use group::FactorGroup;
pub use pleading::Pleading;
