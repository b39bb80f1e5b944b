//! Participants that legal propositions talk about.
//!
//! An [`Entity`] is a person, place, thing, or event from the world outside
//! the litigation. A [`Term`] is anything that can fill an ordered context
//! slot of a factor: an entity, or another factor nested whole (an exhibit's
//! statement, the fact an item of evidence tends to prove, and so on).
//! Position in a [`TermSequence`] is the correspondence key when two factors
//! are matched against each other.

mod entity;
mod term;

pub use entity::Entity;
pub use term::Term;

use smallvec::SmallVec;

/// Ordered sequence of context terms inside a single factor.
pub type TermSequence = SmallVec<[Term; 4]>;
