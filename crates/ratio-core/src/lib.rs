//! ratio-core: comparison engine for structured legal rules
//!
//! This crate represents legal rules as immutable, composable propositions
//! and decides the logical relationships between them:
//! - Terms: generic and concrete participants, and their substitution
//! - Predicates: atomic statements with truth values and numeric comparisons
//! - Factors: the closed union of proposition kinds (fact, exhibit,
//!   evidence, pleading, allegation), with polarity via absence
//! - Factor groups: unordered collections compared by membership
//! - Procedures: conditional rule bodies (inputs, outputs, despite)
//! - Rules: procedures plus cited enactments and modality flags
//! - Holdings: a court's posture toward a rule, with witness explanations
//! - Matching: the backtracking search producing entity-assignment
//!   witnesses that every layer above delegates to
//!
//! Everything is computation-only and side-effect-free: comparisons are
//! pure functions of immutable inputs, results are freshly allocated, and
//! independent comparisons can run from separate threads without locking.

pub mod enactments;
pub mod errors;
pub mod factors;
pub mod holdings;
pub mod matching;
pub mod predicates;
pub mod procedures;
pub mod rules;
pub mod terms;

// Re-exports for convenience
pub use enactments::{consolidate_enactments, Enactment};
pub use errors::{FactorError, HoldingError, PredicateError, ProcedureError};
pub use factors::{
    Allegation, Evidence, Exhibit, Fact, Factor, FactorGroup, FactorKind, Pleading,
    StandardOfProof,
};
pub use holdings::{Explanation, Holding, Relation};
pub use matching::{ContextRegister, Operation, WitnessIter};
pub use predicates::{Predicate, Quantity, ReciprocalScope, Sign};
pub use procedures::Procedure;
pub use rules::Rule;
pub use terms::{Entity, Term, TermSequence};
