//! Error handling for ratio.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Construction-time invariant violations are fatal to the construction
//! that raised them. A comparison that finds no valid mapping is not an
//! error anywhere in this crate; it is an empty witness sequence.

pub mod factor_error;
pub mod holding_error;
pub mod predicate_error;
pub mod procedure_error;

pub use factor_error::FactorError;
pub use holding_error::HoldingError;
pub use predicate_error::PredicateError;
pub use procedure_error::ProcedureError;
