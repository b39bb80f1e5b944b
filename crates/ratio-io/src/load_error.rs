//! Loading errors.

use ratio_core::errors::{FactorError, HoldingError, PredicateError, ProcedureError};

/// Errors surfaced while turning an interchange document into core
/// structures. Unknown `"type"` tags surface through the `Json` variant,
/// rejected by the closed schema enumeration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse interchange document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("name {name:?} does not resolve to any previously defined object")]
    UnknownName { name: String },

    #[error("name {name:?} resolves to {found}, expected {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot parse quantity {value:?}")]
    BadQuantity { value: String },

    #[error("reference cycle while resolving {name:?}")]
    ReferenceCycle { name: String },

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Factor(#[from] FactorError),

    #[error(transparent)]
    Procedure(#[from] ProcedureError),

    #[error(transparent)]
    Holding(#[from] HoldingError),
}
