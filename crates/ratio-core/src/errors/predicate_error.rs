//! Predicate construction errors.

/// Errors rejected when building a [`crate::predicates::Predicate`].
#[derive(Debug, thiserror::Error)]
pub enum PredicateError {
    #[error("a comparison sign requires a quantity")]
    SignWithoutQuantity,

    #[error("quantity needs a trailing {{}} placeholder in {content:?}")]
    MissingQuantitySlot { content: String },

    #[error("quantity magnitude must be finite, got {magnitude}")]
    NonFiniteQuantity { magnitude: f64 },

    #[error("reciprocal predicate {content:?} has {slots} context slots, needs at least 2")]
    ReciprocalNeedsPair { content: String, slots: usize },

    #[error("unknown comparison sign {value:?}")]
    UnknownSign { value: String },
}
