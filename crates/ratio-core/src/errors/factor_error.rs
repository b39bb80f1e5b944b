//! Factor construction errors.

/// Errors rejected when building a [`crate::factors::Factor`] variant.
#[derive(Debug, thiserror::Error)]
pub enum FactorError {
    #[error("predicate {content:?} has {expected} context slots but {actual} terms were given")]
    ContextCountMismatch {
        content: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown standard of proof {value:?}")]
    UnknownStandardOfProof { value: String },
}
