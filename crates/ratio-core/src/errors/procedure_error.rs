//! Procedure construction errors.

/// Errors rejected when building a [`crate::procedures::Procedure`].
#[derive(Debug, thiserror::Error)]
pub enum ProcedureError {
    #[error("factor appears as both an output and a despite factor: {factor}")]
    OutputAlsoDespite { factor: String },
}
