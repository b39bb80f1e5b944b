//! Conditional rule bodies: inputs, outputs, and despite factors.

mod procedure;

pub use procedure::Procedure;
