//! Legal doctrines: a procedure plus its cited enactments and modality.

mod rule;

pub use rule::Rule;
