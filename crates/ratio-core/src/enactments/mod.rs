//! Pre-resolved legislative citations.

mod enactment;

pub use enactment::{consolidate_enactments, Enactment};
