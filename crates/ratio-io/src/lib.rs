//! ratio-io: loader and dumper for the ratio interchange format
//!
//! A holding document is JSON: either a bare array of holding records or
//! an object with optional `mentioned_factors` plus `holdings`. Factor
//! records are discriminated by a closed `"type"` tag, and any factor,
//! entity, or enactment position may instead hold a string naming a
//! previously defined object. This crate resolves every name reference
//! against a document-scoped index before handing structures to
//! `ratio-core`, which never sees an unresolved reference.

pub mod dump;
pub mod load_error;
pub mod name_index;
pub mod reader;
pub mod schema;

pub use dump::{dump_holdings, dump_holdings_json};
pub use load_error::LoadError;
pub use reader::{read_document, read_holdings_json};
pub use schema::RawDocument;
