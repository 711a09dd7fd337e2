//! Purpose: Validate, parse, and canonically re-serialize MVault membership records.
//! Exports: `api` (entities, errors, options) re-exported at the crate root, and `json`.
//! Role: Library backing the `mvault` CLI and any caller holding vault payloads.
//! Invariants: Parsing is pure; no I/O, no shared state, no partial records.
//! Invariants: parse → serialize → parse is lossless for valid input.
pub mod api;
mod core;
pub mod json;

pub use api::*;
