//! Purpose: JSON decoding boundary shared by the entity parsers and the CLI.
//! Exports: `parse` module with strict decode and error categorization helpers.
//! Role: Single seam so callsites never decode ad hoc or swallow decode errors.
//! Invariants: Decoding never substitutes `null` for malformed input.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod parse;
