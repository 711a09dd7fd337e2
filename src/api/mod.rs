//! Purpose: Define the public Rust API boundary for vault record handling.
//! Exports: The three entities, the `VaultEntity` contract, errors, and options.
//! Role: Public, additive-only surface; field tables and accessors stay internal.
//! Invariants: Every public type is immutable after parsing and `Send + Sync`.

mod entity;
mod profile;
mod record;
mod retrieval;

pub use crate::core::date::{CANONICAL_FORMAT, format_date, parse_date};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::options::{ParseOptions, StatusPolicy};
pub use entity::VaultEntity;
pub use profile::{PbsProfile, ProfileDetails, ProfileOutcome};
pub use record::MVaultRecord;
pub use retrieval::RetrievalStatus;
