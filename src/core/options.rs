//! Purpose: Caller-tunable parsing policy.
//! Exports: `ParseOptions`, `StatusPolicy`.
//! Role: The only configuration surface of the validators; defaults match the vault's behavior.
//! Invariants: `ParseOptions::default()` never rejects input the vault itself accepts.

use serde_json::Value;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::schema::record;

/// How the record `status` string maps to a boolean.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StatusPolicy {
    /// Exactly `"On"` is true; every other value, including non-strings, is false.
    #[default]
    Lenient,
    /// `"On"` is true, `"Off"` is false, anything else is `InvalidStatus`.
    Strict,
}

impl StatusPolicy {
    pub(crate) fn resolve(self, value: &Value) -> Result<bool> {
        match value.as_str() {
            Some(record::STATUS_ON) => Ok(true),
            Some(record::STATUS_OFF) => Ok(false),
            _ => match self {
                StatusPolicy::Lenient => {
                    tracing::debug!(
                        field = record::STATUS,
                        "unrecognized record status coerced to Off"
                    );
                    Ok(false)
                }
                StatusPolicy::Strict => Err(Error::new(ErrorKind::InvalidStatus)
                    .with_field(record::STATUS)
                    .with_message(format!(
                        "malformed {}: status must be \"On\" or \"Off\"",
                        record::ENTITY
                    ))),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParseOptions {
    pub status_policy: StatusPolicy,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            status_policy: StatusPolicy::Strict,
        }
    }

    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }
}
