//! Purpose: Shared parse/serialize contract for the three vault entities.
//! Exports: `VaultEntity`.
//! Role: Funnels JSON text and generic maps into each entity's canonical validator.
//! Invariants: `from_json`/`from_map` add decoding only; all rules live in `from_value_with`.
//! Invariants: Rejections are traced at the default-options and decoding entry points.

use serde::Serialize;
use serde_json::Value;

use crate::core::error::{Error, Result};
use crate::core::options::ParseOptions;
use crate::json::parse;

pub trait VaultEntity: Sized {
    /// Human label used in error messages and traces.
    const ENTITY: &'static str;

    /// The canonical validator. Nested entities are parsed through this too,
    /// so their errors reach the caller unchanged.
    fn from_value_with(value: &Value, options: &ParseOptions) -> Result<Self>;

    /// Canonical serialized form; re-parsing it yields an equal value.
    fn to_value(&self) -> Value;

    fn from_value(value: &Value) -> Result<Self> {
        Self::from_value_with(value, &ParseOptions::default())
            .inspect_err(|err| trace_rejection(Self::ENTITY, err))
    }

    fn from_json(input: &str) -> Result<Self> {
        Self::from_json_with(input, &ParseOptions::default())
    }

    fn from_json_with(input: &str, options: &ParseOptions) -> Result<Self> {
        parse::from_str(input, Self::ENTITY)
            .and_then(|value| Self::from_value_with(&value, options))
            .inspect_err(|err| trace_rejection(Self::ENTITY, err))
    }

    fn from_map<M>(map: &M) -> Result<Self>
    where
        M: Serialize + ?Sized,
    {
        Self::from_map_with(map, &ParseOptions::default())
    }

    fn from_map_with<M>(map: &M, options: &ParseOptions) -> Result<Self>
    where
        M: Serialize + ?Sized,
    {
        parse::from_map(map, Self::ENTITY)
            .and_then(|value| Self::from_value_with(&value, options))
            .inspect_err(|err| trace_rejection(Self::ENTITY, err))
    }

    fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

pub(crate) fn trace_rejection(entity: &str, err: &Error) {
    tracing::debug!(
        entity,
        kind = ?err.kind(),
        field = err.field().unwrap_or("-"),
        "rejected vault payload"
    );
}
