//! Purpose: Strict JSON text and map decoding into `serde_json::Value`.
//! Exports: `from_str`, `from_map`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Adapters that funnel text and generic maps into the canonical validators.
//! Invariants: Every decode failure becomes a `MalformedInput` error with the cause attached.
//! Notes: Maps go through `serde_json::to_value`, not a text round trip.

use serde::Serialize;
use serde_json::Value;
use serde_json::error::Category;

use crate::core::error::{Error, ErrorKind, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Eof,
    Data,
    Io,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Io => "io",
        }
    }
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    let category = categorize_error(err);
    let advice = match category {
        ParseFailureCategory::Syntax => "check for stray commas, quotes, or brackets",
        ParseFailureCategory::Eof => "input ended early; the document may be truncated",
        ParseFailureCategory::Data => "input is JSON but not a usable value",
        ParseFailureCategory::Io => "input could not be read",
    };
    format!(
        "{advice} (parse category: {}; line {}, column {}; context: {context})",
        category.label(),
        err.line(),
        err.column()
    )
}

/// Strictly decodes `input`; `context` names the caller for the error hint.
pub fn from_str(input: &str, context: &str) -> Result<Value> {
    serde_json::from_str::<Value>(input).map_err(|err| {
        let hint = hint_for_error(&err, context);
        Error::new(ErrorKind::MalformedInput)
            .with_message(format!("{context}: input is not valid JSON"))
            .with_hint(hint)
            .with_source(err)
    })
}

/// Converts any string-keyed serializable map into a JSON object value.
pub fn from_map<M>(map: &M, context: &str) -> Result<Value>
where
    M: Serialize + ?Sized,
{
    let value = serde_json::to_value(map).map_err(|err| {
        Error::new(ErrorKind::MalformedInput)
            .with_message(format!("{context}: map could not be encoded as JSON"))
            .with_source(err)
    })?;
    if !value.is_object() {
        return Err(Error::new(ErrorKind::InvalidType)
            .with_message(format!("{context}: expected a string-keyed map")));
    }
    Ok(value)
}
