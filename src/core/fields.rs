//! Purpose: Typed field extraction over a decoded JSON object.
//! Exports: `Fields`, `is_truthy`.
//! Role: Shared accessors so each entity parser only states its rules.
//! Invariants: Absent keys map to `MissingField`, wrong JSON types to `InvalidType`.
//! Invariants: Errors carry the entity label and field name, never the value.

use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::core::date::parse_date;
use crate::core::error::{Error, ErrorKind, Result};

/// Loose truthiness used by the vault for optional-but-validated fields:
/// `null`, `false`, `0`, `""`, `"0"` and `[]` count as "not given".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && text != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Fields<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(entity: &'static str, value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { entity, map }),
            _ => Err(Error::new(ErrorKind::InvalidType)
                .with_message(format!("malformed {entity}: expected a JSON object"))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name)
    }

    pub fn require_all(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.map.contains_key(**name)) {
            Some(missing) => Err(Error::missing_field(self.entity, missing)),
            None => Ok(()),
        }
    }

    fn present(&self, name: &str) -> Result<&'a Value> {
        self.map
            .get(name)
            .ok_or_else(|| Error::missing_field(self.entity, name))
    }

    pub fn string(&self, name: &str) -> Result<String> {
        match self.present(name)? {
            Value::String(text) => Ok(text.clone()),
            _ => Err(Error::invalid_type(self.entity, name, "a string")),
        }
    }

    /// Absent and `null` both read as `None`.
    pub fn optional_string(&self, name: &str) -> Result<Option<String>> {
        match self.map.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(Error::invalid_type(self.entity, name, "a string or null")),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.present(name)? {
            Value::Bool(flag) => Ok(*flag),
            _ => Err(Error::invalid_type(self.entity, name, "a boolean")),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.present(name)?
            .as_i64()
            .ok_or_else(|| Error::invalid_type(self.entity, name, "an integer"))
    }

    /// Any value that is not a parseable timestamp string is an `InvalidDate`.
    pub fn date(&self, name: &str) -> Result<OffsetDateTime> {
        self.present(name)?
            .as_str()
            .and_then(parse_date)
            .ok_or_else(|| Error::invalid_date(self.entity, name))
    }

    /// Parses `names` in order; the first bad one is the error.
    pub fn dates<const N: usize>(&self, names: [&str; N]) -> Result<[OffsetDateTime; N]> {
        let mut parsed = [OffsetDateTime::UNIX_EPOCH; N];
        for (slot, name) in parsed.iter_mut().zip(names) {
            *slot = self.date(name)?;
        }
        Ok(parsed)
    }

    /// `Ok(None)` when the key is absent or falsy; truthy values must parse.
    pub fn truthy_date(&self, name: &str) -> Result<Option<OffsetDateTime>> {
        match self.map.get(name) {
            Some(value) if is_truthy(value) => self.date(name).map(Some),
            _ => Ok(None),
        }
    }

    /// `Ok(None)` when the key is absent or falsy; truthy non-objects are rejected.
    pub fn truthy_object(&self, name: &str) -> Result<Option<&'a Value>> {
        match self.map.get(name) {
            Some(value @ Value::Object(_)) => Ok(Some(value)),
            Some(value) if is_truthy(value) => {
                Err(Error::invalid_type(self.entity, name, "an object or null"))
            }
            _ => Ok(None),
        }
    }

    /// A present key that must hold an object, e.g. a nested entity.
    pub fn object(&self, name: &str) -> Result<&'a Value> {
        match self.present(name)? {
            value @ Value::Object(_) => Ok(value),
            _ => Err(Error::invalid_type(self.entity, name, "an object")),
        }
    }
}
