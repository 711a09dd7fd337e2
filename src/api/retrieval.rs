//! Purpose: Outcome of the PBS profile sub-request embedded in activated records.
//! Exports: `RetrievalStatus`.
//! Role: Innermost entity of the record → profile → status pipeline.
//! Invariants: `uid` is `Some` iff `status == 500`.
//! Invariants: Serialized form omits `UID` entirely when no identifier is held.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::api::entity::VaultEntity;
use crate::core::error::{Error, Result};
use crate::core::fields::Fields;
use crate::core::options::ParseOptions;
use crate::core::schema::retrieval::{
    ENTITY, MESSAGE, REQUIRED, STATUS, STATUS_FAILURE, STATUS_SUCCESS, UID,
};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RetrievalStatus {
    status: i64,
    message: String,
    uid: Option<String>,
}

impl RetrievalStatus {
    /// `inherited_uid` stands in for a missing `UID` on failure statuses; a
    /// profile passes its own identifier here.
    pub(crate) fn parse(value: &Value, inherited_uid: Option<&str>) -> Result<Self> {
        let fields = Fields::new(ENTITY, value)?;
        fields.require_all(&REQUIRED)?;

        let status = fields.integer(STATUS)?;
        let message = fields.string(MESSAGE)?;

        let uid = if status == STATUS_FAILURE {
            match (fields.get(UID), inherited_uid) {
                (Some(Value::String(uid)), _) => Some(uid.clone()),
                (None | Some(Value::Null), Some(inherited)) => Some(inherited.to_string()),
                (None | Some(Value::Null), None) => {
                    return Err(Error::missing_field(ENTITY, UID));
                }
                (Some(_), _) => return Err(Error::invalid_type(ENTITY, UID, "a string")),
            }
        } else {
            None
        };

        Ok(Self {
            status,
            message,
            uid,
        })
    }

    pub fn status(&self) -> i64 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Identifier reported alongside a failed lookup.
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn is_failure(&self) -> bool {
        self.status == STATUS_FAILURE
    }
}

impl VaultEntity for RetrievalStatus {
    const ENTITY: &'static str = ENTITY;

    fn from_value_with(value: &Value, _options: &ParseOptions) -> Result<Self> {
        Self::parse(value, None)
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(STATUS.to_string(), json!(self.status));
        map.insert(MESSAGE.to_string(), json!(self.message));
        if let Some(uid) = &self.uid {
            map.insert(UID.to_string(), json!(uid));
        }
        Value::Object(map)
    }
}

impl Serialize for RetrievalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RetrievalStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
