//! Purpose: Profile of the person who activated a membership, as reported by PBS.
//! Exports: `PbsProfile`, `ProfileOutcome`, `ProfileDetails`.
//! Role: Middle entity; owns one `RetrievalStatus` and is owned by at most one record.
//! Invariants: `ProfileOutcome::Retrieved` iff the retrieval status is 200.
//! Invariants: `UID` is always required and always serialized.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::api::entity::VaultEntity;
use crate::api::retrieval::RetrievalStatus;
use crate::core::error::Result;
use crate::core::fields::Fields;
use crate::core::options::ParseOptions;
use crate::core::schema::profile::{
    EMAIL, ENTITY, FIRST_NAME, LAST_NAME, LOGIN_PROVIDER, REQUIRED, RETRIEVAL_STATUS,
    SUCCESS_REQUIRED, UID,
};

/// Identity fields that only exist when the profile lookup succeeded.
/// Each key must be present; PBS may still send `null` for any of them.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProfileDetails {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    login_provider: Option<String>,
}

impl ProfileDetails {
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// As reported by PBS, typically `PBS`, `Google`, or `Facebook`.
    pub fn login_provider(&self) -> Option<&str> {
        self.login_provider.as_deref()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ProfileOutcome {
    Retrieved(ProfileDetails),
    /// The lookup ran but did not succeed; identity fields are not retrieved.
    NotRetrieved,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PbsProfile {
    retrieval_status: RetrievalStatus,
    uid: String,
    outcome: ProfileOutcome,
}

impl PbsProfile {
    pub fn retrieval_status(&self) -> &RetrievalStatus {
        &self.retrieval_status
    }

    /// Profile identifier, sent by the vault as `UID`.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn outcome(&self) -> &ProfileOutcome {
        &self.outcome
    }

    pub fn details(&self) -> Option<&ProfileDetails> {
        match &self.outcome {
            ProfileOutcome::Retrieved(details) => Some(details),
            ProfileOutcome::NotRetrieved => None,
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.details().and_then(ProfileDetails::first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        self.details().and_then(ProfileDetails::last_name)
    }

    pub fn email(&self) -> Option<&str> {
        self.details().and_then(ProfileDetails::email)
    }

    pub fn login_provider(&self) -> Option<&str> {
        self.details().and_then(ProfileDetails::login_provider)
    }

    pub fn is_success_profile(&self) -> bool {
        self.retrieval_status.is_success()
    }
}

impl VaultEntity for PbsProfile {
    const ENTITY: &'static str = ENTITY;

    fn from_value_with(value: &Value, _options: &ParseOptions) -> Result<Self> {
        let fields = Fields::new(ENTITY, value)?;
        fields.require_all(&REQUIRED)?;

        let status_value = fields.object(RETRIEVAL_STATUS)?;
        let uid = fields.string(UID)?;
        let retrieval_status = RetrievalStatus::parse(status_value, Some(&uid))?;

        let outcome = if retrieval_status.is_success() {
            fields.require_all(&SUCCESS_REQUIRED)?;
            ProfileOutcome::Retrieved(ProfileDetails {
                first_name: fields.optional_string(FIRST_NAME)?,
                last_name: fields.optional_string(LAST_NAME)?,
                email: fields.optional_string(EMAIL)?,
                login_provider: fields.optional_string(LOGIN_PROVIDER)?,
            })
        } else {
            ProfileOutcome::NotRetrieved
        };

        Ok(Self {
            retrieval_status,
            uid,
            outcome,
        })
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            RETRIEVAL_STATUS.to_string(),
            self.retrieval_status.to_value(),
        );
        map.insert(UID.to_string(), json!(self.uid));
        if let ProfileOutcome::Retrieved(details) = &self.outcome {
            map.insert(FIRST_NAME.to_string(), json!(details.first_name));
            map.insert(LAST_NAME.to_string(), json!(details.last_name));
            map.insert(EMAIL.to_string(), json!(details.email));
            map.insert(LOGIN_PROVIDER.to_string(), json!(details.login_provider));
        }
        Value::Object(map)
    }
}

impl Serialize for PbsProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PbsProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
