//! Purpose: Top-level membership record returned by the MVault API.
//! Exports: `MVaultRecord`.
//! Role: Outermost validator; delegates to `PbsProfile` when a profile is present.
//! Invariants: All 17 keys must be present; values may be null where typed optional.
//! Invariants: Required dates always parse; `activation_date` parses when truthy.
//! Invariants: A record is activated iff it owns a profile, whatever the lookup outcome.
//! Notes: Dates serialize in the canonical layout regardless of the input layout.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};
use time::OffsetDateTime;

use crate::api::entity::VaultEntity;
use crate::api::profile::PbsProfile;
use crate::core::date::format_date;
use crate::core::error::Result;
use crate::core::fields::Fields;
use crate::core::options::ParseOptions;
use crate::core::schema::record::{
    ACTIVATION_DATE, ADDITIONAL_METADATA, CREATE_DATE, EMAIL, ENTITY, EXPIRE_DATE, FIRST_NAME,
    GRACE_PERIOD, LAST_NAME, MEMBERSHIP_ID, NOTES, OFFER, PBS_PROFILE, PROVISIONAL, REQUIRED,
    REQUIRED_DATES, START_DATE, STATUS, STATUS_OFF, STATUS_ON, TOKEN, UPDATE_DATE,
};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MVaultRecord {
    first_name: String,
    last_name: String,
    membership_id: String,
    token: String,
    offer: Option<String>,
    grace_period: OffsetDateTime,
    update_date: OffsetDateTime,
    create_date: OffsetDateTime,
    start_date: OffsetDateTime,
    expire_date: OffsetDateTime,
    activation_date: Option<OffsetDateTime>,
    status_on: bool,
    provisional: bool,
    notes: Option<String>,
    email: Option<String>,
    additional_metadata: Option<String>,
    pbs_profile: Option<PbsProfile>,
}

impl MVaultRecord {
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn membership_id(&self) -> &str {
        &self.membership_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn offer(&self) -> Option<&str> {
        self.offer.as_deref()
    }

    /// End of the grace period.
    pub fn grace_period(&self) -> OffsetDateTime {
        self.grace_period
    }

    pub fn update_date(&self) -> OffsetDateTime {
        self.update_date
    }

    pub fn create_date(&self) -> OffsetDateTime {
        self.create_date
    }

    pub fn start_date(&self) -> OffsetDateTime {
        self.start_date
    }

    pub fn expire_date(&self) -> OffsetDateTime {
        self.expire_date
    }

    /// `None` when the membership has not been activated.
    pub fn activation_date(&self) -> Option<OffsetDateTime> {
        self.activation_date
    }

    pub fn is_status_on(&self) -> bool {
        self.status_on
    }

    pub fn is_provisional(&self) -> bool {
        self.provisional
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn additional_metadata(&self) -> Option<&str> {
        self.additional_metadata.as_deref()
    }

    pub fn pbs_profile(&self) -> Option<&PbsProfile> {
        self.pbs_profile.as_ref()
    }

    /// True when a profile object exists, even if its lookup failed.
    pub fn is_activated(&self) -> bool {
        self.pbs_profile.is_some()
    }
}

impl VaultEntity for MVaultRecord {
    const ENTITY: &'static str = ENTITY;

    fn from_value_with(value: &Value, options: &ParseOptions) -> Result<Self> {
        let fields = Fields::new(ENTITY, value)?;
        fields.require_all(&REQUIRED)?;

        let [grace_period, update_date, create_date, start_date, expire_date] =
            fields.dates(REQUIRED_DATES)?;

        let activation_date = fields.truthy_date(ACTIVATION_DATE)?;

        let status_on = match fields.get(STATUS) {
            Some(status) => options.status_policy.resolve(status)?,
            None => false,
        };

        let pbs_profile = match fields.truthy_object(PBS_PROFILE)? {
            Some(profile) => Some(PbsProfile::from_value_with(profile, options)?),
            None => None,
        };

        Ok(Self {
            first_name: fields.string(FIRST_NAME)?,
            last_name: fields.string(LAST_NAME)?,
            membership_id: fields.string(MEMBERSHIP_ID)?,
            token: fields.string(TOKEN)?,
            offer: fields.optional_string(OFFER)?,
            grace_period,
            update_date,
            create_date,
            start_date,
            expire_date,
            activation_date,
            status_on,
            provisional: fields.boolean(PROVISIONAL)?,
            notes: fields.optional_string(NOTES)?,
            email: fields.optional_string(EMAIL)?,
            additional_metadata: fields.optional_string(ADDITIONAL_METADATA)?,
            pbs_profile,
        })
    }

    fn to_value(&self) -> Value {
        let status = if self.status_on { STATUS_ON } else { STATUS_OFF };
        let mut map = Map::new();
        map.insert(GRACE_PERIOD.to_string(), json!(format_date(self.grace_period)));
        map.insert(UPDATE_DATE.to_string(), json!(format_date(self.update_date)));
        map.insert(FIRST_NAME.to_string(), json!(self.first_name));
        map.insert(LAST_NAME.to_string(), json!(self.last_name));
        map.insert(CREATE_DATE.to_string(), json!(format_date(self.create_date)));
        map.insert(OFFER.to_string(), json!(self.offer));
        map.insert(MEMBERSHIP_ID.to_string(), json!(self.membership_id));
        map.insert(START_DATE.to_string(), json!(format_date(self.start_date)));
        map.insert(STATUS.to_string(), json!(status));
        map.insert(TOKEN.to_string(), json!(self.token));
        map.insert(PROVISIONAL.to_string(), json!(self.provisional));
        map.insert(EXPIRE_DATE.to_string(), json!(format_date(self.expire_date)));
        map.insert(
            ACTIVATION_DATE.to_string(),
            json!(self.activation_date.map(format_date)),
        );
        map.insert(EMAIL.to_string(), json!(self.email));
        map.insert(NOTES.to_string(), json!(self.notes));
        map.insert(
            ADDITIONAL_METADATA.to_string(),
            json!(self.additional_metadata),
        );
        map.insert(
            PBS_PROFILE.to_string(),
            self.pbs_profile
                .as_ref()
                .map_or(Value::Null, PbsProfile::to_value),
        );
        Value::Object(map)
    }
}

impl Serialize for MVaultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MVaultRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
