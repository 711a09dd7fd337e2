//! Purpose: Field-name tables for the three vault entities.
//! Exports: `record`, `profile`, `retrieval` submodules of constants.
//! Role: Single source for key names so validators and serializers agree.
//! Invariants: Names are exact and case-sensitive as sent by the vault API.
//! Invariants: Required lists are checked in declaration order (first miss wins).

pub mod record {
    pub const ENTITY: &str = "MVault record";

    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const CREATE_DATE: &str = "create_date";
    pub const GRACE_PERIOD: &str = "grace_period";
    pub const UPDATE_DATE: &str = "update_date";
    pub const OFFER: &str = "offer";
    pub const MEMBERSHIP_ID: &str = "membership_id";
    pub const START_DATE: &str = "start_date";
    pub const STATUS: &str = "status";
    pub const TOKEN: &str = "token";
    pub const PROVISIONAL: &str = "provisional";
    pub const EXPIRE_DATE: &str = "expire_date";
    pub const ACTIVATION_DATE: &str = "activation_date";
    pub const NOTES: &str = "notes";
    pub const EMAIL: &str = "email";
    pub const PBS_PROFILE: &str = "pbs_profile";
    pub const ADDITIONAL_METADATA: &str = "additional_metadata";

    pub const REQUIRED: [&str; 17] = [
        FIRST_NAME,
        LAST_NAME,
        CREATE_DATE,
        GRACE_PERIOD,
        UPDATE_DATE,
        OFFER,
        MEMBERSHIP_ID,
        START_DATE,
        STATUS,
        TOKEN,
        PROVISIONAL,
        EXPIRE_DATE,
        ACTIVATION_DATE,
        NOTES,
        EMAIL,
        PBS_PROFILE,
        ADDITIONAL_METADATA,
    ];

    pub const REQUIRED_DATES: [&str; 5] =
        [GRACE_PERIOD, UPDATE_DATE, CREATE_DATE, START_DATE, EXPIRE_DATE];

    pub const STATUS_ON: &str = "On";
    pub const STATUS_OFF: &str = "Off";
}

pub mod profile {
    pub const ENTITY: &str = "PBS profile";

    pub const RETRIEVAL_STATUS: &str = "retrieval_status";
    pub const UID: &str = "UID";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const LOGIN_PROVIDER: &str = "login_provider";

    pub const REQUIRED: [&str; 2] = [RETRIEVAL_STATUS, UID];

    /// Required only when the nested retrieval status reports success.
    pub const SUCCESS_REQUIRED: [&str; 4] = [FIRST_NAME, LAST_NAME, EMAIL, LOGIN_PROVIDER];
}

pub mod retrieval {
    pub const ENTITY: &str = "retrieval status";

    pub const STATUS: &str = "status";
    pub const MESSAGE: &str = "message";
    pub const UID: &str = "UID";

    pub const REQUIRED: [&str; 2] = [STATUS, MESSAGE];

    pub const STATUS_SUCCESS: i64 = 200;
    pub const STATUS_FAILURE: i64 = 500;
}
