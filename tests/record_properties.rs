//! Purpose: Property coverage for the record → profile → status pipeline.
//! Exports: Integration tests only (no runtime exports).
//! Role: Generate vault-shaped payloads and check validity, naming of failures, and round trips.
//! Invariants: Generated payloads mirror what the vault sends, extra keys included.
//! Notes: Scenario tests at the bottom pin the edge cases called out for activation.

use mvault::{ErrorKind, MVaultRecord, ParseOptions, PbsProfile, RetrievalStatus, VaultEntity};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

const RECORD_KEYS: [&str; 17] = [
    "first_name",
    "last_name",
    "create_date",
    "grace_period",
    "update_date",
    "offer",
    "membership_id",
    "start_date",
    "status",
    "token",
    "provisional",
    "expire_date",
    "activation_date",
    "notes",
    "email",
    "pbs_profile",
    "additional_metadata",
];

const RECORD_DATES: [&str; 5] = [
    "grace_period",
    "update_date",
    "create_date",
    "start_date",
    "expire_date",
];

// =============================================================================
// Strategies
// =============================================================================

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,12}"
}

fn arb_uuid() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}"
}

fn arb_email() -> impl Strategy<Value = String> {
    "[a-z]{1,8}@[a-z]{1,8}\\.(com|org|net)"
}

/// Canonical `YYYY-MM-DDThh:mm:ssZ` timestamps.
fn arb_date() -> impl Strategy<Value = String> {
    (1971i32..2037, 1u8..=12, 1u8..=28, 0u8..24, 0u8..60, 0u8..60).prop_map(
        |(year, month, day, hour, minute, second)| {
            format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
        },
    )
}

/// Same instants as `arb_date`, sometimes expressed with an offset and fraction.
fn arb_any_layout_date() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_date(),
        (arb_date(), 0u32..1000).prop_map(|(date, millis)| {
            date.replace('Z', &format!(".{millis:03}+00:00"))
        }),
    ]
}

fn arb_nullable(inner: impl Strategy<Value = String>) -> impl Strategy<Value = Value> {
    prop_oneof![
        inner.prop_map(Value::String),
        Just(Value::Null),
        Just(json!("")),
    ]
}

fn arb_success_status() -> impl Strategy<Value = Value> {
    arb_word().prop_map(|message| json!({"status": 200, "message": message}))
}

fn arb_failure_status() -> impl Strategy<Value = Value> {
    arb_word().prop_map(|message| json!({"status": 500, "message": message}))
}

/// PBS may send `null` for any identity field of a successful lookup.
fn arb_success_profile() -> impl Strategy<Value = Value> {
    (
        arb_nullable(arb_word()),
        arb_nullable(arb_word()),
        arb_uuid(),
        prop_oneof![arb_date().prop_map(Value::String), Just(Value::Null)],
        arb_email(),
        prop_oneof![Just("PBS"), Just("Google"), Just("Facebook")],
        arb_success_status(),
    )
        .prop_map(
            |(first_name, last_name, uid, birth_date, email, login_provider, status)| {
                json!({
                    "first_name": first_name,
                    "last_name": last_name,
                    "UID": uid,
                    "birth_date": birth_date,
                    "email": email,
                    "login_provider": login_provider,
                    "retrieval_status": status
                })
            },
        )
}

fn arb_failure_profile() -> impl Strategy<Value = Value> {
    (arb_uuid(), arb_failure_status())
        .prop_map(|(uid, status)| json!({"UID": uid, "retrieval_status": status}))
}

fn arb_profile() -> impl Strategy<Value = Value> {
    prop_oneof![arb_success_profile(), arb_failure_profile(), Just(Value::Null)]
}

fn arb_record() -> impl Strategy<Value = Value> {
    let names = (
        arb_word(),
        arb_word(),
        arb_word(),
        arb_word(),
        prop_oneof![arb_word().prop_map(Value::String), Just(Value::Null)],
    );
    let dates = (
        arb_any_layout_date(),
        arb_any_layout_date(),
        arb_any_layout_date(),
        arb_any_layout_date(),
        arb_any_layout_date(),
        prop_oneof![arb_date().prop_map(Value::String), Just(Value::Null)],
    );
    let rest = (
        prop_oneof![Just("On"), Just("Off")],
        any::<bool>(),
        arb_nullable(arb_word()),
        arb_nullable(arb_word()),
        prop_oneof![arb_email(), Just(String::new())],
        arb_profile(),
        any::<bool>(),
    );
    (names, dates, rest).prop_map(
        |(
            (first_name, last_name, membership_id, token, offer),
            (grace_period, update_date, create_date, start_date, expire_date, activation_date),
            (status, provisional, notes, additional_metadata, email, pbs_profile, has_access),
        )| {
            json!({
                "first_name": first_name,
                "last_name": last_name,
                "membership_id": membership_id,
                "token": token,
                "offer": offer,
                "grace_period": grace_period,
                "update_date": update_date,
                "create_date": create_date,
                "start_date": start_date,
                "expire_date": expire_date,
                "activation_date": activation_date,
                "status": status,
                "provisional": provisional,
                "notes": notes,
                "additional_metadata": additional_metadata,
                "email": email,
                "pbs_profile": pbs_profile,
                "current_state": {
                    "explanation": {"status": status, "timing": "now", "token_activated": has_access},
                    "has_access": has_access
                }
            })
        },
    )
}

fn set(mut value: Value, key: &str, replacement: Value) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.insert(key.to_string(), replacement);
    }
    value
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn generated_records_parse(sample in arb_record()) {
        let record = MVaultRecord::from_value(&sample);
        prop_assert!(record.is_ok(), "rejected {sample}: {:?}", record.err());
    }

    #[test]
    fn serialized_records_reparse_equal(sample in arb_record()) {
        let record = MVaultRecord::from_value(&sample).expect("valid sample");
        let text = record.to_json_string();
        let again = MVaultRecord::from_json(&text).expect("reparse");
        prop_assert_eq!(&record, &again);
        prop_assert_eq!(record.to_value(), again.to_value());
    }

    #[test]
    fn serialized_dates_are_canonical(sample in arb_record()) {
        let record = MVaultRecord::from_value(&sample).expect("valid sample");
        let out = record.to_value();
        for key in RECORD_DATES {
            let rendered = out[key].as_str().expect("date string");
            prop_assert_eq!(rendered.len(), 20);
            prop_assert!(rendered.ends_with('Z'));
            prop_assert!(mvault::parse_date(rendered).is_some());
        }
        prop_assert_eq!(
            mvault::parse_date(out["create_date"].as_str().unwrap_or_default()),
            Some(record.create_date())
        );
    }

    #[test]
    fn activation_tracks_profile_presence(sample in arb_record()) {
        let record = MVaultRecord::from_value(&sample).expect("valid sample");
        prop_assert_eq!(record.is_activated(), !sample["pbs_profile"].is_null());
    }

    #[test]
    fn any_missing_key_is_named(sample in arb_record(), key in prop::sample::select(RECORD_KEYS.to_vec())) {
        let mut sample = sample;
        sample.as_object_mut().expect("object").remove(key);
        let err = MVaultRecord::from_value(&sample).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MissingField);
        prop_assert_eq!(err.field(), Some(key));
    }

    #[test]
    fn any_bad_required_date_is_named(
        sample in arb_record(),
        key in prop::sample::select(RECORD_DATES.to_vec()),
        junk in "[a-z]{3,10}",
    ) {
        let sample = set(sample, key, Value::String(junk));
        let err = MVaultRecord::from_value(&sample).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidDate);
        prop_assert_eq!(err.field(), Some(key));
    }

    #[test]
    fn success_profiles_round_trip(sample in arb_success_profile()) {
        let profile = PbsProfile::from_value(&sample).expect("valid profile");
        prop_assert!(profile.is_success_profile());
        prop_assert!(profile.details().is_some());
        let again = PbsProfile::from_json(&profile.to_json_string()).expect("reparse");
        prop_assert_eq!(profile, again);
    }

    #[test]
    fn failure_profiles_need_no_identity(sample in arb_failure_profile()) {
        let profile = PbsProfile::from_value(&sample).expect("valid profile");
        prop_assert!(profile.details().is_none());
        let out = profile.to_value();
        for key in ["first_name", "last_name", "email", "login_provider"] {
            prop_assert!(out.get(key).is_none());
        }
        let again = PbsProfile::from_json(&profile.to_json_string()).expect("reparse");
        prop_assert_eq!(profile, again);
    }

    #[test]
    fn success_profile_missing_identity_fails(
        sample in arb_success_profile(),
        key in prop::sample::select(vec!["first_name", "last_name", "UID", "email", "login_provider"]),
    ) {
        let mut sample = sample;
        sample.as_object_mut().expect("object").remove(key);
        let record = set(base_record(), "pbs_profile", sample);
        let err = MVaultRecord::from_value(&record).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MissingField);
        prop_assert_eq!(err.field(), Some(key));
    }

    #[test]
    fn retrieval_statuses_round_trip(sample in prop_oneof![arb_success_status(), arb_failure_status().prop_map(|s| set(s, "UID", json!("u-1")))]) {
        let status = RetrievalStatus::from_value(&sample).expect("valid status");
        let again = RetrievalStatus::from_json(&status.to_json_string()).expect("reparse");
        prop_assert_eq!(status, again);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

fn base_record() -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "create_date": "2017-05-01T12:00:00Z",
        "grace_period": "2018-06-01T12:00:00Z",
        "update_date": "2017-05-02T12:00:00Z",
        "offer": null,
        "membership_id": "m-42",
        "start_date": "2017-05-01T12:00:00Z",
        "status": "On",
        "token": "t-42",
        "provisional": true,
        "expire_date": "2018-05-01T12:00:00Z",
        "activation_date": null,
        "notes": "",
        "email": "",
        "pbs_profile": null,
        "additional_metadata": null
    })
}

#[test]
fn status_on_with_null_activation_and_profile() {
    let record = MVaultRecord::from_value(&base_record()).expect("parse");
    assert!(record.is_status_on());
    assert!(!record.is_activated());
    assert_eq!(record.activation_date(), None);
}

#[test]
fn failed_lookup_profile_counts_as_activated() {
    let value = set(
        base_record(),
        "pbs_profile",
        json!({"retrieval_status": {"status": 500, "message": "error"}, "UID": "x"}),
    );
    let record = MVaultRecord::from_value(&value).expect("parse");
    assert!(record.is_status_on());
    assert!(record.is_activated());
    assert!(!record.pbs_profile().expect("profile").is_success_profile());

    let out = record.to_value();
    assert_eq!(out["pbs_profile"]["UID"], json!("x"));
    assert!(out["pbs_profile"].get("first_name").is_none());
}

#[test]
fn missing_membership_id_is_named() {
    let mut value = base_record();
    value
        .as_object_mut()
        .expect("object")
        .remove("membership_id");
    let err = MVaultRecord::from_value(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.field(), Some("membership_id"));
}

#[test]
fn malformed_text_is_distinct_from_validation_failure() {
    let err = MVaultRecord::from_json("{\"first_name\": ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn map_entry_point_matches_value_entry_point() {
    let value = base_record();
    let map: Map<String, Value> = value.as_object().cloned().expect("object");
    let from_map = MVaultRecord::from_map(&map).expect("map");
    let from_value = MVaultRecord::from_value(&value).expect("value");
    assert_eq!(from_map, from_value);
}

#[test]
fn strict_status_is_opt_in() {
    let value = set(base_record(), "status", json!("Suspended"));
    assert!(MVaultRecord::from_value(&value).is_ok());
    let err = MVaultRecord::from_value_with(&value, &ParseOptions::strict()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStatus);
}

#[test]
fn records_parse_in_parallel_without_coordination() {
    let payloads: Vec<Value> = (0..64)
        .map(|idx| set(base_record(), "membership_id", json!(format!("m-{idx}"))))
        .collect();
    let ids: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = payloads
            .chunks(16)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|payload| {
                            MVaultRecord::from_value(payload)
                                .expect("parse")
                                .membership_id()
                                .to_string()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("join"))
            .collect()
    });
    assert_eq!(ids.len(), 64);
    assert_eq!(ids[63], "m-63");
}
