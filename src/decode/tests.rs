//! Tests for the response mapper

use super::fields::{self, parse_date};
use super::*;
use crate::error::Error;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use test_case::test_case;

#[derive(Debug, Deserialize, PartialEq)]
struct Sample {
    id: String,
    #[serde(default, deserialize_with = "fields::date_opt")]
    created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "fields::count")]
    size_bytes: u64,
    #[serde(default, deserialize_with = "fields::nullable_string")]
    description: String,
    #[serde(default, deserialize_with = "fields::float_opt")]
    mean: Option<f64>,
}

impl Record for Sample {
    const KIND: &'static str = "sample";
}

// ============================================================================
// Mapper
// ============================================================================

#[test]
fn test_decode_full_record() {
    let sample: Sample = decode(json!({
        "id": "abc",
        "created": "2021-03-04T05:06:07Z",
        "size_bytes": "2048",
        "description": null,
        "mean": 1.5
    }))
    .unwrap();

    assert_eq!(sample.id, "abc");
    assert_eq!(
        sample.created,
        Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
    );
    assert_eq!(sample.size_bytes, 2048);
    assert_eq!(sample.description, "");
    assert_eq!(sample.mean, Some(1.5));
}

#[test]
fn test_decode_defaults_for_absent_fields() {
    let sample: Sample = decode(json!({"id": "abc"})).unwrap();
    assert_eq!(sample.created, None);
    assert_eq!(sample.size_bytes, 0);
    assert_eq!(sample.description, "");
    assert_eq!(sample.mean, None);
}

#[test]
fn test_decode_missing_required_field() {
    let err = decode::<Sample>(json!({"created": null})).unwrap_err();
    match err {
        Error::MalformedResponse { record, message } => {
            assert_eq!(record, "sample");
            assert!(message.contains("id"), "{message}");
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[test]
fn test_decode_mistyped_field() {
    let err = decode::<Sample>(json!({"id": "a", "size_bytes": "lots"})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref record, .. } if record == "sample"));

    let err = decode::<Sample>(json!({"id": "a", "created": "yesterday"})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref message, .. } if message.contains("yesterday")));
}

#[test]
fn test_record_uses_given_kind() {
    let err = record::<Sample>("workspace", json!("not an object")).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref record, .. } if record == "workspace"));
}

#[test]
fn test_decode_list() {
    let samples: Vec<Sample> = decode_list(json!([{"id": "a"}, {"id": "b"}])).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].id, "b");

    let err = decode_list::<Sample>(json!([{"id": "a"}, {"name": "b"}])).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref message, .. } if message.starts_with("item 1")));

    let err = decode_list::<Sample>(json!({"id": "a"})).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { ref message, .. } if message.contains("an object")));
}

#[test]
fn test_id_field() {
    let body = json!({"source_id": "src-1", "task_id": 42, "empty": "", "bad": [1]});
    assert_eq!(id_field("source", &body, "source_id").unwrap(), "src-1");
    assert_eq!(id_field("task", &body, "task_id").unwrap(), "42");

    assert!(matches!(
        id_field("source", &body, "empty"),
        Err(Error::MalformedResponse { .. })
    ));
    assert!(matches!(
        id_field("source", &body, "bad"),
        Err(Error::MalformedResponse { .. })
    ));
    match id_field("workspace", &body, "workspace_id") {
        Err(Error::MalformedResponse { record, message }) => {
            assert_eq!(record, "workspace");
            assert!(message.contains("workspace_id"));
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

// ============================================================================
// Field helpers
// ============================================================================

#[test_case("2021-03-04T05:06:07Z" ; "rfc3339 utc")]
#[test_case("2021-03-04T07:06:07+02:00" ; "rfc3339 offset")]
#[test_case("2021-03-04T05:06:07" ; "naive with t")]
#[test_case("2021-03-04 05:06:07" ; "naive with space")]
#[test_case("2021-03-04T05:06:07.000" ; "naive with fraction")]
fn test_parse_date_layouts(input: &str) {
    assert_eq!(
        parse_date(input),
        Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
    );
}

#[test]
fn test_parse_plain_date() {
    assert_eq!(
        parse_date("2021-03-04"),
        Some(Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap())
    );
}

#[test]
fn test_parse_date_rejects_garbage() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("04/03/2021"), None);
    assert_eq!(parse_date("not a date"), None);
}

#[test]
fn test_count_accepts_integral_float() {
    let sample: Sample = decode(json!({"id": "a", "size_bytes": 12.0})).unwrap();
    assert_eq!(sample.size_bytes, 12);

    assert!(decode::<Sample>(json!({"id": "a", "size_bytes": -3})).is_err());
    assert!(decode::<Sample>(json!({"id": "a", "size_bytes": 1.5})).is_err());
}

#[test]
fn test_float_opt_accepts_strings() {
    let sample: Sample = decode(json!({"id": "a", "mean": "2.25"})).unwrap();
    assert_eq!(sample.mean, Some(2.25));

    let sample: Sample = decode(json!({"id": "a", "mean": ""})).unwrap();
    assert_eq!(sample.mean, None);
}
