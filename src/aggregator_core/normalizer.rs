//! Event normalization from NDJSON records to the typed DeliveryEvent

use super::error::{AggregationError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Only events with this name count towards delivery time.
pub const DELIVERED_EVENT: &str = "translation_delivered";

/// Input timestamp layout, e.g. `2018-12-26 18:11:08.509654`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("event_name", "missing event_name"),
    ("duration", "missing duration"),
    ("timestamp", "missing timestamp"),
];

/// One line of the event log, kept as an untyped JSON object until it
/// crosses into the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEvent(Map<String, Value>);

impl RawEvent {
    /// Parse a RawEvent from a JSONL line. Anything but a JSON object is rejected.
    pub fn from_jsonl(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Parsed `timestamp` field.
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        match self.0.get("timestamp") {
            Some(Value::String(value)) => parse_timestamp(value),
            Some(other) => Err(AggregationError::MalformedTimestamp {
                value: other.to_string(),
            }),
            None => Err(AggregationError::MissingTimestamp {
                record: self.to_string(),
            }),
        }
    }

    fn str_field(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(Value::as_str).map(str::to_owned)
    }
}

impl From<Map<String, Value>> for RawEvent {
    fn from(map: Map<String, Value>) -> Self {
        RawEvent(map)
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Parse an input timestamp. The fractional seconds are mandatory.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let malformed = || AggregationError::MalformedTimestamp {
        value: value.to_string(),
    };

    // %.f alone would also accept a timestamp without fraction
    let has_fraction = value
        .split_once('.')
        .is_some_and(|(_, fraction)| {
            !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit())
        });
    if !has_fraction {
        return Err(malformed());
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| malformed())
}

/// Why `event` does not count as a delivery, if it doesn't.
fn integrity_failure(event: &RawEvent) -> Option<&'static str> {
    for (field, reason) in REQUIRED_FIELDS {
        if !event.contains_key(field) {
            return Some(reason);
        }
    }
    if event.get("event_name").and_then(Value::as_str) != Some(DELIVERED_EVENT) {
        return Some("event_name is not translation_delivered");
    }
    None
}

/// True when the record carries `event_name`, `duration` and `timestamp`
/// and is a `translation_delivered` event. Other fields are ignored.
pub fn validate(event: &RawEvent) -> bool {
    integrity_failure(event).is_none()
}

/// A validated delivery, the only shape the window aggregator works on.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEvent {
    pub timestamp: NaiveDateTime,
    /// Seconds.
    pub duration: f64,
    pub translation_id: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub client_name: Option<String>,
    pub nr_words: Option<u64>,
}

impl TryFrom<&RawEvent> for DeliveryEvent {
    type Error = AggregationError;

    fn try_from(raw: &RawEvent) -> Result<Self> {
        if let Some(reason) = integrity_failure(raw) {
            return Err(AggregationError::IntegrityViolation {
                record: raw.to_string(),
                reason,
            });
        }

        let duration = raw
            .get("duration")
            .and_then(Value::as_f64)
            .ok_or_else(|| AggregationError::IntegrityViolation {
                record: raw.to_string(),
                reason: "duration is not a number",
            })?;

        Ok(DeliveryEvent {
            timestamp: raw.timestamp()?,
            duration,
            translation_id: raw.str_field("translation_id"),
            source_language: raw.str_field("source_language"),
            target_language: raw.str_field("target_language"),
            client_name: raw.str_field("client_name"),
            nr_words: raw.get("nr_words").and_then(Value::as_u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const GOOD: &str = r#"{"timestamp": "2018-12-26 18:11:08.509654","translation_id": "5aa5b2f39f7254a75aa5","source_language": "en","target_language": "fr","client_name": "easyjet","event_name": "translation_delivered","nr_words": 30, "duration": 20}"#;

    fn without(field: &str) -> RawEvent {
        let mut map: Map<String, Value> = serde_json::from_str(GOOD).unwrap();
        map.remove(field);
        RawEvent::from(map)
    }

    #[test]
    fn test_validate_good_event() {
        let event = RawEvent::from_jsonl(GOOD).unwrap();
        assert!(validate(&event));
    }

    #[test]
    fn test_validate_missing_required_fields() {
        assert!(!validate(&without("event_name")));
        assert!(!validate(&without("duration")));
        assert!(!validate(&without("timestamp")));
    }

    #[test]
    fn test_validate_wrong_event_name() {
        let event = RawEvent::from_jsonl(&GOOD.replace("translation_delivered", "translation_failed"))
            .unwrap();
        assert!(!validate(&event));
    }

    #[test]
    fn test_validate_ignores_passenger_fields() {
        assert!(validate(&without("source_language")));
        assert!(validate(&without("client_name")));
        assert!(validate(&without("nr_words")));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2018-12-26 18:11:08.509654").unwrap();
        assert_eq!(ts.hour(), 18);
        assert_eq!(ts.minute(), 11);
        assert_eq!(ts.second(), 8);
        assert_eq!(ts.nanosecond(), 509_654_000);

        assert!(matches!(
            parse_timestamp("26/12/2018 18:11"),
            Err(AggregationError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_parse_timestamp_requires_fraction() {
        for value in [
            "2018-12-26 18:11:08",
            "2018-12-26 18:11:08.",
            "2018-12-26 18:11:08.5096x4",
        ] {
            assert!(
                matches!(
                    parse_timestamp(value),
                    Err(AggregationError::MalformedTimestamp { .. })
                ),
                "{value} should be rejected"
            );
        }

        let ts = parse_timestamp("2018-12-26 18:11:08.5").unwrap();
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_delivery_event_from_raw() {
        let raw = RawEvent::from_jsonl(GOOD).unwrap();
        let event = DeliveryEvent::try_from(&raw).unwrap();
        assert_eq!(event.duration, 20.0);
        assert_eq!(event.client_name.as_deref(), Some("easyjet"));
        assert_eq!(event.nr_words, Some(30));

        let event = DeliveryEvent::try_from(&without("source_language")).unwrap();
        assert_eq!(event.source_language, None);
    }

    #[test]
    fn test_delivery_event_rejects_invalid_records() {
        let err = DeliveryEvent::try_from(&without("duration")).unwrap_err();
        match err {
            AggregationError::IntegrityViolation { record, reason } => {
                assert!(record.contains("5aa5b2f39f7254a75aa5"));
                assert_eq!(reason, "missing duration");
            }
            other => panic!("unexpected error: {other}"),
        }

        let raw = RawEvent::from_jsonl(&GOOD.replace("\"duration\": 20", "\"duration\": \"20\""))
            .unwrap();
        assert!(matches!(
            DeliveryEvent::try_from(&raw),
            Err(AggregationError::IntegrityViolation { reason: "duration is not a number", .. })
        ));

        let raw = RawEvent::from_jsonl(&GOOD.replace("2018-12-26 18:11:08.509654", "yesterday"))
            .unwrap();
        assert!(matches!(
            DeliveryEvent::try_from(&raw),
            Err(AggregationError::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_malformed_jsonl() {
        assert!(RawEvent::from_jsonl(r#"{"invalid": "json"#).is_err());
        assert!(RawEvent::from_jsonl("[1, 2, 3]").is_err());
    }
}
