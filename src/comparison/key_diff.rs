//! Top-level JSON key comparison with tolerance windows.
//!
//! Both backends stamp write timestamps and computed delays independently
//! while the two calls race, so values a second or two apart are skew, not
//! divergence.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::comparison::record::KeyDifferences;
use crate::config::ComparisonConfig;

/// Keys whose values differ between two JSON object bodies.
///
/// Returns `NotApplicable` unless both bodies parse as JSON objects. Keys are
/// reported in first-seen order: primary keys, then keys only the secondary
/// has.
pub fn different_keys(primary: &[u8], secondary: &[u8], settings: &ComparisonConfig) -> KeyDifferences {
    let (Some(left), Some(right)) = (parse_object(primary), parse_object(secondary)) else {
        return KeyDifferences::NotApplicable;
    };

    let keys = left
        .keys()
        .chain(right.keys().filter(|k| !left.contains_key(*k)))
        .filter(|key| {
            let a = left.get(*key).unwrap_or(&Value::Null);
            let b = right.get(*key).unwrap_or(&Value::Null);
            a != b && !within_tolerance(key, a, b, settings)
        })
        .cloned()
        .collect();

    KeyDifferences::Keys(keys)
}

fn parse_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn within_tolerance(key: &str, a: &Value, b: &Value, settings: &ComparisonConfig) -> bool {
    let tolerance = settings.tolerance_secs;

    if settings.timestamp_keys.iter().any(|k| k == key) {
        return timestamps_close_enough(a, b, tolerance);
    }
    if settings.delay_keys.iter().any(|k| k == key) {
        return integers_close_enough(a, b, tolerance);
    }
    false
}

/// Both values are RFC 3339 timestamps at most `tolerance` whole seconds apart.
pub fn timestamps_close_enough(a: &Value, b: &Value, tolerance: i64) -> bool {
    let parse = |v: &Value| v.as_str().and_then(|s| DateTime::parse_from_rfc3339(s).ok());
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => (a - b).num_seconds().abs() <= tolerance,
        _ => false,
    }
}

/// Both values are integers at most `tolerance` apart.
pub fn integers_close_enough(a: &Value, b: &Value, tolerance: i64) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => (i128::from(a) - i128::from(b)).abs() <= i128::from(tolerance),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(a: Value, b: Value, settings: &ComparisonConfig) -> KeyDifferences {
        different_keys(a.to_string().as_bytes(), b.to_string().as_bytes(), settings)
    }

    fn list(names: &[&str]) -> KeyDifferences {
        KeyDifferences::Keys(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_reports_keys_with_different_values() {
        let result = keys(
            json!({"a": "a", "b": "b", "c": ["c1", "c2"]}),
            json!({"a": "a", "b": "different b", "c": ["c1", "different c2"]}),
            &ComparisonConfig::default(),
        );
        assert_eq!(result, list(&["b", "c"]));
    }

    #[test]
    fn test_union_order_includes_one_sided_keys() {
        let result = keys(
            json!({"z": 1, "a": 1}),
            json!({"a": 1, "m": 2, "z": 1}),
            &ComparisonConfig::default(),
        );
        assert_eq!(result, list(&["m"]));

        let result = keys(json!({"z": 1, "y": 2}), json!({"x": 3}), &ComparisonConfig::default());
        assert_eq!(result, list(&["z", "y", "x"]));
    }

    #[test]
    fn test_updated_at_within_tolerance_is_ignored() {
        let result = keys(
            json!({"a": "a", "b": "b", "updated_at": "2023-06-01T08:00:01Z"}),
            json!({"a": "a", "b": "b", "updated_at": "2023-06-01T08:00:02Z"}),
            &ComparisonConfig::default(),
        );
        assert_eq!(result, list(&[]));
    }

    #[test]
    fn test_updated_at_beyond_tolerance_is_reported() {
        let settings = ComparisonConfig {
            tolerance_secs: 1,
            ..Default::default()
        };
        let result = keys(
            json!({"a": "a", "b": "b", "updated_at": "2023-06-01T08:00:01Z"}),
            json!({"a": "a", "b": "b", "updated_at": "2023-06-01T08:00:03Z"}),
            &settings,
        );
        assert_eq!(result, list(&["updated_at"]));
    }

    #[test]
    fn test_updated_at_and_other_key() {
        let result = keys(
            json!({"a": "a", "b": "b", "updated_at": "2023-06-01T08:00:01Z"}),
            json!({"a": "a", "b": "different b", "updated_at": "2023-06-01T08:00:05Z"}),
            &ComparisonConfig::default(),
        );
        assert_eq!(result, list(&["b", "updated_at"]));
    }

    #[test]
    fn test_malformed_timestamp_is_reported() {
        let result = keys(
            json!({"updated_at": "yesterday"}),
            json!({"updated_at": "2023-06-01T08:00:02Z"}),
            &ComparisonConfig::default(),
        );
        assert_eq!(result, list(&["updated_at"]));
    }

    #[test]
    fn test_delay_tolerance() {
        let settings = ComparisonConfig::default();
        assert_eq!(
            keys(json!({"delay_in_seconds": 30}), json!({"delay_in_seconds": 32}), &settings),
            list(&[])
        );
        assert_eq!(
            keys(json!({"delay_in_seconds": 30}), json!({"delay_in_seconds": 33}), &settings),
            list(&["delay_in_seconds"])
        );
        assert_eq!(
            keys(json!({"delay_in_seconds": 30}), json!({"delay_in_seconds": "31"}), &settings),
            list(&["delay_in_seconds"])
        );
    }

    #[test]
    fn test_non_json_is_not_applicable() {
        let settings = ComparisonConfig::default();
        assert_eq!(
            different_keys(b"not json", b"not json either", &settings),
            KeyDifferences::NotApplicable
        );
        assert_eq!(
            different_keys(b"{}", b"<html></html>", &settings),
            KeyDifferences::NotApplicable
        );
        assert_eq!(different_keys(b"[1]", b"[2]", &settings), KeyDifferences::NotApplicable);
    }

    #[test]
    fn test_close_enough_helpers() {
        assert!(timestamps_close_enough(
            &json!("2023-06-01T08:00:02Z"),
            &json!("2023-06-01T09:00:00+01:00"),
            2
        ));
        assert!(!timestamps_close_enough(&json!(null), &json!("2023-06-01T08:00:02Z"), 2));
        assert!(integers_close_enough(&json!(i64::MIN), &json!(i64::MIN + 1), 2));
        assert!(!integers_close_enough(&json!(1.5), &json!(1), 2));
    }
}
