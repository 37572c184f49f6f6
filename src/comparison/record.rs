//! Comparison record types and their log rendering.

use serde::{Serialize, Serializer};

/// Placeholder rendered for full-diff fields when the request was not sampled.
pub const NOT_SAMPLED: &str = "not sampled";
/// Placeholder rendered when the secondary produced no response.
pub const UNAVAILABLE: &str = "unavailable";
/// Sentinel for a sub-check that could not be applied to these bodies.
pub const NOT_APPLICABLE: &str = "N/A";

/// Cheap per-response statistics, always computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseStats {
    pub status: u16,
    pub body_size: usize,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Where two bodies first diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub position: usize,
    pub context_primary: String,
    pub context_secondary: String,
}

/// Outcome of the byte-level body comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstDifference {
    Identical,
    Differs(DiffResult),
    NotApplicable,
}

impl Serialize for FirstDifference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        match self {
            FirstDifference::Identical => serializer.serialize_map(Some(0))?.end(),
            FirstDifference::Differs(diff) => diff.serialize(serializer),
            FirstDifference::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// Outcome of the top-level JSON key comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDifferences {
    Keys(Vec<String>),
    NotApplicable,
}

impl KeyDifferences {
    /// True when nothing was reported, including when the check did not apply.
    pub fn is_clean(&self) -> bool {
        match self {
            KeyDifferences::Keys(keys) => keys.is_empty(),
            KeyDifferences::NotApplicable => true,
        }
    }
}

impl Serialize for KeyDifferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeyDifferences::Keys(keys) => keys.serialize(serializer),
            KeyDifferences::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// Structured comparison of one primary/secondary response pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub primary: ResponseStats,
    #[serde(serialize_with = "or_unavailable")]
    pub secondary: Option<ResponseStats>,
    pub sampled: bool,
    pub sample_percent: u8,
    pub random_draw: u8,
    #[serde(serialize_with = "or_not_sampled")]
    pub first_difference: Option<FirstDifference>,
    #[serde(serialize_with = "or_not_sampled")]
    pub different_keys: Option<KeyDifferences>,
    pub comparison_duration_seconds: f64,
}

fn or_not_sampled<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_str(NOT_SAMPLED),
    }
}

fn or_unavailable<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_str(UNAVAILABLE),
    }
}
