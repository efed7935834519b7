//! Payloads exchanged with the analytics endpoints and their display forms

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Chart endpoint response: `{ data: [{dt, bm, ac}], updateTime? }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartPayload {
    #[serde(default)]
    pub data: Vec<RawChartRecord>,
    #[serde(rename = "updateTime", default, deserialize_with = "lenient_opt_string")]
    pub update_time: Option<String>,
}

/// One upstream chart row. Values are kept as raw JSON because the service
/// sends numbers and numeric strings interchangeably.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChartRecord {
    #[serde(default)]
    pub dt: Value,
    #[serde(default)]
    pub bm: Value,
    #[serde(default)]
    pub ac: Value,
}

/// Chart point ready for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub benchmark: f64,
    pub actual: f64,
}

/// Normalized result of one chart fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
    pub update_time: Option<String>,
    /// Numeric fields that failed to parse and were shown as zero
    pub coerced: usize,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Statistics table row. Values arrive display-ready; `bm == "-"` marks a
/// statistic with no benchmark counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ac: String,
    #[serde(deserialize_with = "lenient_string")]
    pub bm: String,
}

impl TableRow {
    pub fn new(id: &str, ac: &str, bm: &str) -> Self {
        Self {
            id: id.to_string(),
            ac: ac.to_string(),
            bm: bm.to_string(),
        }
    }

    /// True when the benchmark column carries the "not applicable" sentinel
    pub fn benchmark_not_applicable(&self) -> bool {
        self.bm == NOT_APPLICABLE
    }
}

pub const NOT_APPLICABLE: &str = "-";

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}
