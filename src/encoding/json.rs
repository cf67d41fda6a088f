//! JSON フォーマットのペイロードをデコードするモジュールです。
//!
//! メトリック値のリストは次の形式です。
//!
//! ```json
//! {"values": [{"metricId": "agent1.cpu.load", "value": {"type": "int64", "value": 42}}]}
//! ```
//!
//! 値の型は `int64`、`string`、`stringList` のいずれかです。それ以外の型、
//! または型と内容が一致しない値は [`MetricValue::Unhandled`] になります。

use serde::Deserialize;

use super::EncodingError;
use crate::message::{MetricInfo, MetricList, MetricValue, MetricValueEntry, MetricValueList};

#[derive(Deserialize)]
struct RawValueList {
    #[serde(default)]
    values: Vec<RawValueEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValueEntry {
    metric_id: String,
    #[serde(default)]
    value: Option<RawValue>,
}

#[derive(Deserialize)]
struct RawValue {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Deserialize)]
struct RawMetricList {
    #[serde(default)]
    metrics: Vec<RawMetricInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetricInfo {
    metric_id: String,
    #[serde(default)]
    description: String,
}

impl From<RawValue> for MetricValue {
    fn from(raw: RawValue) -> Self {
        let value = match raw.type_.as_str() {
            "int64" => raw.value.as_i64().map(MetricValue::Int64),
            "string" => raw
                .value
                .as_str()
                .map(|s| MetricValue::String(s.to_string())),
            "stringList" => raw.value.as_array().and_then(|values| {
                values
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .map(MetricValue::StringList)
            }),
            _ => None,
        };
        value.unwrap_or_else(|| {
            log::debug!("unhandled metric value type: {}", raw.type_);
            MetricValue::Unhandled
        })
    }
}

impl From<RawValueEntry> for MetricValueEntry {
    fn from(raw: RawValueEntry) -> Self {
        Self {
            metric_id: raw.metric_id,
            value: raw.value.map(MetricValue::from).unwrap_or_default(),
        }
    }
}

pub fn decode_value_list(bin: &[u8]) -> Result<MetricValueList, EncodingError> {
    let raw: RawValueList = serde_json::from_slice(bin).map_err(EncodingError::new)?;
    Ok(MetricValueList {
        values: raw.values.into_iter().map(Into::into).collect(),
    })
}

pub fn decode_metric_list(bin: &[u8]) -> Result<MetricList, EncodingError> {
    let raw: RawMetricList = serde_json::from_slice(bin).map_err(EncodingError::new)?;
    Ok(MetricList {
        metrics: raw
            .metrics
            .into_iter()
            .map(|m| MetricInfo {
                metric_id: m.metric_id,
                description: m.description,
            })
            .collect(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn value_list() {
        let bin = br#"{
            "values": [
                {"metricId": "agent1.cpu.load", "value": {"type": "int64", "value": 42}},
                {"metricId": "agent1.os.name", "value": {"type": "string", "value": "linux"}},
                {"metricId": "agent1.net.ifs", "value": {"type": "stringList", "value": ["eth0", "lo"]}}
            ]
        }"#;
        let list = decode_value_list(bin).unwrap();
        assert_eq!(
            list.values,
            vec![
                MetricValueEntry::new("agent1.cpu.load", 42i64),
                MetricValueEntry::new("agent1.os.name", "linux"),
                MetricValueEntry::new(
                    "agent1.net.ifs",
                    vec!["eth0".to_string(), "lo".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn unhandled_values() {
        let bin = br#"{
            "values": [
                {"metricId": "a", "value": {"type": "double", "value": 0.5}},
                {"metricId": "b", "value": {"type": "int64", "value": "42"}},
                {"metricId": "c", "value": {"type": "stringList", "value": ["x", 1]}},
                {"metricId": "d"}
            ]
        }"#;
        let list = decode_value_list(bin).unwrap();
        assert_eq!(list.values.len(), 4);
        assert!(list
            .values
            .iter()
            .all(|entry| entry.value == MetricValue::Unhandled));
    }

    #[test]
    fn malformed() {
        assert!(decode_value_list(b"not json").is_err());
        assert!(decode_value_list(br#"{"values": [{"value": {}}]}"#).is_err());
    }

    #[test]
    fn metric_list() {
        let bin = br#"{"metrics": [{"metricId": "cpu.load", "description": "load average"}, {"metricId": "mem.used"}]}"#;
        let list = decode_metric_list(bin).unwrap();
        assert_eq!(
            list.metrics,
            vec![
                MetricInfo {
                    metric_id: "cpu.load".to_string(),
                    description: "load average".to_string(),
                },
                MetricInfo {
                    metric_id: "mem.used".to_string(),
                    description: String::new(),
                },
            ]
        );
    }
}
