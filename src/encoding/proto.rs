//! Protocol Buffers フォーマットのペイロードをデコードするモジュールです。
//!
//! ```proto
//! message MetricValueList { repeated MetricValueEntry values = 1; }
//! message MetricValueEntry {
//!   string metric_id = 1;
//!   oneof value {
//!     sint64 int64 = 2;
//!     string string = 3;
//!     StringList string_list = 4;
//!   }
//! }
//! message StringList { repeated string values = 1; }
//! message MetricList { repeated MetricInfo metrics = 1; }
//! message MetricInfo { string metric_id = 1; string description = 2; }
//! ```

use prost::Message as _;

use super::EncodingError;
use crate::message as msg;

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricValueList {
    #[prost(message, repeated, tag = "1")]
    pub values: Vec<MetricValueEntry>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricValueEntry {
    #[prost(string, tag = "1")]
    pub metric_id: String,
    #[prost(oneof = "metric_value_entry::Value", tags = "2, 3, 4")]
    pub value: Option<metric_value_entry::Value>,
}

pub mod metric_value_entry {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Value {
        #[prost(sint64, tag = "2")]
        Int64(i64),
        #[prost(string, tag = "3")]
        String(String),
        #[prost(message, tag = "4")]
        StringList(super::StringList),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StringList {
    #[prost(string, repeated, tag = "1")]
    pub values: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricList {
    #[prost(message, repeated, tag = "1")]
    pub metrics: Vec<MetricInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricInfo {
    #[prost(string, tag = "1")]
    pub metric_id: String,
    #[prost(string, tag = "2")]
    pub description: String,
}

impl From<MetricValueEntry> for msg::MetricValueEntry {
    fn from(entry: MetricValueEntry) -> Self {
        use metric_value_entry::Value;

        let value = match entry.value {
            Some(Value::Int64(v)) => msg::MetricValue::Int64(v),
            Some(Value::String(v)) => msg::MetricValue::String(v),
            Some(Value::StringList(list)) => msg::MetricValue::StringList(list.values),
            None => msg::MetricValue::Unhandled,
        };
        Self {
            metric_id: entry.metric_id,
            value,
        }
    }
}

impl From<msg::MetricValueEntry> for MetricValueEntry {
    fn from(entry: msg::MetricValueEntry) -> Self {
        use metric_value_entry::Value;

        let value = match entry.value {
            msg::MetricValue::Int64(v) => Some(Value::Int64(v)),
            msg::MetricValue::String(v) => Some(Value::String(v)),
            msg::MetricValue::StringList(values) => Some(Value::StringList(StringList { values })),
            msg::MetricValue::Unhandled => None,
        };
        Self {
            metric_id: entry.metric_id,
            value,
        }
    }
}

impl From<msg::MetricValueList> for MetricValueList {
    fn from(list: msg::MetricValueList) -> Self {
        Self {
            values: list.values.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<MetricInfo> for msg::MetricInfo {
    fn from(info: MetricInfo) -> Self {
        Self {
            metric_id: info.metric_id,
            description: info.description,
        }
    }
}

/// [`msg::MetricValueList`] をエンコードします。
pub fn encode_value_list(list: msg::MetricValueList) -> Vec<u8> {
    MetricValueList::from(list).encode_to_vec()
}

pub fn decode_value_list(bin: &[u8]) -> Result<msg::MetricValueList, EncodingError> {
    let list = MetricValueList::decode(bin).map_err(EncodingError::new)?;
    Ok(msg::MetricValueList {
        values: list.values.into_iter().map(Into::into).collect(),
    })
}

pub fn decode_metric_list(bin: &[u8]) -> Result<msg::MetricList, EncodingError> {
    let list = MetricList::decode(bin).map_err(EncodingError::new)?;
    Ok(msg::MetricList {
        metrics: list.metrics.into_iter().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod test {
    use prost::Message as _;

    use super::*;

    #[test]
    fn value_list() {
        let list = msg::MetricValueList {
            values: vec![
                msg::MetricValueEntry::new("agent1.cpu.temp", -3i64),
                msg::MetricValueEntry::new("agent1.os.name", "linux"),
                msg::MetricValueEntry::new("agent1.net.ifs", vec!["eth0".to_string()]),
                msg::MetricValueEntry::new("agent1.gpu.util", msg::MetricValue::Unhandled),
            ],
        };
        let bin = encode_value_list(list.clone());
        assert_eq!(decode_value_list(&bin).unwrap(), list);
    }

    #[test]
    fn metric_list() {
        let bin = MetricList {
            metrics: vec![MetricInfo {
                metric_id: "cpu.load".to_string(),
                description: "load average".to_string(),
            }],
        }
        .encode_to_vec();
        let list = decode_metric_list(&bin).unwrap();
        assert_eq!(list.metrics[0].metric_id, "cpu.load");
        assert_eq!(list.metrics[0].description, "load average");
    }

    #[test]
    fn malformed() {
        assert!(decode_value_list(&[0x0a, 0xff]).is_err());
    }
}
