//! ペイロードのエンコード定義

use crate::message::{MetricList, MetricValueList};

pub mod json;
pub mod proto;

/// ペイロードのエンコード形式です。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[non_exhaustive]
pub enum Encoding {
    /// JSON
    #[default]
    Json,
    /// Protocol Buffers
    Proto,
}

impl Encoding {
    /// ペイロードを [`MetricValueList`] としてデコードします。
    pub fn decode_value_list(&self, bin: &[u8]) -> Result<MetricValueList, EncodingError> {
        match self {
            Encoding::Json => json::decode_value_list(bin),
            Encoding::Proto => proto::decode_value_list(bin),
        }
    }

    /// ペイロードを [`MetricList`] としてデコードします。
    pub fn decode_metric_list(&self, bin: &[u8]) -> Result<MetricList, EncodingError> {
        match self {
            Encoding::Json => json::decode_metric_list(bin),
            Encoding::Proto => proto::decode_metric_list(bin),
        }
    }
}

impl std::str::FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Encoding::Json),
            "proto" | "protobuf" => Ok(Encoding::Proto),
            _ => Err(EncodingError::from_msg(format!("unknown encoding `{}`", s))),
        }
    }
}

/// Represent an error occured at decoding a payload.
pub struct EncodingError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::fmt::Debug for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EncodingError").field(&self.inner).finish()
    }
}

impl std::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "encoding error: {}", self.inner)
    }
}

impl std::error::Error for EncodingError {}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct EncodingErrorMessage(String);

impl EncodingError {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self {
            inner: Box::new(err),
        }
    }

    pub fn from_msg<T: std::fmt::Display>(msg: T) -> Self {
        Self {
            inner: Box::new(EncodingErrorMessage(msg.to_string())),
        }
    }
}
