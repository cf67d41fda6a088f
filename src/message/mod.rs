//! メトリックのメッセージ型を定義するモジュールです。

use bytes::Bytes;

/// メトリックの値です。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub enum MetricValue {
    /// 整数値
    Int64(i64),
    /// 文字列
    String(String),
    /// 文字列のリスト
    StringList(Vec<String>),
    /// 表示に対応していない型の値
    #[default]
    Unhandled,
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Int64(v) => write!(f, "{}", v),
            MetricValue::String(v) => f.write_str(v),
            MetricValue::StringList(values) => f.write_str(&values.join(", ")),
            MetricValue::Unhandled => f.write_str("<unhandled type>"),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<String>> for MetricValue {
    fn from(v: Vec<String>) -> Self {
        Self::StringList(v)
    }
}

/// メトリックIDと値の組です。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MetricValueEntry {
    /// メトリックID
    pub metric_id: String,
    /// 値
    pub value: MetricValue,
}

impl MetricValueEntry {
    pub fn new<I: ToString, V: Into<MetricValue>>(metric_id: I, value: V) -> Self {
        Self {
            metric_id: metric_id.to_string(),
            value: value.into(),
        }
    }
}

/// エージェントが1回に送信するメトリック値のリストです。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MetricValueList {
    pub values: Vec<MetricValueEntry>,
}

/// エージェントが公開しているメトリックの情報です。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MetricInfo {
    /// メトリックID
    pub metric_id: String,
    /// 説明
    pub description: String,
}

/// エージェントが公開しているメトリックの一覧です。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MetricList {
    pub metrics: Vec<MetricInfo>,
}

/// サンプルを送信したフローの状態です。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum FlowState {
    /// 送信元が生存しています。
    #[default]
    Alive,
    /// 送信元との接続が切れています。
    Disconnected,
    /// 送信元が破棄されています。
    Purged,
}

impl FlowState {
    pub fn is_alive(&self) -> bool {
        matches!(self, FlowState::Alive)
    }
}

/// ソースから読み出した1件のサンプルです。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Sample {
    /// フローID。送信元エージェントのコンテキストIDです。
    pub flow_id: String,
    /// フローの状態
    pub flow_state: FlowState,
    /// エンコードされたペイロード
    pub payload: Bytes,
}

impl Sample {
    /// 生存状態のフローのサンプルを生成します。
    pub fn alive<I: ToString, P: Into<Bytes>>(flow_id: I, payload: P) -> Self {
        Self {
            flow_id: flow_id.to_string(),
            flow_state: FlowState::Alive,
            payload: payload.into(),
        }
    }
}
