use crate::error::{Error, Result};

/// メトリックIDの区切り文字のデフォルト値です。
pub const DEFAULT_SEPARATORS: &[char] = &['.', '/'];

/// 区切り文字で分割したメトリックIDです。
///
/// 最後のセグメントがリーフのラベル、それ以外のセグメントがルートから順にたどる内部ノードのラベルです。
/// セグメントは1つ以上存在し、空のセグメントは含みません。
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MetricPath {
    segments: Vec<String>,
}

impl MetricPath {
    /// デフォルトの区切り文字でメトリックIDを分割します。
    pub fn parse(identifier: &str) -> Result<Self> {
        Self::parse_with(identifier, DEFAULT_SEPARATORS)
    }

    /// 指定した区切り文字でメトリックIDを分割します。
    pub fn parse_with(identifier: &str, separators: &[char]) -> Result<Self> {
        if identifier.is_empty() {
            return Err(Error::invalid_path("empty identifier"));
        }
        let segments: Vec<String> = identifier.split(separators).map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::invalid_path(format!(
                "empty segment in `{}`",
                identifier
            )));
        }
        Ok(Self { segments })
    }

    /// 先頭にセグメントを1つ追加したパスを返します。
    pub fn with_prefix<T: Into<String>>(&self, segment: T) -> Result<Self> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(Error::invalid_path(format!("empty prefix for `{}`", self)));
        }
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(segment);
        segments.extend(self.segments.iter().cloned());
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// 内部ノードのラベル列です。
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// リーフのラベルです。
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    pub(crate) fn prefix_string(&self, len: usize) -> String {
        self.segments[..len].join(".")
    }
}

impl std::str::FromStr for MetricPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for MetricPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
