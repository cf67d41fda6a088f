use std::collections::BTreeSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::encoding::Encoding;
use crate::tree::DEFAULT_SEPARATORS;

/// メトリックの出力形式です。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum RenderMode {
    /// 読み出しサイクルごとにツリー全体をインデント付きで出力します。
    #[default]
    Tree,
    /// 受信したメトリックを `metric_id: value` の形式で1行ずつ出力します。
    Flat,
}

/// Viewer configuration.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ViewerConfig {
    /// Timeout of a single read from the sample source.
    pub read_timeout: Duration,
    /// Payload encoding.
    pub encoding: Encoding,
    /// Output format.
    pub render_mode: RenderMode,
    /// Indent string per tree depth.
    pub indent: String,
    /// Separators of metric ids.
    pub separators: Vec<char>,
    /// Prefix metric ids with the flow id of the sample.
    pub prefix_flow_id: bool,
    /// Flow ids of the agents to read from. `None` reads from every agent.
    pub agents: Option<BTreeSet<String>>,
    /// Token to stop the session.
    pub cancellation: CancellationToken,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(5000),
            encoding: Encoding::default(),
            render_mode: RenderMode::default(),
            indent: "  ".to_string(),
            separators: DEFAULT_SEPARATORS.to_vec(),
            prefix_flow_id: false,
            agents: None,
            cancellation: CancellationToken::new(),
        }
    }
}

impl ViewerConfig {
    /// 指定したフローのサンプルを読み出し対象とするかどうかを返します。
    pub fn accepts(&self, flow_id: &str) -> bool {
        self.agents
            .as_ref()
            .map_or(true, |agents| agents.contains(flow_id))
    }
}

/// Builder type for [super::MetricViewer].
pub struct ViewerBuilder<S> {
    pub(crate) source: S,
    pub(crate) config: ViewerConfig,
}

impl<S: super::SampleSource> ViewerBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: ViewerConfig::default(),
        }
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.config.read_timeout = read_timeout;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    pub fn render_mode(mut self, render_mode: RenderMode) -> Self {
        self.config.render_mode = render_mode;
        self
    }

    pub fn indent<T: Into<String>>(mut self, indent: T) -> Self {
        self.config.indent = indent.into();
        self
    }

    pub fn separators<T: Into<Vec<char>>>(mut self, separators: T) -> Self {
        self.config.separators = separators.into();
        self
    }

    pub fn prefix_flow_id(mut self, prefix_flow_id: bool) -> Self {
        self.config.prefix_flow_id = prefix_flow_id;
        self
    }

    /// 読み出し対象のエージェントを限定します。
    pub fn agents<I, T>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.config.agents = Some(agents.into_iter().map(Into::into).collect());
        self
    }

    pub fn cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.config.cancellation = cancellation;
        self
    }

    pub fn build(self) -> super::MetricViewer<S> {
        super::MetricViewer::new(self.source, self.config)
    }
}
