//! メトリックビューアのセッションを提供するモジュールです。
//!
//! セッションはサンプルソースから読み出しサイクルを繰り返し、受信したメトリック値をツリーに追加して出力します。
//! 1回の読み出しでサンプルが1件も得られなかった時点でセッションは終了します。

use std::io::Write;

use crate::error::Result;
use crate::message::MetricValueEntry;
use crate::tree::{MetricPath, MetricTree};

mod catalog;
mod config;
mod render;
mod source;

pub use catalog::*;
pub use config::*;
pub use render::*;
pub use source::*;

/// 1回の読み出しサイクルの結果です。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct PollResult {
    /// 読み出したサンプル数
    pub samples: usize,
    /// ツリーに追加したメトリック
    pub entries: Vec<MetricValueEntry>,
    /// デコードしたすべてのメトリック
    ///
    /// ツリーに追加できなかったメトリックも含みます。
    pub decoded: Vec<MetricValueEntry>,
}

/// メトリックビューアのセッションです。
///
/// セッションはツリーを排他的に所有し、読み出しと出力は単一のループで直列に行います。
pub struct MetricViewer<S> {
    source: S,
    config: ViewerConfig,
    tree: MetricTree,
}

impl<S: SampleSource> MetricViewer<S> {
    pub fn new(source: S, config: ViewerConfig) -> Self {
        Self {
            source,
            config,
            tree: MetricTree::new(),
        }
    }

    pub fn builder(source: S) -> ViewerBuilder<S> {
        ViewerBuilder::new(source)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// これまでに受信したメトリックのツリーです。
    pub fn tree(&self) -> &MetricTree {
        &self.tree
    }

    pub fn into_tree(self) -> MetricTree {
        self.tree
    }

    /// サンプルを1回読み出し、メトリック値をツリーに追加します。
    ///
    /// 対象外のエージェントのサンプル、生存していないフローのサンプル、デコードできないペイロードは読み飛ばします。
    /// ツリーに追加できなかったメトリックはログに出力し、残りのメトリックの処理を続けます。
    /// この場合も [`PollResult::decoded`] には含まれます。
    pub async fn poll_once(&mut self) -> Result<PollResult> {
        let samples = self.source.read(self.config.read_timeout).await?;
        let mut result = PollResult {
            samples: samples.len(),
            ..Default::default()
        };

        for sample in samples {
            if !self.config.accepts(&sample.flow_id) {
                log::debug!("skip sample from unlisted agent {}", sample.flow_id);
                continue;
            }
            if !sample.flow_state.is_alive() {
                log::debug!(
                    "skip sample from {} in state {:?}",
                    sample.flow_id,
                    sample.flow_state
                );
                continue;
            }
            let list = match self.config.encoding.decode_value_list(&sample.payload) {
                Ok(list) => list,
                Err(e) => {
                    log::warn!("cannot decode metric values from {}: {}", sample.flow_id, e);
                    continue;
                }
            };
            for entry in list.values {
                match self.ingest(&sample.flow_id, &entry) {
                    Ok(()) => result.entries.push(entry.clone()),
                    Err(e) => log::warn!(
                        "skip metric `{}` from {}: {}",
                        entry.metric_id,
                        sample.flow_id,
                        e
                    ),
                }
                result.decoded.push(entry);
            }
        }

        log::trace!(
            "read {} samples, {} of {} metrics added",
            result.samples,
            result.entries.len(),
            result.decoded.len()
        );
        Ok(result)
    }

    fn ingest(&mut self, flow_id: &str, entry: &MetricValueEntry) -> Result<()> {
        let mut path = MetricPath::parse_with(&entry.metric_id, &self.config.separators)?;
        if self.config.prefix_flow_id {
            path = path.with_prefix(flow_id)?;
        }
        self.tree.add_path(&path, entry.value.to_string())
    }

    /// サンプルが得られなくなるまで読み出しサイクルを繰り返し、サイクルごとに出力します。
    ///
    /// キャンセルトークンが呼ばれた場合も終了します。
    pub async fn run<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        let ct = self.config.cancellation.clone();
        loop {
            let result = tokio::select! {
                result = self.poll_once() => result?,
                _ = ct.cancelled() => {
                    log::debug!("viewer session cancelled");
                    return Ok(());
                }
            };
            if result.samples == 0 {
                log::debug!("no samples, exit viewer session");
                return Ok(());
            }

            match self.config.render_mode {
                RenderMode::Tree => render_tree(&self.tree, writer, &self.config.indent)?,
                RenderMode::Flat => render_flat(&result.decoded, writer)?,
            }
            writer.flush()?;
        }
    }
}

/// サンプルが得られなくなるまで [`crate::message::MetricList`] を読み出し、エージェントごとのメトリック一覧を返します。
pub async fn list_metrics<S: SampleSource>(
    source: &mut S,
    config: &ViewerConfig,
) -> Result<MetricCatalog> {
    let mut catalog = MetricCatalog::new();
    loop {
        let samples = tokio::select! {
            result = source.read(config.read_timeout) => result?,
            _ = config.cancellation.cancelled() => break,
        };
        if samples.is_empty() {
            break;
        }
        for sample in samples {
            if !config.accepts(&sample.flow_id) {
                log::debug!("skip sample from unlisted agent {}", sample.flow_id);
                continue;
            }
            if !sample.flow_state.is_alive() {
                continue;
            }
            match config.encoding.decode_metric_list(&sample.payload) {
                Ok(list) => catalog.add(&sample.flow_id, list),
                Err(e) => log::warn!("cannot decode metric list from {}: {}", sample.flow_id, e),
            }
        }
    }
    Ok(catalog)
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::encoding::{proto, Encoding};
    use crate::message::{FlowState, MetricValueList, Sample};

    fn json_values(values: &[(&str, i64)]) -> String {
        let values: Vec<_> = values
            .iter()
            .map(|(id, v)| {
                serde_json::json!({"metricId": id, "value": {"type": "int64", "value": v}})
            })
            .collect();
        serde_json::json!({ "values": values }).to_string()
    }

    async fn source_with(samples: Vec<Sample>) -> ChannelSource {
        let (tx, source) = ChannelSource::channel(samples.len().max(1));
        for sample in samples {
            tx.send(sample).await.unwrap();
        }
        source
    }

    #[tokio::test]
    async fn run_tree() {
        let source = source_with(vec![
            Sample::alive("agent1", json_values(&[("agent1.mem.used", 1024)])),
            Sample::alive(
                "agent1",
                json_values(&[("agent1.cpu.temp", 55), ("agent1.cpu.load", 2)]),
            ),
        ])
        .await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .build();

        let mut out = Vec::new();
        viewer.run(&mut out).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "agent1\n  cpu\n    load: 2\n    temp: 55\n  mem\n    used: 1024\n"
        );
        assert_eq!(viewer.tree().len(), 3);
    }

    #[tokio::test]
    async fn run_flat() {
        let source = source_with(vec![Sample::alive(
            "agent1",
            json_values(&[("cpu.load", 3), ("mem.used", 10)]),
        )])
        .await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .render_mode(RenderMode::Flat)
            .build();

        let mut out = Vec::new();
        viewer.run(&mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "cpu.load: 3\nmem.used: 10\n");
    }

    #[tokio::test]
    async fn run_flat_keeps_rejected_metrics() {
        let source = source_with(vec![Sample::alive(
            "agent1",
            json_values(&[("a.b", 1), ("a.b.c", 2), ("x..y", 3)]),
        )])
        .await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .render_mode(RenderMode::Flat)
            .build();

        let mut out = Vec::new();
        viewer.run(&mut out).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a.b: 1\na.b.c: 2\nx..y: 3\n"
        );
        assert_eq!(viewer.tree().len(), 1);
    }

    #[tokio::test]
    async fn poll_skips_unlisted_agents() {
        let source = source_with(vec![
            Sample::alive("agent1", json_values(&[("cpu.load", 1)])),
            Sample::alive("agent2", json_values(&[("mem.used", 2)])),
        ])
        .await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .agents(["agent1"])
            .build();

        let result = viewer.poll_once().await.unwrap();
        assert_eq!(result.samples, 2);
        assert_eq!(result.decoded, vec![MetricValueEntry::new("cpu.load", 1i64)]);
        assert_eq!(viewer.tree().get("cpu.load"), Some("1"));
        assert_eq!(viewer.tree().get("mem.used"), None);
    }

    #[tokio::test]
    async fn poll_skips_bad_samples() {
        let source = source_with(vec![
            Sample {
                flow_id: "gone".to_string(),
                flow_state: FlowState::Disconnected,
                payload: json_values(&[("gone.cpu", 1)]).into(),
            },
            Sample::alive("agent1", "not json"),
            Sample::alive(
                "agent1",
                json_values(&[("a.b", 1), ("a.b.c", 2), ("x..y", 3), ("a.d", 4)]),
            ),
        ])
        .await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .build();

        let result = viewer.poll_once().await.unwrap();
        assert_eq!(result.samples, 3);
        assert_eq!(
            result.entries,
            vec![
                MetricValueEntry::new("a.b", 1i64),
                MetricValueEntry::new("a.d", 4i64),
            ]
        );
        assert_eq!(result.decoded.len(), 4);
        assert_eq!(viewer.tree().get("a.b"), Some("1"));
        assert_eq!(viewer.tree().get("gone.cpu"), None);
        assert_eq!(viewer.tree().len(), 2);
    }

    #[tokio::test]
    async fn prefix_flow_id_and_separators() {
        let source = source_with(vec![Sample::alive(
            "agent1",
            json_values(&[("cpu/load", 1)]),
        )])
        .await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .separators(vec!['/'])
            .prefix_flow_id(true)
            .build();

        viewer.poll_once().await.unwrap();
        let tree = viewer.into_tree();
        assert_eq!(tree.get("agent1.cpu.load"), Some("1"));
    }

    #[tokio::test]
    async fn proto_payload() {
        let payload = proto::encode_value_list(MetricValueList {
            values: vec![MetricValueEntry::new("net.ifs", vec!["eth0".to_string()])],
        });
        let source = source_with(vec![Sample::alive("agent1", payload)]).await;
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_millis(100))
            .encoding(Encoding::Proto)
            .indent("\t")
            .build();

        let mut out = Vec::new();
        viewer.run(&mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "net\n\tifs: eth0\n");
    }

    #[tokio::test]
    async fn run_cancelled() {
        let (_tx, source) = ChannelSource::channel(1);
        let ct = CancellationToken::new();
        let mut viewer = MetricViewer::builder(source)
            .read_timeout(Duration::from_secs(60))
            .cancellation(ct.clone())
            .build();
        ct.cancel();

        let mut out = Vec::new();
        tokio::time::timeout(Duration::from_secs(1), viewer.run(&mut out))
            .await
            .expect("not cancelled")
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn list_metrics_from_source() {
        let mut source = source_with(vec![
            Sample::alive(
                "agent2",
                r#"{"metrics": [{"metricId": "mem.used"}]}"#,
            ),
            Sample::alive(
                "agent1",
                r#"{"metrics": [{"metricId": "cpu.load"}]}"#,
            ),
            Sample::alive("agent3", "broken"),
        ])
        .await;
        let config = ViewerConfig {
            read_timeout: Duration::from_millis(100),
            ..Default::default()
        };

        let catalog = list_metrics(&mut source, &config).await.unwrap();
        let mut out = Vec::new();
        catalog.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "agent1:cpu.load\nagent2:mem.used\n"
        );
    }

    #[tokio::test]
    async fn list_metrics_of_listed_agents() {
        let mut source = source_with(vec![
            Sample::alive("agent2", r#"{"metrics": [{"metricId": "mem.used"}]}"#),
            Sample::alive("agent1", r#"{"metrics": [{"metricId": "cpu.load"}]}"#),
        ])
        .await;
        let config = ViewerConfig {
            read_timeout: Duration::from_millis(100),
            agents: Some(["agent2".to_string()].into_iter().collect()),
            ..Default::default()
        };

        let catalog = list_metrics(&mut source, &config).await.unwrap();
        assert_eq!(catalog.agents().collect::<Vec<_>>(), vec!["agent2"]);
    }
}
