//! metricviewクレートは、エージェントから受信したメトリック値を階層構造のツリーとして表示するためのライブラリです。
//!
//! `agent1.cpu.load` のようなメトリックIDを区切り文字で分割し、ラベルの辞書順に並んだツリー[`tree::MetricTree`]を構築します。
//! [`viewer::MetricViewer`]はサンプルソースからメトリック値を読み出してツリーに追加し、インデント付きのテキストとして出力します。
//!
//! # Examples
//!
//! ## Build Metric Tree
//!
//! ```
//! let mut tree = metricview::MetricTree::new();
//! tree.add("agent1.cpu.load", "0.42").unwrap();
//! tree.add("agent1.cpu.temp", "55").unwrap();
//! tree.add("agent1.mem.used", "1024").unwrap();
//!
//! // 既存のリーフの下にはノードを追加できません。
//! assert!(tree.add("agent1.mem.used.peak", "2048").is_err());
//!
//! let mut out = Vec::new();
//! metricview::viewer::render_tree(&tree, &mut out, "  ").unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "agent1\n  cpu\n    load: 0.42\n    temp: 55\n  mem\n    used: 1024\n"
//! );
//! ```
//!
//! ## Start Viewer Session
//!
//! チャネルに書き込まれたJSONペイロードのサンプルを読み出し、ツリーとして出力するサンプルです。
//! 読み出しでサンプルが1件も得られなくなった時点でセッションは終了します。
//!
//! ```
//! use std::time::Duration;
//!
//! tokio_test_block_on(async {
//!     let (tx, source) = metricview::viewer::ChannelSource::channel(16);
//!     tx.send(metricview::msg::Sample::alive(
//!         "agent1",
//!         r#"{"values": [{"metricId": "cpu.load", "value": {"type": "int64", "value": 1}}]}"#,
//!     ))
//!     .await
//!     .unwrap();
//!     drop(tx);
//!
//!     let mut viewer = metricview::MetricViewer::builder(source)
//!         .read_timeout(Duration::from_millis(100))
//!         .prefix_flow_id(true)
//!         .build();
//!
//!     let mut out = Vec::new();
//!     viewer.run(&mut out).await.unwrap();
//!     assert_eq!(
//!         String::from_utf8(out).unwrap(),
//!         "agent1\n  cpu\n    load: 1\n"
//!     );
//! });
//!
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod encoding;
pub mod error;
pub mod message;
pub mod tree;
pub mod viewer;

pub use crate::encoding as enc;
pub use crate::error::*;
pub use crate::message as msg;
pub use crate::tree::{MetricPath, MetricTree};
pub use crate::viewer::MetricViewer;
