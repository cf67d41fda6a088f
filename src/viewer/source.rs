use std::future::Future;
use std::time::Duration;

use futures::{FutureExt, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::message::Sample;

/// 1回の読み出しで返すサンプル数のデフォルト上限です。
pub const DEFAULT_MAX_BATCH: usize = 1024;

/// サンプルの読み出し元のインターフェースです。
pub trait SampleSource: Send {
    /// サンプルをまとめて読み出します。
    ///
    /// `timeout` 以内にサンプルが届かなかった場合、またはソースが終了している場合は空のリストを返します。
    fn read(&mut self, timeout: Duration) -> impl Future<Output = Result<Vec<Sample>>> + Send;
}

/// tokio の mpsc チャネルから読み出すソースです。
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Sample>,
    max_batch: usize,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<Sample>) -> Self {
        Self {
            rx,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }

    /// 送信側とソースを生成します。
    pub fn channel(buffer: usize) -> (mpsc::Sender<Sample>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }

    pub fn max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }
}

impl SampleSource for ChannelSource {
    async fn read(&mut self, timeout: Duration) -> Result<Vec<Sample>> {
        let first = match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                log::debug!("sample channel closed");
                return Ok(Vec::new());
            }
            Err(_) => {
                log::trace!("no sample within {:?}", timeout);
                return Ok(Vec::new());
            }
        };

        let mut samples = vec![first];
        while samples.len() < self.max_batch {
            match self.rx.try_recv() {
                Ok(sample) => samples.push(sample),
                Err(_) => break,
            }
        }
        Ok(samples)
    }
}

/// 任意の [`Stream`] から読み出すソースです。
pub struct StreamSource<St> {
    stream: St,
    max_batch: usize,
}

impl<St> StreamSource<St>
where
    St: Stream<Item = Sample> + Unpin + Send,
{
    pub fn new(stream: St) -> Self {
        Self {
            stream,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }

    pub fn max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch.max(1);
        self
    }
}

impl<St> SampleSource for StreamSource<St>
where
    St: Stream<Item = Sample> + Unpin + Send,
{
    async fn read(&mut self, timeout: Duration) -> Result<Vec<Sample>> {
        let first = match tokio::time::timeout(timeout, self.stream.next()).await {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                log::debug!("sample stream finished");
                return Ok(Vec::new());
            }
            Err(_) => {
                log::trace!("no sample within {:?}", timeout);
                return Ok(Vec::new());
            }
        };

        let mut samples = vec![first];
        while samples.len() < self.max_batch {
            match self.stream.next().now_or_never() {
                Some(Some(sample)) => samples.push(sample),
                _ => break,
            }
        }
        Ok(samples)
    }
}
