use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use crate::message::MetricList;

/// エージェントごとに公開されているメトリックIDの一覧です。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MetricCatalog {
    agents: BTreeMap<String, BTreeSet<String>>,
}

impl MetricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// エージェントが公開しているメトリックを追加します。
    pub fn add(&mut self, agent: &str, list: MetricList) {
        let metrics = self.agents.entry(agent.to_string()).or_default();
        metrics.extend(list.metrics.into_iter().map(|m| m.metric_id));
    }

    pub fn agents(&self) -> impl Iterator<Item = &str> + '_ {
        self.agents.keys().map(String::as_str)
    }

    pub fn metrics(&self, agent: &str) -> impl Iterator<Item = &str> + '_ {
        self.agents
            .get(agent)
            .into_iter()
            .flat_map(|metrics| metrics.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// `agent:metricId` の形式で1行ずつ書き出します。
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (agent, metrics) in &self.agents {
            for metric_id in metrics {
                writeln!(writer, "{}:{}", agent, metric_id)?;
            }
        }
        Ok(())
    }

    pub fn write_agents_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for agent in self.agents.keys() {
            writeln!(writer, "{}", agent)?;
        }
        Ok(())
    }
}
