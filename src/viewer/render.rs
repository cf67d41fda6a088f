//! メトリックを出力するモジュールです。

use std::io::Write;

use crate::message::MetricValueEntry;
use crate::tree::{MetricTree, Visit, Visitor};

/// ツリーをインデント付きのテキストとして書き出すビジターです。
///
/// ノードごとに1行、深さに応じたインデントとラベルを出力し、リーフには `": "` に続けて値を出力します。
/// 書き込みエラーが発生した場合、以降の出力は行わず [`TreeRenderer::finish`] でエラーを返します。
pub struct TreeRenderer<'a, W> {
    writer: &'a mut W,
    indent: &'a str,
    result: std::io::Result<()>,
}

impl<'a, W: Write> TreeRenderer<'a, W> {
    pub fn new(writer: &'a mut W, indent: &'a str) -> Self {
        Self {
            writer,
            indent,
            result: Ok(()),
        }
    }

    pub fn finish(self) -> std::io::Result<()> {
        self.result
    }

    fn write_line(&mut self, visit: Visit<'_>) -> std::io::Result<()> {
        for _ in 0..visit.depth {
            self.writer.write_all(self.indent.as_bytes())?;
        }
        match visit.value {
            Some(value) => writeln!(self.writer, "{}: {}", visit.label, value),
            None => writeln!(self.writer, "{}", visit.label),
        }
    }
}

impl<W: Write> Visitor for TreeRenderer<'_, W> {
    fn visit(&mut self, visit: Visit<'_>) {
        if self.result.is_err() {
            return;
        }
        self.result = self.write_line(visit);
    }
}

/// ツリー全体を書き出します。
pub fn render_tree<W: Write>(tree: &MetricTree, writer: &mut W, indent: &str) -> std::io::Result<()> {
    let mut renderer = TreeRenderer::new(writer, indent);
    tree.traverse(&mut renderer);
    renderer.finish()
}

/// メトリックを `metric_id: value` の形式で1行ずつ書き出します。
pub fn render_flat<'a, W, I>(entries: I, writer: &mut W) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a MetricValueEntry>,
{
    for entry in entries {
        writeln!(writer, "{}: {}", entry.metric_id, entry.value)?;
    }
    Ok(())
}
