//! メトリックIDから階層構造のラベルツリーを構築するモジュールです。
//!
//! `agent1.cpu.load` のような区切り文字付きのメトリックIDを、ルートから
//! `agent1` → `cpu` → `load` の順にたどるノードとして格納します。
//! 同じ階層の子ノードはラベルの辞書順に並びます。

use std::collections::{btree_map::Entry, BTreeMap};

use crate::error::{Error, Result};

mod path;
mod visitor;

pub use path::*;
pub use visitor::*;

/// ノードの種別です。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    Interior,
    Value,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Interior => write!(f, "interior node"),
            NodeKind::Value => write!(f, "value node"),
        }
    }
}

/// ツリーのノードです。
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Node {
    /// 名前空間を表す内部ノード
    Interior(InteriorNode),
    /// 値を保持するリーフ
    Value(ValueNode),
}

impl Node {
    pub fn label(&self) -> &str {
        match self {
            Node::Interior(n) => &n.label,
            Node::Value(n) => &n.label,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Interior(_) => NodeKind::Interior,
            Node::Value(_) => NodeKind::Value,
        }
    }
}

/// 子ノードを保持する内部ノードです。
///
/// 子ノードのラベルは互いに異なり、辞書順に並びます。
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct InteriorNode {
    label: String,
    children: BTreeMap<String, Node>,
}

impl InteriorNode {
    fn new(label: String) -> Self {
        Self {
            label,
            children: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// 子ノードをラベルの辞書順に返します。
    pub fn children(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children.values()
    }

    pub fn child(&self, label: &str) -> Option<&Node> {
        self.children.get(label)
    }
}

/// 値を保持するリーフです。
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ValueNode {
    label: String,
    value: String,
}

impl ValueNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 表示用に文字列化済みのメトリック値です。
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// メトリックIDをキーとするラベルツリーです。
///
/// ルートはラベルが空の内部ノードで、常に存在します。ノードの削除は行いません。
///
/// ```
/// use metricview::tree::MetricTree;
///
/// let mut tree = MetricTree::new();
/// tree.add("agent1.cpu.load", "0.42").unwrap();
/// tree.add("agent1.mem.used", "1024").unwrap();
///
/// let mut lines = Vec::new();
/// tree.traverse(&mut |v: metricview::tree::Visit<'_>| {
///     lines.push(format!("{}{}", "  ".repeat(v.depth), v.label));
/// });
/// assert_eq!(lines, ["agent1", "  cpu", "    load", "  mem", "    used"]);
/// ```
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct MetricTree {
    root: InteriorNode,
    leaves: usize,
}

impl MetricTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &InteriorNode {
        &self.root
    }

    /// リーフの数を返します。
    pub fn len(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    /// メトリックIDと値を追加します。
    ///
    /// 途中のノードが存在しない場合は作成し、リーフが既に存在する場合は値を上書きします。
    ///
    /// # Errors
    ///
    /// - メトリックIDが空、または空のセグメントを含む場合は [`Error::InvalidPath`]
    /// - 既存ノードと種別が衝突する場合は [`Error::PathConflict`]
    ///
    /// いずれの場合もツリーは変更されません。
    pub fn add<T: Into<String>>(&mut self, identifier: &str, value: T) -> Result<()> {
        let path = MetricPath::parse(identifier)?;
        self.add_path(&path, value)
    }

    /// 分割済みのパスと値を追加します。
    pub fn add_path<T: Into<String>>(&mut self, path: &MetricPath, value: T) -> Result<()> {
        self.check_conflict(path)?;

        let mut children = &mut self.root.children;
        for (i, label) in path.parents().iter().enumerate() {
            let node = children
                .entry(label.clone())
                .or_insert_with(|| Node::Interior(InteriorNode::new(label.clone())));
            children = match node {
                Node::Interior(interior) => &mut interior.children,
                Node::Value(_) => {
                    return Err(Error::path_conflict(
                        path.prefix_string(i + 1),
                        NodeKind::Value,
                    ))
                }
            };
        }

        let value = value.into();
        match children.entry(path.leaf().to_owned()) {
            Entry::Occupied(mut e) => match e.get_mut() {
                Node::Value(leaf) => leaf.value = value,
                Node::Interior(_) => {
                    return Err(Error::path_conflict(path.to_string(), NodeKind::Interior))
                }
            },
            Entry::Vacant(e) => {
                e.insert(Node::Value(ValueNode {
                    label: path.leaf().to_owned(),
                    value,
                }));
                self.leaves += 1;
            }
        }
        Ok(())
    }

    // Walks the existing prefix without mutating, so a conflict never leaves
    // freshly created interior nodes behind.
    fn check_conflict(&self, path: &MetricPath) -> Result<()> {
        let mut current = &self.root;
        for (i, label) in path.parents().iter().enumerate() {
            match current.children.get(label) {
                None => return Ok(()),
                Some(Node::Interior(interior)) => current = interior,
                Some(Node::Value(_)) => {
                    return Err(Error::path_conflict(
                        path.prefix_string(i + 1),
                        NodeKind::Value,
                    ))
                }
            }
        }
        match current.children.get(path.leaf()) {
            Some(Node::Interior(_)) => Err(Error::path_conflict(
                path.to_string(),
                NodeKind::Interior,
            )),
            _ => Ok(()),
        }
    }

    /// メトリックIDに対応するリーフの値を返します。
    pub fn get(&self, identifier: &str) -> Option<&str> {
        let path = MetricPath::parse(identifier).ok()?;
        self.get_path(&path)
    }

    pub fn get_path(&self, path: &MetricPath) -> Option<&str> {
        let mut current = &self.root;
        for label in path.parents() {
            match current.children.get(label)? {
                Node::Interior(interior) => current = interior,
                Node::Value(_) => return None,
            }
        }
        match current.children.get(path.leaf())? {
            Node::Value(leaf) => Some(&leaf.value),
            Node::Interior(_) => None,
        }
    }

    /// ルートの子から深さ優先・行きがけ順にツリーを走査します。
    ///
    /// 同じ階層の子ノードはラベルの辞書順に訪問されます。
    pub fn traverse<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        walk(&self.root, 0, visitor);
    }
}

fn walk<V: Visitor + ?Sized>(parent: &InteriorNode, depth: usize, visitor: &mut V) {
    for node in parent.children.values() {
        match node {
            Node::Value(leaf) => visitor.visit(Visit {
                depth,
                label: &leaf.label,
                value: Some(&leaf.value),
            }),
            Node::Interior(interior) => {
                visitor.visit(Visit {
                    depth,
                    label: &interior.label,
                    value: None,
                });
                walk(interior, depth + 1, visitor);
            }
        }
    }
}
