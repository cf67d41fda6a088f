/// ツリー走査で訪問したノードの情報です。
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Visit<'a> {
    /// ルートからの深さ。ルートの子が0です。
    pub depth: usize,
    /// ノードのラベル
    pub label: &'a str,
    /// リーフの値。内部ノードの場合は`None`です。
    pub value: Option<&'a str>,
}

impl Visit<'_> {
    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }
}

/// ツリー走査のコールバックのインターフェースです。
///
/// ノードは深さ優先・行きがけ順、同じ階層ではラベルの辞書順に渡されます。
pub trait Visitor {
    fn visit(&mut self, visit: Visit<'_>);
}

impl<F: FnMut(Visit<'_>)> Visitor for F {
    fn visit(&mut self, visit: Visit<'_>) {
        self(visit)
    }
}
