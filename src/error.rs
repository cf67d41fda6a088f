use std::borrow::Cow;

use thiserror::Error;

/// メトリックビューアのエラー型
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// 無効なメトリックID
    ///
    /// 空文字列や、空のセグメントを含むメトリックIDが指定された場合に発生します。
    /// ツリーは変更されません。
    #[error("invalid path: {0}")]
    InvalidPath(Cow<'static, str>),

    /// ノード種別の衝突
    ///
    /// 既存のパスをたどる途中で、内部ノードが必要な位置にリーフが存在する場合、
    /// またはリーフが必要な位置に内部ノードが存在する場合に発生します。
    /// ツリーは変更されません。
    #[error("path conflict at `{path}`, existing node is {existing}")]
    PathConflict {
        /// 衝突が発生した位置までのパス
        path: String,
        /// 既存ノードの種別
        existing: crate::tree::NodeKind,
    },

    /// ペイロードのデコードエラー
    #[error("{0}")]
    Encoding(#[from] crate::encoding::EncodingError),

    /// 描画先への書き込みエラー
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// メトリックビューアの結果型
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_path<T: Into<Cow<'static, str>>>(msg: T) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub(crate) fn path_conflict<T: Into<String>>(path: T, existing: crate::tree::NodeKind) -> Self {
        Self::PathConflict {
            path: path.into(),
            existing,
        }
    }

    /// ツリー操作に起因するエラーかどうかを返します。
    ///
    /// セッションはこれらのエラーを該当メトリックのみの失敗として扱います。
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::InvalidPath(..) | Error::PathConflict { .. })
    }
}
