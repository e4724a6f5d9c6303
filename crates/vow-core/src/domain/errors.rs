//! Errors - エラー型
//!
//! promise の世界では「エラー」はほとんどが rejection reason として
//! 値の通り道に合流します。ここではライブラリ自身が作る reason と、
//! 値の通り道に乗らない構成時・スケジューラのエラーを定義します。

use thiserror::Error;

/// Rejection reasons produced by the engine itself.
///
/// User code rejects with arbitrary `Value`s; these variants are what the
/// library puts in the rejection channel on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromiseError {
    #[error("TypeError: cannot resolve a promise with itself")]
    SelfResolution,

    #[error("TypeError: thenable adoption exceeded {max} nested levels")]
    AdoptionDepthExceeded { max: usize },

    #[error("panicked: {0}")]
    Panicked(String),

    /// A plain user error, the equivalent of `new Error(msg)`.
    #[error("Error: {0}")]
    Thrown(String),

    #[error("promise was dropped before it settled")]
    Abandoned,
}

impl PromiseError {
    pub fn thrown(message: impl Into<String>) -> Self {
        PromiseError::Thrown(message.into())
    }
}

/// SchedulerError はジョブ投入の失敗
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler is closed; job dropped")]
    Closed,
}
