//! RuntimeConfig - ランタイムの設定
//!
//! serde で読み書きできるので、埋め込み側は JSON などから構成できます。

use serde::{Deserialize, Serialize};

/// 未処理 rejection をいつ報告するか
///
/// `Immediate` is the classic rule: report when the reaction queue is empty
/// at settlement time. The default `Deferred` relaxes it so that a handler
/// attached right after settlement (or an adopting promise) counts as observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnhandledRejectionMode {
    /// Re-check one scheduler turn after settlement; report only if still unobserved.
    #[default]
    Deferred,
    /// Report at settlement time if the reaction queue is empty.
    Immediate,
    Ignore,
}

/// Runtime configuration.
///
/// v1: Defaults are chosen so that ordinary `reject(..).catch(..)` chains stay quiet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub unhandled_rejections: UnhandledRejectionMode,

    /// Turn panics inside executors, handlers and `Thenable::then` into rejections.
    pub catch_panics: bool,

    /// Upper bound on nested thenable adoption. `None` disables the guard.
    pub max_adoption_depth: Option<usize>,
}

impl RuntimeConfig {
    /// Default configuration for v1.
    pub fn default_v1() -> Self {
        Self {
            unhandled_rejections: UnhandledRejectionMode::Deferred,
            catch_panics: true,
            max_adoption_depth: Some(4096),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}
