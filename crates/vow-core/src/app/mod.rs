//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて promise が動く環境を組み立てます。
//!
//! # 主要コンポーネント
//! - **RuntimeBuilder**: Runtime の構築とワイヤリング
//! - **Runtime**: Scheduler / EventSink / Clock / 設定を束ねたハンドル
//! - **RuntimeConfig**: 未処理 rejection の報告方法などの設定

pub mod builder;
pub mod config;
pub mod runtime;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, RuntimeBuilder};
pub use self::config::{RuntimeConfig, UnhandledRejectionMode};
pub use self::runtime::Runtime;
