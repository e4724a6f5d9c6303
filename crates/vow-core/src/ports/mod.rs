//! Ports - 抽象化レイヤー
//!
//! promise エンジンが外部に依存する部分（遅延実行、時刻、ID、観測）を
//! trait として切り出します。テストでは決定的な実装に差し替えます。

pub mod scheduler;
pub mod thenable;
pub mod clock;
pub mod id_generator;
pub mod event_sink;

// 主要な trait を再エクスポート
pub use self::scheduler::{Job, Scheduler};
pub use self::thenable::Thenable;
pub use self::clock::{Clock, SystemClock, FixedClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::event_sink::EventSink;
