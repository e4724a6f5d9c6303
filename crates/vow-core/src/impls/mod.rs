//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ManualScheduler**: テスト用、同期的に flush できるスケジューラ
//! - **TokioScheduler**: tokio LocalSet 上の driver で実行するスケジューラ
//! - **TracingEventSink / RecordingEventSink / NoopEventSink**: イベントの出力先

pub mod manual_scheduler;
pub mod tokio_scheduler;
pub mod event_sink;

// 主要な型を再エクスポート
pub use self::manual_scheduler::ManualScheduler;
pub use self::tokio_scheduler::{SchedulerDriver, TokioScheduler};
pub use self::event_sink::{NoopEventSink, RecordingEventSink, TracingEventSink};
