//! Scheduler port - 遅延実行の抽象化
//!
//! Scheduler は「あとで実行する」ことだけを約束します。
//!
//! # 契約
//! - `schedule()` の中でジョブを実行してはいけない（必ず後のターン）
//! - 投入順に実行する（FIFO）
//!
//! # 実装
//! - **ManualScheduler**: テスト用、同期的に flush できる
//! - **TokioScheduler**: tokio の LocalSet 上で driver が実行

use crate::domain::errors::SchedulerError;

/// A deferred unit of work.
pub type Job = Box<dyn FnOnce() + 'static>;

/// Scheduler はジョブを後のターンで投入順に実行する
pub trait Scheduler {
    fn schedule(&self, job: Job) -> Result<(), SchedulerError>;
}
