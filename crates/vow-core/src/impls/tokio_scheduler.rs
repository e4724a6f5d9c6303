//! TokioScheduler - tokio 上でジョブを実行するスケジューラ
//!
//! # 学習ポイント
//! - mpsc チャネルで「投入」と「実行」を分離
//! - `!Send` なジョブは LocalSet（spawn_local）上の driver で実行
//!
//! # 使用例
//! ```ignore
//! let local = tokio::task::LocalSet::new();
//! local.run_until(async {
//!     let (scheduler, driver) = TokioScheduler::new();
//!     tokio::task::spawn_local(driver.run());
//!     // ...
//! }).await;
//! ```

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::errors::SchedulerError;
use crate::ports::{Job, Scheduler};

/// 投入側。Runtime が保持する
pub struct TokioScheduler {
    tx: UnboundedSender<Job>,
}

/// 実行側。1 ジョブずつ投入順に実行する
pub struct SchedulerDriver {
    rx: UnboundedReceiver<Job>,
}

impl TokioScheduler {
    pub fn new() -> (Self, SchedulerDriver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, SchedulerDriver { rx })
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, job: Job) -> Result<(), SchedulerError> {
        self.tx.send(job).map_err(|_| SchedulerError::Closed)
    }
}

impl SchedulerDriver {
    /// Run jobs until every `TokioScheduler` handle is dropped.
    ///
    /// Yields to the runtime between jobs so timers and other local tasks
    /// interleave with promise reactions.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            job();
            tokio::task::yield_now().await;
        }
        tracing::debug!("scheduler driver stopped: all senders dropped");
    }

    /// Run whatever is queued right now (and anything those jobs enqueue),
    /// without waiting. Returns how many jobs ran.
    pub fn drain_ready(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}
