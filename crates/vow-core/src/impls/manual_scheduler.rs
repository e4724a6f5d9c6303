//! ManualScheduler - テスト用の決定的なスケジューラ
//!
//! # 学習ポイント
//! - VecDeque による FIFO
//! - RefCell の借用をジョブ実行の前に手放す（ジョブが再投入するため）

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::domain::errors::SchedulerError;
use crate::ports::{Job, Scheduler};

/// ManualScheduler は投入されたジョブを溜めておき、呼ばれたときだけ実行する
///
/// # 使用例
/// ```ignore
/// let scheduler = Rc::new(ManualScheduler::new());
/// let runtime = RuntimeBuilder::new().scheduler(scheduler.clone()).build()?;
/// // ... promise を操作 ...
/// scheduler.run_until_idle();
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<Job>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
        }
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run the oldest job. Returns `false` when the queue was empty.
    pub fn run_next(&self) -> bool {
        // borrow はここで終わる（job の中から schedule() されるため）
        let job = self.queue.borrow_mut().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs, including ones scheduled while running, until the queue is empty.
    ///
    /// Returns how many jobs ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, job: Job) -> Result<(), SchedulerError> {
        self.queue.borrow_mut().push_back(job);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn jobs_do_not_run_on_schedule() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);

        scheduler
            .schedule(Box::new(move || *flag.borrow_mut() = true))
            .unwrap();

        assert!(!*ran.borrow());
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.run_until_idle(), 1);
        assert!(*ran.borrow());
    }

    #[test]
    fn jobs_run_in_submission_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..5 {
            let log = Rc::clone(&log);
            scheduler
                .schedule(Box::new(move || log.borrow_mut().push(i)))
                .unwrap();
        }
        scheduler.run_until_idle();

        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn jobs_scheduled_from_jobs_run_later() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_scheduler = Rc::clone(&scheduler);
        let inner_log = Rc::clone(&log);
        scheduler
            .schedule(Box::new(move || {
                inner_log.borrow_mut().push("outer");
                let log = Rc::clone(&inner_log);
                inner_scheduler
                    .schedule(Box::new(move || log.borrow_mut().push("nested")))
                    .unwrap();
            }))
            .unwrap();
        let tail_log = Rc::clone(&log);
        scheduler
            .schedule(Box::new(move || tail_log.borrow_mut().push("second")))
            .unwrap();

        assert_eq!(scheduler.run_until_idle(), 3);
        assert_eq!(*log.borrow(), vec!["outer", "second", "nested"]);
    }

    #[test]
    fn run_next_on_empty_queue() {
        let scheduler = ManualScheduler::new();
        assert!(!scheduler.run_next());
        assert_eq!(scheduler.run_until_idle(), 0);
    }
}
