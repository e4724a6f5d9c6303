//! Runtime - promise が共有する実行環境
//!
//! 1 つの Runtime から作られた promise は、同じ Scheduler・EventSink・設定を使います。
//! derived promise は元の promise の Runtime を引き継ぎます。

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use super::builder::RuntimeBuilder;
use super::config::RuntimeConfig;
use crate::domain::events::PromiseEvent;
use crate::domain::ids::{PromiseId, ReactionId};
use crate::impls::{ManualScheduler, SchedulerDriver, TokioScheduler};
use crate::ports::{Clock, EventSink, IdGenerator, Job, Scheduler};

/// Runtime は Scheduler などの ports を束ねたハンドル（clone は安価）
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

pub(crate) struct RuntimeInner {
    pub(crate) scheduler: Rc<dyn Scheduler>,
    pub(crate) sink: Rc<dyn EventSink>,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) ids: Box<dyn IdGenerator>,
    pub(crate) config: RuntimeConfig,
}

impl Runtime {
    pub(crate) fn from_inner(inner: RuntimeInner) -> Self {
        Self {
            inner: Rc::new(inner),
        }
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Runtime backed by a [`ManualScheduler`]; nothing runs until the caller flushes it.
    pub fn manual() -> (Runtime, Rc<ManualScheduler>) {
        let scheduler = Rc::new(ManualScheduler::new());
        let runtime = RuntimeBuilder::new().assemble(Rc::clone(&scheduler) as Rc<dyn Scheduler>);
        (runtime, scheduler)
    }

    /// Runtime backed by a [`TokioScheduler`]. The driver must be polled
    /// (usually `tokio::task::spawn_local(driver.run())`).
    pub fn tokio() -> (Runtime, SchedulerDriver) {
        let (scheduler, driver) = TokioScheduler::new();
        let runtime = RuntimeBuilder::new().assemble(Rc::new(scheduler));
        (runtime, driver)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Hand a job to the scheduler. A refused job is logged and dropped.
    pub(crate) fn schedule(&self, job: Job) -> bool {
        match self.inner.scheduler.schedule(job) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to schedule promise job");
                false
            }
        }
    }

    pub(crate) fn emit(&self, event: PromiseEvent) {
        self.inner.sink.emit(event);
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    pub(crate) fn next_promise_id(&self) -> PromiseId {
        self.inner.ids.generate_promise_id()
    }

    pub(crate) fn next_reaction_id(&self) -> ReactionId {
        self.inner.ids.generate_reaction_id()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn manual_runtime_defers_jobs() {
        let (runtime, scheduler) = Runtime::manual();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);

        assert!(runtime.schedule(Box::new(move || *flag.borrow_mut() = true)));
        assert!(!*ran.borrow());

        scheduler.run_until_idle();
        assert!(*ran.borrow());
    }

    #[test]
    fn schedule_reports_closed_scheduler() {
        let (runtime, driver) = Runtime::tokio();
        drop(driver);
        assert!(!runtime.schedule(Box::new(|| {})));
    }
}
