//! RuntimeBuilder - Runtime の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - trait object による ports の差し替え

use std::rc::Rc;

use super::config::RuntimeConfig;
use super::runtime::{Runtime, RuntimeInner};
use crate::impls::TracingEventSink;
use crate::ports::{Clock, EventSink, IdGenerator, Scheduler, SystemClock, UlidGenerator};

/// RuntimeBuilder は Runtime を構築
///
/// # 使用例
/// ```ignore
/// let scheduler = Rc::new(ManualScheduler::new());
/// let runtime = RuntimeBuilder::new()
///     .scheduler(scheduler.clone())
///     .event_sink(Rc::new(RecordingEventSink::new()))
///     .config(RuntimeConfig::default_v1())
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - Scheduler が未設定なら BuildError::MissingScheduler
/// - max_adoption_depth = Some(0) は BuildError::InvalidAdoptionDepth
pub struct RuntimeBuilder {
    scheduler: Option<Rc<dyn Scheduler>>,
    sink: Rc<dyn EventSink>,
    clock: Rc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    config: RuntimeConfig,
}

/// BuildError は Runtime 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no scheduler configured. Call .scheduler(..) before .build().")]
    MissingScheduler,

    #[error("max_adoption_depth must be at least 1 (use None to disable the guard)")]
    InvalidAdoptionDepth,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            scheduler: None,
            sink: Rc::new(TracingEventSink),
            clock: Rc::new(SystemClock),
            ids: Box::new(UlidGenerator::new(SystemClock)),
            config: RuntimeConfig::default_v1(),
        }
    }

    pub fn scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn event_sink(mut self, sink: Rc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Clock を設定（ID 生成の timestamp にも同じ Clock を使う）
    pub fn clock<C: Clock + Clone + 'static>(mut self, clock: C) -> Self {
        self.clock = Rc::new(clock.clone());
        self.ids = Box::new(UlidGenerator::new(clock));
        self
    }

    pub fn id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// RuntimeBuilder を検証して Runtime を生成
    pub fn build(mut self) -> Result<Runtime, BuildError> {
        if self.config.max_adoption_depth == Some(0) {
            return Err(BuildError::InvalidAdoptionDepth);
        }
        let scheduler = self.scheduler.take().ok_or(BuildError::MissingScheduler)?;
        Ok(self.assemble(scheduler))
    }

    /// Wire everything without validation. The default config is always valid.
    pub(crate) fn assemble(self, scheduler: Rc<dyn Scheduler>) -> Runtime {
        Runtime::from_inner(RuntimeInner {
            scheduler,
            sink: self.sink,
            clock: self.clock,
            ids: self.ids,
            config: self.config,
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ManualScheduler;

    #[test]
    fn test_build_success() {
        let runtime = RuntimeBuilder::new()
            .scheduler(Rc::new(ManualScheduler::new()))
            .build();
        assert!(runtime.is_ok());
    }

    #[test]
    fn test_build_missing_scheduler() {
        let runtime = RuntimeBuilder::new().build();
        assert!(matches!(runtime, Err(BuildError::MissingScheduler)));
    }

    #[test]
    fn test_build_rejects_zero_adoption_depth() {
        let config = RuntimeConfig {
            max_adoption_depth: Some(0),
            ..RuntimeConfig::default_v1()
        };
        let runtime = RuntimeBuilder::new()
            .scheduler(Rc::new(ManualScheduler::new()))
            .config(config)
            .build();
        assert!(matches!(runtime, Err(BuildError::InvalidAdoptionDepth)));
    }

    #[test]
    fn test_build_keeps_config() {
        let config = RuntimeConfig {
            catch_panics: false,
            ..RuntimeConfig::default_v1()
        };
        let runtime = RuntimeBuilder::new()
            .scheduler(Rc::new(ManualScheduler::new()))
            .config(config.clone())
            .build()
            .unwrap();
        assert_eq!(runtime.config(), &config);
    }
}
