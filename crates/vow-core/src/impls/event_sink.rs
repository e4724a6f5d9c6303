//! EventSink の実装
//!
//! - **TracingEventSink**: tracing に出す（デフォルト）
//! - **RecordingEventSink**: メモリに溜める（テスト・埋め込み用）
//! - **NoopEventSink**: 何もしない

use std::cell::RefCell;

use crate::domain::events::PromiseEvent;
use crate::ports::EventSink;

/// Logs events through `tracing`. Unhandled rejections are warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: PromiseEvent) {
        match &event {
            PromiseEvent::UnhandledRejection { promise, reason, .. } => {
                tracing::warn!(promise = %promise, reason = %reason, "unhandled promise rejection");
            }
            PromiseEvent::Settled { promise, state, .. } => {
                tracing::trace!(promise = %promise, ?state, "promise settled");
            }
            PromiseEvent::Created { promise, .. } => {
                tracing::trace!(promise = %promise, "promise created");
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: RefCell<Vec<PromiseEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PromiseEvent> {
        self.events.borrow().clone()
    }

    pub fn unhandled_rejections(&self) -> Vec<PromiseEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_unhandled_rejection())
            .cloned()
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: PromiseEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: PromiseEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::PromiseId;
    use chrono::Utc;

    #[test]
    fn recording_sink_keeps_order_and_filters() {
        let sink = RecordingEventSink::new();
        let promise = PromiseId::from_u128(1);
        let at = Utc::now();

        sink.emit(PromiseEvent::Created { promise, at });
        sink.emit(PromiseEvent::UnhandledRejection {
            promise,
            reason: "boom".to_string(),
            at,
        });

        assert_eq!(sink.events().len(), 2);
        assert!(matches!(sink.events()[0], PromiseEvent::Created { .. }));
        assert_eq!(sink.unhandled_rejections().len(), 1);
    }
}
