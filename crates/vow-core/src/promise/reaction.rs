//! Reaction - `then` で登録されたハンドラと derived promise の組
//!
//! # 学習ポイント
//! - 登録時点で未決着なら保留、決着済みならすぐにジョブを予約
//! - 保留中の reaction だけを持ち、登録数はカウンタで数える

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::app::Runtime;
use crate::domain::errors::PromiseError;
use crate::domain::ids::ReactionId;
use crate::domain::state::{PromiseState, Settlement};

use super::resolution::resolve_with;
use super::{Promise, Value};

/// A fulfillment or rejection handler. `Err` means the handler threw.
pub struct Handler(Box<dyn FnOnce(Value) -> Result<Value, Value>>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        Self(Box::new(f))
    }

    fn call(self, value: Value) -> Result<Value, Value> {
        (self.0)(value)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// A registration still waiting for its source to settle.
pub(crate) struct Reaction {
    id: ReactionId,
    derived: Promise,
    on_fulfilled: Option<Handler>,
    on_rejected: Option<Handler>,
}

impl Reaction {
    pub(crate) fn new(
        id: ReactionId,
        derived: Promise,
        on_fulfilled: Option<Handler>,
        on_rejected: Option<Handler>,
    ) -> Self {
        Self {
            id,
            derived,
            on_fulfilled,
            on_rejected,
        }
    }

    /// Split into what the job for `state` needs.
    pub(crate) fn select(self, state: PromiseState) -> (ReactionId, Promise, Option<Handler>) {
        let handler = match state {
            PromiseState::Fulfilled => self.on_fulfilled,
            PromiseState::Rejected => self.on_rejected,
            PromiseState::Pending => None,
        };
        (self.id, self.derived, handler)
    }
}

/// Schedule the job that runs `handler` (or passes the settlement through)
/// and resolves `derived` with the outcome.
pub(crate) fn schedule_reaction(
    runtime: &Runtime,
    id: ReactionId,
    derived: Promise,
    handler: Option<Handler>,
    settlement: Settlement<Value>,
) {
    let catch_panics = runtime.config().catch_panics;
    runtime.schedule(Box::new(move || {
        tracing::trace!(reaction = %id, state = ?settlement.state(), "running reaction");
        let outcome = match handler {
            Some(handler) => run_guarded(catch_panics, move || handler.call(settlement.into_value())),
            None => settlement.into_result(),
        };
        match outcome {
            Ok(value) => resolve_with(&derived, value, 0),
            Err(reason) => {
                derived.settle(Settlement::Rejected(reason));
            }
        }
    }));
}

/// Run user code, turning a panic into a `Panicked` rejection reason.
pub(crate) fn run_guarded<T>(
    catch_panics: bool,
    f: impl FnOnce() -> Result<T, Value>,
) -> Result<T, Value> {
    if !catch_panics {
        return f();
    }
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(PromiseError::Panicked(panic_message(payload.as_ref())).into()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_guarded_passes_results_through() {
        assert_eq!(run_guarded(true, || Ok::<_, Value>(1)), Ok(1));
        assert_eq!(
            run_guarded::<i32>(true, || Err(Value::from("no"))),
            Err(Value::from("no"))
        );
    }

    #[test]
    fn run_guarded_catches_panics() {
        let result = run_guarded::<()>(true, || panic!("kaboom"));
        assert_eq!(
            result,
            Err(Value::Error(PromiseError::Panicked("kaboom".to_string())))
        );

        let formatted = run_guarded::<()>(true, || panic!("code {}", 7));
        assert_eq!(
            formatted,
            Err(Value::Error(PromiseError::Panicked("code 7".to_string())))
        );
    }

    #[test]
    fn select_picks_matching_handler() {
        let (runtime, _scheduler) = Runtime::manual();
        let derived = Promise::pending(&runtime);
        let reaction = Reaction::new(
            runtime.next_reaction_id(),
            derived.clone(),
            None,
            Some(Handler::new(Ok)),
        );

        let (_, target, handler) = reaction.select(PromiseState::Rejected);
        assert!(handler.is_some());
        assert!(target.ptr_eq(&derived));
    }

    #[test]
    fn select_without_matching_handler_passes_through() {
        let (runtime, _scheduler) = Runtime::manual();
        let reaction = Reaction::new(
            runtime.next_reaction_id(),
            Promise::pending(&runtime),
            None,
            Some(Handler::new(Ok)),
        );

        let (_, _, handler) = reaction.select(PromiseState::Fulfilled);
        assert!(handler.is_none());
    }
}
