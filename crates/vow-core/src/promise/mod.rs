//! Promise - 遅延値のハンドル
//!
//! # 学習ポイント
//! - `Rc<RefCell<..>>` による共有状態（シングルスレッド前提、`!Send`）
//! - 状態遷移は `StateRecord::settle`（純粋）、副作用はここで実行
//! - ハンドラは常に Scheduler 経由で、登録した関数の外で実行される
//!
//! # 使用例
//! ```ignore
//! let (runtime, scheduler) = Runtime::manual();
//! let p = Promise::resolve(&runtime, 1)
//!     .and_then(|v| Ok(Value::from(v.as_i64().unwrap_or(0) + 1)));
//! scheduler.run_until_idle();
//! assert_eq!(p.settlement(), Some(Ok(Value::from(2))));
//! ```

mod capability;
mod reaction;
mod resolution;
mod value;


use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tokio::sync::oneshot;

use crate::app::{Runtime, UnhandledRejectionMode};
use crate::domain::errors::PromiseError;
use crate::domain::events::PromiseEvent;
use crate::domain::ids::PromiseId;
use crate::domain::state::{PromiseState, Settlement, StateRecord, Transition};
use crate::ports::Thenable;

pub use self::capability::{Reject, Resolve};
pub use self::reaction::Handler;
pub use self::value::Value;

use self::capability::resolving_functions;
use self::reaction::{run_guarded, schedule_reaction, Reaction};

/// Promise は共有ハンドル（clone しても同じ promise を指す）
#[derive(Clone)]
pub struct Promise {
    inner: Rc<PromiseInner>,
}

struct PromiseInner {
    id: PromiseId,
    runtime: Runtime,
    record: RefCell<StateRecord<Value>>,
    /// Only reactions still waiting for settlement.
    reactions: RefCell<Vec<Reaction>>,
    registered: Cell<usize>,
    /// Another promise has committed to adopting this one.
    adopted: Cell<bool>,
}

impl Promise {
    /// Create a promise and run `executor` right away with its resolving functions.
    ///
    /// If the executor returns `Err` (or panics, when `catch_panics` is on)
    /// and has not resolved the promise yet, the promise is rejected with it.
    pub fn new<F>(runtime: &Runtime, executor: F) -> Self
    where
        F: FnOnce(Resolve, Reject) -> Result<(), Value>,
    {
        let promise = Self::pending(runtime);
        let (resolve, reject) = resolving_functions(&promise, 0);
        let on_throw = reject.clone();
        if let Err(reason) = run_guarded(runtime.config().catch_panics, move || {
            executor(resolve, reject)
        }) {
            on_throw.call(reason);
        }
        promise
    }

    /// A pending promise plus the functions that settle it.
    pub fn with_resolvers(runtime: &Runtime) -> (Self, Resolve, Reject) {
        let promise = Self::pending(runtime);
        let (resolve, reject) = resolving_functions(&promise, 0);
        (promise, resolve, reject)
    }

    /// A new promise resolved with `value`. Thenables (promises included) are adopted.
    pub fn resolve(runtime: &Runtime, value: impl Into<Value>) -> Self {
        let (promise, resolve, _) = Self::with_resolvers(runtime);
        resolve.call(value);
        promise
    }

    pub fn reject(runtime: &Runtime, reason: impl Into<Value>) -> Self {
        let (promise, _, reject) = Self::with_resolvers(runtime);
        reject.call(reason);
        promise
    }

    /// Register handlers and get the derived promise.
    ///
    /// A missing handler passes the settlement through unchanged.
    /// Handlers never run inside this call, even if `self` is already settled.
    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Promise {
        self.add_reaction(on_fulfilled, on_rejected)
    }

    pub fn and_then<F>(&self, f: F) -> Promise
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        self.add_reaction(Some(Handler::new(f)), None)
    }

    pub fn catch<F>(&self, f: F) -> Promise
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        self.add_reaction(None, Some(Handler::new(f)))
    }

    /// Wait for settlement from async code.
    ///
    /// Needs a running scheduler (see [`crate::impls::SchedulerDriver`]).
    /// If the reaction job is dropped before it runs, resolves to `Err(Abandoned)`.
    pub async fn wait(&self) -> Result<Value, Value> {
        let (tx, rx) = oneshot::channel();
        let on_fulfilled = Rc::new(RefCell::new(Some(tx)));
        let on_rejected = Rc::clone(&on_fulfilled);

        self.add_reaction(
            Some(Handler::new(move |value| {
                if let Some(tx) = on_fulfilled.borrow_mut().take() {
                    let _ = tx.send(Ok(value));
                }
                Ok(Value::Undefined)
            })),
            Some(Handler::new(move |reason| {
                if let Some(tx) = on_rejected.borrow_mut().take() {
                    let _ = tx.send(Err(reason));
                }
                Ok(Value::Undefined)
            })),
        );

        rx.await
            .unwrap_or_else(|_| Err(PromiseError::Abandoned.into()))
    }

    pub fn id(&self) -> PromiseId {
        self.inner.id
    }

    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    pub fn state(&self) -> PromiseState {
        self.inner.record.borrow().state()
    }

    /// `None` while pending, otherwise `Ok(value)` / `Err(reason)`.
    pub fn settlement(&self) -> Option<Result<Value, Value>> {
        self.inner
            .record
            .borrow()
            .settlement()
            .cloned()
            .map(Settlement::into_result)
    }

    /// How many `then` registrations this promise has seen, dispatched or not.
    pub fn reaction_count(&self) -> usize {
        self.inner.registered.get()
    }

    /// Same promise (not merely same state)?
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn pending(runtime: &Runtime) -> Self {
        let id = runtime.next_promise_id();
        let promise = Self {
            inner: Rc::new(PromiseInner {
                id,
                runtime: runtime.clone(),
                record: RefCell::new(StateRecord::Pending),
                reactions: RefCell::new(Vec::new()),
                registered: Cell::new(0),
                adopted: Cell::new(false),
            }),
        };
        runtime.emit(PromiseEvent::Created {
            promise: id,
            at: runtime.now(),
        });
        promise
    }

    fn add_reaction(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Promise {
        let runtime = &self.inner.runtime;
        let derived = Promise::pending(runtime);
        let id = runtime.next_reaction_id();
        self.inner.registered.set(self.inner.registered.get() + 1);

        let settled = self.inner.record.borrow().settlement().cloned();
        match settled {
            None => {
                self.inner.reactions.borrow_mut().push(Reaction::new(
                    id,
                    derived.clone(),
                    on_fulfilled,
                    on_rejected,
                ));
            }
            Some(settlement) => {
                match (settlement, on_fulfilled, on_rejected) {
                    // nothing to run: propagate the rejection right away
                    (Settlement::Rejected(reason), _, None) => {
                        derived.settle(Settlement::Rejected(reason));
                    }
                    (settlement @ Settlement::Rejected(_), _, handler @ Some(_))
                    | (settlement @ Settlement::Fulfilled(_), handler, _) => {
                        schedule_reaction(runtime, id, derived.clone(), handler, settlement);
                    }
                }
            }
        }
        derived
    }

    /// Apply a settlement. Returns `false` if the promise was already settled.
    pub(crate) fn settle(&self, settlement: Settlement<Value>) -> bool {
        let state = settlement.state();
        let kept = settlement.clone();

        {
            let mut record = self.inner.record.borrow_mut();
            let transition = std::mem::take(&mut *record).settle(settlement);
            if let Transition::Ignored { current, .. } = &transition {
                tracing::debug!(
                    promise = %self.inner.id,
                    current = ?current.state(),
                    attempted = ?state,
                    "settlement ignored"
                );
            }
            let applied = transition.is_applied();
            *record = transition.into_record();
            if !applied {
                return false;
            }
        }

        let runtime = &self.inner.runtime;
        tracing::trace!(promise = %self.inner.id, ?state, "promise settled");
        runtime.emit(PromiseEvent::Settled {
            promise: self.inner.id,
            state,
            at: runtime.now(),
        });

        let ready = std::mem::take(&mut *self.inner.reactions.borrow_mut());

        if state == PromiseState::Rejected && !self.is_observed() {
            self.track_unobserved_rejection();
        }

        for reaction in ready {
            let (id, derived, handler) = reaction.select(state);
            schedule_reaction(runtime, id, derived, handler, kept.clone());
        }
        true
    }

    fn track_unobserved_rejection(&self) {
        match self.inner.runtime.config().unhandled_rejections {
            UnhandledRejectionMode::Ignore => {}
            UnhandledRejectionMode::Immediate => self.report_unhandled(),
            UnhandledRejectionMode::Deferred => {
                let promise = self.clone();
                self.inner.runtime.schedule(Box::new(move || {
                    if !promise.is_observed() {
                        promise.report_unhandled();
                    }
                }));
            }
        }
    }

    /// Record that a resolution procedure will call `then` on this promise.
    ///
    /// The `then` call itself happens in a later job, so without this the
    /// rejection would look unobserved until that job runs.
    pub(crate) fn mark_adopted(&self) {
        self.inner.adopted.set(true);
    }

    fn is_observed(&self) -> bool {
        self.inner.registered.get() > 0 || self.inner.adopted.get()
    }

    fn report_unhandled(&self) {
        let reason = match self.settlement() {
            Some(Err(reason)) => reason.to_string(),
            _ => return,
        };
        let runtime = &self.inner.runtime;
        runtime.emit(PromiseEvent::UnhandledRejection {
            promise: self.inner.id,
            reason,
            at: runtime.now(),
        });
    }
}

impl Thenable for Promise {
    fn then(&self, resolve: Resolve, reject: Reject) -> Result<(), Value> {
        self.add_reaction(
            Some(Handler::new(move |value| {
                resolve.call(value);
                Ok(Value::Undefined)
            })),
            Some(Handler::new(move |reason| {
                reject.call(reason);
                Ok(Value::Undefined)
            })),
        );
        Ok(())
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .field("reactions", &self.reaction_count())
            .finish()
    }
}
