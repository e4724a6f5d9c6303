//! Resolving functions - promise を外から決着させる capability
//!
//! `Resolve` と `Reject` は 1 組で 1 つのフラグを共有します。
//! どちらかが 1 回呼ばれたら、以降の呼び出しはすべて無視されます。

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::domain::state::Settlement;

use super::resolution::resolve_with;
use super::{Promise, Value};

/// Resolve a promise with a value; thenables are adopted, not stored.
#[derive(Clone)]
pub struct Resolve {
    promise: Promise,
    already_resolved: Rc<Cell<bool>>,
    depth: usize,
}

/// Reject a promise with a reason.
#[derive(Clone)]
pub struct Reject {
    promise: Promise,
    already_resolved: Rc<Cell<bool>>,
}

/// A fresh resolve/reject pair for `promise`.
///
/// `depth` is how many thenables have already been unwrapped on the way here.
pub(crate) fn resolving_functions(promise: &Promise, depth: usize) -> (Resolve, Reject) {
    let already_resolved = Rc::new(Cell::new(false));
    let resolve = Resolve {
        promise: promise.clone(),
        already_resolved: Rc::clone(&already_resolved),
        depth,
    };
    let reject = Reject {
        promise: promise.clone(),
        already_resolved,
    };
    (resolve, reject)
}

impl Resolve {
    pub fn call(&self, value: impl Into<Value>) {
        if self.already_resolved.replace(true) {
            tracing::debug!(promise = %self.promise.id(), "resolve ignored: already resolved");
            return;
        }
        resolve_with(&self.promise, value.into(), self.depth);
    }

    /// Has either half of this pair been called?
    pub fn is_spent(&self) -> bool {
        self.already_resolved.get()
    }
}

impl Reject {
    pub fn call(&self, reason: impl Into<Value>) {
        if self.already_resolved.replace(true) {
            tracing::debug!(promise = %self.promise.id(), "reject ignored: already resolved");
            return;
        }
        self.promise.settle(Settlement::Rejected(reason.into()));
    }

    pub fn is_spent(&self) -> bool {
        self.already_resolved.get()
    }
}

impl fmt::Debug for Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("promise", &self.promise.id())
            .field("spent", &self.already_resolved.get())
            .field("depth", &self.depth)
            .finish()
    }
}

impl fmt::Debug for Reject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reject")
            .field("promise", &self.promise.id())
            .field("spent", &self.already_resolved.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Runtime;
    use crate::domain::state::PromiseState;

    #[test]
    fn pair_shares_one_flag() {
        let (runtime, _scheduler) = Runtime::manual();
        let (promise, resolve, reject) = Promise::with_resolvers(&runtime);

        reject.call("first");
        assert!(resolve.is_spent());

        resolve.call(1);
        reject.call("second");

        assert_eq!(promise.state(), PromiseState::Rejected);
        assert_eq!(promise.settlement(), Some(Err(Value::from("first"))));
    }

    #[test]
    fn clones_share_the_flag() {
        let (runtime, _scheduler) = Runtime::manual();
        let (promise, resolve, _reject) = Promise::with_resolvers(&runtime);
        let again = resolve.clone();

        resolve.call(1);
        again.call(2);

        assert_eq!(promise.settlement(), Some(Ok(Value::from(1))));
    }

    #[test]
    fn separate_pairs_are_independent_but_settle_once() {
        let (runtime, _scheduler) = Runtime::manual();
        let promise = Promise::pending(&runtime);
        let (resolve_a, _) = resolving_functions(&promise, 0);
        let (_, reject_b) = resolving_functions(&promise, 0);

        resolve_a.call("a");
        reject_b.call("b");

        // the second pair still fires once, but the record is already settled
        assert!(reject_b.is_spent());
        assert_eq!(promise.settlement(), Some(Ok(Value::from("a"))));
    }
}
