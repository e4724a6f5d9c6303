//! Resolution procedure
//!
//! 値で promise を解決するときの手順:
//! 1. 自分自身なら TypeError で reject
//! 2. thenable でなければそのまま fulfill
//! 3. thenable なら、`then` の呼び出しをジョブとして予約し、結果を採用する
//!
//! `then` を同期的に呼ばないので、thenable が何段重なってもスタックは伸びません。

use crate::domain::errors::PromiseError;
use crate::domain::state::Settlement;

use super::capability::resolving_functions;
use super::reaction::run_guarded;
use super::{Promise, Value};

pub(crate) fn resolve_with(promise: &Promise, value: Value, depth: usize) {
    if value.is_promise(promise) {
        tracing::debug!(promise = %promise.id(), "promise resolved with itself");
        promise.settle(Settlement::Rejected(PromiseError::SelfResolution.into()));
        return;
    }

    let Some(thenable) = value.as_thenable() else {
        promise.settle(Settlement::Fulfilled(value));
        return;
    };

    let runtime = promise.runtime();
    if let Some(max) = runtime.config().max_adoption_depth
        && depth >= max
    {
        tracing::debug!(promise = %promise.id(), max, "thenable adoption too deep");
        promise.settle(Settlement::Rejected(
            PromiseError::AdoptionDepthExceeded { max }.into(),
        ));
        return;
    }

    tracing::trace!(promise = %promise.id(), depth, "adopting thenable");
    if let Value::Promise(source) = &value {
        source.mark_adopted();
    }
    let target = promise.clone();
    let catch_panics = runtime.config().catch_panics;
    runtime.schedule(Box::new(move || {
        let (resolve, reject) = resolving_functions(&target, depth + 1);
        let on_throw = reject.clone();
        if let Err(reason) = run_guarded(catch_panics, move || thenable.then(resolve, reject)) {
            on_throw.call(reason);
        }
    }));
}
