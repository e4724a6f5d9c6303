//! Thenable port - 「then を持つもの」の capability
//!
//! 解決手続きは値の具体型を見ません。`then(resolve, reject)` を呼べるものは
//! すべて thenable として扱い、その結果を採用します。
//! この crate の `Promise` も、外部の promise 風オブジェクトも同じ trait を実装します。

use crate::promise::{Reject, Resolve, Value};

/// Thenable は 2 つのコールバックを受け取る `then` を持つ
///
/// # 契約
/// - `resolve` / `reject` は何度呼んでもよい（最初の 1 回だけ有効）
/// - `Err(reason)` を返すと「then の呼び出しが throw した」扱い。
///   まだどちらのコールバックも呼ばれていなければ reason で reject される
pub trait Thenable {
    fn then(&self, resolve: Resolve, reject: Reject) -> Result<(), Value>;
}
