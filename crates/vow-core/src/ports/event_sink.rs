//! EventSink port - イベント記録の抽象化
//!
//! 未処理 rejection の通知先を差し替えるためのフック。
//! 実装は `impls::event_sink` を参照。

use crate::domain::events::PromiseEvent;

/// EventSink は promise のイベントを受け取る
///
/// # 設計原則
/// - 観測専用（promise の状態には影響しない）
/// - 同期 API（reaction 処理の途中から呼ばれるため、待たない）
pub trait EventSink {
    fn emit(&self, event: PromiseEvent);
}
