//! vow-core
//!
//! Core building blocks for the Vow promise engine.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, errors, events）
//! - **ports**: 抽象化レイヤー（Scheduler, Thenable, EventSink, Clock, IdGenerator）
//! - **app**: ランタイムの構築（builder, config, runtime）
//! - **promise**: Promise 本体（解決手続き、reaction、resolve/reject capability）
//! - **impls**: ports の実装（ManualScheduler, TokioScheduler, EventSink 各種）

pub mod domain;
pub mod ports;
pub mod app;
pub mod promise;
pub mod impls;

// よく使う型を再エクスポート
pub use self::app::{BuildError, Runtime, RuntimeBuilder, RuntimeConfig, UnhandledRejectionMode};
pub use self::domain::{PromiseError, PromiseEvent, PromiseId, PromiseState};
pub use self::ports::Thenable;
pub use self::promise::{Handler, Promise, Reject, Resolve, Value};
