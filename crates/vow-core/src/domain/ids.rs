//! Domain identifiers (strongly-typed IDs).
//!
//! Promise の同一性そのものは `Rc::ptr_eq` で判定します（自己解決の検出）。
//! ここで定義する ID はログやイベントで「どの promise か」を表示するためのものです。
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` はマーカー型としてコンパイル時の型安全性だけを提供します。
//! `PromiseId` と `ReactionId` は混同できません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"promise-", "reaction-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型（ULID ベース）
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Build an id from a raw 128-bit value. Handy for fixtures.
    pub fn from_u128(value: u128) -> Self {
        Self::from_ulid(Ulid::from_bytes(value.to_be_bytes()))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Promise のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromiseMarker {}

impl IdMarker for PromiseMarker {
    fn prefix() -> &'static str {
        "promise-"
    }
}

/// Reaction のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReactionMarker {}

impl IdMarker for ReactionMarker {
    fn prefix() -> &'static str {
        "reaction-"
    }
}

/// Identifier of a promise (diagnostics only, not used for identity checks).
pub type PromiseId = Id<PromiseMarker>;

/// Identifier of a reaction record (one per `then`/`catch` call).
pub type ReactionId = Id<ReactionMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        let promise = PromiseId::from_ulid(Ulid::new());
        let reaction = ReactionId::from_ulid(Ulid::new());

        assert!(promise.to_string().starts_with("promise-"));
        assert!(reaction.to_string().starts_with("reaction-"));

        // let _: PromiseId = reaction; // <- does not compile
    }

    #[test]
    fn from_u128_is_stable() {
        let a = PromiseId::from_u128(7);
        let b = PromiseId::from_u128(7);
        assert_eq!(a, b);
        assert_eq!(a.as_ulid().0, 7);
    }

    #[test]
    fn ids_can_be_serialized() {
        let id = PromiseId::from_ulid(Ulid::new());
        let serialized = serde_json::to_string(&id).unwrap();
        let back: PromiseId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<PromiseId>(), size_of::<Ulid>());
        assert_eq!(size_of::<ReactionId>(), 16);
    }
}
