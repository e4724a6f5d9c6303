//! Events - ドメインイベント
//!
//! EventSink に送られる観測用イベント。機能上の契約には含まれません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::PromiseId;
use super::state::PromiseState;

/// PromiseEvent は promise のライフサイクルで発生したイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PromiseEvent {
    Created {
        promise: PromiseId,
        at: DateTime<Utc>,
    },
    Settled {
        promise: PromiseId,
        state: PromiseState,
        at: DateTime<Utc>,
    },
    /// A promise was rejected and nothing was registered to observe it.
    UnhandledRejection {
        promise: PromiseId,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl PromiseEvent {
    pub fn promise(&self) -> PromiseId {
        match self {
            PromiseEvent::Created { promise, .. }
            | PromiseEvent::Settled { promise, .. }
            | PromiseEvent::UnhandledRejection { promise, .. } => *promise,
        }
    }

    pub fn is_unhandled_rejection(&self) -> bool {
        matches!(self, PromiseEvent::UnhandledRejection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_is_tagged() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let event = PromiseEvent::UnhandledRejection {
            promise: PromiseId::from_u128(1),
            reason: "boom".to_string(),
            at,
        };

        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["event"], "unhandled_rejection");
        assert_eq!(v["reason"], "boom");
        assert!(event.is_unhandled_rejection());
        assert_eq!(event.promise(), PromiseId::from_u128(1));
    }
}
