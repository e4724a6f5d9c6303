//! State - promise の状態と遷移
//!
//! 状態遷移は純粋関数として定義します（`StateRecord::settle`）。
//! 副作用（reaction の実行、イベント通知）は呼び出し側の責務です。
//!
//! State transitions:
//! - Pending -> Fulfilled
//! - Pending -> Rejected
//! - Fulfilled / Rejected -> (no further transitions)

use serde::{Deserialize, Serialize};

/// PromiseState は promise の状態（値を持たない view）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseState {
    Pending,
    Fulfilled,
    Rejected,
}

impl PromiseState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_settled(self) -> bool {
        !matches!(self, PromiseState::Pending)
    }
}

/// A final outcome: the value a promise settled with, tagged by state.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement<V> {
    Fulfilled(V),
    Rejected(V),
}

impl<V> Settlement<V> {
    pub fn state(&self) -> PromiseState {
        match self {
            Settlement::Fulfilled(_) => PromiseState::Fulfilled,
            Settlement::Rejected(_) => PromiseState::Rejected,
        }
    }

    pub fn value(&self) -> &V {
        match self {
            Settlement::Fulfilled(v) | Settlement::Rejected(v) => v,
        }
    }

    pub fn into_value(self) -> V {
        match self {
            Settlement::Fulfilled(v) | Settlement::Rejected(v) => v,
        }
    }

    /// `Ok` for fulfillment, `Err` for rejection.
    pub fn into_result(self) -> Result<V, V> {
        match self {
            Settlement::Fulfilled(v) => Ok(v),
            Settlement::Rejected(v) => Err(v),
        }
    }
}

/// StateRecord は promise 1 つ分の状態と値
///
/// # 設計原則
/// - state と value を 1 つの enum にまとめることで、
///   「Pending なのに値がある」といった不正な組み合わせを型で排除
/// - 遷移は `settle()` のみ（Pending からの 1 回だけ有効）
#[derive(Debug, Clone, PartialEq)]
pub enum StateRecord<V> {
    Pending,
    Settled(Settlement<V>),
}

/// Result of applying a settlement to a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<V> {
    /// The record moved out of `Pending`.
    Applied(StateRecord<V>),
    /// The record was already settled; the attempted settlement is handed back untouched.
    Ignored {
        current: StateRecord<V>,
        attempted: Settlement<V>,
    },
}

impl<V> Transition<V> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }

    pub fn into_record(self) -> StateRecord<V> {
        match self {
            Transition::Applied(record) => record,
            Transition::Ignored { current, .. } => current,
        }
    }
}

impl<V> Default for StateRecord<V> {
    fn default() -> Self {
        StateRecord::Pending
    }
}

impl<V> StateRecord<V> {
    pub fn state(&self) -> PromiseState {
        match self {
            StateRecord::Pending => PromiseState::Pending,
            StateRecord::Settled(s) => s.state(),
        }
    }

    pub fn settlement(&self) -> Option<&Settlement<V>> {
        match self {
            StateRecord::Pending => None,
            StateRecord::Settled(s) => Some(s),
        }
    }

    /// Apply `settlement` if (and only if) the record is still pending.
    pub fn settle(self, settlement: Settlement<V>) -> Transition<V> {
        match self {
            StateRecord::Pending => Transition::Applied(StateRecord::Settled(settlement)),
            current @ StateRecord::Settled(_) => Transition::Ignored {
                current,
                attempted: settlement,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_record_is_pending() {
        let record: StateRecord<i32> = StateRecord::default();
        assert_eq!(record.state(), PromiseState::Pending);
        assert!(record.settlement().is_none());
    }

    #[rstest]
    #[case::fulfill(Settlement::Fulfilled(1), PromiseState::Fulfilled)]
    #[case::reject(Settlement::Rejected(2), PromiseState::Rejected)]
    fn pending_accepts_first_settlement(
        #[case] settlement: Settlement<i32>,
        #[case] expected: PromiseState,
    ) {
        let transition = StateRecord::Pending.settle(settlement.clone());
        assert!(transition.is_applied());

        let record = transition.into_record();
        assert_eq!(record.state(), expected);
        assert_eq!(record.settlement(), Some(&settlement));
    }

    #[rstest]
    #[case::fulfill_then_fulfill(Settlement::Fulfilled(1), Settlement::Fulfilled(2))]
    #[case::fulfill_then_reject(Settlement::Fulfilled(1), Settlement::Rejected(2))]
    #[case::reject_then_fulfill(Settlement::Rejected(1), Settlement::Fulfilled(2))]
    #[case::reject_then_reject(Settlement::Rejected(1), Settlement::Rejected(2))]
    fn settled_record_ignores_later_settlements(
        #[case] first: Settlement<i32>,
        #[case] second: Settlement<i32>,
    ) {
        let record = StateRecord::Pending.settle(first.clone()).into_record();
        let transition = record.settle(second.clone());

        match transition {
            Transition::Ignored { current, attempted } => {
                assert_eq!(current.settlement(), Some(&first));
                assert_eq!(attempted, second);
            }
            Transition::Applied(_) => panic!("settled record must not transition again"),
        }
    }

    #[test]
    fn settlement_into_result() {
        assert_eq!(Settlement::Fulfilled(3).into_result(), Ok(3));
        assert_eq!(Settlement::Rejected(4).into_result(), Err(4));
    }

    #[test]
    fn state_serializes_snake_case() {
        let s = serde_json::to_string(&PromiseState::Fulfilled).unwrap();
        assert_eq!(s, "\"fulfilled\"");
        assert!(PromiseState::Rejected.is_settled());
        assert!(!PromiseState::Pending.is_settled());
    }
}
