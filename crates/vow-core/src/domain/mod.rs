//! Domain model (IDs, state records, errors, events).

pub mod ids;
pub mod state;
pub mod errors;
pub mod events;

pub use self::ids::{PromiseId, ReactionId};
pub use self::state::{PromiseState, Settlement, StateRecord, Transition};
pub use self::errors::{PromiseError, SchedulerError};
pub use self::events::PromiseEvent;
