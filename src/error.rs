//! Error types for FSM construction and handler notification

use thiserror::Error;

/// Result type alias for FSM construction operations
pub type Result<T> = std::result::Result<T, FsmError>;

/// Construction-time faults. These are never produced while processing events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// A timed interaction or timeout transition was given a zero duration
    #[error("Duration must be strictly positive")]
    InvalidDuration,

    /// A counted interaction (taps, clicks, touches) was given a zero count
    #[error("Count must be strictly positive, got {0}")]
    InvalidCount(usize),

    /// Two members of an XOR composite share the same variant
    #[error("XOR composite already contains a member of variant {0:?}")]
    DuplicateXorMember(String),

    /// A state name is already used in this FSM
    #[error("State {0:?} already exists in this FSM")]
    DuplicateState(String),

    /// Terminal and cancelling states cannot be left
    #[error("State {0:?} cannot be the source of a transition")]
    NotOutputState(String),

    /// The init state cannot be entered by a transition
    #[error("State {0:?} cannot be the target of a transition")]
    NotInputState(String),

    /// The state id does not belong to this FSM
    #[error("State #{0} not registered")]
    UnknownState(usize),

    /// No state of this FSM has the given name
    #[error("No state named {0:?}")]
    UnknownStateName(String),
}

/// Errors a [`FsmHandler`](crate::FsmHandler) may return from a lifecycle hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Abort the running FSM. Honored from `fsm_starts` and `fsm_updates`.
    #[error("Handler requested cancellation")]
    Cancel,

    /// Any other handler fault, re-delivered through `fsm_error`
    #[error("Handler failed: {0}")]
    Failed(String),
}

/// Returned when parsing an unknown event type string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown event type {0:?}")]
pub struct UnknownEventType(pub String);
