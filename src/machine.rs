//! Common interface of plain and composite FSMs

use crate::data::InteractionData;
use crate::event::Event;
use crate::handler::{FsmHandler, HandlerId};
use crate::timeout::{PendingTimeout, TimerId};
use crate::visitor::FsmVisitor;

/// What processing one event (or firing one timeout) did to a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No transition matched
    Ignored,
    /// A transition fired and the machine is still running
    Moved,
    /// A terminal state was reached; the machine is reinitialized
    Terminated,
    /// A cancelling state was reached; the machine is reinitialized
    Cancelled,
    /// The machine was aborted mid-traversal (a handler or a negation FSM
    /// cancelled it); it is reinitialized
    Aborted,
}

impl Outcome {
    /// Whether a transition fired and completed its traversal.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Moved | Self::Terminated | Self::Cancelled)
    }

    /// Whether the machine went back to its init state.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Terminated | Self::Cancelled | Self::Aborted)
    }

    /// Whether the gesture ended without completing.
    pub fn is_cancellation(self) -> bool {
        matches!(self, Self::Cancelled | Self::Aborted)
    }
}

/// Event-driven machine over interaction data `D`.
///
/// The data is owned by the caller (usually an
/// [`Interaction`](crate::Interaction)) and lent to every call, so
/// concurrent members of a composite all feed the same data.
pub trait Machine<D: InteractionData> {
    /// Name given at construction.
    fn name(&self) -> &str;

    /// Feed one event. Never fails: non-matching events are [`Outcome::Ignored`].
    fn process_event(&mut self, event: &Event, data: &mut D) -> Outcome;

    /// `true` iff the event was accepted.
    fn process(&mut self, event: &Event, data: &mut D) -> bool {
        self.process_event(event, data).is_accepted()
    }

    /// The timeout the host should schedule, if any.
    fn pending_timeout(&self) -> Option<PendingTimeout>;

    /// Fire an armed timeout. Unknown or stale ids are a no-op.
    fn fire_timeout(&mut self, id: TimerId, data: &mut D) -> Outcome;

    /// Whether a gesture is in progress.
    fn is_started(&self) -> bool;

    /// Back to the init state, keeping the accumulated data.
    fn reinit(&mut self);

    /// [`reinit`](Self::reinit) and flush the data.
    fn full_reinit(&mut self, data: &mut D) {
        self.reinit();
        data.flush();
    }

    /// Detach everything. The machine must not be used afterwards.
    fn uninstall(&mut self);

    /// Register a lifecycle handler.
    fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId;

    /// Returns `false` if the handler was unknown.
    fn remove_handler(&mut self, id: HandlerId) -> bool;

    /// Read-only depth-first traversal.
    fn accept_visitor(&self, visitor: &mut dyn FsmVisitor<D>);

    /// Enable or disable `tracing` events, composites included.
    fn log(&mut self, enabled: bool);
}
