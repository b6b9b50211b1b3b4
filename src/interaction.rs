//! Interactions: a machine paired with the data it accumulates.

use crate::data::InteractionData;
use crate::event::Event;
use crate::handler::{FsmHandler, HandlerId};
use crate::machine::{Machine, Outcome};
use crate::timeout::{PendingTimeout, TimerId};

/// Owns a machine and its data.
///
/// Handlers observe the data during `fsm_stops`/`fsm_cancels`; once the
/// machine has finished (terminated, cancelled or aborted) the data is
/// flushed, ready for the next repetition of the gesture.
pub struct Interaction<D, M> {
    machine: M,
    data: D,
}

impl<D, M> Interaction<D, M>
where
    D: InteractionData,
    M: Machine<D>,
{
    /// Wrap `machine` with default data.
    pub fn new(machine: M) -> Self
    where
        D: Default,
    {
        Self::with_data(machine, D::default())
    }

    /// Wrap `machine` with initial `data`.
    pub fn with_data(machine: M, data: D) -> Self {
        Self { machine, data }
    }

    /// Name of the wrapped machine.
    pub fn name(&self) -> &str {
        self.machine.name()
    }

    /// The accumulated data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The wrapped machine.
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Mutable access to the wrapped machine.
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Whether a gesture is in progress.
    pub fn is_running(&self) -> bool {
        self.machine.is_started()
    }

    /// Feed one event, flushing the data once the gesture finished.
    pub fn process_event(&mut self, event: &Event) -> Outcome {
        let outcome = self.machine.process_event(event, &mut self.data);
        self.settle(outcome)
    }

    /// `true` iff the event was accepted.
    pub fn process(&mut self, event: &Event) -> bool {
        self.process_event(event).is_accepted()
    }

    /// The timeout the host should schedule, if any.
    pub fn pending_timeout(&self) -> Option<PendingTimeout> {
        self.machine.pending_timeout()
    }

    /// Fire an armed timeout, flushing the data once the gesture finished.
    pub fn fire_timeout(&mut self, id: TimerId) -> Outcome {
        let outcome = self.machine.fire_timeout(id, &mut self.data);
        self.settle(outcome)
    }

    fn settle(&mut self, outcome: Outcome) -> Outcome {
        if outcome.is_finished() {
            self.data.flush();
        }
        outcome
    }

    /// Register a lifecycle handler on the wrapped machine.
    pub fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        self.machine.add_handler(handler)
    }

    /// Returns `false` if the handler was unknown.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.machine.remove_handler(id)
    }

    /// Reinitialize the machine and flush the data.
    pub fn full_reinit(&mut self) {
        self.machine.full_reinit(&mut self.data);
    }

    /// Uninstall the machine and flush the data.
    pub fn uninstall(&mut self) {
        self.machine.uninstall();
        self.data.flush();
    }

    /// Enable or disable `tracing` events.
    pub fn log(&mut self, enabled: bool) {
        self.machine.log(enabled);
    }
}

impl<D: std::fmt::Debug, M> std::fmt::Debug for Interaction<D, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interaction")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
