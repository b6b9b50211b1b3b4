//! Builder pattern implementation for FSMs

use crate::error::{FsmError, Result};
use crate::fsm::Fsm;
use crate::state::StateId;
use crate::transition::Transition;

/// Builds an [`Fsm`] by referring to states by name.
///
/// The first construction fault is kept and returned by [`build`](Self::build);
/// later calls are skipped.
pub struct FsmBuilder<D> {
    fsm: Result<Fsm<D>>,
}

impl<D> FsmBuilder<D> {
    /// Start from an FSM holding only its `init` state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fsm: Ok(Fsm::new(name)),
        }
    }

    fn and_then<F>(mut self, step: F) -> Self
    where
        F: FnOnce(&mut Fsm<D>) -> Result<()>,
    {
        if let Ok(fsm) = &mut self.fsm {
            if let Err(error) = step(fsm) {
                self.fsm = Err(error);
            }
        }
        self
    }

    /// Add a standard state named `name`.
    pub fn std_state(self, name: &str) -> Self {
        self.and_then(|fsm| fsm.add_std_state(name).map(drop))
    }

    /// Add a terminal state named `name`.
    pub fn terminal_state(self, name: &str) -> Self {
        self.and_then(|fsm| fsm.add_terminal_state(name).map(drop))
    }

    /// Add a cancelling state named `name`.
    pub fn cancelling_state(self, name: &str) -> Self {
        self.and_then(|fsm| fsm.add_cancelling_state(name).map(drop))
    }

    /// Designate the state that starts the FSM (`init` by default).
    pub fn starting_state(self, name: &str) -> Self {
        self.and_then(|fsm| {
            let id = lookup(fsm, name)?;
            fsm.set_starting_state(id)
        })
    }

    /// Add the transition `make(target)` from `source`.
    pub fn transition<F>(self, source: &str, target: &str, make: F) -> Self
    where
        F: FnOnce(StateId) -> Transition<D>,
    {
        self.and_then(|fsm| {
            let from = lookup(fsm, source)?;
            let to = lookup(fsm, target)?;
            fsm.add_transition(from, make(to))
        })
    }

    /// Add a transition delegating to `sub`.
    pub fn sub_fsm(self, source: &str, target: &str, sub: Fsm<D>) -> Self {
        self.transition(source, target, |to| Transition::sub_fsm(to, sub))
    }

    /// The built FSM, or the first error met while building it.
    pub fn build(self) -> Result<Fsm<D>> {
        self.fsm
    }
}

fn lookup<D>(fsm: &Fsm<D>, name: &str) -> Result<StateId> {
    fsm.state_id(name)
        .ok_or_else(|| FsmError::UnknownStateName(name.to_string()))
}
