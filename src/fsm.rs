//! The FSM engine: a named graph of states reachable from one init state,
//! advanced by [`Fsm::process_event`].
//!
//! # Type Parameters
//! - `D`: Interaction data fed by transition actions. The FSM does not own it:
//!   the caller lends it to every call, so the owning interaction (or every
//!   member of a composite) shares one data value.
//!
//! # Lifecycle
//! 1. [`Fsm::new`] creates the FSM with its init state.
//! 2. States and transitions are added, directly or through
//!    [`Fsm::build_fsm`] / [`FsmBuilder`](crate::FsmBuilder).
//! 3. [`Fsm::process_event`] advances the current state. Reaching a terminal or
//!    cancelling state notifies the handlers and reinitializes the FSM, so it
//!    is immediately ready for the next gesture.
//! 4. [`Fsm::uninstall`] detaches everything.
//!
//! # Starting state
//! The FSM is *started* once its starting state (the init state unless
//! [`Fsm::set_starting_state`] says otherwise) has been left or entered for the
//! first time since the last reinit. Handlers only receive `fsm_stops` /
//! `fsm_cancels` for a started FSM.

use std::fmt::Debug;

use crate::data::InteractionData;
use crate::error::{FsmError, Result};
use crate::event::Event;
use crate::handler::{FsmHandler, HandlerId, Handlers, Hook, Notified};
use crate::machine::{Machine, Outcome};
use crate::observable::Observable;
use crate::state::{StateId, StateKind, StateNode, StateView};
use crate::timeout::{PendingTimeout, TimerId};
use crate::transition::Transition;
use crate::visitor::FsmVisitor;

/// Emitted on every change of the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// State left
    pub previous: StateId,
    /// State entered
    pub current: StateId,
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimeout {
    state: StateId,
    transition: usize,
    pending: PendingTimeout,
}

#[derive(Debug, Clone, Copy)]
struct SubRef {
    state: StateId,
    transition: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Aborted,
}

enum Traversal {
    Done(Outcome),
    Aborted,
}

impl Traversal {
    fn into_outcome(self) -> Outcome {
        match self {
            Self::Done(outcome) => outcome,
            Self::Aborted => Outcome::Aborted,
        }
    }
}

/// A finite state machine over interaction data `D`.
pub struct Fsm<D> {
    name: String,
    states: Vec<StateNode<D>>,
    current: StateId,
    starting: StateId,
    started: bool,
    inner: bool,
    uninstalled: bool,
    log: bool,
    handlers: Handlers<D>,
    timeout: Option<ArmedTimeout>,
    current_sub: Option<SubRef>,
    state_changes: Observable<StateChange>,
}

impl<D> Fsm<D> {
    /// Create an FSM containing only its init state, named `init`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: vec![StateNode::new("init", StateKind::Init)],
            current: StateId::INIT,
            starting: StateId::INIT,
            started: false,
            inner: false,
            uninstalled: false,
            log: false,
            handlers: Handlers::default(),
            timeout: None,
            current_sub: None,
            state_changes: Observable::new(),
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Populate the FSM once. Later calls are no-ops returning `Ok`.
    pub fn build_fsm<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.is_built() {
            return Ok(());
        }
        build(self)
    }

    /// Whether any state besides the init state exists.
    pub fn is_built(&self) -> bool {
        self.states.len() > 1
    }

    /// Add an intermediate state. Names are unique within an FSM.
    pub fn add_std_state(&mut self, name: impl Into<String>) -> Result<StateId> {
        self.add_state(name.into(), StateKind::Std)
    }

    /// Add a state ending the FSM normally.
    pub fn add_terminal_state(&mut self, name: impl Into<String>) -> Result<StateId> {
        self.add_state(name.into(), StateKind::Terminal)
    }

    /// Add a state ending the FSM by cancellation.
    pub fn add_cancelling_state(&mut self, name: impl Into<String>) -> Result<StateId> {
        self.add_state(name.into(), StateKind::Cancelling)
    }

    fn add_state(&mut self, name: String, kind: StateKind) -> Result<StateId> {
        if self.states.iter().any(|s| s.name == name) {
            return Err(FsmError::DuplicateState(name));
        }
        self.states.push(StateNode::new(name, kind));
        Ok(StateId(self.states.len() - 1))
    }

    /// Append a transition to `source`. Insertion order is evaluation order.
    pub fn add_transition(&mut self, source: StateId, transition: Transition<D>) -> Result<()> {
        let target = self.node(transition.target())?;
        if !target.kind.is_input() {
            return Err(FsmError::NotInputState(target.name.clone()));
        }
        let node = self.node(source)?;
        if !node.kind.is_output() {
            return Err(FsmError::NotOutputState(node.name.clone()));
        }
        self.states[source.0].transitions.push(transition);
        Ok(())
    }

    fn node(&self, id: StateId) -> Result<&StateNode<D>> {
        self.states.get(id.0).ok_or(FsmError::UnknownState(id.0))
    }

    /// Always [`StateId::INIT`].
    pub fn init_state(&self) -> StateId {
        StateId::INIT
    }

    /// The state that starts the FSM.
    pub fn starting_state(&self) -> StateId {
        self.starting
    }

    /// Designate the state whose first exit (init) or entry (other states) starts the FSM.
    pub fn set_starting_state(&mut self, state: StateId) -> Result<()> {
        self.node(state)?;
        self.starting = state;
        Ok(())
    }

    /// View of state `id`, if it belongs to this FSM.
    pub fn state(&self, id: StateId) -> Option<StateView<'_>> {
        self.states.get(id.0).map(|s| s.view(id))
    }

    /// Id of the state called `name`.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name).map(StateId)
    }

    /// Every state, in creation order.
    pub fn states(&self) -> impl Iterator<Item = StateView<'_>> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| s.view(StateId(i)))
    }

    /// Outgoing transitions of a state, in evaluation order.
    pub fn transitions(&self, id: StateId) -> &[Transition<D>] {
        self.states
            .get(id.0)
            .map(|s| s.transitions.as_slice())
            .unwrap_or_default()
    }

    /// The state the FSM is in.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// View of the current state.
    pub fn current_state_view(&self) -> StateView<'_> {
        self.states[self.current.0].view(self.current)
    }

    /// Force the current state, for tooling and tests. Lifecycle hooks do not fire.
    pub fn set_current_state(&mut self, state: StateId) -> Result<()> {
        self.node(state)?;
        self.set_current(state);
        Ok(())
    }

    /// Listeners notified with `(previous, current)` on every state change.
    pub fn current_state_observable(&mut self) -> &mut Observable<StateChange> {
        &mut self.state_changes
    }

    /// Whether a gesture is in progress: the starting state was reached and no terminal or cancelling state since.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// `true` when embedded in a sub-FSM transition.
    pub fn is_inner(&self) -> bool {
        self.inner
    }

    pub(crate) fn set_inner(&mut self, inner: bool) {
        self.inner = inner;
    }

    /// Whether [`uninstall`](Self::uninstall) was called.
    pub fn is_uninstalled(&self) -> bool {
        self.uninstalled
    }

    /// The sub-FSM currently receiving the events, if any.
    pub fn current_sub_fsm(&self) -> Option<&Fsm<D>> {
        let sub = self.current_sub?;
        self.states
            .get(sub.state.0)?
            .transitions
            .get(sub.transition)?
            .sub_fsm_ref()
    }

    fn sub_mut(&mut self, sub: SubRef) -> Option<&mut Fsm<D>> {
        self.states
            .get_mut(sub.state.0)?
            .transitions
            .get_mut(sub.transition)?
            .sub_fsm_mut()
    }

    /// Register a lifecycle handler. Handlers are notified in registration order.
    pub fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        self.handlers.add(handler)
    }

    /// Returns `false` if the handler was unknown.
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(id)
    }

    /// Enable or disable `tracing` events for this FSM.
    pub fn log(&mut self, enabled: bool) {
        self.log = enabled;
    }

    /// Whether some transition of the current state (or of the active
    /// sub-FSM) would fire on `event`. Nothing is mutated.
    pub(crate) fn can_process(&self, event: &Event, data: &D) -> bool {
        if self.uninstalled {
            return false;
        }
        if let Some(sub) = self.current_sub_fsm() {
            return sub.can_process(event, data);
        }
        self.states[self.current.0]
            .transitions
            .iter()
            .any(|tr| tr.can_fire(event, data))
    }

    /// Feed one event to the current state.
    ///
    /// Transitions are tried in insertion order and the first one whose
    /// trigger and guard both accept the event fires. If a traversal is
    /// aborted (a handler cancelled the FSM), the next sibling is tried as
    /// long as the FSM is still in the same state.
    pub fn process_event(&mut self, event: &Event, data: &mut D) -> Outcome {
        if self.uninstalled {
            return Outcome::Ignored;
        }
        if let Some(sub) = self.current_sub {
            let outcome = match self.sub_mut(sub) {
                Some(fsm) => fsm.process_event(event, data),
                None => Outcome::Ignored,
            };
            return self.after_sub(sub, outcome, data);
        }

        let state = self.current;
        let mut aborted = false;
        for index in 0..self.states[state.0].transitions.len() {
            if self.current != state {
                break;
            }
            if !self.states[state.0].transitions[index].can_fire(event, data) {
                continue;
            }
            match self.traverse(state, index, event, data) {
                Traversal::Done(outcome) => return outcome,
                Traversal::Aborted => aborted = true,
            }
        }
        if aborted {
            Outcome::Aborted
        } else {
            Outcome::Ignored
        }
    }

    /// `true` iff a transition accepted the event.
    pub fn process(&mut self, event: &Event, data: &mut D) -> bool {
        self.process_event(event, data).is_accepted()
    }

    /// The timeout armed by the current state (or by the active sub-FSM).
    pub fn pending_timeout(&self) -> Option<PendingTimeout> {
        match self.current_sub_fsm() {
            Some(sub) => sub.pending_timeout(),
            None => self.timeout.map(|armed| armed.pending),
        }
    }

    /// Fire the armed timeout transition if `id` is still the pending one.
    pub fn fire_timeout(&mut self, id: TimerId, data: &mut D) -> Outcome {
        if self.uninstalled {
            return Outcome::Ignored;
        }
        if let Some(sub) = self.current_sub {
            let outcome = match self.sub_mut(sub) {
                Some(fsm) => fsm.fire_timeout(id, data),
                None => Outcome::Ignored,
            };
            return self.after_sub(sub, outcome, data);
        }
        let armed = match self.timeout {
            Some(armed) if armed.pending.id == id && armed.state == self.current => armed,
            _ => return Outcome::Ignored,
        };
        self.timeout = None;
        let event = Event::Timeout;
        if !self.states[armed.state.0].transitions[armed.transition].is_guard_ok(&event, data) {
            return Outcome::Ignored;
        }
        if self.log {
            tracing::debug!(fsm = %self.name, state = %self.states[armed.state.0].name, "timeout elapsed");
        }
        self.traverse(armed.state, armed.transition, &event, data)
            .into_outcome()
    }

    /// Run one traversal: disarm the timeout, run the action, exit the
    /// source, then enter the target (or hand the event to the sub-FSM).
    fn traverse(&mut self, source: StateId, index: usize, event: &Event, data: &mut D) -> Traversal {
        self.stop_timeout();
        let (target, is_sub) = {
            let tr = &mut self.states[source.0].transitions[index];
            tr.run_action(event, data);
            (tr.target(), tr.sub_fsm_ref().is_some())
        };
        if self.log {
            tracing::debug!(
                fsm = %self.name,
                state = %self.states[source.0].name,
                transition = %self.states[source.0].transitions[index].view().label(),
                target = %self.states[target.0].name,
                "transition fired"
            );
        }
        if self.exit_state(source, data) == Flow::Aborted {
            return Traversal::Aborted;
        }
        if is_sub {
            let sub = SubRef {
                state: source,
                transition: index,
            };
            self.current_sub = Some(sub);
            let outcome = match self.sub_mut(sub) {
                Some(fsm) => fsm.process_event(event, data),
                None => Outcome::Ignored,
            };
            return match self.after_sub(sub, outcome, data) {
                Outcome::Aborted => Traversal::Aborted,
                Outcome::Ignored => Traversal::Done(Outcome::Moved),
                other => Traversal::Done(other),
            };
        }
        self.enter_state(target, data)
    }

    /// React to what the active sub-FSM did.
    fn after_sub(&mut self, sub: SubRef, outcome: Outcome, data: &mut D) -> Outcome {
        match outcome {
            Outcome::Ignored => Outcome::Ignored,
            Outcome::Moved => {
                if self.started && self.on_updating(data) == Flow::Aborted {
                    return Outcome::Aborted;
                }
                Outcome::Moved
            }
            Outcome::Terminated => {
                self.current_sub = None;
                let target = self.states[sub.state.0].transitions[sub.transition].target();
                self.enter_state(target, data).into_outcome()
            }
            Outcome::Cancelled | Outcome::Aborted => {
                self.current_sub = None;
                self.on_cancelling(data);
                outcome
            }
        }
    }

    fn exit_state(&mut self, state: StateId, data: &D) -> Flow {
        match self.states[state.0].kind {
            StateKind::Init => self.check_starting_state(state, data),
            _ => Flow::Continue,
        }
    }

    fn enter_state(&mut self, state: StateId, data: &D) -> Traversal {
        match self.states[state.0].kind {
            StateKind::Init | StateKind::Std => {
                if self.check_starting_state(state, data) == Flow::Aborted {
                    return Traversal::Aborted;
                }
                self.set_current(state);
                self.arm_timeout(state, data);
                if self.started && self.on_updating(data) == Flow::Aborted {
                    return Traversal::Aborted;
                }
                Traversal::Done(Outcome::Moved)
            }
            StateKind::Terminal => {
                if self.check_starting_state(state, data) == Flow::Aborted {
                    return Traversal::Aborted;
                }
                self.set_current(state);
                self.on_terminating(data);
                Traversal::Done(Outcome::Terminated)
            }
            StateKind::Cancelling => {
                self.set_current(state);
                self.on_cancelling(data);
                Traversal::Done(Outcome::Cancelled)
            }
        }
    }

    /// Start the FSM if `state` is its starting state and it has not started yet.
    fn check_starting_state(&mut self, state: StateId, data: &D) -> Flow {
        if !self.started && self.starting == state {
            self.on_starting(data)
        } else {
            Flow::Continue
        }
    }

    fn on_starting(&mut self, data: &D) -> Flow {
        self.started = true;
        if self.log {
            tracing::debug!(fsm = %self.name, "starting");
        }
        match self.handlers.notify(Hook::Starts, data, &self.name, self.log) {
            Notified::Done => Flow::Continue,
            Notified::CancelRequested => {
                self.on_cancelling(data);
                Flow::Aborted
            }
        }
    }

    fn on_updating(&mut self, data: &D) -> Flow {
        if self.log {
            tracing::trace!(fsm = %self.name, state = %self.states[self.current.0].name, "updating");
        }
        match self.handlers.notify(Hook::Updates, data, &self.name, self.log) {
            Notified::Done => Flow::Continue,
            Notified::CancelRequested => {
                self.on_cancelling(data);
                Flow::Aborted
            }
        }
    }

    fn on_terminating(&mut self, data: &D) {
        if self.log {
            tracing::debug!(fsm = %self.name, "terminating");
        }
        if self.started {
            self.handlers.notify(Hook::Stops, data, &self.name, self.log);
        }
        self.reinit();
    }

    /// Notify the handlers of a cancellation (if started) and reinitialize.
    pub(crate) fn on_cancelling(&mut self, data: &D) {
        if self.log {
            tracing::debug!(fsm = %self.name, "cancelling");
        }
        if self.started {
            self.handlers.notify(Hook::Cancels, data, &self.name, self.log);
        }
        self.reinit();
    }

    fn set_current(&mut self, state: StateId) {
        let previous = self.current;
        self.current = state;
        if previous != state {
            self.state_changes.emit(&StateChange {
                previous,
                current: state,
            });
        }
    }

    fn arm_timeout(&mut self, state: StateId, data: &D) {
        let node = &self.states[state.0];
        let Some(index) = node.timeout_transition() else {
            return;
        };
        let Some(duration) = node.transitions[index].duration(data) else {
            return;
        };
        let pending = PendingTimeout::arm(duration);
        if self.log {
            tracing::trace!(fsm = %self.name, state = %node.name, ?duration, "timeout armed");
        }
        self.timeout = Some(ArmedTimeout {
            state,
            transition: index,
            pending,
        });
    }

    fn stop_timeout(&mut self) {
        if let Some(armed) = self.timeout.take() {
            if self.log {
                tracing::trace!(fsm = %self.name, timer = ?armed.pending.id, "timeout disarmed");
            }
        }
    }

    /// Back to the init state. Accumulated data is left untouched.
    pub fn reinit(&mut self) {
        self.stop_timeout();
        if let Some(sub) = self.current_sub.take() {
            if let Some(fsm) = self.sub_mut(sub) {
                fsm.reinit();
            }
        }
        self.started = false;
        self.set_current(StateId::INIT);
    }

    /// Detach all states, transitions and handlers. The FSM must not be used afterwards.
    pub fn uninstall(&mut self) {
        self.stop_timeout();
        self.current_sub = None;
        for state in &mut self.states {
            state.uninstall();
        }
        self.handlers.clear();
        self.state_changes.clear();
        self.started = false;
        self.current = StateId::INIT;
        self.uninstalled = true;
    }
}

impl<D: InteractionData> Fsm<D> {
    /// [`reinit`](Self::reinit) and flush the data.
    pub fn full_reinit(&mut self, data: &mut D) {
        self.reinit();
        data.flush();
    }
}

impl<D: InteractionData> Machine<D> for Fsm<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_event(&mut self, event: &Event, data: &mut D) -> Outcome {
        Fsm::process_event(self, event, data)
    }

    fn pending_timeout(&self) -> Option<PendingTimeout> {
        Fsm::pending_timeout(self)
    }

    fn fire_timeout(&mut self, id: TimerId, data: &mut D) -> Outcome {
        Fsm::fire_timeout(self, id, data)
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn reinit(&mut self) {
        Fsm::reinit(self);
    }

    fn uninstall(&mut self) {
        Fsm::uninstall(self);
    }

    fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        self.handlers.add(handler)
    }

    fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(id)
    }

    fn accept_visitor(&self, visitor: &mut dyn FsmVisitor<D>) {
        visitor.visit_fsm(self);
    }

    fn log(&mut self, enabled: bool) {
        self.log = enabled;
    }
}

impl<D> Debug for Fsm<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fsm")
            .field("name", &self.name)
            .field("states", &self.states.len())
            .field("current", &self.states[self.current.0].name)
            .field("started", &self.started)
            .field("inner", &self.inner)
            .field("handlers", &self.handlers.len())
            .field("timeout", &self.timeout.map(|t| t.pending))
            .finish()
    }
}
