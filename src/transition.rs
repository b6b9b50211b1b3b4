//! Transitions: directed edges between an output state and an input state.
//!
//! A transition fires when its trigger accepts the event and its guard holds.
//! Traversal then runs, in order: disarm the source FSM's pending timeout,
//! run the action, exit the source state, enter the target state.

use std::rc::Rc;
use std::time::Duration;

use crate::error::{FsmError, Result};
use crate::event::{Event, EventType, WidgetKind, WidgetOracle};
use crate::fsm::Fsm;
use crate::state::StateId;

/// Guard predicate evaluated before a transition fires.
pub type Guard<D> = Box<dyn Fn(&Event, &D) -> bool>;

/// Side effect run while a transition is traversed.
pub type Action<D> = Box<dyn FnMut(&Event, &mut D)>;

/// Computes a timeout duration from the data at the moment the source state is entered.
pub type DurationFn<D> = Box<dyn Fn(&D) -> Duration>;

type EventFilter = Box<dyn Fn(&Event) -> bool>;

pub(crate) enum Trigger<D> {
    Event {
        types: Vec<EventType>,
        filter: Option<EventFilter>,
    },
    Timeout(DurationFn<D>),
    SubFsm(Box<Fsm<D>>),
}

/// An edge of an FSM graph.
pub struct Transition<D> {
    target: StateId,
    name: Option<String>,
    trigger: Trigger<D>,
    guard: Option<Guard<D>>,
    action: Option<Action<D>>,
}

impl<D> Transition<D> {
    fn with_trigger(target: StateId, trigger: Trigger<D>) -> Self {
        Self {
            target,
            name: None,
            trigger,
            guard: None,
            action: None,
        }
    }

    /// Transition fired by events of the given type.
    pub fn on(event_type: EventType, target: StateId) -> Self {
        Self::on_any([event_type], target)
    }

    /// Transition fired by events of any of the given types.
    pub fn on_any(types: impl IntoIterator<Item = EventType>, target: StateId) -> Self {
        Self::with_trigger(
            target,
            Trigger::Event {
                types: types.into_iter().collect(),
                filter: None,
            },
        )
    }

    /// Widget-specific transition: the event target must be classified as `kind` by the oracle.
    pub fn on_widget(
        event_type: EventType,
        target: StateId,
        kind: WidgetKind,
        oracle: Rc<dyn WidgetOracle>,
    ) -> Self {
        Self::on(event_type, target).filter(move |event| oracle.is(event.target(), kind))
    }

    /// Timeout transition whose duration is computed when the source state is entered.
    pub fn timeout<F>(target: StateId, duration: F) -> Self
    where
        F: Fn(&D) -> Duration + 'static,
    {
        Self::with_trigger(target, Trigger::Timeout(Box::new(duration)))
    }

    /// Timeout transition with a constant duration. Zero is rejected.
    pub fn timeout_after(target: StateId, duration: Duration) -> Result<Self> {
        if duration.is_zero() {
            return Err(FsmError::InvalidDuration);
        }
        Ok(Self::timeout(target, move |_| duration))
    }

    /// Transition delegating to an embedded FSM. It completes when the sub-FSM terminates.
    pub fn sub_fsm(target: StateId, mut fsm: Fsm<D>) -> Self {
        fsm.set_inner(true);
        Self::with_trigger(target, Trigger::SubFsm(Box::new(fsm)))
    }

    /// Narrow the accepted events with an extra event-shape predicate.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Event) -> bool + 'static,
    {
        if let Trigger::Event { filter, .. } = &mut self.trigger {
            let combined: EventFilter = match filter.take() {
                Some(previous) => Box::new(move |e: &Event| previous(e) && predicate(e)),
                None => Box::new(predicate),
            };
            *filter = Some(combined);
        }
        self
    }

    /// Set the guard predicate.
    pub fn when<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Event, &D) -> bool + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Set the action callback.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&Event, &mut D) + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Name used in logs and exported diagrams.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The state entered when the transition fires.
    pub fn target(&self) -> StateId {
        self.target
    }

    /// Optional label, for tooling.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the transition is triggered by a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.trigger, Trigger::Timeout(_))
    }

    /// The embedded FSM of a sub-FSM transition.
    pub fn sub_fsm_ref(&self) -> Option<&Fsm<D>> {
        match &self.trigger {
            Trigger::SubFsm(fsm) => Some(fsm),
            _ => None,
        }
    }

    /// Whether the trigger matches the shape of the event.
    ///
    /// Timeout transitions never accept a regular event; they fire through
    /// [`Fsm::fire_timeout`].
    pub(crate) fn accepts(&self, event: &Event, data: &D) -> bool {
        match &self.trigger {
            Trigger::Event { types, filter } => {
                types.contains(&event.event_type()) && filter.as_ref().map_or(true, |f| f(event))
            }
            Trigger::Timeout(_) => false,
            Trigger::SubFsm(fsm) => fsm.can_process(event, data),
        }
    }

    /// Defaults to `true` without a guard.
    pub(crate) fn is_guard_ok(&self, event: &Event, data: &D) -> bool {
        self.guard.as_ref().map_or(true, |g| g(event, data))
    }

    pub(crate) fn can_fire(&self, event: &Event, data: &D) -> bool {
        self.accepts(event, data) && self.is_guard_ok(event, data)
    }

    pub(crate) fn run_action(&mut self, event: &Event, data: &mut D) {
        if let Some(action) = self.action.as_mut() {
            action(event, data);
        }
    }

    pub(crate) fn duration(&self, data: &D) -> Option<Duration> {
        match &self.trigger {
            Trigger::Timeout(duration) => Some(duration(data)),
            _ => None,
        }
    }

    pub(crate) fn sub_fsm_mut(&mut self) -> Option<&mut Fsm<D>> {
        match &mut self.trigger {
            Trigger::SubFsm(fsm) => Some(fsm),
            _ => None,
        }
    }

    pub(crate) fn uninstall(&mut self) {
        if let Some(fsm) = self.sub_fsm_mut() {
            fsm.uninstall();
        }
        self.action = None;
        self.guard = None;
    }

    /// Read-only description for tooling.
    pub fn view(&self) -> TransitionView<'_> {
        let kind = match &self.trigger {
            Trigger::Event { types, .. } => TransitionKind::Event(types),
            Trigger::Timeout(_) => TransitionKind::Timeout,
            Trigger::SubFsm(_) => TransitionKind::SubFsm,
        };
        TransitionView {
            target: self.target,
            name: self.name.as_deref(),
            kind,
            guarded: self.guard.is_some(),
        }
    }
}

impl<D> std::fmt::Debug for Transition<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("name", &self.name)
            .field("kind", &self.view().kind)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Transition variants as seen by tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind<'a> {
    /// Triggered by any of these event types
    Event(&'a [EventType]),
    /// Triggered by a timeout
    Timeout,
    /// Delegates to an embedded FSM
    SubFsm,
}

/// Read-only summary of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionView<'a> {
    /// State entered
    pub target: StateId,
    /// Optional label
    pub name: Option<&'a str>,
    /// Trigger
    pub kind: TransitionKind<'a>,
    /// Whether a guard is attached
    pub guarded: bool,
}

impl TransitionView<'_> {
    /// Label used by exporters: the name, else the accepted event types.
    pub fn label(&self) -> String {
        if let Some(name) = self.name {
            return name.to_string();
        }
        match self.kind {
            TransitionKind::Event(types) => types
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            TransitionKind::Timeout => "timeout".to_string(),
            TransitionKind::SubFsm => "sub-fsm".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{PointerKind, TargetId};

    fn down() -> Event {
        Event::pointer(PointerKind::Down, 0.0, 0.0)
    }

    #[test]
    fn accepts_only_registered_types() {
        let tr = Transition::<()>::on(EventType::MouseDown, StateId(1));
        assert!(tr.accepts(&down(), &()));
        assert!(!tr.accepts(&Event::pointer(PointerKind::Up, 0.0, 0.0), &()));
        assert!(!tr.accepts(&Event::Timeout, &()));
    }

    #[test]
    fn guard_defaults_to_true() {
        let tr = Transition::<u32>::on(EventType::MouseDown, StateId(1));
        assert!(tr.is_guard_ok(&down(), &0));
        let guarded = tr.when(|_, n: &u32| *n > 2);
        assert!(!guarded.can_fire(&down(), &1));
        assert!(guarded.can_fire(&down(), &3));
    }

    #[test]
    fn filters_compose() {
        let tr = Transition::<()>::on(EventType::MouseDown, StateId(1))
            .filter(|e| e.as_pointer().is_some_and(|p| p.client.x > 1.0))
            .filter(|e| e.as_pointer().is_some_and(|p| p.client.y > 1.0));
        assert!(tr.accepts(&Event::pointer(PointerKind::Down, 2.0, 2.0), &()));
        assert!(!tr.accepts(&Event::pointer(PointerKind::Down, 2.0, 0.0), &()));
    }

    #[test]
    fn widget_transition_asks_the_oracle() {
        let oracle: Rc<dyn WidgetOracle> =
            Rc::new(|t: TargetId| (t.0 == 7).then_some(WidgetKind::Button));
        let tr = Transition::<()>::on_widget(EventType::Input, StateId(1), WidgetKind::Button, oracle);
        let mut event = crate::event::WidgetEvent {
            target: Some(TargetId(7)),
            ..Default::default()
        };
        assert!(tr.accepts(&Event::Widget(event.clone()), &()));
        event.target = Some(TargetId(8));
        assert!(!tr.accepts(&Event::Widget(event), &()));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert_eq!(
            Transition::<()>::timeout_after(StateId(1), Duration::ZERO).err(),
            Some(FsmError::InvalidDuration)
        );
        let tr = Transition::<()>::timeout_after(StateId(1), Duration::from_millis(5)).unwrap();
        assert!(tr.is_timeout());
        assert_eq!(tr.duration(&()), Some(Duration::from_millis(5)));
    }

    #[test]
    fn label_falls_back_to_event_types() {
        let tr = Transition::<()>::on_any([EventType::MouseUp, EventType::MouseMove], StateId(1));
        assert_eq!(tr.view().label(), "mouseup|mousemove");
        assert_eq!(tr.named("release").view().label(), "release");
    }
}
