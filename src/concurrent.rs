//! Concurrent composition of FSMs.
//!
//! All members share the data lent by the caller. A composite keeps its own
//! handler list; member handlers keep observing their own FSM.

use std::collections::HashSet;

use crate::data::InteractionData;
use crate::error::{FsmError, Result};
use crate::event::Event;
use crate::fsm::Fsm;
use crate::handler::{FsmHandler, HandlerId, Handlers, Hook, Notified};
use crate::machine::{Machine, Outcome};
use crate::timeout::{PendingTimeout, TimerId};
use crate::visitor::FsmVisitor;

/// State shared by every composite: members, handlers and the started flag.
struct Members<D> {
    name: String,
    fsms: Vec<Fsm<D>>,
    handlers: Handlers<D>,
    started: bool,
    log: bool,
    uninstalled: bool,
}

impl<D> Members<D> {
    fn new(name: String, fsms: Vec<Fsm<D>>) -> Result<Self> {
        if fsms.is_empty() {
            return Err(FsmError::InvalidCount(0));
        }
        Ok(Self {
            name,
            fsms,
            handlers: Handlers::default(),
            started: false,
            log: false,
            uninstalled: false,
        })
    }

    /// Try the members in order; the first one that reacts claims the event.
    fn dispatch(&mut self, event: &Event, data: &mut D) -> Option<(usize, Outcome)> {
        self.fsms
            .iter_mut()
            .enumerate()
            .find_map(|(i, fsm)| match fsm.process_event(event, data) {
                Outcome::Ignored => None,
                outcome => Some((i, outcome)),
            })
    }

    fn owner_of(&self, id: TimerId) -> Option<usize> {
        self.fsms
            .iter()
            .position(|fsm| fsm.pending_timeout().is_some_and(|p| p.id == id))
    }

    fn pending_timeout(&self) -> Option<PendingTimeout> {
        self.fsms
            .iter()
            .map(Fsm::pending_timeout)
            .fold(None, PendingTimeout::earliest)
    }

    /// Starts or updates the composite after a member moved.
    fn moved(&mut self, now_started: bool, data: &D) -> Outcome {
        let hook = match (self.started, now_started) {
            (false, true) => Hook::Starts,
            (true, _) => Hook::Updates,
            (false, false) => return Outcome::Moved,
        };
        self.started = true;
        if self.log {
            tracing::debug!(fsm = %self.name, ?hook, "composite progressed");
        }
        match self.handlers.notify(hook, data, &self.name, self.log) {
            Notified::Done => Outcome::Moved,
            Notified::CancelRequested => {
                self.cancelled(data);
                for fsm in &mut self.fsms {
                    fsm.reinit();
                }
                Outcome::Aborted
            }
        }
    }

    fn terminated(&mut self, data: &D) {
        if self.log {
            tracing::debug!(fsm = %self.name, "composite terminating");
        }
        if self.started {
            self.handlers.notify(Hook::Stops, data, &self.name, self.log);
        }
        self.reinit();
    }

    /// Notifies a cancellation. Members are left to the caller.
    fn cancelled(&mut self, data: &D) {
        if self.log {
            tracing::debug!(fsm = %self.name, "composite cancelling");
        }
        if self.started {
            self.handlers.notify(Hook::Cancels, data, &self.name, self.log);
        }
        self.started = false;
    }

    fn reinit(&mut self) {
        for fsm in &mut self.fsms {
            fsm.reinit();
        }
        self.started = false;
    }

    fn uninstall(&mut self) {
        for fsm in &mut self.fsms {
            fsm.uninstall();
        }
        self.handlers.clear();
        self.started = false;
        self.uninstalled = true;
    }

    fn log(&mut self, enabled: bool) {
        self.log = enabled;
        for fsm in &mut self.fsms {
            fsm.log(enabled);
        }
    }
}

/// AND composition: started once every mandatory member has started.
///
/// Events go to the first member (mandatory ones, then secondaries) that
/// reacts. A member terminating terminates the composite. A member being
/// cancelled cancels the composite; with `total_reinit` every member is then
/// fully reinitialized, otherwise the other members keep their progress.
pub struct ConcurrentAndFsm<D> {
    members: Members<D>,
    mandatory: usize,
    total_reinit: bool,
}

impl<D> ConcurrentAndFsm<D> {
    /// Composite of `mandatory` members only.
    pub fn new(name: impl Into<String>, mandatory: Vec<Fsm<D>>) -> Result<Self> {
        Self::with_secondaries(name, mandatory, Vec::new(), false)
    }

    /// Composite whose `secondaries` are dispatched to but do not count toward the quorum.
    pub fn with_secondaries(
        name: impl Into<String>,
        mandatory: Vec<Fsm<D>>,
        secondaries: Vec<Fsm<D>>,
        total_reinit: bool,
    ) -> Result<Self> {
        let count = mandatory.len();
        if count == 0 {
            return Err(FsmError::InvalidCount(0));
        }
        let fsms = mandatory.into_iter().chain(secondaries).collect();
        Ok(Self {
            members: Members::new(name.into(), fsms)?,
            mandatory: count,
            total_reinit,
        })
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.members.name
    }

    /// Members that must all have started for the composite to start.
    pub fn mandatory(&self) -> &[Fsm<D>] {
        &self.members.fsms[..self.mandatory]
    }

    /// Members dispatched to without counting toward the quorum.
    pub fn secondaries(&self) -> &[Fsm<D>] {
        &self.members.fsms[self.mandatory..]
    }

    /// Whether a cancellation fully reinitializes every member.
    pub fn is_total_reinit(&self) -> bool {
        self.total_reinit
    }

    fn quorum(&self) -> bool {
        self.mandatory().iter().all(Fsm::is_started)
    }
}

impl<D: InteractionData> ConcurrentAndFsm<D> {
    fn react(&mut self, outcome: Outcome, data: &mut D) -> Outcome {
        match outcome {
            Outcome::Ignored => Outcome::Ignored,
            Outcome::Moved => {
                let quorum = self.quorum();
                self.members.moved(quorum, data)
            }
            Outcome::Terminated => {
                self.members.terminated(data);
                Outcome::Terminated
            }
            Outcome::Cancelled | Outcome::Aborted => {
                self.members.cancelled(data);
                if self.total_reinit {
                    for fsm in &mut self.members.fsms {
                        fsm.full_reinit(data);
                    }
                }
                outcome
            }
        }
    }
}

impl<D: InteractionData> Machine<D> for ConcurrentAndFsm<D> {
    fn name(&self) -> &str {
        &self.members.name
    }

    fn process_event(&mut self, event: &Event, data: &mut D) -> Outcome {
        if self.members.uninstalled {
            return Outcome::Ignored;
        }
        match self.members.dispatch(event, data) {
            Some((_, outcome)) => self.react(outcome, data),
            None => Outcome::Ignored,
        }
    }

    fn pending_timeout(&self) -> Option<PendingTimeout> {
        self.members.pending_timeout()
    }

    fn fire_timeout(&mut self, id: TimerId, data: &mut D) -> Outcome {
        let Some(owner) = self.members.owner_of(id) else {
            return Outcome::Ignored;
        };
        let outcome = self.members.fsms[owner].fire_timeout(id, data);
        self.react(outcome, data)
    }

    fn is_started(&self) -> bool {
        self.members.started
    }

    fn reinit(&mut self) {
        self.members.reinit();
    }

    fn uninstall(&mut self) {
        self.members.uninstall();
    }

    fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        self.members.handlers.add(handler)
    }

    fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.members.handlers.remove(id)
    }

    fn accept_visitor(&self, visitor: &mut dyn FsmVisitor<D>) {
        visitor.visit_and(self);
    }

    fn log(&mut self, enabled: bool) {
        self.members.log(enabled);
    }
}

/// XOR composition: the first member to react becomes the only one
/// receiving events until it returns to its init state.
pub struct ConcurrentXorFsm<D> {
    members: Members<D>,
    active: Option<usize>,
}

impl<D> ConcurrentXorFsm<D> {
    /// Member names must be unique.
    pub fn new(name: impl Into<String>, members: Vec<Fsm<D>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for fsm in &members {
            if !seen.insert(fsm.name()) {
                return Err(FsmError::DuplicateXorMember(fsm.name().to_string()));
            }
        }
        Ok(Self {
            members: Members::new(name.into(), members)?,
            active: None,
        })
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.members.name
    }

    /// Members in routing order.
    pub fn members(&self) -> &[Fsm<D>] {
        &self.members.fsms
    }

    /// The member currently owning the event stream.
    pub fn active_member(&self) -> Option<&Fsm<D>> {
        self.active.map(|i| &self.members.fsms[i])
    }
}

impl<D: InteractionData> ConcurrentXorFsm<D> {
    fn react(&mut self, member: usize, outcome: Outcome, data: &mut D) -> Outcome {
        match outcome {
            Outcome::Ignored => Outcome::Ignored,
            Outcome::Moved => {
                let started = self.members.fsms[member].is_started();
                self.active = started.then_some(member);
                let outcome = self.members.moved(started, data);
                if outcome == Outcome::Aborted {
                    self.active = None;
                }
                outcome
            }
            Outcome::Terminated => {
                self.active = None;
                self.members.terminated(data);
                Outcome::Terminated
            }
            Outcome::Cancelled | Outcome::Aborted => {
                self.active = None;
                self.members.cancelled(data);
                self.members.reinit();
                outcome
            }
        }
    }
}

impl<D: InteractionData> Machine<D> for ConcurrentXorFsm<D> {
    fn name(&self) -> &str {
        &self.members.name
    }

    fn process_event(&mut self, event: &Event, data: &mut D) -> Outcome {
        if self.members.uninstalled {
            return Outcome::Ignored;
        }
        match self.active {
            Some(member) => {
                let outcome = self.members.fsms[member].process_event(event, data);
                self.react(member, outcome, data)
            }
            None => match self.members.dispatch(event, data) {
                Some((member, outcome)) => self.react(member, outcome, data),
                None => Outcome::Ignored,
            },
        }
    }

    fn pending_timeout(&self) -> Option<PendingTimeout> {
        match self.active {
            Some(member) => self.members.fsms[member].pending_timeout(),
            None => self.members.pending_timeout(),
        }
    }

    fn fire_timeout(&mut self, id: TimerId, data: &mut D) -> Outcome {
        let Some(owner) = self.members.owner_of(id) else {
            return Outcome::Ignored;
        };
        if self.active.is_some_and(|active| active != owner) {
            return Outcome::Ignored;
        }
        let outcome = self.members.fsms[owner].fire_timeout(id, data);
        self.react(owner, outcome, data)
    }

    fn is_started(&self) -> bool {
        self.members.started
    }

    fn reinit(&mut self) {
        self.active = None;
        self.members.reinit();
    }

    fn uninstall(&mut self) {
        self.active = None;
        self.members.uninstall();
    }

    fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        self.members.handlers.add(handler)
    }

    fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.members.handlers.remove(id)
    }

    fn accept_visitor(&self, visitor: &mut dyn FsmVisitor<D>) {
        visitor.visit_xor(self);
    }

    fn log(&mut self, enabled: bool) {
        self.members.log(enabled);
    }
}

const MAIN: usize = 0;
const NEGATION: usize = 1;

/// NOT composition: runs `main` unless `negation` completes first.
///
/// Both members receive events, `main` first. An event the negation FSM
/// consumes is accepted without touching `main`. When the negation FSM
/// terminates, the main FSM is cancelled, the composite notifies its own
/// cancellation and reports [`Outcome::Aborted`].
pub struct NotFsm<D> {
    members: Members<D>,
}

impl<D> NotFsm<D> {
    /// Composite running `main` until `negation` terminates.
    pub fn new(name: impl Into<String>, main: Fsm<D>, negation: Fsm<D>) -> Result<Self> {
        Ok(Self {
            members: Members::new(name.into(), vec![main, negation])?,
        })
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.members.name
    }

    /// The FSM recognizing the interaction.
    pub fn main(&self) -> &Fsm<D> {
        &self.members.fsms[MAIN]
    }

    /// The FSM whose completion cancels `main`.
    pub fn negation(&self) -> &Fsm<D> {
        &self.members.fsms[NEGATION]
    }
}

impl<D: InteractionData> NotFsm<D> {
    fn react(&mut self, member: usize, outcome: Outcome, data: &mut D) -> Outcome {
        match (member, outcome) {
            (_, Outcome::Ignored) => Outcome::Ignored,
            (NEGATION, Outcome::Terminated) => {
                if self.members.log {
                    tracing::debug!(fsm = %self.members.name, "negation completed, cancelling main FSM");
                }
                self.members.fsms[MAIN].on_cancelling(data);
                self.members.cancelled(data);
                self.members.reinit();
                Outcome::Aborted
            }
            // a negation that rewinds on its own leaves main running
            (NEGATION, Outcome::Cancelled | Outcome::Aborted) => Outcome::Moved,
            (_, Outcome::Moved) => {
                let started = self.members.fsms[MAIN].is_started();
                self.members.moved(started, data)
            }
            (_, Outcome::Terminated) => {
                self.members.terminated(data);
                Outcome::Terminated
            }
            (_, Outcome::Cancelled | Outcome::Aborted) => {
                self.members.cancelled(data);
                self.members.reinit();
                outcome
            }
        }
    }
}

impl<D: InteractionData> Machine<D> for NotFsm<D> {
    fn name(&self) -> &str {
        &self.members.name
    }

    fn process_event(&mut self, event: &Event, data: &mut D) -> Outcome {
        if self.members.uninstalled {
            return Outcome::Ignored;
        }
        match self.members.dispatch(event, data) {
            Some((member, outcome)) => self.react(member, outcome, data),
            None => Outcome::Ignored,
        }
    }

    fn pending_timeout(&self) -> Option<PendingTimeout> {
        self.members.pending_timeout()
    }

    fn fire_timeout(&mut self, id: TimerId, data: &mut D) -> Outcome {
        let Some(owner) = self.members.owner_of(id) else {
            return Outcome::Ignored;
        };
        let outcome = self.members.fsms[owner].fire_timeout(id, data);
        self.react(owner, outcome, data)
    }

    fn is_started(&self) -> bool {
        self.members.started
    }

    fn reinit(&mut self) {
        self.members.reinit();
    }

    fn uninstall(&mut self) {
        self.members.uninstall();
    }

    fn add_handler(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        self.members.handlers.add(handler)
    }

    fn remove_handler(&mut self, id: HandlerId) -> bool {
        self.members.handlers.remove(id)
    }

    fn accept_visitor(&self, visitor: &mut dyn FsmVisitor<D>) {
        visitor.visit_not(self);
    }

    fn log(&mut self, enabled: bool) {
        self.members.log(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventType, PointerKind};
    use crate::handler::HandlerResult;
    use crate::state::StateId;
    use crate::transition::Transition;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<&'static str>>>);

    impl FsmHandler<()> for Recorder {
        fn fsm_starts(&mut self, _: &()) -> HandlerResult {
            self.0.borrow_mut().push("starts");
            Ok(())
        }

        fn fsm_updates(&mut self, _: &()) -> HandlerResult {
            self.0.borrow_mut().push("updates");
            Ok(())
        }

        fn fsm_stops(&mut self, _: &()) -> HandlerResult {
            self.0.borrow_mut().push("stops");
            Ok(())
        }

        fn fsm_cancels(&mut self, _: &()) -> HandlerResult {
            self.0.borrow_mut().push("cancels");
            Ok(())
        }
    }

    fn ev(kind: PointerKind) -> Event {
        Event::pointer(kind, 0.0, 0.0)
    }

    /// init --first--> middle --second--> end (terminal); middle --cancel--> cancelled
    fn chain(name: &str, first: EventType, second: EventType, cancel: EventType) -> Fsm<()> {
        let mut fsm = Fsm::new(name);
        let middle = fsm.add_std_state("middle").unwrap();
        let end = fsm.add_terminal_state("end").unwrap();
        let cancelled = fsm.add_cancelling_state("cancelled").unwrap();
        fsm.add_transition(StateId::INIT, Transition::on(first, middle)).unwrap();
        fsm.add_transition(middle, Transition::on(second, end)).unwrap();
        fsm.add_transition(middle, Transition::on(cancel, cancelled)).unwrap();
        fsm
    }

    fn recorder<M: Machine<()>>(machine: &mut M) -> Rc<RefCell<Vec<&'static str>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        machine.add_handler(Box::new(Recorder(Rc::clone(&log))));
        log
    }

    #[test]
    fn and_starts_only_with_full_quorum() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let b = chain("b", EventType::MouseEnter, EventType::MouseLeave, EventType::Click);
        let mut and = ConcurrentAndFsm::new("and", vec![a, b]).unwrap();
        let log = recorder(&mut and);

        assert!(and.process(&ev(PointerKind::Down), &mut ()));
        assert!(and.mandatory()[0].is_started());
        assert!(!and.is_started());
        assert!(log.borrow().is_empty());

        assert!(and.process(&ev(PointerKind::Enter), &mut ()));
        assert!(and.is_started());
        assert_eq!(*log.borrow(), vec!["starts"]);
    }

    #[test]
    fn and_member_termination_terminates_composite() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let b = chain("b", EventType::MouseEnter, EventType::MouseLeave, EventType::Click);
        let mut and = ConcurrentAndFsm::new("and", vec![a, b]).unwrap();
        let log = recorder(&mut and);
        and.process(&ev(PointerKind::Down), &mut ());
        and.process(&ev(PointerKind::Enter), &mut ());

        assert_eq!(and.process_event(&ev(PointerKind::Up), &mut ()), Outcome::Terminated);
        assert!(!and.is_started());
        assert!(and.mandatory().iter().all(|m| m.current_state() == StateId::INIT));
        assert_eq!(*log.borrow(), vec!["starts", "stops"]);
    }

    #[test]
    fn and_cancellation_keeps_siblings_without_total_reinit() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let b = chain("b", EventType::MouseEnter, EventType::MouseLeave, EventType::MouseMove);
        let mut and = ConcurrentAndFsm::new("and", vec![a, b]).unwrap();
        and.process(&ev(PointerKind::Down), &mut ());
        and.process(&ev(PointerKind::Enter), &mut ());

        assert_eq!(and.process_event(&ev(PointerKind::Move), &mut ()), Outcome::Cancelled);
        assert!(!and.is_started());
        assert!(and.mandatory()[0].is_started());
        assert!(!and.mandatory()[1].is_started());
    }

    #[test]
    fn and_total_reinit_resets_every_member() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let b = chain("b", EventType::MouseEnter, EventType::MouseLeave, EventType::MouseMove);
        let mut and = ConcurrentAndFsm::with_secondaries("and", vec![a, b], Vec::new(), true).unwrap();
        and.process(&ev(PointerKind::Down), &mut ());
        and.process(&ev(PointerKind::Enter), &mut ());
        and.process(&ev(PointerKind::Move), &mut ());
        assert!(and.mandatory().iter().all(|m| !m.is_started()));
    }

    #[test]
    fn and_secondaries_do_not_count_toward_quorum() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let s = chain("s", EventType::MouseEnter, EventType::MouseLeave, EventType::Click);
        let mut and = ConcurrentAndFsm::with_secondaries("and", vec![a], vec![s], false).unwrap();
        assert!(and.process(&ev(PointerKind::Enter), &mut ()));
        assert!(and.secondaries()[0].is_started());
        assert!(!and.is_started());
        assert!(and.process(&ev(PointerKind::Down), &mut ()));
        assert!(and.is_started());
    }

    #[test]
    fn and_rejects_empty_quorum() {
        assert_eq!(
            ConcurrentAndFsm::<()>::new("and", Vec::new()).err(),
            Some(FsmError::InvalidCount(0))
        );
    }

    #[test]
    fn xor_routes_exclusively_to_active_member() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let b = chain("b", EventType::MouseDown, EventType::MouseMove, EventType::Click);
        let mut xor = ConcurrentXorFsm::new("xor", vec![a, b]).unwrap();
        let log = recorder(&mut xor);

        assert!(xor.process(&ev(PointerKind::Down), &mut ()));
        assert_eq!(xor.active_member().map(Fsm::name), Some("a"));
        assert!(!xor.members()[1].is_started());

        // b would accept a mousemove if it were started, a does not
        assert!(!xor.process(&ev(PointerKind::Move), &mut ()));
        assert_eq!(xor.process_event(&ev(PointerKind::Up), &mut ()), Outcome::Terminated);
        assert!(xor.active_member().is_none());
        assert_eq!(*log.borrow(), vec!["starts", "stops"]);
    }

    #[test]
    fn xor_rejects_duplicate_members() {
        let a = chain("same", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let b = chain("same", EventType::MouseEnter, EventType::MouseUp, EventType::Click);
        assert_eq!(
            ConcurrentXorFsm::new("xor", vec![a, b]).err(),
            Some(FsmError::DuplicateXorMember("same".into()))
        );
    }

    #[test]
    fn not_aborts_when_negation_completes() {
        let main = chain("main", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let mut negation = Fsm::new("escape");
        let done = negation.add_terminal_state("done").unwrap();
        negation
            .add_transition(StateId::INIT, Transition::on(EventType::KeyDown, done))
            .unwrap();
        let mut not = NotFsm::new("not", main, negation).unwrap();
        let log = recorder(&mut not);

        assert_eq!(not.process_event(&ev(PointerKind::Down), &mut ()), Outcome::Moved);
        assert!(not.is_started());
        assert_eq!(not.process_event(&Event::key(true, "Escape"), &mut ()), Outcome::Aborted);
        assert!(!not.is_started());
        assert_eq!(not.main().current_state(), StateId::INIT);
        assert_eq!(*log.borrow(), vec!["starts", "cancels"]);

        // the main FSM works again afterwards
        not.process_event(&ev(PointerKind::Down), &mut ());
        assert_eq!(not.process_event(&ev(PointerKind::Up), &mut ()), Outcome::Terminated);
    }

    fn key(pressed: bool) -> Event {
        Event::key(pressed, "a")
    }

    fn not_with_key_chord() -> NotFsm<()> {
        let main = chain("main", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let negation = chain("chord", EventType::KeyDown, EventType::KeyUp, EventType::MouseLeave);
        NotFsm::new("not", main, negation).unwrap()
    }

    #[test]
    fn not_accepts_partial_negation_and_lets_main_finish() {
        let mut not = not_with_key_chord();
        let log = recorder(&mut not);

        assert_eq!(not.process_event(&ev(PointerKind::Down), &mut ()), Outcome::Moved);
        assert_eq!(not.process_event(&key(true), &mut ()), Outcome::Moved);
        assert!(not.negation().is_started());
        assert!(not.main().is_started());

        assert_eq!(not.process_event(&ev(PointerKind::Up), &mut ()), Outcome::Terminated);
        assert!(!not.negation().is_started());
        assert_eq!(*log.borrow(), vec!["starts", "updates", "stops"]);
    }

    #[test]
    fn not_aborts_when_multi_step_negation_completes_later() {
        let mut not = not_with_key_chord();
        let log = recorder(&mut not);

        not.process_event(&ev(PointerKind::Down), &mut ());
        assert!(not.process(&key(true), &mut ()));
        assert_eq!(not.process_event(&key(false), &mut ()), Outcome::Aborted);
        assert_eq!(not.main().current_state(), StateId::INIT);
        assert_eq!(*log.borrow(), vec!["starts", "updates", "cancels"]);
    }

    #[test]
    fn not_keeps_main_when_negation_cancels_itself() {
        let mut not = not_with_key_chord();
        not.process_event(&ev(PointerKind::Down), &mut ());
        not.process_event(&key(true), &mut ());

        assert_eq!(not.process_event(&ev(PointerKind::Leave), &mut ()), Outcome::Moved);
        assert!(!not.negation().is_started());
        assert!(not.main().is_started());
        assert!(not.is_started());
        assert_eq!(not.process_event(&ev(PointerKind::Up), &mut ()), Outcome::Terminated);
    }

    #[test]
    fn xor_ignores_timeouts_of_inactive_members() {
        let a = chain("a", EventType::MouseDown, EventType::MouseUp, EventType::Click);
        let mut b = Fsm::new("b");
        let waiting = b.add_std_state("waiting").unwrap();
        let typing = b.add_std_state("typing").unwrap();
        let expired = b.add_terminal_state("expired").unwrap();
        b.add_transition(StateId::INIT, Transition::on(EventType::KeyDown, waiting)).unwrap();
        b.add_transition(waiting, Transition::on(EventType::KeyUp, typing)).unwrap();
        b.add_transition(
            waiting,
            Transition::timeout_after(expired, std::time::Duration::from_millis(50)).unwrap(),
        )
        .unwrap();
        b.set_starting_state(typing).unwrap();
        let mut xor = ConcurrentXorFsm::new("xor", vec![a, b]).unwrap();

        // b moves without starting, so it does not become active
        assert!(xor.process(&key(true), &mut ()));
        assert!(xor.active_member().is_none());
        let foreign = xor.members()[1].pending_timeout().unwrap().id;

        assert!(xor.process(&ev(PointerKind::Down), &mut ()));
        assert_eq!(xor.active_member().map(Fsm::name), Some("a"));
        assert!(xor.pending_timeout().is_none());

        assert_eq!(xor.fire_timeout(foreign, &mut ()), Outcome::Ignored);
        assert_eq!(xor.members()[1].current_state(), waiting);
    }

    #[test]
    fn composite_routes_timeouts_to_owner() {
        let mut timed = Fsm::new("timed");
        let waiting = timed.add_std_state("waiting").unwrap();
        let expired = timed.add_terminal_state("expired").unwrap();
        timed
            .add_transition(StateId::INIT, Transition::on(EventType::MouseDown, waiting))
            .unwrap();
        timed
            .add_transition(
                waiting,
                Transition::timeout_after(expired, std::time::Duration::from_millis(50)).unwrap(),
            )
            .unwrap();
        let other = chain("other", EventType::KeyDown, EventType::KeyUp, EventType::Click);
        let mut and = ConcurrentAndFsm::with_secondaries("and", vec![timed], vec![other], false).unwrap();

        and.process(&ev(PointerKind::Down), &mut ());
        let pending = and.pending_timeout().unwrap();
        assert_eq!(and.fire_timeout(pending.id, &mut ()), Outcome::Terminated);
        assert!(and.pending_timeout().is_none());
    }
}
