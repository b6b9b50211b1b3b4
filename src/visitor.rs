//! Read-only traversal of FSM graphs.
//!
//! [`walk_fsm`] visits the states reachable from the init state depth-first,
//! each state once, calling the hook matching its variant and then the hook of
//! each outgoing transition before descending into its target. Visitors never
//! receive mutable access to a machine.

use crate::concurrent::{ConcurrentAndFsm, ConcurrentXorFsm, NotFsm};
use crate::fsm::Fsm;
use crate::state::{StateId, StateKind, StateView};
use crate::transition::{Transition, TransitionKind};

/// Hooks called during a depth-first traversal. Every hook has a default.
pub trait FsmVisitor<D> {
    /// Walks the states of `fsm` by default.
    fn visit_fsm(&mut self, fsm: &Fsm<D>) {
        walk_fsm(self, fsm);
    }

    /// The init state.
    fn visit_init_state(&mut self, _state: StateView<'_>) {}

    /// A standard state.
    fn visit_std_state(&mut self, _state: StateView<'_>) {}

    /// A terminal state.
    fn visit_terminal_state(&mut self, _state: StateView<'_>) {}

    /// A cancelling state.
    fn visit_cancelling_state(&mut self, _state: StateView<'_>) {}

    /// An event transition leaving `source`.
    fn visit_transition(&mut self, _source: StateView<'_>, _transition: &Transition<D>) {}

    /// A timeout transition leaving `source`.
    fn visit_timeout_transition(&mut self, _source: StateView<'_>, _transition: &Transition<D>) {}

    /// Descends into the embedded FSM by default.
    fn visit_sub_fsm_transition(&mut self, _source: StateView<'_>, transition: &Transition<D>) {
        if let Some(sub) = transition.sub_fsm_ref() {
            self.visit_fsm(sub);
        }
    }

    /// Visits every member, mandatory ones first, by default.
    fn visit_and(&mut self, fsm: &ConcurrentAndFsm<D>) {
        for member in fsm.mandatory().iter().chain(fsm.secondaries()) {
            self.visit_fsm(member);
        }
    }

    /// Visits every member by default.
    fn visit_xor(&mut self, fsm: &ConcurrentXorFsm<D>) {
        for member in fsm.members() {
            self.visit_fsm(member);
        }
    }

    /// Visits main, then negation, by default.
    fn visit_not(&mut self, fsm: &NotFsm<D>) {
        self.visit_fsm(fsm.main());
        self.visit_fsm(fsm.negation());
    }
}

/// Depth-first walk of `fsm` from its init state.
pub fn walk_fsm<D, V>(visitor: &mut V, fsm: &Fsm<D>)
where
    V: FsmVisitor<D> + ?Sized,
{
    let mut visited = vec![false; fsm.states().count()];
    walk_state(visitor, fsm, StateId::INIT, &mut visited);
}

fn walk_state<D, V>(visitor: &mut V, fsm: &Fsm<D>, id: StateId, visited: &mut [bool])
where
    V: FsmVisitor<D> + ?Sized,
{
    match visited.get_mut(id.index()) {
        Some(seen) if !*seen => *seen = true,
        _ => return,
    }
    let Some(state) = fsm.state(id) else {
        return;
    };
    match state.kind {
        StateKind::Init => visitor.visit_init_state(state),
        StateKind::Std => visitor.visit_std_state(state),
        StateKind::Terminal => visitor.visit_terminal_state(state),
        StateKind::Cancelling => visitor.visit_cancelling_state(state),
    }
    for transition in fsm.transitions(id) {
        match transition.view().kind {
            TransitionKind::Event(_) => visitor.visit_transition(state, transition),
            TransitionKind::Timeout => visitor.visit_timeout_transition(state, transition),
            TransitionKind::SubFsm => visitor.visit_sub_fsm_transition(state, transition),
        }
        walk_state(visitor, fsm, transition.target(), visited);
    }
}

/// Collects the names of reachable states, in visit order.
#[derive(Debug, Default, Clone)]
pub struct StateCollector {
    /// State names in visit order
    pub names: Vec<String>,
}

impl StateCollector {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D> FsmVisitor<D> for StateCollector {
    fn visit_init_state(&mut self, state: StateView<'_>) {
        self.names.push(state.name.to_string());
    }

    fn visit_std_state(&mut self, state: StateView<'_>) {
        self.names.push(state.name.to_string());
    }

    fn visit_terminal_state(&mut self, state: StateView<'_>) {
        self.names.push(state.name.to_string());
    }

    fn visit_cancelling_state(&mut self, state: StateView<'_>) {
        self.names.push(state.name.to_string());
    }
}
