//! State identifiers and variants

use crate::transition::Transition;

/// Index of a state inside its owning [`Fsm`](crate::Fsm).
///
/// Ids are only meaningful for the FSM that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// The init state of every FSM.
    pub const INIT: StateId = StateId(0);

    /// Position of the state in its FSM.
    pub fn index(self) -> usize {
        self.0
    }
}

/// State variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// Entry point, output-only. Exactly one per FSM.
    Init,
    /// Intermediate state, both input and output.
    Std,
    /// Input-only; entering it ends the FSM normally.
    Terminal,
    /// Input-only; entering it ends the FSM by cancellation.
    Cancelling,
}

impl StateKind {
    /// Whether transitions may leave this state.
    pub fn is_output(self) -> bool {
        matches!(self, Self::Init | Self::Std)
    }

    /// Whether transitions may enter this state.
    pub fn is_input(self) -> bool {
        !matches!(self, Self::Init)
    }
}

/// Read-only view of a state handed to clients and visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateView<'a> {
    /// Id within the FSM
    pub id: StateId,
    /// Unique name within the FSM
    pub name: &'a str,
    /// Variant
    pub kind: StateKind,
}

pub(crate) struct StateNode<D> {
    pub(crate) name: String,
    pub(crate) kind: StateKind,
    /// Insertion order is evaluation order
    pub(crate) transitions: Vec<Transition<D>>,
}

impl<D> StateNode<D> {
    pub(crate) fn new(name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transitions: Vec::new(),
        }
    }

    pub(crate) fn view(&self, id: StateId) -> StateView<'_> {
        StateView {
            id,
            name: &self.name,
            kind: self.kind,
        }
    }

    /// Index of the first timeout transition, if the state owns one.
    pub(crate) fn timeout_transition(&self) -> Option<usize> {
        self.transitions.iter().position(Transition::is_timeout)
    }

    pub(crate) fn uninstall(&mut self) {
        for tr in &mut self.transitions {
            tr.uninstall();
        }
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_and_input_capabilities() {
        assert!(StateKind::Init.is_output());
        assert!(!StateKind::Init.is_input());
        assert!(StateKind::Std.is_output() && StateKind::Std.is_input());
        assert!(!StateKind::Terminal.is_output());
        assert!(!StateKind::Cancelling.is_output());
        assert!(StateKind::Cancelling.is_input());
    }
}
