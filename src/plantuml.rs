//! PlantUML diagram generation

use crate::concurrent::{ConcurrentAndFsm, ConcurrentXorFsm, NotFsm};
use crate::fsm::Fsm;
use crate::machine::Machine;
use crate::state::StateView;
use crate::transition::Transition;
use crate::visitor::{walk_fsm, FsmVisitor};

struct Scope {
    prefix: String,
    /// State names indexed by id
    names: Vec<String>,
}

/// Exports machines as PlantUML state diagrams.
///
/// Sub-FSMs and composite members are nested as composite states; the
/// current state of every started FSM is tagged `<<Current>>`.
#[derive(Default)]
pub struct PlantUmlVisitor {
    lines: Vec<String>,
    scopes: Vec<Scope>,
    depth: usize,
}

impl PlantUmlVisitor {
    /// An empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `machine` as a complete `@startuml ... @enduml` document.
    pub fn export<D, M>(machine: &M) -> String
    where
        M: Machine<D> + ?Sized,
        D: crate::data::InteractionData,
    {
        let mut visitor = Self::new();
        machine.accept_visitor(&mut visitor);
        visitor.finish()
    }

    /// The visited machines as a `@startuml ... @enduml` document.
    pub fn finish(self) -> String {
        let mut plantuml = String::new();
        plantuml.push_str("@startuml\n");
        plantuml.push_str("skinparam state {\n");
        plantuml.push_str("  BackgroundColor<<Current>> YellowGreen\n");
        plantuml.push_str("  BackgroundColor<<Cancelling>> LightCoral\n");
        plantuml.push_str("}\n\n");
        for line in self.lines {
            plantuml.push_str(&line);
            plantuml.push('\n');
        }
        plantuml.push_str("@enduml\n");
        plantuml
    }

    fn push(&mut self, line: String) {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{indent}{line}"));
    }

    fn alias(&self, state: &str) -> String {
        let prefix = self.scopes.last().map(|s| s.prefix.as_str()).unwrap_or("");
        format!("{prefix}{}", sanitize(state))
    }

    fn open(&mut self, label: &str) {
        let alias = format!("{}_{}", sanitize(label), self.lines.len());
        self.push(format!("state \"{label}\" as {alias} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push("}".to_string());
    }

    fn members<'a, D: 'a, I>(&mut self, label: &str, members: I)
    where
        I: IntoIterator<Item = &'a Fsm<D>>,
    {
        self.open(label);
        for (i, member) in members.into_iter().enumerate() {
            if i > 0 {
                self.push("--".to_string());
            }
            self.visit_fsm(member);
        }
        self.close();
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl<D> FsmVisitor<D> for PlantUmlVisitor {
    fn visit_fsm(&mut self, fsm: &Fsm<D>) {
        let nested = self.depth > 0 || !self.scopes.is_empty();
        if nested {
            self.open(fsm.name());
        }
        let prefix = format!("{}_{}_", sanitize(fsm.name()), self.lines.len());
        let names = fsm.states().map(|s| s.name.to_string()).collect();
        self.scopes.push(Scope { prefix, names });
        walk_fsm(self, fsm);
        if fsm.is_started() {
            let current = fsm.current_state_view().name.to_string();
            let alias = self.alias(&current);
            self.push(format!("state {alias} <<Current>>"));
        }
        self.scopes.pop();
        if nested {
            self.close();
        }
    }

    fn visit_init_state(&mut self, state: StateView<'_>) {
        let alias = self.alias(state.name);
        self.push(format!("state \"{}\" as {alias}", state.name));
        self.push(format!("[*] --> {alias}"));
    }

    fn visit_std_state(&mut self, state: StateView<'_>) {
        let alias = self.alias(state.name);
        self.push(format!("state \"{}\" as {alias}", state.name));
    }

    fn visit_terminal_state(&mut self, state: StateView<'_>) {
        let alias = self.alias(state.name);
        self.push(format!("state \"{}\" as {alias}", state.name));
        self.push(format!("{alias} --> [*]"));
    }

    fn visit_cancelling_state(&mut self, state: StateView<'_>) {
        let alias = self.alias(state.name);
        self.push(format!("state \"{}\" as {alias} <<Cancelling>>", state.name));
        self.push(format!("{alias} --> [*]"));
    }

    fn visit_transition(&mut self, source: StateView<'_>, transition: &Transition<D>) {
        self.edge(source, transition, None);
    }

    fn visit_timeout_transition(&mut self, source: StateView<'_>, transition: &Transition<D>) {
        self.edge(source, transition, None);
    }

    fn visit_sub_fsm_transition(&mut self, source: StateView<'_>, transition: &Transition<D>) {
        if let Some(sub) = transition.sub_fsm_ref() {
            self.edge(source, transition, Some(sub.name()));
            self.visit_fsm(sub);
        }
    }

    fn visit_and(&mut self, fsm: &ConcurrentAndFsm<D>) {
        let label = format!("AND {}", fsm.name());
        self.members(&label, fsm.mandatory().iter().chain(fsm.secondaries()));
    }

    fn visit_xor(&mut self, fsm: &ConcurrentXorFsm<D>) {
        let label = format!("XOR {}", fsm.name());
        self.members(&label, fsm.members());
    }

    fn visit_not(&mut self, fsm: &NotFsm<D>) {
        let label = format!("NOT {}", fsm.name());
        self.members(&label, [fsm.main(), fsm.negation()]);
    }
}

impl PlantUmlVisitor {
    fn edge<D>(&mut self, source: StateView<'_>, transition: &Transition<D>, sub: Option<&str>) {
        let Some(target) = self
            .scopes
            .last()
            .and_then(|scope| scope.names.get(transition.target().index()))
            .cloned()
        else {
            return;
        };
        let view = transition.view();
        let mut label = match sub {
            Some(name) => format!("[{name}]"),
            None => view.label(),
        };
        if view.guarded {
            label.push_str(" [guarded]");
        }
        let line = format!(
            "{} --> {} : {label}",
            self.alias(source.name),
            self.alias(&target)
        );
        self.push(line);
    }
}
