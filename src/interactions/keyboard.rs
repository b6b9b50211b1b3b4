use super::TYPING_IDLE;
use crate::builder::FsmBuilder;
use crate::data::{KeyData, KeysData};
use crate::error::Result;
use crate::event::{Event, EventType};
use crate::fsm::Fsm;
use crate::transition::Transition;

fn copy_key(event: &Event, data: &mut KeyData) {
    if let Some(key) = event.as_key() {
        data.copy(key);
    }
}

fn add_key(event: &Event, data: &mut KeysData) {
    if let Some(key) = event.as_key() {
        data.add_key(key);
    }
}

fn key_fsm(name: &str, event_type: EventType) -> Result<Fsm<KeyData>> {
    FsmBuilder::new(name)
        .terminal_state("typed")
        .transition("init", "typed", |t| Transition::on(event_type, t).with_action(copy_key))
        .build()
}

/// A single key press.
pub fn key_down() -> Result<Fsm<KeyData>> {
    key_fsm("key down", EventType::KeyDown)
}

/// A single key release.
pub fn key_up() -> Result<Fsm<KeyData>> {
    key_fsm("key up", EventType::KeyUp)
}

/// A sequence of released keys, closed after [`TYPING_IDLE`] without typing.
pub fn keys_typed() -> Result<Fsm<KeysData>> {
    FsmBuilder::new("keys typed")
        .std_state("typing")
        .terminal_state("typed")
        .transition("init", "typing", |t| Transition::on(EventType::KeyUp, t).with_action(add_key))
        .transition("typing", "typing", |t| Transition::on(EventType::KeyUp, t).with_action(add_key))
        .transition("typing", "typed", |t| Transition::timeout(t, |_| TYPING_IDLE))
        .build()
}

/// Pressing the escape key. Carries no data, so it fits any data type,
/// typically as the negation of a [`NotFsm`](crate::NotFsm).
pub fn escape_key<D>() -> Result<Fsm<D>> {
    FsmBuilder::new("escape")
        .terminal_state("escaped")
        .transition("init", "escaped", |t| {
            Transition::on(EventType::KeyDown, t)
                .filter(|event| event.as_key().is_some_and(|k| k.key == "Escape"))
                .named("escape")
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Outcome;

    #[test]
    fn key_down_copies_the_key() {
        let mut fsm = key_down().unwrap();
        let mut data = KeyData::default();
        assert_eq!(fsm.process_event(&Event::key(false, "a"), &mut data), Outcome::Ignored);
        assert_eq!(fsm.process_event(&Event::key(true, "a"), &mut data), Outcome::Terminated);
        assert_eq!(data.key, "a");
    }

    #[test]
    fn keys_typed_closes_when_idle() {
        let mut fsm = keys_typed().unwrap();
        let mut data = KeysData::default();
        for key in ["h", "i"] {
            fsm.process_event(&Event::key(true, key), &mut data);
            assert_eq!(fsm.process_event(&Event::key(false, key), &mut data), Outcome::Moved);
        }
        let pending = fsm.pending_timeout().unwrap();
        assert_eq!(pending.duration, TYPING_IDLE);
        assert_eq!(fsm.fire_timeout(pending.id, &mut data), Outcome::Terminated);
        assert_eq!(data.text(), "hi");
    }

    #[test]
    fn escape_filters_other_keys() {
        let mut fsm = escape_key::<()>().unwrap();
        assert!(!fsm.process(&Event::key(true, "Enter"), &mut ()));
        assert!(!fsm.process(&Event::key(false, "Escape"), &mut ()));
        assert_eq!(fsm.process_event(&Event::key(true, "Escape"), &mut ()), Outcome::Terminated);
    }
}
