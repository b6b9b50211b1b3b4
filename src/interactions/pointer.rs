use std::time::Duration;

use super::{at_least_one, positive, DOUBLE_CLICK_GAP, REPEAT_GAP};
use crate::builder::FsmBuilder;
use crate::concurrent::NotFsm;
use crate::data::{PointData, PointsData, ScrollData, SrcTgtPointsData, WheelData};
use crate::error::Result;
use crate::event::{Event, EventType};
use crate::fsm::Fsm;
use crate::interactions::escape_key;
use crate::transition::Transition;

fn copy_point(event: &Event, data: &mut PointData) {
    if let Some(pointer) = event.as_pointer() {
        data.copy(pointer);
    }
}

/// A single mouse press.
pub fn press() -> Result<Fsm<PointData>> {
    FsmBuilder::new("press")
        .terminal_state("pressed")
        .transition("init", "pressed", |t| {
            Transition::on(EventType::MouseDown, t).with_action(copy_point)
        })
        .build()
}

/// A single click.
pub fn click() -> Result<Fsm<PointData>> {
    FsmBuilder::new("click")
        .terminal_state("clicked")
        .transition("init", "clicked", |t| {
            Transition::on(EventType::Click, t).with_action(copy_point)
        })
        .build()
}

/// `count` clicks of the same button, each within [`REPEAT_GAP`] of the previous one.
pub fn clicks(count: usize) -> Result<Fsm<PointsData>> {
    let count = at_least_one(count)?;
    let add = |event: &Event, data: &mut PointsData| {
        if let Some(pointer) = event.as_pointer() {
            data.add_point(pointer);
        }
    };
    let same_button = |event: &Event, data: &PointsData| match (data.last_button(), event.as_pointer()) {
        (Some(button), Some(pointer)) => button == pointer.button,
        _ => true,
    };
    FsmBuilder::new(format!("{count} clicks"))
        .std_state("clicked")
        .terminal_state("ended")
        .cancelling_state("timeouted")
        .transition("init", "ended", |t| {
            Transition::on(EventType::Click, t)
                .when(move |_, _| count == 1)
                .with_action(add)
        })
        .transition("init", "clicked", |t| {
            Transition::on(EventType::Click, t).with_action(add)
        })
        .transition("clicked", "ended", |t| {
            Transition::on(EventType::Click, t)
                .when(move |event: &Event, data: &PointsData| {
                    data.points.len() + 1 == count && same_button(event, data)
                })
                .with_action(add)
        })
        .transition("clicked", "clicked", |t| {
            Transition::on(EventType::Click, t)
                .when(move |event: &Event, data: &PointsData| {
                    data.points.len() + 1 < count && same_button(event, data)
                })
                .with_action(add)
        })
        .transition("clicked", "timeouted", |t| {
            Transition::timeout(t, |_| REPEAT_GAP)
        })
        .build()
}

/// Two clicks, the second within [`DOUBLE_CLICK_GAP`] of the first.
pub fn double_click() -> Result<Fsm<PointData>> {
    let first = click()?;
    let second = click()?;
    FsmBuilder::new("double click")
        .std_state("clicked")
        .terminal_state("double clicked")
        .cancelling_state("timeouted")
        .sub_fsm("init", "clicked", first)
        .sub_fsm("clicked", "double clicked", second)
        .transition("clicked", "timeouted", |t| {
            Transition::timeout(t, |_| DOUBLE_CLICK_GAP)
        })
        .build()
}

/// A mouse button held for `duration`. Releasing or moving before cancels.
pub fn long_mouse_down(duration: Duration) -> Result<Fsm<PointData>> {
    let duration = positive(duration)?;
    FsmBuilder::new("long mouse down")
        .std_state("down")
        .terminal_state("timeouted")
        .cancelling_state("cancelled")
        .transition("init", "down", |t| {
            Transition::on(EventType::MouseDown, t).with_action(copy_point)
        })
        .transition("down", "cancelled", |t| {
            Transition::on_any([EventType::MouseUp, EventType::MouseMove], t)
        })
        .transition("down", "timeouted", |t| {
            Transition::timeout(t, move |_| duration)
        })
        .build()
}

/// Drag-and-drop: press, one or more moves, release. Starts on the first move.
///
/// Releasing without moving cancels.
pub fn dnd() -> Result<Fsm<SrcTgtPointsData>> {
    let press = |event: &Event, data: &mut SrcTgtPointsData| {
        if let Some(pointer) = event.as_pointer() {
            data.copy_src(pointer);
            data.copy_tgt(pointer);
        }
    };
    let drag = |event: &Event, data: &mut SrcTgtPointsData| {
        if let Some(pointer) = event.as_pointer() {
            data.copy_tgt(pointer);
        }
    };
    FsmBuilder::new("dnd")
        .std_state("pressed")
        .std_state("dragged")
        .terminal_state("released")
        .cancelling_state("cancelled")
        .starting_state("dragged")
        .transition("init", "pressed", |t| {
            Transition::on(EventType::MouseDown, t).with_action(press)
        })
        .transition("pressed", "dragged", |t| {
            Transition::on(EventType::MouseMove, t).with_action(drag)
        })
        .transition("pressed", "cancelled", |t| Transition::on(EventType::MouseUp, t))
        .transition("dragged", "dragged", |t| {
            Transition::on(EventType::MouseMove, t).with_action(drag)
        })
        .transition("dragged", "released", |t| {
            Transition::on(EventType::MouseUp, t).with_action(drag)
        })
        .build()
}

/// [`dnd`] that the escape key cancels.
pub fn cancellable_dnd() -> Result<NotFsm<SrcTgtPointsData>> {
    NotFsm::new("cancellable dnd", dnd()?, escape_key()?)
}

/// A single wheel event.
pub fn wheel() -> Result<Fsm<WheelData>> {
    FsmBuilder::new("wheel")
        .terminal_state("wheeled")
        .transition("init", "wheeled", |t| {
            Transition::on(EventType::Wheel, t).with_action(|event, data: &mut WheelData| {
                if let Some(wheel) = event.as_wheel() {
                    data.copy(wheel);
                }
            })
        })
        .build()
}

/// A single scroll event.
pub fn scroll() -> Result<Fsm<ScrollData>> {
    FsmBuilder::new("scroll")
        .terminal_state("scrolled")
        .transition("init", "scrolled", |t| {
            Transition::on(EventType::Scroll, t).with_action(|event, data: &mut ScrollData| {
                if let Some(scroll) = event.as_scroll() {
                    data.set_scroll(scroll);
                }
            })
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsmError;
    use crate::event::{PointerEvent, PointerKind};
    use crate::machine::{Machine, Outcome};

    fn at(kind: PointerKind, x: f64) -> Event {
        Event::pointer(kind, x, 0.0)
    }

    fn button_click(button: i16) -> Event {
        Event::Pointer(PointerEvent {
            kind: PointerKind::Click,
            button,
            ..PointerEvent::default()
        })
    }

    #[test]
    fn long_mouse_down_rejects_zero_duration() {
        assert_eq!(long_mouse_down(Duration::ZERO).err(), Some(FsmError::InvalidDuration));
    }

    #[test]
    fn long_mouse_down_cancels_on_move() {
        let mut fsm = long_mouse_down(Duration::from_millis(1000)).unwrap();
        let mut data = PointData::default();
        fsm.process_event(&at(PointerKind::Down, 0.0), &mut data);
        assert!(fsm.pending_timeout().is_some());
        assert_eq!(fsm.process_event(&at(PointerKind::Move, 1.0), &mut data), Outcome::Cancelled);
        assert!(fsm.pending_timeout().is_none());
    }

    #[test]
    fn clicks_counts_and_times_out() {
        assert_eq!(clicks(0).err(), Some(FsmError::InvalidCount(0)));

        let mut triple = clicks(3).unwrap();
        let mut data = PointsData::default();
        assert_eq!(triple.process_event(&button_click(0), &mut data), Outcome::Moved);
        assert_eq!(triple.process_event(&button_click(0), &mut data), Outcome::Moved);
        assert_eq!(triple.process_event(&button_click(0), &mut data), Outcome::Terminated);
        assert_eq!(data.points.len(), 3);

        data = PointsData::default();
        triple.process_event(&button_click(0), &mut data);
        let pending = triple.pending_timeout().unwrap();
        assert_eq!(pending.duration, REPEAT_GAP);
        assert_eq!(triple.fire_timeout(pending.id, &mut data), Outcome::Cancelled);
    }

    #[test]
    fn clicks_require_the_same_button() {
        let mut double = clicks(2).unwrap();
        let mut data = PointsData::default();
        double.process_event(&button_click(0), &mut data);
        assert_eq!(double.process_event(&button_click(2), &mut data), Outcome::Ignored);
        assert_eq!(double.process_event(&button_click(0), &mut data), Outcome::Terminated);
    }

    #[test]
    fn single_click_terminates_at_once() {
        let mut single = clicks(1).unwrap();
        let mut data = PointsData::default();
        assert_eq!(single.process_event(&button_click(1), &mut data), Outcome::Terminated);
    }

    #[test]
    fn double_click_through_sub_fsms() {
        let mut fsm = double_click().unwrap();
        let mut data = PointData::default();
        assert_eq!(fsm.process_event(&at(PointerKind::Click, 1.0), &mut data), Outcome::Moved);
        assert_eq!(fsm.current_state_view().name, "clicked");
        assert_eq!(fsm.pending_timeout().map(|p| p.duration), Some(DOUBLE_CLICK_GAP));
        assert_eq!(fsm.process_event(&at(PointerKind::Click, 2.0), &mut data), Outcome::Terminated);
        assert_eq!(data.base.client.x, 2.0);
    }

    #[test]
    fn dnd_starts_on_first_move() {
        let mut fsm = dnd().unwrap();
        let mut data = SrcTgtPointsData::default();
        fsm.process_event(&at(PointerKind::Down, 10.0), &mut data);
        assert!(!fsm.is_started());
        fsm.process_event(&at(PointerKind::Move, 20.0), &mut data);
        assert!(fsm.is_started());
        fsm.process_event(&at(PointerKind::Move, 30.0), &mut data);
        assert_eq!(fsm.process_event(&at(PointerKind::Up, 35.0), &mut data), Outcome::Terminated);
        assert_eq!(data.diff_client_x(), 25.0);
    }

    #[test]
    fn dnd_without_move_is_cancelled() {
        let mut fsm = dnd().unwrap();
        let mut data = SrcTgtPointsData::default();
        fsm.process_event(&at(PointerKind::Down, 10.0), &mut data);
        assert_eq!(fsm.process_event(&at(PointerKind::Up, 10.0), &mut data), Outcome::Cancelled);
    }

    #[test]
    fn escape_aborts_cancellable_dnd() {
        let mut fsm = cancellable_dnd().unwrap();
        let mut data = SrcTgtPointsData::default();
        fsm.process_event(&at(PointerKind::Down, 10.0), &mut data);
        fsm.process_event(&at(PointerKind::Move, 20.0), &mut data);
        assert!(fsm.is_started());
        assert!(!fsm.process(&Event::key(true, "a"), &mut data));
        assert!(fsm.is_started());
        assert_eq!(fsm.process_event(&Event::key(true, "Escape"), &mut data), Outcome::Aborted);
        assert!(!fsm.is_started());
    }
}
