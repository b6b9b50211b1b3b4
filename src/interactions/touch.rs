use std::time::Duration;

use super::{at_least_one, positive, REPEAT_GAP};
use crate::builder::FsmBuilder;
use crate::data::{MultiTouchData, SrcTgtTouchData, TapsData, TouchData, TwoTouchData};
use crate::error::Result;
use crate::event::{Event, EventType, Touch, TouchEvent};
use crate::fsm::Fsm;
use crate::transition::Transition;

/// Direction a pan must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanDirection {
    /// Toward negative x
    Left,
    /// Toward positive x
    Right,
    /// Toward negative y
    Top,
    /// Toward positive y
    Bottom,
    /// Left or right
    Horizontal,
    /// Up or down
    Vertical,
}

fn changed(event: &Event) -> Option<(&Touch, &TouchEvent)> {
    let touch_event = event.as_touch()?;
    touch_event.changed_touches.first().map(|t| (t, touch_event))
}

/// `count` taps, each within [`REPEAT_GAP`] of the previous one.
pub fn tap(count: usize) -> Result<Fsm<TapsData>> {
    let count = at_least_one(count)?;
    let add = |event: &Event, data: &mut TapsData| {
        if let Some((touch, touch_event)) = changed(event) {
            data.add_tap(touch, touch_event);
        }
    };
    FsmBuilder::new(format!("{count} taps"))
        .std_state("down")
        .std_state("up")
        .terminal_state("ended")
        .cancelling_state("timeouted")
        .transition("init", "down", |t| Transition::on(EventType::TouchStart, t))
        .transition("down", "ended", |t| {
            Transition::on(EventType::TouchEnd, t)
                .when(move |_: &Event, data: &TapsData| data.len() + 1 == count)
                .with_action(add)
        })
        .transition("down", "up", |t| {
            Transition::on(EventType::TouchEnd, t)
                .when(move |_: &Event, data: &TapsData| data.len() + 1 < count)
                .with_action(add)
        })
        .transition("down", "timeouted", |t| Transition::timeout(t, |_| REPEAT_GAP))
        .transition("up", "down", |t| Transition::on(EventType::TouchStart, t))
        .transition("up", "timeouted", |t| Transition::timeout(t, |_| REPEAT_GAP))
        .build()
}

/// A contact held for `duration`. Lifting it before cancels.
pub fn long_touch(duration: Duration) -> Result<Fsm<TouchData>> {
    let duration = positive(duration)?;
    let same_contact = |event: &Event, data: &TouchData| {
        changed(event).is_some_and(|(touch, _)| Some(touch.identifier) == data.identifier)
    };
    FsmBuilder::new("long touch")
        .std_state("touched")
        .terminal_state("timeouted")
        .cancelling_state("released")
        .transition("init", "touched", |t| {
            Transition::on(EventType::TouchStart, t).with_action(|event, data: &mut TouchData| {
                if let Some((touch, touch_event)) = changed(event) {
                    data.copy(touch, touch_event);
                }
            })
        })
        .transition("touched", "released", |t| {
            Transition::on_any([EventType::TouchEnd, EventType::TouchMove], t).when(same_contact)
        })
        .transition("touched", "timeouted", |t| {
            Transition::timeout(t, move |_| duration)
        })
        .build()
}

fn init_touches<const N: usize>(event: &Event, data: &mut MultiTouchData<N>) {
    if let Some(touch_event) = event.as_touch() {
        for touch in &touch_event.changed_touches {
            data.init_touch(touch, touch_event);
        }
    }
}

fn move_touches<const N: usize>(event: &Event, data: &mut MultiTouchData<N>) {
    if let Some(touch_event) = event.as_touch() {
        for touch in &touch_event.changed_touches {
            data.copy_touch_to_tgt(touch, touch_event);
        }
    }
}

fn known_contact<const N: usize>(event: &Event, data: &MultiTouchData<N>) -> bool {
    event.as_touch().is_some_and(|e| {
        e.changed_touches.iter().any(|touch| {
            data.touches()
                .any(|slot| slot.src.identifier == Some(touch.identifier))
        })
    })
}

/// Builds the common `N`-contact skeleton: contacts accumulate in `touched`,
/// moves update them while `moving_ok` holds, and lifting a contact ends
/// the gesture if `N` contacts were down and `ending_ok` holds.
fn touches_fsm<const N: usize, M, E>(name: &str, moving_ok: M, ending_ok: E) -> Result<Fsm<MultiTouchData<N>>>
where
    M: Fn(&MultiTouchData<N>) -> bool + Clone + 'static,
    E: Fn(&MultiTouchData<N>) -> bool + 'static,
{
    at_least_one(N)?;
    let still_ok = moving_ok.clone();
    FsmBuilder::new(name)
        .std_state("touched")
        .terminal_state("ended")
        .cancelling_state("cancelled")
        .transition("init", "touched", |t| {
            Transition::on(EventType::TouchStart, t).with_action(init_touches)
        })
        .transition("touched", "touched", |t| {
            Transition::on(EventType::TouchStart, t)
                .when(|_, data: &MultiTouchData<N>| data.len() < N)
                .with_action(init_touches)
        })
        .transition("touched", "touched", |t| {
            Transition::on(EventType::TouchMove, t)
                .when(move |event, data: &MultiTouchData<N>| {
                    let mut next = data.clone();
                    move_touches(event, &mut next);
                    known_contact(event, data) && moving_ok(&next)
                })
                .with_action(move_touches)
        })
        .transition("touched", "cancelled", |t| {
            Transition::on(EventType::TouchMove, t).when(move |event, data: &MultiTouchData<N>| {
                let mut next = data.clone();
                move_touches(event, &mut next);
                known_contact(event, data) && !still_ok(&next)
            })
        })
        .transition("touched", "ended", |t| {
            Transition::on(EventType::TouchEnd, t)
                .when(move |event, data: &MultiTouchData<N>| {
                    data.len() == N && known_contact(event, data) && ending_ok(data)
                })
                .with_action(move_touches)
        })
        .transition("touched", "cancelled", |t| {
            Transition::on(EventType::TouchEnd, t).when(known_contact)
        })
        .build()
}

/// `N` contacts put down, moved, then lifted.
pub fn multi_touch<const N: usize>() -> Result<Fsm<MultiTouchData<N>>> {
    touches_fsm(&format!("{N}-touch"), |_| true, |_| true)
}

fn has_moved(touch: &SrcTgtTouchData) -> bool {
    touch.diff_screen_x() != 0.0 || touch.diff_screen_y() != 0.0
}

impl PanDirection {
    fn holds(self, touch: &SrcTgtTouchData, px_tolerance: f64) -> bool {
        match self {
            Self::Left => touch.is_left(px_tolerance),
            Self::Right => touch.is_right(px_tolerance),
            Self::Top => touch.is_top(px_tolerance),
            Self::Bottom => touch.is_bottom(px_tolerance),
            Self::Horizontal => touch.is_horizontal(px_tolerance),
            Self::Vertical => touch.is_vertical(px_tolerance),
        }
    }
}

/// `N` contacts all moving in `direction`, straying at most `px_tolerance` pixels.
pub fn pan<const N: usize>(direction: PanDirection, px_tolerance: f64) -> Result<Fsm<MultiTouchData<N>>> {
    // contacts that have not moved yet do not break the pan
    let follows = move |data: &MultiTouchData<N>| {
        data.touches()
            .filter(|t| has_moved(t))
            .all(|t| direction.holds(t, px_tolerance))
    };
    touches_fsm(&format!("{N}-touch pan"), follows, move |data| {
        data.touches().all(|t| has_moved(t) && direction.holds(t, px_tolerance))
    })
}

/// Two contacts moving apart or together along the line joining them.
pub fn pinch(px_tolerance: f64) -> Result<Fsm<TwoTouchData>> {
    touches_fsm("pinch", |_| true, move |data: &TwoTouchData| {
        data.scaling_ratio(px_tolerance) > 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsmError;
    use crate::event::TouchKind;
    use crate::machine::Outcome;

    fn touch(kind: TouchKind, id: i64, x: f64, y: f64) -> Event {
        Event::touch(kind, id, x, y)
    }

    #[test]
    fn zero_counts_and_durations_are_rejected() {
        assert_eq!(tap(0).err(), Some(FsmError::InvalidCount(0)));
        assert_eq!(long_touch(Duration::ZERO).err(), Some(FsmError::InvalidDuration));
        assert_eq!(multi_touch::<0>().err(), Some(FsmError::InvalidCount(0)));
    }

    #[test]
    fn double_tap() {
        let mut fsm = tap(2).unwrap();
        let mut data = TapsData::default();
        assert!(fsm.process(&touch(TouchKind::Start, 1, 0.0, 0.0), &mut data));
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 1, 0.0, 0.0), &mut data), Outcome::Moved);
        assert_eq!(fsm.current_state_view().name, "up");
        fsm.process_event(&touch(TouchKind::Start, 2, 1.0, 0.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 2, 1.0, 0.0), &mut data), Outcome::Terminated);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn tap_times_out_between_taps() {
        let mut fsm = tap(2).unwrap();
        let mut data = TapsData::default();
        fsm.process_event(&touch(TouchKind::Start, 1, 0.0, 0.0), &mut data);
        fsm.process_event(&touch(TouchKind::End, 1, 0.0, 0.0), &mut data);
        let pending = fsm.pending_timeout().unwrap();
        assert_eq!(fsm.fire_timeout(pending.id, &mut data), Outcome::Cancelled);
    }

    #[test]
    fn long_touch_ignores_other_contacts() {
        let mut fsm = long_touch(Duration::from_millis(500)).unwrap();
        let mut data = TouchData::default();
        fsm.process_event(&touch(TouchKind::Start, 7, 0.0, 0.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 8, 0.0, 0.0), &mut data), Outcome::Ignored);
        let pending = fsm.pending_timeout().unwrap();
        assert_eq!(fsm.fire_timeout(pending.id, &mut data), Outcome::Terminated);
        assert_eq!(data.identifier, Some(7));
    }

    #[test]
    fn three_touch_gesture() {
        let mut fsm = multi_touch::<3>().unwrap();
        let mut data = MultiTouchData::<3>::default();
        for id in 0..3 {
            assert!(fsm.process(&touch(TouchKind::Start, id, 0.0, id as f64), &mut data));
        }
        assert!(!fsm.process(&touch(TouchKind::Start, 9, 0.0, 0.0), &mut data));
        assert!(fsm.process(&touch(TouchKind::Move, 1, 5.0, 1.0), &mut data));
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 1, 5.0, 1.0), &mut data), Outcome::Terminated);
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn lifting_too_early_cancels() {
        let mut fsm = multi_touch::<2>().unwrap();
        let mut data = TwoTouchData::default();
        fsm.process_event(&touch(TouchKind::Start, 1, 0.0, 0.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 1, 0.0, 0.0), &mut data), Outcome::Cancelled);
    }

    #[test]
    fn pan_cancels_when_direction_breaks() {
        let mut fsm = pan::<2>(PanDirection::Right, 5.0).unwrap();
        let mut data = TwoTouchData::default();
        fsm.process_event(&touch(TouchKind::Start, 1, 0.0, 0.0), &mut data);
        fsm.process_event(&touch(TouchKind::Start, 2, 0.0, 50.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::Move, 1, 20.0, 1.0), &mut data), Outcome::Moved);
        assert_eq!(fsm.process_event(&touch(TouchKind::Move, 2, 20.0, 51.0), &mut data), Outcome::Moved);
        assert_eq!(fsm.process_event(&touch(TouchKind::Move, 2, 20.0, 80.0), &mut data), Outcome::Cancelled);
    }

    #[test]
    fn pan_completes() {
        let mut fsm = pan::<2>(PanDirection::Right, 5.0).unwrap();
        let mut data = TwoTouchData::default();
        fsm.process_event(&touch(TouchKind::Start, 1, 0.0, 0.0), &mut data);
        fsm.process_event(&touch(TouchKind::Start, 2, 0.0, 50.0), &mut data);
        fsm.process_event(&touch(TouchKind::Move, 1, 20.0, 1.0), &mut data);
        fsm.process_event(&touch(TouchKind::Move, 2, 20.0, 51.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 1, 20.0, 1.0), &mut data), Outcome::Terminated);
        assert!(data.is_right(5.0));
    }

    #[test]
    fn pinch_requires_a_scaling_gesture() {
        let mut fsm = pinch(10.0).unwrap();
        let mut data = TwoTouchData::default();
        fsm.process_event(&touch(TouchKind::Start, 1, 10.0, 10.0), &mut data);
        fsm.process_event(&touch(TouchKind::Start, 2, 15.0, 15.0), &mut data);
        fsm.process_event(&touch(TouchKind::Move, 1, 0.0, 1.0), &mut data);
        fsm.process_event(&touch(TouchKind::Move, 2, 20.0, 10.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 2, 20.0, 10.0), &mut data), Outcome::Terminated);

        data = TwoTouchData::default();
        fsm.process_event(&touch(TouchKind::Start, 1, 10.0, 10.0), &mut data);
        fsm.process_event(&touch(TouchKind::Start, 2, 15.0, 15.0), &mut data);
        fsm.process_event(&touch(TouchKind::Move, 1, 20.0, 20.0), &mut data);
        fsm.process_event(&touch(TouchKind::Move, 2, 25.0, 25.0), &mut data);
        assert_eq!(fsm.process_event(&touch(TouchKind::End, 2, 25.0, 25.0), &mut data), Outcome::Cancelled);
    }
}
