use kurbo::Point;

use super::InteractionData;
use crate::event::{Modifiers, PointerEvent, TargetId, Touch, TouchEvent};

/// Position, modifiers and targets shared by pointer and touch data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBaseData {
    /// Modifier keys held
    pub modifiers: Modifiers,
    /// Position in the viewport
    pub client: Point,
    /// Position in the document
    pub page: Point,
    /// Position on the screen
    pub screen: Point,
    /// Innermost element under the pointer
    pub target: Option<TargetId>,
    /// Element the listener is attached to
    pub current_target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

impl PointBaseData {
    /// Copy the positional fields of a pointer event.
    pub fn copy_pointer(&mut self, event: &PointerEvent) {
        self.modifiers = event.modifiers;
        self.client = event.client;
        self.page = event.page;
        self.screen = event.screen;
        self.target = event.target;
        self.current_target = event.current_target;
        self.timestamp = event.timestamp;
    }

    /// Copy the positional fields of a touch contact.
    pub fn copy_touch(&mut self, touch: &Touch, event: &TouchEvent) {
        self.modifiers = event.modifiers;
        self.client = touch.client;
        self.page = touch.page;
        self.screen = touch.screen;
        self.target = touch.target;
        self.current_target = event.current_target;
        self.timestamp = event.timestamp;
    }
}

impl InteractionData for PointBaseData {
    fn flush(&mut self) {
        *self = Self::default();
    }
}

/// A single pointer position with its buttons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointData {
    /// Positions, modifiers and targets
    pub base: PointBaseData,
    /// Button that changed state, `None` before any copy
    pub button: Option<i16>,
    /// Bitmask of pressed buttons
    pub buttons: u16,
    /// Movement since the previous pointer event
    pub movement: Point,
    /// Position relative to the target's padding edge
    pub offset: Point,
    /// Secondary target of enter/leave/over/out events
    pub related_target: Option<TargetId>,
}

impl PointData {
    /// Overwrite every field from `event`.
    pub fn copy(&mut self, event: &PointerEvent) {
        self.base.copy_pointer(event);
        self.button = Some(event.button);
        self.buttons = event.buttons;
        self.movement = event.movement;
        self.offset = event.offset;
        self.related_target = event.related_target;
    }

    /// Data holding a copy of `event`.
    pub fn from_event(event: &PointerEvent) -> Self {
        let mut data = Self::default();
        data.copy(event);
        data
    }
}

impl InteractionData for PointData {
    fn flush(&mut self) {
        *self = Self::default();
    }
}

/// An ordered sequence of pointer positions plus the latest known one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointsData {
    /// Recorded positions, oldest first
    pub points: Vec<PointData>,
    /// Latest position seen, recorded or not
    pub current_position: Option<PointData>,
}

impl PointsData {
    /// Append the position of `event`.
    pub fn add_point(&mut self, event: &PointerEvent) {
        self.points.push(PointData::from_event(event));
    }

    /// Record `event` as the latest position without appending it.
    pub fn set_current_position(&mut self, event: &PointerEvent) {
        self.current_position = Some(PointData::from_event(event));
    }

    /// Button of the last recorded position.
    pub fn last_button(&self) -> Option<i16> {
        self.points.last().and_then(|p| p.button)
    }
}

impl InteractionData for PointsData {
    fn flush(&mut self) {
        self.points.clear();
        self.current_position = None;
    }
}
