use super::{InteractionData, PointBaseData};
use crate::event::{Touch, TouchEvent};

/// A single touch contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchData {
    /// Positions, modifiers and targets
    pub base: PointBaseData,
    /// `None` until a contact has been copied in
    pub identifier: Option<i64>,
    /// Pressure, from `0.0` to `1.0`
    pub force: f64,
    /// Horizontal radius of the contact ellipse
    pub radius_x: f64,
    /// Vertical radius of the contact ellipse
    pub radius_y: f64,
    /// Rotation of the contact ellipse, in degrees
    pub rotation_angle: f64,
}

impl TouchData {
    /// Overwrite every field from the contact `touch` of `event`.
    pub fn copy(&mut self, touch: &Touch, event: &TouchEvent) {
        self.base.copy_touch(touch, event);
        self.identifier = Some(touch.identifier);
        self.force = touch.force;
        self.radius_x = touch.radius_x;
        self.radius_y = touch.radius_y;
        self.rotation_angle = touch.rotation_angle;
    }

    /// Data holding a copy of the contact `touch`.
    pub fn from_touch(touch: &Touch, event: &TouchEvent) -> Self {
        let mut data = Self::default();
        data.copy(touch, event);
        data
    }
}

impl InteractionData for TouchData {
    fn flush(&mut self) {
        *self = Self::default();
    }
}

/// The taps of a multi-tap gesture, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapsData {
    /// Taps, oldest first
    pub taps: Vec<TouchData>,
}

impl TapsData {
    /// Append the contact `touch`.
    pub fn add_tap(&mut self, touch: &Touch, event: &TouchEvent) {
        self.taps.push(TouchData::from_touch(touch, event));
    }

    /// Number of recorded taps.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether no tap was recorded.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

impl InteractionData for TapsData {
    fn flush(&mut self) {
        self.taps.clear();
    }
}
