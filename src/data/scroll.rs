use super::{InteractionData, PointData};
use crate::event::{ScrollEvent, TargetId, WheelEvent};

/// Scroll offsets of a scrolled element and the last increments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollData {
    /// Horizontal offset
    pub scroll_x: f64,
    /// Vertical offset
    pub scroll_y: f64,
    /// Horizontal change since the previous scroll
    pub increment_x: f64,
    /// Vertical change since the previous scroll
    pub increment_y: f64,
    /// Scrolled element
    pub target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

impl ScrollData {
    /// Record new offsets; increments are relative to the previous ones.
    pub fn set_scroll(&mut self, event: &ScrollEvent) {
        self.increment_x = event.scroll_x - self.scroll_x;
        self.increment_y = event.scroll_y - self.scroll_y;
        self.scroll_x = event.scroll_x;
        self.scroll_y = event.scroll_y;
        self.target = event.target;
        self.timestamp = event.timestamp;
    }
}

impl InteractionData for ScrollData {
    fn flush(&mut self) {
        *self = Self::default();
    }
}

/// A wheel turn and the pointer state it happened in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelData {
    /// Pointer state
    pub point: PointData,
    /// Horizontal scroll amount
    pub delta_x: f64,
    /// Vertical scroll amount
    pub delta_y: f64,
    /// Depth scroll amount
    pub delta_z: f64,
    /// Unit of the deltas
    pub delta_mode: u32,
}

impl WheelData {
    /// Overwrite every field from `event`.
    pub fn copy(&mut self, event: &WheelEvent) {
        self.point.copy(&event.pointer);
        self.delta_x = event.delta_x;
        self.delta_y = event.delta_y;
        self.delta_z = event.delta_z;
        self.delta_mode = event.delta_mode;
    }
}

impl InteractionData for WheelData {
    fn flush(&mut self) {
        *self = Self::default();
    }
}
