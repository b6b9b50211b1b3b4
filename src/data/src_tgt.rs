//! Source/target pairs: where a gesture started and where it is now.

use super::{InteractionData, PointBaseData, PointData, TouchData};
use crate::event::{PointerEvent, Touch, TouchEvent};

/// Axis along which a velocity is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Along the x axis
    Horizontal,
    /// Along the y axis
    Vertical,
    /// Euclidean distance
    #[default]
    All,
}

/// Data exposing a positioned, timestamped base.
pub trait PointSource {
    /// The shared positional fields.
    fn point_base(&self) -> &PointBaseData;
}

impl PointSource for PointData {
    fn point_base(&self) -> &PointBaseData {
        &self.base
    }
}

impl PointSource for TouchData {
    fn point_base(&self) -> &PointBaseData {
        &self.base
    }
}

/// The start (`src`) and current or final (`tgt`) state of a gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SrcTgtData<T> {
    /// Where the gesture started
    pub src: T,
    /// Where the gesture is now, or ended
    pub tgt: T,
}

/// Source/target pair of pointer positions.
pub type SrcTgtPointsData = SrcTgtData<PointData>;
/// Source/target pair of touch contacts.
pub type SrcTgtTouchData = SrcTgtData<TouchData>;

impl<T: PointSource> SrcTgtData<T> {
    fn src_base(&self) -> &PointBaseData {
        self.src.point_base()
    }

    fn tgt_base(&self) -> &PointBaseData {
        self.tgt.point_base()
    }

    /// Client-space horizontal displacement.
    pub fn diff_client_x(&self) -> f64 {
        self.tgt_base().client.x - self.src_base().client.x
    }

    /// Client-space vertical displacement.
    pub fn diff_client_y(&self) -> f64 {
        self.tgt_base().client.y - self.src_base().client.y
    }

    /// Page-space horizontal displacement.
    pub fn diff_page_x(&self) -> f64 {
        self.tgt_base().page.x - self.src_base().page.x
    }

    /// Page-space vertical displacement.
    pub fn diff_page_y(&self) -> f64 {
        self.tgt_base().page.y - self.src_base().page.y
    }

    /// Screen-space horizontal displacement.
    pub fn diff_screen_x(&self) -> f64 {
        self.tgt_base().screen.x - self.src_base().screen.x
    }

    /// Screen-space vertical displacement.
    pub fn diff_screen_y(&self) -> f64 {
        self.tgt_base().screen.y - self.src_base().screen.y
    }

    /// Elapsed milliseconds between source and target.
    pub fn duration(&self) -> f64 {
        self.tgt_base().timestamp - self.src_base().timestamp
    }

    /// Screen-space pixels per second; `0.0` when no time elapsed.
    pub fn velocity(&self, direction: Direction) -> f64 {
        let duration = self.duration();
        if duration == 0.0 {
            return 0.0;
        }
        let distance = match direction {
            Direction::Horizontal => self.diff_screen_x().abs(),
            Direction::Vertical => self.diff_screen_y().abs(),
            Direction::All => self.diff_screen_x().hypot(self.diff_screen_y()),
        };
        distance * 1000.0 / duration
    }

    /// Moved horizontally, drifting at most `px_tolerance` vertically.
    pub fn is_horizontal(&self, px_tolerance: f64) -> bool {
        self.diff_screen_y().abs() <= px_tolerance && self.diff_screen_x().abs() > 0.0
    }

    /// Moved vertically, drifting at most `px_tolerance` horizontally.
    pub fn is_vertical(&self, px_tolerance: f64) -> bool {
        self.diff_screen_x().abs() <= px_tolerance && self.diff_screen_y().abs() > 0.0
    }

    /// Horizontal, toward negative x.
    pub fn is_left(&self, px_tolerance: f64) -> bool {
        self.is_horizontal(px_tolerance) && self.diff_screen_x() < 0.0
    }

    /// Horizontal, toward positive x.
    pub fn is_right(&self, px_tolerance: f64) -> bool {
        self.is_horizontal(px_tolerance) && self.diff_screen_x() > 0.0
    }

    /// Vertical, toward negative y.
    pub fn is_top(&self, px_tolerance: f64) -> bool {
        self.is_vertical(px_tolerance) && self.diff_screen_y() < 0.0
    }

    /// Vertical, toward positive y.
    pub fn is_bottom(&self, px_tolerance: f64) -> bool {
        self.is_vertical(px_tolerance) && self.diff_screen_y() > 0.0
    }
}

impl SrcTgtData<PointData> {
    /// Record the start of the gesture.
    pub fn copy_src(&mut self, event: &PointerEvent) {
        self.src.copy(event);
    }

    /// Record the current position of the gesture.
    pub fn copy_tgt(&mut self, event: &PointerEvent) {
        self.tgt.copy(event);
    }
}

impl SrcTgtData<TouchData> {
    /// Record the start of the gesture.
    pub fn copy_src(&mut self, touch: &Touch, event: &TouchEvent) {
        self.src.copy(touch, event);
    }

    /// Record the current position of the contact.
    pub fn copy_tgt(&mut self, touch: &Touch, event: &TouchEvent) {
        self.tgt.copy(touch, event);
    }
}

impl<T: InteractionData> InteractionData for SrcTgtData<T> {
    fn flush(&mut self) {
        self.src.flush();
        self.tgt.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn pointer(x: f64, y: f64, timestamp: f64) -> PointerEvent {
        let at = Point::new(x, y);
        PointerEvent {
            client: at,
            page: at,
            screen: at,
            timestamp,
            ..PointerEvent::default()
        }
    }

    fn moved(from: (f64, f64), to: (f64, f64)) -> SrcTgtPointsData {
        let mut data = SrcTgtPointsData::default();
        data.copy_src(&pointer(from.0, from.1, 100.0));
        data.copy_tgt(&pointer(to.0, to.1, 600.0));
        data
    }

    #[test]
    fn diffs_and_duration() {
        let data = moved((10.0, 10.0), (40.0, 6.0));
        assert_eq!(data.diff_client_x(), 30.0);
        assert_eq!(data.diff_screen_y(), -4.0);
        assert_eq!(data.duration(), 500.0);
    }

    #[test]
    fn velocity_in_pixels_per_second() {
        let data = moved((0.0, 0.0), (30.0, 40.0));
        assert_eq!(data.velocity(Direction::All), 100.0);
        assert_eq!(data.velocity(Direction::Horizontal), 60.0);
        assert_eq!(data.velocity(Direction::Vertical), 80.0);

        let mut instant = data.clone();
        instant.tgt.base.timestamp = instant.src.base.timestamp;
        assert_eq!(instant.velocity(Direction::All), 0.0);
    }

    #[test]
    fn directional_predicates_respect_tolerance() {
        let left = moved((50.0, 50.0), (10.0, 53.0));
        assert!(left.is_horizontal(5.0));
        assert!(left.is_left(5.0));
        assert!(!left.is_right(5.0));
        assert!(!left.is_left(2.0));

        let down = moved((50.0, 50.0), (49.0, 90.0));
        assert!(down.is_bottom(1.0));
        assert!(!down.is_top(1.0));
        assert!(!down.is_horizontal(10.0));

        let still = moved((50.0, 50.0), (50.0, 50.0));
        assert!(!still.is_horizontal(10.0));
        assert!(!still.is_vertical(10.0));
    }
}
