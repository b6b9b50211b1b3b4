//! Multi-touch data.
//!
//! A fixed-arity [`MultiTouchData`] holds `N` source/target slots. A new
//! contact takes the first empty slot; a known contact only updates the
//! target side of its slot. Directional predicates hold only when every
//! populated slot agrees.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use kurbo::Vec2;

use super::{Direction, InteractionData, SrcTgtTouchData};
use crate::event::{Touch, TouchEvent};

/// `N` source/target touch slots, filled in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTouchData<const N: usize> {
    slots: [SrcTgtTouchData; N],
}

/// Two-contact data, used by pinches and two-finger pans.
pub type TwoTouchData = MultiTouchData<2>;
/// Three-contact data.
pub type ThreeTouchData = MultiTouchData<3>;
/// Four-contact data.
pub type FourTouchData = MultiTouchData<4>;

impl<const N: usize> Default for MultiTouchData<N> {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(|_| SrcTgtTouchData::default()),
        }
    }
}

fn is_populated(slot: &SrcTgtTouchData) -> bool {
    slot.src.identifier.is_some()
}

fn all_agree<'a, I, F>(slots: I, predicate: F) -> bool
where
    I: IntoIterator<Item = &'a SrcTgtTouchData>,
    F: Fn(&SrcTgtTouchData) -> bool,
{
    let mut any = false;
    for slot in slots {
        if !predicate(slot) {
            return false;
        }
        any = true;
    }
    any
}

fn average<'a, I, F>(slots: I, value: F) -> f64
where
    I: IntoIterator<Item = &'a SrcTgtTouchData>,
    F: Fn(&SrcTgtTouchData) -> f64,
{
    let (sum, count) = slots
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), slot| (sum + value(slot), count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl<const N: usize> MultiTouchData<N> {
    /// Number of slots.
    pub const ARITY: usize = N;

    /// The slot at `index`, populated or not.
    pub fn slot(&self, index: usize) -> Option<&SrcTgtTouchData> {
        self.slots.get(index)
    }

    /// Populated slots, in arrival order.
    pub fn touches(&self) -> impl Iterator<Item = &SrcTgtTouchData> + '_ {
        self.slots.iter().filter(|s| is_populated(s))
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.touches().count()
    }

    /// Whether no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_of(&self, identifier: i64) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.src.identifier == Some(identifier))
    }

    /// Record a contact. Returns `false` if every slot is taken by another contact.
    pub fn init_touch(&mut self, touch: &Touch, event: &TouchEvent) -> bool {
        if let Some(index) = self.slot_of(touch.identifier) {
            self.slots[index].copy_tgt(touch, event);
            return true;
        }
        match self.slots.iter().position(|s| !is_populated(s)) {
            Some(index) => {
                self.slots[index].copy_src(touch, event);
                self.slots[index].copy_tgt(touch, event);
                true
            }
            None => false,
        }
    }

    /// Update the target side of a known contact.
    pub fn copy_touch_to_tgt(&mut self, touch: &Touch, event: &TouchEvent) -> bool {
        match self.slot_of(touch.identifier) {
            Some(index) => {
                self.slots[index].copy_tgt(touch, event);
                true
            }
            None => false,
        }
    }

    /// Every populated contact moved horizontally.
    pub fn is_horizontal(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_horizontal(px_tolerance))
    }

    /// Every populated contact moved vertically.
    pub fn is_vertical(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_vertical(px_tolerance))
    }

    /// Every populated contact moved left.
    pub fn is_left(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_left(px_tolerance))
    }

    /// Every populated contact moved right.
    pub fn is_right(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_right(px_tolerance))
    }

    /// Every populated contact moved up.
    pub fn is_top(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_top(px_tolerance))
    }

    /// Every populated contact moved down.
    pub fn is_bottom(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_bottom(px_tolerance))
    }

    /// Mean client-space horizontal displacement.
    pub fn diff_client_x(&self) -> f64 {
        average(self.touches(), SrcTgtTouchData::diff_client_x)
    }

    /// Mean client-space vertical displacement.
    pub fn diff_client_y(&self) -> f64 {
        average(self.touches(), SrcTgtTouchData::diff_client_y)
    }

    /// Mean page-space horizontal displacement.
    pub fn diff_page_x(&self) -> f64 {
        average(self.touches(), SrcTgtTouchData::diff_page_x)
    }

    /// Mean page-space vertical displacement.
    pub fn diff_page_y(&self) -> f64 {
        average(self.touches(), SrcTgtTouchData::diff_page_y)
    }

    /// Mean screen-space horizontal displacement.
    pub fn diff_screen_x(&self) -> f64 {
        average(self.touches(), SrcTgtTouchData::diff_screen_x)
    }

    /// Mean screen-space vertical displacement.
    pub fn diff_screen_y(&self) -> f64 {
        average(self.touches(), SrcTgtTouchData::diff_screen_y)
    }

    /// Mean velocity of the populated contacts.
    pub fn velocity(&self, direction: Direction) -> f64 {
        average(self.touches(), |t| t.velocity(direction))
    }
}

impl MultiTouchData<2> {
    /// First contact put down.
    pub fn touch1(&self) -> &SrcTgtTouchData {
        &self.slots[0]
    }

    /// Second contact put down.
    pub fn touch2(&self) -> &SrcTgtTouchData {
        &self.slots[1]
    }

    /// Ratio of the final to the initial distance between the two contacts.
    ///
    /// Each contact's screen displacement is projected onto the line joining
    /// the two target positions. Returns `0.0` unless the projections have
    /// opposite signs and each contact strays at most `px_tolerance` pixels
    /// from that line.
    pub fn scaling_ratio(&self, px_tolerance: f64) -> f64 {
        let (t1, t2) = (&self.slots[0], &self.slots[1]);
        let src1 = t1.src.base.screen;
        let src2 = t2.src.base.screen;
        let tgt1 = t1.tgt.base.screen;
        let tgt2 = t2.tgt.base.screen;

        let line = tgt2 - tgt1;
        let line_length = line.hypot();
        let move1: Vec2 = tgt1 - src1;
        let move2: Vec2 = tgt2 - src2;
        let projection1 = move1.dot(line) / line_length;
        let projection2 = move2.dot(line) / line_length;

        if !(projection1 * projection2 < 0.0) {
            return 0.0;
        }
        let deviation1 = (move1.hypot2() - projection1 * projection1).max(0.0).sqrt();
        let deviation2 = (move2.hypot2() - projection2 * projection2).max(0.0).sqrt();
        if !(deviation1 <= px_tolerance && deviation2 <= px_tolerance) {
            return 0.0;
        }

        let initial = (src2 - src1).hypot();
        if initial == 0.0 || initial.is_nan() {
            return 0.0;
        }
        line_length / initial
    }

    /// Signed angle in radians, within `(-PI, PI]`, swept by the segment
    /// joining the two contacts.
    pub fn rotation_angle(&self) -> f64 {
        let (t1, t2) = (&self.slots[0], &self.slots[1]);
        let before = t2.src.base.screen - t1.src.base.screen;
        let after = t2.tgt.base.screen - t1.tgt.base.screen;
        let mut angle = after.atan2() - before.atan2();
        if angle > PI {
            angle -= 2.0 * PI;
        } else if angle <= -PI {
            angle += 2.0 * PI;
        }
        angle
    }
}

impl<const N: usize> InteractionData for MultiTouchData<N> {
    fn flush(&mut self) {
        for slot in &mut self.slots {
            slot.flush();
        }
    }
}

/// Multi-touch data with no fixed arity, keyed by contact identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralMultiTouchData {
    touches: BTreeMap<i64, SrcTgtTouchData>,
}

impl GeneralMultiTouchData {
    /// The contact with `identifier`, if known.
    pub fn touch(&self, identifier: i64) -> Option<&SrcTgtTouchData> {
        self.touches.get(&identifier)
    }

    /// Known contacts, by identifier.
    pub fn touches(&self) -> impl Iterator<Item = &SrcTgtTouchData> + '_ {
        self.touches.values()
    }

    /// Number of known contacts.
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    /// Whether no contact is known.
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Record a contact; a known one only has its target updated.
    pub fn init_touch(&mut self, touch: &Touch, event: &TouchEvent) {
        let slot = self.touches.entry(touch.identifier).or_insert_with(|| {
            let mut fresh = SrcTgtTouchData::default();
            fresh.copy_src(touch, event);
            fresh
        });
        slot.copy_tgt(touch, event);
    }

    /// Update the target side of a known contact.
    pub fn copy_touch_to_tgt(&mut self, touch: &Touch, event: &TouchEvent) -> bool {
        match self.touches.get_mut(&touch.identifier) {
            Some(slot) => {
                slot.copy_tgt(touch, event);
                true
            }
            None => false,
        }
    }

    /// Forget a contact.
    pub fn remove_touch(&mut self, identifier: i64) -> Option<SrcTgtTouchData> {
        self.touches.remove(&identifier)
    }

    /// Every contact moved horizontally.
    pub fn is_horizontal(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_horizontal(px_tolerance))
    }

    /// Every contact moved vertically.
    pub fn is_vertical(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_vertical(px_tolerance))
    }

    /// Every contact moved left.
    pub fn is_left(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_left(px_tolerance))
    }

    /// Every contact moved right.
    pub fn is_right(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_right(px_tolerance))
    }

    /// Every contact moved up.
    pub fn is_top(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_top(px_tolerance))
    }

    /// Every contact moved down.
    pub fn is_bottom(&self, px_tolerance: f64) -> bool {
        all_agree(self.touches(), |t| t.is_bottom(px_tolerance))
    }

    /// Mean velocity of the known contacts.
    pub fn velocity(&self, direction: Direction) -> f64 {
        average(self.touches(), |t| t.velocity(direction))
    }
}

impl InteractionData for GeneralMultiTouchData {
    fn flush(&mut self) {
        self.touches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn contact(identifier: i64, x: f64, y: f64) -> (Touch, TouchEvent) {
        let at = Point::new(x, y);
        let touch = Touch {
            identifier,
            client: at,
            page: at,
            screen: at,
            ..Touch::default()
        };
        let event = TouchEvent {
            changed_touches: vec![touch.clone()],
            ..TouchEvent::default()
        };
        (touch, event)
    }

    fn init(data: &mut TwoTouchData, identifier: i64, x: f64, y: f64) -> bool {
        let (touch, event) = contact(identifier, x, y);
        data.init_touch(&touch, &event)
    }

    fn move_to(data: &mut TwoTouchData, identifier: i64, x: f64, y: f64) {
        let (touch, event) = contact(identifier, x, y);
        data.copy_touch_to_tgt(&touch, &event);
    }

    fn pinch(src1: (f64, f64), tgt1: (f64, f64), src2: (f64, f64), tgt2: (f64, f64)) -> TwoTouchData {
        let mut data = TwoTouchData::default();
        init(&mut data, 1, src1.0, src1.1);
        init(&mut data, 2, src2.0, src2.1);
        move_to(&mut data, 1, tgt1.0, tgt1.1);
        move_to(&mut data, 2, tgt2.0, tgt2.1);
        data
    }

    #[test]
    fn slots_fill_in_arrival_order() {
        let mut data = TwoTouchData::default();
        assert!(init(&mut data, 20, 1.0, 1.0));
        assert!(init(&mut data, 21, 2.0, 2.0));
        assert_eq!(data.touch1().src.identifier, Some(20));
        assert_eq!(data.touch2().src.identifier, Some(21));

        let before = data.clone();
        assert!(!init(&mut data, 22, 3.0, 3.0));
        assert_eq!(data, before);
    }

    #[test]
    fn known_contact_only_updates_target() {
        let mut data = TwoTouchData::default();
        init(&mut data, 5, 1.0, 1.0);
        init(&mut data, 5, 9.0, 9.0);
        assert_eq!(data.len(), 1);
        assert_eq!(data.touch1().src.base.client, Point::new(1.0, 1.0));
        assert_eq!(data.touch1().tgt.base.client, Point::new(9.0, 9.0));
    }

    #[test]
    fn scaling_ratio_of_valid_pinch() {
        let data = pinch((10.0, 10.0), (0.0, 1.0), (15.0, 15.0), (20.0, 10.0));
        assert!((data.scaling_ratio(10.0) - 3.1016).abs() < 1e-3);
    }

    #[test]
    fn scaling_ratio_rejects_same_direction() {
        let data = pinch((10.0, 10.0), (20.0, 20.0), (15.0, 15.0), (25.0, 25.0));
        assert_eq!(data.scaling_ratio(10.0), 0.0);
    }

    #[test]
    fn scaling_ratio_rejects_deviation_and_degenerate_input() {
        let data = pinch((10.0, 10.0), (0.0, 1.0), (15.0, 15.0), (20.0, 10.0));
        assert_eq!(data.scaling_ratio(1.0), 0.0);

        let coincident = pinch((10.0, 10.0), (5.0, 5.0), (0.0, 0.0), (5.0, 5.0));
        assert_eq!(coincident.scaling_ratio(10.0), 0.0);
    }

    #[test]
    fn rotation_of_a_quarter_turn() {
        let data = pinch((0.0, 0.0), (0.0, 0.0), (10.0, 0.0), (0.0, 10.0));
        assert!((data.rotation_angle() - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn directions_hold_only_when_all_contacts_agree() {
        let both_right = pinch((0.0, 0.0), (50.0, 1.0), (0.0, 20.0), (40.0, 22.0));
        assert!(both_right.is_right(5.0));
        assert!(both_right.is_horizontal(5.0));
        assert!(!both_right.is_left(5.0));
        assert_eq!(both_right.diff_screen_x(), 45.0);

        let split = pinch((0.0, 0.0), (50.0, 1.0), (0.0, 20.0), (-40.0, 22.0));
        assert!(!split.is_right(5.0));
        assert!(split.is_horizontal(5.0));

        assert!(!TwoTouchData::default().is_horizontal(5.0));
    }

    #[test]
    fn general_data_tracks_any_number_of_contacts() {
        let mut data = GeneralMultiTouchData::default();
        for id in 0..6 {
            let (touch, event) = contact(id, id as f64, 0.0);
            data.init_touch(&touch, &event);
        }
        assert_eq!(data.len(), 6);
        let (touch, event) = contact(3, 30.0, 0.0);
        assert!(data.copy_touch_to_tgt(&touch, &event));
        assert_eq!(data.touch(3).map(|t| t.diff_screen_x()), Some(27.0));
        assert!(data.remove_touch(3).is_some());
        assert_eq!(data.len(), 5);
    }
}
