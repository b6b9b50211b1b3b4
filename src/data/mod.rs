//! Interaction data: the payload accumulated by transition actions.
//!
//! Data values are created once per interaction and reused across gesture
//! repetitions. [`InteractionData::flush`] resets a value to its
//! freshly-constructed state; every type here satisfies
//! `{ let mut d = populated; d.flush(); d } == Default::default()`.

mod key;
mod multi_touch;
mod point;
mod scroll;
mod src_tgt;
mod touch;
mod widget;

pub use key::{KeyData, KeysData};
pub use multi_touch::{
    FourTouchData, GeneralMultiTouchData, MultiTouchData, ThreeTouchData, TwoTouchData,
};
pub use point::{PointBaseData, PointData, PointsData};
pub use scroll::{ScrollData, WheelData};
pub use src_tgt::{Direction, PointSource, SrcTgtData, SrcTgtPointsData, SrcTgtTouchData};
pub use touch::{TapsData, TouchData};
pub use widget::WidgetData;

/// Resettable interaction payload.
pub trait InteractionData {
    /// Reset every field to its default. Idempotent.
    fn flush(&mut self);
}

impl InteractionData for () {
    fn flush(&mut self) {}
}
