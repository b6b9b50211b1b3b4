//! Ready-made FSMs for common user interactions.
//!
//! Each factory returns a freshly built machine; wrap it in an
//! [`Interaction`](crate::Interaction) to pair it with its data.

mod keyboard;
mod pointer;
mod touch;
mod widget;

use std::time::Duration;

use crate::error::{FsmError, Result};

pub use keyboard::{escape_key, key_down, key_up, keys_typed};
pub use pointer::{
    cancellable_dnd, click, clicks, dnd, double_click, long_mouse_down, press, scroll, wheel,
};
pub use touch::{long_touch, multi_touch, pan, pinch, tap, PanDirection};
pub use widget::{box_checked, button_pressed, combobox_selected, text_input_changed};

/// Maximum delay between two clicks or taps of a multi-click or multi-tap.
pub const REPEAT_GAP: Duration = Duration::from_millis(1000);

/// Maximum delay between the two clicks of a double click.
pub const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(300);

/// Idle delay closing a typing sequence or a text edition.
pub const TYPING_IDLE: Duration = Duration::from_millis(1000);

fn positive(duration: Duration) -> Result<Duration> {
    if duration.is_zero() {
        Err(FsmError::InvalidDuration)
    } else {
        Ok(duration)
    }
}

fn at_least_one(count: usize) -> Result<usize> {
    if count == 0 {
        Err(FsmError::InvalidCount(count))
    } else {
        Ok(count)
    }
}
