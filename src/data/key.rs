use super::InteractionData;
use crate::event::{KeyEvent, Modifiers, TargetId};

/// A single key press or release.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyData {
    /// Key value
    pub key: String,
    /// Physical key code
    pub code: String,
    /// Location of the key on the keyboard
    pub location: u32,
    /// Auto-repeat flag
    pub repeat: bool,
    /// Modifier keys held
    pub modifiers: Modifiers,
    /// Focused element
    pub target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

impl KeyData {
    /// Overwrite every field from `event`.
    pub fn copy(&mut self, event: &KeyEvent) {
        self.key.clone_from(&event.key);
        self.code.clone_from(&event.code);
        self.location = event.location;
        self.repeat = event.repeat;
        self.modifiers = event.modifiers;
        self.target = event.target;
        self.timestamp = event.timestamp;
    }

    /// Data holding a copy of `event`.
    pub fn from_event(event: &KeyEvent) -> Self {
        let mut data = Self::default();
        data.copy(event);
        data
    }
}

impl InteractionData for KeyData {
    fn flush(&mut self) {
        *self = Self::default();
    }
}

/// Keys typed in sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeysData {
    /// Keys in typing order
    pub keys: Vec<KeyData>,
}

impl KeysData {
    /// Append `event` to the sequence.
    pub fn add_key(&mut self, event: &KeyEvent) {
        self.keys.push(KeyData::from_event(event));
    }

    /// The typed keys concatenated.
    pub fn text(&self) -> String {
        self.keys.iter().map(|k| k.key.as_str()).collect()
    }
}

impl InteractionData for KeysData {
    fn flush(&mut self) {
        self.keys.clear();
    }
}
