use super::InteractionData;
use crate::event::TargetId;

/// The widget an interaction was performed on and the value it reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetData<T> {
    /// Widget the value comes from
    pub widget: Option<TargetId>,
    /// Value reported by the widget
    pub value: T,
}

impl<T> WidgetData<T> {
    /// Record a widget and its value.
    pub fn set(&mut self, widget: Option<TargetId>, value: T) {
        self.widget = widget;
        self.value = value;
    }
}

impl<T: Default> InteractionData for WidgetData<T> {
    fn flush(&mut self) {
        self.widget = None;
        self.value = T::default();
    }
}
