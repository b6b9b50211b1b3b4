use std::rc::Rc;

use super::TYPING_IDLE;
use crate::builder::FsmBuilder;
use crate::data::WidgetData;
use crate::error::Result;
use crate::event::{Event, EventType, WidgetKind, WidgetOracle};
use crate::fsm::Fsm;
use crate::transition::Transition;

fn reported_value(event: &Event) -> String {
    event.as_widget().map(|w| w.value.clone()).unwrap_or_default()
}

fn set_value(event: &Event, data: &mut WidgetData<String>) {
    data.set(event.target(), reported_value(event));
}

/// A click on a button.
pub fn button_pressed(oracle: Rc<dyn WidgetOracle>) -> Result<Fsm<WidgetData<()>>> {
    FsmBuilder::new("button pressed")
        .terminal_state("pressed")
        .transition("init", "pressed", |t| {
            Transition::on_widget(EventType::Click, t, WidgetKind::Button, oracle)
                .with_action(|event, data: &mut WidgetData<()>| data.set(event.target(), ()))
        })
        .build()
}

/// A checkbox toggled; the data holds its new state.
pub fn box_checked(oracle: Rc<dyn WidgetOracle>) -> Result<Fsm<WidgetData<bool>>> {
    FsmBuilder::new("box checked")
        .terminal_state("checked")
        .transition("init", "checked", |t| {
            Transition::on_widget(EventType::Input, t, WidgetKind::Checkbox, oracle).with_action(
                |event, data: &mut WidgetData<bool>| {
                    let value = reported_value(event);
                    data.set(event.target(), value == "true" || value == "on");
                },
            )
        })
        .build()
}

/// An entry picked in a combobox.
pub fn combobox_selected(oracle: Rc<dyn WidgetOracle>) -> Result<Fsm<WidgetData<String>>> {
    FsmBuilder::new("combobox selected")
        .terminal_state("selected")
        .transition("init", "selected", |t| {
            Transition::on_widget(EventType::Input, t, WidgetKind::ComboBox, oracle)
                .with_action(set_value)
        })
        .build()
}

/// Edits of a text input, closed after [`TYPING_IDLE`] without input.
pub fn text_input_changed(oracle: Rc<dyn WidgetOracle>) -> Result<Fsm<WidgetData<String>>> {
    let looping = Rc::clone(&oracle);
    FsmBuilder::new("text input changed")
        .std_state("edited")
        .terminal_state("ended")
        .transition("init", "edited", |t| {
            Transition::on_widget(EventType::Input, t, WidgetKind::TextInput, oracle)
                .with_action(set_value)
        })
        .transition("edited", "edited", |t| {
            Transition::on_widget(EventType::Input, t, WidgetKind::TextInput, looping)
                .with_action(set_value)
        })
        .transition("edited", "ended", |t| Transition::timeout(t, |_| TYPING_IDLE))
        .build()
}
