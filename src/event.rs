//! Raw platform events consumed by the FSMs.
//!
//! Events are plain values tagged with an [`EventType`] drawn from a fixed
//! vocabulary. The host UI binding layer converts its native events into these
//! and feeds them to [`Machine::process_event`](crate::Machine::process_event).

use kurbo::Point;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownEventType;

/// Opaque identifier of a UI element, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// The fixed vocabulary of raw event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `mousemove`
    MouseMove,
    /// `mouseenter`
    MouseEnter,
    /// `mouseleave`
    MouseLeave,
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
    /// `click`
    Click,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
    /// `touchend`
    TouchEnd,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
    /// `wheel`
    Wheel,
    /// `scroll`
    Scroll,
    /// `input`
    Input,
    /// `change`
    Change,
    /// Synthetic type carried by [`Event::Timeout`]
    Timeout,
}

impl EventType {
    /// The DOM type string of this event type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::Click => "click",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Wheel => "wheel",
            Self::Scroll => "scroll",
            Self::Input => "input",
            Self::Change => "change",
            Self::Timeout => "timeout",
        }
    }

    /// Pointer types, including the click type.
    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::MouseDown
                | Self::MouseUp
                | Self::MouseMove
                | Self::MouseEnter
                | Self::MouseLeave
                | Self::MouseOver
                | Self::MouseOut
                | Self::Click
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "click" => Self::Click,
            "touchstart" => Self::TouchStart,
            "touchmove" => Self::TouchMove,
            "touchend" => Self::TouchEnd,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "wheel" => Self::Wheel,
            "scroll" => Self::Scroll,
            "input" => Self::Input,
            "change" => Self::Change,
            "timeout" => Self::Timeout,
            other => return Err(UnknownEventType(other.to_string())),
        })
    }
}

/// Modifier key flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Alt (Option) key
    pub alt: bool,
    /// Control key
    pub ctrl: bool,
    /// Meta (Command, Windows) key
    pub meta: bool,
    /// Shift key
    pub shift: bool,
}

/// Pointer (mouse) event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvent {
    /// Which pointer event this is
    pub kind: PointerKind,
    /// Modifier keys held
    pub modifiers: Modifiers,
    /// Position in the viewport
    pub client: Point,
    /// Position in the document
    pub page: Point,
    /// Position on the screen
    pub screen: Point,
    /// Position relative to the target's padding edge
    pub offset: Point,
    /// Movement since the previous pointer event
    pub movement: Point,
    /// Button that changed state
    pub button: i16,
    /// Bitmask of pressed buttons
    pub buttons: u16,
    /// Innermost element under the pointer
    pub target: Option<TargetId>,
    /// Element the listener is attached to
    pub current_target: Option<TargetId>,
    /// Secondary target of enter/leave/over/out events
    pub related_target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

/// The pointer subset of [`EventType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// `mousedown`
    #[default]
    Down,
    /// `mouseup`
    Up,
    /// `mousemove`
    Move,
    /// `mouseenter`
    Enter,
    /// `mouseleave`
    Leave,
    /// `mouseover`
    Over,
    /// `mouseout`
    Out,
    /// `click`
    Click,
}

/// A single contact point of a touch event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Touch {
    /// Stable identifier of the contact for its whole lifetime
    pub identifier: i64,
    /// Position in the viewport
    pub client: Point,
    /// Position in the document
    pub page: Point,
    /// Position on the screen
    pub screen: Point,
    /// Pressure, from `0.0` to `1.0`
    pub force: f64,
    /// Horizontal radius of the contact ellipse
    pub radius_x: f64,
    /// Vertical radius of the contact ellipse
    pub radius_y: f64,
    /// Rotation of the contact ellipse, in degrees
    pub rotation_angle: f64,
    /// Element the contact started on
    pub target: Option<TargetId>,
}

/// Touch event; `changed_touches` lists the contacts this event is about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchEvent {
    /// Which touch event this is
    pub kind: TouchKind,
    /// Modifier keys held
    pub modifiers: Modifiers,
    /// Contacts that changed in this event
    pub changed_touches: Vec<Touch>,
    /// Element the listener is attached to
    pub current_target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

/// The touch subset of [`EventType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TouchKind {
    /// `touchstart`
    #[default]
    Start,
    /// `touchmove`
    Move,
    /// `touchend`
    End,
}

/// Keyboard event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyEvent {
    /// `true` for `keydown`, `false` for `keyup`
    pub down: bool,
    /// Key value, such as `"a"` or `"Escape"`
    pub key: String,
    /// Physical key code
    pub code: String,
    /// Location of the key on the keyboard
    pub location: u32,
    /// Whether the key is held down and auto-repeating
    pub repeat: bool,
    /// Modifier keys held
    pub modifiers: Modifiers,
    /// Focused element
    pub target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

/// Wheel event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelEvent {
    /// Pointer state when the wheel turned
    pub pointer: PointerEvent,
    /// Horizontal scroll amount
    pub delta_x: f64,
    /// Vertical scroll amount
    pub delta_y: f64,
    /// Depth scroll amount
    pub delta_z: f64,
    /// Unit of the deltas: pixels, lines or pages
    pub delta_mode: u32,
}

/// Scroll event with the scrolled element's new offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollEvent {
    /// New horizontal offset
    pub scroll_x: f64,
    /// New vertical offset
    pub scroll_y: f64,
    /// Scrolled element
    pub target: Option<TargetId>,
    /// Milliseconds
    pub timestamp: f64,
}

/// Widget-specific `input`/`change` event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetEvent {
    /// `true` for `change`, `false` for `input`
    pub committed: bool,
    /// Widget the event comes from
    pub target: Option<TargetId>,
    /// Current value of the widget, as reported by the host
    pub value: String,
    /// Milliseconds
    pub timestamp: f64,
}

/// A raw event fed to the FSMs.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Mouse event
    Pointer(PointerEvent),
    /// Touch event
    Touch(TouchEvent),
    /// Keyboard event
    Key(KeyEvent),
    /// Wheel event
    Wheel(WheelEvent),
    /// Scroll event
    Scroll(ScrollEvent),
    /// Widget `input`/`change` event
    Widget(WidgetEvent),
    /// Synthetic event carried by a firing timeout transition
    Timeout,
}

impl Event {
    /// The [`EventType`] tag of this event.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Pointer(p) => match p.kind {
                PointerKind::Down => EventType::MouseDown,
                PointerKind::Up => EventType::MouseUp,
                PointerKind::Move => EventType::MouseMove,
                PointerKind::Enter => EventType::MouseEnter,
                PointerKind::Leave => EventType::MouseLeave,
                PointerKind::Over => EventType::MouseOver,
                PointerKind::Out => EventType::MouseOut,
                PointerKind::Click => EventType::Click,
            },
            Self::Touch(t) => match t.kind {
                TouchKind::Start => EventType::TouchStart,
                TouchKind::Move => EventType::TouchMove,
                TouchKind::End => EventType::TouchEnd,
            },
            Self::Key(k) if k.down => EventType::KeyDown,
            Self::Key(_) => EventType::KeyUp,
            Self::Wheel(_) => EventType::Wheel,
            Self::Scroll(_) => EventType::Scroll,
            Self::Widget(w) if w.committed => EventType::Change,
            Self::Widget(_) => EventType::Input,
            Self::Timeout => EventType::Timeout,
        }
    }

    /// The element the event was dispatched to, if any.
    pub fn target(&self) -> Option<TargetId> {
        match self {
            Self::Pointer(p) => p.target,
            Self::Touch(t) => t.changed_touches.first().and_then(|touch| touch.target),
            Self::Key(k) => k.target,
            Self::Wheel(w) => w.pointer.target,
            Self::Scroll(s) => s.target,
            Self::Widget(w) => w.target,
            Self::Timeout => None,
        }
    }

    /// Pointer payload of pointer and wheel events.
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(p) => Some(p),
            Self::Wheel(w) => Some(&w.pointer),
            _ => None,
        }
    }

    /// Touch payload, if any.
    pub fn as_touch(&self) -> Option<&TouchEvent> {
        match self {
            Self::Touch(t) => Some(t),
            _ => None,
        }
    }

    /// Key payload, if any.
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Wheel payload, if any.
    pub fn as_wheel(&self) -> Option<&WheelEvent> {
        match self {
            Self::Wheel(w) => Some(w),
            _ => None,
        }
    }

    /// Scroll payload, if any.
    pub fn as_scroll(&self) -> Option<&ScrollEvent> {
        match self {
            Self::Scroll(s) => Some(s),
            _ => None,
        }
    }

    /// Widget payload, if any.
    pub fn as_widget(&self) -> Option<&WidgetEvent> {
        match self {
            Self::Widget(w) => Some(w),
            _ => None,
        }
    }

    /// Shorthand for a pointer event at a client position, other coordinates equal.
    pub fn pointer(kind: PointerKind, x: f64, y: f64) -> Self {
        let at = Point::new(x, y);
        Self::Pointer(PointerEvent {
            kind,
            client: at,
            page: at,
            screen: at,
            ..PointerEvent::default()
        })
    }

    /// Shorthand for a single-contact touch event.
    pub fn touch(kind: TouchKind, identifier: i64, x: f64, y: f64) -> Self {
        let at = Point::new(x, y);
        Self::Touch(TouchEvent {
            kind,
            changed_touches: vec![Touch {
                identifier,
                client: at,
                page: at,
                screen: at,
                ..Touch::default()
            }],
            ..TouchEvent::default()
        })
    }

    /// Shorthand for a key event.
    pub fn key(down: bool, key: &str) -> Self {
        Self::Key(KeyEvent {
            down,
            key: key.to_string(),
            code: key.to_string(),
            ..KeyEvent::default()
        })
    }
}

/// The widget categories widget-specific transitions discriminate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Push button
    Button,
    /// Checkbox
    Checkbox,
    /// Combo box or select
    ComboBox,
    /// Color picker
    ColorPicker,
    /// Date picker
    DatePicker,
    /// Numeric spinner
    Spinner,
    /// Hyperlink
    Hyperlink,
    /// Single or multi-line text input
    TextInput,
}

/// Host-supplied classification of UI targets.
///
/// The FSM core holds no knowledge of the widget toolkit; widget transitions
/// only ask this oracle what a target is.
pub trait WidgetOracle {
    /// Category of `target`, or `None` for targets that are not widgets.
    fn kind_of(&self, target: TargetId) -> Option<WidgetKind>;

    /// Whether `target` is a widget of `kind`.
    fn is(&self, target: Option<TargetId>, kind: WidgetKind) -> bool {
        target.and_then(|t| self.kind_of(t)) == Some(kind)
    }
}

impl<F> WidgetOracle for F
where
    F: Fn(TargetId) -> Option<WidgetKind>,
{
    fn kind_of(&self, target: TargetId) -> Option<WidgetKind> {
        self(target)
    }
}
