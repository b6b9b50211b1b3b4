//! # Gesture FSM
//!
//! Composable finite state machines turning raw UI input events into
//! high-level user interactions: presses, timed multi-clicks, drag-and-drop,
//! long presses, multi-touch pans and pinches, keyboard sequences and
//! widget edits.
//!
//! ## Features
//!
//! - **Explicit FSMs**: init, standard, terminal and cancelling states with
//!   guarded transitions, tried in registration order
//! - **Composition**: sub-FSM transitions and AND/XOR/NOT concurrent composites
//! - **Host-driven timeouts**: timeout transitions arm a [`PendingTimeout`]
//!   the host fires; an async [`drive`] loop is provided over `tokio`
//! - **Lifecycle handlers**: start, update, stop and cancel notifications,
//!   with cancellation requested from a handler
//! - **Interaction data**: typed, flushable data accumulated by transition actions
//! - **PlantUML export**: state diagrams through the visitor API
//!
//! ## Quick Start
//!
//! ```rust
//! use gesture_fsm::prelude::*;
//! use gesture_fsm::interactions;
//!
//! # fn main() -> Result<()> {
//! let mut dnd = Interaction::new(interactions::dnd()?);
//!
//! dnd.process(&Event::pointer(PointerKind::Down, 10.0, 10.0));
//! dnd.process(&Event::pointer(PointerKind::Move, 40.0, 10.0));
//! assert!(dnd.is_running());
//! assert_eq!(dnd.data().diff_client_x(), 30.0);
//!
//! let outcome = dnd.process_event(&Event::pointer(PointerKind::Up, 50.0, 10.0));
//! assert_eq!(outcome, Outcome::Terminated);
//! assert!(!dnd.is_running());
//! # Ok(())
//! # }
//! ```
//!
//! Custom machines are assembled with [`FsmBuilder`]:
//!
//! ```rust
//! use gesture_fsm::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut hover = FsmBuilder::<()>::new("hover")
//!     .std_state("inside")
//!     .terminal_state("left")
//!     .transition("init", "inside", |t| Transition::on(EventType::MouseEnter, t))
//!     .transition("inside", "left", |t| Transition::on(EventType::MouseLeave, t))
//!     .build()?;
//!
//! assert!(hover.process(&Event::pointer(PointerKind::Enter, 0.0, 0.0), &mut ()));
//! assert_eq!(
//!     hover.process_event(&Event::pointer(PointerKind::Leave, 0.0, 0.0), &mut ()),
//!     Outcome::Terminated
//! );
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

mod builder;
mod concurrent;
mod error;
mod event;
mod fsm;
mod handler;
mod interaction;
mod machine;
mod observable;
mod state;
mod timeout;
mod transition;
mod visitor;

pub mod data;
pub mod interactions;

#[cfg(feature = "plantuml")]
mod plantuml;

#[cfg(feature = "tokio-integration")]
mod driver;

pub use builder::FsmBuilder;
pub use concurrent::{ConcurrentAndFsm, ConcurrentXorFsm, NotFsm};
pub use data::InteractionData;
pub use error::{FsmError, HandlerError, Result, UnknownEventType};
pub use event::{
    Event, EventType, KeyEvent, Modifiers, PointerEvent, PointerKind, ScrollEvent, TargetId,
    Touch, TouchEvent, TouchKind, WheelEvent, WidgetEvent, WidgetKind, WidgetOracle,
};
pub use fsm::{Fsm, StateChange};
pub use handler::{FsmHandler, HandlerId, HandlerResult};
pub use interaction::Interaction;
pub use machine::{Machine, Outcome};
pub use observable::{Observable, SubscriptionId};
pub use state::{StateId, StateKind, StateView};
pub use timeout::{Instant, PendingTimeout, TimerId};
pub use transition::{Action, DurationFn, Guard, Transition, TransitionKind, TransitionView};
pub use visitor::{walk_fsm, FsmVisitor, StateCollector};

#[cfg(feature = "plantuml")]
#[cfg_attr(docsrs, doc(cfg(feature = "plantuml")))]
pub use plantuml::PlantUmlVisitor;

#[cfg(feature = "tokio-integration")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-integration")))]
pub use driver::{drive, EventSource};

#[cfg(feature = "tokio-integration")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio-integration")))]
pub use tokio::time::Duration;

#[cfg(not(feature = "tokio-integration"))]
pub use std::time::Duration;

pub mod prelude {
    //! Prelude module for convenient imports
    pub use crate::{
        Event, EventType, Fsm, FsmBuilder, FsmError, FsmHandler, HandlerError, HandlerResult,
        Interaction, InteractionData, Machine, Outcome, PointerKind, Result, StateId, TouchKind,
        Transition,
    };
    pub use std::time::Duration;
}
