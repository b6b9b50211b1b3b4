//! FSM lifecycle observers

use crate::error::HandlerError;

/// Result of a lifecycle hook.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Observer of an FSM's lifecycle.
///
/// Every hook receives a read-only view of the interaction data. Hooks are
/// called synchronously, in registration order, from within
/// [`Machine::process_event`](crate::Machine::process_event).
///
/// Returning [`HandlerError::Cancel`] from `fsm_starts` or `fsm_updates`
/// cancels the running FSM. Any other error is re-delivered to every handler
/// through `fsm_error` and never surfaces from `process_event`.
pub trait FsmHandler<D> {
    /// The FSM left its starting state for the first time since its last reinit.
    fn fsm_starts(&mut self, _data: &D) -> HandlerResult {
        Ok(())
    }

    /// A started FSM moved.
    fn fsm_updates(&mut self, _data: &D) -> HandlerResult {
        Ok(())
    }

    /// A started FSM reached a terminal state.
    fn fsm_stops(&mut self, _data: &D) -> HandlerResult {
        Ok(())
    }

    /// A started FSM was cancelled.
    fn fsm_cancels(&mut self, _data: &D) -> HandlerResult {
        Ok(())
    }

    /// Another handler failed during a lifecycle hook.
    fn fsm_error(&mut self, _error: &HandlerError) {}
}

/// Handle returned by `add_handler`, used to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Outcome of notifying every handler of a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notified {
    Done,
    /// A handler asked for cancellation
    CancelRequested,
}

/// Ordered handler registry shared by plain and composite FSMs.
pub(crate) struct Handlers<D> {
    entries: Vec<(HandlerId, Box<dyn FsmHandler<D>>)>,
    next_id: u64,
}

impl<D> Default for Handlers<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Hook {
    Starts,
    Updates,
    Stops,
    Cancels,
}

impl Hook {
    fn as_str(self) -> &'static str {
        match self {
            Self::Starts => "fsm_starts",
            Self::Updates => "fsm_updates",
            Self::Stops => "fsm_stops",
            Self::Cancels => "fsm_cancels",
        }
    }

    fn may_cancel(self) -> bool {
        matches!(self, Self::Starts | Self::Updates)
    }
}

impl<D> Handlers<D> {
    pub(crate) fn add(&mut self, handler: Box<dyn FsmHandler<D>>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, handler));
        id
    }

    pub(crate) fn remove(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != id);
        before != self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Call `hook` on every handler. A cancellation request stops the
    /// notification; other faults are collected and re-delivered through
    /// `fsm_error` once every handler has been notified.
    ///
    /// Faults are logged at `warn` whatever `log` says.
    pub(crate) fn notify(&mut self, hook: Hook, data: &D, fsm: &str, log: bool) -> Notified {
        let mut errors = Vec::new();
        for (_, handler) in &mut self.entries {
            let result = match hook {
                Hook::Starts => handler.fsm_starts(data),
                Hook::Updates => handler.fsm_updates(data),
                Hook::Stops => handler.fsm_stops(data),
                Hook::Cancels => handler.fsm_cancels(data),
            };
            match result {
                Ok(()) => {}
                Err(HandlerError::Cancel) if hook.may_cancel() => {
                    if log {
                        tracing::debug!(fsm, hook = hook.as_str(), "handler requested cancellation");
                    }
                    self.dispatch_errors(&errors, fsm);
                    return Notified::CancelRequested;
                }
                Err(error) => errors.push(error),
            }
        }
        self.dispatch_errors(&errors, fsm);
        Notified::Done
    }

    fn dispatch_errors(&mut self, errors: &[HandlerError], fsm: &str) {
        for error in errors {
            tracing::warn!(fsm, %error, "FSM handler failed");
            for (_, handler) in &mut self.entries {
                handler.fsm_error(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        tag: &'static str,
        fail_on_stop: bool,
        cancel_on_start: bool,
    }

    impl FsmHandler<()> for Recorder {
        fn fsm_starts(&mut self, _: &()) -> HandlerResult {
            self.log.borrow_mut().push(format!("{}:starts", self.tag));
            if self.cancel_on_start {
                Err(HandlerError::Cancel)
            } else {
                Ok(())
            }
        }

        fn fsm_stops(&mut self, _: &()) -> HandlerResult {
            self.log.borrow_mut().push(format!("{}:stops", self.tag));
            if self.fail_on_stop {
                Err(HandlerError::Failed("boom".into()))
            } else {
                Ok(())
            }
        }

        fn fsm_error(&mut self, error: &HandlerError) {
            self.log.borrow_mut().push(format!("{}:error:{error}", self.tag));
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Recorder {
        Recorder {
            log: Rc::clone(log),
            tag,
            fail_on_stop: false,
            cancel_on_start: false,
        }
    }

    #[test]
    fn notifies_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = Handlers::default();
        handlers.add(Box::new(recorder(&log, "a")));
        handlers.add(Box::new(recorder(&log, "b")));
        assert_eq!(handlers.notify(Hook::Starts, &(), "t", false), Notified::Done);
        assert_eq!(*log.borrow(), vec!["a:starts", "b:starts"]);
    }

    #[test]
    fn faults_become_error_notifications() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = Handlers::default();
        handlers.add(Box::new(Recorder {
            fail_on_stop: true,
            ..recorder(&log, "a")
        }));
        handlers.add(Box::new(recorder(&log, "b")));
        assert_eq!(handlers.notify(Hook::Stops, &(), "t", false), Notified::Done);
        assert_eq!(
            *log.borrow(),
            vec![
                "a:stops",
                "b:stops",
                "a:error:Handler failed: boom",
                "b:error:Handler failed: boom"
            ]
        );
    }

    #[test]
    fn cancel_stops_notification() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = Handlers::default();
        handlers.add(Box::new(Recorder {
            cancel_on_start: true,
            ..recorder(&log, "a")
        }));
        handlers.add(Box::new(recorder(&log, "b")));
        assert_eq!(handlers.notify(Hook::Starts, &(), "t", false), Notified::CancelRequested);
        assert_eq!(*log.borrow(), vec!["a:starts"]);
    }

    #[test]
    fn remove_by_id() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = Handlers::default();
        let a = handlers.add(Box::new(recorder(&log, "a")));
        assert_eq!(handlers.len(), 1);
        assert!(handlers.remove(a));
        assert!(!handlers.remove(a));
        assert_eq!(handlers.len(), 0);
        assert_eq!(handlers.notify(Hook::Stops, &(), "t", false), Notified::Done);
        assert!(log.borrow().is_empty());
    }
}
