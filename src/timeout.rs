//! Pending timeouts of timeout transitions.
//!
//! The engine owns no timer. Entering a state that has a timeout transition
//! arms a [`PendingTimeout`]; the host schedules it on its own timer facility
//! and calls back [`Machine::fire_timeout`](crate::Machine::fire_timeout) with
//! its id once the deadline passes. Stale ids are ignored, so cancelling is
//! just dropping the pending record.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Clock of [`PendingTimeout`] deadlines: tokio's, so that paused or
/// advanced tokio time applies, when `tokio-integration` is enabled.
#[cfg(feature = "tokio-integration")]
pub use tokio::time::Instant;

/// Clock of [`PendingTimeout`] deadlines.
#[cfg(not(feature = "tokio-integration"))]
pub use std::time::Instant;

/// Process-unique identifier of an armed timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A timeout waiting for the host to fire it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimeout {
    /// Id to pass back to `fire_timeout`
    pub id: TimerId,
    /// Delay computed when the state was entered
    pub duration: Duration,
    /// When the state was entered, on the [`Instant`] clock
    pub armed_at: Instant,
}

impl PendingTimeout {
    pub(crate) fn arm(duration: Duration) -> Self {
        Self {
            id: TimerId::next(),
            duration,
            armed_at: Instant::now(),
        }
    }

    /// When the timeout is due: `armed_at + duration`.
    pub fn deadline(&self) -> Instant {
        self.armed_at + self.duration
    }

    /// The earlier of two optional timeouts.
    pub(crate) fn earliest(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.deadline() < a.deadline() { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = PendingTimeout::arm(Duration::from_millis(10));
        let b = PendingTimeout::arm(Duration::from_millis(10));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn earliest_picks_nearest_deadline() {
        let long = PendingTimeout::arm(Duration::from_secs(10));
        let short = PendingTimeout::arm(Duration::from_millis(1));
        assert_eq!(PendingTimeout::earliest(Some(long), Some(short)), Some(short));
        assert_eq!(PendingTimeout::earliest(None, Some(long)), Some(long));
        assert_eq!(PendingTimeout::earliest(None, None), None);
    }
}
