//! Async driver feeding an [`Interaction`] from an event source.
//!
//! The engine itself never sleeps. [`drive`] runs on a single task: it waits
//! for the next event or for the deadline of the pending timeout, whichever
//! comes first, and hands it to the interaction.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::sleep_until;

use crate::data::InteractionData;
use crate::event::Event;
use crate::interaction::Interaction;
use crate::machine::Machine;

/// An asynchronous stream of raw events. `None` ends the stream.
#[async_trait(?Send)]
pub trait EventSource {
    /// Wait for the next event; `None` once the source is exhausted.
    async fn next_event(&mut self) -> Option<Event>;
}

#[async_trait(?Send)]
impl EventSource for mpsc::Receiver<Event> {
    async fn next_event(&mut self) -> Option<Event> {
        self.recv().await
    }
}

#[async_trait(?Send)]
impl EventSource for mpsc::UnboundedReceiver<Event> {
    async fn next_event(&mut self) -> Option<Event> {
        self.recv().await
    }
}

/// Run `interaction` until `source` ends.
///
/// A pending timeout fires at its [`deadline`](crate::PendingTimeout::deadline),
/// on the tokio clock, so events that leave the armed timer untouched do not
/// push it back.
pub async fn drive<D, M, S>(interaction: &mut Interaction<D, M>, source: &mut S)
where
    D: InteractionData,
    M: Machine<D>,
    S: EventSource + ?Sized,
{
    loop {
        let event = match interaction.pending_timeout() {
            Some(pending) => {
                tokio::select! {
                    event = source.next_event() => event,
                    () = sleep_until(pending.deadline()) => {
                        interaction.fire_timeout(pending.id);
                        continue;
                    }
                }
            }
            None => source.next_event().await,
        };

        match event {
            Some(event) => {
                interaction.process_event(&event);
            }
            None => break,
        }
    }
}
