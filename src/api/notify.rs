//! # Change Notifications
//!
//! Replaces a window-global "something changed" event with an explicit
//! subscription handle. The view loop asks the API for a [`Subscription`],
//! polls it once per tick, and drops it when the loop exits; dropping is the
//! unsubscribe.
//!
//! ```text
//! ChangeNotifier ──broadcast──▶ Subscription (TUI loop)
//!        ▲                          │ try_next() each tick
//!   notify(event)                   ▼
//!   (mock writes)           Action::ExternalChange
//! ```

use log::debug;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

use super::types::ChangeEvent;

/// Events buffered per subscriber before older ones are dropped.
const CHANNEL_CAPACITY: usize = 32;

/// Fan-out point for change events.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        debug!("Change subscription opened: {}", id);
        Subscription {
            id,
            rx: self.tx.subscribe(),
        }
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn notify(&self, event: ChangeEvent) -> usize {
        debug!("Change notification: {} ({:?})", event.reason, event.paths);
        // No subscribers is not an error: nobody is looking.
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live registration for change events.
pub struct Subscription {
    id: Uuid,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next pending event without blocking.
    ///
    /// If this subscriber fell behind and events were dropped, a single
    /// synthetic event stands in for everything that was missed.
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Lagged(missed)) => Some(ChangeEvent {
                reason: format!("{missed} missed change notifications"),
                paths: Vec::new(),
            }),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Drain everything pending, collapsing a burst into one event.
    pub fn drain(&mut self) -> Option<ChangeEvent> {
        let mut merged: Option<ChangeEvent> = None;
        while let Some(event) = self.try_next() {
            merged = Some(match merged {
                None => event,
                Some(mut acc) => {
                    acc.paths.extend(event.paths);
                    acc
                }
            });
        }
        merged
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("Change subscription closed: {}", self.id);
    }
}
