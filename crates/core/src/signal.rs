//! Rebuild signals: a card's request to be re-created in place.
//!
//! Every card owns a [`RebuildSignal`]. The composition attaches exactly one
//! single-shot listener per card per generation; firing the signal consumes
//! that listener and forwards a [`RebuildRequest`] to the composition's
//! queue. Cancelling the [`Subscription`] detaches the listener so a
//! superseded card can no longer reach the queue.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::card::CardId;

/// A queued request to rebuild the card at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildRequest {
    /// Position of the handle in the composition
    pub index: usize,
    /// Generation the listener was registered under
    pub generation: u64,
    /// The card that fired
    pub card: CardId,
}

struct Listener {
    id: Uuid,
    request: RebuildRequest,
    tx: mpsc::UnboundedSender<RebuildRequest>,
}

type Slot = Arc<Mutex<Option<Listener>>>;

/// The emitting side, owned by a card.
///
/// Clones share the same listener slot.
#[derive(Clone, Default)]
pub struct RebuildSignal {
    slot: Slot,
}

impl std::fmt::Debug for RebuildSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RebuildSignal")
            .field("listening", &self.is_listening())
            .finish()
    }
}

impl RebuildSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a single-shot listener, replacing any previous one.
    pub fn subscribe(
        &self,
        request: RebuildRequest,
        tx: mpsc::UnboundedSender<RebuildRequest>,
    ) -> Subscription {
        let id = Uuid::new_v4();
        *lock(&self.slot) = Some(Listener { id, request, tx });
        Subscription {
            slot: Arc::downgrade(&self.slot),
            id,
        }
    }

    /// Fire the signal. Returns `true` if a listener received it.
    ///
    /// The listener is consumed: a second emit without a fresh
    /// subscription is a no-op.
    pub fn emit(&self) -> bool {
        let listener = lock(&self.slot).take();
        match listener {
            Some(l) => l.tx.send(l.request).is_ok(),
            None => false,
        }
    }

    /// Whether a listener is currently attached.
    pub fn is_listening(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

/// The composition's handle on one attached listener.
#[derive(Debug)]
pub struct Subscription {
    slot: Weak<Mutex<Option<Listener>>>,
    id: Uuid,
}

impl Subscription {
    /// Detach the listener if it is still the one this subscription created.
    ///
    /// Returns `true` if a live listener was removed.
    pub fn cancel(self) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };
        let mut guard = lock(&slot);
        if guard.as_ref().is_some_and(|l| l.id == self.id) {
            *guard = None;
            true
        } else {
            false
        }
    }

    /// Whether this subscription's listener is still attached and unfired.
    pub fn is_active(&self) -> bool {
        self.slot
            .upgrade()
            .is_some_and(|slot| lock(&slot).as_ref().is_some_and(|l| l.id == self.id))
    }
}

fn lock(slot: &Mutex<Option<Listener>>) -> std::sync::MutexGuard<'_, Option<Listener>> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
