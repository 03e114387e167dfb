//! Composition events: diagnostics published by the composition manager.
//!
//! Every render, rebuild and failure is published here so the host (or a
//! test) can observe what happened without reaching into composition state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All composition events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompositionEvent {
    /// A full render began
    RenderStarted {
        generation: u64,
        cards: usize,
        timestamp: DateTime<Utc>,
    },

    /// A full render was mounted
    RenderCommitted {
        generation: u64,
        mounted: usize,
        failed: usize,
        timestamp: DateTime<Utc>,
    },

    /// A full render settled after a newer one started and was thrown away
    RenderDiscarded {
        generation: u64,
        current_generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// One child could not be created and was replaced by a placeholder
    ChildFailed {
        generation: u64,
        index: usize,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// One child was re-created in place
    ChildRebuilt {
        generation: u64,
        index: usize,
        timestamp: DateTime<Utc>,
    },

    /// A rebuild signal from a superseded generation was dropped
    StaleSignalDiscarded {
        index: usize,
        signal_generation: u64,
        current_generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// The whole composition degraded to a single placeholder
    CompositionFailed {
        generation: u64,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The environment was forwarded to the children
    EnvironmentUpdated {
        children: usize,
        timestamp: DateTime<Utc>,
    },

    /// The composition was detached
    TornDown {
        generation: u64,
        released_subscriptions: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for composition events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<CompositionEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: CompositionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<CompositionEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
