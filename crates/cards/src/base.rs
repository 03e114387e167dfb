//! State every built-in card carries.

use std::sync::Arc;

use stackcard_core::{CardId, Environment, RebuildSignal, StyleMap};

/// Identity, root style, environment and rebuild signal.
#[derive(Debug, Default)]
pub struct CardBase {
    pub id: CardId,
    pub style: StyleMap,
    pub environment: Option<Arc<Environment>>,
    pub signal: RebuildSignal,
}

impl CardBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the owning composition to re-create this card.
    ///
    /// Returns `false` if nobody is listening, e.g. the card was already
    /// replaced or the composition was torn down.
    pub fn request_rebuild(&self) -> bool {
        self.signal.emit()
    }

    /// State of `entity_id` in the current environment.
    pub fn entity_state(&self, entity_id: &str) -> Option<&serde_json::Value> {
        self.environment.as_ref()?.state(entity_id)
    }
}
