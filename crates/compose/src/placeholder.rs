//! Error placeholder card, mounted wherever creation failed.

use std::sync::Arc;

use stackcard_core::{
    Card, CardConfig, CardError, CardId, CompositionError, Environment, RebuildSignal, StyleMap,
};

pub const CARD_ERROR_TITLE: &str = "Card Error";
pub const STACK_ERROR_TITLE: &str = "Stack Card Error";

/// A labeled placeholder carrying the config that failed and why.
#[derive(Debug)]
pub struct ErrorCard {
    id: CardId,
    title: String,
    detail: String,
    origin: serde_json::Value,
    style: StyleMap,
    environment: Option<Arc<Environment>>,
    signal: RebuildSignal,
}

impl ErrorCard {
    fn new(title: &str, detail: String, origin: serde_json::Value) -> Self {
        Self {
            id: CardId::new(),
            title: title.to_string(),
            detail,
            origin,
            style: StyleMap::new(),
            environment: None,
            signal: RebuildSignal::new(),
        }
    }

    /// Placeholder for one child whose creation failed.
    pub fn for_child(config: &CardConfig, error: &CardError) -> Self {
        Self::new(CARD_ERROR_TITLE, error.to_string(), config.as_value().clone())
    }

    /// Placeholder standing in for the whole composition.
    pub fn for_composition(origin: serde_json::Value, error: &CompositionError) -> Self {
        Self::new(STACK_ERROR_TITLE, error.to_string(), origin)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// The config that failed.
    pub fn origin(&self) -> &serde_json::Value {
        &self.origin
    }
}

impl Card for ErrorCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn card_type(&self) -> &str {
        "error"
    }

    fn environment(&self) -> Option<&Arc<Environment>> {
        self.environment.as_ref()
    }

    fn set_environment(&mut self, environment: Arc<Environment>) {
        self.environment = Some(environment);
    }

    fn style(&self) -> &StyleMap {
        &self.style
    }

    fn style_mut(&mut self) -> &mut StyleMap {
        &mut self.style
    }

    fn rebuild_signal(&self) -> &RebuildSignal {
        &self.signal
    }
}
