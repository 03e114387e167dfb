//! Divider row: a horizontal rule between cards.

use std::sync::Arc;

use async_trait::async_trait;
use stackcard_core::{
    Card, CardBuilder, CardConfig, CardError, CardId, Environment, RebuildSignal, StyleMap,
};

use crate::base::CardBase;

/// A row element with no size, parts or inner frame.
pub struct DividerRow {
    base: CardBase,
}

impl Card for DividerRow {
    fn id(&self) -> CardId {
        self.base.id
    }

    fn card_type(&self) -> &str {
        "divider"
    }

    fn environment(&self) -> Option<&Arc<Environment>> {
        self.base.environment.as_ref()
    }

    fn set_environment(&mut self, environment: Arc<Environment>) {
        self.base.environment = Some(environment);
    }

    fn style(&self) -> &StyleMap {
        &self.base.style
    }

    fn style_mut(&mut self) -> &mut StyleMap {
        &mut self.base.style
    }

    fn rebuild_signal(&self) -> &RebuildSignal {
        &self.base.signal
    }
}

pub struct DividerBuilder;

#[async_trait]
impl CardBuilder for DividerBuilder {
    fn card_type(&self) -> &str {
        "divider"
    }

    async fn build(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        let mut base = CardBase::new();
        // A `style` object on the row is applied to its root as-is.
        if let Some(style) = config.get("style").and_then(|s| s.as_object()) {
            for (name, value) in style {
                if let Some(value) = value.as_str() {
                    base.style.set_property(name.as_str(), value);
                }
            }
        }
        Ok(Box::new(DividerRow { base }))
    }
}
