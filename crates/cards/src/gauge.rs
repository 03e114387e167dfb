//! Gauge card: one numeric entity state within a range.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use stackcard_core::{
    Card, CardBuilder, CardConfig, CardError, CardId, Environment, RebuildSignal, StyleMap,
};
use tracing::debug;

use crate::base::CardBase;
use crate::parse_options;

#[derive(Debug, Deserialize)]
struct GaugeOptions {
    entity: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    min: f64,
    #[serde(default = "default_max")]
    max: f64,
}

fn default_max() -> f64 {
    100.0
}

pub struct GaugeCard {
    base: CardBase,
    entity: String,
    name: Option<String>,
    min: f64,
    max: f64,
    frame: StyleMap,
}

impl GaugeCard {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Display name, falling back to the entity id.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.entity)
    }

    /// Current numeric state, if the environment has a parsable one.
    pub fn value(&self) -> Option<f64> {
        let state = self.base.entity_state(&self.entity)?;
        let raw = state.get("state").unwrap_or(state);
        match raw {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Position of the current value within `[min, max]`, clamped to `0.0..=1.0`.
    pub fn fraction(&self) -> Option<f64> {
        let value = self.value()?;
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }
}

#[async_trait]
impl Card for GaugeCard {
    fn id(&self) -> CardId {
        self.base.id
    }

    fn card_type(&self) -> &str {
        "gauge"
    }

    fn environment(&self) -> Option<&Arc<Environment>> {
        self.base.environment.as_ref()
    }

    fn set_environment(&mut self, environment: Arc<Environment>) {
        self.base.environment = Some(environment);
        debug!(entity = %self.entity, value = ?self.value(), "Gauge environment updated");
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

    async fn card_size(&self) -> Option<u32> {
        Some(2)
    }

    fn inner_frame_mut(&mut self) -> Option<&mut StyleMap> {
        Some(&mut self.frame)
    }
}

pub struct GaugeBuilder;

#[async_trait]
impl CardBuilder for GaugeBuilder {
    fn card_type(&self) -> &str {
        "gauge"
    }

    async fn build(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        let options: GaugeOptions = parse_options("gauge", config)?;
        if options.entity.trim().is_empty() {
            return Err(CardError::InvalidConfig {
                card_type: "gauge".into(),
                reason: "entity must not be empty".into(),
            });
        }
        if options.min >= options.max {
            return Err(CardError::InvalidConfig {
                card_type: "gauge".into(),
                reason: format!("min ({}) must be below max ({})", options.min, options.max),
            });
        }

        Ok(Box::new(GaugeCard {
            base: CardBase::new(),
            entity: options.entity,
            name: options.name,
            min: options.min,
            max: options.max,
            frame: StyleMap::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gauge(extra: serde_json::Value) -> GaugeCard {
        let mut config = json!({"type": "gauge", "entity": "sensor.cpu"});
        if let (Some(base), Some(extra)) = (config.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        let options: GaugeOptions = parse_options("gauge", &CardConfig::new(config)).unwrap();
        GaugeCard {
            base: CardBase::new(),
            entity: options.entity,
            name: options.name,
            min: options.min,
            max: options.max,
            frame: StyleMap::new(),
        }
    }

    #[tokio::test]
    async fn missing_entity_is_invalid() {
        let err = GaugeBuilder
            .build(&CardConfig::new(json!({"type": "gauge"})))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("entity"));
    }

    #[tokio::test]
    async fn inverted_range_is_invalid() {
        let err = GaugeBuilder
            .build(&CardConfig::new(json!({"type": "gauge", "entity": "sensor.x", "min": 10, "max": 5})))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("must be below"));
    }

    #[test]
    fn reads_value_from_environment() {
        let mut card = gauge(json!({"max": 200}));
        assert_eq!(card.value(), None);

        card.set_environment(Arc::new(
            Environment::new().with_state("sensor.cpu", json!({"state": "50"})),
        ));
        assert_eq!(card.value(), Some(50.0));
        assert_eq!(card.fraction(), Some(0.25));
    }

    #[test]
    fn fraction_is_clamped() {
        let mut card = gauge(json!({}));
        card.set_environment(Arc::new(Environment::new().with_state("sensor.cpu", json!(140))));
        assert_eq!(card.fraction(), Some(1.0));
    }

    #[test]
    fn name_falls_back_to_entity() {
        assert_eq!(gauge(json!({})).name(), "sensor.cpu");
        assert_eq!(gauge(json!({"name": "CPU"})).name(), "CPU");
    }
}
