//! Entities card: a list of entity rows under a header.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use stackcard_core::{
    Card, CardBuilder, CardConfig, CardError, CardId, Environment, PartRegion, RebuildSignal,
    StyleMap,
};

use crate::base::CardBase;
use crate::parse_options;

/// One row: either a bare entity id or an object with a display name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EntityRow {
    Id(String),
    Named {
        entity: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl EntityRow {
    pub fn entity(&self) -> &str {
        match self {
            Self::Id(entity) | Self::Named { entity, .. } => entity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Named { name: Some(name), .. } => name,
            _ => self.entity(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntitiesOptions {
    entities: Vec<EntityRow>,
    #[serde(default)]
    title: Option<String>,
}

pub struct EntitiesCard {
    base: CardBase,
    rows: Vec<EntityRow>,
    title: Option<String>,
    parts: PartRegion,
}

impl EntitiesCard {
    pub fn rows(&self) -> &[EntityRow] {
        &self.rows
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// State text shown for each row; `unavailable` when unknown.
    pub fn row_states(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .map(|row| {
                let state = self
                    .base
                    .entity_state(row.entity())
                    .map(|s| match s.get("state").unwrap_or(s) {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_else(|| "unavailable".to_string());
                (row.name().to_string(), state)
            })
            .collect()
    }
}

#[async_trait]
impl Card for EntitiesCard {
    fn id(&self) -> CardId {
        self.base.id
    }

    fn card_type(&self) -> &str {
        "entities"
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

    async fn card_size(&self) -> Option<u32> {
        Some(self.rows.len() as u32 + 1)
    }

    fn parts_mut(&mut self) -> Option<&mut PartRegion> {
        Some(&mut self.parts)
    }
}

pub struct EntitiesBuilder;

#[async_trait]
impl CardBuilder for EntitiesBuilder {
    fn card_type(&self) -> &str {
        "entities"
    }

    async fn build(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        let options: EntitiesOptions = parse_options("entities", config)?;
        if options.entities.is_empty() {
            return Err(CardError::InvalidConfig {
                card_type: "entities".into(),
                reason: "at least one entity is required".into(),
            });
        }
        Ok(Box::new(EntitiesCard {
            base: CardBase::new(),
            rows: options.entities,
            title: options.title,
            parts: PartRegion::with_parts(["header", "row"]),
        }))
    }
}
