//! Mock cards and a scriptable factory for unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stackcard_core::{
    Card, CardConfig, CardError, CardFactory, CardId, Environment, PartRegion, RebuildSignal,
    StyleMap,
};

pub struct MockCard {
    id: CardId,
    card_type: String,
    style: StyleMap,
    environment: Option<Arc<Environment>>,
    signal: RebuildSignal,
    size: Option<u32>,
    parts: Option<PartRegion>,
    inner_frame: Option<StyleMap>,
}

impl MockCard {
    pub fn new(card_type: &str) -> Self {
        Self {
            id: CardId::new(),
            card_type: card_type.to_string(),
            style: StyleMap::new(),
            environment: None,
            signal: RebuildSignal::new(),
            size: None,
            parts: None,
            inner_frame: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_parts(mut self, names: &[&str]) -> Self {
        self.parts = Some(PartRegion::with_parts(names.iter().copied()));
        self
    }

    pub fn with_inner_frame(mut self) -> Self {
        self.inner_frame = Some(StyleMap::new());
        self
    }

    pub fn part_region(&self) -> Option<&PartRegion> {
        self.parts.as_ref()
    }

    pub fn inner_frame(&self) -> Option<&StyleMap> {
        self.inner_frame.as_ref()
    }
}

#[async_trait]
impl Card for MockCard {
    fn id(&self) -> CardId {
        self.id
    }

    fn card_type(&self) -> &str {
        &self.card_type
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

    async fn card_size(&self) -> Option<u32> {
        self.size
    }

    fn parts_mut(&mut self) -> Option<&mut PartRegion> {
        self.parts.as_mut()
    }

    fn inner_frame_mut(&mut self) -> Option<&mut StyleMap> {
        self.inner_frame.as_mut()
    }
}

/// Builds [`MockCard`]s as scripted by fields of each child config:
///
/// - `delay_ms`: sleep before resolving
/// - `fail`: reject with `CreationFailed`
/// - `size`: the size the card reports
///
/// Types can also be made to fail later with [`ScriptedFactory::fail_type`].
#[derive(Default)]
pub struct ScriptedFactory {
    calls: Mutex<Vec<String>>,
    completions: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_type(&self, card_type: &str) {
        self.failing.lock().unwrap().insert(card_type.to_string());
    }

    pub fn heal_type(&self, card_type: &str) {
        self.failing.lock().unwrap().remove(card_type);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Card types in the order their creation finished.
    pub fn completion_order(&self) -> Vec<String> {
        self.completions.lock().unwrap().clone()
    }

    async fn build(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        let card_type = config.card_type().ok_or(CardError::MissingType)?.to_string();
        self.calls.lock().unwrap().push(card_type.clone());

        if let Some(ms) = config.get("delay_ms").and_then(|v| v.as_u64()) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        self.completions.lock().unwrap().push(card_type.clone());

        let scripted_failure = config.get("fail").and_then(|v| v.as_bool()) == Some(true);
        if scripted_failure || self.failing.lock().unwrap().contains(&card_type) {
            return Err(CardError::CreationFailed {
                card_type,
                reason: "scripted failure".into(),
            });
        }

        let mut card = MockCard::new(&card_type);
        if let Some(size) = config.get("size").and_then(|v| v.as_u64()) {
            card = card.with_size(size as u32);
        }
        Ok(Box::new(card))
    }
}

#[async_trait]
impl CardFactory for ScriptedFactory {
    async fn create(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        self.build(config).await
    }

    async fn create_row(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        self.build(config).await
    }
}
