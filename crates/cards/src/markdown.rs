//! Markdown card: static text with an optional header.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use stackcard_core::{
    Card, CardBuilder, CardConfig, CardError, CardId, Environment, PartRegion, RebuildSignal,
    StyleMap,
};

use crate::base::CardBase;
use crate::parse_options;

/// Text lines that fit in one size unit.
const LINES_PER_UNIT: u32 = 4;

#[derive(Debug, Deserialize)]
struct MarkdownOptions {
    content: String,
    #[serde(default)]
    title: Option<String>,
}

pub struct MarkdownCard {
    base: CardBase,
    content: String,
    title: Option<String>,
    parts: PartRegion,
    frame: StyleMap,
}

impl MarkdownCard {
    pub fn new(content: impl Into<String>, title: Option<String>) -> Self {
        Self {
            base: CardBase::new(),
            content: content.into(),
            title,
            parts: PartRegion::with_parts(["header", "content"]),
            frame: StyleMap::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn request_rebuild(&self) -> bool {
        self.base.request_rebuild()
    }

    /// Rows of text including the header.
    fn line_count(&self) -> u32 {
        let body = self.content.lines().count().max(1) as u32;
        body + u32::from(self.title.is_some())
    }
}

#[async_trait]
impl Card for MarkdownCard {
    fn id(&self) -> CardId {
        self.base.id
    }

    fn card_type(&self) -> &str {
        "markdown"
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
        Some(self.line_count().div_ceil(LINES_PER_UNIT))
    }

    fn parts_mut(&mut self) -> Option<&mut PartRegion> {
        Some(&mut self.parts)
    }

    fn inner_frame_mut(&mut self) -> Option<&mut StyleMap> {
        Some(&mut self.frame)
    }
}

pub struct MarkdownBuilder;

#[async_trait]
impl CardBuilder for MarkdownBuilder {
    fn card_type(&self) -> &str {
        "markdown"
    }

    async fn build(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        let options: MarkdownOptions = parse_options("markdown", config)?;
        Ok(Box::new(MarkdownCard::new(options.content, options.title)))
    }
}
