//! Card factory: turns one child config into a mounted card.
//!
//! The composition never looks up card implementations itself; it is
//! handed a [`CardFactory`]. [`CardRegistry`] is the default factory:
//! a table of [`CardBuilder`]s keyed by card type, with a separate table
//! for row elements such as dividers.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::card::{Card, CardConfig};
use crate::error::CardError;

/// The factory capability the composition depends on.
#[async_trait]
pub trait CardFactory: Send + Sync {
    /// Create a card element. May fail for malformed configs.
    async fn create(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError>;

    /// Create a row element (dividers and other non-card entries).
    async fn create_row(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError>;

    /// Route a config to the card or row path.
    async fn create_element(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        if config.is_divider() {
            self.create_row(config).await
        } else {
            self.create(config).await
        }
    }
}

/// Builds cards of one type.
#[async_trait]
pub trait CardBuilder: Send + Sync {
    /// The card type this builder handles (e.g., "markdown").
    fn card_type(&self) -> &str;

    async fn build(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError>;
}

/// A registry of card and row builders.
pub struct CardRegistry {
    cards: HashMap<String, Box<dyn CardBuilder>>,
    rows: HashMap<String, Box<dyn CardBuilder>>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self {
            cards: HashMap::new(),
            rows: HashMap::new(),
        }
    }

    /// Register a card builder. Replaces any existing builder for the same type.
    pub fn register(&mut self, builder: Box<dyn CardBuilder>) {
        let card_type = builder.card_type().to_string();
        self.cards.insert(card_type, builder);
    }

    /// Register a row builder.
    pub fn register_row(&mut self, builder: Box<dyn CardBuilder>) {
        let row_type = builder.card_type().to_string();
        self.rows.insert(row_type, builder);
    }

    /// List all registered card types, sorted.
    pub fn card_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.cards.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// List all registered row types, sorted.
    pub fn row_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.rows.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Whether `config` would reach a registered builder on its path.
    pub fn supports(&self, config: &CardConfig) -> bool {
        let table = if config.is_divider() { &self.rows } else { &self.cards };
        config.card_type().is_some_and(|t| table.contains_key(t))
    }

    async fn build_from(
        table: &HashMap<String, Box<dyn CardBuilder>>,
        config: &CardConfig,
    ) -> Result<Box<dyn Card>, CardError> {
        let Some(card_type) = config.card_type() else {
            debug!("Child config has no type");
            return Err(CardError::MissingType);
        };
        let Some(builder) = table.get(card_type) else {
            warn!(card_type, "No builder registered for card type");
            return Err(CardError::UnknownType(card_type.to_string()));
        };
        debug!(card_type, "Building card");
        builder.build(config).await
    }
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardFactory for CardRegistry {
    async fn create(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        Self::build_from(&self.cards, config).await
    }

    async fn create_row(&self, config: &CardConfig) -> Result<Box<dyn Card>, CardError> {
        Self::build_from(&self.rows, config).await
    }
}
