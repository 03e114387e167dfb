//! Card trait: the capability surface of one mounted child.
//!
//! A card always has a root style, a settable environment and a rebuild
//! signal. Everything else is optional and has a documented fallback:
//!
//! | Capability | Absent means |
//! |---|---|
//! | `card_size` | the card counts as size 1 |
//! | `parts_mut` | per-part overrides are skipped |
//! | `inner_frame_mut` | no inner frame to strip |

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::environment::Environment;
use crate::signal::RebuildSignal;
use crate::style::{PartRegion, StyleMap};

/// Identity of one card instance. Re-creating a card yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The configuration of one child, as given by the host.
///
/// The composition never validates its schema; it only reads `type` to
/// route divider rows and hands the whole object to the factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardConfig(serde_json::Value);

impl CardConfig {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The `type` field, if present and a string.
    pub fn card_type(&self) -> Option<&str> {
        self.0.get("type").and_then(|t| t.as_str())
    }

    /// Divider rows are created through the factory's row path.
    pub fn is_divider(&self) -> bool {
        self.card_type() == Some("divider")
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for CardConfig {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// One mounted child.
#[async_trait]
pub trait Card: Send + Sync {
    /// Identity of this instance.
    fn id(&self) -> CardId;

    /// The card type this instance was created for (e.g., "markdown").
    fn card_type(&self) -> &str;

    fn environment(&self) -> Option<&Arc<Environment>>;

    fn set_environment(&mut self, environment: Arc<Environment>);

    /// Declarations on the card's root element.
    fn style(&self) -> &StyleMap;

    fn style_mut(&mut self) -> &mut StyleMap;

    /// The card's rebuild signal.
    fn rebuild_signal(&self) -> &RebuildSignal;

    /// Abstract size of this card, if it can report one.
    async fn card_size(&self) -> Option<u32> {
        None
    }

    /// Named sub-elements open to per-part overrides.
    fn parts_mut(&mut self) -> Option<&mut PartRegion> {
        None
    }

    /// The nested card frame inside this card's own rendering subtree.
    fn inner_frame_mut(&mut self) -> Option<&mut StyleMap> {
        None
    }
}
