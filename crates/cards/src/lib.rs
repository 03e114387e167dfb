//! Built-in card implementations for stackcard.
//!
//! Each card exposes a different slice of the optional capabilities, so a
//! composition of them exercises every fallback:
//!
//! | Card | Size | Parts | Inner frame |
//! |---|---|---|---|
//! | `markdown` | by line count | `header`, `content` | yes |
//! | `gauge` | 2 | - | yes |
//! | `entities` | rows + header | `header`, `row` | - |
//! | `divider` (row) | - | - | - |

pub mod base;
pub mod divider;
pub mod entities;
pub mod gauge;
pub mod markdown;

use stackcard_core::{CardConfig, CardError, CardRegistry};

pub use base::CardBase;
pub use divider::{DividerBuilder, DividerRow};
pub use entities::{EntitiesBuilder, EntitiesCard, EntityRow};
pub use gauge::{GaugeBuilder, GaugeCard};
pub use markdown::{MarkdownBuilder, MarkdownCard};

/// Create a registry with every built-in card and row.
pub fn default_registry() -> CardRegistry {
    let mut registry = CardRegistry::new();
    registry.register(Box::new(MarkdownBuilder));
    registry.register(Box::new(GaugeBuilder));
    registry.register(Box::new(EntitiesBuilder));
    registry.register_row(Box::new(DividerBuilder));
    registry
}

/// Deserialize a child config into a card's typed options.
pub(crate) fn parse_options<T: serde::de::DeserializeOwned>(
    card_type: &str,
    config: &CardConfig,
) -> Result<T, CardError> {
    serde_json::from_value(config.as_value().clone()).map_err(|e| CardError::InvalidConfig {
        card_type: card_type.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackcard_core::CardFactory;

    #[test]
    fn default_registry_has_all_builtins() {
        let registry = default_registry();
        let mut cards = registry.card_types();
        cards.sort();
        assert_eq!(cards, vec!["entities", "gauge", "markdown"]);
        assert_eq!(registry.row_types(), vec!["divider"]);
    }

    #[tokio::test]
    async fn dividers_route_to_row_builder() {
        let registry = default_registry();
        let row = registry
            .create_element(&CardConfig::new(json!({"type": "divider"})))
            .await
            .unwrap();
        assert_eq!(row.card_type(), "divider");
    }

    #[tokio::test]
    async fn unknown_type_is_rejected() {
        let registry = default_registry();
        let err = registry
            .create_element(&CardConfig::new(json!({"type": "picture-glance"})))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, CardError::UnknownType(t) if t == "picture-glance"));
    }
}
