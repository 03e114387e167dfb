//! Style and environment propagation.
//!
//! Styles go onto every child on each full or partial render. The
//! environment is forwarded by reference and never causes a child to be
//! re-created.

use std::collections::BTreeMap;
use std::sync::Arc;

use stackcard_core::{Card, Environment, StyleMap};
use tracing::debug;

/// Applies a config's style overrides to cards.
#[derive(Debug, Clone, Default)]
pub struct StylePropagator {
    styles: StyleMap,
    parts: BTreeMap<String, StyleMap>,
}

impl StylePropagator {
    pub fn new(styles: StyleMap, parts: BTreeMap<String, StyleMap>) -> Self {
        Self { styles, parts }
    }

    /// Apply every override this propagator carries to one card.
    pub fn apply(&self, card: &mut dyn Card) {
        card.style_mut().merge(&self.styles);

        if !self.parts.is_empty() {
            match card.parts_mut() {
                Some(region) => {
                    for (part, declarations) in &self.parts {
                        match region.part_mut(part) {
                            Some(target) => target.merge(declarations),
                            None => debug!(part = %part, "Card does not expose part, skipping"),
                        }
                    }
                }
                None => debug!(card_type = card.card_type(), "Card has no part region"),
            }
        }

        // The outer container supplies the only visual frame.
        if let Some(frame) = card.inner_frame_mut() {
            frame.set_property("box-shadow", "none");
            frame.set_property("border-radius", "0");
            frame.set_property("border", "none");
        }
    }
}

/// Hand `environment` to a card unless it already holds that same reference.
///
/// Returns `true` if the card was updated.
pub fn forward_environment(card: &mut dyn Card, environment: &Arc<Environment>) -> bool {
    if card
        .environment()
        .is_some_and(|current| Arc::ptr_eq(current, environment))
    {
        return false;
    }
    card.set_environment(Arc::clone(environment));
    true
}

/// Custom properties derived from the environment's theme.
///
/// `None` when the environment carries no theme.
pub fn theme_properties(environment: &Environment) -> Option<StyleMap> {
    let theme = environment.themes.as_ref()?;
    let dark = theme.dark_mode;

    let mut props = StyleMap::new();
    props.set_property("--card-background", if dark { "#1e1e1e" } else { "#ffffff" });
    props.set_property(
        "--primary-color",
        theme.primary_color.as_deref().unwrap_or("#1976d2"),
    );
    props.set_property("--text-color", if dark { "#ffffff" } else { "#000000" });
    Some(props)
}
