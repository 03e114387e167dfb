//! Composition-level options: size strategy and viewport handling.
//!
//! These live next to the card config under an optional `options` key:
//!
//! ```toml
//! [options]
//! responsive_breakpoint = 600
//! [options.size]
//! strategy = "height"
//! unit_px = 50
//! ```

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the composition computes the size it reports to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SizeStrategy {
    /// Quantize the observed container height: `ceil(height / unit_px)`
    Height {
        #[serde(default = "default_unit_px")]
        unit_px: u32,
    },
    /// Sum the children's own sizes (1 for children without one)
    ChildSum,
}

impl Default for SizeStrategy {
    fn default() -> Self {
        Self::Height {
            unit_px: default_unit_px(),
        }
    }
}

fn default_unit_px() -> u32 {
    50
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionOptions {
    #[serde(default)]
    pub size: SizeStrategy,

    /// Viewport width below which every layout collapses to one column
    #[serde(default = "default_breakpoint")]
    pub responsive_breakpoint: u32,

    /// Viewport width assumed until the host reports one
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
}

fn default_breakpoint() -> u32 {
    600
}
fn default_viewport_width() -> u32 {
    1024
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            size: SizeStrategy::default(),
            responsive_breakpoint: default_breakpoint(),
            viewport_width: default_viewport_width(),
        }
    }
}

impl CompositionOptions {
    /// Read the `options` key of a raw config, defaulting when absent.
    pub fn from_raw(raw: &serde_json::Value) -> Result<Self, ConfigError> {
        match raw.get("options") {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| ConfigError::ValidationError(format!("options: {e}"))),
        }
    }

    pub fn with_size(mut self, size: SizeStrategy) -> Self {
        self.size = size;
        self
    }

    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_height_quantization() {
        let options = CompositionOptions::default();
        assert_eq!(options.size, SizeStrategy::Height { unit_px: 50 });
        assert_eq!(options.responsive_breakpoint, 600);
    }

    #[test]
    fn reads_options_key() {
        let raw = serde_json::json!({
            "cards": [],
            "options": {"size": {"strategy": "child_sum"}, "viewport_width": 480}
        });
        let options = CompositionOptions::from_raw(&raw).unwrap();
        assert_eq!(options.size, SizeStrategy::ChildSum);
        assert_eq!(options.viewport_width, 480);
        assert_eq!(options.responsive_breakpoint, 600);
    }

    #[test]
    fn height_strategy_defaults_unit() {
        let size: SizeStrategy =
            serde_json::from_value(serde_json::json!({"strategy": "height"})).unwrap();
        assert_eq!(size, SizeStrategy::Height { unit_px: 50 });
    }

    #[test]
    fn bad_options_are_validation_errors() {
        let raw = serde_json::json!({"options": {"size": {"strategy": "guess"}}});
        assert!(matches!(
            CompositionOptions::from_raw(&raw),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
