//! Configuration normalization and loading for stackcard.
//!
//! A stack config arrives from the host as a raw JSON-like object. It is
//! validated and defaulted into an immutable [`StackConfig`]; a new one is
//! built for every full render. Configs can also be loaded from TOML or
//! JSON files for the CLI.

pub mod grid;
pub mod options;

use serde::{Deserialize, Serialize};
use stackcard_core::{CardConfig, StyleMap};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use grid::{GridAlignment, GridConfig, GridTracks};
pub use options::{CompositionOptions, SizeStrategy};

/// A validated, defaulted stack configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Header shown on the container (empty = no header)
    pub title: String,

    /// Child configs, in display order. Never empty.
    pub cards: Vec<CardConfig>,

    /// Resolved layout mode
    pub layout: LayoutMode,

    /// Gap between children in px
    pub spacing: u32,

    /// Minimum column width in px for the responsive grid
    pub min_width: u32,

    /// Flat overrides applied to every child root
    pub styles: StyleMap,

    /// Overrides keyed by part name
    pub parts: BTreeMap<String, StyleMap>,

    /// Explicit grid parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
}

/// How children are arranged, before any viewport override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    StackVertical,
    StackHorizontal,
    ResponsiveGrid,
    ExplicitGrid,
}

/// The optional fields of a raw config. `cards` is checked separately so
/// its three failure modes stay distinguishable.
#[derive(Debug, Deserialize)]
struct RawStackConfig {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    horizontal: bool,

    #[serde(default)]
    responsive: bool,

    #[serde(default = "default_spacing")]
    spacing: u32,

    #[serde(default = "default_min_width", alias = "minWidth")]
    min_width: u32,

    #[serde(default)]
    styles: StyleMap,

    #[serde(default)]
    parts: BTreeMap<String, StyleMap>,

    #[serde(default)]
    grid: Option<GridConfig>,
}

fn default_spacing() -> u32 {
    8
}
fn default_min_width() -> u32 {
    300
}

impl StackConfig {
    /// Validate and default a raw config object.
    ///
    /// Fails when `cards` is absent, not a sequence, or empty. No other
    /// state is touched.
    pub fn normalize(raw: &serde_json::Value) -> Result<Self, ConfigError> {
        let object = raw.as_object().ok_or(ConfigError::NotAnObject)?;

        let cards = match object.get("cards") {
            None | Some(serde_json::Value::Null) => return Err(ConfigError::MissingCards),
            Some(serde_json::Value::Array(cards)) => cards,
            Some(_) => return Err(ConfigError::CardsNotASequence),
        };
        if cards.is_empty() {
            return Err(ConfigError::EmptyCards);
        }

        let parsed: RawStackConfig = serde_json::from_value(raw.clone())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        let layout = if parsed.grid.is_some() {
            LayoutMode::ExplicitGrid
        } else if parsed.responsive {
            LayoutMode::ResponsiveGrid
        } else if parsed.horizontal {
            LayoutMode::StackHorizontal
        } else {
            LayoutMode::StackVertical
        };

        Ok(Self {
            title: parsed.title.unwrap_or_default(),
            cards: cards.iter().cloned().map(CardConfig::new).collect(),
            layout,
            spacing: parsed.spacing,
            min_width: parsed.min_width,
            styles: parsed.styles,
            parts: parsed.parts,
            grid: parsed.grid,
        })
    }

    /// Load and normalize a config file (`.json`, otherwise TOML).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = load_raw(path)?;
        Self::normalize(&raw)
    }

    /// The starting config offered to editors. It has no cards yet, so it
    /// does not normalize until one is added.
    pub fn stub() -> serde_json::Value {
        serde_json::json!({
            "cards": [],
            "title": "Vertical Stack",
            "spacing": 8
        })
    }
}

/// Read a config file into a raw JSON value without normalizing it.
pub fn load_raw(path: &Path) -> Result<serde_json::Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parse_error = |reason: String| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason,
    };

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let raw = if is_json {
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        let value: toml::Value = toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
        serde_json::to_value(value).map_err(|e| parse_error(e.to_string()))?
    };

    tracing::debug!(path = %path.display(), "Loaded raw stack config");
    Ok(raw)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid card configuration: config must be an object")]
    NotAnObject,

    #[error("Invalid card configuration: \"cards\" array is required")]
    MissingCards,

    #[error("Invalid card configuration: \"cards\" must be an array")]
    CardsNotASequence,

    #[error("Invalid card configuration: \"cards\" must not be empty")]
    EmptyCards,

    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
