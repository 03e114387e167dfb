//! Explicit grid parameters.

use serde::{Deserialize, Serialize};

/// Explicit grid settings. When present they take priority over
/// `responsive` and `horizontal`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<GridTracks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<GridTracks>,

    /// Gap in px; falls back to the stack spacing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<GridAlignment>,
}

/// A track list given as a count, a list of sizes, or a raw template.
///
/// ```toml
/// columns = 3                       # repeat(3, 1fr)
/// columns = ["200px", "1fr"]        # 200px 1fr
/// columns = "repeat(2, 1fr) 100px"  # used as written
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridTracks {
    Count(u32),
    Sizes(Vec<String>),
    Raw(String),
}

/// Cross-axis alignment of grid items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAlignment {
    Start,
    End,
    Center,
    Stretch,
}

impl GridAlignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Center => "center",
            Self::Stretch => "stretch",
        }
    }
}
