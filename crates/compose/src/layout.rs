//! Layout engine: decides how the container arranges its children.
//!
//! Resolution order, highest priority first:
//!
//! 1. explicit grid (`grid` in the config)
//! 2. responsive auto-fit grid
//! 3. horizontal stack
//! 4. vertical stack
//!
//! Below the responsive breakpoint everything collapses to a single
//! vertical column, whatever was resolved above.

use stackcard_config::{GridAlignment, GridConfig, GridTracks, LayoutMode, StackConfig};
use stackcard_core::{CompositionError, StyleMap};

/// Inner padding of the stack container, in px.
pub const CONTAINER_PADDING_PX: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Column,
    Row,
}

/// A resolved grid template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTemplate {
    pub columns: String,
    pub rows: Option<String>,
    /// Number of column tracks the template produces at the current width
    pub column_count: usize,
    pub gap: u32,
    pub align: Option<GridAlignment>,
}

/// The arrangement applied to the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrangement {
    Stack { direction: StackDirection, gap: u32 },
    Grid(GridTemplate),
}

impl Arrangement {
    pub fn gap(&self) -> u32 {
        match self {
            Self::Stack { gap, .. } => *gap,
            Self::Grid(grid) => grid.gap,
        }
    }

    /// Number of columns used to lay out `children` items.
    pub fn column_count(&self, children: usize) -> usize {
        match self {
            Self::Stack { direction: StackDirection::Column, .. } => 1,
            Self::Stack { direction: StackDirection::Row, .. } => children.max(1),
            Self::Grid(grid) => grid.column_count,
        }
    }

    pub fn is_single_column(&self) -> bool {
        matches!(self, Self::Stack { direction: StackDirection::Column, .. })
    }

    /// Structural declarations for the container element.
    pub fn declarations(&self) -> StyleMap {
        let mut style = StyleMap::new();
        style.set_property("padding", format!("{CONTAINER_PADDING_PX}px"));
        style.set_property("gap", format!("{}px", self.gap()));
        match self {
            Self::Stack { direction, .. } => {
                style.set_property("display", "flex");
                style.set_property(
                    "flex-direction",
                    match direction {
                        StackDirection::Column => "column",
                        StackDirection::Row => "row",
                    },
                );
            }
            Self::Grid(grid) => {
                style.set_property("display", "grid");
                style.set_property("grid-template-columns", grid.columns.clone());
                if let Some(rows) = &grid.rows {
                    style.set_property("grid-template-rows", rows.clone());
                }
                if let Some(align) = grid.align {
                    style.set_property("align-items", align.as_css());
                }
            }
        }
        style
    }
}

/// Resolves arrangements against a viewport width.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    breakpoint: u32,
}

impl LayoutEngine {
    pub fn new(breakpoint: u32) -> Self {
        Self { breakpoint }
    }

    pub fn breakpoint(&self) -> u32 {
        self.breakpoint
    }

    /// Resolve the arrangement for `config` at `viewport_width`.
    ///
    /// An invalid explicit grid fails even on narrow viewports, so setup
    /// errors do not depend on the window size.
    pub fn resolve(
        &self,
        config: &StackConfig,
        viewport_width: u32,
    ) -> Result<Arrangement, CompositionError> {
        let gap = config
            .grid
            .as_ref()
            .and_then(|g| g.gap)
            .unwrap_or(config.spacing);

        let resolved = match (config.layout, &config.grid) {
            (LayoutMode::ExplicitGrid, Some(grid)) => Arrangement::Grid(explicit_grid(grid, gap)?),
            (LayoutMode::ExplicitGrid, None) => {
                return Err(CompositionError::Setup(
                    "explicit grid layout without grid parameters".into(),
                ));
            }
            (LayoutMode::ResponsiveGrid, _) => {
                let available = viewport_width.saturating_sub(2 * CONTAINER_PADDING_PX);
                Arrangement::Grid(GridTemplate {
                    columns: format!("repeat(auto-fit, minmax({}px, 1fr))", config.min_width),
                    rows: None,
                    column_count: auto_fit_columns(available, config.min_width, gap),
                    gap,
                    align: None,
                })
            }
            (LayoutMode::StackHorizontal, _) => Arrangement::Stack {
                direction: StackDirection::Row,
                gap,
            },
            (LayoutMode::StackVertical, _) => Arrangement::Stack {
                direction: StackDirection::Column,
                gap,
            },
        };

        if viewport_width < self.breakpoint {
            return Ok(Arrangement::Stack {
                direction: StackDirection::Column,
                gap,
            });
        }
        Ok(resolved)
    }
}

/// How many `min_width` tracks fit into `available` px with `gap` between them.
pub fn auto_fit_columns(available: u32, min_width: u32, gap: u32) -> usize {
    if min_width == 0 {
        return 1;
    }
    let fitting = (u64::from(available) + u64::from(gap)) / (u64::from(min_width) + u64::from(gap));
    usize::try_from(fitting).unwrap_or(usize::MAX).max(1)
}

fn explicit_grid(grid: &GridConfig, gap: u32) -> Result<GridTemplate, CompositionError> {
    let (columns, column_count) = match &grid.columns {
        Some(tracks) => track_template(tracks)?,
        None => ("1fr".to_string(), 1),
    };
    let rows = grid
        .rows
        .as_ref()
        .map(|tracks| track_template(tracks).map(|(template, _)| template))
        .transpose()?;

    Ok(GridTemplate {
        columns,
        rows,
        column_count,
        gap,
        align: grid.align,
    })
}

/// Template string and track count for one track list.
fn track_template(tracks: &GridTracks) -> Result<(String, usize), CompositionError> {
    match tracks {
        GridTracks::Count(0) => Err(CompositionError::InvalidTracks(
            "track count must be at least 1".into(),
        )),
        GridTracks::Count(n) => Ok((format!("repeat({n}, 1fr)"), *n as usize)),
        GridTracks::Sizes(sizes) => {
            if sizes.is_empty() || sizes.iter().any(|s| s.trim().is_empty()) {
                return Err(CompositionError::InvalidTracks(format!("{sizes:?}")));
            }
            Ok((sizes.join(" "), sizes.len()))
        }
        GridTracks::Raw(raw) => {
            let raw = raw.trim();
            let count = count_tracks(raw)?;
            Ok((raw.to_string(), count))
        }
    }
}

/// Deepest `repeat(` nesting accepted in a raw track template.
const MAX_REPEAT_DEPTH: usize = 4;

/// Count the tracks in a raw template such as `repeat(2, 1fr) 100px`.
///
/// `repeat(auto-fit, …)` and `repeat(auto-fill, …)` count as one track
/// since their real count depends on the rendered width.
fn count_tracks(template: &str) -> Result<usize, CompositionError> {
    count_tracks_at(template, 0).ok_or_else(|| CompositionError::InvalidTracks(template.to_string()))
}

fn count_tracks_at(template: &str, depth: usize) -> Option<usize> {
    if depth > MAX_REPEAT_DEPTH {
        return None;
    }
    let tokens = split_top_level(template)?;
    if tokens.is_empty() {
        return None;
    }

    let mut total: usize = 0;
    for token in tokens {
        let Some(inner) = token
            .strip_prefix("repeat(")
            .and_then(|t| t.strip_suffix(')'))
        else {
            total = total.checked_add(1)?;
            continue;
        };
        let (count, tracks) = inner.split_once(',')?;
        let tracks = match count.trim() {
            "auto-fit" | "auto-fill" => {
                count_tracks_at(tracks.trim(), depth + 1)?;
                1
            }
            n => {
                let n: usize = n.parse().ok().filter(|n| *n > 0)?;
                n.checked_mul(count_tracks_at(tracks.trim(), depth + 1)?)?
            }
        };
        total = total.checked_add(tracks)?;
    }
    Some(total)
}

/// Split on whitespace outside parentheses. `None` if unbalanced.
fn split_top_level(s: &str) -> Option<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (i, c) in s.char_indices() {
        match c {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => {
                depth = depth.checked_sub(1)?;
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(st) = start.take() {
                    tokens.push(&s[st..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if depth != 0 {
        return None;
    }
    if let Some(st) = start {
        tokens.push(&s[st..]);
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> StackConfig {
        StackConfig::normalize(&value).unwrap()
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(600)
    }

    #[test]
    fn default_is_vertical_stack() {
        let arrangement = engine().resolve(&config(json!({"cards": [{"type": "a"}]})), 1024).unwrap();
        assert_eq!(
            arrangement,
            Arrangement::Stack { direction: StackDirection::Column, gap: 8 }
        );
        let style = arrangement.declarations();
        assert_eq!(style.get("display"), Some("flex"));
        assert_eq!(style.get("flex-direction"), Some("column"));
        assert_eq!(style.get("gap"), Some("8px"));
    }

    #[test]
    fn horizontal_stack_is_one_row() {
        let c = config(json!({"cards": [{"type": "a"}, {"type": "b"}], "horizontal": true, "spacing": 4}));
        let arrangement = engine().resolve(&c, 1024).unwrap();
        assert_eq!(arrangement, Arrangement::Stack { direction: StackDirection::Row, gap: 4 });
        assert_eq!(arrangement.column_count(2), 2);
    }

    #[test]
    fn responsive_grid_fits_columns_to_width() {
        let c = config(json!({"cards": [{"type": "a"}], "responsive": true, "minWidth": 300}));
        let Arrangement::Grid(grid) = engine().resolve(&c, 1024).unwrap() else {
            panic!("expected grid");
        };
        assert_eq!(grid.columns, "repeat(auto-fit, minmax(300px, 1fr))");
        // 1008px available: (1008 + 8) / (300 + 8) = 3
        assert_eq!(grid.column_count, 3);
    }

    #[test]
    fn explicit_grid_overrides_responsive() {
        let c = config(json!({
            "cards": [{"type": "a"}],
            "responsive": true,
            "grid": {"columns": 2, "rows": ["auto", "1fr"], "gap": 16, "align": "start"}
        }));
        let arrangement = engine().resolve(&c, 1024).unwrap();
        let Arrangement::Grid(grid) = &arrangement else {
            panic!("expected grid");
        };
        assert_eq!(grid.columns, "repeat(2, 1fr)");
        assert_eq!(grid.rows.as_deref(), Some("auto 1fr"));
        assert_eq!(grid.column_count, 2);
        assert_eq!(arrangement.gap(), 16);

        let style = arrangement.declarations();
        assert_eq!(style.get("grid-template-rows"), Some("auto 1fr"));
        assert_eq!(style.get("align-items"), Some("start"));
    }

    #[test]
    fn narrow_viewport_forces_single_column() {
        let c = config(json!({"cards": [{"type": "a"}], "grid": {"columns": 3, "gap": 10}}));
        let arrangement = engine().resolve(&c, 599).unwrap();
        assert!(arrangement.is_single_column());
        assert_eq!(arrangement.gap(), 10);
        assert_eq!(arrangement.column_count(5), 1);

        let c = config(json!({"cards": [{"type": "a"}], "horizontal": true}));
        assert!(engine().resolve(&c, 320).unwrap().is_single_column());
    }

    #[test]
    fn raw_track_strings_are_counted() {
        assert_eq!(count_tracks("1fr 2fr 100px").unwrap(), 3);
        assert_eq!(count_tracks("repeat(2, 1fr) 100px").unwrap(), 3);
        assert_eq!(count_tracks("repeat(2, minmax(100px, 1fr) 50px)").unwrap(), 4);
        assert_eq!(count_tracks("repeat(auto-fill, 120px)").unwrap(), 1);
    }

    #[test]
    fn invalid_tracks_rejected() {
        assert!(count_tracks("").is_err());
        assert!(count_tracks("repeat(2, 1fr").is_err());
        assert!(count_tracks("1fr)").is_err());
        assert!(count_tracks("repeat(0, 1fr)").is_err());
        assert!(count_tracks("repeat(many, 1fr)").is_err());
        assert!(track_template(&GridTracks::Count(0)).is_err());
        assert!(track_template(&GridTracks::Sizes(vec![])).is_err());
    }

    #[test]
    fn invalid_grid_fails_even_when_narrow() {
        let c = config(json!({"cards": [{"type": "a"}], "grid": {"columns": "repeat(2, 1fr"}}));
        assert!(matches!(
            engine().resolve(&c, 300),
            Err(CompositionError::InvalidTracks(_))
        ));
    }

    #[test]
    fn oversized_repeat_counts_are_rejected() {
        assert!(count_tracks("repeat(18446744073709551615, 1fr 1fr)").is_err());
        assert!(count_tracks("repeat(99999999999999999999, 1fr)").is_err());
        assert!(count_tracks("100px repeat(18446744073709551615, 1fr)").is_err());

        let c = config(json!({
            "cards": [{"type": "a"}],
            "grid": {"columns": "repeat(18446744073709551615, 1fr 1fr)"}
        }));
        assert!(matches!(
            engine().resolve(&c, 1024),
            Err(CompositionError::InvalidTracks(_))
        ));
    }

    #[test]
    fn deeply_nested_repeat_is_rejected() {
        assert_eq!(count_tracks("repeat(2, repeat(3, 1fr))").unwrap(), 6);
        let nested = "repeat(2, ".repeat(8) + "1fr" + &")".repeat(8);
        assert!(count_tracks(&nested).is_err());
    }

    #[test]
    fn extreme_min_width_and_spacing_fit_one_column() {
        let c = config(json!({
            "cards": [{"type": "a"}],
            "responsive": true,
            "minWidth": u32::MAX,
            "spacing": 1
        }));
        let Arrangement::Grid(grid) = engine().resolve(&c, 1024).unwrap() else {
            panic!("expected grid");
        };
        assert_eq!(grid.column_count, 1);

        assert_eq!(auto_fit_columns(u32::MAX, u32::MAX, u32::MAX), 1);
        assert_eq!(auto_fit_columns(u32::MAX, 1, 0), u32::MAX as usize);
        assert_eq!(auto_fit_columns(1000, 100, u32::MAX), 1);
    }

    #[test]
    fn auto_fit_never_below_one() {
        assert_eq!(auto_fit_columns(100, 300, 8), 1);
        assert_eq!(auto_fit_columns(1000, 0, 8), 1);
        assert_eq!(auto_fit_columns(616, 300, 16), 2);
    }
}
