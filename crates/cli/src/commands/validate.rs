//! `stackcard validate`: Normalize a config file and report it.

use std::path::Path;

use stackcard_cards::default_registry;
use stackcard_config::{CompositionOptions, LayoutMode, SizeStrategy, StackConfig, load_raw};
use stackcard_core::Error;

pub async fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating {}...", path.display());

    match check(path) {
        Ok(report) => {
            println!("   ✅ Config is valid\n");
            for line in report {
                println!("   {line}");
            }
            Ok(())
        }
        Err(e) => {
            println!("   ❌ {e}");
            Err(e.into())
        }
    }
}

/// Summary lines for a valid config.
pub fn check(path: &Path) -> Result<Vec<String>, Error> {
    let config_error = |e: stackcard_config::ConfigError| Error::Config {
        message: e.to_string(),
    };
    let raw = load_raw(path).map_err(config_error)?;
    let config = StackConfig::normalize(&raw).map_err(config_error)?;
    let options = CompositionOptions::from_raw(&raw).map_err(config_error)?;

    let layout = match config.layout {
        LayoutMode::StackVertical => "vertical stack",
        LayoutMode::StackHorizontal => "horizontal stack",
        LayoutMode::ResponsiveGrid => "responsive grid",
        LayoutMode::ExplicitGrid => "explicit grid",
    };
    let size = match options.size {
        SizeStrategy::Height { unit_px } => format!("height / {unit_px}px"),
        SizeStrategy::ChildSum => "sum of children".to_string(),
    };
    let types: Vec<&str> = config
        .cards
        .iter()
        .map(|c| c.card_type().unwrap_or("<no type>"))
        .collect();

    let mut report = vec![
        format!("Cards:     {} ({})", config.cards.len(), types.join(", ")),
        format!("Layout:    {layout}"),
        format!("Spacing:   {}px", config.spacing),
    ];
    if config.layout == LayoutMode::ResponsiveGrid {
        report.push(format!("Min width: {}px", config.min_width));
    }
    if !config.title.is_empty() {
        report.push(format!("Title:     {}", config.title));
    }
    report.push(format!("Size:      {size}"));

    let registry = default_registry();
    let unsupported: Vec<&str> = config
        .cards
        .iter()
        .filter(|c| !registry.supports(c))
        .map(|c| c.card_type().unwrap_or("<no type>"))
        .collect();
    if !unsupported.is_empty() {
        report.push(format!(
            "Unknown:   {} (will render as error cards; built-in: {}, rows: {})",
            unsupported.join(", "),
            registry.card_types().join(", "),
            registry.row_types().join(", ")
        ));
    }
    Ok(report)
}
