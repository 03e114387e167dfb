//! `stackcard render`: Compose a config with the built-in cards.

use std::path::PathBuf;
use std::sync::Arc;

use stackcard_cards::default_registry;
use stackcard_compose::size::child_size;
use stackcard_compose::{Arrangement, StackCard, StackDirection};
use stackcard_config::{CompositionOptions, load_raw};
use stackcard_core::{Environment, Theme};

pub struct RenderArgs {
    pub file: PathBuf,
    pub width: Option<u32>,
    pub dark: bool,
    pub height: Option<f32>,
}

pub async fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let card = compose(&args).await?;
    print!("{}", describe(&card).await);
    Ok(())
}

/// Load, configure and mount the stack described by `args`.
pub async fn compose(args: &RenderArgs) -> Result<StackCard, Box<dyn std::error::Error>> {
    let raw = load_raw(&args.file)?;
    tracing::debug!(path = %args.file.display(), "Rendering stack config");
    let mut options = CompositionOptions::from_raw(&raw)?;
    if let Some(width) = args.width {
        options = options.with_viewport_width(width);
    }

    let mut card = StackCard::new(Arc::new(default_registry())).with_options(options);
    card.set_environment(Arc::new(Environment::new().with_theme(Theme {
        dark_mode: args.dark,
        primary_color: None,
    })));
    card.initialize(&raw).await?;

    // Stand in for the host's resize observer.
    if let (Some(height), Some(reporter), Some(mut updates)) =
        (args.height, card.resize_reporter(), card.size_updates())
    {
        if reporter.report(height) {
            updates.changed().await?;
        }
    }
    Ok(card)
}

/// Human-readable summary of a mounted stack.
pub async fn describe(card: &StackCard) -> String {
    let mut lines = Vec::new();

    if let Some(fallback) = card.fallback() {
        lines.push(format!("{}: {}", fallback.title(), fallback.detail()));
        lines.push(format!("size: {}", card.size().await));
        return lines.join("\n") + "\n";
    }

    if let Some(container) = card.container() {
        if !container.title().is_empty() {
            lines.push(format!("# {}", container.title()));
        }
        lines.push(format!("layout: {}", arrangement_summary(container.arrangement())));
        lines.push(format!("container: {}", container.style().to_inline()));
    }
    if !card.root_style().is_empty() {
        lines.push(format!("theme: {}", card.root_style().to_inline()));
    }

    for (index, handle) in card.handles().iter().enumerate() {
        let child = handle.card();
        let mut line = format!("[{index}] {} size={}", child.card_type(), child_size(child).await);
        if handle.is_placeholder() {
            line.push_str(&format!(
                " (failed: {})",
                handle.config().card_type().unwrap_or("<no type>")
            ));
        }
        if !child.style().is_empty() {
            line.push_str(&format!(" style=\"{}\"", child.style().to_inline()));
        }
        lines.push(line);
    }

    lines.push(format!("size: {}", card.size().await));
    lines.join("\n") + "\n"
}

fn arrangement_summary(arrangement: &Arrangement) -> String {
    match arrangement {
        Arrangement::Stack {
            direction: StackDirection::Column,
            gap,
        } => format!("vertical stack, gap {gap}px"),
        Arrangement::Stack {
            direction: StackDirection::Row,
            gap,
        } => format!("horizontal stack, gap {gap}px"),
        Arrangement::Grid(grid) => format!(
            "grid `{}`, {} columns, gap {}px",
            grid.columns, grid.column_count, grid.gap
        ),
    }
}
