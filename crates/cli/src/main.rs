//! stackcard CLI: the main entry point.
//!
//! Commands:
//! - `render`  : Compose a config with the built-in cards and print the result
//! - `validate`: Normalize a config file and report what it resolves to
//! - `stub`    : Print the starting config for editors

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "stackcard",
    about = "stackcard: compose cards into one stack",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "STACKCARD_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a config file and print the mounted stack
    Render {
        /// Path to a TOML or JSON stack config
        file: PathBuf,

        /// Viewport width in px
        #[arg(short, long)]
        width: Option<u32>,

        /// Render with a dark theme
        #[arg(long)]
        dark: bool,

        /// Rendered container height in px to report to the size observer
        #[arg(long)]
        height: Option<f32>,
    },

    /// Validate a config file
    Validate {
        /// Path to a TOML or JSON stack config
        file: PathBuf,
    },

    /// Print the stub config
    Stub {
        #[arg(short, long, value_enum, default_value_t = commands::stub::StubFormat::Json)]
        format: commands::stub::StubFormat,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Render {
            file,
            width,
            dark,
            height,
        } => {
            commands::render::run(commands::render::RenderArgs {
                file,
                width,
                dark,
                height,
            })
            .await?
        }
        Commands::Validate { file } => commands::validate::run(&file).await?,
        Commands::Stub { format } => commands::stub::run(format)?,
    }

    Ok(())
}
