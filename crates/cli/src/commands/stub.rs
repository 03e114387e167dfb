//! `stackcard stub`: Print the starting config for editors.

use clap::ValueEnum;
use stackcard_compose::StackCard;
use stackcard_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StubFormat {
    Json,
    Toml,
}

pub fn run(format: StubFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render(format)?);
    Ok(())
}

pub fn render(format: StubFormat) -> Result<String, Error> {
    let stub = StackCard::stub_config();
    match format {
        StubFormat::Json => Ok(serde_json::to_string_pretty(&stub)?),
        StubFormat::Toml => toml::to_string_pretty(&stub).map_err(|e| Error::Internal(e.to_string())),
    }
}
