//! Command implementations for the Marquee CLI
//!
//! Each command reads a CMS payload, delegates to marquee-resolve, and
//! prints the resolved value as JSON on stdout.

use std::io::Read;
use std::path::Path;

use anyhow::{Context as _, Result};
use marquee_resolve::SiteSettings;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub mod background;
pub mod color;
pub mod image;
pub mod link;

/// Site-wide state shared by every command.
#[derive(Debug, Default)]
pub struct Context {
    pub settings: SiteSettings,
}

impl Context {
    /// Load settings from `path` (or use defaults), then apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => SiteSettings::load(path)
                .with_context(|| format!("Failed to load site settings from {}", path.display()))?,
            None => {
                debug!("No settings file given, using default palette");
                SiteSettings::default()
            }
        };
        Ok(Self {
            settings: settings.with_env_overrides(),
        })
    }
}

/// Read a JSON payload from a file, or from stdin when `input` is `-`.
pub fn read_payload<T: DeserializeOwned>(input: &str) -> Result<T> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read payload from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read payload from {input}"))?
    };
    parse_payload(&content).with_context(|| format!("Invalid JSON payload in {input}"))
}

pub fn parse_payload<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(serde_json::from_str(content)?)
}

/// Print a value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
