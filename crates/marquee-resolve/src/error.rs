//! Error types for resolution primitives.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the fallible building blocks (hex parsing, asset
/// references, URL construction, settings loading).
///
/// The resolvers themselves never surface these; they log and fall back.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Hex color is not exactly six hex digits (after an optional `#`)
    #[error("Invalid hex color '{value}': expected 6 hex digits with an optional leading '#'")]
    InvalidHexColor { value: String },

    /// Base color name outside primary/secondary/accent
    #[error("Unknown base color '{0}' (expected primary, secondary or accent)")]
    UnknownBaseColor(String),

    /// Image output format the CDN does not understand
    #[error("Unknown image format '{0}'")]
    UnknownImageFormat(String),

    /// Image fit mode the CDN does not understand
    #[error("Unknown image fit mode '{0}'")]
    UnknownFitMode(String),

    /// Image asset has neither `_ref`, `_id` nor a CDN `url`
    #[error("Image asset has no reference")]
    MissingAssetRef,

    /// Asset reference does not follow `image-<id>-<width>x<height>-<ext>`
    #[error("Invalid image asset reference '{reference}'")]
    InvalidAssetRef { reference: String },

    /// No CDN project id configured, so no image URL can be built
    #[error("Image CDN project id is not configured")]
    MissingCdnProject,

    /// CDN base URL cannot carry path segments (e.g. `mailto:`)
    #[error("Image CDN base URL '{0}' cannot be used as a path base")]
    InvalidCdnBase(String),

    /// CDN base URL failed to parse
    #[error("Invalid image CDN URL: {0}")]
    Url(#[from] url::ParseError),

    /// Site settings file could not be read
    #[error("Failed to read site settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid site settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid site settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Settings file extension is neither JSON nor YAML
    #[error("Unsupported site settings format: {}", .path.display())]
    UnsupportedSettingsFormat { path: PathBuf },
}
