//! Site settings: the read-only, site-wide values every resolver consults.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Settings are loaded once (from a JSON or YAML file, or from text already
//! fetched from the CMS) and passed by reference into resolvers.
//!
//! ```yaml
//! palette:
//!   primary: { value: "#0066cc" }
//!   accent: { value: "#4ecdc4" }
//! imageCdn:
//!   projectId: abc123
//!   dataset: production
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::palette::Palette;

/// CDN origin used when none is configured.
pub const DEFAULT_CDN_BASE_URL: &str = "https://cdn.sanity.io";
/// Dataset used when none is configured.
pub const DEFAULT_DATASET: &str = "production";

/// Overrides `imageCdn.projectId`.
pub const PROJECT_ID_ENV: &str = "MARQUEE_IMAGE_PROJECT_ID";
/// Overrides `imageCdn.dataset`.
pub const DATASET_ENV: &str = "MARQUEE_IMAGE_DATASET";

/// Where image URLs point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageCdnConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

impl ImageCdnConfig {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            base_url: None,
            project_id: Some(project_id.into()),
            dataset: Some(dataset.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        non_empty(self.base_url.as_deref()).unwrap_or(DEFAULT_CDN_BASE_URL)
    }

    pub fn project_id(&self) -> Option<&str> {
        non_empty(self.project_id.as_deref())
    }

    pub fn dataset(&self) -> &str {
        non_empty(self.dataset.as_deref()).unwrap_or(DEFAULT_DATASET)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Site-wide settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub palette: Palette,
    pub image_cdn: ImageCdnConfig,
}

impl SiteSettings {
    pub fn from_json_str(content: &str) -> Result<Self, ResolveError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ResolveError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load settings from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, does not parse, or has another
    /// extension.
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let settings = match extension.as_deref() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            _ => {
                return Err(ResolveError::UnsupportedSettingsFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        tracing::debug!(path = %path.display(), "Loaded site settings");
        Ok(settings)
    }

    /// Apply overrides from `lookup` (variable name to value).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup(PROJECT_ID_ENV) {
            self.image_cdn.project_id = Some(project_id);
        }
        if let Some(dataset) = lookup(DATASET_ENV) {
            self.image_cdn.dataset = Some(dataset);
        }
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::BaseColor;
    use std::collections::HashMap;

    #[test]
    fn test_cdn_defaults() {
        let cdn = ImageCdnConfig::default();
        assert_eq!(cdn.base_url(), DEFAULT_CDN_BASE_URL);
        assert_eq!(cdn.dataset(), DEFAULT_DATASET);
        assert_eq!(cdn.project_id(), None);

        let blank = ImageCdnConfig {
            base_url: Some(String::new()),
            project_id: Some(String::new()),
            dataset: Some(String::new()),
        };
        assert_eq!(blank.base_url(), DEFAULT_CDN_BASE_URL);
        assert_eq!(blank.project_id(), None);
        assert_eq!(blank.dataset(), DEFAULT_DATASET);
    }

    #[test]
    fn test_from_json_str() {
        let settings = SiteSettings::from_json_str(
            r##"{
                "palette": { "primary": { "value": "#112233" } },
                "imageCdn": { "projectId": "abc123", "dataset": "staging" }
            }"##,
        )
        .unwrap();
        assert_eq!(settings.palette.base_color(BaseColor::Primary), "#112233");
        assert_eq!(settings.image_cdn.project_id(), Some("abc123"));
        assert_eq!(settings.image_cdn.dataset(), "staging");
    }

    #[test]
    fn test_from_yaml_str() {
        let settings = SiteSettings::from_yaml_str(
            "palette:\n  accent:\n    value: \"#abcdef\"\nimageCdn:\n  projectId: p1\n",
        )
        .unwrap();
        assert_eq!(settings.palette.base_color(BaseColor::Accent), "#abcdef");
        assert_eq!(settings.image_cdn.project_id(), Some("p1"));
        assert_eq!(settings.image_cdn.dataset(), DEFAULT_DATASET);
    }

    #[test]
    fn test_empty_documents_are_defaults() {
        assert_eq!(SiteSettings::from_json_str("{}").unwrap(), SiteSettings::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = SiteSettings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ResolveError::Json(_)));
    }

    #[test]
    fn test_overrides() {
        let env = HashMap::from([(PROJECT_ID_ENV, "from-env".to_string())]);
        let settings = SiteSettings::default().with_overrides(|name| env.get(name).cloned());
        assert_eq!(settings.image_cdn.project_id(), Some("from-env"));
        assert_eq!(settings.image_cdn.dataset(), DEFAULT_DATASET);
    }
}
