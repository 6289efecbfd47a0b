//! Small CMS payload shapes shared by several resolvers.
//!
//! Copyright (c) 2025 Posit, PBC

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A color literal as authored in the CMS.
///
/// Color-picker fields arrive as objects (`{ "value": "#123456" }`, or
/// `{ "hex": "#123456", ... }` from the stock picker), while older documents
/// stored a bare string. Both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Bare(String),
    Picker {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hex: Option<String>,
    },
}

impl ColorValue {
    pub fn new(hex: impl Into<String>) -> Self {
        ColorValue::Picker {
            value: Some(hex.into()),
            hex: None,
        }
    }

    /// The literal color string, if one was authored. Empty strings count as
    /// absent.
    pub fn as_str(&self) -> Option<&str> {
        let raw = match self {
            ColorValue::Bare(s) => Some(s.as_str()),
            ColorValue::Picker { value, hex } => value.as_deref().or(hex.as_deref()),
        };
        raw.filter(|s| !s.is_empty())
    }
}

/// A CMS slug (`{ "current": "acme" }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default)]
    pub current: Option<String>,
}

/// A dereferenced document reference as returned by a CMS projection.
///
/// Only the slug matters for routing; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    #[serde(default)]
    pub slug: Option<Slug>,
}

impl DocumentRef {
    pub fn with_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(Slug {
                current: Some(slug.into()),
            }),
        }
    }

    /// `slug.current`, treating an empty slug as missing.
    pub fn slug(&self) -> Option<&str> {
        self.slug
            .as_ref()
            .and_then(|s| s.current.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Deserialize an optional CMS field, treating a value of the wrong shape
/// (a shade stored as `"50"`, a string where an object belongs) as absent.
pub(crate) fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            tracing::debug!(error = %err, "Ignoring malformed CMS field");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_value_shapes() {
        let bare: ColorValue = serde_json::from_value(json!("#123456")).unwrap();
        let picker: ColorValue = serde_json::from_value(json!({ "value": "#123456" })).unwrap();
        let stock: ColorValue =
            serde_json::from_value(json!({ "_type": "color", "hex": "#123456", "alpha": 1 }))
                .unwrap();

        assert_eq!(bare.as_str(), Some("#123456"));
        assert_eq!(picker.as_str(), Some("#123456"));
        assert_eq!(stock.as_str(), Some("#123456"));
    }

    #[test]
    fn test_color_value_empty_is_absent() {
        let empty: ColorValue = serde_json::from_value(json!({ "value": "" })).unwrap();
        let missing: ColorValue = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.as_str(), None);
        assert_eq!(missing.as_str(), None);
        assert_eq!(ColorValue::Bare(String::new()).as_str(), None);
    }

    #[test]
    fn test_document_ref_slug() {
        assert_eq!(DocumentRef::with_slug("acme").slug(), Some("acme"));
        assert_eq!(DocumentRef::default().slug(), None);

        let empty: DocumentRef =
            serde_json::from_value(json!({ "slug": { "current": "" } })).unwrap();
        assert_eq!(empty.slug(), None);

        let unrelated: DocumentRef =
            serde_json::from_value(json!({ "_ref": "abc", "title": "Legal" })).unwrap();
        assert_eq!(unrelated.slug(), None);
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Field {
        #[serde(deserialize_with = "deserialize_lenient")]
        shade: Option<f64>,
    }

    #[test]
    fn test_deserialize_lenient() {
        let ok: Field = serde_json::from_value(json!({ "shade": 40 })).unwrap();
        assert_eq!(ok.shade, Some(40.0));

        let wrong: Field = serde_json::from_value(json!({ "shade": "40" })).unwrap();
        assert_eq!(wrong.shade, None);

        let null: Field = serde_json::from_value(json!({ "shade": null })).unwrap();
        assert_eq!(null.shade, None);

        let missing: Field = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.shade, None);
    }
}
