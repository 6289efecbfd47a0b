//! Section background resolution.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A background is an image, a solid color, or a two-stop linear gradient.
//! Color fields exist in two layouts:
//!
//! ```json
//! { "backgroundType": "color", "colorMode": "solid",
//!   "solidColorType": "accent", "solidColorShade": 20 }
//!
//! { "backgroundType": "color", "colorMode": "solid",
//!   "solidColor": { "colorType": "accent", "shade": 20 } }
//! ```
//!
//! The flattened layout is current and the nested one is legacy. When a
//! document carries both, the flattened fields win. [`RawBackground::normalize`]
//! applies that rule once, so resolution only ever sees a
//! [`BackgroundDescriptor`].

use serde::{Deserialize, Serialize};

use crate::image::ImageAsset;
use crate::palette::{BaseColor, ColorReference, Palette, RawColorSelection, resolve_color};
use crate::types::ColorValue;

/// Gradient direction used when none is authored.
pub const DEFAULT_GRADIENT_DIRECTION: &str = "135deg";

/// A normalized background.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundDescriptor {
    /// Image background; the image is turned into URLs at render time.
    Image(Option<ImageAsset>),
    /// Solid color; `None` means the primary color.
    Solid(Option<ColorReference>),
    /// Linear gradient; absent stops mean primary (start) and accent (end).
    Gradient {
        direction: String,
        start: Option<ColorReference>,
        end: Option<ColorReference>,
    },
}

/// A background exactly as the CMS stores it, in either layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBackground {
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub background_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub image: Option<ImageAsset>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub color_mode: Option<String>,

    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub solid_color_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub solid_color_shade: Option<f64>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub solid_custom_color: Option<ColorValue>,
    /// Legacy nested solid color
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub solid_color: Option<RawColorSelection>,

    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_direction: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_start_color_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_start_shade: Option<f64>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_start_custom_color: Option<ColorValue>,
    /// Legacy nested gradient start
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_start_color: Option<RawColorSelection>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_end_color_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_end_shade: Option<f64>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_end_custom_color: Option<ColorValue>,
    /// Legacy nested gradient end
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub gradient_end_color: Option<RawColorSelection>,
}

/// Pick between the flattened fields and the legacy nested object.
///
/// The flattened layout is used whenever its `colorType` is present, even if
/// a nested object exists alongside it.
pub fn select_color_fields(
    color_type: Option<&str>,
    shade: Option<f64>,
    custom_color: Option<&ColorValue>,
    legacy: Option<&RawColorSelection>,
    default_base: BaseColor,
) -> Option<ColorReference> {
    match color_type {
        Some(color_type) => {
            let flattened = RawColorSelection {
                color_type: Some(color_type.to_string()),
                shade,
                custom_color: custom_color.cloned(),
            };
            Some(flattened.normalize(default_base))
        }
        None => legacy.map(|nested| nested.normalize(default_base)),
    }
}

impl RawBackground {
    /// Normalize into a [`BackgroundDescriptor`].
    ///
    /// Only an explicit `backgroundType: "image"` selects an image; any other
    /// value, or none, is a color background. `colorMode` defaults to solid.
    pub fn normalize(&self) -> BackgroundDescriptor {
        if self.background_type.as_deref() == Some("image") {
            return BackgroundDescriptor::Image(self.image.clone());
        }

        match self.color_mode.as_deref() {
            Some("gradient") => BackgroundDescriptor::Gradient {
                direction: self
                    .gradient_direction
                    .clone()
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| DEFAULT_GRADIENT_DIRECTION.to_string()),
                start: select_color_fields(
                    self.gradient_start_color_type.as_deref(),
                    self.gradient_start_shade,
                    self.gradient_start_custom_color.as_ref(),
                    self.gradient_start_color.as_ref(),
                    BaseColor::Primary,
                ),
                end: select_color_fields(
                    self.gradient_end_color_type.as_deref(),
                    self.gradient_end_shade,
                    self.gradient_end_custom_color.as_ref(),
                    self.gradient_end_color.as_ref(),
                    BaseColor::Accent,
                ),
            },
            mode => {
                if let Some(mode) = mode.filter(|m| *m != "solid") {
                    tracing::debug!(color_mode = mode, "Unknown color mode, treating as solid");
                }
                BackgroundDescriptor::Solid(select_color_fields(
                    self.solid_color_type.as_deref(),
                    self.solid_color_shade,
                    self.solid_custom_color.as_ref(),
                    self.solid_color.as_ref(),
                    BaseColor::Primary,
                ))
            }
        }
    }
}

/// Whether a resolved background is drawn from an image or from CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Image,
    Color,
}

/// A background ready for markup.
///
/// Serializes as `{ "type": "color", "css": "#0066cc" }` or
/// `{ "type": "image", "css": null, "image": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBackground {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAsset>,
}

impl ResolvedBackground {
    fn color(css: String) -> Self {
        Self {
            kind: BackgroundKind::Color,
            css: Some(css),
            image: None,
        }
    }

    /// A CSS declaration for color backgrounds (`background-color: ...;` or
    /// `background-image: linear-gradient(...);`). `None` for images.
    pub fn css_declaration(&self) -> Option<String> {
        let css = self.css.as_deref()?;
        let property = if css.starts_with("linear-gradient(") {
            "background-image"
        } else {
            "background-color"
        };
        Some(format!("{property}: {css};"))
    }
}

/// Resolve a background against the palette.
///
/// An absent descriptor is an image background without an image.
pub fn resolve_background(
    descriptor: Option<&BackgroundDescriptor>,
    palette: &Palette,
) -> ResolvedBackground {
    match descriptor {
        None => ResolvedBackground {
            kind: BackgroundKind::Image,
            css: None,
            image: None,
        },
        Some(BackgroundDescriptor::Image(image)) => ResolvedBackground {
            kind: BackgroundKind::Image,
            css: None,
            image: image.clone(),
        },
        Some(BackgroundDescriptor::Solid(color)) => ResolvedBackground::color(resolve_color(
            color.as_ref(),
            palette,
            BaseColor::Primary,
        )),
        Some(BackgroundDescriptor::Gradient {
            direction,
            start,
            end,
        }) => {
            let start = resolve_color(start.as_ref(), palette, BaseColor::Primary);
            let end = resolve_color(end.as_ref(), palette, BaseColor::Accent);
            ResolvedBackground::color(format!("linear-gradient({direction}, {start}, {end})"))
        }
    }
}

/// Normalize and resolve a raw CMS background in one step.
pub fn resolve_background_payload(
    background: Option<&RawBackground>,
    palette: &Palette,
) -> ResolvedBackground {
    let descriptor = background.map(RawBackground::normalize);
    resolve_background(descriptor.as_ref(), palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::lighten;
    use serde_json::json;

    fn site_palette() -> Palette {
        Palette::new()
            .with(BaseColor::Primary, "#0066cc")
            .with(BaseColor::Secondary, "#6c757d")
            .with(BaseColor::Accent, "#4ecdc4")
    }

    fn raw(value: serde_json::Value) -> RawBackground {
        serde_json::from_value(value).unwrap()
    }

    fn resolve(value: serde_json::Value) -> ResolvedBackground {
        resolve_background_payload(Some(&raw(value)), &site_palette())
    }

    #[test]
    fn test_absent_background_is_image() {
        let resolved = resolve_background_payload(None, &site_palette());
        assert_eq!(resolved.kind, BackgroundKind::Image);
        assert_eq!(resolved.css, None);
        assert_eq!(resolved.image, None);
    }

    #[test]
    fn test_image_background_passes_image_through() {
        let resolved = resolve(json!({
            "backgroundType": "image",
            "image": { "asset": { "_ref": "image-abc-10x10-jpg" }, "alt": "Team" },
            "solidColorType": "accent"
        }));
        assert_eq!(resolved.kind, BackgroundKind::Image);
        assert_eq!(resolved.css, None);
        let image = resolved.image.unwrap();
        assert_eq!(image.alt.as_deref(), Some("Team"));
    }

    #[test]
    fn test_solid_flattened() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "colorMode": "solid",
            "solidColorType": "accent",
            "solidColorShade": 0
        }));
        assert_eq!(resolved.kind, BackgroundKind::Color);
        assert_eq!(resolved.css.as_deref(), Some("#4ecdc4"));
    }

    #[test]
    fn test_solid_legacy_nested() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "solidColor": { "colorType": "secondary", "shade": 100 }
        }));
        assert_eq!(resolved.css, Some(lighten("#6c757d", 0.5).unwrap()));
    }

    #[test]
    fn test_flattened_wins_over_nested() {
        let descriptor = raw(json!({
            "backgroundType": "color",
            "colorMode": "solid",
            "solidColorType": "accent",
            "solidColorShade": 0,
            "solidColor": { "colorType": "secondary", "shade": 60 }
        }))
        .normalize();
        assert_eq!(
            descriptor,
            BackgroundDescriptor::Solid(Some(ColorReference::shaded(BaseColor::Accent, 0.0)))
        );
        assert_eq!(
            resolve_background(Some(&descriptor), &site_palette()).css.as_deref(),
            Some("#4ecdc4")
        );
    }

    #[test]
    fn test_flattened_shade_without_type_defers_to_nested() {
        // Only colorType switches layouts; a stray shade does not
        let resolved = resolve(json!({
            "backgroundType": "color",
            "solidColorShade": 100,
            "solidColor": { "colorType": "accent" }
        }));
        assert_eq!(resolved.css.as_deref(), Some("#4ecdc4"));
    }

    #[test]
    fn test_solid_without_any_color_is_primary() {
        let resolved = resolve(json!({ "backgroundType": "color" }));
        assert_eq!(resolved.css.as_deref(), Some("#0066cc"));

        let untyped = resolve(json!({}));
        assert_eq!(untyped.kind, BackgroundKind::Color);
        assert_eq!(untyped.css.as_deref(), Some("#0066cc"));
    }

    #[test]
    fn test_solid_custom_color() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "solidColorType": "custom",
            "solidCustomColor": { "value": "#222222" }
        }));
        assert_eq!(resolved.css.as_deref(), Some("#222222"));
    }

    #[test]
    fn test_gradient_defaults() {
        let resolved = resolve(json!({ "backgroundType": "color", "colorMode": "gradient" }));
        assert_eq!(
            resolved.css.as_deref(),
            Some("linear-gradient(135deg, #0066cc, #4ecdc4)")
        );
    }

    #[test]
    fn test_gradient_stops_and_direction() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "colorMode": "gradient",
            "gradientDirection": "to right",
            "gradientStartColorType": "secondary",
            "gradientEndColorType": "primary-light"
        }));
        let expected = format!(
            "linear-gradient(to right, #6c757d, {})",
            lighten("#0066cc", 0.3).unwrap()
        );
        assert_eq!(resolved.css, Some(expected));
    }

    #[test]
    fn test_gradient_legacy_nested_stops() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "colorMode": "gradient",
            "gradientStartColor": { "colorType": "accent" },
            "gradientEndColor": { "colorType": "custom", "customColor": { "value": "#000000" } },
            "gradientEndColorType": "secondary"
        }));
        assert_eq!(
            resolved.css.as_deref(),
            Some("linear-gradient(135deg, #4ecdc4, #6c757d)")
        );
    }

    #[test]
    fn test_unknown_color_mode_is_solid() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "colorMode": "pattern",
            "solidColorType": "secondary"
        }));
        assert_eq!(resolved.css.as_deref(), Some("#6c757d"));
    }

    #[test]
    fn test_css_declaration() {
        let solid = resolve(json!({ "backgroundType": "color", "solidColorType": "accent" }));
        assert_eq!(
            solid.css_declaration().as_deref(),
            Some("background-color: #4ecdc4;")
        );

        let gradient = resolve(json!({ "backgroundType": "color", "colorMode": "gradient" }));
        assert_eq!(
            gradient.css_declaration().as_deref(),
            Some("background-image: linear-gradient(135deg, #0066cc, #4ecdc4);")
        );

        let image = resolve(json!({ "backgroundType": "image" }));
        assert_eq!(image.css_declaration(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let solid = resolve(json!({ "backgroundType": "color", "solidColorType": "accent" }));
        assert_eq!(
            serde_json::to_value(&solid).unwrap(),
            json!({ "type": "color", "css": "#4ecdc4" })
        );

        let image = resolve(json!({ "backgroundType": "image" }));
        assert_eq!(
            serde_json::to_value(&image).unwrap(),
            json!({ "type": "image", "css": null })
        );
    }

    #[test]
    fn test_wrongly_typed_fields_are_dropped() {
        let resolved = resolve(json!({
            "backgroundType": "color",
            "colorMode": "gradient",
            "gradientDirection": 90,
            "gradientStartShade": "40",
            "gradientEndColor": "accent"
        }));
        assert_eq!(
            resolved.css.as_deref(),
            Some("linear-gradient(135deg, #0066cc, #4ecdc4)")
        );

        let image = resolve(json!({ "backgroundType": "image", "image": "hero.jpg" }));
        assert_eq!(image.kind, BackgroundKind::Image);
        assert_eq!(image.image, None);
    }
}
