//! Palette color resolution.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Content fields pick colors symbolically: one of the site's three base
//! colors plus a 0-100 shade, or a custom literal. Two authoring generations
//! coexist:
//!
//! - Legacy suffixed types (`primary-light`, `accent-dark`, ...). `-light`
//!   lightens the base by a fixed 30%; `-dark` is the base itself.
//! - Plain types with a shade. `shade / 200` is the lighten fraction, so
//!   shade 100 is 50% lighter and shade 0 is the base.
//!
//! The two paths disagree on how "light" a color is. Existing content
//! depends on both, so neither is normalized into the other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::lighten;
use crate::error::ResolveError;
use crate::types::ColorValue;

/// Fallback for an unset primary palette entry.
pub const PRIMARY_FALLBACK: &str = "#0066cc";
/// Fallback for an unset secondary palette entry.
pub const SECONDARY_FALLBACK: &str = "#6c757d";
/// Fallback for an unset accent palette entry, and for unknown color types.
pub const ACCENT_FALLBACK: &str = "#4ecdc4";

/// Fixed lighten fraction for legacy `-light` color types.
pub const LEGACY_LIGHT_AMOUNT: f64 = 0.3;

/// Button text color when the author asks for base (dark) text.
pub const DARK_TEXT_COLOR: &str = "#1a1a1a";
/// Button text color otherwise.
pub const LIGHT_TEXT_COLOR: &str = "#ffffff";

/// One of the site's named base colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseColor {
    #[default]
    Primary,
    Secondary,
    Accent,
}

impl BaseColor {
    pub fn name(&self) -> &'static str {
        match self {
            BaseColor::Primary => "primary",
            BaseColor::Secondary => "secondary",
            BaseColor::Accent => "accent",
        }
    }

    /// Hard-coded color used when the palette leaves this entry unset.
    pub fn fallback(&self) -> &'static str {
        match self {
            BaseColor::Primary => PRIMARY_FALLBACK,
            BaseColor::Secondary => SECONDARY_FALLBACK,
            BaseColor::Accent => ACCENT_FALLBACK,
        }
    }
}

impl FromStr for BaseColor {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(BaseColor::Primary),
            "secondary" => Ok(BaseColor::Secondary),
            "accent" => Ok(BaseColor::Accent),
            _ => Err(ResolveError::UnknownBaseColor(s.to_string())),
        }
    }
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The site-wide base colors, as stored in site settings.
///
/// Wire shape: `{ "primary": { "value": "#0066cc" }, "secondary": ..., "accent": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<ColorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<ColorValue>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one entry, builder style.
    pub fn with(mut self, base: BaseColor, hex: impl Into<String>) -> Self {
        let value = Some(ColorValue::new(hex));
        match base {
            BaseColor::Primary => self.primary = value,
            BaseColor::Secondary => self.secondary = value,
            BaseColor::Accent => self.accent = value,
        }
        self
    }

    /// The authored entry for `base`, if set.
    pub fn get(&self, base: BaseColor) -> Option<&str> {
        let entry = match base {
            BaseColor::Primary => self.primary.as_ref(),
            BaseColor::Secondary => self.secondary.as_ref(),
            BaseColor::Accent => self.accent.as_ref(),
        };
        entry.and_then(ColorValue::as_str)
    }

    /// The entry for `base`, or its hard-coded fallback.
    pub fn base_color(&self, base: BaseColor) -> &str {
        self.get(base).unwrap_or_else(|| base.fallback())
    }
}

/// How a palette color is varied before use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorVariant {
    /// Lighten by `shade / 200` when `shade > 0`.
    Shade(f64),
    /// Legacy `<type>-light`: fixed 30% lighter.
    LegacyLight,
    /// Legacy `<type>-dark`: the base color itself.
    LegacyDark,
}

impl Default for ColorVariant {
    fn default() -> Self {
        ColorVariant::Shade(0.0)
    }
}

/// A normalized color selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorReference {
    Palette { base: BaseColor, variant: ColorVariant },
    /// Custom literal, returned verbatim.
    Custom(String),
}

impl ColorReference {
    pub fn palette(base: BaseColor) -> Self {
        ColorReference::Palette {
            base,
            variant: ColorVariant::default(),
        }
    }

    pub fn shaded(base: BaseColor, shade: f64) -> Self {
        ColorReference::Palette {
            base,
            variant: ColorVariant::Shade(shade),
        }
    }

    pub fn custom(hex: impl Into<String>) -> Self {
        ColorReference::Custom(hex.into())
    }
}

/// A color selection exactly as the CMS stores it.
///
/// Wire shape: `{ "colorType": "primary", "shade": 40, "customColor": { "value": "#..." } }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawColorSelection {
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub color_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub shade: Option<f64>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub custom_color: Option<ColorValue>,
}

impl RawColorSelection {
    /// True when no field was authored at all.
    pub fn is_empty(&self) -> bool {
        self.color_type.is_none() && self.shade.is_none() && self.custom_color.is_none()
    }

    /// Normalize into a [`ColorReference`].
    ///
    /// A missing or empty `colorType` selects `default_base`. Unknown types,
    /// suffixed `custom-*` types, and `custom` without a literal all fall
    /// back to the accent color.
    pub fn normalize(&self, default_base: BaseColor) -> ColorReference {
        let shade = self.shade.unwrap_or(0.0);

        let Some(color_type) = self.color_type.as_deref().filter(|t| !t.is_empty()) else {
            return ColorReference::shaded(default_base, shade);
        };

        let (base_type, variant) = if let Some(prefix) = color_type.strip_suffix("-light") {
            (prefix, ColorVariant::LegacyLight)
        } else if let Some(prefix) = color_type.strip_suffix("-dark") {
            (prefix, ColorVariant::LegacyDark)
        } else {
            (color_type, ColorVariant::Shade(shade))
        };

        if base_type == "custom" && matches!(variant, ColorVariant::Shade(_)) {
            if let Some(hex) = self.custom_color.as_ref().and_then(ColorValue::as_str) {
                return ColorReference::custom(hex);
            }
            tracing::debug!("Custom color type without a custom color, using accent");
        }

        let base = match base_type.parse::<BaseColor>() {
            Ok(base) => base,
            Err(_) => {
                if base_type != "custom" {
                    tracing::debug!(color_type, "Unknown color type, using accent");
                }
                BaseColor::Accent
            }
        };

        ColorReference::Palette { base, variant }
    }
}

/// Resolve a color reference against the palette into a CSS color string.
///
/// An absent reference yields the palette's `default_base` entry. Malformed
/// palette colors are returned unchanged instead of being lightened.
///
/// # Example
///
/// ```
/// use marquee_resolve::{BaseColor, ColorReference, Palette, resolve_color};
///
/// let palette = Palette::new().with(BaseColor::Primary, "#0066cc");
/// let shaded = ColorReference::shaded(BaseColor::Primary, 100.0);
/// assert_eq!(resolve_color(Some(&shaded), &palette, BaseColor::Primary), "#80b3e6");
/// assert_eq!(resolve_color(None, &palette, BaseColor::Accent), "#4ecdc4");
/// ```
pub fn resolve_color(
    reference: Option<&ColorReference>,
    palette: &Palette,
    default_base: BaseColor,
) -> String {
    let Some(reference) = reference else {
        return palette.base_color(default_base).to_string();
    };

    match reference {
        ColorReference::Custom(hex) => hex.clone(),
        ColorReference::Palette { base, variant } => {
            let base_hex = palette.base_color(*base);
            match *variant {
                ColorVariant::LegacyLight => lighten_or_keep(base_hex, LEGACY_LIGHT_AMOUNT),
                ColorVariant::LegacyDark => base_hex.to_string(),
                ColorVariant::Shade(shade) if shade > 0.0 => {
                    lighten_or_keep(base_hex, shade / 200.0)
                }
                ColorVariant::Shade(_) => base_hex.to_string(),
            }
        }
    }
}

/// Normalize and resolve a raw CMS color selection in one step.
pub fn resolve_color_selection(
    selection: Option<&RawColorSelection>,
    palette: &Palette,
    default_base: BaseColor,
) -> String {
    let reference = selection.map(|s| s.normalize(default_base));
    resolve_color(reference.as_ref(), palette, default_base)
}

fn lighten_or_keep(hex: &str, amount: f64) -> String {
    match lighten(hex, amount) {
        Ok(lightened) => lightened,
        Err(err) => {
            tracing::debug!(
                color = hex,
                error = %err,
                "Cannot lighten palette color, using it unchanged"
            );
            hex.to_string()
        }
    }
}

/// Button text color. An authoring choice, not a contrast computation.
pub fn resolve_button_text_color(use_base_text_color: bool) -> &'static str {
    if use_base_text_color {
        DARK_TEXT_COLOR
    } else {
        LIGHT_TEXT_COLOR
    }
}

/// A button's color selection plus its text color choice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonColorSpec {
    pub color: Option<ColorReference>,
    pub use_base_text_color: bool,
}

/// Button colors as stored in the CMS: a color selection with an extra
/// `useBaseTextColor` flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawButtonColor {
    #[serde(flatten)]
    pub color: RawColorSelection,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub use_base_text_color: Option<bool>,
}

impl RawButtonColor {
    pub fn normalize(&self) -> ButtonColorSpec {
        ButtonColorSpec {
            color: (!self.color.is_empty()).then(|| self.color.normalize(BaseColor::Primary)),
            use_base_text_color: self.use_base_text_color.unwrap_or(false),
        }
    }
}

/// Final button colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedButtonColors {
    pub background: String,
    pub text: String,
}

/// Resolve a button's background (default base: primary) and text color.
pub fn resolve_button_colors(spec: &ButtonColorSpec, palette: &Palette) -> ResolvedButtonColors {
    ResolvedButtonColors {
        background: resolve_color(spec.color.as_ref(), palette, BaseColor::Primary),
        text: resolve_button_text_color(spec.use_base_text_color).to_string(),
    }
}
