//! Content resolution for the marketing site.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! CMS documents describe presentation abstractly: palette colors with a
//! shade, backgrounds in two historical layouts, links to page types, and
//! image asset references. This crate turns those into concrete values:
//! - Hex color math (lighten/darken)
//! - Palette color resolution, including legacy `-light`/`-dark` types
//! - Background resolution (image, solid, gradient)
//! - Link URL and new-tab resolution
//! - CDN image URLs, `srcset` strings and vanity filenames
//!
//! Every resolver is a pure function of its inputs. Raw CMS payloads
//! (`Raw*` types) are normalized once at the boundary; malformed or missing
//! data resolves to a documented fallback instead of an error.

mod background;
mod color;
mod error;
mod image;
mod link;
mod palette;
mod settings;
mod types;

pub use background::{
    BackgroundDescriptor, BackgroundKind, DEFAULT_GRADIENT_DIRECTION, RawBackground,
    ResolvedBackground, resolve_background, resolve_background_payload, select_color_fields,
};
pub use color::{DEFAULT_DARKEN_AMOUNT, DEFAULT_LIGHTEN_AMOUNT, Rgb, darken, lighten};
pub use error::ResolveError;
pub use image::{
    AssetPath, AssetRef, AssetSource, DEFAULT_EXTENSION, DEFAULT_SRCSET_WIDTHS, FitMode,
    ImageAsset, ImageFormat, ImageResolver, ImageTransform, ImageUrlBuilder, detect_extension,
    sanitize_seo_filename,
};
pub use link::{
    FALLBACK_PATH, InternalPage, LinkAttributes, LinkReference, RawLink, SingletonPage,
    link_attributes, resolve_link_url, should_open_in_new_tab,
};
pub use palette::{
    ACCENT_FALLBACK, BaseColor, ButtonColorSpec, ColorReference, ColorVariant, DARK_TEXT_COLOR,
    LEGACY_LIGHT_AMOUNT, LIGHT_TEXT_COLOR, PRIMARY_FALLBACK, Palette, RawButtonColor,
    RawColorSelection, ResolvedButtonColors, SECONDARY_FALLBACK, resolve_button_colors,
    resolve_button_text_color, resolve_color, resolve_color_selection,
};
pub use settings::{
    DATASET_ENV, DEFAULT_CDN_BASE_URL, DEFAULT_DATASET, ImageCdnConfig, PROJECT_ID_ENV,
    SiteSettings,
};
pub use types::{ColorValue, DocumentRef, Slug};
