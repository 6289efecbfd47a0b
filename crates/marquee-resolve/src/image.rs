//! Responsive image URLs.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Image fields reference CDN assets (`image-<id>-<width>x<height>-<ext>`).
//! This module turns those references into transformed CDN URLs, `srcset`
//! strings, and URLs with an SEO-friendly vanity filename appended:
//!
//! ```text
//! https://cdn.sanity.io/images/{project}/{dataset}/{id}-{w}x{h}.{ext}?w=800&fm=webp
//! https://cdn.sanity.io/images/{project}/{dataset}/{id}-{w}x{h}.{ext}/my-photo.jpg?auto=format
//! ```
//!
//! Transform options map to independent query parameters that are always
//! emitted in one canonical order, so the order in which options are set
//! never changes the URL. Options that are not set are not emitted.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ResolveError;
use crate::settings::ImageCdnConfig;

/// Width ladder used for `srcset` when the caller has no preference.
pub const DEFAULT_SRCSET_WIDTHS: [u32; 5] = [400, 800, 1200, 1600, 2400];

/// Extension assumed when the asset URL does not reveal one.
pub const DEFAULT_EXTENSION: &str = ".jpg";

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").unwrap());

/// Image file extension at the end of a URL path (captured without the dot).
static IMAGE_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)$").unwrap());

/// An asset pointer inside an image field.
///
/// CMS image fields carry `{ "_ref": "image-..." }` before dereferencing and
/// `{ "_id": "image-...", "url": "https://cdn..." }` after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSource {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AssetSource {
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    /// Parse whichever identifier is present (`_ref`, then `_id`, then `url`).
    pub fn asset_ref(&self) -> Result<AssetRef, ResolveError> {
        if let Some(reference) = self.reference.as_deref().or(self.id.as_deref()) {
            return AssetRef::parse(reference);
        }
        match self.url.as_deref() {
            Some(url) => AssetRef::from_cdn_url(url),
            None => Err(ResolveError::MissingAssetRef),
        }
    }

    /// The CDN file segment for this asset.
    ///
    /// A `_ref`/`_id` that is not in `image-<id>-<w>x<h>-<ext>` form is used
    /// verbatim as an opaque segment. Only a missing identifier, or a `url`
    /// that is not a CDN asset URL, is an error.
    pub fn asset_path(&self) -> Result<AssetPath, ResolveError> {
        let reference = self
            .reference
            .as_deref()
            .or(self.id.as_deref())
            .filter(|r| !r.is_empty());
        match reference {
            Some(reference) => Ok(match AssetRef::parse(reference) {
                Ok(asset) => AssetPath::Parsed(asset),
                Err(err) => {
                    tracing::debug!(error = %err, "Using asset reference as an opaque path");
                    AssetPath::Opaque(reference.to_string())
                }
            }),
            None => match self.url.as_deref() {
                Some(url) => AssetRef::from_cdn_url(url).map(AssetPath::Parsed),
                None => Err(ResolveError::MissingAssetRef),
            },
        }
    }
}

/// An image field: the asset plus editorial metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_filename: Option<String>,
}

impl ImageAsset {
    pub fn from_ref(reference: impl Into<String>) -> Self {
        Self {
            asset: Some(AssetSource::from_ref(reference)),
            ..Default::default()
        }
    }

    pub fn with_seo_filename(mut self, filename: impl Into<String>) -> Self {
        self.seo_filename = Some(filename.into());
        self
    }
}

/// The last path segment of an asset's CDN URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetPath {
    Parsed(AssetRef),
    /// Unrecognized reference, emitted as-is
    Opaque(String),
}

impl AssetPath {
    pub fn file_name(&self) -> String {
        match self {
            AssetPath::Parsed(asset) => asset.file_name(),
            AssetPath::Opaque(reference) => reference.clone(),
        }
    }
}

impl From<AssetRef> for AssetPath {
    fn from(asset: AssetRef) -> Self {
        AssetPath::Parsed(asset)
    }
}

/// A parsed asset identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRef {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub extension: String,
}

impl AssetRef {
    /// Parse `image-<id>-<width>x<height>-<ext>`.
    ///
    /// ```
    /// use marquee_resolve::AssetRef;
    ///
    /// let asset = AssetRef::parse("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg").unwrap();
    /// assert_eq!(asset.width, 2000);
    /// assert_eq!(asset.file_name(), "Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg");
    /// ```
    pub fn parse(reference: &str) -> Result<Self, ResolveError> {
        let invalid = || ResolveError::InvalidAssetRef {
            reference: reference.to_string(),
        };

        let rest = reference.strip_prefix("image-").ok_or_else(invalid)?;
        let (rest, extension) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let (id, dimensions) = rest.rsplit_once('-').ok_or_else(invalid)?;
        Self::from_parts(id, dimensions, extension).ok_or_else(invalid)
    }

    /// Recover the asset from a CDN URL whose last path segment is
    /// `<id>-<width>x<height>.<ext>`.
    pub fn from_cdn_url(url: &str) -> Result<Self, ResolveError> {
        let invalid = || ResolveError::InvalidAssetRef {
            reference: url.to_string(),
        };

        let parsed = Url::parse(url)?;
        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .ok_or_else(invalid)?;
        let (rest, extension) = file_name.rsplit_once('.').ok_or_else(invalid)?;
        let (id, dimensions) = rest.rsplit_once('-').ok_or_else(invalid)?;
        Self::from_parts(id, dimensions, extension).ok_or_else(invalid)
    }

    fn from_parts(id: &str, dimensions: &str, extension: &str) -> Option<Self> {
        if id.is_empty() || extension.is_empty() {
            return None;
        }
        let (width, height) = dimensions.split_once('x')?;
        Some(Self {
            id: id.to_string(),
            width: width.parse().ok()?,
            height: height.parse().ok()?,
            extension: extension.to_string(),
        })
    }

    /// `<id>-<width>x<height>.<ext>`, the CDN file name.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}x{}.{}",
            self.id, self.width, self.height, self.extension
        )
    }
}

/// Output encodings the CDN can produce (`fm=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Pjpg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Pjpg => "pjpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "pjpg" => Ok(ImageFormat::Pjpg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            _ => Err(ResolveError::UnknownImageFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the CDN fits an image into the requested box (`fit=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Clip,
    Crop,
    Fill,
    Fillmax,
    Max,
    Scale,
    Min,
}

impl FitMode {
    pub fn name(&self) -> &'static str {
        match self {
            FitMode::Clip => "clip",
            FitMode::Crop => "crop",
            FitMode::Fill => "fill",
            FitMode::Fillmax => "fillmax",
            FitMode::Max => "max",
            FitMode::Scale => "scale",
            FitMode::Min => "min",
        }
    }
}

impl FromStr for FitMode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clip" => Ok(FitMode::Clip),
            "crop" => Ok(FitMode::Crop),
            "fill" => Ok(FitMode::Fill),
            "fillmax" => Ok(FitMode::Fillmax),
            "max" => Ok(FitMode::Max),
            "scale" => Ok(FitMode::Scale),
            "min" => Ok(FitMode::Min),
            _ => Err(ResolveError::UnknownFitMode(s.to_string())),
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested transforms. Every field is independent and optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageTransform {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpr: Option<f64>,
    /// Let the CDN negotiate the best format for the client (`auto=format`).
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub auto_format: bool,
}

/// Builds one CDN URL for one asset.
///
/// Setters may be called in any order; [`build`](Self::build) always emits
/// `w`, `h`, `fm`, `q`, `fit`, `auto`, `dpr` in that order.
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder<'a> {
    cdn: &'a ImageCdnConfig,
    asset: AssetPath,
    transform: ImageTransform,
}

impl<'a> ImageUrlBuilder<'a> {
    pub fn new(cdn: &'a ImageCdnConfig, asset: impl Into<AssetPath>) -> Self {
        Self {
            cdn,
            asset: asset.into(),
            transform: ImageTransform::default(),
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.transform.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.transform.height = Some(height);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.transform.quality = Some(quality);
        self
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.transform.format = Some(format);
        self
    }

    pub fn fit(mut self, fit: FitMode) -> Self {
        self.transform.fit = Some(fit);
        self
    }

    pub fn dpr(mut self, dpr: f64) -> Self {
        self.transform.dpr = Some(dpr);
        self
    }

    pub fn auto_format(mut self, enabled: bool) -> Self {
        self.transform.auto_format = enabled;
        self
    }

    /// Apply every option that is set in `options`; unset options leave the
    /// builder untouched.
    pub fn apply(mut self, options: &ImageTransform) -> Self {
        if let Some(width) = options.width {
            self = self.width(width);
        }
        if let Some(height) = options.height {
            self = self.height(height);
        }
        if let Some(quality) = options.quality {
            self = self.quality(quality);
        }
        if let Some(format) = options.format {
            self = self.format(format);
        }
        if let Some(fit) = options.fit {
            self = self.fit(fit);
        }
        if let Some(dpr) = options.dpr {
            self = self.dpr(dpr);
        }
        if options.auto_format {
            self = self.auto_format(true);
        }
        self
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let t = &self.transform;
        let mut pairs = Vec::new();
        if let Some(width) = t.width {
            pairs.push(("w", width.to_string()));
        }
        if let Some(height) = t.height {
            pairs.push(("h", height.to_string()));
        }
        if let Some(format) = t.format {
            pairs.push(("fm", format.name().to_string()));
        }
        if let Some(quality) = t.quality {
            pairs.push(("q", quality.to_string()));
        }
        if let Some(fit) = t.fit {
            pairs.push(("fit", fit.name().to_string()));
        }
        if t.auto_format {
            pairs.push(("auto", "format".to_string()));
        }
        if let Some(dpr) = t.dpr {
            pairs.push(("dpr", dpr.to_string()));
        }
        pairs
    }

    /// Build the URL.
    ///
    /// # Errors
    ///
    /// Fails when no CDN project id is configured or the CDN base URL is
    /// unusable.
    pub fn build(&self) -> Result<Url, ResolveError> {
        let project_id = self.cdn.project_id().ok_or(ResolveError::MissingCdnProject)?;
        let base_url = self.cdn.base_url();

        let file_name = self.asset.file_name();

        let mut url = Url::parse(base_url)?;
        url.path_segments_mut()
            .map_err(|()| ResolveError::InvalidCdnBase(base_url.to_string()))?
            .pop_if_empty()
            .extend(["images", project_id, self.cdn.dataset(), file_name.as_str()]);

        // query_pairs_mut always leaves a '?', so only touch the query when
        // there is something to add
        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// Lowercase, turn whitespace runs into hyphens, drop anything outside
/// `[a-z0-9-]`.
pub fn sanitize_seo_filename(filename: &str) -> String {
    let lowered = filename.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lowered, "-");
    NON_SLUG_CHARS.replace_all(&hyphenated, "").into_owned()
}

/// Image extension (with dot) at the end of `url`'s path, else `.jpg`.
pub fn detect_extension(url: &Url) -> String {
    IMAGE_EXTENSION
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .map(|ext| format!(".{}", ext.as_str().to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Image URL derivation bound to one CDN configuration.
///
/// Every method returns an empty string, never an error, when the image has
/// no asset or the URL cannot be built; the cause is logged.
#[derive(Debug, Clone, Copy)]
pub struct ImageResolver<'a> {
    cdn: &'a ImageCdnConfig,
}

impl<'a> ImageResolver<'a> {
    pub fn new(cdn: &'a ImageCdnConfig) -> Self {
        Self { cdn }
    }

    /// A builder for `image`'s asset, or `None` if it has none usable.
    pub fn builder(&self, image: &ImageAsset) -> Option<ImageUrlBuilder<'a>> {
        let Some(source) = image.asset.as_ref() else {
            tracing::debug!("Image has no asset");
            return None;
        };
        match source.asset_path() {
            Ok(asset) => Some(ImageUrlBuilder::new(self.cdn, asset)),
            Err(err) => {
                tracing::warn!(error = %err, "Cannot build image URL");
                None
            }
        }
    }

    fn build(builder: &ImageUrlBuilder<'_>) -> Option<Url> {
        builder
            .build()
            .map_err(|err| tracing::warn!(error = %err, "Cannot build image URL"))
            .ok()
    }

    /// URL with exactly the requested transforms.
    pub fn image_url(&self, image: &ImageAsset, options: &ImageTransform) -> String {
        self.builder(image)
            .and_then(|builder| Self::build(&builder.apply(options)))
            .map(String::from)
            .unwrap_or_default()
    }

    /// [`image_url`](Self::image_url) plus automatic format negotiation.
    pub fn auto_image_url(&self, image: &ImageAsset, options: &ImageTransform) -> String {
        self.builder(image)
            .and_then(|builder| Self::build(&builder.apply(options).auto_format(true)))
            .map(String::from)
            .unwrap_or_default()
    }

    /// `srcset` value with one WebP candidate per width.
    ///
    /// Pass [`DEFAULT_SRCSET_WIDTHS`] for the standard ladder.
    pub fn srcset(&self, image: &ImageAsset, widths: &[u32]) -> String {
        let Some(builder) = self.builder(image) else {
            return String::new();
        };

        widths
            .iter()
            .filter_map(|&width| {
                let candidate = builder.clone().width(width).format(ImageFormat::Webp);
                Self::build(&candidate).map(|url| format!("{url} {width}w"))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Auto-format URL with the image's vanity filename appended to the path.
    ///
    /// Without a usable `seoFilename` the plain auto-format URL is returned.
    pub fn url_for_image_with_seo_filename(
        &self,
        image: &ImageAsset,
        options: &ImageTransform,
    ) -> String {
        let Some(mut url) = self
            .builder(image)
            .and_then(|builder| Self::build(&builder.apply(options).auto_format(true)))
        else {
            return String::new();
        };

        let filename = image
            .seo_filename
            .as_deref()
            .map(sanitize_seo_filename)
            .filter(|name| !name.is_empty());

        if let Some(filename) = filename {
            let extension = detect_extension(&url);
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push(&format!("{filename}{extension}"));
            }
        }
        url.into()
    }
}
