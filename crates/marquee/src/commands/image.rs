//! Image and srcset commands.

use anyhow::{Result, bail};
use marquee_resolve::{
    DEFAULT_SRCSET_WIDTHS, FitMode, ImageAsset, ImageFormat, ImageResolver, ImageTransform,
};

use super::{Context, print_json, read_payload};

/// Arguments for the image command
#[derive(Debug)]
pub struct ImageArgs {
    pub input: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub format: Option<ImageFormat>,
    pub fit: Option<FitMode>,
    pub dpr: Option<f64>,
    pub auto: bool,
    pub seo: bool,
}

impl ImageArgs {
    fn transform(&self) -> ImageTransform {
        ImageTransform {
            width: self.width,
            height: self.height,
            quality: self.quality,
            format: self.format,
            fit: self.fit,
            dpr: self.dpr,
            auto_format: self.auto,
        }
    }
}

pub fn execute_image(context: &Context, args: ImageArgs) -> Result<()> {
    let image: ImageAsset = read_payload(&args.input)?;
    let resolver = ImageResolver::new(&context.settings.image_cdn);
    let transform = args.transform();

    let url = if args.seo {
        resolver.url_for_image_with_seo_filename(&image, &transform)
    } else if args.auto {
        resolver.auto_image_url(&image, &transform)
    } else {
        resolver.image_url(&image, &transform)
    };
    // Empty means no asset or no CDN project; the resolver logged why
    if url.is_empty() {
        bail!("Could not build an image URL for {} (run with --verbose for details)", args.input);
    }
    print_json(&url)
}

pub fn execute_srcset(context: &Context, input: &str, widths: &[u32]) -> Result<()> {
    let image: ImageAsset = read_payload(input)?;
    let widths = if widths.is_empty() {
        &DEFAULT_SRCSET_WIDTHS[..]
    } else {
        widths
    };

    let srcset = ImageResolver::new(&context.settings.image_cdn).srcset(&image, widths);
    if srcset.is_empty() {
        bail!("Could not build a srcset for {input} (run with --verbose for details)");
    }
    print_json(&srcset)
}
