//! Marquee CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use marquee_resolve::{
    BaseColor, DEFAULT_DARKEN_AMOUNT, DEFAULT_LIGHTEN_AMOUNT, FitMode, ImageFormat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(version)]
#[command(about = "Resolve CMS colors, backgrounds, links and images", long_about = None)]
struct Cli {
    /// Site settings file (JSON or YAML) with the palette and image CDN
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log resolution fallbacks
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a color selection to a hex color
    Color {
        /// JSON payload file ('-' for stdin)
        input: String,

        /// Base color used when the payload is null
        #[arg(long, default_value = "primary")]
        default_base: BaseColor,
    },

    /// Resolve a button color selection to background and text colors
    Button {
        /// JSON payload file ('-' for stdin)
        input: String,
    },

    /// Resolve a background to its type and CSS
    Background {
        /// JSON payload file ('-' for stdin)
        input: String,
    },

    /// Resolve a link to its href and new-tab policy
    Link {
        /// JSON payload file ('-' for stdin)
        input: String,
    },

    /// Build a CDN URL for an image field
    Image {
        /// JSON payload file ('-' for stdin)
        input: String,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Output quality (0-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Output format (jpg, pjpg, png, webp)
        #[arg(long)]
        format: Option<ImageFormat>,

        /// Fit mode (clip, crop, fill, fillmax, max, scale, min)
        #[arg(long)]
        fit: Option<FitMode>,

        /// Device pixel ratio
        #[arg(long)]
        dpr: Option<f64>,

        /// Let the CDN pick the best format
        #[arg(long)]
        auto: bool,

        /// Append the image's SEO filename (implies --auto)
        #[arg(long)]
        seo: bool,
    },

    /// Build a WebP srcset for an image field
    Srcset {
        /// JSON payload file ('-' for stdin)
        input: String,

        /// Comma-separated candidate widths
        #[arg(long, value_delimiter = ',')]
        widths: Vec<u32>,
    },

    /// Lighten a hex color by mixing it with white
    Lighten {
        hex: String,

        #[arg(long, default_value_t = DEFAULT_LIGHTEN_AMOUNT)]
        amount: f64,
    },

    /// Darken a hex color by mixing it with black
    Darken {
        hex: String,

        #[arg(long, default_value_t = DEFAULT_DARKEN_AMOUNT)]
        amount: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "marquee=debug,marquee_resolve=debug"
    } else {
        "marquee=info,marquee_resolve=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let context = Context::load(cli.settings.as_deref())?;

    match cli.command {
        Commands::Color { input, default_base } => {
            commands::color::execute_color(&context, &input, default_base)
        }
        Commands::Button { input } => commands::color::execute_button(&context, &input),
        Commands::Background { input } => commands::background::execute(&context, &input),
        Commands::Link { input } => commands::link::execute(&input),
        Commands::Image {
            input,
            width,
            height,
            quality,
            format,
            fit,
            dpr,
            auto,
            seo,
        } => commands::image::execute_image(
            &context,
            commands::image::ImageArgs {
                input,
                width,
                height,
                quality,
                format,
                fit,
                dpr,
                auto,
                seo,
            },
        ),
        Commands::Srcset { input, widths } => {
            commands::image::execute_srcset(&context, &input, &widths)
        }
        Commands::Lighten { hex, amount } => commands::color::execute_lighten(&hex, amount),
        Commands::Darken { hex, amount } => commands::color::execute_darken(&hex, amount),
    }
}
