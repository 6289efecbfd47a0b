//! Background command.

use anyhow::Result;
use marquee_resolve::{RawBackground, resolve_background_payload};

use super::{Context, print_json, read_payload};

/// Resolve a background payload (or `null`) to `{ type, css, image? }`.
pub fn execute(context: &Context, input: &str) -> Result<()> {
    let background: Option<RawBackground> = read_payload(input)?;
    let resolved = resolve_background_payload(background.as_ref(), &context.settings.palette);
    print_json(&resolved)
}
