//! Color, button, lighten and darken commands.

use anyhow::{Context as _, Result};
use marquee_resolve::{
    BaseColor, RawButtonColor, RawColorSelection, darken, lighten, resolve_button_colors,
    resolve_color_selection,
};

use super::{Context, print_json, read_payload};

/// Resolve a color selection payload (or `null`) against the palette.
pub fn execute_color(context: &Context, input: &str, default_base: BaseColor) -> Result<()> {
    let selection: Option<RawColorSelection> = read_payload(input)?;
    let color = resolve_color_selection(
        selection.as_ref(),
        &context.settings.palette,
        default_base,
    );
    print_json(&color)
}

pub fn execute_button(context: &Context, input: &str) -> Result<()> {
    let button: Option<RawButtonColor> = read_payload(input)?;
    let spec = button.unwrap_or_default().normalize();
    print_json(&resolve_button_colors(&spec, &context.settings.palette))
}

pub fn execute_lighten(hex: &str, amount: f64) -> Result<()> {
    let color = lighten(hex, amount).with_context(|| format!("Cannot lighten {hex}"))?;
    print_json(&color)
}

pub fn execute_darken(hex: &str, amount: f64) -> Result<()> {
    let color = darken(hex, amount).with_context(|| format!("Cannot darken {hex}"))?;
    print_json(&color)
}
