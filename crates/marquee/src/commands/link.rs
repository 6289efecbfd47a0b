//! Link command.

use anyhow::Result;
use marquee_resolve::{RawLink, link_attributes};

use super::{print_json, read_payload};

/// Resolve a link payload to its anchor attributes. A `null` link is an
/// internal link with no page type.
pub fn execute(input: &str) -> Result<()> {
    let link: Option<RawLink> = read_payload(input)?;
    let attributes = link_attributes(&link.unwrap_or_default().normalize());
    print_json(&attributes)
}
