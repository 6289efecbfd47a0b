//! Hex color arithmetic.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Colors are lightened or darkened by mixing every RGB channel toward white
//! or black:
//!
//! ```text
//! lighten: channel' = round(channel + (255 - channel) * amount)
//! darken:  channel' = round(channel * (1 - amount))
//! ```
//!
//! `amount` is not clamped here; callers supply a 0..=1 fraction. Resulting
//! channels are clamped to 0..=255 before encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::ResolveError;

/// Fraction used by [`lighten`] callers that have no opinion.
pub const DEFAULT_LIGHTEN_AMOUNT: f64 = 0.3;

/// Fraction used by [`darken`] callers that have no opinion.
pub const DEFAULT_DARKEN_AMOUNT: f64 = 0.2;

/// An opaque 8-bit RGB color.
///
/// Parses from `#rrggbb` or `rrggbb` (any case) and always displays as
/// lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Move each channel toward `target` by `weight` (0 = unchanged, 1 = target).
    pub fn mix(self, target: Rgb, weight: f64) -> Rgb {
        let channel = |from: u8, to: u8| -> u8 {
            let from = f64::from(from);
            let mixed = from + (f64::from(to) - from) * weight;
            round_half_up(mixed).clamp(0.0, 255.0) as u8
        };
        Rgb {
            r: channel(self.r, target.r),
            g: channel(self.g, target.g),
            b: channel(self.b, target.b),
        }
    }

    pub fn lighten(self, amount: f64) -> Rgb {
        self.mix(Self::WHITE, amount)
    }

    pub fn darken(self, amount: f64) -> Rgb {
        self.mix(Self::BLACK, amount)
    }
}

// Halves round toward positive infinity, matching how authored colors were
// originally computed in the browser.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

impl FromStr for Rgb {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolveError::InvalidHexColor {
            value: s.to_string(),
        };

        let digits = s.strip_prefix('#').unwrap_or(s);
        // from_str_radix tolerates a leading '+', so validate digits up front
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Lighten a hex color by mixing it toward white.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidHexColor`] if `hex` is not a 6-digit hex
/// color.
///
/// # Example
///
/// ```
/// use marquee_resolve::lighten;
///
/// assert_eq!(lighten("#0066cc", 0.5).unwrap(), "#80b3e6");
/// assert_eq!(lighten("0066CC", 0.0).unwrap(), "#0066cc");
/// ```
pub fn lighten(hex: &str, amount: f64) -> Result<String, ResolveError> {
    Ok(hex.parse::<Rgb>()?.lighten(amount).to_string())
}

/// Darken a hex color by mixing it toward black.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidHexColor`] if `hex` is not a 6-digit hex
/// color.
pub fn darken(hex: &str, amount: f64) -> Result<String, ResolveError> {
    Ok(hex.parse::<Rgb>()?.darken(amount).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        let with_hash: Rgb = "#0066cc".parse().unwrap();
        let without_hash: Rgb = "0066cc".parse().unwrap();
        assert_eq!(with_hash, Rgb::new(0x00, 0x66, 0xcc));
        assert_eq!(with_hash, without_hash);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "#fff", "#0066c", "#0066ccdd", "#gg66cc", "+f66cc", "#00 6cc"] {
            let err = bad.parse::<Rgb>().unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidHexColor { ref value } if value == bad),
                "expected InvalidHexColor for {bad:?}"
            );
        }
    }

    #[test]
    fn test_display_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(0, 10, 255).to_string(), "#000aff");
        assert_eq!("#ABCDEF".parse::<Rgb>().unwrap().to_string(), "#abcdef");
    }

    #[test]
    fn test_lighten_known_values() {
        assert_eq!(lighten("#0066cc", 0.5).unwrap(), "#80b3e6");
        assert_eq!(lighten("#0066cc", 0.3).unwrap(), "#4d94db");
    }

    #[test]
    fn test_darken_known_values() {
        assert_eq!(darken("#0066cc", 0.2).unwrap(), "#0052a3");
        assert_eq!(darken("#ffffff", 0.5).unwrap(), "#808080");
    }

    #[test]
    fn test_lighten_darken_extremes() {
        assert_eq!(lighten("#4ECDC4", 0.0).unwrap(), "#4ecdc4");
        assert_eq!(lighten("#4ecdc4", 1.0).unwrap(), "#ffffff");
        assert_eq!(darken("4ecdc4", 0.0).unwrap(), "#4ecdc4");
        assert_eq!(darken("#4ecdc4", 1.0).unwrap(), "#000000");
    }

    #[test]
    fn test_out_of_range_amount_is_clamped_per_channel() {
        assert_eq!(lighten("#123456", 2.0).unwrap(), "#ffffff");
        assert_eq!(lighten("#123456", -5.0).unwrap(), "#000000");
        assert_eq!(darken("#123456", 3.0).unwrap(), "#000000");
    }

    #[test]
    fn test_malformed_input_errors() {
        assert!(lighten("blue", 0.3).is_err());
        assert!(darken("#12345", 0.3).is_err());
    }

    fn rgb_strategy() -> impl Strategy<Value = Rgb> {
        any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Rgb::new(r, g, b))
    }

    proptest! {
        #[test]
        fn test_lighten_is_monotonic(
            color in rgb_strategy(),
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0,
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let lo = color.lighten(low);
            let hi = color.lighten(high);
            prop_assert!(lo.r <= hi.r && lo.g <= hi.g && lo.b <= hi.b);
        }

        #[test]
        fn test_identity_and_saturation(color in rgb_strategy()) {
            prop_assert_eq!(color.lighten(0.0), color);
            prop_assert_eq!(color.lighten(1.0), Rgb::WHITE);
            prop_assert_eq!(color.darken(0.0), color);
            prop_assert_eq!(color.darken(1.0), Rgb::BLACK);
        }

        #[test]
        fn test_display_parse_roundtrip(color in rgb_strategy()) {
            prop_assert_eq!(color.to_string().parse::<Rgb>().unwrap(), color);
        }
    }
}
