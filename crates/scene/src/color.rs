//! sRGB colors for the light and the preview backdrop.
//!
//! Colors are stored as `f64` components in [0, 1] and serialize as
//! `"#rrggbb"` hex strings, so scene files stay human-editable.

use flowtubes_core::FlowError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Color of the point light and its glow on the tubes.
pub const LIGHT_HEX: &str = "#a8e6cf";
/// Preview clear color.
pub const BACKGROUND_HEX: &str = "#0b0d12";

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#rrggbb"` or `"rrggbb"` (case insensitive).
    ///
    /// Returns `FlowError::InvalidColor` for anything else.
    pub fn from_hex(hex: &str) -> Result<Srgb, FlowError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FlowError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|e| FlowError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Formats as `"#rrggbb"`, rounding each component to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Light color used when no other is configured.
    pub fn light() -> Srgb {
        Srgb::from_hex(LIGHT_HEX).unwrap_or(Srgb::new(1.0, 1.0, 1.0))
    }

    pub fn background() -> Srgb {
        Srgb::from_hex(BACKGROUND_HEX).unwrap_or(Srgb::BLACK)
    }

    /// Linear blend, `t` clamped to [0, 1].
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        let t = t.clamp(0.0, 1.0);
        Srgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Opaque RGBA8 bytes.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_light_color() {
        let c = Srgb::light();
        assert_eq!(c.to_rgba8(), [0xa8, 0xe6, 0xcf, 255]);
    }

    #[test]
    fn hex_is_case_insensitive_and_prefix_optional() {
        assert_eq!(Srgb::from_hex("A8E6CF").unwrap(), Srgb::from_hex("#a8e6cf").unwrap());
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#fff", "#gg0000", "#12345678", "#ééé"] {
            assert!(
                matches!(Srgb::from_hex(bad), Err(FlowError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(Srgb::from_hex(LIGHT_HEX).unwrap().to_hex(), LIGHT_HEX);
        assert_eq!(Srgb::background().to_hex(), BACKGROUND_HEX);
    }

    #[test]
    fn lerp_endpoints_and_clamp() {
        let a = Srgb::BLACK;
        let b = Srgb::new(1.0, 0.5, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 7.0), b);
        assert_eq!(a.lerp(b, 0.5), Srgb::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn out_of_gamut_components_saturate() {
        assert_eq!(Srgb::new(-1.0, 2.0, 0.5).to_rgba8(), [0, 255, 128, 255]);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Srgb::light()).unwrap();
        assert_eq!(json, "\"#a8e6cf\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), LIGHT_HEX);
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }
}
