// src/color.rs

//! Defines the `Rgb` colour type used by the configuration and the renderer,
//! plus the conversion into the 16-bit channel layout XRender expects.

use serde::{Deserialize, Serialize};

/// An opaque 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Background of the viewer window.
    pub const ALICE_BLUE: Rgb = Rgb(240, 248, 255);
    /// Fill for cells that carry a glyph.
    pub const LAVENDER: Rgb = Rgb(230, 230, 250);

    /// Expands each 8-bit channel to 16 bits by repeating the byte, so that
    /// `0xff` maps to `0xffff` rather than `0xff00`.
    pub fn to_rgb16(self) -> (u16, u16, u16) {
        let expand = |c: u8| ((c as u16) << 8) | (c as u16);
        (expand(self.0), expand(self.1), expand(self.2))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_expansion_covers_full_range() {
        assert_eq!(Rgb::BLACK.to_rgb16(), (0, 0, 0));
        assert_eq!(Rgb::WHITE.to_rgb16(), (0xffff, 0xffff, 0xffff));
        assert_eq!(Rgb(0x12, 0x80, 0x01).to_rgb16(), (0x1212, 0x8080, 0x0101));
    }

    #[test]
    fn deserializes_from_json_array() {
        let c: Rgb = serde_json::from_str("[240, 248, 255]").unwrap();
        assert_eq!(c, Rgb::ALICE_BLUE);
    }
}
