//! Host color representation and its conversion into the engine color space.
//!
//! The host framework supplies colors as integer channels in `0 ..= 255`;
//! the rasterization engine works with normalized `0.0 ..= 1.0` channels.
//! Conversion is a pure division by 255 with no shared state, so it is safe
//! to call from any thread.

/// RGBA color as the host supplies it: integer channels in `0 ..= 255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (opacity)
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// Returns the channels normalized to `0.0 ..= 1.0` as `(r, g, b, a)`.
    pub fn normalized(self) -> (f32, f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }

    /// Converts this color into the engine representation.
    pub(crate) fn to_engine(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}
