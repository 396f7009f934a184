//! Stroke styling: host line caps and their translation to the engine's
//! stroke vocabulary.

use crate::color::Rgba;

/// Line cap kinds the host contract knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// The stroke ends exactly at the endpoint.
    #[default]
    Butt,
    /// The stroke is extended past the endpoint by half the line width.
    Square,
    /// The stroke ends in a half circle centered on the endpoint.
    Round,
}

impl LineCap {
    /// Decodes a line cap from the host wire code.
    ///
    /// Unrecognized codes (including future extensions of the host enum)
    /// log a diagnostic and fall back to [`LineCap::Butt`], so an
    /// unsupported style renders with a visible default instead of
    /// aborting the render.
    pub fn from_code(code: u32) -> LineCap {
        match code {
            0 => LineCap::Butt,
            1 => LineCap::Square,
            2 => LineCap::Round,
            other => {
                log::warn!("unrecognized line cap code {other}, falling back to butt");
                LineCap::Butt
            }
        }
    }

    pub(crate) fn to_engine(self) -> tiny_skia::LineCap {
        match self {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Square => tiny_skia::LineCap::Square,
            LineCap::Round => tiny_skia::LineCap::Round,
        }
    }
}

/// Stroke attributes for one draw call: color, positive width and the cap
/// applied to both ends of every open ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn new(color: Rgba, width: f32, cap: LineCap) -> StrokeStyle {
        StrokeStyle { color, width, cap }
    }

    /// Translates the stroke attributes into the engine's stroke options.
    pub(crate) fn to_engine(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            line_cap: self.cap.to_engine(),
            ..tiny_skia::Stroke::default()
        }
    }
}
