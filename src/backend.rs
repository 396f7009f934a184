//! Host-facing capability surface.
//!
//! The host mapping framework drives rendering through a fixed set of
//! per-primitive operations and lifecycle hooks. [`RenderBackend`] is that
//! contract: the core operations every backend must implement, plus the
//! out-of-scope hooks (symbol markers, glyph runs, tiled fills, buffer
//! compositing, image save/load) which default to a tagged
//! [`RenderError::Unsupported`] so the host can tell "not built" apart
//! from "something went wrong" and treat the feature as unrendered.

use std::path::Path;

use crate::buffer::RasterBuffer;
use crate::color::Rgba;
use crate::context::{RenderOptions, RenderingContext};
use crate::errors::RenderError;
use crate::geometry::Shape;
use crate::style::StrokeStyle;

/// What a backend can do, surfaced as data instead of failure returns.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// The backend can hand back its pixel memory as a raster buffer.
    pub supports_pixel_buffer: bool,
    /// The backend can rasterize SVG symbols.
    pub supports_svg: bool,
    /// The backend can render tiled polygon and line fills.
    pub supports_tiles: bool,
}

/// Core backend interface. Calls against one context must be issued in
/// sequential, single-writer order; independent contexts are independent.
pub trait RenderBackend {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Creates a rendering context for one image: surface allocation plus
    /// drawing-state setup, with `background` as the initial fill.
    fn create_image(
        &self,
        width: u32,
        height: u32,
        background: Rgba,
        options: &RenderOptions,
    ) -> Result<RenderingContext, RenderError>;

    /// Opens a layer scope on the context.
    fn start_layer(&self, ctx: &mut RenderingContext) -> Result<(), RenderError>;

    /// Closes the most recent layer scope on the context.
    fn close_layer(&self, ctx: &mut RenderingContext) -> Result<(), RenderError>;

    /// Fills a polygon with a solid color.
    fn render_polygon(
        &self,
        ctx: &mut RenderingContext,
        shape: &Shape,
        color: Rgba,
    ) -> Result<(), RenderError>;

    /// Strokes a polyline with the given stroke style.
    fn render_line(
        &self,
        ctx: &mut RenderingContext,
        shape: &Shape,
        style: &StrokeStyle,
    ) -> Result<(), RenderError>;

    /// Finalizes the context if needed and hands back its pixel memory.
    /// The returned view borrows the context and cannot outlive it.
    fn raster_buffer<'a>(
        &self,
        ctx: &'a mut RenderingContext,
    ) -> Result<RasterBuffer<'a>, RenderError>;

    /// Releases the context and its surface. Always succeeds, whether or
    /// not the context was finalized.
    fn destroy_image(&self, ctx: RenderingContext);

    // Hooks the host dispatch table may route here that this core does
    // not implement. Overriding one of these is how a richer backend
    // announces the capability.

    fn render_pixmap_symbol(
        &self,
        _ctx: &mut RenderingContext,
        _x: f64,
        _y: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_pixmap_symbol" })
    }

    fn render_vector_symbol(
        &self,
        _ctx: &mut RenderingContext,
        _x: f64,
        _y: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_vector_symbol" })
    }

    fn render_svg_symbol(
        &self,
        _ctx: &mut RenderingContext,
        _x: f64,
        _y: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_svg_symbol" })
    }

    fn render_ellipse_symbol(
        &self,
        _ctx: &mut RenderingContext,
        _x: f64,
        _y: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_ellipse_symbol" })
    }

    fn render_glyphs(
        &self,
        _ctx: &mut RenderingContext,
        _x: f64,
        _y: f64,
        _text: &str,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_glyphs" })
    }

    fn render_tile(
        &self,
        _ctx: &mut RenderingContext,
        _x: f64,
        _y: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_tile" })
    }

    fn render_polygon_tiled(
        &self,
        _ctx: &mut RenderingContext,
        _shape: &Shape,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_polygon_tiled" })
    }

    fn render_line_tiled(
        &self,
        _ctx: &mut RenderingContext,
        _shape: &Shape,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "render_line_tiled" })
    }

    fn merge_raster_buffer(
        &self,
        _ctx: &mut RenderingContext,
        _opacity: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "merge_raster_buffer" })
    }

    fn composite_raster_buffer(
        &self,
        _ctx: &mut RenderingContext,
        _opacity: f64,
    ) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "composite_raster_buffer" })
    }

    fn raster_buffer_copy(&self, _ctx: &RenderingContext) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Unsupported { operation: "raster_buffer_copy" })
    }

    fn save_image(&self, _ctx: &RenderingContext, _path: &Path) -> Result<(), RenderError> {
        Err(RenderError::Unsupported { operation: "save_image" })
    }

    fn load_image(&self, _path: &Path) -> Result<RenderingContext, RenderError> {
        Err(RenderError::Unsupported { operation: "load_image" })
    }
}

/// The tiny-skia rasterization backend.
pub struct SkiaBackend;

impl SkiaBackend {
    pub fn new() -> SkiaBackend {
        SkiaBackend
    }
}

impl Default for SkiaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for SkiaBackend {
    fn name(&self) -> &str {
        "SkiaBackend"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_pixel_buffer: true,
            supports_svg: false,
            supports_tiles: false,
        }
    }

    fn create_image(
        &self,
        width: u32,
        height: u32,
        background: Rgba,
        options: &RenderOptions,
    ) -> Result<RenderingContext, RenderError> {
        RenderingContext::new(width, height, background, options.clone())
    }

    fn start_layer(&self, ctx: &mut RenderingContext) -> Result<(), RenderError> {
        ctx.start_layer()
    }

    fn close_layer(&self, ctx: &mut RenderingContext) -> Result<(), RenderError> {
        ctx.close_layer()
    }

    fn render_polygon(
        &self,
        ctx: &mut RenderingContext,
        shape: &Shape,
        color: Rgba,
    ) -> Result<(), RenderError> {
        ctx.fill_polygon(shape, color)
    }

    fn render_line(
        &self,
        ctx: &mut RenderingContext,
        shape: &Shape,
        style: &StrokeStyle,
    ) -> Result<(), RenderError> {
        ctx.stroke_polyline(shape, style)
    }

    fn raster_buffer<'a>(
        &self,
        ctx: &'a mut RenderingContext,
    ) -> Result<RasterBuffer<'a>, RenderError> {
        ctx.finalize()?;
        ctx.extract()
    }

    fn destroy_image(&self, ctx: RenderingContext) {
        ctx.destroy();
    }
}
