//! Rendering context lifecycle: surface allocation, layer scoping, draw
//! dispatch and pixel read-back.
//!
//! A [`RenderingContext`] owns one pixel surface and the drawing state
//! bound to it. Drawing is valid only between creation and
//! [`RenderingContext::finalize`]; once finalized, the surface's pixel
//! memory is stable and can be read through
//! [`RenderingContext::extract`]. Layer scopes opened with
//! [`RenderingContext::start_layer`] must be closed 1:1 with
//! [`RenderingContext::close_layer`] before the context ends.
//!
//! All operations on one context are synchronous and must be issued in
//! single-writer order; independent contexts may render in parallel.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::buffer::RasterBuffer;
use crate::color::Rgba;
use crate::errors::RenderError;
use crate::geometry::{self, Shape};
use crate::style::{LineCap, StrokeStyle};

/// Engine tuning knobs fixed at context creation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Worker thread count hint for the rasterization engine. Must be at
    /// least 1. The current engine rasterizes on the calling thread; the
    /// value is validated and retained so the host can tune it once
    /// threaded rasterization is available.
    pub thread_count: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            thread_count: num_cpus::get().max(1),
        }
    }
}

/// Drawing state captured by a layer save point.
#[derive(Debug, Clone, PartialEq)]
struct DrawState {
    fill_color: Rgba,
    stroke_color: Rgba,
    stroke_width: f32,
    stroke_cap: LineCap,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_color: Rgba::BLACK,
            stroke_color: Rgba::BLACK,
            stroke_width: 1.0,
            stroke_cap: LineCap::Butt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextState {
    Drawing,
    Finalized,
}

/// One in-progress image render: a surface plus the drawing state machine
/// bound to it.
pub struct RenderingContext {
    surface: Pixmap,
    state: ContextState,
    saved: Vec<DrawState>,
    current: DrawState,
    options: RenderOptions,
}

impl RenderingContext {
    /// Allocates a `width` x `height` surface of 32-bit premultiplied
    /// pixels, fills it with `background` and binds a fresh drawing state
    /// to it.
    ///
    /// Fails with [`RenderError::ContextInit`] if the dimensions are
    /// rejected by the engine (zero or overflowing) or the options are
    /// invalid. On failure no partially initialized context escapes.
    pub fn new(
        width: u32,
        height: u32,
        background: Rgba,
        options: RenderOptions,
    ) -> Result<RenderingContext, RenderError> {
        if options.thread_count == 0 {
            return Err(RenderError::ContextInit(
                "thread count must be at least 1".into(),
            ));
        }

        let mut surface = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::ContextInit(format!("cannot allocate a {width}x{height} surface"))
        })?;
        surface.fill(background.to_engine());

        log::debug!(
            "created {width}x{height} rendering context ({} render thread(s))",
            options.thread_count
        );

        Ok(RenderingContext {
            surface,
            state: ContextState::Drawing,
            saved: Vec::new(),
            current: DrawState::default(),
            options,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// The options this context was created with.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Number of layer scopes currently open.
    pub fn layer_depth(&self) -> usize {
        self.saved.len()
    }

    /// True once [`RenderingContext::finalize`] has run.
    pub fn is_finalized(&self) -> bool {
        self.state == ContextState::Finalized
    }

    fn ensure_drawable(&self) -> Result<(), RenderError> {
        match self.state {
            ContextState::Drawing => Ok(()),
            ContextState::Finalized => Err(RenderError::ContextNotDrawable),
        }
    }

    /// Opens a layer scope: pushes a save point so state changes made
    /// while the layer renders are undone at the matching
    /// [`RenderingContext::close_layer`].
    pub fn start_layer(&mut self) -> Result<(), RenderError> {
        self.ensure_drawable()?;
        self.saved.push(self.current.clone());
        log::trace!("layer opened (depth {})", self.saved.len());
        Ok(())
    }

    /// Closes the most recently opened layer scope, restoring the drawing
    /// state saved at [`RenderingContext::start_layer`].
    ///
    /// Fails with [`RenderError::UnbalancedLayer`] when no layer is open;
    /// the context stays usable afterwards.
    pub fn close_layer(&mut self) -> Result<(), RenderError> {
        self.ensure_drawable()?;
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                log::trace!("layer closed (depth {})", self.saved.len());
                Ok(())
            }
            None => Err(RenderError::UnbalancedLayer),
        }
    }

    /// Fills a polygon.
    ///
    /// Every ring with at least [`geometry::MIN_FILL_POINTS`] points is
    /// added as a closed subpath; all qualifying rings are filled in one
    /// operation under the non-zero winding rule, so holes wound opposite
    /// to their outer ring stay uncovered. A shape with no qualifying
    /// rings draws nothing and succeeds.
    pub fn fill_polygon(&mut self, shape: &Shape, color: Rgba) -> Result<(), RenderError> {
        self.ensure_drawable()?;
        self.current.fill_color = color;

        let mut pb = PathBuilder::new();
        for ring in &shape.rings {
            if ring.len() >= geometry::MIN_FILL_POINTS {
                geometry::append_closed_ring(&mut pb, ring);
            }
        }
        let Some(path) = pb.finish() else {
            // Rendering an empty shape is a no-op, not a failure.
            return Ok(());
        };

        let mut paint = Paint::default();
        paint.set_color(color.to_engine());
        paint.anti_alias = true;

        self.surface
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }

    /// Strokes a polyline.
    ///
    /// Stroke attributes are set on the context once per call, not per
    /// ring; callers needing mixed styles within one shape must issue
    /// separate calls. Every ring with at least
    /// [`geometry::MIN_STROKE_POINTS`] points is stroked as an open path.
    /// A shape with no qualifying rings draws nothing and succeeds.
    pub fn stroke_polyline(&mut self, shape: &Shape, style: &StrokeStyle) -> Result<(), RenderError> {
        self.ensure_drawable()?;
        self.current.stroke_color = style.color;
        self.current.stroke_width = style.width;
        self.current.stroke_cap = style.cap;

        let stroke = style.to_engine();
        let mut paint = Paint::default();
        paint.set_color(style.color.to_engine());
        paint.anti_alias = true;

        for ring in &shape.rings {
            if let Some(path) = geometry::open_path(ring) {
                self.surface
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Ok(())
    }

    /// Ends the drawing phase: commits all drawing into the surface's
    /// pixel memory and converts it to host byte order (premultiplied
    /// blue, green, red, alpha). Idempotent; calls after the first are
    /// no-ops. After finalize no drawing call is valid.
    pub fn finalize(&mut self) -> Result<(), RenderError> {
        if self.state == ContextState::Finalized {
            log::trace!("finalize called on an already finalized context");
            return Ok(());
        }
        if !self.saved.is_empty() {
            log::warn!("{} layer scope(s) still open at finalize", self.saved.len());
        }

        // The engine stores premultiplied RGBA; the host contract is
        // premultiplied BGRA.
        for px in self.surface.data_mut().chunks_exact_mut(4) {
            px.swap(0, 2);
        }
        self.state = ContextState::Finalized;
        log::debug!("finalized {}x{} surface", self.width(), self.height());
        Ok(())
    }

    /// Reads back the finished surface as a [`RasterBuffer`] view.
    ///
    /// Valid only after [`RenderingContext::finalize`]
    /// ([`RenderError::SurfaceNotFinalized`] before that). Pure read:
    /// repeated calls return identical content. The view borrows the
    /// surface and cannot outlive this context.
    pub fn extract(&self) -> Result<RasterBuffer<'_>, RenderError> {
        if self.state != ContextState::Finalized {
            return Err(RenderError::SurfaceNotFinalized);
        }
        Ok(RasterBuffer::over(
            self.surface.data(),
            self.surface.width(),
            self.surface.height(),
        ))
    }

    /// Releases the context and its surface. Safe to call whether or not
    /// [`RenderingContext::finalize`] ran; destruction finalizes first if
    /// needed.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for RenderingContext {
    fn drop(&mut self) {
        if self.state != ContextState::Finalized {
            let _ = self.finalize();
        }
        log::trace!("released {}x{} rendering context", self.width(), self.height());
    }
}

impl std::fmt::Debug for RenderingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingContext")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("state", &self.state)
            .field("layer_depth", &self.saved.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ALPHA_OFFSET, BLUE_OFFSET, GREEN_OFFSET, RED_OFFSET};
    use crate::geometry::Point;

    fn ring(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    fn ctx(width: u32, height: u32, bg: Rgba) -> RenderingContext {
        RenderingContext::new(width, height, bg, RenderOptions::default()).unwrap()
    }

    #[test]
    fn create_finalize_extract_reports_exact_dimensions() {
        let mut c = ctx(7, 5, Rgba::TRANSPARENT);
        c.finalize().unwrap();
        let buf = c.extract().unwrap();
        assert_eq!(buf.width(), 7);
        assert_eq!(buf.height(), 5);
        assert!(buf.row_step() >= 7 * 4);
        assert!(buf.data().len() >= 5 * buf.row_step());
    }

    #[test]
    fn zero_dimensions_fail_context_init() {
        let err = RenderingContext::new(0, 4, Rgba::WHITE, RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::ContextInit(_)));

        let err = RenderingContext::new(4, 0, Rgba::WHITE, RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::ContextInit(_)));
    }

    #[test]
    fn zero_thread_count_fails_context_init() {
        let opts = RenderOptions { thread_count: 0 };
        let err = RenderingContext::new(4, 4, Rgba::WHITE, opts).unwrap_err();
        assert!(matches!(err, RenderError::ContextInit(_)));
    }

    #[test]
    fn full_square_fill_is_opaque_red_everywhere() {
        let mut c = ctx(4, 4, Rgba::WHITE);
        let shape = Shape::from_rings(vec![square(0.0, 0.0, 4.0, 4.0)]);
        c.fill_polygon(&shape, Rgba::new(255, 0, 0, 255)).unwrap();
        c.finalize().unwrap();

        let buf = c.extract().unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buf.channel(x, y, RED_OFFSET), 255, "red at ({x},{y})");
                assert_eq!(buf.channel(x, y, GREEN_OFFSET), 0, "green at ({x},{y})");
                assert_eq!(buf.channel(x, y, BLUE_OFFSET), 0, "blue at ({x},{y})");
                assert_eq!(buf.channel(x, y, ALPHA_OFFSET), 255, "alpha at ({x},{y})");
            }
        }
    }

    #[test]
    fn degenerate_ring_is_a_noop() {
        let mut c = ctx(4, 4, Rgba::WHITE);
        let shape = Shape::from_rings(vec![ring(&[(0.0, 0.0), (4.0, 4.0)])]);
        c.fill_polygon(&shape, Rgba::new(0, 255, 0, 255)).unwrap();
        c.finalize().unwrap();

        // White background everywhere, nothing drawn.
        let buf = c.extract().unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buf.pixel(x, y), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn empty_shape_is_a_noop() {
        let mut c = ctx(4, 4, Rgba::WHITE);
        c.fill_polygon(&Shape::new(), Rgba::BLACK).unwrap();
        c.stroke_polyline(&Shape::new(), &StrokeStyle::new(Rgba::BLACK, 1.0, LineCap::Butt))
            .unwrap();
        c.finalize().unwrap();
        let buf = c.extract().unwrap();
        assert_eq!(buf.pixel(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn close_layer_without_start_is_unbalanced_but_not_fatal() {
        let mut c = ctx(4, 4, Rgba::WHITE);
        let err = c.close_layer().unwrap_err();
        assert!(matches!(err, RenderError::UnbalancedLayer));

        // The context stays usable.
        let shape = Shape::from_rings(vec![square(0.0, 0.0, 4.0, 4.0)]);
        c.fill_polygon(&shape, Rgba::new(0, 0, 255, 255)).unwrap();
        c.finalize().unwrap();
        let buf = c.extract().unwrap();
        assert_eq!(buf.channel(2, 2, BLUE_OFFSET), 255);
    }

    #[test]
    fn matched_layer_pairs_leave_state_and_pixels_identical() {
        let red = Rgba::new(255, 0, 0, 255);
        let heavy = StrokeStyle::new(Rgba::new(0, 255, 0, 255), 5.0, LineCap::Round);

        // Draw the same square twice in disjoint areas: once before any
        // layer scoping, once after three matched pairs that mutate the
        // stroke state in between.
        let mut c = ctx(16, 8, Rgba::TRANSPARENT);
        c.fill_polygon(&Shape::from_rings(vec![square(1.0, 1.0, 5.0, 5.0)]), red)
            .unwrap();

        for _ in 0..3 {
            c.start_layer().unwrap();
            c.stroke_polyline(
                &Shape::from_rings(vec![ring(&[(100.0, 100.0), (101.0, 101.0)])]),
                &heavy,
            )
            .unwrap();
        }
        for _ in 0..3 {
            c.close_layer().unwrap();
        }
        assert_eq!(c.layer_depth(), 0);
        assert_eq!(c.current, DrawState { fill_color: red, ..DrawState::default() });

        c.fill_polygon(&Shape::from_rings(vec![square(9.0, 1.0, 13.0, 5.0)]), red)
            .unwrap();
        c.finalize().unwrap();

        let buf = c.extract().unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(buf.pixel(x, y), buf.pixel(x + 8, y), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn extract_before_finalize_is_rejected() {
        let c = ctx(4, 4, Rgba::WHITE);
        assert!(matches!(c.extract(), Err(RenderError::SurfaceNotFinalized)));
    }

    #[test]
    fn extract_is_an_idempotent_read() {
        let mut c = ctx(4, 4, Rgba::WHITE);
        c.fill_polygon(
            &Shape::from_rings(vec![square(1.0, 1.0, 3.0, 3.0)]),
            Rgba::new(10, 20, 30, 255),
        )
        .unwrap();
        c.finalize().unwrap();

        let first = c.extract().unwrap().data().to_vec();
        let second = c.extract().unwrap().data().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut c = ctx(2, 2, Rgba::new(255, 0, 0, 255));
        c.finalize().unwrap();
        let before = c.extract().unwrap().data().to_vec();

        // A second finalize must not swizzle the bytes again.
        c.finalize().unwrap();
        let after = c.extract().unwrap().data().to_vec();
        assert_eq!(before, after);
        assert_eq!(c.extract().unwrap().channel(0, 0, RED_OFFSET), 255);
        assert_eq!(c.extract().unwrap().channel(0, 0, BLUE_OFFSET), 0);
    }

    #[test]
    fn drawing_after_finalize_is_rejected() {
        let mut c = ctx(4, 4, Rgba::WHITE);
        c.finalize().unwrap();

        let shape = Shape::from_rings(vec![square(0.0, 0.0, 4.0, 4.0)]);
        assert!(matches!(
            c.fill_polygon(&shape, Rgba::BLACK),
            Err(RenderError::ContextNotDrawable)
        ));
        assert!(matches!(
            c.stroke_polyline(&shape, &StrokeStyle::new(Rgba::BLACK, 1.0, LineCap::Butt)),
            Err(RenderError::ContextNotDrawable)
        ));
        assert!(matches!(c.start_layer(), Err(RenderError::ContextNotDrawable)));
        assert!(matches!(c.close_layer(), Err(RenderError::ContextNotDrawable)));
    }

    #[test]
    fn stroke_coverage_stays_within_the_width_band() {
        let style = StrokeStyle::new(Rgba::new(0, 0, 0, 255), 2.0, LineCap::Round);
        let mut c = ctx(8, 8, Rgba::TRANSPARENT);
        c.stroke_polyline(
            &Shape::from_rings(vec![ring(&[(2.0, 4.0), (6.0, 4.0)])]),
            &style,
        )
        .unwrap();
        c.finalize().unwrap();

        let buf = c.extract().unwrap();
        let mut covered = 0usize;
        for y in 0..8 {
            for x in 0..8 {
                if buf.channel(x, y, ALPHA_OFFSET) > 0 {
                    covered += 1;
                    // Width 2 around y = 4 plus the round caps: everything
                    // stays inside rows 2..=5 and columns 0..=7.
                    assert!((2..=5).contains(&y), "coverage leaked to row {y}");
                }
            }
        }
        assert!(covered > 0, "stroke drew nothing");

        // A wider stroke over the same segment covers more area.
        let wide = StrokeStyle::new(Rgba::new(0, 0, 0, 255), 4.0, LineCap::Round);
        let mut c2 = ctx(8, 8, Rgba::TRANSPARENT);
        c2.stroke_polyline(
            &Shape::from_rings(vec![ring(&[(2.0, 4.0), (6.0, 4.0)])]),
            &wide,
        )
        .unwrap();
        c2.finalize().unwrap();

        let buf2 = c2.extract().unwrap();
        let covered_wide = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| buf2.channel(x, y, ALPHA_OFFSET) > 0)
            .count();
        assert!(covered_wide > covered, "wider stroke did not cover more pixels");
    }

    #[test]
    fn multi_ring_fill_leaves_holes_uncovered() {
        // Outer ring clockwise, inner ring counter-clockwise: under the
        // non-zero winding rule the inner ring is a hole.
        let outer = square(0.0, 0.0, 8.0, 8.0);
        let inner = ring(&[(2.0, 2.0), (2.0, 6.0), (6.0, 6.0), (6.0, 2.0)]);
        let shape = Shape::from_rings(vec![outer, inner]);

        let mut c = ctx(8, 8, Rgba::TRANSPARENT);
        c.fill_polygon(&shape, Rgba::new(255, 0, 0, 255)).unwrap();
        c.finalize().unwrap();

        let buf = c.extract().unwrap();
        assert_eq!(buf.channel(4, 4, ALPHA_OFFSET), 0, "hole was filled");
        assert_eq!(buf.channel(1, 1, RED_OFFSET), 255, "outer ring not filled");
        assert_eq!(buf.channel(1, 1, ALPHA_OFFSET), 255);
    }

    #[test]
    fn background_is_premultiplied_bgra_after_finalize() {
        // Opaque orange background: b/g/r bytes land at offsets 0/1/2.
        let mut c = ctx(2, 2, Rgba::new(200, 100, 50, 255));
        c.finalize().unwrap();
        let buf = c.extract().unwrap();
        assert_eq!(buf.pixel(0, 0), [50, 100, 200, 255]);
    }
}
