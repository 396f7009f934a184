//! Map rendering backend: translates abstract 2-D map scenes (polygons,
//! polylines, styled strokes) into a finished raster image on top of a
//! vector rasterization engine.
//!
//! The host framework creates a [`RenderingContext`] per image, opens a
//! layer scope per map layer, issues fill/stroke calls per feature and
//! finally reads the finished pixels back as a [`RasterBuffer`]:
//!
//! ```
//! use map_raster::{Point, RenderingContext, RenderOptions, Rgba, Shape};
//!
//! let mut ctx = RenderingContext::new(4, 4, Rgba::WHITE, RenderOptions::default())?;
//! ctx.start_layer()?;
//!
//! let square = Shape::from_rings(vec![vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Point::new(4.0, 4.0),
//!     Point::new(0.0, 4.0),
//! ]]);
//! ctx.fill_polygon(&square, Rgba::new(255, 0, 0, 255))?;
//!
//! ctx.close_layer()?;
//! ctx.finalize()?;
//!
//! // Pixels are premultiplied, byte order blue-green-red-alpha.
//! let buffer = ctx.extract()?;
//! assert_eq!(buffer.pixel(2, 2), [0, 0, 255, 255]);
//! # Ok::<(), map_raster::RenderError>(())
//! ```
//!
//! Hosts that dispatch through a capability table use the
//! [`RenderBackend`] trait instead; out-of-scope hooks (symbols, glyphs,
//! tiled fills, compositing) report [`RenderError::Unsupported`] there.

pub mod backend;
pub mod buffer;
pub mod color;
pub mod context;
pub mod errors;
pub mod geometry;
pub mod style;

pub use backend::{Capabilities, RenderBackend, SkiaBackend};
pub use buffer::RasterBuffer;
pub use color::Rgba;
pub use context::{RenderOptions, RenderingContext};
pub use errors::RenderError;
pub use geometry::{Point, Shape};
pub use style::{LineCap, StrokeStyle};
