//! Raster buffer descriptor: the host's view of finished pixel memory.
//!
//! Once a context has been finalized its surface holds 32-bit premultiplied
//! pixels in host byte order: byte 0 = blue, byte 1 = green, byte 2 = red,
//! byte 3 = alpha. [`RasterBuffer`] describes that memory without copying
//! it; the borrow ties the descriptor to the owning context, so the view
//! can never outlive the surface it points into.

/// Byte offset of the blue channel within a pixel.
pub const BLUE_OFFSET: usize = 0;
/// Byte offset of the green channel within a pixel.
pub const GREEN_OFFSET: usize = 1;
/// Byte offset of the red channel within a pixel.
pub const RED_OFFSET: usize = 2;
/// Byte offset of the alpha channel within a pixel.
pub const ALPHA_OFFSET: usize = 3;

/// Borrowed view of a finalized surface's pixel memory.
#[derive(Clone, Copy)]
pub struct RasterBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    row_step: usize,
    pixel_step: usize,
}

impl<'a> RasterBuffer<'a> {
    /// Wraps tightly packed 4-byte pixels. `data` must hold at least
    /// `height * width * 4` bytes.
    pub(crate) fn over(data: &'a [u8], width: u32, height: u32) -> RasterBuffer<'a> {
        debug_assert!(data.len() >= height as usize * width as usize * 4);
        RasterBuffer {
            data,
            width,
            height,
            row_step: width as usize * 4,
            pixel_step: 4,
        }
    }

    /// The raw pixel bytes, `height * row_step` of them.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes. Always at least `width * 4`.
    pub fn row_step(&self) -> usize {
        self.row_step
    }

    /// Bytes per pixel.
    pub fn pixel_step(&self) -> usize {
        self.pixel_step
    }

    /// One channel byte of the pixel at `(x, y)`; `offset` is one of the
    /// `*_OFFSET` constants. Panics if `(x, y)` is out of bounds.
    pub fn channel(&self, x: u32, y: u32, offset: usize) -> u8 {
        self.data[y as usize * self.row_step + x as usize * self.pixel_step + offset]
    }

    /// The four bytes of the pixel at `(x, y)` in memory order
    /// (blue, green, red, alpha). Panics if `(x, y)` is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let base = y as usize * self.row_step + x as usize * self.pixel_step;
        [
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]
    }
}

impl std::fmt::Debug for RasterBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_step", &self.row_step)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_offsets_follow_bgra_order() {
        assert_eq!(BLUE_OFFSET, 0);
        assert_eq!(GREEN_OFFSET, 1);
        assert_eq!(RED_OFFSET, 2);
        assert_eq!(ALPHA_OFFSET, 3);
    }

    #[test]
    fn indexing_uses_row_step_and_pixel_step() {
        // 2x2 image, distinct bytes per pixel.
        let data: Vec<u8> = (0..16).collect();
        let buf = RasterBuffer::over(&data, 2, 2);

        assert_eq!(buf.row_step(), 8);
        assert_eq!(buf.pixel_step(), 4);
        assert_eq!(buf.pixel(0, 0), [0, 1, 2, 3]);
        assert_eq!(buf.pixel(1, 0), [4, 5, 6, 7]);
        assert_eq!(buf.pixel(0, 1), [8, 9, 10, 11]);
        assert_eq!(buf.channel(1, 1, RED_OFFSET), 14);
        assert_eq!(buf.channel(1, 1, ALPHA_OFFSET), 15);
    }
}
