//! Draws the same segment with each line cap kind and prints per-row
//! coverage, showing how the cap choice widens the stroke ends.

use map_raster::{
    buffer::ALPHA_OFFSET, LineCap, Point, RenderOptions, RenderingContext, Rgba, Shape,
    StrokeStyle,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Cap codes as the host wire format carries them; 9 exercises the
    // lenient fallback to butt.
    for code in [0u32, 1, 2, 9] {
        let cap = LineCap::from_code(code);
        let mut ctx = RenderingContext::new(32, 16, Rgba::TRANSPARENT, RenderOptions::default())?;

        let segment = Shape::from_rings(vec![vec![Point::new(8.0, 8.0), Point::new(24.0, 8.0)]]);
        ctx.stroke_polyline(&segment, &StrokeStyle::new(Rgba::BLACK, 6.0, cap))?;
        ctx.finalize()?;

        let buffer = ctx.extract()?;
        let covered = (0..buffer.height())
            .flat_map(|y| (0..buffer.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| buffer.channel(x, y, ALPHA_OFFSET) > 0)
            .count();

        println!("cap code {code} ({cap:?}): {covered} covered pixels");
    }

    Ok(())
}
