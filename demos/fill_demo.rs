//! Renders a small two-layer map scene and saves it as `fill_demo.png`.

use std::fs::File;
use std::io::BufWriter;

use map_raster::{
    buffer::{ALPHA_OFFSET, BLUE_OFFSET, GREEN_OFFSET, RED_OFFSET},
    LineCap, Point, RenderBackend, RenderOptions, Rgba, Shape, SkiaBackend, StrokeStyle,
};

fn ring(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let backend = SkiaBackend::new();
    let mut ctx = backend.create_image(256, 256, Rgba::WHITE, &RenderOptions::default())?;

    // Layer 1: a landmass polygon with a lake hole.
    backend.start_layer(&mut ctx)?;
    let landmass = Shape::from_rings(vec![
        ring(&[(20.0, 30.0), (230.0, 20.0), (240.0, 220.0), (30.0, 235.0)]),
        // Opposite winding: rendered as a hole.
        ring(&[(90.0, 90.0), (90.0, 160.0), (170.0, 160.0), (170.0, 90.0)]),
    ]);
    backend.render_polygon(&mut ctx, &landmass, Rgba::new(120, 180, 90, 255))?;
    backend.close_layer(&mut ctx)?;

    // Layer 2: a road crossing the scene.
    backend.start_layer(&mut ctx)?;
    let road = Shape::from_rings(vec![ring(&[
        (10.0, 200.0),
        (80.0, 150.0),
        (160.0, 190.0),
        (250.0, 60.0),
    ])]);
    backend.render_line(
        &mut ctx,
        &road,
        &StrokeStyle::new(Rgba::new(60, 60, 60, 255), 5.0, LineCap::Round),
    )?;
    backend.close_layer(&mut ctx)?;

    let buffer = backend.raster_buffer(&mut ctx)?;

    // Re-order the premultiplied BGRA bytes into straight RGBA for PNG.
    // The scene is fully opaque, so premultiplied equals straight here.
    let mut rgba = Vec::with_capacity(buffer.data().len());
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            rgba.push(buffer.channel(x, y, RED_OFFSET));
            rgba.push(buffer.channel(x, y, GREEN_OFFSET));
            rgba.push(buffer.channel(x, y, BLUE_OFFSET));
            rgba.push(buffer.channel(x, y, ALPHA_OFFSET));
        }
    }

    let file = File::create("fill_demo.png")?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header()?.write_image_data(&rgba)?;

    println!("wrote fill_demo.png");
    Ok(())
}
