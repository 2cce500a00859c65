use image_particles::prelude::*;
use image_particles_examples::{init_tracing, ring_image, write_frame_png, FrameOutput};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let image = ring_image(200);
    let canvas = CanvasSize::new(240, 240);
    let output = FrameOutput::new("out", "sampling-grid-spacing").with_background([245, 245, 250]);

    // Compare lattice cost and seed yield across spacings, rendering each seed as a
    // 1-pixel dot at its origin.
    for spacing in [1, 3, 5, 10, 25] {
        let lattice_points = Lattice::new(canvas, spacing)?.len();
        let seeds = sample(&image, canvas, spacing)?;
        println!(
            "spacing {spacing:>2}: {lattice_points:>6} lattice points, {:>6} seeds",
            seeds.len()
        );

        let mut surface = PixelBuffer::new(canvas.width, canvas.height);
        for seed in &seeds {
            surface.fill_rect(
                seed.origin.x as f32,
                seed.origin.y as f32,
                1.0,
                1.0,
                seed.color,
            );
        }
        write_frame_png(&surface, &output, spacing as u64)?;
    }

    Ok(())
}
