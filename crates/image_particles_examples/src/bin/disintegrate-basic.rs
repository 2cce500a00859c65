use glam::Vec2;
use image_particles::prelude::*;
use image_particles_examples::{init_tracing, load_rgba, ring_image, write_frame_png, FrameOutput};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAMES: u64 = 90;
const SNAPSHOT_EVERY: u64 = 30;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Optional image path as the first argument; otherwise a procedural ring.
    let image = match std::env::args().nth(1) {
        Some(path) => load_rgba(path)?,
        None => ring_image(240),
    };

    let config = EffectConfig::new(Vec2::new(480.0, 320.0))
        .with_grid_spacing(5)
        .with_particle_size(5.0);
    let mut rng = StdRng::seed_from_u64(42);
    let effect = ParticleEffect::new(&image, config, &mut rng)?;
    tracing::info!(particles = effect.field().len(), "effect ready");

    let output = FrameOutput::new("out", "disintegrate-basic");
    let mut frame_loop = FrameLoop::new();
    let handle = frame_loop.start(effect.into_animation());

    for _ in 0..FRAMES {
        frame_loop.advance();
        let frames = frame_loop.frames(handle).unwrap_or(0);
        if frames % SNAPSHOT_EVERY == 1 {
            if let Some(animation) = frame_loop.get(handle) {
                write_frame_png(animation.surface(), &output, frames)?;
            }
        }
    }

    frame_loop.stop(handle);
    Ok(())
}
