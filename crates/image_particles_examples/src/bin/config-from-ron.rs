use image_particles::prelude::*;
use image_particles_examples::{init_tracing, load_config, ring_image, write_frame_png, FrameOutput};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/effect.ron");

fn main() -> anyhow::Result<()> {
    init_tracing();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let config = load_config(&path)?;
    tracing::info!(?config, "loaded config from {path}");

    let image = ring_image(180);
    let mut rng = StdRng::seed_from_u64(7);
    // Setup events are logged as they happen; loop events are collected for the summary.
    let mut live = FnSink::new(|event: EffectEvent| tracing::info!(?event, "effect event"));
    let effect = ParticleEffect::new_with_events(&image, config, &mut rng, &mut live)?;

    let mut sink = VecSink::new();
    let mut frame_loop = FrameLoop::new();
    let handle = frame_loop.start_with_events(effect.into_animation(), &mut sink);
    for _ in 0..60 {
        frame_loop.advance_with_events(&mut sink);
    }
    let Some(animation) = frame_loop.stop_with_events(handle, &mut sink) else {
        anyhow::bail!("frame loop {} was not running", handle.id());
    };

    let output = FrameOutput::new("out", "config-from-ron");
    write_frame_png(animation.surface(), &output, animation.frames())?;

    for event in sink.events() {
        if !matches!(event, EffectEvent::FrameRendered { .. }) {
            println!("{event:?}");
        }
    }
    Ok(())
}
