use glam::Vec2;
use image_particles::prelude::*;
use image_particles_examples::{init_tracing, ring_image};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let image = DeferredImage::new();
    let config = EffectConfig::new(Vec2::new(200.0, 200.0));
    let mut rng = StdRng::seed_from_u64(3);

    // Sampling before decode completes is a sequencing error, not a retry loop.
    match ParticleEffect::new(&image, config.clone(), &mut rng) {
        Err(Error::ImageNotReady) => println!("image not decoded yet; waiting for completion"),
        Err(e) => return Err(e.into()),
        Ok(_) => anyhow::bail!("sampling succeeded before decode completed"),
    }

    // Decode finishes; the host now builds the effect.
    image.complete(PixelBuffer::from(ring_image(120)))?;
    let effect = ParticleEffect::new(&image, config, &mut rng)?;
    println!("built field with {} particles", effect.field().len());
    Ok(())
}
