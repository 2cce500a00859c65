//! Sample-then-initialize pipeline for one source image.
use mint::Vector2;
use rand::Rng;

use crate::animation::Animation;
use crate::config::EffectConfig;
use crate::error::Result;
use crate::events::{EffectEvent, EventSink};
use crate::field::{initialize, Field};
use crate::sampling::{sample, Lattice};
use crate::source::SourceImage;
use crate::surface::PixelBuffer;

/// A particle field built from one image and the configuration that produced it.
#[derive(Debug, Clone)]
pub struct ParticleEffect {
    config: EffectConfig,
    field: Field,
}

impl ParticleEffect {
    /// Validates `config`, samples `image`, and builds the field.
    ///
    /// The image must have finished decoding; otherwise this fails with
    /// [`crate::error::Error::ImageNotReady`] and the caller retries after decode completes.
    pub fn new<I>(image: &I, config: EffectConfig, rng: &mut dyn Rng) -> Result<Self>
    where
        I: SourceImage + ?Sized,
    {
        Self::new_with_events(image, config, rng, &mut ())
    }

    pub fn new_with_events<I>(
        image: &I,
        config: EffectConfig,
        rng: &mut dyn Rng,
        sink: &mut dyn EventSink,
    ) -> Result<Self>
    where
        I: SourceImage + ?Sized,
    {
        config.validate()?;
        let canvas = config.canvas()?;
        let seeds = sample(image, canvas, config.grid_spacing)?;
        sink.send(EffectEvent::Sampled {
            canvas,
            grid_spacing: config.grid_spacing,
            lattice_points: Lattice::new(canvas, config.grid_spacing)?.len(),
            seeds: seeds.len(),
        });

        let field = initialize(seeds, &config, rng)?;
        sink.send(EffectEvent::Initialized {
            particles: field.len(),
        });

        Ok(Self { config, field })
    }

    /// Rebuilds the field for a new viewport size. On error the current field is kept.
    pub fn resample<I>(
        &mut self,
        image: &I,
        canvas_extent: impl Into<Vector2<f32>>,
        rng: &mut dyn Rng,
    ) -> Result<()>
    where
        I: SourceImage + ?Sized,
    {
        let config = self.config.clone().with_canvas_extent(canvas_extent);
        *self = Self::new(image, config, rng)?;
        Ok(())
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    pub fn into_field(self) -> Field {
        self.field
    }

    /// Binds the field to a fresh transparent surface the size of the canvas.
    pub fn into_animation(self) -> Animation<PixelBuffer> {
        let canvas = self.field.canvas();
        Animation::new(self.field, PixelBuffer::new(canvas.width, canvas.height))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::animation::{FrameLoop, FrameScheduler};
    use crate::error::Error;
    use crate::events::VecSink;
    use crate::sampling::CanvasSize;
    use crate::source::DeferredImage;

    const RED: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn builds_field_from_image() {
        let image = PixelBuffer::filled(10, 10, RED);
        let config = EffectConfig::new(Vec2::new(10.0, 10.0));
        let mut sink = VecSink::new();
        let mut rng = StdRng::seed_from_u64(1);
        let effect = ParticleEffect::new_with_events(&image, config, &mut rng, &mut sink)
            .expect("effect");

        assert_eq!(effect.field().len(), 4);
        assert_eq!(
            sink.into_inner(),
            vec![
                EffectEvent::Sampled {
                    canvas: CanvasSize::new(10, 10),
                    grid_spacing: 5,
                    lattice_points: 4,
                    seeds: 4,
                },
                EffectEvent::Initialized { particles: 4 },
            ]
        );
    }

    #[test]
    fn pending_image_is_not_ready() {
        let image = DeferredImage::new();
        let config = EffectConfig::new(Vec2::new(10.0, 10.0));
        let err = ParticleEffect::new(&image, config, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, Error::ImageNotReady));
    }

    #[test]
    fn invalid_config_is_rejected_before_sampling() {
        let image = DeferredImage::new();
        let config = EffectConfig::new(Vec2::new(10.0, 10.0)).with_grid_spacing(0);
        let err = ParticleEffect::new(&image, config, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn transparent_image_gives_empty_field_that_animates() {
        let image = PixelBuffer::new(50, 50);
        let config = EffectConfig::new(Vec2::new(50.0, 50.0)).with_grid_spacing(1);
        let effect =
            ParticleEffect::new(&image, config, &mut StdRng::seed_from_u64(2)).expect("effect");
        assert!(effect.field().is_empty());

        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.start(effect.into_animation());
        frame_loop.advance();
        let animation = frame_loop.stop(handle).expect("running");
        assert!(animation.surface().as_raw().iter().all(|b| *b == 0));
    }

    #[test]
    fn resample_rebuilds_for_new_canvas() {
        let image = PixelBuffer::filled(10, 10, RED);
        let config = EffectConfig::new(Vec2::new(10.0, 10.0));
        let mut rng = StdRng::seed_from_u64(3);
        let mut effect = ParticleEffect::new(&image, config, &mut rng).expect("effect");

        effect
            .resample(&image, Vec2::new(20.0, 20.0), &mut rng)
            .expect("resampled");
        assert_eq!(effect.field().canvas(), CanvasSize::new(20, 20));
        assert_eq!(effect.config().canvas_extent, Vec2::new(20.0, 20.0));
        // Image sits at (5, 5)..(15, 15); lattice points 5 and 10 fall inside on each axis.
        assert_eq!(effect.field().len(), 4);

        let before = effect.field().clone();
        assert!(effect
            .resample(&image, Vec2::new(f32::NAN, 1.0), &mut rng)
            .is_err());
        assert_eq!(effect.field(), &before);
    }
}
