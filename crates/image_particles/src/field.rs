//! Particle field: one particle per seed point, advanced and painted once per frame.
//!
//! Particles start at a uniformly random canvas position rather than at their origin, each
//! with a constant random velocity. [`update`] applies [`LinearDrift`]; other motion models
//! plug in through [`Motion`] and [`update_with`]. [`draw`] paints particles in field order,
//! so later particles overwrite earlier ones where they overlap.
use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::debug;

use crate::color::Rgb;
use crate::config::EffectConfig;
use crate::error::Result;
use crate::random::{rand01, rand_range};
use crate::sampling::{CanvasSize, SeedPoint};
use crate::surface::RasterSurface;

/// A simulated square tracking one seed point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Current top-left corner in canvas pixels.
    pub position: Vec2,
    /// Lattice coordinate of the seed this particle came from.
    pub origin: IVec2,
    pub color: Rgb,
    /// Edge length of the painted square.
    pub size: f32,
    /// Displacement applied per update.
    pub velocity: Vec2,
}

impl Particle {
    /// Builds a particle for `seed` with a random position inside `canvas` and a random
    /// velocity drawn per axis from `velocity_range`.
    pub fn spawn(
        seed: SeedPoint,
        canvas: CanvasSize,
        size: f32,
        velocity_range: (f32, f32),
        rng: &mut dyn Rng,
    ) -> Self {
        let x = rand01(rng) * canvas.width as f32;
        let y = rand01(rng) * canvas.height as f32;
        let (vmin, vmax) = velocity_range;
        let vx = rand_range(rng, vmin, vmax);
        let vy = rand_range(rng, vmin, vmax);
        Self {
            position: Vec2::new(x, y),
            origin: seed.origin,
            color: seed.color,
            size,
            velocity: Vec2::new(vx, vy),
        }
    }
}

/// Per-particle motion model applied by [`update_with`].
///
/// Only [`LinearDrift`] ships. An origin-seeking model (assemble into the image, then
/// disperse) would implement this trait using [`Particle::origin`].
pub trait Motion {
    fn step(&self, particle: &mut Particle);
}

/// Constant-velocity motion with no clamping, damping, or forces.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearDrift;

impl Motion for LinearDrift {
    #[inline]
    fn step(&self, particle: &mut Particle) {
        particle.position += particle.velocity;
    }
}

/// The full particle set plus the canvas and sampling settings that produced it.
///
/// Particles are fixed at construction; none are added or removed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    canvas: CanvasSize,
    grid_spacing: u32,
    particles: Vec<Particle>,
}

impl Field {
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn grid_spacing(&self) -> u32 {
        self.grid_spacing
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to particle state. The slice cannot grow or shrink.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Creates one particle per seed, in seed order.
///
/// Fails with [`crate::error::Error::InvalidConfig`] if `config` does not validate; no field
/// is constructed in that case. An empty seed list yields a valid empty field.
pub fn initialize(
    seeds: Vec<SeedPoint>,
    config: &EffectConfig,
    rng: &mut dyn Rng,
) -> Result<Field> {
    config.validate()?;
    let canvas = config.canvas()?;

    let mut particles = Vec::with_capacity(seeds.len());
    for seed in seeds {
        particles.push(Particle::spawn(
            seed,
            canvas,
            config.particle_size,
            config.initial_velocity_range,
            rng,
        ));
    }

    debug!(
        particles = particles.len(),
        "initialized field on {}x{} canvas", canvas.width, canvas.height
    );

    Ok(Field {
        canvas,
        grid_spacing: config.grid_spacing,
        particles,
    })
}

/// Advances every particle once by its velocity.
pub fn update(field: &mut Field) {
    update_with(field, &LinearDrift);
}

/// Advances every particle once using `motion`.
pub fn update_with<M: Motion + ?Sized>(field: &mut Field, motion: &M) {
    for particle in &mut field.particles {
        motion.step(particle);
    }
}

/// Paints each particle as a filled `size x size` square at its current position.
///
/// Never mutates the field.
pub fn draw<S: RasterSurface + ?Sized>(field: &Field, surface: &mut S) {
    for p in &field.particles {
        surface.fill_rect(p.position.x, p.position.y, p.size, p.size, p.color);
    }
}
