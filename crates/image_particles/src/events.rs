//! Event types and sinks for observing an effect.
//!
//! This module defines [`EffectEvent`] and a set of sinks to emit, collect, or forward events
//! while building a [`crate::effect::ParticleEffect`] or pumping a
//! [`crate::animation::FrameLoop`].
use crate::animation::FrameHandle;
use crate::sampling::CanvasSize;

/// Describes events emitted while sampling, initializing, and animating.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum EffectEvent {
    /// Emitted after the source image was sampled.
    Sampled {
        /// Canvas the image was centered on.
        canvas: CanvasSize,
        /// Lattice spacing in pixels.
        grid_spacing: u32,
        /// Number of lattice coordinates visited.
        lattice_points: usize,
        /// Number of lattice pixels with non-zero alpha.
        seeds: usize,
    },

    /// Emitted after the particle field was built.
    Initialized {
        /// Number of particles in the field.
        particles: usize,
    },

    /// Emitted when a loop was registered with a frame loop.
    LoopStarted { handle: FrameHandle },

    /// Emitted when a loop was stopped.
    LoopStopped {
        handle: FrameHandle,
        /// Ticks the loop ran before stopping.
        frames: u64,
    },

    /// Emitted after a loop finished one tick.
    FrameRendered {
        handle: FrameHandle,
        /// 1-based tick count for this loop.
        frame: u64,
    },
}

/// A generic event sink that accepts [`EffectEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: EffectEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = EffectEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: EffectEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(EffectEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(EffectEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(EffectEvent),
{
    #[inline]
    fn send(&mut self, event: EffectEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<EffectEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[EffectEvent] {
        &self.events
    }

    pub fn into_inner(self) -> Vec<EffectEvent> {
        self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: EffectEvent) {
        self.events.push(event);
    }
}
