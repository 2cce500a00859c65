//! Frame loop: clear, draw, update, reschedule.
//!
//! The host's display-refresh callback is abstracted as a [`FrameScheduler`]: a loop is
//! started with its state and stopped with the returned [`FrameHandle`]. [`FrameLoop`] is a
//! single-threaded scheduler pumped by the host once per refresh via [`FrameLoop::advance`].
//! Nothing is scheduled until a loop is explicitly started.
use tracing::{debug, info};

use crate::events::{EffectEvent, EventSink};
use crate::field::{draw, update, Field};
use crate::surface::RasterSurface;

/// One iteration of a frame loop.
pub trait Tick {
    fn tick(&mut self);
}

/// A [`Tick`] that forwards to a closure.
pub struct FnTick<F>
where
    F: FnMut(),
{
    f: F,
}

impl<F> FnTick<F>
where
    F: FnMut(),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Tick for FnTick<F>
where
    F: FnMut(),
{
    #[inline]
    fn tick(&mut self) {
        (self.f)();
    }
}

/// A particle field bound to the surface it renders into.
#[derive(Debug)]
pub struct Animation<S> {
    field: Field,
    surface: S,
    frames: u64,
}

impl<S: RasterSurface> Animation<S> {
    pub fn new(field: Field, surface: S) -> Self {
        Self {
            field,
            surface,
            frames: 0,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of completed ticks.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_parts(self) -> (Field, S) {
        (self.field, self.surface)
    }
}

impl<S: RasterSurface> Tick for Animation<S> {
    /// Draws before updating, so each frame shows positions from before its own update and
    /// the first frame shows the initial positions.
    fn tick(&mut self) {
        self.surface.clear();
        draw(&self.field, &mut self.surface);
        update(&mut self.field);
        self.frames += 1;
    }
}

/// Identifies a started loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Cancellable per-frame scheduling.
pub trait FrameScheduler<T: Tick> {
    /// Schedules `state` to tick once per refresh until stopped.
    fn start(&mut self, state: T) -> FrameHandle;

    /// Cancels the loop and hands its state back. Returns `None` for unknown or stopped handles.
    fn stop(&mut self, handle: FrameHandle) -> Option<T>;
}

struct Scheduled<T> {
    handle: FrameHandle,
    state: T,
    frames: u64,
}

/// Manually pumped scheduler. Each running loop owns its state; ticks run in start order.
pub struct FrameLoop<T> {
    loops: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for FrameLoop<T> {
    fn default() -> Self {
        Self {
            loops: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Tick> FrameLoop<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of running loops.
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn is_running(&self, handle: FrameHandle) -> bool {
        self.position(handle).is_some()
    }

    pub fn get(&self, handle: FrameHandle) -> Option<&T> {
        self.position(handle).map(|i| &self.loops[i].state)
    }

    pub fn get_mut(&mut self, handle: FrameHandle) -> Option<&mut T> {
        self.position(handle).map(|i| &mut self.loops[i].state)
    }

    /// Ticks run so far by the loop behind `handle`.
    pub fn frames(&self, handle: FrameHandle) -> Option<u64> {
        self.position(handle).map(|i| self.loops[i].frames)
    }

    pub fn start_with_events(&mut self, state: T, sink: &mut dyn EventSink) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.loops.push(Scheduled {
            handle,
            state,
            frames: 0,
        });
        info!(handle = handle.id(), "frame loop started");
        sink.send(EffectEvent::LoopStarted { handle });
        handle
    }

    pub fn stop_with_events(
        &mut self,
        handle: FrameHandle,
        sink: &mut dyn EventSink,
    ) -> Option<T> {
        let index = self.position(handle)?;
        let scheduled = self.loops.remove(index);
        info!(
            handle = handle.id(),
            frames = scheduled.frames,
            "frame loop stopped"
        );
        sink.send(EffectEvent::LoopStopped {
            handle,
            frames: scheduled.frames,
        });
        Some(scheduled.state)
    }

    /// Runs one display refresh: every running loop ticks once. Returns the number of ticks.
    pub fn advance(&mut self) -> usize {
        self.advance_with_events(&mut ())
    }

    pub fn advance_with_events(&mut self, sink: &mut dyn EventSink) -> usize {
        for scheduled in &mut self.loops {
            scheduled.state.tick();
            scheduled.frames += 1;
            sink.send(EffectEvent::FrameRendered {
                handle: scheduled.handle,
                frame: scheduled.frames,
            });
        }
        debug!(ticks = self.loops.len(), "frame loop advanced");
        self.loops.len()
    }

    /// Stops every loop, returning their states in start order.
    pub fn stop_all(&mut self) -> Vec<T> {
        let handles: Vec<FrameHandle> = self.loops.iter().map(|s| s.handle).collect();
        handles
            .into_iter()
            .filter_map(|h| self.stop_with_events(h, &mut ()))
            .collect()
    }

    fn position(&self, handle: FrameHandle) -> Option<usize> {
        self.loops.iter().position(|s| s.handle == handle)
    }
}

impl<T: Tick> FrameScheduler<T> for FrameLoop<T> {
    fn start(&mut self, state: T) -> FrameHandle {
        self.start_with_events(state, &mut ())
    }

    fn stop(&mut self, handle: FrameHandle) -> Option<T> {
        self.stop_with_events(handle, &mut ())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::color::Rgb;
    use crate::config::EffectConfig;
    use crate::events::VecSink;
    use crate::field::initialize;
    use crate::sampling::SeedPoint;
    use crate::surface::PixelBuffer;

    fn field(seed: u64) -> Field {
        let seeds = vec![
            SeedPoint::new(0, 0, Rgb::new(255, 0, 0)),
            SeedPoint::new(3, 0, Rgb::new(0, 255, 0)),
        ];
        let config = EffectConfig::new(Vec2::new(64.0, 64.0)).with_particle_size(2.0);
        initialize(seeds, &config, &mut StdRng::seed_from_u64(seed)).expect("field")
    }

    #[test]
    fn first_tick_paints_initial_positions_then_updates() {
        let initial = field(1);
        let mut expected = PixelBuffer::new(64, 64);
        draw(&initial, &mut expected);

        let mut animation = Animation::new(initial.clone(), PixelBuffer::new(64, 64));
        animation.tick();

        assert_eq!(animation.surface(), &expected);
        assert_eq!(animation.frames(), 1);
        for (now, before) in animation.field().particles().iter().zip(initial.particles()) {
            assert_eq!(now.position, before.position + before.velocity);
        }
    }

    #[test]
    fn tick_clears_previous_frame() {
        let mut animation = Animation::new(field(2), PixelBuffer::filled(64, 64, [1, 1, 1, 255]));
        animation.tick();
        let painted = animation
            .surface()
            .as_raw()
            .chunks_exact(4)
            .filter(|px| px[3] != 0)
            .count();
        // Two 2x2 squares, possibly overlapping or partially off-canvas.
        assert!(painted <= 8);
        assert!(animation
            .surface()
            .as_raw()
            .chunks_exact(4)
            .all(|px| px != [1, 1, 1, 255]));
    }

    #[test]
    fn nothing_ticks_until_started() {
        let mut frame_loop: FrameLoop<Animation<PixelBuffer>> = FrameLoop::new();
        assert_eq!(frame_loop.advance(), 0);
        assert!(frame_loop.is_empty());
    }

    #[test]
    fn start_and_stop_hand_back_state() {
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.start(Animation::new(field(3), PixelBuffer::new(64, 64)));
        assert!(frame_loop.is_running(handle));

        for _ in 0..5 {
            frame_loop.advance();
        }
        assert_eq!(frame_loop.frames(handle), Some(5));
        assert_eq!(frame_loop.get(handle).map(Animation::frames), Some(5));

        let animation = frame_loop.stop(handle).expect("running");
        assert_eq!(animation.frames(), 5);
        assert!(!frame_loop.is_running(handle));
        assert_eq!(frame_loop.advance(), 0);
        assert!(frame_loop.stop(handle).is_none());
    }

    #[test]
    fn loops_are_independent() {
        let mut frame_loop = FrameLoop::new();
        let a = frame_loop.start(Animation::new(field(4), PixelBuffer::new(64, 64)));
        frame_loop.advance();
        let b = frame_loop.start(Animation::new(field(5), PixelBuffer::new(64, 64)));
        frame_loop.advance();
        frame_loop.advance();

        assert_ne!(a, b);
        assert_eq!(frame_loop.frames(a), Some(3));
        assert_eq!(frame_loop.frames(b), Some(2));

        frame_loop.stop(a);
        assert_eq!(frame_loop.advance(), 1);
        assert_eq!(frame_loop.frames(b), Some(3));
    }

    #[test]
    fn handles_are_not_reused_after_stop() {
        let noop = || {};
        let mut frame_loop = FrameLoop::new();
        let a = frame_loop.start(FnTick::new(noop));
        frame_loop.stop(a);
        let b = frame_loop.start(FnTick::new(noop));
        assert_ne!(a, b);
        assert!(frame_loop.stop(a).is_none());
        assert!(frame_loop.is_running(b));
    }

    #[test]
    fn fn_tick_runs_once_per_advance_in_start_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut frame_loop: FrameLoop<FnTick<Box<dyn FnMut()>>> = FrameLoop::new();
        let first = Rc::clone(&log);
        let tick_a: Box<dyn FnMut()> = Box::new(move || first.borrow_mut().push('a'));
        frame_loop.start(FnTick::new(tick_a));
        let second = Rc::clone(&log);
        let tick_b: Box<dyn FnMut()> = Box::new(move || second.borrow_mut().push('b'));
        frame_loop.start(FnTick::new(tick_b));

        frame_loop.advance();
        frame_loop.advance();
        assert_eq!(*log.borrow(), vec!['a', 'b', 'a', 'b']);

        assert_eq!(frame_loop.stop_all().len(), 2);
        assert!(frame_loop.is_empty());
    }

    #[test]
    fn events_report_lifecycle() {
        let mut sink = VecSink::new();
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.start_with_events(FnTick::new(|| {}), &mut sink);
        frame_loop.advance_with_events(&mut sink);
        frame_loop.advance_with_events(&mut sink);
        frame_loop.stop_with_events(handle, &mut sink);

        assert_eq!(
            sink.into_inner(),
            vec![
                EffectEvent::LoopStarted { handle },
                EffectEvent::FrameRendered { handle, frame: 1 },
                EffectEvent::FrameRendered { handle, frame: 2 },
                EffectEvent::LoopStopped { handle, frames: 2 },
            ]
        );
    }

    #[test]
    fn empty_field_ticks_without_painting() {
        let config = EffectConfig::new(Vec2::new(8.0, 8.0));
        let empty =
            initialize(Vec::new(), &config, &mut StdRng::seed_from_u64(0)).expect("field");
        let mut animation = Animation::new(empty, PixelBuffer::new(8, 8));
        animation.tick();
        assert!(animation.surface().as_raw().iter().all(|b| *b == 0));
    }
}
