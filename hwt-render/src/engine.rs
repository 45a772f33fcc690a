//! Headless per-tick engine: source -> detector -> world + modulation -> compositor

use hwt_analysis::{BeatDetector, BeatSignal, SpectralFrameSource};
use hwt_world::{Target, TickInput, World, WorldEvent};
use tracing::debug;

use crate::canvas::{Canvas, RenderError};
use crate::compositor::Compositor;
use crate::debug::readout;
use crate::modulation::{FrameParams, Modulation};
use crate::present::{PresentLayout, Surface};

/// Longest step a single tick may simulate, in seconds
pub const MAX_DT: f32 = 0.05;

/// What one tick produced
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    /// Clamped step that was simulated
    pub dt: f32,
    pub signal: BeatSignal,
    pub params: FrameParams,
    pub events: Vec<WorldEvent>,
}

/// Owns the detector, the world and the compositor
pub struct Engine {
    detector: BeatDetector,
    modulation: Modulation,
    world: World,
    compositor: Compositor,
    last_elapsed: Option<f64>,
    signal: BeatSignal,
}

impl Engine {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self::from_parts(World::new(), Compositor::new()?))
    }

    /// Fully reproducible engine, for tests and replays
    pub fn with_seed(seed: u64) -> Result<Self, RenderError> {
        Ok(Self::from_parts(World::with_seed(seed), Compositor::with_seed(seed)?))
    }

    fn from_parts(world: World, compositor: Compositor) -> Self {
        Self {
            detector: BeatDetector::new(),
            modulation: Modulation::new(),
            world,
            compositor,
            last_elapsed: None,
            signal: BeatSignal::default(),
        }
    }

    /// Run one tick at wall-clock time `elapsed` (seconds since start)
    ///
    /// The step is the time since the previous call, clamped to
    /// `[0, MAX_DT]`; the first call steps by zero.
    pub fn tick<S>(&mut self, source: &mut S, input: &TickInput, elapsed: f64) -> TickOutcome
    where
        S: SpectralFrameSource + ?Sized,
    {
        let dt = match self.last_elapsed {
            Some(last) => (elapsed - last) as f32,
            None => 0.0,
        };
        if elapsed.is_finite() {
            self.last_elapsed = Some(elapsed);
        }
        self.step(source, input, dt)
    }

    /// Run one tick with an explicit step (clamped to `[0, MAX_DT]`)
    pub fn step<S>(&mut self, source: &mut S, input: &TickInput, dt: f32) -> TickOutcome
    where
        S: SpectralFrameSource + ?Sized,
    {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };

        let sample_rate = source.sample_rate();
        let frame = source.read_frame();
        let signal = self.detector.update(frame, sample_rate, dt);
        self.signal = signal;

        let params = self.modulation.advance(&signal, dt);
        let events = self.world.tick(&signal, input, dt);
        for event in &events {
            debug!("World event: {:?}", event);
        }
        self.compositor.render(&self.world, &params);

        TickOutcome {
            dt,
            signal,
            params,
            events,
        }
    }

    /// Use a fixture between ticks
    pub fn apply(&mut self, target: Target) -> WorldEvent {
        self.world.apply(target)
    }

    /// Scale the last frame onto `surface`
    pub fn present(&self, surface: &mut Surface) -> PresentLayout {
        self.compositor.present(surface)
    }

    /// Last internal frame
    pub fn frame(&self) -> &Canvas {
        self.compositor.frame()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn signal(&self) -> BeatSignal {
        self.signal
    }

    pub fn params(&self) -> FrameParams {
        self.modulation.params()
    }

    pub fn beat_count(&self) -> u64 {
        self.detector.beat_count()
    }

    pub fn debug_text(&self) -> String {
        readout(&self.signal, self.world.toggles())
    }
}
