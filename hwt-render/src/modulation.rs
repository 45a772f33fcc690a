//! Beat pulse and the per-frame visual parameters derived from it

use hwt_analysis::BeatSignal;

/// Pulse decay per second after a beat
const PULSE_DECAY: f32 = 2.8;

/// Visual parameters for one frame, all clamped to their working ranges
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameParams {
    pub bass_smoothed: f32,
    pub pulse: f32,
    pub glow: f32,
    pub warp_strength: f32,
    pub warp_phase: f32,
    pub punch: f32,
    pub zoom: f32,
    /// Seconds of modulation time, for flicker and warning blinks
    pub time: f32,
}

impl FrameParams {
    /// Derive every parameter from the smoothed bass, the pulse and the clock
    pub fn derive(bass_smoothed: f32, pulse: f32, time: f32) -> Self {
        let bs = finite_or_zero(bass_smoothed);
        let pulse = finite_or_zero(pulse);
        let time = finite_or_zero(time);
        let glow = (0.15 + bs * 0.95 + pulse * 0.5).clamp(0.0, 1.0);
        let punch = (0.55 * bs + 0.55 * pulse).clamp(0.0, 1.0);
        Self {
            bass_smoothed: bs,
            pulse,
            glow,
            warp_strength: (bs * 3.0 + pulse * 2.2).clamp(0.0, 6.0),
            warp_phase: time * (1.6 + bs * 1.6),
            punch,
            zoom: 1.0 + punch * 0.03,
            time,
        }
    }

    /// Uniform additive lift, brighter with the overhead lights on
    pub fn lift(&self, overhead_lights: bool) -> f32 {
        let ambient = if overhead_lights { 0.06 } else { 0.03 };
        (ambient + self.bass_smoothed * 0.02 + self.pulse * 0.02).clamp(0.0, 0.12)
    }

    /// Strength of the red alarm wash
    pub fn alarm_flash(&self) -> f32 {
        (0.015 + 0.045 * self.pulse + 0.02 * self.glow).clamp(0.0, 0.09)
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Holds the beat pulse between ticks
#[derive(Clone, Debug, Default)]
pub struct Modulation {
    pulse: f32,
    time: f32,
    params: FrameParams,
}

impl Modulation {
    pub fn new() -> Self {
        Self {
            params: FrameParams::derive(0.0, 0.0, 0.0),
            ..Self::default()
        }
    }

    /// Advance by one tick and return the frame's parameters
    ///
    /// A beat resets the pulse to 1; it then decays linearly at 2.8/s,
    /// including the beat tick itself.
    pub fn advance(&mut self, signal: &BeatSignal, dt: f32) -> FrameParams {
        let dt = finite_or_zero(dt).max(0.0);
        self.time += dt;
        if signal.beat_fired {
            self.pulse = 1.0;
        }
        self.pulse = (self.pulse - dt * PULSE_DECAY).max(0.0);
        self.params = FrameParams::derive(signal.bass_smoothed, self.pulse, self.time);
        self.params
    }

    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    pub fn params(&self) -> FrameParams {
        self.params
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_params() {
        let p = FrameParams::derive(0.0, 0.0, 3.0);
        assert!((p.glow - 0.15).abs() < 1e-6);
        assert_eq!(p.warp_strength, 0.0);
        assert_eq!(p.punch, 0.0);
        assert_eq!(p.zoom, 1.0);
        assert!((p.lift(true) - 0.06).abs() < 1e-6);
        assert!((p.lift(false) - 0.03).abs() < 1e-6);
        assert!((p.alarm_flash() - 0.018).abs() < 1e-6);
    }

    #[test]
    fn test_extreme_inputs_are_clamped() {
        let p = FrameParams::derive(50.0, 50.0, 1.0);
        assert_eq!(p.glow, 1.0);
        assert_eq!(p.warp_strength, 6.0);
        assert_eq!(p.punch, 1.0);
        assert!((p.zoom - 1.03).abs() < 1e-6);
        assert_eq!(p.lift(true), 0.12);
        assert_eq!(p.alarm_flash(), 0.09);

        let p = FrameParams::derive(f32::NAN, f32::INFINITY, f32::NAN);
        assert!((p.glow - 0.15).abs() < 1e-6);
        assert_eq!(p.warp_phase, 0.0);
    }

    #[test]
    fn test_pulse_decays_after_beat() {
        let mut modulation = Modulation::new();
        let beat = BeatSignal {
            beat_fired: true,
            ..Default::default()
        };
        let quiet = BeatSignal::default();

        let p = modulation.advance(&beat, 0.025);
        assert!((p.pulse - 0.93).abs() < 1e-5);
        for _ in 0..4 {
            modulation.advance(&quiet, 0.025);
        }
        // 0.125 s after the beat tick started
        assert!((modulation.pulse() - 0.65).abs() < 1e-4);

        for _ in 0..40 {
            modulation.advance(&quiet, 0.025);
        }
        assert_eq!(modulation.pulse(), 0.0);
    }

    #[test]
    fn test_warp_phase_tracks_time() {
        let mut modulation = Modulation::new();
        let quiet = BeatSignal::default();
        for _ in 0..10 {
            modulation.advance(&quiet, 0.05);
        }
        assert!((modulation.params().warp_phase - 0.5 * 1.6).abs() < 1e-4);
    }
}
