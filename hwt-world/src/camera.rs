//! Follow camera with bass-driven shake

use hwt_analysis::{lerp, BeatSignal};

const SHAKE_EASE: f32 = 0.25;
const SHAKE_DECAY: f32 = 0.92;

/// Viewport origin in world pixels plus a shake magnitude
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub shake: f32,
    view: (f32, f32),
    world: (f32, f32),
}

impl Camera {
    pub fn new(view_width: f32, view_height: f32, world_width: f32, world_height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            shake: 0.0,
            view: (view_width, view_height),
            world: (world_width, world_height),
        }
    }

    /// Largest valid origin on each axis
    pub fn max_origin(&self) -> (f32, f32) {
        (
            (self.world.0 - self.view.0).max(0.0),
            (self.world.1 - self.view.1).max(0.0),
        )
    }

    /// Centre the viewport on (cx, cy), clamped to the world
    pub fn follow(&mut self, cx: f32, cy: f32) {
        let (max_x, max_y) = self.max_origin();
        if cx.is_finite() {
            self.x = (cx - self.view.0 / 2.0).clamp(0.0, max_x);
        }
        if cy.is_finite() {
            self.y = (cy - self.view.1 / 2.0).clamp(0.0, max_y);
        }
    }

    /// Kick the shake on beats, otherwise let it settle toward the bass level
    pub fn update_shake(&mut self, signal: &BeatSignal) {
        let target = if signal.beat_fired {
            2.0 + signal.bass_smoothed * 5.0
        } else {
            signal.bass_smoothed * 1.4
        };
        let next = lerp(self.shake, target, SHAKE_EASE) * SHAKE_DECAY;
        self.shake = if next.is_finite() { next.max(0.0) } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_beat_kicks_shake() {
        let mut cam = Camera::new(400.0, 224.0, 1536.0, 1024.0);
        cam.update_shake(&BeatSignal {
            bass_smoothed: 0.4,
            beat_fired: true,
            ..Default::default()
        });
        // lerp(0, 4.0, 0.25) * 0.92
        assert!((cam.shake - 0.92).abs() < 1e-5);
    }

    #[test]
    fn test_shake_decays_in_silence() {
        let mut cam = Camera::new(400.0, 224.0, 1536.0, 1024.0);
        cam.shake = 5.0;
        for _ in 0..100 {
            cam.update_shake(&BeatSignal::default());
        }
        assert!(cam.shake < 1e-3);
    }

    #[test]
    fn test_world_smaller_than_view_pins_origin() {
        let mut cam = Camera::new(400.0, 224.0, 200.0, 100.0);
        cam.follow(150.0, 80.0);
        assert_eq!((cam.x, cam.y), (0.0, 0.0));
    }

    proptest! {
        #[test]
        fn camera_stays_in_bounds(cx in -5000.0f32..5000.0, cy in -5000.0f32..5000.0) {
            let mut cam = Camera::new(400.0, 224.0, 1536.0, 1024.0);
            cam.follow(cx, cy);
            prop_assert!(cam.x >= 0.0 && cam.x <= 1536.0 - 400.0);
            prop_assert!(cam.y >= 0.0 && cam.y <= 1024.0 - 224.0);
        }
    }
}
