//! Red dust motes and vent steam

use hwt_analysis::BeatSignal;
use rand::Rng;

use crate::layout::{vent_center, VENTS};
use crate::{WORLD_HEIGHT, WORLD_WIDTH};

/// Number of dust motes, constant for the lifetime of the field
pub const DUST_COUNT: usize = 140;

/// A single drifting mote
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dust {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Base opacity
    pub alpha: f32,
    /// Size factor, grows with bass
    pub scale: f32,
}

/// Beat-driven nudge applied to every mote
pub fn gust(signal: &BeatSignal) -> f32 {
    if signal.beat_fired {
        0.4 + signal.bass_smoothed * 0.9
    } else {
        0.0
    }
}

/// Fixed population of dust motes, recycled in place
#[derive(Clone, Debug)]
pub struct DustField {
    motes: Vec<Dust>,
}

impl DustField {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let motes = (0..DUST_COUNT)
            .map(|_| Dust {
                x: rng.random::<f32>() * WORLD_WIDTH,
                y: rng.random::<f32>() * WORLD_HEIGHT,
                vx: rng.random_range(-1.0f32..1.0) * 4.0,
                vy: -(6.0 + rng.random::<f32>() * 10.0),
                alpha: 0.25 + rng.random::<f32>() * 0.55,
                scale: 1.0,
            })
            .collect();
        Self { motes }
    }

    pub fn motes(&self) -> &[Dust] {
        &self.motes
    }

    pub fn len(&self) -> usize {
        self.motes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }

    pub fn update<R: Rng>(&mut self, signal: &BeatSignal, dt: f32, rng: &mut R) {
        let gust = gust(signal);
        let scale = 1.0 + signal.bass_smoothed * 0.5;
        for mote in &mut self.motes {
            mote.vx += rng.random_range(-1.0f32..1.0) * 4.0 * gust;
            mote.vy -= 10.0 * gust;
            mote.vx = mote.vx.clamp(-22.0, 22.0);
            mote.vy = mote.vy.clamp(-46.0, -4.0);
            mote.x = wrap(mote.x + mote.vx * dt, WORLD_WIDTH);
            mote.y = wrap(mote.y + mote.vy * dt, WORLD_HEIGHT);
            mote.scale = scale;
        }
    }
}

/// Toroidal wrap into [0, extent)
fn wrap(v: f32, extent: f32) -> f32 {
    if !v.is_finite() {
        return 0.0;
    }
    let r = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if r >= extent {
        0.0
    } else {
        r
    }
}

/// One steam puff
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteamPuff {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub age: f32,
    pub life: f32,
}

impl SteamPuff {
    /// Remaining life fraction (1.0 fresh, 0.0 expired)
    pub fn remaining(&self) -> f32 {
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }
}

/// Vent steam emitter and the puffs it owns
#[derive(Clone, Debug, Default)]
pub struct SteamSystem {
    puffs: Vec<SteamPuff>,
}

impl SteamSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn puffs(&self) -> &[SteamPuff] {
        &self.puffs
    }

    pub fn len(&self) -> usize {
        self.puffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puffs.is_empty()
    }

    /// Emit a burst of `4 + floor(strength * 10)` puffs around (x, y)
    pub fn emit_burst<R: Rng>(&mut self, x: f32, y: f32, strength: f32, rng: &mut R) {
        let strength = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };
        let count = 4 + (strength * 10.0).floor() as usize;
        self.puffs.reserve(count);
        for _ in 0..count {
            self.puffs.push(SteamPuff {
                x: x + rng.random_range(-1.0f32..1.0) * 3.0,
                y: y + rng.random_range(-1.0f32..1.0) * 3.0,
                vx: rng.random_range(-1.0f32..1.0) * (10.0 + strength * 30.0),
                vy: -(20.0 + rng.random::<f32>() * 30.0 + strength * 80.0),
                age: 0.0,
                life: 0.6 + rng.random::<f32>() * 0.5,
            });
        }
    }

    /// Roll for a vent burst this tick; a beat always emits
    ///
    /// Returns true when a burst was emitted.
    pub fn maybe_emit<R: Rng>(&mut self, signal: &BeatSignal, steam_enabled: bool, rng: &mut R) -> bool {
        let bs = signal.bass_smoothed;
        let chance = if steam_enabled { 0.03 + bs * 0.12 } else { 0.01 + bs * 0.06 };
        if !signal.beat_fired && rng.random::<f32>() >= chance {
            return false;
        }
        let strength = (bs * 1.2 + if signal.beat_fired { 0.35 } else { 0.0 }).clamp(0.0, 1.0);
        let vent = VENTS[rng.random_range(0..VENTS.len())];
        let (x, y) = vent_center(vent);
        self.emit_burst(x, y, strength, rng);
        true
    }

    /// Age and move every puff, dropping the expired ones
    pub fn advance(&mut self, dt: f32) {
        self.puffs.retain_mut(|puff| {
            puff.age += dt;
            puff.x += puff.vx * dt;
            puff.y += puff.vy * dt;
            puff.vx *= 0.93;
            puff.vy *= 0.94;
            // Constant drift, toward the top of the screen
            puff.vy -= 10.0 * dt;
            puff.age <= puff.life
        });
    }

    pub fn clear(&mut self) {
        self.puffs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn beat(bass_smoothed: f32) -> BeatSignal {
        BeatSignal {
            bass_smoothed,
            beat_fired: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_dust_count_is_constant() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut field = DustField::new(&mut rng);
        assert_eq!(field.len(), DUST_COUNT);
        for i in 0..500 {
            let signal = if i % 10 == 0 { beat(0.8) } else { BeatSignal::default() };
            field.update(&signal, 0.05, &mut rng);
            assert_eq!(field.len(), DUST_COUNT);
        }
    }

    #[test]
    fn test_dust_stays_in_world_and_velocity_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = DustField::new(&mut rng);
        for _ in 0..300 {
            field.update(&beat(1.0), 0.05, &mut rng);
        }
        for mote in field.motes() {
            assert!((0.0..WORLD_WIDTH).contains(&mote.x));
            assert!((0.0..WORLD_HEIGHT).contains(&mote.y));
            assert!((-22.0..=22.0).contains(&mote.vx));
            assert!((-46.0..=-4.0).contains(&mote.vy));
            assert!((mote.scale - 1.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gust_only_on_beat() {
        assert_eq!(gust(&BeatSignal::default()), 0.0);
        assert!((gust(&beat(0.5)) - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_handles_edges() {
        assert_eq!(wrap(-1.0, 100.0), 99.0);
        assert_eq!(wrap(100.0, 100.0), 0.0);
        assert_eq!(wrap(f32::NAN, 100.0), 0.0);
        assert!(wrap(-1e-9, 100.0) < 100.0);
    }

    #[test]
    fn test_burst_size_follows_strength() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut steam = SteamSystem::new();
        steam.emit_burst(0.0, 0.0, 0.0, &mut rng);
        assert_eq!(steam.len(), 4);
        steam.clear();
        steam.emit_burst(0.0, 0.0, 1.0, &mut rng);
        assert_eq!(steam.len(), 14);
        for puff in steam.puffs() {
            assert!(puff.life >= 0.6 && puff.life <= 1.1);
            assert!(puff.vy < 0.0);
        }
    }

    #[test]
    fn test_beat_always_emits() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut steam = SteamSystem::new();
        assert!(steam.maybe_emit(&beat(0.0), false, &mut rng));
        // strength 0.35 -> 4 + 3 puffs
        assert_eq!(steam.len(), 7);
    }

    #[test]
    fn test_steam_drains_to_zero() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut steam = SteamSystem::new();
        steam.emit_burst(100.0, 100.0, 1.0, &mut rng);
        steam.emit_burst(300.0, 100.0, 0.5, &mut rng);
        // 1.1 s max life at 50 ms per tick
        for _ in 0..23 {
            steam.advance(0.05);
        }
        assert!(steam.is_empty());
    }

    #[test]
    fn test_puffs_rise_and_fade() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut steam = SteamSystem::new();
        steam.emit_burst(100.0, 100.0, 0.5, &mut rng);
        steam.advance(0.1);
        for puff in steam.puffs() {
            assert!(puff.y < 100.0 + 3.0);
            assert!(puff.remaining() < 1.0);
        }
    }
}
