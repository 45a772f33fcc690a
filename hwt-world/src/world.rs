//! The boiler room simulation, advanced once per tick

use hwt_analysis::BeatSignal;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::camera::Camera;
use crate::interact::{self, Interactable, Target};
use crate::layout::{self, boiler_room};
use crate::particles::{DustField, SteamSystem};
use crate::player::{MoveIntent, Player};
use crate::tile::TileMap;
use crate::toggles::Toggles;
use crate::{VIEW_HEIGHT, VIEW_WIDTH, WORLD_HEIGHT, WORLD_WIDTH};

/// Player input for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub intent: MoveIntent,
    /// Rising edge of the interact key
    pub interact: bool,
}

/// Something that happened during a tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// A fixture was used; `message` is the status line to show
    Toggled { target: Target, message: &'static str },
}

/// Complete simulation state
pub struct World {
    map: TileMap,
    player: Player,
    camera: Camera,
    dust: DustField,
    steam: SteamSystem,
    toggles: Toggles,
    fixtures: Vec<Interactable>,
    nearest: Option<usize>,
    rng: SmallRng,
    time: f32,
}

impl World {
    /// Create a world with an entropy-seeded generator
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Create a reproducible world
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: SmallRng) -> Self {
        let dust = DustField::new(&mut rng);
        let player = Player::spawn();
        let mut camera = Camera::new(VIEW_WIDTH as f32, VIEW_HEIGHT as f32, WORLD_WIDTH, WORLD_HEIGHT);
        let (cx, cy) = player.center();
        camera.follow(cx, cy);

        let world = Self {
            map: boiler_room(),
            player,
            camera,
            dust,
            steam: SteamSystem::new(),
            toggles: Toggles::default(),
            fixtures: interact::fixtures(),
            nearest: None,
            rng,
            time: 0.0,
        };
        info!(
            "World ready: {}x{} tiles, {} fixtures",
            world.map.width(),
            world.map.height(),
            world.fixtures.len()
        );
        world
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, signal: &BeatSignal, input: &TickInput, dt: f32) -> Vec<WorldEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();
        self.time += dt;

        self.camera.update_shake(signal);
        self.player.step(&self.map, input.intent, dt);

        let (px, py) = self.player.center();
        self.nearest = interact::nearest(&self.fixtures, px, py);
        if input.interact {
            if let Some(index) = self.nearest {
                let target = self.fixtures[index].target;
                events.push(self.apply(target));
            }
        }

        self.dust.update(signal, dt, &mut self.rng);
        self.steam.maybe_emit(signal, self.toggles.steam_enabled, &mut self.rng);
        self.steam.advance(dt);

        let (cx, cy) = self.player.center();
        self.camera.follow(cx, cy);

        events
    }

    /// Use a fixture, applying its map side effects
    pub fn apply(&mut self, target: Target) -> WorldEvent {
        let message = target.toggle(&mut self.toggles);
        if target == Target::Valve {
            layout::set_gate(&mut self.map, self.toggles.gate_open);
        }
        debug!("{:?}: {}", target, message);
        WorldEvent::Toggled { target, message }
    }

    /// Prompt for the fixture the player stands next to
    pub fn prompt(&self) -> Option<&'static str> {
        self.nearest_fixture().map(|f| f.target.label(&self.toggles))
    }

    pub fn nearest_fixture(&self) -> Option<&Interactable> {
        self.nearest.and_then(|i| self.fixtures.get(i))
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn dust(&self) -> &DustField {
        &self.dust
    }

    pub fn steam(&self) -> &SteamSystem {
        &self.steam
    }

    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    pub fn fixtures(&self) -> &[Interactable] {
        &self.fixtures
    }

    /// Seconds simulated so far
    pub fn time(&self) -> f32 {
        self.time
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
