//! Interactable fixtures: valve, console, light switch, alarm panel, torches

use crate::layout::{TORCHES, TORCH_COUNT};
use crate::toggles::Toggles;
use crate::TILE_SIZE;

/// Distance from the player centre within which a fixture can be used
pub const INTERACT_RADIUS: f32 = 28.0;

/// What a fixture switches when used
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Steam and the gate, together
    Valve,
    Console,
    LightSwitch,
    AlarmPanel,
    Torch(usize),
}

impl Target {
    /// Prompt shown while the player stands near the fixture
    pub fn label(self, toggles: &Toggles) -> &'static str {
        match self {
            Target::Valve => "Press E to turn valve",
            Target::Console => "Press E to arm console",
            Target::LightSwitch => "Press E to toggle lights",
            Target::AlarmPanel => "Press E to toggle alarm",
            Target::Torch(i) => {
                if toggles.torch_lit(i) {
                    "Press E to extinguish torch"
                } else {
                    "Press E to light torch"
                }
            }
        }
    }

    /// Flip the switches owned by this target and describe the new state
    ///
    /// Map side effects (the gate) are applied by the caller.
    pub fn toggle(self, toggles: &mut Toggles) -> &'static str {
        match self {
            Target::Valve => {
                toggles.steam_enabled = !toggles.steam_enabled;
                toggles.gate_open = !toggles.gate_open;
                if toggles.steam_enabled {
                    "Valve opened: steam online."
                } else {
                    "Valve closed: steam offline."
                }
            }
            Target::Console => {
                toggles.console_armed = !toggles.console_armed;
                if toggles.console_armed {
                    "Console armed: bass sync enabled."
                } else {
                    "Console disarmed."
                }
            }
            Target::LightSwitch => {
                toggles.overhead_lights = !toggles.overhead_lights;
                if toggles.overhead_lights {
                    "Overhead lights: ON"
                } else {
                    "Overhead lights: OFF"
                }
            }
            Target::AlarmPanel => {
                toggles.alarm_enabled = !toggles.alarm_enabled;
                if toggles.alarm_enabled {
                    "Alarm panel: ARMED"
                } else {
                    "Alarm panel: OFF"
                }
            }
            Target::Torch(i) => match toggles.torches_lit.get_mut(i) {
                Some(lit) => {
                    *lit = !*lit;
                    if *lit {
                        "Torch lit."
                    } else {
                        "Torch out."
                    }
                }
                None => "",
            },
        }
    }
}

/// A fixture placed in the world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interactable {
    pub target: Target,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Interactable {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Squared distance from the fixture centre to (px, py)
    pub fn dist2(&self, px: f32, py: f32) -> f32 {
        let (cx, cy) = self.center();
        (px - cx).powi(2) + (py - cy).powi(2)
    }

    pub fn is_near(&self, px: f32, py: f32) -> bool {
        self.dist2(px, py) < INTERACT_RADIUS * INTERACT_RADIUS
    }
}

/// Every fixture of the boiler room
pub fn fixtures() -> Vec<Interactable> {
    let mut list = vec![
        // On the main-hall side of the gate
        Interactable {
            target: Target::Valve,
            x: 59.0 * TILE_SIZE + 6.0,
            y: 26.0 * TILE_SIZE + 6.0,
            w: 14.0,
            h: 14.0,
        },
        Interactable {
            target: Target::Console,
            x: 12.0 * TILE_SIZE + 8.0,
            y: 8.0 * TILE_SIZE,
            w: 32.0,
            h: 18.0,
        },
        Interactable {
            target: Target::LightSwitch,
            x: 18.0 * TILE_SIZE + 6.0,
            y: 18.0 * TILE_SIZE + 6.0,
            w: 14.0,
            h: 14.0,
        },
        Interactable {
            target: Target::AlarmPanel,
            x: 46.0 * TILE_SIZE + 6.0,
            y: 10.0 * TILE_SIZE + 6.0,
            w: 14.0,
            h: 14.0,
        },
    ];
    list.extend((0..TORCH_COUNT).map(|i| Interactable {
        target: Target::Torch(i),
        x: TORCHES[i].0,
        y: TORCHES[i].1,
        w: 16.0,
        h: 16.0,
    }));
    list
}

/// Index of the closest fixture within reach of (px, py)
pub fn nearest(fixtures: &[Interactable], px: f32, py: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, fixture) in fixtures.iter().enumerate() {
        let d = fixture.dist2(px, py);
        if d < INTERACT_RADIUS * INTERACT_RADIUS && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_list() {
        let list = fixtures();
        assert_eq!(list.len(), 4 + TORCH_COUNT);
        assert_eq!(list[0].target, Target::Valve);
        assert_eq!(list[4].target, Target::Torch(0));
    }

    #[test]
    fn test_nearest_picks_closest_in_range() {
        let list = fixtures();
        let (vx, vy) = list[0].center();
        assert_eq!(nearest(&list, vx + 5.0, vy), Some(0));
        assert_eq!(nearest(&list, vx + 40.0, vy + 40.0), None);
    }

    #[test]
    fn test_radius_is_exclusive() {
        let list = fixtures();
        let (cx, cy) = list[2].center();
        assert!(list[2].is_near(cx + 27.9, cy));
        assert!(!list[2].is_near(cx + 28.0, cy));
    }

    #[test]
    fn test_valve_flips_steam_and_gate() {
        let mut toggles = Toggles::default();
        assert_eq!(Target::Valve.toggle(&mut toggles), "Valve opened: steam online.");
        assert!(toggles.steam_enabled && toggles.gate_open);
        assert_eq!(Target::Valve.toggle(&mut toggles), "Valve closed: steam offline.");
        assert!(!toggles.steam_enabled && !toggles.gate_open);
    }

    #[test]
    fn test_torch_label_follows_state() {
        let mut toggles = Toggles::default();
        assert_eq!(Target::Torch(3).label(&toggles), "Press E to extinguish torch");
        assert_eq!(Target::Torch(3).toggle(&mut toggles), "Torch out.");
        assert_eq!(Target::Torch(3).label(&toggles), "Press E to light torch");
        assert!(toggles.torch_lit(2));
        assert!(!toggles.torch_lit(3));
    }

    #[test]
    fn test_unknown_torch_is_ignored() {
        let mut toggles = Toggles::default();
        let before = toggles.clone();
        assert_eq!(Target::Torch(99).toggle(&mut toggles), "");
        assert_eq!(toggles, before);
    }
}
