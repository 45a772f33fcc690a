//! Props, particles and the player sprite

use hwt_world::{DustField, Facing, Player, SteamSystem, Target, World, TORCHES};
use rand::Rng;

use crate::canvas::Canvas;
use crate::modulation::FrameParams;
use crate::palette::{
    AMBER, ARMOR0, ARMOR1, ARMOR_HI, BLACK, CAPE0, CAPE1, EMBER, RED, STEAM, STEEL0, STEEL2,
    STEEL3, VOID,
};
use crate::{INTERNAL_HEIGHT, INTERNAL_WIDTH};

const W: i32 = INTERNAL_WIDTH as i32;
const H: i32 = INTERNAL_HEIGHT as i32;

/// Camera origin in whole pixels, shake included
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct View {
    pub x: i32,
    pub y: i32,
}

impl View {
    fn to_screen(self, wx: f32, wy: f32) -> (i32, i32) {
        ((wx - self.x as f32).floor() as i32, (wy - self.y as f32).floor() as i32)
    }
}

fn on_screen(sx: i32, sy: i32, margin: i32) -> bool {
    sx >= -margin && sy >= -margin && sx <= W + margin && sy <= H + margin
}

/// Flame flicker for the torch at world x `wx`
pub fn torch_flicker(time: f32, wx: f32) -> f32 {
    0.65 + 0.35 * (time * 9.0 + wx * 0.03).sin()
}

/// Torches, valve, console, light switch and alarm panel
pub fn draw_props(c: &mut Canvas, world: &World, view: View, p: &FrameParams) {
    let toggles = world.toggles();
    let glow = p.glow;

    for (i, &(wx, wy)) in TORCHES.iter().enumerate() {
        let (sx, sy) = view.to_screen(wx, wy);
        if !on_screen(sx, sy, 20) {
            continue;
        }
        // Wall mount
        c.fill_solid(sx + 4, sy + 9, 4, 2, STEEL2);
        c.fill_solid(sx + 5, sy + 10, 2, 6, STEEL3);

        if toggles.torch_lit(i) {
            let flick = torch_flicker(p.time, wx);
            let a = 0.55 + 0.35 * glow;
            c.fill(sx + 5, sy + 6, 2, 3, EMBER, 0.6 * a);
            c.fill(sx + 6, sy + 7, 1, 2, AMBER, (0.35 + 0.35 * flick) * a);
            c.fill(sx + 5, sy + 8, 1, 1, RED, 0.22 * a);
        } else {
            c.fill(sx + 5, sy + 6, 2, 3, BLACK, 0.25);
        }
    }

    for fixture in world.fixtures() {
        let (sx, sy) = view.to_screen(fixture.x, fixture.y);
        match fixture.target {
            Target::Valve if on_screen(sx, sy, 20) => {
                c.fill_solid(sx, sy, 14, 14, STEEL0);
                c.fill_solid(sx + 1, sy + 1, 12, 12, STEEL2);
                let wheel = if toggles.steam_enabled { EMBER } else { RED };
                c.fill_solid(sx + 6, sy + 3, 2, 8, wheel);
                c.fill_solid(sx + 3, sy + 6, 8, 2, wheel);
                c.fill(sx + 2, sy + 12, 10, 2, BLACK, 0.25);
            }
            Target::Console if on_screen(sx, sy, 40) => {
                c.fill_solid(sx, sy + 2, 32, 16, STEEL0);
                c.fill_solid(sx + 1, sy + 3, 30, 14, STEEL2);
                let pulse = if toggles.console_armed { 0.25 + 0.75 * glow } else { 0.12 };
                for x in [4, 10, 16] {
                    c.fill(sx + x, sy + 6, 3, 2, AMBER, 0.10 + 0.30 * pulse);
                }
                c.fill(sx + 24, sy + 12, 5, 2, RED, 0.06 + 0.20 * glow);
            }
            Target::LightSwitch if on_screen(sx, sy, 20) => {
                c.fill_solid(sx, sy, 14, 14, STEEL0);
                c.fill_solid(sx + 1, sy + 1, 12, 12, STEEL2);
                let (color, alpha) = if toggles.overhead_lights { (AMBER, 1.0) } else { (BLACK, 0.3) };
                c.fill(sx + 6, sy + 4, 2, 6, color, alpha);
                let lever_y = if toggles.overhead_lights { 4 } else { 9 };
                c.fill(sx + 5, sy + lever_y, 4, 2, color, alpha);
            }
            Target::AlarmPanel if on_screen(sx, sy, 20) => {
                c.fill_solid(sx, sy, 14, 14, STEEL0);
                c.fill_solid(sx + 1, sy + 1, 12, 12, STEEL2);
                let a = if toggles.alarm_enabled { 0.18 + 0.25 * glow } else { 0.08 };
                c.fill(sx + 4, sy + 4, 6, 6, RED, a);
                c.fill(sx + 2, sy + 12, 10, 2, BLACK, 0.25);
            }
            _ => {}
        }
    }
}

/// Red dust speckles
pub fn draw_dust<R: Rng>(c: &mut Canvas, dust: &DustField, view: View, p: &FrameParams, rng: &mut R) {
    let alpha_boost = p.bass_smoothed * 0.15 + p.pulse * 0.12;
    for mote in dust.motes() {
        let (sx, sy) = view.to_screen(mote.x, mote.y);
        if !on_screen(sx, sy, 2) {
            continue;
        }
        let a = (mote.alpha + alpha_boost).clamp(0.0, 0.95);
        c.fill(sx, sy, 1, 1, RED, a);
        if mote.scale > 1.25 && rng.random::<f32>() < 0.12 {
            c.fill(sx + 1, sy, 1, 1, RED, a);
        }
    }
}

/// Steam puffs, fading with age
pub fn draw_steam(c: &mut Canvas, steam: &SteamSystem, view: View) {
    for puff in steam.puffs() {
        let (sx, sy) = view.to_screen(puff.x, puff.y);
        if !on_screen(sx, sy, 8) {
            continue;
        }
        let k = puff.remaining();
        let a = 0.07 + 0.22 * k;
        c.fill(sx, sy, 2, 2, STEAM, a);
        if k > 0.6 {
            c.fill(sx + 2, sy + 1, 1, 1, STEAM, a);
        }
    }
}

/// Hint sparkles above every visible fixture, brighter when in reach
pub fn draw_sparkles(c: &mut Canvas, world: &World, view: View, glow: f32) {
    let (px, py) = world.player().center();
    for fixture in world.fixtures() {
        let (sx, sy) = view.to_screen(fixture.x, fixture.y);
        let (w, h) = (fixture.w as i32, fixture.h as i32);
        let visible = sx < W && sx + w > 0 && sy < H && sy + h > 0;
        if !visible {
            continue;
        }
        let a = if fixture.is_near(px, py) { 0.35 + 0.35 * glow } else { 0.15 };
        c.fill(sx + 2, sy - 2, 2, 2, AMBER, a);
        c.fill(sx + w - 3, sy - 1, 1, 1, RED, 0.15 + 0.25 * glow);
    }
}

/// 16x18 top-down robot, anchored 2 px left and 6 px above its body
pub fn draw_player(c: &mut Canvas, player: &Player, view: View, glow: f32) {
    let (ox, oy) = view.to_screen(player.body.x - 2.0, player.body.y - 6.0);
    let step = i32::from(player.anim_frame() % 2);
    let facing = player.facing;

    // Shadow
    c.fill(ox + 3, oy + 16, 10, 2, BLACK, 0.35);

    // Aura
    let aura = (0.08 + glow * 0.18).clamp(0.0, 0.22);
    c.fill(ox + 6, oy + 2, 4, 1, AMBER, aura);

    // Silhouette
    c.fill_solid(ox + 5, oy + 2, 6, 10, VOID);
    c.fill_solid(ox + 4, oy + 3, 8, 8, VOID);
    c.fill_solid(ox + 5, oy + 12, 6, 4, VOID);
    c.fill_solid(ox + 3, oy + 6, 2, 5 + step, VOID);
    c.fill_solid(ox + 11, oy + 6, 2, 5 + (1 - step), VOID);

    // Cape
    c.fill_solid(ox + 4, oy + 7, 8, 7, CAPE0);
    let cape_x = if facing == Facing::Left { 3 } else { 11 };
    c.fill_solid(ox + cape_x, oy + 8, 2, 4 + step, CAPE1);

    // Armor
    c.fill_solid(ox + 5, oy + 4, 6, 10, ARMOR0);
    c.fill_solid(ox + 6, oy + 5, 4, 7, ARMOR1);
    c.fill_solid(ox + 6, oy + 6, 1, 5, ARMOR_HI);

    // Helmet and visor
    c.fill_solid(ox + 5, oy + 2, 6, 3, ARMOR1);
    c.fill_solid(ox + 6, oy + 3, 2, 1, ARMOR_HI);
    c.fill(ox + 7, oy + 4, 2, 1, AMBER, 0.18 + 0.32 * glow);

    // Boots
    c.fill_solid(ox + 6, oy + 14 + step, 2, 2, VOID);
    c.fill_solid(ox + 9, oy + 14 + (1 - step), 2, 2, VOID);

    // Wrench
    match facing {
        Facing::Up => {
            c.fill_solid(ox + 8, oy, 1, 4, STEEL2);
            c.fill_solid(ox + 7, oy, 3, 1, STEEL2);
        }
        Facing::Down => {
            c.fill_solid(ox + 8, oy + 12, 1, 5, STEEL2);
            c.fill_solid(ox + 7, oy + 16, 3, 1, STEEL2);
        }
        Facing::Left => {
            c.fill_solid(ox + 1, oy + 9, 5, 1, STEEL2);
            c.fill_solid(ox + 1, oy + 8, 1, 3, STEEL2);
        }
        Facing::Right => {
            c.fill_solid(ox + 10, oy + 9, 5, 1, STEEL2);
            c.fill_solid(ox + 14, oy + 8, 1, 3, STEEL2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::VOID as BG;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn params(glow: f32) -> FrameParams {
        FrameParams {
            glow,
            ..FrameParams::derive(0.0, 0.0, 0.0)
        }
    }

    #[test]
    fn test_flicker_range() {
        for i in 0..100 {
            let f = torch_flicker(i as f32 * 0.1, 300.0);
            assert!((0.3..=1.0).contains(&f));
        }
    }

    #[test]
    fn test_player_drawn_around_body() {
        let mut c = Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT).unwrap();
        c.clear(BG);
        let player = Player::at(100.0, 100.0);
        draw_player(&mut c, &player, View::default(), 0.5);
        // Armor fill sits inside the sprite box
        assert_eq!(c.pixel(98 + 6, 94 + 5)[..3], [ARMOR1.r, ARMOR1.g, ARMOR1.b]);
    }

    #[test]
    fn test_props_near_spawn_are_drawn() {
        let world = World::with_seed(1);
        let cam = world.camera();
        let view = View {
            x: cam.x.round() as i32,
            y: cam.y.round() as i32,
        };
        let mut c = Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT).unwrap();
        c.clear(BG);
        draw_props(&mut c, &world, view, &params(0.5));
        let before = {
            let mut blank = Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT).unwrap();
            blank.clear(BG);
            blank.data().to_vec()
        };
        assert_ne!(c.data(), &before[..]);
    }

    #[test]
    fn test_offscreen_particles_are_culled() {
        let world = World::with_seed(2);
        let mut c = Canvas::new(INTERNAL_WIDTH, INTERNAL_HEIGHT).unwrap();
        c.clear(BG);
        let before = c.data().to_vec();
        let far = View { x: -10_000, y: -10_000 };
        draw_steam(&mut c, world.steam(), far);
        draw_dust(&mut c, world.dust(), far, &params(1.0), &mut SmallRng::seed_from_u64(1));
        assert_eq!(c.data(), &before[..]);
    }
}
