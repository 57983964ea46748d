//! Per-frame simulation step
//!
//! `tick` advances the whole run by one animation frame in a fixed phase
//! order. Entity motion is per frame rather than time-scaled; only life
//! counters and the spawn accumulator consume the measured delta time.

use std::collections::HashSet;

use rand::Rng;

use super::collision;
use super::entities::{Particle, Projectile, Tint};
use super::spawn;
use super::state::{GameState, PowerMode, RunPhase};
use super::timer::TimerKind;
use crate::clamp_to_field;
use crate::consts::*;

/// Frame inputs sampled by the host. Key names are stored lowercased
/// ("arrowleft", "a"); tilt is present only while the device delivers
/// orientation events with a usable gamma.
#[derive(Debug, Clone)]
pub struct InputState {
    pub keys: HashSet<String>,
    /// Latest tilt angle in degrees (left/right axis)
    pub tilt: Option<f32>,
    /// Zero point captured by the calibrate action
    pub tilt_calibration: f32,
    /// Degrees-to-pixels steering factor, from settings
    pub tilt_sensitivity: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            tilt: None,
            tilt_calibration: 0.0,
            tilt_sensitivity: TILT_FACTOR,
        }
    }

    pub fn press(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(&key.to_lowercase());
    }

    fn held(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn left(&self) -> bool {
        self.held("arrowleft") || self.held("a")
    }

    pub fn right(&self) -> bool {
        self.held("arrowright") || self.held("d")
    }

    pub fn up(&self) -> bool {
        self.held("arrowup") || self.held("w")
    }

    pub fn down(&self) -> bool {
        self.held("arrowdown") || self.held("s")
    }

    /// Capture the current tilt as the rest position
    pub fn calibrate(&mut self) {
        if let Some(gamma) = self.tilt {
            self.tilt_calibration = gamma;
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance one frame. Returns `true` while the run should keep
/// scheduling frames; the game-over frame completes (its effects land)
/// and then returns `false`.
pub fn tick(state: &mut GameState, input: &InputState, now_ms: f64) -> bool {
    if state.phase != RunPhase::Running {
        return false;
    }

    let dt = if state.last_time_ms > 0.0 {
        ((now_ms - state.last_time_ms) / 1000.0) as f32
    } else {
        1.0 / 60.0
    };
    state.last_time_ms = now_ms;

    // Due wall-clock deadlines come first so a shield drop or autofire
    // shot lands before this frame's movement and collisions
    for kind in state.timers.fire_due(now_ms) {
        match kind {
            TimerKind::ShieldOff => state.player.shield = false,
            TimerKind::AutoFire => state.fire(),
        }
    }

    {
        let (stars, rng) = (&mut state.stars, &mut state.rng);
        for star in stars {
            star.update(rng);
        }
    }

    update_player(state, input);

    state.spawn_timer_ms += f64::from(dt) * 1000.0;
    if state.spawn_timer_ms > state.spawn_interval_ms {
        spawn::spawn_enemy(state, now_ms);
        state.spawn_timer_ms = 0.0;
    }

    if state.rng.random::<f64>() < POWERUP_DROP_CHANCE {
        spawn::spawn_power_up(state);
    }

    // Weapon power expiry; the shield runs on its own timer
    if state.power != PowerMode::Normal && now_ms - state.power_since_ms > POWER_DURATION_MS {
        state.power = PowerMode::Normal;
        state.power_label = "None";
    }

    // Enemies push volley muzzle points instead of projectiles so the
    // new bolts are appended in a stable order afterwards
    let mut volleys = Vec::new();
    {
        let (enemies, rng) = (&mut state.enemies, &mut state.rng);
        enemies.retain_mut(|e| e.update(now_ms, rng, &mut volleys));
    }
    for muzzle in volleys {
        state.projectiles.push(Projectile::enemy_bolt(muzzle));
        for _ in 0..5 {
            let p = Particle::muzzle(&mut state.rng, muzzle, 5.0, 0.5, Tint::Red);
            state.particles.push(p);
        }
    }

    state.projectiles.retain_mut(|p| p.update());
    state.power_ups.retain_mut(|p| p.update());
    state.explosions.retain_mut(|x| x.update(dt));
    state.particles.retain_mut(|p| p.update(dt));

    collision::resolve(state, now_ms);

    debug_assert!(positions_finite(state), "non-finite entity position");

    state.phase == RunPhase::Running
}

/// Steering: tilt owns the horizontal axis when present; otherwise the
/// four key checks apply independently (diagonals stack, un-normalized).
/// The ship is clamped to the field after all movement for the frame.
fn update_player(state: &mut GameState, input: &InputState) {
    let p = &mut state.player;
    if let Some(gamma) = input.tilt {
        p.pos.x += (gamma - input.tilt_calibration) * input.tilt_sensitivity;
    } else {
        if input.left() {
            p.pos.x -= PLAYER_SPEED;
        }
        if input.right() {
            p.pos.x += PLAYER_SPEED;
        }
    }
    if input.up() {
        p.pos.y -= PLAYER_SPEED;
    }
    if input.down() {
        p.pos.y += PLAYER_SPEED;
    }
    p.pos = clamp_to_field(p.pos, PLAYER_SIZE / 2.0, PLAYER_SIZE / 2.0);
}

fn positions_finite(state: &GameState) -> bool {
    state.player.pos.is_finite()
        && state.enemies.iter().all(|e| e.pos.is_finite())
        && state.projectiles.iter().all(|p| p.pos.is_finite())
        && state.power_ups.iter().all(|p| p.pos.is_finite())
}
