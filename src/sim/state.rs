//! Run state and lifecycle entry points
//!
//! `GameState` owns every entity collection, the run counters, the timer
//! table and the seeded RNG. All mutation happens on the frame thread.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Enemy, Explosion, Particle, Player, PowerUp, Projectile, Star, Tint};
use super::timer::{TimerKind, Timers};
use crate::consts::*;

/// Where the run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Start screen up, nothing ticking
    Idle,
    /// Active gameplay
    Running,
    /// Run ended; terminal until the next `start`
    GameOver,
}

/// Player firing behavior. The shield is a separate flag on the player,
/// not a mode, so it stacks with any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    Normal,
    Double,
    Laser,
}

/// Fire repeat period while the touch button is held (ms)
pub const AUTOFIRE_PERIOD_MS: f64 = 200.0;

/// Complete run state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: RunPhase,
    pub score: u32,
    /// Current level, 1-based
    pub level: u32,
    /// Raw hull integrity; the killing blow may push it negative.
    /// Display code clamps, the sim does not.
    pub health: i32,
    pub power: PowerMode,
    /// When the current double/laser mode was picked up (ms)
    pub power_since_ms: f64,
    /// HUD power readout; set at pickup, reset to "None" on expiry
    pub power_label: &'static str,
    /// Current enemy spawn pacing (ms)
    pub spawn_interval_ms: f64,
    /// Accumulated ms toward the next enemy spawn
    pub spawn_timer_ms: f64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub stars: Vec<Star>,
    pub explosions: Vec<Explosion>,
    pub particles: Vec<Particle>,
    /// Pending wall-clock deadlines (shield drop, autofire repeat)
    pub timers: Timers,
    /// Stars rebuilt per run; tunable from settings
    pub star_count: usize,
    /// Timestamp of the previous frame (ms), 0 before the first
    pub last_time_ms: f64,
}

impl GameState {
    /// Create a fresh state with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Idle,
            score: 0,
            level: 1,
            health: PLAYER_MAX_HEALTH,
            power: PowerMode::Normal,
            power_since_ms: 0.0,
            power_label: "None",
            spawn_interval_ms: SPAWN_INTERVAL_START_MS,
            spawn_timer_ms: 0.0,
            player: Player::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            stars: Vec::new(),
            explosions: Vec::new(),
            particles: Vec::new(),
            timers: Timers::new(),
            star_count: STAR_COUNT,
            last_time_ms: 0.0,
        };
        state.init_run();
        state
    }

    /// Reset everything a run touches and rebuild the starfield. The ship
    /// keeps its position between runs; the shield and all pending timers
    /// do not survive.
    pub fn init_run(&mut self) {
        self.score = 0;
        self.level = 1;
        self.health = PLAYER_MAX_HEALTH;
        self.power = PowerMode::Normal;
        self.power_since_ms = 0.0;
        self.power_label = "None";
        self.spawn_interval_ms = SPAWN_INTERVAL_START_MS;
        self.spawn_timer_ms = 0.0;
        self.enemies.clear();
        self.projectiles.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.particles.clear();
        self.timers.clear();
        self.player.shield = false;

        self.stars.clear();
        for _ in 0..self.star_count {
            let star = Star::spawn(&mut self.rng);
            self.stars.push(star);
        }
    }

    /// Begin a run: reset state, mark running, seed the frame clock
    pub fn start(&mut self, now_ms: f64) {
        self.init_run();
        self.phase = RunPhase::Running;
        self.last_time_ms = now_ms;
    }

    /// Fire once from the ship nose according to the current power mode,
    /// with an engine-wash burst at the tail
    pub fn fire(&mut self) {
        let nose = self.player.pos - Vec2::new(0.0, 30.0);
        match self.power {
            PowerMode::Normal => {
                self.projectiles.push(Projectile::player_bolt(nose));
            }
            PowerMode::Double => {
                self.projectiles
                    .push(Projectile::player_bolt(nose - Vec2::new(15.0, 0.0)));
                self.projectiles
                    .push(Projectile::player_bolt(nose + Vec2::new(15.0, 0.0)));
            }
            PowerMode::Laser => {
                self.projectiles.push(Projectile::beam(nose));
            }
        }

        let tail = Vec2::new(self.player.pos.x, self.player.pos.y + PLAYER_SIZE / 2.0);
        for _ in 0..10 {
            let p = Particle::muzzle(&mut self.rng, tail, 10.0, 1.0, Tint::Cyan);
            self.particles.push(p);
        }
    }

    /// Raise the shield for the full duration. Re-activation replaces any
    /// pending drop deadline with a fresh one.
    pub fn activate_shield(&mut self, now_ms: f64) {
        self.player.shield = true;
        self.timers.cancel_kind(TimerKind::ShieldOff);
        self.timers
            .schedule(TimerKind::ShieldOff, now_ms, POWER_DURATION_MS);
    }

    /// Touch fire: shoot immediately, then repeat until released
    pub fn begin_autofire(&mut self, now_ms: f64) {
        self.fire();
        self.timers.cancel_kind(TimerKind::AutoFire);
        self.timers
            .schedule_repeating(TimerKind::AutoFire, now_ms, AUTOFIRE_PERIOD_MS);
    }

    pub fn end_autofire(&mut self) {
        self.timers.cancel_kind(TimerKind::AutoFire);
    }

    /// Hull integrity for the HUD, floored at zero
    pub fn display_health(&self) -> i32 {
        self.health.max(0)
    }
}
