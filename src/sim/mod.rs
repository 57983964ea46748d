//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time flows in through `tick` arguments, never from the clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{circle_hit, resolve};
pub use entities::{
    Enemy, EnemyKind, Explosion, Particle, Player, PowerUp, PowerUpKind, Projectile,
    ProjectileKind, Star, Tint, POWERUP_SIZE,
};
pub use progression::{check_level_up, game_over, spawn_interval_for_level, LEVEL_THRESHOLDS};
pub use spawn::{enemy_weights, kind_for_draw, spawn_enemy, spawn_power_up};
pub use state::{GameState, PowerMode, RunPhase, AUTOFIRE_PERIOD_MS};
pub use tick::{tick, InputState};
pub use timer::{TimerId, TimerKind, Timers};
