//! Star Surge - a vertical space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, scoring)
//! - `render`: Canvas 2D scene drawing (wasm32 only)
//! - `settings`: Player-tunable options persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (CSS pixels, matches the canvas element)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Movement speeds in pixels per frame (the sim advances once per
    /// animation frame, so these are not scaled by elapsed time)
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const POWERUP_SPEED: f32 = 2.0;

    /// Player hull
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// Shield bubble radius around the player center
    pub const SHIELD_RADIUS: f32 = 60.0;

    /// Background starfield density
    pub const STAR_COUNT: usize = 100;

    /// Chance per frame that an off-cooldown enemy fires
    pub const ENEMY_FIRE_CHANCE: f64 = 0.02;
    /// Chance per frame that a power-up drops from the top
    pub const POWERUP_DROP_CHANCE: f64 = 0.002;

    /// How long weapon and shield power-ups last (ms)
    pub const POWER_DURATION_MS: f64 = 10_000.0;

    /// Enemy spawn pacing (ms); the interval shrinks with each level
    pub const SPAWN_INTERVAL_START_MS: f64 = 2000.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 500.0;

    /// Degrees of device tilt map to pixels per frame through this factor
    pub const TILT_FACTOR: f32 = 0.5;
}

/// Clamp a position so a box of the given half-extents stays on the playfield
#[inline]
pub fn clamp_to_field(pos: Vec2, half_w: f32, half_h: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(half_w, consts::GAME_WIDTH - half_w),
        pos.y.clamp(half_h, consts::GAME_HEIGHT - half_h),
    )
}
