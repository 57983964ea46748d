//! Level progression and the run-ending transition

use glam::Vec2;

use super::entities::{Explosion, Particle, Tint};
use super::state::{GameState, RunPhase};
use crate::consts::*;

/// Cumulative score needed to leave levels 1 through 8; past the end of
/// the table the level stays put
pub const LEVEL_THRESHOLDS: [u32; 8] = [1000, 2500, 5000, 8000, 12000, 17000, 23000, 30000];

/// Spawn pacing for a level: 100ms faster per level, floored
pub fn spawn_interval_for_level(level: u32) -> f64 {
    (SPAWN_INTERVAL_START_MS - level as f64 * 100.0).max(SPAWN_INTERVAL_FLOOR_MS)
}

/// Advance one level when the score clears the current threshold, with a
/// center-screen celebration. At most one step per call; callers invoke
/// this once per kill.
pub fn check_level_up(state: &mut GameState) {
    let idx = (state.level - 1) as usize;
    if idx >= LEVEL_THRESHOLDS.len() || state.score < LEVEL_THRESHOLDS[idx] {
        return;
    }

    state.level += 1;
    state.spawn_interval_ms = spawn_interval_for_level(state.level);
    log::info!(
        "Level {} at score {} (spawn interval {}ms)",
        state.level,
        state.score,
        state.spawn_interval_ms
    );

    let center = Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT / 2.0);
    state
        .explosions
        .push(Explosion::new(center, Tint::White, 100.0, 1.0));
    for _ in 0..50 {
        let p = Particle::firework(&mut state.rng, center, 4.0);
        state.particles.push(p);
    }
}

/// End the run. Idempotent: only the first breach flips the phase and
/// emits the send-off; later calls in the same frame are no-ops.
pub fn game_over(state: &mut GameState) {
    if state.phase == RunPhase::GameOver {
        return;
    }
    state.phase = RunPhase::GameOver;
    log::info!("Game over at score {} (level {})", state.score, state.level);

    let pos = state.player.pos;
    state
        .explosions
        .push(Explosion::new(pos, Tint::Cyan, 100.0, 1.0));
    for _ in 0..100 {
        let p = Particle::firework(&mut state.rng, pos, 5.0);
        state.particles.push(p);
    }
}
