//! Collision passes and resolution
//!
//! Runs once per frame after all entity updates, in fixed order:
//! player vs enemies, player vs enemy fire, player vs pickups, player
//! fire vs enemies. Every test is a circle check between centers against
//! the sum of the two characteristic half-extents; hulls are squares but
//! the circle approximation is part of the game's feel.

use glam::Vec2;

use super::entities::{Explosion, POWERUP_SIZE, Particle, PowerUpKind, Tint};
use super::progression;
use super::state::{GameState, PowerMode};
use crate::consts::*;

/// True when two centers sit closer than `reach`
#[inline]
pub fn circle_hit(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) < reach * reach
}

/// Run all four passes, then any game-over or level-up they trigger
pub fn resolve(state: &mut GameState, now_ms: f64) {
    player_vs_enemies(state);
    player_vs_enemy_fire(state);
    player_vs_power_ups(state, now_ms);
    player_fire_vs_enemies(state);
}

/// Ramming: the enemy always dies; the hull takes 10 unless shielded
fn player_vs_enemies(state: &mut GameState) {
    let ppos = state.player.pos;
    let shield = state.player.shield;
    let mut damage = 0;
    let mut blasts = Vec::new();

    state.enemies.retain(|e| {
        let reach = (PLAYER_SIZE + e.kind.size()) / 2.0;
        if circle_hit(ppos, e.pos, reach) {
            if !shield {
                damage += 10;
                blasts.push(e.pos);
            }
            false
        } else {
            true
        }
    });

    for pos in blasts {
        state
            .explosions
            .push(Explosion::new(pos, Tint::Red, 30.0, 0.5));
    }
    if damage > 0 {
        state.health -= damage;
        if state.health <= 0 {
            progression::game_over(state);
        }
    }
}

/// Enemy fire striking the hull; the shot is spent either way
fn player_vs_enemy_fire(state: &mut GameState) {
    let ppos = state.player.pos;
    let shield = state.player.shield;
    let mut damage = 0;
    let mut blasts = Vec::new();

    state.projectiles.retain(|shot| {
        if shot.vel.y <= 0.0 {
            return true;
        }
        let reach = PLAYER_SIZE / 2.0 + shot.radius;
        if circle_hit(ppos, shot.pos, reach) {
            if !shield {
                damage += shot.damage * 5;
                blasts.push(shot.pos);
            }
            false
        } else {
            true
        }
    });

    for pos in blasts {
        state
            .explosions
            .push(Explosion::new(pos, Tint::Red, 30.0, 0.5));
    }
    if damage > 0 {
        state.health -= damage;
        if state.health <= 0 {
            progression::game_over(state);
        }
    }
}

/// Pickups: apply the kind effect, then a collection burst
fn player_vs_power_ups(state: &mut GameState, now_ms: f64) {
    let ppos = state.player.pos;
    let reach = PLAYER_SIZE / 2.0 + POWERUP_SIZE / 2.0;
    let mut collected = Vec::new();

    state.power_ups.retain(|p| {
        if circle_hit(ppos, p.pos, reach) {
            collected.push((p.kind, p.pos));
            false
        } else {
            true
        }
    });

    for (kind, pos) in collected {
        apply_power_up(state, kind, pos, now_ms);
    }
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind, pos: Vec2, now_ms: f64) {
    match kind {
        PowerUpKind::Health => {
            state.health = (state.health + 30).min(PLAYER_MAX_HEALTH);
        }
        PowerUpKind::Double => {
            state.power = PowerMode::Double;
            state.power_since_ms = now_ms;
            state.power_label = "Double Shot";
        }
        PowerUpKind::Laser => {
            state.power = PowerMode::Laser;
            state.power_since_ms = now_ms;
            state.power_label = "Laser";
        }
        PowerUpKind::Shield => {
            state.activate_shield(now_ms);
            state.power_label = "Shield";
        }
    }

    state
        .explosions
        .push(Explosion::new(pos, kind.tint(), 40.0, 0.3));
    for _ in 0..20 {
        let p = Particle::debris(&mut state.rng, pos, kind.tint());
        state.particles.push(p);
    }
}

/// Player fire vs enemies. First contact spends the shot; an enemy
/// dropped to zero in this pass cannot soak further hits. Kills pay the
/// class bounty and feed the progression check.
fn player_fire_vs_enemies(state: &mut GameState) {
    let GameState {
        projectiles,
        enemies,
        explosions,
        particles,
        rng,
        score,
        ..
    } = state;

    let mut kills = 0u32;
    projectiles.retain(|shot| {
        if shot.vel.y >= 0.0 {
            return true;
        }
        for e in enemies.iter_mut() {
            if e.hits <= 0 {
                continue;
            }
            let reach = shot.radius + e.kind.size() / 2.0;
            if !circle_hit(shot.pos, e.pos, reach) {
                continue;
            }

            e.hits -= shot.damage;
            explosions.push(Explosion::new(shot.pos, shot.tint, 20.0, 0.2));
            for _ in 0..5 {
                particles.push(Particle::spark(rng, shot.pos, e.kind.tint()));
            }

            if e.hits <= 0 {
                *score += e.kind.score();
                kills += 1;
                explosions.push(Explosion::new(e.pos, e.kind.tint(), 40.0, 0.5));
                for _ in 0..20 {
                    particles.push(Particle::debris(rng, e.pos, e.kind.tint()));
                }
            }
            return false;
        }
        true
    });
    enemies.retain(|e| e.hits > 0);

    for _ in 0..kills {
        progression::check_level_up(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Enemy, EnemyKind, PowerUp, Projectile};
    use crate::sim::state::RunPhase;
    use crate::sim::timer::TimerKind;

    fn running_state() -> GameState {
        let mut state = GameState::new(99);
        state.start(0.0);
        state.player.pos = Vec2::new(400.0, 500.0);
        state
    }

    fn enemy_at(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
        let mut e = Enemy::spawn(kind, &mut state.rng, 0.0);
        e.pos = pos;
        state.enemies.push(e);
    }

    #[test]
    fn test_ram_hurts_and_removes_enemy() {
        let mut state = running_state();
        let ppos = state.player.pos;
        enemy_at(&mut state, EnemyKind::Basic, ppos);
        resolve(&mut state, 0.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.health, 90);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].tint, Tint::Red);
    }

    #[test]
    fn test_shield_blocks_ram_damage_but_enemy_still_dies() {
        let mut state = running_state();
        state.player.shield = true;
        let ppos = state.player.pos;
        enemy_at(&mut state, EnemyKind::Tank, ppos);
        resolve(&mut state, 0.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.health, 100);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_distant_enemy_untouched() {
        let mut state = running_state();
        enemy_at(&mut state, EnemyKind::Basic, Vec2::new(100.0, 100.0));
        resolve(&mut state, 0.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.health, 100);
    }

    #[test]
    fn test_enemy_bolt_hits_hull() {
        let mut state = running_state();
        state
            .projectiles
            .push(Projectile::enemy_bolt(state.player.pos));
        resolve(&mut state, 0.0);
        assert!(state.projectiles.is_empty());
        // damage 1 scaled by 5
        assert_eq!(state.health, 95);
    }

    #[test]
    fn test_shield_spends_enemy_bolt_without_damage() {
        let mut state = running_state();
        state.player.shield = true;
        state
            .projectiles
            .push(Projectile::enemy_bolt(state.player.pos));
        resolve(&mut state, 0.0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.health, 100);
    }

    #[test]
    fn test_own_bolt_passes_over_hull() {
        let mut state = running_state();
        state
            .projectiles
            .push(Projectile::player_bolt(state.player.pos));
        // No enemies anywhere: the upward bolt must survive both passes
        resolve(&mut state, 0.0);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.health, 100);
    }

    #[test]
    fn test_health_pickup_caps_at_max() {
        let mut state = running_state();
        state.health = 85;
        let mut p = PowerUp::spawn(&mut state.rng);
        p.kind = PowerUpKind::Health;
        p.pos = state.player.pos;
        state.power_ups.push(p);
        resolve(&mut state, 0.0);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.health, 100);
        // Health leaves the power readout alone
        assert_eq!(state.power_label, "None");
        assert_eq!(state.particles.len(), 20);
    }

    #[test]
    fn test_double_pickup_sets_mode_and_label() {
        let mut state = running_state();
        let mut p = PowerUp::spawn(&mut state.rng);
        p.kind = PowerUpKind::Double;
        p.pos = state.player.pos;
        state.power_ups.push(p);
        resolve(&mut state, 1234.0);
        assert_eq!(state.power, PowerMode::Double);
        assert_eq!(state.power_since_ms, 1234.0);
        assert_eq!(state.power_label, "Double Shot");
    }

    #[test]
    fn test_shield_pickup_raises_shield_with_deadline() {
        let mut state = running_state();
        let mut p = PowerUp::spawn(&mut state.rng);
        p.kind = PowerUpKind::Shield;
        p.pos = state.player.pos;
        state.power_ups.push(p);
        resolve(&mut state, 500.0);
        assert!(state.player.shield);
        assert_eq!(state.power_label, "Shield");
        assert!(state.timers.is_scheduled(TimerKind::ShieldOff));
        // Firing mode is untouched
        assert_eq!(state.power, PowerMode::Normal);
    }

    #[test]
    fn test_bolt_kills_fast_enemy_and_scores() {
        let mut state = running_state();
        enemy_at(&mut state, EnemyKind::Fast, Vec2::new(400.0, 200.0));
        state
            .projectiles
            .push(Projectile::player_bolt(Vec2::new(400.0, 200.0)));
        resolve(&mut state, 0.0);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_bolt_wounds_tank_without_killing() {
        let mut state = running_state();
        enemy_at(&mut state, EnemyKind::Tank, Vec2::new(400.0, 200.0));
        state
            .projectiles
            .push(Projectile::player_bolt(Vec2::new(400.0, 200.0)));
        resolve(&mut state, 0.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].hits, 4);
        assert_eq!(state.score, 0);
        // Hit flash plus five sparks
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.particles.len(), 5);
    }

    #[test]
    fn test_one_shot_spends_on_first_target() {
        let mut state = running_state();
        enemy_at(&mut state, EnemyKind::Fast, Vec2::new(400.0, 200.0));
        enemy_at(&mut state, EnemyKind::Fast, Vec2::new(402.0, 200.0));
        state
            .projectiles
            .push(Projectile::player_bolt(Vec2::new(400.0, 200.0)));
        resolve(&mut state, 0.0);
        // Only the first overlapping enemy takes the hit
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_dead_enemy_soaks_no_second_bolt() {
        let mut state = running_state();
        enemy_at(&mut state, EnemyKind::Fast, Vec2::new(400.0, 200.0));
        state
            .projectiles
            .push(Projectile::player_bolt(Vec2::new(400.0, 200.0)));
        state
            .projectiles
            .push(Projectile::player_bolt(Vec2::new(400.0, 201.0)));
        resolve(&mut state, 0.0);
        // First bolt kills; the second flies on
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_kill_reaching_threshold_levels_up() {
        let mut state = running_state();
        state.score = 900;
        enemy_at(&mut state, EnemyKind::Basic, Vec2::new(400.0, 200.0));
        state.enemies[0].hits = 1;
        state
            .projectiles
            .push(Projectile::player_bolt(Vec2::new(400.0, 200.0)));
        resolve(&mut state, 0.0);
        assert_eq!(state.score, 1000);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_lethal_ram_ends_run_with_raw_health() {
        let mut state = running_state();
        state.health = 5;
        let ppos = state.player.pos;
        enemy_at(&mut state, EnemyKind::Basic, ppos);
        resolve(&mut state, 0.0);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(state.health, -5);
        assert_eq!(state.display_health(), 0);
    }

    #[test]
    fn test_game_over_effects_fire_once() {
        let mut state = running_state();
        state.health = 5;
        let ppos = state.player.pos;
        enemy_at(&mut state, EnemyKind::Basic, ppos);
        enemy_at(&mut state, EnemyKind::Basic, ppos + Vec2::new(1.0, 0.0));
        resolve(&mut state, 0.0);
        assert_eq!(state.phase, RunPhase::GameOver);
        // Two ram blasts plus exactly one send-off explosion
        assert_eq!(state.explosions.len(), 3);
        // 100 send-off sparks, no double emission
        assert_eq!(state.particles.len(), 100);
    }
}
