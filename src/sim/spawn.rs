//! Enemy and pickup spawning
//!
//! Enemy class selection is a weighted draw over {basic, fast, tank}.
//! The weights shift toward tanks as the level climbs and are not
//! renormalized; at whole levels they happen to sum to 1.0 anyway.

use rand::Rng;

use super::entities::{Enemy, EnemyKind, PowerUp};
use super::state::GameState;

/// Class weights for a level, in walk order basic, fast, tank
pub fn enemy_weights(level: u32) -> [f64; 3] {
    let f = (level as f64 / 10.0).min(0.5);
    [
        (0.6 - f).max(0.3),
        (0.3 - f * 0.5).max(0.2),
        (0.1 + f * 1.5).min(0.5),
    ]
}

/// Walk cumulative weights in fixed order and take the first bucket
/// whose sum exceeds the draw; an unclaimed draw falls back to basic
pub fn kind_for_draw(draw: f64, weights: [f64; 3]) -> EnemyKind {
    let order = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];
    let mut cumulative = 0.0;
    for (kind, weight) in order.into_iter().zip(weights) {
        cumulative += weight;
        if draw < cumulative {
            return kind;
        }
    }
    EnemyKind::Basic
}

/// Roll one enemy of a level-weighted class at the top edge
pub fn spawn_enemy(state: &mut GameState, now_ms: f64) {
    let draw = state.rng.random::<f64>();
    let kind = kind_for_draw(draw, enemy_weights(state.level));
    let enemy = Enemy::spawn(kind, &mut state.rng, now_ms);
    log::debug!("Spawned {:?} enemy at x={:.0}", kind, enemy.pos.x);
    state.enemies.push(enemy);
}

/// Drop one pickup of a uniformly random kind
pub fn spawn_power_up(state: &mut GameState) {
    let p = PowerUp::spawn(&mut state.rng);
    log::debug!("Spawned {:?} power-up at x={:.0}", p.kind, p.pos.x);
    state.power_ups.push(p);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_one_weights() {
        let w = enemy_weights(1);
        assert!((w[0] - 0.5).abs() < 1.0e-9);
        assert!((w[1] - 0.25).abs() < 1.0e-9);
        assert!((w[2] - 0.25).abs() < 1.0e-9);
    }

    #[test]
    fn test_weights_cap_from_level_five() {
        for level in [5, 7, 10, 99] {
            let w = enemy_weights(level);
            assert_eq!(w, [0.3, 0.2, 0.5]);
        }
    }

    #[test]
    fn test_draw_buckets_at_level_one() {
        let w = enemy_weights(1);
        assert_eq!(kind_for_draw(0.0, w), EnemyKind::Basic);
        assert_eq!(kind_for_draw(0.49, w), EnemyKind::Basic);
        assert_eq!(kind_for_draw(0.5, w), EnemyKind::Fast);
        assert_eq!(kind_for_draw(0.74, w), EnemyKind::Fast);
        assert_eq!(kind_for_draw(0.75, w), EnemyKind::Tank);
        assert_eq!(kind_for_draw(0.999, w), EnemyKind::Tank);
    }

    #[test]
    fn test_unclaimed_draw_defaults_to_basic() {
        // A degenerate table leaves the walk short of the draw
        assert_eq!(kind_for_draw(0.9, [0.1, 0.1, 0.1]), EnemyKind::Basic);
    }

    #[test]
    fn test_sampled_frequencies_track_weights() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let mut rng = Pcg32::seed_from_u64(42);
        for (level, weights) in [(1, enemy_weights(1)), (50, enemy_weights(50))] {
            let mut counts = [0u32; 3];
            for _ in 0..10_000 {
                let draw = rng.random::<f64>();
                match kind_for_draw(draw, enemy_weights(level)) {
                    EnemyKind::Basic => counts[0] += 1,
                    EnemyKind::Fast => counts[1] += 1,
                    EnemyKind::Tank => counts[2] += 1,
                }
            }
            for (count, weight) in counts.into_iter().zip(weights) {
                let observed = f64::from(count) / 10_000.0;
                assert!(
                    (observed - weight).abs() < 0.02,
                    "level {level}: observed {observed}, weight {weight}"
                );
            }
        }
    }

    #[test]
    fn test_spawn_enemy_arrives_at_top() {
        let mut state = GameState::new(11);
        spawn_enemy(&mut state, 500.0);
        assert_eq!(state.enemies.len(), 1);
        let e = &state.enemies[0];
        assert_eq!(e.pos.y, -50.0);
        assert_eq!(e.hits, e.kind.hits());
        assert_eq!(e.last_shot_ms, 500.0);
        assert!(e.fire_cooldown_ms >= 2000.0 && e.fire_cooldown_ms < 5000.0);
    }

    #[test]
    fn test_spawn_power_up_arrives_at_top() {
        let mut state = GameState::new(11);
        spawn_power_up(&mut state);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].pos.y, -30.0);
    }

    proptest! {
        #[test]
        fn prop_weights_stay_bounded(level in 1u32..200) {
            for w in enemy_weights(level) {
                prop_assert!((0.2..=0.5).contains(&w));
            }
        }

        #[test]
        fn prop_every_draw_lands_in_the_first_open_bucket(
            draw in 0.0f64..1.0,
            level in 1u32..50,
        ) {
            let w = enemy_weights(level);
            let expect = if draw < w[0] {
                EnemyKind::Basic
            } else if draw < w[0] + w[1] {
                EnemyKind::Fast
            } else if draw < w[0] + w[1] + w[2] {
                EnemyKind::Tank
            } else {
                EnemyKind::Basic
            };
            prop_assert_eq!(kind_for_draw(draw, w), expect);
        }
    }
}
