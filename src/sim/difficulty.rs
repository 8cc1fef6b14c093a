//! Difficulty scaling over survival time
//!
//! Level starts at 1 and rises every `level_duration_ms` without bound. All
//! derived parameters are monotonic in level and floored where noted.

use serde::Serialize;

use crate::tuning::Tuning;

/// Difficulty level for a given survival time: `floor(elapsed / duration) + 1`
pub fn difficulty_level(elapsed_ms: f64, tuning: &Tuning) -> u32 {
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return 1;
    }
    ((elapsed_ms / tuning.level_duration_ms).floor() as u32).saturating_add(1)
}

/// Spawn, speed and fire parameters derived from a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Difficulty {
    pub level: u32,
    pub enemy_spawn_interval_ms: f64,
    /// Units per tick at the fixed step
    pub enemy_speed: f32,
    pub enemy_shoot_interval_ms: f64,
}

impl Difficulty {
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        let lvl = level as f64;
        Self {
            level,
            enemy_spawn_interval_ms: (tuning.enemy_spawn_base_ms - tuning.enemy_spawn_step_ms * lvl)
                .max(tuning.enemy_spawn_min_ms),
            enemy_speed: tuning.enemy_speed_base + tuning.enemy_speed_per_level * level as f32,
            enemy_shoot_interval_ms: (tuning.enemy_shoot_base_ms
                - tuning.enemy_shoot_step_ms * lvl)
                .max(tuning.enemy_shoot_min_ms),
        }
    }

    pub fn at(elapsed_ms: f64, tuning: &Tuning) -> Self {
        Self::for_level(difficulty_level(elapsed_ms, tuning), tuning)
    }

    /// Compound enemy fire gate: the cooldown must have elapsed AND the
    /// per-tick draw must exceed the fire threshold. The draw is only taken
    /// once the cooldown has passed.
    pub fn enemy_may_fire<F>(&self, now_ms: f64, last_shot_ms: f64, draw: F, tuning: &Tuning) -> bool
    where
        F: FnOnce() -> f64,
    {
        now_ms - last_shot_ms > self.enemy_shoot_interval_ms && draw() > tuning.enemy_fire_threshold
    }
}

/// Randomized wait before the next power-up: `base + draw * spread`
pub fn power_up_interval_ms(draw: f64, tuning: &Tuning) -> f64 {
    tuning.power_up_interval_base_ms + draw * tuning.power_up_interval_spread_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_boundaries() {
        let t = Tuning::default();
        assert_eq!(difficulty_level(0.0, &t), 1);
        assert_eq!(difficulty_level(9999.0, &t), 1);
        assert_eq!(difficulty_level(10_000.0, &t), 2);
        assert_eq!(difficulty_level(99_999.0, &t), 10);
    }

    #[test]
    fn test_derived_parameters() {
        let t = Tuning::default();
        let d = Difficulty::for_level(1, &t);
        assert_eq!(d.enemy_spawn_interval_ms, 1900.0);
        assert!((d.enemy_speed - 0.95).abs() < 1e-6);
        assert_eq!(d.enemy_shoot_interval_ms, 3800.0);

        let d = Difficulty::for_level(20, &t);
        assert_eq!(d.enemy_spawn_interval_ms, 800.0);
        assert_eq!(d.enemy_shoot_interval_ms, 1500.0);
        assert!((d.enemy_speed - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_fire_gate_needs_cooldown_and_draw() {
        let t = Tuning::default();
        let d = Difficulty::for_level(1, &t);
        // Cooldown not elapsed: the draw is never taken
        assert!(!d.enemy_may_fire(3000.0, 0.0, || panic!("drew during cooldown"), &t));
        // Cooldown elapsed, draw too low
        assert!(!d.enemy_may_fire(5000.0, 0.0, || 0.98, &t));
        // Both satisfied
        assert!(d.enemy_may_fire(5000.0, 0.0, || 0.99, &t));
    }

    #[test]
    fn test_power_up_interval_range() {
        let t = Tuning::default();
        assert_eq!(power_up_interval_ms(0.0, &t), 15_000.0);
        assert_eq!(power_up_interval_ms(0.5, &t), 20_000.0);
    }

    #[test]
    fn test_level_saturates_on_huge_quotient() {
        let t = Tuning {
            level_duration_ms: 1e-9,
            ..Tuning::default()
        };
        assert_eq!(difficulty_level(16.0, &t), u32::MAX);
        assert_eq!(difficulty_level(f64::MAX, &Tuning::default()), u32::MAX);
    }

    proptest! {
        #[test]
        fn level_matches_formula(t in 0u64..10_000_000) {
            let tuning = Tuning::default();
            prop_assert_eq!(difficulty_level(t as f64, &tuning), (t / 10_000) as u32 + 1);
        }

        #[test]
        fn level_is_non_decreasing(a in 0u64..5_000_000, b in 0u64..5_000_000) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(difficulty_level(lo as f64, &tuning) <= difficulty_level(hi as f64, &tuning));
        }

        #[test]
        fn intervals_non_increasing_and_floored(level in 1u32..500) {
            let tuning = Tuning::default();
            let cur = Difficulty::for_level(level, &tuning);
            let next = Difficulty::for_level(level + 1, &tuning);
            prop_assert!(next.enemy_spawn_interval_ms <= cur.enemy_spawn_interval_ms);
            prop_assert!(next.enemy_shoot_interval_ms <= cur.enemy_shoot_interval_ms);
            prop_assert!(next.enemy_speed >= cur.enemy_speed);
            prop_assert!(cur.enemy_spawn_interval_ms >= 800.0);
            prop_assert!(cur.enemy_shoot_interval_ms >= 1500.0);
        }
    }
}
