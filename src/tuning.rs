//! Data-driven game balance
//!
//! Every gameplay number the simulation uses lives here so a host can load a
//! balance file without rebuilding. Defaults are the canonical arcade values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error loading or validating a tuning file
#[derive(Debug)]
pub enum TuningError {
    /// The JSON could not be parsed into a `Tuning`
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "malformed tuning JSON: {err}"),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value for `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

/// Shortest accepted level length; keeps the level count within `u32`
const MIN_LEVEL_DURATION_MS: f64 = 1.0;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Craft ===
    /// Velocity added per tick while a direction is held
    pub craft_acceleration: f32,
    /// Velocity multiplier per tick when no single direction is held
    pub craft_friction: f32,
    /// Velocity clamp (percent per tick)
    pub craft_max_speed: f32,
    /// Player auto-fire cooldown
    pub fire_interval_ms: f64,

    // === Projectile and pickup motion (units per tick) ===
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub power_up_speed: f32,
    /// Enemy bullets spawn this far below the firing enemy's top edge
    pub enemy_muzzle_offset: f32,

    // === Difficulty ===
    /// Survival time per difficulty level
    pub level_duration_ms: f64,
    pub enemy_spawn_base_ms: f64,
    pub enemy_spawn_step_ms: f64,
    pub enemy_spawn_min_ms: f64,
    pub enemy_speed_base: f32,
    pub enemy_speed_per_level: f32,
    pub enemy_shoot_base_ms: f64,
    pub enemy_shoot_step_ms: f64,
    pub enemy_shoot_min_ms: f64,
    /// An eligible enemy fires when a uniform draw exceeds this
    pub enemy_fire_threshold: f64,

    // === Power-ups ===
    pub power_up_interval_base_ms: f64,
    pub power_up_interval_spread_ms: f64,
    /// Shield and power ammo duration
    pub effect_duration_ms: f64,

    // === Combat ===
    /// An unpowered hit destroys the enemy when a uniform draw exceeds this
    pub graze_threshold: f64,
    pub kill_score: u64,
    pub enemy_contact_damage: u8,
    pub enemy_bullet_damage: u8,
    pub explosion_lifetime_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            craft_acceleration: 0.8,
            craft_friction: 0.85,
            craft_max_speed: 2.5,
            fire_interval_ms: 200.0,

            bullet_speed: 10.0,
            enemy_bullet_speed: 4.0,
            power_up_speed: 2.0,
            enemy_muzzle_offset: 50.0,

            level_duration_ms: 10_000.0,
            enemy_spawn_base_ms: 2000.0,
            enemy_spawn_step_ms: 100.0,
            enemy_spawn_min_ms: 800.0,
            enemy_speed_base: 0.8,
            enemy_speed_per_level: 0.15,
            enemy_shoot_base_ms: 4000.0,
            enemy_shoot_step_ms: 200.0,
            enemy_shoot_min_ms: 1500.0,
            enemy_fire_threshold: 0.98,

            power_up_interval_base_ms: 15_000.0,
            power_up_interval_spread_ms: 10_000.0,
            effect_duration_ms: 7000.0,

            graze_threshold: 0.1,
            kill_score: 100,
            enemy_contact_damage: 20,
            enemy_bullet_damage: 10,
            explosion_lifetime_ms: 300.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} bytes)", json.len());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        fn non_negative(field: &'static str, value: f64) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must not be negative",
                })
            }
        }

        fn probability(field: &'static str, value: f64) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be within [0, 1]",
                })
            }
        }

        positive("craft_acceleration", self.craft_acceleration as f64)?;
        positive("craft_max_speed", self.craft_max_speed as f64)?;
        probability("craft_friction", self.craft_friction as f64)?;
        positive("fire_interval_ms", self.fire_interval_ms)?;
        positive("bullet_speed", self.bullet_speed as f64)?;
        positive("enemy_bullet_speed", self.enemy_bullet_speed as f64)?;
        positive("power_up_speed", self.power_up_speed as f64)?;
        if !self.level_duration_ms.is_finite() || self.level_duration_ms < MIN_LEVEL_DURATION_MS {
            return Err(TuningError::Invalid {
                field: "level_duration_ms",
                reason: "must be at least 1ms",
            });
        }
        positive("enemy_speed_base", self.enemy_speed_base as f64)?;
        non_negative("enemy_speed_per_level", self.enemy_speed_per_level as f64)?;
        non_negative("enemy_spawn_step_ms", self.enemy_spawn_step_ms)?;
        non_negative("enemy_shoot_step_ms", self.enemy_shoot_step_ms)?;
        non_negative("power_up_interval_spread_ms", self.power_up_interval_spread_ms)?;
        positive("enemy_spawn_min_ms", self.enemy_spawn_min_ms)?;
        positive("enemy_shoot_min_ms", self.enemy_shoot_min_ms)?;
        positive("power_up_interval_base_ms", self.power_up_interval_base_ms)?;
        positive("effect_duration_ms", self.effect_duration_ms)?;
        positive("explosion_lifetime_ms", self.explosion_lifetime_ms)?;
        probability("enemy_fire_threshold", self.enemy_fire_threshold)?;
        probability("graze_threshold", self.graze_threshold)?;

        if self.enemy_spawn_base_ms < self.enemy_spawn_min_ms {
            return Err(TuningError::Invalid {
                field: "enemy_spawn_base_ms",
                reason: "must not be below enemy_spawn_min_ms",
            });
        }
        if self.enemy_shoot_base_ms < self.enemy_shoot_min_ms {
            return Err(TuningError::Invalid {
                field: "enemy_shoot_base_ms",
                reason: "must not be below enemy_shoot_min_ms",
            });
        }

        Ok(())
    }
}
