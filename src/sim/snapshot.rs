//! Read-only views handed to the renderer and HUD once per tick

use serde::Serialize;

use super::state::{
    Bullet, Craft, Enemy, EnemyBullet, Explosion, GamePhase, GameState, PowerUp,
};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub craft: &'a Craft,
    pub shield_active: bool,
    pub ammo_powered: bool,
    pub score: u64,
    pub high_score: u64,
    pub health: u8,
    pub level: u32,
    pub bullets: &'a [Bullet],
    pub enemy_bullets: &'a [EnemyBullet],
    pub enemies: &'a [Enemy],
    pub power_ups: &'a [PowerUp],
    pub explosions: &'a [Explosion],
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState, high_score: u64) -> Self {
        Self {
            phase: state.phase,
            craft: &state.craft,
            shield_active: state.shield_active(),
            ammo_powered: state.ammo_powered(),
            score: state.score,
            high_score,
            health: state.health.get(),
            level: state.level,
            bullets: state.bullets.as_slice(),
            enemy_bullets: state.enemy_bullets.as_slice(),
            enemies: state.enemies.as_slice(),
            power_ups: state.power_ups.as_slice(),
            explosions: state.explosions.as_slice(),
        }
    }

    /// Serialize for a host bridge (e.g. a JS renderer)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// HUD values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub health: u8,
    pub level: u32,
    pub shield_active: bool,
    pub ammo_active: bool,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            health: state.health.get(),
            level: state.level,
            shield_active: state.shield_active(),
            ammo_active: state.ammo_powered(),
        }
    }
}
