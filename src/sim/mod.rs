//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick motion
//! - Seeded RNG only, passed in explicitly
//! - Stable iteration order (pool spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod geometry;
pub mod pool;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

pub use collision::{Resolution, resolve};
pub use difficulty::{Difficulty, difficulty_level, power_up_interval_ms};
pub use geometry::{Hitbox, Rect, overlaps};
pub use pool::{EntityId, Pool, PoolEntity, SpawnOutcome};
pub use session::{Direction, FrameOutcome, Session};
pub use snapshot::{Hud, Snapshot};
pub use state::{
    ActiveEffects, Bullet, Craft, DamageSource, EffectKind, Enemy, EnemyBullet, Explosion,
    GameEvent, GamePhase, GameState, Health, PowerUp, PowerUpKind,
};
pub use tick::{TickInput, move_craft, tick};
