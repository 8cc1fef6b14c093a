//! Skyfighter - a vertical arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, session lifecycle)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Best score and run history for the current process

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation tick length (~60 Hz)
    pub const TICK_MS: f64 = 16.0;

    /// Playfield height in absolute units
    pub const PLAYFIELD_HEIGHT: f32 = 750.0;
    /// Horizontal limits for the craft and spawns (percent of width)
    pub const MIN_X_PERCENT: f32 = 5.0;
    pub const MAX_X_PERCENT: f32 = 95.0;
    /// Craft starts centered
    pub const CRAFT_START_X: f32 = 50.0;
    /// Craft box sits this far above the playfield bottom
    pub const CRAFT_BOTTOM_OFFSET: f32 = 60.0;

    /// Pool capacities
    pub const MAX_BULLETS: usize = 15;
    pub const MAX_ENEMIES: usize = 8;
    pub const MAX_ENEMY_BULLETS: usize = 10;
    pub const MAX_POWER_UPS: usize = 2;
    pub const MAX_EXPLOSIONS: usize = 32;

    /// Hitbox sizes (width, height)
    pub const BULLET_SIZE: (f32, f32) = (4.0, 15.0);
    pub const POWERED_BULLET_SIZE: (f32, f32) = (12.0, 25.0);
    pub const ENEMY_SIZE: (f32, f32) = (50.0, 50.0);
    pub const CRAFT_SIZE: (f32, f32) = (50.0, 50.0);
    pub const POWER_UP_SIZE: (f32, f32) = (40.0, 40.0);
    pub const ENEMY_BULLET_SIZE: (f32, f32) = (6.0, 6.0);

    /// Health bounds
    pub const MAX_HEALTH: u8 = 100;
}

/// Convert a horizontal percentage to absolute units for a given playfield width
#[inline]
pub fn percent_to_px(percent: f32, playfield_width: f32) -> f32 {
    (percent / 100.0) * playfield_width
}

/// Vertical position of the craft's hitbox top edge
#[inline]
pub fn craft_y() -> f32 {
    consts::PLAYFIELD_HEIGHT - consts::CRAFT_BOTTOM_OFFSET
}
