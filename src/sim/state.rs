//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`. Horizontal
//! positions are percentages of the playfield width, vertical positions are
//! absolute units from the playfield top.

use serde::Serialize;

use super::collision::Resolution;
use super::geometry::Hitbox;
use super::pool::{EntityId, Exit, Pool, PoolEntity};
use crate::consts::*;
use crate::craft_y;
use crate::tuning::Tuning;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Before the first start; pools empty
    Idle,
    /// Active gameplay
    Running,
    /// Health reached zero; loop frozen until restart
    GameOver,
}

/// Player health, clamped to `[0, MAX_HEALTH]` on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Health(u8);

impl Health {
    pub const FULL: Health = Health(MAX_HEALTH);

    /// Build from any integer, clamping into range
    pub fn clamped(value: i32) -> Self {
        Health(value.clamp(0, MAX_HEALTH as i32) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn damage(&mut self, amount: u8) {
        self.0 = self.0.saturating_sub(amount);
    }

    pub fn restore_full(&mut self) {
        *self = Health::FULL;
    }

    pub fn is_depleted(self) -> bool {
        self.0 == 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Health::FULL
    }
}

/// The player's craft
#[derive(Debug, Clone, Serialize)]
pub struct Craft {
    /// Horizontal center (percent)
    pub x: f32,
    /// Horizontal velocity (percent per tick)
    pub velocity: f32,
}

impl Default for Craft {
    fn default() -> Self {
        Self {
            x: CRAFT_START_X,
            velocity: 0.0,
        }
    }
}

impl Craft {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, craft_y(), CRAFT_SIZE)
    }
}

/// Player bullet
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    /// Fired while power ammo was active
    pub powered: bool,
}

impl Bullet {
    pub fn hitbox(&self) -> Hitbox {
        let size = if self.powered {
            POWERED_BULLET_SIZE
        } else {
            BULLET_SIZE
        };
        Hitbox::new(self.x, self.y, size)
    }
}

/// Enemy projectile
#[derive(Debug, Clone, Serialize)]
pub struct EnemyBullet {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

impl EnemyBullet {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, ENEMY_BULLET_SIZE)
    }
}

/// Descending enemy craft
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    /// Session time of this enemy's last shot
    pub last_shot_ms: f64,
}

impl Enemy {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, ENEMY_SIZE)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    /// Full heal
    Heart,
    /// Consumes enemies and enemy bullets on contact for a while
    Shield,
    /// Bullets fired while active are larger and always kill
    Ammo,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Heart, PowerUpKind::Shield, PowerUpKind::Ammo];
}

/// A falling pickup
#[derive(Debug, Clone, Serialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, POWER_UP_SIZE)
    }
}

/// Transient explosion marker
#[derive(Debug, Clone, Serialize)]
pub struct Explosion {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub spawned_ms: f64,
}

macro_rules! impl_pool_entity {
    ($ty:ty, $exit:expr) => {
        impl PoolEntity for $ty {
            fn id(&self) -> EntityId {
                self.id
            }
            fn y(&self) -> f32 {
                self.y
            }
            fn y_mut(&mut self) -> &mut f32 {
                &mut self.y
            }
            fn exit(&self) -> Exit {
                $exit
            }
        }
    };
}

impl_pool_entity!(Bullet, Exit::Top);
impl_pool_entity!(EnemyBullet, Exit::Bottom);
impl_pool_entity!(Enemy, Exit::Bottom);
impl_pool_entity!(PowerUp, Exit::Bottom);
impl_pool_entity!(Explosion, Exit::Bottom);

/// Timed power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectKind {
    Shield,
    Ammo,
}

/// Expiry map for timed effects: one pending expiry per kind.
///
/// An effect is active while it has an expiry. Re-activating resets the
/// expiry instead of stacking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActiveEffects {
    pub shield_expires_ms: Option<f64>,
    pub ammo_expires_ms: Option<f64>,
}

impl ActiveEffects {
    fn slot(&mut self, kind: EffectKind) -> &mut Option<f64> {
        match kind {
            EffectKind::Shield => &mut self.shield_expires_ms,
            EffectKind::Ammo => &mut self.ammo_expires_ms,
        }
    }

    pub fn expiry(&self, kind: EffectKind) -> Option<f64> {
        match kind {
            EffectKind::Shield => self.shield_expires_ms,
            EffectKind::Ammo => self.ammo_expires_ms,
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.expiry(kind).is_some()
    }

    pub fn activate(&mut self, kind: EffectKind, now_ms: f64, duration_ms: f64) {
        *self.slot(kind) = Some(now_ms + duration_ms);
    }

    /// Clear every effect whose expiry has been reached; returns the cleared kinds
    pub fn expire(&mut self, now_ms: f64) -> Vec<EffectKind> {
        let mut cleared = Vec::new();
        for kind in [EffectKind::Shield, EffectKind::Ammo] {
            let slot = self.slot(kind);
            if slot.is_some_and(|at| now_ms >= at) {
                *slot = None;
                cleared.push(kind);
            }
        }
        cleared
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What hurt (or would have hurt) the craft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DamageSource {
    EnemyContact,
    EnemyBullet,
}

/// Gameplay side effects produced by collision resolution and committed in one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ScoreDelta(u64),
    ExplosionSpawned { x: f32, y: f32 },
    DamageApplied { amount: u8, source: DamageSource },
    PowerUpCollected(PowerUpKind),
    /// Unpowered hit that consumed the bullet but left the enemy alive
    Grazed { enemy: EntityId },
    /// Shield consumed a threat without damage
    Deflected(DamageSource),
    EffectExpired(EffectKind),
}

/// Timestamps driving the timed spawns (session time)
#[derive(Debug, Clone, Serialize)]
pub struct SpawnTimers {
    pub last_shot_ms: f64,
    pub last_enemy_spawn_ms: f64,
    pub last_power_up_spawn_ms: f64,
    /// Rolled once per power-up spawn
    pub next_power_up_interval_ms: f64,
}

impl SpawnTimers {
    pub fn new(power_up_interval_ms: f64) -> Self {
        Self {
            last_shot_ms: 0.0,
            last_enemy_spawn_ms: 0.0,
            last_power_up_spawn_ms: 0.0,
            next_power_up_interval_ms: power_up_interval_ms,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Survival time this run (sum of executed tick deltas)
    pub elapsed_ms: f64,
    /// Executed ticks this run
    pub time_ticks: u64,
    /// Difficulty level as of the last tick
    pub level: u32,
    pub score: u64,
    pub health: Health,
    pub craft: Craft,
    pub bullets: Pool<Bullet>,
    pub enemy_bullets: Pool<EnemyBullet>,
    pub enemies: Pool<Enemy>,
    pub power_ups: Pool<PowerUp>,
    pub explosions: Pool<Explosion>,
    pub effects: ActiveEffects,
    pub timers: SpawnTimers,
    /// Measured playfield width in pixels; `None` until the layout is known
    pub playfield_width: Option<f32>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Fresh idle state
    pub fn new(power_up_interval_ms: f64) -> Self {
        Self {
            phase: GamePhase::Idle,
            elapsed_ms: 0.0,
            time_ticks: 0,
            level: 1,
            score: 0,
            health: Health::FULL,
            craft: Craft::default(),
            bullets: Pool::new(MAX_BULLETS),
            enemy_bullets: Pool::new(MAX_ENEMY_BULLETS),
            enemies: Pool::new(MAX_ENEMIES),
            power_ups: Pool::new(MAX_POWER_UPS),
            explosions: Pool::new(MAX_EXPLOSIONS),
            effects: ActiveEffects::default(),
            timers: SpawnTimers::new(power_up_interval_ms),
            playfield_width: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Return craft, pools, timers, flags and clock to their initial values.
    /// Phase, playfield width and the id counter are left alone.
    pub fn reset_run(&mut self, power_up_interval_ms: f64) {
        self.elapsed_ms = 0.0;
        self.time_ticks = 0;
        self.level = 1;
        self.score = 0;
        self.health = Health::FULL;
        self.craft = Craft::default();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.effects.clear();
        self.timers = SpawnTimers::new(power_up_interval_ms);
    }

    pub fn shield_active(&self) -> bool {
        self.effects.is_active(EffectKind::Shield)
    }

    pub fn ammo_powered(&self) -> bool {
        self.effects.is_active(EffectKind::Ammo)
    }

    /// Spawn an explosion marker; dropped when the pool is full
    pub fn spawn_explosion(&mut self, x: f32, y: f32, now_ms: f64) {
        let id = self.next_entity_id();
        let _ = self.explosions.spawn(Explosion {
            id,
            x,
            y,
            spawned_ms: now_ms,
        });
    }

    /// Apply a collision resolution in one step: removals first, then events
    /// in the order they were produced. Returns the applied events.
    pub fn commit(&mut self, resolution: Resolution, now_ms: f64, tuning: &Tuning) -> Vec<GameEvent> {
        self.bullets.remove_ids(&resolution.bullets);
        self.enemies.remove_ids(&resolution.enemies);
        self.enemy_bullets.remove_ids(&resolution.enemy_bullets);
        self.power_ups.remove_ids(&resolution.power_ups);

        for event in &resolution.events {
            match *event {
                GameEvent::ScoreDelta(points) => self.score += points,
                GameEvent::ExplosionSpawned { x, y } => self.spawn_explosion(x, y, now_ms),
                GameEvent::DamageApplied { amount, .. } => self.health.damage(amount),
                GameEvent::PowerUpCollected(kind) => self.apply_power_up(kind, now_ms, tuning),
                GameEvent::Grazed { .. } | GameEvent::Deflected(_) | GameEvent::EffectExpired(_) => {}
            }
        }

        resolution.events
    }

    fn apply_power_up(&mut self, kind: PowerUpKind, now_ms: f64, tuning: &Tuning) {
        match kind {
            PowerUpKind::Heart => self.health.restore_full(),
            PowerUpKind::Shield => {
                self.effects
                    .activate(EffectKind::Shield, now_ms, tuning.effect_duration_ms);
            }
            PowerUpKind::Ammo => {
                self.effects
                    .activate(EffectKind::Ammo, now_ms, tuning.effect_duration_ms);
            }
        }
    }
}
