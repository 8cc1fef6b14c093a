//! Fixed timestep simulation tick
//!
//! One tick runs these phases in order, each seeing the previous phase's
//! committed state:
//! 1. craft movement
//! 2. timed spawns (player bullet, enemy, power-up)
//! 3. motion, with each enemy rolling its own fire gate
//! 4. collision resolution and commit
//! 5. expiry of explosions and timed effects

use rand::Rng;

use super::collision;
use super::difficulty::{Difficulty, difficulty_level, power_up_interval_ms};
use super::state::{
    Bullet, Craft, Enemy, EnemyBullet, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind,
};
use crate::consts::*;
use crate::craft_y;
use crate::tuning::Tuning;

/// Normalized player intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Advance a running game by one tick covering `dt_ms` of session time.
///
/// Motion is per tick (no scaling by `dt_ms`); the delta only advances the
/// session clock that drives difficulty, cooldowns and expiries. Returns the
/// gameplay events committed this tick. Does nothing unless running.
pub fn tick<R: Rng>(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f64,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<GameEvent> {
    if state.phase != GamePhase::Running {
        return Vec::new();
    }

    state.elapsed_ms += dt_ms.max(0.0);
    state.time_ticks += 1;
    let now = state.elapsed_ms;

    let level = difficulty_level(now, tuning);
    if level != state.level {
        log::info!("Difficulty level {} -> {} at {:.1}s", state.level, level, now / 1000.0);
        state.level = level;
    }
    let difficulty = Difficulty::for_level(level, tuning);

    move_craft(&mut state.craft, input, tuning);
    spawn_timed(state, now, &difficulty, tuning, rng);
    move_entities(state, now, &difficulty, tuning, rng);

    let resolution = collision::resolve(state, tuning, rng);
    let mut events = state.commit(resolution, now, tuning);

    expire_transients(state, now, tuning, &mut events);

    events
}

/// Integrate craft velocity and position from the held directions.
///
/// Each held direction accelerates; with both or neither held friction
/// applies instead. Hitting a wall stops the craft.
pub fn move_craft(craft: &mut Craft, input: &TickInput, tuning: &Tuning) {
    if input.left {
        craft.velocity -= tuning.craft_acceleration;
    }
    if input.right {
        craft.velocity += tuning.craft_acceleration;
    }
    if input.left == input.right {
        craft.velocity *= tuning.craft_friction;
    }

    craft.velocity = craft
        .velocity
        .clamp(-tuning.craft_max_speed, tuning.craft_max_speed);
    craft.x += craft.velocity;

    if craft.x < MIN_X_PERCENT {
        craft.x = MIN_X_PERCENT;
        craft.velocity = 0.0;
    } else if craft.x > MAX_X_PERCENT {
        craft.x = MAX_X_PERCENT;
        craft.velocity = 0.0;
    }
}

/// Uniform horizontal spawn position in `[MIN_X_PERCENT, MAX_X_PERCENT)`
fn random_x<R: Rng>(rng: &mut R) -> f32 {
    MIN_X_PERCENT + rng.random::<f32>() * (MAX_X_PERCENT - MIN_X_PERCENT)
}

/// Cooldown-driven spawns. A timer restarts whenever its cooldown elapses,
/// even if the pool was full and the spawn was dropped.
fn spawn_timed<R: Rng>(
    state: &mut GameState,
    now: f64,
    difficulty: &Difficulty,
    tuning: &Tuning,
    rng: &mut R,
) {
    if now - state.timers.last_shot_ms > tuning.fire_interval_ms {
        if !state.bullets.is_full() {
            let id = state.next_entity_id();
            let bullet = Bullet {
                id,
                x: state.craft.x,
                y: craft_y(),
                powered: state.ammo_powered(),
            };
            let _ = state.bullets.spawn(bullet);
        }
        state.timers.last_shot_ms = now;
    }

    if now - state.timers.last_enemy_spawn_ms > difficulty.enemy_spawn_interval_ms {
        if !state.enemies.is_full() {
            let id = state.next_entity_id();
            let x = random_x(rng);
            let _ = state.enemies.spawn(Enemy {
                id,
                x,
                y: 0.0,
                last_shot_ms: 0.0,
            });
            log::trace!("Enemy {} spawned at x={:.1}%", id, x);
        }
        state.timers.last_enemy_spawn_ms = now;
    }

    if now - state.timers.last_power_up_spawn_ms > state.timers.next_power_up_interval_ms
        && !state.power_ups.is_full()
    {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let id = state.next_entity_id();
        let power_up = PowerUp {
            id,
            x: random_x(rng),
            y: 0.0,
            kind,
        };
        let _ = state.power_ups.spawn(power_up);
        state.timers.last_power_up_spawn_ms = now;
        state.timers.next_power_up_interval_ms = power_up_interval_ms(rng.random(), tuning);
        log::debug!(
            "Power-up {:?} spawned, next in {:.1}s",
            kind,
            state.timers.next_power_up_interval_ms / 1000.0
        );
    }
}

/// Move every pool one tick and prune what left the playfield. Enemies that
/// pass their fire gate shoot from their pre-move position.
fn move_entities<R: Rng>(
    state: &mut GameState,
    now: f64,
    difficulty: &Difficulty,
    tuning: &Tuning,
    rng: &mut R,
) {
    state
        .bullets
        .advance(-tuning.bullet_speed, 1.0, PLAYFIELD_HEIGHT);

    let mut muzzles = Vec::new();
    for enemy in state.enemies.iter_mut() {
        if difficulty.enemy_may_fire(now, enemy.last_shot_ms, || rng.random(), tuning) {
            muzzles.push((enemy.x, enemy.y + tuning.enemy_muzzle_offset));
            enemy.last_shot_ms = now;
        }
    }
    for (x, y) in muzzles {
        let id = state.next_entity_id();
        let _ = state.enemy_bullets.spawn(EnemyBullet { id, x, y });
    }

    state
        .enemies
        .advance(difficulty.enemy_speed, 1.0, PLAYFIELD_HEIGHT);
    state
        .power_ups
        .advance(tuning.power_up_speed, 1.0, PLAYFIELD_HEIGHT);
    state
        .enemy_bullets
        .advance(tuning.enemy_bullet_speed, 1.0, PLAYFIELD_HEIGHT);
}

fn expire_transients(state: &mut GameState, now: f64, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    state
        .explosions
        .remove_where(|e| now - e.spawned_ms >= tuning.explosion_lifetime_ms);

    for kind in state.effects.expire(now) {
        log::debug!("{:?} expired at {:.1}s", kind, now / 1000.0);
        events.push(GameEvent::EffectExpired(kind));
    }
}
