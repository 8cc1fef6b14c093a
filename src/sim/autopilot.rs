//! Demo autopilot
//!
//! Produces a `TickInput` from the current state so the native binary (or an
//! attract-mode host) can play without a human. Priorities:
//! 1. dodge the nearest threat in the lower playfield
//! 2. collect a power-up when nothing is close
//! 3. line up under the lowest enemy (auto-fire does the rest)

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;
use crate::craft_y;

/// Threats above this line are ignored (absolute units)
const DANGER_LINE: f32 = PLAYFIELD_HEIGHT * 0.45;
/// Horizontal distance (percent) at which a threat counts as incoming
const DANGER_WIDTH: f32 = 12.0;
/// Close enough to a target to stop steering
const DEADZONE: f32 = 1.5;

/// Pick the held directions for the next tick
pub fn steer(state: &GameState) -> TickInput {
    let x = state.craft.x;

    let threat = state
        .enemies
        .iter()
        .map(|e| (e.x, e.y))
        .chain(state.enemy_bullets.iter().map(|b| (b.x, b.y)))
        .filter(|&(tx, ty)| ty > DANGER_LINE && ty < craft_y() + 10.0 && (tx - x).abs() < DANGER_WIDTH)
        .max_by(|a, b| a.1.total_cmp(&b.1));

    let target = if let Some((tx, _)) = threat {
        if state.shield_active() {
            // Shield eats threats; drive into it
            tx
        } else {
            dodge_target(x, tx)
        }
    } else if let Some(power_up) = state
        .power_ups
        .iter()
        .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
    {
        power_up.x
    } else if let Some(enemy) = state.enemies.iter().max_by(|a, b| a.y.total_cmp(&b.y)) {
        enemy.x
    } else {
        CRAFT_START_X
    };

    toward(x, target)
}

/// Move away from the threat, toward whichever side has more room
fn dodge_target(x: f32, threat_x: f32) -> f32 {
    let go_left = if (threat_x - x).abs() < f32::EPSILON {
        x > (MIN_X_PERCENT + MAX_X_PERCENT) / 2.0
    } else {
        threat_x > x
    };

    if go_left && x - DANGER_WIDTH > MIN_X_PERCENT {
        x - DANGER_WIDTH
    } else if !go_left && x + DANGER_WIDTH < MAX_X_PERCENT {
        x + DANGER_WIDTH
    } else if go_left {
        x + DANGER_WIDTH
    } else {
        x - DANGER_WIDTH
    }
}

fn toward(x: f32, target: f32) -> TickInput {
    TickInput {
        left: target < x - DEADZONE,
        right: target > x + DEADZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyBullet, PowerUp, PowerUpKind};

    fn state() -> GameState {
        GameState::new(15_000.0)
    }

    #[test]
    fn test_idle_field_returns_to_center() {
        let mut s = state();
        s.craft.x = 20.0;
        assert_eq!(
            steer(&s),
            TickInput {
                left: false,
                right: true
            }
        );
        s.craft.x = 50.0;
        assert_eq!(steer(&s), TickInput::default());
    }

    #[test]
    fn test_dodges_incoming_bullet() {
        let mut s = state();
        let id = s.next_entity_id();
        let _ = s.enemy_bullets.spawn(EnemyBullet {
            id,
            x: 53.0,
            y: 600.0,
        });
        // Threat to the right: go left
        assert!(steer(&s).left);
    }

    #[test]
    fn test_chases_power_up_when_safe() {
        let mut s = state();
        let id = s.next_entity_id();
        let _ = s.power_ups.spawn(PowerUp {
            id,
            x: 80.0,
            y: 100.0,
            kind: PowerUpKind::Heart,
        });
        assert!(steer(&s).right);
    }

    #[test]
    fn test_lines_up_under_lowest_enemy() {
        let mut s = state();
        for (x, y) in [(80.0, 50.0), (20.0, 200.0)] {
            let id = s.next_entity_id();
            let _ = s.enemies.spawn(Enemy {
                id,
                x,
                y,
                last_shot_ms: 0.0,
            });
        }
        assert!(steer(&s).left);
    }
}
