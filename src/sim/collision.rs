//! Collision detection and resolution
//!
//! `resolve` reads the world and returns what should change: ids to remove
//! from each pool plus the gameplay events (score, explosions, damage,
//! pickups). Nothing is mutated here; `GameState::commit` applies the whole
//! resolution in one step so no pass observes a half-updated world.
//!
//! Three passes run in a fixed order over disjoint pair types:
//! 1. player bullet vs enemy
//! 2. power-up vs craft
//! 3. enemy / enemy bullet vs craft

use rand::Rng;

use super::geometry::overlaps;
use super::pool::EntityId;
use super::state::{DamageSource, GameEvent, GameState};
use crate::tuning::Tuning;

/// Removals and events produced by one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub bullets: Vec<EntityId>,
    pub enemies: Vec<EntityId>,
    pub enemy_bullets: Vec<EntityId>,
    pub power_ups: Vec<EntityId>,
    pub events: Vec<GameEvent>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
            && self.enemies.is_empty()
            && self.enemy_bullets.is_empty()
            && self.power_ups.is_empty()
            && self.events.is_empty()
    }
}

/// Resolve all collisions for the current world.
///
/// Randomness (the graze roll for unpowered hits) comes from `rng`, so a
/// seeded generator gives exact outcomes.
pub fn resolve<R: Rng>(state: &GameState, tuning: &Tuning, rng: &mut R) -> Resolution {
    let mut out = Resolution::default();
    if state.playfield_width.is_none() {
        return out;
    }

    bullets_vs_enemies(state, tuning, rng, &mut out);
    power_ups_vs_craft(state, &mut out);
    threats_vs_craft(state, tuning, &mut out);

    out
}

/// Each bullet hits at most the first live enemy it overlaps (pool order).
/// The bullet is always consumed; the enemy dies if the bullet is powered or
/// the graze roll fails.
fn bullets_vs_enemies<R: Rng>(
    state: &GameState,
    tuning: &Tuning,
    rng: &mut R,
    out: &mut Resolution,
) {
    let width = state.playfield_width;

    for bullet in &state.bullets {
        let bullet_box = bullet.hitbox();
        let hit = state
            .enemies
            .iter()
            .filter(|enemy| !out.enemies.contains(&enemy.id))
            .find(|enemy| overlaps(&bullet_box, &enemy.hitbox(), width));

        let Some(enemy) = hit else {
            continue;
        };

        out.bullets.push(bullet.id);
        if bullet.powered || rng.random::<f64>() > tuning.graze_threshold {
            out.enemies.push(enemy.id);
            out.events.push(GameEvent::ScoreDelta(tuning.kill_score));
            out.events.push(GameEvent::ExplosionSpawned {
                x: enemy.x,
                y: enemy.y,
            });
        } else {
            out.events.push(GameEvent::Grazed { enemy: enemy.id });
        }
    }
}

fn power_ups_vs_craft(state: &GameState, out: &mut Resolution) {
    let craft_box = state.craft.hitbox();

    for power_up in &state.power_ups {
        if overlaps(&power_up.hitbox(), &craft_box, state.playfield_width) {
            out.power_ups.push(power_up.id);
            out.events.push(GameEvent::PowerUpCollected(power_up.kind));
        }
    }
}

/// Enemies and enemy bullets touching the craft are always removed. Without
/// a shield they deal damage (enemies also explode); with a shield they are
/// consumed silently.
fn threats_vs_craft(state: &GameState, tuning: &Tuning, out: &mut Resolution) {
    let craft_box = state.craft.hitbox();
    let width = state.playfield_width;
    let shielded = state.shield_active();

    for enemy in &state.enemies {
        if out.enemies.contains(&enemy.id) || !overlaps(&enemy.hitbox(), &craft_box, width) {
            continue;
        }
        out.enemies.push(enemy.id);
        if shielded {
            out.events.push(GameEvent::Deflected(DamageSource::EnemyContact));
        } else {
            out.events.push(GameEvent::ExplosionSpawned {
                x: enemy.x,
                y: enemy.y,
            });
            out.events.push(GameEvent::DamageApplied {
                amount: tuning.enemy_contact_damage,
                source: DamageSource::EnemyContact,
            });
        }
    }

    for bullet in &state.enemy_bullets {
        if !overlaps(&bullet.hitbox(), &craft_box, width) {
            continue;
        }
        out.enemy_bullets.push(bullet.id);
        out.events.push(if shielded {
            GameEvent::Deflected(DamageSource::EnemyBullet)
        } else {
            GameEvent::DamageApplied {
                amount: tuning.enemy_bullet_damage,
                source: DamageSource::EnemyBullet,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::craft_y;
    use crate::sim::state::{Bullet, EffectKind, Enemy, EnemyBullet, PowerUp, PowerUpKind};
    use crate::sim::test_support::FixedRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> GameState {
        let mut state = GameState::new(15_000.0);
        state.playfield_width = Some(400.0);
        state
    }

    fn add_enemy(state: &mut GameState, x: f32, y: f32) -> EntityId {
        let id = state.next_entity_id();
        let _ = state.enemies.spawn(Enemy {
            id,
            x,
            y,
            last_shot_ms: 0.0,
        });
        id
    }

    fn add_bullet(state: &mut GameState, x: f32, y: f32, powered: bool) -> EntityId {
        let id = state.next_entity_id();
        let _ = state.bullets.spawn(Bullet { id, x, y, powered });
        id
    }

    fn add_enemy_bullet(state: &mut GameState, x: f32, y: f32) -> EntityId {
        let id = state.next_entity_id();
        let _ = state.enemy_bullets.spawn(EnemyBullet { id, x, y });
        id
    }

    fn add_power_up(state: &mut GameState, kind: PowerUpKind) -> EntityId {
        let id = state.next_entity_id();
        let x = state.craft.x;
        let _ = state.power_ups.spawn(PowerUp {
            id,
            x,
            y: craft_y(),
            kind,
        });
        id
    }

    fn low_rng() -> FixedRng {
        FixedRng::low()
    }

    fn high_rng() -> FixedRng {
        FixedRng::high()
    }

    #[test]
    fn test_unknown_width_resolves_nothing() {
        let mut state = world();
        state.playfield_width = None;
        add_enemy(&mut state, 50.0, 100.0);
        add_bullet(&mut state, 50.0, 110.0, true);

        assert!(resolve(&state, &Tuning::default(), &mut high_rng()).is_empty());
    }

    #[test]
    fn test_powered_bullet_always_kills() {
        let mut state = world();
        let enemy = add_enemy(&mut state, 50.0, 100.0);
        let bullet = add_bullet(&mut state, 50.0, 110.0, true);

        let res = resolve(&state, &Tuning::default(), &mut low_rng());
        assert_eq!(res.bullets, vec![bullet]);
        assert_eq!(res.enemies, vec![enemy]);
        assert_eq!(
            res.events,
            vec![
                GameEvent::ScoreDelta(100),
                GameEvent::ExplosionSpawned { x: 50.0, y: 100.0 },
            ]
        );
    }

    #[test]
    fn test_unpowered_graze_consumes_bullet_only() {
        let mut state = world();
        let enemy = add_enemy(&mut state, 50.0, 100.0);
        let bullet = add_bullet(&mut state, 50.0, 110.0, false);

        let res = resolve(&state, &Tuning::default(), &mut low_rng());
        assert_eq!(res.bullets, vec![bullet]);
        assert!(res.enemies.is_empty());
        assert_eq!(res.events, vec![GameEvent::Grazed { enemy }]);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.enemies, vec![enemy]);
    }

    #[test]
    fn test_unpowered_kill_rate_near_ninety_percent() {
        let mut state = world();
        add_enemy(&mut state, 50.0, 100.0);
        add_bullet(&mut state, 50.0, 110.0, false);

        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let trials = 10_000;
        let kills = (0..trials)
            .filter(|_| !resolve(&state, &tuning, &mut rng).enemies.is_empty())
            .count();
        let rate = kills as f64 / trials as f64;
        assert!((0.88..0.92).contains(&rate), "kill rate {rate}");
    }

    #[test]
    fn test_bullet_hits_first_enemy_only() {
        let mut state = world();
        let first = add_enemy(&mut state, 50.0, 100.0);
        let second = add_enemy(&mut state, 50.0, 105.0);
        add_bullet(&mut state, 50.0, 110.0, true);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.enemies, vec![first]);
        assert!(!res.enemies.contains(&second));
    }

    #[test]
    fn test_removed_enemy_skipped_by_later_bullets() {
        let mut state = world();
        let first = add_enemy(&mut state, 50.0, 100.0);
        let second = add_enemy(&mut state, 50.0, 105.0);
        let b1 = add_bullet(&mut state, 50.0, 110.0, true);
        let b2 = add_bullet(&mut state, 50.0, 112.0, true);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.bullets, vec![b1, b2]);
        assert_eq!(res.enemies, vec![first, second]);
    }

    #[test]
    fn test_grazed_enemy_can_be_hit_by_next_bullet() {
        let mut state = world();
        let enemy = add_enemy(&mut state, 50.0, 100.0);
        add_bullet(&mut state, 50.0, 110.0, false);
        add_bullet(&mut state, 50.0, 112.0, true);

        let res = resolve(&state, &Tuning::default(), &mut low_rng());
        assert_eq!(res.bullets.len(), 2);
        assert_eq!(res.enemies, vec![enemy]);
    }

    #[test]
    fn test_enemy_contact_damages_without_shield() {
        let mut state = world();
        let enemy = add_enemy(&mut state, 50.0, craft_y());
        let shot = add_enemy_bullet(&mut state, 50.0, craft_y() + 10.0);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.enemies, vec![enemy]);
        assert_eq!(res.enemy_bullets, vec![shot]);
        assert_eq!(
            res.events,
            vec![
                GameEvent::ExplosionSpawned { x: 50.0, y: craft_y() },
                GameEvent::DamageApplied {
                    amount: 20,
                    source: DamageSource::EnemyContact
                },
                GameEvent::DamageApplied {
                    amount: 10,
                    source: DamageSource::EnemyBullet
                },
            ]
        );
    }

    #[test]
    fn test_shield_consumes_threats_silently() {
        let mut state = world();
        state.effects.activate(EffectKind::Shield, 0.0, 7000.0);
        let enemy = add_enemy(&mut state, 50.0, craft_y());
        let shot = add_enemy_bullet(&mut state, 50.0, craft_y() + 10.0);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.enemies, vec![enemy]);
        assert_eq!(res.enemy_bullets, vec![shot]);
        assert_eq!(
            res.events,
            vec![
                GameEvent::Deflected(DamageSource::EnemyContact),
                GameEvent::Deflected(DamageSource::EnemyBullet),
            ]
        );
    }

    #[test]
    fn test_enemy_killed_by_bullet_does_not_hit_craft() {
        let mut state = world();
        let enemy = add_enemy(&mut state, 50.0, craft_y() - 20.0);
        add_bullet(&mut state, 50.0, craft_y() - 10.0, true);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.enemies, vec![enemy]);
        assert!(
            !res.events
                .iter()
                .any(|e| matches!(e, GameEvent::DamageApplied { .. }))
        );
    }

    #[test]
    fn test_power_up_pickup() {
        let mut state = world();
        let heart = add_power_up(&mut state, PowerUpKind::Heart);
        let shield = add_power_up(&mut state, PowerUpKind::Shield);

        let res = resolve(&state, &Tuning::default(), &mut high_rng());
        assert_eq!(res.power_ups, vec![heart, shield]);
        assert_eq!(
            res.events,
            vec![
                GameEvent::PowerUpCollected(PowerUpKind::Heart),
                GameEvent::PowerUpCollected(PowerUpKind::Shield),
            ]
        );
    }

    #[test]
    fn test_distant_entities_do_not_collide() {
        let mut state = world();
        add_enemy(&mut state, 10.0, 100.0);
        add_bullet(&mut state, 90.0, 110.0, true);
        add_enemy_bullet(&mut state, 90.0, 10.0);

        assert!(resolve(&state, &Tuning::default(), &mut high_rng()).is_empty());
    }
}
