/// Collision & scoring, run once per tick after movement and firing.
///
/// Processing order:
///   1. Waters vs. enemies: each water hits at most one enemy (the first
///      live one it overlaps), then dies. An enemy at 0 health dies and
///      scores `score_per_enemy`.
///   2. Bullets vs. player: every overlapping bullet dies and costs one
///      life. Lives saturate at 0.
///   3. Sweep: dead entities leave their collections in this same tick.
///
/// Projectiles are killed as soon as they hit, so no projectile can damage
/// or score twice. Screen transitions are decided by the caller.

use crate::domain::entity::{Kind, Side};
use super::event::GameEvent;
use super::world::WorldState;

pub fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    resolve_water_hits(world, events);
    resolve_player_hits(world, events);
    world.sweep();
}

fn resolve_water_hits(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let WorldState { enemies, projectiles, score, rules, .. } = world;

    for water in projectiles.iter_mut() {
        if !water.alive || water.side() != Some(Side::Friendly) {
            continue;
        }
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.alive && e.rect.overlaps(&water.rect))
        else {
            continue;
        };

        water.kill();
        let health_left = match enemy.enemy_state_mut() {
            Some(state) => {
                state.health = state.health.saturating_sub(1);
                state.health
            }
            None => 0,
        };
        if health_left == 0 {
            enemy.kill();
            *score += rules.score_per_enemy;
            events.push(GameEvent::EnemyDestroyed { score: *score });
        } else {
            events.push(GameEvent::EnemyDamaged { health_left });
        }
    }
}

fn resolve_player_hits(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if !world.player.alive {
        return;
    }
    let player_rect = world.player.rect;
    let mut hits = 0u32;
    for bullet in world.projectiles.iter_mut() {
        if bullet.alive
            && bullet.side() == Some(Side::Hostile)
            && bullet.rect.overlaps(&player_rect)
        {
            bullet.kill();
            hits += 1;
        }
    }

    if let Kind::Player { lives } = &mut world.player.kind {
        for _ in 0..hits {
            if *lives == 0 {
                break;
            }
            *lives -= 1;
            events.push(GameEvent::PlayerHit { lives_left: *lives });
        }
    }
}
