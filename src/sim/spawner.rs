/// Enemy spawner: a countdown that speeds up with the level.
///
/// The timer starts at `initial_spawn_delay` for a fresh session. Each
/// spawn resets it to `rules.spawn_delay(level)`, so a level change takes
/// effect from the next reset on.

use log::debug;
use rand::Rng;

use crate::domain::entity::Entity;
use crate::domain::rules::SPAWN_MARGIN;
use super::event::GameEvent;
use super::world::WorldState;

pub fn tick_spawner(world: &mut WorldState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    world.spawn_timer = world.spawn_timer.saturating_sub(1);
    if world.spawn_timer > 0 {
        return;
    }

    let lo = (world.field.top() + SPAWN_MARGIN) as i32;
    let hi = ((world.field.bottom() - SPAWN_MARGIN) as i32).max(lo);
    let y = rng.gen_range(lo..=hi) as f32;
    let enemy = Entity::enemy(world.field.left(), y, world.level, &world.rules);
    world.enemies.push(enemy);
    world.spawn_timer = world.rules.spawn_delay(world.level);

    debug!("enemy spawned at y={y} level={} next in {} ticks", world.level, world.spawn_timer);
    events.push(GameEvent::EnemySpawned { level: world.level });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_spawn_after_initial_delay() {
        let mut w = WorldState::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut events = vec![];
        for _ in 0..119 {
            tick_spawner(&mut w, &mut rng, &mut events);
        }
        assert!(w.enemies.is_empty());
        tick_spawner(&mut w, &mut rng, &mut events);
        assert_eq!(w.enemies.len(), 1);
        assert_eq!(events, vec![GameEvent::EnemySpawned { level: 1 }]);
        assert_eq!(w.spawn_timer, 110);
    }

    #[test]
    fn spawn_position_within_margins() {
        let mut w = WorldState::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut events = vec![];
        for _ in 0..200 {
            w.spawn_timer = 1;
            tick_spawner(&mut w, &mut rng, &mut events);
        }
        assert_eq!(w.enemies.len(), 200);
        for e in &w.enemies {
            assert_eq!(e.rect.left(), 0.0);
            assert!(e.rect.top() >= 50.0 && e.rect.top() <= 550.0);
        }
    }

    #[test]
    fn higher_level_spawns_faster_and_tags_enemy() {
        let mut w = WorldState::new();
        w.level = 5;
        w.spawn_timer = 1;
        let mut rng = StdRng::seed_from_u64(1);
        let mut events = vec![];
        tick_spawner(&mut w, &mut rng, &mut events);
        assert_eq!(w.spawn_timer, 70);
        assert_eq!(w.enemies[0].enemy_state().unwrap().level, 5);
    }
}
