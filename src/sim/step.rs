/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Player fire (edge-triggered, from the player's current center)
///   2. Movement (player → enemies → projectiles), then sweep
///   3. Spawner countdown
///   4. Enemy fire control
///   5. Collision & scoring, then sweep
///   6. Screen transitions: GameOver wins over LevelUp
///
/// Only runs while `Playing`; every other screen is frozen.

use log::debug;
use rand::Rng;

use crate::domain::combat;
use crate::domain::entity::{FrameInput, Held};
use crate::domain::movement;
use super::collision;
use super::event::GameEvent;
use super::screen;
use super::spawner;
use super::world::{Screen, WorldState};

pub fn step(world: &mut WorldState, input: FrameInput, rng: &mut impl Rng) -> Vec<GameEvent> {
    if world.screen != Screen::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;
    world.clock_ms += input.dt_ms;

    resolve_player_fire(world, input.fire, &mut events);
    resolve_movement(world, input.held);
    spawner::tick_spawner(world, rng, &mut events);
    resolve_enemy_fire(world, &mut events);
    collision::resolve_collisions(world, &mut events);
    resolve_transitions(world, &mut events);

    events
}

fn resolve_player_fire(world: &mut WorldState, fire: bool, events: &mut Vec<GameEvent>) {
    if !fire || !world.player.alive {
        return;
    }
    world.projectiles.push(combat::player_shoot(&world.player));
    events.push(GameEvent::WaterFired);
}

fn resolve_movement(world: &mut WorldState, held: Held) {
    let field = world.field;
    movement::advance(&mut world.player, held, &field);
    movement::advance_all(&mut world.enemies, &field);
    movement::advance_all(&mut world.projectiles, &field);
    world.sweep();
}

fn resolve_enemy_fire(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let now = world.clock_ms;
    let mut fired = Vec::new();
    for enemy in world.enemies.iter_mut() {
        if let Some(bullet) = combat::enemy_shoot(enemy, now, &world.rules) {
            fired.push(bullet);
        }
    }
    for bullet in fired {
        debug!("enemy fired at t={now}ms");
        world.projectiles.push(bullet);
        events.push(GameEvent::EnemyFired);
    }
}

fn resolve_transitions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.lives() == 0 {
        screen::enter_game_over(world, events);
    } else if world.score >= world.rules.level_threshold(world.level) {
        screen::enter_level_up(world, events);
    }
}
