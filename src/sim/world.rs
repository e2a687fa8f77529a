/// WorldState: the single game-state aggregate owned by the frame loop.
///
/// ## Collections
///   - `player`:      exactly one, recreated on restart.
///   - `enemies`:     spawned by the spawner, tagged with their level.
///   - `projectiles`: waters and bullets together, told apart by `Side`.
///
/// Dead entities are swept out with `sweep()` inside the tick that killed
/// them, so nothing outside `step` ever sees `alive == false`.
///
/// ## Session vs. process
/// `high_score` and `sound_on` survive restarts. Everything else is reset by
/// `reset_session()`.

use crate::domain::entity::{Entity, Side};
use crate::domain::geometry::Rect;
use crate::domain::rules::Rules;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Start,
    Playing,
    LevelUp,
    GameOver,
}

pub struct WorldState {
    pub screen: Screen,

    // ── Entities ──
    pub player: Entity,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,

    // ── Score / progression ──
    pub score: u32,
    pub high_score: u32,
    pub level: u32,

    // ── Timing ──
    /// Ticks until the next enemy spawn.
    pub spawn_timer: u32,
    /// Simulated milliseconds spent in `Playing`.
    pub clock_ms: u64,
    pub tick: u64,

    pub rules: Rules,
    pub field: Rect,

    // ── UI ──
    pub sound_on: bool,
    /// Highlighted button on the current menu screen.
    pub menu_cursor: usize,
}

impl WorldState {
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        WorldState {
            screen: Screen::Start,
            player: Entity::player(&rules),
            enemies: vec![],
            projectiles: vec![],
            score: 0,
            high_score: 0,
            level: 1,
            spawn_timer: rules.initial_spawn_delay,
            clock_ms: 0,
            tick: 0,
            rules,
            field: Rect::playfield(),
            sound_on: true,
            menu_cursor: 0,
        }
    }

    /// Back to a fresh session: new player, no enemies or projectiles,
    /// score 0, level 1. High score and sound setting are kept.
    pub fn reset_session(&mut self) {
        self.player = Entity::player(&self.rules);
        self.enemies.clear();
        self.projectiles.clear();
        self.score = 0;
        self.level = 1;
        self.spawn_timer = self.rules.initial_spawn_delay;
        self.clock_ms = 0;
        self.tick = 0;
    }

    pub fn lives(&self) -> u32 {
        self.player.lives()
    }

    /// Drop every dead enemy and projectile.
    pub fn sweep(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.projectiles.retain(|p| p.alive);
    }

    pub fn waters(&self) -> impl Iterator<Item = &Entity> {
        self.projectiles.iter().filter(|p| p.side() == Some(Side::Friendly))
    }

    pub fn bullets(&self) -> impl Iterator<Item = &Entity> {
        self.projectiles.iter().filter(|p| p.side() == Some(Side::Hostile))
    }

    /// All live entities in draw order: player, enemies, projectiles.
    pub fn drawables(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.player)
            .chain(self.enemies.iter())
            .chain(self.projectiles.iter())
            .filter(|e| e.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_world_starts_on_title() {
        let w = WorldState::new();
        assert_eq!(w.screen, Screen::Start);
        assert_eq!(w.level, 1);
        assert_eq!(w.score, 0);
        assert_eq!(w.lives(), 3);
        assert_eq!(w.spawn_timer, 120);
        assert!(w.sound_on);
    }

    #[test]
    fn reset_keeps_high_score_and_sound() {
        let mut w = WorldState::new();
        w.score = 250;
        w.high_score = 400;
        w.level = 3;
        w.sound_on = false;
        w.enemies.push(Entity::enemy(0.0, 100.0, 3, &w.rules));
        w.projectiles.push(Entity::water(10.0, 10.0));
        w.spawn_timer = 4;
        w.reset_session();
        assert_eq!(w.score, 0);
        assert_eq!(w.level, 1);
        assert_eq!(w.high_score, 400);
        assert!(!w.sound_on);
        assert!(w.enemies.is_empty());
        assert!(w.projectiles.is_empty());
        assert_eq!(w.spawn_timer, 120);
        assert_eq!(w.lives(), 3);
    }

    #[test]
    fn sweep_removes_dead_entities() {
        let mut w = WorldState::new();
        let mut dead = Entity::bullet(0.0, 0.0);
        dead.kill();
        w.projectiles.push(dead);
        w.projectiles.push(Entity::water(100.0, 100.0));
        w.sweep();
        assert_eq!(w.projectiles.len(), 1);
        assert_eq!(w.waters().count(), 1);
        assert_eq!(w.bullets().count(), 0);
    }
}
