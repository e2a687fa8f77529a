/// Entities: one record shape for every sprite, tagged by kind.
///
/// Player, enemies and both projectile kinds share position, speed and the
/// alive flag. Everything kind-specific lives in `Kind`, and behavior is
/// dispatched by free functions in `movement` / `combat` matching on it.

use super::geometry::{Rect, PLAYFIELD_H, PLAYFIELD_W};
use super::rules::{self, Rules};

/// Which side fired a projectile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    /// Player's water, travels left, hurts enemies.
    Friendly,
    /// Enemy bullet, travels right, hurts the player.
    Hostile,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Kind {
    Player { lives: u32 },
    Enemy(EnemyState),
    Projectile(Side),
}

/// Per-enemy state fixed at spawn time (level) or owned for its lifetime.
#[derive(Clone, PartialEq, Debug)]
pub struct EnemyState {
    /// Level the enemy was spawned at.
    #[allow(dead_code)]
    pub level: u32,
    pub health: u32,
    pub fire: FireControl,
}

/// Capped-volley fire control. Once `stopped_firing` is set it never clears.
#[derive(Clone, PartialEq, Debug)]
pub struct FireControl {
    pub last_shot_ms: Option<u64>,
    pub shots_fired: u32,
    pub max_shots: u32,
    pub stopped_firing: bool,
}

impl FireControl {
    pub fn new(max_shots: u32) -> Self {
        FireControl {
            last_shot_ms: None,
            shots_fired: 0,
            max_shots,
            stopped_firing: max_shots == 0,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Entity {
    pub rect: Rect,
    /// Units per tick. Direction is implied by the kind.
    pub speed: f32,
    pub alive: bool,
    pub kind: Kind,
}

impl Entity {
    /// Player centered on the playfield with a full set of lives.
    pub fn player(rules: &Rules) -> Self {
        Entity {
            rect: Rect::centered(
                PLAYFIELD_W / 2.0,
                PLAYFIELD_H / 2.0,
                rules::PLAYER_SIZE,
                rules::PLAYER_SIZE,
            ),
            speed: rules.player_speed,
            alive: true,
            kind: Kind::Player { lives: rules.starting_lives },
        }
    }

    /// Enemy with its top-left corner at `(x, y)`, tagged with `level`.
    pub fn enemy(x: f32, y: f32, level: u32, rules: &Rules) -> Self {
        Entity {
            rect: Rect::new(x, y, rules::ENEMY_SIZE, rules::ENEMY_SIZE),
            speed: rules.enemy_speed(level),
            alive: true,
            kind: Kind::Enemy(EnemyState {
                level,
                health: rules.enemy_health.max(1),
                fire: FireControl::new(rules.max_shots(level)),
            }),
        }
    }

    /// Water centered at `(cx, cy)`.
    pub fn water(cx: f32, cy: f32) -> Self {
        Entity {
            rect: Rect::centered(cx, cy, rules::WATER_SIZE, rules::WATER_SIZE),
            speed: rules::WATER_SPEED,
            alive: true,
            kind: Kind::Projectile(Side::Friendly),
        }
    }

    /// Bullet with its left edge at `left`, vertically centered on `cy`.
    pub fn bullet(left: f32, cy: f32) -> Self {
        Entity {
            rect: Rect::new(
                left,
                cy - rules::BULLET_SIZE / 2.0,
                rules::BULLET_SIZE,
                rules::BULLET_SIZE,
            ),
            speed: rules::BULLET_SPEED,
            alive: true,
            kind: Kind::Projectile(Side::Hostile),
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn side(&self) -> Option<Side> {
        match self.kind {
            Kind::Projectile(side) => Some(side),
            _ => None,
        }
    }

    /// Remaining lives; zero for anything that is not the player.
    pub fn lives(&self) -> u32 {
        match self.kind {
            Kind::Player { lives } => lives,
            _ => 0,
        }
    }

    #[allow(dead_code)]
    pub fn enemy_state(&self) -> Option<&EnemyState> {
        match &self.kind {
            Kind::Enemy(state) => Some(state),
            _ => None,
        }
    }

    pub fn enemy_state_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.kind {
            Kind::Enemy(state) => Some(state),
            _ => None,
        }
    }
}

/// Directional keys held during a tick. Axes are independent.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Held {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Frame input: held movement is continuous, fire is edge-triggered.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub held: Held,
    pub fire: bool,
    /// Wall-clock milliseconds covered by this tick.
    pub dt_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_starts_centered_with_lives() {
        let p = Entity::player(&Rules::default());
        assert_eq!(p.rect.center_x(), 400.0);
        assert_eq!(p.rect.center_y(), 300.0);
        assert_eq!(p.lives(), 3);
        assert!(p.alive);
    }

    #[test]
    fn enemy_is_tagged_with_spawn_level() {
        let rules = Rules::default();
        let e = Entity::enemy(0.0, 120.0, 4, &rules);
        let st = e.enemy_state().unwrap();
        assert_eq!(st.level, 4);
        assert_eq!(st.fire.max_shots, 3);
        assert_eq!(st.health, 1);
        assert_eq!(e.speed, 2.5);
        assert_eq!(e.lives(), 0);
    }

    #[test]
    fn bullet_leaves_from_left_edge_centered() {
        let b = Entity::bullet(40.0, 100.0);
        assert_eq!(b.rect.left(), 40.0);
        assert_eq!(b.rect.center_y(), 100.0);
        assert_eq!(b.side(), Some(Side::Hostile));
    }

    #[test]
    fn zero_quota_never_fires() {
        let fc = FireControl::new(0);
        assert!(fc.stopped_firing);
    }
}
