/// Gameplay rules: sizes, speeds and the level-pacing formulas.
///
/// Pure functions only. `Rules` is held by the world so tests can switch
/// models (e.g. multi-hit enemies) without touching the constants.
///
/// ## Pacing by level
/// ┌───────┬───────────────┬─────────────┬───────────┐
/// │ Level │ Enemy speed   │ Spawn delay │ Max shots │
/// ├───────┼───────────────┼─────────────┼───────────┤
/// │ 1     │ 1.0           │ 110         │ 1         │
/// │ 2     │ 1.5           │ 100         │ 2         │
/// │ 3     │ 2.0           │ 90          │ 3         │
/// │ 9+    │ 1 + 0.5·(L−1) │ 30 (floor)  │ 3         │
/// └───────┴───────────────┴─────────────┴───────────┘

pub const PLAYER_SIZE: f32 = 50.0;
pub const ENEMY_SIZE: f32 = 40.0;
pub const WATER_SIZE: f32 = 20.0;
pub const BULLET_SIZE: f32 = 15.0;

pub const WATER_SPEED: f32 = 7.0;
pub const BULLET_SPEED: f32 = 5.0;

/// Vertical margin kept free above and below freshly spawned enemies.
pub const SPAWN_MARGIN: f32 = 50.0;

#[derive(Clone, Debug)]
pub struct Rules {
    pub player_speed: f32,
    pub starting_lives: u32,
    /// Hits an enemy absorbs before dying. 1 = single-hit kill.
    pub enemy_health: u32,
    pub score_per_enemy: u32,
    /// Score needed per level: level N completes at `N × level_score_step`.
    pub level_score_step: u32,
    pub shot_delay_ms: u64,
    pub volley_cap: u32,
    pub initial_spawn_delay: u32,
    pub min_spawn_delay: u32,
    pub spawn_delay_step: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            player_speed: 5.0,
            starting_lives: 3,
            enemy_health: 1,
            score_per_enemy: 10,
            level_score_step: 100,
            shot_delay_ms: 500,
            volley_cap: 3,
            initial_spawn_delay: 120,
            min_spawn_delay: 30,
            spawn_delay_step: 10,
        }
    }
}

impl Rules {
    /// Horizontal speed of an enemy spawned at `level`.
    pub fn enemy_speed(&self, level: u32) -> f32 {
        1.0 + 0.5 * level.saturating_sub(1) as f32
    }

    /// Ticks until the next spawn, once one has happened at `level`.
    pub fn spawn_delay(&self, level: u32) -> u32 {
        self.initial_spawn_delay
            .saturating_sub(level.saturating_mul(self.spawn_delay_step))
            .max(self.min_spawn_delay)
    }

    /// Lifetime shot quota of an enemy spawned at `level`.
    pub fn max_shots(&self, level: u32) -> u32 {
        level.min(self.volley_cap)
    }

    /// Score at which `level` is complete.
    pub fn level_threshold(&self, level: u32) -> u32 {
        level.saturating_mul(self.level_score_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_speed_grows_half_a_unit_per_level() {
        let r = Rules::default();
        assert_eq!(r.enemy_speed(1), 1.0);
        assert_eq!(r.enemy_speed(2), 1.5);
        assert_eq!(r.enemy_speed(5), 3.0);
    }

    #[test]
    fn spawn_delay_shrinks_to_floor() {
        let r = Rules::default();
        assert_eq!(r.spawn_delay(1), 110);
        assert_eq!(r.spawn_delay(3), 90);
        assert_eq!(r.spawn_delay(9), 30);
        assert_eq!(r.spawn_delay(12), 30);
        assert_eq!(r.spawn_delay(1000), 30);
    }

    #[test]
    fn max_shots_capped_at_three() {
        let r = Rules::default();
        assert_eq!(r.max_shots(1), 1);
        assert_eq!(r.max_shots(2), 2);
        assert_eq!(r.max_shots(3), 3);
        assert_eq!(r.max_shots(7), 3);
    }

    #[test]
    fn level_threshold_is_linear() {
        let r = Rules::default();
        assert_eq!(r.level_threshold(1), 100);
        assert_eq!(r.level_threshold(4), 400);
    }
}
