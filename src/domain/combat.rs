/// Fire control for enemies and the player.
///
/// Enemy fire is time-based: a shot needs `shot_delay_ms` of simulated time
/// since the previous one and a remaining quota. A fresh enemy may fire on
/// its first tick. Player fire has no limit here; edge-triggering is the
/// input layer's job.

use super::entity::{Entity, FireControl};
use super::rules::Rules;

impl FireControl {
    /// Release a shot at `now_ms` if the cooldown and quota allow it.
    pub fn try_fire(&mut self, now_ms: u64, delay_ms: u64) -> bool {
        if self.stopped_firing {
            return false;
        }
        let cooled = self
            .last_shot_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= delay_ms);
        let fired = cooled && self.shots_fired < self.max_shots;
        if fired {
            self.last_shot_ms = Some(now_ms);
            self.shots_fired += 1;
        }
        if self.shots_fired >= self.max_shots {
            self.stopped_firing = true;
        }
        fired
    }
}

/// Let one enemy decide to fire. Returns the bullet it released, if any.
pub fn enemy_shoot(enemy: &mut Entity, now_ms: u64, rules: &Rules) -> Option<Entity> {
    if !enemy.alive {
        return None;
    }
    let (right, cy) = (enemy.rect.right(), enemy.rect.center_y());
    let state = enemy.enemy_state_mut()?;
    if state.fire.try_fire(now_ms, rules.shot_delay_ms) {
        Some(Entity::bullet(right, cy))
    } else {
        None
    }
}

/// Water released from the player's current center.
pub fn player_shoot(player: &Entity) -> Entity {
    Entity::water(player.rect.center_x(), player.rect.center_y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Kind, Side};

    #[test]
    fn fresh_enemy_fires_immediately() {
        let rules = Rules::default();
        let mut e = Entity::enemy(0.0, 100.0, 2, &rules);
        let b = enemy_shoot(&mut e, 0, &rules).expect("first shot");
        assert_eq!(b.rect.left(), e.rect.right());
        assert_eq!(b.rect.center_y(), e.rect.center_y());
        assert_eq!(b.kind, Kind::Projectile(Side::Hostile));
    }

    #[test]
    fn cooldown_is_enforced() {
        let mut fc = FireControl::new(3);
        assert!(fc.try_fire(1_000, 500));
        assert!(!fc.try_fire(1_499, 500));
        assert!(fc.try_fire(1_500, 500));
        assert_eq!(fc.shots_fired, 2);
    }

    #[test]
    fn quota_exhaustion_stops_firing_for_good() {
        let mut fc = FireControl::new(1);
        assert!(fc.try_fire(0, 500));
        assert!(fc.stopped_firing);
        for t in (500..10_000).step_by(500) {
            assert!(!fc.try_fire(t, 500));
        }
        assert_eq!(fc.shots_fired, 1);
    }

    #[test]
    fn dead_enemy_does_not_fire() {
        let rules = Rules::default();
        let mut e = Entity::enemy(0.0, 100.0, 3, &rules);
        e.kill();
        assert!(enemy_shoot(&mut e, 0, &rules).is_none());
    }

    #[test]
    fn player_shot_starts_at_center() {
        let p = Entity::player(&Rules::default());
        let w = player_shoot(&p);
        assert_eq!(w.rect.center_x(), p.rect.center_x());
        assert_eq!(w.rect.center_y(), p.rect.center_y());
        assert_eq!(w.side(), Some(Side::Friendly));
    }
}
