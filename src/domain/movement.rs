/// Per-kind position integration and edge despawn.
///
/// ┌──────────────────────┬──────────────────────────┬──────────────────────┐
/// │ Kind                 │ Step                     │ Dies when            │
/// ├──────────────────────┼──────────────────────────┼──────────────────────┤
/// │ Player               │ ±speed per held axis     │ never (clamped)      │
/// │ Enemy                │ x += speed               │ left > field right   │
/// │ Projectile(Friendly) │ x −= speed               │ right < field left   │
/// │ Projectile(Hostile)  │ x += speed               │ left > field right   │
/// └──────────────────────┴──────────────────────────┴──────────────────────┘
///
/// Diagonal input is not normalized.

use super::entity::{Entity, Held, Kind, Side};
use super::geometry::Rect;

/// Advance one entity by one tick. Dead entities are left untouched.
pub fn advance(entity: &mut Entity, held: Held, field: &Rect) {
    if !entity.alive {
        return;
    }
    match entity.kind {
        Kind::Player { .. } => {
            let s = entity.speed;
            if held.left {
                entity.rect.x -= s;
            }
            if held.right {
                entity.rect.x += s;
            }
            if held.up {
                entity.rect.y -= s;
            }
            if held.down {
                entity.rect.y += s;
            }
            entity.rect.clamp_within(field);
        }
        Kind::Enemy(_) | Kind::Projectile(Side::Hostile) => {
            entity.rect.x += entity.speed;
            if entity.rect.left() > field.right() {
                entity.kill();
            }
        }
        Kind::Projectile(Side::Friendly) => {
            entity.rect.x -= entity.speed;
            if entity.rect.right() < field.left() {
                entity.kill();
            }
        }
    }
}

/// Advance a whole collection; `held` only matters for the player.
pub fn advance_all(entities: &mut [Entity], field: &Rect) {
    for e in entities.iter_mut() {
        advance(e, Held::default(), field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{PLAYFIELD_H, PLAYFIELD_W};
    use crate::domain::rules::Rules;

    fn field() -> Rect {
        Rect::playfield()
    }

    #[test]
    fn player_moves_independently_per_axis() {
        let mut p = Entity::player(&Rules::default());
        let (x0, y0) = (p.rect.x, p.rect.y);
        advance(&mut p, Held { right: true, down: true, ..Held::default() }, &field());
        assert_eq!(p.rect.x, x0 + 5.0);
        assert_eq!(p.rect.y, y0 + 5.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut p = Entity::player(&Rules::default());
        let x0 = p.rect.x;
        advance(&mut p, Held { left: true, right: true, ..Held::default() }, &field());
        assert_eq!(p.rect.x, x0);
    }

    #[test]
    fn player_stays_in_bounds_under_any_input() {
        let mut p = Entity::player(&Rules::default());
        let patterns = [
            Held { left: true, up: true, ..Held::default() },
            Held { right: true, down: true, ..Held::default() },
            Held { left: true, down: true, ..Held::default() },
            Held { right: true, up: true, ..Held::default() },
        ];
        for held in patterns {
            for _ in 0..300 {
                advance(&mut p, held, &field());
                assert!(p.rect.left() >= 0.0 && p.rect.right() <= PLAYFIELD_W);
                assert!(p.rect.top() >= 0.0 && p.rect.bottom() <= PLAYFIELD_H);
            }
        }
        assert!(p.alive);
    }

    #[test]
    fn enemy_dies_past_right_edge() {
        let rules = Rules::default();
        let mut e = Entity::enemy(PLAYFIELD_W - 0.5, 100.0, 1, &rules);
        advance(&mut e, Held::default(), &field());
        assert!(!e.alive);
    }

    #[test]
    fn enemy_at_exact_edge_survives() {
        let rules = Rules::default();
        let mut e = Entity::enemy(PLAYFIELD_W - 1.0, 100.0, 1, &rules);
        advance(&mut e, Held::default(), &field());
        assert_eq!(e.rect.left(), PLAYFIELD_W);
        assert!(e.alive);
    }

    #[test]
    fn water_travels_left_and_despawns() {
        let mut w = Entity::water(10.0, 100.0);
        advance(&mut w, Held::default(), &field());
        assert_eq!(w.rect.center_x(), 3.0);
        assert!(w.alive);
        advance(&mut w, Held::default(), &field());
        advance(&mut w, Held::default(), &field());
        assert!(!w.alive);
    }

    #[test]
    fn bullet_travels_right() {
        let mut b = Entity::bullet(100.0, 100.0);
        advance(&mut b, Held::default(), &field());
        assert_eq!(b.rect.left(), 105.0);
    }

    #[test]
    fn dead_entities_do_not_move() {
        let mut b = Entity::bullet(100.0, 100.0);
        b.kill();
        advance(&mut b, Held::default(), &field());
        assert_eq!(b.rect.left(), 100.0);
    }
}
