/// Playfield geometry: axis-aligned rectangles in playfield units.
///
/// The playfield is `PLAYFIELD_W × PLAYFIELD_H` with the origin in the
/// top-left corner and y growing downward.

pub const PLAYFIELD_W: f32 = 800.0;
pub const PLAYFIELD_H: f32 = 600.0;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Rectangle of size `w × h` whose center is `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect { x: cx - w / 2.0, y: cy - h / 2.0, w, h }
    }

    /// The whole playfield.
    pub const fn playfield() -> Self {
        Rect { x: 0.0, y: 0.0, w: PLAYFIELD_W, h: PLAYFIELD_H }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px > self.left() && px < self.right() && py > self.top() && py < self.bottom()
    }

    /// Move this rectangle inside `bounds` without resizing it.
    /// A rectangle larger than `bounds` is pinned to its top-left corner.
    pub fn clamp_within(&mut self, bounds: &Rect) {
        let max_x = (bounds.right() - self.w).max(bounds.left());
        let max_y = (bounds.bottom() - self.h).max(bounds.top());
        self.x = self.x.max(bounds.left()).min(max_x);
        self.y = self.y.max(bounds.top()).min(max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_interior_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges only
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        // Fully contained
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn centered_rect() {
        let r = Rect::centered(100.0, 50.0, 20.0, 10.0);
        assert_eq!(r.x, 90.0);
        assert_eq!(r.y, 45.0);
        assert_eq!(r.center_x(), 100.0);
        assert_eq!(r.center_y(), 50.0);
    }

    #[test]
    fn clamp_pulls_rect_back_inside() {
        let field = Rect::playfield();
        let mut r = Rect::new(-12.0, 590.0, 50.0, 50.0);
        r.clamp_within(&field);
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, PLAYFIELD_H - 50.0);

        let mut r = Rect::new(790.0, -3.0, 50.0, 50.0);
        r.clamp_within(&field);
        assert_eq!(r.x, PLAYFIELD_W - 50.0);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn contains_point_excludes_border() {
        let b = Rect::new(300.0, 200.0, 200.0, 50.0);
        assert!(b.contains_point(400.0, 225.0));
        assert!(!b.contains_point(300.0, 225.0));
        assert!(!b.contains_point(400.0, 260.0));
    }
}
