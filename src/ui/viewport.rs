/// Viewport: maps the 800×600 playfield onto terminal cells and back.
///
/// Row 0 is the HUD and the last row is the help bar; the playfield is
/// stretched over everything in between. Renderer and pointer input both
/// go through this one mapping so clicks land where buttons are drawn.

use crate::domain::geometry::{PLAYFIELD_H, PLAYFIELD_W};

pub const HUD_ROWS: usize = 1;
pub const FOOTER_ROWS: usize = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    pub col0: usize,
    pub row0: usize,
    pub cols: usize,
    pub rows: usize,
}

impl Viewport {
    pub fn fit(term_w: usize, term_h: usize) -> Self {
        Viewport {
            col0: 0,
            row0: HUD_ROWS,
            cols: term_w.max(1),
            rows: term_h.saturating_sub(HUD_ROWS + FOOTER_ROWS).max(1),
        }
    }

    /// Terminal cell containing playfield point `(x, y)`. May fall outside
    /// the viewport for off-field points.
    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let col = (x / PLAYFIELD_W * self.cols as f32).floor() as i32;
        let row = (y / PLAYFIELD_H * self.rows as f32).floor() as i32;
        (self.col0 as i32 + col, self.row0 as i32 + row)
    }

    /// Playfield point at the center of terminal cell `(col, row)`.
    pub fn to_playfield(&self, col: u16, row: u16) -> Option<(f32, f32)> {
        let (col, row) = (col as usize, row as usize);
        if col < self.col0 || row < self.row0 {
            return None;
        }
        let (vc, vr) = (col - self.col0, row - self.row0);
        if vc >= self.cols || vr >= self.rows {
            return None;
        }
        let x = (vc as f32 + 0.5) * PLAYFIELD_W / self.cols as f32;
        let y = (vr as f32 + 0.5) * PLAYFIELD_H / self.rows as f32;
        Some((x, y))
    }

    /// Cells spanned by a playfield length, at least one.
    pub fn span_cols(&self, w: f32) -> usize {
        ((w / PLAYFIELD_W * self.cols as f32).round() as usize).max(1)
    }

    pub fn span_rows(&self, h: f32) -> usize {
        ((h / PLAYFIELD_H * self.rows as f32).round() as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::screen::button_at;
    use crate::sim::world::Screen;

    #[test]
    fn fit_reserves_hud_and_footer() {
        let v = Viewport::fit(80, 24);
        assert_eq!((v.row0, v.rows, v.cols), (1, 22, 80));
        let tiny = Viewport::fit(0, 1);
        assert_eq!((tiny.rows, tiny.cols), (1, 1));
    }

    #[test]
    fn corners_map_to_viewport_corners() {
        let v = Viewport::fit(80, 24);
        assert_eq!(v.to_cell(0.0, 0.0), (0, 1));
        assert_eq!(v.to_cell(799.0, 599.0), (79, 22));
    }

    #[test]
    fn hud_and_footer_rows_are_not_playfield() {
        let v = Viewport::fit(80, 24);
        assert_eq!(v.to_playfield(10, 0), None);
        assert_eq!(v.to_playfield(10, 23), None);
        assert!(v.to_playfield(10, 1).is_some());
    }

    #[test]
    fn click_on_drawn_button_hits_it() {
        let v = Viewport::fit(80, 24);
        let (col, row) = v.to_cell(400.0, 225.0);
        let (x, y) = v.to_playfield(col as u16, row as u16).unwrap();
        assert_eq!(button_at(Screen::Start, x, y), Some(0));
    }
}
