/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Playfield coordinates go through `Viewport`, so sprites and menu
/// buttons land on the cells the pointer hit-test expects.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Entity, Kind, Side};
use crate::domain::geometry::{Rect, PLAYFIELD_W};
use crate::sim::screen::{button_label, buttons};
use crate::sim::world::{Screen, WorldState};
use super::assets::{Sprite, SpriteSet};
use super::viewport::Viewport;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every empty cell. Using the same RGB
    /// for `Clear` and for cells keeps VTE terminals from showing gap lines.
    const BASE_BG: Color = Color::Rgb { r: 10, g: 24, b: 40 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composition, so every position diffs after a fill.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, Cell::new(ch, fg, bg));
        }
    }

    /// Write `s` so it is centered on column `cx`.
    fn put_centered(&mut self, cx: i32, y: i32, s: &str, fg: Color, bg: Color) {
        let half = s.chars().count() as i32 / 2;
        self.put_str(cx - half, y, s, fg, bg);
    }

    fn fill_row(&mut self, y: i32, bg: Color) {
        for x in 0..self.width as i32 {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 20, g: 60, b: 110 };
const HERO_FG: Color = Color::Rgb { r: 90, g: 200, b: 255 };
const ENEMY_FG: Color = Color::Rgb { r: 255, g: 90, b: 60 };
const WATER_FG: Color = Color::Rgb { r: 120, g: 230, b: 255 };
const BULLET_FG: Color = Color::Rgb { r: 255, g: 220, b: 60 };
const TITLE_FG: Color = Color::Rgb { r: 120, g: 210, b: 255 };
const BUTTON_BG: Color = Color::Rgb { r: 40, g: 70, b: 100 };
const BUTTON_HI_BG: Color = Color::Rgb { r: 60, g: 170, b: 230 };
const DIM: Color = Color::DarkGrey;

const TITLE: &str = "~~~  W A T E R   H E R O  ~~~";
const TAGLINE: &str = "Hose down the invaders before they cross the field";

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    viewport: Viewport,
    last_screen: Option<Screen>,
    sprites: SpriteSet,
    keyboard_enhanced: bool,
}

impl Renderer {
    pub fn new(sprites: SpriteSet) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            viewport: Viewport::fit(0, 0),
            last_screen: None,
            sprites,
            keyboard_enhanced: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.keyboard_enhanced = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.keyboard_enhanced {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Whether key Release events are reported by this terminal.
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Current playfield mapping, for pointer hit-testing.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
        self.viewport = Viewport::fit(w, h);
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_screen != Some(world.screen) {
            self.back.cells.fill(Cell::INVALID);
            self.last_screen = Some(world.screen);
        }

        self.compose(world);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &WorldState) {
        self.front.clear();
        match w.screen {
            Screen::Start => self.compose_start(w),
            Screen::Playing => self.compose_playing(w),
            Screen::LevelUp => self.compose_level_up(w),
            Screen::GameOver => self.compose_game_over(w),
        }
        self.compose_buttons(w);
        self.compose_footer(w.screen);
    }

    fn compose_hud(&mut self, w: &WorldState) {
        self.front.fill_row(0, HUD_BG);
        let right_edge = self.front.width as i32;
        let lives = format!(" Lives: {}", w.lives());
        let score = format!("Score: {}", w.score);
        let level = format!("Best: {}  Level: {} ", w.high_score, w.level);
        self.front.put_str(0, 0, &lives, Color::White, HUD_BG);
        self.front.put_centered(right_edge / 2, 0, &score, Color::White, HUD_BG);
        let level_x = right_edge - level.chars().count() as i32;
        self.front.put_str(level_x, 0, &level, Color::White, HUD_BG);
    }

    fn compose_footer(&mut self, screen: Screen) {
        let help = match screen {
            Screen::Playing => " ←→↑↓/WASD Move   SPACE/Z Fire water   Ctrl+C Quit",
            _ => " ↑↓←→ Select   ENTER Press   Click a button   Ctrl+C Quit",
        };
        let row = self.front.height as i32 - 1;
        self.front.put_str(0, row, help, DIM, Color::Reset);
    }

    fn compose_playing(&mut self, w: &WorldState) {
        self.compose_hud(w);
        for e in w.drawables() {
            self.compose_entity(e);
        }
    }

    fn compose_entity(&mut self, e: &Entity) {
        let (sprite, fg) = match &e.kind {
            Kind::Player { .. } => (&self.sprites.hero, HERO_FG),
            Kind::Enemy(_) => (&self.sprites.enemy, ENEMY_FG),
            Kind::Projectile(Side::Friendly) => (&self.sprites.water, WATER_FG),
            Kind::Projectile(Side::Hostile) => (&self.sprites.bullet, BULLET_FG),
        };
        let cells = stamp(sprite, &e.rect, &self.viewport);
        let vp = self.viewport;
        let top = vp.row0 as i32;
        let bottom = top + vp.rows as i32;
        for (x, y, ch) in cells {
            // Sprites never draw over the HUD or footer
            if y >= top && y < bottom {
                self.front.set(x, y, Cell::new(ch, fg, Color::Reset));
            }
        }
    }

    /// Terminal row for playfield y.
    fn row_at(&self, y: f32) -> i32 {
        self.viewport.to_cell(0.0, y).1
    }

    fn center_col(&self) -> i32 {
        self.viewport.to_cell(PLAYFIELD_W / 2.0, 0.0).0
    }

    fn compose_start(&mut self, w: &WorldState) {
        let cx = self.center_col();
        let (title_row, tagline_row) = (self.row_at(90.0), self.row_at(140.0));
        self.front.put_centered(cx, title_row, TITLE, TITLE_FG, Color::Reset);
        self.front.put_centered(cx, tagline_row, TAGLINE, DIM, Color::Reset);
        if w.high_score > 0 {
            let best = format!("High score: {}", w.high_score);
            self.front.put_centered(cx, self.row_at(500.0), &best, Color::White, Color::Reset);
        }
    }

    fn compose_level_up(&mut self, w: &WorldState) {
        let cx = self.center_col();
        let done = format!("Level {} Complete", w.level);
        let next = format!("Next Level: {}", w.level + 1);
        let score = format!("Score: {}", w.score);
        self.front.put_centered(cx, self.row_at(200.0), &done, TITLE_FG, Color::Reset);
        self.front.put_centered(cx, self.row_at(260.0), &next, Color::White, Color::Reset);
        self.front.put_centered(cx, self.row_at(320.0), &score, DIM, Color::Reset);
    }

    fn compose_game_over(&mut self, w: &WorldState) {
        let cx = self.center_col();
        let score = format!("Final Score: {}", w.score);
        let best = format!("High Score: {}", w.high_score);
        let banner_row = self.row_at(200.0);
        self.front.put_centered(cx, banner_row, "G A M E   O V E R", ENEMY_FG, Color::Reset);
        self.front.put_centered(cx, self.row_at(270.0), &score, Color::White, Color::Reset);
        self.front.put_centered(cx, self.row_at(320.0), &best, Color::White, Color::Reset);
    }

    /// Menu buttons of the current screen; the cursor's button is lit.
    fn compose_buttons(&mut self, w: &WorldState) {
        for (i, button) in buttons(w.screen).iter().enumerate() {
            let lit = i == w.menu_cursor;
            let bg = if lit { BUTTON_HI_BG } else { BUTTON_BG };
            let fg = if lit { Color::Black } else { Color::White };
            let (c0, r0) = self.viewport.to_cell(button.rect.left(), button.rect.top());
            let (c1, r1) = self.viewport.to_cell(button.rect.right(), button.rect.bottom());
            let (c1, r1) = (c1.max(c0 + 1), r1.max(r0 + 1));
            for y in r0..r1 {
                for x in c0..c1 {
                    self.front.set(x, y, Cell::new(' ', fg, bg));
                }
            }
            let label = button_label(button.action, w);
            self.front.put_centered((c0 + c1) / 2, (r0 + r1 - 1) / 2, &label, fg, bg);
        }
    }
}

/// Glyphs of `sprite` scaled onto the cells covered by `rect`, as
/// `(col, row, glyph)`. Spaces are transparent and skipped.
fn stamp(sprite: &Sprite, rect: &Rect, vp: &Viewport) -> Vec<(i32, i32, char)> {
    let (col0, row0) = vp.to_cell(rect.x, rect.y);
    let cols = vp.span_cols(rect.w);
    let rows = vp.span_rows(rect.h);
    let mut out = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        let sy = (r * 2 + 1) * sprite.height() / (rows * 2);
        let line = &sprite.rows[sy];
        for c in 0..cols {
            let sx = (c * 2 + 1) * sprite.width / (cols * 2);
            match line.get(sx) {
                Some(&ch) if ch != ' ' => out.push((col0 + c as i32, row0 + r as i32, ch)),
                _ => {}
            }
        }
    }
    out
}
