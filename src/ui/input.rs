/// Input state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous movement while a key is held
///   - Edge-triggered fire (only on the initial press)
///   - Simultaneous movement + fire in the same tick
///   - Pointer position and left clicks for menu buttons
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEventKind,
};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// Expiry for keys in `long_hold`. Longer than the usual OS autorepeat
/// delay, so the first repeat of a held key is not read as a new press.
const LONG_HOLD_TIMEOUT: Duration = Duration::from_millis(600);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// `drain_events()` call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Last known pointer cell (column, row).
    pub pointer: Option<(u16, u16)>,
    /// Set when the pointer moved during the last drain.
    pub pointer_moved: bool,
    /// Left-button presses during the last drain, as (column, row).
    pub clicks: Vec<(u16, u16)>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,

    /// Edge-triggered keys that expire after `LONG_HOLD_TIMEOUT`.
    pub long_hold: Vec<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer: None,
            pointer_moved: false,
            clicks: Vec::with_capacity(2),
            honor_release: false,
            long_hold: Vec::new(),
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.begin_frame();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.apply_event(ev, Instant::now()),
                Err(_) => break,
            }
        }

        let now = Instant::now();
        let long_hold = &self.long_hold;
        self.last_active.retain(|code, t| {
            now.duration_since(*t) < timeout_for(long_hold, *code)
        });
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.clicks.clear();
        self.pointer_moved = false;
    }

    fn apply_event(&mut self, ev: Event, now: Instant) {
        match ev {
            Event::Key(key) => {
                self.raw_events.push(key);
                match key.kind {
                    KeyEventKind::Release if self.honor_release => {
                        self.last_active.remove(&key.code);
                    }
                    KeyEventKind::Release => {
                        // Enhancement not confirmed: rely on timeout expiry
                    }
                    kind => {
                        let was_held = self.is_held_at(key.code, now);
                        self.last_active.insert(key.code, now);
                        if kind == KeyEventKind::Press && !was_held {
                            self.fresh_presses.push(key.code);
                        }
                    }
                }
            }
            Event::Mouse(mouse) => {
                let at = (mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.clicks.push(at);
                        self.pointer = Some(at);
                        self.pointer_moved = true;
                    }
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        self.pointer = Some(at);
                        self.pointer_moved = true;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < timeout_for(&self.long_hold, code))
            .unwrap_or(false)
    }

    /// Record a fresh press without going through the terminal.
    #[cfg(test)]
    pub fn press(&mut self, code: KeyCode) {
        self.apply_event(
            Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
            Instant::now(),
        );
    }
}

fn timeout_for(long_hold: &[KeyCode], code: KeyCode) -> Duration {
    if long_hold.contains(&code) {
        LONG_HOLD_TIMEOUT
    } else {
        HOLD_TIMEOUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn first_press_is_fresh_repeat_is_not() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.begin_frame();
        input.apply_event(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        assert!(input.was_pressed(KeyCode::Char(' ')));

        input.begin_frame();
        let t1 = t0 + Duration::from_millis(30);
        input.apply_event(key(KeyCode::Char(' '), KeyEventKind::Repeat), t1);
        assert!(!input.was_pressed(KeyCode::Char(' ')));
        assert!(input.is_held_at(KeyCode::Char(' '), t0 + Duration::from_millis(60)));
    }

    #[test]
    fn release_honored_only_with_enhancement() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.apply_event(key(KeyCode::Left, KeyEventKind::Press), t0);
        input.apply_event(key(KeyCode::Left, KeyEventKind::Release), t0);
        assert!(input.is_held_at(KeyCode::Left, t0));

        input.honor_release = true;
        input.apply_event(key(KeyCode::Left, KeyEventKind::Release), t0);
        assert!(!input.is_held_at(KeyCode::Left, t0));
    }

    #[test]
    fn held_key_expires_after_timeout() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.apply_event(key(KeyCode::Up, KeyEventKind::Press), t0);
        assert!(!input.is_held_at(KeyCode::Up, t0 + HOLD_TIMEOUT));
    }

    #[test]
    fn long_hold_key_survives_autorepeat_delay() {
        let mut input = InputState::new();
        input.long_hold = vec![KeyCode::Char(' ')];
        let t0 = Instant::now();
        input.begin_frame();
        input.apply_event(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        input.apply_event(key(KeyCode::Left, KeyEventKind::Press), t0);

        // First autorepeat arrives as a plain Press after the OS delay
        let t1 = t0 + Duration::from_millis(450);
        input.begin_frame();
        input.apply_event(key(KeyCode::Char(' '), KeyEventKind::Press), t1);
        input.apply_event(key(KeyCode::Left, KeyEventKind::Press), t1);
        assert!(!input.was_pressed(KeyCode::Char(' ')));
        assert!(input.was_pressed(KeyCode::Left));

        assert!(!input.is_held_at(KeyCode::Char(' '), t1 + LONG_HOLD_TIMEOUT));
    }

    #[test]
    fn enhanced_repeat_is_never_fresh() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t0 = Instant::now();
        input.apply_event(key(KeyCode::Char('z'), KeyEventKind::Press), t0);
        input.begin_frame();
        let late = t0 + Duration::from_secs(1);
        input.apply_event(key(KeyCode::Char('z'), KeyEventKind::Repeat), late);
        assert!(!input.was_pressed(KeyCode::Char('z')));
        assert!(input.is_held_at(KeyCode::Char('z'), late));
    }

    #[test]
    fn clicks_and_motion_track_pointer() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.begin_frame();
        input.apply_event(mouse(MouseEventKind::Moved, 3, 4), t0);
        assert_eq!(input.pointer, Some((3, 4)));
        assert!(input.pointer_moved);
        assert!(input.clicks.is_empty());

        input.apply_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 9), t0);
        assert_eq!(input.clicks, vec![(40, 9)]);

        input.begin_frame();
        assert!(input.clicks.is_empty());
        assert!(!input.pointer_moved);
        assert_eq!(input.pointer, Some((40, 9)));
    }
}
