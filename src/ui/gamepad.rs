/// Gamepad input via gilrs.
///
/// Buttons are looked up through an action map built from `[gamepad]` in
/// config.toml. Defaults:
///   D-pad / Left Stick    →  Move hero, menu cursor
///   A / X / R1            →  Fire water
///   Start                 →  Press the highlighted button
///   Select                →  Quit from a menu

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use log::{info, warn};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        Some(match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH" => Btn::A,
            "B" | "EAST" => Btn::B,
            "X" | "WEST" => Btn::X,
            "Y" | "NORTH" => Btn::Y,
            "L1" | "LB" => Btn::L1,
            "R1" | "RB" => Btn::R1,
            "L2" | "LT" => Btn::L2,
            "R2" | "RT" => Btn::R2,
            "START" => Btn::Start,
            "SELECT" | "BACK" => Btn::Select,
            _ => return None,
        })
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        Some(match btn {
            Button::South => Btn::A,
            Button::East => Btn::B,
            Button::West => Btn::X,
            Button::North => Btn::Y,
            Button::LeftTrigger => Btn::L1,
            Button::RightTrigger => Btn::R1,
            Button::LeftTrigger2 => Btn::L2,
            Button::RightTrigger2 => Btn::R2,
            Button::Start => Btn::Start,
            Button::Select => Btn::Select,
            _ => return None,
        })
    }
}

/// Four directions, shared by the D-pad and the digitized stick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

struct ActionMap {
    fire: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            fire: vec![Btn::A, Btn::X, Btn::R1],
            confirm: vec![Btn::Start],
            cancel: vec![Btn::Select],
        }
    }
}

/// Unknown names are skipped; an all-unknown list keeps `fallback`.
fn parse_list(action: &str, names: &[String], fallback: &mut Vec<Btn>) {
    let parsed: Vec<Btn> = names
        .iter()
        .filter_map(|s| {
            let b = Btn::from_name(s);
            if b.is_none() {
                warn!("gamepad: unknown button '{s}' for {action}");
            }
            b
        })
        .collect();
    if !parsed.is_empty() {
        *fallback = parsed;
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    /// Indexed by `Dir as usize`.
    dpad: [BtnState; 4],
    stick: [BtnState; 4],
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        if connected {
            info!("gamepad connected");
        }

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let map = &mut self.action_map;
        parse_list("fire", &cfg.fire, &mut map.fire);
        parse_list("confirm", &cfg.confirm, &mut map.confirm);
        parse_list("cancel", &cfg.cancel, &mut map.cancel);
    }

    /// Call once per frame before querying.
    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        self.digitize_stick();
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp => Some(Dir::Up),
            Button::DPadDown => Some(Dir::Down),
            Button::DPadLeft => Some(Dir::Left),
            Button::DPadRight => Some(Dir::Right),
            _ => None,
        };
        if let Some(d) = dir {
            self.dpad[d as usize].set(held);
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn as usize].set(held);
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn digitize_stick(&mut self) {
        self.stick[Dir::Left as usize].set(self.stick_x < -STICK_DEADZONE);
        self.stick[Dir::Right as usize].set(self.stick_x > STICK_DEADZONE);
        self.stick[Dir::Up as usize].set(self.stick_y > STICK_DEADZONE);
        self.stick[Dir::Down as usize].set(self.stick_y < -STICK_DEADZONE);
    }

    // ── Action queries ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn fire_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.fire)
    }
    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }

    /// Continuous: D-pad or stick held in `dir`.
    pub fn held(&self, dir: Dir) -> bool {
        self.dpad[dir as usize].held || self.stick[dir as usize].held
    }

    /// Edge: D-pad or stick entered `dir` this frame.
    pub fn pressed(&self, dir: Dir) -> bool {
        self.dpad[dir as usize].just_pressed || self.stick[dir as usize].just_pressed
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            *b = BtnState::default();
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> GamepadState {
        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    #[test]
    fn names_are_case_insensitive_with_aliases() {
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name(" rb "), Some(Btn::R1));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn default_fire_never_confirms() {
        let mut pad = offline();
        for b in [Btn::A, Btn::X, Btn::R1] {
            pad.buttons[b as usize].set(true);
        }
        assert!(pad.fire_pressed());
        assert!(!pad.confirm_pressed());
        assert!(!pad.cancel_pressed());

        pad.buttons[Btn::Start as usize].set(true);
        assert!(pad.confirm_pressed());
    }

    #[test]
    fn config_overrides_and_ignores_unknown_names() {
        let mut pad = offline();
        pad.load_button_config(&GamepadConfig {
            fire: vec!["B".into()],
            confirm: vec!["nope".into()],
            cancel: vec!["Start".into(), "bogus".into()],
        });
        assert_eq!(pad.action_map.fire, vec![Btn::B]);
        assert_eq!(pad.action_map.confirm, vec![Btn::Start]);
        assert_eq!(pad.action_map.cancel, vec![Btn::Start]);
    }

    #[test]
    fn press_is_an_edge_hold_is_a_level() {
        let mut pad = offline();
        pad.buttons[Btn::X as usize].set(true);
        assert!(pad.fire_pressed());
        pad.clear_just_pressed();
        pad.buttons[Btn::X as usize].set(true);
        assert!(!pad.fire_pressed());
        assert!(pad.buttons[Btn::X as usize].held);
    }

    #[test]
    fn stick_past_deadzone_counts_as_direction() {
        let mut pad = offline();
        pad.stick_x = -0.1;
        pad.stick_y = 0.9;
        pad.digitize_stick();
        assert!(!pad.held(Dir::Left));
        assert!(pad.held(Dir::Up));
        assert!(pad.pressed(Dir::Up));
        pad.clear_just_pressed();
        pad.digitize_stick();
        assert!(pad.held(Dir::Up));
        assert!(!pad.pressed(Dir::Up));
    }

    #[test]
    fn release_all_clears_everything() {
        let mut pad = offline();
        pad.dpad[Dir::Right as usize].set(true);
        pad.stick_x = 1.0;
        pad.release_all();
        assert!(!pad.held(Dir::Right));
        assert_eq!(pad.stick_x, 0.0);
    }
}
