/// Screen state machine and the menu buttons that drive it.
///
/// ```text
///   Start ──START──▶ Playing ──score ≥ level×100──▶ LevelUp ──RESUME──▶ Playing
///                       │                                │
///                       └──lives = 0──▶ GameOver ──RESTART──▶ Playing
///   EXIT / QUIT on any menu screen ends the process.
/// ```
///
/// All transitions happen synchronously inside one tick of the frame loop.
/// Button rectangles are in playfield units so pointer hit-testing and
/// drawing share one layout.

use log::info;

use crate::domain::geometry::Rect;
use super::event::GameEvent;
use super::world::{Screen, WorldState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuAction {
    Start,
    ToggleSound,
    Exit,
    Resume,
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug)]
pub struct Button {
    pub action: MenuAction,
    pub rect: Rect,
}

/// Whether the frame loop keeps running.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

const START_BUTTONS: [Button; 3] = [
    Button { action: MenuAction::Start, rect: Rect::new(300.0, 200.0, 200.0, 50.0) },
    Button { action: MenuAction::ToggleSound, rect: Rect::new(300.0, 300.0, 200.0, 50.0) },
    Button { action: MenuAction::Exit, rect: Rect::new(300.0, 400.0, 200.0, 50.0) },
];

const LEVEL_UP_BUTTONS: [Button; 2] = [
    Button { action: MenuAction::Resume, rect: Rect::new(250.0, 400.0, 150.0, 50.0) },
    Button { action: MenuAction::Quit, rect: Rect::new(450.0, 400.0, 150.0, 50.0) },
];

const GAME_OVER_BUTTONS: [Button; 2] = [
    Button { action: MenuAction::Restart, rect: Rect::new(250.0, 400.0, 150.0, 50.0) },
    Button { action: MenuAction::Quit, rect: Rect::new(450.0, 400.0, 150.0, 50.0) },
];

/// Buttons shown on `screen`; empty while playing.
pub fn buttons(screen: Screen) -> &'static [Button] {
    match screen {
        Screen::Start => &START_BUTTONS,
        Screen::LevelUp => &LEVEL_UP_BUTTONS,
        Screen::GameOver => &GAME_OVER_BUTTONS,
        Screen::Playing => &[],
    }
}

pub fn button_label(action: MenuAction, world: &WorldState) -> String {
    match action {
        MenuAction::Start => "START".into(),
        MenuAction::ToggleSound => {
            format!("SOUND: {}", if world.sound_on { "ON" } else { "OFF" })
        }
        MenuAction::Exit => "EXIT".into(),
        MenuAction::Resume => "RESUME".into(),
        MenuAction::Restart => "RESTART".into(),
        MenuAction::Quit => "QUIT".into(),
    }
}

/// Index of the button under playfield point `(px, py)`.
pub fn button_at(screen: Screen, px: f32, py: f32) -> Option<usize> {
    buttons(screen).iter().position(|b| b.rect.contains_point(px, py))
}

/// Move the menu highlight by `delta`, wrapping around.
pub fn move_cursor(world: &mut WorldState, delta: i32) {
    let n = buttons(world.screen).len() as i32;
    if n == 0 {
        return;
    }
    let cur = (world.menu_cursor as i32).min(n - 1);
    world.menu_cursor = (cur + delta).rem_euclid(n) as usize;
}

/// Action of the highlighted button, if the current screen has one.
pub fn selected_action(world: &WorldState) -> Option<MenuAction> {
    buttons(world.screen).get(world.menu_cursor).map(|b| b.action)
}

/// Apply a menu action. Actions that do not belong to the current screen
/// are ignored.
pub fn apply(world: &mut WorldState, action: MenuAction) -> Flow {
    if !buttons(world.screen).iter().any(|b| b.action == action) {
        return Flow::Continue;
    }
    match action {
        MenuAction::Start => start_game(world),
        MenuAction::ToggleSound => {
            world.sound_on = !world.sound_on;
            info!("sound {}", if world.sound_on { "on" } else { "off" });
        }
        MenuAction::Resume => resume(world),
        MenuAction::Restart => restart(world),
        MenuAction::Exit | MenuAction::Quit => {
            info!("quit requested from {:?}", world.screen);
            return Flow::Quit;
        }
    }
    Flow::Continue
}

fn enter(world: &mut WorldState, screen: Screen) {
    info!("screen {:?} -> {:?}", world.screen, screen);
    world.screen = screen;
    world.menu_cursor = 0;
}

fn start_game(world: &mut WorldState) {
    enter(world, Screen::Playing);
}

/// Leave LevelUp: the level increments here, not at the threshold.
fn resume(world: &mut WorldState) {
    world.level += 1;
    info!("resuming at level {}", world.level);
    enter(world, Screen::Playing);
}

fn restart(world: &mut WorldState) {
    world.reset_session();
    enter(world, Screen::Playing);
}

/// Score crossed the threshold for the current level.
pub fn enter_level_up(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    info!("level {} complete with score {}", world.level, world.score);
    enter(world, Screen::LevelUp);
    events.push(GameEvent::LevelUp { level: world.level });
}

/// Lives exhausted: settle the high score and freeze.
pub fn enter_game_over(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.score > world.high_score {
        world.high_score = world.score;
    }
    info!("game over: score {} high score {}", world.score, world.high_score);
    enter(world, Screen::GameOver);
    events.push(GameEvent::GameOver { score: world.score, high_score: world.high_score });
}
