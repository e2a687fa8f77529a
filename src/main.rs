/// Entry point and frame loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use log::{error, info, warn};

use config::GameConfig;
use domain::entity::{FrameInput, Held};
use sim::event::GameEvent;
use sim::screen::{self, Flow};
use sim::step;
use sim::world::{Screen, WorldState};
use ui::assets::SpriteSet;
use ui::gamepad::{Dir, GamepadState};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;
use ui::viewport::Viewport;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Upper bound on simulated time per tick, so a stalled terminal does not
/// fast-forward enemy fire cooldowns.
const MAX_DT_MS: u64 = 100;

fn main() {
    let config = GameConfig::load();

    if let Err(e) = simple_logging::log_to_file(&config.log_file, config.log_level) {
        eprintln!("Warning: cannot open log file {}: {e}", config.log_file.display());
    }
    info!("waterhero {} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: &GameConfig) -> Result<()> {
    let sprites = SpriteSet::load(&config.assets_dir)?;

    let mut renderer = Renderer::new(sprites);
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e).context("terminal init failed");
    }

    let sound = SoundEngine::new(&config.audio, &config.assets_dir);
    let mut world = WorldState::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), config);

    if let Err(e) = renderer.cleanup() {
        warn!("terminal cleanup failed: {e}");
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    info!("exiting, high score {}", world.high_score);
    println!();
    println!("Thanks for playing Water Hero!");
    println!("High Score: {}", world.high_score);
    Ok(())
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<()> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.keyboard_enhanced();
    kb.long_hold = KEYS_FIRE.to_vec();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut rng = rand::thread_rng();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut last_tick = Instant::now();

    // Edge-triggered fire is caught every frame and spent on the next tick.
    let mut pending_fire = false;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            info!("ctrl+c, quitting");
            break;
        }

        // A key that starts the game must not also fire in it
        let was_playing = world.screen == Screen::Playing;
        if handle_meta(world, &kb, &gp, renderer.viewport()) == Flow::Quit {
            break;
        }

        if world.screen != Screen::Playing {
            pending_fire = false;
        } else if was_playing && (kb.any_pressed(KEYS_FIRE) || gp.fire_pressed()) {
            pending_fire = true;
        }

        if let Some((deadline, dt_ms)) = tick_due(last_tick, Instant::now(), tick_rate) {
            last_tick = deadline;
            if world.screen == Screen::Playing {
                let frame_input = FrameInput {
                    held: detect_held(&kb, &gp),
                    fire: std::mem::take(&mut pending_fire),
                    dt_ms,
                };
                let events = step::step(world, frame_input, &mut rng);
                if world.sound_on {
                    process_sound_events(sound, &events);
                }
            }
        }

        if let Some(sfx) = sound {
            sfx.set_music(world.sound_on);
        }

        renderer.render(world).context("render failed")?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Whether a tick is due at `now`. Returns the new tick base and the
/// milliseconds the tick covers. On schedule the base advances by exactly
/// `tick_rate`; after a stall of two ticks or more it resyncs to `now`.
fn tick_due(last_tick: Instant, now: Instant, tick_rate: Duration) -> Option<(Instant, u64)> {
    let elapsed = now.saturating_duration_since(last_tick);
    if elapsed < tick_rate {
        None
    } else if elapsed >= tick_rate * 2 {
        Some((now, (elapsed.as_millis() as u64).min(MAX_DT_MS)))
    } else {
        Some((last_tick + tick_rate, (tick_rate.as_millis() as u64).min(MAX_DT_MS)))
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::EnemyFired => sfx.play_bullet(),
            GameEvent::WaterFired => sfx.play_water(),
            GameEvent::EnemyDestroyed { .. } => sfx.play_explode(),
            GameEvent::PlayerHit { .. } => sfx.play_hit(),
            GameEvent::LevelUp { .. } => sfx.play_level_up(),
            GameEvent::GameOver { .. } => sfx.play_game_over(),
            GameEvent::EnemySpawned { .. } | GameEvent::EnemyDamaged { .. } => {}
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_FIRE: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Char('z'), KeyCode::Char('Z')];
// Disjoint from KEYS_FIRE: a late fire tap must not press RESTART or RESUME.
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_MENU_PREV: &[KeyCode] = &[KeyCode::Up, KeyCode::Left, KeyCode::BackTab];
const KEYS_MENU_NEXT: &[KeyCode] = &[KeyCode::Down, KeyCode::Right, KeyCode::Tab];

fn detect_held(kb: &InputState, gp: &GamepadState) -> Held {
    let key = |codes: &[KeyCode]| kb.any_held(codes) || kb.any_pressed(codes);
    Held {
        left: key(KEYS_LEFT) || gp.held(Dir::Left),
        right: key(KEYS_RIGHT) || gp.held(Dir::Right),
        up: key(KEYS_UP) || gp.held(Dir::Up),
        down: key(KEYS_DOWN) || gp.held(Dir::Down),
    }
}

/// Menu input for every screen except Playing: pointer hover and clicks,
/// cursor keys, confirm and cancel.
fn handle_meta(world: &mut WorldState, kb: &InputState, gp: &GamepadState, vp: Viewport) -> Flow {
    if world.screen == Screen::Playing {
        return Flow::Continue;
    }

    let hit = |world: &WorldState, (col, row): (u16, u16)| {
        vp.to_playfield(col, row)
            .and_then(|(x, y)| screen::button_at(world.screen, x, y))
    };

    if kb.pointer_moved {
        if let Some(i) = kb.pointer.and_then(|at| hit(&*world, at)) {
            world.menu_cursor = i;
        }
    }

    for &at in &kb.clicks {
        if let Some(i) = hit(&*world, at) {
            let action = screen::buttons(world.screen)[i].action;
            return screen::apply(world, action);
        }
    }

    if kb.any_pressed(KEYS_MENU_PREV) || gp.pressed(Dir::Up) || gp.pressed(Dir::Left) {
        screen::move_cursor(world, -1);
    } else if kb.any_pressed(KEYS_MENU_NEXT) || gp.pressed(Dir::Down) || gp.pressed(Dir::Right) {
        screen::move_cursor(world, 1);
    }

    if kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed() {
        if let Some(action) = screen::selected_action(world) {
            return screen::apply(world, action);
        }
    }

    if kb.any_pressed(&[KeyCode::Esc]) || gp.cancel_pressed() {
        info!("cancel pressed on {:?}, quitting", world.screen);
        return Flow::Quit;
    }

    Flow::Continue
}
