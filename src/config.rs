/// Settings read from `config.toml`: tick rate, audio, gamepad buttons,
/// asset location and logging. Gameplay rules are not configurable.
///
/// Every key is optional. A missing or unparsable file means defaults;
/// warnings go to stderr because logging is configured from this file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use log::LevelFilter;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    pub audio: AudioConfig,
    pub gamepad: GamepadConfig,
    pub assets_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

#[derive(Clone, Debug)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Process-wide volume, 0.0 ..= 1.0.
    pub volume: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub fire: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_audio_enabled")]
    enabled: bool,
    #[serde(default = "default_volume")]
    volume: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_fire")]
    fire: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }  // ≈60 ticks/s
fn default_audio_enabled() -> bool { true }
fn default_volume() -> f32 { 0.5 }

fn default_fire() -> Vec<String> { vec!["A".into(), "X".into(), "R1".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_assets_dir() -> String { "assets".into() }
fn default_log_file() -> String { "waterhero.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio {
            enabled: default_audio_enabled(),
            volume: default_volume(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            fire: default_fire(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            assets_dir: default_assets_dir(),
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Search order: exe directory, CWD, `~/.local/share/waterhero`,
    /// `/usr/share/waterhero`.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let assets_dir = resolve_dir(&toml_cfg.general.assets_dir, search_dirs);

        let log_level = toml_cfg.general.log_level.parse::<LevelFilter>().unwrap_or_else(|_| {
            eprintln!(
                "Warning: unknown log_level '{}', using info",
                toml_cfg.general.log_level
            );
            LevelFilter::Info
        });

        GameConfig {
            tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            audio: AudioConfig {
                enabled: toml_cfg.audio.enabled,
                volume: toml_cfg.audio.volume.clamp(0.0, 1.0),
            },
            gamepad: GamepadConfig {
                fire: toml_cfg.gamepad.fire,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            assets_dir,
            log_file: PathBuf::from(toml_cfg.general.log_file),
            log_level,
        }
    }
}

/// Absolute paths are taken as-is; relative ones are searched for in the
/// candidate dirs and default to CWD-relative.
fn resolve_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = Path::new(dir);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs
        .iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from(dir))
}

/// Exe dir (symlinks resolved), CWD, then whichever data dirs exist.
fn candidate_dirs() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    let data_dirs = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local/share/waterhero"))
        .into_iter()
        .chain(std::iter::once(PathBuf::from("/usr/share/waterhero")))
        .filter(|d| d.is_dir());

    let mut dirs: Vec<PathBuf> = Vec::new();
    for dir in exe_dir.into_iter().chain(cwd).chain(data_dirs) {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// The first `config.toml` found in `search_dirs`, or defaults.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    let found = search_dirs
        .iter()
        .map(|d| d.join("config.toml"))
        .find(|p| p.is_file());
    let Some(path) = found else {
        return TomlConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => parse_toml(&text),
        Err(e) => {
            eprintln!("Warning: cannot read {}: {e}; using defaults", path.display());
            TomlConfig::default()
        }
    }
}

fn parse_toml(text: &str) -> TomlConfig {
    toml::from_str::<TomlConfig>(text).unwrap_or_else(|e| {
        eprintln!("Warning: config.toml is invalid, using defaults: {e}");
        TomlConfig::default()
    })
}
