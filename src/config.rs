/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to defaults if the file is missing or incomplete.
/// Logging is not up yet while this runs, so problems are collected in
/// `warnings` and reported once the subscriber exists.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::clock::SIM_TIMESTEP_MS;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub speed: SpeedConfig,
    pub input: InputConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    /// Where the settings came from, if a file was used.
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Simulation step; fixed for the whole run.
    pub tick_rate_ms: u64,
    pub poll_sleep_ms: u64,
}

#[derive(Clone, Debug)]
pub struct InputConfig {
    pub hold_timeout_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub primary: Vec<String>,
    pub modifier: Vec<String>,
    pub reset: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Empty disables logging.
    pub file: String,
    pub filter: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_poll_sleep")]
    poll_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_hold_timeout")]
    hold_timeout_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_primary")]
    primary: Vec<String>,
    #[serde(default = "default_modifier")]
    modifier: Vec<String>,
    #[serde(default = "default_reset")]
    reset: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_filter")]
    filter: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { SIM_TIMESTEP_MS }
fn default_poll_sleep() -> u64 { 1 }
fn default_hold_timeout() -> u64 { 160 }   // ~5 ticks; covers key-repeat gaps

fn default_primary() -> Vec<String> { vec!["A".into()] }
fn default_modifier() -> Vec<String> { vec!["X".into(), "R1".into()] }
fn default_reset() -> Vec<String> { vec!["Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_file() -> String { "tileclip.log".into() }
fn default_log_filter() -> String { "info".into() }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            poll_sleep_ms: default_poll_sleep(),
        }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput { hold_timeout_ms: default_hold_timeout() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            primary: default_primary(),
            modifier: default_modifier(),
            reset: default_reset(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

// ── Loading ──

impl SimConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Self {
        let mut warnings = Vec::new();
        let (toml_cfg, source) = load_toml(&candidate_dirs(), &mut warnings);
        SimConfig::from_toml(toml_cfg, source, warnings)
    }

    /// Parse settings from TOML text. A parse error yields defaults plus a
    /// warning.
    pub fn parse(text: &str) -> Self {
        let mut warnings = Vec::new();
        let toml_cfg = parse_toml(text, "config.toml", &mut warnings);
        SimConfig::from_toml(toml_cfg, None, warnings)
    }

    fn from_toml(toml_cfg: TomlConfig, source: Option<PathBuf>, mut warnings: Vec<String>) -> Self {
        let mut tick_rate_ms = toml_cfg.speed.tick_rate_ms;
        if tick_rate_ms == 0 {
            warnings.push(format!("tick_rate_ms must be positive, using {SIM_TIMESTEP_MS}"));
            tick_rate_ms = SIM_TIMESTEP_MS;
        }

        SimConfig {
            speed: SpeedConfig {
                tick_rate_ms,
                poll_sleep_ms: toml_cfg.speed.poll_sleep_ms,
            },
            input: InputConfig {
                hold_timeout_ms: toml_cfg.input.hold_timeout_ms,
            },
            gamepad: GamepadConfig {
                primary: toml_cfg.gamepad.primary,
                modifier: toml_cfg.gamepad.modifier,
                reset: toml_cfg.gamepad.reset,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig {
                file: toml_cfg.log.file,
                filter: toml_cfg.log.filter,
            },
            source,
            warnings,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig::from_toml(TomlConfig::default(), None, Vec::new())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn parse_toml(text: &str, origin: &str, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warnings.push(format!("{origin} parse error, using defaults: {e}"));
            TomlConfig::default()
        }
    }
}

/// First readable config.toml in `search_dirs`.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> (TomlConfig, Option<PathBuf>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let origin = path.display().to_string();
                return (parse_toml(&text, &origin, warnings), Some(path));
            }
            Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
        }
    }
    (TomlConfig::default(), None)
}
