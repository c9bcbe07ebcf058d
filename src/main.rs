/// Entry point and poll loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use config::{LogConfig, SimConfig};
use domain::map::TileMap;
use sim::clock::{MonotonicClock, SimulationClock, TimeSource};
use sim::step;
use sim::world::SimulationState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

/// Lag (in steps) past which a slow host gets logged.
const LAG_WARN_STEPS: u64 = 8;

fn main() {
    let config = SimConfig::load();

    // The terminal owns stdout, so logs go to a file or nowhere.
    let log_status = init_logging(&config.log);
    let logging = matches!(log_status, Ok(true));
    for w in &config.warnings {
        warn!("{w}");
    }
    info!(
        source = ?config.source,
        tick_rate_ms = config.speed.tick_rate_ms,
        poll_sleep_ms = config.speed.poll_sleep_ms,
        "config loaded"
    );

    let map = match TileMap::builtin() {
        Ok(map) => map,
        Err(e) => {
            error!(error = %e, "built-in map rejected");
            eprintln!("Map error: {e}");
            return;
        }
    };
    info!("map loaded\n{map}");

    let mut state = SimulationState::new(map);
    let mut renderer = Renderer::new();

    let honor_release = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            let _ = renderer.cleanup();
            eprintln!("Terminal init failed: {e}");
            return;
        }
    };
    info!(honor_release, "terminal ready");

    let sound = SoundEngine::new();

    let result = game_loop(&mut state, &mut renderer, sound.as_ref(), &config, honor_release);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = &log_status {
        eprintln!("Logging disabled: {e}");
    }
    if !logging {
        for w in &config.warnings {
            eprintln!("Warning: {w}");
        }
    }

    if let Err(e) = result {
        error!(error = %e, "poll loop failed");
        eprintln!("Simulation error: {e}");
    }

    info!(ticks = state.tick, "shutdown");
    println!("{} ticks simulated.", state.tick);
}

/// Install the file subscriber. `Ok(false)` when logging is switched off.
/// `RUST_LOG` takes precedence over the configured filter.
fn init_logging(cfg: &LogConfig) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    if cfg.file.is_empty() {
        return Ok(false);
    }
    let file = File::create(&cfg.file)?;
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cfg.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()?;
    Ok(true)
}

fn game_loop(
    state: &mut SimulationState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &SimConfig,
    honor_release: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new(config.input.hold_timeout_ms);
    kb.honor_release = honor_release;
    let mut gp = GamepadState::new(&config.gamepad);
    info!(gamepad = gp.connected, "input ready");

    let mut time = MonotonicClock::new();
    let mut clock = SimulationClock::new(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            info!(tick = state.tick, clock_ticks = clock.ticks(), "quit requested");
            break;
        }
        if kb.reset_pressed() || gp.reset_pressed() {
            step::reset(state);
        }

        let now = time.now_millis();
        if clock.is_stalled(now) {
            time.sleep_millis(0);
            continue;
        }
        if clock.maybe_advance(now) {
            let intent = kb.intent().merge(gp.intent());
            let events = step::step(state, intent);
            sound::play_events(sound, &events);
            if clock.lag_millis() > clock.step_ms() * LAG_WARN_STEPS {
                debug!(lag_ms = clock.lag_millis(), "simulation behind real time");
            }
        }

        renderer.render(state)?;
        time.sleep_millis(config.speed.poll_sleep_ms);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_config(file: &str) -> LogConfig {
        LogConfig { file: file.to_string(), filter: "info".to_string() }
    }

    #[test]
    fn empty_log_file_disables_logging() {
        assert!(matches!(init_logging(&log_config("")), Ok(false)));
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        // a directory can't be opened as a log file
        let dir = std::env::temp_dir();
        let err = init_logging(&log_config(&dir.to_string_lossy()))
            .expect_err("directory accepted as log file");
        let msg = std::thread::spawn(move || err.to_string()).join().unwrap();
        assert!(!msg.is_empty());
    }
}
