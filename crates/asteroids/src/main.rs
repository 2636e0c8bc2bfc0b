//! Headless asteroids run
//!
//! Plays a scripted session against the simulation and logs the outcome.
//! Usage: `asteroids [config.toml|config.ron] [frames]`

use std::error::Error;
use std::time::Duration;

use asteroids::{Game, GameConfig, GameStatus, ShipControls};
use roid_engine::config::Config;
use roid_engine::foundation::logging;
use roid_engine::foundation::time::Stopwatch;

const DEFAULT_CONFIG: &str = "asteroids.toml";
const DEFAULT_FRAMES: u64 = 60 * 60;
const FRAME_TIME: Duration = Duration::from_micros(16_667);

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let frames = match args.next() {
        Some(value) => value.parse::<u64>()?,
        None => DEFAULT_FRAMES,
    };

    let config = GameConfig::load_or_default(&config_path)?;
    let mut game = Game::new(&config)?;
    let stopwatch = Stopwatch::start_new();

    for frame in 0..frames {
        let report = game.update(autopilot(frame), FRAME_TIME)?;
        if report.new_wave {
            log::info!("Wave {} incoming", game.wave());
        }
        if frame % 600 == 0 {
            let stats = game.physics().last_stats();
            log::info!(
                "Frame {}: score {}, lives {}, asteroids {}, contacts {}",
                frame,
                game.score(),
                game.lives(),
                game.asteroid_count(),
                stats.contacts
            );
        }
        if game.status() == GameStatus::GameOver {
            break;
        }
    }

    log::info!(
        "Finished after {:.2}s simulated ({:.1} ms wall): score {}, wave {}, lives {}",
        game.physics().simulated_time().as_secs_f32(),
        stopwatch.elapsed_millis(),
        game.score(),
        game.wave(),
        game.lives()
    );
    Ok(())
}

/// Slow sweeping turn with bursts of thrust, firing whenever the gun allows
fn autopilot(frame: u64) -> ShipControls {
    let phase = frame % 240;
    ShipControls {
        thrust: if phase < 40 { 0.6 } else { 0.0 },
        turn: if (frame / 480) % 2 == 0 { 0.5 } else { -0.5 },
        fire: true,
    }
}
