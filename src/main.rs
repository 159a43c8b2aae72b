//! Nut Launcher entry point
//!
//! Runs the simulation headless with the demo AI at the controls.
//!
//! Usage: `nut-launcher [seconds]`
//! - `NUT_LAUNCHER_SEED`: run seed (defaults to the system clock)
//! - `NUT_LAUNCHER_LEVELS`: path to a JSON level table
//! - `RUST_LOG`: log filter (`info` shows level flow, `debug` shows boss states)

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nut_launcher::consts::SIM_DT;
    use nut_launcher::sim::GameState;
    use nut_launcher::{FrameDriver, LevelTable, LogPresentation};

    env_logger::init();
    log::info!("Nut Launcher (headless) starting...");

    let seed = std::env::var("NUT_LAUNCHER_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(clock_seed);

    let levels = match std::env::var("NUT_LAUNCHER_LEVELS") {
        Ok(path) => match LevelTable::load(&path) {
            Ok(table) => {
                log::info!("Loaded {} levels from {}", table.max_level(), path);
                table
            }
            Err(e) => {
                log::error!("Could not use level table {}: {}", path, e);
                log::warn!("Falling back to the stock levels");
                LevelTable::default()
            }
        },
        Err(_) => LevelTable::default(),
    };

    let seconds = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| *s > 0.0)
        .unwrap_or(60.0);

    log::info!("Game initialized with seed: {}", seed);
    let mut driver = FrameDriver::new(GameState::with_levels(seed, levels));
    driver.input.idle_mode = true;
    let mut presentation = LogPresentation::default();

    let frames = (seconds / SIM_DT).round() as u64;
    for frame in 0..frames {
        let time = frame as f64 * f64::from(SIM_DT) * 1000.0;
        driver.update(SIM_DT, time, &mut presentation);
    }

    let hud = driver.state.hud();
    log::info!(
        "Finished {} s: level {}, score {}, health {:.0}, {} sound cues",
        seconds,
        hud.level,
        hud.score,
        hud.health,
        presentation.sounds_played
    );
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize HUD: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front end drives the library directly
}
