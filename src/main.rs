//! Merge Drop headless runner
//!
//! Plays one autopilot round against the reference physics world and prints
//! the final HUD as JSON. Usage: `merge-drop [settings.json]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use merge_drop::consts::FRAME_MS;
use merge_drop::persistence::FileStore;
use merge_drop::sim::{CircleWorld, GameEvent, Round, RoundPhase};
use merge_drop::{Result, Settings};

/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Frames between autopilot drops
const DROP_INTERVAL: u32 = 40;

fn main() {
    env_logger::init();
    log::info!("Merge Drop (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seed = settings.resolve_seed();
    let settings = Settings {
        seed: Some(seed),
        ..settings
    };

    let world = CircleWorld::new(settings.gravity, settings.restitution);
    let store = FileStore::default();
    log::info!("High score file: {}", store.path().display());
    let mut round = Round::new(settings, world, store)?;
    let (left, right) = (
        round.settings().container_left,
        round.settings().container_right,
    );
    let mut pilot = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);

    for frame in 0..MAX_FRAMES {
        let x = pilot.random_range(left..right);
        round.on_pointer_move(x);
        if frame % DROP_INTERVAL == 0 {
            round.on_pointer_down(x)?;
        }
        round.on_tick(FRAME_MS)?;

        for event in round.drain_events() {
            match event {
                GameEvent::Merged { tier, points, .. } => {
                    log::info!("Merged into tier {} (+{})", tier, points);
                }
                GameEvent::GameOver {
                    score,
                    new_high_score,
                } => {
                    log::info!("Game over at frame {} with {} points", frame, score);
                    if new_high_score {
                        log::info!("New high score!");
                    }
                }
                _ => {}
            }
        }

        if round.phase() == RoundPhase::GameOver {
            break;
        }
    }

    let hud = round.hud()?;
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize HUD: {e}"),
    }
    Ok(())
}
