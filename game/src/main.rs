use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use blastgrid::config::GameConfig;
use blastgrid::direction::Dir4;
use blastgrid::game::{Action, Game, PlayState};
use blastgrid::levels::{self, LevelParams};

/// Headless demo session: generate a stage, wire console listeners onto the
/// bus, and let a scripted pilot wander and drop bombs.
///
/// Usage: `blastgrid [config.json] [seed]`
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::from_json(&std::fs::read_to_string(&path)?)?,
        None => GameConfig::default(),
    };
    let seed: u64 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 0xB1A57,
    };
    let tick_rate = config.tick_rate;

    let mut rng = StdRng::seed_from_u64(seed);
    let level = levels::generate(&LevelParams::default(), &mut rng)?;
    let mut game = Game::new(&level, config, seed)?;

    // Console stand-ins for the scoreboard, audio and flow subsystems.
    game.bus
        .score_changed
        .subscribe(|score| println!("score: {score}"));
    game.bus
        .bomb_exploded
        .subscribe(|(_, pos)| println!("boom at ({}, {})", pos.x, pos.y));
    game.bus
        .brick_destroyed
        .subscribe(|pos| println!("brick cleared at ({}, {})", pos.x, pos.y));
    game.bus.player_died.subscribe(|_| println!("player down"));
    game.bus
        .stage_cleared
        .subscribe(|_| println!("stage cleared!"));
    game.bus.game_over.subscribe(|_| println!("game over"));

    // The pilot is not clever: it wanders, occasionally drops a bomb, and
    // trusts its luck. Good enough to exercise a full session end to end.
    let mut pilot = StdRng::seed_from_u64(seed ^ 0x5EED);
    let command_interval = (tick_rate / 4).max(1);
    let mut elapsed = 0;
    for tick in 0..60 * tick_rate {
        if tick % command_interval == 0 {
            let action = if pilot.gen_bool(0.2) {
                Action::PlaceBomb
            } else {
                Action::Move(Dir4::all()[pilot.gen_range(0..4)])
            };
            game.apply(action);
        }
        game.tick();
        elapsed = tick + 1;
        if game.play_state() != PlayState::Playing {
            break;
        }
    }

    println!(
        "finished after {:.1}s: {:?}, score {}",
        elapsed as f32 / tick_rate as f32,
        game.play_state(),
        game.world.score()
    );
    game.bus.reset_all();
    Ok(())
}
