//! Application entry point and thread bootstrapper.

mod input;
mod logic;
mod models;
mod render;
mod shared;
mod state;
mod system;

use crate::input::events::GameKind;
use crate::input::manager::InputManager;
use crate::models::settings::GameSettings;
use crate::system::bus::SystemBus;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;

/// Tabla rhythm and memory games for the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML). Missing files fall back to defaults.
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    /// Game loaded at startup. Tab switches at runtime.
    #[arg(short, long, value_enum, default_value_t = GameArg::Rhythm)]
    game: GameArg,

    /// Fixed RNG seed for reproducible note and sequence patterns.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log destination; the terminal itself is taken by the game.
    #[arg(long, default_value = "taal.log")]
    log_file: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum GameArg {
    Rhythm,
    Echo,
}

impl From<GameArg> for GameKind {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Rhythm => GameKind::Rhythm,
            GameArg::Echo => GameKind::Echo,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot open log file {}", args.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    log::info!("MAIN: Booting taal...");

    let settings = GameSettings::load(&args.config);

    let bus = SystemBus::new();

    let input_bus = bus.clone();
    let logic_bus = bus.clone();
    let render_bus = bus.clone();

    let input_manager = InputManager::new(settings.rhythm.lane_count, &settings.keybinds);

    input::start_thread(input_bus, input_manager, args.config.clone());
    logic::start_thread(logic_bus, settings, args.game.into(), args.seed);

    render::app::App::run(render_bus)
}
