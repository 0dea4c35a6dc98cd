//! Arcade - one-button mini-games in a window
//!
//! Usage:
//!   arcade [--game <id>] [--config <path>] [--fullscreen]

use anyhow::{Context, Result};
use arcade_audio::AudioBackend;
use arcade_games::{Arcade, GameRegistry};
use arcade_player::{ArcadeConfig, PlayerApp};
use arcade_runtime::logging::{init_logging, LoggingConfig};
use arcade_runtime::{DisplaySize, PersistentStore, Runtime};
use clap::Parser;
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "arcade")]
#[command(about = "Arcade - one-button mini-games")]
struct Args {
    /// Open this game directly instead of the menu (e.g. "dash")
    #[arg(long)]
    game: Option<String>,

    /// Path to a config file (defaults to ./arcade.toml, then the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,

    /// Log filter, e.g. "debug" or "arcade_games=debug"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        directives: args.log.clone(),
        ..Default::default()
    });

    let mut config = ArcadeConfig::discover(args.config.as_deref());
    if args.fullscreen {
        config.window.fullscreen = true;
    }
    let deep_link = args.game.or_else(|| config.start_game.clone());

    let store = PersistentStore::open(&config.store);
    if let Some(path) = store.path() {
        log::info!("store: {}", path.display());
    }
    let display = DisplaySize::new(
        config.window.width as f32,
        config.window.height as f32,
        1.0,
    );
    let runtime = Runtime::new(
        config.runtime.clone(),
        display,
        AudioBackend::new(config.audio.clone()),
        store,
    );
    let arcade = Arcade::new(runtime, GameRegistry::builtin(config.dash.clone()));

    println!("Controls:");
    println!("  1-9          - Pick a game from the menu");
    println!("  Hold Space   - Climb (or hold mouse / touch)");
    println!("  R / Enter    - Retry after game over");
    println!("  M            - Toggle sound");
    println!("  Escape       - Back to menu / Exit");
    println!("  F11          - Toggle fullscreen");

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(arcade, config.window, deep_link);
    event_loop.run_app(&mut app).context("Event loop failed")?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
