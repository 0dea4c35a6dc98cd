//! Arcade player: windowed host library
//!
//! Provides the `PlayerApp` application handler and the TOML configuration
//! it is built from.

mod config;
mod player_app;
mod render;

pub use config::{ArcadeConfig, WindowConfig};
pub use player_app::PlayerApp;
