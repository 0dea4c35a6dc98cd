//! Game modules for the arcade runtime
//!
//! - [`GameModule`] / [`ModuleSlot`]: the lifecycle contract and its enforcement
//! - [`GameRegistry`]: id → module constructor mapping
//! - [`GameMenu`]: selection screen
//! - [`Arcade`]: host that keeps at most one module attached to the runtime
//! - [`dash`]: the built-in Dash game

pub mod dash;
mod host;
mod menu;
mod module;
mod registry;
mod rng;

pub use dash::{DashConfig, DashGame, DASH_META};
pub use host::{Arcade, MUTED_KEY};
pub use menu::{GameMenu, MenuEntry};
pub use module::{GameMeta, GameModule, ModuleSlot, ModuleState};
pub use registry::GameRegistry;
pub use rng::SpawnRng;
