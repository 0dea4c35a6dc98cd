//! Arcade Runtime - frame loop infrastructure
//!
//! Provides the pieces a game module runs on:
//! - `FrameClock` / `FrameLoop`: clamped variable timestep and start/stop scheduling
//! - `InputState`: single-pointer tracking with per-frame edge flags, key actions
//! - `PersistentStore`: namespaced, crash-safe scalar settings
//! - `Surface` / `Canvas`: retained 2D draw list in device pixels
//! - `Runtime`: composes all of the above plus audio for the host shell

mod clock;
mod input;
pub mod logging;
mod persist;
mod runtime;
mod surface;

pub use clock::{FrameClock, FrameLoop, DEFAULT_MAX_DT};
pub use input::{InputState, PointerState};
pub use persist::{PersistentStore, StoreConfig};
pub use runtime::{DisplaySize, FrameHandler, Runtime, RuntimeConfig};
pub use surface::{Canvas, DrawCmd, Surface, TextAlign};

pub use winit::keyboard::KeyCode;
