//! Arcade Core - Foundational types for the arcade runtime
//!
//! This crate provides the types every other arcade crate depends on:
//! - `Rect` - Axis-aligned boxes with exact-boundary overlap tests
//! - `Color`, `Vec2` - Drawing and 2D math primitives
//! - `first_success` - Ordered fallback chains for best-effort acquisition
//! - Error types and Result alias

mod error;
pub mod fallback;
mod types;

pub use error::{ArcadeError, Result};
pub use fallback::{first_success, Strategy};
pub use types::{Color, Rect, Vec2};
