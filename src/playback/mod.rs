//! Sequence playback
//!
//! This module is organized into submodules:
//! - `types`: playback state, visibility and snapshots
//! - `renderer`: the mesh display capability the controller drives
//! - `controller`: index navigation and the cadence timer

mod controller;
mod renderer;
mod types;

pub use controller::PlaybackController;
pub use renderer::Renderer;
pub use types::{PlaybackSnapshot, PlaybackState, Visibility};
