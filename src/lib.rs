//! Wave Tether - towed-watercraft arcade simulation
//!
//! Core modules:
//! - `sim`: Tether motion model, decaying impulses, tow plane, beach-bomb blasts
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Configuration errors
//!
//! Planar convention: `Vec2::x` is world X (sideways across the river) and
//! `Vec2::y` carries world Z (forward, up the river). World Y is ignored.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, TetherError};
pub use settings::Settings;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// How far inside the leash length a candidate position may drift before
    /// it is pulled back onto the leash circle
    pub const LEASH_SLACK: f32 = 0.15;

    /// Sideways clamp used when the river is too narrow for its border
    pub const DEFAULT_CLAMP_WIDTH: f32 = 75.0;
}

/// Project a world position onto the river plane (drops world Y)
#[inline]
pub fn planar(world: Vec3) -> Vec2 {
    Vec2::new(world.x, world.z)
}
