//! Deterministic simulation module
//!
//! All towing logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or input dependencies

pub mod anchor;
pub mod blast;
pub mod impulse;
pub mod state;
pub mod tether;
pub mod tick;

pub use anchor::{Anchor, PlaneConfig, TowPlane};
pub use blast::{BlastConfig, blast_force, detonate};
pub use impulse::{ImpulseDecay, PendingImpulse};
pub use state::{TowEvent, TowState, Towed, TowedKind};
pub use tether::{LeashState, Tether, TetherConfig};
pub use tick::{TickInput, tick};
