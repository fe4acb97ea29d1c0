//! Timed pushes that fade out
//!
//! A push of `force` lasting `duration` seconds contributes a force that
//! shrinks linearly to zero over simulated time. It is sampled exactly once
//! per tick by the owning tether, so the decay is frame-rate independent.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An in-flight decaying push
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingImpulse {
    /// Force at the moment the push started
    pub base_force: Vec2,
    /// Seconds until the force reaches zero
    pub duration: f32,
    /// Seconds sampled so far
    pub elapsed: f32,
}

impl PendingImpulse {
    /// Fraction of the decay completed, in [0, 1]
    #[inline]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Holds at most one decaying push. A new push replaces the old one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpulseDecay {
    pending: Option<PendingImpulse>,
}

impl ImpulseDecay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new push, discarding whatever was left of the previous one.
    ///
    /// A non-positive (or NaN) duration means the push has already fully
    /// decayed and contributes nothing.
    pub fn apply(&mut self, force: Vec2, duration: f32) {
        if !(duration.is_finite() && duration > 0.0) {
            log::debug!("impulse {force:?} with duration {duration} expires immediately");
            self.pending = None;
            return;
        }

        self.pending = Some(PendingImpulse {
            base_force: force,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advance the push by `dt` and return the force for this tick
    pub fn sample(&mut self, dt: f32) -> Vec2 {
        let Some(impulse) = self.pending.as_mut() else {
            return Vec2::ZERO;
        };

        impulse.elapsed += dt;
        let t = impulse.progress();
        let force = impulse.base_force.lerp(Vec2::ZERO, t);

        if t >= 1.0 {
            self.pending = None;
        }

        force
    }

    /// Whether a push is still decaying
    #[inline]
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingImpulse> {
        self.pending.as_ref()
    }

    /// Drop any in-flight push
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
