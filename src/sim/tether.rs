//! Tether motion model
//!
//! A towed object is dragged backwards (down the river) by a constant force,
//! soft-limited per axis, and kept on a leash around a moving anchor. Velocity
//! is never integrated on its own: after the leash clamps the position, the
//! velocity is re-derived from the actual displacement so the two can't drift
//! apart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::impulse::ImpulseDecay;
use crate::consts::LEASH_SLACK;
use crate::error::{Result, TetherError};

/// Per-object tuning, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Constant force pulling the object down the river (-Z)
    pub backwards_drag: f32,
    /// Initial leash length
    pub length: f32,
    /// How fast an out-of-range leash drifts back (units/sec)
    pub change_speed: f32,
    pub min_length: f32,
    pub max_length: f32,
    /// Sideways speed above which resistance kicks in
    pub velocity_cap_x: f32,
    /// Forward/back speed above which resistance kicks in
    pub velocity_cap_z: f32,
    /// Divisor applied to sideways velocity while over the cap
    pub resistance_x: f32,
    /// Divisor applied to forward/back velocity while over the cap
    pub resistance_z: f32,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            backwards_drag: 5.0,
            length: 10.0,
            change_speed: 2.0,
            min_length: 6.0,
            max_length: 14.0,
            velocity_cap_x: 2.5,
            velocity_cap_z: 2.5,
            resistance_x: 1.1,
            resistance_z: 1.1,
        }
    }
}

impl TetherConfig {
    /// Check the config and normalise it.
    ///
    /// Inverted length bounds are swapped rather than rejected.
    pub fn validate(mut self) -> Result<Self> {
        let fields = [
            ("backwards_drag", self.backwards_drag),
            ("length", self.length),
            ("change_speed", self.change_speed),
            ("min_length", self.min_length),
            ("max_length", self.max_length),
            ("velocity_cap_x", self.velocity_cap_x),
            ("velocity_cap_z", self.velocity_cap_z),
            ("resistance_x", self.resistance_x),
            ("resistance_z", self.resistance_z),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TetherError::invalid(field, format!("{value} is not finite")));
            }
        }

        if self.resistance_x <= 0.0 {
            return Err(TetherError::invalid("resistance_x", "must be positive"));
        }
        if self.resistance_z <= 0.0 {
            return Err(TetherError::invalid("resistance_z", "must be positive"));
        }
        if self.change_speed < 0.0 {
            return Err(TetherError::invalid("change_speed", "must not be negative"));
        }

        if self.min_length > self.max_length {
            log::warn!(
                "tether min_length {} > max_length {}, swapping",
                self.min_length,
                self.max_length
            );
            std::mem::swap(&mut self.min_length, &mut self.max_length);
        }

        if self.min_length < 0.0 {
            return Err(TetherError::invalid("min_length", "must not be negative"));
        }
        if self.length < 0.0 {
            return Err(TetherError::invalid("length", "must not be negative"));
        }

        Ok(self)
    }
}

/// What the leash did during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeashState {
    /// Tether inactive, nothing moved
    Frozen,
    /// Object moved freely inside the leash
    Slack,
    /// Object was pulled back onto the leash circle
    Taut,
}

/// A towed object on a leash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tether {
    config: TetherConfig,
    position: Vec2,
    velocity: Vec2,
    current_length: f32,
    active: bool,
    /// Anchor position seen on the most recent tick
    anchor: Vec2,
    impulse: ImpulseDecay,
    /// One-tick push from `apply_instantaneous`, consumed by the next tick
    queued_force: Vec2,
}

impl Tether {
    /// Create an active tether at rest
    pub fn new(config: TetherConfig, position: Vec2, anchor: Vec2) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            position,
            velocity: Vec2::ZERO,
            current_length: config.length,
            active: true,
            anchor,
            impulse: ImpulseDecay::new(),
            queued_force: Vec2::ZERO,
        })
    }

    /// Advance one step toward `anchor`.
    ///
    /// Length drift happens before the leash check, and the decaying impulse
    /// is sampled before velocity integration.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn tick(&mut self, anchor: Vec2, dt: f32) -> LeashState {
        self.anchor = anchor;

        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("treating invalid dt {dt} as zero");
            0.0
        };

        if !self.active {
            // Timed pushes keep running out while frozen
            self.impulse.sample(dt);
            self.queued_force = Vec2::ZERO;
            return LeashState::Frozen;
        }

        self.adjust_length(dt);

        let force = self.drag() + self.impulse.sample(dt) + std::mem::take(&mut self.queued_force);
        let velocity = self.resist(self.velocity + force * dt);

        let mut next = self.position + velocity * dt;
        let offset = next - anchor;
        let taut = offset.length() > self.current_length - LEASH_SLACK;
        if taut {
            next = anchor + offset.normalize_or_zero() * self.current_length;
        }

        if dt != 0.0 {
            self.velocity = (next - self.position) / dt;
        }
        self.position = next;

        if taut { LeashState::Taut } else { LeashState::Slack }
    }

    /// Drift the leash length back toward [min, max] without overshooting
    fn adjust_length(&mut self, dt: f32) {
        let step = self.config.change_speed * dt;
        if self.current_length > self.config.max_length {
            self.current_length = (self.current_length - step).max(self.config.max_length);
        } else if self.current_length < self.config.min_length {
            self.current_length = (self.current_length + step).min(self.config.min_length);
        }
    }

    #[inline]
    fn drag(&self) -> Vec2 {
        Vec2::new(0.0, -self.config.backwards_drag)
    }

    /// Soft per-axis limiter: over-cap components are divided, not truncated
    fn resist(&self, mut velocity: Vec2) -> Vec2 {
        if velocity.x.abs() > self.config.velocity_cap_x {
            velocity.x /= self.config.resistance_x;
        }
        if velocity.y.abs() > self.config.velocity_cap_z {
            velocity.y /= self.config.resistance_z;
        }
        velocity
    }

    // === Forces ===

    /// Push with a force that fades to zero over `duration` seconds.
    /// Replaces any push still in flight. Ignored while the tether is inactive.
    pub fn apply_force_over_time(&mut self, force: Vec2, duration: f32) {
        if !self.active {
            log::debug!("ignoring timed force {force:?} on inactive tether");
            return;
        }
        self.impulse.apply(force, duration);
    }

    /// Add a force to the next tick only.
    ///
    /// Dropped while a timed push is decaying; returns whether it was accepted.
    pub fn apply_instantaneous(&mut self, force: Vec2) -> bool {
        if self.impulse.is_active() {
            log::trace!("dropping instantaneous force {force:?}, timed push active");
            return false;
        }
        self.queued_force += force;
        true
    }

    /// Whether a timed push is still decaying
    pub fn under_timed_force(&self) -> bool {
        self.impulse.is_active()
    }

    // === Queries ===

    /// Planar distance to the anchor seen on the last tick
    pub fn distance_to_anchor(&self) -> f32 {
        (self.position - self.anchor).length()
    }

    /// Unit direction of travel (zero when stationary)
    pub fn direction(&self) -> Vec2 {
        self.velocity.normalize_or_zero()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Absolute sideways speed
    pub fn speed_along_x(&self) -> f32 {
        self.velocity.x.abs()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn current_length(&self) -> f32 {
        self.current_length
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &TetherConfig {
        &self.config
    }

    // === Mutators ===

    /// Divide velocity by `factor` (gameplay slow-downs)
    pub fn set_velocity_scale(&mut self, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring velocity scale factor {factor}");
            return;
        }
        self.velocity /= factor;
    }

    pub fn reset_velocity(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Override the leash length; it drifts back into range on later ticks.
    /// Negative lengths are ignored.
    pub fn set_length(&mut self, length: f32) {
        if length.is_finite() && length >= 0.0 {
            self.current_length = length;
        }
    }

    /// Teleport (respawn) the object, clearing its velocity and any pushes
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.impulse.clear();
        self.queued_force = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tether_at(pos: Vec2) -> Tether {
        Tether::new(TetherConfig::default(), pos, Vec2::ZERO).unwrap()
    }

    #[test]
    fn test_inactive_is_frozen() {
        let mut t = tether_at(Vec2::new(1.0, 2.0));
        t.tick(Vec2::ZERO, 0.1);
        let (pos, vel) = (t.position(), t.velocity());

        t.set_active(false);
        for _ in 0..5 {
            assert_eq!(t.tick(Vec2::new(30.0, 30.0), 0.1), LeashState::Frozen);
        }
        assert_eq!(t.position(), pos);
        assert_eq!(t.velocity(), vel);
    }

    #[test]
    fn test_drag_pulls_backwards_inside_leash() {
        // Start at (0, 5) on a 10-unit leash, anchor at origin
        let mut t = tether_at(Vec2::new(0.0, 5.0));
        let mut last_z = t.position().y;

        for _ in 0..10 {
            t.tick(Vec2::ZERO, 0.1);
            let z = t.position().y;
            assert!(z < last_z, "z should decrease: {z} !< {last_z}");
            assert!(t.distance_to_anchor() <= 10.0 + 1e-4);
            assert_eq!(t.position().x, 0.0);
            last_z = z;
        }
    }

    #[test]
    fn test_outward_at_boundary_clamps_to_length() {
        let mut t = tether_at(Vec2::new(0.0, -(10.0 - LEASH_SLACK)));
        // Moving outward (down the river) fast
        t.velocity = Vec2::new(0.0, -2.0);

        assert_eq!(t.tick(Vec2::ZERO, 0.1), LeashState::Taut);
        assert!((t.distance_to_anchor() - 10.0).abs() < 1e-4);
        assert!((t.position() - Vec2::new(0.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn test_velocity_derived_from_clamped_move() {
        let mut t = tether_at(Vec2::new(0.0, -10.0));
        t.velocity = Vec2::new(0.0, -2.0);

        t.tick(Vec2::ZERO, 0.1);
        // Pinned to the leash, so effectively no motion
        assert!(t.speed() < 1e-3);
    }

    #[test]
    fn test_zero_dt_keeps_velocity() {
        let mut t = tether_at(Vec2::new(0.0, 0.0));
        t.velocity = Vec2::new(1.5, -0.5);

        t.tick(Vec2::ZERO, 0.0);
        assert_eq!(t.velocity(), Vec2::new(1.5, -0.5));
        assert_eq!(t.position(), Vec2::ZERO);
    }

    #[test]
    fn test_resistance_divides_over_cap() {
        let config = TetherConfig {
            backwards_drag: 0.0,
            velocity_cap_x: 1.0,
            resistance_x: 2.0,
            ..Default::default()
        };
        let mut t = Tether::new(config, Vec2::ZERO, Vec2::ZERO).unwrap();
        t.velocity = Vec2::new(4.0, 0.0);

        t.tick(Vec2::ZERO, 0.5);
        // 4.0 / 2.0 rather than a hard clamp to 1.0
        assert_eq!(t.velocity().x, 2.0);

        t.tick(Vec2::ZERO, 0.5);
        assert_eq!(t.velocity().x, 1.0);

        // At the cap, no further resistance
        t.tick(Vec2::ZERO, 0.5);
        assert_eq!(t.velocity().x, 1.0);
        assert_eq!(t.position().x, 2.0);
    }

    #[test]
    fn test_length_drifts_without_overshoot() {
        let mut t = tether_at(Vec2::ZERO);
        t.set_length(14.5);

        t.tick(Vec2::ZERO, 0.1);
        assert!((t.current_length() - 14.3).abs() < 1e-4);

        t.tick(Vec2::ZERO, 1.0);
        assert_eq!(t.current_length(), 14.0);

        t.set_length(5.9);
        t.tick(Vec2::ZERO, 1.0);
        assert_eq!(t.current_length(), 6.0);
    }

    #[test]
    fn test_timed_force_blocks_instantaneous() {
        let mut t = tether_at(Vec2::ZERO);
        assert!(t.apply_instantaneous(Vec2::new(1.0, 0.0)));

        t.apply_force_over_time(Vec2::new(0.0, 10.0), 1.0);
        assert!(t.under_timed_force());
        assert!(!t.apply_instantaneous(Vec2::new(1.0, 0.0)));

        for _ in 0..4 {
            t.tick(Vec2::ZERO, 0.25);
        }
        assert!(!t.under_timed_force());
        assert!(t.apply_instantaneous(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_instantaneous_lasts_one_tick() {
        let config = TetherConfig {
            backwards_drag: 0.0,
            ..Default::default()
        };
        let mut t = Tether::new(config, Vec2::ZERO, Vec2::ZERO).unwrap();

        t.apply_instantaneous(Vec2::new(2.0, 0.0));
        t.tick(Vec2::ZERO, 0.5);
        assert!((t.velocity().x - 1.0).abs() < 1e-5);

        // No new force: velocity carries over unchanged
        t.tick(Vec2::ZERO, 0.5);
        assert!((t.velocity().x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_timed_force_ignored_when_inactive() {
        let mut t = tether_at(Vec2::ZERO);
        t.set_active(false);
        t.apply_force_over_time(Vec2::new(0.0, 10.0), 1.0);
        assert!(!t.under_timed_force());
    }

    #[test]
    fn test_queries() {
        let mut t = tether_at(Vec2::new(3.0, 4.0));
        assert_eq!(t.distance_to_anchor(), 5.0);
        assert_eq!(t.direction(), Vec2::ZERO);

        t.velocity = Vec2::new(-3.0, 4.0);
        assert_eq!(t.speed(), 5.0);
        assert_eq!(t.speed_along_x(), 3.0);
        assert!((t.direction() - Vec2::new(-0.6, 0.8)).length() < 1e-6);

        t.set_velocity_scale(2.0);
        assert_eq!(t.velocity(), Vec2::new(-1.5, 2.0));
        t.set_velocity_scale(0.0);
        assert_eq!(t.velocity(), Vec2::new(-1.5, 2.0));

        t.reset_velocity();
        assert_eq!(t.speed(), 0.0);
    }

    #[test]
    fn test_respawn_clears_motion() {
        let mut t = tether_at(Vec2::ZERO);
        t.apply_force_over_time(Vec2::new(5.0, 5.0), 2.0);
        t.tick(Vec2::ZERO, 0.1);

        t.set_position(Vec2::new(1.0, 1.0));
        assert_eq!(t.velocity(), Vec2::ZERO);
        assert!(!t.under_timed_force());
    }

    #[test]
    fn test_config_validation() {
        let swapped = TetherConfig {
            min_length: 14.0,
            max_length: 6.0,
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!((swapped.min_length, swapped.max_length), (6.0, 14.0));

        let bad = TetherConfig {
            resistance_z: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(TetherError::InvalidConfig { field: "resistance_z", .. })
        ));

        let bad = TetherConfig {
            backwards_drag: f32::INFINITY,
            ..Default::default()
        };
        assert!(Tether::new(bad, Vec2::ZERO, Vec2::ZERO).is_err());

        let negative = TetherConfig {
            length: -3.0,
            min_length: -5.0,
            max_length: -2.0,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(TetherError::InvalidConfig { field: "min_length", .. })
        ));

        let negative = TetherConfig {
            length: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(TetherError::InvalidConfig { field: "length", .. })
        ));
    }

    #[test]
    fn test_negative_length_override_ignored() {
        let mut t = tether_at(Vec2::new(0.0, -3.0));
        t.set_length(-3.0);
        assert_eq!(t.current_length(), 10.0);

        t.tick(Vec2::ZERO, 0.1);
        assert!(t.distance_to_anchor() <= t.current_length());
    }

    #[test]
    fn test_timed_force_expires_while_frozen() {
        let mut t = tether_at(Vec2::ZERO);
        t.apply_force_over_time(Vec2::new(0.0, 10.0), 1.0);
        t.set_active(false);

        for _ in 0..6 {
            assert_eq!(t.tick(Vec2::ZERO, 0.25), LeashState::Frozen);
        }
        assert!(!t.under_timed_force());

        // Reactivated: only drag acts, no leftover push
        t.set_active(true);
        t.tick(Vec2::ZERO, 0.5);
        assert!(t.velocity().y < 0.0);
    }

    #[test]
    fn test_invalid_dt_treated_as_zero() {
        let mut t = tether_at(Vec2::ZERO);
        t.velocity = Vec2::new(1.0, -0.5);
        t.set_length(15.0);

        t.tick(Vec2::ZERO, -0.5);
        assert_eq!(t.current_length(), 15.0);
        assert_eq!(t.position(), Vec2::ZERO);
        assert_eq!(t.velocity(), Vec2::new(1.0, -0.5));

        t.tick(Vec2::ZERO, f32::NAN);
        assert_eq!(t.position(), Vec2::ZERO);
        assert_eq!(t.velocity(), Vec2::new(1.0, -0.5));
    }

    proptest! {
        #[test]
        fn prop_leash_never_exceeded(
            start in (-9.0f32..9.0, -9.0f32..9.0),
            moves in prop::collection::vec((-3.0f32..3.0, -3.0f32..3.0, -40.0f32..40.0, 0.0f32..0.1), 1..40),
        ) {
            let mut t = Tether::new(
                TetherConfig::default(),
                Vec2::new(start.0, start.1) * 0.7,
                Vec2::ZERO,
            ).unwrap();
            let mut anchor = Vec2::ZERO;

            for (dx, dz, push, dt) in moves {
                anchor += Vec2::new(dx, dz);
                t.apply_instantaneous(Vec2::new(push, -push));
                t.tick(anchor, dt);
                prop_assert!(t.distance_to_anchor() <= t.current_length() + 1e-3);
            }
        }

        #[test]
        fn prop_length_moves_toward_range(initial in 0.0f32..30.0, dt in 0.0f32..2.0) {
            let mut t = tether_at(Vec2::ZERO);
            t.set_length(initial);
            t.tick(Vec2::ZERO, dt);

            let after = t.current_length();
            let (min, max) = (6.0, 14.0);
            if initial > max {
                prop_assert!(after <= initial && after >= max);
            } else if initial < min {
                prop_assert!(after >= initial && after <= min);
            } else {
                prop_assert_eq!(after, initial);
            }
        }

        #[test]
        fn prop_inactive_never_moves(
            pos in (-5.0f32..5.0, -5.0f32..5.0),
            anchor in (-50.0f32..50.0, -50.0f32..50.0),
            dt in 0.0f32..1.0,
        ) {
            let mut t = tether_at(Vec2::new(pos.0, pos.1));
            t.set_active(false);
            t.apply_instantaneous(Vec2::new(100.0, 100.0));
            t.tick(Vec2::new(anchor.0, anchor.1), dt);
            prop_assert_eq!(t.position(), Vec2::new(pos.0, pos.1));
            prop_assert_eq!(t.velocity(), Vec2::ZERO);
        }
    }
}
