//! Beach bomb detonation
//!
//! When a thrown beach bomb hits the water it shoves every towed object within
//! its radius away from the impact point, plus a little extra up the river so
//! the push isn't swallowed by the constant backwards drag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Towed, TowedKind};
use crate::error::{Result, TetherError};

/// Beach bomb tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastConfig {
    /// Reach of the explosion on the river plane
    pub radius: f32,
    /// Push strength on skiers
    pub power: f32,
    /// Push strength on mines
    pub mine_power: f32,
    /// Additional push up the river (+Z) applied to everything hit
    pub extra_forwards_power: f32,
    /// Seconds over which the push fades out
    pub force_duration: f32,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            power: 20.0,
            mine_power: 30.0,
            extra_forwards_power: 5.0,
            force_duration: 0.5,
        }
    }
}

impl BlastConfig {
    pub fn validate(self) -> Result<Self> {
        let fields = [
            ("radius", self.radius),
            ("power", self.power),
            ("mine_power", self.mine_power),
            ("extra_forwards_power", self.extra_forwards_power),
            ("force_duration", self.force_duration),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TetherError::invalid(field, format!("{value} is not finite")));
            }
        }
        if self.radius < 0.0 {
            return Err(TetherError::invalid("radius", "must not be negative"));
        }
        Ok(self)
    }

    pub fn power_for(&self, kind: TowedKind) -> f32 {
        match kind {
            TowedKind::Skier => self.power,
            TowedKind::Mine => self.mine_power,
        }
    }
}

/// Push felt by a `kind` object at `target` from a blast at `origin`
pub fn blast_force(config: &BlastConfig, kind: TowedKind, target: Vec2, origin: Vec2) -> Vec2 {
    let away = (target - origin).normalize_or_zero();
    away * config.power_for(kind) + Vec2::new(0.0, config.extra_forwards_power)
}

/// Apply a blast at `origin` to every towed object in range.
///
/// Returns the ids of the objects that were pushed.
pub fn detonate<'a>(
    config: &BlastConfig,
    origin: Vec2,
    targets: impl IntoIterator<Item = &'a mut Towed>,
) -> Vec<u32> {
    let mut hits = Vec::new();

    for towed in targets {
        let pos = towed.tether.position();
        if pos.distance(origin) > config.radius || !towed.tether.is_active() {
            continue;
        }

        let force = blast_force(config, towed.kind, pos, origin);
        towed.tether.apply_force_over_time(force, config.force_duration);
        log::debug!("blast at {origin:?} pushed {:?} #{} with {force:?}", towed.kind, towed.id);
        hits.push(towed.id);
    }

    hits
}
