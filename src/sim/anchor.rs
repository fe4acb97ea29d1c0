//! Anchors and the tow plane
//!
//! Anything with a planar position can hold the other end of a leash. The tow
//! plane is the usual anchor: it flies up the river at a constant speed and
//! strafes side to side within the river banks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CLAMP_WIDTH;
use crate::error::{Result, TetherError};

/// The fixed end of a leash
pub trait Anchor {
    /// Current position on the river plane
    fn planar_position(&self) -> Vec2;
}

impl Anchor for Vec2 {
    fn planar_position(&self) -> Vec2 {
        *self
    }
}

impl<T: Anchor + ?Sized> Anchor for &T {
    fn planar_position(&self) -> Vec2 {
        (**self).planar_position()
    }
}

/// Tow plane tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// Speed up the river (+Z, units/sec)
    pub forward_speed: f32,
    /// Sideways speed at full steer
    pub strafe_speed: f32,
    /// Half the river's width
    pub river_half_width: f32,
    /// Minimum distance the plane keeps from the banks
    pub river_border: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            forward_speed: 5.0,
            strafe_speed: 3.0,
            river_half_width: DEFAULT_CLAMP_WIDTH,
            river_border: 0.0,
        }
    }
}

impl PlaneConfig {
    pub fn validate(self) -> Result<Self> {
        let fields = [
            ("forward_speed", self.forward_speed),
            ("strafe_speed", self.strafe_speed),
            ("river_half_width", self.river_half_width),
            ("river_border", self.river_border),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TetherError::invalid(field, format!("{value} is not finite")));
            }
        }
        Ok(self)
    }

    /// How far either side of the river centre the plane may go
    pub fn clamp_width(&self) -> f32 {
        let width = self.river_half_width - self.river_border;
        if width > 0.0 { width } else { DEFAULT_CLAMP_WIDTH }
    }
}

/// Scripted plane that tows the skiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowPlane {
    pub id: u32,
    pub pos: Vec2,
    pub config: PlaneConfig,
}

impl TowPlane {
    pub fn new(id: u32, pos: Vec2, config: PlaneConfig) -> Self {
        Self { id, pos, config }
    }

    /// Fly forward and strafe by `steer` (-1 = full left, 1 = full right)
    pub fn step(&mut self, steer: f32, dt: f32) {
        let steer = if steer.is_finite() { steer.clamp(-1.0, 1.0) } else { 0.0 };

        let mut next = self.pos;
        next.y += self.config.forward_speed * dt;
        next.x += steer * self.config.strafe_speed * dt;

        let width = self.config.clamp_width();
        next.x = next.x.clamp(-width, width);

        self.pos = next;
    }
}

impl Anchor for TowPlane {
    fn planar_position(&self) -> Vec2 {
        self.pos
    }
}
