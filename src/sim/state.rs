//! Simulation state
//!
//! `TowState` owns every plane and towed object in a session. Hosts hold it by
//! value and pass it to `tick`; there is no global registry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anchor::{PlaneConfig, TowPlane};
use super::blast::BlastConfig;
use super::tether::{Tether, TetherConfig};
use crate::error::{Result, TetherError};

/// What is on the end of a leash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TowedKind {
    Skier,
    Mine,
}

/// A towed entity and the plane it hangs off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Towed {
    pub id: u32,
    pub kind: TowedKind,
    /// Plane holding the leash
    pub anchor_id: u32,
    pub tether: Tether,
    /// Whether the leash ended the last tick taut
    #[serde(default)]
    pub taut: bool,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TowEvent {
    /// A beach bomb went off; `hits` lists the towed ids pushed
    Detonated { origin: Vec2, hits: Vec<u32> },
    /// A leash went from slack to taut
    LeashTaut { id: u32 },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowState {
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Beach bomb tuning
    pub blast: BlastConfig,
    /// Tow planes (sorted by id)
    pub planes: Vec<TowPlane>,
    /// Towed objects (sorted by id)
    pub towed: Vec<Towed>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<TowEvent>,
    /// Next entity ID
    next_id: u32,
}

impl TowState {
    pub fn new(blast: BlastConfig) -> Result<Self> {
        Ok(Self {
            time_ticks: 0,
            blast: blast.validate()?,
            planes: Vec::new(),
            towed: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a tow plane and return its id
    pub fn add_plane(&mut self, config: PlaneConfig, start: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.planes.push(TowPlane::new(id, start, config));
        log::info!("plane #{id} added at {start:?}");
        id
    }

    pub fn plane(&self, id: u32) -> Option<&TowPlane> {
        self.planes.iter().find(|p| p.id == id)
    }

    /// Tie a new object to plane `anchor_id`.
    ///
    /// Fails before anything is created if the plane doesn't exist or the
    /// config is unusable.
    pub fn attach(
        &mut self,
        kind: TowedKind,
        anchor_id: u32,
        config: TetherConfig,
        position: Vec2,
    ) -> Result<u32> {
        let anchor = self
            .plane(anchor_id)
            .map(|p| p.pos)
            .ok_or(TetherError::MissingAnchor { anchor_id })?;
        let tether = Tether::new(config, position, anchor)?;

        let id = self.next_entity_id();
        self.towed.push(Towed {
            id,
            kind,
            anchor_id,
            tether,
            taut: false,
        });
        log::info!("{kind:?} #{id} attached to plane #{anchor_id}");
        Ok(id)
    }

    pub fn towed(&self, id: u32) -> Option<&Towed> {
        self.towed.iter().find(|t| t.id == id)
    }

    pub fn towed_mut(&mut self, id: u32) -> Option<&mut Towed> {
        self.towed.iter_mut().find(|t| t.id == id)
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<TowEvent> {
        std::mem::take(&mut self.events)
    }
}
