//! Per-frame simulation tick
//!
//! Order within a tick: planes move, queued detonations push their targets,
//! then every towed object is integrated against its plane's new position.

use std::collections::BTreeMap;

use glam::Vec2;

use super::anchor::Anchor;
use super::blast::detonate;
use super::state::{TowEvent, TowState};
use super::tether::LeashState;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering per plane id (-1 = full left, 1 = full right)
    pub steer: BTreeMap<u32, f32>,
    /// Beach bombs landing this tick (impact points)
    pub detonations: Vec<Vec2>,
}

impl TickInput {
    /// Input steering a single plane
    pub fn steering(plane_id: u32, steer: f32) -> Self {
        let mut input = Self::default();
        input.steer.insert(plane_id, steer);
        input
    }
}

/// Advance the session by one step
pub fn tick(state: &mut TowState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    for plane in &mut state.planes {
        let steer = input.steer.get(&plane.id).copied().unwrap_or(0.0);
        plane.step(steer, dt);
    }

    // Pushes must land before integration so this tick already feels them
    for &origin in &input.detonations {
        let hits = detonate(&state.blast, origin, state.towed.iter_mut());
        log::info!("beach bomb at {origin:?} hit {} object(s)", hits.len());
        state.events.push(TowEvent::Detonated { origin, hits });
    }

    let anchors: BTreeMap<u32, Vec2> = state
        .planes
        .iter()
        .map(|p| (p.id, p.planar_position()))
        .collect();

    for towed in &mut state.towed {
        let Some(&anchor) = anchors.get(&towed.anchor_id) else {
            log::warn!("towed #{} lost plane #{}", towed.id, towed.anchor_id);
            continue;
        };

        let leash = towed.tether.tick(anchor, dt);
        let taut = leash == LeashState::Taut;
        if taut && !towed.taut {
            state.events.push(TowEvent::LeashTaut { id: towed.id });
        }
        if leash != LeashState::Frozen {
            towed.taut = taut;
        }
    }
}
