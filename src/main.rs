//! Wave Tether - headless runner
//!
//! Usage: `wave-tether [settings.json] [seed]`
//!
//! Flies one plane up the river towing four skiers and two mines, steering
//! with a seeded RNG and dropping a beach bomb every few seconds. Output is
//! deterministic for a given seed.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use wave_tether::consts::SIM_DT;
use wave_tether::sim::{TickInput, TowEvent, TowState, TowedKind, tick};
use wave_tether::{Result, Settings, planar};

/// Simulated seconds per run
const RUN_SECONDS: u32 = 30;
/// Seconds between beach bombs
const BOMB_INTERVAL_SECONDS: u32 = 4;
/// Seconds between steering changes
const STEER_INTERVAL_SECONDS: f32 = 1.5;

fn main() {
    env_logger::init();
    log::info!("Wave Tether (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);

    if let Err(e) = run(&settings, seed) {
        log::error!("run failed: {e}");
        std::process::exit(1);
    }
}

fn run(settings: &Settings, seed: u64) -> Result<()> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut state = build_session(settings)?;
    let plane = state.planes[0].id;

    let ticks_per_second = (1.0 / SIM_DT).round() as u32;
    let total_ticks = RUN_SECONDS * ticks_per_second;
    let steer_every = (STEER_INTERVAL_SECONDS * ticks_per_second as f32) as u32;
    let bomb_every = BOMB_INTERVAL_SECONDS * ticks_per_second;

    let mut steer = 0.0;
    let mut blasts = 0;
    let mut taut_events = 0;

    for t in 1..=total_ticks {
        if t % steer_every == 0 {
            steer = rng.random_range(-1.0..=1.0);
        }

        let mut input = TickInput::steering(plane, steer);
        if t % bomb_every == 0 {
            // Land the bomb on the water somewhere near the pack of skiers
            let plane_pos = state.planes[0].pos;
            let impact = Vec3::new(
                plane_pos.x + rng.random_range(-6.0..6.0),
                0.0,
                plane_pos.y + rng.random_range(-14.0..-4.0),
            );
            input.detonations.push(planar(impact));
        }

        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                TowEvent::Detonated { origin, hits } => {
                    blasts += 1;
                    log::info!("t={:.2}s bomb at {origin:?} hit {hits:?}", t as f32 * SIM_DT);
                }
                TowEvent::LeashTaut { .. } => taut_events += 1,
            }
        }
    }

    log::info!(
        "finished {} ticks: {blasts} bombs, {taut_events} leash snaps",
        state.time_ticks
    );
    report(&state);
    Ok(())
}

fn build_session(settings: &Settings) -> Result<TowState> {
    let mut state = TowState::new(settings.blast)?;
    let plane = state.add_plane(settings.plane, Vec2::new(0.0, settings.tether.length));

    for x in [-4.5, -1.5, 1.5, 4.5] {
        state.attach(TowedKind::Skier, plane, settings.tether, Vec2::new(x, 0.0))?;
    }
    for x in [-8.0, 8.0] {
        state.attach(TowedKind::Mine, plane, settings.mine_tether, Vec2::new(x, -2.0))?;
    }

    Ok(state)
}

fn report(state: &TowState) {
    if let Some(plane) = state.planes.first() {
        println!("plane #{} at ({:.2}, {:.2})", plane.id, plane.pos.x, plane.pos.y);
    }
    for towed in &state.towed {
        let t = &towed.tether;
        println!(
            "{:?} #{}: pos ({:.2}, {:.2}) speed {:.2} leash {:.2}/{:.2}",
            towed.kind,
            towed.id,
            t.position().x,
            t.position().y,
            t.speed(),
            t.distance_to_anchor(),
            t.current_length(),
        );
    }
}
