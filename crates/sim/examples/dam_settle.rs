//! Settling diagnostic: a block of fluid dropped onto the floor of the
//! unit square, run headless, then stirred with a scripted pointer.
//!
//! Reports density statistics and the surface-particle count as the block
//! collapses; useful for eyeballing regressions without a renderer.
//!
//! Run with: cargo run -p sim --example dam_settle --release [config.toml]

use glam::Vec2;
use sim::{block_layout, PointerState, SimParams, SphSimulation, SurfaceState};

const SETTLE_FRAMES: usize = 600;
const STIR_FRAMES: usize = 120;
const REPORT_EVERY: usize = 60;
const SEED: u64 = 42;

fn report(frame: usize, sim: &SphSimulation) {
    let count = sim.particle_count() as f32;
    let avg = sim.densities.iter().sum::<f32>() / count;
    let max = sim.densities.iter().fold(f32::MIN, |a, &d| a.max(d));
    let surface = sim
        .states
        .iter()
        .filter(|&&s| s == SurfaceState::Surface)
        .count();
    let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
    for p in &sim.positions {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    println!("{frame:5} | {avg:11.1} | {max:11.1} | {surface:7} | {min_y:.3}..{max_y:.3}");
}

fn main() {
    env_logger::init();

    let params = match std::env::args().nth(1) {
        Some(path) => SimParams::load(path).expect("failed to load config"),
        None => SimParams::default(),
    };
    let dt = params.fixed_dt;

    let mut sim = SphSimulation::new(params, block_layout(30), SEED).expect("invalid parameters");
    println!("particles: {}", sim.particle_count());
    println!("dt: {dt:.6}  h: {}", params.smoothing_radius);
    println!("frame |    avg dens |    max dens | surface |    y-extent");

    for frame in 0..SETTLE_FRAMES {
        sim.step(dt);
        if frame % REPORT_EVERY == 0 {
            report(frame, &sim);
        }
    }

    // Drag an attracting pointer across the settled pool, the same
    // interaction a windowed host would feed from the mouse.
    println!("stirring:");
    for frame in 0..STIR_FRAMES {
        let pointer = PointerState {
            position: Vec2::new(0.2 + 0.6 * frame as f32 / STIR_FRAMES as f32, 0.15),
            primary_held: true,
            ..PointerState::default()
        };
        sim.step_with_force(dt, |_, position, velocity| {
            pointer.interaction_accel(position, velocity)
        });
        if frame % REPORT_EVERY == 0 {
            report(SETTLE_FRAMES + frame, &sim);
        }
    }
}
