//! Integration tests for the SPH step driver.
//!
//! These verify the behaviours a host application depends on:
//! - S1: Density sampling (self kernel, neighbour symmetry)
//! - S2: Wall collision formula and containment
//! - S3: Deterministic replay from a seed
//! - S4: Surface classification
//! - S5: External force hook

use glam::Vec2;
use sim::{block_layout, kernels, SimParams, SphSimulation, SurfaceState};

const DT: f32 = 1.0 / 220.0;

fn weightless() -> SimParams {
    SimParams {
        gravity: 0.0,
        ..SimParams::default()
    }
}

// =============================================================================
// S1: Density sampling
// =============================================================================

#[test]
fn test_isolated_particle_has_exactly_the_self_density() {
    let params = weightless();
    let h = params.smoothing_radius;
    let mut sim = SphSimulation::new(params, vec![Vec2::new(0.5, 0.5)], 0).unwrap();
    sim.step(DT);
    assert_eq!(
        sim.densities[0],
        kernels::density(0.0, h),
        "an isolated interior particle must sample only itself"
    );
    assert_eq!(sim.states[0], SurfaceState::Interior);
}

#[test]
fn test_close_pair_exceeds_the_self_density() {
    let params = weightless();
    let h = params.smoothing_radius;
    let positions = vec![Vec2::new(0.49, 0.5), Vec2::new(0.51, 0.5)];
    let mut sim = SphSimulation::new(params, positions, 0).unwrap();
    sim.step(DT);
    for (i, &density) in sim.densities.iter().enumerate() {
        assert!(
            density > kernels::density(0.0, h),
            "particle {i}: density {density} should exceed the self kernel"
        );
    }
}

// =============================================================================
// S2: Wall collisions
// =============================================================================

#[test]
fn test_left_wall_crossing_clamps_and_damps() {
    const VX: f32 = -5.0;
    const DT_BIG: f32 = 0.02;

    let params = weightless();
    let mut sim = SphSimulation::new(params, vec![Vec2::new(0.05, 0.5)], 0).unwrap();
    sim.velocities[0] = Vec2::new(VX, 0.0);
    sim.step(DT_BIG);

    assert_eq!(
        sim.positions[0].x, params.particle_radius,
        "crossing particle must be clamped exactly to the wall offset"
    );
    // Partial non-elastic reduction, not a mirror reflection.
    let expected = VX - 2.0 * params.wall_damping * VX;
    assert_eq!(sim.velocities[0].x, expected);
    assert_eq!(sim.positions[0].y, 0.5, "y axis must be untouched");
}

#[test]
fn test_settling_block_stays_inside_the_walls() {
    const FRAMES: usize = 30;

    let params = SimParams::default();
    let radius = params.particle_radius;
    let mut sim = SphSimulation::new(params, block_layout(10), 1).unwrap();
    for _ in 0..FRAMES {
        sim.step(DT);
    }
    for (i, p) in sim.positions.iter().enumerate() {
        assert!(
            p.x >= radius && p.x <= 1.0 - radius && p.y >= radius && p.y <= 1.0 - radius,
            "particle {i} escaped: {p:?}"
        );
    }
    for (i, &density) in sim.densities.iter().enumerate() {
        assert!(density > 0.0, "particle {i}: non-positive density {density}");
    }
}

// =============================================================================
// S3: Deterministic replay
// =============================================================================

#[test]
fn test_coincident_pair_replays_bit_identically() {
    // Two particles in the same spot force the random-direction fallback
    // every frame; with equal seeds both runs must still agree bit for bit.
    let positions = vec![Vec2::new(0.5, 0.5); 2];
    let mut first = SphSimulation::new(SimParams::default(), positions.clone(), 99).unwrap();
    let mut second = SphSimulation::new(SimParams::default(), positions, 99).unwrap();

    for frame in 0..3 {
        first.step(DT);
        second.step(DT);
        assert_eq!(
            first.positions, second.positions,
            "frame {frame}: positions diverged under an identical seed"
        );
        assert_eq!(
            first.velocities, second.velocities,
            "frame {frame}: velocities diverged under an identical seed"
        );
    }
    // The fallback actually fired: the pair separated horizontally even
    // though nothing but gravity acts on the y axis.
    assert_ne!(
        first.positions[0].x, first.positions[1].x,
        "coincident pair never separated; the degenerate branch did not run"
    );
}

// =============================================================================
// S4: Surface classification
// =============================================================================

#[test]
fn test_block_rim_is_surface_and_core_is_interior() {
    const PER_SIDE: u32 = 30;

    let mut sim = SphSimulation::new(SimParams::default(), block_layout(PER_SIDE), 0).unwrap();
    sim.step(DT);

    let corner = 0usize;
    let core = (PER_SIDE / 2 * PER_SIDE + PER_SIDE / 2) as usize;
    assert_eq!(
        sim.states[corner],
        SurfaceState::Surface,
        "block corner should classify as surface"
    );
    assert_eq!(
        sim.states[core],
        SurfaceState::Interior,
        "block core should classify as interior"
    );
}

// =============================================================================
// S5: External force hook
// =============================================================================

#[test]
fn test_external_acceleration_is_added_scaled_by_dt() {
    let params = weightless();
    let mut sim = SphSimulation::new(params, vec![Vec2::new(0.4, 0.5)], 0).unwrap();
    sim.step_with_force(DT, |_, _, _| Vec2::new(50.0, 0.0));
    let expected_vx = 50.0 * DT;
    assert!(
        (sim.velocities[0].x - expected_vx).abs() < 1e-6,
        "external acceleration not integrated: {}",
        sim.velocities[0].x
    );
    assert!(sim.positions[0].x > 0.4, "particle did not move with the force");
}
