//! Per-particle density estimation and force accumulation.
//!
//! Both passes run the same neighbourhood query: a box of half-extent h
//! around the particle against the frame's spatial index, with hits
//! filtered by squared distance against h². The estimator turns neighbour
//! kernel weights into a density sample; the accumulator turns the same
//! neighbourhood into a pressure + viscosity + surface-tension
//! acceleration and decides whether the particle sits on the surface.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::PI;

use crate::kernels;
use crate::params::SimParams;
use crate::physics::{MIN_NEIGHBOUR_DISTANCE, SURFACE_NORMAL_THRESHOLD};
use crate::quadtree::QuadTree;
use crate::sph::SurfaceState;

/// Area of a disc over the area of its bounding square. The boundary
/// correction divides by it so a particle in open fluid ends at weight 1.
const DISC_AREA_RATIO: f32 = PI / 4.0;

/// Random unit direction, angle uniform over [-π, π).
///
/// Stands in for the pair direction when two particles coincide.
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec2 {
    let t = rng.gen_range(-PI..PI);
    Vec2::new(t.sin(), t.cos())
}

/// Density sample for particle `index`.
///
/// `positions` are the predicted positions for this frame; the tree was
/// built from current positions, so membership of the neighbourhood is
/// one predictor step staler than the distances measured inside it.
pub fn sample_density(index: u32, tree: &QuadTree, positions: &[Vec2], h: f32) -> f32 {
    let p = positions[index as usize];
    let mut density = kernels::density(0.0, h);

    let hits = tree.query(Vec2::new(p.x - h, p.y - h), Vec2::new(p.x + h, p.y + h));
    for j in hits.iter() {
        if j == index {
            continue;
        }
        let delta = positions[j as usize] - p;
        let dd = delta.length_squared();
        if dd <= h * h {
            density += kernels::density(dd.sqrt(), h);
        }
    }

    // Near a wall part of the query disc hangs outside the domain where no
    // neighbours can exist, which reads as artificially low density and
    // makes the fluid balloon into the walls. Scale by the uncovered area.
    let mut boundary_weight = 1.0;
    if p.x - h < 0.0 || p.x + h > 1.0 || p.y - h < 0.0 || p.y + h > 1.0 {
        let box_area = 4.0 * h * h;
        let min_x = (p.x - h).max(0.0);
        let min_y = (p.y - h).max(0.0);
        let max_x = (p.x + h).min(1.0);
        let max_y = (p.y + h).min(1.0);
        // Not guarded against a vanishing clipped area; particles are kept
        // at least particle_radius inside the domain by the collision pass.
        boundary_weight = box_area / (DISC_AREA_RATIO * (max_x - min_x) * (max_y - min_y)).abs();
    }
    density * boundary_weight
}

/// Acceleration and surface classification for particle `index`.
///
/// `positions` are predicted, `velocities` and `densities` are the live
/// per-particle arrays. The caller integrates sequentially and writes
/// velocities back in place, so neighbours below `index` are seen with
/// this frame's velocity and neighbours above with the previous one.
pub fn accelerate<R: Rng>(
    index: u32,
    tree: &QuadTree,
    positions: &[Vec2],
    velocities: &[Vec2],
    densities: &[f32],
    params: &SimParams,
    rng: &mut R,
) -> (Vec2, SurfaceState) {
    let i = index as usize;
    let h = params.smoothing_radius;
    let p = positions[i];
    let vel = velocities[i];

    let pressure = (densities[i] - params.rest_density) * params.stiffness;
    let density_inv = 1.0 / densities[i];
    let density_inv2 = density_inv * density_inv;

    let mut accel = Vec2::ZERO;
    let mut normal = Vec2::ZERO;
    let mut curvature = 0.0;

    let hits = tree.query(Vec2::new(p.x - h, p.y - h), Vec2::new(p.x + h, p.y + h));
    for j in hits.iter() {
        if j == index {
            continue;
        }
        let jj = j as usize;
        let mut delta = positions[jj] - p;
        let dd = delta.length_squared();
        if dd > h * h {
            continue;
        }
        let d = dd.sqrt();

        let other_density_inv = 1.0 / densities[jj];
        let other_pressure = (densities[jj] - params.rest_density) * params.stiffness;
        let c = kernels::density_derivative(d, h)
            * (pressure * density_inv2 + other_pressure * other_density_inv);

        if d < MIN_NEIGHBOUR_DISTANCE {
            // Coincident pair: no usable direction, push somewhere random
            // so the pressure impulse still separates the two. Surface
            // terms are skipped in this branch.
            delta = random_unit_vector(rng);
        } else {
            let surface_weight = kernels::surface_tension_derivative(d, h) * other_density_inv;
            normal += delta * surface_weight;
            delta /= d;
            curvature += kernels::surface_tension_laplacian(dd, h) * other_density_inv;
        }
        accel += delta * c;

        let c = params.viscosity_coefficient * kernels::viscosity_laplacian(d, h) * other_density_inv;
        accel += (velocities[jj] - vel) * c;
    }

    let mut state = SurfaceState::Interior;
    let normal_len = normal.length();
    if normal_len > SURFACE_NORMAL_THRESHOLD {
        normal /= normal_len;
        accel += normal * (params.surface_coefficient * curvature);
        state = SurfaceState::Surface;
    }

    (accel / densities[i], state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn random_unit_vector_has_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5, "|{v:?}| != 1");
        }
    }

    #[test]
    fn isolated_particle_keeps_the_self_density() {
        let params = SimParams::default();
        let h = params.smoothing_radius;
        let positions = [Vec2::new(0.5, 0.5)];
        let mut tree = QuadTree::new(Vec2::ZERO, Vec2::ONE, params.leaf_capacity);
        tree.insert(positions[0], 0);
        let density = sample_density(0, &tree, &positions, h);
        assert_eq!(density, kernels::density(0.0, h));
    }

    #[test]
    fn wall_proximity_inflates_density() {
        let params = SimParams::default();
        let h = params.smoothing_radius;
        let positions = [Vec2::new(0.01, 0.5)];
        let mut tree = QuadTree::new(Vec2::ZERO, Vec2::ONE, params.leaf_capacity);
        tree.insert(positions[0], 0);
        let near_wall = sample_density(0, &tree, &positions, h);
        assert!(
            near_wall > kernels::density(0.0, h),
            "boundary weight should inflate: {near_wall}"
        );
    }

    #[test]
    fn symmetric_pair_accelerates_apart_evenly() {
        let params = SimParams::default();
        let h = params.smoothing_radius;
        let positions = [Vec2::new(0.5 - 0.01, 0.5), Vec2::new(0.5 + 0.01, 0.5)];
        let velocities = [Vec2::ZERO; 2];
        let mut tree = QuadTree::new(Vec2::ZERO, Vec2::ONE, params.leaf_capacity);
        tree.insert(positions[0], 0);
        tree.insert(positions[1], 1);
        let densities = [
            sample_density(0, &tree, &positions, h),
            sample_density(1, &tree, &positions, h),
        ];
        assert!(densities[0] > kernels::density(0.0, h));
        assert_eq!(densities[0], densities[1]);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (a0, _) = accelerate(0, &tree, &positions, &velocities, &densities, &params, &mut rng);
        let (a1, _) = accelerate(1, &tree, &positions, &velocities, &densities, &params, &mut rng);
        assert!(
            (a0.x + a1.x).abs() <= a0.x.abs() * 1e-4,
            "horizontal accelerations not opposite: {} vs {}",
            a0.x,
            a1.x
        );
    }

    #[test]
    fn dense_cluster_marks_its_rim_as_surface() {
        let params = SimParams::default();
        let h = params.smoothing_radius;
        // A lone pair is all rim: the gradient normal has nothing to cancel it.
        let positions = [Vec2::new(0.5, 0.5), Vec2::new(0.5 + 0.02, 0.5)];
        let velocities = [Vec2::ZERO; 2];
        let mut tree = QuadTree::new(Vec2::ZERO, Vec2::ONE, params.leaf_capacity);
        tree.insert(positions[0], 0);
        tree.insert(positions[1], 1);
        let densities = [
            sample_density(0, &tree, &positions, h),
            sample_density(1, &tree, &positions, h),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let (_, state) = accelerate(0, &tree, &positions, &velocities, &densities, &params, &mut rng);
        assert_eq!(state, SurfaceState::Surface);
    }
}
