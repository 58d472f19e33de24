//! Simulation state and the per-frame step driver.
//!
//! Particle data is struct-of-arrays: a particle is an index into the
//! parallel `positions` / `velocities` / `densities` / ... vectors, all
//! allocated once for the run. A renderer consumes `positions`,
//! `velocities` and `states` read-only after each step.
//!
//! One step: build a fresh spatial index from current positions, predict
//! positions one look-ahead step out, sample densities, then integrate
//! every particle in ascending index order. The ordering is semantic:
//! velocities are written back in place during the sweep, so the viscosity
//! term of particle i sees this frame's velocities for j < i and last
//! frame's for j > i.

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::fluid;
use crate::params::{ParamsError, SimParams};
use crate::physics::{LOOKAHEAD_FACTOR, VELOCITY_EPSILON};
use crate::quadtree::QuadTree;

/// Where a particle sits relative to the fluid body. Renderers typically
/// colour-code this; the solver only ever writes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// Surrounded by fluid; the density-gradient normal cancelled out.
    #[default]
    Interior,
    /// The gradient normal survived: the particle bounds the fluid.
    Surface,
}

/// 2D SPH fluid on the unit square.
pub struct SphSimulation {
    pub params: SimParams,
    /// Current positions.
    pub positions: Vec<Vec2>,
    /// Positions at the start of the previous step. Kept for external
    /// renderers (motion trails, interpolation); the solver never reads it.
    pub prev_positions: Vec<Vec2>,
    /// Look-ahead positions, recomputed every step.
    pub predicted: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub densities: Vec<f32>,
    pub states: Vec<SurfaceState>,
    rng: ChaCha8Rng,
}

impl SphSimulation {
    /// Fixed particle count for the run, taken from `positions`; velocities
    /// start at zero. The seed fixes the coincident-pair direction fallback
    /// so runs replay bit-identically.
    pub fn new(params: SimParams, positions: Vec<Vec2>, seed: u64) -> Result<Self, ParamsError> {
        params.validate()?;
        let count = positions.len();
        Ok(Self {
            params,
            prev_positions: positions.clone(),
            predicted: vec![Vec2::ZERO; count],
            velocities: vec![Vec2::ZERO; count],
            densities: vec![0.0; count],
            states: vec![SurfaceState::Interior; count],
            positions,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Advance one frame with no external interaction force.
    pub fn step(&mut self, dt: f32) {
        self.step_with_force(dt, |_, _, _| Vec2::ZERO);
    }

    /// Advance one frame. `external` receives (index, current position,
    /// working velocity) and returns an extra acceleration; the driver only
    /// adds whatever vector it is given, scaled by dt. Pointer interaction
    /// (see [`crate::pointer`]) plugs in here.
    pub fn step_with_force<F>(&mut self, dt: f32, mut external: F)
    where
        F: FnMut(usize, Vec2, Vec2) -> Vec2,
    {
        let params = self.params;
        let h = params.smoothing_radius;
        let count = self.positions.len();

        // Build + predict. The index always covers the unit square and is
        // fed current positions; predicted positions only enter through the
        // queries below.
        let mut tree = QuadTree::new(Vec2::ZERO, Vec2::ONE, params.leaf_capacity);
        let lookahead = LOOKAHEAD_FACTOR * dt;
        for i in 0..count {
            self.predicted[i] = self.positions[i] + self.velocities[i] * lookahead;
            if !tree.insert(self.positions[i], i as u32) {
                // Outside the domain. Not fatal: the particle just has no
                // neighbours this frame and nobody sees it.
                log::warn!(
                    "particle {i} at {:?} is outside the domain this frame",
                    self.positions[i]
                );
            }
        }

        // Densities, sampled at the predicted positions against the
        // current-position index: neighbourhood membership lags the
        // measured distances by one predictor step.
        for i in 0..count {
            self.densities[i] = fluid::sample_density(i as u32, &tree, &self.predicted, h);
        }

        // Integrate, strictly ascending.
        for i in 0..count {
            let position = self.positions[i];
            let mut velocity = self.velocities[i];
            self.prev_positions[i] = position;

            // Gravity lands on the working copy only; the shared velocity
            // array still holds the pre-gravity value the force pass reads.
            velocity.y += params.gravity * dt;

            let (accel, state) = fluid::accelerate(
                i as u32,
                &tree,
                &self.predicted,
                &self.velocities,
                &self.densities,
                &params,
                &mut self.rng,
            );
            self.states[i] = state;
            velocity += accel * dt;

            velocity += external(i, position, velocity) * dt;

            // Kill sub-epsilon creep so settled fluid actually rests.
            if velocity.x.abs() <= VELOCITY_EPSILON {
                velocity.x = 0.0;
            }
            if velocity.y.abs() <= VELOCITY_EPSILON {
                velocity.y = 0.0;
            }

            let mut position = position + velocity * dt;

            // Per-axis wall resolution: clamp back inside and shed
            // velocity by 2·damping·v, a partial reduction rather than a
            // mirror reflection (for damping 0.98 the bounce comes out at
            // -0.96·v).
            let radius = params.particle_radius;
            if position.x - radius < 0.0 || position.x + radius > 1.0 {
                position.x = position.x.clamp(radius, 1.0 - radius);
                velocity.x -= 2.0 * params.wall_damping * velocity.x;
            }
            if position.y - radius < 0.0 || position.y + radius > 1.0 {
                position.y = position.y.clamp(radius, 1.0 - radius);
                velocity.y -= 2.0 * params.wall_damping * velocity.y;
            }

            self.positions[i] = position;
            self.velocities[i] = velocity;
        }
        // The tree drops here; nothing but the particle arrays survives
        // the frame.
    }
}

/// Square block of `per_side`² particles filling [0.3, 0.7]², the standard
/// starting condition for settling runs.
pub fn block_layout(per_side: u32) -> Vec<Vec2> {
    let count = per_side * per_side;
    let mut positions = Vec::with_capacity(count as usize);
    for i in 0..count {
        let col = i % per_side;
        let row = i / per_side;
        positions.push(Vec2::new(
            0.3 + 0.4 * (col as f32 + 0.5) / per_side as f32,
            0.3 + 0.4 * (row as f32 + 0.5) / per_side as f32,
        ));
    }
    positions
}
