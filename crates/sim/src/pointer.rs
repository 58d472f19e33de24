//! Pointer-driven interaction forces.
//!
//! The solver never reads input devices. The host polls the pointer,
//! packs the result into a [`PointerState`] and hands the per-particle
//! acceleration to [`crate::sph::SphSimulation::step_with_force`].

use glam::Vec2;

/// Pull strength toward (or push away from) the pointer.
const PULL_STRENGTH: f32 = 5e2;
/// Velocity drag applied while attracting, so grabbed fluid settles on
/// the pointer instead of orbiting it.
const PULL_DRAG: f32 = 1e1;
/// Squared reach of the interaction.
const REACH_SQUARED: f32 = 4e-2;

/// Pointer position and button state for one frame, in domain coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    pub position: Vec2,
    /// Primary button held: attract nearby particles.
    pub primary_held: bool,
    /// Secondary button held: repel nearby particles.
    pub secondary_held: bool,
}

impl PointerState {
    /// Acceleration contributed to a particle at `position` moving at
    /// `velocity`. Zero outside the reach or with no button held; both
    /// buttons at once apply both effects.
    pub fn interaction_accel(&self, position: Vec2, velocity: Vec2) -> Vec2 {
        let mut accel = Vec2::ZERO;
        let delta = self.position - position;
        if self.primary_held && delta.length_squared() < REACH_SQUARED {
            accel += delta * PULL_STRENGTH - velocity * PULL_DRAG;
        }
        if self.secondary_held && delta.length_squared() < REACH_SQUARED {
            accel -= delta * PULL_STRENGTH;
        }
        accel
    }
}
