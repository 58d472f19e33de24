//! Unified numerical constants for the SPH solver.
//!
//! All simulation modules should use these constants instead of defining
//! their own. This prevents drift between subsystems and makes tuning easier.

/// Position predictor lead factor.
///
/// Predicted positions run ahead of current positions by this multiple of
/// the timestep. Densities and forces are evaluated at the predicted
/// positions while the spatial index is built from the current ones.
pub const LOOKAHEAD_FACTOR: f32 = 7.0 / 6.0;

/// Velocity components at or below this magnitude are zeroed before the
/// position update, so a settled fluid stops creeping.
pub const VELOCITY_EPSILON: f32 = 1e-6;

/// Below this separation a particle pair counts as coincident: the pair
/// direction is undefined and gets replaced by a random unit vector.
pub const MIN_NEIGHBOUR_DISTANCE: f32 = 1e-5;

/// Minimum length of the accumulated density-gradient normal for a
/// particle to classify as sitting on the fluid surface.
pub const SURFACE_NORMAL_THRESHOLD: f32 = 0.2;

/// Step of the symmetric finite difference approximating the density
/// kernel derivative. `kernels::density_derivative` hardcodes the matching
/// reciprocal (1e6); keep the two in sync.
pub const KERNEL_FD_STEP: f32 = 1e-6;
