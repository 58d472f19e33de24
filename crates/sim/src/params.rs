//! Run configuration for the SPH solver.
//!
//! Parameters are constant for a run: the step driver reads them every
//! frame but never writes them. Defaults are tuned for a 900-particle
//! block settling on the unit square.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid parameter: {0}")]
    Invalid(String),
}

/// Simulation parameters, constant for a run.
///
/// The domain is always the unit square; there is no parameter for it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Smoothing radius h: the cutoff beyond which particles don't interact.
    pub smoothing_radius: f32,
    /// Density of the fluid at rest. Deviation from it produces pressure.
    pub rest_density: f32,
    /// Pressure stiffness: p = (density - rest_density) * stiffness.
    pub stiffness: f32,
    /// Strength of the surface-tension force on surface particles.
    pub surface_coefficient: f32,
    /// Strength of velocity diffusion between neighbours.
    pub viscosity_coefficient: f32,
    /// Gravity along +y, so negative pulls the fluid down.
    pub gravity: f32,
    /// Collision radius against the domain walls.
    pub particle_radius: f32,
    /// Wall collision velocity reduction: v -= 2 * wall_damping * v.
    pub wall_damping: f32,
    /// Points a spatial index node stores before splitting into quadrants.
    pub leaf_capacity: u32,
    /// Timestep used when the host supplies no measured frame time.
    pub fixed_dt: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            smoothing_radius: 0.05,
            rest_density: 5000.0,
            stiffness: 5.0,
            surface_coefficient: 50.0,
            viscosity_coefficient: 50.0,
            gravity: -10.0,
            particle_radius: 0.004,
            wall_damping: 0.98,
            leaf_capacity: 4,
            fixed_dt: 1.0 / 220.0,
        }
    }
}

impl SimParams {
    /// Reject configurations the solver assumes away at runtime.
    ///
    /// A non-positive smoothing radius would zero the self density and the
    /// force accumulator divides by density without guarding, so bad values
    /// are refused here instead.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.smoothing_radius <= 0.0 {
            return Err(ParamsError::Invalid(format!(
                "smoothing_radius must be positive, got {}",
                self.smoothing_radius
            )));
        }
        if self.particle_radius <= 0.0 || self.particle_radius >= 0.5 {
            return Err(ParamsError::Invalid(format!(
                "particle_radius must be in (0, 0.5), got {}",
                self.particle_radius
            )));
        }
        if self.fixed_dt <= 0.0 {
            return Err(ParamsError::Invalid(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParamsError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
