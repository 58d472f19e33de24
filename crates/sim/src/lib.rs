//! Waterbox - 2D SPH Fluid Simulation Library
//!
//! Smoothed Particle Hydrodynamics on the unit square:
//! - Quadtree spatial index, rebuilt from scratch every frame
//! - Kernel-based density estimation with wall correction
//! - Pressure, viscosity and surface-tension forces
//! - Sequential integration with damped wall collisions
//!
//! This crate is framework-agnostic - it handles simulation only.
//! Window/context creation, rendering, input polling and frame timing
//! belong to the host application; the solver exposes its particle arrays
//! for upload and accepts measured frame times and interaction forces.

pub mod fluid;
pub mod kernels;
pub mod list;
pub mod params;
pub mod physics;
pub mod pointer;
pub mod quadtree;
pub mod sph;

pub use list::List;
pub use params::{ParamsError, SimParams};
pub use pointer::PointerState;
pub use quadtree::QuadTree;
pub use sph::{block_layout, SphSimulation, SurfaceState};
