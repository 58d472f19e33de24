//! SPH smoothing kernels.
//!
//! All functions take a distance (or squared distance) and the smoothing
//! radius h. None of them range-check: callers filter neighbours by
//! squared distance against h² first, and feeding a distance beyond h
//! produces meaningless (possibly negative) weights.

use std::f32::consts::PI;

use crate::physics::KERNEL_FD_STEP;

/// Density kernel: (h - d)³ / (0.1·π·h⁵).
///
/// At d = 0 this reduces to 10 / (π·h²), the self contribution every
/// particle starts from.
#[inline]
pub fn density(d: f32, h: f32) -> f32 {
    let volume = 0.1 * PI * h.powi(5);
    let reach = h - d;
    (reach * reach * reach) / volume
}

/// Derivative of the density kernel, as a symmetric finite difference
/// with step [`KERNEL_FD_STEP`] rather than the closed form -3(h-d)²/(0.1·π·h⁵).
/// The difference quotient carries a tiny bias the forces are tuned
/// against, so it stays numerical.
#[inline]
pub fn density_derivative(d: f32, h: f32) -> f32 {
    let above = density(d + KERNEL_FD_STEP, h);
    let below = density(d - KERNEL_FD_STEP, h);
    // 1e6 is the reciprocal of KERNEL_FD_STEP.
    0.5 * (above - below) * 1e6
}

/// Laplacian of the viscosity kernel: 40·(h - d) / (π·h⁵).
#[inline]
pub fn viscosity_laplacian(d: f32, h: f32) -> f32 {
    (h - d) * 40.0 / (PI * h.powi(5))
}

/// Derivative of the surface-tension kernel: -24·d·(h² - d²)² / (π·h⁸).
#[inline]
pub fn surface_tension_derivative(d: f32, h: f32) -> f32 {
    -24.0 * d * (h * h - d * d).powi(2) / (PI * h.powi(8))
}

/// Laplacian of the surface-tension kernel, on the squared distance:
/// -24·(3h⁴ - 10h²·d² + 7·d⁴) / (π·h⁸).
#[inline]
pub fn surface_tension_laplacian(dd: f32, h: f32) -> f32 {
    let hh = h * h;
    -24.0 * (3.0 * hh * hh - 10.0 * hh * dd + 7.0 * dd * dd) / (PI * h.powi(8))
}
