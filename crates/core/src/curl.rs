//! Curl-noise velocity sampling.
//!
//! The velocity at a point is built from central differences of a single
//! scalar field taken in the YZ, XZ and XY planes. All three components
//! differentiate the same potential, so the result is not a strict curl of a
//! vector potential and is not exactly divergence-free. The tube shapes
//! depend on this exact combination, so it is kept as written.

use crate::error::FlowError;
use crate::noise_field::ScalarField;
use glam::DVec3;

/// Default finite-difference step.
pub const DEFAULT_EPS: f64 = 1e-4;

/// Central difference of `field` at `p` along `axis` with half-width `eps`.
fn central_diff<F: ScalarField + ?Sized>(field: &F, p: DVec3, axis: DVec3, eps: f64) -> f64 {
    let fwd = p + axis * eps;
    let back = p - axis * eps;
    (field.sample(fwd.x, fwd.y, fwd.z) - field.sample(back.x, back.y, back.z)) / (2.0 * eps)
}

/// Curl-noise velocity of `field` at `(x, y, z)`.
///
/// `eps` must be finite and greater than zero; this is only checked in debug
/// builds. Use [`CurlSampler::with_eps`] to validate it up front.
pub fn curl<F: ScalarField + ?Sized>(field: &F, x: f64, y: f64, z: f64, eps: f64) -> DVec3 {
    debug_assert!(eps > 0.0 && eps.is_finite(), "curl eps must be > 0, got {eps}");
    let p = DVec3::new(x, y, z);

    // YZ plane
    let a = central_diff(field, p, DVec3::Y, eps);
    let b = central_diff(field, p, DVec3::Z, eps);
    let cx = a - b;

    // XZ plane
    let a = central_diff(field, p, DVec3::Z, eps);
    let b = central_diff(field, p, DVec3::X, eps);
    let cy = a - b;

    // XY plane
    let a = central_diff(field, p, DVec3::X, eps);
    let b = central_diff(field, p, DVec3::Y, eps);
    let cz = a - b;

    DVec3::new(cx, cy, cz)
}

/// A scalar field paired with a validated finite-difference step.
#[derive(Debug)]
pub struct CurlSampler<'a, F: ScalarField + ?Sized> {
    field: &'a F,
    eps: f64,
}

impl<F: ScalarField + ?Sized> Clone for CurlSampler<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: ScalarField + ?Sized> Copy for CurlSampler<'_, F> {}

impl<'a, F: ScalarField + ?Sized> CurlSampler<'a, F> {
    /// Creates a sampler using [`DEFAULT_EPS`].
    pub fn new(field: &'a F) -> Self {
        Self {
            field,
            eps: DEFAULT_EPS,
        }
    }

    /// Creates a sampler with a custom step.
    ///
    /// Returns `FlowError::InvalidEpsilon` unless `eps` is finite and positive.
    pub fn with_eps(field: &'a F, eps: f64) -> Result<Self, FlowError> {
        if !(eps.is_finite() && eps > 0.0) {
            return Err(FlowError::InvalidEpsilon(eps));
        }
        Ok(Self { field, eps })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn field(&self) -> &'a F {
        self.field
    }

    /// Velocity at `p`.
    pub fn velocity(&self, p: DVec3) -> DVec3 {
        curl(self.field, p.x, p.y, p.z, self.eps)
    }
}
