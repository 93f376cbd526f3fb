//! Streamline integration through a curl-noise field.
//!
//! A streamline starts at its seed and takes `steps` explicit-Euler steps:
//! the velocity is sampled at the current position divided by the spatial
//! scale, multiplied by the step scale and added to the position. No clamping
//! or renormalization is applied.

use crate::curl::{CurlSampler, DEFAULT_EPS};
use crate::error::FlowError;
use crate::noise_field::ScalarField;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of Euler steps per streamline.
pub const DEFAULT_STEPS: usize = 600;
/// Default multiplier applied to each sampled velocity.
pub const DEFAULT_STEP_SCALE: f64 = 0.001;
/// Default divisor applied to positions before sampling the field.
pub const DEFAULT_SPATIAL_SCALE: f64 = 2.0;

/// An ordered polyline traced through a velocity field.
///
/// Always holds at least one point (the seed). Built once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    points: Vec<DVec3>,
}

impl Streamline {
    /// The traced points, seed first.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Number of points (`steps + 1`).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a streamline holds at least its seed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of integration steps taken.
    pub fn steps(&self) -> usize {
        self.points.len() - 1
    }

    pub fn seed(&self) -> DVec3 {
        self.points[0]
    }

    /// Final integrated position.
    pub fn end(&self) -> DVec3 {
        self.points[self.points.len() - 1]
    }

    /// True if every coordinate of every point is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    /// Sum of segment lengths.
    pub fn arc_length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    pub fn into_points(self) -> Vec<DVec3> {
        self.points
    }
}

impl TryFrom<Vec<DVec3>> for Streamline {
    type Error = FlowError;

    /// Wraps precomputed points. Fails on an empty list.
    fn try_from(points: Vec<DVec3>) -> Result<Self, Self::Error> {
        if points.is_empty() {
            return Err(FlowError::InvalidCount {
                name: "streamline points".into(),
                value: 0,
                min: 1,
            });
        }
        Ok(Self { points })
    }
}

/// Integration constants for a batch of streamlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationParams {
    pub steps: usize,
    pub step_scale: f64,
    pub spatial_scale: f64,
    pub eps: f64,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            step_scale: DEFAULT_STEP_SCALE,
            spatial_scale: DEFAULT_SPATIAL_SCALE,
            eps: DEFAULT_EPS,
        }
    }
}

impl IntegrationParams {
    /// Checks that the scales are finite and non-zero and eps is positive.
    pub fn validate(&self) -> Result<(), FlowError> {
        check_scale("step_scale", self.step_scale)?;
        check_scale("spatial_scale", self.spatial_scale)?;
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(FlowError::InvalidEpsilon(self.eps));
        }
        Ok(())
    }
}

fn check_scale(name: &str, value: f64) -> Result<(), FlowError> {
    if !value.is_finite() || value == 0.0 {
        return Err(FlowError::InvalidScale {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

/// Traces streamlines through the curl of a scalar field.
#[derive(Debug)]
pub struct StreamlineIntegrator<'a, F: ScalarField + ?Sized> {
    sampler: CurlSampler<'a, F>,
}

impl<F: ScalarField + ?Sized> Clone for StreamlineIntegrator<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: ScalarField + ?Sized> Copy for StreamlineIntegrator<'_, F> {}

impl<'a, F: ScalarField + ?Sized> StreamlineIntegrator<'a, F> {
    /// Integrator over `field` with the default finite-difference step.
    pub fn new(field: &'a F) -> Self {
        Self {
            sampler: CurlSampler::new(field),
        }
    }

    /// Integrator with an explicit sampler (custom eps).
    pub fn with_sampler(sampler: CurlSampler<'a, F>) -> Self {
        Self { sampler }
    }

    pub fn sampler(&self) -> &CurlSampler<'a, F> {
        &self.sampler
    }

    /// Traces `steps` Euler steps from `seed`.
    ///
    /// Returns exactly `steps + 1` points; the first is `seed` itself.
    pub fn integrate(
        &self,
        seed: DVec3,
        steps: usize,
        step_scale: f64,
        spatial_scale: f64,
    ) -> Streamline {
        let mut points = Vec::with_capacity(steps + 1);
        points.push(seed);
        let mut current = seed;
        for _ in 0..steps {
            let velocity = self.sampler.velocity(current / spatial_scale);
            current += velocity * step_scale;
            points.push(current);
        }
        debug!(
            seed = ?seed,
            end = ?current,
            steps,
            "integrated streamline"
        );
        Streamline { points }
    }

    /// Traces from `seed` using every value of a parameter bundle, including
    /// its `eps`, which replaces the sampler's own step for this call.
    ///
    /// Returns the bundle's validation error instead of tracing.
    pub fn integrate_with(
        &self,
        seed: DVec3,
        params: &IntegrationParams,
    ) -> Result<Streamline, FlowError> {
        params.validate()?;
        let sampler = CurlSampler::with_eps(self.sampler.field(), params.eps)?;
        Ok(Self::with_sampler(sampler).integrate(
            seed,
            params.steps,
            params.step_scale,
            params.spatial_scale,
        ))
    }

    /// Builds an integrator whose sampler uses `params.eps`, after validating
    /// the whole bundle.
    pub fn from_params(field: &'a F, params: &IntegrationParams) -> Result<Self, FlowError> {
        params.validate()?;
        Ok(Self::with_sampler(CurlSampler::with_eps(field, params.eps)?))
    }
}
