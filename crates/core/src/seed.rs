//! Reproducible description of a flow-tube scene.
//!
//! A [`SceneSeed`] captures everything needed to rebuild the same set of
//! tubes: tube count, integration constants, seed-cube size, tube profile and
//! the two generator seeds. Missing JSON keys fall back to the defaults below.

use crate::curl::DEFAULT_EPS;
use crate::error::FlowError;
use crate::noise_field::{NoiseBasis, NoiseField};
use crate::streamline::{
    IntegrationParams, DEFAULT_SPATIAL_SCALE, DEFAULT_STEPS, DEFAULT_STEP_SCALE,
};
use serde::{Deserialize, Serialize};

/// Default number of tubes.
pub const DEFAULT_TUBES: usize = 300;
/// Side of the seed cube centred on the origin.
pub const DEFAULT_SEED_EXTENT: f64 = 2.0;
/// Tube cross-section radius.
pub const DEFAULT_TUBE_RADIUS: f64 = 0.005;
/// Vertices around each tube ring.
pub const DEFAULT_RADIAL_SEGMENTS: usize = 8;

/// Reproducible scene description.
///
/// Two equal seeds produce bit-identical streamlines and tube geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSeed {
    pub tubes: usize,
    pub steps: usize,
    pub step_scale: f64,
    pub spatial_scale: f64,
    pub eps: f64,
    pub seed_extent: f64,
    pub tube_radius: f64,
    pub radial_segments: usize,
    /// Seed for the seed-point generator.
    pub seed: u64,
    /// Seed for the noise permutation tables.
    pub noise_seed: u32,
    pub noise: NoiseBasis,
}

impl Default for SceneSeed {
    fn default() -> Self {
        Self {
            tubes: DEFAULT_TUBES,
            steps: DEFAULT_STEPS,
            step_scale: DEFAULT_STEP_SCALE,
            spatial_scale: DEFAULT_SPATIAL_SCALE,
            eps: DEFAULT_EPS,
            seed_extent: DEFAULT_SEED_EXTENT,
            tube_radius: DEFAULT_TUBE_RADIUS,
            radial_segments: DEFAULT_RADIAL_SEGMENTS,
            seed: 42,
            noise_seed: 42,
            noise: NoiseBasis::Simplex,
        }
    }
}

impl SceneSeed {
    /// Default scene with the given generator seeds.
    pub fn new(seed: u64, noise_seed: u32) -> Self {
        Self {
            seed,
            noise_seed,
            ..Self::default()
        }
    }

    /// The integration constants of this scene.
    pub fn integration(&self) -> IntegrationParams {
        IntegrationParams {
            steps: self.steps,
            step_scale: self.step_scale,
            spatial_scale: self.spatial_scale,
            eps: self.eps,
        }
    }

    /// The noise field this scene samples.
    pub fn noise_field(&self) -> NoiseField {
        NoiseField::new(self.noise, self.noise_seed)
    }

    /// Total streamline points handed to the scene layer.
    pub fn total_points(&self) -> usize {
        self.tubes.saturating_mul(self.steps.saturating_add(1))
    }

    /// Checks every count and scale.
    pub fn validate(&self) -> Result<(), FlowError> {
        check_count("tubes", self.tubes, 1)?;
        // A tube needs at least one segment to sweep along.
        check_count("steps", self.steps, 1)?;
        check_count("radial_segments", self.radial_segments, 3)?;
        self.integration().validate()?;
        check_positive("seed_extent", self.seed_extent)?;
        check_positive("tube_radius", self.tube_radius)?;
        Ok(())
    }
}

fn check_count(name: &str, value: usize, min: usize) -> Result<(), FlowError> {
    if value < min {
        return Err(FlowError::InvalidCount {
            name: name.to_string(),
            value,
            min,
        });
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<(), FlowError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(FlowError::InvalidScale {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}
