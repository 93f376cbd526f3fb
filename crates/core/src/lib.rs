#![deny(unsafe_code)]
//! Core numerics for flowtubes: curl-noise streamlines and elastic pointer
//! smoothing.
//!
//! Provides the seeded [`NoiseField`], the [`curl`] velocity sampler,
//! [`StreamlineIntegrator`] (explicit Euler), [`ElasticPointer`], the
//! [`Xorshift64`] seed sampler and the [`SceneSeed`] configuration.

pub mod curl;
pub mod elastic;
pub mod error;
pub mod noise_field;
pub mod prng;
pub mod seed;
pub mod streamline;

pub use curl::{curl, CurlSampler};
pub use elastic::ElasticPointer;
pub use error::FlowError;
pub use noise_field::{NoiseBasis, NoiseField, ScalarField};
pub use prng::Xorshift64;
pub use seed::SceneSeed;
pub use streamline::{IntegrationParams, Streamline, StreamlineIntegrator};

pub use glam::{DVec2, DVec3};
