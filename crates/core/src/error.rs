//! Error types for the flowtubes core.
//!
//! The numerical kernels (noise, curl, integration, elastic follow) are total
//! functions and never return errors. Errors only surface when a scene is
//! configured or its geometry is built from user-supplied values.

use thiserror::Error;

/// Errors produced while configuring or assembling a flow-tube scene.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The finite-difference epsilon was zero, negative or not finite.
    #[error("invalid epsilon {0}: must be finite and greater than zero")]
    InvalidEpsilon(f64),

    /// A scale factor was zero or not finite.
    #[error("invalid scale for '{name}': {value} (must be finite and non-zero)")]
    InvalidScale { name: String, value: f64 },

    /// A count (tubes, segments) was below its minimum.
    #[error("invalid count for '{name}': {value} (minimum {min})")]
    InvalidCount {
        name: String,
        value: usize,
        min: usize,
    },

    /// A geometry stage produced NaN or infinite values.
    #[error("non-finite values produced by {what}")]
    NonFinite { what: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
