#![deny(unsafe_code)]
//! Scene layer for flowtubes: turns streamlines into tube meshes and drives
//! the per-frame light.
//!
//! This crate sits between `flowtubes-core` (noise, curl, integration,
//! elastic follow) and a renderer. [`SceneAssembler`] builds every tube once
//! at startup; [`FrameDriver`] converts pointer input into [`Uniforms`] each
//! frame. Both hand their output to a [`RenderSink`]. A CPU preview
//! rasterizer lives in [`pixel`], with PNG output in `snapshot` behind the
//! `png` feature.

pub mod assembler;
pub mod camera;
pub mod catmull;
pub mod color;
pub mod frame;
pub mod pixel;
pub mod tube;
pub mod uniforms;

#[cfg(feature = "png")]
pub mod snapshot;

pub use assembler::{RenderSink, Scene, SceneAssembler, SceneStats, TubeMesh};
pub use camera::Camera;
pub use catmull::CatmullRom;
pub use color::Srgb;
pub use frame::FrameDriver;
pub use pixel::PreviewStyle;
pub use tube::{TubeGeometry, TubeParams};
pub use uniforms::Uniforms;
