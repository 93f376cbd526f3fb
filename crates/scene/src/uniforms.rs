//! Per-frame shader inputs shared by the tube and backdrop materials.

use glam::{DVec2, DVec3};
use serde::Serialize;

/// Values written to both materials every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Uniforms {
    /// Host clock, seconds since start.
    pub time: f64,
    /// Elastic light position on the z = 0 plane.
    pub light: [f64; 3],
    /// Viewport size in pixels.
    pub resolution: [f64; 2],
}

impl Uniforms {
    pub fn light(&self) -> DVec3 {
        DVec3::from_array(self.light)
    }

    pub fn set_light(&mut self, light: DVec3) {
        self.light = light.to_array();
    }

    pub fn resolution(&self) -> DVec2 {
        DVec2::from_array(self.resolution)
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = [f64::from(width), f64::from(height)];
    }
}
