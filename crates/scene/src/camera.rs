//! Fixed perspective camera and pointer projection.
//!
//! The camera sits on the +Z axis looking toward the origin down -Z. Pointer
//! positions arrive in window pixels, are converted to normalized device
//! coordinates, and are cast as rays onto the z = 0 backdrop plane that the
//! light travels on.

use glam::{DVec2, DVec3};

/// Vertical field of view in degrees.
pub const DEFAULT_FOV_DEGREES: f64 = 70.0;
/// Camera distance from the origin along +Z.
pub const DEFAULT_EYE_Z: f64 = 1.5;
pub const DEFAULT_NEAR: f64 = 0.01;
pub const DEFAULT_FAR: f64 = 10.0;
/// Half the side of the square backdrop plane centred on the origin.
pub const BACKDROP_HALF_EXTENT: f64 = 5.0;

/// Perspective camera on the Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_degrees: f64,
    pub aspect: f64,
    pub eye_z: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Default camera for a `width` x `height` viewport.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            aspect: aspect_ratio(width, height),
            eye_z: DEFAULT_EYE_Z,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    /// Updates the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn eye(&self) -> DVec3 {
        DVec3::new(0.0, 0.0, self.eye_z)
    }

    fn half_height(&self) -> f64 {
        (self.fov_degrees.to_radians() * 0.5).tan()
    }

    /// Projects a world point to normalized device coordinates.
    ///
    /// Returns `None` outside the near/far range.
    pub fn project(&self, p: DVec3) -> Option<DVec2> {
        let view = p - self.eye();
        let depth = -view.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let h = self.half_height();
        Some(DVec2::new(
            view.x / (depth * h * self.aspect),
            view.y / (depth * h),
        ))
    }

    /// Casts a ray through `ndc` and intersects the z = 0 backdrop plane.
    ///
    /// Returns `None` when the hit falls outside the backdrop.
    pub fn pick_backdrop(&self, ndc: DVec2) -> Option<DVec2> {
        let h = self.half_height();
        let dir = DVec3::new(ndc.x * h * self.aspect, ndc.y * h, -1.0);
        // eye.z + t * dir.z = 0
        let t = self.eye_z;
        let hit = self.eye() + dir * t;
        let inside = hit.x.abs() <= BACKDROP_HALF_EXTENT && hit.y.abs() <= BACKDROP_HALF_EXTENT;
        inside.then(|| hit.truncate())
    }
}

fn aspect_ratio(width: u32, height: u32) -> f64 {
    f64::from(width.max(1)) / f64::from(height.max(1))
}

/// Converts a window pixel position to normalized device coordinates
/// (x right, y up, both in [-1, 1]).
pub fn pixel_to_ndc(px: f64, py: f64, width: u32, height: u32) -> DVec2 {
    let w = f64::from(width.max(1));
    let h = f64::from(height.max(1));
    DVec2::new((px / w) * 2.0 - 1.0, -(py / h) * 2.0 + 1.0)
}
