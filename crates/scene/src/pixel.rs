//! CPU preview rasterization of streamlines into an RGBA8 buffer.
//!
//! This module is always available (no feature gate); the PNG writer in
//! `snapshot` builds on it. Each streamline point is projected through the
//! scene camera and splatted as one pixel, brightened by its proximity to
//! the light. Overlapping splats keep the brighter value per channel.

use crate::camera::Camera;
use crate::color::Srgb;
use flowtubes_core::Streamline;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Light sprite radius in pixels.
const LIGHT_RADIUS_PX: f64 = 3.0;

/// Shading settings for the preview.
///
/// Colors serialize as `"#rrggbb"`; missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewStyle {
    pub light_color: Srgb,
    pub background: Srgb,
    /// Brightness of points far from the light, in [0, 1].
    pub ambient: f64,
    /// Inverse-square falloff rate with distance to the light.
    pub falloff: f64,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            light_color: Srgb::light(),
            background: Srgb::background(),
            ambient: 0.2,
            falloff: 8.0,
        }
    }
}

impl PreviewStyle {
    /// Color of a tube point `distance` away from the light.
    pub fn shade(&self, distance: f64) -> Srgb {
        let glow = 1.0 / (1.0 + self.falloff * distance * distance);
        let t = self.ambient + (1.0 - self.ambient) * glow;
        self.background.lerp(self.light_color, t)
    }
}

/// Maps NDC to pixel coordinates (origin top-left).
pub fn ndc_to_pixel(ndc: DVec2, width: u32, height: u32) -> DVec2 {
    DVec2::new(
        (ndc.x + 1.0) * 0.5 * f64::from(width),
        (1.0 - ndc.y) * 0.5 * f64::from(height),
    )
}

/// Renders `paths` lit by `light` into a `width * height * 4` RGBA buffer.
pub fn render_preview(
    paths: &[Streamline],
    camera: &Camera,
    light: DVec3,
    width: u32,
    height: u32,
    style: &PreviewStyle,
) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut rgba: Vec<u8> = style.background.to_rgba8().repeat(w * h);

    let pixel_index = |p: DVec2| -> Option<usize> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        (x < w && y < h).then(|| (y * w + x) * 4)
    };

    for path in paths {
        for &point in path.points() {
            let Some(ndc) = camera.project(point) else {
                continue;
            };
            if let Some(i) = pixel_index(ndc_to_pixel(ndc, width, height)) {
                let color = style.shade(point.distance(light)).to_rgba8();
                max_blend(&mut rgba[i..i + 4], color);
            }
        }
    }

    if let Some(ndc) = camera.project(light) {
        let centre = ndc_to_pixel(ndc, width, height);
        let sprite = style.light_color.to_rgba8();
        let r = LIGHT_RADIUS_PX as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if ((dx * dx + dy * dy) as f64) > LIGHT_RADIUS_PX * LIGHT_RADIUS_PX {
                    continue;
                }
                let p = centre + DVec2::new(dx as f64, dy as f64);
                if let Some(i) = pixel_index(p) {
                    rgba[i..i + 4].copy_from_slice(&sprite);
                }
            }
        }
    }

    rgba
}

fn max_blend(dst: &mut [u8], src: [u8; 4]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = (*d).max(s);
    }
}
