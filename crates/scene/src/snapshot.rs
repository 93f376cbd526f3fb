//! PNG output for the CPU preview.
//!
//! Feature-gated behind `png` (default on) so that consumers that only need
//! geometry do not pull in the `image` crate. Rasterization lives in
//! [`crate::pixel`].

use crate::camera::Camera;
use crate::pixel::{render_preview, PreviewStyle};
use flowtubes_core::{FlowError, Streamline};
use glam::DVec3;
use std::path::Path;

/// Writes an RGBA8 buffer as a PNG.
///
/// Returns `FlowError::Io` on a size mismatch or write failure.
pub fn write_rgba_png(rgba: Vec<u8>, width: u32, height: u32, path: &Path) -> Result<(), FlowError> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| FlowError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FlowError::Io(e.to_string()))
}

/// Renders `paths` lit by `light` and writes the preview to `path`.
pub fn write_preview_png(
    paths: &[Streamline],
    light: DVec3,
    width: u32,
    height: u32,
    style: &PreviewStyle,
    path: &Path,
) -> Result<(), FlowError> {
    let camera = Camera::for_viewport(width, height);
    let rgba = render_preview(paths, &camera, light, width, height, style);
    write_rgba_png(rgba, width, height, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_preview_round_trip() {
        let line = Streamline::try_from(vec![DVec3::ZERO, DVec3::new(0.1, 0.1, 0.0)]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");

        write_preview_png(&[line], DVec3::ZERO, 24, 16, &PreviewStyle::default(), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 24);
        assert_eq!(img.height(), 16);
        let centre = img.get_pixel(12, 8).0;
        assert_eq!(centre, PreviewStyle::default().light_color.to_rgba8());
    }

    #[test]
    fn mismatched_buffer_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let err = write_rgba_png(vec![0; 7], 2, 2, &path).unwrap_err();
        assert!(matches!(err, FlowError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let err = write_rgba_png(vec![0; 16], 2, 2, &path).unwrap_err();
        assert!(matches!(err, FlowError::Io(_)));
    }
}
