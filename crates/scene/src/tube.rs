//! Tube meshes swept along a curve.
//!
//! A ring of `radial_segments + 1` vertices is placed at each of
//! `tubular_segments + 1` evenly spaced arc-length stations. Rings are
//! oriented with rotation-minimizing frames: the first normal is chosen
//! perpendicular to the first tangent, and each later normal is the previous
//! one rotated by the angle between consecutive tangents. Ends are left open.

use crate::catmull::CatmullRom;
use flowtubes_core::FlowError;
use glam::{DQuat, DVec3, Vec2, Vec3};
use std::f64::consts::TAU;

/// Tangent, normal and binormal at each tube station.
#[derive(Debug, Clone)]
pub struct Frames {
    pub tangents: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub binormals: Vec<DVec3>,
}

/// Computes parallel-transport frames at `segments + 1` arc-length stations.
pub fn transport_frames(curve: &CatmullRom, segments: usize) -> Frames {
    let tangents: Vec<DVec3> = (0..=segments)
        .map(|i| curve.tangent_at(i as f64 / segments as f64))
        .collect();

    let mut normals = Vec::with_capacity(segments + 1);
    let mut binormals = Vec::with_capacity(segments + 1);

    let t0 = tangents[0];
    let side = t0
        .cross(least_aligned_axis(t0))
        .try_normalize()
        .unwrap_or(DVec3::X);
    let n0 = t0.cross(side);
    normals.push(n0);
    binormals.push(t0.cross(n0));

    for i in 1..=segments {
        let (prev, next) = (tangents[i - 1], tangents[i]);
        let mut normal = normals[i - 1];
        let axis = prev.cross(next);
        if axis.length() > f64::EPSILON {
            let theta = prev.dot(next).clamp(-1.0, 1.0).acos();
            normal = DQuat::from_axis_angle(axis.normalize(), theta) * normal;
        }
        normals.push(normal);
        binormals.push(next.cross(normal));
    }

    Frames {
        tangents,
        normals,
        binormals,
    }
}

/// The coordinate axis with the smallest component of `t` (ties go to the later axis).
fn least_aligned_axis(t: DVec3) -> DVec3 {
    let a = t.abs();
    let mut min = f64::MAX;
    let mut axis = DVec3::X;
    if a.x <= min {
        min = a.x;
        axis = DVec3::X;
    }
    if a.y <= min {
        min = a.y;
        axis = DVec3::Y;
    }
    if a.z <= min {
        axis = DVec3::Z;
    }
    axis
}

/// Indexed triangle mesh of a tube, in GPU-ready `f32` buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

/// Sweep settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeParams {
    pub tubular_segments: usize,
    pub radius: f64,
    pub radial_segments: usize,
}

impl TubeGeometry {
    /// Sweeps a circle of `params.radius` along `curve`.
    ///
    /// Returns `FlowError::InvalidCount` for fewer than one tubular or three
    /// radial segments, `FlowError::InvalidScale` for a non-positive radius,
    /// and `FlowError::NonFinite` if the sweep produced NaN or infinity.
    pub fn sweep(curve: &CatmullRom, params: &TubeParams) -> Result<Self, FlowError> {
        let TubeParams {
            tubular_segments: tubular,
            radius,
            radial_segments: radial,
        } = *params;
        if tubular < 1 {
            return Err(FlowError::InvalidCount {
                name: "tubular_segments".into(),
                value: tubular,
                min: 1,
            });
        }
        if radial < 3 {
            return Err(FlowError::InvalidCount {
                name: "radial_segments".into(),
                value: radial,
                min: 3,
            });
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(FlowError::InvalidScale {
                name: "radius".into(),
                value: radius,
            });
        }

        let frames = transport_frames(curve, tubular);
        let ring = radial + 1;
        let vertex_count = (tubular + 1) * ring;
        let mut geometry = Self {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(tubular * radial * 6),
        };

        for i in 0..=tubular {
            let u = i as f64 / tubular as f64;
            let center = curve.point_at(u);
            let (n, b) = (frames.normals[i], frames.binormals[i]);
            for j in 0..=radial {
                let v = j as f64 / radial as f64 * TAU;
                let (sin, cos) = v.sin_cos();
                let normal = (-cos * n + sin * b).normalize_or_zero();
                let position = center + normal * radius;
                if !(position.is_finite() && normal.is_finite()) {
                    return Err(FlowError::NonFinite {
                        what: format!("tube ring {i}"),
                    });
                }
                geometry.positions.push(position.as_vec3());
                geometry.normals.push(normal.as_vec3());
                geometry
                    .uvs
                    .push(Vec2::new(u as f32, (j as f64 / radial as f64) as f32));
            }
        }

        for j in 1..=tubular {
            for i in 1..=radial {
                let a = (ring * (j - 1) + (i - 1)) as u32;
                let b = (ring * j + (i - 1)) as u32;
                let c = (ring * j + i) as u32;
                let d = (ring * (j - 1) + i) as u32;
                geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Ok(geometry)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
