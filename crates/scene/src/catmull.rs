//! Centripetal Catmull-Rom curves through streamline points.
//!
//! The curve interpolates every control point. Each span uses non-uniform
//! knot spacing of `|p_{i+1} - p_i|^0.5`, which avoids cusps and
//! self-intersections on unevenly spaced points. The ends are open: phantom
//! points are reflected from the first and last segments.
//!
//! [`CatmullRom::point_at`] and [`CatmullRom::tangent_at`] take an arc-length
//! fraction `u` in [0, 1] resolved through a cumulative length table.

use flowtubes_core::FlowError;
use glam::DVec3;

/// Arc-length samples used by the `u -> t` mapping.
pub const DEFAULT_ARC_DIVISIONS: usize = 200;

/// Knot intervals below this are treated as repeated points.
const MIN_KNOT: f64 = 1e-4;

/// Parameter offset for finite-difference tangents.
const TANGENT_DELTA: f64 = 1e-4;

/// Cubic coefficients for one coordinate of one span.
#[derive(Debug, Clone, Copy)]
struct Cubic {
    c0: f64,
    c1: f64,
    c2: f64,
    c3: f64,
}

impl Cubic {
    /// Hermite form from end values and end tangents.
    fn hermite(x0: f64, x1: f64, t0: f64, t1: f64) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom span between `x1` and `x2`.
    fn nonuniform(x0: f64, x1: f64, x2: f64, x3: f64, dt0: f64, dt1: f64, dt2: f64) -> Self {
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    fn eval(&self, t: f64) -> f64 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

/// An open centripetal Catmull-Rom curve with an arc-length table.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<DVec3>,
    /// Cumulative lengths at `t = i / divisions`.
    arc_lengths: Vec<f64>,
}

impl CatmullRom {
    /// Builds a curve through `points` with the default arc-length resolution.
    ///
    /// Returns `FlowError::InvalidCount` for fewer than two points.
    pub fn new(points: Vec<DVec3>) -> Result<Self, FlowError> {
        Self::with_divisions(points, DEFAULT_ARC_DIVISIONS)
    }

    /// Builds a curve sampling `divisions` chords for arc length.
    pub fn with_divisions(points: Vec<DVec3>, divisions: usize) -> Result<Self, FlowError> {
        if points.len() < 2 {
            return Err(FlowError::InvalidCount {
                name: "curve points".into(),
                value: points.len(),
                min: 2,
            });
        }
        if divisions == 0 {
            return Err(FlowError::InvalidCount {
                name: "arc divisions".into(),
                value: 0,
                min: 1,
            });
        }
        let mut curve = Self {
            points,
            arc_lengths: Vec::with_capacity(divisions + 1),
        };
        let mut total = 0.0;
        let mut last = curve.point(0.0);
        curve.arc_lengths.push(0.0);
        for i in 1..=divisions {
            let p = curve.point(i as f64 / divisions as f64);
            total += p.distance(last);
            curve.arc_lengths.push(total);
            last = p;
        }
        Ok(curve)
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.points
    }

    /// Approximate curve length from the arc-length table.
    pub fn length(&self) -> f64 {
        self.arc_lengths[self.arc_lengths.len() - 1]
    }

    /// Point at curve parameter `t` in [0, 1] (uniform per span, not arc length).
    pub fn point(&self, t: f64) -> DVec3 {
        let pts = &self.points;
        let l = pts.len();
        let p = (l - 1) as f64 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f64;
        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p1 = pts[seg];
        let p2 = pts[seg + 1];
        let p0 = if seg > 0 {
            pts[seg - 1]
        } else {
            2.0 * pts[0] - pts[1]
        };
        let p3 = if seg + 2 < l {
            pts[seg + 2]
        } else {
            2.0 * pts[l - 1] - pts[l - 2]
        };

        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < MIN_KNOT {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT {
            dt2 = dt1;
        }

        let cx = Cubic::nonuniform(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2);
        let cy = Cubic::nonuniform(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2);
        let cz = Cubic::nonuniform(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2);
        DVec3::new(cx.eval(weight), cy.eval(weight), cz.eval(weight))
    }

    /// Maps an arc-length fraction `u` to the curve parameter `t`.
    pub fn u_to_t(&self, u: f64) -> f64 {
        let lengths = &self.arc_lengths;
        let n = lengths.len() - 1;
        let total = lengths[n];
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }
        let target = u.clamp(0.0, 1.0) * total;
        // Last index whose cumulative length does not exceed the target.
        let i = lengths.partition_point(|&len| len <= target).saturating_sub(1);
        if i >= n {
            return 1.0;
        }
        let before = lengths[i];
        let span = lengths[i + 1] - before;
        let fraction = if span > 0.0 {
            (target - before) / span
        } else {
            0.0
        };
        (i as f64 + fraction) / n as f64
    }

    /// Point at arc-length fraction `u`.
    pub fn point_at(&self, u: f64) -> DVec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at curve parameter `t`, by central difference.
    ///
    /// Falls back to the first control segment direction (or +Z) where the
    /// curve is locally degenerate.
    pub fn tangent(&self, t: f64) -> DVec3 {
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        let fallback = (self.points[1] - self.points[0])
            .try_normalize()
            .unwrap_or(DVec3::Z);
        (self.point(t2) - self.point(t1))
            .try_normalize()
            .unwrap_or(fallback)
    }

    /// Unit tangent at arc-length fraction `u`.
    pub fn tangent_at(&self, u: f64) -> DVec3 {
        self.tangent(self.u_to_t(u))
    }
}
