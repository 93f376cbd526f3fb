//! Deterministic seed-point sampling.
//!
//! Streamline seeds are drawn uniformly from an axis-aligned cube centred on
//! the origin. The generator is a plain xorshift64 so a scene seed reproduces
//! the same tubes on every platform.

use glam::DVec3;

/// Xorshift64 generator (shifts 13, 7, 17).
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Substituted for a zero seed, which xorshift would never leave.
    const ZERO_SEED_REPLACEMENT: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        let state = match seed {
            0 => Self::ZERO_SEED_REPLACEMENT,
            s => s,
        };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1) from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 * SCALE
    }

    /// Uniform in [-extent / 2, extent / 2), computed as `(u - 0.5) * extent`.
    pub fn next_centered(&mut self, extent: f64) -> f64 {
        (self.next_f64() - 0.5) * extent
    }

    /// A point uniform in the cube of side `extent` centred on the origin.
    ///
    /// Components are drawn in x, y, z order.
    pub fn next_point(&mut self, extent: f64) -> DVec3 {
        let x = self.next_centered(extent);
        let y = self.next_centered(extent);
        let z = self.next_centered(extent);
        DVec3::new(x, y, z)
    }
}

/// Draws `count` seed points from a cube of side `extent`.
pub fn seed_points(rng: &mut Xorshift64, count: usize, extent: f64) -> Vec<DVec3> {
    (0..count).map(|_| rng.next_point(extent)).collect()
}
