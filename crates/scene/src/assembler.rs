//! Scene assembly: seeds, streamlines and tube meshes.
//!
//! [`SceneAssembler`] is the one-shot startup stage. It samples seed points,
//! integrates a streamline from each through the curl of the configured noise
//! field, and sweeps a tube mesh along every path. The finished [`Scene`] is
//! handed to a [`RenderSink`], which stands in for whatever GPU renderer
//! draws it.

use crate::tube::{TubeGeometry, TubeParams};
use crate::uniforms::Uniforms;
use crate::CatmullRom;
use flowtubes_core::prng::{seed_points, Xorshift64};
use flowtubes_core::{FlowError, NoiseField, SceneSeed, Streamline, StreamlineIntegrator};
use glam::DVec3;
use serde::Serialize;
use tracing::{debug, info, info_span};

/// External renderer seam.
///
/// Tubes are submitted once after assembly; frames are submitted every tick.
pub trait RenderSink {
    fn submit_tube(&mut self, index: usize, tube: &TubeMesh);
    fn submit_frame(&mut self, uniforms: &Uniforms);
}

/// One streamline and the mesh swept along it.
#[derive(Debug, Clone)]
pub struct TubeMesh {
    pub path: Streamline,
    pub geometry: TubeGeometry,
}

/// Buffer totals for an assembled scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SceneStats {
    pub tubes: usize,
    pub points: usize,
    pub vertices: usize,
    pub indices: usize,
}

/// All tubes of a scene, in seed order.
#[derive(Debug, Clone)]
pub struct Scene {
    seed: SceneSeed,
    tubes: Vec<TubeMesh>,
}

impl Scene {
    pub fn seed(&self) -> &SceneSeed {
        &self.seed
    }

    pub fn tubes(&self) -> &[TubeMesh] {
        &self.tubes
    }

    pub fn stats(&self) -> SceneStats {
        self.tubes.iter().fold(
            SceneStats {
                tubes: self.tubes.len(),
                ..SceneStats::default()
            },
            |mut acc, t| {
                acc.points += t.path.len();
                acc.vertices += t.geometry.vertex_count();
                acc.indices += t.geometry.indices.len();
                acc
            },
        )
    }

    /// Hands every tube to `sink` in seed order.
    pub fn submit<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for (i, tube) in self.tubes.iter().enumerate() {
            sink.submit_tube(i, tube);
        }
    }
}

/// Builds scenes from a validated [`SceneSeed`].
#[derive(Debug, Clone)]
pub struct SceneAssembler {
    seed: SceneSeed,
    field: NoiseField,
}

impl SceneAssembler {
    /// Validates `seed` and prepares its noise field.
    pub fn new(seed: SceneSeed) -> Result<Self, FlowError> {
        seed.validate()?;
        let field = seed.noise_field();
        Ok(Self { seed, field })
    }

    pub fn seed(&self) -> &SceneSeed {
        &self.seed
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// The `tubes` seed points, uniform in a cube of side `seed_extent`.
    pub fn seed_points(&self) -> Vec<DVec3> {
        let mut rng = Xorshift64::new(self.seed.seed);
        seed_points(&mut rng, self.seed.tubes, self.seed.seed_extent)
    }

    /// Integrates one streamline per seed point.
    pub fn streamlines(&self) -> Result<Vec<Streamline>, FlowError> {
        let params = self.seed.integration();
        let integrator = StreamlineIntegrator::new(&self.field);
        self.seed_points()
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let path = integrator.integrate_with(p, &params)?;
                if path.is_finite() {
                    Ok(path)
                } else {
                    Err(FlowError::NonFinite {
                        what: format!("streamline {i}"),
                    })
                }
            })
            .collect()
    }

    /// Smooths `path` into a curve and sweeps a tube along it.
    pub fn build_tube(&self, path: Streamline) -> Result<TubeMesh, FlowError> {
        let curve = CatmullRom::new(path.points().to_vec())?;
        let geometry = TubeGeometry::sweep(
            &curve,
            &TubeParams {
                tubular_segments: self.seed.steps,
                radius: self.seed.tube_radius,
                radial_segments: self.seed.radial_segments,
            },
        )?;
        Ok(TubeMesh { path, geometry })
    }

    /// Runs the full startup pipeline.
    pub fn assemble(&self) -> Result<Scene, FlowError> {
        let span = info_span!("assemble", tubes = self.seed.tubes, steps = self.seed.steps);
        let _enter = span.enter();

        let paths = self.streamlines()?;
        debug!(count = paths.len(), "streamlines integrated");
        let tubes = paths
            .into_iter()
            .map(|p| self.build_tube(p))
            .collect::<Result<Vec<_>, _>>()?;

        let scene = Scene {
            seed: self.seed.clone(),
            tubes,
        };
        let stats = scene.stats();
        info!(
            tubes = stats.tubes,
            points = stats.points,
            vertices = stats.vertices,
            "scene assembled"
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_seed() -> SceneSeed {
        SceneSeed {
            tubes: 4,
            steps: 30,
            radial_segments: 5,
            ..SceneSeed::default()
        }
    }

    #[derive(Default)]
    struct Recorder {
        tubes: Vec<usize>,
        frames: usize,
    }

    impl RenderSink for Recorder {
        fn submit_tube(&mut self, index: usize, _tube: &TubeMesh) {
            self.tubes.push(index);
        }
        fn submit_frame(&mut self, _uniforms: &Uniforms) {
            self.frames += 1;
        }
    }

    #[test]
    fn default_scene_has_300_paths_of_601_points() {
        let asm = SceneAssembler::new(SceneSeed::default()).unwrap();
        let paths = asm.streamlines().unwrap();
        assert_eq!(paths.len(), 300);
        assert!(paths.iter().all(|p| p.len() == 601));
        let total: usize = paths.iter().map(Streamline::len).sum();
        assert_eq!(total, 180_300);
        assert_eq!(total, asm.seed().total_points());
    }

    #[test]
    fn seeds_lie_in_the_extent_cube() {
        let asm = SceneAssembler::new(SceneSeed::default()).unwrap();
        for p in asm.seed_points() {
            assert!(p.abs().max_element() <= 1.0, "seed outside cube: {p:?}");
        }
    }

    #[test]
    fn paths_start_at_their_seeds() {
        let asm = SceneAssembler::new(small_seed()).unwrap();
        let seeds = asm.seed_points();
        let paths = asm.streamlines().unwrap();
        for (s, p) in seeds.iter().zip(&paths) {
            assert_eq!(p.seed(), *s);
        }
    }

    #[test]
    fn stats_match_buffer_formulas() {
        let scene = SceneAssembler::new(small_seed()).unwrap().assemble().unwrap();
        let stats = scene.stats();
        assert_eq!(stats.tubes, 4);
        assert_eq!(stats.points, 4 * 31);
        assert_eq!(stats.vertices, 4 * 31 * 6);
        assert_eq!(stats.indices, 4 * 30 * 5 * 6);
    }

    #[test]
    fn assembly_is_deterministic() {
        let a = SceneAssembler::new(small_seed()).unwrap().assemble().unwrap();
        let b = SceneAssembler::new(small_seed()).unwrap().assemble().unwrap();
        for (ta, tb) in a.tubes().iter().zip(b.tubes()) {
            assert_eq!(ta.path, tb.path);
            assert_eq!(ta.geometry, tb.geometry);
        }
    }

    #[test]
    fn different_seeds_give_different_scenes() {
        let a = SceneAssembler::new(small_seed()).unwrap();
        let b = SceneAssembler::new(SceneSeed {
            seed: 7,
            ..small_seed()
        })
        .unwrap();
        assert_ne!(a.seed_points(), b.seed_points());
    }

    #[test]
    fn configured_eps_reaches_the_integrator() {
        let fine = SceneAssembler::new(small_seed()).unwrap();
        let coarse = SceneAssembler::new(SceneSeed {
            eps: 5e-2,
            ..small_seed()
        })
        .unwrap();
        let (a, b) = (fine.streamlines().unwrap(), coarse.streamlines().unwrap());
        assert_eq!(a[0].seed(), b[0].seed());
        assert_ne!(a[0], b[0]);
    }

    #[test]
    fn invalid_seed_is_rejected_up_front() {
        let bad = SceneSeed {
            tubes: 0,
            ..SceneSeed::default()
        };
        assert!(matches!(
            SceneAssembler::new(bad),
            Err(FlowError::InvalidCount { .. })
        ));
    }

    #[test]
    fn submit_visits_tubes_in_order() {
        let scene = SceneAssembler::new(small_seed()).unwrap().assemble().unwrap();
        let mut sink = Recorder::default();
        scene.submit(&mut sink);
        assert_eq!(sink.tubes, vec![0, 1, 2, 3]);
        assert_eq!(sink.frames, 0);
    }

    #[test]
    fn stats_serialize_with_field_names() {
        let stats = SceneStats {
            tubes: 1,
            points: 2,
            vertices: 3,
            indices: 4,
        };
        let v = serde_json::to_value(stats).unwrap();
        assert_eq!(v["vertices"], 3);
    }
}
