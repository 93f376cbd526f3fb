//! Per-frame driver: pointer input in, uniforms out.
//!
//! The host owns the clock and the event loop. It forwards pointer moves and
//! resizes to [`FrameDriver`] and calls [`FrameDriver::tick`] once per
//! rendered frame.

use crate::assembler::RenderSink;
use crate::camera::{pixel_to_ndc, Camera};
use crate::uniforms::Uniforms;
use flowtubes_core::ElasticPointer;
use glam::DVec2;

#[derive(Debug, Clone)]
pub struct FrameDriver {
    pointer: ElasticPointer,
    camera: Camera,
    uniforms: Uniforms,
    width: u32,
    height: u32,
}

impl FrameDriver {
    /// Driver for a `width` x `height` viewport, light at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        let mut uniforms = Uniforms::default();
        uniforms.set_resolution(width, height);
        Self {
            pointer: ElasticPointer::new(),
            camera: Camera::for_viewport(width, height),
            uniforms,
            width,
            height,
        }
    }

    pub fn pointer(&self) -> &ElasticPointer {
        &self.pointer
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.resize(width, height);
        self.uniforms.set_resolution(width, height);
    }

    /// Projects a window pixel onto the backdrop and retargets the light.
    ///
    /// The camera stays fixed on the Z axis; it does not turn toward the
    /// pointer, so hits are computed against the untilted view.
    /// Returns `false`, leaving the target unchanged, when the ray misses.
    pub fn on_pointer_move(&mut self, px: f64, py: f64) -> bool {
        let ndc = pixel_to_ndc(px, py, self.width, self.height);
        match self.camera.pick_backdrop(ndc) {
            Some(hit) => {
                self.pointer.set_target(hit);
                true
            }
            None => false,
        }
    }

    /// Sets the light target directly in world units on the z = 0 plane.
    pub fn set_target(&mut self, target: DVec2) {
        self.pointer.set_target(target);
    }

    /// Advances the elastic light one step and stamps `elapsed` seconds.
    pub fn tick(&mut self, elapsed: f64) -> Uniforms {
        self.pointer.advance();
        self.uniforms.time = elapsed;
        self.uniforms.set_light(self.pointer.position3());
        self.uniforms
    }

    /// [`tick`](Self::tick), then submits the uniforms to `sink`.
    pub fn tick_into<S: RenderSink + ?Sized>(&mut self, sink: &mut S, elapsed: f64) -> Uniforms {
        let uniforms = self.tick(elapsed);
        sink.submit_frame(&uniforms);
        uniforms
    }
}
