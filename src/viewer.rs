use na::{Point2, Vector2, Vector3};
use nalgebra as na;
use tracing::{error, info};

use crate::fullscreen_quad::FullscreenQuad;
use crate::render_gl::{self, FrameBufferShader, GlApi, ShaderError};

/// Fires once per key press, however many frames the key stays down.
#[derive(Debug, Default)]
pub struct ReloadLatch {
    held: bool,
}

impl ReloadLatch {
    pub fn update(&mut self, pressed: bool) -> bool {
        let fire = pressed && !self.held;
        self.held = pressed;
        fire
    }
}

/// Everything the window's event handlers need to drive one shader.
pub struct Viewer<G: GlApi> {
    shader: FrameBufferShader<G>,
    quad: FullscreenQuad<G>,
    viewport: render_gl::Viewport<G>,
    color_buffer: render_gl::ColorBuffer<G>,
    reload_latch: ReloadLatch,
    resolution: Vector2<i32>,
    mouse: Point2<f32>,
}

impl<G: GlApi> Viewer<G> {
    pub fn new(gl: &G, shader: FrameBufferShader<G>, width: i32, height: i32) -> Self {
        let viewport = render_gl::Viewport::for_window(gl.clone(), width, height);
        viewport.set_used();

        let color_buffer =
            render_gl::ColorBuffer::from_color(gl.clone(), Vector3::new(0.15, 0.15, 0.15));
        color_buffer.set_used();

        let mut viewer = Self {
            shader,
            quad: FullscreenQuad::new(gl),
            viewport,
            color_buffer,
            reload_latch: ReloadLatch::default(),
            resolution: Vector2::new(width, height),
            mouse: Point2::origin(),
        };
        if viewer.shader.is_error() {
            viewer.log_build_failure("shader failed to build, not drawing until fixed");
        }
        viewer.shader.set_used();
        viewer.shader.set_resolution(width, height);
        viewer
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport.update_size(width, height);
        self.viewport.set_used();
        self.resolution = Vector2::new(width, height);
        self.shader.set_resolution(width, height);
    }

    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        self.mouse = Point2::new(x, y);
        self.shader.set_mouse_pos(x, y);
    }

    /// Feeds the reload key state of this frame; reloads on the press edge.
    pub fn poll_reload(&mut self, pressed: bool) -> Option<Result<(), ShaderError>> {
        if !self.reload_latch.update(pressed) {
            return None;
        }
        Some(self.reload())
    }

    pub fn reload(&mut self) -> Result<(), ShaderError> {
        match self.shader.reload() {
            Ok(()) => {
                info!(
                    fragment = %self.shader.shader().fragment_path().display(),
                    "reloaded shader"
                );
                // a freshly linked program starts with zeroed uniforms
                self.shader.set_resolution(self.resolution.x, self.resolution.y);
                self.shader.set_mouse_pos(self.mouse.x, self.mouse.y);
                Ok(())
            }
            Err(err) => {
                self.log_build_failure("reload failed, not drawing until fixed");
                Err(err)
            }
        }
    }

    fn log_build_failure(&self, message: &str) {
        let shader = self.shader.shader();
        let log = shader.build_log();
        error!(
            fragment = %shader.fragment_path().display(),
            load = ?log.load,
            vertex = ?log.vertex,
            fragment_log = ?log.fragment,
            link = ?log.link,
            "{}",
            message
        );
    }

    /// Clears and draws one frame. Returns `false` when the shader is broken
    /// and only the clear happened.
    pub fn render_frame(&mut self, time: f32) -> bool {
        self.color_buffer.clear();
        if self.shader.is_error() {
            return false;
        }
        self.shader.set_used();
        self.shader.set_time(time);
        self.quad.render();
        true
    }

    pub fn shader(&self) -> &FrameBufferShader<G> {
        &self.shader
    }
}
