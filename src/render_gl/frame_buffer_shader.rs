use std::path::PathBuf;
use std::rc::Rc;

use c_str_macro::c_str;
use tracing::debug;

use super::api::GlApi;
use super::shader::{Shader, ShaderError};
use super::shader_program::{ShaderProgram, VertexStage};

pub const TIME_UNIFORM: &str = "uTime";
pub const RESOLUTION_UNIFORM: &str = "uResolution";
pub const MOUSE_POS_UNIFORM: &str = "uMousePos";

/// Owns the full-screen pass-through vertex shader every [`FrameBufferShader`]
/// links against.
///
/// `init` must run before the first shader is created and `deinit` after the
/// last one is gone. The GL object itself lives until the last program
/// holding it is dropped.
pub struct FrameBufferContext<G: GlApi> {
    gl: G,
    vertex: Option<Rc<Shader<G>>>,
}

impl<G: GlApi> FrameBufferContext<G> {
    pub fn new(gl: G) -> Self {
        Self { gl, vertex: None }
    }

    /// Compiles the shared vertex shader. Calling it again is a no-op.
    pub fn init(&mut self) -> Result<(), ShaderError> {
        if self.vertex.is_none() {
            let shader = Shader::from_vert_source(
                &self.gl,
                c_str!(
                    r"#version 420 core
layout (location = 0) in vec2 Pos;
layout (location = 1) in vec2 TexCoord;
out vec2 aPos;
out vec2 aTexCoord;
void main() {
	aPos = Pos;
	aTexCoord = TexCoord;
	gl_Position = vec4(Pos, 0.0, 1.0);
}"
                ),
                "frame buffer vertex",
            )?;
            debug!(shader = shader.id(), stage = %shader.stage(), "compiled shared vertex shader");
            self.vertex = Some(Rc::new(shader));
        }
        Ok(())
    }

    pub fn deinit(&mut self) {
        if let Some(shader) = self.vertex.take() {
            debug!(
                shader = shader.id(),
                users = Rc::strong_count(&shader) - 1,
                "released shared vertex shader"
            );
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.vertex.is_some()
    }

    pub fn vertex_shader(&self) -> Result<Rc<Shader<G>>, ShaderError> {
        self.vertex
            .as_ref()
            .map(Rc::clone)
            .ok_or(ShaderError::ContextNotInitialized)
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }
}

/// A full-screen pixel shader fed with time, resolution and mouse position.
pub struct FrameBufferShader<G: GlApi> {
    shader: ShaderProgram<G>,
}

impl<G: GlApi> FrameBufferShader<G> {
    /// Links the fragment shader at `fragment_path` against the context's
    /// shared vertex stage.
    ///
    /// Only fails when `ctx` has not been initialized; build errors leave the
    /// shader in its failed state instead.
    pub fn new(
        ctx: &FrameBufferContext<G>,
        fragment_path: impl Into<PathBuf>,
    ) -> Result<Self, ShaderError> {
        let vertex = ctx.vertex_shader()?;
        Ok(Self {
            shader: ShaderProgram::with_vertex_stage(
                ctx.gl().clone(),
                VertexStage::Shared(vertex),
                fragment_path.into(),
            ),
        })
    }

    /// Uses a custom vertex shader instead of the shared one. It has to
    /// consume the quad's `Pos` and `TexCoord` attributes at locations 0 and 1.
    pub fn from_files(
        gl: G,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            shader: ShaderProgram::from_files(gl, vertex_path, fragment_path),
        }
    }

    /// Recompiles the fragment stage and relinks it.
    pub fn reload(&mut self) -> Result<(), ShaderError> {
        self.shader.reload()
    }

    pub fn set_used(&self) {
        self.shader.set_used();
    }

    pub fn set_time(&mut self, time: f32) {
        self.shader.set_uniform_1f(TIME_UNIFORM, time);
    }

    pub fn set_resolution(&mut self, width: i32, height: i32) {
        self.shader
            .set_uniform_2f(RESOLUTION_UNIFORM, width as f32, height as f32);
    }

    pub fn set_mouse_pos(&mut self, mouse_x: f32, mouse_y: f32) {
        self.shader.set_uniform_2f(MOUSE_POS_UNIFORM, mouse_x, mouse_y);
    }

    pub fn is_error(&self) -> bool {
        self.shader.is_error()
    }

    pub fn shader(&self) -> &ShaderProgram<G> {
        &self.shader
    }
}
