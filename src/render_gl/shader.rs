use std::ffi::CStr;
use std::fmt;

use gl;
use thiserror::Error;

use super::api::GlApi;
use crate::resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_kind(self) -> gl::types::GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("unable to open shader '{name}'")]
    ResourceLoad {
        name: String,
        source: resources::ResError,
    },
    #[error("{stage} shader compile error: {name}\nmessage: {message}")]
    CompileError {
        name: String,
        stage: ShaderStage,
        message: String,
    },
    #[error("shader link error: {name}\nmessage: {message}")]
    LinkError { name: String, message: String },
    #[error("frame buffer context is not initialized")]
    ContextNotInitialized,
}

/// One compiled shader stage.
pub struct Shader<G: GlApi> {
    gl: G,
    id: gl::types::GLuint,
    stage: ShaderStage,
}

impl<G: GlApi> Shader<G> {
    pub fn from_source(
        gl: &G,
        source: &CStr,
        name: &str,
        stage: ShaderStage,
    ) -> Result<Shader<G>, ShaderError> {
        let shader = Shader {
            gl: gl.clone(),
            id: gl.create_shader(stage.gl_kind()),
            stage,
        };
        gl.shader_source(shader.id, source);
        gl.compile_shader(shader.id);
        if !gl.shader_compile_status(shader.id) {
            return Err(ShaderError::CompileError {
                name: name.to_string(),
                stage,
                message: gl.shader_info_log(shader.id),
            });
        }
        Ok(shader)
    }

    pub fn from_vert_source(gl: &G, source: &CStr, name: &str) -> Result<Shader<G>, ShaderError> {
        Shader::from_source(gl, source, name, ShaderStage::Vertex)
    }

    pub fn from_frag_source(gl: &G, source: &CStr, name: &str) -> Result<Shader<G>, ShaderError> {
        Shader::from_source(gl, source, name, ShaderStage::Fragment)
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<G: GlApi> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked program object.
pub struct Program<G: GlApi> {
    gl: G,
    id: gl::types::GLuint,
}

impl<G: GlApi> Program<G> {
    pub fn from_shaders(
        gl: &G,
        name: &str,
        shaders: &[&Shader<G>],
    ) -> Result<Program<G>, ShaderError> {
        let program = Program {
            gl: gl.clone(),
            id: gl.create_program(),
        };
        for shader in shaders {
            gl.attach_shader(program.id, shader.id());
        }
        gl.link_program(program.id);
        let linked = gl.program_link_status(program.id);
        let message = if linked {
            None
        } else {
            Some(gl.program_info_log(program.id))
        };
        for shader in shaders {
            gl.detach_shader(program.id, shader.id());
        }
        match message {
            Some(message) => Err(ShaderError::LinkError {
                name: name.to_string(),
                message,
            }),
            None => Ok(program),
        }
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    pub fn set_used(&self) {
        self.gl.use_program(self.id);
    }
}

impl<G: GlApi> Drop for Program<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
