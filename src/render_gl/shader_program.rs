use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::info;

use super::api::GlApi;
use super::shader::{Program, Shader, ShaderError, ShaderStage};
use super::uniforms::UniformCache;
use crate::resources;

/// Where a program's vertex stage comes from.
pub enum VertexStage<G: GlApi> {
    /// Read and compiled on every reload.
    File(PathBuf),
    /// Compiled once elsewhere and linked as is.
    Shared(Rc<Shader<G>>),
}

/// Outcome of the last build. Construction always builds, so there is no
/// state before the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramStatus {
    Linked,
    Failed,
}

/// Diagnostics of the last build, one slot per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildLog {
    pub load: Option<String>,
    pub vertex: Option<String>,
    pub fragment: Option<String>,
    pub link: Option<String>,
}

impl BuildLog {
    pub fn is_empty(&self) -> bool {
        self.load.is_none()
            && self.vertex.is_none()
            && self.fragment.is_none()
            && self.link.is_none()
    }
}

/// A program built from source files on disk that can be rebuilt in place.
///
/// Build failures never abort construction: the object stays around in the
/// [`ProgramStatus::Failed`] state with the diagnostics kept in its
/// [`BuildLog`], and callers check [`ShaderProgram::is_error`] before drawing.
pub struct ShaderProgram<G: GlApi> {
    gl: G,
    vertex: VertexStage<G>,
    fragment_path: PathBuf,
    program: Option<Program<G>>,
    log: BuildLog,
    uniforms: UniformCache,
}

impl<G: GlApi> ShaderProgram<G> {
    pub fn from_files(
        gl: G,
        vertex_path: impl Into<PathBuf>,
        fragment_path: impl Into<PathBuf>,
    ) -> Self {
        Self::with_vertex_stage(gl, VertexStage::File(vertex_path.into()), fragment_path.into())
    }

    pub fn with_vertex_stage(gl: G, vertex: VertexStage<G>, fragment_path: PathBuf) -> Self {
        let mut shader = ShaderProgram {
            gl,
            vertex,
            fragment_path,
            program: None,
            log: BuildLog::default(),
            uniforms: UniformCache::new(),
        };
        // a failure is kept in the build log for the caller to report
        let _ = shader.reload();
        shader
    }

    /// Drops the current program and builds a new one from the stored paths.
    ///
    /// The uniform cache is cleared along with the old program, on success
    /// and on failure alike.
    pub fn reload(&mut self) -> Result<(), ShaderError> {
        self.program = None;
        self.uniforms.clear();
        self.log = BuildLog::default();

        let program = self.build()?;
        info!(
            fragment = %self.fragment_path.display(),
            program = program.id(),
            "shader program linked"
        );
        self.program = Some(program);
        Ok(())
    }

    fn build(&mut self) -> Result<Program<G>, ShaderError> {
        let vertex_input = match &self.vertex {
            VertexStage::Shared(shader) => Ok(VertexInput::Compiled(Rc::clone(shader))),
            VertexStage::File(path) => {
                load_source(path).map(|source| VertexInput::Source(display_name(path), source))
            }
        };
        let fragment_source = load_source(&self.fragment_path);

        let (vertex_input, fragment_source) = match (vertex_input, fragment_source) {
            (Ok(vertex), Ok(fragment)) => (vertex, fragment),
            (Err(err), _) | (_, Err(err)) => return Err(self.record(err)),
        };

        let name = display_name(&self.fragment_path);
        let vertex = match vertex_input {
            VertexInput::Compiled(shader) => Ok(shader),
            VertexInput::Source(vertex_name, source) => {
                Shader::from_vert_source(&self.gl, &source, &vertex_name).map(Rc::new)
            }
        };
        let fragment = Shader::from_frag_source(&self.gl, &fragment_source, &name);

        let (vertex, fragment) = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => (vertex, fragment),
            (Err(vertex_err), Err(fragment_err)) => {
                self.record(fragment_err);
                return Err(self.record(vertex_err));
            }
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => return Err(self.record(err)),
        };

        Program::from_shaders(&self.gl, &name, &[&*vertex, &fragment])
            .map_err(|err| self.record(err))
    }

    fn record(&mut self, err: ShaderError) -> ShaderError {
        match &err {
            ShaderError::ResourceLoad { .. } | ShaderError::ContextNotInitialized => {
                self.log.load = Some(err.to_string())
            }
            ShaderError::CompileError {
                stage: ShaderStage::Vertex,
                message,
                ..
            } => self.log.vertex = Some(message.clone()),
            ShaderError::CompileError {
                stage: ShaderStage::Fragment,
                message,
                ..
            } => self.log.fragment = Some(message.clone()),
            ShaderError::LinkError { message, .. } => self.log.link = Some(message.clone()),
        }
        err
    }

    /// Makes the program current. Does nothing while no program is linked.
    pub fn set_used(&self) {
        if let Some(program) = &self.program {
            program.set_used();
        }
    }

    pub fn set_uniform_1f(&mut self, name: &str, v: f32) {
        if let Some(location) = self.bind_uniform(name) {
            self.gl.uniform_1f(location, v);
        }
    }

    pub fn set_uniform_2f(&mut self, name: &str, v1: f32, v2: f32) {
        if let Some(location) = self.bind_uniform(name) {
            self.gl.uniform_2f(location, v1, v2);
        }
    }

    pub fn set_uniform_3f(&mut self, name: &str, v1: f32, v2: f32, v3: f32) {
        if let Some(location) = self.bind_uniform(name) {
            self.gl.uniform_3f(location, v1, v2, v3);
        }
    }

    // resolves the location and makes the program current when the name is active
    fn bind_uniform(&mut self, name: &str) -> Option<gl::types::GLint> {
        let program = self.program.as_ref()?;
        let location = self.uniforms.location(&self.gl, program.id(), name)?;
        program.set_used();
        Some(location)
    }

    pub fn status(&self) -> ProgramStatus {
        if self.program.is_some() {
            ProgramStatus::Linked
        } else {
            ProgramStatus::Failed
        }
    }

    pub fn program_id(&self) -> Option<gl::types::GLuint> {
        self.program.as_ref().map(Program::id)
    }

    pub fn fragment_path(&self) -> &Path {
        &self.fragment_path
    }

    pub fn build_log(&self) -> &BuildLog {
        &self.log
    }

    pub fn uniforms(&self) -> &UniformCache {
        &self.uniforms
    }

    pub fn is_error(&self) -> bool {
        !self.log.is_empty()
    }

    pub fn is_vertex_error(&self) -> bool {
        self.log.vertex.is_some()
    }

    pub fn vertex_error(&self) -> Option<&str> {
        self.log.vertex.as_deref()
    }

    pub fn is_fragment_error(&self) -> bool {
        self.log.fragment.is_some()
    }

    pub fn fragment_error(&self) -> Option<&str> {
        self.log.fragment.as_deref()
    }

    /// The first diagnostic of the last build, if it failed.
    pub fn error_str(&self) -> Option<&str> {
        self.log
            .load
            .as_deref()
            .or_else(|| self.log.vertex.as_deref())
            .or_else(|| self.log.fragment.as_deref())
            .or_else(|| self.log.link.as_deref())
    }
}

enum VertexInput<G: GlApi> {
    Compiled(Rc<Shader<G>>),
    Source(String, CString),
}

fn load_source(path: &Path) -> Result<CString, ShaderError> {
    resources::load_cstring(path).map_err(|source| ShaderError::ResourceLoad {
        name: display_name(path),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}
