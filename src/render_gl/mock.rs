//! A fake OpenGL that records what the renderer asks of it.
//!
//! Compilation fails when a source contains `#error`, linking fails when an
//! attached stage has no `main`, and the active uniforms of a linked program
//! are the `uniform <type> <name>;` declarations of its stages.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;
use std::rc::Rc;

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

use super::api::GlApi;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    LinkProgram(GLuint),
    DeleteProgram(GLuint),
    UseProgram(GLuint),
    GetUniformLocation(GLuint, String),
    Viewport(GLint, GLint, GLsizei, GLsizei),
    ClearColor([f32; 4]),
    Clear(GLbitfield),
    DrawElements(GLenum, GLsizei),
}

#[derive(Debug, Default)]
struct MockShader {
    kind: GLenum,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<GLuint>,
    linked: bool,
    info_log: String,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: GLuint,
    shaders: HashMap<GLuint, MockShader>,
    programs: HashMap<GLuint, MockProgram>,
    bound_program: GLuint,
    uniform_values: HashMap<(GLuint, GLint), Vec<f32>>,
    buffer_data: HashMap<GLenum, Vec<u8>>,
    calls: Vec<GlCall>,
}

impl MockState {
    fn next_id(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }

    fn set_uniform(&mut self, location: GLint, values: Vec<f32>) {
        if location >= 0 {
            let program = self.bound_program;
            self.uniform_values.insert((program, location), values);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockGl {
    state: Rc<RefCell<MockState>>,
}

impl MockGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(*c)).count()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn bound_program(&self) -> GLuint {
        self.state.borrow().bound_program
    }

    /// Last value written to the uniform `name` of `program`.
    pub fn uniform_value(&self, program: GLuint, name: &str) -> Option<Vec<f32>> {
        let state = self.state.borrow();
        let location = state
            .programs
            .get(&program)?
            .uniforms
            .iter()
            .position(|u| u == name)? as GLint;
        state.uniform_values.get(&(program, location)).cloned()
    }

    pub fn buffer_data(&self, target: GLenum) -> Option<Vec<u8>> {
        self.state.borrow().buffer_data.get(&target).cloned()
    }
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let mut words = line.trim().trim_end_matches(';').split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("uniform"), Some(_), Some(name)) => Some(name.to_string()),
            _ => None,
        }
    })
}

impl GlApi for MockGl {
    fn create_shader(&self, kind: GLenum) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.shaders.insert(
            id,
            MockShader {
                kind,
                ..Default::default()
            },
        );
        state.calls.push(GlCall::CreateShader(id));
        id
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string_lossy().into_owned();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.compiled = !s.source.contains("#error");
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(s) if !s.compiled => {
                let stage = if s.kind == gl::VERTEX_SHADER {
                    "vertex"
                } else {
                    "fragment"
                };
                format!("0:1(1): error: #error directive in {} shader", stage)
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.programs.insert(id, MockProgram::default());
        state.calls.push(GlCall::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.calls.push(GlCall::LinkProgram(program));
        let MockState { programs, shaders, .. } = &mut *state;
        let p = match programs.get_mut(&program) {
            Some(p) => p,
            None => return,
        };
        let stages: Vec<&MockShader> = p
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .collect();
        if let Some(missing) = stages.iter().find(|s| !s.source.contains("main(")) {
            let stage = if missing.kind == gl::VERTEX_SHADER {
                "vertex"
            } else {
                "fragment"
            };
            p.linked = false;
            p.info_log = format!("error: {} shader lacks `main'", stage);
            p.uniforms.clear();
            return;
        }
        let mut uniforms = Vec::new();
        for stage in &stages {
            for name in declared_uniforms(&stage.source) {
                if !uniforms.contains(&name) {
                    uniforms.push(name);
                }
            }
        }
        p.linked = stages.iter().all(|s| s.compiled);
        p.info_log.clear();
        p.uniforms = uniforms;
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.uniform_values.retain(|&(p, _), _| p != program);
        if state.bound_program == program {
            state.bound_program = 0;
        }
        state.calls.push(GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        state.bound_program = program;
        state.calls.push(GlCall::UseProgram(program));
    }

    fn get_uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let name = name.to_string_lossy().into_owned();
        let mut state = self.state.borrow_mut();
        let location = state
            .programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| *u == name))
            .map_or(-1, |i| i as GLint);
        state.calls.push(GlCall::GetUniformLocation(program, name));
        location
    }

    fn uniform_1f(&self, location: GLint, v0: f32) {
        self.state.borrow_mut().set_uniform(location, vec![v0]);
    }

    fn uniform_2f(&self, location: GLint, v0: f32, v1: f32) {
        self.state.borrow_mut().set_uniform(location, vec![v0, v1]);
    }

    fn uniform_3f(&self, location: GLint, v0: f32, v1: f32, v2: f32) {
        self.state.borrow_mut().set_uniform(location, vec![v0, v1, v2]);
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::Viewport(x, y, width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: GLbitfield) {
        self.state.borrow_mut().calls.push(GlCall::Clear(mask));
    }

    fn gen_buffer(&self) -> GLuint {
        self.state.borrow_mut().next_id()
    }

    fn bind_buffer(&self, _target: GLenum, _buffer: GLuint) {}

    fn buffer_data(&self, target: GLenum, data: &[u8], _usage: GLenum) {
        self.state
            .borrow_mut()
            .buffer_data
            .insert(target, data.to_vec());
    }

    fn delete_buffer(&self, _buffer: GLuint) {}

    fn gen_vertex_array(&self) -> GLuint {
        self.state.borrow_mut().next_id()
    }

    fn bind_vertex_array(&self, _vao: GLuint) {}

    fn delete_vertex_array(&self, _vao: GLuint) {}

    fn enable_vertex_attrib_array(&self, _index: GLuint) {}

    fn vertex_attrib_pointer(&self, _: GLuint, _: GLint, _: GLsizei, _: usize) {}

    fn draw_elements(&self, mode: GLenum, count: GLsizei) {
        self.state
            .borrow_mut()
            .calls
            .push(GlCall::DrawElements(mode, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c_str_macro::c_str;

    fn compiled(gl: &MockGl, kind: GLenum, source: &CStr) -> GLuint {
        let id = gl.create_shader(kind);
        gl.shader_source(id, source);
        gl.compile_shader(id);
        id
    }

    #[test]
    fn link_collects_uniforms_of_every_stage() {
        let gl = MockGl::new();
        let vert = compiled(
            &gl,
            gl::VERTEX_SHADER,
            c_str!("uniform vec2 uOffset;\nvoid main() {}"),
        );
        let frag = compiled(
            &gl,
            gl::FRAGMENT_SHADER,
            c_str!("uniform float uTime;\nvoid main() {}"),
        );
        let program = gl.create_program();
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);

        gl.link_program(program);

        assert!(gl.program_link_status(program));
        assert_eq!(gl.get_uniform_location(program, c_str!("uOffset")), 0);
        assert_eq!(gl.get_uniform_location(program, c_str!("uTime")), 1);
        assert_eq!(gl.get_uniform_location(program, c_str!("uMissing")), -1);
    }

    #[test]
    fn link_without_main_fails_with_log() {
        let gl = MockGl::new();
        let vert = compiled(&gl, gl::VERTEX_SHADER, c_str!("void main() {}"));
        let frag = compiled(&gl, gl::FRAGMENT_SHADER, c_str!("out vec4 c;"));
        let program = gl.create_program();
        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);

        gl.link_program(program);

        assert!(!gl.program_link_status(program));
        assert!(gl.program_info_log(program).contains("fragment"));
    }
}
