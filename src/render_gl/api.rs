//! The OpenGL entry points used by the renderer.
//!
//! Everything that touches the GPU goes through [`GlApi`], so shader building,
//! uniform caching and the viewer can be exercised without a live context.

use std::ffi::{CStr, CString};

use gl;
use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

pub trait GlApi: Clone {
    fn create_shader(&self, kind: GLenum) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    /// Returns `-1` when `name` is not an active uniform of `program`.
    fn get_uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_1f(&self, location: GLint, v0: f32);
    fn uniform_2f(&self, location: GLint, v0: f32, v1: f32);
    fn uniform_3f(&self, location: GLint, v0: f32, v1: f32, v2: f32);

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);

    fn gen_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: GLenum, buffer: GLuint);
    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);
    fn delete_buffer(&self, buffer: GLuint);
    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vao: GLuint);
    fn delete_vertex_array(&self, vao: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    /// Float attribute, not normalized, `offset` bytes into the bound array buffer.
    fn vertex_attrib_pointer(&self, index: GLuint, size: GLint, stride: GLsizei, offset: usize);
    /// Draws `count` `u32` indices from the bound element buffer.
    fn draw_elements(&self, mode: GLenum, count: GLsizei);
}

/// The process' loaded OpenGL function pointers.
///
/// Only obtainable through [`GlContext::load_with`], after a context has been
/// made current.
#[derive(Clone, Copy, Debug)]
pub struct GlContext {
    _loaded: (),
}

impl GlContext {
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const std::os::raw::c_void,
    {
        gl::load_with(loader);
        Self { _loaded: () }
    }
}

impl GlApi for GlContext {
    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), std::ptr::null());
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe {
            gl::CompileShader(shader);
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success: GLint = 1;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        let error = create_whitespace_cstring_with_len(len.max(0) as usize);
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                len,
                std::ptr::null_mut(),
                error.as_ptr() as *mut gl::types::GLchar,
            );
        }
        info_log_to_string(error)
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe {
            gl::DeleteShader(shader);
        }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe {
            gl::AttachShader(program, shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe {
            gl::DetachShader(program, shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        unsafe {
            gl::LinkProgram(program);
        }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success: GLint = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        let error = create_whitespace_cstring_with_len(len.max(0) as usize);
        unsafe {
            gl::GetProgramInfoLog(
                program,
                len,
                std::ptr::null_mut(),
                error.as_ptr() as *mut gl::types::GLchar,
            );
        }
        info_log_to_string(error)
    }

    fn delete_program(&self, program: GLuint) {
        unsafe {
            gl::DeleteProgram(program);
        }
    }

    fn use_program(&self, program: GLuint) {
        unsafe {
            gl::UseProgram(program);
        }
    }

    fn get_uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1f(&self, location: GLint, v0: f32) {
        unsafe {
            gl::Uniform1f(location, v0);
        }
    }

    fn uniform_2f(&self, location: GLint, v0: f32, v1: f32) {
        unsafe {
            gl::Uniform2f(location, v0, v1);
        }
    }

    fn uniform_3f(&self, location: GLint, v0: f32, v1: f32, v2: f32) {
        unsafe {
            gl::Uniform3f(location, v0, v1, v2);
        }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe {
            gl::Viewport(x, y, width, height);
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            gl::ClearColor(r, g, b, a);
        }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe {
            gl::Clear(mask);
        }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut buffer: GLuint = 0;
        unsafe {
            gl::GenBuffers(1, &mut buffer);
        }
        buffer
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        unsafe {
            gl::BindBuffer(target, buffer);
        }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        unsafe {
            gl::BufferData(
                target,
                data.len() as gl::types::GLsizeiptr,
                data.as_ptr() as *const gl::types::GLvoid,
                usage,
            );
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe {
            gl::DeleteBuffers(1, &buffer);
        }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut vao: GLuint = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
        }
        vao
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        unsafe {
            gl::BindVertexArray(vao);
        }
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        unsafe {
            gl::DeleteVertexArrays(1, &vao);
        }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe {
            gl::EnableVertexAttribArray(index);
        }
    }

    fn vertex_attrib_pointer(&self, index: GLuint, size: GLint, stride: GLsizei, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                size,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const gl::types::GLvoid,
            );
        }
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei) {
        unsafe {
            gl::DrawElements(mode, count, gl::UNSIGNED_INT, std::ptr::null());
        }
    }
}

fn create_whitespace_cstring_with_len(len: usize) -> CString {
    // allocate buffer of correct size
    let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
    // fill it with len spaces
    buffer.extend([b' '].iter().cycle().take(len));
    // convert buffer to CString
    unsafe { CString::from_vec_unchecked(buffer) }
}

// GL writes a terminating NUL inside the buffer; drop it and whatever follows.
fn info_log_to_string(log: CString) -> String {
    let bytes = log.as_bytes();
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
