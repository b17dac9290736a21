use std::marker::PhantomData;

use gl;

use super::api::GlApi;

pub trait BufferType {
    const BUFFER_TYPE: gl::types::GLenum;
}

pub struct BufferTypeArray;
impl BufferType for BufferTypeArray {
    const BUFFER_TYPE: gl::types::GLenum = gl::ARRAY_BUFFER;
}

pub struct BufferTypeElementArray;
impl BufferType for BufferTypeElementArray {
    const BUFFER_TYPE: gl::types::GLenum = gl::ELEMENT_ARRAY_BUFFER;
}

pub type ArrayBuffer<G> = Buffer<G, BufferTypeArray>;
pub type ElementArrayBuffer<G> = Buffer<G, BufferTypeElementArray>;

pub struct Buffer<G: GlApi, B: BufferType> {
    gl: G,
    vbo: gl::types::GLuint,
    _marker: PhantomData<B>,
}

impl<G: GlApi, B: BufferType> Buffer<G, B> {
    pub fn new(gl: &G) -> Self {
        Self {
            gl: gl.clone(),
            vbo: gl.gen_buffer(),
            _marker: PhantomData,
        }
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(B::BUFFER_TYPE, self.vbo);
    }

    pub fn unbind(&self) {
        self.gl.bind_buffer(B::BUFFER_TYPE, 0);
    }

    /// Uploads `data` to the bound buffer as raw bytes.
    ///
    /// # Safety
    ///
    /// `T` must have no padding bytes, e.g. a primitive or a `#[repr(C)]`
    /// struct whose fields pack tightly.
    pub unsafe fn static_draw_data<T: Copy>(&self, data: &[T]) {
        let bytes =
            std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data));
        self.gl.buffer_data(B::BUFFER_TYPE, bytes, gl::STATIC_DRAW);
    }
}

impl<G: GlApi, B: BufferType> Drop for Buffer<G, B> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
    }
}

pub struct VertexArray<G: GlApi> {
    gl: G,
    vao: gl::types::GLuint,
}

impl<G: GlApi> VertexArray<G> {
    pub fn new(gl: &G) -> Self {
        Self {
            gl: gl.clone(),
            vao: gl.gen_vertex_array(),
        }
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.vao);
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(0);
    }
}

impl<G: GlApi> Drop for VertexArray<G> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vao);
    }
}
