use gl;
use na::{Point2, Vector2};
use nalgebra as na;

use crate::render_gl::buffer;
use crate::render_gl::GlApi;

#[derive(Clone, Copy, Debug)]
#[repr(C)]
struct Vertex {
    pos: Point2<f32>,
    tex_coord: Vector2<f32>,
}

impl Vertex {
    fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            pos: Point2::new(x, y),
            tex_coord: Vector2::new(u, v),
        }
    }
}

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Two triangles covering clip space, `Pos` at location 0 and `TexCoord` at 1.
pub struct FullscreenQuad<G: GlApi> {
    gl: G,
    _vbo: buffer::ArrayBuffer<G>,
    _ebo: buffer::ElementArrayBuffer<G>,
    vao: buffer::VertexArray<G>,
}

impl<G: GlApi> FullscreenQuad<G> {
    pub fn new(gl: &G) -> Self {
        let vertices = [
            Vertex::new(-1.0, -1.0, 0.0, 0.0),
            Vertex::new(1.0, -1.0, 1.0, 0.0),
            Vertex::new(1.0, 1.0, 1.0, 1.0),
            Vertex::new(-1.0, 1.0, 0.0, 1.0),
        ];

        let vbo = buffer::ArrayBuffer::new(gl);
        vbo.bind();
        // Vertex is repr(C) with four packed f32s
        unsafe {
            vbo.static_draw_data(&vertices);
        }
        vbo.unbind();

        let ebo = buffer::ElementArrayBuffer::new(gl);
        let vao = buffer::VertexArray::new(gl);
        vao.bind();
        vbo.bind();
        // the element buffer binding is recorded in the vertex array
        ebo.bind();
        unsafe {
            ebo.static_draw_data(&INDICES);
        }

        let stride = std::mem::size_of::<Vertex>() as gl::types::GLsizei;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer(0, 2, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer(1, 2, stride, std::mem::size_of::<Point2<f32>>());
        vao.unbind();
        vbo.unbind();

        Self {
            gl: gl.clone(),
            _vbo: vbo,
            _ebo: ebo,
            vao,
        }
    }

    pub fn render(&self) {
        self.vao.bind();
        self.gl
            .draw_elements(gl::TRIANGLES, INDICES.len() as gl::types::GLsizei);
    }
}
