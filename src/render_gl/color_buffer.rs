use gl;
use na::{Vector3, Vector4};
use nalgebra as na;

use super::api::GlApi;

pub struct ColorBuffer<G: GlApi> {
    gl: G,
    pub color: Vector4<f32>,
}

impl<G: GlApi> ColorBuffer<G> {
    pub fn from_color(gl: G, color: Vector3<f32>) -> Self {
        Self {
            gl,
            color: color.push(1.0),
        }
    }

    pub fn set_used(&self) {
        self.gl
            .clear_color(self.color.x, self.color.y, self.color.z, self.color.w);
    }

    pub fn clear(&self) {
        self.gl.clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}
