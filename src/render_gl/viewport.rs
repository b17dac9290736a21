use super::api::GlApi;

pub struct Viewport<G: GlApi> {
    gl: G,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl<G: GlApi> Viewport<G> {
    pub fn for_window(gl: G, w: i32, h: i32) -> Self {
        Self { gl, x: 0, y: 0, w, h }
    }

    pub fn update_size(&mut self, w: i32, h: i32) {
        self.w = w;
        self.h = h;
    }

    pub fn set_used(&self) {
        self.gl.viewport(self.x, self.y, self.w, self.h);
    }
}
