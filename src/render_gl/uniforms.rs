use std::collections::HashMap;
use std::ffi::CString;

use gl::types::{GLint, GLuint};
use tracing::debug;

use super::api::GlApi;

/// Uniform locations of one linked program, looked up at most once per name.
///
/// Misses are cached too, so an undeclared name costs a single driver query.
/// Must be cleared whenever the program it describes is relinked.
#[derive(Debug, Default)]
pub struct UniformCache {
    locations: HashMap<String, GLint>,
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location<G: GlApi>(&mut self, gl: &G, program: GLuint, name: &str) -> Option<GLint> {
        let location = match self.locations.get(name) {
            Some(&location) => location,
            None => {
                // names with interior NULs can never be active uniforms
                let location = CString::new(name)
                    .map(|c_name| gl.get_uniform_location(program, &c_name))
                    .unwrap_or(-1);
                debug!(program, name, location, "cached uniform location");
                self.locations.insert(name.to_string(), location);
                location
            }
        };
        if location >= 0 {
            Some(location)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.locations.clear();
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
