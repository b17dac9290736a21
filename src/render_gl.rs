mod api;
pub use self::api::{GlApi, GlContext};

mod shader;
pub use self::shader::{Program, Shader, ShaderError, ShaderStage};

mod uniforms;
pub use self::uniforms::UniformCache;

mod shader_program;
pub use self::shader_program::{BuildLog, ProgramStatus, ShaderProgram, VertexStage};

mod frame_buffer_shader;
pub use self::frame_buffer_shader::{
    FrameBufferContext, FrameBufferShader, MOUSE_POS_UNIFORM, RESOLUTION_UNIFORM, TIME_UNIFORM,
};

mod viewport;
pub use self::viewport::Viewport;

mod color_buffer;
pub use self::color_buffer::ColorBuffer;

pub mod buffer;

#[cfg(test)]
pub mod mock;
