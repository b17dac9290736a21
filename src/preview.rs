use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use sdl2;
use tracing::{info, warn};

use crate::render_gl::{FrameBufferContext, FrameBufferShader, GlContext};
use crate::viewer::Viewer;

pub struct PreviewOptions {
    pub fragment: PathBuf,
    pub vertex: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

pub fn preview(options: PreviewOptions) -> Result<()> {
    let sdl = sdl2::init().map_err(|e| anyhow!(e)).context("sdl init error")?;
    let video_subsystem = sdl.video().map_err(|e| anyhow!(e))?;

    {
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(4, 2);
        let (major, minor) = gl_attr.context_version();
        info!(major, minor, "requested OpenGL context");
    }

    let mut window = video_subsystem
        .window(&options.title, options.width, options.height)
        .opengl()
        .resizable()
        .position_centered()
        .build()
        .context("window creation error")?;
    window
        .set_minimum_size(options.width, options.height)
        .map_err(|e| anyhow!(e.to_string()))?;

    let _gl_context = window
        .gl_create_context()
        .map_err(|e| anyhow!(e))
        .context("OpenGL context creation error")?;
    let gl = GlContext::load_with(|s| {
        video_subsystem.gl_get_proc_address(s) as *const std::os::raw::c_void
    });

    let interval = if options.vsync {
        sdl2::video::SwapInterval::VSync
    } else {
        sdl2::video::SwapInterval::Immediate
    };
    if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
        warn!(error = %e, "unable to set swap interval");
    }

    let mut ctx = FrameBufferContext::new(gl);
    ctx.init().context("default vertex shader error")?;
    {
        let shader = match &options.vertex {
            Some(vertex) => FrameBufferShader::from_files(gl, vertex, &options.fragment),
            None => FrameBufferShader::new(&ctx, &options.fragment)?,
        };
        let mut viewer = Viewer::new(&gl, shader, options.width as i32, options.height as i32);
        update_title(&mut window, &options, viewer.shader().is_error());

        let start = Instant::now();
        let mut event_pump = sdl.event_pump().map_err(|e| anyhow!(e))?;
        'main: loop {
            for event in event_pump.poll_iter() {
                use sdl2::event::Event;
                use sdl2::event::WindowEvent;
                use sdl2::keyboard::Keycode;
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'main,
                    Event::Window {
                        win_event: WindowEvent::SizeChanged(width, height),
                        ..
                    } => viewer.resize(width, height),
                    Event::MouseMotion { x, y, .. } => viewer.mouse_moved(x as f32, y as f32),
                    _ => {}
                }
            }

            let reload_pressed = {
                use sdl2::keyboard::Scancode;
                let keys = event_pump.keyboard_state();
                keys.is_scancode_pressed(Scancode::F5) || keys.is_scancode_pressed(Scancode::R)
            };
            if let Some(result) = viewer.poll_reload(reload_pressed) {
                update_title(&mut window, &options, result.is_err());
            }

            viewer.render_frame(start.elapsed().as_secs_f32());

            window.gl_swap_window();
        }
    }
    ctx.deinit();

    Ok(())
}

fn update_title(window: &mut sdl2::video::Window, options: &PreviewOptions, failed: bool) {
    let mut title = format!("{} - {}", options.title, options.fragment.display());
    if failed {
        title.push_str(" [error]");
    }
    if let Err(e) = window.set_title(&title) {
        warn!(error = %e, "unable to set window title");
    }
}
