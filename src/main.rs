use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

pub mod render_gl;
pub mod resources;

mod fullscreen_quad;
mod preview;
mod viewer;

use preview::{preview, PreviewOptions};
use resources::Resources;

const DEFAULT_FRAGMENT: &str = "shaders/basic.frag";

#[derive(StructOpt, Debug)]
#[structopt(
    name = "shadertool",
    about = "Renders a fragment shader full-screen. Press F5 or R to reload it."
)]
struct Opt {
    #[structopt(
        parse(from_os_str),
        about = "fragment shader path (defaults to the bundled assets/shaders/basic.frag)"
    )]
    fragment: Option<PathBuf>,
    #[structopt(
        parse(from_os_str),
        long,
        about = "custom vertex shader path instead of the built-in full-screen one"
    )]
    vertex: Option<PathBuf>,
    #[structopt(default_value = "800", long, about = "initial and minimum window width")]
    width: u32,
    #[structopt(default_value = "600", long, about = "initial and minimum window height")]
    height: u32,
    #[structopt(default_value = "shadertool", long, about = "window title")]
    title: String,
    #[structopt(long, about = "disable vertical sync")]
    no_vsync: bool,
}

impl Opt {
    fn into_preview_options(self) -> Result<PreviewOptions> {
        let fragment = match self.fragment {
            Some(fragment) => fragment,
            None => Resources::from_relative_exe_path(Path::new("assets"))
                .context("resource path error")?
                .path(DEFAULT_FRAGMENT),
        };
        Ok(PreviewOptions {
            fragment,
            vertex: self.vertex,
            width: self.width,
            height: self.height,
            title: self.title,
            vsync: !self.no_vsync,
        })
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    initialise_tracing();

    let opt = Opt::from_args();
    let options = opt.into_preview_options()?;
    tracing::info!(fragment = %options.fragment.display(), "loading shader");

    preview(options)
}
