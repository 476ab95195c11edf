mod app;
mod config;
mod scene;

use anyhow::Result;
use app::ViewerApp;
use clap::Parser;
use config::{Overrides, ViewerConfig};
use scene::Demo;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "lumen-viewer", about = "Fly through a field of cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shader pair to render with
    #[arg(long, value_enum)]
    demo: Option<Demo>,

    /// Initial window width
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    height: Option<u32>,

    /// Texture for the textured demo, relative to the asset root
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Asset root directory
    #[arg(long)]
    assets: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            demo: self.demo,
            width: self.width,
            height: self.height,
            texture: self.texture.clone(),
            assets: self.assets.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("lumen-viewer starting");

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    config.apply(cli.overrides());
    tracing::debug!(?config, "effective configuration");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(error) = app.take_error() {
        return Err(error);
    }
    tracing::info!("lumen-viewer closed");
    Ok(())
}
