use anyhow::Context as _;
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use lumen_input::direction_from_yaw_pitch;
use lumen_render::{Camera, TextureFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "CLI tool for lumen operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the projection and view matrices of a perspective camera
    Camera {
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Vertical field of view in degrees
        #[arg(long, default_value = "45")]
        fov: f32,
        #[arg(long, default_value = "0.1")]
        near: f32,
        #[arg(long, default_value = "100")]
        far: f32,
        /// Yaw in degrees; -90 looks down -Z
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        yaw: f32,
        /// Pitch in degrees, clamped to +-89
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
        /// Camera position as x,y,z
        #[arg(long, default_value = "0,0,3", value_parser = parse_vec3, allow_hyphen_values = true)]
        position: Vec3,
    },
    /// Decode an image the way textures are loaded and report what would be uploaded
    Image {
        path: PathBuf,
    },
}

fn parse_vec3(text: &str) -> Result<Vec3, String> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("`{part}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected x,y,z, got {} components", parts.len())),
    }
}

fn print_matrix(label: &str, m: &Mat4) {
    println!("{label}:");
    // Row-major for reading; GL receives columns.
    for row in 0..4 {
        let r = m.row(row);
        println!("  [{:>10.5} {:>10.5} {:>10.5} {:>10.5}]", r.x, r.y, r.z, r.w);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", lumen_render::crate_info());
            println!("render-gl: {}", lumen_render_gl::crate_info());
            let (major, minor) = lumen_render_gl::GL_VERSION;
            println!("gl: {major}.{minor} core");
            println!("input: {}", lumen_input::crate_info());
            println!("assets: {}", lumen_assets::crate_info());
        }
        Commands::Camera {
            width,
            height,
            fov,
            near,
            far,
            yaw,
            pitch,
            position,
        } => {
            let pitch = pitch.clamp(-89.0, 89.0);
            let mut camera =
                Camera::perspective(position, width, height, near, far, fov.to_radians());
            camera.set_direction(direction_from_yaw_pitch(yaw, pitch));
            let front = camera.front();
            tracing::debug!(?front, "camera built");
            println!("viewport {width}x{height}, fov {fov} deg, near {near}, far {far}");
            println!("position ({:.3}, {:.3}, {:.3})", position.x, position.y, position.z);
            println!("yaw {yaw} deg, pitch {pitch} deg");
            println!("front ({:.5}, {:.5}, {:.5})", front.x, front.y, front.z);
            print_matrix("projection", &camera.projection());
            print_matrix("view", &camera.view_matrix());
        }
        Commands::Image { path } => {
            let image = lumen_assets::decode_image(&path)
                .with_context(|| format!("failed to inspect {}", path.display()))?;
            let format = TextureFormat::from_channels(image.channels)
                .context("decoded image has no uploadable format")?;
            println!("{}", path.display());
            println!("size: {}x{}", image.width, image.height);
            println!("source channels: {}", image.source_channels);
            println!("upload format: {format:?} ({} bytes)", image.pixels.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_position() {
        assert_eq!(parse_vec3("1,-2.5, 3").unwrap(), Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,3").is_err());
    }

    #[test]
    fn cli_parses_camera_defaults() {
        let cli = Cli::try_parse_from(["lumen-cli", "camera", "--yaw", "-45"]).unwrap();
        match cli.command {
            Commands::Camera {
                width, yaw, position, ..
            } => {
                assert_eq!(width, 800);
                assert_eq!(yaw, -45.0);
                assert_eq!(position, Vec3::new(0.0, 0.0, 3.0));
            }
            _ => panic!("expected camera command"),
        }
    }
}
