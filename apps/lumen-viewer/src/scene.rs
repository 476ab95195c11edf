use crate::config::ViewerConfig;
use anyhow::{Context as _, Result};
use glam::{Mat4, Vec3};
use lumen_render::{
    Camera, GraphicsDevice, MeshData, Renderer, ShaderError, ShaderId, UniformLocation,
};
use serde::Deserialize;

/// Which shader pair drives the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Demo {
    /// Cubes sampled from the configured texture.
    #[default]
    Textured,
    /// Cubes shaded with per-vertex colours.
    Colored,
}

impl Demo {
    /// Base name of the `.vert`/`.frag` pair under `shaders/`.
    pub fn shader_name(self) -> &'static str {
        match self {
            Self::Textured => "textured",
            Self::Colored => "colored",
        }
    }

    pub fn uses_texture(self) -> bool {
        matches!(self, Self::Textured)
    }
}

pub const TEXTURE_UNIT: u32 = 0;

#[rustfmt::skip]
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new( 0.0,  0.0,   0.0),
    Vec3::new( 2.0,  5.0, -15.0),
    Vec3::new(-1.5, -2.2,  -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new( 2.4, -0.4,  -3.5),
    Vec3::new(-1.7,  3.0,  -7.5),
    Vec3::new( 1.3, -2.0,  -2.5),
    Vec3::new( 1.5,  2.0,  -2.5),
    Vec3::new( 1.5,  0.2,  -1.5),
    Vec3::new(-1.3,  1.0,  -1.5),
];

pub fn model_matrices() -> impl Iterator<Item = Mat4> {
    CUBE_POSITIONS.into_iter().map(Mat4::from_translation)
}

/// GPU resources for one demo: a linked shader, its uniforms, the cube mesh
/// and (for the textured demo) the texture bound to unit 0.
pub struct Scene<D: GraphicsDevice> {
    shader: ShaderId,
    texture: Option<D::Texture>,
    mesh: D::Mesh,
    u_model: UniformLocation<D::UniformLocation>,
    u_view: UniformLocation<D::UniformLocation>,
    u_proj: UniformLocation<D::UniformLocation>,
}

impl<D: GraphicsDevice> Scene<D> {
    /// Load shaders and texture for `config.demo` and upload the cube.
    ///
    /// A uniform the frame writes but the shader lacks is an error here,
    /// not at draw time.
    pub fn load(renderer: &mut Renderer<D>, config: &ViewerConfig) -> Result<Self> {
        let demo = config.demo;
        let (vertex_path, fragment_path) = config.assets.shader_paths(demo.shader_name());
        let shader = renderer
            .load_shader(&vertex_path, &fragment_path)
            .with_context(|| format!("failed to build `{}` shader", demo.shader_name()))?;

        let texture = if demo.uses_texture() {
            let path = config.assets.texture_path();
            let id = renderer
                .load_texture_from_file(&path)
                .with_context(|| format!("failed to load texture {}", path.display()))?;
            Some(renderer.texture_native_id(id)?)
        } else {
            None
        };

        let (u_model, u_view, u_proj) = {
            let session = renderer.activate(shader);
            if texture.is_some() {
                session.set_i32_named("u_tex", TEXTURE_UNIT as i32)?;
            }
            (
                session.uniform_location("u_model")?,
                session.uniform_location("u_view")?,
                session.uniform_location("u_proj")?,
            )
        };

        let mesh = renderer.upload_mesh(&MeshData::cube())?;
        tracing::info!(?demo, ?shader, textured = texture.is_some(), "scene ready");

        Ok(Self {
            shader,
            texture,
            mesh,
            u_model,
            u_view,
            u_proj,
        })
    }

    /// Draw every cube from `camera`'s point of view.
    pub fn draw(&self, renderer: &mut Renderer<D>, camera: &Camera) -> Result<(), ShaderError> {
        let session = renderer.activate(self.shader);
        session.set_mat4(&self.u_view, &camera.view_matrix())?;
        session.set_mat4(&self.u_proj, &camera.projection())?;
        if let Some(texture) = self.texture {
            session.bind_texture(TEXTURE_UNIT, texture);
        }
        for model in model_matrices() {
            session.set_mat4(&self.u_model, &model)?;
            session.draw_mesh(&self.mesh);
        }
        Ok(())
    }

    /// Free the mesh. Programs and textures go with the renderer.
    pub fn release(self, renderer: &Renderer<D>) {
        renderer.release_mesh(self.mesh);
    }
}
