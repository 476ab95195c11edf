use crate::device::{GraphicsDevice, ShaderStage, UniformValue};
use crate::handle::{InvalidHandle, ResourceKind, ShaderId, ShaderKind};
use glam::{Mat4, Vec3, Vec4};
use std::sync::atomic::{AtomicU32, Ordering};

/// Errors from shader creation and uniform access.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("vertex shader compilation failed: {0}")]
    VertexCompile(String),
    #[error("fragment shader compilation failed: {0}")]
    FragmentCompile(String),
    #[error("shader program linking failed: {0}")]
    Link(String),
    #[error("uniform `{name}` not found in {shader:?}")]
    UniformNotFound { shader: ShaderId, name: String },
    #[error("uniform location belongs to {owner:?}, but {active:?} is active")]
    ForeignUniform { owner: ShaderId, active: ShaderId },
    #[error("uniform location for {shader:?} was looked up on a different renderer")]
    ForeignRenderer { shader: ShaderId },
    #[error(transparent)]
    InvalidHandle(#[from] InvalidHandle),
    #[error("failed to load shader source: {0}")]
    Source(#[from] lumen_assets::AssetError),
}

/// Live shader slot contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderRecord<P> {
    pub program: P,
}

/// Identifies one [`Renderer`](crate::Renderer); shader ids are only unique
/// within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(u32);

impl RendererId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A uniform location tagged with the renderer and shader it was looked up in.
#[derive(Debug, Clone)]
pub struct UniformLocation<L> {
    renderer: RendererId,
    shader: ShaderId,
    raw: L,
}

impl<L> UniformLocation<L> {
    pub(crate) fn new(renderer: RendererId, shader: ShaderId, raw: L) -> Self {
        Self {
            renderer,
            shader,
            raw,
        }
    }

    pub fn shader(&self) -> ShaderId {
        self.shader
    }

    pub fn raw(&self) -> &L {
        &self.raw
    }
}

/// Compile both stages and link them. Stage objects never outlive this call.
pub(crate) fn build_program<D: GraphicsDevice>(
    device: &D,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<D::Program, ShaderError> {
    let vertex = device
        .compile_stage(ShaderStage::Vertex, vertex_source)
        .map_err(ShaderError::VertexCompile)?;

    let fragment = match device.compile_stage(ShaderStage::Fragment, fragment_source) {
        Ok(stage) => stage,
        Err(log) => {
            device.delete_stage(vertex);
            return Err(ShaderError::FragmentCompile(log));
        }
    };

    let linked = device.link_program(vertex, fragment);
    device.delete_stage(vertex);
    device.delete_stage(fragment);
    linked.map_err(ShaderError::Link)
}

/// The currently bound program.
///
/// Returned by [`Renderer::activate`](crate::Renderer::activate). It holds the
/// renderer's exclusive borrow, so uniforms can only be written and draws
/// issued while this shader is the bound one. A session for a non-live
/// handle has no program bound: lookups fail and draws are skipped.
pub struct ActiveShader<'r, D: GraphicsDevice> {
    device: &'r D,
    renderer: RendererId,
    shader: ShaderId,
    program: Option<D::Program>,
}

impl<'r, D: GraphicsDevice> ActiveShader<'r, D> {
    pub(crate) fn bind(
        device: &'r D,
        renderer: RendererId,
        shader: ShaderId,
        program: Option<D::Program>,
    ) -> Self {
        device.use_program(program);
        Self {
            device,
            renderer,
            shader,
            program,
        }
    }

    pub fn shader(&self) -> ShaderId {
        self.shader
    }

    /// False when the null shader (or any non-live handle) was activated.
    pub fn is_bound(&self) -> bool {
        self.program.is_some()
    }

    /// Fails with `InvalidHandle` when no program is bound.
    pub fn uniform_location(
        &self,
        name: &str,
    ) -> Result<UniformLocation<D::UniformLocation>, ShaderError> {
        let program = self.program.ok_or_else(|| {
            ShaderError::InvalidHandle(InvalidHandle {
                kind: ShaderKind::NAME,
                index: self.shader.index(),
            })
        })?;
        self.device
            .uniform_location(program, name)
            .map(|raw| UniformLocation::new(self.renderer, self.shader, raw))
            .ok_or_else(|| ShaderError::UniformNotFound {
                shader: self.shader,
                name: name.to_owned(),
            })
    }

    pub fn set(
        &self,
        location: &UniformLocation<D::UniformLocation>,
        value: UniformValue,
    ) -> Result<(), ShaderError> {
        if location.renderer != self.renderer {
            return Err(ShaderError::ForeignRenderer {
                shader: location.shader,
            });
        }
        if location.shader != self.shader {
            return Err(ShaderError::ForeignUniform {
                owner: location.shader,
                active: self.shader,
            });
        }
        self.device.set_uniform(&location.raw, value);
        Ok(())
    }

    pub fn set_mat4(
        &self,
        location: &UniformLocation<D::UniformLocation>,
        value: &Mat4,
    ) -> Result<(), ShaderError> {
        self.set(location, UniformValue::Mat4(*value))
    }

    pub fn set_vec3(
        &self,
        location: &UniformLocation<D::UniformLocation>,
        value: Vec3,
    ) -> Result<(), ShaderError> {
        self.set(location, UniformValue::Vec3(value))
    }

    pub fn set_vec4(
        &self,
        location: &UniformLocation<D::UniformLocation>,
        value: Vec4,
    ) -> Result<(), ShaderError> {
        self.set(location, UniformValue::Vec4(value))
    }

    pub fn set_f32(
        &self,
        location: &UniformLocation<D::UniformLocation>,
        value: f32,
    ) -> Result<(), ShaderError> {
        self.set(location, UniformValue::F32(value))
    }

    pub fn set_i32(
        &self,
        location: &UniformLocation<D::UniformLocation>,
        value: i32,
    ) -> Result<(), ShaderError> {
        self.set(location, UniformValue::I32(value))
    }

    /// Look up `name` and write `value` to it.
    pub fn set_named(&self, name: &str, value: UniformValue) -> Result<(), ShaderError> {
        let location = self.uniform_location(name)?;
        self.set(&location, value)
    }

    pub fn set_mat4_named(&self, name: &str, value: &Mat4) -> Result<(), ShaderError> {
        self.set_named(name, UniformValue::Mat4(*value))
    }

    pub fn set_i32_named(&self, name: &str, value: i32) -> Result<(), ShaderError> {
        self.set_named(name, UniformValue::I32(value))
    }

    /// Bind a native texture (see [`Renderer::texture_native_id`](crate::Renderer::texture_native_id))
    /// to a texture unit.
    pub fn bind_texture(&self, unit: u32, texture: D::Texture) {
        self.device.bind_texture(unit, Some(texture));
    }

    pub fn draw_mesh(&self, mesh: &D::Mesh) {
        if self.program.is_none() {
            tracing::trace!(shader = ?self.shader, "null shader active, draw skipped");
            return;
        }
        self.device.draw_mesh(mesh);
    }
}
