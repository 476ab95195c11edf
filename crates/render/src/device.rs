use crate::mesh::MeshData;
use crate::texture::{SamplerDesc, TextureUpload};
use glam::{Mat4, Vec3, Vec4};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// Value written to a uniform of the currently bound program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Mat4),
    Vec3(Vec3),
    Vec4(Vec4),
    F32(f32),
    I32(i32),
}

/// Low-level graphics API used by [`Renderer`](crate::Renderer).
///
/// Implementations wrap a current GL context (or a recording stand-in for
/// tests). Every method acts on global device state; the renderer is
/// responsible for ordering calls correctly. Failures carry the driver's
/// log text.
pub trait GraphicsDevice {
    type Program: Copy + fmt::Debug + PartialEq;
    type Stage: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug + PartialEq;
    type UniformLocation: Clone + fmt::Debug;
    type Mesh: fmt::Debug;

    /// On failure the stage object is already released.
    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String>;
    fn delete_stage(&self, stage: Self::Stage);
    /// Link two compiled stages. On failure the program object is already
    /// released; the stages are left to the caller.
    fn link_program(
        &self,
        vertex: Self::Stage,
        fragment: Self::Stage,
    ) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);
    /// `None` unbinds whatever program is current.
    fn use_program(&self, program: Option<Self::Program>);
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    /// Writes to the currently bound program.
    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue);

    /// Texture bindings on every unit are the same before and after.
    fn create_texture(
        &self,
        upload: &TextureUpload<'_>,
        sampler: &SamplerDesc,
    ) -> Result<Self::Texture, String>;
    fn delete_texture(&self, texture: Self::Texture);
    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>);

    fn create_mesh(&self, mesh: &MeshData) -> Result<Self::Mesh, String>;
    fn delete_mesh(&self, mesh: Self::Mesh);
    fn draw_mesh(&self, mesh: &Self::Mesh);

    fn set_viewport(&self, width: u32, height: u32);
    fn clear(&self, color: [f32; 4]);
    fn enable_depth_test(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
