use crate::device::GraphicsDevice;
use crate::handle::{InvalidHandle, ResourceTable, ShaderId, ShaderKind, TextureId, TextureKind};
use crate::mesh::{MeshData, MeshError};
use crate::shader::{self, ActiveShader, RendererId, ShaderError, ShaderRecord, UniformLocation};
use crate::texture::{SamplerDesc, TextureError, TextureRecord, TextureUpload};
use std::path::Path;

/// Owns the graphics device and the shader and texture tables.
///
/// # Invariants
/// - Handle 0 of each table is the inert sentinel.
/// - A failed creation leaves the tables untouched.
/// - Dropping the renderer deletes every live program and texture, so it must
///   be dropped while the device's context is still current.
pub struct Renderer<D: GraphicsDevice> {
    id: RendererId,
    device: D,
    shaders: ResourceTable<ShaderKind, ShaderRecord<D::Program>>,
    textures: ResourceTable<TextureKind, TextureRecord<D::Texture>>,
}

impl<D: GraphicsDevice> Renderer<D> {
    pub fn new(device: D) -> Self {
        device.enable_depth_test();
        Self {
            id: RendererId::next(),
            device,
            shaders: ResourceTable::new(),
            textures: ResourceTable::new(),
        }
    }

    pub fn id(&self) -> RendererId {
        self.id
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn shaders(&self) -> &ResourceTable<ShaderKind, ShaderRecord<D::Program>> {
        &self.shaders
    }

    pub fn textures(&self) -> &ResourceTable<TextureKind, TextureRecord<D::Texture>> {
        &self.textures
    }

    /// Compile and link a program. Nothing is allocated on failure.
    pub fn compile_and_link(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderId, ShaderError> {
        let program = shader::build_program(&self.device, vertex_source, fragment_source)
            .inspect_err(|e| tracing::error!("{e}"))?;
        let id = self.shaders.allocate(ShaderRecord { program });
        tracing::debug!(shader = ?id, ?program, "shader linked");
        Ok(id)
    }

    /// Read a vertex/fragment pair from disk and compile it.
    pub fn load_shader(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<ShaderId, ShaderError> {
        let source = lumen_assets::read_shader_pair(vertex_path, fragment_path)?;
        self.compile_and_link(&source.vertex, &source.fragment)
    }

    /// Bind `shader` as the current program.
    ///
    /// A non-live handle (the sentinel included) unbinds any program instead;
    /// the returned session then draws nothing.
    pub fn activate(&mut self, shader: ShaderId) -> ActiveShader<'_, D> {
        let program = match self.shaders.get(shader) {
            Ok(slot) => slot.live().map(|record| record.program),
            Err(e) => {
                tracing::warn!("{e}; unbinding program");
                None
            }
        };
        ActiveShader::bind(&self.device, self.id, shader, program)
    }

    /// Look up a uniform without binding the program.
    pub fn uniform_location(
        &self,
        shader: ShaderId,
        name: &str,
    ) -> Result<UniformLocation<D::UniformLocation>, ShaderError> {
        let record = self.shaders.get_live(shader)?;
        match self.device.uniform_location(record.program, name) {
            Some(raw) => Ok(UniformLocation::new(self.id, shader, raw)),
            None => {
                tracing::error!(?shader, name, "failed to get uniform");
                Err(ShaderError::UniformNotFound {
                    shader,
                    name: name.to_owned(),
                })
            }
        }
    }

    /// Upload tightly packed 8-bit pixels. `channels` must be 3 or 4.
    pub fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        channels: u32,
        pixels: &[u8],
    ) -> Result<TextureId, TextureError> {
        let upload = TextureUpload::new(width, height, channels, pixels)?;
        let texture = self
            .device
            .create_texture(&upload, &SamplerDesc::default())
            .map_err(TextureError::Device)?;
        let id = self.textures.allocate(TextureRecord {
            texture,
            width,
            height,
            format: upload.format,
        });
        tracing::debug!(texture = ?id, width, height, format = ?upload.format, "texture uploaded");
        Ok(id)
    }

    /// Decode an image file (flipped vertically) and upload it.
    pub fn load_texture_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<TextureId, TextureError> {
        let path = path.as_ref();
        let image = lumen_assets::decode_image(path).map_err(|source| {
            tracing::error!(path = %path.display(), "failed to load texture");
            TextureError::DecodeFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.upload_texture(image.width, image.height, image.channels, &image.pixels)
    }

    /// The device texture behind a handle, for binding into a draw.
    pub fn texture_native_id(&self, texture: TextureId) -> Result<D::Texture, InvalidHandle> {
        self.textures
            .get_live(texture)
            .map(|record| record.texture)
            .inspect_err(|e| tracing::error!("{e}"))
    }

    pub fn upload_mesh(&self, mesh: &MeshData) -> Result<D::Mesh, MeshError> {
        mesh.validate()?;
        self.device.create_mesh(mesh).map_err(MeshError::Device)
    }

    pub fn release_mesh(&self, mesh: D::Mesh) {
        self.device.delete_mesh(mesh);
    }

    /// Set the viewport and clear colour and depth.
    pub fn begin_frame(&self, width: u32, height: u32, clear_color: [f32; 4]) {
        self.device.set_viewport(width, height);
        self.device.clear(clear_color);
    }
}

impl<D: GraphicsDevice> Drop for Renderer<D> {
    fn drop(&mut self) {
        self.device.use_program(None);
        for record in self.shaders.drain_live() {
            self.device.delete_program(record.program);
        }
        for record in self.textures.drain_live() {
            self.device.delete_texture(record.texture);
        }
    }
}
