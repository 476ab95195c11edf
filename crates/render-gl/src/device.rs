use glow::HasContext as _;
use lumen_render::{
    FilterMode, GraphicsDevice, MeshData, SamplerDesc, ShaderStage, TextureFormat, TextureUpload,
    UniformValue, Vertex, WrapMode,
};

/// Vertex array plus its two buffers.
#[derive(Debug)]
pub struct GlMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

/// [`GraphicsDevice`] over a loaded OpenGL 3.3 core context.
///
/// Every call assumes the context that `gl` was loaded from is current on
/// the calling thread. [`GlContext`](crate::GlContext) keeps it current for
/// the lifetime of the window.
pub struct GlDevice {
    gl: glow::Context,
}

impl GlDevice {
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        tracing::info!(
            major = version.major,
            minor = version.minor,
            vendor = %version.vendor_info,
            "OpenGL device ready"
        );
        Self { gl }
    }
}

/// Unit that texture uploads bind on; its previous binding is restored.
const UPLOAD_UNIT: u32 = 0;

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn wrap_enum(mode: WrapMode) -> i32 {
    (match mode {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
    }) as i32
}

fn filter_enum(mode: FilterMode) -> i32 {
    (match mode {
        FilterMode::Nearest => glow::NEAREST,
        FilterMode::Linear => glow::LINEAR,
        FilterMode::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }) as i32
}

fn format_enum(format: TextureFormat) -> u32 {
    match format {
        TextureFormat::Rgb8 => glow::RGB,
        TextureFormat::Rgba8 => glow::RGBA,
    }
}

impl GraphicsDevice for GlDevice {
    type Program = glow::Program;
    type Stage = glow::Shader;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;
    type Mesh = GlMesh;

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader, String> {
        let gl = &self.gl;
        unsafe {
            let shader = gl.create_shader(stage_enum(stage))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }
            Ok(shader)
        }
    }

    fn delete_stage(&self, stage: glow::Shader) {
        unsafe { self.gl.delete_shader(stage) }
    }

    fn link_program(
        &self,
        vertex: glow::Shader,
        fragment: glow::Shader,
    ) -> Result<glow::Program, String> {
        let gl = &self.gl;
        unsafe {
            let program = gl.create_program()?;
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);
            gl.detach_shader(program, vertex);
            gl.detach_shader(program, fragment);
            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(log);
            }
            Ok(program)
        }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn uniform_location(
        &self,
        program: glow::Program,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform(&self, location: &glow::UniformLocation, value: UniformValue) {
        let gl = &self.gl;
        let location = Some(location);
        unsafe {
            match value {
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
                UniformValue::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::F32(x) => gl.uniform_1_f32(location, x),
                UniformValue::I32(x) => gl.uniform_1_i32(location, x),
            }
        }
    }

    fn create_texture(
        &self,
        upload: &TextureUpload<'_>,
        sampler: &SamplerDesc,
    ) -> Result<glow::Texture, String> {
        let gl = &self.gl;
        let format = format_enum(upload.format);
        let width = i32::try_from(upload.width).map_err(|e| e.to_string())?;
        let height = i32::try_from(upload.height).map_err(|e| e.to_string())?;
        unsafe {
            let texture = gl.create_texture()?;
            gl.active_texture(glow::TEXTURE0 + UPLOAD_UNIT);
            let previous = gl.get_parameter_texture(glow::TEXTURE_BINDING_2D);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap_enum(sampler.wrap_s));
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap_enum(sampler.wrap_t));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter_enum(sampler.min_filter),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter_enum(sampler.mag_filter),
            );
            // RGB rows are not 4-byte aligned in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                width,
                height,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(upload.pixels)),
            );
            if sampler.generate_mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            gl.bind_texture(glow::TEXTURE_2D, previous);
            Ok(texture)
        }
    }

    fn delete_texture(&self, texture: glow::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn bind_texture(&self, unit: u32, texture: Option<glow::Texture>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
        }
    }

    fn create_mesh(&self, mesh: &MeshData) -> Result<GlMesh, String> {
        let gl = &self.gl;
        let index_count = i32::try_from(mesh.index_count()).map_err(|e| e.to_string())?;
        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;
            let ibo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, mesh.vertex_bytes(), glow::STATIC_DRAW);
            // The element binding is recorded in the VAO.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                mesh.index_bytes(),
                glow::STATIC_DRAW,
            );
            for attribute in Vertex::ATTRIBUTES {
                gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    Vertex::STRIDE,
                    attribute.offset,
                );
                gl.enable_vertex_attrib_array(attribute.location);
            }
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(GlMesh {
                vao,
                vbo,
                ibo,
                index_count,
            })
        }
    }

    fn delete_mesh(&self, mesh: GlMesh) {
        unsafe {
            self.gl.delete_vertex_array(mesh.vao);
            self.gl.delete_buffer(mesh.vbo);
            self.gl.delete_buffer(mesh.ibo);
        }
    }

    fn draw_mesh(&self, mesh: &GlMesh) {
        unsafe {
            self.gl.bind_vertex_array(Some(mesh.vao));
            self.gl
                .draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        let clamp = |v: u32| v.min(i32::MAX as u32) as i32;
        unsafe { self.gl.viewport(0, 0, clamp(width), clamp(height)) }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn enable_depth_test(&self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampler_defaults_map_to_gl_enums() {
        let sampler = SamplerDesc::default();
        assert_eq!(wrap_enum(sampler.wrap_s), glow::MIRRORED_REPEAT as i32);
        assert_eq!(filter_enum(sampler.min_filter), glow::LINEAR_MIPMAP_LINEAR as i32);
        assert_eq!(filter_enum(sampler.mag_filter), glow::LINEAR as i32);
    }

    #[test]
    fn formats_map_to_matching_gl_layouts() {
        assert_eq!(format_enum(TextureFormat::Rgb8), glow::RGB);
        assert_eq!(format_enum(TextureFormat::Rgba8), glow::RGBA);
        assert_eq!(stage_enum(ShaderStage::Vertex), glow::VERTEX_SHADER);
        assert_eq!(stage_enum(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    }
}
