//! Recording device for tests. No GPU involved.
//!
//! "Compilation" requires a `main` function and balanced braces, linking
//! requires every fragment `in` to be written by a vertex `out`, and
//! `uniform` declarations become locations.

use crate::device::{GraphicsDevice, ShaderStage, UniformValue};
use crate::mesh::MeshData;
use crate::texture::{SamplerDesc, TextureFormat, TextureUpload};
use std::cell::RefCell;
use std::collections::BTreeMap;

pub const PASS_THROUGH_VERT: &str = "#version 330 core
layout (location = 0) in vec3 a_pos;
layout (location = 2) in vec2 a_uv;
uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_proj;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_proj * u_view * u_model * vec4(a_pos, 1.0);
}
";

pub const PASS_THROUGH_FRAG: &str = "#version 330 core
in vec2 v_uv;
uniform sampler2D u_tex;
out vec4 frag_color;
void main() {
    frag_color = texture(u_tex, v_uv);
}
";

#[derive(Debug, Clone)]
pub struct MockTexture {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub sampler: SamplerDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockMesh {
    pub id: u32,
    pub index_count: usize,
}

#[derive(Debug, Default)]
struct Stage {
    kind: Option<ShaderStage>,
    source: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    stages: BTreeMap<u32, Stage>,
    programs: BTreeMap<u32, Vec<String>>,
    textures: BTreeMap<u32, MockTexture>,
    meshes: BTreeMap<u32, usize>,
    current_program: Option<u32>,
    bound_textures: BTreeMap<u32, u32>,
    uniform_writes: Vec<(u32, u32, UniformValue)>,
    draws: Vec<(u32, u32)>,
    viewport: Option<(u32, u32)>,
    clears: usize,
    depth_test: bool,
}

impl State {
    fn fresh_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct MockDevice {
    state: RefCell<State>,
}

impl MockDevice {
    pub fn live_stage_count(&self) -> usize {
        self.state.borrow().stages.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    pub fn texture(&self, id: u32) -> Option<MockTexture> {
        self.state.borrow().textures.get(&id).cloned()
    }

    pub fn bound_texture(&self, unit: u32) -> Option<u32> {
        self.state.borrow().bound_textures.get(&unit).copied()
    }

    /// `(program, location, value)` in call order.
    pub fn uniform_writes(&self) -> Vec<(u32, u32, UniformValue)> {
        self.state.borrow().uniform_writes.clone()
    }

    /// `(program, mesh)` in call order.
    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.state.borrow().draws.clone()
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.state.borrow().viewport
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.state.borrow().depth_test
    }
}

fn check_syntax(source: &str) -> Result<(), String> {
    if !source.contains("void main") {
        return Err("0:1(1): error: no function main() defined".into());
    }
    let mut depth = 0i32;
    for (line, text) in source.lines().enumerate() {
        for ch in text.chars() {
            match ch {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("0:{}(1): error: syntax error, unexpected '}}'", line + 1));
            }
        }
    }
    if depth != 0 {
        return Err("0:1(1): error: syntax error, unexpected end of file".into());
    }
    Ok(())
}

/// Names declared with `qualifier` at global scope, e.g. `out vec2 v_uv;`.
fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            let line = match line.find(')') {
                Some(end) if line.starts_with("layout") => line[end + 1..].trim(),
                _ => line,
            };
            let rest = line.strip_prefix(qualifier)?.strip_prefix(' ')?;
            let name = rest.trim_end_matches(';').split_whitespace().last()?;
            Some(name.split('[').next().unwrap_or(name).to_owned())
        })
        .collect()
}

impl GraphicsDevice for MockDevice {
    type Program = u32;
    type Stage = u32;
    type Texture = u32;
    type UniformLocation = u32;
    type Mesh = MockMesh;

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        check_syntax(source)?;
        let mut state = self.state.borrow_mut();
        let id = state.fresh_id();
        state.stages.insert(
            id,
            Stage {
                kind: Some(stage),
                source: source.to_owned(),
            },
        );
        Ok(id)
    }

    fn delete_stage(&self, stage: u32) {
        self.state.borrow_mut().stages.remove(&stage);
    }

    fn link_program(&self, vertex: u32, fragment: u32) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let (vs, fs) = match (state.stages.get(&vertex), state.stages.get(&fragment)) {
            (Some(vs), Some(fs)) => (vs, fs),
            _ => return Err("error: attached shader object was deleted".into()),
        };
        if vs.kind != Some(ShaderStage::Vertex) || fs.kind != Some(ShaderStage::Fragment) {
            return Err("error: stage mismatch".into());
        }
        let outputs = declared(&vs.source, "out");
        if let Some(missing) = declared(&fs.source, "in")
            .into_iter()
            .find(|name| !outputs.contains(name))
        {
            return Err(format!(
                "error: fragment shader input `{missing}` has no matching vertex output"
            ));
        }
        let mut uniforms = declared(&vs.source, "uniform");
        for name in declared(&fs.source, "uniform") {
            if !uniforms.contains(&name) {
                uniforms.push(name);
            }
        }
        let id = state.fresh_id();
        state.programs.insert(id, uniforms);
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.state.borrow_mut().current_program = program;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let uniforms = state.programs.get(&program)?;
        uniforms.iter().position(|u| u == name).map(|i| i as u32)
    }

    fn set_uniform(&self, location: &u32, value: UniformValue) {
        let mut state = self.state.borrow_mut();
        let program = state.current_program.unwrap_or(0);
        state.uniform_writes.push((program, *location, value));
    }

    fn create_texture(
        &self,
        upload: &TextureUpload<'_>,
        sampler: &SamplerDesc,
    ) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.fresh_id();
        state.textures.insert(
            id,
            MockTexture {
                width: upload.width,
                height: upload.height,
                format: upload.format,
                sampler: *sampler,
            },
        );
        Ok(id)
    }

    fn delete_texture(&self, texture: u32) {
        self.state.borrow_mut().textures.remove(&texture);
    }

    fn bind_texture(&self, unit: u32, texture: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match texture {
            Some(id) => state.bound_textures.insert(unit, id),
            None => state.bound_textures.remove(&unit),
        };
    }

    fn create_mesh(&self, mesh: &MeshData) -> Result<MockMesh, String> {
        let mut state = self.state.borrow_mut();
        let id = state.fresh_id();
        state.meshes.insert(id, mesh.index_count());
        Ok(MockMesh {
            id,
            index_count: mesh.index_count(),
        })
    }

    fn delete_mesh(&self, mesh: MockMesh) {
        self.state.borrow_mut().meshes.remove(&mesh.id);
    }

    fn draw_mesh(&self, mesh: &MockMesh) {
        let mut state = self.state.borrow_mut();
        let program = state.current_program.unwrap_or(0);
        state.draws.push((program, mesh.id));
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.state.borrow_mut().viewport = Some((width, height));
    }

    fn clear(&self, _color: [f32; 4]) {
        self.state.borrow_mut().clears += 1;
    }

    fn enable_depth_test(&self) {
        self.state.borrow_mut().depth_test = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declarations() {
        assert_eq!(declared(PASS_THROUGH_VERT, "out"), vec!["v_uv"]);
        assert_eq!(declared(PASS_THROUGH_VERT, "in"), vec!["a_pos", "a_uv"]);
        assert_eq!(
            declared(PASS_THROUGH_VERT, "uniform"),
            vec!["u_model", "u_view", "u_proj"]
        );
        assert_eq!(declared(PASS_THROUGH_FRAG, "uniform"), vec!["u_tex"]);
    }

    #[test]
    fn rejects_unbalanced_source() {
        assert!(check_syntax("void main() {").is_err());
        assert!(check_syntax("void main() }{").is_err());
        assert!(check_syntax("int x;").is_err());
        assert!(check_syntax(PASS_THROUGH_FRAG).is_ok());
    }
}
