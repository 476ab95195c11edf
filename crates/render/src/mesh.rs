use bytemuck::{Pod, Zeroable};
use std::mem::{offset_of, size_of};

/// Interleaved vertex: position, RGBA colour, texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

/// Float attribute within [`Vertex`], bound to a shader `layout(location)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub offset: i32,
}

impl Vertex {
    pub const STRIDE: i32 = size_of::<Vertex>() as i32;

    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            location: 0,
            components: 3,
            offset: offset_of!(Vertex, position) as i32,
        },
        VertexAttribute {
            location: 1,
            components: 4,
            offset: offset_of!(Vertex, color) as i32,
        },
        VertexAttribute {
            location: 2,
            components: 2,
            offset: offset_of!(Vertex, tex_coords) as i32,
        },
    ];

    const fn new(position: [f32; 3], color: [f32; 4], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coords,
        }
    }
}

/// CPU-side indexed triangle list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Errors from mesh upload.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("mesh has no indices")]
    Empty,
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("device rejected mesh: {0}")]
    Device(String),
}

impl MeshData {
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.is_empty() {
            return Err(MeshError::Empty);
        }
        let vertex_count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Unit cube centred on the origin, four vertices per face so every face
    /// gets the full 0..1 texture range.
    pub fn cube() -> Self {
        const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
        const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
        const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
        let p = 0.5_f32;
        #[rustfmt::skip]
        let vertices = vec![
            // -Z
            Vertex::new([-p, -p, -p], GREEN, [0.0, 0.0]),
            Vertex::new([ p, -p, -p], BLUE,  [1.0, 0.0]),
            Vertex::new([ p,  p, -p], RED,   [1.0, 1.0]),
            Vertex::new([-p,  p, -p], RED,   [0.0, 1.0]),
            // +Z
            Vertex::new([-p, -p,  p], GREEN, [0.0, 0.0]),
            Vertex::new([ p, -p,  p], BLUE,  [1.0, 0.0]),
            Vertex::new([ p,  p,  p], RED,   [1.0, 1.0]),
            Vertex::new([-p,  p,  p], RED,   [0.0, 1.0]),
            // -X
            Vertex::new([-p,  p,  p], GREEN, [0.0, 0.0]),
            Vertex::new([-p,  p, -p], BLUE,  [1.0, 0.0]),
            Vertex::new([-p, -p, -p], RED,   [1.0, 1.0]),
            Vertex::new([-p, -p,  p], RED,   [0.0, 1.0]),
            // +X
            Vertex::new([ p,  p,  p], GREEN, [0.0, 0.0]),
            Vertex::new([ p,  p, -p], BLUE,  [1.0, 0.0]),
            Vertex::new([ p, -p, -p], RED,   [1.0, 1.0]),
            Vertex::new([ p, -p,  p], RED,   [0.0, 1.0]),
            // -Y
            Vertex::new([-p, -p, -p], GREEN, [0.0, 0.0]),
            Vertex::new([ p, -p, -p], BLUE,  [1.0, 0.0]),
            Vertex::new([ p, -p,  p], RED,   [1.0, 1.0]),
            Vertex::new([-p, -p,  p], RED,   [0.0, 1.0]),
            // +Y
            Vertex::new([-p,  p, -p], GREEN, [0.0, 0.0]),
            Vertex::new([ p,  p, -p], BLUE,  [1.0, 0.0]),
            Vertex::new([ p,  p,  p], RED,   [1.0, 1.0]),
            Vertex::new([-p,  p,  p], RED,   [0.0, 1.0]),
        ];
        let indices = (0..6u32)
            .flat_map(|face| {
                let b = face * 4;
                [b, b + 1, b + 2, b + 2, b + 3, b]
            })
            .collect();
        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 9 * 4);
        let offsets: Vec<_> = Vertex::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 28]);
    }

    #[test]
    fn cube_is_valid() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(&cube.indices[6..12], &[4, 5, 6, 6, 7, 4]);
        assert!(cube.validate().is_ok());
        assert_eq!(cube.vertex_bytes().len(), 24 * Vertex::STRIDE as usize);
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut cube = MeshData::cube();
        cube.indices.push(24);
        assert!(matches!(
            cube.validate(),
            Err(MeshError::IndexOutOfRange { index: 24, .. })
        ));
        assert!(matches!(MeshData::default().validate(), Err(MeshError::Empty)));
    }
}
