//! Conversion of [`MeshBuffers`] into GPU-ready vertex and index data.
//!
//! Faces in [`MeshBuffers`] index positions and texture coordinates
//! separately. GPU vertex buffers need one index per corner, so every
//! distinct `(vertex, texcoord)` pair becomes one [`RenderVertex`].

use std::collections::HashMap;

use crate::math::{Vec2, Vec3};

use super::buffers::MeshBuffers;

/// Interleaved vertex: position, texture coordinate and scalar field value.
///
/// 24 bytes, tightly packed.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub value: f32,
}

/// Welded vertices plus a `u32` triangle list.
#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    vertices: Vec<RenderVertex>,
    indices: Vec<u32>,
}

impl RenderMesh {
    /// Weld the corners of `mesh` into render vertices.
    ///
    /// Vertices appear in order of first use. Meshes without a scalar field
    /// get `value = 0.0`.
    pub fn from_buffers(mesh: &MeshBuffers) -> Self {
        crate::profile_function!();
        let mut corners: HashMap<(u32, u32), u32> = HashMap::new();
        let mut vertices = Vec::with_capacity(mesh.vertex_count());
        let mut indices = Vec::with_capacity(mesh.face_count() * 3);

        for face in mesh.iter_faces() {
            for k in 0..3 {
                let key = (face.vertices[k], face.tex_coords[k]);
                let index = *corners.entry(key).or_insert_with(|| {
                    let (v, t) = (key.0 as usize, key.1 as usize);
                    let position = mesh.vertex(v).unwrap_or_else(Vec3::zeros);
                    let uv = mesh.tex_coord(t).unwrap_or_else(Vec2::zeros);
                    vertices.push(RenderVertex {
                        position: [position.x, position.y, position.z],
                        uv: [uv.x, uv.y],
                        value: mesh.field_value(v).unwrap_or(0.0),
                    });
                    (vertices.len() - 1) as u32
                });
                indices.push(index);
            }
        }

        log::trace!(
            "Welded {} corners into {} render vertices",
            indices.len(),
            vertices.len()
        );
        Self { vertices, indices }
    }

    /// Render vertices.
    pub fn vertices(&self) -> &[RenderVertex] {
        &self.vertices
    }

    /// Triangle list indices into [`RenderMesh::vertices`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Overwrite each vertex's field value from the source mesh.
    ///
    /// Cheaper than rebuilding when only the scalar field changed; `mesh`
    /// must have the same topology this render mesh was built from. As in
    /// [`RenderMesh::from_buffers`], a mesh without a scalar field resets
    /// every value to `0.0`.
    pub fn refresh_values(&mut self, mesh: &MeshBuffers) {
        let mut written = vec![false; self.vertices.len()];
        for (face, chunk) in mesh.iter_faces().zip(self.indices.chunks_exact(3)) {
            for k in 0..3 {
                let target = chunk[k] as usize;
                if !written[target] {
                    self.vertices[target].value =
                        mesh.field_value(face.vertices[k] as usize).unwrap_or(0.0);
                    written[target] = true;
                }
            }
        }
    }
}
