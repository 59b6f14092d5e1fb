//! Flat-array triangle mesh storage.
//!
//! This module provides:
//! - [`Face`] - One triangle: three vertex indices paired with three
//!   texture coordinate indices
//! - [`MeshBuffers`] - Validated flat buffers for positions, texture
//!   coordinates, faces, smoothing groups and an optional scalar field

use crate::error::{IndexSlot, MeshError, MeshResult};
use crate::math::{Vec2, Vec3, vec2_at, vec3_at};

/// Number of `u32` entries per face in the interleaved face buffer.
pub const FACE_STRIDE: usize = 6;

/// A triangle with per-corner vertex and texture coordinate indices.
///
/// Corner `k` uses position `vertices[k]` and texture coordinate
/// `tex_coords[k]`. In the flat face buffer this is stored interleaved as
/// `[v0, t0, v1, t1, v2, t2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    /// Vertex indices, one per corner.
    pub vertices: [u32; 3],
    /// Texture coordinate indices, one per corner.
    pub tex_coords: [u32; 3],
}

impl Face {
    /// Create a face from vertex and texture coordinate corners.
    pub fn new(vertices: [u32; 3], tex_coords: [u32; 3]) -> Self {
        Self {
            vertices,
            tex_coords,
        }
    }

    /// Read a face from its interleaved six-entry form.
    pub fn from_interleaved(chunk: &[u32]) -> Option<Self> {
        match *chunk {
            [v0, t0, v1, t1, v2, t2] => Some(Self::new([v0, v1, v2], [t0, t1, t2])),
            _ => None,
        }
    }

    /// Interleaved six-entry form of this face.
    pub fn to_interleaved(&self) -> [u32; FACE_STRIDE] {
        let [v0, v1, v2] = self.vertices;
        let [t0, t1, t2] = self.tex_coords;
        [v0, t0, v1, t1, v2, t2]
    }

    /// Copy of this face with every vertex index shifted by `vertex_offset`
    /// and every texture coordinate index shifted by `tex_offset`.
    pub fn rebased(&self, vertex_offset: u32, tex_offset: u32) -> Self {
        Self {
            vertices: self.vertices.map(|v| v + vertex_offset),
            tex_coords: self.tex_coords.map(|t| t + tex_offset),
        }
    }
}

/// A triangle mesh stored as flat arrays.
///
/// Invariants (checked by [`MeshBuffers::new`] and [`MeshBuffers::validate`]):
///
/// - `positions.len() == 3 * vertex_count`
/// - `tex_coords.len() == 2 * tex_coord_count`
/// - `faces.len() == 6 * face_count`
/// - `smoothing_groups.len() == face_count`
/// - `field_values.len() == vertex_count` when present
/// - every vertex slot is `< vertex_count`, every texture slot is
///   `< tex_coord_count`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshBuffers {
    positions: Vec<f32>,
    tex_coords: Vec<f32>,
    faces: Vec<u32>,
    smoothing_groups: Vec<u32>,
    field_values: Option<Vec<f32>>,
}

impl MeshBuffers {
    /// Create a mesh from raw buffers, validating every invariant.
    pub fn new(
        positions: Vec<f32>,
        tex_coords: Vec<f32>,
        faces: Vec<u32>,
        smoothing_groups: Vec<u32>,
        field_values: Option<Vec<f32>>,
    ) -> MeshResult<Self> {
        let mesh = Self {
            positions,
            tex_coords,
            faces,
            smoothing_groups,
            field_values,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Create a mesh without checking invariants.
    ///
    /// Only for crate-internal producers that have already established the
    /// invariants; still checked in debug builds.
    pub(crate) fn from_parts_unchecked(
        positions: Vec<f32>,
        tex_coords: Vec<f32>,
        faces: Vec<u32>,
        smoothing_groups: Vec<u32>,
        field_values: Option<Vec<f32>>,
    ) -> Self {
        let mesh = Self {
            positions,
            tex_coords,
            faces,
            smoothing_groups,
            field_values,
        };
        debug_assert_eq!(mesh.validate(), Ok(()));
        mesh
    }

    /// An empty mesh with no vertices, texture coordinates or faces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check all buffer length and index invariants.
    pub fn validate(&self) -> MeshResult<()> {
        check_stride("positions", self.positions.len(), 3)?;
        check_stride("tex_coords", self.tex_coords.len(), 2)?;
        check_stride("faces", self.faces.len(), FACE_STRIDE)?;

        let face_count = self.face_count();
        if self.smoothing_groups.len() != face_count {
            return Err(MeshError::BufferCount {
                buffer: "smoothing_groups",
                actual: self.smoothing_groups.len(),
                expected: face_count,
            });
        }

        let vertex_count = self.vertex_count();
        if let Some(values) = &self.field_values {
            if values.len() != vertex_count {
                return Err(MeshError::BufferCount {
                    buffer: "field_values",
                    actual: values.len(),
                    expected: vertex_count,
                });
            }
        }

        let tex_coord_count = self.tex_coord_count();
        for (face_index, face) in self.iter_faces().enumerate() {
            for k in 0..3 {
                check_index(face_index, IndexSlot::Vertex, face.vertices[k], vertex_count)?;
                check_index(
                    face_index,
                    IndexSlot::TexCoord,
                    face.tex_coords[k],
                    tex_coord_count,
                )?;
            }
        }
        Ok(())
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of texture coordinates.
    pub fn tex_coord_count(&self) -> usize {
        self.tex_coords.len() / 2
    }

    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.faces.len() / FACE_STRIDE
    }

    /// Check if the mesh has no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Flat `[x, y, z, ...]` position buffer.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `[u, v, ...]` texture coordinate buffer.
    pub fn tex_coords(&self) -> &[f32] {
        &self.tex_coords
    }

    /// Interleaved `[v0, t0, v1, t1, v2, t2, ...]` face buffer.
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Smoothing group bitmask per face.
    pub fn smoothing_groups(&self) -> &[u32] {
        &self.smoothing_groups
    }

    /// Per-vertex scalar field, if present.
    pub fn field_values(&self) -> Option<&[f32]> {
        self.field_values.as_deref()
    }

    /// Position of vertex `index`.
    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        vec3_at(&self.positions, index)
    }

    /// Texture coordinate `index`.
    pub fn tex_coord(&self, index: usize) -> Option<Vec2> {
        vec2_at(&self.tex_coords, index)
    }

    /// Face `index`.
    pub fn face(&self, index: usize) -> Option<Face> {
        let start = index.checked_mul(FACE_STRIDE)?;
        Face::from_interleaved(self.faces.get(start..start + FACE_STRIDE)?)
    }

    /// Field value of vertex `index`, or `None` if the mesh has no field or
    /// the index is out of range.
    pub fn field_value(&self, index: usize) -> Option<f32> {
        self.field_values.as_ref()?.get(index).copied()
    }

    /// Iterate over all faces in order.
    pub fn iter_faces(&self) -> impl Iterator<Item = Face> + '_ {
        self.faces
            .chunks_exact(FACE_STRIDE)
            .filter_map(Face::from_interleaved)
    }

    /// Iterate over all vertex positions in order.
    pub fn iter_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
    }

    /// Replace the scalar field. The length must equal the vertex count.
    pub fn with_field_values(mut self, values: Vec<f32>) -> MeshResult<Self> {
        if values.len() != self.vertex_count() {
            return Err(MeshError::BufferCount {
                buffer: "field_values",
                actual: values.len(),
                expected: self.vertex_count(),
            });
        }
        self.field_values = Some(values);
        Ok(self)
    }

    /// Mutable access to the scalar field, if present.
    pub fn field_values_mut(&mut self) -> Option<&mut [f32]> {
        self.field_values.as_deref_mut()
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in self.positions.chunks_exact_mut(3) {
            p[0] += offset.x;
            p[1] += offset.y;
            p[2] += offset.z;
        }
    }

    /// Decompose into raw buffers
    /// `(positions, tex_coords, faces, smoothing_groups, field_values)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<u32>, Vec<u32>, Option<Vec<f32>>) {
        (
            self.positions,
            self.tex_coords,
            self.faces,
            self.smoothing_groups,
            self.field_values,
        )
    }
}

fn check_stride(buffer: &'static str, len: usize, stride: usize) -> MeshResult<()> {
    if len % stride != 0 {
        return Err(MeshError::BufferStride {
            buffer,
            len,
            stride,
        });
    }
    Ok(())
}

fn check_index(face: usize, slot: IndexSlot, index: u32, count: usize) -> MeshResult<()> {
    if index as usize >= count {
        return Err(MeshError::IndexOutOfBounds {
            face,
            slot,
            index,
            count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshBuffers {
        MeshBuffers::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            vec![0, 0, 1, 1, 2, 2],
            vec![1],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_face_interleaving() {
        let face = Face::new([1, 2, 3], [4, 5, 6]);
        assert_eq!(face.to_interleaved(), [1, 4, 2, 5, 3, 6]);
        assert_eq!(Face::from_interleaved(&face.to_interleaved()), Some(face));
        assert_eq!(Face::from_interleaved(&[1, 2, 3]), None);
    }

    #[test]
    fn test_face_rebased() {
        let face = Face::new([0, 1, 2], [0, 2, 1]).rebased(4, 6);
        assert_eq!(face.vertices, [4, 5, 6]);
        assert_eq!(face.tex_coords, [6, 8, 7]);
    }

    #[test]
    fn test_counts_and_access() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.tex_coord_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex(1), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(mesh.vertex(3), None);
        assert_eq!(mesh.tex_coord(2), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(mesh.face(0), Some(Face::new([0, 1, 2], [0, 1, 2])));
        assert_eq!(mesh.face(1), None);
        assert_eq!(mesh.field_value(0), None);
        assert_eq!(mesh.iter_vertices().count(), 3);
    }

    #[test]
    fn test_rejects_out_of_bounds_vertex() {
        let err = MeshBuffers::new(
            vec![0.0; 9],
            vec![0.0; 6],
            vec![0, 0, 1, 1, 3, 2],
            vec![1],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfBounds {
                face: 0,
                slot: IndexSlot::Vertex,
                index: 3,
                count: 3,
            }
        );
    }

    #[test]
    fn test_rejects_out_of_bounds_tex_coord() {
        let err = MeshBuffers::new(
            vec![0.0; 9],
            vec![0.0; 4],
            vec![0, 0, 1, 1, 2, 2],
            vec![1],
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfBounds {
                slot: IndexSlot::TexCoord,
                index: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_lengths() {
        let err = MeshBuffers::new(vec![0.0; 4], vec![], vec![], vec![], None).unwrap_err();
        assert!(matches!(err, MeshError::BufferStride { buffer: "positions", .. }));

        let err = MeshBuffers::new(vec![0.0; 9], vec![0.0; 6], vec![0, 0, 1, 1, 2, 2], vec![], None)
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::BufferCount {
                buffer: "smoothing_groups",
                ..
            }
        ));

        let err = MeshBuffers::new(vec![0.0; 9], vec![], vec![], vec![], Some(vec![0.0; 2]))
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::BufferCount {
                buffer: "field_values",
                actual: 2,
                expected: 3,
            }
        ));
    }

    #[test]
    fn test_field_values() {
        let mesh = triangle().with_field_values(vec![0.1, 0.2, 0.3]).unwrap();
        assert_eq!(mesh.field_value(2), Some(0.3));
        assert!(triangle().with_field_values(vec![0.0]).is_err());
    }

    #[test]
    fn test_translate() {
        let mut mesh = triangle();
        mesh.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertex(0), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(mesh.vertex(2), Some(Vec3::new(1.0, 3.0, 3.0)));
    }

    #[test]
    fn test_empty() {
        let mesh = MeshBuffers::empty();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.validate().is_ok());
    }
}
