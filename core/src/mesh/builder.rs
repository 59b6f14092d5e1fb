//! Incremental mesh construction.
//!
//! [`MeshBuilder`] owns growing buffers and is the only place where face
//! indices of one mesh are rebased into another. Generators push single
//! vertices and faces; the merger stamps whole meshes with
//! [`MeshBuilder::append_mesh`].

use std::ops::Range;

use crate::error::{MeshError, MeshResult};
use crate::math::{Vec2, Vec3};

use super::buffers::{FACE_STRIDE, Face, MeshBuffers};

/// Ranges written by a single [`MeshBuilder::append_mesh`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedRange {
    /// Vertex indices occupied by the appended copy.
    pub vertices: Range<u32>,
    /// Texture coordinate indices occupied by the appended copy.
    pub tex_coords: Range<u32>,
    /// Face indices occupied by the appended copy.
    pub faces: Range<u32>,
}

/// Owned builder for [`MeshBuffers`].
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    positions: Vec<f32>,
    tex_coords: Vec<f32>,
    faces: Vec<u32>,
    smoothing_groups: Vec<u32>,
    field_values: Option<Vec<f32>>,
}

impl MeshBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with room for the given element counts.
    pub fn with_capacity(vertices: usize, tex_coords: usize, faces: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            tex_coords: Vec::with_capacity(tex_coords * 2),
            faces: Vec::with_capacity(faces * FACE_STRIDE),
            smoothing_groups: Vec::with_capacity(faces),
            field_values: None,
        }
    }

    /// Continue building on top of an existing mesh.
    pub fn from_mesh(mesh: MeshBuffers) -> Self {
        let (positions, tex_coords, faces, smoothing_groups, field_values) = mesh.into_parts();
        Self {
            positions,
            tex_coords,
            faces,
            smoothing_groups,
            field_values,
        }
    }

    /// Reserve room for additional elements.
    pub fn reserve(&mut self, vertices: usize, tex_coords: usize, faces: usize) {
        self.positions.reserve(vertices * 3);
        self.tex_coords.reserve(tex_coords * 2);
        self.faces.reserve(faces * FACE_STRIDE);
        self.smoothing_groups.reserve(faces);
        if let Some(values) = &mut self.field_values {
            values.reserve(vertices);
        }
    }

    /// Number of vertices pushed so far.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of texture coordinates pushed so far.
    pub fn tex_coord_count(&self) -> usize {
        self.tex_coords.len() / 2
    }

    /// Number of faces pushed so far.
    pub fn face_count(&self) -> usize {
        self.faces.len() / FACE_STRIDE
    }

    /// Push a vertex without a field value and return its index.
    ///
    /// Past `u32::MAX` vertices the returned index saturates and
    /// [`MeshBuilder::finish`] fails with [`MeshError::CapacityExceeded`].
    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        let index = u32::try_from(self.vertex_count()).unwrap_or(u32::MAX);
        self.positions
            .extend_from_slice(&[position.x, position.y, position.z]);
        if let Some(values) = &mut self.field_values {
            values.push(0.0);
        }
        index
    }

    /// Push a vertex with a field value and return its index.
    pub fn push_vertex_with_value(&mut self, position: Vec3, value: f32) -> u32 {
        self.ensure_field_values();
        let index = self.push_vertex(position);
        if let Some(last) = self.field_values.as_mut().and_then(|v| v.last_mut()) {
            *last = value;
        }
        index
    }

    /// Push a texture coordinate and return its index.
    ///
    /// Saturates like [`MeshBuilder::push_vertex`].
    pub fn push_tex_coord(&mut self, uv: Vec2) -> u32 {
        let index = u32::try_from(self.tex_coord_count()).unwrap_or(u32::MAX);
        self.tex_coords.extend_from_slice(&[uv.x, uv.y]);
        index
    }

    /// Push a face with its smoothing group.
    ///
    /// Indices are checked against the current counts in debug builds;
    /// [`MeshBuilder::finish`] checks them in all builds.
    pub fn push_face(&mut self, face: Face, smoothing_group: u32) {
        debug_assert!(
            face.vertices
                .iter()
                .all(|&v| (v as usize) < self.vertex_count()),
            "face {face:?} references a vertex that does not exist yet"
        );
        debug_assert!(
            face.tex_coords
                .iter()
                .all(|&t| (t as usize) < self.tex_coord_count()),
            "face {face:?} references a texcoord that does not exist yet"
        );
        self.faces.extend_from_slice(&face.to_interleaved());
        self.smoothing_groups.push(smoothing_group);
    }

    /// Append a copy of `mesh`, moved by `offset`.
    ///
    /// Vertex slots of the copied faces are shifted by the current vertex
    /// count and texture slots by the current texture coordinate count.
    /// Smoothing groups are copied verbatim.
    ///
    /// Every copied vertex takes `value` as its field value when given,
    /// otherwise the source mesh's own field value, otherwise `0.0`.
    pub fn append_mesh(
        &mut self,
        mesh: &MeshBuffers,
        offset: Vec3,
        value: Option<f32>,
    ) -> MeshResult<AppendedRange> {
        let vertex_base = self.vertex_count();
        let tex_base = self.tex_coord_count();
        let face_base = self.face_count();

        let vertex_end = checked_end("vertices", vertex_base, mesh.vertex_count())?;
        let tex_end = checked_end("texture coordinates", tex_base, mesh.tex_coord_count())?;
        let face_end = checked_end("faces", face_base, mesh.face_count())?;

        if value.is_some() || mesh.field_values().is_some() {
            self.ensure_field_values();
        }

        self.positions.reserve(mesh.positions().len());
        for p in mesh.iter_vertices() {
            let moved = p + offset;
            self.positions.extend_from_slice(&[moved.x, moved.y, moved.z]);
        }
        if let Some(values) = &mut self.field_values {
            match (value, mesh.field_values()) {
                (Some(v), _) => values.resize(vertex_end as usize, v),
                (None, Some(source)) => values.extend_from_slice(source),
                (None, None) => values.resize(vertex_end as usize, 0.0),
            }
        }

        self.tex_coords.extend_from_slice(mesh.tex_coords());

        let vertex_offset = vertex_base as u32;
        let tex_offset = tex_base as u32;
        self.faces.reserve(mesh.faces().len());
        for face in mesh.iter_faces() {
            let rebased = face.rebased(vertex_offset, tex_offset);
            debug_assert!(rebased.vertices.iter().all(|&v| v < vertex_end));
            debug_assert!(rebased.tex_coords.iter().all(|&t| t < tex_end));
            self.faces.extend_from_slice(&rebased.to_interleaved());
        }
        self.smoothing_groups
            .extend_from_slice(mesh.smoothing_groups());

        Ok(AppendedRange {
            vertices: vertex_offset..vertex_end,
            tex_coords: tex_offset..tex_end,
            faces: face_base as u32..face_end,
        })
    }

    /// Validate and produce the finished mesh.
    pub fn finish(self) -> MeshResult<MeshBuffers> {
        checked_count("vertices", self.vertex_count())?;
        checked_count("texture coordinates", self.tex_coord_count())?;
        checked_count("faces", self.face_count())?;
        MeshBuffers::new(
            self.positions,
            self.tex_coords,
            self.faces,
            self.smoothing_groups,
            self.field_values,
        )
    }

    fn ensure_field_values(&mut self) {
        if self.field_values.is_none() {
            let mut values = Vec::with_capacity(self.positions.capacity() / 3);
            values.resize(self.vertex_count(), 0.0);
            self.field_values = Some(values);
        }
    }
}

/// `count` as `u32`, or [`MeshError::CapacityExceeded`] when every index
/// below it would not fit.
pub(crate) fn checked_count(what: &'static str, count: usize) -> MeshResult<u32> {
    u32::try_from(count).map_err(|_| MeshError::CapacityExceeded {
        what,
        max: u32::MAX as u64,
    })
}

/// Product of element counts, checked to fit in `u32`.
pub(crate) fn checked_product(what: &'static str, factors: &[u64]) -> MeshResult<u32> {
    factors
        .iter()
        .try_fold(1u64, |acc, &f| acc.checked_mul(f))
        .and_then(|product| u32::try_from(product).ok())
        .ok_or(MeshError::CapacityExceeded {
            what,
            max: u32::MAX as u64,
        })
}

/// End of the index range `[base, base + added)`, checked to fit in `u32`.
fn checked_end(what: &'static str, base: usize, added: usize) -> MeshResult<u32> {
    base.checked_add(added)
        .and_then(|end| u32::try_from(end).ok())
        .ok_or(MeshError::CapacityExceeded {
            what,
            max: u32::MAX as u64,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> MeshBuffers {
        let mut builder = MeshBuilder::new();
        let a = builder.push_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = builder.push_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = builder.push_vertex(Vec3::new(0.0, 1.0, 0.0));
        let ta = builder.push_tex_coord(Vec2::new(0.0, 0.0));
        let tb = builder.push_tex_coord(Vec2::new(1.0, 0.0));
        builder.push_face(Face::new([a, b, c], [ta, tb, ta]), 2);
        builder.finish().unwrap()
    }

    #[test]
    fn test_push_returns_sequential_indices() {
        let mut builder = MeshBuilder::new();
        assert_eq!(builder.push_vertex(Vec3::zeros()), 0);
        assert_eq!(builder.push_vertex(Vec3::zeros()), 1);
        assert_eq!(builder.push_tex_coord(Vec2::zeros()), 0);
        assert_eq!(builder.vertex_count(), 2);
        assert_eq!(builder.tex_coord_count(), 1);
    }

    #[test]
    fn test_field_values_backfill() {
        let mut builder = MeshBuilder::new();
        builder.push_vertex(Vec3::zeros());
        builder.push_vertex_with_value(Vec3::zeros(), 0.75);
        builder.push_vertex(Vec3::zeros());
        let mesh = builder.finish().unwrap();
        assert_eq!(mesh.field_values(), Some(&[0.0, 0.75, 0.0][..]));
    }

    #[test]
    fn test_append_rebases_indices() {
        let triangle = unit_triangle();
        let mut builder = MeshBuilder::from_mesh(triangle.clone());
        let range = builder
            .append_mesh(&triangle, Vec3::new(5.0, 0.0, 0.0), None)
            .unwrap();
        assert_eq!(range.vertices, 3..6);
        assert_eq!(range.tex_coords, 2..4);
        assert_eq!(range.faces, 1..2);

        let mesh = builder.finish().unwrap();
        assert_eq!(mesh.face(1), Some(Face::new([3, 4, 5], [2, 3, 2])));
        assert_eq!(mesh.vertex(4), Some(Vec3::new(6.0, 0.0, 0.0)));
        assert_eq!(mesh.smoothing_groups(), &[2, 2]);
        assert_eq!(mesh.field_values(), None);
    }

    #[test]
    fn test_append_with_value_fills_field() {
        let triangle = unit_triangle();
        let mut builder = MeshBuilder::from_mesh(triangle.clone());
        builder
            .append_mesh(&triangle, Vec3::zeros(), Some(0.5))
            .unwrap();
        let mesh = builder.finish().unwrap();
        assert_eq!(
            mesh.field_values(),
            Some(&[0.0, 0.0, 0.0, 0.5, 0.5, 0.5][..])
        );
    }

    #[test]
    fn test_append_keeps_source_field() {
        let triangle = unit_triangle()
            .with_field_values(vec![0.1, 0.2, 0.3])
            .unwrap();
        let mut builder = MeshBuilder::new();
        builder.append_mesh(&triangle, Vec3::zeros(), None).unwrap();
        builder
            .append_mesh(&unit_triangle(), Vec3::zeros(), None)
            .unwrap();
        let mesh = builder.finish().unwrap();
        assert_eq!(
            mesh.field_values(),
            Some(&[0.1, 0.2, 0.3, 0.0, 0.0, 0.0][..])
        );
    }

    #[test]
    fn test_finish_rejects_dangling_face() {
        let mut builder = MeshBuilder::new();
        builder.push_vertex(Vec3::zeros());
        builder.push_tex_coord(Vec2::zeros());
        builder.faces.extend_from_slice(&[0, 0, 0, 0, 1, 0]);
        builder.smoothing_groups.push(1);
        assert!(matches!(
            builder.finish(),
            Err(MeshError::IndexOutOfBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_checked_end_overflow() {
        assert_eq!(checked_end("vertices", 2, 3), Ok(5));
        assert!(matches!(
            checked_end("vertices", u32::MAX as usize, 1),
            Err(MeshError::CapacityExceeded { what: "vertices", .. })
        ));
    }

    #[test]
    fn test_checked_product() {
        assert_eq!(checked_product("faces", &[3, 4, 2]), Ok(24));
        assert_eq!(checked_product("faces", &[]), Ok(1));
        assert!(matches!(
            checked_product("faces", &[65_537, 65_537]),
            Err(MeshError::CapacityExceeded { what: "faces", .. })
        ));
        assert!(checked_product("faces", &[u64::MAX, 2]).is_err());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_checked_count() {
        assert_eq!(checked_count("vertices", u32::MAX as usize), Ok(u32::MAX));
        assert!(matches!(
            checked_count("vertices", u32::MAX as usize + 1),
            Err(MeshError::CapacityExceeded { max, .. }) if max == u32::MAX as u64
        ));
    }
}
