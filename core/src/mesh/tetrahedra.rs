//! Subdivided tetrahedron generator.
//!
//! A level-0 mesh is the regular tetrahedron with unit edge length scaled by
//! `height`, centred on the origin. Each further level splits every
//! triangle into four through its edge midpoints:
//!
//! ```text
//!          v3
//!          /\
//!       c /__\ b
//!        /\  /\
//!       /__\/__\
//!     v1    a    v2
//! ```
//!
//! emitted as `(v1, a, c)`, `(v2, b, a)`, `(v3, c, b)`, `(a, b, c)`.
//! Midpoints shared by neighbouring faces are created once per pass.
//!
//! # Example
//!
//! ```
//! use trinity_core::math::Vec3;
//! use trinity_core::mesh::tetrahedra::generate_tetrahedra;
//!
//! let mesh = generate_tetrahedra(2.0, 1, Some(Vec3::new(1.0, 0.0, 0.0)), None).unwrap();
//! assert_eq!(mesh.face_count(), 16);
//! assert_eq!(mesh.vertex_count(), 10);
//! ```

use std::collections::HashMap;

use crate::error::{MeshError, MeshResult};
use crate::math::{Vec2, Vec3, midpoint2, midpoint3};

use super::buffers::{FACE_STRIDE, Face, MeshBuffers};

/// Deepest subdivision level accepted. Level 8 yields 262 144 faces.
pub const MAX_SUBDIVISION_LEVEL: u32 = 8;

#[rustfmt::skip]
const BASE_VERTICES: [[f32; 3]; 4] = [
    [ 0.0,       0.0,  0.612372],
    [-0.288675, -0.5, -0.204124],
    [-0.288675,  0.5, -0.204124],
    [ 0.57735,   0.0, -0.204124],
];

#[rustfmt::skip]
const BASE_TEX_COORDS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [0.5, 0.866025],
    [1.0, 0.0],
    [1.0, 1.73205],
    [1.5, 0.866025],
    [2.0, 0.0],
];

const BASE_FACES: [[u32; 3]; 4] = [[1, 2, 3], [2, 1, 0], [3, 0, 1], [0, 3, 2]];

const BASE_FACE_TEX_COORDS: [[u32; 3]; 4] = [[0, 2, 1], [0, 3, 2], [2, 4, 1], [4, 5, 2]];

/// Parameters for a subdivided tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TetrahedronParams {
    /// Edge length of the base tetrahedron.
    pub height: f32,
    /// Number of midpoint subdivision passes.
    pub level: u32,
}

impl Default for TetrahedronParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            level: 0,
        }
    }
}

impl TetrahedronParams {
    /// Create parameters with the given height and level.
    pub fn new(height: f32, level: u32) -> Self {
        Self { height, level }
    }

    /// Set the base edge length.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the subdivision level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Check that `height` is finite and positive and `level` is within
    /// [`MAX_SUBDIVISION_LEVEL`].
    pub fn validate(&self) -> MeshResult<()> {
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(MeshError::InvalidHeight(self.height));
        }
        if self.level > MAX_SUBDIVISION_LEVEL {
            return Err(MeshError::LevelTooDeep {
                level: self.level,
                max: MAX_SUBDIVISION_LEVEL,
            });
        }
        Ok(())
    }

    /// Number of faces produced at this level: `4^(level + 1)`.
    ///
    /// `None` when the count does not fit in `usize`.
    pub fn face_count(&self) -> Option<usize> {
        let shift = self.level.checked_add(1)?.checked_mul(2)?;
        1usize.checked_shl(shift)
    }

    /// Number of vertices produced at this level: `2 + faces / 2`.
    pub fn vertex_count(&self) -> Option<usize> {
        Some(2 + self.face_count()? / 2)
    }

    /// Generate the mesh, moved by `center` and then by `end_point`.
    ///
    /// Missing offsets count as zero.
    pub fn generate(
        &self,
        center: Option<Vec3>,
        end_point: Option<Vec3>,
    ) -> MeshResult<MeshBuffers> {
        crate::profile_function!();
        if let Err(err) = self.validate() {
            log::warn!("Rejected tetrahedron parameters {:?}: {err}", self);
            crate::profile_message!("tetrahedron parameters rejected");
            return Err(err);
        }

        let mut net = TriangleNet::base(self.height);
        for pass in 0..self.level {
            crate::profile_scope!("tetrahedron_subdivision_pass");
            net = net.subdivide();
            log::trace!(
                "Tetrahedron pass {}: {} vertices, {} texcoords, {} faces",
                pass + 1,
                net.positions.len(),
                net.tex_coords.len(),
                net.faces.len()
            );
        }

        let offset =
            center.unwrap_or_else(Vec3::zeros) + end_point.unwrap_or_else(Vec3::zeros);
        let mesh = net.into_buffers(offset);
        log::debug!(
            "Generated tetrahedron (height {}, level {}): {} vertices, {} faces",
            self.height,
            self.level,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Generate a subdivided tetrahedron.
///
/// # Arguments
///
/// * `height` - Edge length of the base tetrahedron, finite and `> 0`
/// * `level` - Subdivision level, `0..=MAX_SUBDIVISION_LEVEL`
/// * `center` - Translation applied to every vertex (origin if `None`)
/// * `end_point` - Additional translation placing the tip (zero if `None`)
pub fn generate_tetrahedra(
    height: f32,
    level: i32,
    center: Option<Vec3>,
    end_point: Option<Vec3>,
) -> MeshResult<MeshBuffers> {
    let level = u32::try_from(level).map_err(|_| {
        log::warn!("Rejected negative subdivision level {level}");
        MeshError::NegativeLevel(level)
    })?;
    TetrahedronParams::new(height, level).generate(center, end_point)
}

/// Smoothing group of face `face` out of `face_count`: one bit per quarter
/// of the face list.
pub fn quadrant_smoothing_group(face: usize, face_count: usize) -> u32 {
    let quarter = (face_count / 4).max(1);
    1 << (face / quarter).min(3)
}

/// Working representation between subdivision passes.
struct TriangleNet {
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    faces: Vec<Face>,
}

impl TriangleNet {
    fn base(height: f32) -> Self {
        Self {
            positions: BASE_VERTICES
                .iter()
                .map(|&[x, y, z]| Vec3::new(x, y, z) * height)
                .collect(),
            tex_coords: BASE_TEX_COORDS
                .iter()
                .map(|&[u, v]| Vec2::new(u, v))
                .collect(),
            faces: BASE_FACES
                .iter()
                .zip(BASE_FACE_TEX_COORDS.iter())
                .map(|(&v, &t)| Face::new(v, t))
                .collect(),
        }
    }

    fn subdivide(self) -> Self {
        let Self {
            mut positions,
            mut tex_coords,
            faces,
        } = self;

        // Separate caches: vertex and texcoord indices never share keys.
        let mut vertex_midpoints = MidpointCache::default();
        let mut tex_midpoints = MidpointCache::default();
        let mut new_faces = Vec::with_capacity(faces.len() * 4);

        for face in &faces {
            let [v1, v2, v3] = face.vertices;
            let a = vertex_midpoints.midpoint(v1, v2, &mut positions, midpoint3);
            let b = vertex_midpoints.midpoint(v2, v3, &mut positions, midpoint3);
            let c = vertex_midpoints.midpoint(v3, v1, &mut positions, midpoint3);

            let [t1, t2, t3] = face.tex_coords;
            let ta = tex_midpoints.midpoint(t1, t2, &mut tex_coords, midpoint2);
            let tb = tex_midpoints.midpoint(t2, t3, &mut tex_coords, midpoint2);
            let tc = tex_midpoints.midpoint(t3, t1, &mut tex_coords, midpoint2);

            new_faces.push(Face::new([v1, a, c], [t1, ta, tc]));
            new_faces.push(Face::new([v2, b, a], [t2, tb, ta]));
            new_faces.push(Face::new([v3, c, b], [t3, tc, tb]));
            new_faces.push(Face::new([a, b, c], [ta, tb, tc]));
        }

        Self {
            positions,
            tex_coords,
            faces: new_faces,
        }
    }

    fn into_buffers(self, offset: Vec3) -> MeshBuffers {
        let positions = self
            .positions
            .iter()
            .flat_map(|p| {
                let p = p + offset;
                [p.x, p.y, p.z]
            })
            .collect();
        let tex_coords = self.tex_coords.iter().flat_map(|t| [t.x, t.y]).collect();

        let face_count = self.faces.len();
        let mut faces = Vec::with_capacity(face_count * FACE_STRIDE);
        let mut smoothing_groups = Vec::with_capacity(face_count);
        for (i, face) in self.faces.iter().enumerate() {
            faces.extend_from_slice(&face.to_interleaved());
            smoothing_groups.push(quadrant_smoothing_group(i, face_count));
        }

        MeshBuffers::from_parts_unchecked(positions, tex_coords, faces, smoothing_groups, None)
    }
}

/// Edge-midpoint table for one subdivision pass.
///
/// Keyed by the unordered index pair, so both faces sharing an edge get the
/// same midpoint index.
#[derive(Default)]
struct MidpointCache {
    midpoints: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn midpoint<T: Copy>(
        &mut self,
        i: u32,
        j: u32,
        points: &mut Vec<T>,
        mid: impl Fn(T, T) -> T,
    ) -> u32 {
        *self.midpoints.entry((i.min(j), i.max(j))).or_insert_with(|| {
            let index = points.len() as u32;
            let point = mid(points[i as usize], points[j as usize]);
            points.push(point);
            index
        })
    }
}
