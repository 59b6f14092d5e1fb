//! Directed scatter plots built from tetrahedron instances.
//!
//! Every data point becomes one small subdivided tetrahedron, stamped at the
//! point's position and shifted toward its direction target. All instances
//! share one merged [`MeshBuffers`], so the whole plot is a single draw.
//!
//! # Example
//!
//! ```
//! use trinity_core::math::Vec3;
//! use trinity_core::scatter::{DirectedPoint, DirectedScatter, ScatterParams};
//!
//! let scatter = DirectedScatter::new(ScatterParams::default()).unwrap();
//! let points = [
//!     DirectedPoint::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.1),
//!     DirectedPoint::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.6),
//! ];
//! let mesh = scatter.build(&points).unwrap();
//! assert_eq!(scatter.instance_of_face(mesh.face_count() - 1), Some(1));
//! ```

use crate::error::{MeshError, MeshResult};
use crate::math::{FieldPoint, Vec3};
use crate::mesh::{MeshBuffers, MeshMerger, Placement, TetrahedronParams, instance_of_face};

/// One input sample: where it sits, where it points, and its scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectedPoint {
    /// Position of the sample.
    pub position: Vec3,
    /// Direction target added to the position to place the tip.
    pub end_point: Vec3,
    /// Scalar used for coloring (typically a hue in `[0, 1]`).
    pub value: f32,
}

impl Default for DirectedPoint {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros(), 0.0)
    }
}

impl DirectedPoint {
    pub fn new(position: Vec3, end_point: Vec3, value: f32) -> Self {
        Self {
            position,
            end_point,
            value,
        }
    }

    fn placement(&self) -> Placement {
        Placement::new(
            FieldPoint::from_position(self.position, self.value),
            self.end_point,
        )
    }
}

/// Configuration for a [`DirectedScatter`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScatterParams {
    /// Marker shape for every point.
    pub marker: TetrahedronParams,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            marker: TetrahedronParams::new(1.0, 1),
        }
    }
}

impl ScatterParams {
    /// Set the marker edge length.
    pub fn with_marker_height(mut self, height: f32) -> Self {
        self.marker.height = height;
        self
    }

    /// Set the marker subdivision level.
    pub fn with_marker_level(mut self, level: u32) -> Self {
        self.marker.level = level;
        self
    }
}

/// Builds merged scatter meshes from a single pre-generated marker.
#[derive(Debug, Clone)]
pub struct DirectedScatter {
    params: ScatterParams,
    marker: MeshBuffers,
}

impl DirectedScatter {
    /// Generate the marker mesh for `params`.
    pub fn new(params: ScatterParams) -> MeshResult<Self> {
        let marker = params.marker.generate(None, None)?;
        Ok(Self { params, marker })
    }

    /// Parameters this scatter was built with.
    pub fn params(&self) -> &ScatterParams {
        &self.params
    }

    /// The marker mesh stamped for every point.
    pub fn marker(&self) -> &MeshBuffers {
        &self.marker
    }

    /// Faces contributed by each point.
    pub fn faces_per_instance(&self) -> usize {
        self.marker.face_count()
    }

    /// Vertices contributed by each point.
    pub fn vertices_per_instance(&self) -> usize {
        self.marker.vertex_count()
    }

    /// Build one merged mesh with one marker per point, in order.
    pub fn build(&self, points: &[DirectedPoint]) -> MeshResult<MeshBuffers> {
        crate::profile_function!();
        let mut merger = MeshMerger::new(MeshBuffers::empty(), &self.marker);
        merger.reserve(points.len());
        for point in points {
            merger.append(&point.placement())?;
        }
        crate::profile_plot!("scatter_points", points.len());
        merger.finish()
    }

    /// Point index that produced face `face` of a mesh from
    /// [`DirectedScatter::build`].
    pub fn instance_of_face(&self, face: usize) -> Option<usize> {
        instance_of_face(face, 0, self.faces_per_instance())
    }

    /// Rewrite the per-point scalar of a mesh from [`DirectedScatter::build`]
    /// in place, one value per point.
    pub fn apply_values(&self, mesh: &mut MeshBuffers, values: &[f32]) -> MeshResult<()> {
        let per_instance = self.vertices_per_instance();
        let expected = mesh.vertex_count() / per_instance.max(1);
        if values.len() != expected || expected * per_instance != mesh.vertex_count() {
            return Err(MeshError::BufferCount {
                buffer: "values",
                actual: values.len(),
                expected,
            });
        }
        let Some(field) = mesh.field_values_mut() else {
            if values.is_empty() {
                return Ok(());
            }
            return Err(MeshError::InvalidParameter(
                "mesh has no field values to update".into(),
            ));
        };
        for (chunk, &value) in field.chunks_exact_mut(per_instance).zip(values) {
            chunk.fill(value);
        }
        Ok(())
    }
}
