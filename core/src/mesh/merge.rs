//! Batching many copies of a template mesh into one mesh.
//!
//! Each copy is moved by its [`Placement`] and tagged with the placement's
//! scalar value, so a whole scatter plot can be drawn as a single mesh.
//! Copies are laid out in placement order directly after the base mesh:
//! face `base_faces + i * template_faces + k` is face `k` of instance `i`.

use crate::error::{MeshError, MeshResult};
use crate::math::{FieldPoint, Vec3};

use super::buffers::MeshBuffers;
use super::builder::{AppendedRange, MeshBuilder};

/// Where to stamp one instance of a template mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Translation of the instance; its value becomes the instance's field
    /// value.
    pub translation: FieldPoint,
    /// Additional offset that places the template's tip.
    pub end_point: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(FieldPoint::default(), Vec3::zeros())
    }
}

impl Placement {
    /// Create a placement.
    pub fn new(translation: FieldPoint, end_point: Vec3) -> Self {
        Self {
            translation,
            end_point,
        }
    }

    /// Total offset applied to every template vertex.
    pub fn offset(&self) -> Vec3 {
        self.translation.position + self.end_point
    }
}

/// Incremental merger stamping copies of one template onto a base mesh.
///
/// # Example
///
/// ```
/// use trinity_core::math::{FieldPoint, Vec3};
/// use trinity_core::mesh::tetrahedra::generate_tetrahedra;
/// use trinity_core::mesh::{MeshBuffers, MeshMerger, Placement};
///
/// let template = generate_tetrahedra(1.0, 0, None, None).unwrap();
/// let mut merger = MeshMerger::new(MeshBuffers::empty(), &template);
/// merger
///     .append(&Placement::new(FieldPoint::new(1.0, 0.0, 0.0, 0.25), Vec3::zeros()))
///     .unwrap();
/// let mesh = merger.finish().unwrap();
/// assert_eq!(mesh.face_count(), 4);
/// assert_eq!(mesh.field_value(0), Some(0.25));
/// ```
#[derive(Debug)]
pub struct MeshMerger<'a> {
    builder: MeshBuilder,
    template: &'a MeshBuffers,
    base_faces: usize,
    instances: usize,
}

impl<'a> MeshMerger<'a> {
    /// Start merging on top of `base`.
    pub fn new(base: MeshBuffers, template: &'a MeshBuffers) -> Self {
        let base_faces = base.face_count();
        // Base vertices without field values read as 0.0 once an instance
        // carries one; the builder backfills them.
        let builder = MeshBuilder::from_mesh(base);
        Self {
            builder,
            template,
            base_faces,
            instances: 0,
        }
    }

    /// Reserve room for `additional` more instances.
    pub fn reserve(&mut self, additional: usize) {
        self.builder.reserve(
            self.template.vertex_count() * additional,
            self.template.tex_coord_count() * additional,
            self.template.face_count() * additional,
        );
    }

    /// Stamp one instance of the template.
    pub fn append(&mut self, placement: &Placement) -> MeshResult<AppendedRange> {
        let range = self.builder.append_mesh(
            self.template,
            placement.offset(),
            Some(placement.translation.value),
        )?;
        self.instances += 1;
        Ok(range)
    }

    /// Stamp one instance per placement, in order.
    pub fn extend<'p>(
        &mut self,
        placements: impl IntoIterator<Item = &'p Placement>,
    ) -> MeshResult<()> {
        for placement in placements {
            self.append(placement)?;
        }
        Ok(())
    }

    /// Number of instances stamped so far.
    pub fn instance_count(&self) -> usize {
        self.instances
    }

    /// Instance that produced merged face `face`, or `None` for base faces
    /// and faces past the last instance.
    pub fn instance_of_face(&self, face: usize) -> Option<usize> {
        instance_of_face(face, self.base_faces, self.template.face_count())
            .filter(|&i| i < self.instances)
    }

    /// Validate and produce the merged mesh.
    pub fn finish(self) -> MeshResult<MeshBuffers> {
        let mesh = self.builder.finish()?;
        log::debug!(
            "Merged {} instances: {} vertices, {} faces",
            self.instances,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Merge `base` with one copy of `template` per translation/endpoint pair.
///
/// Copy `i` has every vertex moved by `translations[i].position +
/// endpoints[i]` and carries `translations[i].value` as its field value.
/// The two slices must have the same length.
pub fn merge_meshes(
    base: &MeshBuffers,
    template: &MeshBuffers,
    translations: &[FieldPoint],
    endpoints: &[Vec3],
) -> MeshResult<MeshBuffers> {
    crate::profile_function!();
    if translations.len() != endpoints.len() {
        log::warn!(
            "Refusing to merge {} translations with {} endpoints",
            translations.len(),
            endpoints.len()
        );
        crate::profile_message!("merge rejected: placement count mismatch");
        return Err(MeshError::PlacementMismatch {
            translations: translations.len(),
            endpoints: endpoints.len(),
        });
    }

    let mut merger = MeshMerger::new(base.clone(), template);
    merger.reserve(translations.len());
    for (translation, end_point) in translations.iter().zip(endpoints) {
        merger.append(&Placement::new(*translation, *end_point))?;
    }
    merger.finish()
}

/// Instance index of merged face `face` given the base and per-instance face
/// counts.
pub fn instance_of_face(
    face: usize,
    base_faces: usize,
    faces_per_instance: usize,
) -> Option<usize> {
    if faces_per_instance == 0 {
        return None;
    }
    face.checked_sub(base_faces).map(|f| f / faces_per_instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::tetrahedra::generate_tetrahedra;

    #[test]
    fn test_placement_offset() {
        let p = Placement::new(FieldPoint::new(1.0, 2.0, 3.0, 0.5), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p.offset(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_merge_into_empty_base() {
        let template = generate_tetrahedra(1.0, 0, None, None).unwrap();
        let translations = [
            FieldPoint::new(0.0, 0.0, 0.0, 0.1),
            FieldPoint::new(5.0, 0.0, 0.0, 0.9),
        ];
        let endpoints = [Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0)];
        let mesh = merge_meshes(&MeshBuffers::empty(), &template, &translations, &endpoints)
            .unwrap();

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.tex_coord_count(), 12);
        assert_eq!(mesh.face_count(), 8);
        assert_eq!(mesh.field_value(3), Some(0.1));
        assert_eq!(mesh.field_value(4), Some(0.9));
        assert_eq!(
            mesh.vertex(4).unwrap(),
            template.vertex(0).unwrap() + Vec3::new(5.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_base_without_field_reads_zero() {
        let template = generate_tetrahedra(1.0, 0, None, None).unwrap();
        let mesh = merge_meshes(
            &template,
            &template,
            &[FieldPoint::new(0.0, 0.0, 0.0, 0.7)],
            &[Vec3::zeros()],
        )
        .unwrap();
        let values = mesh.field_values().unwrap();
        assert_eq!(&values[..4], &[0.0; 4]);
        assert_eq!(&values[4..], &[0.7; 4]);
    }

    #[test]
    fn test_no_placements_returns_base() {
        let template = generate_tetrahedra(1.0, 0, None, None).unwrap();
        let mesh = merge_meshes(&template, &template, &[], &[]).unwrap();
        assert_eq!(mesh.faces(), template.faces());
        assert_eq!(mesh.positions(), template.positions());
    }

    #[test]
    fn test_mismatched_lengths() {
        let template = generate_tetrahedra(1.0, 0, None, None).unwrap();
        let err = merge_meshes(
            &MeshBuffers::empty(),
            &template,
            &[FieldPoint::default(); 2],
            &[Vec3::zeros()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            MeshError::PlacementMismatch {
                translations: 2,
                endpoints: 1,
            }
        );
    }

    #[test]
    fn test_merger_instance_lookup() {
        let template = generate_tetrahedra(1.0, 1, None, None).unwrap();
        let base = generate_tetrahedra(1.0, 0, None, None).unwrap();
        let mut merger = MeshMerger::new(base, &template);
        let placements = [Placement::default(); 3];
        merger.extend(&placements).unwrap();

        assert_eq!(merger.instance_count(), 3);
        assert_eq!(merger.instance_of_face(0), None);
        assert_eq!(merger.instance_of_face(4), Some(0));
        assert_eq!(merger.instance_of_face(4 + 16), Some(1));
        assert_eq!(merger.instance_of_face(4 + 16 * 3 - 1), Some(2));
        assert_eq!(merger.instance_of_face(4 + 16 * 3), None);
    }

    #[test]
    fn test_append_returns_ranges() {
        let template = generate_tetrahedra(1.0, 0, None, None).unwrap();
        let mut merger = MeshMerger::new(MeshBuffers::empty(), &template);
        merger.append(&Placement::default()).unwrap();
        let range = merger.append(&Placement::default()).unwrap();
        assert_eq!(range.vertices, 4..8);
        assert_eq!(range.tex_coords, 6..12);
        assert_eq!(range.faces, 4..8);
    }
}
