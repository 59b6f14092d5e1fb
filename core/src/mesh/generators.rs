//! Mesh generators for spheroids and surface plots.
//!
//! Both produce [`MeshBuffers`] sharing one index space between vertices
//! and texture coordinates: vertex `i` uses texture coordinate `i`.

use std::f32::consts::PI;

use crate::error::{MeshError, MeshResult};
use crate::math::{Vec2, Vec3};

use super::buffers::{Face, MeshBuffers};
use super::builder::{MeshBuilder, checked_product};

/// Generate a UV spheroid mesh.
///
/// Creates a sphere lattice with the given number of longitudinal segments
/// and latitudinal rings, then scales it by `radii` per axis. Every face is
/// in smoothing group 1.
///
/// # Arguments
///
/// * `radii` - Semi-axis lengths along X, Y (the polar axis) and Z
/// * `segments` - Number of longitudinal segments (around the equator), >= 3
/// * `rings` - Number of latitudinal rings (from pole to pole), >= 2
///
/// Fails with [`MeshError::CapacityExceeded`] when the lattice or face count
/// does not fit in `u32` indices.
pub fn generate_spheroid(radii: Vec3, segments: u32, rings: u32) -> MeshResult<MeshBuffers> {
    if !radii.iter().all(|r| r.is_finite() && *r > 0.0) {
        return Err(MeshError::InvalidParameter(format!(
            "spheroid radii must be finite and positive, got {radii:?}"
        )));
    }
    if segments < 3 || rings < 2 {
        return Err(MeshError::InvalidParameter(format!(
            "spheroid needs at least 3 segments and 2 rings, got {segments} x {rings}"
        )));
    }

    let lattice = checked_product(
        "vertices",
        &[u64::from(rings) + 1, u64::from(segments) + 1],
    )? as usize;
    let faces = checked_product("faces", &[u64::from(rings), u64::from(segments), 2])? as usize;
    let mut builder = MeshBuilder::with_capacity(lattice, lattice, faces);

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let unit = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            builder.push_vertex(unit.component_mul(&radii));
            builder.push_tex_coord(Vec2::new(
                segment as f32 / segments as f32,
                ring as f32 / rings as f32,
            ));
        }
    }

    // Every index below stays under `lattice`.
    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            let a = [current, next, current + 1];
            let b = [current + 1, next, next + 1];
            builder.push_face(Face::new(a, a), 1);
            builder.push_face(Face::new(b, b), 1);
        }
    }

    builder.finish()
}

/// Generate a height-field surface from a grid of samples.
///
/// `values` holds `rows` rows of `columns` samples each, row-major. Sample
/// `(row, col)` becomes a vertex at `x = col * cell_size`,
/// `z = row * cell_size` (both centred on the origin) and `y = value`, with
/// the sample value also stored as its field value for coloring. Each grid
/// cell is split into two faces in smoothing group 1.
pub fn generate_surface(
    values: &[f32],
    columns: u32,
    rows: u32,
    cell_size: f32,
) -> MeshResult<MeshBuffers> {
    if columns < 2 || rows < 2 {
        return Err(MeshError::InvalidParameter(format!(
            "surface needs at least a 2 x 2 grid, got {columns} x {rows}"
        )));
    }
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(MeshError::InvalidParameter(format!(
            "surface cell size must be finite and positive, got {cell_size}"
        )));
    }
    let samples = checked_product("vertices", &[u64::from(columns), u64::from(rows)])? as usize;
    if values.len() != samples {
        return Err(MeshError::BufferCount {
            buffer: "values",
            actual: values.len(),
            expected: samples,
        });
    }

    let faces = checked_product(
        "faces",
        &[u64::from(columns) - 1, u64::from(rows) - 1, 2],
    )? as usize;
    let mut builder = MeshBuilder::with_capacity(samples, samples, faces);
    let half_width = (columns - 1) as f32 * cell_size * 0.5;
    let half_depth = (rows - 1) as f32 * cell_size * 0.5;

    for row in 0..rows {
        for col in 0..columns {
            let value = values[row as usize * columns as usize + col as usize];
            let x = col as f32 * cell_size - half_width;
            let z = row as f32 * cell_size - half_depth;
            builder.push_vertex_with_value(Vec3::new(x, value, z), value);
            builder.push_tex_coord(Vec2::new(
                col as f32 / (columns - 1) as f32,
                row as f32 / (rows - 1) as f32,
            ));
        }
    }

    for row in 0..rows - 1 {
        for col in 0..columns - 1 {
            let current = row * columns + col;
            let next = current + columns;

            let a = [current, next, current + 1];
            let b = [current + 1, next, next + 1];
            builder.push_face(Face::new(a, a), 1);
            builder.push_face(Face::new(b, b), 1);
        }
    }

    let mesh = builder.finish()?;
    log::debug!(
        "Generated {columns} x {rows} surface: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}
