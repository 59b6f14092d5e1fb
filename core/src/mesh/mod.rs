//! CPU-side mesh types, generators and merging.
//!
//! This module provides framework-agnostic mesh data structures:
//!
//! - [`MeshBuffers`] - Flat-array triangle mesh with an optional scalar field
//! - [`MeshBuilder`] - Owned builder that appends meshes at an offset
//! - [`MeshMerger`] - Stamps copies of a template mesh onto a base mesh
//! - [`RenderMesh`] - Welded vertex/index data ready for GPU upload
//! - Generators for subdivided tetrahedra, spheroids and surface plots

mod buffers;
mod builder;
pub mod generators;
mod merge;
mod render;
pub mod tetrahedra;

pub use buffers::{FACE_STRIDE, Face, MeshBuffers};
pub use builder::{AppendedRange, MeshBuilder};
pub use merge::{MeshMerger, Placement, instance_of_face, merge_meshes};
pub use render::{RenderMesh, RenderVertex};
pub use tetrahedra::{MAX_SUBDIVISION_LEVEL, TetrahedronParams, generate_tetrahedra};
