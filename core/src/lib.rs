//! # Trinity Core
//!
//! Mesh generation core for the Trinity 3D data visualizer: subdivided
//! tetrahedra, spheroids and surface plots, and batching of many marker
//! instances into a single mesh for directed scatter plots.
//!
//! Everything here is CPU-side and framework-agnostic. The output
//! [`mesh::MeshBuffers`] (or its welded [`mesh::RenderMesh`] form) is handed
//! to whichever rendering layer hosts the plot.

pub mod error;
pub mod math;
pub mod mesh;
pub mod profiling;
pub mod scatter;

pub use error::{MeshError, MeshResult};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version. Call once after the host installs its logger.
pub fn init() {
    log::info!("Trinity Core v{} initialized", VERSION);
}
