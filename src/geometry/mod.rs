//! Procedural mesh generation
//!
//! Meshes are built once at startup and shared read-only afterwards.

pub mod blade;
pub mod mesh;
pub mod primitives;

pub use blade::{BladeCache, BladeMesh, BladeShapeParams, generate_blade};
pub use mesh::MeshData;
pub use primitives::{box_grid, cone, cylinder};
