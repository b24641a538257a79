//! GPU-facing buffer layouts
//!
//! The scene is drawn by the host's WebGPU renderer. This module defines the
//! vertex and instance records it uploads and packs scene state into them.

pub mod vertex;

pub use vertex::{
    InstanceRaw, MaterialUniform, MeshVertex, ParticleVertex, mesh_vertices, pack_particles, write_instances,
    write_stage_instances,
};
