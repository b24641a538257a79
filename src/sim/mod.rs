//! Deterministic scene simulation
//!
//! Everything that changes from frame to frame lives here:
//! - Seeded RNG only
//! - No allocation inside the per-frame update
//! - No rendering or platform dependencies

pub mod assembly;
pub mod flow;
pub mod profile;
pub mod stage;
pub mod status;
pub mod tick;

pub use assembly::{CombustorGlow, EngineAssembly, ShellKind, ShellMaterial, ShellPart};
pub use flow::{FlowField, FlowStats, Particle, ParticleBuffers, relax_cross_section};
pub use profile::{AxialZone, ThermalZone, target_radius, thermal_color};
pub use stage::{BladeSlot, StageMaterial, StagePart, TurbineStage};
pub use status::{AlertMap, ComponentStatus};
pub use tick::{FrameInput, tick};
