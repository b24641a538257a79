//! Turbofan Twin - procedural engine scene for the maintenance dashboard
//!
//! Core modules:
//! - `geometry`: Parametric blade generator and primitive meshes
//! - `sim`: Deterministic per-frame scene logic (airflow, stages, assembly)
//! - `renderer`: GPU-facing vertex/instance layouts
//! - `platform`: Browser bindings for the JS render driver
//! - `config`: Stage table and startup configuration

pub mod config;
pub mod error;
pub mod geometry;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{Color, ComponentKey, QualityPreset, SpinDirection, TurbineStageConfig, TwinConfig};
pub use error::ConfigError;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Longest frame the driver may report (seconds); longer gaps are clamped
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Default number of airflow particles
    pub const PARTICLE_COUNT: usize = 4000;
    /// Seed used when the config does not supply one
    pub const DEFAULT_SEED: u64 = 0x7e57_f10a;

    /// Initial scatter covers the whole duct, intake to exhaust
    pub const DOMAIN_MIN_X: f32 = -10.0;
    pub const DOMAIN_MAX_X: f32 = 6.0;
    /// Particles behind this station are sent back to the intake
    pub const RECYCLE_X: f32 = -8.0;
    /// Respawn band at the intake: [RESPAWN_X, RESPAWN_X + RESPAWN_SPREAD)
    pub const RESPAWN_X: f32 = 4.5;
    pub const RESPAWN_SPREAD: f32 = 1.5;
    /// Radius of the respawn disc (intake mouth)
    pub const RESPAWN_RADIUS: f32 = 1.6;

    /// Axial airflow speed (scene units/s, toward -x)
    pub const AXIAL_SPEED: f32 = 12.0;
    /// Fraction of the remaining radial gap closed per frame
    pub const RELAX_FACTOR: f32 = 0.1;
    /// Centerline dead band: particles inside this fraction of the target are pushed out
    pub const CORE_FRACTION: f32 = 0.2;
    /// Only upstream of this station is the centerline dead band enforced
    pub const CORE_LIMIT_X: f32 = -4.0;
    /// Per-particle shell dithering: target * (SHELL_BASE + seed * SHELL_SPREAD)
    pub const SHELL_BASE: f32 = 0.8;
    pub const SHELL_SPREAD: f32 = 0.4;

    /// Turbulence: sin(x * SPATIAL + t * TEMPORAL) * AMPLITUDE
    pub const TURBULENCE_AMPLITUDE: f32 = 0.05;
    pub const TURBULENCE_SPATIAL: f32 = 10.0;
    pub const TURBULENCE_TEMPORAL: f32 = 5.0;

    /// Duct profile zone boundaries (axial stations)
    pub const FAN_START_X: f32 = 2.5;
    pub const COMPRESSOR_START_X: f32 = 0.5;
    pub const COMBUSTOR_START_X: f32 = -0.5;
    pub const TURBINE_START_X: f32 = -3.0;
    /// Duct profile radii
    pub const FAN_RADIUS: f32 = 1.6;
    pub const COMPRESSOR_EXIT_RADIUS: f32 = 1.2;
    pub const COMPRESSOR_SLOPE: f32 = 0.4;
    pub const COMBUSTOR_RADIUS: f32 = 0.5;
    pub const TURBINE_SLOPE: f32 = 0.3;
    pub const EXHAUST_RADIUS: f32 = 1.0;

    /// Cold air color (intake and compressor)
    pub const COLD_COLOR: [f32; 3] = [0.6, 0.8, 1.0];
    /// Hot gas: (1.0, HOT_GREEN * (1 - progress), HOT_BLUE)
    pub const HOT_GREEN: f32 = 0.6;
    pub const HOT_BLUE: f32 = 0.1;
    /// Distance behind the combustor over which hot gas fades
    pub const HOT_FADE_LENGTH: f32 = 4.0;

    /// Blade generator
    pub const BLADE_THICKNESS_RATIO: f32 = 0.15;
    pub const BLADE_CHORD_SEGMENTS: u32 = 6;
    pub const BLADE_SPAN_SEGMENTS: u32 = 10;
    pub const BLADE_TIP_TAPER: f32 = 0.3;
    /// Twist at the tip for twist factor 1 (radians, -60 degrees)
    pub const BLADE_TIP_TWIST: f32 = -std::f32::consts::FRAC_PI_3;
    pub const BLADE_RIPPLE_FREQUENCY: f32 = 3.0;
    pub const BLADE_RIPPLE_AMPLITUDE: f32 = 0.05;

    /// Stage layout, as fractions of the disc radius
    pub const DISC_RADIUS_RATIO: f32 = 0.9;
    pub const BLADE_ROOT_RATIO: f32 = 0.85;
    pub const DISC_THICKNESS: f32 = 0.2;
    pub const DISC_SEGMENTS: u32 = 32;

    /// Alert highlight (#ef4444) and its glow
    pub const ALERT_COLOR: [f32; 3] = [0.937, 0.267, 0.267];
    pub const ALERT_EMISSIVE_INTENSITY: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid may round up to exactly TAU
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Convert polar (r, theta) to cartesian in the (y, z) cross-section plane
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a (y, z) cross-section point to polar (r, theta)
///
/// A point exactly on the centerline has no defined angle; it reports 0 so
/// that it always relaxes along +y.
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    let r = pos.length();
    if r == 0.0 {
        (0.0, 0.0)
    } else {
        (r, pos.y.atan2(pos.x))
    }
}
