//! Configuration errors
//!
//! Everything in the scene is generated in-process, so the only thing that can
//! go wrong is a malformed stage table. It is rejected when the assembly is
//! built, never during a frame.

/// Malformed static configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("stage {stage}: blade count must be at least 1")]
    NoBlades { stage: String },

    #[error("stage {stage}: disc radius must be positive, got {radius}")]
    NonPositiveDiscRadius { stage: String, radius: f32 },

    #[error("stage {stage}: blade height must be nonzero")]
    ZeroBladeHeight { stage: String },

    #[error("stage {stage}: blade width must be positive, got {width}")]
    NonPositiveBladeWidth { stage: String, width: f32 },

    #[error("stage {stage}: {field} is not a finite number")]
    NonFinite { stage: String, field: &'static str },

    #[error("degenerate blade shape: chord {chord}, height {height}")]
    DegenerateBlade { chord: f32, height: f32 },

    #[error("engine has no stages")]
    NoStages,

    #[error("particle count must be at least 1")]
    ZeroParticles,

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
