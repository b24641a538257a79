//! Startup configuration
//!
//! The stage table and quality preset are fixed for the lifetime of the
//! process. They can be overridden from JSON at startup (the web host passes
//! an optional config string); anything not supplied falls back to the
//! built-in engine layout.

use serde::{Deserialize, Serialize};

use crate::consts::PARTICLE_COUNT;
use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Airflow particle count for this preset
    pub fn particle_count(&self) -> usize {
        match self {
            QualityPreset::Low => PARTICLE_COUNT / 4,
            QualityPreset::Medium => PARTICLE_COUNT,
            QualityPreset::High => PARTICLE_COUNT * 2,
        }
    }
}

/// Rotation sense of a stage.
///
/// Compressor-side rows (fan, LPC, HPC) spin forward, turbine rows spin in
/// reverse, like the two shafts of a real turbofan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpinDirection {
    #[default]
    Forward,
    Reverse,
}

impl SpinDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            SpinDirection::Forward => 1.0,
            SpinDirection::Reverse => -1.0,
        }
    }
}

/// Engine component identifiers used by the status feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKey {
    Fan,
    #[serde(rename = "LPC")]
    Lpc,
    #[serde(rename = "HPC")]
    Hpc,
    #[serde(rename = "HPT")]
    Hpt,
    #[serde(rename = "LPT")]
    Lpt,
}

impl ComponentKey {
    pub const ALL: [ComponentKey; 5] = [
        ComponentKey::Fan,
        ComponentKey::Lpc,
        ComponentKey::Hpc,
        ComponentKey::Hpt,
        ComponentKey::Lpt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKey::Fan => "Fan",
            ComponentKey::Lpc => "LPC",
            ComponentKey::Hpc => "HPC",
            ComponentKey::Hpt => "HPT",
            ComponentKey::Lpt => "LPT",
        }
    }

    /// Dense index, for per-component tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Linear RGB triple in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [f32; 3]);

impl Color {
    /// Color from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        ])
    }

    #[inline]
    pub fn rgb(&self) -> [f32; 3] {
        self.0
    }
}

/// One disc-and-blade row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineStageConfig {
    /// Human-readable label used in logs and errors
    pub name: String,
    /// Station along the shaft (positive toward the intake)
    pub axial_position: f32,
    pub blade_count: u32,
    pub disc_radius: f32,
    pub blade_height: f32,
    pub blade_width: f32,
    pub base_color: Color,
    /// Radians per second
    pub angular_speed: f32,
    pub spin: SpinDirection,
    pub component: ComponentKey,
}

impl TurbineStageConfig {
    /// Reject rows that would produce degenerate geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("axial_position", self.axial_position),
            ("disc_radius", self.disc_radius),
            ("blade_height", self.blade_height),
            ("blade_width", self.blade_width),
            ("angular_speed", self.angular_speed),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    stage: self.name.clone(),
                    field,
                });
            }
        }

        if self.blade_count == 0 {
            return Err(ConfigError::NoBlades {
                stage: self.name.clone(),
            });
        }
        if self.disc_radius <= 0.0 {
            return Err(ConfigError::NonPositiveDiscRadius {
                stage: self.name.clone(),
                radius: self.disc_radius,
            });
        }
        if self.blade_height == 0.0 {
            return Err(ConfigError::ZeroBladeHeight {
                stage: self.name.clone(),
            });
        }
        if self.blade_width <= 0.0 {
            return Err(ConfigError::NonPositiveBladeWidth {
                stage: self.name.clone(),
                width: self.blade_width,
            });
        }
        Ok(())
    }
}

const FAN_COLOR: Color = Color::from_hex(0x38bdf8);
const LPC_COLOR: Color = Color::from_hex(0x94a3b8);
const HPC_COLOR: Color = Color::from_hex(0xcbd5e1);
const HPT_COLOR: Color = Color::from_hex(0xfb7185);
const LPT_COLOR: Color = Color::from_hex(0xa78bfa);

/// The built-in engine layout, intake to exhaust.
///
/// Rows narrow through the compressor and widen again through the turbine.
pub fn default_stages() -> Vec<TurbineStageConfig> {
    let mut stages = Vec::with_capacity(12);

    stages.push(TurbineStageConfig {
        name: "fan".into(),
        axial_position: 3.5,
        blade_count: 24,
        disc_radius: 1.8,
        blade_height: 1.6,
        blade_width: 0.6,
        base_color: FAN_COLOR,
        angular_speed: 4.0,
        spin: SpinDirection::Forward,
        component: ComponentKey::Fan,
    });

    // LPC: two rows
    for (i, (x, blades, disc, height, width)) in
        [(2.5, 18, 1.3, 0.9, 0.35), (2.1, 20, 1.2, 0.8, 0.32)].into_iter().enumerate()
    {
        stages.push(TurbineStageConfig {
            name: format!("lpc-{}", i + 1),
            axial_position: x,
            blade_count: blades,
            disc_radius: disc,
            blade_height: height,
            blade_width: width,
            base_color: LPC_COLOR,
            angular_speed: 4.0,
            spin: SpinDirection::Forward,
            component: ComponentKey::Lpc,
        });
    }

    // HPC: four rows, denser and shorter toward the combustor
    for (i, x) in [1.6, 1.3, 1.0, 0.7].into_iter().enumerate() {
        let step = i as f32;
        stages.push(TurbineStageConfig {
            name: format!("hpc-{}", i + 1),
            axial_position: x,
            blade_count: 24 + 2 * i as u32,
            disc_radius: 0.9 - step * 0.05,
            blade_height: 0.6 - step * 0.05,
            blade_width: 0.25,
            base_color: HPC_COLOR,
            angular_speed: 7.0,
            spin: SpinDirection::Forward,
            component: ComponentKey::Hpc,
        });
    }

    stages.push(TurbineStageConfig {
        name: "hpt".into(),
        axial_position: -0.8,
        blade_count: 30,
        disc_radius: 0.9,
        blade_height: 0.65,
        blade_width: 0.28,
        base_color: HPT_COLOR,
        angular_speed: 7.0,
        spin: SpinDirection::Reverse,
        component: ComponentKey::Hpt,
    });

    // LPT: four rows, growing toward the exhaust
    for (i, x) in [-1.4, -1.9, -2.4, -2.9].into_iter().enumerate() {
        let step = i as f32;
        stages.push(TurbineStageConfig {
            name: format!("lpt-{}", i + 1),
            axial_position: x,
            blade_count: 32,
            disc_radius: 1.0 + step * 0.15,
            blade_height: 0.8 + step * 0.1,
            blade_width: 0.3 + step * 0.02,
            base_color: LPT_COLOR,
            angular_speed: 4.0,
            spin: SpinDirection::Reverse,
            component: ComponentKey::Lpt,
        });
    }

    stages
}

/// Startup configuration for the whole scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinConfig {
    /// Seed for the airflow RNG
    pub seed: u64,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Stage rows, intake to exhaust
    pub stages: Vec<TurbineStageConfig>,
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            seed: crate::consts::DEFAULT_SEED,
            quality: QualityPreset::Medium,
            stages: default_stages(),
        }
    }
}

impl TwinConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config: {} stages, quality {}",
            config.stages.len(),
            config.quality.as_str()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of airflow particles (fixed once the scene is built)
    pub fn particle_count(&self) -> usize {
        self.quality.particle_count()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }
        self.stages.iter().try_for_each(TurbineStageConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = TwinConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stages.len(), 12);
        assert_eq!(config.particle_count(), 4000);

        let count = |key| config.stages.iter().filter(|s| s.component == key).count();
        assert_eq!(count(ComponentKey::Fan), 1);
        assert_eq!(count(ComponentKey::Lpc), 2);
        assert_eq!(count(ComponentKey::Hpc), 4);
        assert_eq!(count(ComponentKey::Hpt), 1);
        assert_eq!(count(ComponentKey::Lpt), 4);

        // Ordered intake to exhaust
        assert!(
            config
                .stages
                .windows(2)
                .all(|w| w[0].axial_position > w[1].axial_position)
        );
    }

    #[test]
    fn test_turbine_rows_spin_in_reverse() {
        for stage in default_stages() {
            let expected = match stage.component {
                ComponentKey::Hpt | ComponentKey::Lpt => SpinDirection::Reverse,
                _ => SpinDirection::Forward,
            };
            assert_eq!(stage.spin, expected, "{}", stage.name);
        }
    }

    #[test]
    fn test_validation_rejects_bad_rows() {
        let mut stage = default_stages().remove(0);
        stage.blade_count = 0;
        assert!(matches!(stage.validate(), Err(ConfigError::NoBlades { .. })));

        let mut stage = default_stages().remove(0);
        stage.disc_radius = 0.0;
        assert!(matches!(
            stage.validate(),
            Err(ConfigError::NonPositiveDiscRadius { .. })
        ));

        let mut stage = default_stages().remove(0);
        stage.blade_height = 0.0;
        assert!(matches!(stage.validate(), Err(ConfigError::ZeroBladeHeight { .. })));

        let mut stage = default_stages().remove(0);
        stage.angular_speed = f32::NAN;
        assert!(matches!(
            stage.validate(),
            Err(ConfigError::NonFinite { field: "angular_speed", .. })
        ));

        let config = TwinConfig {
            stages: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoStages)));
    }

    #[test]
    fn test_json_roundtrip_and_defaults() {
        let json = TwinConfig::default().to_json().unwrap();
        assert!(json.contains("\"LPC\""));
        let parsed = TwinConfig::from_json(&json).unwrap();
        assert_eq!(parsed.stages, default_stages());

        // Missing fields fall back to defaults
        let partial = TwinConfig::from_json(r#"{"quality":"High","seed":7}"#).unwrap();
        assert_eq!(partial.seed, 7);
        assert_eq!(partial.particle_count(), 8000);
        assert_eq!(partial.stages.len(), 12);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            TwinConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        let mut config = TwinConfig::default();
        config.stages[3].blade_height = 0.0;
        let json = config.to_json().unwrap();
        assert!(matches!(
            TwinConfig::from_json(&json),
            Err(ConfigError::ZeroBladeHeight { .. })
        ));
    }

    #[test]
    fn test_quality_preset_names() {
        assert_eq!(QualityPreset::from_str("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
        assert_eq!(QualityPreset::Low.particle_count(), 1000);
    }

    #[test]
    fn test_hex_color() {
        let c = Color::from_hex(0xff8000);
        assert_eq!(c.rgb()[0], 1.0);
        assert!((c.rgb()[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.rgb()[2], 0.0);
    }
}
