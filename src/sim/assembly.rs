//! Engine assembly
//!
//! Builds every stage from the config, adds the static shell around them and
//! owns the airflow field. Per frame it forwards component alerts to the
//! matching stages and advances the moving parts; it simulates nothing itself.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use super::flow::FlowField;
use super::stage::TurbineStage;
use super::status::AlertMap;
use super::tick::FrameInput;
use crate::config::{Color, TwinConfig};
use crate::error::ConfigError;
use crate::geometry::{BladeCache, MeshData, cone, cylinder};

/// Static (non-rotating) engine parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    IntakeCone,
    BypassDuct,
    BypassGuide,
    CombustorShell,
    ExhaustCone,
    Shaft,
    OuterCasing,
}

/// Surface parameters of a shell part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellMaterial {
    pub color: [f32; 3],
    pub opacity: f32,
    pub wireframe: bool,
    /// Unlit (basic) material
    pub unlit: bool,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl ShellMaterial {
    fn metal(hex: u32, metalness: f32, roughness: f32) -> Self {
        Self {
            color: Color::from_hex(hex).rgb(),
            opacity: 1.0,
            wireframe: false,
            unlit: false,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            metalness,
            roughness,
            double_sided: false,
        }
    }

    fn glass(hex: u32, opacity: f32, wireframe: bool) -> Self {
        Self {
            opacity,
            wireframe,
            unlit: wireframe,
            double_sided: true,
            ..Self::metal(hex, 0.0, 1.0)
        }
    }
}

/// One static shell mesh placed in the scene
#[derive(Debug, Clone)]
pub struct ShellPart {
    pub kind: ShellKind,
    pub mesh: MeshData,
    pub transform: Mat4,
    pub material: ShellMaterial,
}

/// Combustor emissive level and its point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombustorGlow {
    pub lit: bool,
    pub emissive_intensity: f32,
    pub light_intensity: f32,
    pub light_color: [f32; 3],
}

impl CombustorGlow {
    fn new(lit: bool) -> Self {
        Self {
            lit,
            emissive_intensity: if lit { 1.5 } else { 0.5 },
            light_intensity: if lit { 4.0 } else { 1.0 },
            light_color: Color::from_hex(0xff4500).rgb(),
        }
    }
}

/// Place a y-axis primitive at an axial station, turned by `turn` about z
fn along_shaft(x: f32, turn: f32) -> Mat4 {
    Mat4::from_rotation_translation(Quat::from_rotation_z(turn), Vec3::new(x, 0.0, 0.0))
}

fn build_shell() -> Vec<ShellPart> {
    let mut combustor = ShellMaterial::metal(0x7f1d1d, 0.5, 1.0);
    combustor.emissive = Color::from_hex(0xea580c).rgb();
    combustor.emissive_intensity = CombustorGlow::new(false).emissive_intensity;

    vec![
        ShellPart {
            kind: ShellKind::IntakeCone,
            mesh: cone(0.75, 1.8, 32),
            // Apex forward, into the intake
            transform: along_shaft(4.5, -FRAC_PI_2),
            material: ShellMaterial::metal(0x1e293b, 0.7, 0.3),
        },
        ShellPart {
            kind: ShellKind::BypassDuct,
            mesh: cylinder(3.6, 3.6, 3.5, 48, true),
            transform: along_shaft(3.0, FRAC_PI_2),
            material: ShellMaterial::glass(0xffffff, 0.1, false),
        },
        ShellPart {
            kind: ShellKind::BypassGuide,
            mesh: cylinder(3.62, 3.62, 3.5, 24, true),
            transform: along_shaft(3.0, FRAC_PI_2),
            material: ShellMaterial::glass(0x38bdf8, 0.2, true),
        },
        ShellPart {
            kind: ShellKind::CombustorShell,
            mesh: cylinder(0.95, 0.9, 1.2, 24, false),
            transform: along_shaft(0.0, FRAC_PI_2),
            material: combustor,
        },
        ShellPart {
            kind: ShellKind::ExhaustCone,
            mesh: cone(0.7, 1.8, 32),
            // Apex aft
            transform: along_shaft(-3.6, FRAC_PI_2),
            material: ShellMaterial::metal(0x451a03, 0.7, 0.7),
        },
        ShellPart {
            kind: ShellKind::Shaft,
            mesh: cylinder(0.2, 0.2, 8.5, 12, false),
            transform: along_shaft(0.0, FRAC_PI_2),
            material: ShellMaterial::metal(0x111111, 1.0, 0.2),
        },
        ShellPart {
            kind: ShellKind::OuterCasing,
            mesh: cylinder(1.7, 1.5, 6.5, 32, true),
            transform: along_shaft(0.2, FRAC_PI_2),
            material: ShellMaterial::glass(0x64748b, 0.1, true),
        },
    ]
}

/// The whole engine scene
#[derive(Debug)]
pub struct EngineAssembly {
    stages: Vec<TurbineStage>,
    flow: FlowField,
    shell: Vec<ShellPart>,
    blades: BladeCache,
    glow: CombustorGlow,
}

impl EngineAssembly {
    /// Build the scene. Any malformed stage aborts construction.
    pub fn new(config: &TwinConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut blades = BladeCache::new();
        let stages = config
            .stages
            .iter()
            .map(|stage| TurbineStage::new(stage, &mut blades))
            .collect::<Result<Vec<_>, _>>()?;

        let flow = FlowField::new(config.particle_count(), config.seed)?;
        let shell = build_shell();

        log::info!(
            "Engine assembled: {} stages, {} blades, {} blade meshes, {} shell parts",
            stages.len(),
            stages.iter().map(TurbineStage::blade_count).sum::<usize>(),
            blades.len(),
            shell.len()
        );

        Ok(Self {
            stages,
            flow,
            shell,
            blades,
            glow: CombustorGlow::new(false),
        })
    }

    /// Forward each component's alert flag to its stages.
    /// Returns the number of stages whose highlight changed.
    pub fn apply_alerts(&mut self, alerts: &AlertMap) -> usize {
        self.stages
            .iter_mut()
            .map(|stage| stage.set_alert(alerts.is_alert(stage.component())))
            .filter(|&changed| changed)
            .count()
    }

    /// Switch the combustor glow between its running and idle levels
    pub fn set_combustor_lit(&mut self, lit: bool) {
        if self.glow.lit == lit {
            return;
        }
        self.glow = CombustorGlow::new(lit);
        for part in &mut self.shell {
            if part.kind == ShellKind::CombustorShell {
                part.material.emissive_intensity = self.glow.emissive_intensity;
            }
        }
    }

    /// Advance airflow and stage rotations by one frame
    pub fn advance(&mut self, frame: &FrameInput) {
        self.flow.update(frame);
        for stage in &mut self.stages {
            stage.update(frame);
        }
    }

    pub fn stages(&self) -> &[TurbineStage] {
        &self.stages
    }

    pub fn flow(&self) -> &FlowField {
        &self.flow
    }

    pub fn shell(&self) -> &[ShellPart] {
        &self.shell
    }

    pub fn blade_cache(&self) -> &BladeCache {
        &self.blades
    }

    pub fn combustor_glow(&self) -> CombustorGlow {
        self.glow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentKey, QualityPreset, default_stages};
    use crate::renderer::MaterialUniform;
    use std::rc::Rc;

    fn config() -> TwinConfig {
        TwinConfig {
            quality: QualityPreset::Low,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_engine() {
        let engine = EngineAssembly::new(&config()).unwrap();
        assert_eq!(engine.stages().len(), 12);
        assert_eq!(engine.flow().len(), QualityPreset::Low.particle_count());
        assert_eq!(engine.shell().len(), 7);
        // HPC rows share a width but differ in height; LPT rows all differ
        assert_eq!(engine.blade_cache().len(), 12);
    }

    #[test]
    fn test_identical_rows_share_blade_mesh() {
        let mut stages = default_stages();
        let mut twin = stages[3].clone();
        twin.name = "hpc-twin".into();
        twin.axial_position = 0.4;
        stages.insert(7, twin);

        let engine = EngineAssembly::new(&TwinConfig {
            stages,
            ..config()
        })
        .unwrap();
        assert_eq!(engine.blade_cache().len(), 12);
        assert!(engine.blade_cache().hits() >= 1);
        assert!(Rc::ptr_eq(engine.stages()[3].blade(), engine.stages()[7].blade()));
    }

    #[test]
    fn test_bad_stage_fails_construction() {
        let mut cfg = config();
        cfg.stages[5].blade_count = 0;
        assert!(matches!(
            EngineAssembly::new(&cfg),
            Err(ConfigError::NoBlades { stage }) if stage == "hpc-3"
        ));

        let mut cfg = config();
        cfg.stages[9].disc_radius = -1.0;
        assert!(matches!(
            EngineAssembly::new(&cfg),
            Err(ConfigError::NonPositiveDiscRadius { .. })
        ));
    }

    #[test]
    fn test_alerts_reach_every_matching_stage() {
        let mut engine = EngineAssembly::new(&config()).unwrap();
        let mut alerts = AlertMap::new();
        alerts.set(ComponentKey::Lpt, true);

        assert_eq!(engine.apply_alerts(&alerts), 4);
        assert_eq!(engine.apply_alerts(&alerts), 0);
        for stage in engine.stages() {
            assert_eq!(stage.is_alert(), stage.component() == ComponentKey::Lpt);
        }
    }

    #[test]
    fn test_combustor_glow() {
        let mut engine = EngineAssembly::new(&config()).unwrap();
        let combustor = |e: &EngineAssembly| {
            e.shell()
                .iter()
                .find(|p| p.kind == ShellKind::CombustorShell)
                .map(|p| p.material.emissive_intensity)
        };
        assert_eq!(combustor(&engine), Some(0.5));
        engine.set_combustor_lit(true);
        assert_eq!(combustor(&engine), Some(1.5));
        assert_eq!(engine.combustor_glow().light_intensity, 4.0);
        engine.set_combustor_lit(false);
        assert_eq!(engine.combustor_glow().light_intensity, 1.0);
    }

    #[test]
    fn test_shell_materials() {
        let engine = EngineAssembly::new(&config()).unwrap();
        let material = |kind| engine.shell().iter().find(|p| p.kind == kind).unwrap().material;

        let combustor = material(ShellKind::CombustorShell);
        assert_eq!(combustor.metalness, 0.5);
        assert_eq!(combustor.roughness, 1.0);
        assert_eq!(combustor.emissive, Color::from_hex(0xea580c).rgb());

        let guide = MaterialUniform::from(material(ShellKind::BypassGuide));
        assert_eq!(guide.wireframe, 1.0);
        assert_eq!(guide.double_sided, 1.0);
        assert!((guide.color[3] - 0.2).abs() < 1e-6);

        let shaft = MaterialUniform::from(material(ShellKind::Shaft));
        assert_eq!(shaft.wireframe, 0.0);
        assert_eq!(shaft.color[3], 1.0);
    }

    #[test]
    fn test_cones_point_along_the_shaft() {
        let engine = EngineAssembly::new(&config()).unwrap();
        let apex = |kind| {
            let part = engine.shell().iter().find(|p| p.kind == kind).unwrap();
            part.transform.transform_point3(Vec3::new(0.0, 0.9, 0.0))
        };
        // Intake apex ahead of its base, exhaust apex behind
        assert!((apex(ShellKind::IntakeCone).x - 5.4).abs() < 1e-5);
        assert!((apex(ShellKind::ExhaustCone).x - -4.5).abs() < 1e-5);
    }
}
