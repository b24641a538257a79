//! Turbine stage: one disc with a ring of blades
//!
//! Blades are laid out once around the shaft (the x axis). Each frame only the
//! stage's rotation angle changes; world transforms are derived on demand.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

use glam::{Affine3A, Mat4, Vec3};

use super::tick::FrameInput;
use crate::config::{ComponentKey, TurbineStageConfig};
use crate::consts::*;
use crate::error::ConfigError;
use crate::geometry::{BladeCache, BladeMesh, BladeShapeParams, MeshData, box_grid, cylinder};
use crate::normalize_angle;

/// Twist factor used for every stage blade
const STAGE_TWIST_FACTOR: f32 = 1.0;

/// Surface parameters handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageMaterial {
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl StageMaterial {
    /// Blade material in its normal state
    pub fn base(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            metalness: 0.8,
            roughness: 0.3,
            double_sided: true,
        }
    }

    /// Blade material while the component is flagged
    pub fn alert() -> Self {
        Self {
            color: ALERT_COLOR,
            emissive: ALERT_COLOR,
            emissive_intensity: ALERT_EMISSIVE_INTENSITY,
            ..Self::base(ALERT_COLOR)
        }
    }

    /// Dark metal used for discs
    pub fn disc() -> Self {
        Self {
            color: [0.2; 3],
            metalness: 0.7,
            roughness: 0.6,
            double_sided: false,
            ..Self::base([0.2; 3])
        }
    }

    /// Blade root platforms
    pub fn root() -> Self {
        Self {
            color: [0.133; 3],
            metalness: 0.0,
            roughness: 0.9,
            double_sided: false,
            ..Self::base([0.133; 3])
        }
    }
}

/// The meshes a stage is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePart {
    /// Shared blade mesh, one instance per slot
    Blade,
    /// Hub disc, one instance
    Disc,
    /// Root platform, one instance per slot
    Root,
}

impl StagePart {
    pub const ALL: [StagePart; 3] = [StagePart::Blade, StagePart::Disc, StagePart::Root];
}

/// Placement of one blade within the rotating stage group
#[derive(Debug, Clone, Copy)]
pub struct BladeSlot {
    /// Angular position around the shaft
    pub angle: f32,
    /// Root platform transform (at the disc rim, span pointing outward)
    pub root: Affine3A,
    /// Blade mesh transform (root shifted out by half the span)
    pub blade: Affine3A,
}

/// A disc-and-blade row
#[derive(Debug, Clone)]
pub struct TurbineStage {
    config: TurbineStageConfig,
    blade: Rc<BladeMesh>,
    disc: MeshData,
    root_block: MeshData,
    slots: Vec<BladeSlot>,
    rotation: f32,
    alert: bool,
}

impl TurbineStage {
    /// Lay out a stage, reusing cached blade geometry
    pub fn new(config: &TurbineStageConfig, blades: &mut BladeCache) -> Result<Self, ConfigError> {
        config.validate()?;

        let params = BladeShapeParams::new(
            config.blade_width,
            config.blade_height,
            STAGE_TWIST_FACTOR,
            config.spin,
        )?;
        let blade = blades.get_or_generate(&params);

        let disc_radius = config.disc_radius * DISC_RADIUS_RATIO;
        let disc = cylinder(disc_radius, disc_radius, DISC_THICKNESS, DISC_SEGMENTS, false);

        let w = config.blade_width;
        let root_block = box_grid(w * 0.9, w * 0.1, w * 0.5, 1, 1, 1);

        let root_radius = config.disc_radius * BLADE_ROOT_RATIO;
        let half_span = Affine3A::from_translation(Vec3::new(0.0, config.blade_height / 2.0, 0.0));
        let slots = (0..config.blade_count)
            .map(|i| {
                let angle = i as f32 / config.blade_count as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                let root = Affine3A::from_translation(Vec3::new(0.0, cos * root_radius, sin * root_radius))
                    * Affine3A::from_rotation_x(angle);
                BladeSlot {
                    angle,
                    root,
                    blade: root * half_span,
                }
            })
            .collect();

        Ok(Self {
            config: config.clone(),
            blade,
            disc,
            root_block,
            slots,
            rotation: 0.0,
            alert: false,
        })
    }

    /// Spin the stage by one frame. Paused frames leave the angle untouched.
    pub fn update(&mut self, frame: &FrameInput) {
        if !frame.playing {
            return;
        }
        let step = frame.delta * self.config.angular_speed * self.config.spin.sign();
        self.rotation = normalize_angle(self.rotation + step);
    }

    /// Set the alert highlight; returns true if it changed
    pub fn set_alert(&mut self, alert: bool) -> bool {
        if self.alert == alert {
            return false;
        }
        self.alert = alert;
        if alert {
            log::info!("Stage {} ({}) flagged", self.config.name, self.config.component.as_str());
        } else {
            log::info!("Stage {} ({}) cleared", self.config.name, self.config.component.as_str());
        }
        true
    }

    pub fn config(&self) -> &TurbineStageConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn component(&self) -> ComponentKey {
        self.config.component
    }

    /// Current angle about the shaft, radians in [-π, π)
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn is_alert(&self) -> bool {
        self.alert
    }

    #[inline]
    pub fn blade_count(&self) -> usize {
        self.slots.len()
    }

    pub fn blade(&self) -> &Rc<BladeMesh> {
        &self.blade
    }

    pub fn disc(&self) -> &MeshData {
        &self.disc
    }

    pub fn root_block(&self) -> &MeshData {
        &self.root_block
    }

    pub fn slots(&self) -> &[BladeSlot] {
        &self.slots
    }

    /// Blade material for the current alert state
    pub fn material(&self) -> StageMaterial {
        if self.alert {
            StageMaterial::alert()
        } else {
            StageMaterial::base(self.config.base_color.rgb())
        }
    }

    /// Mesh drawn for `part`
    pub fn part_mesh(&self, part: StagePart) -> &MeshData {
        match part {
            StagePart::Blade => &self.blade.mesh,
            StagePart::Disc => &self.disc,
            StagePart::Root => &self.root_block,
        }
    }

    /// Material for `part`; only blades carry the alert highlight
    pub fn part_material(&self, part: StagePart) -> StageMaterial {
        match part {
            StagePart::Blade => self.material(),
            StagePart::Disc => StageMaterial::disc(),
            StagePart::Root => StageMaterial::root(),
        }
    }

    /// Number of instances drawn for `part`
    pub fn part_instances(&self, part: StagePart) -> usize {
        match part {
            StagePart::Disc => 1,
            StagePart::Blade | StagePart::Root => self.slots.len(),
        }
    }

    /// Stage group transform: axial station, then rotation about the shaft
    pub fn transform(&self) -> Affine3A {
        Affine3A::from_translation(Vec3::new(self.config.axial_position, 0.0, 0.0))
            * Affine3A::from_rotation_x(self.rotation)
    }

    /// Disc world transform (cylinder axis turned onto the shaft)
    pub fn disc_transform(&self) -> Mat4 {
        Mat4::from(self.transform() * Affine3A::from_rotation_z(FRAC_PI_2))
    }

    /// World transform of every blade mesh
    pub fn blade_transforms(&self) -> impl Iterator<Item = Mat4> + '_ {
        let group = self.transform();
        self.slots.iter().map(move |slot| Mat4::from(group * slot.blade))
    }

    /// World transform of every root platform
    pub fn root_transforms(&self) -> impl Iterator<Item = Mat4> + '_ {
        let group = self.transform();
        self.slots.iter().map(move |slot| Mat4::from(group * slot.root))
    }
}
