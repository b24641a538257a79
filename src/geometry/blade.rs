//! Parametric blade geometry
//!
//! A blade starts life as a thin gridded box (chord x span x thickness) and is
//! deformed vertex by vertex:
//! - taper: the chord shrinks linearly toward the tip
//! - twist: each span station rotates about the span axis, up to -60 degrees
//!   at the tip
//! - ripple: a small sinusoid across the thickness breaks up the flat faces
//!
//! Normals are rebuilt after deformation so lighting follows the twisted
//! surface.

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::SpinDirection;
use crate::consts::*;
use crate::error::ConfigError;

use super::mesh::MeshData;
use super::primitives::box_grid;

/// Inputs of the blade generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeShapeParams {
    chord_width: f32,
    height: f32,
    twist_factor: f32,
    spin: SpinDirection,
}

impl BladeShapeParams {
    pub fn new(
        chord_width: f32,
        height: f32,
        twist_factor: f32,
        spin: SpinDirection,
    ) -> Result<Self, ConfigError> {
        if height == 0.0
            || !height.is_finite()
            || chord_width <= 0.0
            || !chord_width.is_finite()
            || !twist_factor.is_finite()
        {
            return Err(ConfigError::DegenerateBlade {
                chord: chord_width,
                height,
            });
        }
        Ok(Self {
            chord_width,
            height,
            twist_factor,
            spin,
        })
    }

    #[inline]
    pub fn chord_width(&self) -> f32 {
        self.chord_width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Blade thickness, a fixed fraction of the chord
    #[inline]
    pub fn thickness(&self) -> f32 {
        self.chord_width * BLADE_THICKNESS_RATIO
    }

    #[inline]
    pub fn twist_factor(&self) -> f32 {
        self.twist_factor
    }

    #[inline]
    pub fn spin(&self) -> SpinDirection {
        self.spin
    }

    /// Bitwise identity of the parameter tuple
    fn key(&self) -> BladeKey {
        BladeKey {
            chord: self.chord_width.to_bits(),
            height: self.height.to_bits(),
            twist: self.twist_factor.to_bits(),
            spin: self.spin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BladeKey {
    chord: u32,
    height: u32,
    twist: u32,
    spin: SpinDirection,
}

/// A generated blade and the parameters it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct BladeMesh {
    pub params: BladeShapeParams,
    pub mesh: MeshData,
}

/// Build the deformed blade mesh. Pure: equal inputs give identical output.
pub fn generate_blade(params: &BladeShapeParams) -> BladeMesh {
    let height = params.height;
    let half_height = height / 2.0;
    let twist = BLADE_TIP_TWIST * params.twist_factor * params.spin.sign();

    let mut mesh = box_grid(
        params.chord_width,
        height,
        params.thickness(),
        BLADE_CHORD_SEGMENTS,
        BLADE_SPAN_SEGMENTS,
        1,
    );

    for p in &mut mesh.positions {
        let y_ratio = (p.y + half_height) / height;
        let taper = 1.0 - y_ratio * BLADE_TIP_TAPER;
        let chord = p.x * taper;

        let (sin, cos) = (twist * y_ratio).sin_cos();
        p.x = chord * cos - p.z * sin;
        p.z = chord * sin + p.z * cos;
        p.z += (chord * BLADE_RIPPLE_FREQUENCY).sin() * BLADE_RIPPLE_AMPLITUDE * taper;
    }
    mesh.compute_vertex_normals();

    BladeMesh {
        params: *params,
        mesh,
    }
}

/// Memoized blade meshes, keyed by the exact parameter tuple.
///
/// The engine has about a dozen distinct blade shapes and they live for the
/// whole process, so nothing is ever evicted.
#[derive(Debug, Default)]
pub struct BladeCache {
    meshes: HashMap<BladeKey, Rc<BladeMesh>>,
    hits: u32,
}

impl BladeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached mesh for `params`, generating it on first use
    pub fn get_or_generate(&mut self, params: &BladeShapeParams) -> Rc<BladeMesh> {
        let key = params.key();
        if let Some(mesh) = self.meshes.get(&key) {
            self.hits += 1;
            return Rc::clone(mesh);
        }

        let blade = Rc::new(generate_blade(params));
        log::debug!(
            "Generated blade mesh: chord {:.3}, height {:.3}, {} vertices",
            params.chord_width,
            params.height,
            blade.mesh.vertex_count()
        );
        self.meshes.insert(key, Rc::clone(&blade));
        blade
    }

    /// Number of distinct meshes generated so far
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Lookups served from the cache
    pub fn hits(&self) -> u32 {
        self.hits
    }
}
