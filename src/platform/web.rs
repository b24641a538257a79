//! Scene handle exported to the JS render driver
//!
//! The host creates one [`TwinHandle`], uploads the static meshes once, then
//! calls `frame` from its animation loop and `set_status` whenever the data
//! feed publishes a new cycle. Every accessor copies into a JS-owned typed
//! array, so nothing the host holds aliases wasm memory.

use js_sys::{Float32Array, Uint32Array};
use wasm_bindgen::prelude::*;

use crate::config::TwinConfig;
use crate::geometry::MeshData;
use crate::renderer::{InstanceRaw, MaterialUniform, mesh_vertices, write_stage_instances};
use crate::sim::{AlertMap, EngineAssembly, FrameInput, StagePart, tick};

/// Which mesh of a stage an accessor refers to
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMesh {
    Blade,
    Disc,
    Root,
}

impl From<StageMesh> for StagePart {
    fn from(mesh: StageMesh) -> Self {
        match mesh {
            StageMesh::Blade => StagePart::Blade,
            StageMesh::Disc => StagePart::Disc,
            StageMesh::Root => StagePart::Root,
        }
    }
}

fn float_array(flat: &[f32]) -> Float32Array {
    let array = Float32Array::new_with_length(flat.len() as u32);
    array.copy_from(flat);
    array
}

fn mesh_vertex_array(mesh: &MeshData) -> Float32Array {
    float_array(bytemuck::cast_slice(&mesh_vertices(mesh)))
}

fn mesh_index_array(mesh: &MeshData) -> Uint32Array {
    let array = Uint32Array::new_with_length(mesh.indices.len() as u32);
    array.copy_from(&mesh.indices);
    array
}

fn material_array(material: MaterialUniform) -> Float32Array {
    float_array(bytemuck::cast_slice(std::slice::from_ref(&material)))
}

#[wasm_bindgen]
pub struct TwinHandle {
    engine: EngineAssembly,
    alerts: AlertMap,
    /// Scratch space for one stage part's instance matrices
    instances: Vec<InstanceRaw>,
    /// Particle buffers mirrored into JS, sized once
    positions: Float32Array,
    colors: Float32Array,
}

#[wasm_bindgen]
impl TwinHandle {
    /// Build the scene from an optional JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<TwinHandle, JsValue> {
        super::init_logging();

        let config = match config_json {
            Some(json) => TwinConfig::from_json(&json),
            None => Ok(TwinConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let engine = EngineAssembly::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let max_instances = engine
            .stages()
            .iter()
            .map(|s| s.blade_count())
            .max()
            .unwrap_or(0)
            .max(1);
        let floats = engine.flow().len() as u32 * 3;

        Ok(Self {
            engine,
            alerts: AlertMap::new(),
            instances: vec![InstanceRaw::default(); max_instances],
            positions: Float32Array::new_with_length(floats),
            colors: Float32Array::new_with_length(floats),
        })
    }

    /// Advance one animation frame.
    ///
    /// `delta` is clamped to [0, 0.1] s, so after a long stall (a background
    /// tab, a debugger break) the scene resumes where it left off instead of
    /// jumping ahead by the whole gap.
    pub fn frame(&mut self, delta: f32, elapsed: f32, playing: bool) {
        let input = FrameInput::new(delta, elapsed, playing);
        tick(&mut self.engine, &input, &self.alerts);
    }

    /// Replace the component status list, e.g. `[{"key":"Fan","alert":true}]`
    pub fn set_status(&mut self, json: &str) -> Result<(), JsValue> {
        self.alerts = AlertMap::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    pub fn particle_count(&self) -> usize {
        self.engine.flow().len()
    }

    /// xyz triples, one per particle
    pub fn positions(&self) -> Float32Array {
        self.positions
            .copy_from(bytemuck::cast_slice(self.engine.flow().buffers().positions()));
        self.positions.clone()
    }

    /// rgb triples, one per particle
    pub fn colors(&self) -> Float32Array {
        self.colors
            .copy_from(bytemuck::cast_slice(self.engine.flow().buffers().colors()));
        self.colors.clone()
    }

    pub fn stage_count(&self) -> usize {
        self.engine.stages().len()
    }

    pub fn stage_name(&self, index: usize) -> Option<String> {
        self.engine.stages().get(index).map(|s| s.name().to_owned())
    }

    pub fn stage_rotation(&self, index: usize) -> f32 {
        self.engine.stages().get(index).map_or(0.0, |s| s.rotation())
    }

    pub fn stage_alert(&self, index: usize) -> bool {
        self.engine.stages().get(index).is_some_and(|s| s.is_alert())
    }

    /// Interleaved position/normal/uv records (8 floats per vertex)
    pub fn stage_vertices(&self, index: usize, mesh: StageMesh) -> Float32Array {
        match self.engine.stages().get(index) {
            Some(stage) => mesh_vertex_array(stage.part_mesh(mesh.into())),
            None => Float32Array::new_with_length(0),
        }
    }

    pub fn stage_indices(&self, index: usize, mesh: StageMesh) -> Uint32Array {
        match self.engine.stages().get(index) {
            Some(stage) => mesh_index_array(stage.part_mesh(mesh.into())),
            None => Uint32Array::new_with_length(0),
        }
    }

    /// Column-major 4x4 world matrices, 16 floats per instance
    pub fn stage_matrices(&mut self, index: usize, mesh: StageMesh) -> Float32Array {
        let written = match self.engine.stages().get(index) {
            Some(stage) => write_stage_instances(stage, mesh.into(), &mut self.instances),
            None => 0,
        };
        float_array(bytemuck::cast_slice(&self.instances[..written]))
    }

    /// Blade matrices for one stage
    pub fn blade_matrices(&mut self, index: usize) -> Float32Array {
        self.stage_matrices(index, StageMesh::Blade)
    }

    /// Material uniform (12 floats): color+opacity, emissive+intensity,
    /// metalness, roughness, double-sided, wireframe
    pub fn stage_material(&self, index: usize, mesh: StageMesh) -> Float32Array {
        match self.engine.stages().get(index) {
            Some(stage) => material_array(stage.part_material(mesh.into()).into()),
            None => Float32Array::new_with_length(0),
        }
    }

    pub fn shell_count(&self) -> usize {
        self.engine.shell().len()
    }

    pub fn shell_vertices(&self, index: usize) -> Float32Array {
        match self.engine.shell().get(index) {
            Some(part) => mesh_vertex_array(&part.mesh),
            None => Float32Array::new_with_length(0),
        }
    }

    pub fn shell_indices(&self, index: usize) -> Uint32Array {
        match self.engine.shell().get(index) {
            Some(part) => mesh_index_array(&part.mesh),
            None => Uint32Array::new_with_length(0),
        }
    }

    /// Column-major world matrix of a shell part
    pub fn shell_matrix(&self, index: usize) -> Float32Array {
        match self.engine.shell().get(index) {
            Some(part) => float_array(&part.transform.to_cols_array()),
            None => Float32Array::new_with_length(0),
        }
    }

    /// Material uniform of a shell part; the combustor follows the play state
    pub fn shell_material(&self, index: usize) -> Float32Array {
        match self.engine.shell().get(index) {
            Some(part) => material_array(part.material.into()),
            None => Float32Array::new_with_length(0),
        }
    }

    /// Combustor emissive intensity for the current play state
    pub fn combustor_emissive(&self) -> f32 {
        self.engine.combustor_glow().emissive_intensity
    }

    /// Combustor point-light intensity for the current play state
    pub fn combustor_light(&self) -> f32 {
        self.engine.combustor_glow().light_intensity
    }
}
