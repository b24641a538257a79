//! Vertex and instance types

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::geometry::MeshData;
use crate::sim::{ParticleBuffers, ShellMaterial, StageMaterial, StagePart, TurbineStage};

/// Airflow point: position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ParticleVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Lit mesh vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance model matrix (column-major), one per blade
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<Mat4> for InstanceRaw {
    fn from(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

/// Interleave the particle buffers into `out` without allocating.
/// Returns the number of vertices written.
pub fn pack_particles(buffers: &ParticleBuffers, out: &mut [ParticleVertex]) -> usize {
    let written = buffers.len().min(out.len());
    let sources = buffers.positions().iter().zip(buffers.colors());
    for (dst, (position, color)) in out.iter_mut().zip(sources) {
        *dst = ParticleVertex {
            position: *position,
            color: *color,
        };
    }
    written
}

/// Flatten a mesh into vertex records (indices are uploaded as-is)
pub fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((p, n), uv)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
        })
        .collect()
}

/// Write one instance per model matrix into `out`.
/// Returns the number of instances written.
pub fn write_instances(models: impl IntoIterator<Item = Mat4>, out: &mut [InstanceRaw]) -> usize {
    let mut written = 0;
    for (dst, model) in out.iter_mut().zip(models) {
        *dst = InstanceRaw::from(model);
        written += 1;
    }
    written
}

/// Write the world transforms of one stage part into `out`
pub fn write_stage_instances(stage: &TurbineStage, part: StagePart, out: &mut [InstanceRaw]) -> usize {
    match part {
        StagePart::Blade => write_instances(stage.blade_transforms(), out),
        StagePart::Disc => write_instances(std::iter::once(stage.disc_transform()), out),
        StagePart::Root => write_instances(stage.root_transforms(), out),
    }
}

/// Surface parameters as uploaded to the material uniform buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// rgb + opacity
    pub color: [f32; 4],
    /// rgb + intensity
    pub emissive: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    /// 1.0 when both faces are drawn
    pub double_sided: f32,
    /// 1.0 for unlit wireframe overlays
    pub wireframe: f32,
}

fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

impl From<StageMaterial> for MaterialUniform {
    fn from(m: StageMaterial) -> Self {
        let [r, g, b] = m.color;
        let [er, eg, eb] = m.emissive;
        Self {
            color: [r, g, b, 1.0],
            emissive: [er, eg, eb, m.emissive_intensity],
            metalness: m.metalness,
            roughness: m.roughness,
            double_sided: flag(m.double_sided),
            wireframe: 0.0,
        }
    }
}

impl From<ShellMaterial> for MaterialUniform {
    fn from(m: ShellMaterial) -> Self {
        let [r, g, b] = m.color;
        let [er, eg, eb] = m.emissive;
        Self {
            color: [r, g, b, m.opacity],
            emissive: [er, eg, eb, m.emissive_intensity],
            metalness: m.metalness,
            roughness: m.roughness,
            double_sided: flag(m.double_sided),
            wireframe: flag(m.wireframe),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_stages;
    use crate::geometry::{BladeCache, box_grid};
    use crate::sim::FlowField;

    #[test]
    fn test_layout_strides() {
        assert_eq!(ParticleVertex::desc().array_stride, 24);
        assert_eq!(MeshVertex::desc().array_stride, 32);
        assert_eq!(MeshVertex::desc().attributes[2].offset, 24);
        let instance = InstanceRaw::desc();
        assert_eq!(instance.array_stride, 64);
        assert_eq!(instance.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(instance.attributes[3].offset, 48);
    }

    #[test]
    fn test_pack_particles() {
        let field = FlowField::new(64, 8).unwrap();
        let mut out = vec![ParticleVertex::default(); 100];
        assert_eq!(pack_particles(field.buffers(), &mut out), 64);
        assert_eq!(out[10].position, field.buffers().positions()[10]);
        assert_eq!(out[63].color, field.buffers().colors()[63]);
        assert_eq!(out[64], ParticleVertex::default());

        let mut short = vec![ParticleVertex::default(); 16];
        assert_eq!(pack_particles(field.buffers(), &mut short), 16);
    }

    #[test]
    fn test_write_instances() {
        let mut cache = BladeCache::new();
        let stage = TurbineStage::new(&default_stages()[0], &mut cache).unwrap();
        let mut out = vec![InstanceRaw::default(); 32];
        assert_eq!(write_instances(stage.blade_transforms(), &mut out), 24);
        // Every blade sits at the fan station
        for instance in &out[..24] {
            assert!((instance.model[3][0] - 3.5).abs() < 1e-6);
        }

        let mut short = vec![InstanceRaw::default(); 8];
        assert_eq!(write_instances(stage.blade_transforms(), &mut short), 8);
    }

    #[test]
    fn test_write_stage_instances() {
        let mut cache = BladeCache::new();
        let stage = TurbineStage::new(&default_stages()[7], &mut cache).unwrap();
        let mut out = vec![InstanceRaw::default(); 64];
        for part in StagePart::ALL {
            let written = write_stage_instances(&stage, part, &mut out);
            assert_eq!(written, stage.part_instances(part));
            for instance in &out[..written] {
                assert!((instance.model[3][0] - -0.8).abs() < 1e-6);
            }
        }
        write_stage_instances(&stage, StagePart::Disc, &mut out);
        assert_eq!(out[0], InstanceRaw::from(stage.disc_transform()));
    }

    #[test]
    fn test_material_uniform() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);

        let alert = MaterialUniform::from(StageMaterial::alert());
        assert_eq!(alert.color[3], 1.0);
        assert_eq!(alert.emissive[3], crate::consts::ALERT_EMISSIVE_INTENSITY);
        assert_eq!(alert.double_sided, 1.0);

        let disc = MaterialUniform::from(StageMaterial::disc());
        assert_eq!(disc.emissive, [0.0; 4]);
        assert_eq!(disc.double_sided, 0.0);
    }

    #[test]
    fn test_mesh_vertices() {
        let mesh = box_grid(1.0, 1.0, 1.0, 1, 1, 1);
        let vertices = mesh_vertices(&mesh);
        assert_eq!(vertices.len(), 24);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&vertices).len(), 24 * 32);
    }
}
