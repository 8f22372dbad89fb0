//! GPU instance layout

use crate::materials::Material;
use glam::Mat4;
use gracht_core::math::Tint;
use gracht_core::InstanceRecord;

/// Per-instance vertex data: model matrix columns plus colour, with the
/// emissive flag riding in alpha.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
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

    pub fn new(model: Mat4, color: Tint, emissive: bool) -> Self {
        let [r, g, b] = color.to_array();
        Self {
            model: model.to_cols_array_2d(),
            color: [r, g, b, if emissive { 1.0 } else { 0.0 }],
        }
    }

    /// Tints only apply when `tinted` is set, so untinted classes keep
    /// their material colour even if a record carries one.
    pub fn from_record(record: &InstanceRecord, material: Material, tinted: bool) -> Self {
        let color = match (tinted, record.tint) {
            (true, Some(tint)) => multiply(material.color, tint),
            _ => material.color,
        };
        Self::new(record.transform.matrix(), color, material.emissive)
    }
}

fn multiply(a: Tint, b: Tint) -> Tint {
    Tint::rgb(a.r * b.r, a.g * b.g, a.b * b.b)
}
