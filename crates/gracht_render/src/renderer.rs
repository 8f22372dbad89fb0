//! wgpu scene renderer
//!
//! One instanced draw per element class, the static bodies, the boat parts,
//! and last the translucent water. Everything lands in the reduced-resolution
//! offscreen target, which is then blitted to the window.

use crate::error::RenderError;
use crate::geometry::{Mesh, Vertex};
use crate::instances::InstanceRaw;
use crate::materials::{self, SKY};
use crate::target::{scaled_extent, BlitPass, OffscreenTarget, DEPTH_FORMAT, SCENE_FORMAT};
use glam::{Mat4, Vec3};
use gracht_core::instance::DirtyUpload;
use gracht_core::math::Tint;
use gracht_core::sim::{PartShape, VehiclePart};
use gracht_core::world::StaticShape;
use gracht_core::{ElementClass, FrameView, RenderTarget, SceneState, SurfaceSize};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

const FOG_DENSITY: f32 = 0.025;
const HEMI_SKY: Tint = Tint::from_hex(0xffeeb1);
const HEMI_GROUND: Tint = Tint::from_hex(0x080820);
const HEMI_INTENSITY: f32 = 0.6;
const KEY_COLOR: Tint = Tint::from_hex(0xaaccff);
const KEY_POSITION: Vec3 = Vec3::new(-30.0, 60.0, -30.0);
const KEY_INTENSITY: f32 = 0.5;
const GLOW_COLOR: Tint = Tint::from_hex(0xffaa00);
const GLOW_POSITION: Vec3 = Vec3::new(20.0, 10.0, 10.0);
const GLOW_INTENSITY: f32 = 0.3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera: [f32; 4],
    sky: [f32; 4],
    hemi_sky: [f32; 4],
    hemi_ground: [f32; 4],
    key_dir: [f32; 4],
    key_color: [f32; 4],
    glow_dir: [f32; 4],
    glow_color: [f32; 4],
}

impl Globals {
    fn new(frame: &FrameView, aspect: f32) -> Self {
        let rgb = |t: Tint, w: f32| [t.r, t.g, t.b, w];
        let dir = |p: Vec3, w: f32| p.normalize().extend(w).to_array();
        Self {
            view_proj: frame.view_projection(aspect).to_cols_array_2d(),
            camera: frame.camera_position.extend(frame.time).to_array(),
            sky: rgb(SKY, FOG_DENSITY),
            hemi_sky: rgb(HEMI_SKY, HEMI_INTENSITY),
            hemi_ground: rgb(HEMI_GROUND, 1.0),
            key_dir: dir(KEY_POSITION, KEY_INTENSITY),
            key_color: rgb(KEY_COLOR, 1.0),
            glow_dir: dir(GLOW_POSITION, GLOW_INTENSITY),
            glow_color: rgb(GLOW_COLOR, 1.0),
        }
    }
}

/// A mesh plus a fixed-capacity instance stream.
struct Batch {
    vertices: wgpu::Buffer,
    vertex_count: u32,
    instances: wgpu::Buffer,
    instance_count: u32,
    capacity: usize,
}

impl Batch {
    fn new(device: &wgpu::Device, label: &str, mesh: &Mesh, capacity: usize) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let capacity = capacity.max(1);
        let instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (std::mem::size_of::<InstanceRaw>() * capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            vertices,
            vertex_count: mesh.vertex_count(),
            instances,
            instance_count: 0,
            capacity,
        }
    }

    fn write(&mut self, queue: &wgpu::Queue, data: &[InstanceRaw]) {
        let data = &data[..data.len().min(self.capacity)];
        if !data.is_empty() {
            queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(data));
        }
        self.instance_count = data.len() as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_vertex_buffer(1, self.instances.slice(..));
        pass.draw(0..self.vertex_count, 0..self.instance_count);
    }

    fn destroy(self) {
        self.vertices.destroy();
        self.instances.destroy();
    }
}

struct VehicleBatch {
    batch: Batch,
    parts: Vec<VehiclePart>,
}

pub struct SceneRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: SurfaceSize,
    pixel_ratio: f32,
    max_dimension: u32,
    globals: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    solid_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    offscreen: OffscreenTarget,
    blit: BlitPass,
    classes: Vec<Option<Batch>>,
    statics: Vec<(StaticShape, Batch)>,
    vehicle: Vec<VehicleBatch>,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, size: SurfaceSize) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Gracht Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let globals = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });

        let solid_pipeline = scene_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            PipelineKind::Solid,
        );
        let water_pipeline = scene_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            PipelineKind::Water,
        );

        let max_dimension = device.limits().max_texture_dimension_2d;
        let pixel_ratio = size.scale_factor;
        let (width, height) = scaled_extent(size, pixel_ratio, max_dimension);
        let offscreen = OffscreenTarget::new(&device, width, height);
        let blit = BlitPass::new(&device, format, &offscreen);

        tracing::info!(
            adapter = %adapter.get_info().name,
            backend = ?adapter.get_info().backend,
            ?format,
            "renderer ready"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            pixel_ratio,
            max_dimension,
            globals,
            globals_bind_group,
            solid_pipeline,
            water_pipeline,
            offscreen,
            blit,
            classes: ElementClass::ALL.iter().map(|_| None).collect(),
            statics: Vec::new(),
            vehicle: Vec::new(),
        })
    }

    /// Reallocate the offscreen target when the ratio changes its extent.
    fn apply_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
        let (width, height) = scaled_extent(self.size, pixel_ratio, self.max_dimension);
        if self.offscreen.matches(width, height) {
            return;
        }
        let previous = std::mem::replace(
            &mut self.offscreen,
            OffscreenTarget::new(&self.device, width, height),
        );
        previous.destroy();
        self.blit.rebind(&self.device, &self.offscreen);
    }

    fn upload_statics(&mut self, scene: &SceneState) {
        for shape in [StaticShape::CanalSurface, StaticShape::QuayEdge, StaticShape::Road] {
            let material = materials::static_material(shape);
            let instances: Vec<InstanceRaw> = scene
                .environment()
                .bodies()
                .iter()
                .filter(|body| body.shape == shape)
                .map(|body| InstanceRaw::new(body.transform.matrix(), material.color, material.emissive))
                .collect();
            if instances.is_empty() {
                continue;
            }
            let label = format!("{shape:?}");
            let mut batch = Batch::new(
                &self.device,
                &label,
                &materials::static_mesh(shape),
                instances.len(),
            );
            batch.write(&self.queue, &instances);
            self.statics.push((shape, batch));
        }
    }

    fn upload_vehicle(&mut self, scene: &SceneState) {
        for shape in [PartShape::Cube, PartShape::Cylinder, PartShape::Ring] {
            let parts: Vec<VehiclePart> = scene.model().parts_of(shape).copied().collect();
            if parts.is_empty() {
                continue;
            }
            let label = format!("Vehicle {shape:?}");
            let batch = Batch::new(&self.device, &label, &materials::part_mesh(shape), parts.len());
            self.vehicle.push(VehicleBatch { batch, parts });
        }
    }

    fn write_vehicle(&mut self, body: Mat4) {
        for VehicleBatch { batch, parts } in &mut self.vehicle {
            let instances: Vec<InstanceRaw> = parts
                .iter()
                .map(|part| InstanceRaw::new(body * part.local, part.tint, part.emissive))
                .collect();
            batch.write(&self.queue, &instances);
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }
}

impl RenderTarget for SceneRenderer {
    type Error = RenderError;

    fn upload(&mut self, scene: &SceneState, dirty: &[DirtyUpload]) {
        if self.statics.is_empty() {
            self.upload_statics(scene);
        }
        if self.vehicle.is_empty() {
            self.upload_vehicle(scene);
        }

        let buffers = scene.buffers();
        for upload in dirty {
            let class = upload.class;
            let material = materials::class_material(class);
            let instances: Vec<InstanceRaw> = buffers
                .records(class)
                .iter()
                .map(|record| InstanceRaw::from_record(record, material, upload.colors))
                .collect();
            let device = &self.device;
            let batch = self.classes[class.index()].get_or_insert_with(|| {
                Batch::new(device, class.name(), &materials::class_mesh(class), buffers.capacity(class))
            });
            batch.write(&self.queue, &instances);
        }
        tracing::debug!(classes = dirty.len(), records = buffers.total_len(), "instances uploaded");
    }

    fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.size = size;
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.apply_pixel_ratio(self.pixel_ratio);
    }

    fn render(&mut self, frame: &FrameView) -> Result<(), RenderError> {
        self.apply_pixel_ratio(frame.pixel_ratio);
        let globals = Globals::new(frame, self.size.aspect());
        self.queue
            .write_buffer(&self.globals, 0, bytemuck::bytes_of(&globals));
        self.write_vehicle(frame.vehicle);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let [r, g, b] = SKY.to_array().map(|c| c.powf(2.2) as f64);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.offscreen.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.offscreen.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_pipeline(&self.solid_pipeline);
            for batch in self.classes.iter().flatten() {
                batch.draw(&mut pass);
            }
            for (shape, batch) in &self.statics {
                if *shape != StaticShape::CanalSurface {
                    batch.draw(&mut pass);
                }
            }
            for vehicle in &self.vehicle {
                vehicle.batch.draw(&mut pass);
            }

            // Translucent water last, over everything it should tint.
            pass.set_pipeline(&self.water_pipeline);
            for (shape, batch) in &self.statics {
                if *shape == StaticShape::CanalSurface {
                    batch.draw(&mut pass);
                }
            }
        }

        self.blit.draw(&mut encoder, &view);
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(self) {
        let Self {
            globals,
            offscreen,
            classes,
            statics,
            vehicle,
            ..
        } = self;
        let mut buffers = 0usize;
        for batch in classes.into_iter().flatten() {
            batch.destroy();
            buffers += 1;
        }
        for (_, batch) in statics {
            batch.destroy();
            buffers += 1;
        }
        for VehicleBatch { batch, .. } in vehicle {
            batch.destroy();
            buffers += 1;
        }
        offscreen.destroy();
        globals.destroy();
        tracing::info!(batches = buffers, "renderer released");
    }
}

#[derive(Clone, Copy)]
enum PipelineKind {
    Solid,
    Water,
}

fn scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    kind: PipelineKind,
) -> wgpu::RenderPipeline {
    let (label, vs, fs, blend, depth_write) = match kind {
        PipelineKind::Solid => ("Solid Pipeline", "vs_main", "fs_main", wgpu::BlendState::REPLACE, true),
        PipelineKind::Water => (
            "Water Pipeline",
            "vs_water",
            "fs_water",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        ),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            buffers: &[Vertex::desc(), InstanceRaw::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: SCENE_FORMAT,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn globals_match_the_shader_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 64 + 8 * 16);
    }

    #[test]
    fn globals_carry_time_and_fog() {
        let frame = FrameView {
            time: 4.5,
            camera_position: Vec3::new(0.0, 2.4, 7.0),
            look_target: Vec3::new(0.0, 1.0, -20.0),
            fov_y: 50f32.to_radians(),
            near: 0.1,
            far: 120.0,
            vehicle: Mat4::IDENTITY,
            speed: 0.0,
            pixel_ratio: 1.0,
        };
        let globals = Globals::new(&frame, 16.0 / 9.0);
        assert_eq!(globals.camera, [0.0, 2.4, 7.0, 4.5]);
        assert_eq!(globals.sky[3], FOG_DENSITY);
        let key = Vec3::new(globals.key_dir[0], globals.key_dir[1], globals.key_dir[2]);
        assert!((key.length() - 1.0).abs() < 1e-5);
        assert!(key.y > 0.0);
    }
}
