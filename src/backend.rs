//! wgpu implementation of [`RenderBackend`].
//!
//! The core issues one call per state change or draw, while wgpu wants whole render passes
//! with every buffer write done before submission. [`GpuBackend`] bridges the two: calls are
//! recorded into a list of passes (one per `clear` or target switch) and every draw's uniforms
//! go into a per-frame arena. [`RenderBackend::present`] uploads the arena with a single write,
//! encodes the passes in the order they were recorded, submits and presents. Each draw reads
//! its own slot of the arena through a dynamic offset.

use std::{collections::HashMap, iter};

use anyhow::Context as _;
use log::{info, warn};

use crate::{
    config::Config,
    context::Context,
    framebuffer::WaterFramebuffers,
    pipelines::groups::{self, GroupPipelines},
    render::{DepthCompare, Draw, DrawUniformsRaw, RenderBackend, SurfaceError},
    resources::{self, mesh::Geometry, mesh::Mesh},
    scene::{HeightField, RenderableGroup, Scene, WavySeafloor},
};

/// Initial number of uniform slots; the arena grows by doubling.
const INITIAL_UNIFORM_SLOTS: u64 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Reflection,
    Refraction,
    Screen,
}

#[derive(Clone, Copy, Debug)]
enum MeshRef {
    Seafloor,
    Water,
    Skybox,
    Prop(usize),
}

#[derive(Debug)]
struct RecordedDraw {
    group: RenderableGroup,
    mesh: MeshRef,
    compare: DepthCompare,
    offset: u32,
}

#[derive(Debug)]
struct RecordedPass {
    target: Target,
    clear: bool,
    draws: Vec<RecordedDraw>,
}

#[derive(Debug)]
pub struct GpuBackend {
    ctx: Context,
    framebuffers: WaterFramebuffers,
    pipelines: GroupPipelines,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_slots: u64,
    arena: Vec<u8>,
    seafloor: Mesh,
    water: Mesh,
    skybox: Mesh,
    /// One mesh per distinct model file.
    prop_meshes: Vec<Mesh>,
    /// Mesh index for each prop of the scene.
    prop_mesh_index: Vec<usize>,
    asset_dir: String,
    /// Runtime the backend was created on; shader reloads block on it for their error scope.
    runtime: tokio::runtime::Handle,
    clear_colour: wgpu::Color,
    target: Target,
    clip_testing: bool,
    depth_compare: DepthCompare,
    passes: Vec<RecordedPass>,
}

impl GpuBackend {
    /// Must be called from within a tokio runtime.
    pub fn new(ctx: Context, config: &Config, scene: &Scene) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("the GPU backend needs a tokio runtime")?;
        let device = &ctx.device;
        let framebuffers =
            WaterFramebuffers::new(device, ctx.config.format, ctx.config.width, ctx.config.height);
        let uniform_layout = groups::mk_uniform_bind_group_layout(device);
        let pipelines = GroupPipelines::new(
            device,
            ctx.config.format,
            &uniform_layout,
            &framebuffers.bind_group_layout,
        );

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = align_to(std::mem::size_of::<DrawUniformsRaw>() as u64, alignment);
        let (uniform_buffer, uniform_bind_group) =
            mk_uniform_arena(device, &uniform_layout, uniform_stride, INITIAL_UNIFORM_SLOTS);

        let resolution = config.terrain_resolution as f32;
        let center = config.terrain_center();
        let ground = WavySeafloor::from_config(config);
        let seafloor = Geometry::grid(
            resolution * config.seafloor_tiles as f32,
            config.terrain_resolution,
            (center.x, center.z),
            resolution,
            |x, z| ground.height_at(x, z),
        );
        let water = Geometry::grid(
            resolution * config.water_tiles as f32,
            config.terrain_resolution,
            (center.x, center.z),
            resolution,
            |_, _| 0.0,
        );
        let seafloor = Mesh::upload(device, "seafloor", &seafloor);
        let water = Mesh::upload(device, "water", &water);
        let skybox = Mesh::upload(device, "skybox", &Geometry::cube(resolution));

        let mut by_file: HashMap<&str, usize> = HashMap::new();
        let mut prop_meshes = Vec::new();
        let prop_mesh_index = scene
            .props
            .iter()
            .map(|prop| {
                *by_file.entry(prop.model.as_str()).or_insert_with(|| {
                    let geometry = resources::load_prop_geometry(&config.asset_dir, &prop.model);
                    prop_meshes.push(Mesh::upload(device, &prop.name, &geometry));
                    prop_meshes.len() - 1
                })
            })
            .collect();
        info!(
            "loaded {} models for {} props",
            prop_meshes.len(),
            scene.props.len()
        );

        Ok(Self {
            ctx,
            framebuffers,
            pipelines,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_slots: INITIAL_UNIFORM_SLOTS,
            arena: Vec::new(),
            seafloor,
            water,
            skybox,
            prop_meshes,
            prop_mesh_index,
            asset_dir: config.asset_dir.clone(),
            runtime,
            clear_colour: config.clear_colour,
            target: Target::Screen,
            clip_testing: false,
            depth_compare: DepthCompare::default(),
            passes: Vec::new(),
        })
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Configure the surface again after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.ctx.reconfigure();
    }

    fn current_pass(&mut self) -> &mut RecordedPass {
        let target = self.target;
        if self.passes.last().is_none_or(|pass| pass.target != target) {
            self.passes.push(RecordedPass {
                target,
                clear: false,
                draws: Vec::new(),
            });
        }
        let last = self.passes.len() - 1;
        &mut self.passes[last]
    }

    fn push_uniforms(&mut self, raw: &DrawUniformsRaw) -> u32 {
        let offset = self.arena.len();
        self.arena.extend_from_slice(bytemuck::bytes_of(raw));
        self.arena.resize(offset + self.uniform_stride as usize, 0);
        offset as u32
    }

    fn mesh(&self, mesh: MeshRef) -> &Mesh {
        match mesh {
            MeshRef::Seafloor => &self.seafloor,
            MeshRef::Water => &self.water,
            MeshRef::Skybox => &self.skybox,
            MeshRef::Prop(idx) => &self.prop_meshes[idx],
        }
    }

    fn ensure_arena_capacity(&mut self) {
        let needed = self.arena.len() as u64 / self.uniform_stride;
        if needed <= self.uniform_slots {
            return;
        }
        let slots = needed.next_power_of_two();
        info!("growing the uniform arena to {} slots", slots);
        let (buffer, bind_group) = mk_uniform_arena(
            &self.ctx.device,
            &self.uniform_layout,
            self.uniform_stride,
            slots,
        );
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_slots = slots;
    }
}

impl RenderBackend for GpuBackend {
    fn bind_reflection_target(&mut self) {
        self.target = Target::Reflection;
    }

    fn bind_refraction_target(&mut self) {
        self.target = Target::Refraction;
    }

    fn unbind_current_target(&mut self) {
        self.target = Target::Screen;
    }

    fn clear(&mut self) {
        self.passes.push(RecordedPass {
            target: self.target,
            clear: true,
            draws: Vec::new(),
        });
    }

    fn set_clip_testing(&mut self, enabled: bool) {
        self.clip_testing = enabled;
    }

    fn set_depth_compare(&mut self, compare: DepthCompare) {
        self.depth_compare = compare;
    }

    fn draw(&mut self, draw: Draw) {
        let mesh = match (draw.group, draw.prop) {
            (RenderableGroup::Seafloor, _) => MeshRef::Seafloor,
            (RenderableGroup::Water, _) => MeshRef::Water,
            (RenderableGroup::Skybox, _) => MeshRef::Skybox,
            (RenderableGroup::Objects, Some(prop)) => match self.prop_mesh_index.get(prop) {
                Some(idx) => MeshRef::Prop(*idx),
                None => {
                    warn!("no mesh for prop {}", prop);
                    return;
                }
            },
            (RenderableGroup::Objects, None) => {
                warn!("objects draw without a prop index");
                return;
            }
        };
        // The water shader samples both offscreen targets and cannot render into one of them
        if draw.group == RenderableGroup::Water && self.target != Target::Screen {
            warn!("skipping water draw into the {:?} target", self.target);
            return;
        }
        let offset = self.push_uniforms(&draw.uniforms.to_raw(self.clip_testing));
        let compare = self.depth_compare;
        self.current_pass().draws.push(RecordedDraw {
            group: draw.group,
            mesh,
            compare,
            offset,
        });
    }

    fn present(&mut self) -> anyhow::Result<()> {
        let passes = std::mem::take(&mut self.passes);
        self.ensure_arena_capacity();
        if !self.arena.is_empty() {
            self.ctx
                .queue
                .write_buffer(&self.uniform_buffer, 0, &self.arena);
        }
        self.arena.clear();

        let (output, suboptimal) = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture) => (texture, false),
            wgpu::CurrentSurfaceTexture::Suboptimal(texture) => (texture, true),
            wgpu::CurrentSurfaceTexture::Timeout => return Err(SurfaceError::Timeout.into()),
            wgpu::CurrentSurfaceTexture::Occluded => return Err(SurfaceError::Occluded.into()),
            wgpu::CurrentSurfaceTexture::Outdated => return Err(SurfaceError::Outdated.into()),
            wgpu::CurrentSurfaceTexture::Lost => return Err(SurfaceError::Lost.into()),
            wgpu::CurrentSurfaceTexture::Validation => {
                return Err(SurfaceError::Validation.into());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        for pass in &passes {
            let (label, color, depth) = match pass.target {
                Target::Reflection => (
                    "Reflection Pass",
                    &self.framebuffers.reflection.color.view,
                    &self.framebuffers.reflection.depth.view,
                ),
                Target::Refraction => (
                    "Refraction Pass",
                    &self.framebuffers.refraction.color.view,
                    &self.framebuffers.refraction.depth.view,
                ),
                Target::Screen => ("Main Pass", &view, &self.ctx.depth_texture.view),
            };
            let (color_load, depth_load) = if pass.clear {
                (
                    wgpu::LoadOp::Clear(self.clear_colour),
                    wgpu::LoadOp::Clear(1.0),
                )
            } else {
                (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            for draw in &pass.draws {
                render_pass.set_pipeline(self.pipelines.get(draw.group, draw.compare));
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[draw.offset]);
                if draw.group == RenderableGroup::Water {
                    render_pass.set_bind_group(1, &self.framebuffers.bind_group, &[]);
                }
                self.mesh(draw.mesh).draw(&mut render_pass);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        if suboptimal {
            self.ctx.reconfigure();
        }
        Ok(())
    }

    fn set_screen_viewport(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.framebuffers
            .set_screen_viewport(&self.ctx.device, width, height);
    }

    fn reload_shader(&mut self, group: RenderableGroup) -> anyhow::Result<()> {
        let file = groups::shader_file(group);
        let source = resources::load_string(&self.asset_dir, &file)?;
        // Runs on the event loop thread, outside the runtime, where blocking is allowed
        self.runtime
            .block_on(self.pipelines.rebuild(&self.ctx.device, group, &source))
            .with_context(|| format!("rebuilding from {}", file))?;
        info!("reloaded the {} shader from {}", group.label(), file);
        Ok(())
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

fn mk_uniform_arena(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: u64,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Arena"),
        size: stride * slots,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniformsRaw>() as u64),
            }),
        }],
        label: Some("draw_uniforms_bind_group"),
    });
    (buffer, bind_group)
}
