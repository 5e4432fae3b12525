use std::collections::HashMap;

use anyhow::{anyhow, bail};
use wgpu::naga::{
    ShaderStage,
    front::wgsl,
    valid::{Capabilities, ValidationFlags, Validator},
};

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{FRAGMENT_ENTRY, VERTEX_ENTRY, mk_render_pipeline},
    render::{DepthCompare, DrawUniformsRaw},
    resources::mesh::{MeshVertex, Vertex},
    scene::RenderableGroup,
};

const DEPTH_COMPARES: [DepthCompare; 2] = [DepthCompare::Less, DepthCompare::LessEqual];

/// WGSL source compiled into the binary for `group`.
pub fn builtin_source(group: RenderableGroup) -> &'static str {
    match group {
        RenderableGroup::Seafloor => include_str!("../../assets/shaders/seafloor.wgsl"),
        RenderableGroup::Objects => include_str!("../../assets/shaders/objects.wgsl"),
        RenderableGroup::Water => include_str!("../../assets/shaders/water.wgsl"),
        RenderableGroup::Skybox => include_str!("../../assets/shaders/skybox.wgsl"),
    }
}

/// Location of `group`'s shader below the asset directory, used for hot reloading.
pub fn shader_file(group: RenderableGroup) -> String {
    format!("shaders/{}.wgsl", group.label())
}

/// Parse and validate `source` on the CPU and make sure it defines the entry points every group
/// pipeline is built with.
pub fn check_shader_source(source: &str) -> anyhow::Result<()> {
    let module = wgsl::parse_str(source).map_err(|e| anyhow!(e.emit_to_string(source)))?;
    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| anyhow!(e.emit_to_string(source)))?;

    for (stage, name) in [
        (ShaderStage::Vertex, VERTEX_ENTRY),
        (ShaderStage::Fragment, FRAGMENT_ENTRY),
    ] {
        let found = module
            .entry_points
            .iter()
            .any(|entry| entry.stage == stage && entry.name == name);
        if !found {
            bail!("no {:?} entry point named `{}`", stage, name);
        }
    }
    Ok(())
}

/// Per-draw uniforms live in one buffer and are addressed with a dynamic offset.
pub fn mk_uniform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<DrawUniformsRaw>() as wgpu::BufferAddress,
                ),
            },
            count: None,
        }],
        label: Some("draw_uniforms_bind_group_layout"),
    })
}

/// One pipeline per group and depth comparison, so the depth state set before a draw can be
/// honoured by picking the matching pipeline.
#[derive(Debug)]
pub struct GroupPipelines {
    pipelines: HashMap<(RenderableGroup, DepthCompare), wgpu::RenderPipeline>,
    uniform_layout: wgpu::BindGroupLayout,
    water_layout: wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
}

impl GroupPipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        uniform_layout: &wgpu::BindGroupLayout,
        water_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let mut pipelines = Self {
            pipelines: HashMap::new(),
            uniform_layout: uniform_layout.clone(),
            water_layout: water_layout.clone(),
            format,
        };
        for group in RenderableGroup::DRAW_ORDER {
            let built = pipelines.compile(device, group, builtin_source(group));
            pipelines.pipelines.extend(built);
        }
        pipelines
    }

    pub fn get(&self, group: RenderableGroup, compare: DepthCompare) -> &wgpu::RenderPipeline {
        &self.pipelines[&(group, compare)]
    }

    /// Replace the pipelines of `group` with ones compiled from `source`.
    ///
    /// The source is checked on the CPU first, then the pipelines are created inside a
    /// validation error scope. The current pipelines stay in place unless both succeed.
    pub async fn rebuild(
        &mut self,
        device: &wgpu::Device,
        group: RenderableGroup,
        source: &str,
    ) -> anyhow::Result<()> {
        check_shader_source(source)?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let built = self.compile(device, group, source);
        if let Some(e) = scope.pop().await {
            return Err(anyhow::Error::new(e)
                .context(format!("creating the {} pipelines", group.label())));
        }
        self.pipelines.extend(built);
        Ok(())
    }

    fn compile(
        &self,
        device: &wgpu::Device,
        group: RenderableGroup,
        source: &str,
    ) -> Vec<((RenderableGroup, DepthCompare), wgpu::RenderPipeline)> {
        let mut layouts = vec![Some(&self.uniform_layout)];
        if group == RenderableGroup::Water {
            layouts.push(Some(&self.water_layout));
        }
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", group.label())),
            bind_group_layouts: &layouts,
            immediate_size: 0,
        });

        DEPTH_COMPARES
            .into_iter()
            .map(|compare| {
                let shader = wgpu::ShaderModuleDescriptor {
                    label: Some(group.label()),
                    source: wgpu::ShaderSource::Wgsl(source.to_owned().into()),
                };
                let pipeline = mk_render_pipeline(
                    device,
                    &format!("{} pipeline ({:?})", group.label(), compare),
                    &layout,
                    self.format,
                    Some(wgpu::BlendState {
                        alpha: wgpu::BlendComponent::REPLACE,
                        color: wgpu::BlendComponent::REPLACE,
                    }),
                    Some(Texture::DEPTH_FORMAT),
                    compare,
                    &[MeshVertex::desc()],
                    shader,
                );
                ((group, compare), pipeline)
            })
            .collect()
    }
}
