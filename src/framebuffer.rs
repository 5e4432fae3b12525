//! Offscreen targets for the water passes.
//!
//! [`WaterFramebuffers`] owns the reflection and refraction render targets (colour plus depth)
//! and the bind group through which the water shader samples them in the main pass. The
//! targets follow the screen size; [`WaterFramebuffers::set_screen_viewport`] recreates them
//! after a resize.

use crate::data_structures::texture::{self, Texture};

#[derive(Debug)]
pub struct RenderTarget {
    pub color: Texture,
    pub depth: Texture,
}

impl RenderTarget {
    fn new(device: &wgpu::Device, size: [u32; 2], format: wgpu::TextureFormat, label: &str) -> Self {
        Self {
            color: Texture::create_render_target(device, size, format, label),
            depth: Texture::create_depth_texture(device, size, &format!("{} depth", label)),
        }
    }
}

#[derive(Debug)]
pub struct WaterFramebuffers {
    pub reflection: RenderTarget,
    pub refraction: RenderTarget,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
    size: [u32; 2],
}

impl WaterFramebuffers {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let size = [width.max(1), height.max(1)];
        let reflection = RenderTarget::new(device, size, format, "reflection target");
        let refraction = RenderTarget::new(device, size, format, "refraction target");
        let sampler = texture::create_clamped_sampler(device);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group =
            mk_bind_group(device, &bind_group_layout, &reflection, &refraction, &sampler);
        Self {
            reflection,
            refraction,
            bind_group_layout,
            bind_group,
            sampler,
            format,
            size,
        }
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Resize both targets to the new screen size.
    pub fn set_screen_viewport(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let size = [width.max(1), height.max(1)];
        if size == self.size {
            return;
        }
        self.size = size;
        self.reflection = RenderTarget::new(device, size, self.format, "reflection target");
        self.refraction = RenderTarget::new(device, size, self.format, "refraction target");
        self.bind_group = mk_bind_group(
            device,
            &self.bind_group_layout,
            &self.reflection,
            &self.refraction,
            &self.sampler,
        );
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let target_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            target_entry(0),
            target_entry(1),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("water_targets_bind_group_layout"),
    })
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    reflection: &RenderTarget,
    refraction: &RenderTarget,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&reflection.color.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&refraction.color.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some("water_targets_bind_group"),
    })
}
