//! Render context and the backend seam.
//!
//! [`RenderContext`] owns everything a frame reads or mutates on the CPU side (camera,
//! navigation, scene, clock). It is created once at startup and passed by reference into the
//! orchestrator and the compositor.
//!
//! [`RenderBackend`] is what the core drives: target binding, the two pieces of fixed-function
//! state the passes toggle (clip testing and depth comparison), one draw per group or prop, and
//! presentation. [`crate::backend::GpuBackend`] implements it on top of wgpu.
//!
//! # Key types
//!
//! - [`DrawUniforms`] is the per-draw uniform set pushed with every draw
//! - [`DrawUniformsRaw`] is its GPU layout
//! - [`Draw`] names what to draw (group, and for objects the prop index)

use cgmath::{Matrix4, Point3, SquareMatrix};
use thiserror::Error;

use crate::{
    camera::{Camera, CameraController},
    clip::ClipPlane,
    clock::FrameClock,
    config::Config,
    scene::{RenderableGroup, Scene},
};

/// Depth comparison used by the rasterizer for subsequent draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthCompare {
    #[default]
    Less,
    LessEqual,
}

impl From<DepthCompare> for wgpu::CompareFunction {
    fn from(compare: DepthCompare) -> Self {
        match compare {
            DepthCompare::Less => wgpu::CompareFunction::Less,
            DepthCompare::LessEqual => wgpu::CompareFunction::LessEqual,
        }
    }
}

/// Uniforms pushed for one draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawUniforms {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub clip_plane: ClipPlane,
    pub camera_position: Point3<f32>,
    /// Elapsed seconds.
    pub time: f32,
    /// Caustic texture phase; zero for groups without caustics.
    pub caustic_time: f32,
    pub atlas_index: u32,
}

impl DrawUniforms {
    pub fn to_raw(&self, clip_enabled: bool) -> DrawUniformsRaw {
        DrawUniformsRaw {
            model: self.model.into(),
            view: self.view.into(),
            projection: self.projection.into(),
            clip_plane: self.clip_plane.to_raw(),
            camera_position: self.camera_position.into(),
            time: self.time,
            caustic_time: self.caustic_time,
            atlas_index: self.atlas_index,
            clip_enabled: clip_enabled as u32,
            _padding: 0,
        }
    }
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            clip_plane: ClipPlane::neutral(),
            camera_position: Point3::new(0.0, 0.0, 0.0),
            time: 0.0,
            caustic_time: 0.0,
            atlas_index: 0,
        }
    }
}

/**
 * The raw uniforms are the actual data stored on the GPU.
 *
 * Field order mirrors `DrawUniforms` in the WGSL sources: the vec3 camera position is followed
 * by a scalar so that no implicit padding is needed.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniformsRaw {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    clip_plane: [f32; 4],
    camera_position: [f32; 3],
    time: f32,
    caustic_time: f32,
    atlas_index: u32,
    clip_enabled: u32,
    _padding: u32,
}

/// One draw call: activate the group's shader, push the uniforms, draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Draw {
    pub group: RenderableGroup,
    /// Index into [`Scene::props`] for the objects group.
    pub prop: Option<usize>,
    pub uniforms: DrawUniforms,
}

/// Collaborator interface consumed by the compositor and the orchestrator.
///
/// Calls arrive in the order they must take effect. Implementations may defer GPU work until
/// [`RenderBackend::present`], but must preserve that order and must capture clip-testing and
/// depth state at the time of each draw.
pub trait RenderBackend {
    fn bind_reflection_target(&mut self);
    fn bind_refraction_target(&mut self);
    /// Go back to the default (screen) target.
    fn unbind_current_target(&mut self);
    fn clear(&mut self);
    fn set_clip_testing(&mut self, enabled: bool);
    fn set_depth_compare(&mut self, compare: DepthCompare);
    fn draw(&mut self, draw: Draw);
    fn present(&mut self) -> anyhow::Result<()>;
    fn set_screen_viewport(&mut self, width: u32, height: u32);
    /// Rebuild a group's shader from its source on disk.
    fn reload_shader(&mut self, group: RenderableGroup) -> anyhow::Result<()>;
}

/// Reasons the window surface had no texture to present into.
///
/// [`RenderBackend::present`] returns these wrapped in [`anyhow::Error`] so the event loop can
/// downcast and decide between skipping the frame and reconfiguring the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("timed out waiting for the next surface texture")]
    Timeout,
    #[error("the window is occluded")]
    Occluded,
    #[error("the surface configuration is outdated")]
    Outdated,
    #[error("the surface was lost")]
    Lost,
    #[error("acquiring the surface texture failed validation")]
    Validation,
}

/// CPU-side state shared by all passes of a frame.
#[derive(Debug)]
pub struct RenderContext {
    pub config: Config,
    pub camera: Camera,
    pub controller: CameraController,
    pub scene: Scene,
    pub clock: FrameClock,
}

impl RenderContext {
    pub fn new(config: Config, camera: Camera, scene: Scene) -> Self {
        Self {
            config,
            camera,
            controller: CameraController::new(10.0, 0.4),
            scene,
            clock: FrameClock::new(),
        }
    }

    /// Keep the projection and the offscreen targets in sync with the window.
    pub fn resize(&mut self, backend: &mut impl RenderBackend, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.camera.update_projection(self.config.aspect_ratio());
        backend.set_screen_viewport(width, height);
    }
}
