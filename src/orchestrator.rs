//! Per-frame pass sequencing.
//!
//! Every frame runs the same state machine:
//!
//! 1. sample the clock once and apply camera navigation
//! 2. reflection pass: reflection target, clip testing on, camera mirrored, water off
//! 3. refraction pass: refraction target, camera restored, water still off
//! 4. main pass: screen, clip testing off, neutral clip plane, water and skybox on
//! 5. present
//!
//! The water surface samples the reflection and refraction targets, so it only appears in the
//! main pass. The camera is mirrored exactly once and restored exactly once per frame.

use log::trace;

use crate::{
    clip::{ClipPlane, Pass},
    clock::FrameSample,
    compositor::{PassSetup, SceneCompositor},
    render::{RenderBackend, RenderContext},
    scene::RenderableGroup,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameState {
    /// Between frames.
    #[default]
    Idle,
    ReflectionPass,
    RefractionPass,
    MainPass,
    Presented,
}

#[derive(Debug, Default)]
pub struct FrameOrchestrator {
    state: FrameState,
    compositor: SceneCompositor,
    frames: u64,
}

impl FrameOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render and present one frame using the context's clock.
    pub fn render_frame<B: RenderBackend>(
        &mut self,
        ctx: &mut RenderContext,
        backend: &mut B,
    ) -> anyhow::Result<()> {
        let sample = ctx.clock.sample();
        self.render_frame_at(ctx, backend, sample)
    }

    /// Render and present one frame for an explicit clock sample (replay and tests).
    pub fn render_frame_at<B: RenderBackend>(
        &mut self,
        ctx: &mut RenderContext,
        backend: &mut B,
        sample: FrameSample,
    ) -> anyhow::Result<()> {
        ctx.controller.update(&mut ctx.camera, sample.dt);

        let water_height = ctx.scene.water_height;
        let margin = ctx.config.clip_margin;

        self.enter(FrameState::ReflectionPass);
        backend.bind_reflection_target();
        backend.clear();
        backend.set_clip_testing(true);
        ctx.camera.reflect(water_height);
        ctx.scene.flags.set(RenderableGroup::Water, false);
        ctx.scene.flags.set(RenderableGroup::Skybox, true);
        self.compositor.render_pass(
            ctx,
            backend,
            PassSetup {
                clip_plane: ClipPlane::for_pass(Pass::Reflection, water_height, margin),
                clip_testing: true,
                time: sample.time,
            },
        );

        self.enter(FrameState::RefractionPass);
        backend.bind_refraction_target();
        backend.clear();
        ctx.camera.reflect(water_height);
        self.compositor.render_pass(
            ctx,
            backend,
            PassSetup {
                clip_plane: ClipPlane::for_pass(Pass::Refraction, water_height, margin),
                clip_testing: true,
                time: sample.time,
            },
        );

        self.enter(FrameState::MainPass);
        backend.unbind_current_target();
        backend.clear();
        backend.set_clip_testing(false);
        ctx.scene.flags.set(RenderableGroup::Water, true);
        ctx.scene.flags.set(RenderableGroup::Skybox, true);
        self.compositor.render_pass(
            ctx,
            backend,
            PassSetup {
                clip_plane: ClipPlane::for_pass(Pass::Main, water_height, margin),
                clip_testing: false,
                time: sample.time,
            },
        );

        let presented = backend.present();
        self.enter(FrameState::Presented);
        self.frames += 1;
        presented
    }

    fn enter(&mut self, state: FrameState) {
        trace!("frame {}: {:?} -> {:?}", self.frames, self.state, state);
        self.state = state;
    }
}
