//! Per-pass scene traversal.
//!
//! [`SceneCompositor::render_pass`] walks the enabled groups in draw order and issues one draw
//! per group (one per prop for the objects group), each with a full uniform set. It holds no
//! state of its own; everything comes from the [`RenderContext`] and the pass setup.

use cgmath::{Matrix3, Matrix4};

use crate::{
    clip::ClipPlane,
    clock::FrameTime,
    render::{DepthCompare, Draw, DrawUniforms, RenderBackend, RenderContext},
    scene::RenderableGroup,
};

/// Pass-level inputs decided by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassSetup {
    pub clip_plane: ClipPlane,
    /// Clip-testing state of the pass, restored after the skybox.
    pub clip_testing: bool,
    pub time: FrameTime,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SceneCompositor;

impl SceneCompositor {
    pub fn new() -> Self {
        Self
    }

    pub fn render_pass<B: RenderBackend>(
        &self,
        ctx: &RenderContext,
        backend: &mut B,
        setup: PassSetup,
    ) {
        let base = DrawUniforms {
            view: ctx.camera.view_matrix(),
            projection: ctx.camera.projection_matrix(),
            clip_plane: setup.clip_plane,
            camera_position: ctx.camera.eye(),
            time: setup.time.seconds(),
            ..Default::default()
        };
        let caustic_time = setup.time.caustic_phase(ctx.config.caustic_speed);

        for group in ctx.scene.flags.enabled_groups() {
            match group {
                RenderableGroup::Seafloor => backend.draw(Draw {
                    group,
                    prop: None,
                    uniforms: DrawUniforms {
                        model: ctx.scene.world_matrix(),
                        caustic_time,
                        ..base
                    },
                }),
                RenderableGroup::Objects => {
                    for (idx, prop) in ctx.scene.props.iter().enumerate() {
                        backend.draw(Draw {
                            group,
                            prop: Some(idx),
                            uniforms: DrawUniforms {
                                model: prop.model_matrix(setup.time),
                                caustic_time,
                                atlas_index: prop.atlas_index,
                                ..base
                            },
                        });
                    }
                }
                RenderableGroup::Water => backend.draw(Draw {
                    group,
                    prop: None,
                    uniforms: DrawUniforms {
                        model: ctx.scene.water_model_matrix(),
                        ..base
                    },
                }),
                RenderableGroup::Skybox => {
                    // The skybox sits at maximum depth and must never be cut by the water plane
                    backend.set_clip_testing(false);
                    backend.set_depth_compare(DepthCompare::LessEqual);
                    backend.draw(Draw {
                        group,
                        prop: None,
                        uniforms: DrawUniforms {
                            view: without_translation(base.view),
                            ..base
                        },
                    });
                    backend.set_depth_compare(DepthCompare::Less);
                    backend.set_clip_testing(setup.clip_testing);
                }
            }
        }
    }
}

/// Keep only the rotational part of a view matrix.
pub fn without_translation(view: Matrix4<f32>) -> Matrix4<f32> {
    let rotation = Matrix3::from_cols(view.x.truncate(), view.y.truncate(), view.z.truncate());
    Matrix4::from(rotation)
}
