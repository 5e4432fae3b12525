use approx::assert_relative_eq;
use cgmath::Vector3;
use ocean_ngin::{
    animation::MotionBehavior,
    clip::ClipPlane,
    orchestrator::{FrameOrchestrator, FrameState},
    render::SurfaceError,
    scene::{Prop, RenderableGroup},
};

use crate::common::test_utils::{Call, RecordingBackend, at_millis, context_with};

mod common;

fn props() -> Vec<Prop> {
    vec![
        Prop::new("objects/stone4.obj", Vector3::new(-4.0, 5.0, -2.0), 1.0, 9),
        Prop::new("objects/TropicalFish02.obj", Vector3::new(0.0, 28.0, 0.0), 1.0, 1).with_motion(
            MotionBehavior::OrbitingBobbing {
                anchor: Vector3::new(0.0, 0.0, 0.0),
            },
        ),
    ]
}

fn render_one_frame(millis: u64) -> RecordingBackend {
    let mut ctx = context_with(props());
    let mut backend = RecordingBackend::new();
    FrameOrchestrator::new()
        .render_frame_at(&mut ctx, &mut backend, at_millis(millis))
        .expect("frame");
    backend
}

#[test]
fn should_render_three_passes_then_present() {
    let backend = render_one_frame(0);
    let passes = backend.passes();
    assert_eq!(passes.len(), 3);
    assert_eq!(passes[0][0..3], [Call::BindReflection, Call::Clear, Call::ClipTesting(true)]);
    assert_eq!(passes[1][0..2], [Call::BindRefraction, Call::Clear]);
    assert_eq!(passes[2][0..3], [Call::Unbind, Call::Clear, Call::ClipTesting(false)]);
    assert_eq!(backend.calls.last(), Some(&Call::Present));
    assert_eq!(
        backend.calls.iter().filter(|c| **c == Call::Present).count(),
        1
    );
}

#[test]
fn should_push_the_water_planes() {
    let backend = render_one_frame(0);
    let plane_of = |pass: usize| backend.pass_draws(pass)[0].0.uniforms.clip_plane;
    assert_eq!(plane_of(0), ClipPlane::new(0.0, 1.0, 0.0, -65.0));
    assert_eq!(plane_of(1), ClipPlane::new(0.0, -1.0, 0.0, 65.0));
    assert_eq!(plane_of(2), ClipPlane::neutral());
}

#[test]
fn should_draw_water_only_in_the_main_pass() {
    let backend = render_one_frame(0);
    let count = |pass: usize, group: RenderableGroup| {
        backend
            .pass_draws(pass)
            .iter()
            .filter(|(d, _)| d.group == group)
            .count()
    };
    assert_eq!(count(0, RenderableGroup::Water), 0);
    assert_eq!(count(1, RenderableGroup::Water), 0);
    assert_eq!(count(2, RenderableGroup::Water), 1);
    for pass in 0..3 {
        assert_eq!(count(pass, RenderableGroup::Skybox), 1);
        assert_eq!(count(pass, RenderableGroup::Seafloor), 1);
        assert_eq!(count(pass, RenderableGroup::Objects), 2);
    }
}

#[test]
fn should_clip_only_in_the_water_passes() {
    let backend = render_one_frame(0);
    for pass in 0..2 {
        for (draw, clipped) in backend.pass_draws(pass) {
            assert_eq!(clipped, draw.group != RenderableGroup::Skybox, "{:?}", draw.group);
        }
    }
    assert!(backend.pass_draws(2).iter().all(|(_, clipped)| !clipped));
}

#[test]
fn should_mirror_the_camera_for_the_reflection_pass_only() {
    let backend = render_one_frame(0);
    let eye_of = |pass: usize| backend.pass_draws(pass)[0].0.uniforms.camera_position;
    assert_relative_eq!(eye_of(0).y, 30.0);
    assert_relative_eq!(eye_of(1).y, 70.0);
    assert_relative_eq!(eye_of(2).y, 70.0);
}

#[test]
fn should_mirror_the_camera_about_the_scene_water_height() {
    let mut ctx = context_with(props());
    ctx.scene.water_height = 60.0;
    let mut backend = RecordingBackend::new();
    FrameOrchestrator::new()
        .render_frame_at(&mut ctx, &mut backend, at_millis(0))
        .expect("frame");

    let eye_of = |pass: usize| backend.pass_draws(pass)[0].0.uniforms.camera_position;
    assert_relative_eq!(eye_of(0).y, 50.0);
    assert_relative_eq!(eye_of(1).y, 70.0);
    assert!(!ctx.camera.is_reflected());
}

#[test]
fn should_leave_the_context_as_it_found_it() {
    let mut ctx = context_with(props());
    let camera = ctx.camera.clone();
    let bases: Vec<_> = ctx.scene.props.iter().map(|p| p.base).collect();
    let mut backend = RecordingBackend::new();
    let mut orchestrator = FrameOrchestrator::new();
    assert_eq!(orchestrator.state(), FrameState::Idle);

    for frame in 0..5 {
        orchestrator
            .render_frame_at(&mut ctx, &mut backend, at_millis(frame * 16))
            .expect("frame");
    }

    assert_eq!(ctx.camera, camera);
    assert!(!ctx.camera.is_reflected());
    assert!(ctx.scene.flags.is_enabled(RenderableGroup::Water));
    assert_eq!(ctx.scene.props.iter().map(|p| p.base).collect::<Vec<_>>(), bases);
    assert_eq!(orchestrator.state(), FrameState::Presented);
    assert_eq!(orchestrator.frames(), 5);
}

#[test]
fn should_pose_props_identically_in_every_pass() {
    let backend = render_one_frame(5_000);
    let fish_in = |pass: usize| {
        backend
            .pass_draws(pass)
            .into_iter()
            .find(|(d, _)| d.prop == Some(1))
            .map(|(d, _)| d.uniforms.model)
    };
    assert_eq!(fish_in(0), fish_in(1));
    assert_eq!(fish_in(1), fish_in(2));
}

#[test]
fn should_report_present_failures() {
    let mut ctx = context_with(props());
    let mut backend = RecordingBackend::new();
    backend.fail_present = Some(SurfaceError::Lost);

    let err = FrameOrchestrator::new()
        .render_frame_at(&mut ctx, &mut backend, at_millis(0))
        .expect_err("present failed");

    assert!(matches!(
        err.downcast_ref::<SurfaceError>(),
        Some(SurfaceError::Lost)
    ));
    assert!(!ctx.camera.is_reflected());
}

#[test]
fn should_forward_resizes_to_the_backend() {
    let mut ctx = context_with(vec![]);
    let mut backend = RecordingBackend::new();
    ctx.resize(&mut backend, 800, 400);
    ctx.resize(&mut backend, 0, 400);

    assert_eq!(backend.calls, vec![Call::Viewport(800, 400)]);
    assert_relative_eq!(ctx.camera.projection.aspect(), 2.0);
}
