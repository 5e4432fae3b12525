use std::time::Duration;

use approx::assert_relative_eq;
use cgmath::{Deg, Point3, Rad};
use ocean_ngin::{
    camera::{Camera, CameraController, Projection},
    config::Config,
};

const WATER: f32 = 50.0;

fn camera() -> Camera {
    Camera::new(
        Point3::new(3.0, 70.0, -8.0),
        Deg(-90.0),
        Deg(-20.0),
        Projection::new(16.0 / 9.0, Deg(45.0), 0.1, 5000.0),
    )
}

#[test]
fn should_restore_the_exact_camera_after_two_reflections() {
    let original = camera();
    let mut mirrored = original.clone();
    mirrored.reflect(WATER);
    assert!(mirrored.is_reflected());
    mirrored.reflect(WATER);
    assert_eq!(mirrored, original);
    assert_eq!(mirrored.view_matrix(), original.view_matrix());
}

#[test]
fn should_mirror_the_eye_about_the_water_plane() {
    let mut camera = camera();
    camera.reflect(WATER);
    let eye = camera.eye();
    assert_relative_eq!(eye.x, 3.0);
    assert_relative_eq!(eye.y, 30.0);
    assert_relative_eq!(eye.z, -8.0);
    // the stored position is never touched
    assert_relative_eq!(camera.position.y, 70.0);
}

#[test]
fn should_restore_the_real_camera_whatever_height_comes_second() {
    let original = camera();
    let mut camera = original.clone();
    camera.reflect(WATER);
    assert_eq!(camera.mirror_height(), Some(WATER));
    camera.reflect(80.0);
    assert_eq!(camera, original);
}

#[test]
fn should_mirror_about_the_height_it_is_given() {
    let mut camera = camera();
    camera.reflect(60.0);
    assert_relative_eq!(camera.eye().y, 50.0);
}

#[test]
fn should_look_up_while_reflected() {
    let mut camera = camera();
    let down = camera.forward();
    camera.reflect(WATER);
    let up = camera.forward();

    assert_eq!(camera.view_pitch(), -camera.pitch);
    assert_relative_eq!(up.x, down.x, epsilon = 1e-6);
    assert_relative_eq!(up.y, -down.y, epsilon = 1e-6);
    assert_relative_eq!(up.z, down.z, epsilon = 1e-6);
    assert!(up.y > 0.0);
}

#[test]
fn should_start_from_the_configured_position() {
    let config = Config::default();
    let camera = Camera::from_config(&config);
    assert_eq!(camera.position, config.camera_start);
    assert_eq!(camera.mirror_height(), None);
    assert!(!camera.is_reflected());
}

#[test]
fn should_follow_the_window_aspect() {
    let mut camera = camera();
    camera.update_projection(2.0);
    assert_relative_eq!(camera.projection.aspect(), 2.0);
}

#[test]
fn should_not_move_without_input() {
    let mut camera = camera();
    let before = camera.clone();
    let mut controller = CameraController::new(10.0, 0.4);
    controller.update(&mut camera, Duration::from_millis(16));
    assert_eq!(camera, before);
}

#[test]
fn should_stop_cruising() {
    let mut controller = CameraController::new(10.0, 0.4);
    controller.stop();
    assert_relative_eq!(controller.cruise(), 0.0);
}

#[test]
fn should_clamp_pitch_below_vertical() {
    let mut camera = camera();
    camera.pitch = Rad(10.0);
    let mut controller = CameraController::new(10.0, 0.4);
    controller.update(&mut camera, Duration::ZERO);
    assert!(camera.pitch.0 < std::f32::consts::FRAC_PI_2);
}
