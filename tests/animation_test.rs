use approx::assert_relative_eq;
use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use ocean_ngin::{
    animation::{self, Displacement, MotionBehavior},
    clock::FrameTime,
    data_structures::instance::Instance,
    scene::Prop,
};

fn orbiting() -> MotionBehavior {
    MotionBehavior::OrbitingBobbing {
        anchor: Vector3::new(0.0, 0.0, 0.0),
    }
}

#[test]
fn should_leave_static_props_alone() {
    let base = Instance::placed(Vector3::new(4.0, 2.0, -1.0), 2.0);
    let time = FrameTime::from_millis(123_456);
    assert_eq!(animation::animated(&base, MotionBehavior::None, time), base);
    assert!(!MotionBehavior::None.is_animated());
}

#[test]
fn should_bob_one_unit_at_a_quarter_period() {
    // 90 degrees at 30 ms per degree
    assert_relative_eq!(animation::bob_height(FrameTime::from_millis(2_700)), 1.0);
    assert_relative_eq!(animation::bob_height(FrameTime::from_millis(0)), 0.0);

    let base = Instance::placed(Vector3::new(1.0, 20.0, 1.0), 1.0);
    let moved = animation::animated(&base, MotionBehavior::Bobbing, FrameTime::from_millis(2_700));
    assert_relative_eq!(moved.position.y, 21.0);
    assert_relative_eq!(moved.position.x, 1.0);
    assert_eq!(moved.rotation, base.rotation);
}

#[test]
fn should_repeat_the_bob_cycle() {
    for millis in [0, 1_000, 5_555, 9_990] {
        assert_relative_eq!(
            animation::bob_height(FrameTime::from_millis(millis)),
            animation::bob_height(FrameTime::from_millis(millis + 360 * 30)),
        );
    }
}

#[test]
fn should_start_the_orbit_behind_the_anchor() {
    let d = animation::displacement_for(orbiting(), FrameTime::from_millis(0));
    assert_relative_eq!(d.translation.x, 0.0);
    assert_relative_eq!(d.translation.y, 0.0);
    assert_relative_eq!(d.translation.z, -16.0);
    assert_eq!(d.rotation, Quaternion::from_angle_y(Deg(90.0)));
}

#[test]
fn should_circle_a_quarter_turn() {
    // 90 degrees of orbit; the bob is at 270 degrees by then
    let d = animation::displacement_for(orbiting(), FrameTime::from_millis(8_100));
    assert_relative_eq!(animation::orbit_angle(FrameTime::from_millis(8_100)).0, 90.0);
    assert_relative_eq!(d.translation.x, 16.0, epsilon = 1e-4);
    assert_relative_eq!(d.translation.y, -3.0, epsilon = 1e-4);
    assert_relative_eq!(d.translation.z, 0.0, epsilon = 1e-4);
}

#[test]
fn should_orbit_around_an_offset_anchor() {
    let behavior = MotionBehavior::OrbitingBobbing {
        anchor: Vector3::new(5.0, 1.0, 5.0),
    };
    let d = animation::displacement_for(behavior, FrameTime::from_millis(0));
    assert_relative_eq!(d.translation.x, 5.0);
    assert_relative_eq!(d.translation.y, 1.0);
    assert_relative_eq!(d.translation.z, -11.0);
}

#[test]
fn should_undo_a_displacement_with_its_inverse() {
    let base = Instance::placed(Vector3::new(-3.0, 25.0, 7.0), 1.5);
    let d = animation::displacement_for(orbiting(), FrameTime::from_millis(4_321));
    let back = d.inverse().apply(&d.apply(&base));

    assert_relative_eq!(back.position.x, base.position.x, epsilon = 1e-4);
    assert_relative_eq!(back.position.y, base.position.y, epsilon = 1e-4);
    assert_relative_eq!(back.position.z, base.position.z, epsilon = 1e-4);
    assert_relative_eq!(back.rotation.s, base.rotation.s, epsilon = 1e-5);
    assert_relative_eq!(back.rotation.v.y, base.rotation.v.y, epsilon = 1e-5);
    assert_eq!(back.scale, base.scale);
}

#[test]
fn should_not_drift_over_many_frames() {
    let prop = Prop::new("objects/TropicalFish02.obj", Vector3::new(0.0, 28.0, 0.0), 1.0, 1)
        .with_motion(orbiting());
    let base = prop.base;
    let time = FrameTime::from_millis(7_000);
    let first = prop.model_matrix(time);

    for frame in 0..10_000u64 {
        prop.model_matrix(FrameTime::from_millis(frame * 16));
    }

    assert_eq!(prop.model_matrix(time), first);
    assert_eq!(prop.base, base);
}

#[test]
fn should_use_identity_by_default() {
    let base = Instance::placed(Vector3::new(1.0, 2.0, 3.0), 1.0);
    assert_eq!(Displacement::default().apply(&base), base);
}

#[test]
fn should_stay_on_the_orbit_circle() {
    let time = FrameTime::from_millis(4_000);
    assert_relative_eq!(animation::orbit_angle(time).0, 44.0);

    let d = animation::displacement_for(orbiting(), time);
    let radius = (d.translation.x.powi(2) + d.translation.z.powi(2)).sqrt();
    assert_relative_eq!(radius, 16.0, epsilon = 1e-4);
    assert_relative_eq!(d.translation.x, 16.0 * 44f32.to_radians().sin(), epsilon = 1e-5);
    assert_eq!(
        animation::displacement_for(orbiting(), time),
        animation::displacement_for(orbiting(), time)
    );
}
