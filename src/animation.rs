//! Procedural prop motion.
//!
//! Fish sway up and down, and the school in the middle of the reef circles the stone it is
//! anchored to. Motion is a pure function of a prop's [`MotionBehavior`] and the frame
//! timestamp: nothing is stored between frames, and the base pose of a prop is never written.
//! Every draw composes `base ∘ displacement(t)` from scratch, so the same frame time yields the
//! same pose in all three passes.

use cgmath::{Deg, Quaternion, Rotation, Rotation3, Vector3};

use crate::{clock::FrameTime, data_structures::instance::Instance};

/// Milliseconds per degree of the bobbing cycle.
pub const BOB_MS_PER_DEGREE: u64 = 30;
/// Milliseconds per degree of the orbit.
pub const ORBIT_MS_PER_DEGREE: u64 = 90;
pub const ORBIT_RADIUS: f32 = 16.0;
/// Bobbing amplitude multiplier for orbiting props.
pub const ORBIT_BOB_SCALE: f32 = 3.0;

/// How a prop moves. Chosen per prop in the scene layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MotionBehavior {
    #[default]
    None,
    /// Vertical sine sway.
    Bobbing,
    /// Stronger sway plus a clockwise circle of [`ORBIT_RADIUS`] around `anchor`.
    ///
    /// `anchor` is an offset from the prop's base position.
    OrbitingBobbing { anchor: Vector3<f32> },
}

impl MotionBehavior {
    pub fn is_animated(&self) -> bool {
        !matches!(self, MotionBehavior::None)
    }
}

/// A transient translation and rotation applied on top of a base pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Displacement {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::from_angle_y(Deg(0.0)),
        }
    }

    /// Translate in world space, rotate in the prop's local frame.
    pub fn apply(&self, base: &Instance) -> Instance {
        Instance {
            position: base.position + self.translation,
            rotation: base.rotation * self.rotation,
            scale: base.scale,
        }
    }

    /// The algebraic inverse: `inverse().apply(apply(t))` returns `t`.
    pub fn inverse(&self) -> Self {
        Self {
            translation: -self.translation,
            rotation: self.rotation.invert(),
        }
    }
}

impl Default for Displacement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Vertical sway in `[-1, 1]`: one full period every 360 * 30 ms.
pub fn bob_height(time: FrameTime) -> f32 {
    let degrees = (time.millis() / BOB_MS_PER_DEGREE) % 360;
    (degrees as f32).to_radians().sin()
}

/// Orbit angle in whole degrees, `0..360`.
pub fn orbit_angle(time: FrameTime) -> Deg<f32> {
    Deg(((time.millis() / ORBIT_MS_PER_DEGREE) % 360) as f32)
}

/// Offset of a prop with `behavior` at `time`.
pub fn displacement_for(behavior: MotionBehavior, time: FrameTime) -> Displacement {
    match behavior {
        MotionBehavior::None => Displacement::identity(),
        MotionBehavior::Bobbing => Displacement {
            translation: Vector3::new(0.0, bob_height(time), 0.0),
            ..Displacement::identity()
        },
        MotionBehavior::OrbitingBobbing { anchor } => {
            let angle = orbit_angle(time);
            let radians = angle.0.to_radians();
            let translation = Vector3::new(
                anchor.x + ORBIT_RADIUS * radians.sin(),
                anchor.y + bob_height(time) * ORBIT_BOB_SCALE,
                anchor.z - ORBIT_RADIUS * radians.cos(),
            );
            // keep the nose on the tangent of the circle
            let rotation = Quaternion::from_angle_y(Deg(90.0) - angle);
            Displacement {
                translation,
                rotation,
            }
        }
    }
}

/// Pose to draw `base` with at `time`.
pub fn animated(base: &Instance, behavior: MotionBehavior, time: FrameTime) -> Instance {
    if !behavior.is_animated() {
        return *base;
    }
    displacement_for(behavior, time).apply(base)
}
