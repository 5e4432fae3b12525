//! Clip planes for the water passes.
//!
//! The water surface splits the scene in two. The reflection pass renders only what lies at or
//! above the surface, the refraction pass only what lies at or below it, and the main pass
//! renders everything. A point `p` survives a plane `(n, d)` when `n·p + d >= 0`, so the
//! boundary itself is kept by both water planes and no sliver of geometry goes missing.

use cgmath::{Point3, Vector4};

/// Distance of the plane pushed during the main pass. Far outside any scene bounds.
pub const NEUTRAL_PLANE_DISTANCE: f32 = 10_000.0;

/// The three passes rendered every frame, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    Reflection,
    Refraction,
    Main,
}

impl Pass {
    pub const ALL: [Pass; 3] = [Pass::Reflection, Pass::Refraction, Pass::Main];
}

/// A plane equation `(normal.x, normal.y, normal.z, distance)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlane(pub Vector4<f32>);

impl ClipPlane {
    pub fn new(x: f32, y: f32, z: f32, distance: f32) -> Self {
        Self(Vector4::new(x, y, z, distance))
    }

    /// Plane for `pass` given the water height and the vertical margin on top of it.
    ///
    /// The main pass gets a plane that discards nothing. It still has to be pushed: the
    /// plane is shared shader state and turning clip testing off is not reliable on every
    /// platform.
    pub fn for_pass(pass: Pass, water_height: f32, margin: f32) -> Self {
        let level = water_height + margin;
        match pass {
            Pass::Reflection => Self::new(0.0, 1.0, 0.0, -level),
            Pass::Refraction => Self::new(0.0, -1.0, 0.0, level),
            Pass::Main => Self::neutral(),
        }
    }

    pub fn neutral() -> Self {
        Self::new(0.0, -1.0, 0.0, NEUTRAL_PLANE_DISTANCE)
    }

    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        let p = self.0;
        p.x * point.x + p.y * point.y + p.z * point.z + p.w
    }

    /// Whether a point survives this plane.
    pub fn keeps(&self, point: Point3<f32>) -> bool {
        self.signed_distance(point) >= 0.0
    }

    pub fn to_raw(&self) -> [f32; 4] {
        self.0.into()
    }
}
