//! Camera, projection and navigation.
//!
//! - [`Camera`] is a yaw/pitch fly camera that can be mirrored about the water plane
//! - [`Projection`] holds the perspective parameters and is resized with the window
//! - [`CameraController`] turns mouse and keyboard input into persistent navigation that is
//!   applied once per frame
//!
//! Mirroring is what makes the reflection pass work: the reflected camera sits as far below the
//! surface as the real one sits above it and looks up at the same angle it would look down.
//! [`Camera::reflect`] only records the plane height it mirrors about (taken from the scene each
//! time); the mirrored eye and pitch are derived on demand, so reflecting twice gives back the
//! exact camera that went in.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(aspect: f32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub projection: Projection,
    /// Height of the mirror plane while reflected.
    mirror: Option<f32>,
}

impl Camera {
    pub fn new<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: Point3<f32>,
        yaw: Y,
        pitch: P,
        projection: Projection,
    ) -> Self {
        Self {
            position,
            yaw: yaw.into(),
            pitch: pitch.into(),
            projection,
            mirror: None,
        }
    }

    /// Start camera for the reef: above the water, looking down the -z axis and slightly down.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let projection = Projection::new(config.aspect_ratio(), cgmath::Deg(45.0), 0.1, 5000.0);
        Self::new(
            config.camera_start,
            cgmath::Deg(-90.0),
            cgmath::Deg(-20.0),
            projection,
        )
    }

    /// Toggle between the real camera and its mirror image below the plane `y = water_height`.
    ///
    /// The height is only read when entering the mirrored state; the second call restores the
    /// real camera whatever height it is given.
    pub fn reflect(&mut self, water_height: f32) {
        self.mirror = match self.mirror {
            Some(_) => None,
            None => Some(water_height),
        };
    }

    pub fn is_reflected(&self) -> bool {
        self.mirror.is_some()
    }

    /// Height of the plane the camera is currently mirrored about.
    pub fn mirror_height(&self) -> Option<f32> {
        self.mirror
    }

    /// Position the scene is viewed from, mirrored while reflected.
    pub fn eye(&self) -> Point3<f32> {
        match self.mirror {
            Some(h) => Point3::new(self.position.x, 2.0 * h - self.position.y, self.position.z),
            None => self.position,
        }
    }

    pub fn view_pitch(&self) -> Rad<f32> {
        if self.is_reflected() { -self.pitch } else { self.pitch }
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.view_pitch().0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.eye(), self.forward(), Vector3::unit_y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.matrix()
    }

    pub fn update_projection(&mut self, aspect: f32) {
        self.projection.set_aspect(aspect);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    None,
    Pan,
    Dolly,
}

/// Persistent navigation state fed by window events.
///
/// Left-drag pans the view, right-drag up/down sets a cruising speed that keeps moving the
/// camera until [`CameraController::stop`] (bound to space). W/A/S/D move while held.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    cruise: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    speed: f32,
    sensitivity: f32,
    drag: Drag,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl CameraController {
    /// Cruise speed change per pixel of right-drag.
    const DOLLY_FACTOR: f32 = 0.01;

    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            cruise: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            speed,
            sensitivity,
            drag: Drag::None,
            last_cursor: None,
        }
    }

    /// Returns whether the event was used for navigation.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => self.handle_key(*key, *state),
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) => Drag::Pan,
                    (MouseButton::Right, ElementState::Pressed) => Drag::Dolly,
                    (_, ElementState::Released) => Drag::None,
                    _ => self.drag,
                };
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let last = self.last_cursor.replace(*position);
                match (self.drag, last) {
                    (Drag::None, _) | (_, None) => false,
                    (drag, Some(last)) => {
                        self.handle_drag(drag, position.x - last.x, position.y - last.y);
                        true
                    }
                }
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
            KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.amount_left = amount,
            KeyCode::KeyD | KeyCode::ArrowRight => self.amount_right = amount,
            KeyCode::Space if state == ElementState::Pressed => self.stop(),
            _ => return false,
        }
        true
    }

    fn handle_drag(&mut self, drag: Drag, dx: f64, dy: f64) {
        match drag {
            Drag::Pan => {
                self.rotate_horizontal += dx as f32;
                self.rotate_vertical += dy as f32;
            }
            Drag::Dolly => self.cruise -= dy as f32 * Self::DOLLY_FACTOR,
            Drag::None => (),
        }
    }

    /// Halt all movement, including cruising.
    pub fn stop(&mut self) {
        self.amount_left = 0.0;
        self.amount_right = 0.0;
        self.amount_forward = 0.0;
        self.amount_backward = 0.0;
        self.cruise = 0.0;
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }

    pub fn cruise(&self) -> f32 {
        self.cruise
    }

    /// Apply accumulated navigation. Must run on the unreflected camera.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        let moving = self.amount_forward - self.amount_backward + self.cruise;
        camera.position += forward * moving * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;

        // Drag deltas are consumed in full, they are not rates
        camera.yaw += Rad(self.rotate_horizontal) * self.sensitivity * 0.01;
        camera.pitch += Rad(-self.rotate_vertical) * self.sensitivity * 0.01;
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        if camera.pitch < -Rad(SAFE_FRAC_PI_2) {
            camera.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if camera.pitch > Rad(SAFE_FRAC_PI_2) {
            camera.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}
