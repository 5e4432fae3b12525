//! Scene and window configuration.
//!
//! [`Config`] bundles the constants the reef scene is built from. All fields are public so
//! callers can start from [`Config::default`] and override what they need before handing it
//! to [`crate::flow::run`].

use cgmath::Point3;

#[derive(Clone, Debug)]
pub struct Config {
    pub window_title: String,
    pub width: u32,
    pub height: u32,
    /// Height of the water surface in world units.
    pub water_height: f32,
    /// Vertical tolerance added to the water height for the reflection/refraction clip planes.
    /// The reference scene uses the seafloor amplitude here.
    pub clip_margin: f32,
    pub terrain_amplitude: f32,
    pub terrain_frequency: f32,
    /// Side length of one terrain tile in vertices.
    pub terrain_resolution: u32,
    pub seafloor_tiles: u32,
    pub water_tiles: u32,
    /// Multiplier applied to elapsed milliseconds for the caustic texture cycle.
    pub caustic_speed: f32,
    pub camera_start: Point3<f32>,
    pub clear_colour: wgpu::Color,
    /// Directory (relative to the working directory) holding `shaders/` and `objects/`.
    pub asset_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "ocean-ngin".to_string(),
            width: 1280,
            height: 720,
            water_height: 50.0,
            clip_margin: 15.0,
            terrain_amplitude: 15.0,
            terrain_frequency: 0.02,
            terrain_resolution: 256,
            seafloor_tiles: 10,
            water_tiles: 15,
            caustic_speed: 0.0106,
            camera_start: Point3::new(0.0, 70.0, 0.0),
            clear_colour: wgpu::Color::BLACK,
            asset_dir: "assets".to_string(),
        }
    }
}

impl Config {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Center of the terrain square; the world matrix moves it to the origin.
    pub fn terrain_center(&self) -> cgmath::Vector3<f32> {
        let half = self.terrain_resolution as f32 / 2.0;
        cgmath::Vector3::new(half, 0.0, half)
    }
}
