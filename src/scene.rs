//! Scene content: renderable groups, props and the reef layout.
//!
//! The scene is split into four [`RenderableGroup`]s that are always drawn in the same order.
//! Each group can be switched on or off through [`GroupFlags`]; the frame orchestrator flips the
//! water and skybox flags between passes.

use cgmath::{Matrix4, Vector3};

use crate::{
    animation::{self, MotionBehavior},
    clock::FrameTime,
    config::Config,
    data_structures::instance::Instance,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderableGroup {
    Seafloor,
    Objects,
    Water,
    Skybox,
}

impl RenderableGroup {
    /// Draw order within a pass.
    pub const DRAW_ORDER: [RenderableGroup; 4] = [
        RenderableGroup::Seafloor,
        RenderableGroup::Objects,
        RenderableGroup::Water,
        RenderableGroup::Skybox,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RenderableGroup::Seafloor => "seafloor",
            RenderableGroup::Objects => "objects",
            RenderableGroup::Water => "water",
            RenderableGroup::Skybox => "skybox",
        }
    }

    /// Groups lit by the caustic pattern get the caustic phase as their time uniform.
    pub fn has_caustics(&self) -> bool {
        matches!(self, RenderableGroup::Seafloor | RenderableGroup::Objects)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupFlags {
    pub seafloor: bool,
    pub objects: bool,
    pub water: bool,
    pub skybox: bool,
}

impl GroupFlags {
    pub fn all() -> Self {
        Self {
            seafloor: true,
            objects: true,
            water: true,
            skybox: true,
        }
    }

    pub fn is_enabled(&self, group: RenderableGroup) -> bool {
        match group {
            RenderableGroup::Seafloor => self.seafloor,
            RenderableGroup::Objects => self.objects,
            RenderableGroup::Water => self.water,
            RenderableGroup::Skybox => self.skybox,
        }
    }

    pub fn set(&mut self, group: RenderableGroup, enabled: bool) {
        let flag = match group {
            RenderableGroup::Seafloor => &mut self.seafloor,
            RenderableGroup::Objects => &mut self.objects,
            RenderableGroup::Water => &mut self.water,
            RenderableGroup::Skybox => &mut self.skybox,
        };
        *flag = enabled;
    }

    pub fn enabled_groups(&self) -> impl Iterator<Item = RenderableGroup> + '_ {
        RenderableGroup::DRAW_ORDER
            .into_iter()
            .filter(|group| self.is_enabled(*group))
    }
}

impl Default for GroupFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// A placed model in the objects group.
#[derive(Clone, Debug, PartialEq)]
pub struct Prop {
    pub name: String,
    /// Model file relative to the asset directory.
    pub model: String,
    pub base: Instance,
    /// Cell of the shared texture atlas.
    pub atlas_index: u32,
    pub motion: MotionBehavior,
}

impl Prop {
    pub fn new(model: &str, position: Vector3<f32>, scale: f32, atlas_index: u32) -> Self {
        let name = model
            .rsplit('/')
            .next()
            .and_then(|file| file.split('.').next())
            .unwrap_or(model)
            .to_string();
        Self {
            name,
            model: model.to_string(),
            base: Instance::placed(position, scale),
            atlas_index,
            motion: MotionBehavior::None,
        }
    }

    pub fn with_motion(mut self, motion: MotionBehavior) -> Self {
        self.motion = motion;
        self
    }

    /// Model matrix for a draw at `time`. The base pose stays untouched.
    pub fn model_matrix(&self, time: FrameTime) -> Matrix4<f32> {
        animation::animated(&self.base, self.motion, time).to_matrix()
    }
}

/// Seafloor height lookup used to rest props on the ground.
pub trait HeightField {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Rolling dunes: a sum of two sine/cosine waves, in world coordinates centred on the origin.
#[derive(Clone, Copy, Debug)]
pub struct WavySeafloor {
    pub amplitude: f32,
    pub frequency: f32,
}

impl WavySeafloor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            amplitude: config.terrain_amplitude,
            frequency: config.terrain_frequency,
        }
    }
}

impl HeightField for WavySeafloor {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let f = self.frequency;
        let primary = (x * f).sin() * (z * f).cos();
        let detail = 0.25 * (x * f * 3.1 + 1.7).sin() * (z * f * 2.3).sin();
        self.amplitude * (0.5 + 0.5 * (primary + detail) / 1.25)
    }
}

#[derive(Debug)]
pub struct Scene {
    pub props: Vec<Prop>,
    pub flags: GroupFlags,
    pub water_height: f32,
    terrain_center: Vector3<f32>,
}

impl Scene {
    pub fn new(config: &Config, props: Vec<Prop>) -> Self {
        Self {
            props,
            flags: GroupFlags::all(),
            water_height: config.water_height,
            terrain_center: config.terrain_center(),
        }
    }

    /// Moves the terrain center to the origin.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(-self.terrain_center)
    }

    pub fn water_model_matrix(&self) -> Matrix4<f32> {
        self.world_matrix() * Matrix4::from_translation(Vector3::new(0.0, self.water_height, 0.0))
    }
}

/// The reference reef: a school circling the central stone and four decorated corners.
pub fn reef_layout(ground: &dyn HeightField) -> Vec<Prop> {
    let floor = |x: f32, z: f32, lift: f32| Vector3::new(x, ground.height_at(x, z) + lift, z);
    let at = |x: f32, y: f32, z: f32| Vector3::new(x, y, z);
    let circling = MotionBehavior::OrbitingBobbing {
        anchor: Vector3::new(0.0, 0.0, 0.0),
    };
    let bobbing = MotionBehavior::Bobbing;

    let mut props = vec![
        // Center
        Prop::new("objects/TropicalFish02.obj", at(0.0, 28.0, 0.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(-2.0, 25.0, 0.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(2.0, 25.0, 1.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(4.0, 23.0, -1.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(-3.0, 22.0, 3.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(0.0, 21.0, -1.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(-1.0, 19.0, 2.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(-4.0, 18.0, 3.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(3.0, 17.0, -2.0), 1.0, 1),
        Prop::new("objects/TropicalFish02.obj", at(-1.0, 17.0, 0.0), 1.0, 1),
    ]
    .into_iter()
    .map(|prop| prop.with_motion(circling))
    .collect::<Vec<_>>();

    props.extend([
        Prop::new("objects/Grass_01.obj", floor(-1.0, 2.0, 0.0), 1.5, 15),
        Prop::new("objects/stone4.obj", floor(-4.0, -2.0, 3.0), 1.0, 9),
        Prop::new("objects/stone5.obj", floor(6.0, 1.0, -2.0), 1.0, 10),
        // lower left
        Prop::new("objects/TropicalFish01.obj", at(-50.0, 20.0, 64.0), 1.0, 0).with_motion(bobbing),
        Prop::new("objects/TropicalFish01.obj", at(-55.0, 21.0, 66.0), 1.0, 0).with_motion(bobbing),
        Prop::new("objects/TropicalFish01.obj", at(-53.0, 23.0, 65.0), 1.0, 0).with_motion(bobbing),
        Prop::new("objects/TropicalFish01.obj", floor(-93.0, 23.0, 2.0), 0.7, 0).with_motion(bobbing),
        Prop::new("objects/CoralRock002.obj", floor(-48.0, 64.0, 2.0), 2.0, 6),
        Prop::new("objects/CoralRock003.obj", floor(-52.0, 68.0, 2.0), 2.0, 6),
        Prop::new("objects/CoralRock001.obj", floor(-48.0, 60.0, 2.0), 2.0, 7),
        Prop::new("objects/CoralRock004.obj", floor(-51.0, 64.0, 2.0), 2.0, 7),
        Prop::new("objects/Starfish.obj", floor(-50.0, 66.0, 0.0), 3.0, 11),
        Prop::new("objects/Grass_01.obj", floor(-82.0, 75.0, 0.0), 2.0, 15),
        Prop::new("objects/grass_high.obj", floor(-58.0, 70.0, 0.0), 1.0, 13),
        Prop::new("objects/grass_high.obj", floor(-100.0, 28.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-97.0, 22.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-99.0, 24.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-96.0, 24.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-92.0, 23.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-89.0, 26.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-91.0, 24.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-88.0, 24.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-85.0, 23.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-82.0, 22.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-84.0, 27.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-81.0, 24.0, 0.0), 0.4, 13),
        Prop::new("objects/grass_high.obj", floor(-27.0, 110.0, 0.0), 0.5, 13),
        // upper left
        Prop::new("objects/TropicalFish05.obj", at(-62.0, 20.0, -77.0), 1.0, 4).with_motion(bobbing),
        Prop::new("objects/TropicalFish05.obj", at(-84.0, 16.0, -82.0), 1.0, 4).with_motion(bobbing),
        Prop::new("objects/TropicalFish05.obj", at(-91.0, 21.0, -56.0), 1.0, 4).with_motion(bobbing),
        Prop::new("objects/TropicalFish05.obj", at(-53.0, 12.0, -63.0), 1.0, 4).with_motion(bobbing),
        Prop::new("objects/stone1.obj", floor(-25.0, -90.0, 0.0), 1.0, 8),
        Prop::new("objects/stone4.obj", floor(-11.0, -96.0, 0.0), 1.0, 9),
        Prop::new("objects/stone5.obj", floor(-20.0, -85.0, 0.0), 1.0, 10),
        Prop::new("objects/stone1.obj", floor(-12.0, -83.0, 0.0), 1.0, 8),
        Prop::new("objects/Grass_01.obj", floor(-20.0, -30.0, 0.0), 1.0, 15),
        Prop::new("objects/grass_high.obj", floor(-2.0, -98.0, 0.0), 0.6, 13),
        Prop::new("objects/Grass_01.obj", floor(-20.0, -82.0, 0.0), 1.0, 15),
        Prop::new("objects/grass_high.obj", floor(-89.0, -96.0, 0.0), 1.0, 13),
        // upper right
        Prop::new("objects/Clownfish002.obj", at(83.0, 16.0, -58.0), 1.0, 2).with_motion(bobbing),
        Prop::new("objects/Clownfish001.obj", at(85.0, 16.0, -56.0), 1.0, 3).with_motion(bobbing),
        Prop::new("objects/TropicalFish12.obj", at(82.0, 16.0, -60.0), 1.0, 5).with_motion(bobbing),
        Prop::new("objects/TropicalFish12.obj", at(85.0, 16.0, -64.0), 1.0, 5).with_motion(bobbing),
        Prop::new("objects/Starfish.obj", floor(84.0, -57.0, -1.0), 3.0, 11),
        Prop::new("objects/CoralRock002.obj", floor(86.0, -59.0, 3.0), 3.0, 6),
        Prop::new("objects/CoralRock003.obj", floor(82.0, -59.0, 3.0), 3.0, 6),
        Prop::new("objects/CoralRock001.obj", floor(77.0, -62.0, 1.0), 3.0, 7),
        Prop::new("objects/CoralRock004.obj", floor(75.0, -62.0, 1.0), 3.0, 7),
        Prop::new("objects/grass_high.obj", floor(65.0, 0.0, 0.0), 1.0, 13),
        // lower right
        Prop::new("objects/stone1.obj", floor(84.0, 113.0, 0.0), 1.0, 8),
        Prop::new("objects/stone4.obj", floor(77.0, 112.0, 0.0), 1.0, 9),
        Prop::new("objects/stone5.obj", floor(30.0, 100.0, 0.0), 1.0, 10),
        Prop::new("objects/Starfish.obj", floor(80.0, 90.0, 0.0), 2.0, 11),
        Prop::new("objects/oldboat.obj", floor(80.0, 90.0, 0.0), 1.0, 12),
        Prop::new("objects/Grass_01.obj", floor(71.0, 100.0, 0.0), 1.4, 15),
        Prop::new("objects/grass_high.obj", floor(88.0, 102.0, 0.0), 0.7, 13),
    ]);
    props
}
