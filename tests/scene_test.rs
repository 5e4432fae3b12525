use approx::assert_relative_eq;
use cgmath::{Vector3, Vector4};
use ocean_ngin::{
    animation::MotionBehavior,
    config::Config,
    scene::{self, GroupFlags, HeightField, Prop, RenderableGroup, Scene, WavySeafloor},
};

#[test]
fn should_enable_every_group_by_default() {
    let flags = GroupFlags::default();
    assert_eq!(
        flags.enabled_groups().collect::<Vec<_>>(),
        RenderableGroup::DRAW_ORDER.to_vec()
    );
}

#[test]
fn should_toggle_single_groups() {
    let mut flags = GroupFlags::all();
    flags.set(RenderableGroup::Water, false);
    assert!(!flags.is_enabled(RenderableGroup::Water));
    assert!(flags.is_enabled(RenderableGroup::Skybox));
    assert_eq!(
        flags.enabled_groups().collect::<Vec<_>>(),
        vec![
            RenderableGroup::Seafloor,
            RenderableGroup::Objects,
            RenderableGroup::Skybox
        ]
    );
}

#[test]
fn should_name_props_after_their_model() {
    let prop = Prop::new("objects/TropicalFish02.obj", Vector3::new(0.0, 0.0, 0.0), 1.0, 1);
    assert_eq!(prop.name, "TropicalFish02");
    assert_eq!(prop.motion, MotionBehavior::None);
}

#[test]
fn should_keep_the_seafloor_within_its_amplitude() {
    let ground = WavySeafloor::from_config(&Config::default());
    for x in (-128..=128).step_by(16) {
        for z in (-128..=128).step_by(16) {
            let h = ground.height_at(x as f32, z as f32);
            assert!((0.0..=ground.amplitude).contains(&h), "h({}, {}) = {}", x, z, h);
        }
    }
}

#[test]
fn should_lay_out_the_reef() {
    let ground = WavySeafloor::from_config(&Config::default());
    let props = scene::reef_layout(&ground);
    assert_eq!(props.len(), 66);
    assert_eq!(props.iter().filter(|p| p.name == "grass_high").count(), 18);

    let orbiting: Vec<_> = props
        .iter()
        .filter(|p| matches!(p.motion, MotionBehavior::OrbitingBobbing { .. }))
        .collect();
    assert_eq!(orbiting.len(), 10);
    assert!(orbiting.iter().all(|p| p.name == "TropicalFish02"));

    let boat = props.iter().find(|p| p.name == "oldboat").expect("boat");
    assert_eq!(boat.motion, MotionBehavior::None);
    assert_relative_eq!(boat.base.position.y, ground.height_at(80.0, 90.0));

    // nothing that stands on the ground moves
    assert!(
        props
            .iter()
            .filter(|p| p.name.starts_with("stone") || p.name.starts_with("CoralRock"))
            .all(|p| !p.motion.is_animated())
    );
}

#[test]
fn should_plant_the_lower_left_meadow_on_the_ground() {
    let ground = WavySeafloor::from_config(&Config::default());
    let props = scene::reef_layout(&ground);

    let meadow: Vec<_> = props
        .iter()
        .filter(|p| p.name == "grass_high")
        .filter(|p| p.base.position.x <= -81.0 && (0.0..30.0).contains(&p.base.position.z))
        .collect();
    assert_eq!(meadow.len(), 12);
    for p in meadow {
        assert_relative_eq!(p.base.scale.x, 0.4);
        assert_eq!(p.atlas_index, 13);
        assert_relative_eq!(
            p.base.position.y,
            ground.height_at(p.base.position.x, p.base.position.z)
        );
    }
}

#[test]
fn should_center_the_terrain_on_the_origin() {
    let config = Config::default();
    let scene = Scene::new(&config, vec![]);
    let center = config.terrain_center();
    let moved = scene.world_matrix() * Vector4::new(center.x, center.y, center.z, 1.0);
    assert_eq!(moved, Vector4::new(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn should_raise_the_water_to_its_height() {
    let config = Config::default();
    let scene = Scene::new(&config, vec![]);
    let center = config.terrain_center();
    let surface = scene.water_model_matrix() * Vector4::new(center.x, 0.0, center.z, 1.0);
    assert_relative_eq!(surface.y, config.water_height);
    assert_relative_eq!(surface.x, 0.0);
}
