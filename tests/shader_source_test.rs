use ocean_ngin::{
    pipelines::groups::{self, check_shader_source},
    scene::RenderableGroup,
};

#[test]
fn should_accept_every_builtin_shader() {
    for group in RenderableGroup::DRAW_ORDER {
        let checked = check_shader_source(groups::builtin_source(group));
        assert!(checked.is_ok(), "{}: {:?}", group.label(), checked);
    }
}

#[test]
fn should_reject_a_shader_without_a_fragment_entry_point() {
    let source = groups::builtin_source(RenderableGroup::Seafloor).replace("fn fs_main", "fn shade");
    let err = check_shader_source(&source).expect_err("missing fs_main");
    assert!(format!("{:#}", err).contains("fs_main"));
}

#[test]
fn should_reject_an_entry_point_name_that_only_appears_in_a_comment() {
    let source = groups::builtin_source(RenderableGroup::Skybox)
        .replace("fn vs_main", "fn vertex")
        .replace("// ", "// fn vs_main ");
    assert!(source.contains("fn vs_main"));
    assert!(check_shader_source(&source).is_err());
}

#[test]
fn should_reject_a_shader_that_does_not_parse() {
    let source = groups::builtin_source(RenderableGroup::Water).replace("return out;", "return out");
    assert!(check_shader_source(&source).is_err());
}

#[test]
fn should_reject_a_shader_that_does_not_type_check() {
    let source = groups::builtin_source(RenderableGroup::Objects)
        .replace("out.world_position = world.xyz;", "out.world_position = world;");
    assert!(check_shader_source(&source).is_err());
}
