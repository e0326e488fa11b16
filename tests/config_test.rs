use rotating_shapes::config::{ASPECT_VAR, ASSETS_VAR, AspectRatio, Config, FRAME_LIMIT_VAR};

#[test]
fn should_default_to_the_demo_settings() {
    let config = Config::default();

    assert_eq!(config.canvas_id, "c");
    assert_eq!(config.asset_root, "assets");
    assert_eq!(config.clear_colour, wgpu::Color::BLACK);
    assert_eq!(config.aspect, AspectRatio::Fixed(2.0));
    assert_eq!(config.frame_limit, None);
}

#[test]
fn should_apply_overrides() {
    let config = Config::from_vars([
        (ASSETS_VAR, "/srv/demo/assets"),
        (FRAME_LIMIT_VAR, "120"),
        (ASPECT_VAR, "Surface"),
        ("HOME", "/root"),
    ]);

    assert_eq!(config.asset_root, "/srv/demo/assets");
    assert_eq!(config.frame_limit, Some(120));
    assert_eq!(config.aspect, AspectRatio::FollowSurface);
}

#[test]
fn should_ignore_malformed_values() {
    let config = Config::from_vars([
        (ASSETS_VAR, "  "),
        (FRAME_LIMIT_VAR, "soon"),
        (ASPECT_VAR, "square"),
    ]);

    assert_eq!(config, Config::default());
}

#[test]
fn should_treat_a_zero_frame_limit_as_unlimited() {
    let config = Config::from_vars([(FRAME_LIMIT_VAR, "0")]);

    assert_eq!(config.frame_limit, None);
}

#[test]
fn should_let_later_values_win() {
    let config = Config::from_vars([(ASPECT_VAR, "surface"), (ASPECT_VAR, "fixed")]);

    assert_eq!(config.aspect, AspectRatio::Fixed(2.0));
}
