#[test]
#[cfg(feature = "integration-tests")]
fn should_run_until_the_frame_limit() {
    use rotating_shapes::{config::Config, flow};

    let config = Config {
        title: "rotating shapes smoke test".to_string(),
        asset_root: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string(),
        frame_limit: Some(30),
        ..Config::default()
    };

    flow::run(config).expect("event loop exits cleanly");
}
