use cgmath::Vector3;
use futures::executor::block_on;
use rotating_shapes::{
    animation::{AnimationLoop, SpinAxes},
    data_structures::scene_graph::SceneGraph,
    resources::Assets,
    scene::{self, ModelRequest, Shape, Surface},
};

use crate::common::test_utils::{TestNode, assert_close};

mod common;

fn assets() -> Assets {
    Assets::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
}

#[test]
fn should_describe_three_props() {
    let props = scene::props();
    let names: Vec<_> = props.iter().map(|p| p.name).collect();
    assert_eq!(names, ["cube", "cylinder", "cone"]);

    let [cube, cylinder, cone] = &props[..] else {
        panic!("expected three props");
    };

    assert!(matches!(cube.shape, Shape::Box(_)));
    assert_eq!(cube.surface, Surface::Colour(0x44aa88));
    assert_eq!(cube.placement.position, Vector3::new(0.0, 0.0, 0.0));

    assert!(matches!(cylinder.shape, Shape::Cylinder(_)));
    assert_eq!(cylinder.surface, Surface::Colour(0xffff00));
    assert_eq!(cylinder.placement.position, Vector3::new(1.5, 0.5, 0.0));
    assert_eq!(cylinder.placement.scale, Vector3::new(0.5, 0.5, 0.5));

    assert!(matches!(cone.shape, Shape::Cone(_)));
    assert!(matches!(cone.surface, Surface::Texture { .. }));
    assert_eq!(cone.placement.position, Vector3::new(-1.5, 0.0, 0.0));
}

#[test]
fn should_offset_the_spins() {
    let props = scene::props();

    let phases: Vec<_> = props.iter().map(|p| p.spin.phase).collect();
    assert_close(phases[0], 0.0);
    assert_close(phases[1], 1.0);
    assert_close(phases[2], 0.5);
    assert!(props.iter().all(|p| p.spin.axes == SpinAxes::XY));

    assert_eq!(scene::TREE_SPIN.axes, SpinAxes::Y);
    assert_close(scene::TREE_SPIN.phase, 0.0);
}

#[test]
fn should_colour_the_cube() {
    let cube = &scene::props()[0];
    let model = block_on(cube.load(&assets()));

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.meshes[0].indices.len(), 36);
    assert_eq!(model.materials.len(), 1);
    assert_eq!(model.materials[0].diffuse.get_pixel(0, 0).0, [0x44, 0xaa, 0x88, 255]);
}

#[test]
fn should_fall_back_to_white_without_the_cone_texture() {
    let cone = &scene::props()[2];
    let model = block_on(cone.load(&Assets::new("does-not-exist")));

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.materials[0].diffuse.dimensions(), (1, 1));
    assert_eq!(model.materials[0].diffuse.get_pixel(0, 0).0, [255; 4]);
}

#[test]
fn should_request_the_tree_in_the_background() {
    let mut animation = AnimationLoop::new();
    let request = ModelRequest::tree(&mut animation, assets());

    assert!(!animation.is_attached(request.spinner));
    assert_eq!(request.mtl, scene::TREE_MTL);
    assert_eq!(request.obj, scene::TREE_OBJ);
    assert_eq!(request.placement.position, Vector3::new(1.5, -1.0, 0.0));
    assert_eq!(request.placement.scale, Vector3::new(0.04, 0.04, 0.04));

    let model = block_on(request.load()).expect("tree loads");
    assert_eq!(model.meshes.len(), 2);
}

#[test]
fn should_attach_a_loaded_model_once() {
    let mut scene = SceneGraph::new();
    let mut animation = AnimationLoop::new();
    scene::stage(
        &mut scene,
        &mut animation,
        scene::props()
            .into_iter()
            .map(|prop| (prop.spin, TestNode::new(prop.name))),
    );
    let request = ModelRequest::tree(&mut animation, Assets::default());

    let handle = scene::attach_loaded(&mut scene, &mut animation, request.spinner, TestNode::new("tree"))
        .expect("first attach succeeds");
    assert_eq!(handle.index(), 3);
    assert!(animation.is_attached(request.spinner));

    let again = scene::attach_loaded(&mut scene, &mut animation, request.spinner, TestNode::new("tree"));
    assert!(again.is_err());
    assert_eq!(scene.len(), 4);
}

#[test]
fn should_report_a_missing_tree() {
    let mut animation = AnimationLoop::new();
    let request = ModelRequest::tree(&mut animation, Assets::new("does-not-exist"));

    assert!(block_on(request.load()).is_err());
    assert!(!animation.is_attached(request.spinner));
}
