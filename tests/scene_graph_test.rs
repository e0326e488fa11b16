use std::f32::consts::FRAC_PI_2;

use cgmath::{Euler, Matrix4, Quaternion, Rad, Rotation3, SquareMatrix, Vector3, Vector4};
use rotating_shapes::data_structures::{
    instance::Instance,
    scene_graph::{SceneGraph, Spatial},
    slot::LoadSlot,
    transform::Transform,
};

use crate::common::test_utils::{TestNode, assert_close};

mod common;

#[test]
fn should_keep_insertion_order() {
    let mut scene = SceneGraph::new();
    assert!(scene.is_empty());

    let cube = scene.add(TestNode::new("cube"));
    let cylinder = scene.add(TestNode::new("cylinder"));
    let cone = scene.add(TestNode::new("cone"));

    assert_eq!(scene.len(), 3);
    assert_eq!([cube.index(), cylinder.index(), cone.index()], [0, 1, 2]);
    let names: Vec<_> = scene.iter().map(|node| node.name).collect();
    assert_eq!(names, ["cube", "cylinder", "cone"]);
    assert_eq!(scene.get(cylinder).map(|node| node.name), Some("cylinder"));
}

#[test]
fn should_mutate_through_handles() {
    let mut scene = SceneGraph::new();
    let handle = scene.add(TestNode::new("cube"));

    scene
        .get_mut(handle)
        .expect("handle resolves")
        .transform_mut()
        .rotation
        .y = Rad(1.25);

    assert_eq!(scene.get(handle).map(|n| n.transform().rotation.y), Some(Rad(1.25)));
}

#[test]
fn should_fill_a_slot_once() {
    let mut slot: LoadSlot<u32> = LoadSlot::default();
    assert!(!slot.is_loaded());
    assert_eq!(slot.get(), None);

    assert_eq!(slot.fill(7), Ok(()));
    assert!(slot.is_loaded());
    assert_eq!(slot.get(), Some(&7));

    assert_eq!(slot.fill(8), Err(8));
    assert_eq!(slot.get(), Some(&7));
}

#[test]
fn should_default_to_unloaded() {
    assert_eq!(LoadSlot::<u8>::default(), LoadSlot::Unloaded);
}

#[test]
fn should_start_as_identity() {
    let transform = Transform::default();
    let instance = Instance::from(&transform);

    assert_eq!(instance.to_matrix(), Matrix4::identity());
}

#[test]
fn should_compose_rotations_in_xyz_order() {
    let mut transform = Transform::new();
    transform.rotation = Euler::new(Rad(0.4), Rad(-1.1), Rad(2.0));

    let expected = Quaternion::from_angle_x(Rad(0.4))
        * Quaternion::from_angle_y(Rad(-1.1))
        * Quaternion::from_angle_z(Rad(2.0));
    let actual = transform.quaternion();

    assert_close(actual.s, expected.s);
    assert_close(actual.v.x, expected.v.x);
    assert_close(actual.v.y, expected.v.y);
    assert_close(actual.v.z, expected.v.z);
}

#[test]
fn should_place_rotate_and_scale() {
    let mut transform = Transform::at(Vector3::new(1.5, -1.0, 0.0)).with_uniform_scale(0.04);
    transform.rotation.y = Rad(FRAC_PI_2);

    let moved = Instance::from(&transform).to_matrix() * Vector4::new(25.0, 0.0, 0.0, 1.0);

    // +X turns into -Z under a quarter turn around Y
    assert_close(moved.x, 1.5);
    assert_close(moved.y, -1.0);
    assert_close(moved.z, -1.0);
    assert_close(moved.w, 1.0);
}
