use cgmath::{Deg, Vector4};
use rotating_shapes::{
    camera::{Camera, PerspectiveCamera, Projection},
    scene,
};

use crate::common::test_utils::assert_close;

mod common;

fn to_ndc(camera: &PerspectiveCamera, x: f32, y: f32, z: f32) -> (f32, f32, f32) {
    let clip = camera.view_proj() * Vector4::new(x, y, z, 1.0);
    (clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
}

#[test]
fn should_look_down_negative_z() {
    let camera = scene::camera(scene::ASPECT);
    let direction = camera.camera.direction();

    assert_close(direction.x, 0.0);
    assert_close(direction.y, 0.0);
    assert_close(direction.z, -1.0);
    assert_eq!(camera.projection.aspect(), 2.0);
}

#[test]
fn should_project_the_origin_to_the_centre() {
    let camera = scene::camera(scene::ASPECT);
    let (x, y, z) = to_ndc(&camera, 0.0, 0.0, 0.0);

    assert_close(x, 0.0);
    assert_close(y, 0.0);
    assert!(z > 0.0 && z < 1.0, "depth {z} is outside the view volume");
}

#[test]
fn should_clip_beyond_the_far_plane() {
    let camera = scene::camera(scene::ASPECT);

    let (_, _, inside) = to_ndc(&camera, 0.0, 0.0, 2.0 - 4.9);
    let (_, _, beyond) = to_ndc(&camera, 0.0, 0.0, 2.0 - 5.1);
    let (_, _, too_close) = to_ndc(&camera, 0.0, 0.0, 2.0 - 0.05);

    assert!(inside < 1.0);
    assert!(beyond > 1.0);
    assert!(too_close < 0.0);
}

#[test]
fn should_keep_the_props_in_view() {
    let camera = scene::camera(scene::ASPECT);

    for prop in scene::props() {
        let p = prop.placement.position;
        let (x, y, z) = to_ndc(&camera, p.x, p.y, p.z);
        assert!(x.abs() < 1.0 && y.abs() < 1.0, "{} is off screen", prop.name);
        assert!(z > 0.0 && z < 1.0);
    }
}

#[test]
fn should_follow_surface_size_on_resize() {
    let mut projection = Projection::new(2.0, Deg(75.0), 0.1, 5.0);

    projection.resize(800, 600);
    assert_close(projection.aspect(), 800.0 / 600.0);

    projection.resize(0, 600);
    assert_close(projection.aspect(), 800.0 / 600.0);
}

#[test]
fn should_widen_the_view_with_the_aspect_ratio() {
    let narrow = PerspectiveCamera::new(
        Camera::new([0.0, 0.0, 2.0], Deg(-90.0), Deg(0.0)),
        Projection::new(1.0, Deg(75.0), 0.1, 5.0),
    );
    let wide = scene::camera(2.0);

    let (narrow_x, _, _) = to_ndc(&narrow, 1.0, 0.0, 0.0);
    let (wide_x, _, _) = to_ndc(&wide, 1.0, 0.0, 0.0);
    assert_close(narrow_x, 2.0 * wide_x);
}
