use futures::executor::block_on;
use rotating_shapes::{
    resources::{
        Assets, diffuse_rgba, load_material_library, load_model, relative_to,
        texture::decode_image,
    },
    scene::{TREE_MTL, TREE_OBJ},
};

fn assets() -> Assets {
    Assets::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
}

#[test]
fn should_resolve_paths_next_to_the_base_file() {
    assert_eq!(
        relative_to("textures/Lowpoly_tree_sample.mtl", "bark.png"),
        "textures/bark.png"
    );
    assert_eq!(relative_to("tree.mtl", "bark.png"), "bark.png");
}

#[test]
fn should_load_the_tree_materials() {
    let library = block_on(load_material_library(&assets(), TREE_MTL)).expect("library loads");

    assert_eq!(library.len(), 2);
    assert_eq!(library.position("Trunk"), Some(0));
    assert_eq!(library.position("Leaves"), Some(1));
    assert_eq!(library.decoded.len(), 2);

    let trunk = &library.decoded[0];
    assert_eq!(trunk.name, "Trunk");
    assert_eq!(trunk.diffuse.dimensions(), (1, 1));
    assert_eq!(trunk.diffuse.get_pixel(0, 0).0, [92, 56, 28, 255]);
    assert!(trunk.normal.is_none());
}

#[test]
fn should_load_the_tree_model() {
    let model = block_on(load_model(&assets(), TREE_MTL, TREE_OBJ)).expect("model loads");

    assert_eq!(model.meshes.len(), 2);
    assert_eq!(model.materials.len(), 2);

    let trunk = &model.meshes[0];
    assert_eq!(trunk.name, "Trunk");
    assert_eq!(trunk.indices.len(), 54);
    assert_eq!(trunk.material, 0);

    let leaves = &model.meshes[1];
    assert_eq!(leaves.name, "Leaves");
    assert_eq!(leaves.indices.len(), 96);
    assert_eq!(leaves.material, 1);

    for mesh in &model.meshes {
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        for v in &mesh.vertices {
            assert!(v.position[1] >= 0.0);
            assert!(v.tangent.iter().all(|c| c.is_finite()));
        }
    }
}

#[test]
fn should_fail_on_missing_files() {
    let assets = Assets::new("does-not-exist");

    assert!(block_on(load_material_library(&assets, TREE_MTL)).is_err());
    assert!(block_on(load_model(&assets, TREE_MTL, TREE_OBJ)).is_err());
}

#[test]
fn should_fail_when_the_obj_is_missing() {
    let result = block_on(load_model(&assets(), TREE_MTL, "objs/missing.obj"));

    let error = format!("{:#}", result.expect_err("missing obj is an error"));
    assert!(error.contains("missing.obj"), "{error}");
}

#[test]
fn should_fall_back_to_the_diffuse_colour_without_a_texture() {
    let dir = std::env::temp_dir().join(format!("rotating-shapes-mtl-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("textures")).expect("temp dir is writable");
    std::fs::write(
        dir.join("textures/broken.mtl"),
        "newmtl Bark\nKd 1.0 0.0 0.0\nmap_Kd bark.png\nnorm bark_normal.png\n",
    )
    .expect("temp dir is writable");

    let assets = Assets::new(dir.to_string_lossy());
    let library = block_on(load_material_library(&assets, "textures/broken.mtl"));
    std::fs::remove_dir_all(&dir).ok();

    let library = library.expect("a missing texture is not fatal");
    let bark = &library.decoded[0];
    assert_eq!(bark.diffuse.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert!(bark.normal.is_none());
}

#[test]
fn should_default_to_opaque_white() {
    let material = tobj::Material::default();

    assert_eq!(diffuse_rgba(&material), [255; 4]);
}

#[test]
fn should_reject_undecodable_images() {
    let result = decode_image(b"definitely not a png", "garbage.png");

    let error = format!("{:#}", result.expect_err("garbage does not decode"));
    assert!(error.contains("garbage.png"), "{error}");
}
