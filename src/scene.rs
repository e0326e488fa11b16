//! The demo scene.
//!
//! Three primitive props (a cube, a cylinder and a textured cone) are built
//! at startup. A low-poly tree is loaded from OBJ/MTL in the background and
//! joins the scene once the load completes. All four spin; the tree only
//! around Y.

use cgmath::{Deg, Vector3};

use crate::{
    animation::{AnimationLoop, Spin, SpinnerId},
    camera::{Camera, PerspectiveCamera, Projection},
    data_structures::{
        geometry::{BoxGeometry, ConeGeometry, CylinderGeometry},
        model::{MaterialData, MeshData, ModelData},
        scene_graph::{NodeHandle, SceneGraph},
        transform::Transform,
    },
    pipelines::light::DirectionalLight,
    resources::{self, Assets, texture::load_image},
};

pub const FOV_DEGREES: f32 = 75.0;
pub const ASPECT: f32 = 2.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 5.0;
pub const CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 2.0];

pub const LIGHT_COLOUR: u32 = 0xffffff;
pub const LIGHT_INTENSITY: f32 = 3.0;
pub const LIGHT_POSITION: [f32; 3] = [5.0, 2.0, 4.0];

pub const CUBE_COLOUR: u32 = 0x44aa88;
pub const CYLINDER_COLOUR: u32 = 0xffff00;
pub const CYLINDER_SCALE: f32 = 0.5;
pub const CYLINDER_POSITION: [f32; 3] = [1.5, 0.5, 0.0];
pub const CONE_TEXTURE: &str = "textures/images.jpg";
pub const CONE_POSITION: [f32; 3] = [-1.5, 0.0, 0.0];

pub const TREE_MTL: &str = "textures/Lowpoly_tree_sample.mtl";
pub const TREE_OBJ: &str = "objs/Lowpoly_tree_sample.obj";
pub const TREE_SCALE: f32 = 0.04;
pub const TREE_POSITION: [f32; 3] = [1.5, -1.0, 0.0];

pub const CUBE_SPIN: Spin = Spin::xy(0.0);
pub const CYLINDER_SPIN: Spin = Spin::xy(10.0 * 0.1);
pub const CONE_SPIN: Spin = Spin::xy(5.0 * 0.1);
pub const TREE_SPIN: Spin = Spin::y(0.0);

/// Camera at (0, 0, 2) looking down -Z.
pub fn camera(aspect: f32) -> PerspectiveCamera {
    PerspectiveCamera::new(
        Camera::new(CAMERA_POSITION, Deg(-90.0), Deg(0.0)),
        Projection::new(aspect, Deg(FOV_DEGREES), NEAR, FAR),
    )
}

pub fn light() -> DirectionalLight {
    DirectionalLight::new(LIGHT_POSITION.into(), LIGHT_COLOUR, LIGHT_INTENSITY)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box(BoxGeometry),
    Cylinder(CylinderGeometry),
    Cone(ConeGeometry),
}

impl Shape {
    pub fn build(&self) -> MeshData {
        match self {
            Shape::Box(geometry) => geometry.build(),
            Shape::Cylinder(geometry) => geometry.build(),
            Shape::Cone(geometry) => geometry.build(),
        }
    }
}

/// What a prop's surface looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// Solid `0xRRGGBB` colour.
    Colour(u32),
    /// Image texture with the colour used when the image cannot be loaded.
    Texture { path: &'static str, fallback: u32 },
}

/// A primitive shape with its surface, placement and spin.
#[derive(Clone, Debug, PartialEq)]
pub struct Prop {
    pub name: &'static str,
    pub shape: Shape,
    pub surface: Surface,
    pub placement: Transform,
    pub spin: Spin,
}

impl Prop {
    /// Build the mesh and resolve the surface into a material.
    pub async fn load(&self, assets: &Assets) -> ModelData {
        let material = match self.surface {
            Surface::Colour(hex) => MaterialData::from_hex(self.name, hex),
            Surface::Texture { path, fallback } => match load_image(assets, path).await {
                Ok(diffuse) => MaterialData {
                    name: self.name.to_string(),
                    diffuse,
                    normal: None,
                },
                Err(e) => {
                    log::warn!("Texture for {} unavailable, using a plain colour: {:#}", self.name, e);
                    MaterialData::from_hex(self.name, fallback)
                }
            },
        };
        ModelData::single(self.shape.build(), material)
    }
}

pub fn props() -> Vec<Prop> {
    vec![
        Prop {
            name: "cube",
            shape: Shape::Box(BoxGeometry::new(1.0, 1.0, 1.0)),
            surface: Surface::Colour(CUBE_COLOUR),
            placement: Transform::new(),
            spin: CUBE_SPIN,
        },
        Prop {
            name: "cylinder",
            shape: Shape::Cylinder(CylinderGeometry::new(0.5, 0.5, 1.0, 32)),
            surface: Surface::Colour(CYLINDER_COLOUR),
            placement: Transform::at(CYLINDER_POSITION.into()).with_uniform_scale(CYLINDER_SCALE),
            spin: CYLINDER_SPIN,
        },
        Prop {
            name: "cone",
            shape: Shape::Cone(ConeGeometry::new(0.5, 0.8, 32)),
            surface: Surface::Texture {
                path: CONE_TEXTURE,
                fallback: 0xffffff,
            },
            placement: Transform::at(CONE_POSITION.into()),
            spin: CONE_SPIN,
        },
    ]
}

/// Add nodes to the scene graph and spin each of them.
pub fn stage<N>(
    scene: &mut SceneGraph<N>,
    animation: &mut AnimationLoop,
    nodes: impl IntoIterator<Item = (Spin, N)>,
) -> Vec<SpinnerId> {
    nodes
        .into_iter()
        .map(|(spin, node)| {
            let handle = scene.add(node);
            animation.track(handle, spin)
        })
        .collect()
}

/// A model that is loaded in the background and spun once it arrives.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRequest {
    pub spinner: SpinnerId,
    pub assets: Assets,
    pub mtl: String,
    pub obj: String,
    pub placement: Transform,
}

impl ModelRequest {
    /// Request the tree and reserve its (still empty) spinner.
    pub fn tree(animation: &mut AnimationLoop, assets: Assets) -> Self {
        Self {
            spinner: animation.track_pending(TREE_SPIN),
            assets,
            mtl: TREE_MTL.to_string(),
            obj: TREE_OBJ.to_string(),
            placement: Transform::at(Vector3::from(TREE_POSITION)).with_uniform_scale(TREE_SCALE),
        }
    }

    pub async fn load(&self) -> anyhow::Result<ModelData> {
        resources::load_model(&self.assets, &self.mtl, &self.obj).await
    }
}

/// Add a node whose load just completed and hand it to its pending spinner.
pub fn attach_loaded<N>(
    scene: &mut SceneGraph<N>,
    animation: &mut AnimationLoop,
    spinner: SpinnerId,
    node: N,
) -> anyhow::Result<NodeHandle> {
    anyhow::ensure!(
        !animation.is_attached(spinner),
        "{:?} already has a node",
        spinner
    );
    let handle = scene.add(node);
    animation.attach(spinner, handle)?;
    Ok(handle)
}
