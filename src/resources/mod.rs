use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
};

use anyhow::Context;

use crate::data_structures::model::{MaterialData, ModelData};

/**
 * This module contains all logic for loading meshes, materials and textures from external files.
 *
 * Models are loaded in two stages: the material library first, then the geometry that refers to
 * it. Both stages produce plain CPU data that can cross threads; uploading to the GPU happens
 * later on the render thread.
 */
pub mod mesh;
pub mod texture;

/// Where assets are read from: a directory natively, a path below the page origin on the web.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assets {
    root: String,
}

impl Assets {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    #[cfg(target_arch = "wasm32")]
    fn format_url(&self, file_name: &str) -> anyhow::Result<reqwest::Url> {
        let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no browser window"))?;
        let origin = window
            .location()
            .origin()
            .map_err(|e| anyhow::anyhow!("page origin unavailable: {e:?}"))?;
        let base = reqwest::Url::parse(&format!("{}/{}/", origin, self.root.trim_matches('/')))?;
        Ok(base.join(file_name)?)
    }

    pub async fn load_string(&self, file_name: &str) -> anyhow::Result<String> {
        #[cfg(target_arch = "wasm32")]
        let txt = {
            let url = self.format_url(file_name)?;
            reqwest::get(url).await?.error_for_status()?.text().await?
        };
        #[cfg(not(target_arch = "wasm32"))]
        let txt = {
            let path = std::path::Path::new(&self.root).join(file_name);
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
        };

        Ok(txt)
    }

    pub async fn load_binary(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        #[cfg(target_arch = "wasm32")]
        let data = {
            let url = self.format_url(file_name)?;
            reqwest::get(url).await?.error_for_status()?.bytes().await?.to_vec()
        };
        #[cfg(not(target_arch = "wasm32"))]
        let data = {
            let path = std::path::Path::new(&self.root).join(file_name);
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
        };

        Ok(data)
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new("assets")
    }
}

/// Resolve `file_name` against the directory that contains `base_file`.
pub fn relative_to(base_file: &str, file_name: &str) -> String {
    match base_file.rfind('/') {
        Some(idx) => format!("{}/{}", &base_file[..idx], file_name),
        None => file_name.to_string(),
    }
}

/// A parsed MTL file together with its decoded textures.
///
/// `decoded[i]` belongs to `materials[i]`.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    pub materials: Vec<tobj::Material>,
    pub index: HashMap<String, usize>,
    pub decoded: Vec<MaterialData>,
}

impl MaterialLibrary {
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Load an MTL file and decode every texture it references.
///
/// Texture paths are relative to the MTL file. A material without a diffuse
/// texture, or whose texture cannot be loaded, uses its `Kd` colour instead.
pub async fn load_material_library(
    assets: &Assets,
    file_name: &str,
) -> anyhow::Result<MaterialLibrary> {
    let mtl_text = assets.load_string(file_name).await?;
    let (materials, index) = tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl_text)))
        .with_context(|| format!("parsing material library {file_name}"))?;

    let mut decoded = Vec::with_capacity(materials.len());
    for m in &materials {
        decoded.push(decode_material(assets, file_name, m).await);
    }
    log::info!("Loaded {} materials from {}.", materials.len(), file_name);

    Ok(MaterialLibrary {
        materials,
        index,
        decoded,
    })
}

async fn decode_material(assets: &Assets, mtl_file: &str, m: &tobj::Material) -> MaterialData {
    let diffuse = match &m.diffuse_texture {
        Some(texture_file) => {
            let path = relative_to(mtl_file, texture_file);
            match texture::load_image(assets, &path).await {
                Ok(img) => Some(img),
                Err(e) => {
                    log::warn!("Material {} falls back to its colour: {:#}", m.name, e);
                    None
                }
            }
        }
        None => None,
    };
    let normal = match &m.normal_texture {
        Some(texture_file) => {
            let path = relative_to(mtl_file, texture_file);
            texture::load_image(assets, &path)
                .await
                .inspect_err(|e| log::warn!("Ignoring normal map of {}: {:#}", m.name, e))
                .ok()
        }
        None => None,
    };

    match diffuse {
        Some(diffuse) => MaterialData {
            name: m.name.clone(),
            diffuse,
            normal,
        },
        None => MaterialData {
            normal,
            ..MaterialData::solid(&m.name, diffuse_rgba(m))
        },
    }
}

/// `Kd` and `d` of a material as 8-bit RGBA. Missing values default to opaque white.
pub fn diffuse_rgba(m: &tobj::Material) -> [u8; 4] {
    let [r, g, b] = m.diffuse.unwrap_or([1.0; 3]);
    let a = m.dissolve.unwrap_or(1.0);
    [r, g, b, a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Load OBJ geometry whose `mtllib` is the already loaded `library`.
pub async fn load_obj(
    assets: &Assets,
    file_name: &str,
    library: &MaterialLibrary,
) -> anyhow::Result<ModelData> {
    let obj_text = assets.load_string(file_name).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, obj_materials) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok((library.materials.clone(), library.index.clone())),
    )
    .with_context(|| format!("parsing {file_name}"))?;
    if let Err(e) = obj_materials {
        log::debug!("{} resolved no materials: {}", file_name, e);
    }

    let meshes = mesh::load_meshes(&models, file_name);
    anyhow::ensure!(!meshes.is_empty(), "{} contains no usable meshes", file_name);
    log::info!("Loaded {} meshes from {}.", meshes.len(), file_name);

    Ok(ModelData {
        meshes,
        materials: library.decoded.clone(),
    })
}

/// Both load stages in order: the material library, then the geometry.
pub async fn load_model(assets: &Assets, mtl_file: &str, obj_file: &str) -> anyhow::Result<ModelData> {
    let library = load_material_library(assets, mtl_file).await?;
    load_obj(assets, obj_file, &library).await
}
