use crate::data_structures::{
    geometry::compute_tangents,
    model::{MeshData, ModelVertex},
};

/**
 * Converts parsed OBJ models into CPU-side meshes.
 *
 * Obj files don't come with tangents and bitangents so they are calculated here for normal maps
 * to work correctly. The indices are shared by positions, texels and normals because the file is
 * parsed with `single_index`. Meshes whose indices point past their vertices are dropped.
 */
pub fn load_meshes(models: &[tobj::Model], file_name: &str) -> Vec<MeshData> {
    models
        .iter()
        .enumerate()
        .filter_map(|(idx, m)| {
            let vertex_count = m.mesh.positions.len() / 3;
            if m.mesh.indices.iter().any(|&i| i as usize >= vertex_count) {
                log::warn!(
                    "Mesh at index {} in file {} has out of range indices and is skipped.",
                    idx,
                    file_name
                );
                return None;
            }
            let mut vertices = (0..vertex_count)
                .map(|i| ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                    // We'll calculate these later
                    tangent: [0.0; 3],
                    bitangent: [0.0; 3],
                })
                .collect::<Vec<_>>();

            compute_tangents(&mut vertices, &m.mesh.indices);

            Some(MeshData {
                name: if m.name.is_empty() {
                    file_name.to_string()
                } else {
                    m.name.clone()
                },
                vertices,
                indices: m.mesh.indices.clone(),
                material: m.mesh.material_id.unwrap_or(0),
            })
        })
        .collect()
}
