use cgmath::{InnerSpace, Vector3};
use rotating_shapes::data_structures::{
    geometry::{BoxGeometry, ConeGeometry, CylinderGeometry, compute_tangents},
    model::{MeshData, ModelVertex},
};

fn position(mesh: &MeshData, i: u32) -> Vector3<f32> {
    mesh.vertices[i as usize].position.into()
}

/// Every triangle of a convex mesh around the origin must face away from it
/// when wound counter-clockwise, and agree with its vertex normals.
fn assert_outward_ccw(mesh: &MeshData) {
    assert_eq!(mesh.indices.len() % 3, 0);
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (position(mesh, tri[0]), position(mesh, tri[1]), position(mesh, tri[2]));
        let face_normal = (b - a).cross(c - a);
        assert!(face_normal.magnitude2() > 0.0, "degenerate triangle {:?}", tri);
        let centroid = (a + b + c) / 3.0;
        assert!(
            centroid.dot(face_normal) > 0.0,
            "triangle {:?} of {} faces inwards",
            tri,
            mesh.name
        );
        for &i in tri {
            let normal: Vector3<f32> = mesh.vertices[i as usize].normal.into();
            assert!(normal.dot(face_normal) > 0.0, "normal of vertex {i} disagrees with its face");
        }
    }
}

fn assert_finite_tangents(mesh: &MeshData) {
    for v in &mesh.vertices {
        let tangent: Vector3<f32> = v.tangent.into();
        let bitangent: Vector3<f32> = v.bitangent.into();
        assert!(tangent.x.is_finite() && tangent.y.is_finite() && tangent.z.is_finite());
        assert!(bitangent.x.is_finite() && bitangent.y.is_finite() && bitangent.z.is_finite());
        assert!(tangent.magnitude2() > 0.0);
    }
}

fn extent(mesh: &MeshData, axis: usize) -> (f32, f32) {
    mesh.vertices.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
        (lo.min(v.position[axis]), hi.max(v.position[axis]))
    })
}

#[test]
fn should_build_a_unit_box() {
    let mesh = BoxGeometry::new(1.0, 1.0, 1.0).build();

    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.indices.len(), 36);
    for axis in 0..3 {
        assert_eq!(extent(&mesh, axis), (-0.5, 0.5));
    }
    assert_outward_ccw(&mesh);
    assert_finite_tangents(&mesh);
}

#[test]
fn should_respect_box_dimensions() {
    let mesh = BoxGeometry::new(2.0, 4.0, 6.0).build();

    assert_eq!(extent(&mesh, 0), (-1.0, 1.0));
    assert_eq!(extent(&mesh, 1), (-2.0, 2.0));
    assert_eq!(extent(&mesh, 2), (-3.0, 3.0));
    assert_outward_ccw(&mesh);
}

#[test]
fn should_build_a_capped_cylinder() {
    let mesh = CylinderGeometry::new(0.5, 0.5, 1.0, 32).build();

    assert_eq!(mesh.name, "cylinder");
    // torso columns plus a centre and a closed ring per cap
    assert_eq!(mesh.vertices.len(), 2 * 33 + 2 * (1 + 33));
    assert_eq!(mesh.indices.len(), 32 * 6 + 2 * 32 * 3);
    assert_eq!(extent(&mesh, 1), (-0.5, 0.5));
    for v in &mesh.vertices {
        let radius = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
        assert!(radius <= 0.5 + 1e-5);
    }
    assert_outward_ccw(&mesh);
    assert_finite_tangents(&mesh);
}

#[test]
fn should_build_a_cone_with_a_single_cap() {
    let mesh = ConeGeometry::new(0.5, 0.8, 32).build();

    assert_eq!(mesh.name, "cone");
    assert_eq!(mesh.vertices.len(), 2 * 33 + (1 + 33));
    assert_eq!(mesh.indices.len(), 32 * 3 + 32 * 3);
    let (bottom, top) = extent(&mesh, 1);
    assert!((bottom + 0.4).abs() < 1e-6);
    assert!((top - 0.4).abs() < 1e-6);
    assert_outward_ccw(&mesh);
    assert_finite_tangents(&mesh);
}

#[test]
fn should_clamp_radial_segments() {
    let mesh = CylinderGeometry::new(1.0, 1.0, 1.0, 1).build();

    assert_eq!(mesh.indices.len(), 3 * 6 + 2 * 3 * 3);
    assert_outward_ccw(&mesh);
}

#[test]
fn should_fall_back_to_a_perpendicular_tangent_without_uvs() {
    let mut vertices = vec![
        ModelVertex {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            ..Default::default()
        },
        ModelVertex {
            position: [1.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            ..Default::default()
        },
        ModelVertex {
            position: [0.0, 1.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            ..Default::default()
        },
    ];
    compute_tangents(&mut vertices, &[0, 1, 2]);

    for v in &vertices {
        let normal: Vector3<f32> = v.normal.into();
        let tangent: Vector3<f32> = v.tangent.into();
        assert!((tangent.magnitude() - 1.0).abs() < 1e-5);
        assert!(tangent.dot(normal).abs() < 1e-5);
    }
}
