//! Integration tests for the desk scene
//!
//! These check the geometry that ends up in GPU buffers: index ranges,
//! normals and where objects land in world space.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use tabletop_core::*;

fn world_bounds(scene: &Scene, label: &str) -> (Point3<f32>, Point3<f32>) {
    let object = scene
        .objects
        .iter()
        .find(|o| o.label == label)
        .unwrap_or_else(|| panic!("no object labelled {label}"));
    let mesh = scene.mesh(object.mesh).unwrap();
    let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    for v in &mesh.vertices {
        let p = object.transform.transform_point(&Point3::from(v.position));
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (min, max)
}

#[test]
fn test_all_indices_in_range() {
    let scene = Scene::desk().unwrap();
    for mesh in scene.meshes.values() {
        assert!(!mesh.is_empty(), "{} is empty", mesh.name);
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()), "{}", mesh.name);
    }
}

#[test]
fn test_all_normals_unit_length() {
    let scene = Scene::desk().unwrap();
    for mesh in scene.meshes.values() {
        for v in &mesh.vertices {
            assert_relative_eq!(Vector3::from(v.normal).norm(), 1.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn test_cylinders_have_one_quad_per_segment() {
    let scene = Scene::desk().unwrap();
    let bottle = scene.mesh(MeshSlot::BottleSide).unwrap();
    assert_eq!(bottle.triangle_count(), 2 * BOTTLE.segments as usize);
    let cap = scene.mesh(MeshSlot::CapSide).unwrap();
    assert_eq!(cap.triangle_count(), 2 * CAP.segments as usize);
}

#[test]
fn test_cap_sits_on_bottle_end() {
    let scene = Scene::desk().unwrap();
    let (_, bottle_max) = world_bounds(&scene, "bottle body");
    let (cap_min, cap_max) = world_bounds(&scene, "cap body");
    assert_relative_eq!(cap_min.z, bottle_max.z, epsilon = 1e-3);
    let (cap_top_min, _) = world_bounds(&scene, "cap top");
    assert_relative_eq!(cap_top_min.z, cap_max.z, epsilon = 1e-5);
}

#[test]
fn test_objects_rest_above_floor() {
    let scene = Scene::desk().unwrap();
    let (floor_min, floor_max) = world_bounds(&scene, "floor");
    assert_relative_eq!(floor_min.y, floor_max.y);
    for object in scene.objects.iter().filter(|o| o.label != "floor") {
        let (min, _) = world_bounds(&scene, object.label);
        assert!(min.y >= floor_max.y - 1e-4, "{} dips below the floor", object.label);
    }
}

#[test]
fn test_texture_files_live_under_textures_dir() {
    for slot in TextureSlot::ALL {
        assert!(slot.file_name().starts_with("textures/"));
        assert!(slot.file_name().ends_with(".jpg"));
    }
}

#[test]
fn test_default_camera_sees_the_pyramid() {
    let config = ViewerConfig::default();
    let camera = config.camera.build();
    let view_proj = camera.view_projection(config.window.width, config.window.height);
    let scene = Scene::desk().unwrap();
    let pyramid = scene.objects.iter().find(|o| o.label == "pyramid").unwrap();
    let center = pyramid.transform.transform_point(&Point3::new(0.0, 0.5, 0.0));
    let clip = view_proj * center.to_homogeneous();
    let ndc = clip.xyz() / clip.w;
    assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
    assert!((0.0..=1.0).contains(&ndc.z));
}
