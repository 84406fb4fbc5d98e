mod common;

use glam::Vec3;
use hero_core::asset::{install, ModelAsset};
use hero_core::bounds::{Aabb, Normalization};
use hero_core::params::{HeroParams, ModelParams};
use hero_core::scene::{Materials, NodeKind};
use hero_core::{collect_draws, Camera, HeroError, Stage};

#[test]
fn scale_fits_largest_dimension() {
    let boxes = [
        (Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)),
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 2.0, 3.0)),
        (Vec3::new(-50.0, 3.0, 7.0), Vec3::new(-49.5, 3.1, 9.0)),
    ];
    for (min, max) in boxes {
        let aabb = Aabb::new(min, max);
        let size = max - min;
        let n = Normalization::fit(&aabb, 4.5);
        assert!((n.scale - 4.5 / size.max_element()).abs() < 1e-5);
        assert!(n.apply(aabb.center()).length() < 1e-4);
        let fitted = aabb.transformed(&n.matrix());
        assert!((fitted.max_dimension() - 4.5).abs() < 1e-4);
        assert!(fitted.center().length() < 1e-4);
    }
}

#[test]
fn box_of_size_2_4_2_scales_by_one_and_an_eighth() {
    let aabb = Aabb::new(Vec3::new(11.0, 1.0, 1.0), Vec3::new(13.0, 5.0, 3.0));
    let n = Normalization::fit(&aabb, 4.5);
    assert!((n.scale - 1.125).abs() < 1e-6);
}

#[test]
fn glb_import_merges_primitives_into_draw_groups() {
    let asset = ModelAsset::from_glb(&common::box_glb(4)).expect("valid glb");
    assert_eq!(asset.name.as_deref(), Some("box-scene"));
    assert_eq!(asset.mesh_count(), 1);
    assert_eq!(asset.geometries.len(), 1);

    let geometry = &asset.geometries[0];
    assert_eq!(geometry.groups.len(), 2);
    assert_eq!(geometry.indices.len(), 12);
    assert_eq!(geometry.normals.len(), geometry.positions.len());
    assert!(geometry
        .indices
        .iter()
        .all(|i| (*i as usize) < geometry.positions.len()));

    let glass = &asset.materials[1];
    assert!(glass.transparent);
    assert!(glass.double_sided);
    assert!((glass.opacity - 0.4).abs() < 1e-6);
    let stone = &asset.materials[0];
    assert!(!stone.transparent);
    assert!((stone.roughness - 0.8).abs() < 1e-6);
}

#[test]
fn glb_bounds_include_node_transforms() {
    let asset = ModelAsset::from_glb(&common::box_glb(4)).unwrap();
    let b = asset.bounds().unwrap();
    assert!((b.min - Vec3::new(11.0, 1.0, 1.0)).length() < 1e-5);
    assert!((b.max - Vec3::new(13.0, 5.0, 3.0)).length() < 1e-5);
}

#[test]
fn garbage_bytes_fail_to_parse() {
    let err = ModelAsset::from_glb(b"definitely not a model").unwrap_err();
    assert!(matches!(err, HeroError::Parse(_)));
}

#[test]
fn model_without_triangles_cannot_be_installed() {
    let asset = ModelAsset::from_glb(&common::box_glb(0)).expect("points are valid glTF");
    assert_eq!(asset.mesh_count(), 0);
    let mut stage = Stage::build(&HeroParams::default());
    let before = stage.scene.len();
    let err = install(&mut stage.scene, &asset, &ModelParams::default()).unwrap_err();
    assert!(matches!(err, HeroError::EmptyModel));
    assert_eq!(stage.scene.len(), before);
}

#[test]
fn installed_model_is_centered_on_its_group() {
    let asset = ModelAsset::from_glb(&common::box_glb(4)).unwrap();
    let params = ModelParams::default();
    let mut stage = Stage::build(&HeroParams::default());
    let model = install(&mut stage.scene, &asset, &params).unwrap();

    assert!((model.normalization.scale - 1.125).abs() < 1e-6);
    assert_eq!(model.base_height, params.position.y);
    assert!(stage.scene.is_attached(model.group));
    assert_eq!(stage.scene.node(model.group).unwrap().children(), &[model.model]);

    // geometric center sits on the group origin even with the artistic rotation
    let local = stage.scene.subtree_bounds(model.model).unwrap();
    assert!(local.center().length() < 1e-4, "center {:?}", local.center());
    let world = stage.scene.node(model.group).unwrap().world_position();
    assert!((world - params.position).length() < 1e-6);
}

#[test]
fn installed_model_captures_rotation_and_casts_shadows() {
    let asset = common::two_material_box();
    let params = ModelParams::default();
    let mut stage = Stage::build(&HeroParams::default());
    let model = install(&mut stage.scene, &asset, &params).unwrap();

    assert!((model.initial_rotation - params.rotation).length() < 1e-5);

    let mut meshes = 0;
    stage.scene.traverse(model.group, |_, node| {
        if let NodeKind::Mesh(mesh) = &node.kind {
            meshes += 1;
            assert!(mesh.cast_shadow);
            assert!(matches!(&mesh.materials, Materials::Multi(ids) if ids.len() == 2));
        }
    });
    assert_eq!(meshes, 1);
}

#[test]
fn only_double_sided_materials_draw_both_faces() {
    let asset = ModelAsset::from_glb(&common::box_glb(4)).unwrap();
    let params = HeroParams::default();
    let mut stage = Stage::build(&params);
    install(&mut stage.scene, &asset, &params.model).unwrap();
    stage.scene.update_world_all();

    let camera = Camera::from_params(&params.camera, 1280, 720);
    let draws = collect_draws(&stage.scene, &camera);
    let double: Vec<_> = draws.iter().filter(|d| d.double_sided).collect();
    // the glass primitive; stone and the backdrop are culled
    assert_eq!(double.len(), 1);
    assert!(double[0].transparent);
    assert!(draws.iter().any(|d| !d.transparent && !d.double_sided));
}
