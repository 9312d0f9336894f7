// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! diff -> store -> apply workflows on the mesh model.

mod common;

use common::{Uv, Vertex};
use rna::liboverride::{
    apply, diff, store, DiffOptions, LibraryOverride, OverrideOpKind, OverrideOperation,
};

#[test]
fn test_local_edits_survive_a_reference_reload() {
    common::init_logging();
    let registry = common::registry();
    let reference = common::mesh_pointer(&registry, common::mesh());

    let mut edited = common::mesh();
    edited.verts[1].co = [2.0, 0.0, 0.0];
    edited.verts.push(Vertex {
        co: [0.0, 1.0, 0.0],
        weight: 1.0,
    });
    edited.uv_layers[0].data[3] = Uv { uv: [0.5, 0.5] };
    let local = common::mesh_pointer(&registry, edited);

    let mut ov = LibraryOverride::with_reference("Square");
    let report = diff(&reference, &local, &mut ov, DiffOptions::default()).expect("diff");
    assert!(report.unoverridable.is_empty(), "{:?}", report.unoverridable);
    assert!(report.created.contains(&"verts[1].co".to_string()));
    assert!(report.created.contains(&"verts[3]".to_string()));
    assert!(report
        .created
        .contains(&r#"uv_layers["UVMap"].data[3].uv"#.to_string()));

    let insert = ov
        .operation_find("verts", None, None, Some(2), Some(3))
        .expect("insertion by position");
    assert_eq!(insert.kind, OverrideOpKind::InsertAfter);

    let dst = common::mesh_pointer(&registry, common::mesh());
    let applied = apply(&dst, &local, None, &ov).expect("apply");
    assert!(applied.warnings.is_empty(), "{:?}", applied.warnings);
    assert_eq!(applied.inserted, 1);

    let mut check = LibraryOverride::new();
    let after = diff(&dst, &local, &mut check, DiffOptions::default()).expect("diff");
    assert!(after.matching, "{:?}", after);
}

#[test]
fn test_additive_weight_tracks_the_reference() {
    let registry = common::registry();
    let reference = common::mesh_pointer(&registry, common::mesh());
    let mut edited = common::mesh();
    edited.verts[0].weight = 0.75;
    let local = common::mesh_pointer(&registry, edited);

    let mut ov = LibraryOverride::new();
    let (weight, _) = ov.ensure_property("verts[0].weight");
    weight.operations.push(OverrideOperation::new(OverrideOpKind::Add));
    let stored = store(&reference, &local, None, &mut ov).expect("store");
    assert_eq!(stored.stored, 1);

    // The linked mesh changes; the local offset of +0.25 is kept.
    let mut reloaded = common::mesh();
    reloaded.verts[0].weight = 0.25;
    let dst = common::mesh_pointer(&registry, reloaded);
    apply(&dst, &local, None, &ov).expect("apply");

    let vertex = dst.resolve_pointer("verts[0]").expect("vertex");
    let weight = vertex.find_property("weight").expect("weight");
    assert!((vertex.get_float(&weight) - 0.5).abs() < 1e-6);

    // Offsets that overshoot the hard range are clamped on write.
    let mut high = common::mesh();
    high.verts[0].weight = 0.9;
    let dst = common::mesh_pointer(&registry, high);
    apply(&dst, &local, None, &ov).expect("apply");
    let vertex = dst.resolve_pointer("verts[0]").expect("vertex");
    assert_eq!(vertex.get_float(&weight), 1.0);
}

#[test]
#[cfg(feature = "serde")]
fn test_persisted_override_applies_identically() {
    use rna::liboverride::persist;

    let registry = common::registry();
    let reference = common::mesh_pointer(&registry, common::mesh());
    let mut edited = common::mesh();
    edited.verts[2].weight = 0.125;
    let local = common::mesh_pointer(&registry, edited);

    let mut ov = LibraryOverride::with_reference("Square");
    diff(&reference, &local, &mut ov, DiffOptions::default()).expect("diff");

    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("square.override.json");
    persist::save(&ov, &file).expect("save");
    let loaded = persist::load(&file).expect("load");
    assert_eq!(loaded, ov);

    let dst = common::mesh_pointer(&registry, common::mesh());
    let report = apply(&dst, &local, None, &loaded).expect("apply");
    assert_eq!(report.applied, 1);
    let weight = dst.resolve_path("verts[2].weight").expect("weight");
    assert_eq!(weight.pointer.get_float(&weight.property), 0.125);
}
