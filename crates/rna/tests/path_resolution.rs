// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Path resolution against a nested mesh model.

mod common;

use rna::path::{self, resolve, resolve_pointer, Segment};
use rna::PathError;

#[test]
fn test_deep_path_reaches_element() {
    common::init_logging();
    let registry = common::registry();
    let mesh = common::mesh_pointer(&registry, common::mesh());

    let resolved = resolve(&mesh, r#"uv_layers["UVMap"].data[3].uv[1]"#).expect("resolves");
    assert_eq!(resolved.property.identifier, "uv");
    assert_eq!(resolved.index, Some(1));
    assert_eq!(resolved.pointer.get_float_index(&resolved.property, 1), 1.0);

    let layers = mesh.find_property("uv_layers").expect("uv_layers");
    let layer = mesh.collection_lookup_string(&layers, "UVMap").expect("layer");
    let data = layer.find_property("data").expect("data");
    let direct = layer.collection_lookup_int(&data, 3).expect("fourth uv");
    assert!(resolved.pointer.same_data(&direct));
}

#[test]
fn test_rebuilt_paths_resolve_to_the_same_data() {
    let registry = common::registry();
    let mesh = common::mesh_pointer(&registry, common::mesh());
    let uv = resolve_pointer(&mesh, r#"uv_layers["UVMap"].data[2]"#).expect("uv");
    let uv_prop = uv.find_property("uv").expect("uv");

    let rebuilt = uv.path_from_owner(Some(&uv_prop), Some(0)).expect("path");
    assert_eq!(rebuilt, r#"uv_layers["UVMap"].data[2].uv[0]"#);
    let again = resolve(&mesh, &rebuilt).expect("resolves");
    assert!(again.pointer.same_data(&uv));
    assert_eq!(again.index, Some(0));

    // Vertices have no name property, so they are addressed by position.
    let vertex = resolve_pointer(&mesh, "verts[1]").expect("vertex");
    assert_eq!(vertex.path_from_owner(None, None).as_deref(), Some("verts[1]"));
}

#[test]
fn test_parse_and_format_agree() {
    let segments = path::parse(r#"uv_layers["a\\b\"c"].data[0]"#).expect("parse");
    assert_eq!(
        segments,
        vec![
            Segment::Property("uv_layers".to_string()),
            Segment::Key("a\\b\"c".to_string()),
            Segment::Property("data".to_string()),
            Segment::Index(0),
        ]
    );
    assert_eq!(path::format(&segments), r#"uv_layers["a\\b\"c"].data[0]"#);
}

#[test]
fn test_failed_resolution_has_no_partial_result() {
    let registry = common::registry();
    let mesh = common::mesh_pointer(&registry, common::mesh());

    assert!(matches!(
        resolve(&mesh, r#"uv_layers["Missing"].data[0]"#),
        Err(PathError::NotFound { .. })
    ));
    assert!(matches!(
        resolve(&mesh, "verts[0].co[1].x"),
        Err(PathError::TypeMismatch { .. })
    ));
    assert!(matches!(
        resolve(&mesh, r#"verts["unterminated]"#),
        Err(PathError::Syntax { .. })
    ));
}
