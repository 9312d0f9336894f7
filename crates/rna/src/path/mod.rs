// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property paths: parsing, resolution and reconstruction.
//!
//! Paths are the persisted addressing format shared by animation, scripting
//! and override storage, e.g. `uv_layers["UVMap"].data[3]`. Rebuilding a path
//! with [`path_from_owner`] and resolving it again yields the same property.

mod build;
mod parse;
mod resolve;

pub use build::{path_from_owner, segments_from_owner};
pub(crate) use build::item_segment;
pub use parse::{escape, format, parse, Segment};
pub use resolve::{resolve, resolve_pointer, ResolvedPath};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathError;
    use crate::fixtures;
    use crate::pointer::Pointer;

    fn setup() -> (crate::registry::Registry, Pointer) {
        let registry = fixtures::registry();
        let scene = fixtures::scene_pointer(&registry, fixtures::scene());
        (registry, scene)
    }

    #[test]
    fn test_resolve_scalar_and_element() {
        let (_registry, scene) = setup();

        let frame = resolve(&scene, "frame").expect("frame");
        assert_eq!(frame.property.identifier, "frame");
        assert_eq!(frame.index, None);
        assert!(frame.pointer.same_data(&scene));

        let z = resolve(&scene, "location[2]").expect("location[2]");
        assert_eq!(z.index, Some(2));
        assert!(matches!(
            resolve(&scene, "location[3]"),
            Err(PathError::NotFound { .. })
        ));
    }

    #[test]
    fn test_nested_pointer_matches_direct_access() {
        let (_registry, scene) = setup();
        let point_prop = scene.find_property("point").expect("point");
        let direct = scene.get_pointer(&point_prop);

        let resolved = resolve(&scene, "point.tag").expect("point.tag");
        assert!(resolved.pointer.same_data(&direct));
        assert_eq!(resolved.pointer.get_string(&resolved.property), "origin");
        assert!(resolve_pointer(&scene, "point").expect("struct").same_data(&direct));
    }

    #[test]
    fn test_quoted_key_with_escapes() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");
        let second = scene.collection_lookup_int(&items, 1).expect("second");

        let path = format!("items[\"{}\"]", escape("b\"q"));
        assert_eq!(path, r#"items["b\"q"]"#);
        let resolved = resolve(&scene, &path).expect("quoted key");
        assert_eq!(resolved.index, Some(1));
        assert!(resolved.item.expect("item").same_data(&second));

        let value = resolve(&scene, r#"items["b\"q"].value"#).expect("value");
        assert_eq!(value.pointer.get_int(&value.property), 2);
    }

    #[test]
    fn test_iterator_property_bracket() {
        let (_registry, scene) = setup();
        let item = resolve_pointer(&scene, "[2]").expect("iterator index");
        assert_eq!(item.name().as_deref(), Some("c"));
        let by_name = resolve_pointer(&scene, "[\"a\"]").expect("iterator key");
        assert_eq!(by_name.name().as_deref(), Some("a"));
    }

    #[test]
    fn test_failures_are_total() {
        let (_registry, scene) = setup();
        let cases = [
            ("missing", "NotFound"),
            ("items[7]", "NotFound"),
            ("items[\"zz\"]", "NotFound"),
            ("camera.lens", "NotFound"),
            ("frame.x", "TypeMismatch"),
            ("frame[0]", "TypeMismatch"),
            ("location[\"x\"]", "TypeMismatch"),
            ("items.name", "TypeMismatch"),
            ("location[0][0]", "TypeMismatch"),
            ("point..tag", "Syntax"),
        ];
        for (path, expected) in cases {
            let got = match resolve(&scene, path) {
                Err(PathError::NotFound { .. }) => "NotFound",
                Err(PathError::TypeMismatch { .. }) => "TypeMismatch",
                Err(PathError::Syntax { .. }) => "Syntax",
                Ok(_) => "Ok",
            };
            assert_eq!(got, expected, "{}", path);
        }
        assert!(resolve(&Pointer::null(), "frame").is_err());
        assert!(matches!(
            resolve_pointer(&scene, "frame"),
            Err(PathError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_path_from_owner_round_trip() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");
        let second = scene.collection_lookup_int(&items, 1).expect("second");
        let value = second.find_property("value").expect("value");

        let path = second.path_from_owner(Some(&value), None).expect("path");
        assert_eq!(path, r#"items["b\"q"].value"#);
        let resolved = resolve(&scene, &path).expect("resolves");
        assert!(resolved.pointer.same_data(&second));

        let location = scene.find_property("location").expect("location");
        assert_eq!(
            scene.path_from_owner(Some(&location), Some(1)).as_deref(),
            Some("location[1]")
        );
        assert_eq!(scene.path_from_owner(None, None).as_deref(), Some(""));
    }

    #[test]
    fn test_path_from_owner_uses_positions_for_duplicate_names() {
        let registry = fixtures::registry();
        let mut data = fixtures::scene();
        data.items[2].name = "a".to_string();
        let scene = fixtures::scene_pointer(&registry, data);
        let items = scene.find_property("items").expect("items");

        let third = scene.collection_lookup_int(&items, 2).expect("third");
        assert_eq!(third.path_from_owner(None, None).as_deref(), Some("items[2]"));
        let first = scene.collection_lookup_int(&items, 0).expect("first");
        assert_eq!(first.path_from_owner(None, None).as_deref(), Some("items[\"a\"]"));
    }
}
