// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # RNA - runtime property reflection
//!
//! Exposes native data structures of unrelated shapes through one uniform
//! interface for reading, writing, iterating and diffing properties, without
//! callers knowing the underlying layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use rna::define::{field, PropertyBuilder, StructBuilder};
//! use rna::path::resolve;
//! use rna::pointer::{IdRef, Pointer};
//! use rna::registry::Registry;
//!
//! #[derive(Default)]
//! struct Point { x: f32, tag: String }
//!
//! let registry = Registry::new();
//! let def = StructBuilder::new("Point")
//!     .property(PropertyBuilder::float("x", field(|p: &Point| &p.x, |p| &mut p.x)).range(0.0, 1.0))
//!     .property(PropertyBuilder::string("tag", field(|p: &Point| &p.tag, |p| &mut p.tag)))
//!     .register(&registry)?;
//!
//! let point = Pointer::from_data(&def, &IdRef::new(Point::default()));
//! let x = point.find_property("x").expect("declared above");
//! point.set_float(&x, 1.5);
//! assert_eq!(point.get_float(&x), 1.0);
//!
//! let tag = resolve(&point, "tag")?;
//! point.set_string(&tag.property, "a\"b");
//! assert_eq!(point.get_string(&tag.property), "a\"b");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  liboverride   diff -> store -> apply, JSON persistence       |
//! +---------------------------------------------------------------+
//! |  path          parse | resolve | path_from_owner              |
//! +---------------------------------------------------------------+
//! |  collection    cursors | lookup | structural edits            |
//! +---------------------------------------------------------------+
//! |  access        typed get/set on Pointer, clamping, policies   |
//! +---------------------------------------------------------------+
//! |  pointer       (owner, struct, data location) handles         |
//! +---------------------------------------------------------------+
//! |  types/define  descriptors and the builders producing them    |
//! |  registry      name map, seal phase, extension registration   |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Registry`] | Owns struct descriptors, looked up by identifier |
//! | [`Pointer`] | Handle to one struct instance |
//! | [`Value`] | Detached scalar or array value |
//! | [`CollectionIter`](collection::CollectionIter) | Cursor over a collection property |
//! | [`LibraryOverride`](liboverride::LibraryOverride) | Persistent override record of one ID |
//!
//! ## Features
//!
//! - `serde` (default): serialization of values, configuration and override
//!   records, plus [`liboverride::persist`].

mod access;
/// Collection iteration, lookup and structural edits.
pub mod collection;
/// Static limits and runtime access configuration.
pub mod config;
/// Builders producing struct and property descriptors.
pub mod define;
/// Error types.
pub mod error;
/// Library override engine.
pub mod liboverride;
/// Property path parsing, resolution and reconstruction.
pub mod path;
/// Instance handles and identity cells.
pub mod pointer;
/// Type registry.
pub mod registry;
/// Struct and property descriptors.
pub mod types;
/// Detached property values.
pub mod value;

#[cfg(test)]
mod fixtures;

pub use error::{AccessError, OverrideError, OverrideWarning, PathError, RegistryError};
pub use pointer::{IdRef, Pointer};
pub use registry::Registry;
pub use value::Value;

#[cfg(test)]
mod tests {
    use crate::define::{field, PropertyBuilder, StructBuilder};
    use crate::path::{escape, resolve};
    use crate::pointer::{IdRef, Pointer};
    use crate::registry::Registry;

    #[derive(Debug, Default, Clone)]
    struct Point {
        x: f32,
        tag: String,
    }

    #[derive(Debug, Default)]
    struct Cloud {
        points: Vec<Point>,
    }

    fn cloud_registry() -> Registry {
        let registry = Registry::new();
        StructBuilder::new("Point")
            .property(
                PropertyBuilder::float("x", field(|p: &Point| &p.x, |p| &mut p.x)).range(0.0, 1.0),
            )
            .property(PropertyBuilder::string("tag", field(|p: &Point| &p.tag, |p| &mut p.tag)))
            .name_property("tag")
            .register(&registry)
            .expect("Point");
        StructBuilder::new("Cloud")
            .property(PropertyBuilder::vec_collection::<Cloud, Point>(
                "points",
                "Point",
                field(|c: &Cloud| &c.points, |c| &mut c.points),
            ))
            .register(&registry)
            .expect("Cloud");
        registry
    }

    fn cloud(registry: &Registry, tags: &[&str]) -> Pointer {
        let data = Cloud {
            points: tags
                .iter()
                .map(|t| Point {
                    x: 0.0,
                    tag: (*t).to_string(),
                })
                .collect(),
        };
        let def = registry.find("Cloud").expect("Cloud");
        Pointer::from_data(&def, &IdRef::new(data))
    }

    #[test]
    fn test_point_clamps_to_hard_max() {
        let registry = cloud_registry();
        let def = registry.find("Point").expect("Point");
        let point = Pointer::from_data(&def, &IdRef::new(Point::default()));
        let x = point.find_property("x").expect("x");

        point.set_float(&x, 1.5);
        assert_eq!(point.get_float(&x), 1.0);
        point.set_float(&x, -3.0);
        assert_eq!(point.get_float(&x), 0.0);
    }

    #[test]
    fn test_point_tag_path_and_direct_access_agree() {
        let registry = cloud_registry();
        let cloud = cloud(&registry, &["a\"b"]);
        let points = cloud.find_property("points").expect("points");
        let first = cloud.collection_lookup_int(&points, 0).expect("first");

        let path = format!("points[\"{}\"].tag", escape("a\"b"));
        let resolved = resolve(&cloud, &path).expect("resolves");
        assert!(resolved.pointer.same_data(&first));
        assert_eq!(resolved.pointer.get_string(&resolved.property), "a\"b");
    }

    #[test]
    fn test_three_points_iterate_three_times() {
        let registry = cloud_registry();
        let cloud = cloud(&registry, &["p0", "p1", "p2"]);
        let points = cloud.find_property("points").expect("points");

        let mut iter = cloud.collection_begin(&points);
        let mut steps = 0;
        while iter.valid() {
            steps += 1;
            iter.advance();
        }
        assert_eq!(steps, 3);
        assert!(iter.get().is_null());

        let second = cloud.collection_lookup_int(&points, 1).expect("second");
        let iterated = cloud.collection_begin(&points).nth(1).expect("second");
        assert!(second.same_data(&iterated));
        assert_eq!(second.name().as_deref(), Some("p1"));
    }

    #[test]
    fn test_random_writes_stay_in_range() {
        let registry = cloud_registry();
        let def = registry.find("Point").expect("Point");
        let point = Pointer::from_data(&def, &IdRef::new(Point::default()));
        let x = point.find_property("x").expect("x");

        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let v = rng.f32() * 4.0 - 2.0;
            point.set_float(&x, v);
            let got = point.get_float(&x);
            assert!((0.0..=1.0).contains(&got));
            if (0.0..=1.0).contains(&v) {
                assert_eq!(got, v);
            }
        }
    }
}
