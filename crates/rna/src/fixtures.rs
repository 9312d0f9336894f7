// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared test data model: a scene with nested, listed and referenced data.

use crate::define::{field, ListBase, PropertyBuilder, StructBuilder};
use crate::pointer::{IdRef, Pointer};
use crate::registry::Registry;
use crate::types::{EnumItem, OverrideFlags, PropertyFlags, StructFlags};

#[derive(Debug, Default, Clone)]
pub struct Point {
    pub x: f32,
    pub tag: String,
}

#[derive(Debug, Default, Clone)]
pub struct Item {
    pub name: String,
    pub value: i32,
    pub hidden: bool,
}

impl Item {
    pub fn new(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value,
            hidden: false,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Camera {
    pub name: String,
    pub lens: f32,
}

#[derive(Debug, Default)]
pub struct Scene {
    pub name: String,
    pub frame: i32,
    pub scale: f32,
    pub location: [f32; 3],
    pub flags: u32,
    pub mode: i32,
    pub locked: i32,
    pub items: Vec<Item>,
    pub layers: ListBase<Item>,
    pub point: Point,
    pub camera: Option<IdRef>,
    pub cameras: Vec<IdRef>,
}

/// Flat struct exercising every access path.
#[derive(Debug, Default)]
pub struct Settings {
    pub flags: u32,
    pub toggles: [bool; 3],
    pub counts: [i32; 4],
    pub weights: [f32; 2],
    pub label: String,
    pub channels: i32,
    pub frozen: bool,
    pub gated: i32,
    pub camera: Option<IdRef>,
}

pub const CHANNEL_R: i32 = 1;
pub const CHANNEL_G: i32 = 2;
pub const CHANNEL_B: i32 = 4;

pub const MODE_OBJECT: i32 = 0;
pub const MODE_EDIT: i32 = 1;

pub fn registry() -> Registry {
    let registry = Registry::new();

    StructBuilder::new("Point")
        .property(
            PropertyBuilder::float("x", field(|p: &Point| &p.x, |p| &mut p.x))
                .range(0.0, 1.0)
                .overridable(),
        )
        .property(PropertyBuilder::string("tag", field(|p: &Point| &p.tag, |p| &mut p.tag)))
        .name_property("tag")
        .register(&registry)
        .expect("Point");

    StructBuilder::new("Item")
        .property(
            PropertyBuilder::string("name", field(|i: &Item| &i.name, |i| &mut i.name))
                .overridable(),
        )
        .property(
            PropertyBuilder::int("value", field(|i: &Item| &i.value, |i| &mut i.value))
                .overridable(),
        )
        .property(PropertyBuilder::boolean(
            "hidden",
            field(|i: &Item| &i.hidden, |i| &mut i.hidden),
        ))
        .name_property("name")
        .register(&registry)
        .expect("Item");

    StructBuilder::new("Camera")
        .flags(StructFlags::IS_ID)
        .property(PropertyBuilder::string("name", field(|c: &Camera| &c.name, |c| &mut c.name)))
        .property(
            PropertyBuilder::float("lens", field(|c: &Camera| &c.lens, |c| &mut c.lens))
                .range(1.0, 5000.0)
                .overridable(),
        )
        .name_property("name")
        .register(&registry)
        .expect("Camera");

    StructBuilder::new("Settings")
        .property(PropertyBuilder::bool_bit(
            "show_grid",
            field(|s: &Settings| &s.flags, |s| &mut s.flags),
            0x1,
        ))
        .property(
            PropertyBuilder::bool_bit(
                "hide_axes",
                field(|s: &Settings| &s.flags, |s| &mut s.flags),
                0x2,
            )
            .negated(),
        )
        .property(PropertyBuilder::bool_bit(
            "show_pair",
            field(|s: &Settings| &s.flags, |s| &mut s.flags),
            0xC,
        ))
        .property(PropertyBuilder::bool_array(
            "toggles",
            field(|s: &Settings| &s.toggles, |s| &mut s.toggles),
        ))
        .property(
            PropertyBuilder::int_array("counts", field(|s: &Settings| &s.counts, |s| &mut s.counts))
                .range(0.0, 10.0),
        )
        .property(
            PropertyBuilder::float_array(
                "weights",
                field(|s: &Settings| &s.weights, |s| &mut s.weights),
            )
            .range(0.0, 1.0)
            .step(0.05)
            .precision(5),
        )
        .property(
            PropertyBuilder::string("label", field(|s: &Settings| &s.label, |s| &mut s.label))
                .max_length(5),
        )
        .property(
            PropertyBuilder::enumeration(
                "channels",
                field(|s: &Settings| &s.channels, |s| &mut s.channels),
                vec![
                    EnumItem::new("R", CHANNEL_R),
                    EnumItem::new("G", CHANNEL_G),
                    EnumItem::new("B", CHANNEL_B),
                ],
            )
            .enum_flag(),
        )
        .property(PropertyBuilder::boolean(
            "frozen",
            field(|s: &Settings| &s.frozen, |s| &mut s.frozen),
        ))
        .property(
            PropertyBuilder::int("gated", field(|s: &Settings| &s.gated, |s| &mut s.gated))
                .range(-100.0, 100.0)
                .step(5.0)
                .editable_fn(|s: &Settings| !s.frozen),
        )
        .property(
            PropertyBuilder::id_pointer(
                "camera",
                "Camera",
                field(|s: &Settings| &s.camera, |s| &mut s.camera),
            )
            .flag(PropertyFlags::EDITABLE | PropertyFlags::NEVER_NULL),
        )
        .register(&registry)
        .expect("Settings");

    StructBuilder::new("Scene")
        .flags(StructFlags::IS_ID)
        .property(PropertyBuilder::string("name", field(|s: &Scene| &s.name, |s| &mut s.name)))
        .property(
            PropertyBuilder::int("frame", field(|s: &Scene| &s.frame, |s| &mut s.frame))
                .range(0.0, 1000.0)
                .overridable(),
        )
        .property(
            PropertyBuilder::float("scale", field(|s: &Scene| &s.scale, |s| &mut s.scale))
                .range(0.0, 100.0)
                .overridable(),
        )
        .property(
            PropertyBuilder::float_array(
                "location",
                field(|s: &Scene| &s.location, |s| &mut s.location),
            )
            .overridable(),
        )
        .property(PropertyBuilder::bool_bit(
            "show_grid",
            field(|s: &Scene| &s.flags, |s| &mut s.flags),
            0x1,
        ))
        .property(
            PropertyBuilder::enumeration(
                "mode",
                field(|s: &Scene| &s.mode, |s| &mut s.mode),
                vec![
                    EnumItem::new("OBJECT", MODE_OBJECT),
                    EnumItem::new("EDIT", MODE_EDIT),
                ],
            )
            .overridable(),
        )
        .property(
            PropertyBuilder::int("locked", field(|s: &Scene| &s.locked, |s| &mut s.locked))
                .read_only(),
        )
        .property(
            PropertyBuilder::vec_collection::<Scene, Item>(
                "items",
                "Item",
                field(|s: &Scene| &s.items, |s| &mut s.items),
            )
            .override_flags(OverrideFlags::OVERRIDABLE | OverrideFlags::SUPPORTS_INSERTION),
        )
        .property(
            PropertyBuilder::list_collection::<Scene, Item>(
                "layers",
                "Item",
                field(|s: &Scene| &s.layers, |s| &mut s.layers),
            )
            .skip(|i: &Item| i.hidden),
        )
        .property(
            PropertyBuilder::nested("point", "Point", field(|s: &Scene| &s.point, |s| &mut s.point))
                .overridable(),
        )
        .property(
            PropertyBuilder::id_pointer(
                "camera",
                "Camera",
                field(|s: &Scene| &s.camera, |s| &mut s.camera),
            )
            .flag(PropertyFlags::EDITABLE)
            .overridable(),
        )
        .property(PropertyBuilder::id_vec_collection(
            "cameras",
            "Camera",
            field(|s: &Scene| &s.cameras, |s| &mut s.cameras),
        ))
        .name_property("name")
        .iterator_property("items")
        .register(&registry)
        .expect("Scene");

    registry
}

pub fn scene() -> Scene {
    Scene {
        name: "Main".to_string(),
        frame: 10,
        scale: 1.0,
        items: vec![Item::new("a", 1), Item::new("b\"q", 2), Item::new("c", 3)],
        layers: [Item::new("base", 0), Item::new("ghost", 0), Item::new("top", 0)]
            .into_iter()
            .map(|mut i| {
                i.hidden = i.name == "ghost";
                i
            })
            .collect(),
        point: Point {
            x: 0.5,
            tag: "origin".to_string(),
        },
        ..Default::default()
    }
}

pub fn scene_pointer(registry: &Registry, scene: Scene) -> Pointer {
    let def = registry.find("Scene").expect("Scene registered");
    Pointer::from_id(&def, &IdRef::new(scene))
}

pub fn camera_pointer(registry: &Registry, name: &str, lens: f32) -> Pointer {
    let def = registry.find("Camera").expect("Camera registered");
    let camera = Camera {
        name: name.to_string(),
        lens,
    };
    Pointer::from_id(&def, &IdRef::new(camera))
}

pub fn settings_pointer(registry: &Registry, settings: Settings) -> Pointer {
    let def = registry.find("Settings").expect("Settings registered");
    Pointer::from_data(&def, &IdRef::new(settings))
}
