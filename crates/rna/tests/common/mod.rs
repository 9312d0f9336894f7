// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mesh data model shared by the integration tests.

#![allow(dead_code)]

use rna::define::{field, PropertyBuilder, StructBuilder};
use rna::types::{OverrideFlags, StructFlags};
use rna::{IdRef, Pointer, Registry};

#[derive(Debug, Default, Clone)]
pub struct Vertex {
    pub co: [f32; 3],
    pub weight: f32,
}

#[derive(Debug, Default, Clone)]
pub struct Uv {
    pub uv: [f32; 2],
}

#[derive(Debug, Default, Clone)]
pub struct UvLayer {
    pub name: String,
    pub data: Vec<Uv>,
}

#[derive(Debug, Default, Clone)]
pub struct Mesh {
    pub name: String,
    pub verts: Vec<Vertex>,
    pub uv_layers: Vec<UvLayer>,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn registry() -> Registry {
    let registry = Registry::new();

    StructBuilder::new("Vertex")
        .property(
            PropertyBuilder::float_array("co", field(|v: &Vertex| &v.co, |v| &mut v.co))
                .overridable(),
        )
        .property(
            PropertyBuilder::float("weight", field(|v: &Vertex| &v.weight, |v| &mut v.weight))
                .range(0.0, 1.0)
                .overridable(),
        )
        .register(&registry)
        .expect("Vertex");

    StructBuilder::new("Uv")
        .property(
            PropertyBuilder::float_array("uv", field(|u: &Uv| &u.uv, |u| &mut u.uv))
                .overridable(),
        )
        .register(&registry)
        .expect("Uv");

    StructBuilder::new("UvLayer")
        .property(PropertyBuilder::string(
            "name",
            field(|l: &UvLayer| &l.name, |l| &mut l.name),
        ))
        .property(
            PropertyBuilder::vec_collection::<UvLayer, Uv>(
                "data",
                "Uv",
                field(|l: &UvLayer| &l.data, |l| &mut l.data),
            )
            .overridable(),
        )
        .name_property("name")
        .register(&registry)
        .expect("UvLayer");

    StructBuilder::new("Mesh")
        .flags(StructFlags::IS_ID)
        .property(PropertyBuilder::string("name", field(|m: &Mesh| &m.name, |m| &mut m.name)))
        .property(
            PropertyBuilder::vec_collection::<Mesh, Vertex>(
                "verts",
                "Vertex",
                field(|m: &Mesh| &m.verts, |m| &mut m.verts),
            )
            .override_flags(OverrideFlags::OVERRIDABLE | OverrideFlags::SUPPORTS_INSERTION),
        )
        .property(
            PropertyBuilder::vec_collection::<Mesh, UvLayer>(
                "uv_layers",
                "UvLayer",
                field(|m: &Mesh| &m.uv_layers, |m| &mut m.uv_layers),
            )
            .overridable(),
        )
        .name_property("name")
        .register(&registry)
        .expect("Mesh");

    registry
}

/// Unit-square mesh: three vertices and one `UVMap` layer of four UVs.
pub fn mesh() -> Mesh {
    let vertex = |x: f32, y: f32| Vertex {
        co: [x, y, 0.0],
        weight: 0.5,
    };
    let uv = |u: f32, v: f32| Uv { uv: [u, v] };
    Mesh {
        name: "Square".to_string(),
        verts: vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(1.0, 1.0)],
        uv_layers: vec![UvLayer {
            name: "UVMap".to_string(),
            data: vec![uv(0.0, 0.0), uv(1.0, 0.0), uv(1.0, 1.0), uv(0.0, 1.0)],
        }],
    }
}

pub fn mesh_pointer(registry: &Registry, mesh: Mesh) -> Pointer {
    let def = registry.find("Mesh").expect("Mesh registered");
    Pointer::from_id(&def, &IdRef::new(mesh))
}
