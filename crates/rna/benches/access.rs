// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//!
//! Benchmark: generic access overhead
//!
//! Typed get/set through descriptors, collection iteration and path
//! resolution on a flat model.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rna::define::{field, PropertyBuilder, StructBuilder};
use rna::path::resolve;
use rna::{IdRef, Pointer, Registry};

#[derive(Debug, Default, Clone)]
struct Sample {
    name: String,
    value: f32,
}

#[derive(Debug, Default)]
struct Bank {
    samples: Vec<Sample>,
}

fn setup(count: usize) -> (Registry, Pointer) {
    let registry = Registry::new();
    StructBuilder::new("Sample")
        .property(PropertyBuilder::string(
            "name",
            field(|s: &Sample| &s.name, |s| &mut s.name),
        ))
        .property(
            PropertyBuilder::float("value", field(|s: &Sample| &s.value, |s| &mut s.value))
                .range(0.0, 1.0),
        )
        .name_property("name")
        .register(&registry)
        .expect("Sample");
    let bank = StructBuilder::new("Bank")
        .property(PropertyBuilder::vec_collection::<Bank, Sample>(
            "samples",
            "Sample",
            field(|b: &Bank| &b.samples, |b| &mut b.samples),
        ))
        .register(&registry)
        .expect("Bank");

    let data = Bank {
        samples: (0..count)
            .map(|i| Sample {
                name: format!("s{}", i),
                value: 0.5,
            })
            .collect(),
    };
    let ptr = Pointer::from_data(&bank, &IdRef::new(data));
    (registry, ptr)
}

fn bench_float_get_set(c: &mut Criterion) {
    let (_registry, bank) = setup(1);
    let samples = bank.find_property("samples").expect("samples");
    let sample = bank.collection_lookup_int(&samples, 0).expect("sample");
    let value = sample.find_property("value").expect("value");

    c.bench_function("float_set_get", |b| {
        b.iter(|| {
            sample.set_float(&value, black_box(1.5));
            black_box(sample.get_float(&value))
        });
    });
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_iter");
    for count in [16usize, 256, 4096] {
        let (_registry, bank) = setup(count);
        let samples = bank.find_property("samples").expect("samples");
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(bank.collection_begin(&samples).count()));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let (_registry, bank) = setup(256);
    c.bench_function("resolve_by_key", |b| {
        b.iter(|| black_box(resolve(&bank, black_box(r#"samples["s200"].value"#)).is_ok()));
    });
    c.bench_function("resolve_by_index", |b| {
        b.iter(|| black_box(resolve(&bank, black_box("samples[200].value")).is_ok()));
    });
}

criterion_group!(access_benches, bench_float_get_set, bench_iteration, bench_resolve);
criterion_main!(access_benches);
