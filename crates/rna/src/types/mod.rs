// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct and property descriptors.
//!
//! A [`StructDef`] describes one kind of record; each of its [`PropertyDef`]s
//! carries metadata plus a [`PropertyType`] bundle of type-erased callbacks
//! that read and write the native field.

mod callbacks;
mod flags;
mod numeric;
mod property;
mod reference;
mod structure;
mod text;

pub use callbacks::{
    item_fn, item_mut_fn, projector, projector_mut, ArrayGetter, ArraySetter, EditableFn,
    EnumItemsFn, FirstFn, Getter, ItemFn, ItemIdFn, ItemMutFn, LengthFn, LookupIntFn,
    LookupStringFn, NextFn, Projector, ProjectorMut, RangeFn, RefineFn, Setter, SkipFn,
};
pub use flags::{OverrideFlags, PropertyFlags, StructFlags};
pub use numeric::{Access, BitField, BoolDef, BoolStorage, FlagBits, FloatDef, IntDef};
pub use property::{ArrayShape, PropertyDef, PropertyKind, PropertyRef, PropertyType, Subtype};
pub use reference::{
    ClearFn, CollectionDef, CollectionEdit, CollectionStorage, DuplicateFn, InsertAt, InsertFn,
    ItemAccess, ItemSource, MoveFn, PointerAccess, PointerDef, RemoveFn,
};
pub use structure::{PropertyIndex, StructDef, StructRef};
pub use text::{EnumDef, EnumItem, EnumItems, StringDef};
