// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection iteration protocol.
//!
//! [`begin`] positions a [`CollectionIter`] on the first visible item;
//! [`advance`](CollectionIter::advance) moves it forward until
//! [`valid`](CollectionIter::valid) turns false. Skipped items are never
//! exposed. The iterator also implements [`Iterator`].

mod edit;
mod lookup;

pub use lookup::LengthCost;

use crate::pointer::{Pointer, Step};
use crate::types::{
    CollectionDef, CollectionStorage, ItemAccess, PropertyDef, PropertyRef, PropertyType, StructRef,
};
use std::fmt;

pub(crate) fn collection_def(prop: &PropertyDef) -> Option<&CollectionDef> {
    match &prop.ty {
        PropertyType::Collection(def) => Some(def),
        _ => None,
    }
}

/// Handle to the item stored under `key`.
pub(crate) fn item_pointer(
    parent: &Pointer,
    prop: &PropertyRef,
    def: &CollectionDef,
    item_type: &StructRef,
    key: usize,
) -> Pointer {
    match &def.items {
        ItemAccess::Embedded { .. } => parent.child(
            item_type,
            Step::Item {
                prop: PropertyRef::clone(prop),
                key,
            },
        ),
        ItemAccess::Id { get } => match parent.read(|d| get(d, key)).flatten() {
            Some(id) => Pointer::from_id(item_type, &id),
            None => Pointer::null(),
        },
    }
}

/// Every storage key in storage order, skipped items included.
pub(crate) fn raw_keys(parent: &Pointer, def: &CollectionDef) -> Vec<usize> {
    parent
        .read(|d| match &def.storage {
            CollectionStorage::Array { len } => (0..len(d)).collect(),
            CollectionStorage::Counted { count } => (0..count(d)).collect(),
            CollectionStorage::List { first, next } => {
                let mut keys = Vec::new();
                let mut key = first(d);
                while let Some(k) = key {
                    keys.push(k);
                    key = next(d, k);
                }
                keys
            }
        })
        .unwrap_or_default()
}

/// Visible storage keys in iteration order.
pub(crate) fn visible_keys(parent: &Pointer, def: &CollectionDef) -> Vec<usize> {
    let keys = raw_keys(parent, def);
    if def.skip.is_none() {
        return keys;
    }
    parent
        .read(|d| keys.into_iter().filter(|&k| !def.skipped(d, k)).collect())
        .unwrap_or_default()
}

enum CursorState {
    Array { index: usize, len: usize },
    List { key: Option<usize> },
    Counted { index: usize, count: usize },
    /// Keys collected up front into a scratch buffer.
    Materialized { keys: Vec<usize>, pos: usize },
    Done,
}

/// Cursor over the items of one collection property.
pub struct CollectionIter {
    parent: Pointer,
    prop: PropertyRef,
    item_type: Option<StructRef>,
    state: CursorState,
    current: Pointer,
    key: Option<usize>,
    position: usize,
    valid: bool,
}

/// Start iterating `prop` on `ptr`.
///
/// The cursor is already past the end when the collection is empty, the
/// property is not a collection or the item struct is not registered.
pub fn begin(ptr: &Pointer, prop: &PropertyRef) -> CollectionIter {
    let mut iter = CollectionIter::terminal(ptr, prop);
    let Some((def, _)) = iter.resolve() else {
        return iter;
    };
    let state = ptr
        .read(|d| match &def.storage {
            CollectionStorage::Array { len } => CursorState::Array {
                index: 0,
                len: len(d),
            },
            CollectionStorage::List { first, .. } => CursorState::List { key: first(d) },
            CollectionStorage::Counted { count } => CursorState::Counted {
                index: 0,
                count: count(d),
            },
        })
        .unwrap_or(CursorState::Done);
    iter.state = state;
    iter.seek();
    iter
}

/// Start iterating over a scratch snapshot of the visible keys.
///
/// Structural edits made during iteration do not affect the snapshot.
pub fn begin_materialized(ptr: &Pointer, prop: &PropertyRef) -> CollectionIter {
    let mut iter = CollectionIter::terminal(ptr, prop);
    let Some((def, _)) = iter.resolve() else {
        return iter;
    };
    let keys = visible_keys(ptr, def);
    log::trace!(
        "[collection::begin_materialized] '{}' scratch of {} keys",
        prop.identifier,
        keys.len()
    );
    iter.state = CursorState::Materialized { keys, pos: 0 };
    iter.seek();
    iter
}

impl CollectionIter {
    fn terminal(ptr: &Pointer, prop: &PropertyRef) -> Self {
        let item_type = collection_def(prop).and_then(|def| ptr.lookup_struct(&def.item_type));
        if collection_def(prop).is_some() && item_type.is_none() {
            log::debug!(
                "[collection::begin] '{}' item struct is not registered",
                prop.identifier
            );
        }
        Self {
            parent: ptr.clone(),
            prop: PropertyRef::clone(prop),
            item_type,
            state: CursorState::Done,
            current: Pointer::null(),
            key: None,
            position: 0,
            valid: false,
        }
    }

    fn resolve(&self) -> Option<(&CollectionDef, &StructRef)> {
        let def = collection_def(&self.prop)?;
        let item_type = self.item_type.as_ref()?;
        if self.parent.is_null() {
            return None;
        }
        Some((def, item_type))
    }

    /// Storage key under the cursor, before skip filtering.
    fn candidate(&self) -> Option<usize> {
        match &self.state {
            CursorState::Array { index, len } => (index < len).then_some(*index),
            CursorState::List { key } => *key,
            CursorState::Counted { index, count } => (index < count).then_some(*index),
            CursorState::Materialized { keys, pos } => keys.get(*pos).copied(),
            CursorState::Done => None,
        }
    }

    fn step(&mut self) {
        let next = match (&self.state, collection_def(&self.prop)) {
            (CursorState::List { key: Some(k) }, Some(def)) => match &def.storage {
                CollectionStorage::List { next, .. } => {
                    let k = *k;
                    self.parent.read(|d| next(d, k)).flatten()
                }
                _ => None,
            },
            _ => None,
        };
        match &mut self.state {
            CursorState::Array { index, .. } | CursorState::Counted { index, .. } => *index += 1,
            CursorState::List { key } => *key = next,
            CursorState::Materialized { pos, .. } => *pos += 1,
            CursorState::Done => {}
        }
    }

    /// Move forward to the first visible candidate and publish it.
    fn seek(&mut self) {
        let prop = PropertyRef::clone(&self.prop);
        let Some(def) = collection_def(&prop) else {
            self.finish();
            return;
        };
        let filtered =
            def.skip.is_some() && !matches!(self.state, CursorState::Materialized { .. });
        loop {
            let Some(key) = self.candidate() else {
                self.finish();
                return;
            };
            let hidden = filtered
                && self
                    .parent
                    .read(|d| def.skipped(d, key))
                    .unwrap_or(true);
            if !hidden {
                self.publish(key);
                return;
            }
            self.step();
        }
    }

    fn publish(&mut self, key: usize) {
        let current = match (collection_def(&self.prop), self.item_type.as_ref()) {
            (Some(def), Some(item_type)) => {
                item_pointer(&self.parent, &self.prop, def, item_type, key)
            }
            _ => return self.finish(),
        };
        self.current = current;
        self.key = Some(key);
        self.valid = true;
    }

    fn finish(&mut self) {
        self.release();
        self.state = CursorState::Done;
        self.current = Pointer::null();
        self.key = None;
        self.valid = false;
    }

    fn release(&mut self) {
        if let CursorState::Materialized { keys, .. } = &mut self.state {
            log::trace!(
                "[collection::end] '{}' released scratch of {} keys",
                self.prop.identifier,
                keys.len()
            );
            keys.clear();
        }
    }

    /// Move to the next visible item. No-op once the cursor is invalid.
    pub fn advance(&mut self) {
        if !self.valid {
            return;
        }
        self.step();
        self.position += 1;
        self.seek();
    }

    /// Item under the cursor; null when invalid.
    pub fn get(&self) -> Pointer {
        if self.valid {
            self.current.clone()
        } else {
            Pointer::null()
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Position of the current item among visible items.
    pub fn index(&self) -> usize {
        self.position
    }

    /// Storage key of the current item.
    pub fn key(&self) -> Option<usize> {
        self.key.filter(|_| self.valid)
    }

    pub fn property(&self) -> &PropertyRef {
        &self.prop
    }

    /// Finish iteration early and release scratch storage.
    pub fn end(mut self) {
        self.finish();
    }
}

impl Iterator for CollectionIter {
    type Item = Pointer;

    fn next(&mut self) -> Option<Pointer> {
        if !self.valid {
            return None;
        }
        let item = self.current.clone();
        self.advance();
        Some(item)
    }
}

impl Drop for CollectionIter {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CollectionIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionIter")
            .field("property", &self.prop.identifier)
            .field("position", &self.position)
            .field("valid", &self.valid)
            .finish()
    }
}

impl Pointer {
    /// Shorthand for [`begin`].
    pub fn collection_begin(&self, prop: &PropertyRef) -> CollectionIter {
        begin(self, prop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, Item};
    use crate::types::{InsertAt, ItemSource};

    fn setup() -> (crate::registry::Registry, Pointer) {
        let registry = fixtures::registry();
        let scene = fixtures::scene_pointer(&registry, fixtures::scene());
        (registry, scene)
    }

    fn names(scene: &Pointer, prop: &PropertyRef) -> Vec<String> {
        begin(scene, prop).filter_map(|item| item.name()).collect()
    }

    #[test]
    fn test_iteration_terminates_after_every_item() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");

        let mut iter = begin(&scene, &items);
        let mut steps = 0;
        while iter.valid() {
            assert_eq!(iter.index(), steps);
            assert!(!iter.get().is_null());
            iter.advance();
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert!(iter.get().is_null());
        iter.advance();
        assert!(!iter.valid());
    }

    #[test]
    fn test_skipped_items_are_hidden() {
        let (_registry, scene) = setup();
        let layers = scene.find_property("layers").expect("layers");

        assert_eq!(names(&scene, &layers), vec!["base", "top"]);
        assert_eq!(scene.collection_length(&layers), 2);
        assert_eq!(scene.collection_length_cost(&layers), LengthCost::Linear);
        let top = scene.collection_lookup_int(&layers, 1).expect("second visible");
        assert_eq!(top.name().as_deref(), Some("top"));
        assert!(scene.collection_lookup_int(&layers, 2).is_none());
    }

    #[test]
    fn test_lookup_int_matches_iteration() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");

        assert_eq!(scene.collection_length_cost(&items), LengthCost::Constant);
        let second = scene.collection_lookup_int(&items, 1).expect("index 1");
        let iterated = begin(&scene, &items).nth(1).expect("nth 1");
        assert!(second.same_data(&iterated));
        assert_eq!(scene.collection_item_index(&items, &second), Some(1));
        assert!(scene.collection_lookup_int(&items, 3).is_none());
    }

    #[test]
    fn test_item_index_counts_visible_items() {
        let (_registry, scene) = setup();
        let layers = scene.find_property("layers").expect("layers");

        let top = scene.collection_lookup_string(&layers, "top").expect("top");
        assert_eq!(scene.collection_item_index(&layers, &top), Some(1));
        assert!(scene.collection_lookup_string(&layers, "ghost").is_none());
        assert_eq!(scene.collection_item_index(&layers, &Pointer::null()), None);
        assert_eq!(scene.collection_item_index(&layers, &scene), None);
    }

    #[test]
    fn test_lookup_string_by_name_property() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");

        let found = scene.collection_lookup_string(&items, "c").expect("c");
        let value = found.find_property("value").expect("value");
        assert_eq!(found.get_int(&value), 3);
        assert!(scene.collection_lookup_string(&items, "missing").is_none());
    }

    #[test]
    fn test_materialized_iteration_releases_scratch_early() {
        let (_registry, scene) = setup();
        let layers = scene.find_property("layers").expect("layers");

        let mut iter = begin_materialized(&scene, &layers);
        assert!(iter.valid());
        assert_eq!(iter.get().name().as_deref(), Some("base"));
        iter.advance();
        assert_eq!(iter.key(), scene.collection_key_at(&layers, 1));
        iter.end();

        let found = scene.collection_lookup_int_materialized(&layers, 1);
        assert_eq!(found.and_then(|p| p.name()).as_deref(), Some("top"));
    }

    #[test]
    fn test_non_collection_and_null_parent_are_empty() {
        let (_registry, scene) = setup();
        let frame = scene.find_property("frame").expect("frame");
        let items = scene.find_property("items").expect("items");

        assert!(!begin(&scene, &frame).valid());
        assert!(!begin(&Pointer::null(), &items).valid());
        assert_eq!(Pointer::null().collection_length(&items), 0);
    }

    #[test]
    fn test_id_collection_items_are_roots() {
        let (registry, scene) = setup();
        let cameras = scene.find_property("cameras").expect("cameras");
        let cam = fixtures::camera_pointer(&registry, "cam", 50.0);

        let source = scene.collection_duplicate(&cameras, &cam).expect("share");
        scene
            .collection_insert(&cameras, InsertAt::Tail, source)
            .expect("insert");
        let item = scene.collection_lookup_int(&cameras, 0).expect("camera");
        assert!(item.is_root());
        assert!(item.same_data(&cam));
        assert_eq!(item.type_name(), "Camera");
    }

    #[test]
    fn test_append_remove_and_move() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");

        let added = scene
            .collection_append(&items, ItemSource::Embedded(Box::new(Item::new("d", 4))))
            .expect("append");
        assert_eq!(added.name().as_deref(), Some("d"));
        assert_eq!(scene.collection_length(&items), 4);

        scene.collection_move(&items, 3, 0).expect("move");
        assert_eq!(names(&scene, &items), vec!["d", "a", "b\"q", "c"]);

        scene.collection_remove(&items, 1).expect("remove");
        assert_eq!(names(&scene, &items), vec!["d", "b\"q", "c"]);

        assert!(matches!(
            scene.collection_remove(&items, 9),
            Err(crate::error::AccessError::IndexOutOfBounds { index: 9, length: 3 })
        ));
    }

    #[test]
    fn test_list_edits_use_visible_positions() {
        let (_registry, scene) = setup();
        let layers = scene.find_property("layers").expect("layers");

        let top = scene.collection_lookup_int(&layers, 1).expect("top");
        let copy = scene.collection_duplicate(&layers, &top).expect("duplicate");
        let anchor = scene.collection_key_at(&layers, 0).expect("base key");
        scene
            .collection_insert(&layers, InsertAt::After(anchor), copy)
            .expect("insert after base");
        assert_eq!(names(&scene, &layers), vec!["base", "top", "top"]);

        scene.collection_move(&layers, 0, 2).expect("move base last");
        assert_eq!(names(&scene, &layers), vec!["top", "top", "base"]);

        scene.collection_clear(&layers).expect("clear");
        assert_eq!(scene.collection_length(&layers), 0);
    }

    #[test]
    fn test_wrong_item_type_is_refused() {
        let (_registry, scene) = setup();
        let items = scene.find_property("items").expect("items");
        let result =
            scene.collection_insert(&items, InsertAt::Head, ItemSource::Embedded(Box::new(7u8)));
        assert!(result.is_err());
        assert_eq!(scene.collection_length(&items), 3);
    }
}
