// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection definitions over `Vec`, [`ListBase`] and counted storage.

use super::field::Field;
use super::listbase::ListBase;
use super::property::PropertyBuilder;
use crate::pointer::IdRef;
use crate::types::{
    item_fn, item_mut_fn, CollectionDef, CollectionEdit, CollectionStorage, InsertAt, ItemAccess,
    ItemSource, PropertyType,
};
use std::any::Any;
use std::sync::Arc;

fn take_embedded<U: Any>(item: ItemSource) -> Option<U> {
    match item {
        ItemSource::Embedded(boxed) => boxed.downcast::<U>().ok().map(|b| *b),
        ItemSource::Id(_) => None,
    }
}

fn take_id(item: ItemSource) -> Option<IdRef> {
    match item {
        ItemSource::Id(id) => Some(id),
        ItemSource::Embedded(_) => None,
    }
}

/// Position in a `Vec` of length `len` for an insert request.
fn vec_position(at: InsertAt, len: usize) -> Option<usize> {
    match at {
        InsertAt::Head => Some(0),
        InsertAt::Tail => Some(len),
        InsertAt::After(key) if key < len => Some(key + 1),
        InsertAt::Before(key) if key < len => Some(key),
        _ => None,
    }
}

fn vec_move<U>(v: &mut Vec<U>, from: usize, to: usize) -> bool {
    if from >= v.len() || to >= v.len() {
        return false;
    }
    let item = v.remove(from);
    v.insert(to, item);
    true
}

fn duplicate<U: Any + Clone>(item: &dyn Any) -> Option<Box<dyn Any>> {
    item.downcast_ref::<U>()
        .map(|u| Box::new(u.clone()) as Box<dyn Any>)
}

impl PropertyBuilder {
    /// Collection over a `Vec` of embedded items.
    ///
    /// Storage keys are positions. Supports every edit operation.
    pub fn vec_collection<T: Any, U: Any + Clone>(
        identifier: &str,
        item_type: &str,
        field: Field<T, Vec<U>>,
    ) -> Self {
        let get = Arc::clone(&field.get);
        let get_mut = Arc::clone(&field.get_mut);
        let items = ItemAccess::Embedded {
            get: item_fn(move |d, i| {
                d.downcast_ref::<T>()
                    .and_then(|t| get(t).get(i))
                    .map(|u| u as &dyn Any)
            }),
            get_mut: item_mut_fn(move |d, i| {
                d.downcast_mut::<T>()
                    .and_then(|t| get_mut(t).get_mut(i))
                    .map(|u| u as &mut dyn Any)
            }),
        };

        let mut def = CollectionDef::new(
            item_type,
            CollectionStorage::Array {
                len: field.getter(|v: &Vec<U>| v.len()),
            },
            items,
        );

        let insert_mut = Arc::clone(&field.get_mut);
        let remove_mut = Arc::clone(&field.get_mut);
        let move_mut = Arc::clone(&field.get_mut);
        let clear_mut = Arc::clone(&field.get_mut);
        def.edit = CollectionEdit {
            insert: Some(Arc::new(
                move |d: &mut dyn Any, at: InsertAt, item: ItemSource| -> Option<usize> {
                    let v = insert_mut(d.downcast_mut::<T>()?);
                    let pos = vec_position(at, v.len())?;
                    v.insert(pos, take_embedded::<U>(item)?);
                    Some(pos)
                },
            )),
            duplicate: Some(Arc::new(duplicate::<U>)),
            remove: Some(Arc::new(move |d: &mut dyn Any, key: usize| {
                match d.downcast_mut::<T>().map(|t| remove_mut(t)) {
                    Some(v) if key < v.len() => {
                        v.remove(key);
                        true
                    }
                    _ => false,
                }
            })),
            move_item: Some(Arc::new(move |d: &mut dyn Any, from: usize, to: usize| {
                d.downcast_mut::<T>()
                    .map(|t| vec_move(move_mut(t), from, to))
                    .unwrap_or(false)
            })),
            clear: Some(Arc::new(move |d: &mut dyn Any| {
                if let Some(t) = d.downcast_mut::<T>() {
                    clear_mut(t).clear();
                }
            })),
        };
        Self::custom(identifier, PropertyType::Collection(def))
    }

    /// Collection over a [`ListBase`] of embedded items.
    ///
    /// Storage keys are node keys; `move_item` takes list positions.
    pub fn list_collection<T: Any, U: Any + Clone>(
        identifier: &str,
        item_type: &str,
        field: Field<T, ListBase<U>>,
    ) -> Self {
        let get = Arc::clone(&field.get);
        let get_mut = Arc::clone(&field.get_mut);
        let items = ItemAccess::Embedded {
            get: item_fn(move |d, key| {
                d.downcast_ref::<T>()
                    .and_then(|t| get(t).get(key))
                    .map(|u| u as &dyn Any)
            }),
            get_mut: item_mut_fn(move |d, key| {
                d.downcast_mut::<T>()
                    .and_then(|t| get_mut(t).get_mut(key))
                    .map(|u| u as &mut dyn Any)
            }),
        };

        let next_get = Arc::clone(&field.get);
        let storage = CollectionStorage::List {
            first: field.getter(|l: &ListBase<U>| l.first_key()),
            next: Arc::new(move |d: &dyn Any, key: usize| {
                d.downcast_ref::<T>()
                    .and_then(|t| next_get(t).next_key(key))
            }),
        };
        let mut def = CollectionDef::new(item_type, storage, items);

        let insert_mut = Arc::clone(&field.get_mut);
        let remove_mut = Arc::clone(&field.get_mut);
        let move_mut = Arc::clone(&field.get_mut);
        let clear_mut = Arc::clone(&field.get_mut);
        def.edit = CollectionEdit {
            insert: Some(Arc::new(
                move |d: &mut dyn Any, at: InsertAt, item: ItemSource| -> Option<usize> {
                    let list = insert_mut(d.downcast_mut::<T>()?);
                    let value = take_embedded::<U>(item)?;
                    match at {
                        InsertAt::Head => Some(list.push_front(value)),
                        InsertAt::Tail => Some(list.push_back(value)),
                        InsertAt::After(key) => list.insert_after(key, value),
                        InsertAt::Before(key) => list.insert_before(key, value),
                    }
                },
            )),
            duplicate: Some(Arc::new(duplicate::<U>)),
            remove: Some(Arc::new(move |d: &mut dyn Any, key: usize| {
                d.downcast_mut::<T>()
                    .and_then(|t| remove_mut(t).remove(key))
                    .is_some()
            })),
            move_item: Some(Arc::new(move |d: &mut dyn Any, from: usize, to: usize| {
                d.downcast_mut::<T>()
                    .map(|t| move_mut(t).move_to(from, to))
                    .unwrap_or(false)
            })),
            clear: Some(Arc::new(move |d: &mut dyn Any| {
                if let Some(t) = d.downcast_mut::<T>() {
                    clear_mut(t).clear();
                }
            })),
        };
        Self::custom(identifier, PropertyType::Collection(def))
    }

    /// Index-only collection: a count plus positional access.
    ///
    /// No filtering and no editing.
    pub fn counted_collection<T, U, C, I, M>(
        identifier: &str,
        item_type: &str,
        count: C,
        item: I,
        item_mut: M,
    ) -> Self
    where
        T: Any,
        U: Any,
        C: Fn(&T) -> usize + Send + Sync + 'static,
        I: Fn(&T, usize) -> Option<&U> + Send + Sync + 'static,
        M: Fn(&mut T, usize) -> Option<&mut U> + Send + Sync + 'static,
    {
        let items = ItemAccess::Embedded {
            get: item_fn(move |d, i| {
                d.downcast_ref::<T>()
                    .and_then(|t| item(t, i))
                    .map(|u| u as &dyn Any)
            }),
            get_mut: item_mut_fn(move |d, i| {
                d.downcast_mut::<T>()
                    .and_then(|t| item_mut(t, i))
                    .map(|u| u as &mut dyn Any)
            }),
        };
        let storage = CollectionStorage::Counted {
            count: Arc::new(move |d: &dyn Any| d.downcast_ref::<T>().map(&count).unwrap_or(0)),
        };
        Self::custom(
            identifier,
            PropertyType::Collection(CollectionDef::new(item_type, storage, items)),
        )
    }

    /// Collection of identity objects held in a `Vec`.
    pub fn id_vec_collection<T: Any>(
        identifier: &str,
        item_type: &str,
        field: Field<T, Vec<IdRef>>,
    ) -> Self {
        let get = Arc::clone(&field.get);
        let items = ItemAccess::Id {
            get: Arc::new(move |d: &dyn Any, i: usize| {
                d.downcast_ref::<T>().and_then(|t| get(t).get(i).cloned())
            }),
        };
        let mut def = CollectionDef::new(
            item_type,
            CollectionStorage::Array {
                len: field.getter(|v: &Vec<IdRef>| v.len()),
            },
            items,
        );

        let insert_mut = Arc::clone(&field.get_mut);
        let remove_mut = Arc::clone(&field.get_mut);
        let move_mut = Arc::clone(&field.get_mut);
        let clear_mut = Arc::clone(&field.get_mut);
        def.edit = CollectionEdit {
            insert: Some(Arc::new(
                move |d: &mut dyn Any, at: InsertAt, item: ItemSource| -> Option<usize> {
                    let v = insert_mut(d.downcast_mut::<T>()?);
                    let pos = vec_position(at, v.len())?;
                    v.insert(pos, take_id(item)?);
                    Some(pos)
                },
            )),
            duplicate: None,
            remove: Some(Arc::new(move |d: &mut dyn Any, key: usize| {
                match d.downcast_mut::<T>().map(|t| remove_mut(t)) {
                    Some(v) if key < v.len() => {
                        v.remove(key);
                        true
                    }
                    _ => false,
                }
            })),
            move_item: Some(Arc::new(move |d: &mut dyn Any, from: usize, to: usize| {
                d.downcast_mut::<T>()
                    .map(|t| vec_move(move_mut(t), from, to))
                    .unwrap_or(false)
            })),
            clear: Some(Arc::new(move |d: &mut dyn Any| {
                if let Some(t) = d.downcast_mut::<T>() {
                    clear_mut(t).clear();
                }
            })),
        };
        Self::custom(identifier, PropertyType::Collection(def))
    }

    /// Hide items for which `skip` returns `true`.
    pub fn skip<U: Any>(mut self, skip: impl Fn(&U) -> bool + Send + Sync + 'static) -> Self {
        match &mut self.def_mut().ty {
            PropertyType::Collection(def) => {
                def.skip = Some(Arc::new(move |d: &dyn Any| {
                    d.downcast_ref::<U>().map(&skip).unwrap_or(true)
                }))
            }
            _ => self.fail("skip() applies to collections"),
        }
        self
    }

    /// Custom name lookup returning a storage key.
    pub fn lookup_string<T: Any>(
        mut self,
        f: impl Fn(&T, &str) -> Option<usize> + Send + Sync + 'static,
    ) -> Self {
        match &mut self.def_mut().ty {
            PropertyType::Collection(def) => {
                def.lookup_string = Some(Arc::new(move |d: &dyn Any, key: &str| {
                    d.downcast_ref::<T>().and_then(|t| f(t, key))
                }))
            }
            _ => self.fail("lookup_string() applies to collections"),
        }
        self
    }

    /// Custom positional lookup returning a storage key.
    pub fn lookup_int<T: Any>(
        mut self,
        f: impl Fn(&T, usize) -> Option<usize> + Send + Sync + 'static,
    ) -> Self {
        match &mut self.def_mut().ty {
            PropertyType::Collection(def) => {
                def.lookup_int = Some(Arc::new(move |d: &dyn Any, index: usize| {
                    d.downcast_ref::<T>().and_then(|t| f(t, index))
                }))
            }
            _ => self.fail("lookup_int() applies to collections"),
        }
        self
    }
}
