// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pointer and collection callback bundles.

use super::{
    FirstFn, Getter, ItemFn, ItemIdFn, ItemMutFn, LengthFn, LookupIntFn, LookupStringFn, NextFn,
    Projector, ProjectorMut, Setter, SkipFn,
};
use crate::pointer::IdRef;
use std::any::Any;
use std::sync::Arc;

/// How a pointer property reaches its target.
#[derive(Clone)]
pub enum PointerAccess {
    /// Target lives inside the same data cell (a nested struct field).
    Nested {
        get: Projector,
        get_mut: ProjectorMut,
    },
    /// Target is a separate identity object.
    Id {
        get: Getter<Option<IdRef>>,
        set: Option<Setter<Option<IdRef>>>,
    },
}

#[derive(Clone)]
pub struct PointerDef {
    /// Identifier of the struct the pointer targets.
    pub target: String,
    pub access: PointerAccess,
}

impl PointerDef {
    pub fn is_id(&self) -> bool {
        matches!(self.access, PointerAccess::Id { .. })
    }
}

/// How a collection enumerates its storage keys.
///
/// A key is a position for `Array` and `Counted`, and an opaque node handle
/// for `List`.
#[derive(Clone)]
pub enum CollectionStorage {
    /// Random access by position.
    Array { len: LengthFn },
    /// Sequential links.
    List { first: FirstFn, next: NextFn },
    /// Count plus positional access only; never filtered.
    Counted { count: LengthFn },
}

impl CollectionStorage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Array { .. } => "array",
            Self::List { .. } => "list",
            Self::Counted { .. } => "counted",
        }
    }
}

/// How a collection exposes one item by key.
#[derive(Clone)]
pub enum ItemAccess {
    /// Item is part of the parent data.
    Embedded { get: ItemFn, get_mut: ItemMutFn },
    /// Item is an identity object with its own data cell.
    Id { get: ItemIdFn },
}

/// Insert position for [`CollectionEdit::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Head,
    Tail,
    /// After the item with this storage key.
    After(usize),
    /// Before the item with this storage key.
    Before(usize),
}

/// Item handed to [`CollectionEdit::insert`].
pub enum ItemSource {
    /// Boxed native item, downcast by the collection.
    Embedded(Box<dyn Any>),
    Id(IdRef),
}

impl std::fmt::Debug for ItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded(_) => write!(f, "Embedded(..)"),
            Self::Id(id) => write!(f, "Id({:p})", id.as_ptr()),
        }
    }
}

pub type InsertFn = Arc<dyn Fn(&mut dyn Any, InsertAt, ItemSource) -> Option<usize> + Send + Sync>;
pub type DuplicateFn = Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync>;
pub type RemoveFn = Arc<dyn Fn(&mut dyn Any, usize) -> bool + Send + Sync>;
pub type MoveFn = Arc<dyn Fn(&mut dyn Any, usize, usize) -> bool + Send + Sync>;
pub type ClearFn = Arc<dyn Fn(&mut dyn Any) + Send + Sync>;

/// Optional structural editing callbacks.
///
/// `insert` returns the storage key of the new item. `duplicate` clones one
/// item's data into a box accepted by `insert`. `remove` takes a storage key;
/// `move_item` takes positions.
#[derive(Clone, Default)]
pub struct CollectionEdit {
    pub insert: Option<InsertFn>,
    pub duplicate: Option<DuplicateFn>,
    pub remove: Option<RemoveFn>,
    pub move_item: Option<MoveFn>,
    pub clear: Option<ClearFn>,
}

#[derive(Clone)]
pub struct CollectionDef {
    /// Identifier of the item struct; never empty.
    pub item_type: String,
    pub storage: CollectionStorage,
    pub items: ItemAccess,
    /// Skip predicate on item data; not allowed with `Counted` storage.
    pub skip: Option<SkipFn>,
    pub lookup_int: Option<LookupIntFn>,
    pub lookup_string: Option<LookupStringFn>,
    pub edit: CollectionEdit,
}

impl CollectionDef {
    pub fn new(
        item_type: impl Into<String>,
        storage: CollectionStorage,
        items: ItemAccess,
    ) -> Self {
        Self {
            item_type: item_type.into(),
            storage,
            items,
            skip: None,
            lookup_int: None,
            lookup_string: None,
            edit: CollectionEdit::default(),
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self.items, ItemAccess::Id { .. })
    }

    /// Whether a stored item is hidden from iteration.
    pub(crate) fn skipped(&self, parent: &dyn Any, key: usize) -> bool {
        let Some(skip) = &self.skip else {
            return false;
        };
        match &self.items {
            ItemAccess::Embedded { get, .. } => get(parent, key).map(|d| skip(d)).unwrap_or(true),
            ItemAccess::Id { get } => match get(parent, key) {
                Some(id) => id.read(|d| skip(d)).unwrap_or(true),
                None => true,
            },
        }
    }
}
