// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{begin, begin_materialized, collection_def, item_pointer, visible_keys};
use crate::pointer::Pointer;
use crate::types::{CollectionDef, CollectionStorage, PropertyRef};

/// How expensive [`Pointer::collection_length`] is for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCost {
    /// Read directly from storage.
    Constant,
    /// Requires walking every item.
    Linear,
}

/// Key of the item at visible `index`, using direct addressing when possible.
fn direct_key(parent: &Pointer, def: &CollectionDef, index: usize) -> Option<Option<usize>> {
    if def.skip.is_some() {
        return None;
    }
    let len = match &def.storage {
        CollectionStorage::Array { len } => parent.read(|d| len(d)),
        CollectionStorage::Counted { count } => parent.read(|d| count(d)),
        CollectionStorage::List { .. } => return None,
    };
    Some(len.and_then(|len| (index < len).then_some(index)))
}

impl Pointer {
    pub fn collection_length_cost(&self, prop: &PropertyRef) -> LengthCost {
        let Some(def) = collection_def(prop) else {
            return LengthCost::Linear;
        };
        let direct = def.skip.is_none() && !matches!(def.storage, CollectionStorage::List { .. });
        if direct {
            LengthCost::Constant
        } else {
            LengthCost::Linear
        }
    }

    /// Number of visible items; 0 for null handles and non-collections.
    pub fn collection_length(&self, prop: &PropertyRef) -> usize {
        let Some(def) = collection_def(prop) else {
            return 0;
        };
        match self.collection_length_cost(prop) {
            LengthCost::Constant => {
                let count = match &def.storage {
                    CollectionStorage::Array { len } => self.read(|d| len(d)),
                    CollectionStorage::Counted { count } => self.read(|d| count(d)),
                    CollectionStorage::List { .. } => None,
                };
                count.unwrap_or(0)
            }
            LengthCost::Linear => begin(self, prop).count(),
        }
    }

    /// Item at visible position `index`.
    ///
    /// Uses the collection's own lookup when it has one, direct addressing
    /// for unfiltered arrays, and a linear walk otherwise.
    pub fn collection_lookup_int(&self, prop: &PropertyRef, index: usize) -> Option<Pointer> {
        let def = collection_def(prop)?;
        let item_type = self.lookup_struct(&def.item_type)?;
        if let Some(lookup) = &def.lookup_int {
            let key = self.read(|d| lookup(d, index)).flatten()?;
            return Some(item_pointer(self, prop, def, &item_type, key));
        }
        if let Some(key) = direct_key(self, def, index) {
            return key.map(|key| item_pointer(self, prop, def, &item_type, key));
        }
        begin(self, prop).nth(index)
    }

    /// Like [`collection_lookup_int`](Self::collection_lookup_int) but
    /// resolves the position over a materialized key snapshot.
    pub fn collection_lookup_int_materialized(
        &self,
        prop: &PropertyRef,
        index: usize,
    ) -> Option<Pointer> {
        begin_materialized(self, prop).nth(index)
    }

    /// Item whose name property equals `key`.
    ///
    /// `None` when the item struct has no name property and the collection
    /// provides no lookup of its own.
    pub fn collection_lookup_string(&self, prop: &PropertyRef, key: &str) -> Option<Pointer> {
        let def = collection_def(prop)?;
        let item_type = self.lookup_struct(&def.item_type)?;
        if let Some(lookup) = &def.lookup_string {
            let found = self.read(|d| lookup(d, key)).flatten()?;
            return Some(item_pointer(self, prop, def, &item_type, found));
        }
        if item_type.name_property().is_none() {
            log::debug!(
                "[collection::lookup_string] '{}' items have no name property",
                prop.identifier
            );
            return None;
        }
        begin(self, prop).find(|item| item.name().as_deref() == Some(key))
    }

    /// Visible position of `item`, compared by data identity.
    pub fn collection_item_index(&self, prop: &PropertyRef, item: &Pointer) -> Option<usize> {
        if item.is_null() {
            return None;
        }
        begin(self, prop).position(|candidate| candidate.same_data(item))
    }

    /// Visible position of the item stored under `key`.
    pub(crate) fn collection_key_position(&self, prop: &PropertyRef, key: usize) -> Option<usize> {
        let def = collection_def(prop)?;
        visible_keys(self, def).iter().position(|&k| k == key)
    }

    /// Storage key of the item at visible `index`.
    pub(crate) fn collection_key_at(&self, prop: &PropertyRef, index: usize) -> Option<usize> {
        let def = collection_def(prop)?;
        if let Some(lookup) = &def.lookup_int {
            return self.read(|d| lookup(d, index)).flatten();
        }
        if let Some(key) = direct_key(self, def, index) {
            return key;
        }
        visible_keys(self, def).get(index).copied()
    }
}
