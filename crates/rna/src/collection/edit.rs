// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural edits. Indices are visible positions, as in iteration.

use super::{collection_def, item_pointer, raw_keys};
use crate::access::type_mismatch;
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{CollectionDef, InsertAt, ItemAccess, ItemSource, PropertyRef};

fn unsupported(prop: &PropertyRef, op: &str) -> AccessError {
    AccessError::Unsupported(format!("'{}' does not support {}", prop.identifier, op))
}

fn def_of(prop: &PropertyRef) -> Result<&CollectionDef, AccessError> {
    collection_def(prop).ok_or_else(|| type_mismatch(prop, "collection"))
}

impl Pointer {
    fn edit_precheck(&self) -> Result<(), AccessError> {
        if self.is_null() {
            return Err(AccessError::NullPointer);
        }
        Ok(())
    }

    fn key_or_bounds(&self, prop: &PropertyRef, index: usize) -> Result<usize, AccessError> {
        self.collection_key_at(prop, index)
            .ok_or_else(|| AccessError::IndexOutOfBounds {
                index,
                length: self.collection_length(prop),
            })
    }

    /// Insert `item`; returns the storage key of the new item.
    ///
    /// Anchors in `at` are storage keys, as reported by
    /// [`CollectionIter::key`](super::CollectionIter::key).
    ///
    /// # Errors
    ///
    /// `NullPointer`, `TypeMismatch` for non-collections, `Unsupported` when
    /// the storage has no insert callback or refuses the item.
    pub fn collection_insert(
        &self,
        prop: &PropertyRef,
        at: InsertAt,
        item: ItemSource,
    ) -> Result<usize, AccessError> {
        let def = def_of(prop)?;
        self.edit_precheck()?;
        let insert = def.edit.insert.as_ref().ok_or_else(|| unsupported(prop, "insert"))?;
        let key = self
            .write(|d| insert(d, at, item))
            .ok_or(AccessError::NullPointer)?
            .ok_or_else(|| unsupported(prop, "this item or anchor"))?;
        log::trace!("[collection::insert] '{}' new key {}", prop.identifier, key);
        Ok(key)
    }

    /// Append `item` and return a handle to it.
    pub fn collection_append(
        &self,
        prop: &PropertyRef,
        item: ItemSource,
    ) -> Result<Pointer, AccessError> {
        let key = self.collection_insert(prop, InsertAt::Tail, item)?;
        let def = def_of(prop)?;
        let item_type = self
            .lookup_struct(&def.item_type)
            .ok_or_else(|| unsupported(prop, "unregistered item structs"))?;
        Ok(item_pointer(self, prop, def, &item_type, key))
    }

    /// Copy of `item` suitable for [`collection_insert`](Self::collection_insert).
    ///
    /// Identity items are shared rather than copied.
    pub fn collection_duplicate(
        &self,
        prop: &PropertyRef,
        item: &Pointer,
    ) -> Result<ItemSource, AccessError> {
        let def = def_of(prop)?;
        if item.is_null() {
            return Err(AccessError::NullPointer);
        }
        match &def.items {
            ItemAccess::Embedded { .. } => {
                let dup = def
                    .edit
                    .duplicate
                    .as_ref()
                    .ok_or_else(|| unsupported(prop, "duplicate"))?;
                item.read(|d| dup(d))
                    .flatten()
                    .map(ItemSource::Embedded)
                    .ok_or_else(|| unsupported(prop, "duplicating this item"))
            }
            ItemAccess::Id { .. } => match item.root() {
                Some(root) if item.is_root() => Ok(ItemSource::Id(root.clone())),
                _ => Err(unsupported(prop, "non-identity items")),
            },
        }
    }

    /// Remove the item at visible `index`.
    pub fn collection_remove(&self, prop: &PropertyRef, index: usize) -> Result<(), AccessError> {
        let def = def_of(prop)?;
        self.edit_precheck()?;
        let remove = def.edit.remove.as_ref().ok_or_else(|| unsupported(prop, "remove"))?;
        let key = self.key_or_bounds(prop, index)?;
        let removed = self.write(|d| remove(d, key)).ok_or(AccessError::NullPointer)?;
        if !removed {
            return Err(unsupported(prop, "removing this item"));
        }
        log::trace!("[collection::remove] '{}' index {}", prop.identifier, index);
        Ok(())
    }

    /// Move the item at visible `from` to the place of the item at `to`.
    pub fn collection_move(
        &self,
        prop: &PropertyRef,
        from: usize,
        to: usize,
    ) -> Result<(), AccessError> {
        let def = def_of(prop)?;
        self.edit_precheck()?;
        let move_item = def.edit.move_item.as_ref().ok_or_else(|| unsupported(prop, "move"))?;
        let from_key = self.key_or_bounds(prop, from)?;
        let to_key = self.key_or_bounds(prop, to)?;

        let order = raw_keys(self, def);
        let storage_pos = |key: usize| order.iter().position(|&k| k == key);
        let (Some(from_pos), Some(to_pos)) = (storage_pos(from_key), storage_pos(to_key)) else {
            return Err(unsupported(prop, "moving this item"));
        };
        let moved = self
            .write(|d| move_item(d, from_pos, to_pos))
            .ok_or(AccessError::NullPointer)?;
        if !moved {
            return Err(unsupported(prop, "moving this item"));
        }
        Ok(())
    }

    /// Remove every item, skipped ones included.
    pub fn collection_clear(&self, prop: &PropertyRef) -> Result<(), AccessError> {
        let def = def_of(prop)?;
        self.edit_precheck()?;
        let clear = def.edit.clear.as_ref().ok_or_else(|| unsupported(prop, "clear"))?;
        self.write(|d| clear(d)).ok_or(AccessError::NullPointer)
    }
}
