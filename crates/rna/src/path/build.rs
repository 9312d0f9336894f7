// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::parse::{format, Segment};
use crate::pointer::{Pointer, Step};
use crate::types::{PropertyDef, PropertyKind, PropertyRef};

/// Bracket segment addressing `item` inside `collection` on `parent`.
///
/// Uses the item's name when it identifies the item uniquely, its position
/// otherwise.
pub(crate) fn item_segment(
    parent: &Pointer,
    collection: &PropertyRef,
    item: &Pointer,
    key: Option<usize>,
) -> Option<Segment> {
    if let Some(name) = item.name().filter(|n| !n.is_empty()) {
        let unique = parent
            .collection_lookup_string(collection, &name)
            .is_some_and(|found| found.same_data(item));
        if unique {
            return Some(Segment::Key(name));
        }
    }
    let position = match key {
        Some(key) => parent.collection_key_position(collection, key),
        None => parent.collection_item_index(collection, item),
    }?;
    Some(Segment::Index(position))
}

/// Per-dimension indices of flat element `index`.
fn element_segments(ptr: &Pointer, prop: &PropertyDef, index: usize) -> Vec<Segment> {
    let dims = ptr.array_dimensions(prop);
    if dims.len() <= 1 {
        return vec![Segment::Index(index)];
    }
    let mut rest = index;
    let mut out = vec![Segment::Index(0); dims.len()];
    for (slot, size) in out.iter_mut().zip(&dims).rev() {
        let size = (*size).max(1);
        *slot = Segment::Index(rest % size);
        rest /= size;
    }
    out
}

/// Segments from the handle's root data to `ptr`.
pub fn segments_from_owner(ptr: &Pointer) -> Option<Vec<Segment>> {
    if ptr.is_null() {
        return None;
    }
    let chain = ptr.chain()?;
    let mut segments = Vec::new();
    for (i, step) in ptr.steps().iter().enumerate() {
        match step {
            Step::Nested(prop) => segments.push(Segment::Property(prop.identifier.clone())),
            Step::Item { prop, key } => {
                segments.push(Segment::Property(prop.identifier.clone()));
                segments.push(item_segment(&chain[i], prop, &chain[i + 1], Some(*key))?);
            }
        }
    }
    Some(segments)
}

/// Textual path from the root data of `ptr` to `prop` (and element `index`).
///
/// With no property the path addresses `ptr` itself. Items are addressed by
/// name when their struct has a name property, by position otherwise.
/// `None` for null handles or when an intermediate struct is no longer
/// registered.
pub fn path_from_owner(
    ptr: &Pointer,
    prop: Option<&PropertyDef>,
    index: Option<usize>,
) -> Option<String> {
    let mut segments = segments_from_owner(ptr)?;
    if let Some(prop) = prop {
        segments.push(Segment::Property(prop.identifier.clone()));
        match (index, prop.kind()) {
            (Some(i), PropertyKind::Collection) => segments.push(Segment::Index(i)),
            (Some(i), _) if prop.is_array() => segments.extend(element_segments(ptr, prop, i)),
            _ => {}
        }
    }
    Some(format(&segments))
}

impl Pointer {
    /// Shorthand for [`path_from_owner`].
    pub fn path_from_owner(
        &self,
        prop: Option<&PropertyDef>,
        index: Option<usize>,
    ) -> Option<String> {
        path_from_owner(self, prop, index)
    }
}
