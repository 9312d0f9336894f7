// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::parse::{parse, Segment};
use crate::error::PathError;
use crate::pointer::Pointer;
use crate::types::{PropertyKind, PropertyRef};
use std::fmt;

/// Result of resolving a path: the property it names on `pointer`.
#[derive(Clone)]
pub struct ResolvedPath {
    /// Instance owning `property`.
    pub pointer: Pointer,
    pub property: PropertyRef,
    /// Flat element index on arrays or item position on collections;
    /// `None` when the path names the whole property.
    pub index: Option<usize>,
    /// Collection item the path ended on, if any.
    pub item: Option<Pointer>,
}

impl ResolvedPath {
    /// `true` when the path addresses one element or item.
    pub fn is_element(&self) -> bool {
        self.index.is_some()
    }
}

impl fmt::Debug for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPath")
            .field("pointer", &self.pointer)
            .field("property", &self.property.identifier)
            .field("index", &self.index)
            .finish()
    }
}

/// Array element being indexed, one dimension at a time.
struct ArrayCursor {
    dims: Vec<usize>,
    level: usize,
    flat: usize,
}

/// Walk state between segments.
struct Walk<'a> {
    path: &'a str,
    ptr: Pointer,
    prop: Option<PropertyRef>,
    array: Option<ArrayCursor>,
    /// Collection, position and item of the last bracket on a collection.
    item: Option<(Pointer, PropertyRef, usize, Pointer)>,
}

impl Walk<'_> {
    fn not_found(&self, segment: &Segment) -> PathError {
        PathError::NotFound {
            path: self.path.to_string(),
            segment: segment.to_string(),
        }
    }

    fn mismatch(&self, reason: String) -> PathError {
        PathError::TypeMismatch {
            path: self.path.to_string(),
            reason,
        }
    }

    /// Step into the struct named by the pending property, if any.
    fn enter(&mut self, segment: &Segment) -> Result<(), PathError> {
        let Some(prop) = self.prop.take() else {
            return Ok(());
        };
        if self.array.is_some() {
            return Err(self.mismatch(format!("'{}' element is not a struct", prop.identifier)));
        }
        match prop.kind() {
            PropertyKind::Pointer => {
                let target = self.ptr.get_pointer(&prop);
                if target.is_null() {
                    return Err(self.not_found(segment));
                }
                self.ptr = target;
                self.item = None;
                Ok(())
            }
            PropertyKind::Collection => Err(self.mismatch(format!(
                "collection '{}' needs an index before '{}'",
                prop.identifier, segment
            ))),
            kind => Err(self.mismatch(format!(
                "{} property '{}' has no members",
                kind.name(),
                prop.identifier
            ))),
        }
    }

    fn property(&mut self, id: &str, segment: &Segment) -> Result<(), PathError> {
        self.enter(segment)?;
        let prop = self
            .ptr
            .find_property(id)
            .ok_or_else(|| self.not_found(segment))?;
        self.prop = Some(prop);
        self.item = None;
        Ok(())
    }

    /// Collection addressed by a bracket: the pending property, or the
    /// struct's iterator property after a struct.
    fn bracket_target(&mut self, segment: &Segment) -> Result<PropertyRef, PathError> {
        let pointer_pending = self.array.is_none()
            && self
                .prop
                .as_ref()
                .is_some_and(|p| p.kind() == PropertyKind::Pointer);
        if pointer_pending {
            self.enter(segment)?;
        }
        if let Some(prop) = &self.prop {
            return Ok(PropertyRef::clone(prop));
        }
        let iterator = self.ptr.struct_def().and_then(|def| def.iterator_property());
        iterator.ok_or_else(|| {
            self.mismatch(format!(
                "struct '{}' has no iterator property for '{}'",
                self.ptr.type_name(),
                segment
            ))
        })
    }

    fn index(&mut self, index: usize, segment: &Segment) -> Result<(), PathError> {
        let prop = self.bracket_target(segment)?;
        match prop.kind() {
            PropertyKind::Collection => {
                let item = self
                    .ptr
                    .collection_lookup_int(&prop, index)
                    .ok_or_else(|| self.not_found(segment))?;
                self.descend_item(prop, index, item);
                Ok(())
            }
            _ if prop.is_array() => {
                let ptr = &self.ptr;
                let cursor = self.array.get_or_insert_with(|| ArrayCursor {
                    dims: ptr.array_dimensions(&prop),
                    level: 0,
                    flat: 0,
                });
                let Some(&size) = cursor.dims.get(cursor.level) else {
                    return Err(self.mismatch(format!(
                        "too many indices for array '{}'",
                        prop.identifier
                    )));
                };
                if index >= size {
                    return Err(self.not_found(segment));
                }
                cursor.flat = cursor.flat * size + index;
                cursor.level += 1;
                self.prop = Some(prop);
                Ok(())
            }
            kind => Err(self.mismatch(format!(
                "{} property '{}' cannot be indexed",
                kind.name(),
                prop.identifier
            ))),
        }
    }

    fn key(&mut self, key: &str, segment: &Segment) -> Result<(), PathError> {
        let prop = self.bracket_target(segment)?;
        if prop.kind() != PropertyKind::Collection {
            return Err(self.mismatch(format!(
                "string index on {} property '{}'",
                prop.kind().name(),
                prop.identifier
            )));
        }
        let item = self
            .ptr
            .collection_lookup_string(&prop, key)
            .ok_or_else(|| self.not_found(segment))?;
        let position = self
            .ptr
            .collection_item_index(&prop, &item)
            .ok_or_else(|| self.not_found(segment))?;
        self.descend_item(prop, position, item);
        Ok(())
    }

    fn descend_item(&mut self, prop: PropertyRef, position: usize, item: Pointer) {
        let parent = std::mem::replace(&mut self.ptr, item.clone());
        self.prop = None;
        self.item = Some((parent, prop, position, item));
    }

    fn finish(self) -> Result<ResolvedPath, PathError> {
        if let Some(prop) = self.prop {
            let index = match self.array {
                Some(cursor) if cursor.level < cursor.dims.len() => {
                    return Err(PathError::TypeMismatch {
                        path: self.path.to_string(),
                        reason: format!("partial index into array '{}'", prop.identifier),
                    });
                }
                Some(cursor) => Some(cursor.flat),
                None => None,
            };
            return Ok(ResolvedPath {
                pointer: self.ptr,
                property: prop,
                index,
                item: None,
            });
        }
        match self.item {
            Some((parent, prop, position, item)) => Ok(ResolvedPath {
                pointer: parent,
                property: prop,
                index: Some(position),
                item: Some(item),
            }),
            None => Err(PathError::NotFound {
                path: self.path.to_string(),
                segment: String::new(),
            }),
        }
    }
}

/// Resolve `path` against `root`.
///
/// Only a full resolution returns a result; any failing segment fails the
/// whole call.
///
/// # Errors
///
/// `Syntax` for malformed text, `NotFound` for an unknown identifier, index
/// or key, `TypeMismatch` when a segment is applied to the wrong kind of
/// property.
///
/// # Example
///
/// ```
/// use rna::define::{field, PropertyBuilder, StructBuilder};
/// use rna::path::resolve;
/// use rna::pointer::{IdRef, Pointer};
/// use rna::registry::Registry;
///
/// #[derive(Default)]
/// struct Mesh { verts: [f32; 3] }
///
/// let registry = Registry::new();
/// let mesh = StructBuilder::new("Mesh")
///     .property(PropertyBuilder::float_array("verts", field(|m: &Mesh| &m.verts, |m| &mut m.verts)))
///     .register(&registry)
///     .unwrap();
/// let ptr = Pointer::from_data(&mesh, &IdRef::new(Mesh::default()));
///
/// let resolved = resolve(&ptr, "verts[2]").unwrap();
/// assert_eq!(resolved.property.identifier, "verts");
/// assert_eq!(resolved.index, Some(2));
/// ```
pub fn resolve(root: &Pointer, path: &str) -> Result<ResolvedPath, PathError> {
    let segments = parse(path)?;
    if root.is_null() {
        return Err(PathError::NotFound {
            path: path.to_string(),
            segment: String::new(),
        });
    }
    let mut walk = Walk {
        path,
        ptr: root.clone(),
        prop: None,
        array: None,
        item: None,
    };
    for segment in &segments {
        match segment {
            Segment::Property(id) => walk.property(id, segment)?,
            Segment::Index(i) => walk.index(*i, segment)?,
            Segment::Key(k) => walk.key(k, segment)?,
        }
    }
    let resolved = walk.finish()?;
    log::trace!(
        "[path::resolve] '{}' -> {}.{} {:?}",
        path,
        resolved.pointer.type_name(),
        resolved.property.identifier,
        resolved.index
    );
    Ok(resolved)
}

/// Resolve a path that must end on a struct instance.
///
/// The empty path resolves to `root` itself.
pub fn resolve_pointer(root: &Pointer, path: &str) -> Result<Pointer, PathError> {
    if path.is_empty() {
        return Ok(root.clone());
    }
    let resolved = resolve(root, path)?;
    if let Some(item) = resolved.item {
        return Ok(item);
    }
    if resolved.property.kind() != PropertyKind::Pointer || resolved.index.is_some() {
        return Err(PathError::TypeMismatch {
            path: path.to_string(),
            reason: format!("'{}' is not a struct", resolved.property.identifier),
        });
    }
    let target = resolved.pointer.get_pointer(&resolved.property);
    if target.is_null() {
        return Err(PathError::NotFound {
            path: path.to_string(),
            segment: resolved.property.identifier.clone(),
        });
    }
    Ok(target)
}

impl Pointer {
    /// Shorthand for [`resolve`].
    pub fn resolve_path(&self, path: &str) -> Result<ResolvedPath, PathError> {
        resolve(self, path)
    }

    /// Shorthand for [`resolve_pointer`].
    pub fn resolve_pointer(&self, path: &str) -> Result<Pointer, PathError> {
        resolve_pointer(self, path)
    }
}
