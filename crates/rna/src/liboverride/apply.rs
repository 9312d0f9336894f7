// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Replaying recorded operations onto a fresh copy of the reference.

use super::compare::{check_roots, element_of, from_numbers, ids_match, numbers, with_element};
use super::diff::items_match;
use super::model::{LibraryOverride, OverrideOpKind, OverrideOperation};
use super::store::target_element;
use crate::error::{OverrideError, OverrideWarning, PathError};
use crate::path::{resolve, ResolvedPath};
use crate::pointer::Pointer;
use crate::types::{InsertAt, PointerAccess, PropertyKind, PropertyType};
use crate::value::Value;

/// Outcome of an apply pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    /// Value operations written to the destination.
    pub applied: usize,
    /// Items inserted into destination collections.
    pub inserted: usize,
    pub warnings: Vec<OverrideWarning>,
}

fn combine(kind: OverrideOpKind, current: &Value, stored: &Value) -> Option<Value> {
    let a = numbers(current)?;
    let b = numbers(stored)?;
    if a.len() != b.len() {
        return None;
    }
    let nums: Vec<f64> = a
        .iter()
        .zip(&b)
        .map(|(x, y)| match kind {
            OverrideOpKind::Add => x + y,
            OverrideOpKind::Subtract => x - y,
            _ => x * y,
        })
        .collect();
    from_numbers(current, &nums)
}

/// `value`, narrowed to element `index` when it is an array.
fn operand_at(value: Value, index: Option<usize>) -> Option<Value> {
    match index {
        Some(i) if value.is_array() => element_of(&value, i),
        _ => Some(value),
    }
}

struct Applier<'a> {
    dst: &'a Pointer,
    src: &'a Pointer,
    storage: Option<&'a Pointer>,
    report: ApplyReport,
}

impl Applier<'_> {
    fn warn(&mut self, warning: OverrideWarning) {
        log::warn!("[liboverride::apply] {}", warning);
        self.report.warnings.push(warning);
    }

    fn unresolved(&mut self, path: &str, err: &PathError) {
        self.warn(OverrideWarning::PathNotFound {
            path: path.to_string(),
            reason: err.to_string(),
        });
    }

    fn refused(&mut self, path: &str, reason: impl ToString) {
        self.warn(OverrideWarning::WriteRefused {
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }

    fn unsupported(&mut self, path: &str, kind: OverrideOpKind) {
        self.warn(OverrideWarning::UnsupportedOperation {
            path: path.to_string(),
            kind,
        });
    }

    /// Both ends of `path` on the destination and the source.
    fn targets(&mut self, path: &str) -> Option<(ResolvedPath, ResolvedPath)> {
        let dst = match resolve(self.dst, path) {
            Ok(target) => target,
            Err(e) => {
                self.unresolved(path, &e);
                return None;
            }
        };
        match resolve(self.src, path) {
            Ok(src) => Some((dst, src)),
            Err(e) => {
                self.unresolved(path, &e);
                None
            }
        }
    }

    fn insertion(&mut self, path: &str, op: &OverrideOperation) {
        let Some((dst, src)) = self.targets(path) else {
            return;
        };
        if dst.property.kind() != PropertyKind::Collection || dst.is_element() {
            return self.unsupported(path, op.kind);
        }
        let prop = &dst.property;
        let anchor_missing = |anchor: String| OverrideWarning::AnchorNotFound {
            path: path.to_string(),
            anchor,
        };

        let item = match (&op.subitem_local_name, op.subitem_local_index) {
            (Some(name), _) => src.pointer.collection_lookup_string(prop, name),
            (None, Some(i)) => src.pointer.collection_lookup_int(prop, i),
            (None, None) => return self.unsupported(path, op.kind),
        };
        let Some(item) = item else {
            let anchor = op
                .subitem_local_name
                .clone()
                .or_else(|| op.subitem_local_index.map(|i| i.to_string()))
                .unwrap_or_default();
            return self.warn(anchor_missing(anchor));
        };

        let present = match &op.subitem_local_name {
            Some(name) => dst.pointer.collection_lookup_string(prop, name).is_some(),
            None => op
                .subitem_local_index
                .and_then(|i| dst.pointer.collection_lookup_int(prop, i))
                .is_some_and(|existing| {
                    if existing.is_root() {
                        ids_match(&existing, &item)
                    } else {
                        items_match(&existing, &item)
                    }
                }),
        };
        if present {
            log::debug!("[liboverride::apply] '{}' already holds the inserted item", path);
            return;
        }

        let anchor_position = match (&op.subitem_reference_name, op.subitem_reference_index) {
            (Some(name), _) => match dst.pointer.collection_lookup_string(prop, name) {
                Some(anchor) => dst.pointer.collection_item_index(prop, &anchor),
                None => return self.warn(anchor_missing(name.clone())),
            },
            (None, Some(i)) => Some(i),
            (None, None) => None,
        };
        let at = match anchor_position {
            Some(position) => match dst.pointer.collection_key_at(prop, position) {
                Some(key) if op.kind == OverrideOpKind::InsertBefore => InsertAt::Before(key),
                Some(key) => InsertAt::After(key),
                None => return self.warn(anchor_missing(position.to_string())),
            },
            None if op.kind == OverrideOpKind::InsertBefore => InsertAt::Tail,
            None => InsertAt::Head,
        };

        let inserted = src
            .pointer
            .collection_duplicate(prop, &item)
            .and_then(|copy| dst.pointer.collection_insert(prop, at, copy));
        match inserted {
            Ok(key) => {
                log::debug!("[liboverride::apply] '{}' inserted key {}", path, key);
                self.report.inserted += 1;
            }
            Err(e) => self.refused(path, e),
        }
    }

    fn value(&mut self, path: &str, op: &OverrideOperation) {
        let Some((dst, src)) = self.targets(path) else {
            return;
        };
        let prop = &dst.property;
        match &prop.ty {
            PropertyType::Collection(_) => return self.unsupported(path, op.kind),
            PropertyType::Pointer(def) => {
                let id = matches!(def.access, PointerAccess::Id { .. });
                if !id || op.kind != OverrideOpKind::Replace {
                    return self.unsupported(path, op.kind);
                }
                let target = src.pointer.get_pointer(&src.property);
                return match dst.pointer.write_pointer(prop, &target, false) {
                    Ok(()) => self.report.applied += 1,
                    Err(e) => self.refused(path, e),
                };
            }
            _ => {}
        }

        let element = target_element(&dst, op);
        let written = match op.kind {
            OverrideOpKind::Replace => src
                .pointer
                .get_value(&src.property)
                .and_then(|v| operand_at(v, element)),
            kind => {
                let Some(stored) = self.stored_operand(path, op, element) else {
                    return self.warn(OverrideWarning::MissingStorage(path.to_string()));
                };
                dst.pointer
                    .get_value(prop)
                    .and_then(|v| operand_at(v, element))
                    .and_then(|current| combine(kind, &current, &stored))
            }
        };
        let Some(written) = written else {
            return self.unsupported(path, op.kind);
        };
        let whole = match element {
            Some(i) => dst
                .pointer
                .get_value(prop)
                .and_then(|current| with_element(current, i, &written)),
            None => Some(written),
        };
        let Some(whole) = whole else {
            return self.refused(path, "element out of range");
        };
        match dst.pointer.write_value(prop, &whole, false) {
            Ok(()) => self.report.applied += 1,
            Err(e) => self.refused(path, e),
        }
    }

    /// Operand of a differential operation: the storage handle first, then
    /// the value recorded in the operation.
    fn stored_operand(
        &self,
        path: &str,
        op: &OverrideOperation,
        element: Option<usize>,
    ) -> Option<Value> {
        let from_storage = self.storage.and_then(|storage| {
            let target = resolve(storage, path).ok()?;
            target.pointer.get_value(&target.property)
        });
        from_storage
            .or_else(|| op.value.clone())
            .and_then(|v| operand_at(v, element))
    }
}

/// Replay `ov` onto `dst`, a fresh copy of the reference.
///
/// Insertions run first so that value paths keyed on inserted items
/// resolve. `Replace` copies from `src` (the local data); differential
/// operations combine the destination value with the operand held by
/// `storage`, or by the operation itself. Every write goes through the
/// access protocol without the editable check, so hard ranges still clamp.
/// Problems are collected as warnings and never abort the pass.
///
/// # Errors
///
/// `NullPointer` / `TypeMismatch` when the handles do not share a struct.
pub fn apply(
    dst: &Pointer,
    src: &Pointer,
    storage: Option<&Pointer>,
    ov: &LibraryOverride,
) -> Result<ApplyReport, OverrideError> {
    check_roots(dst, src)?;
    if let Some(storage) = storage {
        check_roots(dst, storage)?;
    }
    let mut applier = Applier {
        dst,
        src,
        storage,
        report: ApplyReport::default(),
    };
    for property in ov.iter() {
        for op in property.operations.iter().filter(|op| op.kind.is_insertion()) {
            applier.insertion(&property.path, op);
        }
    }
    for property in ov.iter() {
        let values = property
            .operations
            .iter()
            .filter(|op| op.kind != OverrideOpKind::Noop && !op.kind.is_insertion());
        for op in values {
            applier.value(&property.path, op);
        }
    }
    let report = applier.report;
    log::debug!(
        "[liboverride::apply] {} applied={} inserted={} warnings={}",
        dst.type_name(),
        report.applied,
        report.inserted,
        report.warnings.len()
    );
    Ok(report)
}
