// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference/local comparison producing override operations.

use super::compare::{check_roots, config_of, ids_match, values_match};
use super::model::{LibraryOverride, OperationFlags, OverrideOpKind, OverrideOperation};
use crate::collection::{begin, collection_def};
use crate::config::{AccessConfig, MAX_PATH_DEPTH};
use crate::error::OverrideError;
use crate::path::{format, Segment};
use crate::pointer::Pointer;
use crate::types::{
    OverrideFlags, PointerAccess, PropertyKind, PropertyRef, PropertyType, StructFlags,
};

/// What a diff pass may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Record `Replace` / insertion operations for overridable differences.
    pub create: bool,
    /// Reset non-overridable differences in `local` from `reference`.
    pub restore: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            create: true,
            restore: false,
        }
    }
}

/// Outcome of a diff pass. Paths are relative to the compared roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    /// No difference outside `IGNORE` properties.
    pub matching: bool,
    /// Paths that received a new operation.
    pub created: Vec<String>,
    /// Differences that cannot be overridden.
    pub unoverridable: Vec<String>,
    /// Differences on `IGNORE` properties.
    pub ignored: Vec<String>,
    /// Paths reset from the reference.
    pub restored: Vec<String>,
}

impl Default for DiffReport {
    fn default() -> Self {
        Self {
            matching: true,
            created: Vec::new(),
            unoverridable: Vec::new(),
            ignored: Vec::new(),
            restored: Vec::new(),
        }
    }
}

struct Differ<'a> {
    ov: &'a mut LibraryOverride,
    options: DiffOptions,
    config: AccessConfig,
    report: DiffReport,
}

impl Differ<'_> {
    fn diff_struct(&mut self, reference: &Pointer, local: &Pointer, prefix: &[Segment]) {
        let Some(def) = local.struct_def() else {
            return;
        };
        if def.flags.contains(StructFlags::NO_OVERRIDE) || prefix.len() >= MAX_PATH_DEPTH {
            return;
        }
        let index = def.property_index();
        for prop in index.iter() {
            if prop.skips_comparison() {
                continue;
            }
            let mut path = prefix.to_vec();
            path.push(Segment::Property(prop.identifier.clone()));

            match &prop.ty {
                PropertyType::Pointer(pdef) => match &pdef.access {
                    PointerAccess::Nested { .. } => {
                        let r = reference.get_pointer(prop);
                        let l = local.get_pointer(prop);
                        match (r.is_null(), l.is_null()) {
                            (true, true) => {}
                            (false, false) if r.type_name() == l.type_name() => {
                                self.diff_struct(&r, &l, &path)
                            }
                            _ => self.structural(prop, &path),
                        }
                    }
                    PointerAccess::Id { .. } => {
                        if !ids_match(&reference.get_pointer(prop), &local.get_pointer(prop)) {
                            self.difference(reference, local, prop, &path);
                        }
                    }
                },
                PropertyType::Collection(_) => self.diff_collection(reference, local, prop, &path),
                _ => {
                    let same = match (reference.get_value(prop), local.get_value(prop)) {
                        (Some(a), Some(b)) => values_match(&self.config, &a, &b),
                        _ => true,
                    };
                    if !same {
                        self.difference(reference, local, prop, &path);
                    }
                }
            }
        }
    }

    /// Difference on a value or ID pointer property.
    fn difference(
        &mut self,
        reference: &Pointer,
        local: &Pointer,
        prop: &PropertyRef,
        path: &[Segment],
    ) {
        let path = format(path);
        if prop.override_flags.contains(OverrideFlags::IGNORE) {
            self.report.ignored.push(path);
            return;
        }
        self.report.matching = false;

        if prop.is_overridable() {
            if self.options.create {
                self.create_replace(path);
            }
            return;
        }

        log::debug!("[liboverride::diff] '{}' differs but is not overridable", path);
        if self.options.restore {
            let restored = match prop.kind() {
                PropertyKind::Pointer => local
                    .write_pointer(prop, &reference.get_pointer(prop), false)
                    .is_ok(),
                PropertyKind::Collection => false,
                _ => reference
                    .get_value(prop)
                    .is_some_and(|v| local.write_value(prop, &v, false).is_ok()),
            };
            if restored {
                self.report.restored.push(path.clone());
            }
        }
        self.report.unoverridable.push(path);
    }

    fn create_replace(&mut self, path: String) {
        let existing = self
            .ov
            .property(&path)
            .is_some_and(|p| p.is_locked() || !p.operations.is_empty());
        if existing {
            return;
        }
        let (property, _) = self.ov.ensure_property(&path);
        property
            .operations
            .push(OverrideOperation::new(OverrideOpKind::Replace));
        log::debug!("[liboverride::diff] replace '{}'", path);
        self.report.created.push(path);
    }

    /// Differences no operation can express (shape changes, removals).
    fn structural(&mut self, prop: &PropertyRef, path: &[Segment]) {
        let path = format(path);
        if prop.override_flags.contains(OverrideFlags::IGNORE) {
            self.report.ignored.push(path);
            return;
        }
        self.report.matching = false;
        self.report.unoverridable.push(path);
    }

    fn diff_collection(
        &mut self,
        reference: &Pointer,
        local: &Pointer,
        prop: &PropertyRef,
        path: &[Segment],
    ) {
        let Some(def) = collection_def(prop) else {
            return;
        };
        let ref_items: Vec<Pointer> = begin(reference, prop).collect();
        let local_items: Vec<Pointer> = begin(local, prop).collect();

        if def.is_id() {
            for (i, l) in local_items.iter().enumerate() {
                let mut item_path = path.to_vec();
                item_path.push(Segment::Index(i));
                match ref_items.get(i) {
                    Some(r) if ids_match(r, l) => {}
                    Some(_) => self.structural(prop, &item_path),
                    None => self.insertion(prop, path, &local_items, i, false),
                }
            }
            for i in local_items.len()..ref_items.len() {
                let mut item_path = path.to_vec();
                item_path.push(Segment::Index(i));
                self.structural(prop, &item_path);
            }
            return;
        }

        let by_name = !prop.override_flags.contains(OverrideFlags::NO_PROP_NAME)
            && local
                .lookup_struct(&def.item_type)
                .is_some_and(|ty| ty.name_property().is_some());

        if by_name {
            let local_names: Vec<Option<String>> = local_items.iter().map(Pointer::name).collect();
            let ref_names: Vec<Option<String>> = ref_items.iter().map(Pointer::name).collect();
            let unique = |names: &[Option<String>], name: &Option<String>| {
                name.is_some() && names.iter().filter(|n| *n == name).count() == 1
            };
            let mut used = vec![false; ref_items.len()];
            for (i, l) in local_items.iter().enumerate() {
                let name = &local_names[i];
                let matched = (0..ref_items.len())
                    .find(|&j| !used[j] && name.is_some() && ref_names[j] == *name);
                let keyed = unique(&local_names, name) && unique(&ref_names, name);
                match matched {
                    Some(j) => {
                        used[j] = true;
                        let mut item_path = path.to_vec();
                        item_path.push(match name {
                            Some(name) if keyed => Segment::Key(name.clone()),
                            _ => Segment::Index(i),
                        });
                        self.diff_struct(&ref_items[j], l, &item_path);
                    }
                    None => {
                        let keyed = unique(&local_names, name);
                        self.insertion(prop, path, &local_items, i, keyed);
                    }
                }
            }
            for (j, name) in ref_names.iter().enumerate() {
                if used[j] {
                    continue;
                }
                let mut item_path = path.to_vec();
                item_path.push(match name {
                    Some(name) if unique(&ref_names, &ref_names[j]) => Segment::Key(name.clone()),
                    _ => Segment::Index(j),
                });
                self.structural(prop, &item_path);
            }
        } else {
            for (i, l) in local_items.iter().enumerate() {
                let mut item_path = path.to_vec();
                item_path.push(Segment::Index(i));
                match ref_items.get(i) {
                    Some(r) if r.type_name() == l.type_name() => self.diff_struct(r, l, &item_path),
                    Some(_) => self.structural(prop, &item_path),
                    None => self.insertion(prop, path, &local_items, i, false),
                }
            }
            for i in local_items.len()..ref_items.len() {
                let mut item_path = path.to_vec();
                item_path.push(Segment::Index(i));
                self.structural(prop, &item_path);
            }
        }
    }

    /// Local-only item at position `i`, anchored after its predecessor.
    ///
    /// `by_name` keys the operation on item names; otherwise on positions.
    fn insertion(
        &mut self,
        prop: &PropertyRef,
        path: &[Segment],
        local_items: &[Pointer],
        i: usize,
        by_name: bool,
    ) {
        let mut item_path = path.to_vec();
        let local_name = local_items[i].name();
        item_path.push(match (&local_name, by_name) {
            (Some(name), true) => Segment::Key(name.clone()),
            _ => Segment::Index(i),
        });
        if !prop.override_flags.contains(OverrideFlags::SUPPORTS_INSERTION) {
            self.structural(prop, &item_path);
            return;
        }
        if prop.override_flags.contains(OverrideFlags::IGNORE) {
            self.report.ignored.push(format(&item_path));
            return;
        }
        self.report.matching = false;
        if !self.options.create {
            return;
        }

        let anchor = i.checked_sub(1);
        let (ref_name, loc_name, ref_index, loc_index) = if by_name {
            let named = |n: &String| {
                local_items.iter().filter(|l| l.name().as_ref() == Some(n)).count() == 1
            };
            match anchor.map(|a| local_items[a].name().filter(named)) {
                Some(None) => (None, local_name, anchor, None),
                anchor_name => (anchor_name.flatten(), local_name, None, None),
            }
        } else {
            (None, None, anchor, Some(i))
        };
        let collection = format(path);
        let locked = self
            .ov
            .property(&collection)
            .is_some_and(|p| p.flags.contains(OperationFlags::LOCKED));
        if locked {
            return;
        }
        let (property, _) = self.ov.ensure_property(&collection);
        let (_, created) = property.operation_ensure(
            OverrideOpKind::InsertAfter,
            ref_name.as_deref(),
            loc_name.as_deref(),
            ref_index,
            loc_index,
        );
        if created {
            let item_path = format(&item_path);
            log::debug!("[liboverride::diff] insert '{}'", item_path);
            self.report.created.push(item_path);
        }
    }
}

/// Whether two items hold equal values, compared as a diff pass would.
pub(super) fn items_match(a: &Pointer, b: &Pointer) -> bool {
    let mut scratch = LibraryOverride::new();
    let mut differ = Differ {
        ov: &mut scratch,
        options: DiffOptions {
            create: false,
            restore: false,
        },
        config: config_of(b),
        report: DiffReport::default(),
    };
    differ.diff_struct(a, b, &[]);
    differ.report.matching
}

/// Compare `local` against `reference` and record overrides in `ov`.
///
/// Overridable differences get a `Replace` operation unless the path already
/// has operations; local-only items of `SUPPORTS_INSERTION` collections get
/// an `InsertAfter` anchored on the preceding local item. Locked records are
/// never modified.
///
/// # Errors
///
/// `NullPointer` when a root is null, `TypeMismatch` when the roots do not
/// share a struct.
pub fn diff(
    reference: &Pointer,
    local: &Pointer,
    ov: &mut LibraryOverride,
    options: DiffOptions,
) -> Result<DiffReport, OverrideError> {
    check_roots(reference, local)?;
    let mut differ = Differ {
        ov,
        options,
        config: config_of(local),
        report: DiffReport::default(),
    };
    differ.diff_struct(reference, local, &[]);
    let report = differ.report;
    log::debug!(
        "[liboverride::diff] {} matching={} created={} unoverridable={}",
        local.type_name(),
        report.matching,
        report.created.len(),
        report.unoverridable.len()
    );
    Ok(report)
}
