// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Differential value computation (`Add`, `Subtract`, `Multiply`).

use super::compare::{check_roots, element_of, from_numbers, numbers, with_element};
use super::model::{LibraryOverride, OverrideOpKind, OverrideOperation};
use crate::config::FLOAT_MULTIPLY_EPSILON;
use crate::error::{OverrideError, OverrideWarning, PathError};
use crate::path::{resolve, ResolvedPath};
use crate::pointer::Pointer;
use crate::types::PropertyKind;
use crate::value::Value;

/// Outcome of a store pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreReport {
    /// Operations that received a stored value.
    pub stored: usize,
    /// Paths whose operation fell back to `Replace`.
    pub downgraded: Vec<String>,
    pub warnings: Vec<OverrideWarning>,
}

/// Array element an operation addresses, from the path or the operation.
pub(super) fn target_element(target: &ResolvedPath, op: &OverrideOperation) -> Option<usize> {
    if !target.property.is_array() {
        return None;
    }
    target.index.or(op.subitem_local_index)
}

/// Numeric view of the value (or element) a differential operation targets.
struct Operand {
    like: Value,
    nums: Vec<f64>,
    int: bool,
    min: f64,
    max: f64,
}

impl Operand {
    fn read(target: &ResolvedPath, element: Option<usize>) -> Option<Self> {
        let ptr = &target.pointer;
        let prop = &target.property;
        let (int, min, max) = match prop.kind() {
            PropertyKind::Int => {
                let (min, max) = ptr.int_range(prop);
                (true, f64::from(min), f64::from(max))
            }
            PropertyKind::Float => {
                let (min, max) = ptr.float_range(prop);
                (false, f64::from(min), f64::from(max))
            }
            _ => return None,
        };
        let mut like = ptr.get_value(prop)?;
        if let Some(i) = element {
            like = element_of(&like, i)?;
        }
        let nums = numbers(&like)?;
        Some(Self {
            like,
            nums,
            int,
            min,
            max,
        })
    }

    fn in_range(&self, nums: &[f64]) -> bool {
        nums.iter().all(|x| *x >= self.min && *x <= self.max)
    }
}

/// Stored kind and operand for `kind`, `None` when only `Replace` can
/// express the difference.
fn differential(
    kind: OverrideOpKind,
    local: &Operand,
    reference: &Operand,
) -> Option<(OverrideOpKind, Vec<f64>)> {
    if local.nums.len() != reference.nums.len() {
        return None;
    }
    let pairs = || local.nums.iter().zip(&reference.nums);
    match kind {
        OverrideOpKind::Add | OverrideOpKind::Subtract => {
            let order = if kind == OverrideOpKind::Add {
                [OverrideOpKind::Add, OverrideOpKind::Subtract]
            } else {
                [OverrideOpKind::Subtract, OverrideOpKind::Add]
            };
            order.into_iter().find_map(|k| {
                let sign = if k == OverrideOpKind::Add { 1.0 } else { -1.0 };
                let nums: Vec<f64> = pairs().map(|(l, r)| sign * (l - r)).collect();
                local.in_range(&nums).then_some((k, nums))
            })
        }
        OverrideOpKind::Multiply => {
            let epsilon = f64::from(FLOAT_MULTIPLY_EPSILON);
            if local.int || reference.nums.iter().any(|r| r.abs() < epsilon) {
                return None;
            }
            let nums: Vec<f64> = pairs().map(|(l, r)| l / r).collect();
            local.in_range(&nums).then_some((kind, nums))
        }
        _ => None,
    }
}

struct Storer<'a> {
    reference: &'a Pointer,
    local: &'a Pointer,
    storage: Option<&'a Pointer>,
    report: StoreReport,
}

impl Storer<'_> {
    fn warn(&mut self, warning: OverrideWarning) {
        log::warn!("[liboverride::store] {}", warning);
        self.report.warnings.push(warning);
    }

    fn unresolved(&mut self, path: &str, err: &PathError) {
        self.warn(OverrideWarning::PathNotFound {
            path: path.to_string(),
            reason: err.to_string(),
        });
    }

    fn operation(&mut self, path: &str, op: &mut OverrideOperation) {
        let local = match resolve(self.local, path) {
            Ok(target) => target,
            Err(e) => return self.unresolved(path, &e),
        };
        let reference = match resolve(self.reference, path) {
            Ok(target) => target,
            Err(e) => return self.unresolved(path, &e),
        };
        let element = target_element(&local, op);
        let (Some(l), Some(r)) = (
            Operand::read(&local, element),
            Operand::read(&reference, element),
        ) else {
            return self.warn(OverrideWarning::UnsupportedOperation {
                path: path.to_string(),
                kind: op.kind,
            });
        };

        let stored = differential(op.kind, &l, &r)
            .and_then(|(kind, nums)| Some((kind, from_numbers(&l.like, &nums)?)));
        let Some((kind, value)) = stored else {
            let from = op.kind;
            op.kind = OverrideOpKind::Replace;
            op.value = None;
            self.report.downgraded.push(path.to_string());
            return self.warn(OverrideWarning::Downgraded {
                path: path.to_string(),
                from,
            });
        };
        if kind != op.kind {
            log::debug!(
                "[liboverride::store] '{}' {} stored as {}",
                path,
                op.kind.name(),
                kind.name()
            );
        }
        op.kind = kind;
        op.value = Some(value.clone());
        self.report.stored += 1;

        if let Some(storage) = self.storage {
            self.write_storage(storage, path, element, &value);
        }
    }

    fn write_storage(
        &mut self,
        storage: &Pointer,
        path: &str,
        element: Option<usize>,
        value: &Value,
    ) {
        let target = match resolve(storage, path) {
            Ok(target) => target,
            Err(e) => return self.unresolved(path, &e),
        };
        let value = match element {
            Some(i) => {
                let merged = target
                    .pointer
                    .get_value(&target.property)
                    .and_then(|current| with_element(current, i, value));
                match merged {
                    Some(v) => v,
                    None => {
                        return self.warn(OverrideWarning::WriteRefused {
                            path: path.to_string(),
                            reason: format!("no element {} in storage", i),
                        })
                    }
                }
            }
            None => value.clone(),
        };
        if let Err(e) = target.pointer.write_value(&target.property, &value, false) {
            self.warn(OverrideWarning::WriteRefused {
                path: path.to_string(),
                reason: e.to_string(),
            });
        }
    }
}

/// Compute the stored operand of every differential operation in `ov`.
///
/// `Add` stores `local - reference` and `Subtract` stores
/// `reference - local`; when that leaves the property's hard range the kind
/// is swapped, and when both directions are out of range the operation is
/// downgraded to `Replace`. `Multiply` stores `local / reference` and
/// downgrades for ints, near-zero references or out-of-range factors.
/// Values land in each operation and, when given, in `storage`.
///
/// # Errors
///
/// `NullPointer` / `TypeMismatch` when the handles do not share a struct.
pub fn store(
    reference: &Pointer,
    local: &Pointer,
    storage: Option<&Pointer>,
    ov: &mut LibraryOverride,
) -> Result<StoreReport, OverrideError> {
    check_roots(reference, local)?;
    if let Some(storage) = storage {
        check_roots(local, storage)?;
    }
    let mut storer = Storer {
        reference,
        local,
        storage,
        report: StoreReport::default(),
    };
    for property in &mut ov.properties {
        for op in property
            .operations
            .iter_mut()
            .filter(|op| op.kind.is_differential())
        {
            storer.operation(&property.path, op);
        }
    }
    let report = storer.report;
    log::debug!(
        "[liboverride::store] {} stored={} downgraded={}",
        local.type_name(),
        report.stored,
        report.downgraded.len()
    );
    Ok(report)
}
