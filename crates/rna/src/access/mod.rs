// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic access protocol.
//!
//! Typed getters and setters on [`Pointer`] for every property kind. Plain
//! setters never fail: writes to non-editable properties, null handles or
//! borrowed cells are dropped with a debug log, and numeric values are
//! clamped into the hard range. The `try_*` entry points report the same
//! conditions as [`AccessError`].

mod boolean;
mod enums;
mod float;
mod int;
mod pointer;
mod string;
mod value;

use crate::config::AccessPolicy;
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::PropertyDef;

/// Clamp without panicking on an inverted range.
pub(crate) fn clamp_i32(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp without panicking; NaN passes through unchanged.
pub(crate) fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub(crate) fn type_mismatch(prop: &PropertyDef, expected: &'static str) -> AccessError {
    AccessError::TypeMismatch {
        property: prop.identifier.clone(),
        expected,
    }
}

pub(crate) fn no_setter(prop: &PropertyDef) -> AccessError {
    AccessError::Unsupported(format!("'{}' has no setter", prop.identifier))
}

/// Drop an access error from a plain setter, logging it.
pub(crate) fn log_dropped(context: &str, prop: &PropertyDef, result: Result<(), AccessError>) {
    if let Err(e) = result {
        log::debug!("[access::{}] '{}' write ignored: {}", context, prop.identifier, e);
    }
}

impl Pointer {
    /// Out-of-range policy of the owning registry.
    pub(crate) fn policy(&self) -> AccessPolicy {
        self.registry()
            .map(|r| r.config().policy)
            .unwrap_or_default()
    }

    /// Whether `prop` accepts writes on this instance.
    pub fn is_editable(&self, prop: &PropertyDef) -> bool {
        self.read(|d| prop.is_editable(Some(d))).unwrap_or(false)
    }

    /// Element count of an array property (0 for scalars).
    pub fn array_length(&self, prop: &PropertyDef) -> usize {
        match &prop.array {
            Some(shape) => self
                .read(|d| shape.length(Some(d)))
                .unwrap_or_else(|| shape.length(None)),
            None => 0,
        }
    }

    /// Dimension sizes of an array property (empty for scalars).
    pub fn array_dimensions(&self, prop: &PropertyDef) -> Vec<usize> {
        match &prop.array {
            Some(shape) => self
                .read(|d| shape.dimensions(Some(d)))
                .unwrap_or_else(|| shape.dimensions(None)),
            None => Vec::new(),
        }
    }

    /// Common write preconditions.
    pub(crate) fn precheck(
        &self,
        prop: &PropertyDef,
        check_editable: bool,
    ) -> Result<(), AccessError> {
        if self.is_null() {
            return Err(AccessError::NullPointer);
        }
        if check_editable && !self.is_editable(prop) {
            return Err(AccessError::NotEditable(prop.identifier.clone()));
        }
        Ok(())
    }

    pub(crate) fn strict(&self) -> bool {
        self.policy() == AccessPolicy::Strict
    }
}
