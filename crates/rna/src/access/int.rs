// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{clamp_i32, log_dropped, no_setter, type_mismatch};
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{Access, IntDef, PropertyDef, PropertyType};

fn int_def(prop: &PropertyDef) -> Result<&IntDef, AccessError> {
    match &prop.ty {
        PropertyType::Int(def) => Ok(def),
        _ => Err(type_mismatch(prop, "int")),
    }
}

fn out_of_range(prop: &PropertyDef, value: i32, min: i32, max: i32) -> AccessError {
    AccessError::OutOfRange {
        property: prop.identifier.clone(),
        value: f64::from(value),
        min: f64::from(min),
        max: f64::from(max),
    }
}

impl Pointer {
    pub fn get_int(&self, prop: &PropertyDef) -> i32 {
        match int_def(prop).map(|def| &def.access) {
            Ok(Access::Scalar { get, .. }) => self.read(|d| get(d)).unwrap_or(0),
            _ => 0,
        }
    }

    /// Store `value`, clamped into the hard range.
    pub fn set_int(&self, prop: &PropertyDef, value: i32) {
        log_dropped("set_int", prop, self.write_int(prop, value, true));
    }

    pub fn get_int_array(&self, prop: &PropertyDef, out: &mut [i32]) {
        let values = self.int_array(prop);
        let n = out.len().min(values.len());
        out[..n].copy_from_slice(&values[..n]);
    }

    pub fn int_array(&self, prop: &PropertyDef) -> Vec<i32> {
        let Ok(Access::Array { get, .. }) = int_def(prop).map(|def| &def.access) else {
            return Vec::new();
        };
        self.read(|d| {
            let mut buf = vec![0; prop.array_length(Some(d))];
            get(d, &mut buf);
            buf
        })
        .unwrap_or_default()
    }

    pub fn get_int_index(&self, prop: &PropertyDef, index: usize) -> i32 {
        self.int_array(prop).get(index).copied().unwrap_or(0)
    }

    pub fn set_int_array(&self, prop: &PropertyDef, values: &[i32]) {
        log_dropped("set_int_array", prop, self.write_int_array(prop, values, true));
    }

    pub fn set_int_index(&self, prop: &PropertyDef, index: usize, value: i32) {
        let mut values = self.int_array(prop);
        let length = values.len();
        let result = match values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                self.write_int_array(prop, &values, true)
            }
            None => Err(AccessError::IndexOutOfBounds { index, length }),
        };
        log_dropped("set_int_index", prop, result);
    }

    /// Effective hard range on this instance.
    pub fn int_range(&self, prop: &PropertyDef) -> (i32, i32) {
        match int_def(prop) {
            Ok(def) => self
                .read(|d| def.hard_range(Some(d)))
                .unwrap_or_else(|| def.hard_range(None)),
            Err(_) => (0, 0),
        }
    }

    pub fn int_soft_range(&self, prop: &PropertyDef) -> (i32, i32) {
        match int_def(prop) {
            Ok(def) => self
                .read(|d| def.soft_range(Some(d)))
                .unwrap_or_else(|| def.soft_range(None)),
            Err(_) => (0, 0),
        }
    }

    pub fn int_step(&self, prop: &PropertyDef) -> i32 {
        int_def(prop).map(|def| def.step).unwrap_or(1)
    }

    pub(crate) fn write_int(
        &self,
        prop: &PropertyDef,
        value: i32,
        check: bool,
    ) -> Result<(), AccessError> {
        let def = int_def(prop)?;
        let Access::Scalar { set, .. } = &def.access else {
            return Err(AccessError::NotArray(prop.identifier.clone()));
        };
        let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;

        let (min, max) = self.int_range(prop);
        if self.strict() && (value < min || value > max) {
            return Err(out_of_range(prop, value, min, max));
        }
        let value = clamp_i32(value, min, max);
        self.write(|d| set(d, value)).ok_or(AccessError::NullPointer)
    }

    pub(crate) fn write_int_array(
        &self,
        prop: &PropertyDef,
        values: &[i32],
        check: bool,
    ) -> Result<(), AccessError> {
        let def = int_def(prop)?;
        let Access::Array { set, .. } = &def.access else {
            return Err(AccessError::NotArray(prop.identifier.clone()));
        };
        let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;

        let (min, max) = self.int_range(prop);
        let strict = self.strict();
        let mut buf = self.int_array(prop);
        for (slot, &value) in buf.iter_mut().zip(values) {
            if strict && (value < min || value > max) {
                return Err(out_of_range(prop, value, min, max));
            }
            *slot = clamp_i32(value, min, max);
        }
        self.write(|d| set(d, &buf)).ok_or(AccessError::NullPointer)
    }
}
