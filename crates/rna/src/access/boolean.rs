// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{log_dropped, no_setter, type_mismatch};
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{Access, BoolDef, BoolStorage, PropertyDef, PropertyType};
use std::any::Any;

fn bool_def(prop: &PropertyDef) -> Result<&BoolDef, AccessError> {
    match &prop.ty {
        PropertyType::Bool(def) => Ok(def),
        _ => Err(type_mismatch(prop, "bool")),
    }
}

fn read_scalar(def: &BoolDef, d: &dyn Any) -> Option<bool> {
    match &def.storage {
        BoolStorage::Direct(Access::Scalar { get, .. }) => Some(get(d)),
        BoolStorage::Bit {
            field,
            mask,
            negated,
        } => {
            let set = (field.get)(d) & mask == *mask;
            Some(set != *negated)
        }
        BoolStorage::Direct(Access::Array { .. }) => None,
    }
}

impl Pointer {
    pub fn get_bool(&self, prop: &PropertyDef) -> bool {
        let Ok(def) = bool_def(prop) else {
            return false;
        };
        self.read(|d| read_scalar(def, d)).flatten().unwrap_or(false)
    }

    pub fn set_bool(&self, prop: &PropertyDef, value: bool) {
        log_dropped("set_bool", prop, self.write_bool(prop, value, true));
    }

    /// Fill `out` with the array elements; extra slots are left untouched.
    pub fn get_bool_array(&self, prop: &PropertyDef, out: &mut [bool]) {
        let values = self.bool_array(prop);
        let n = out.len().min(values.len());
        out[..n].copy_from_slice(&values[..n]);
    }

    /// All elements of a bool array property.
    pub fn bool_array(&self, prop: &PropertyDef) -> Vec<bool> {
        let Ok(def) = bool_def(prop) else {
            return Vec::new();
        };
        let BoolStorage::Direct(Access::Array { get, .. }) = &def.storage else {
            return Vec::new();
        };
        self.read(|d| {
            let mut buf = vec![false; prop.array_length(Some(d))];
            get(d, &mut buf);
            buf
        })
        .unwrap_or_default()
    }

    pub fn get_bool_index(&self, prop: &PropertyDef, index: usize) -> bool {
        self.bool_array(prop).get(index).copied().unwrap_or(false)
    }

    /// Write elements; long input is truncated, short input keeps the tail.
    pub fn set_bool_array(&self, prop: &PropertyDef, values: &[bool]) {
        log_dropped("set_bool_array", prop, self.write_bool_array(prop, values, true));
    }

    pub fn set_bool_index(&self, prop: &PropertyDef, index: usize, value: bool) {
        let result = self.bool_element_update(prop, index, value);
        log_dropped("set_bool_index", prop, result);
    }

    fn bool_element_update(
        &self,
        prop: &PropertyDef,
        index: usize,
        value: bool,
    ) -> Result<(), AccessError> {
        let mut values = self.bool_array(prop);
        let length = values.len();
        let slot = values
            .get_mut(index)
            .ok_or(AccessError::IndexOutOfBounds { index, length })?;
        *slot = value;
        self.write_bool_array(prop, &values, true)
    }

    pub(crate) fn write_bool(
        &self,
        prop: &PropertyDef,
        value: bool,
        check: bool,
    ) -> Result<(), AccessError> {
        let def = bool_def(prop)?;
        self.precheck(prop, check)?;
        match &def.storage {
            BoolStorage::Direct(Access::Scalar { set, .. }) => {
                let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
                self.write(|d| set(d, value)).ok_or(AccessError::NullPointer)
            }
            BoolStorage::Bit {
                field,
                mask,
                negated,
            } => self
                .write(|d| {
                    let bits = (field.get)(&*d);
                    let bits = if value != *negated {
                        bits | mask
                    } else {
                        bits & !mask
                    };
                    (field.set)(d, bits);
                })
                .ok_or(AccessError::NullPointer),
            BoolStorage::Direct(Access::Array { .. }) => {
                Err(AccessError::NotArray(prop.identifier.clone()))
            }
        }
    }

    pub(crate) fn write_bool_array(
        &self,
        prop: &PropertyDef,
        values: &[bool],
        check: bool,
    ) -> Result<(), AccessError> {
        let def = bool_def(prop)?;
        let BoolStorage::Direct(Access::Array { set, .. }) = &def.storage else {
            return Err(AccessError::NotArray(prop.identifier.clone()));
        };
        let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;

        let mut buf = self.bool_array(prop);
        let n = buf.len().min(values.len());
        buf[..n].copy_from_slice(&values[..n]);
        self.write(|d| set(d, &buf)).ok_or(AccessError::NullPointer)
    }
}
