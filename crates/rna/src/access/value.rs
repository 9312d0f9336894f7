// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{log_dropped, type_mismatch};
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{PropertyDef, PropertyType};
use crate::value::Value;

impl Pointer {
    /// Current value as a detached [`Value`]; `None` for pointers and
    /// collections.
    pub fn get_value(&self, prop: &PropertyDef) -> Option<Value> {
        let value = match (&prop.ty, prop.is_array()) {
            (PropertyType::Bool(_), false) => Value::Bool(self.get_bool(prop)),
            (PropertyType::Bool(_), true) => Value::BoolArray(self.bool_array(prop)),
            (PropertyType::Int(_), false) => Value::Int(self.get_int(prop)),
            (PropertyType::Int(_), true) => Value::IntArray(self.int_array(prop)),
            (PropertyType::Float(_), false) => Value::Float(self.get_float(prop)),
            (PropertyType::Float(_), true) => Value::FloatArray(self.float_array(prop)),
            (PropertyType::String(_), _) => Value::String(self.get_string(prop)),
            (PropertyType::Enum(_), _) => Value::Enum(self.get_enum(prop)),
            (PropertyType::Pointer(_) | PropertyType::Collection(_), _) => return None,
        };
        Some(value)
    }

    /// Store a [`Value`] with the same recovery rules as the typed setters.
    pub fn set_value(&self, prop: &PropertyDef, value: &Value) {
        log_dropped("set_value", prop, self.write_value(prop, value, true));
    }

    /// Store a [`Value`], reporting refused writes.
    ///
    /// # Errors
    ///
    /// `NotEditable`, `TypeMismatch`, `NotArray`, `InvalidEnumValue`,
    /// `NullPointer`, and `OutOfRange` under the strict policy.
    pub fn try_set_value(&self, prop: &PropertyDef, value: &Value) -> Result<(), AccessError> {
        self.write_value(prop, value, true)
    }

    pub(crate) fn write_value(
        &self,
        prop: &PropertyDef,
        value: &Value,
        check: bool,
    ) -> Result<(), AccessError> {
        match (&prop.ty, prop.is_array(), value) {
            (PropertyType::Bool(_), false, Value::Bool(v)) => self.write_bool(prop, *v, check),
            (PropertyType::Bool(_), true, Value::BoolArray(v)) => {
                self.write_bool_array(prop, v, check)
            }
            (PropertyType::Int(_), false, Value::Int(v)) => self.write_int(prop, *v, check),
            (PropertyType::Int(_), true, Value::IntArray(v)) => {
                self.write_int_array(prop, v, check)
            }
            (PropertyType::Float(_), false, Value::Float(_) | Value::Int(_)) => {
                let v = value.as_float().unwrap_or_default();
                self.write_float(prop, v, check)
            }
            (PropertyType::Float(_), true, Value::FloatArray(v)) => {
                self.write_float_array(prop, v, check)
            }
            (PropertyType::String(_), _, Value::String(v)) => self.write_string(prop, v, check),
            (PropertyType::Enum(_), _, Value::Enum(v) | Value::Int(v)) => {
                self.write_enum(prop, *v, check)
            }
            (_, is_array, v) if prop.kind().is_value() && v.is_array() != is_array => {
                Err(AccessError::NotArray(prop.identifier.clone()))
            }
            _ => Err(type_mismatch(prop, prop.kind().name())),
        }
    }

    /// Default value for this instance's array length.
    pub fn default_value(&self, prop: &PropertyDef) -> Option<Value> {
        let len = self.array_length(prop);
        let value = match &prop.ty {
            PropertyType::Bool(def) if prop.is_array() => Value::BoolArray(
                (0..len)
                    .map(|i| def.default_array.get(i).copied().unwrap_or(def.default))
                    .collect(),
            ),
            PropertyType::Bool(def) => Value::Bool(def.default),
            PropertyType::Int(def) if prop.is_array() => {
                Value::IntArray((0..len).map(|i| def.default_at(i)).collect())
            }
            PropertyType::Int(def) => Value::Int(def.default),
            PropertyType::Float(def) if prop.is_array() => {
                Value::FloatArray((0..len).map(|i| def.default_at(i)).collect())
            }
            PropertyType::Float(def) => Value::Float(def.default),
            PropertyType::String(def) => Value::String(def.default.clone()),
            PropertyType::Enum(def) => Value::Enum(def.default),
            PropertyType::Pointer(_) | PropertyType::Collection(_) => return None,
        };
        Some(value)
    }

    /// Restore the default value; `false` if nothing was written.
    pub fn reset_to_default(&self, prop: &PropertyDef) -> bool {
        let Some(value) = self.default_value(prop) else {
            return false;
        };
        let result = self.write_value(prop, &value, true);
        let written = result.is_ok();
        log_dropped("reset_to_default", prop, result);
        written
    }
}
