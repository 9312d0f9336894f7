// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{log_dropped, no_setter, type_mismatch};
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{PropertyDef, PropertyFlags, PropertyType, StringDef};

fn string_def(prop: &PropertyDef) -> Result<&StringDef, AccessError> {
    match &prop.ty {
        PropertyType::String(def) => Ok(def),
        _ => Err(type_mismatch(prop, "string")),
    }
}

impl Pointer {
    pub fn get_string(&self, prop: &PropertyDef) -> String {
        match string_def(prop) {
            Ok(def) => self.read(|d| (def.get)(d)).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    /// Byte length of the current value.
    pub fn string_length(&self, prop: &PropertyDef) -> usize {
        let Ok(def) = string_def(prop) else {
            return 0;
        };
        match &def.length {
            Some(length) if prop.flags.contains(PropertyFlags::THICK_WRAP) => {
                self.read(|d| length(d)).unwrap_or(0)
            }
            _ => self.get_string(prop).len(),
        }
    }

    /// Fixed buffer size in bytes, 0 when unbounded.
    pub fn string_max_length(&self, prop: &PropertyDef) -> usize {
        string_def(prop).map(|def| def.max_length).unwrap_or(0)
    }

    /// Store `value`, truncated to the buffer size on a char boundary.
    pub fn set_string(&self, prop: &PropertyDef, value: &str) {
        log_dropped("set_string", prop, self.write_string(prop, value, true));
    }

    pub(crate) fn write_string(
        &self,
        prop: &PropertyDef,
        value: &str,
        check: bool,
    ) -> Result<(), AccessError> {
        let def = string_def(prop)?;
        let set = def.set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;
        let value = def.fit(value.to_string());
        self.write(|d| set(d, value)).ok_or(AccessError::NullPointer)
    }

    /// Value of the struct's name property, if it has one.
    pub fn name(&self) -> Option<String> {
        let prop = self.struct_def()?.name_property()?;
        if self.is_null() {
            return None;
        }
        Some(self.get_string(&prop))
    }
}
