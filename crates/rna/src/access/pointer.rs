// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{log_dropped, type_mismatch};
use crate::error::AccessError;
use crate::pointer::{IdRef, Pointer, Step};
use crate::types::{
    PointerAccess, PointerDef, PropertyDef, PropertyFlags, PropertyRef, PropertyType, StructRef,
};

fn pointer_def(prop: &PropertyDef) -> Result<&PointerDef, AccessError> {
    match &prop.ty {
        PropertyType::Pointer(def) => Ok(def),
        _ => Err(type_mismatch(prop, "pointer")),
    }
}

impl Pointer {
    /// Registered descriptor for `identifier` in this handle's registry.
    pub(crate) fn lookup_struct(&self, identifier: &str) -> Option<StructRef> {
        self.registry()?.find(identifier)
    }

    /// Follow a pointer property.
    ///
    /// The result is refined to the most-derived registered struct and is
    /// null when the target is unset or its struct is not registered.
    pub fn get_pointer(&self, prop: &PropertyRef) -> Pointer {
        let Ok(def) = pointer_def(prop) else {
            return Pointer::null();
        };
        let Some(target) = self.lookup_struct(&def.target) else {
            log::debug!(
                "[access::get_pointer] '{}' targets unregistered struct '{}'",
                prop.identifier,
                def.target
            );
            return Pointer::null();
        };
        match &def.access {
            PointerAccess::Nested { .. } => {
                self.child(&target, Step::Nested(PropertyRef::clone(prop)))
            }
            PointerAccess::Id { get, .. } => match self.read(|d| get(d)).flatten() {
                Some(id) => Pointer::from_id(&target, &id),
                None => Pointer::null(),
            },
        }
    }

    /// Point an ID pointer property at `value` (or clear it with a null handle).
    pub fn set_pointer(&self, prop: &PropertyDef, value: &Pointer) {
        log_dropped("set_pointer", prop, self.try_set_pointer(prop, value));
    }

    /// Like [`set_pointer`](Self::set_pointer), reporting why a write was refused.
    pub fn try_set_pointer(&self, prop: &PropertyDef, value: &Pointer) -> Result<(), AccessError> {
        self.write_pointer(prop, value, true)
    }

    pub(crate) fn write_pointer(
        &self,
        prop: &PropertyDef,
        value: &Pointer,
        check: bool,
    ) -> Result<(), AccessError> {
        let def = pointer_def(prop)?;
        let PointerAccess::Id { set: Some(set), .. } = &def.access else {
            return Err(AccessError::Unsupported(format!(
                "'{}' is not an assignable ID pointer",
                prop.identifier
            )));
        };
        self.precheck(prop, check)?;

        let id: Option<IdRef> = if value.is_null() {
            if prop.flags.contains(PropertyFlags::NEVER_NULL) {
                return Err(AccessError::NullPointer);
            }
            None
        } else {
            if !value.is_a(&def.target) {
                return Err(AccessError::TypeMismatch {
                    property: prop.identifier.clone(),
                    expected: "pointer to the target struct",
                });
            }
            match (value.is_root(), value.root()) {
                (true, Some(root)) => Some(root.clone()),
                _ => {
                    return Err(AccessError::Unsupported(format!(
                        "'{}' only accepts identity objects",
                        prop.identifier
                    )))
                }
            }
        };
        self.write(|d| set(d, id)).ok_or(AccessError::NullPointer)
    }
}
