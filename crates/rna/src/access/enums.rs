// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{log_dropped, no_setter, type_mismatch};
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{Access, EnumDef, EnumItem, PropertyDef, PropertyType};

fn enum_def(prop: &PropertyDef) -> Result<&EnumDef, AccessError> {
    match &prop.ty {
        PropertyType::Enum(def) => Ok(def),
        _ => Err(type_mismatch(prop, "enum")),
    }
}

impl Pointer {
    pub fn get_enum(&self, prop: &PropertyDef) -> i32 {
        match enum_def(prop).map(|def| &def.access) {
            Ok(Access::Scalar { get, .. }) => self.read(|d| get(d)).unwrap_or(0),
            _ => 0,
        }
    }

    /// Store an enum value.
    ///
    /// Flag enums are masked with the union of item values; other enums
    /// ignore values matching no item.
    pub fn set_enum(&self, prop: &PropertyDef, value: i32) {
        log_dropped("set_enum", prop, self.write_enum(prop, value, true));
    }

    /// Items valid for this instance.
    pub fn enum_items(&self, prop: &PropertyDef) -> Vec<EnumItem> {
        match enum_def(prop) {
            Ok(def) => self
                .read(|d| def.items(Some(d)))
                .unwrap_or_else(|| def.items(None)),
            Err(_) => Vec::new(),
        }
    }

    /// Identifier of the item matching the current value.
    pub fn enum_identifier(&self, prop: &PropertyDef) -> Option<String> {
        let def = enum_def(prop).ok()?;
        let value = self.get_enum(prop);
        self.read(|d| def.find_value(Some(d), value))
            .unwrap_or_else(|| def.find_value(None, value))
            .map(|item| item.identifier)
    }

    /// Identifiers of every item whose bits are set (flag enums).
    pub fn enum_flag_identifiers(&self, prop: &PropertyDef) -> Vec<String> {
        let value = self.get_enum(prop);
        self.enum_items(prop)
            .into_iter()
            .filter(|item| item.value != 0 && value & item.value == item.value)
            .map(|item| item.identifier)
            .collect()
    }

    /// Select an item by identifier; `false` when no item matches.
    pub fn set_enum_identifier(&self, prop: &PropertyDef, identifier: &str) -> bool {
        let found = enum_def(prop).ok().and_then(|def| {
            self.read(|d| def.find_identifier(Some(d), identifier))
                .unwrap_or_else(|| def.find_identifier(None, identifier))
        });
        match found {
            Some(value) => {
                self.set_enum(prop, value);
                true
            }
            None => {
                log::debug!(
                    "[access::set_enum_identifier] '{}' has no item '{}'",
                    prop.identifier,
                    identifier
                );
                false
            }
        }
    }

    pub(crate) fn write_enum(
        &self,
        prop: &PropertyDef,
        value: i32,
        check: bool,
    ) -> Result<(), AccessError> {
        let def = enum_def(prop)?;
        let Access::Scalar { set, .. } = &def.access else {
            return Err(AccessError::NotArray(prop.identifier.clone()));
        };
        let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;

        let value = if prop.is_flag_enum() {
            value & self.read(|d| def.flag_mask(Some(d))).unwrap_or(0)
        } else if self.read(|d| def.find_value(Some(d), value)).flatten().is_some() {
            value
        } else {
            return Err(AccessError::InvalidEnumValue {
                property: prop.identifier.clone(),
                value,
            });
        };
        self.write(|d| set(d, value)).ok_or(AccessError::NullPointer)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AccessError;
    use crate::fixtures::{self, Settings, CHANNEL_B, CHANNEL_R, MODE_EDIT, MODE_OBJECT};
    use crate::value::Value;

    #[test]
    fn test_flag_enum_masks_unknown_bits() {
        let registry = fixtures::registry();
        let settings = fixtures::settings_pointer(&registry, Settings::default());
        let channels = settings.find_property("channels").expect("channels");

        settings.set_enum(&channels, CHANNEL_R | CHANNEL_B | 0x40);
        assert_eq!(settings.get_enum(&channels), CHANNEL_R | CHANNEL_B);
        assert_eq!(settings.enum_flag_identifiers(&channels), vec!["R", "B"]);
        assert_eq!(settings.enum_identifier(&channels), None);

        settings.set_enum(&channels, 0);
        assert!(settings.enum_flag_identifiers(&channels).is_empty());
    }

    #[test]
    fn test_plain_enum_rejects_unknown_values() {
        let registry = fixtures::registry();
        let scene = fixtures::scene_pointer(&registry, fixtures::scene());
        let mode = scene.find_property("mode").expect("mode");

        scene.set_enum(&mode, 7);
        assert_eq!(scene.get_enum(&mode), MODE_OBJECT);
        assert_eq!(
            scene.try_set_value(&mode, &Value::Enum(7)),
            Err(AccessError::InvalidEnumValue {
                property: "mode".to_string(),
                value: 7,
            })
        );

        assert!(scene.set_enum_identifier(&mode, "EDIT"));
        assert_eq!(scene.get_enum(&mode), MODE_EDIT);
        assert_eq!(scene.enum_identifier(&mode).as_deref(), Some("EDIT"));
        assert!(!scene.set_enum_identifier(&mode, "SCULPT"));
        assert_eq!(scene.get_enum(&mode), MODE_EDIT);
        assert_eq!(scene.enum_items(&mode).len(), 2);
    }
}
