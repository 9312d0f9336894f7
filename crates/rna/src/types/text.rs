// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! String and enum callback bundles.

use super::{Access, EnumItemsFn, Getter, LengthFn, Setter};
use std::any::Any;

#[derive(Clone)]
pub struct StringDef {
    pub get: Getter<String>,
    pub set: Option<Setter<String>>,
    /// Byte length without materializing the value.
    pub length: Option<LengthFn>,
    /// Fixed buffer size in bytes including the terminator, 0 for unbounded.
    pub max_length: usize,
    pub default: String,
}

impl StringDef {
    pub fn new(get: Getter<String>, set: Option<Setter<String>>) -> Self {
        Self {
            get,
            set,
            length: None,
            max_length: 0,
            default: String::new(),
        }
    }

    /// Truncate `value` to fit the fixed buffer, on a char boundary.
    pub fn fit(&self, mut value: String) -> String {
        if self.max_length == 0 {
            return value;
        }
        let limit = self.max_length.saturating_sub(1);
        if value.len() > limit {
            let mut cut = limit;
            while cut > 0 && !value.is_char_boundary(cut) {
                cut -= 1;
            }
            value.truncate(cut);
        }
        value
    }
}

/// One selectable item of an enum property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub value: i32,
}

impl EnumItem {
    pub fn new(identifier: impl Into<String>, value: i32) -> Self {
        let identifier = identifier.into();
        Self {
            name: identifier.clone(),
            identifier,
            description: String::new(),
            value,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Clone)]
pub enum EnumItems {
    Static(Vec<EnumItem>),
    /// Items computed per instance (or without one, for UI listings).
    Dynamic(EnumItemsFn),
}

#[derive(Clone)]
pub struct EnumDef {
    pub access: Access<i32>,
    pub items: EnumItems,
    pub default: i32,
}

impl EnumDef {
    pub fn new(access: Access<i32>, items: EnumItems) -> Self {
        Self {
            access,
            items,
            default: 0,
        }
    }

    /// Items valid for `data`.
    pub fn items(&self, data: Option<&dyn Any>) -> Vec<EnumItem> {
        match &self.items {
            EnumItems::Static(items) => items.clone(),
            EnumItems::Dynamic(f) => f(data),
        }
    }

    /// Union of all item values, the valid bits of a flag enum.
    pub fn flag_mask(&self, data: Option<&dyn Any>) -> i32 {
        self.items(data).iter().fold(0, |acc, item| acc | item.value)
    }

    pub fn find_identifier(&self, data: Option<&dyn Any>, identifier: &str) -> Option<i32> {
        self.items(data)
            .into_iter()
            .find(|item| item.identifier == identifier)
            .map(|item| item.value)
    }

    pub fn find_value(&self, data: Option<&dyn Any>, value: i32) -> Option<EnumItem> {
        self.items(data).into_iter().find(|item| item.value == value)
    }
}
