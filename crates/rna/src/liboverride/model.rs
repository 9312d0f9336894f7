// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Persistent override records.

use crate::value::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What an operation does to its target property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverrideOpKind {
    /// Placeholder; never applied.
    #[default]
    Noop,
    /// Copy the local value over the reference value.
    Replace,
    /// `reference + stored`.
    Add,
    /// `reference - stored`.
    Subtract,
    /// `reference * stored`.
    Multiply,
    /// Insert a local item after an anchor item.
    InsertAfter,
    /// Insert a local item before an anchor item.
    InsertBefore,
}

impl OverrideOpKind {
    /// Operations whose stored value is relative to the reference.
    pub fn is_differential(&self) -> bool {
        matches!(self, Self::Add | Self::Subtract | Self::Multiply)
    }

    pub fn is_insertion(&self) -> bool {
        matches!(self, Self::InsertAfter | Self::InsertBefore)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Replace => "replace",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::InsertAfter => "insert-after",
            Self::InsertBefore => "insert-before",
        }
    }
}

bitflags::bitflags! {
    /// Per-operation state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct OperationFlags: u8 {
        /// Created by the system, not removable by the user.
        const MANDATORY                 = 1 << 0;
        /// Diffing never modifies or replaces this operation.
        const LOCKED                    = 1 << 1;
        /// ID pointer override that still targets the reference's ID.
        const IDPOINTER_MATCH_REFERENCE = 1 << 2;
    }
}

/// One recorded divergence.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverrideOperation {
    pub kind: OverrideOpKind,
    pub flags: OperationFlags,
    /// Anchor item in the reference collection (insertions).
    pub subitem_reference_name: Option<String>,
    /// Affected item in the local collection (insertions).
    pub subitem_local_name: Option<String>,
    pub subitem_reference_index: Option<usize>,
    /// Array element or local collection position the operation targets.
    pub subitem_local_index: Option<usize>,
    /// Stored value of a differential operation.
    pub value: Option<Value>,
}

impl OverrideOperation {
    pub fn new(kind: OverrideOpKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Operation on a single array element.
    pub fn element(kind: OverrideOpKind, index: usize) -> Self {
        Self {
            kind,
            subitem_reference_index: Some(index),
            subitem_local_index: Some(index),
            ..Self::default()
        }
    }

    pub fn with_flags(mut self, flags: OperationFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(OperationFlags::LOCKED)
    }

    /// Whether this operation addresses the given sub-item.
    ///
    /// `None` matches only an absent field.
    pub fn matches(
        &self,
        reference_name: Option<&str>,
        local_name: Option<&str>,
        reference_index: Option<usize>,
        local_index: Option<usize>,
    ) -> bool {
        self.subitem_reference_name.as_deref() == reference_name
            && self.subitem_local_name.as_deref() == local_name
            && self.subitem_reference_index == reference_index
            && self.subitem_local_index == local_index
    }
}

/// Every operation recorded for one property path.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverrideProperty {
    /// Path relative to the overridden ID.
    pub path: String,
    pub operations: Vec<OverrideOperation>,
    /// `LOCKED` here protects every operation of the property.
    pub flags: OperationFlags,
}

impl OverrideProperty {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(OperationFlags::LOCKED)
            || self.operations.iter().any(OverrideOperation::is_locked)
    }

    pub fn operation_find(
        &self,
        reference_name: Option<&str>,
        local_name: Option<&str>,
        reference_index: Option<usize>,
        local_index: Option<usize>,
    ) -> Option<&OverrideOperation> {
        self.operations
            .iter()
            .find(|op| op.matches(reference_name, local_name, reference_index, local_index))
    }

    /// Operation for a sub-item, created with `kind` if missing.
    ///
    /// Returns the operation and whether it was created.
    pub fn operation_ensure(
        &mut self,
        kind: OverrideOpKind,
        reference_name: Option<&str>,
        local_name: Option<&str>,
        reference_index: Option<usize>,
        local_index: Option<usize>,
    ) -> (&mut OverrideOperation, bool) {
        let found = self
            .operations
            .iter()
            .position(|op| op.matches(reference_name, local_name, reference_index, local_index));
        let (index, created) = match found {
            Some(index) => (index, false),
            None => {
                self.operations.push(OverrideOperation {
                    kind,
                    subitem_reference_name: reference_name.map(str::to_string),
                    subitem_local_name: local_name.map(str::to_string),
                    subitem_reference_index: reference_index,
                    subitem_local_index: local_index,
                    ..OverrideOperation::default()
                });
                (self.operations.len() - 1, true)
            }
        };
        (&mut self.operations[index], created)
    }
}

/// Override data of one local ID.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LibraryOverride {
    /// Name of the linked reference ID.
    pub reference: Option<String>,
    pub properties: Vec<OverrideProperty>,
}

impl LibraryOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            properties: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverrideProperty> {
        self.properties.iter()
    }

    pub fn property(&self, path: &str) -> Option<&OverrideProperty> {
        self.properties.iter().find(|p| p.path == path)
    }

    pub fn property_mut(&mut self, path: &str) -> Option<&mut OverrideProperty> {
        self.properties.iter_mut().find(|p| p.path == path)
    }

    /// Property record for `path`, created if missing.
    ///
    /// Returns the record and whether it was created.
    pub fn ensure_property(&mut self, path: &str) -> (&mut OverrideProperty, bool) {
        let (index, created) = match self.properties.iter().position(|p| p.path == path) {
            Some(index) => (index, false),
            None => {
                self.properties.push(OverrideProperty::new(path));
                (self.properties.len() - 1, true)
            }
        };
        (&mut self.properties[index], created)
    }

    pub fn remove_property(&mut self, path: &str) -> Option<OverrideProperty> {
        let index = self.properties.iter().position(|p| p.path == path)?;
        Some(self.properties.remove(index))
    }

    /// Shorthand for [`OverrideProperty::operation_find`] on `path`.
    pub fn operation_find(
        &self,
        path: &str,
        reference_name: Option<&str>,
        local_name: Option<&str>,
        reference_index: Option<usize>,
        local_index: Option<usize>,
    ) -> Option<&OverrideOperation> {
        self.property(path)?
            .operation_find(reference_name, local_name, reference_index, local_index)
    }

    /// Drop properties left without operations.
    pub fn prune(&mut self) -> usize {
        let before = self.properties.len();
        self.properties.retain(|p| !p.operations.is_empty());
        before - self.properties.len()
    }
}
