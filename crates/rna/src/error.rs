// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the reflection core.
//!
//! Organized by subsystem: registry, access protocol, path resolution and
//! override engine. Access errors are only surfaced by the `try_*` entry
//! points; the plain setters recover from them locally.

use crate::liboverride::OverrideOpKind;
use std::fmt;

/// Errors produced by the type registry and struct definition builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A struct with the same identifier is already registered.
    DuplicateIdentifier(String),
    /// No struct with that identifier is registered.
    NotFound(String),
    /// The declared base struct is not registered.
    UnknownBase {
        /// Struct being registered.
        identifier: String,
        /// Missing base identifier.
        base: String,
    },
    /// Two properties share an identifier in the flattened (base-included) set.
    DuplicateProperty {
        /// Struct owning the clash.
        identifier: String,
        /// Clashing property identifier.
        property: String,
    },
    /// The base struct does not accept runtime registration.
    NotRegistrable(String),
    /// The registry is sealed and only accepts extension types.
    Sealed(String),
    /// Other registered structs still derive from this one.
    InUse {
        /// Struct that was asked to unregister.
        identifier: String,
        /// First registered struct found deriving from it.
        derived: String,
    },
    /// The definition itself is malformed.
    InvalidDefinition(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentifier(id) => write!(f, "struct '{}' is already registered", id),
            Self::NotFound(id) => write!(f, "struct '{}' is not registered", id),
            Self::UnknownBase { identifier, base } => {
                write!(f, "struct '{}' derives from unregistered '{}'", identifier, base)
            }
            Self::DuplicateProperty {
                identifier,
                property,
            } => write!(
                f,
                "struct '{}' defines property '{}' more than once",
                identifier, property
            ),
            Self::NotRegistrable(id) => {
                write!(f, "struct '{}' does not support runtime registration", id)
            }
            Self::Sealed(id) => write!(f, "registry is sealed, cannot change '{}'", id),
            Self::InUse {
                identifier,
                derived,
            } => write!(f, "struct '{}' is still the base of '{}'", identifier, derived),
            Self::InvalidDefinition(msg) => write!(f, "invalid definition: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors reported by the `try_*` access entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessError {
    /// The property is not editable on this instance.
    NotEditable(String),
    /// Numeric value outside the hard range (strict policy only).
    OutOfRange {
        /// Property identifier.
        property: String,
        /// Rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The value or operation does not match the property type.
    TypeMismatch {
        /// Property identifier.
        property: String,
        /// What the operation expected.
        expected: &'static str,
    },
    /// The pointer has no data, or its data cell is already borrowed.
    NullPointer,
    /// Scalar access on an array property, or the reverse.
    NotArray(String),
    /// Element index past the array length.
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Array length.
        length: usize,
    },
    /// Enum value matching none of the items.
    InvalidEnumValue {
        /// Property identifier.
        property: String,
        /// Rejected value.
        value: i32,
    },
    /// The property has no callback for this operation.
    Unsupported(String),
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEditable(prop) => write!(f, "property '{}' is not editable", prop),
            Self::OutOfRange {
                property,
                value,
                min,
                max,
            } => write!(
                f,
                "value {} for '{}' outside [{}, {}]",
                value, property, min, max
            ),
            Self::TypeMismatch { property, expected } => {
                write!(f, "property '{}' expects {}", property, expected)
            }
            Self::NullPointer => write!(f, "null or unavailable pointer"),
            Self::NotArray(prop) => write!(f, "array/scalar mismatch on '{}'", prop),
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "index out of bounds: {} >= {}", index, length)
            }
            Self::InvalidEnumValue { property, value } => {
                write!(f, "value {} is not an item of enum '{}'", value, property)
            }
            Self::Unsupported(msg) => write!(f, "unsupported operation: {}", msg),
        }
    }
}

impl std::error::Error for AccessError {}

/// Errors from property path parsing and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment did not resolve (unknown identifier, index or key).
    NotFound {
        /// Full path being resolved.
        path: String,
        /// Offending segment as written.
        segment: String,
    },
    /// A segment was applied to something of the wrong kind.
    TypeMismatch {
        /// Full path being resolved.
        path: String,
        /// Description of the mismatch.
        reason: String,
    },
    /// The path text is malformed.
    Syntax {
        /// Full path being parsed.
        path: String,
        /// Byte offset of the error.
        position: usize,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path, segment } => {
                write!(f, "path '{}' not found at '{}'", path, segment)
            }
            Self::TypeMismatch { path, reason } => {
                write!(f, "path '{}' type mismatch: {}", path, reason)
            }
            Self::Syntax { path, position } => {
                write!(f, "malformed path '{}' at byte {}", path, position)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Hard failures of a whole diff/store/apply call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    /// The handles do not share a struct type.
    TypeMismatch {
        /// Struct of the first handle.
        expected: String,
        /// Struct of the offending handle.
        found: String,
    },
    /// One of the root handles is null.
    NullPointer,
}

impl fmt::Display for OverrideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "override type mismatch: expected '{}', got '{}'", expected, found)
            }
            Self::NullPointer => write!(f, "override root pointer is null"),
        }
    }
}

impl std::error::Error for OverrideError {}

/// Non-fatal problem met while storing or applying an override.
///
/// Collected into the store and apply reports; the call carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideWarning {
    /// A differential operation was turned into `Replace`.
    Downgraded {
        /// Property path of the operation.
        path: String,
        /// Kind before the downgrade.
        from: OverrideOpKind,
    },
    /// The path does not resolve on one of the handles.
    PathNotFound {
        /// Unresolved path.
        path: String,
        /// Resolver error text.
        reason: String,
    },
    /// A differential operation has no stored value to combine.
    MissingStorage(String),
    /// The operation kind does not apply to the target property.
    UnsupportedOperation {
        /// Property path of the operation.
        path: String,
        /// Rejected kind.
        kind: OverrideOpKind,
    },
    /// Insertion anchor or inserted item not found.
    AnchorNotFound {
        /// Collection path.
        path: String,
        /// Item name or position that was looked up.
        anchor: String,
    },
    /// The access protocol refused the write.
    WriteRefused {
        /// Property path of the operation.
        path: String,
        /// Access error text.
        reason: String,
    },
}

impl fmt::Display for OverrideWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downgraded { path, from } => {
                write!(f, "'{}': {} override downgraded to replace", path, from.name())
            }
            Self::PathNotFound { path, reason } => {
                write!(f, "override path '{}' unresolved: {}", path, reason)
            }
            Self::MissingStorage(path) => write!(f, "'{}': no stored override value", path),
            Self::UnsupportedOperation { path, kind } => {
                write!(f, "'{}': {} is not supported here", path, kind.name())
            }
            Self::AnchorNotFound { path, anchor } => {
                write!(f, "'{}': item '{}' not found", path, anchor)
            }
            Self::WriteRefused { path, reason } => {
                write!(f, "'{}': write refused: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for OverrideWarning {}

/// Errors from override persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// Serialization or parse failure.
    Format(String),
    /// Filesystem failure.
    IoError(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(msg) => write!(f, "format error: {}", msg),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {}

/// Result alias for registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
