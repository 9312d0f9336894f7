// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property descriptor: metadata plus the typed callback bundle.

use super::{
    BoolDef, CollectionDef, EditableFn, EnumDef, FloatDef, IntDef, LengthFn, OverrideFlags,
    PointerDef, PropertyFlags, StringDef,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a property descriptor.
pub type PropertyRef = Arc<PropertyDef>;

/// Property type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    String,
    Enum,
    Pointer,
    Collection,
}

impl PropertyKind {
    /// Lowercase label used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Pointer => "pointer",
            Self::Collection => "collection",
        }
    }

    /// Kinds whose value can be carried by a [`Value`](crate::value::Value).
    pub fn is_value(&self) -> bool {
        !matches!(self, Self::Pointer | Self::Collection)
    }
}

/// Semantic hint for UI and unit display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subtype {
    #[default]
    None,
    Unsigned,
    Percentage,
    Factor,
    Angle,
    Distance,
    Color,
    Translation,
    Direction,
    Xyz,
    FilePath,
    Name,
}

/// Array layout of a bool/int/float property.
#[derive(Clone)]
pub enum ArrayShape {
    /// Static dimension table, e.g. `[4, 4]` for a matrix.
    Fixed(Vec<usize>),
    /// Length computed per instance, bounded by `max`.
    Dynamic {
        /// Current length of the instance.
        length: LengthFn,
        /// Upper bound enforced on the callback result.
        max: usize,
    },
}

impl ArrayShape {
    /// Element count for an instance (`data` is only consulted by dynamic shapes).
    pub fn length(&self, data: Option<&dyn Any>) -> usize {
        match self {
            Self::Fixed(dims) => dims.iter().product(),
            Self::Dynamic { length, max } => data.map(|d| length(d).min(*max)).unwrap_or(0),
        }
    }

    /// Dimension sizes for an instance.
    pub fn dimensions(&self, data: Option<&dyn Any>) -> Vec<usize> {
        match self {
            Self::Fixed(dims) => dims.clone(),
            Self::Dynamic { .. } => vec![self.length(data)],
        }
    }
}

impl fmt::Debug for ArrayShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(dims) => f.debug_tuple("Fixed").field(dims).finish(),
            Self::Dynamic { max, .. } => f.debug_struct("Dynamic").field("max", max).finish(),
        }
    }
}

/// Typed callback bundle, one variant per [`PropertyKind`].
#[derive(Clone)]
pub enum PropertyType {
    Bool(BoolDef),
    Int(IntDef),
    Float(FloatDef),
    String(StringDef),
    Enum(EnumDef),
    Pointer(PointerDef),
    Collection(CollectionDef),
}

impl PropertyType {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Float(_) => PropertyKind::Float,
            Self::String(_) => PropertyKind::String,
            Self::Enum(_) => PropertyKind::Enum,
            Self::Pointer(_) => PropertyKind::Pointer,
            Self::Collection(_) => PropertyKind::Collection,
        }
    }
}

/// Descriptor of one property of a struct.
///
/// Built through [`PropertyBuilder`](crate::define::PropertyBuilder) in most
/// cases; the fields are public so hand-written bundles can be registered
/// the same way.
#[derive(Clone)]
pub struct PropertyDef {
    /// Stable identifier used by paths and overrides.
    pub identifier: String,
    /// UI name.
    pub name: String,
    /// UI tooltip.
    pub description: String,
    pub flags: PropertyFlags,
    pub override_flags: OverrideFlags,
    pub subtype: Subtype,
    /// `None` for scalars.
    pub array: Option<ArrayShape>,
    /// Per-instance editability, checked after [`PropertyFlags::EDITABLE`].
    pub editable_fn: Option<EditableFn>,
    pub ty: PropertyType,
}

impl PropertyDef {
    /// Create a descriptor with the default flags for its kind.
    ///
    /// Scalars start editable and animatable; pointers and collections start
    /// with no flags.
    pub fn new(identifier: impl Into<String>, ty: PropertyType) -> Self {
        let identifier = identifier.into();
        let flags = if ty.kind().is_value() {
            PropertyFlags::default()
        } else {
            PropertyFlags::empty()
        };
        Self {
            name: identifier.clone(),
            identifier,
            description: String::new(),
            flags,
            override_flags: OverrideFlags::empty(),
            subtype: Subtype::None,
            array: None,
            editable_fn: None,
            ty,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> PropertyKind {
        self.ty.kind()
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    /// Element count, 0 for scalars.
    pub fn array_length(&self, data: Option<&dyn Any>) -> usize {
        self.array.as_ref().map(|a| a.length(data)).unwrap_or(0)
    }

    /// Static or per-instance editability.
    pub fn is_editable(&self, data: Option<&dyn Any>) -> bool {
        if !self.flags.contains(PropertyFlags::EDITABLE) {
            return false;
        }
        match (&self.editable_fn, data) {
            (Some(f), Some(d)) => f(d),
            _ => true,
        }
    }

    pub fn is_overridable(&self) -> bool {
        self.override_flags.contains(OverrideFlags::OVERRIDABLE)
    }

    /// Excluded from override comparison altogether.
    pub fn skips_comparison(&self) -> bool {
        self.override_flags.contains(OverrideFlags::NO_COMPARISON)
    }

    pub fn is_flag_enum(&self) -> bool {
        self.flags.contains(PropertyFlags::ENUM_FLAG)
    }
}

impl fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("identifier", &self.identifier)
            .field("kind", &self.kind())
            .field("flags", &self.flags)
            .field("override_flags", &self.override_flags)
            .field("array", &self.array)
            .finish()
    }
}
