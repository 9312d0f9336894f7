// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bool, int and float callback bundles.

use super::{ArrayGetter, ArraySetter, Getter, RangeFn, Setter};
use crate::config::DEFAULT_FLOAT_PRECISION;
use std::any::Any;

/// Scalar or array accessors for one element type.
pub enum Access<T> {
    Scalar {
        get: Getter<T>,
        set: Option<Setter<T>>,
    },
    Array {
        get: ArrayGetter<T>,
        set: Option<ArraySetter<T>>,
    },
}

impl<T> Clone for Access<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Scalar { get, set } => Self::Scalar {
                get: get.clone(),
                set: set.clone(),
            },
            Self::Array { get, set } => Self::Array {
                get: get.clone(),
                set: set.clone(),
            },
        }
    }
}

impl<T> Access<T> {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Whether a write callback exists.
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Scalar { set, .. } => set.is_some(),
            Self::Array { set, .. } => set.is_some(),
        }
    }
}

/// Integer field of any width that can host packed bool flags.
pub trait FlagBits: Copy + Any + Send + Sync {
    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_flag_bits {
    ($($t:ty),*) => {
        $(
            impl FlagBits for $t {
                #[inline]
                fn to_bits(self) -> u64 {
                    self as u64
                }
                #[inline]
                fn from_bits(bits: u64) -> Self {
                    bits as $t
                }
            }
        )*
    };
}

impl_flag_bits!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Integer field widened to `u64` for bit manipulation.
#[derive(Clone)]
pub struct BitField {
    pub get: Getter<u64>,
    pub set: Setter<u64>,
}

/// Where a bool lives.
#[derive(Clone)]
pub enum BoolStorage {
    /// Plain `bool` field (or `[bool; N]`).
    Direct(Access<bool>),
    /// One or more bits inside an integer field.
    Bit {
        field: BitField,
        /// Bits that must all be set for the property to read `true`.
        mask: u64,
        /// Storage holds the inverse of the exposed value.
        negated: bool,
    },
}

#[derive(Clone)]
pub struct BoolDef {
    pub storage: BoolStorage,
    pub default: bool,
    pub default_array: Vec<bool>,
}

impl BoolDef {
    pub fn new(storage: BoolStorage) -> Self {
        Self {
            storage,
            default: false,
            default_array: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct IntDef {
    pub access: Access<i32>,
    pub hard_min: i32,
    pub hard_max: i32,
    pub soft_min: i32,
    pub soft_max: i32,
    pub step: i32,
    /// Replaces the static hard range when present.
    pub range: Option<RangeFn<i32>>,
    pub default: i32,
    pub default_array: Vec<i32>,
}

impl IntDef {
    pub fn new(access: Access<i32>) -> Self {
        Self {
            access,
            hard_min: i32::MIN,
            hard_max: i32::MAX,
            soft_min: i32::MIN,
            soft_max: i32::MAX,
            step: 1,
            range: None,
            default: 0,
            default_array: Vec::new(),
        }
    }

    /// Effective hard range for an instance.
    pub fn hard_range(&self, data: Option<&dyn Any>) -> (i32, i32) {
        match (&self.range, data) {
            (Some(range), Some(d)) => range(d),
            _ => (self.hard_min, self.hard_max),
        }
    }

    /// Soft range, narrowed to the hard range.
    pub fn soft_range(&self, data: Option<&dyn Any>) -> (i32, i32) {
        let (min, max) = self.hard_range(data);
        (self.soft_min.max(min), self.soft_max.min(max))
    }

    /// Default of element `index` (scalar default when no table is given).
    pub fn default_at(&self, index: usize) -> i32 {
        self.default_array.get(index).copied().unwrap_or(self.default)
    }
}

#[derive(Clone)]
pub struct FloatDef {
    pub access: Access<f32>,
    pub hard_min: f32,
    pub hard_max: f32,
    pub soft_min: f32,
    pub soft_max: f32,
    pub step: f32,
    /// Decimal digits shown by UI.
    pub precision: u8,
    pub range: Option<RangeFn<f32>>,
    pub default: f32,
    pub default_array: Vec<f32>,
}

impl FloatDef {
    pub fn new(access: Access<f32>) -> Self {
        Self {
            access,
            hard_min: f32::MIN,
            hard_max: f32::MAX,
            soft_min: f32::MIN,
            soft_max: f32::MAX,
            step: 0.1,
            precision: DEFAULT_FLOAT_PRECISION,
            range: None,
            default: 0.0,
            default_array: Vec::new(),
        }
    }

    pub fn hard_range(&self, data: Option<&dyn Any>) -> (f32, f32) {
        match (&self.range, data) {
            (Some(range), Some(d)) => range(d),
            _ => (self.hard_min, self.hard_max),
        }
    }

    pub fn soft_range(&self, data: Option<&dyn Any>) -> (f32, f32) {
        let (min, max) = self.hard_range(data);
        (self.soft_min.max(min), self.soft_max.min(max))
    }

    pub fn default_at(&self, index: usize) -> f32 {
        self.default_array.get(index).copied().unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn scalar_int() -> Access<i32> {
        Access::Scalar {
            get: Arc::new(|_: &dyn Any| 0),
            set: None,
        }
    }

    #[test]
    fn test_flag_bits_truncate() {
        assert_eq!(u8::from_bits(0x1ff), 0xff);
        assert_eq!(0x80u8.to_bits(), 0x80);
        assert_eq!(i16::from_bits(1), 1);
    }

    #[test]
    fn test_soft_range_narrowed() {
        let mut def = IntDef::new(scalar_int());
        def.hard_min = 0;
        def.hard_max = 10;
        def.soft_min = -5;
        def.soft_max = 5;
        assert_eq!(def.soft_range(None), (0, 5));
        assert!(!def.access.is_writable());
    }

    #[test]
    fn test_range_callback_overrides_static() {
        let mut def = IntDef::new(scalar_int());
        def.range = Some(Arc::new(|_: &dyn Any| (2, 4)));
        let data = 0u8;
        assert_eq!(def.hard_range(Some(&data)), (2, 4));
        assert_eq!(def.hard_range(None), (i32::MIN, i32::MAX));
    }

    #[test]
    fn test_default_table() {
        let mut def = FloatDef::new(Access::Scalar {
            get: Arc::new(|_: &dyn Any| 0.0),
            set: None,
        });
        def.default = 1.0;
        def.default_array = vec![0.5, 0.25];
        assert_eq!(def.default_at(1), 0.25);
        assert_eq!(def.default_at(5), 1.0);
    }
}
