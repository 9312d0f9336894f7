// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent property definitions over native fields.

use super::field::{copy_prefix, Field};
use crate::error::RegistryError;
use crate::pointer::IdRef;
use crate::types::{
    Access, ArrayShape, BitField, BoolDef, BoolStorage, EnumDef, EnumItem, EnumItems,
    EnumItemsFn, FlagBits, FloatDef, IntDef, OverrideFlags, PointerAccess, PointerDef,
    PropertyDef, PropertyFlags, PropertyType, StringDef, Subtype,
};
use crate::value::Value;
use std::any::Any;
use std::sync::Arc;

/// Builder for one [`PropertyDef`].
///
/// Constructor mistakes (a range on a string, a dimension table that does not
/// match the field) are recorded and reported by
/// [`StructBuilder::build`](super::StructBuilder::build).
///
/// # Example
///
/// ```
/// use rna::define::{field, PropertyBuilder};
///
/// struct Point { x: f32 }
///
/// let prop = PropertyBuilder::float("x", field(|p: &Point| &p.x, |p| &mut p.x))
///     .range(0.0, 1.0)
///     .overridable()
///     .into_def()
///     .unwrap();
/// assert_eq!(prop.identifier, "x");
/// ```
pub struct PropertyBuilder {
    def: PropertyDef,
    error: Option<String>,
}

impl PropertyBuilder {
    /// Wrap a hand-built callback bundle.
    pub fn custom(identifier: &str, ty: PropertyType) -> Self {
        Self {
            def: PropertyDef::new(identifier, ty),
            error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Bool
    // -----------------------------------------------------------------------

    pub fn boolean<T: Any>(identifier: &str, field: Field<T, bool>) -> Self {
        let access = Access::Scalar {
            get: field.getter(|v| *v),
            set: Some(field.setter(|v, new| *v = new)),
        };
        Self::custom(
            identifier,
            PropertyType::Bool(BoolDef::new(BoolStorage::Direct(access))),
        )
    }

    pub fn bool_array<T: Any, const N: usize>(
        identifier: &str,
        field: Field<T, [bool; N]>,
    ) -> Self {
        let access = Access::Array {
            get: field.reader(|v, out| copy_prefix(out, &v[..])),
            set: Some(field.writer(|v, input| copy_prefix(&mut v[..], input))),
        };
        Self::custom(
            identifier,
            PropertyType::Bool(BoolDef::new(BoolStorage::Direct(access))),
        )
        .shape(ArrayShape::Fixed(vec![N]))
    }

    /// Bool stored as `mask` bits of an integer flag field.
    pub fn bool_bit<T: Any, B: FlagBits>(identifier: &str, field: Field<T, B>, mask: u64) -> Self {
        let bits = BitField {
            get: field.getter(|v: &B| v.to_bits()),
            set: field.setter(|v: &mut B, bits: u64| *v = B::from_bits(bits)),
        };
        Self::custom(
            identifier,
            PropertyType::Bool(BoolDef::new(BoolStorage::Bit {
                field: bits,
                mask,
                negated: false,
            })),
        )
    }

    /// Expose the inverse of a bit-packed bool.
    pub fn negated(mut self) -> Self {
        match &mut self.def.ty {
            PropertyType::Bool(BoolDef {
                storage: BoolStorage::Bit { negated, .. },
                ..
            }) => *negated = true,
            _ => self.fail("negated() applies to bit-packed bools"),
        }
        self
    }

    // -----------------------------------------------------------------------
    // Numeric
    // -----------------------------------------------------------------------

    pub fn int<T: Any>(identifier: &str, field: Field<T, i32>) -> Self {
        let access = Access::Scalar {
            get: field.getter(|v| *v),
            set: Some(field.setter(|v, new| *v = new)),
        };
        Self::custom(identifier, PropertyType::Int(IntDef::new(access)))
    }

    pub fn int_array<T: Any, const N: usize>(identifier: &str, field: Field<T, [i32; N]>) -> Self {
        let access = Access::Array {
            get: field.reader(|v, out| copy_prefix(out, &v[..])),
            set: Some(field.writer(|v, input| copy_prefix(&mut v[..], input))),
        };
        Self::custom(identifier, PropertyType::Int(IntDef::new(access)))
            .shape(ArrayShape::Fixed(vec![N]))
    }

    pub fn float<T: Any>(identifier: &str, field: Field<T, f32>) -> Self {
        let access = Access::Scalar {
            get: field.getter(|v| *v),
            set: Some(field.setter(|v, new| *v = new)),
        };
        Self::custom(identifier, PropertyType::Float(FloatDef::new(access)))
    }

    pub fn float_array<T: Any, const N: usize>(
        identifier: &str,
        field: Field<T, [f32; N]>,
    ) -> Self {
        let access = Access::Array {
            get: field.reader(|v, out| copy_prefix(out, &v[..])),
            set: Some(field.writer(|v, input| copy_prefix(&mut v[..], input))),
        };
        Self::custom(identifier, PropertyType::Float(FloatDef::new(access)))
            .shape(ArrayShape::Fixed(vec![N]))
    }

    /// Dynamic-length float array over a `Vec`; writes never resize it.
    pub fn float_vec<T: Any>(identifier: &str, field: Field<T, Vec<f32>>, max: usize) -> Self {
        let access = Access::Array {
            get: field.reader(|v: &Vec<f32>, out| copy_prefix(out, &v[..])),
            set: Some(field.writer(|v: &mut Vec<f32>, input| copy_prefix(&mut v[..], input))),
        };
        let length = field.getter(|v: &Vec<f32>| v.len());
        Self::custom(identifier, PropertyType::Float(FloatDef::new(access)))
            .shape(ArrayShape::Dynamic { length, max })
            .flag(PropertyFlags::DYNAMIC_ARRAY)
    }

    // -----------------------------------------------------------------------
    // String / enum
    // -----------------------------------------------------------------------

    pub fn string<T: Any>(identifier: &str, field: Field<T, String>) -> Self {
        let mut def = StringDef::new(
            field.getter(|v: &String| v.clone()),
            Some(field.setter(|v: &mut String, new| *v = new)),
        );
        def.length = Some(field.getter(|v: &String| v.len()));
        Self::custom(identifier, PropertyType::String(def)).flag(PropertyFlags::THICK_WRAP)
    }

    pub fn enumeration<T: Any>(
        identifier: &str,
        field: Field<T, i32>,
        items: Vec<EnumItem>,
    ) -> Self {
        let default = items.first().map(|i| i.value).unwrap_or(0);
        let mut def = EnumDef::new(
            Access::Scalar {
                get: field.getter(|v| *v),
                set: Some(field.setter(|v, new| *v = new)),
            },
            EnumItems::Static(items),
        );
        def.default = default;
        Self::custom(identifier, PropertyType::Enum(def))
    }

    /// Enum whose items are computed per instance.
    pub fn enumeration_dynamic<T: Any>(
        identifier: &str,
        field: Field<T, i32>,
        items: EnumItemsFn,
    ) -> Self {
        let def = EnumDef::new(
            Access::Scalar {
                get: field.getter(|v| *v),
                set: Some(field.setter(|v, new| *v = new)),
            },
            EnumItems::Dynamic(items),
        );
        Self::custom(identifier, PropertyType::Enum(def))
    }

    // -----------------------------------------------------------------------
    // Pointers
    // -----------------------------------------------------------------------

    /// Pointer to a struct embedded in the same data.
    pub fn nested<T: Any, U: Any>(identifier: &str, target: &str, field: Field<T, U>) -> Self {
        let def = PointerDef {
            target: target.to_string(),
            access: PointerAccess::Nested {
                get: field.projector(),
                get_mut: field.projector_mut(),
            },
        };
        Self::custom(identifier, PropertyType::Pointer(def))
    }

    /// Reference to an identity object. Not editable unless flagged.
    pub fn id_pointer<T: Any>(
        identifier: &str,
        target: &str,
        field: Field<T, Option<IdRef>>,
    ) -> Self {
        let def = PointerDef {
            target: target.to_string(),
            access: PointerAccess::Id {
                get: field.getter(|v: &Option<IdRef>| v.clone()),
                set: Some(field.setter(|v: &mut Option<IdRef>, new| *v = new)),
            },
        };
        Self::custom(identifier, PropertyType::Pointer(def)).flag(PropertyFlags::ID_REFCOUNT)
    }

    // -----------------------------------------------------------------------
    // Metadata modifiers
    // -----------------------------------------------------------------------

    pub fn name(mut self, name: &str) -> Self {
        self.def.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.def.description = description.to_string();
        self
    }

    pub fn subtype(mut self, subtype: Subtype) -> Self {
        self.def.subtype = subtype;
        self
    }

    pub fn flag(mut self, flags: PropertyFlags) -> Self {
        self.def.flags |= flags;
        self
    }

    pub fn clear_flag(mut self, flags: PropertyFlags) -> Self {
        self.def.flags.remove(flags);
        self
    }

    pub fn editable(self) -> Self {
        self.flag(PropertyFlags::EDITABLE)
    }

    pub fn read_only(self) -> Self {
        self.clear_flag(PropertyFlags::EDITABLE)
    }

    /// Per-instance editability check.
    pub fn editable_fn<T: Any>(mut self, f: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.def.editable_fn = Some(Arc::new(move |d: &dyn Any| {
            d.downcast_ref::<T>().map(&f).unwrap_or(false)
        }));
        self
    }

    pub fn override_flags(mut self, flags: OverrideFlags) -> Self {
        self.def.override_flags |= flags;
        self
    }

    pub fn overridable(self) -> Self {
        self.override_flags(OverrideFlags::OVERRIDABLE)
    }

    pub fn enum_flag(self) -> Self {
        self.flag(PropertyFlags::ENUM_FLAG)
    }

    /// Replace the array shape with a multi-dimensional table.
    ///
    /// The product of `dims` must equal the current length.
    pub fn dimensions(mut self, dims: &[usize]) -> Self {
        let current = match &self.def.array {
            Some(ArrayShape::Fixed(d)) => d.iter().product::<usize>(),
            _ => {
                self.fail("dimensions() requires a fixed-size array");
                return self;
            }
        };
        if dims.iter().product::<usize>() != current {
            self.fail("dimension table does not match the array length");
            return self;
        }
        self.def.array = Some(ArrayShape::Fixed(dims.to_vec()));
        self
    }

    fn shape(mut self, shape: ArrayShape) -> Self {
        self.def.array = Some(shape);
        self
    }

    // -----------------------------------------------------------------------
    // Numeric modifiers
    // -----------------------------------------------------------------------

    /// Hard range; soft range follows unless set separately.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        match &mut self.def.ty {
            PropertyType::Int(def) => {
                def.hard_min = min as i32;
                def.hard_max = max as i32;
                def.soft_min = def.soft_min.max(def.hard_min);
                def.soft_max = def.soft_max.min(def.hard_max);
            }
            PropertyType::Float(def) => {
                def.hard_min = min as f32;
                def.hard_max = max as f32;
                def.soft_min = def.soft_min.max(def.hard_min);
                def.soft_max = def.soft_max.min(def.hard_max);
            }
            _ => self.fail("range() applies to int and float properties"),
        }
        self
    }

    pub fn soft_range(mut self, min: f64, max: f64) -> Self {
        match &mut self.def.ty {
            PropertyType::Int(def) => {
                def.soft_min = min as i32;
                def.soft_max = max as i32;
            }
            PropertyType::Float(def) => {
                def.soft_min = min as f32;
                def.soft_max = max as f32;
            }
            _ => self.fail("soft_range() applies to int and float properties"),
        }
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        match &mut self.def.ty {
            PropertyType::Int(def) => def.step = step as i32,
            PropertyType::Float(def) => def.step = step as f32,
            _ => self.fail("step() applies to int and float properties"),
        }
        self
    }

    pub fn precision(mut self, digits: u8) -> Self {
        match &mut self.def.ty {
            PropertyType::Float(def) => def.precision = digits,
            _ => self.fail("precision() applies to float properties"),
        }
        self
    }

    /// Instance-dependent hard range for an int property.
    pub fn int_range_fn<T: Any>(
        mut self,
        f: impl Fn(&T) -> (i32, i32) + Send + Sync + 'static,
    ) -> Self {
        match &mut self.def.ty {
            PropertyType::Int(def) => {
                def.range = Some(Arc::new(move |d: &dyn Any| {
                    d.downcast_ref::<T>().map(&f).unwrap_or((i32::MIN, i32::MAX))
                }))
            }
            _ => self.fail("int_range_fn() applies to int properties"),
        }
        self
    }

    /// Instance-dependent hard range for a float property.
    pub fn float_range_fn<T: Any>(
        mut self,
        f: impl Fn(&T) -> (f32, f32) + Send + Sync + 'static,
    ) -> Self {
        match &mut self.def.ty {
            PropertyType::Float(def) => {
                def.range = Some(Arc::new(move |d: &dyn Any| {
                    d.downcast_ref::<T>().map(&f).unwrap_or((f32::MIN, f32::MAX))
                }))
            }
            _ => self.fail("float_range_fn() applies to float properties"),
        }
        self
    }

    /// Byte size of a fixed string buffer, terminator included.
    pub fn max_length(mut self, bytes: usize) -> Self {
        match &mut self.def.ty {
            PropertyType::String(def) => def.max_length = bytes,
            _ => self.fail("max_length() applies to string properties"),
        }
        self
    }

    /// Default used by `reset_to_default`.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        let ok = match (&mut self.def.ty, value) {
            (PropertyType::Bool(def), Value::Bool(v)) => {
                def.default = v;
                true
            }
            (PropertyType::Bool(def), Value::BoolArray(v)) => {
                def.default_array = v;
                true
            }
            (PropertyType::Int(def), Value::Int(v)) => {
                def.default = v;
                true
            }
            (PropertyType::Int(def), Value::IntArray(v)) => {
                def.default_array = v;
                true
            }
            (PropertyType::Float(def), Value::Float(v)) => {
                def.default = v;
                true
            }
            (PropertyType::Float(def), Value::Int(v)) => {
                def.default = v as f32;
                true
            }
            (PropertyType::Float(def), Value::FloatArray(v)) => {
                def.default_array = v;
                true
            }
            (PropertyType::String(def), Value::String(v)) => {
                def.default = v;
                true
            }
            (PropertyType::Enum(def), Value::Enum(v) | Value::Int(v)) => {
                def.default = v;
                true
            }
            _ => false,
        };
        if !ok {
            self.fail("default value does not match the property type");
        }
        self
    }

    /// Access the descriptor being built (for collection modifiers).
    pub(crate) fn def_mut(&mut self) -> &mut PropertyDef {
        &mut self.def
    }

    pub(crate) fn fail(&mut self, msg: &str) {
        if self.error.is_none() {
            self.error = Some(format!("{}: {}", self.def.identifier, msg));
        }
    }

    /// Finish the descriptor.
    pub fn into_def(self) -> Result<PropertyDef, RegistryError> {
        match self.error {
            Some(msg) => Err(RegistryError::InvalidDefinition(msg)),
            None => Ok(self.def),
        }
    }
}
