// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{clamp_f32, log_dropped, no_setter, type_mismatch};
use crate::error::AccessError;
use crate::pointer::Pointer;
use crate::types::{Access, FloatDef, PropertyDef, PropertyType};

fn float_def(prop: &PropertyDef) -> Result<&FloatDef, AccessError> {
    match &prop.ty {
        PropertyType::Float(def) => Ok(def),
        _ => Err(type_mismatch(prop, "float")),
    }
}

fn out_of_range(prop: &PropertyDef, value: f32, min: f32, max: f32) -> AccessError {
    AccessError::OutOfRange {
        property: prop.identifier.clone(),
        value: f64::from(value),
        min: f64::from(min),
        max: f64::from(max),
    }
}

impl Pointer {
    pub fn get_float(&self, prop: &PropertyDef) -> f32 {
        match float_def(prop).map(|def| &def.access) {
            Ok(Access::Scalar { get, .. }) => self.read(|d| get(d)).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Store `value`, clamped into the hard range.
    pub fn set_float(&self, prop: &PropertyDef, value: f32) {
        log_dropped("set_float", prop, self.write_float(prop, value, true));
    }

    pub fn get_float_array(&self, prop: &PropertyDef, out: &mut [f32]) {
        let values = self.float_array(prop);
        let n = out.len().min(values.len());
        out[..n].copy_from_slice(&values[..n]);
    }

    pub fn float_array(&self, prop: &PropertyDef) -> Vec<f32> {
        let Ok(Access::Array { get, .. }) = float_def(prop).map(|def| &def.access) else {
            return Vec::new();
        };
        self.read(|d| {
            let mut buf = vec![0.0; prop.array_length(Some(d))];
            get(d, &mut buf);
            buf
        })
        .unwrap_or_default()
    }

    pub fn get_float_index(&self, prop: &PropertyDef, index: usize) -> f32 {
        self.float_array(prop).get(index).copied().unwrap_or(0.0)
    }

    pub fn set_float_array(&self, prop: &PropertyDef, values: &[f32]) {
        log_dropped("set_float_array", prop, self.write_float_array(prop, values, true));
    }

    pub fn set_float_index(&self, prop: &PropertyDef, index: usize, value: f32) {
        let mut values = self.float_array(prop);
        let length = values.len();
        let result = match values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                self.write_float_array(prop, &values, true)
            }
            None => Err(AccessError::IndexOutOfBounds { index, length }),
        };
        log_dropped("set_float_index", prop, result);
    }

    pub fn float_range(&self, prop: &PropertyDef) -> (f32, f32) {
        match float_def(prop) {
            Ok(def) => self
                .read(|d| def.hard_range(Some(d)))
                .unwrap_or_else(|| def.hard_range(None)),
            Err(_) => (0.0, 0.0),
        }
    }

    pub fn float_soft_range(&self, prop: &PropertyDef) -> (f32, f32) {
        match float_def(prop) {
            Ok(def) => self
                .read(|d| def.soft_range(Some(d)))
                .unwrap_or_else(|| def.soft_range(None)),
            Err(_) => (0.0, 0.0),
        }
    }

    pub fn float_step(&self, prop: &PropertyDef) -> f32 {
        float_def(prop).map(|def| def.step).unwrap_or(0.0)
    }

    /// Display precision in decimal digits.
    pub fn float_precision(&self, prop: &PropertyDef) -> u8 {
        float_def(prop).map(|def| def.precision).unwrap_or(0)
    }

    pub(crate) fn write_float(
        &self,
        prop: &PropertyDef,
        value: f32,
        check: bool,
    ) -> Result<(), AccessError> {
        let def = float_def(prop)?;
        let Access::Scalar { set, .. } = &def.access else {
            return Err(AccessError::NotArray(prop.identifier.clone()));
        };
        let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;

        let (min, max) = self.float_range(prop);
        if self.strict() && (value < min || value > max) {
            return Err(out_of_range(prop, value, min, max));
        }
        let value = clamp_f32(value, min, max);
        self.write(|d| set(d, value)).ok_or(AccessError::NullPointer)
    }

    pub(crate) fn write_float_array(
        &self,
        prop: &PropertyDef,
        values: &[f32],
        check: bool,
    ) -> Result<(), AccessError> {
        let def = float_def(prop)?;
        let Access::Array { set, .. } = &def.access else {
            return Err(AccessError::NotArray(prop.identifier.clone()));
        };
        let set = set.as_ref().ok_or_else(|| no_setter(prop))?;
        self.precheck(prop, check)?;

        let (min, max) = self.float_range(prop);
        let strict = self.strict();
        let mut buf = self.float_array(prop);
        for (slot, &value) in buf.iter_mut().zip(values) {
            if strict && (value < min || value > max) {
                return Err(out_of_range(prop, value, min, max));
            }
            *slot = clamp_f32(value, min, max);
        }
        self.write(|d| set(d, &buf)).ok_or(AccessError::NullPointer)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{AccessConfig, AccessPolicy, DEFAULT_FLOAT_PRECISION};
    use crate::error::AccessError;
    use crate::fixtures::{self, Settings};
    use crate::value::Value;

    #[test]
    fn test_float_array_elements_clamp() {
        let registry = fixtures::registry();
        let settings = fixtures::settings_pointer(&registry, Settings::default());
        let weights = settings.find_property("weights").expect("weights");

        settings.set_float_array(&weights, &[0.25, 3.0, 9.0]);
        assert_eq!(settings.float_array(&weights), vec![0.25, 1.0]);
        settings.set_float_index(&weights, 0, -1.0);
        assert_eq!(settings.get_float_index(&weights, 0), 0.0);
        settings.set_float_index(&weights, 2, 0.5);
        assert_eq!(settings.get_float_index(&weights, 2), 0.0);
        assert_eq!(settings.array_dimensions(&weights), vec![2]);
    }

    #[test]
    fn test_strict_array_write_is_all_or_nothing() {
        let registry = fixtures::registry();
        let settings = fixtures::settings_pointer(&registry, Settings::default());
        let weights = settings.find_property("weights").expect("weights");
        settings.set_float_array(&weights, &[0.5, 0.5]);

        registry.set_config(AccessConfig {
            policy: AccessPolicy::Strict,
            ..Default::default()
        });
        let refused = settings.try_set_value(&weights, &Value::FloatArray(vec![0.1, 2.0]));
        assert!(matches!(refused, Err(AccessError::OutOfRange { .. })));
        assert_eq!(settings.float_array(&weights), vec![0.5, 0.5]);
        assert_eq!(
            settings.try_set_value(&weights, &Value::Float(0.1)),
            Err(AccessError::NotArray("weights".to_string()))
        );
    }

    #[test]
    fn test_float_ui_metadata() {
        let registry = fixtures::registry();
        let settings = fixtures::settings_pointer(&registry, Settings::default());
        let scene = fixtures::scene_pointer(&registry, fixtures::scene());
        let weights = settings.find_property("weights").expect("weights");
        let scale = scene.find_property("scale").expect("scale");

        assert_eq!(settings.float_range(&weights), (0.0, 1.0));
        assert_eq!(settings.float_soft_range(&weights), (0.0, 1.0));
        assert!((settings.float_step(&weights) - 0.05).abs() < 1e-6);
        assert_eq!(settings.float_precision(&weights), 5);
        assert_eq!(scene.float_precision(&scale), DEFAULT_FLOAT_PRECISION);
    }
}
