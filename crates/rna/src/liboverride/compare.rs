// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-aware value helpers shared by the override passes.

use crate::config::AccessConfig;
use crate::error::OverrideError;
use crate::pointer::Pointer;
use crate::value::Value;

/// Runtime access settings of the registry owning `ptr`.
pub(crate) fn config_of(ptr: &Pointer) -> AccessConfig {
    ptr.registry().map(|r| r.config()).unwrap_or_default()
}

/// Both roots are non-null and share a struct type.
pub(crate) fn check_roots(expected: &Pointer, other: &Pointer) -> Result<(), OverrideError> {
    if expected.is_null() || other.is_null() {
        return Err(OverrideError::NullPointer);
    }
    if expected.type_name() != other.type_name() {
        return Err(OverrideError::TypeMismatch {
            expected: expected.type_name().to_string(),
            found: other.type_name().to_string(),
        });
    }
    Ok(())
}

/// Value equality; floats honor the configured tolerance, arrays compare
/// element-wise.
pub(crate) fn values_match(config: &AccessConfig, a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => config.floats_equal(*x, *y),
        (Value::FloatArray(x), Value::FloatArray(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| config.floats_equal(*x, *y))
        }
        _ => a == b,
    }
}

/// ID pointer equality: same object, or same type and name.
pub(crate) fn ids_match(a: &Pointer, b: &Pointer) -> bool {
    match (a.is_null(), b.is_null()) {
        (true, true) => true,
        (false, false) => {
            if a.same_data(b) {
                return true;
            }
            let name = a.name();
            a.type_name() == b.type_name() && name.is_some() && name == b.name()
        }
        _ => false,
    }
}

/// Element `index` of an array value, as a scalar.
pub(crate) fn element_of(value: &Value, index: usize) -> Option<Value> {
    match value {
        Value::BoolArray(v) => v.get(index).copied().map(Value::Bool),
        Value::IntArray(v) => v.get(index).copied().map(Value::Int),
        Value::FloatArray(v) => v.get(index).copied().map(Value::Float),
        _ => None,
    }
}

/// `array` with element `index` replaced by the scalar `element`.
pub(crate) fn with_element(array: Value, index: usize, element: &Value) -> Option<Value> {
    let value = match (array, element) {
        (Value::BoolArray(mut v), Value::Bool(e)) => {
            *v.get_mut(index)? = *e;
            Value::BoolArray(v)
        }
        (Value::IntArray(mut v), Value::Int(e)) => {
            *v.get_mut(index)? = *e;
            Value::IntArray(v)
        }
        (Value::FloatArray(mut v), Value::Float(e)) => {
            *v.get_mut(index)? = *e;
            Value::FloatArray(v)
        }
        _ => return None,
    };
    Some(value)
}

/// Numeric operands of an int or float value; `None` for other kinds.
pub(crate) fn numbers(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Int(v) => Some(vec![f64::from(*v)]),
        Value::Float(v) => Some(vec![f64::from(*v)]),
        Value::IntArray(v) => Some(v.iter().map(|x| f64::from(*x)).collect()),
        Value::FloatArray(v) => Some(v.iter().map(|x| f64::from(*x)).collect()),
        _ => None,
    }
}

/// Value of the same kind and shape as `like` holding `nums`.
pub(crate) fn from_numbers(like: &Value, nums: &[f64]) -> Option<Value> {
    let value = match like {
        Value::Int(_) => Value::Int(nums.first()?.round() as i32),
        Value::Float(_) => Value::Float(*nums.first()? as f32),
        Value::IntArray(_) => Value::IntArray(nums.iter().map(|x| x.round() as i32).collect()),
        Value::FloatArray(_) => Value::FloatArray(nums.iter().map(|x| *x as f32).collect()),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_tolerance() {
        let exact = AccessConfig::default();
        let loose = AccessConfig {
            float_tolerance: 0.01,
            ..AccessConfig::default()
        };
        let a = Value::FloatArray(vec![1.0, 2.0]);
        let b = Value::FloatArray(vec![1.0, 2.005]);
        assert!(!values_match(&exact, &a, &b));
        assert!(values_match(&loose, &a, &b));
        assert!(!values_match(&loose, &a, &Value::FloatArray(vec![1.0])));
        assert!(!values_match(&loose, &Value::Int(1), &Value::Float(1.0)));
    }

    #[test]
    fn test_null_ids_match_only_null() {
        assert!(ids_match(&Pointer::null(), &Pointer::null()));
    }

    #[test]
    fn test_element_helpers() {
        let v = Value::IntArray(vec![1, 2, 3]);
        assert_eq!(element_of(&v, 1), Some(Value::Int(2)));
        assert_eq!(element_of(&v, 3), None);
        assert_eq!(
            with_element(v.clone(), 2, &Value::Int(9)),
            Some(Value::IntArray(vec![1, 2, 9]))
        );
        assert_eq!(with_element(v, 0, &Value::Float(1.0)), None);
    }

    #[test]
    fn test_number_conversions_keep_shape() {
        let like = Value::FloatArray(vec![0.0; 2]);
        assert_eq!(numbers(&Value::Int(4)), Some(vec![4.0]));
        assert_eq!(
            from_numbers(&like, &[0.5, 1.5]),
            Some(Value::FloatArray(vec![0.5, 1.5]))
        );
        assert_eq!(from_numbers(&Value::Int(0), &[2.6]), Some(Value::Int(3)));
        assert!(numbers(&Value::from("x")).is_none());
    }
}
