// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global configuration for the reflection core.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: compile-time limits shared by definitions, paths
//!   and arrays.
//! - **Level 2 (Dynamic)**: [`AccessConfig`], owned by the
//!   [`Registry`](crate::registry::Registry) and swappable at runtime.
//!
//! # Example
//!
//! ```
//! use rna::config::{AccessConfig, AccessPolicy};
//! use rna::registry::Registry;
//!
//! let registry = Registry::new();
//! registry.set_config(AccessConfig {
//!     policy: AccessPolicy::Strict,
//!     ..AccessConfig::default()
//! });
//! assert_eq!(registry.config().policy, AccessPolicy::Strict);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =======================================================================
// Static limits
// =======================================================================

/// Maximum number of array dimensions a property may declare.
pub const MAX_ARRAY_DIMENSION: usize = 3;

/// Maximum byte length of struct and property identifiers.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Maximum number of segments accepted by the path parser.
pub const MAX_PATH_DEPTH: usize = 64;

/// Decimal digits shown for float properties without explicit precision.
pub const DEFAULT_FLOAT_PRECISION: u8 = 3;

/// Divisor magnitude under which a multiplicative override is not stored.
///
/// Reference values this close to zero make `local / reference` meaningless.
pub const FLOAT_MULTIPLY_EPSILON: f32 = 1e-12;

// =======================================================================
// Runtime configuration
// =======================================================================

/// How numeric writes outside the hard range are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccessPolicy {
    /// Clamp into `[hard_min, hard_max]` (interactive default).
    #[default]
    Lenient,
    /// Leave the value unchanged and report `OutOfRange` from `try_*` calls.
    Strict,
}

/// Runtime access settings shared by every pointer of a registry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AccessConfig {
    /// Out-of-range write policy.
    pub policy: AccessPolicy,
    /// Absolute tolerance used when diffing float properties (0 = exact).
    pub float_tolerance: f32,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            policy: AccessPolicy::Lenient,
            float_tolerance: 0.0,
        }
    }
}

impl AccessConfig {
    /// Parse a configuration from JSON text.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, crate::error::PersistError> {
        serde_json::from_str(text).map_err(|e| crate::error::PersistError::Format(e.to_string()))
    }

    /// Compare two floats using the configured tolerance.
    pub fn floats_equal(&self, a: f32, b: f32) -> bool {
        if a.is_nan() || b.is_nan() {
            return a.is_nan() && b.is_nan();
        }
        if self.float_tolerance > 0.0 {
            (a - b).abs() <= self.float_tolerance
        } else {
            a == b
        }
    }
}
