// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Capability and behavior flags for struct and property descriptors.

bitflags::bitflags! {
    /// Capabilities of a struct descriptor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct StructFlags: u32 {
        /// Instances are identity objects (own a data cell, have a name).
        const IS_ID                 = 1 << 0;
        /// Runtime subclasses may be registered after the registry is sealed.
        const SUPPORTS_REGISTRATION = 1 << 1;
        /// Registered at runtime through the extension API.
        const RUNTIME_DEFINED       = 1 << 2;
        /// Instances are skipped entirely by the override engine.
        const NO_OVERRIDE           = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Access behavior of a property.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u32 {
        /// Writes are accepted (silently ignored otherwise).
        const EDITABLE          = 1 << 0;
        /// May be driven by animation curves.
        const ANIMATABLE        = 1 << 1;
        /// Pointer may not be set to null.
        const NEVER_NULL        = 1 << 2;
        /// Pointer holds a counted reference to an identity object.
        const ID_REFCOUNT       = 1 << 3;
        /// Must be provided by runtime-registered subclasses.
        const REGISTER_REQUIRED = 1 << 4;
        /// Not shown in generated UI.
        const HIDDEN            = 1 << 5;
        /// Enum value is a bitmask over item values.
        const ENUM_FLAG         = 1 << 6;
        /// Array length comes from a callback rather than the dimension table.
        const DYNAMIC_ARRAY     = 1 << 7;
        /// String length is queried from the length callback instead of
        /// materializing the value.
        const THICK_WRAP        = 1 << 8;
    }
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self::EDITABLE | Self::ANIMATABLE
    }
}

bitflags::bitflags! {
    /// Library-override behavior of a property.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct OverrideFlags: u32 {
        /// Differences produce override operations.
        const OVERRIDABLE        = 1 << 0;
        /// Never compared by the diff engine.
        const NO_COMPARISON      = 1 << 1;
        /// Compared and reported, but never produces an operation.
        const IGNORE             = 1 << 2;
        /// Collection accepts locally inserted items.
        const SUPPORTS_INSERTION = 1 << 3;
        /// Collection items are matched by position, never by name.
        const NO_PROP_NAME       = 1 << 4;
    }
}
