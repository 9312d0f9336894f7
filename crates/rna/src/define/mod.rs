// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Definition builders.
//!
//! Produce [`StructDef`]s and their callback bundles from typed field
//! projections, so native structs can be exposed without hand-writing
//! type-erased accessors.
//!
//! # Example
//!
//! ```
//! use rna::define::{field, PropertyBuilder, StructBuilder};
//! use rna::registry::Registry;
//!
//! #[derive(Default)]
//! struct Point { x: f32, tag: String }
//!
//! let registry = Registry::new();
//! let point = StructBuilder::new("Point")
//!     .property(PropertyBuilder::float("x", field(|p: &Point| &p.x, |p| &mut p.x)).range(0.0, 1.0))
//!     .property(PropertyBuilder::string("tag", field(|p: &Point| &p.tag, |p| &mut p.tag)))
//!     .name_property("tag")
//!     .register(&registry)
//!     .unwrap();
//! assert_eq!(point.property_index().len(), 2);
//! ```

mod collection;
mod field;
mod listbase;
mod property;

pub use field::{field, Field};
pub use listbase::{Iter as ListIter, ListBase};
pub use property::PropertyBuilder;

use crate::error::{RegistryError, Result};
use crate::registry::{validate_struct, Registry};
use crate::types::{StructDef, StructFlags, StructRef};
use std::any::Any;
use std::sync::Arc;

/// Builder for a [`StructDef`].
pub struct StructBuilder {
    def: StructDef,
    pending: Vec<PropertyBuilder>,
}

impl StructBuilder {
    pub fn new(identifier: &str) -> Self {
        Self {
            def: StructDef::new(identifier),
            pending: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.def.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.def.description = description.to_string();
        self
    }

    pub fn base(mut self, base: &str) -> Self {
        self.def.base = Some(base.to_string());
        self
    }

    pub fn flags(mut self, flags: StructFlags) -> Self {
        self.def.flags |= flags;
        self
    }

    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.pending.push(property);
        self
    }

    pub fn name_property(mut self, identifier: &str) -> Self {
        self.def.name_property = Some(identifier.to_string());
        self
    }

    pub fn iterator_property(mut self, identifier: &str) -> Self {
        self.def.iterator_property = Some(identifier.to_string());
        self
    }

    /// Most-derived struct identifier for an instance of `T`.
    pub fn refine<T: Any>(
        mut self,
        f: impl Fn(&T) -> Option<&'static str> + Send + Sync + 'static,
    ) -> Self {
        self.def.refine = Some(Arc::new(move |d: &dyn Any| {
            d.downcast_ref::<T>().and_then(&f)
        }));
        self
    }

    /// Finish and validate the definition.
    ///
    /// # Errors
    ///
    /// `InvalidDefinition` for a malformed identifier or property (empty
    /// collection item type, array shape mismatch, recorded builder misuse).
    pub fn build(self) -> Result<StructDef> {
        let mut def = self.def;
        for pending in self.pending {
            def.properties.push(Arc::new(pending.into_def()?));
        }
        validate_struct(&def)?;
        Ok(def)
    }

    /// Build and register in one step.
    pub fn register(self, registry: &Registry) -> Result<StructRef> {
        registry.register(self.build()?)
    }

    /// Build and register as a runtime extension of `base`.
    pub fn register_extension(self, registry: &Registry, base: &str) -> Result<StructRef> {
        let def = self.build()?;
        if def.base.as_deref().is_some_and(|b| b != base) {
            return Err(RegistryError::InvalidDefinition(format!(
                "'{}' declares base {:?} but extends '{}'",
                def.identifier, def.base, base
            )));
        }
        registry.register_extension(base, def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyKind;

    #[derive(Default, Clone)]
    struct Item {
        name: String,
    }

    #[derive(Default)]
    struct Owner {
        items: Vec<Item>,
    }

    #[test]
    fn test_collection_needs_item_type() {
        let result = StructBuilder::new("Owner")
            .property(PropertyBuilder::vec_collection(
                "items",
                "",
                field(|o: &Owner| &o.items, |o| &mut o.items),
            ))
            .build();
        assert!(matches!(result, Err(RegistryError::InvalidDefinition(_))));
    }

    #[test]
    fn test_collection_not_editable_by_default() {
        let def = StructBuilder::new("Owner")
            .property(PropertyBuilder::vec_collection(
                "items",
                "Item",
                field(|o: &Owner| &o.items, |o| &mut o.items),
            ))
            .build()
            .expect("build");
        let prop = &def.properties[0];
        assert_eq!(prop.kind(), PropertyKind::Collection);
        assert!(!prop.is_editable(None));
    }

    #[test]
    fn test_skip_on_counted_rejected() {
        let result = StructBuilder::new("Owner")
            .property(
                PropertyBuilder::counted_collection(
                    "items",
                    "Item",
                    |o: &Owner| o.items.len(),
                    |o: &Owner, i| o.items.get(i),
                    |o: &mut Owner, i| o.items.get_mut(i),
                )
                .skip(|i: &Item| i.name.is_empty()),
            )
            .build();
        assert!(matches!(result, Err(RegistryError::InvalidDefinition(_))));
    }

    #[test]
    fn test_extension_base_mismatch() {
        let registry = Registry::new();
        let result = StructBuilder::new("Ext")
            .base("Other")
            .register_extension(&registry, "Panel");
        assert!(matches!(result, Err(RegistryError::InvalidDefinition(_))));
    }
}
