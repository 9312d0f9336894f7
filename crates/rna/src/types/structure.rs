// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct descriptor and its flattened property index.

use super::{PropertyRef, RefineFn, StructFlags};
use crate::registry::RegistryInner;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};

/// Shared handle to a registered struct descriptor.
pub type StructRef = Arc<StructDef>;

/// Flattened (base-first) property list with an identifier map.
#[derive(Debug, Default)]
pub struct PropertyIndex {
    ordered: Vec<PropertyRef>,
    by_id: HashMap<String, usize>,
}

impl PropertyIndex {
    pub fn iter(&self) -> impl Iterator<Item = &PropertyRef> {
        self.ordered.iter()
    }

    pub fn get(&self, identifier: &str) -> Option<&PropertyRef> {
        self.by_id.get(identifier).map(|&i| &self.ordered[i])
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Descriptor of one kind of reflectable record.
pub struct StructDef {
    pub identifier: String,
    pub name: String,
    pub description: String,
    /// Single-inheritance base, resolved through the registry.
    pub base: Option<String>,
    pub flags: StructFlags,
    /// Own properties only, in definition order.
    pub properties: Vec<PropertyRef>,
    /// String property used as the item key in collections.
    pub name_property: Option<String>,
    /// Collection property that paths may index directly (`ptr[0]`).
    pub iterator_property: Option<String>,
    pub refine: Option<RefineFn>,
    pub(crate) registry: RwLock<Weak<RegistryInner>>,
    index: RwLock<Option<(u64, Arc<PropertyIndex>)>>,
}

impl StructDef {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            name: identifier.clone(),
            identifier,
            description: String::new(),
            base: None,
            flags: StructFlags::empty(),
            properties: Vec::new(),
            name_property: None,
            iterator_property: None,
            refine: None,
            registry: RwLock::new(Weak::new()),
            index: RwLock::new(None),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn is_id(&self) -> bool {
        self.flags.contains(StructFlags::IS_ID)
    }

    /// Whether the descriptor is still linked to a live registry.
    pub fn is_registered(&self) -> bool {
        self.registry.read().strong_count() > 0
    }

    /// Registered base descriptor, if any.
    pub fn base(&self) -> Option<StructRef> {
        let id = self.base.as_deref()?;
        let registry = self.registry.read().upgrade()?;
        registry.find(id)
    }

    /// `true` if `ancestor` is this struct or one of its bases.
    pub fn is_a(&self, ancestor: &str) -> bool {
        if self.identifier == ancestor {
            return true;
        }
        let mut current = self.base();
        while let Some(def) = current {
            if def.identifier == ancestor {
                return true;
            }
            current = def.base();
        }
        false
    }

    /// Flattened property index, base properties first.
    ///
    /// Rebuilt lazily when the registry generation moves on; unregistered
    /// descriptors expose only their own properties.
    pub fn property_index(&self) -> Arc<PropertyIndex> {
        let registry = self.registry.read().upgrade();
        let generation = registry
            .as_ref()
            .map(|r| r.generation.load(Ordering::Acquire))
            .unwrap_or(u64::MAX);

        if let Some((cached, index)) = self.index.read().as_ref() {
            if *cached == generation {
                return Arc::clone(index);
            }
        }

        let mut chain = Vec::new();
        let mut current = self.base();
        while let Some(def) = current {
            current = def.base();
            chain.push(def);
        }

        let mut index = PropertyIndex::default();
        let own = self.properties.iter();
        let inherited = chain.iter().rev().flat_map(|def| def.properties.iter());
        for prop in inherited.chain(own) {
            // Redefinitions (registration properties of extensions) keep the
            // base slot.
            if let Some(&slot) = index.by_id.get(&prop.identifier) {
                index.ordered[slot] = Arc::clone(prop);
                continue;
            }
            index
                .by_id
                .insert(prop.identifier.clone(), index.ordered.len());
            index.ordered.push(Arc::clone(prop));
        }

        let index = Arc::new(index);
        *self.index.write() = Some((generation, Arc::clone(&index)));
        log::trace!(
            "[StructDef::property_index] rebuilt '{}' ({} properties, generation {})",
            self.identifier,
            index.len(),
            generation
        );
        index
    }

    /// Look up a property by identifier through the base chain.
    pub fn find_property(&self, identifier: &str) -> Option<PropertyRef> {
        self.property_index().get(identifier).cloned()
    }

    /// Property used as the item key, resolved through the base chain.
    pub fn name_property(&self) -> Option<PropertyRef> {
        let mut current: Option<StructRef> = None;
        let mut name = self.name_property.clone();
        while name.is_none() {
            let next = match &current {
                Some(def) => def.base(),
                None => self.base(),
            }?;
            name = next.name_property.clone();
            current = Some(next);
        }
        name.and_then(|id| self.find_property(&id))
    }

    /// Collection indexed by `ptr[..]` path segments.
    pub fn iterator_property(&self) -> Option<PropertyRef> {
        let id = match &self.iterator_property {
            Some(id) => id.clone(),
            None => return self.base().and_then(|b| b.iterator_property()),
        };
        self.find_property(&id)
    }

    /// Most-derived registered descriptor for an instance.
    ///
    /// Falls back to `self` when there is no refine callback or the
    /// callback names a struct that is unknown or not derived from `self`.
    pub fn refine(self: &Arc<Self>, data: &dyn Any) -> StructRef {
        let Some(refine) = &self.refine else {
            return Arc::clone(self);
        };
        let Some(id) = refine(data) else {
            return Arc::clone(self);
        };
        if id == self.identifier {
            return Arc::clone(self);
        }
        let found = self
            .registry
            .read()
            .upgrade()
            .and_then(|registry| registry.find(id));
        match found {
            Some(def) if def.is_a(&self.identifier) => def,
            _ => {
                log::debug!(
                    "[StructDef::refine] '{}' refined to unrelated or unknown '{}'",
                    self.identifier,
                    id
                );
                Arc::clone(self)
            }
        }
    }

    pub(crate) fn link(&self, registry: Weak<RegistryInner>) {
        *self.registry.write() = registry;
        *self.index.write() = None;
    }

    pub(crate) fn unlink(&self) {
        *self.registry.write() = Weak::new();
        *self.index.write() = None;
    }
}

impl fmt::Debug for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructDef")
            .field("identifier", &self.identifier)
            .field("base", &self.base)
            .field("flags", &self.flags)
            .field("properties", &self.properties.len())
            .finish()
    }
}
