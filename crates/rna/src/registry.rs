// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: owns every struct descriptor by identifier.
//!
//! Descriptors are registered at startup, then the registry is usually
//! [sealed](Registry::seal). After sealing only runtime extension types
//! (subclasses of structs flagged `SUPPORTS_REGISTRATION`) can be added or
//! removed.

use crate::config::{AccessConfig, MAX_ARRAY_DIMENSION, MAX_IDENTIFIER_LEN};
use crate::error::{RegistryError, Result};
use crate::types::{
    ArrayShape, CollectionStorage, PropertyDef, PropertyFlags, PropertyIndex, PropertyKind,
    PropertyType, StructDef, StructFlags, StructRef,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) struct RegistryInner {
    structs: RwLock<HashMap<String, StructRef>>,
    pub(crate) generation: AtomicU64,
    sealed: AtomicBool,
    config: RwLock<AccessConfig>,
}

impl RegistryInner {
    pub(crate) fn find(&self, identifier: &str) -> Option<StructRef> {
        self.structs.read().get(identifier).cloned()
    }

    pub(crate) fn config(&self) -> AccessConfig {
        *self.config.read()
    }
}

/// Shared, thread-safe map of struct descriptors.
///
/// Cloning is cheap and yields a handle to the same registry.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty, unsealed registry with the default access config.
    pub fn new() -> Self {
        Self::with_config(AccessConfig::default())
    }

    pub fn with_config(config: AccessConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                structs: RwLock::new(HashMap::new()),
                generation: AtomicU64::new(0),
                sealed: AtomicBool::new(false),
                config: RwLock::new(config),
            }),
        }
    }

    /// Register a struct descriptor.
    ///
    /// # Errors
    ///
    /// - `Sealed` once [`seal`](Self::seal) has been called.
    /// - `DuplicateIdentifier` if the identifier is taken.
    /// - `UnknownBase` if the declared base is not registered.
    /// - `DuplicateProperty` on a clash in the flattened property set.
    /// - `InvalidDefinition` for malformed properties.
    pub fn register(&self, def: StructDef) -> Result<StructRef> {
        if self.is_sealed() {
            return Err(RegistryError::Sealed(def.identifier));
        }
        self.insert(def, false)
    }

    /// Register a runtime subclass of `base`.
    ///
    /// Accepted after sealing. The base must carry
    /// [`StructFlags::SUPPORTS_REGISTRATION`], and every base property
    /// flagged [`PropertyFlags::REGISTER_REQUIRED`] must be redefined by the
    /// extension.
    pub fn register_extension(&self, base: &str, mut def: StructDef) -> Result<StructRef> {
        let base_def = self
            .find(base)
            .ok_or_else(|| RegistryError::NotFound(base.to_string()))?;
        if !base_def.flags.contains(StructFlags::SUPPORTS_REGISTRATION) {
            return Err(RegistryError::NotRegistrable(base.to_string()));
        }

        let own: HashSet<&str> = def.properties.iter().map(|p| p.identifier()).collect();
        let index = base_def.property_index();
        if let Some(missing) = index
            .iter()
            .filter(|p| p.flags.contains(PropertyFlags::REGISTER_REQUIRED))
            .find(|p| !own.contains(p.identifier()))
        {
            return Err(RegistryError::InvalidDefinition(format!(
                "'{}' must define registration property '{}'",
                def.identifier, missing.identifier
            )));
        }

        def.base = Some(base.to_string());
        def.flags |= StructFlags::RUNTIME_DEFINED;
        self.insert(def, true)
    }

    /// Remove a struct descriptor.
    ///
    /// Outstanding [`StructRef`]s stay valid but lose their registry link,
    /// so base lookups through them stop resolving.
    pub fn unregister(&self, identifier: &str) -> Result<()> {
        let mut structs = self.inner.structs.write();
        let def = structs
            .get(identifier)
            .ok_or_else(|| RegistryError::NotFound(identifier.to_string()))?;

        if self.is_sealed() && !def.flags.contains(StructFlags::RUNTIME_DEFINED) {
            return Err(RegistryError::Sealed(identifier.to_string()));
        }
        if let Some(derived) = structs
            .values()
            .find(|d| d.base.as_deref() == Some(identifier))
        {
            return Err(RegistryError::InUse {
                identifier: identifier.to_string(),
                derived: derived.identifier.clone(),
            });
        }

        if let Some(def) = structs.remove(identifier) {
            def.unlink();
        }
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        log::debug!("[Registry::unregister] removed '{}'", identifier);
        Ok(())
    }

    /// Look up a descriptor by identifier.
    pub fn find(&self, identifier: &str) -> Option<StructRef> {
        self.inner.find(identifier)
    }

    /// `true` if `identifier` is `ancestor` or derives from it.
    pub fn is_a(&self, identifier: &str, ancestor: &str) -> bool {
        self.find(identifier)
            .map(|def| def.is_a(ancestor))
            .unwrap_or(false)
    }

    /// Close the registry to everything but extension types.
    pub fn seal(&self) {
        self.inner.sealed.store(true, Ordering::Release);
        log::debug!("[Registry::seal] sealed with {} structs", self.len());
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.sealed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.inner.structs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.structs.read().is_empty()
    }

    /// Snapshot of all descriptors, sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = StructRef> {
        let mut all: Vec<StructRef> = self.inner.structs.read().values().cloned().collect();
        all.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        all.into_iter()
    }

    /// Counter bumped by every registration change.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    pub fn config(&self) -> AccessConfig {
        self.inner.config()
    }

    pub fn set_config(&self, config: AccessConfig) {
        *self.inner.config.write() = config;
    }

    fn insert(&self, def: StructDef, extension: bool) -> Result<StructRef> {
        validate_struct(&def)?;

        // Resolve the base outside the write lock: flattening it reads the map.
        let base_index = match &def.base {
            Some(base) => {
                let base_def = self.find(base).ok_or_else(|| RegistryError::UnknownBase {
                    identifier: def.identifier.clone(),
                    base: base.clone(),
                })?;
                Some(base_def.property_index())
            }
            None => None,
        };
        check_flattened(&def, base_index.as_deref(), extension)?;

        let mut structs = self.inner.structs.write();
        if structs.contains_key(&def.identifier) {
            return Err(RegistryError::DuplicateIdentifier(def.identifier));
        }
        if let Some(base) = &def.base {
            if !structs.contains_key(base) {
                return Err(RegistryError::UnknownBase {
                    identifier: def.identifier.clone(),
                    base: base.clone(),
                });
            }
        }

        def.link(Arc::downgrade(&self.inner));
        let def = Arc::new(def);
        structs.insert(def.identifier.clone(), Arc::clone(&def));
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        log::debug!(
            "[Registry::register] '{}' ({} own properties, base {:?}, extension {})",
            def.identifier,
            def.properties.len(),
            def.base,
            extension
        );
        Ok(def)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("structs", &self.len())
            .field("sealed", &self.is_sealed())
            .field("generation", &self.generation())
            .finish()
    }
}

fn check_identifier(kind: &str, identifier: &str) -> Result<()> {
    let valid_chars = identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    let starts_ok = identifier
        .chars()
        .next()
        .map(|c| !c.is_ascii_digit())
        .unwrap_or(false);
    if identifier.len() > MAX_IDENTIFIER_LEN || !valid_chars || !starts_ok {
        return Err(RegistryError::InvalidDefinition(format!(
            "invalid {} identifier '{}'",
            kind, identifier
        )));
    }
    Ok(())
}

/// Checks a definition in isolation, before any base is known.
pub(crate) fn validate_struct(def: &StructDef) -> Result<()> {
    check_identifier("struct", &def.identifier)?;
    for prop in &def.properties {
        validate_property(&def.identifier, prop)?;
    }
    Ok(())
}

fn validate_property(owner: &str, prop: &PropertyDef) -> Result<()> {
    check_identifier("property", &prop.identifier)?;
    let invalid = |msg: &str| {
        Err(RegistryError::InvalidDefinition(format!(
            "{}.{}: {}",
            owner, prop.identifier, msg
        )))
    };

    if let Some(shape) = &prop.array {
        if !matches!(
            prop.kind(),
            PropertyKind::Bool | PropertyKind::Int | PropertyKind::Float
        ) {
            return invalid("only bool, int and float properties can be arrays");
        }
        if let ArrayShape::Fixed(dims) = shape {
            if dims.is_empty() || dims.len() > MAX_ARRAY_DIMENSION || dims.contains(&0) {
                return invalid("array dimensions must be 1 to 3 non-zero sizes");
            }
        }
    }

    match &prop.ty {
        PropertyType::Collection(coll) => {
            if coll.item_type.is_empty() {
                return invalid("collection item type is empty");
            }
            if coll.skip.is_some() && matches!(coll.storage, CollectionStorage::Counted { .. }) {
                return invalid("counted collections cannot filter items");
            }
        }
        PropertyType::Pointer(ptr) if ptr.target.is_empty() => {
            return invalid("pointer target type is empty");
        }
        PropertyType::Int(def) if def.access.is_array() != prop.is_array() => {
            return invalid("array accessors require an array shape");
        }
        PropertyType::Float(def) if def.access.is_array() != prop.is_array() => {
            return invalid("array accessors require an array shape");
        }
        _ => {}
    }
    Ok(())
}

/// Checks the definition against its flattened base.
fn check_flattened(def: &StructDef, base: Option<&PropertyIndex>, extension: bool) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for prop in &def.properties {
        let redefines_required = base
            .and_then(|b| b.get(prop.identifier()))
            .map(|p| extension && p.flags.contains(PropertyFlags::REGISTER_REQUIRED))
            .unwrap_or(false);
        let clashes_base = base.and_then(|b| b.get(prop.identifier())).is_some();
        if !seen.insert(prop.identifier()) || (clashes_base && !redefines_required) {
            return Err(RegistryError::DuplicateProperty {
                identifier: def.identifier.clone(),
                property: prop.identifier.clone(),
            });
        }
    }

    let lookup = |id: &str| {
        def.properties
            .iter()
            .find(|p| p.identifier == id)
            .or_else(|| base.and_then(|b| b.get(id)))
            .map(|p| p.kind())
    };
    if let Some(name) = &def.name_property {
        if lookup(name) != Some(PropertyKind::String) {
            return Err(RegistryError::InvalidDefinition(format!(
                "{}: name property '{}' must be a string property",
                def.identifier, name
            )));
        }
    }
    if let Some(iter) = &def.iterator_property {
        if lookup(iter) != Some(PropertyKind::Collection) {
            return Err(RegistryError::InvalidDefinition(format!(
                "{}: iterator property '{}' must be a collection",
                def.identifier, iter
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define::{field, PropertyBuilder, StructBuilder};

    #[derive(Default)]
    struct Base {
        label: String,
        value: i32,
    }

    fn base_def(id: &str) -> StructDef {
        StructBuilder::new(id)
            .property(PropertyBuilder::string("label", field(|b: &Base| &b.label, |b| &mut b.label)))
            .property(PropertyBuilder::int("value", field(|b: &Base| &b.value, |b| &mut b.value)))
            .name_property("label")
            .build()
            .expect("valid definition")
    }

    #[test]
    fn test_register_and_find() {
        let registry = Registry::new();
        let def = registry.register(base_def("Base")).expect("register");
        assert_eq!(def.identifier(), "Base");
        assert!(registry.find("Base").is_some());
        assert!(registry.find("Missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_identifier() {
        let registry = Registry::new();
        registry.register(base_def("Base")).expect("register");
        let err = registry.register(base_def("Base")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateIdentifier("Base".into()));
    }

    #[test]
    fn test_unknown_base() {
        let registry = Registry::new();
        let def = StructBuilder::new("Derived").base("Nope").build().expect("build");
        assert!(matches!(
            registry.register(def),
            Err(RegistryError::UnknownBase { .. })
        ));
    }

    #[test]
    fn test_duplicate_property_in_flattened_set() {
        let registry = Registry::new();
        registry.register(base_def("Base")).expect("register");
        let derived = StructBuilder::new("Derived")
            .base("Base")
            .property(PropertyBuilder::int("value", field(|b: &Base| &b.value, |b| &mut b.value)))
            .build()
            .expect("build");
        assert_eq!(
            registry.register(derived).unwrap_err(),
            RegistryError::DuplicateProperty {
                identifier: "Derived".into(),
                property: "value".into(),
            }
        );
    }

    #[test]
    fn test_flattened_order_and_is_a() {
        let registry = Registry::new();
        registry.register(base_def("Base")).expect("register");
        let derived = StructBuilder::new("Derived")
            .base("Base")
            .property(PropertyBuilder::int("extra", field(|b: &Base| &b.value, |b| &mut b.value)))
            .build()
            .expect("build");
        let derived = registry.register(derived).expect("register");

        let ids: Vec<String> = derived
            .property_index()
            .iter()
            .map(|p| p.identifier.clone())
            .collect();
        assert_eq!(ids, ["label", "value", "extra"]);
        assert!(derived.is_a("Base"));
        assert!(registry.is_a("Derived", "Base"));
        assert!(!registry.is_a("Base", "Derived"));
        assert_eq!(
            derived.name_property().map(|p| p.identifier.clone()),
            Some("label".to_string())
        );
    }

    #[test]
    fn test_unregister_rules() {
        let registry = Registry::new();
        registry.register(base_def("Base")).expect("register");
        let derived = StructBuilder::new("Derived").base("Base").build().expect("build");
        let derived = registry.register(derived).expect("register");

        assert!(matches!(
            registry.unregister("Base"),
            Err(RegistryError::InUse { .. })
        ));
        registry.unregister("Derived").expect("unregister");
        assert!(!derived.is_registered());
        assert!(derived.base().is_none());
        assert_eq!(
            registry.unregister("Derived").unwrap_err(),
            RegistryError::NotFound("Derived".into())
        );
    }

    #[test]
    fn test_seal_and_extension() {
        let registry = Registry::new();
        let mut base = base_def("Panel");
        base.flags |= StructFlags::SUPPORTS_REGISTRATION;
        registry.register(base).expect("register");
        registry.register(base_def("Fixed")).expect("register");
        registry.seal();

        assert!(matches!(
            registry.register(base_def("Late")),
            Err(RegistryError::Sealed(_))
        ));
        assert_eq!(
            registry
                .register_extension("Fixed", StructBuilder::new("Ext").build().expect("build"))
                .unwrap_err(),
            RegistryError::NotRegistrable("Fixed".into())
        );

        let ext = registry
            .register_extension("Panel", StructBuilder::new("MyPanel").build().expect("build"))
            .expect("extension");
        assert!(ext.flags.contains(StructFlags::RUNTIME_DEFINED));
        assert!(ext.is_a("Panel"));

        assert!(matches!(
            registry.unregister("Fixed"),
            Err(RegistryError::Sealed(_))
        ));
        registry.unregister("MyPanel").expect("runtime types can leave");
    }

    #[test]
    fn test_extension_must_redefine_required() {
        let registry = Registry::new();
        let base = StructBuilder::new("Operator")
            .flags(StructFlags::SUPPORTS_REGISTRATION)
            .property(
                PropertyBuilder::string("idname", field(|b: &Base| &b.label, |b| &mut b.label))
                    .flag(PropertyFlags::REGISTER_REQUIRED),
            )
            .build()
            .expect("build");
        registry.register(base).expect("register");

        let bare = StructBuilder::new("Bare").build().expect("build");
        assert!(matches!(
            registry.register_extension("Operator", bare),
            Err(RegistryError::InvalidDefinition(_))
        ));

        let full = StructBuilder::new("Full")
            .property(PropertyBuilder::string("idname", field(|b: &Base| &b.label, |b| &mut b.label)))
            .build()
            .expect("build");
        let full = registry.register_extension("Operator", full).expect("extension");
        assert_eq!(full.property_index().len(), 1);
    }

    #[test]
    fn test_generation_bumps() {
        let registry = Registry::new();
        let before = registry.generation();
        registry.register(base_def("Base")).expect("register");
        assert!(registry.generation() > before);
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let result = StructBuilder::new("bad id").build();
        assert!(matches!(result, Err(RegistryError::InvalidDefinition(_))));
    }
}
