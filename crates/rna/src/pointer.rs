// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Instance handles.
//!
//! A [`Pointer`] is the triple (owner ID, struct descriptor, data location).
//! The data location is a shared root cell plus a chain of projection steps
//! through nested pointers and embedded collection items, so a handle never
//! holds a raw address into native data.

use crate::registry::RegistryInner;
use crate::types::{
    ItemAccess, PointerAccess, PropertyRef, PropertyType, StructDef, StructRef,
};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Shared data cell of an identity object (or any standalone root).
#[derive(Clone)]
pub struct IdRef(Rc<RefCell<dyn Any>>);

impl IdRef {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Address of the cell, for identity comparisons.
    pub fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    pub fn ptr_eq(&self, other: &IdRef) -> bool {
        self.as_ptr() == other.as_ptr()
    }

    pub fn downgrade(&self) -> WeakIdRef {
        WeakIdRef(Rc::downgrade(&self.0))
    }

    /// Run `f` on the cell contents; `None` if it is mutably borrowed.
    pub fn read<R>(&self, f: impl FnOnce(&dyn Any) -> R) -> Option<R> {
        let cell = self.0.try_borrow().ok()?;
        Some(f(&*cell))
    }

    /// Run `f` on the mutable cell contents; `None` if it is borrowed.
    pub fn write<R>(&self, f: impl FnOnce(&mut dyn Any) -> R) -> Option<R> {
        let mut cell = self.0.try_borrow_mut().ok()?;
        Some(f(&mut *cell))
    }

    /// Typed read; `None` on a borrow conflict or a type mismatch.
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.read(|d| d.downcast_ref::<T>().map(f)).flatten()
    }

    /// Typed write; `None` on a borrow conflict or a type mismatch.
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.write(|d| d.downcast_mut::<T>().map(f)).flatten()
    }
}

impl fmt::Debug for IdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdRef({:p})", self.as_ptr())
    }
}

/// Non-owning reference to an [`IdRef`] cell.
#[derive(Clone)]
pub struct WeakIdRef(Weak<RefCell<dyn Any>>);

impl WeakIdRef {
    pub fn upgrade(&self) -> Option<IdRef> {
        self.0.upgrade().map(IdRef)
    }
}

impl fmt::Debug for WeakIdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakIdRef")
    }
}

/// One projection from a parent instance into a child instance.
#[derive(Clone)]
pub(crate) enum Step {
    /// Nested pointer property.
    Nested(PropertyRef),
    /// Embedded collection item by storage key.
    Item { prop: PropertyRef, key: usize },
}

impl Step {
    fn project<'a>(&self, data: &'a dyn Any) -> Option<&'a dyn Any> {
        match self {
            Self::Nested(prop) => match &prop.ty {
                PropertyType::Pointer(def) => match &def.access {
                    PointerAccess::Nested { get, .. } => get(data),
                    PointerAccess::Id { .. } => None,
                },
                _ => None,
            },
            Self::Item { prop, key } => match &prop.ty {
                PropertyType::Collection(def) => match &def.items {
                    ItemAccess::Embedded { get, .. } => get(data, *key),
                    ItemAccess::Id { .. } => None,
                },
                _ => None,
            },
        }
    }

    fn project_mut<'a>(&self, data: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        match self {
            Self::Nested(prop) => match &prop.ty {
                PropertyType::Pointer(def) => match &def.access {
                    PointerAccess::Nested { get_mut, .. } => get_mut(data),
                    PointerAccess::Id { .. } => None,
                },
                _ => None,
            },
            Self::Item { prop, key } => match &prop.ty {
                PropertyType::Collection(def) => match &def.items {
                    ItemAccess::Embedded { get_mut, .. } => get_mut(data, *key),
                    ItemAccess::Id { .. } => None,
                },
                _ => None,
            },
        }
    }
}

/// Data location: root cell plus projection chain.
#[derive(Clone)]
pub(crate) struct DataPtr {
    pub(crate) root: IdRef,
    /// Refined struct of the root cell.
    pub(crate) root_type: StructRef,
    pub(crate) steps: Vec<Step>,
}

impl DataPtr {
    fn read<R>(&self, f: impl FnOnce(&dyn Any) -> R) -> Option<R> {
        let cell = self.root.0.try_borrow().ok()?;
        let mut data: &dyn Any = &*cell;
        for step in &self.steps {
            data = step.project(data)?;
        }
        Some(f(data))
    }

    fn write<R>(&self, f: impl FnOnce(&mut dyn Any) -> R) -> Option<R> {
        let mut cell = self.root.0.try_borrow_mut().ok()?;
        let mut data: &mut dyn Any = &mut *cell;
        for step in &self.steps {
            data = step.project_mut(data)?;
        }
        Some(f(data))
    }
}

/// Handle to one struct instance.
///
/// Cheap to clone and never serialized. A default-constructed pointer is
/// null: every getter on it returns the type's zero value and every setter
/// is ignored.
#[derive(Clone, Default)]
pub struct Pointer {
    owner: Option<WeakIdRef>,
    ty: Option<StructRef>,
    data: Option<DataPtr>,
}

impl Pointer {
    pub fn null() -> Self {
        Self::default()
    }

    /// Handle to an identity object; the ID is its own owner.
    ///
    /// The struct is refined to the most-derived registered type.
    pub fn from_id(ty: &StructRef, id: &IdRef) -> Self {
        let ty = id.read(|d| ty.refine(d)).unwrap_or_else(|| Arc::clone(ty));
        Self {
            owner: Some(id.downgrade()),
            ty: Some(Arc::clone(&ty)),
            data: Some(DataPtr {
                root: id.clone(),
                root_type: ty,
                steps: Vec::new(),
            }),
        }
    }

    /// Handle to standalone data with no owning ID.
    pub fn from_data(ty: &StructRef, root: &IdRef) -> Self {
        let ty = root.read(|d| ty.refine(d)).unwrap_or_else(|| Arc::clone(ty));
        Self {
            owner: None,
            ty: Some(Arc::clone(&ty)),
            data: Some(DataPtr {
                root: root.clone(),
                root_type: ty,
                steps: Vec::new(),
            }),
        }
    }

    /// Child handle one projection step below `self`.
    ///
    /// Null when the projection yields nothing.
    pub(crate) fn child(&self, target: &StructRef, step: Step) -> Pointer {
        let Some(data) = &self.data else {
            return Pointer::null();
        };
        let mut steps = data.steps.clone();
        steps.push(step);
        let data = DataPtr {
            root: data.root.clone(),
            root_type: Arc::clone(&data.root_type),
            steps,
        };
        match data.read(|d| target.refine(d)) {
            Some(ty) => Pointer {
                owner: self.owner.clone(),
                ty: Some(ty),
                data: Some(data),
            },
            None => Pointer::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.data.is_none() || self.ty.is_none()
    }

    pub fn struct_def(&self) -> Option<&StructRef> {
        self.ty.as_ref()
    }

    /// Struct identifier, empty for null handles.
    pub fn type_name(&self) -> &str {
        self.ty.as_ref().map(|t| t.identifier()).unwrap_or("")
    }

    /// Owning identity object, if it is still alive.
    pub fn owner(&self) -> Option<IdRef> {
        self.owner.as_ref().and_then(|w| w.upgrade())
    }

    /// The root data cell (the owner for handles derived from an ID).
    pub fn root(&self) -> Option<&IdRef> {
        self.data.as_ref().map(|d| &d.root)
    }

    /// `true` when the handle addresses its root directly.
    pub fn is_root(&self) -> bool {
        self.data.as_ref().map(|d| d.steps.is_empty()).unwrap_or(false)
    }

    pub(crate) fn steps(&self) -> &[Step] {
        self.data.as_ref().map(|d| d.steps.as_slice()).unwrap_or(&[])
    }

    /// Run `f` on the instance data; `None` when null or borrowed.
    pub fn read<R>(&self, f: impl FnOnce(&dyn Any) -> R) -> Option<R> {
        self.data.as_ref()?.read(f)
    }

    /// Run `f` on the mutable instance data; `None` when null or borrowed.
    pub fn write<R>(&self, f: impl FnOnce(&mut dyn Any) -> R) -> Option<R> {
        self.data.as_ref()?.write(f)
    }

    /// Typed read of the instance data.
    pub fn with<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.read(|d| d.downcast_ref::<T>().map(f)).flatten()
    }

    /// Typed write of the instance data.
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.write(|d| d.downcast_mut::<T>().map(f)).flatten()
    }

    /// Address of the instance data.
    pub fn data_address(&self) -> Option<*const ()> {
        self.read(|d| d as *const dyn Any as *const ())
    }

    /// Both handles address the same data with the same struct.
    pub fn same_data(&self, other: &Pointer) -> bool {
        match (&self.ty, &other.ty) {
            (Some(a), Some(b)) if a.identifier == b.identifier => {}
            (None, None) => return self.data.is_none() && other.data.is_none(),
            _ => return false,
        }
        match (self.data_address(), other.data_address()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// `true` if the handle's struct is `ancestor` or derives from it.
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.ty.as_ref().map(|t| t.is_a(ancestor)).unwrap_or(false)
    }

    /// Handles for the root and every intermediate step, ending with `self`.
    ///
    /// `None` when an intermediate struct is no longer registered.
    pub(crate) fn chain(&self) -> Option<Vec<Pointer>> {
        let data = self.data.as_ref()?;
        let mut current = Pointer {
            owner: self.owner.clone(),
            ty: Some(Arc::clone(&data.root_type)),
            data: Some(DataPtr {
                root: data.root.clone(),
                root_type: Arc::clone(&data.root_type),
                steps: Vec::new(),
            }),
        };
        let mut chain = Vec::with_capacity(data.steps.len() + 1);
        for step in &data.steps {
            let target = match step {
                Step::Nested(prop) => match &prop.ty {
                    PropertyType::Pointer(def) => current.lookup_struct(&def.target)?,
                    _ => return None,
                },
                Step::Item { prop, .. } => match &prop.ty {
                    PropertyType::Collection(def) => current.lookup_struct(&def.item_type)?,
                    _ => return None,
                },
            };
            let next = current.child(&target, step.clone());
            chain.push(current);
            current = next;
        }
        chain.push(current);
        Some(chain)
    }

    pub(crate) fn registry(&self) -> Option<Arc<RegistryInner>> {
        self.ty.as_ref().and_then(|t| registry_of(t))
    }

    /// Look up a property through the struct's flattened base chain.
    pub fn find_property(&self, identifier: &str) -> Option<PropertyRef> {
        self.ty.as_ref()?.find_property(identifier)
    }
}

pub(crate) fn registry_of(def: &StructDef) -> Option<Arc<RegistryInner>> {
    def.registry.read().upgrade()
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Pointer(null)");
        }
        f.debug_struct("Pointer")
            .field("type", &self.type_name())
            .field("depth", &self.steps().len())
            .field("owned", &self.owner.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ref_identity() {
        let a = IdRef::new(5i32);
        let b = a.clone();
        let c = IdRef::new(5i32);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.with(|v: &i32| *v), Some(5));
        assert_eq!(a.with(|v: &u8| *v), None);
    }

    #[test]
    fn test_borrow_conflict_is_soft() {
        let a = IdRef::new(String::from("x"));
        let nested = a.write(|_| a.read(|_| ()));
        assert_eq!(nested, Some(None));
        let again = a.read(|_| a.read(|_| 1));
        assert_eq!(again, Some(Some(1)));
    }

    #[test]
    fn test_weak_owner_does_not_keep_alive() {
        let a = IdRef::new(1u32);
        let weak = a.downgrade();
        assert!(weak.upgrade().is_some());
        drop(a);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_null_pointer() {
        let p = Pointer::null();
        assert!(p.is_null());
        assert_eq!(p.type_name(), "");
        assert!(p.read(|_| ()).is_none());
        assert!(p.same_data(&Pointer::null()));
    }
}
