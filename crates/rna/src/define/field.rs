// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed field projections turned into type-erased callbacks.

use crate::types::{projector, projector_mut, Getter, Projector, ProjectorMut, Setter};
use std::any::Any;
use std::sync::Arc;

type FieldGet<T, V> = Arc<dyn Fn(&T) -> &V + Send + Sync>;
type FieldGetMut<T, V> = Arc<dyn Fn(&mut T) -> &mut V + Send + Sync>;

/// Shared and mutable projection from a native struct `T` to one field `V`.
pub struct Field<T, V: ?Sized> {
    pub(crate) get: FieldGet<T, V>,
    pub(crate) get_mut: FieldGetMut<T, V>,
}

impl<T, V: ?Sized> Clone for Field<T, V> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            get_mut: Arc::clone(&self.get_mut),
        }
    }
}

/// Build a [`Field`] from a pair of projections.
///
/// ```
/// use rna::define::field;
///
/// struct Point { x: f32 }
/// let x = field(|p: &Point| &p.x, |p| &mut p.x);
/// # let _ = x;
/// ```
pub fn field<T, V, G, M>(get: G, get_mut: M) -> Field<T, V>
where
    T: Any,
    V: ?Sized + 'static,
    G: Fn(&T) -> &V + Send + Sync + 'static,
    M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
{
    Field {
        get: Arc::new(get),
        get_mut: Arc::new(get_mut),
    }
}

impl<T: Any, V: ?Sized + 'static> Field<T, V> {
    /// Erased read through `f`; yields `R::default()` on a type mismatch.
    pub(crate) fn getter<R, F>(&self, f: F) -> Getter<R>
    where
        R: Default + 'static,
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        let get = Arc::clone(&self.get);
        Arc::new(move |d: &dyn Any| {
            d.downcast_ref::<T>()
                .map(|t| f(get(t)))
                .unwrap_or_default()
        })
    }

    /// Erased write through `f`; ignored on a type mismatch.
    pub(crate) fn setter<R, F>(&self, f: F) -> Setter<R>
    where
        R: 'static,
        F: Fn(&mut V, R) + Send + Sync + 'static,
    {
        let get_mut = Arc::clone(&self.get_mut);
        Arc::new(move |d: &mut dyn Any, value: R| {
            if let Some(t) = d.downcast_mut::<T>() {
                f(get_mut(t), value);
            }
        })
    }

    /// Erased shared-buffer read through `f`.
    pub(crate) fn reader<E, F>(&self, f: F) -> Arc<dyn Fn(&dyn Any, &mut [E]) + Send + Sync>
    where
        E: 'static,
        F: Fn(&V, &mut [E]) + Send + Sync + 'static,
    {
        let get = Arc::clone(&self.get);
        Arc::new(move |d: &dyn Any, out: &mut [E]| {
            if let Some(t) = d.downcast_ref::<T>() {
                f(get(t), out);
            }
        })
    }

    /// Erased buffer write through `f`.
    pub(crate) fn writer<E, F>(&self, f: F) -> Arc<dyn Fn(&mut dyn Any, &[E]) + Send + Sync>
    where
        E: 'static,
        F: Fn(&mut V, &[E]) + Send + Sync + 'static,
    {
        let get_mut = Arc::clone(&self.get_mut);
        Arc::new(move |d: &mut dyn Any, input: &[E]| {
            if let Some(t) = d.downcast_mut::<T>() {
                f(get_mut(t), input);
            }
        })
    }
}

impl<T: Any, V: Any> Field<T, V> {
    pub(crate) fn projector(&self) -> Projector {
        let get = Arc::clone(&self.get);
        projector(move |d| d.downcast_ref::<T>().map(|t| get(t) as &dyn Any))
    }

    pub(crate) fn projector_mut(&self) -> ProjectorMut {
        let get_mut = Arc::clone(&self.get_mut);
        projector_mut(move |d| d.downcast_mut::<T>().map(|t| get_mut(t) as &mut dyn Any))
    }
}

/// Copy the common prefix of `src` into `dst`.
pub(crate) fn copy_prefix<E: Copy>(dst: &mut [E], src: &[E]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}
