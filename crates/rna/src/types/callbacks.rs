// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased callback signatures stored in property descriptors.
//!
//! Every callback receives the instance data as `&dyn Any` (or `&mut dyn
//! Any`) and downcasts it to the native struct it was defined for. The
//! builders in [`define`](crate::define) produce these from typed closures.

use crate::pointer::IdRef;
use crate::types::EnumItem;
use std::any::Any;
use std::sync::Arc;

/// Scalar read.
pub type Getter<T> = Arc<dyn Fn(&dyn Any) -> T + Send + Sync>;
/// Scalar write.
pub type Setter<T> = Arc<dyn Fn(&mut dyn Any, T) + Send + Sync>;
/// Array read into a buffer sized to the property length.
pub type ArrayGetter<T> = Arc<dyn Fn(&dyn Any, &mut [T]) + Send + Sync>;
/// Array write from a buffer sized to the property length.
pub type ArraySetter<T> = Arc<dyn Fn(&mut dyn Any, &[T]) + Send + Sync>;
/// Instance-dependent hard range.
pub type RangeFn<T> = Arc<dyn Fn(&dyn Any) -> (T, T) + Send + Sync>;
/// Instance-dependent length (dynamic arrays, strings, collections).
pub type LengthFn = Arc<dyn Fn(&dyn Any) -> usize + Send + Sync>;
/// Instance-dependent editability.
pub type EditableFn = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;
/// Projection into nested data.
pub type Projector = Arc<dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync>;
/// Mutable projection into nested data.
pub type ProjectorMut = Arc<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;
/// Collection item by storage key.
pub type ItemFn = Arc<dyn Fn(&dyn Any, usize) -> Option<&dyn Any> + Send + Sync>;
/// Mutable collection item by storage key.
pub type ItemMutFn = Arc<dyn Fn(&mut dyn Any, usize) -> Option<&mut dyn Any> + Send + Sync>;
/// Identity-object collection item by storage key.
pub type ItemIdFn = Arc<dyn Fn(&dyn Any, usize) -> Option<IdRef> + Send + Sync>;
/// Item filter; `true` hides the item from iteration.
pub type SkipFn = Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>;
/// First storage key of a linked list.
pub type FirstFn = Arc<dyn Fn(&dyn Any) -> Option<usize> + Send + Sync>;
/// Storage key following the given one in a linked list.
pub type NextFn = Arc<dyn Fn(&dyn Any, usize) -> Option<usize> + Send + Sync>;
/// Custom positional lookup returning a storage key.
pub type LookupIntFn = Arc<dyn Fn(&dyn Any, usize) -> Option<usize> + Send + Sync>;
/// Custom name lookup returning a storage key.
pub type LookupStringFn = Arc<dyn Fn(&dyn Any, &str) -> Option<usize> + Send + Sync>;
/// Most-derived struct identifier for an instance.
pub type RefineFn = Arc<dyn Fn(&dyn Any) -> Option<&'static str> + Send + Sync>;
/// Dynamic enum items; receives the instance when one is available.
pub type EnumItemsFn = Arc<dyn Fn(Option<&dyn Any>) -> Vec<EnumItem> + Send + Sync>;

/// Wrap a closure as a [`Projector`], pinning its higher-ranked signature.
pub fn projector<F>(f: F) -> Projector
where
    F: Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`ProjectorMut`].
pub fn projector_mut<F>(f: F) -> ProjectorMut
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`ItemFn`].
pub fn item_fn<F>(f: F) -> ItemFn
where
    F: Fn(&dyn Any, usize) -> Option<&dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an [`ItemMutFn`].
pub fn item_mut_fn<F>(f: F) -> ItemMutFn
where
    F: Fn(&mut dyn Any, usize) -> Option<&mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}
