// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Library overrides: local, mergeable divergences from linked data.
//!
//! # Workflow
//!
//! 1. [`diff`] compares a local copy against its reference and records a
//!    [`LibraryOverride`] of per-path operations.
//! 2. [`store`] computes the operands of differential operations, optionally
//!    into a storage handle.
//! 3. [`apply`] replays the operations onto a fresh copy of the reference
//!    whenever the linked data changes.
//!
//! Operations are keyed by property path (see [`crate::path`]) so they
//! survive reloads; only [`LibraryOverride`] is meant to be persisted.

mod apply;
mod compare;
mod diff;
mod model;
#[cfg(feature = "serde")]
pub mod persist;
mod store;

pub use apply::{apply, ApplyReport};
pub use diff::{diff, DiffOptions, DiffReport};
pub use model::{
    LibraryOverride, OperationFlags, OverrideOpKind, OverrideOperation, OverrideProperty,
};
pub use store::{store, StoreReport};
