// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gadget --heading-base-level=0

//! Understory Gadget: runtime context and shared vocabulary for spatial gadgets.
//!
//! A gadget is a process that contributes nodes to a shared spatial scene
//! graph. This crate holds the pieces every part of a gadget needs:
//!
//! - [`context`]: the [`GadgetContext`](context::GadgetContext) handle with
//!   per-hand edit mode and re-render (dirty) scheduling.
//! - [`signal`]: observer primitives. [`Listeners`](signal::Listeners) for
//!   broadcast events, [`UpdateNotifier`](signal::UpdateNotifier) for
//!   single-slot update callbacks, and the [`Subscription`](signal::Subscription)
//!   token that releases a handler when dropped.
//! - [`geometry`]: `Vec3`, `Aabb3`, and the [`Volume`](geometry::Volume) shapes
//!   used for spatial matching.
//! - [`visual`]: model placements handed to the renderer.
//!
//! ## Threading
//!
//! Everything here is single-threaded and callback driven. Handles use `Rc`
//! and `Cell`; handlers run synchronously on the thread that emits.
//!
//! ## Example
//!
//! ```rust
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_gadget::context::{GadgetContext, Hand};
//!
//! let ctx = GadgetContext::new();
//! let flips = Rc::new(Cell::new(0));
//!
//! let sink = flips.clone();
//! let subscription = ctx.listen_for_edit_mode(move |_| sink.set(sink.get() + 1));
//!
//! ctx.set_edit_mode(Hand::Right, true);
//! assert_eq!(flips.get(), 1);
//!
//! // Releasing the subscription stops delivery immediately.
//! drop(subscription);
//! ctx.set_edit_mode(Hand::Right, false);
//! assert_eq!(flips.get(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default) / `libm`: select the float backend of `peniko`.
//! - `serde`: derive `Serialize`/`Deserialize` for geometry and hand types.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod context;
pub mod geometry;
pub mod signal;
pub mod visual;
