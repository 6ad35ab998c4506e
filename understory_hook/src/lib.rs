// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hook --heading-base-level=0

//! Understory Hook: standard attachment points for grabbables.
//!
//! A hook is a named spot (on a hand, a belt, a shelf) that grabbables can be
//! dropped onto. The matching runtime reports a [`HookHighlight`] for it, and
//! the hook decides whether to draw its affordance from that state plus the
//! edit mode of the hand it belongs to:
//!
//! | State | no edit mode | edit mode |
//! |-------|--------------|-----------|
//! | `None` | hidden | shown |
//! | `Occupied` | hidden | shown |
//! | `GrabInProgress` | shown | shown |
//! | `InRange` | shown | shown |
//!
//! Two shapes are provided:
//!
//! - [`SphereShape`]: a sphere (radius `0.08` by default) drawn with the hook
//!   icon.
//! - [`BoxShape`]: an axis-aligned box drawn as a bounding box model fitted to
//!   the bounds and tinted brighter while a grab is in progress.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_gadget::context::{GadgetContext, Hand};
//! use understory_gadget::geometry::Vec3;
//! use understory_hook::{BoxShape, HookConfig, HookHighlight, StandardHook};
//!
//! let ctx = GadgetContext::new();
//! let mut hook = StandardHook::new(
//!     &ctx,
//!     HookConfig::new("shelf").with_hand(Hand::Right),
//!     BoxShape::from_bounds(-1.0, 1.0, 0.0, 2.0, -0.5, 0.5),
//! )
//! .unwrap();
//!
//! hook.update_highlight(HookHighlight::GrabInProgress);
//! let render = hook.render();
//! let model = render.model.unwrap();
//! assert_eq!(model.transform.translation, Vec3::new(0.0, 1.0, 0.0));
//! assert_eq!(model.transform.scale, Vec3::new(1.0, 1.0, 0.5));
//!
//! // After release the hook no longer follows edit mode.
//! hook.update_highlight(HookHighlight::None);
//! hook.release();
//! ctx.set_edit_mode(Hand::Right, true);
//! assert!(!hook.render().is_visible());
//! ```
//!
//! ## Features
//!
//! - `std` (default) / `libm`: select the float backend of `peniko`.
//! - `serde`: derive `Serialize`/`Deserialize` for [`HookConfig`] and
//!   [`HookHighlight`].
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod error;
mod highlight;
mod hook;
mod shape;

pub use error::HookError;
pub use highlight::HookHighlight;
pub use hook::{HookConfig, HookNode, HookRender, StandardHook, should_show};
pub use shape::{BoxShape, HookShape, HookStyle, SphereShape};
