// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_compose --heading-base-level=0

//! Understory Compose: build spatial interface entities out of reusable components.
//!
//! A spatial entity participates in interface matching: it transmits and
//! receives named interfaces, may be attached to a parent, may want transform
//! updates, and may pin some connections up front with interface locks.
//! Behaviors like "can be grabbed" or "highlights when hovered" each declare a
//! slice of that, and this crate merges the slices.
//!
//! - [`EntityComponent`]: the capability trait a behavior implements.
//! - [`compose`]: the pure merge of an ordered component list into a
//!   [`ComposedEntityDescription`].
//! - [`ComposedEntity`]: the engine that keeps a [`SpatialEntity`] in sync,
//!   recomputing whenever a component reports an update.
//!
//! ## Merge rules
//!
//! | Field | Rule |
//! |-------|------|
//! | transmits, receives | concatenated in component order |
//! | interface locks | concatenated in component order; components without locks add nothing |
//! | parent | first declared parent wins |
//! | wants transforms | logical OR over all components |
//! | volumes, priority | taken from [`CompositionConfig`] unchanged |
//! | children | the entity's own children, then each component's `render()` output |
//!
//! ## Example
//!
//! ```rust
//! use std::borrow::Cow;
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_compose::{
//!     ComposedEntity, ComposedEntityDescription, CompositionConfig, EndpointAddr,
//!     EntityComponent, InterfaceProp, SharedComponent, SpatialEntity,
//! };
//! use understory_gadget::context::GadgetContext;
//! use understory_gadget::geometry::Volume;
//! use understory_gadget::signal::{Subscription, UpdateHandler, UpdateNotifier};
//!
//! #[derive(Default)]
//! struct Highlighter {
//!     active: Cell<bool>,
//!     notifier: UpdateNotifier,
//! }
//!
//! impl EntityComponent for Highlighter {
//!     fn receives(&self) -> Cow<'_, [InterfaceProp]> {
//!         if self.active.get() {
//!             Cow::Owned(vec![InterfaceProp::new("aardvark-highlight@1")])
//!         } else {
//!             Cow::Borrowed(&[])
//!         }
//!     }
//!
//!     fn on_update(&self, handler: UpdateHandler) -> Subscription {
//!         self.notifier.subscribe(handler)
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Node {
//!     receives: usize,
//! }
//!
//! impl SpatialEntity for Node {
//!     fn publish(&mut self, description: &ComposedEntityDescription) {
//!         self.receives = description.receives.len();
//!     }
//!
//!     fn global_id(&self) -> Option<EndpointAddr> {
//!         None
//!     }
//! }
//!
//! let ctx = GadgetContext::new();
//! let highlighter = Rc::new(Highlighter::default());
//! let component: SharedComponent = highlighter.clone();
//!
//! let entity = ComposedEntity::new(
//!     &ctx,
//!     vec![component],
//!     CompositionConfig::new(Volume::sphere(0.1)),
//!     Node::default(),
//! );
//! assert_eq!(entity.with_consumer(|node| node.receives), 0);
//!
//! // A component update republishes synchronously.
//! highlighter.active.set(true);
//! highlighter.notifier.notify();
//! assert_eq!(entity.with_consumer(|node| node.receives), 1);
//! assert_eq!(entity.revision(), 2);
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for addresses, interface
//!   declarations, and [`CompositionConfig`].
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod component;
mod compose;
mod entity;
mod interface;

pub use component::EntityComponent;
pub use compose::{
    ComposedEntityDescription, CompositionConfig, Volumes, compose, compose_with_children,
};
pub use entity::{ComposedEntity, SharedComponent, SpatialEntity};
pub use interface::{
    EndpointAddr, EndpointType, InitialInterfaceLock, InterfaceParams, InterfaceProp,
    InterfaceRole, ParamValue,
};
