// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composition engine: keeps a [`SpatialEntity`] in sync with its components.
//!
//! ## Update flow
//!
//! 1) [`ComposedEntity::new`] composes the initial description, publishes it, and
//!    registers one shared update handler with every component.
//! 2) When a component calls that handler, the engine recomputes and republishes
//!    synchronously, then registers the handler again with the current list.
//! 3) [`ComposedEntity::set_components`] swaps the list and does the same;
//!    subscriptions to components that left the list are released.
//!
//! Notifications that arrive while a recompute is running (for example from a
//! component accessor or from the consumer) do not nest. They set a pending
//! flag and the running pass does exactly one more recompute once it finishes,
//! so the last published description always reflects the final state.
//!
//! ## Borrowing
//!
//! Nothing handed out by [`ComposedEntity`] keeps engine state borrowed:
//! [`description`](ComposedEntity::description) is a shared snapshot, and the
//! consumer is only reachable inside [`with_consumer`](ComposedEntity::with_consumer).
//! A recompute that finds the consumer in use there still updates the
//! description, and the publish happens when the closure returns.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use understory_gadget::context::GadgetContext;
use understory_gadget::signal::{Subscription, UpdateHandler};
use understory_gadget::visual::ModelVisual;

use crate::component::EntityComponent;
use crate::compose::{ComposedEntityDescription, CompositionConfig, compose_with_children};
use crate::interface::EndpointAddr;

/// A shared, type-erased component.
pub type SharedComponent = Rc<dyn EntityComponent>;

/// The addressable scene-graph node that receives composed descriptions.
///
/// Interface matching happens on the other side of this trait.
pub trait SpatialEntity {
    /// Replaces the entity's declarations with `description`.
    fn publish(&mut self, description: &ComposedEntityDescription);

    /// The entity's global address, once the runtime has assigned one.
    fn global_id(&self) -> Option<EndpointAddr>;
}

impl<T: SpatialEntity + ?Sized> SpatialEntity for alloc::boxed::Box<T> {
    fn publish(&mut self, description: &ComposedEntityDescription) {
        (**self).publish(description);
    }

    fn global_id(&self) -> Option<EndpointAddr> {
        (**self).global_id()
    }
}

/// Clears a flag on every exit path, including unwinding.
struct ClearOnDrop<'a>(&'a Cell<bool>);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

struct Shared<E> {
    ctx: GadgetContext,
    handler: UpdateHandler,
    recomputing: Cell<bool>,
    pending: Cell<bool>,
    deferred_publish: Cell<bool>,
    revision: Cell<u64>,
    components: RefCell<Vec<SharedComponent>>,
    config: RefCell<CompositionConfig>,
    children: RefCell<Vec<ModelVisual>>,
    description: RefCell<Rc<ComposedEntityDescription>>,
    subscriptions: RefCell<Vec<Subscription>>,
    consumer: RefCell<E>,
}

impl<E: SpatialEntity> Shared<E> {
    fn refresh(&self) {
        if self.recomputing.get() {
            tracing::trace!("recompute already running, coalescing");
            self.pending.set(true);
            return;
        }
        self.recomputing.set(true);
        let _running = ClearOnDrop(&self.recomputing);
        loop {
            self.pending.set(false);
            self.recompute();
            if !self.pending.get() {
                break;
            }
        }
    }

    fn recompute(&self) {
        // Inputs are cloned out so no borrow is held while component code runs;
        // accessors and handlers may call back into the engine.
        let components = self.components.borrow().clone();
        let config = self.config.borrow().clone();
        let children = self.children.borrow().clone();
        let description = Rc::new(compose_with_children(
            children,
            components.iter().map(|c| &**c),
            &config,
        ));

        *self.description.borrow_mut() = description.clone();
        let revision = self.revision.get() + 1;
        self.revision.set(revision);
        self.publish(&description);
        tracing::trace!(revision, components = components.len(), "entity recomposed");

        let subscriptions: Vec<_> = components
            .iter()
            .map(|component| component.on_update(self.handler.clone()))
            .collect();
        let stale = core::mem::replace(&mut *self.subscriptions.borrow_mut(), subscriptions);
        // Released outside the borrow; retained components were already
        // re-registered, so this only detaches components that left the list.
        drop(stale);

        self.ctx.mark_dirty();
    }

    fn publish(&self, description: &ComposedEntityDescription) {
        match self.consumer.try_borrow_mut() {
            Ok(mut consumer) => {
                self.deferred_publish.set(false);
                consumer.publish(description);
            }
            Err(_) => {
                tracing::debug!("consumer in use, deferring publish");
                self.deferred_publish.set(true);
            }
        }
    }

    fn flush_deferred_publish(&self) {
        if self.deferred_publish.get() {
            let description = self.description.borrow().clone();
            self.publish(&description);
        }
    }
}

/// A spatial entity assembled from an ordered list of components.
///
/// Component order matters: it is the interface registration order and picks
/// the parent (first declared wins). See [`compose`](crate::compose) for the
/// merge rules.
///
/// Dropping the engine releases every component subscription; a component that
/// notifies afterwards reaches nothing.
pub struct ComposedEntity<E: SpatialEntity + 'static> {
    shared: Rc<Shared<E>>,
}

impl<E: SpatialEntity + 'static> ComposedEntity<E> {
    /// Composes `components`, publishes the result to `consumer`, and starts
    /// listening for component updates.
    pub fn new(
        ctx: &GadgetContext,
        components: Vec<SharedComponent>,
        config: CompositionConfig,
        consumer: E,
    ) -> Self {
        let shared = Rc::new_cyclic(|weak: &Weak<Shared<E>>| {
            let weak = weak.clone();
            let handler: UpdateHandler = Rc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    tracing::trace!("component update");
                    shared.refresh();
                }
            });
            Shared {
                ctx: ctx.clone(),
                handler,
                recomputing: Cell::new(false),
                pending: Cell::new(false),
                deferred_publish: Cell::new(false),
                revision: Cell::new(0),
                components: RefCell::new(components),
                config: RefCell::new(config),
                children: RefCell::new(Vec::new()),
                description: RefCell::default(),
                subscriptions: RefCell::new(Vec::new()),
                consumer: RefCell::new(consumer),
            }
        });
        shared.refresh();
        Self { shared }
    }

    /// Sets the entity's own children and republishes.
    ///
    /// They come before any visuals rendered by the components.
    #[must_use]
    pub fn with_children(mut self, children: Vec<ModelVisual>) -> Self {
        self.set_children(children);
        self
    }

    /// Replaces the component list, then recomputes and republishes.
    pub fn set_components(&mut self, components: Vec<SharedComponent>) {
        tracing::debug!(count = components.len(), "component list replaced");
        *self.shared.components.borrow_mut() = components;
        self.shared.refresh();
    }

    /// Replaces the volumes and priority, then recomputes and republishes.
    pub fn set_config(&mut self, config: CompositionConfig) {
        *self.shared.config.borrow_mut() = config;
        self.shared.refresh();
    }

    /// Replaces the entity's own children, then recomputes and republishes.
    pub fn set_children(&mut self, children: Vec<ModelVisual>) {
        tracing::debug!(count = children.len(), "entity children replaced");
        *self.shared.children.borrow_mut() = children;
        self.shared.refresh();
    }

    /// Recomputes and republishes now.
    pub fn refresh(&self) {
        self.shared.refresh();
    }

    /// The most recently composed description.
    ///
    /// This is a snapshot; holding it does not hold up later updates.
    #[must_use]
    pub fn description(&self) -> Rc<ComposedEntityDescription> {
        self.shared.description.borrow().clone()
    }

    /// The number of recomputes so far, including the initial one.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.shared.revision.get()
    }

    /// The current component list.
    #[must_use]
    pub fn components(&self) -> Vec<SharedComponent> {
        self.shared.components.borrow().clone()
    }

    /// The current composition config.
    #[must_use]
    pub fn config(&self) -> CompositionConfig {
        self.shared.config.borrow().clone()
    }

    /// The entity's own children.
    #[must_use]
    pub fn children(&self) -> Vec<ModelVisual> {
        self.shared.children.borrow().clone()
    }

    /// Runs `f` with the spatial entity receiving the descriptions.
    ///
    /// Components may notify while `f` runs. The description is recomposed
    /// right away and published to the consumer once `f` returns.
    pub fn with_consumer<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        let result = {
            let consumer = self.shared.consumer.borrow();
            f(&*consumer)
        };
        self.shared.flush_deferred_publish();
        result
    }

    /// The global address of the underlying entity.
    ///
    /// `None` until the runtime has instantiated it.
    #[must_use]
    pub fn global_id(&self) -> Option<EndpointAddr> {
        self.with_consumer(E::global_id)
    }
}

impl<E: SpatialEntity + 'static> fmt::Debug for ComposedEntity<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedEntity")
            .field("components", &self.shared.components.borrow().len())
            .field("revision", &self.revision())
            .field("config", &*self.shared.config.borrow())
            .finish_non_exhaustive()
    }
}
