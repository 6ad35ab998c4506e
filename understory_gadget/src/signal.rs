// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer primitives: listener registries and cancellation tokens.
//!
//! ## Usage
//!
//! 1) Create a [`Listeners`] registry for the event type you want to broadcast.
//! 2) Call [`Listeners::subscribe`] to register a handler. Keep the returned
//!    [`Subscription`] alive for as long as the handler should be called.
//! 3) Call [`Listeners::emit`] to deliver an event to every live handler.
//! 4) Drop the [`Subscription`] (or call [`Subscription::cancel`]) to release it.
//!
//! [`UpdateNotifier`] is the single-slot variant used by entity components: a
//! new registration replaces the previous one, so re-registering the same
//! handler never causes duplicate delivery.
//!
//! ## Minimal example
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_gadget::signal::Listeners;
//!
//! let listeners = Listeners::<u32>::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let sink = seen.clone();
//! let subscription = listeners.subscribe(move |value| sink.set(sink.get() + *value));
//!
//! assert_eq!(listeners.emit(&5), 1);
//! assert_eq!(seen.get(), 5);
//!
//! drop(subscription);
//! assert_eq!(listeners.emit(&5), 0);
//! assert_eq!(seen.get(), 5);
//! ```

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use smallvec::SmallVec;

/// Identifier for a registered handler.
///
/// A slot index plus a generation counter, in the same spirit as a scene-tree
/// node handle:
///
/// - On subscribe, a free slot is taken and the id records its current generation.
/// - On release, the slot is vacated and its generation is incremented, so every
///   id that pointed at it becomes stale.
/// - Stale ids never alias a newer handler that reuses the slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(u32, u32);

impl ListenerId {
    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation this id was issued with.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

type Handler<A> = Rc<dyn Fn(&A)>;

/// Emission snapshot; single-slot notifiers and small registries stay inline.
type LiveIds = SmallVec<[ListenerId; 4]>;

struct Slot<A> {
    generation: u32,
    handler: Option<Handler<A>>,
}

struct Registry<A> {
    slots: Vec<Slot<A>>,
    free: Vec<u32>,
    live: usize,
}

impl<A> Registry<A> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    fn insert(&mut self, handler: Handler<A>) -> ListenerId {
        self.live += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.handler = Some(handler);
            return ListenerId(idx, slot.generation);
        }
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 1,
            handler: Some(handler),
        });
        ListenerId(idx, 1)
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|slot| slot.generation == id.1 && slot.handler.is_some())
    }

    fn get(&self, id: ListenerId) -> Option<Handler<A>> {
        if self.contains(id) {
            self.slots[id.idx()].handler.clone()
        } else {
            None
        }
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let slot = &mut self.slots[id.idx()];
        slot.handler = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.0);
        self.live -= 1;
        true
    }

    fn live_ids(&self) -> LiveIds {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.handler.is_some())
            .map(|(idx, slot)| {
                ListenerId(u32::try_from(idx).unwrap_or(u32::MAX), slot.generation)
            })
            .collect()
    }
}

/// Type-erased release hook so a [`Subscription`] does not carry the event type.
trait Release {
    fn release(&self, id: ListenerId) -> bool;
    fn is_live(&self, id: ListenerId) -> bool;
}

impl<A> Release for RefCell<Registry<A>> {
    fn release(&self, id: ListenerId) -> bool {
        self.borrow_mut().remove(id)
    }

    fn is_live(&self, id: ListenerId) -> bool {
        self.borrow().contains(id)
    }
}

/// A registry of handlers for events of type `A`.
///
/// Cloning a `Listeners` produces another handle to the same registry.
/// Handlers run on the calling thread, in subscription slot order.
pub struct Listeners<A: 'static> {
    registry: Rc<RefCell<Registry<A>>>,
}

impl<A: 'static> Listeners<A> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
        }
    }

    /// Registers `handler` and returns the token that keeps it registered.
    pub fn subscribe(&self, handler: impl Fn(&A) + 'static) -> Subscription {
        let id = self.registry.borrow_mut().insert(Rc::new(handler));
        tracing::trace!(?id, "listener subscribed");
        let source: Weak<dyn Release> = Rc::downgrade(&self.registry) as Weak<dyn Release>;
        Subscription {
            source: Some(source),
            id,
        }
    }

    /// Delivers `event` to every live handler and returns how many ran.
    ///
    /// The set of candidates is fixed when emission starts. Each candidate is
    /// checked for liveness right before it is called, so a handler released by
    /// an earlier handler in the same emission is skipped. Handlers may freely
    /// subscribe, release, or emit again.
    pub fn emit(&self, event: &A) -> usize {
        let ids = self.registry.borrow().live_ids();
        let mut delivered = 0;
        for id in ids {
            // The borrow ends before the call so handlers can re-enter.
            let handler = self.registry.borrow().get(id);
            if let Some(handler) = handler {
                handler(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Returns the number of live handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().live
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` still refers to a live handler in this registry.
    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.registry.borrow().contains(id)
    }

    fn release(&self, id: ListenerId) -> bool {
        self.registry.borrow_mut().remove(id)
    }
}

impl<A: 'static> Default for Listeners<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Clone for Listeners<A> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<A: 'static> fmt::Debug for Listeners<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Cancellation token for a registered handler.
///
/// The handler stays registered until the token is dropped or
/// [`cancel`](Self::cancel)led. Release takes effect immediately: no event is
/// delivered to the handler afterwards, even from an emission already in
/// progress. A token that outlives its registry is inert.
#[must_use = "dropping a Subscription releases its handler"]
pub struct Subscription {
    source: Option<Weak<dyn Release>>,
    id: ListenerId,
}

impl Subscription {
    /// Returns the id of the handler this token controls.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns `true` while the handler is still registered.
    ///
    /// This turns `false` after cancellation, after the registry is dropped, and
    /// after the handler was displaced from an [`UpdateNotifier`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.source
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|source| source.is_live(self.id))
    }

    /// Releases the handler now.
    ///
    /// Returns `true` if this call removed a live handler.
    pub fn cancel(&mut self) -> bool {
        let Some(source) = self.source.take() else {
            return false;
        };
        let released = source
            .upgrade()
            .is_some_and(|source| source.release(self.id));
        if released {
            tracing::trace!(id = ?self.id, "listener released");
        }
        released
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// A shared, argument-less update callback.
pub type UpdateHandler = Rc<dyn Fn()>;

/// Single-slot update notification source.
///
/// Registering a handler replaces whatever was registered before, which makes
/// registration idempotent: the last registered handler wins and is the only
/// one that runs on [`notify`](Self::notify). The token returned for a
/// displaced handler becomes inactive.
///
/// ```
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use understory_gadget::signal::{UpdateHandler, UpdateNotifier};
///
/// let notifier = UpdateNotifier::new();
/// let calls = Rc::new(Cell::new(0));
///
/// let sink = calls.clone();
/// let handler: UpdateHandler = Rc::new(move || sink.set(sink.get() + 1));
///
/// let first = notifier.subscribe(handler.clone());
/// let second = notifier.subscribe(handler);
/// assert!(!first.is_active());
/// assert!(second.is_active());
///
/// notifier.notify();
/// assert_eq!(calls.get(), 1);
/// ```
#[derive(Default)]
pub struct UpdateNotifier {
    listeners: Listeners<()>,
    current: Cell<Option<ListenerId>>,
}

impl UpdateNotifier {
    /// Creates a notifier with no handler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`, displacing any previous registration.
    pub fn subscribe(&self, handler: UpdateHandler) -> Subscription {
        if let Some(previous) = self.current.take() {
            self.listeners.release(previous);
        }
        let subscription = self.listeners.subscribe(move |_| handler());
        self.current.set(Some(subscription.id()));
        subscription
    }

    /// Calls the registered handler, if any. Returns `true` if one ran.
    pub fn notify(&self) -> bool {
        self.listeners.emit(&()) > 0
    }

    /// Returns `true` if a handler is currently registered.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl fmt::Debug for UpdateNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateNotifier")
            .field("current", &self.current.get())
            .finish()
    }
}
