// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gadget runtime context: per-hand edit mode and re-render scheduling.
//!
//! A [`GadgetContext`] is created once when the gadget process starts and a
//! handle to it is passed to everything that needs it. Handles are cheap to
//! clone and all refer to the same state. The context itself is never torn
//! down by its users; they only query it and subscribe to it.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use crate::signal::{Listeners, Subscription};

/// A hand (or controller side).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Hand {
    /// The left hand.
    Left,
    /// The right hand.
    Right,
}

impl Hand {
    /// Returns the single-member set for this hand.
    #[must_use]
    pub const fn as_set(self) -> HandSet {
        match self {
            Self::Left => HandSet::LEFT,
            Self::Right => HandSet::RIGHT,
        }
    }
}

bitflags::bitflags! {
    /// A set of hands.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HandSet: u8 {
        /// The left hand.
        const LEFT  = 0b0000_0001;
        /// The right hand.
        const RIGHT = 0b0000_0010;
    }
}

/// Delivered to edit-mode listeners whenever a hand's edit mode flips.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EditModeChange {
    /// The hand whose edit mode changed.
    pub hand: Hand,
    /// The new edit mode for that hand.
    pub enabled: bool,
    /// All hands in edit mode after the change.
    pub hands: HandSet,
}

impl EditModeChange {
    /// Edit mode as seen by something scoped to `hand`.
    ///
    /// See [`GadgetContext::edit_mode_for`] for the meaning of `None`.
    #[must_use]
    pub fn applies_to(&self, hand: Option<Hand>) -> bool {
        edit_mode_in(self.hands, hand)
    }
}

fn edit_mode_in(hands: HandSet, hand: Option<Hand>) -> bool {
    match hand {
        Some(hand) => hands.contains(hand.as_set()),
        None => !hands.is_empty(),
    }
}

struct ContextInner {
    edit_mode: Cell<HandSet>,
    edit_mode_listeners: Listeners<EditModeChange>,
    dirty: Cell<bool>,
    dirty_generation: Cell<u64>,
}

/// Handle to the process-wide gadget runtime state.
///
/// ```
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use understory_gadget::context::{GadgetContext, Hand};
///
/// let ctx = GadgetContext::new();
/// let seen = Rc::new(Cell::new(false));
///
/// let sink = seen.clone();
/// let _sub = ctx.listen_for_edit_mode(move |change| sink.set(change.enabled));
///
/// ctx.set_edit_mode(Hand::Left, true);
/// assert!(seen.get());
/// assert!(ctx.edit_mode_for(Some(Hand::Left)));
/// assert!(!ctx.edit_mode_for(Some(Hand::Right)));
/// assert!(ctx.take_dirty());
/// ```
#[derive(Clone)]
pub struct GadgetContext {
    inner: Rc<ContextInner>,
}

impl GadgetContext {
    /// Creates a context with no hand in edit mode and nothing dirty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContextInner {
                edit_mode: Cell::new(HandSet::empty()),
                edit_mode_listeners: Listeners::new(),
                dirty: Cell::new(false),
                dirty_generation: Cell::new(0),
            }),
        }
    }

    /// Returns all hands currently in edit mode.
    #[must_use]
    pub fn edit_mode(&self) -> HandSet {
        self.inner.edit_mode.get()
    }

    /// Returns the edit mode for `hand`.
    ///
    /// `None` stands for "not tied to a hand" and reports edit mode when any
    /// hand is in it.
    #[must_use]
    pub fn edit_mode_for(&self, hand: Option<Hand>) -> bool {
        edit_mode_in(self.edit_mode(), hand)
    }

    /// Sets the edit mode for `hand`.
    ///
    /// When the value changes, listeners are notified and the context is
    /// marked dirty. Returns `true` if the value changed.
    pub fn set_edit_mode(&self, hand: Hand, enabled: bool) -> bool {
        let mut hands = self.edit_mode();
        if hands.contains(hand.as_set()) == enabled {
            return false;
        }
        hands.set(hand.as_set(), enabled);
        self.inner.edit_mode.set(hands);
        tracing::debug!(?hand, enabled, "edit mode changed");

        self.inner.edit_mode_listeners.emit(&EditModeChange {
            hand,
            enabled,
            hands,
        });
        self.mark_dirty();
        true
    }

    /// Subscribes to edit-mode changes for every hand.
    ///
    /// The handler stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn listen_for_edit_mode(
        &self,
        handler: impl Fn(&EditModeChange) + 'static,
    ) -> Subscription {
        self.inner.edit_mode_listeners.subscribe(handler)
    }

    /// Returns the number of live edit-mode subscriptions.
    #[must_use]
    pub fn edit_mode_listener_count(&self) -> usize {
        self.inner.edit_mode_listeners.len()
    }

    /// Requests a re-render of the gadget.
    pub fn mark_dirty(&self) {
        self.inner.dirty.set(true);
        let generation = self.inner.dirty_generation.get().wrapping_add(1);
        self.inner.dirty_generation.set(generation);
        tracing::trace!(generation, "gadget marked dirty");
    }

    /// Returns `true` if a re-render was requested since the last [`take_dirty`](Self::take_dirty).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    /// Clears the dirty flag and returns its previous value.
    ///
    /// The render scheduler calls this once per pass; any number of
    /// [`mark_dirty`](Self::mark_dirty) calls in between collapse into one pass.
    pub fn take_dirty(&self) -> bool {
        self.inner.dirty.replace(false)
    }

    /// Returns the number of [`mark_dirty`](Self::mark_dirty) calls so far.
    ///
    /// Unlike the dirty flag this is never reset, so it can be used to detect
    /// whether anything requested a re-render since a previous observation.
    #[must_use]
    pub fn dirty_generation(&self) -> u64 {
        self.inner.dirty_generation.get()
    }
}

impl Default for GadgetContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GadgetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GadgetContext")
            .field("edit_mode", &self.edit_mode())
            .field("dirty", &self.is_dirty())
            .field("dirty_generation", &self.dirty_generation())
            .field("edit_mode_listeners", &self.edit_mode_listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn edit_mode_is_scoped_per_hand() {
        let ctx = GadgetContext::new();
        assert!(!ctx.edit_mode_for(None));

        ctx.set_edit_mode(Hand::Right, true);
        assert!(ctx.edit_mode_for(Some(Hand::Right)));
        assert!(!ctx.edit_mode_for(Some(Hand::Left)));
        assert!(ctx.edit_mode_for(None), "unscoped queries see any hand");
    }

    #[test]
    fn redundant_set_is_silent() {
        let ctx = GadgetContext::new();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let _sub = ctx.listen_for_edit_mode(move |change| sink.borrow_mut().push(*change));

        assert!(ctx.set_edit_mode(Hand::Left, true));
        assert!(!ctx.set_edit_mode(Hand::Left, true));
        assert!(ctx.set_edit_mode(Hand::Left, false));

        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].hands, HandSet::LEFT);
        assert!(!changes[1].enabled);
        assert!(changes[1].hands.is_empty());
    }

    #[test]
    fn dirty_flag_collapses_and_generation_counts() {
        let ctx = GadgetContext::new();
        assert!(!ctx.take_dirty());

        ctx.mark_dirty();
        ctx.mark_dirty();
        assert!(ctx.is_dirty());
        assert_eq!(ctx.dirty_generation(), 2);

        assert!(ctx.take_dirty());
        assert!(!ctx.is_dirty());
        assert_eq!(ctx.dirty_generation(), 2);
    }

    #[test]
    fn clones_share_state() {
        let ctx = GadgetContext::new();
        let other = ctx.clone();
        other.set_edit_mode(Hand::Left, true);
        assert!(ctx.edit_mode_for(Some(Hand::Left)));
        assert!(ctx.is_dirty());
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let ctx = GadgetContext::new();
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        let sub = ctx.listen_for_edit_mode(move |_| sink.set(sink.get() + 1));
        assert_eq!(ctx.edit_mode_listener_count(), 1);

        drop(sub);
        ctx.set_edit_mode(Hand::Left, true);
        assert_eq!(count.get(), 0);
        assert_eq!(ctx.edit_mode_listener_count(), 0);
    }
}
