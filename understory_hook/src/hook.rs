// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The standard hook: highlight state plus edit-mode driven visibility.

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use understory_gadget::context::{GadgetContext, Hand};
use understory_gadget::geometry::Volume;
use understory_gadget::signal::Subscription;
use understory_gadget::visual::ModelVisual;

use crate::error::HookError;
use crate::highlight::HookHighlight;
use crate::shape::{HookShape, HookStyle};

/// What identifies a hook and which hand's edit mode it follows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HookConfig {
    /// Key for the user's saved state; stable from run to run.
    pub persistent_name: String,
    /// The hand this hook is parented to, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hand: Option<Hand>,
}

impl HookConfig {
    /// A config not tied to a hand.
    #[must_use]
    pub fn new(persistent_name: impl Into<String>) -> Self {
        Self {
            persistent_name: persistent_name.into(),
            hand: None,
        }
    }

    /// Ties the hook to `hand`.
    #[must_use]
    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hand = Some(hand);
        self
    }
}

/// Whether the affordance is drawn for a highlight state and edit mode.
///
/// | State | no edit mode | edit mode |
/// |-------|--------------|-----------|
/// | `None` | hidden | shown |
/// | `Occupied` | hidden | shown |
/// | `GrabInProgress` | shown | shown |
/// | `InRange` | shown | shown |
#[must_use]
pub const fn should_show(highlight: HookHighlight, edit_mode: bool) -> bool {
    edit_mode || highlight.invites_attachment()
}

/// The hook node as the matching runtime sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct HookNode {
    /// Persistent name of the hook.
    pub persistent_name: String,
    /// Volume grabbables are matched against.
    pub volume: Volume,
}

/// One render pass of a hook.
#[derive(Clone, Debug)]
pub struct HookRender {
    /// The always-present hook node.
    pub node: HookNode,
    /// The affordance model, when visible.
    pub model: Option<ModelVisual>,
}

impl HookRender {
    /// Returns `true` if the affordance is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.model.is_some()
    }
}

#[derive(Debug, Default)]
struct HookState {
    highlight: Cell<HookHighlight>,
    edit_mode: Cell<bool>,
}

/// A hook grabbables can attach to, drawn with shape `S`.
///
/// The hook is hidden at rest and appears when a grabbable comes in range,
/// during a grab, or while its hand is in edit mode.
///
/// ```
/// use understory_gadget::context::{GadgetContext, Hand};
/// use understory_hook::{HookConfig, HookHighlight, SphereShape, StandardHook};
///
/// let ctx = GadgetContext::new();
/// let hook = StandardHook::new(
///     &ctx,
///     HookConfig::new("left_hip").with_hand(Hand::Left),
///     SphereShape::default(),
/// )
/// .unwrap();
/// assert!(!hook.render().is_visible());
///
/// hook.update_highlight(HookHighlight::InRange);
/// assert!(hook.render().is_visible());
///
/// hook.update_highlight(HookHighlight::Occupied);
/// ctx.set_edit_mode(Hand::Left, true);
/// assert!(hook.render().is_visible());
/// ```
#[derive(Debug)]
pub struct StandardHook<S: HookShape> {
    ctx: GadgetContext,
    config: HookConfig,
    shape: S,
    style: HookStyle,
    state: Rc<HookState>,
    edit_mode_subscription: Subscription,
}

impl<S: HookShape> StandardHook<S> {
    /// Validates `config` and `shape` and starts following edit mode.
    ///
    /// Construction is the only fallible step. Once built, highlight updates,
    /// rendering, and release always succeed.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] when the persistent name is empty, when a sphere
    /// radius is not positive and finite, or when box bounds are not finite or
    /// have `min > max` on some axis. Zero-width boxes are accepted. Nothing is
    /// subscribed when construction fails.
    ///
    /// ```
    /// use understory_gadget::context::GadgetContext;
    /// use understory_gadget::geometry::Axis;
    /// use understory_hook::{BoxShape, HookConfig, HookError, StandardHook};
    ///
    /// let ctx = GadgetContext::new();
    /// let inverted = BoxShape::from_bounds(1.0, -1.0, 0.0, 1.0, 0.0, 1.0);
    /// let err = StandardHook::new(&ctx, HookConfig::new("shelf"), inverted).unwrap_err();
    /// assert_eq!(err, HookError::InvalidBounds { axis: Axis::X });
    ///
    /// let flat = BoxShape::from_bounds(-1.0, 1.0, 0.0, 0.0, -1.0, 1.0);
    /// let tray = StandardHook::new(&ctx, HookConfig::new("tray"), flat).unwrap();
    /// assert_eq!(ctx.edit_mode_listener_count(), 1);
    /// # drop(tray);
    /// ```
    pub fn new(ctx: &GadgetContext, config: HookConfig, shape: S) -> Result<Self, HookError> {
        if config.persistent_name.is_empty() {
            return Err(HookError::EmptyPersistentName);
        }
        shape.validate()?;

        let hand = config.hand;
        let state = Rc::new(HookState {
            highlight: Cell::new(HookHighlight::None),
            edit_mode: Cell::new(ctx.edit_mode_for(hand)),
        });

        let cached = state.clone();
        let edit_mode_subscription = ctx.listen_for_edit_mode(move |change| {
            let enabled = change.applies_to(hand);
            if cached.edit_mode.replace(enabled) != enabled {
                tracing::debug!(?hand, enabled, "hook edit mode changed");
            }
        });

        Ok(Self {
            ctx: ctx.clone(),
            config,
            shape,
            style: HookStyle::default(),
            state,
            edit_mode_subscription,
        })
    }

    /// Replaces the affordance style.
    #[must_use]
    pub fn with_style(mut self, style: HookStyle) -> Self {
        self.style = style;
        self
    }

    /// Stores a highlight state reported by the matching runtime.
    ///
    /// Marks the gadget dirty and returns `true` when the state changed.
    pub fn update_highlight(&self, highlight: HookHighlight) -> bool {
        let previous = self.state.highlight.replace(highlight);
        if previous == highlight {
            return false;
        }
        tracing::debug!(
            name = %self.config.persistent_name,
            ?previous,
            ?highlight,
            "hook highlight changed"
        );
        self.ctx.mark_dirty();
        true
    }

    /// Like [`update_highlight`](Self::update_highlight) for a raw wire value.
    pub fn update_highlight_raw(&self, raw: u8) -> bool {
        self.update_highlight(HookHighlight::from_raw(raw))
    }

    /// The current highlight state.
    #[must_use]
    pub fn highlight(&self) -> HookHighlight {
        self.state.highlight.get()
    }

    /// The edit mode this hook last observed for its hand.
    #[must_use]
    pub fn edit_mode(&self) -> bool {
        self.state.edit_mode.get()
    }

    /// Stops following edit mode.
    ///
    /// The last observed edit mode stays in effect. Dropping the hook does
    /// the same. Returns `true` if the subscription was still active.
    pub fn release(&mut self) -> bool {
        let released = self.edit_mode_subscription.cancel();
        if released {
            tracing::debug!(name = %self.config.persistent_name, "hook released");
        }
        released
    }

    /// Returns `true` until [`release`](Self::release) is called.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.edit_mode_subscription.is_active()
    }

    /// Whether the affordance is currently drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        should_show(self.highlight(), self.edit_mode())
    }

    /// Produces the hook node and, when visible, its affordance.
    #[must_use]
    pub fn render(&self) -> HookRender {
        let highlight = self.highlight();
        let model = should_show(highlight, self.edit_mode())
            .then(|| self.shape.affordance(highlight, &self.style));
        HookRender {
            node: HookNode {
                persistent_name: self.config.persistent_name.clone(),
                volume: self.shape.volume(),
            },
            model,
        }
    }

    /// The persistent name.
    #[must_use]
    pub fn persistent_name(&self) -> &str {
        &self.config.persistent_name
    }

    /// The hand this hook follows.
    #[must_use]
    pub fn hand(&self) -> Option<Hand> {
        self.config.hand
    }

    /// The hook's shape.
    #[must_use]
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// The affordance style.
    #[must_use]
    pub fn style(&self) -> &HookStyle {
        &self.style
    }
}
