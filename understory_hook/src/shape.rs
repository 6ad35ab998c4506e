// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook shapes: the matching volume and the affordance model drawn for it.
//!
//! A [`HookShape`] is the only thing that differs between hook variants. The
//! visibility rule and the highlight state live in
//! [`StandardHook`](crate::StandardHook) and are shared.

use alloc::borrow::Cow;
use peniko::Color;

use understory_gadget::geometry::{Aabb3, Volume};
use understory_gadget::visual::{ModelVisual, Transform3};

use crate::error::HookError;
use crate::highlight::HookHighlight;

/// Model URIs, scale, and colors used for hook affordances.
#[derive(Clone, Debug)]
pub struct HookStyle {
    /// Model drawn for sphere hooks.
    pub icon_uri: Cow<'static, str>,
    /// Uniform scale applied to the icon model.
    pub icon_scale: f64,
    /// Unit-cube model stretched over box hooks.
    pub bounding_box_uri: Cow<'static, str>,
    /// Box tint while no grab is in progress.
    pub resting_color: Color,
    /// Box tint during a grab.
    pub highlighted_color: Color,
}

impl HookStyle {
    /// The standard plus-in-circle hook icon.
    pub const HOOK_ICON_URI: &'static str = "https://aardvark.install/models/hook.glb";
    /// The standard bounding box model, spanning `[-1, 1]` on each axis.
    pub const BOUNDING_BOX_URI: &'static str = "https://aardvark.install/models/bounding_box.glb";
    /// `#3E38FF`.
    pub const RESTING_COLOR: Color = Color::from_rgba8(0x3E, 0x38, 0xFF, 0xFF);
    /// `#7772FF`.
    pub const HIGHLIGHTED_COLOR: Color = Color::from_rgba8(0x77, 0x72, 0xFF, 0xFF);

    /// Sets the icon model and its scale.
    #[must_use]
    pub fn with_icon(mut self, uri: impl Into<Cow<'static, str>>, scale: f64) -> Self {
        self.icon_uri = uri.into();
        self.icon_scale = scale;
        self
    }

    /// Sets the bounding box model.
    #[must_use]
    pub fn with_bounding_box(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.bounding_box_uri = uri.into();
        self
    }

    /// Sets the resting and highlighted box tints.
    #[must_use]
    pub fn with_colors(mut self, resting: Color, highlighted: Color) -> Self {
        self.resting_color = resting;
        self.highlighted_color = highlighted;
        self
    }

    /// The box tint for `highlight`.
    #[must_use]
    pub fn color_for(&self, highlight: HookHighlight) -> Color {
        match highlight {
            HookHighlight::GrabInProgress => self.highlighted_color,
            HookHighlight::None | HookHighlight::InRange | HookHighlight::Occupied => {
                self.resting_color
            }
        }
    }
}

impl Default for HookStyle {
    fn default() -> Self {
        Self {
            icon_uri: Cow::Borrowed(Self::HOOK_ICON_URI),
            icon_scale: 1.0,
            bounding_box_uri: Cow::Borrowed(Self::BOUNDING_BOX_URI),
            resting_color: Self::RESTING_COLOR,
            highlighted_color: Self::HIGHLIGHTED_COLOR,
        }
    }
}

/// Geometry and appearance of a hook variant.
pub trait HookShape {
    /// The volume grabbables are matched against.
    fn volume(&self) -> Volume;

    /// The model shown when the hook is visible.
    fn affordance(&self, highlight: HookHighlight, style: &HookStyle) -> ModelVisual;

    /// Checks the shape before a hook is built around it.
    fn validate(&self) -> Result<(), HookError> {
        Ok(())
    }
}

/// A spherical hook drawn with the hook icon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SphereShape {
    /// Sphere radius in meters.
    pub radius: f64,
}

impl SphereShape {
    /// Radius used when none is given.
    pub const DEFAULT_RADIUS: f64 = 0.08;

    /// A sphere with the given radius.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for SphereShape {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl HookShape for SphereShape {
    fn volume(&self) -> Volume {
        Volume::sphere(self.radius)
    }

    fn affordance(&self, _highlight: HookHighlight, style: &HookStyle) -> ModelVisual {
        ModelVisual::new(style.icon_uri.clone())
            .with_transform(Transform3::uniform_scale(style.icon_scale))
    }

    fn validate(&self) -> Result<(), HookError> {
        if self.radius.is_finite() && self.radius > 0.0 {
            Ok(())
        } else {
            Err(HookError::InvalidRadius {
                radius: self.radius,
            })
        }
    }
}

/// A box hook drawn as a tinted bounding box.
///
/// The box model spans the unit cube, so it is translated to the center of
/// the bounds and scaled by their half-extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxShape {
    /// Box bounds in hook space.
    pub bounds: Aabb3,
}

impl BoxShape {
    /// A box with the given bounds.
    #[must_use]
    pub const fn new(bounds: Aabb3) -> Self {
        Self { bounds }
    }

    /// A box from six per-axis bounds.
    #[must_use]
    pub const fn from_bounds(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        z_min: f64,
        z_max: f64,
    ) -> Self {
        Self::new(Aabb3::from_bounds(x_min, x_max, y_min, y_max, z_min, z_max))
    }
}

impl HookShape for BoxShape {
    fn volume(&self) -> Volume {
        Volume::aabb(self.bounds)
    }

    fn affordance(&self, highlight: HookHighlight, style: &HookStyle) -> ModelVisual {
        ModelVisual::new(style.bounding_box_uri.clone())
            .with_transform(Transform3::fit_unit_cube(&self.bounds))
            .with_color(style.color_for(highlight))
    }

    fn validate(&self) -> Result<(), HookError> {
        match self.bounds.invalid_axis() {
            None => Ok(()),
            Some(axis) => Err(HookError::InvalidBounds { axis }),
        }
    }
}
