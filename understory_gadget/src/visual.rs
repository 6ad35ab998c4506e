// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-graph visual descriptions handed to the renderer.

use alloc::borrow::Cow;
use peniko::Color;

use crate::geometry::{Aabb3, Vec3};

/// Translation and per-axis scale relative to the parent node.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform3 {
    /// Translation in parent space.
    pub translation: Vec3,
    /// Scale along each axis.
    pub scale: Vec3,
}

impl Transform3 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// A transform that only scales, uniformly.
    #[must_use]
    pub const fn uniform_scale(scale: f64) -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::splat(scale),
        }
    }

    /// Maps the unit cube `[-1, 1]^3` onto `bounds`.
    #[must_use]
    pub fn fit_unit_cube(bounds: &Aabb3) -> Self {
        Self {
            translation: bounds.center(),
            scale: bounds.half_extents(),
        }
    }
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A model placed in the scene graph.
#[derive(Clone, Debug)]
pub struct ModelVisual {
    /// Model asset URI.
    pub uri: Cow<'static, str>,
    /// Placement relative to the owning node.
    pub transform: Transform3,
    /// Optional tint.
    pub color: Option<Color>,
}

impl ModelVisual {
    /// A model at the identity transform with no tint.
    #[must_use]
    pub fn new(uri: impl Into<Cow<'static, str>>) -> Self {
        Self {
            uri: uri.into(),
            transform: Transform3::IDENTITY,
            color: None,
        }
    }

    /// Sets the placement.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform3) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the tint.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}
