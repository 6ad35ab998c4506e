// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook construction errors.

use thiserror::Error;
use understory_gadget::geometry::Axis;

/// Reasons a hook cannot be built from its configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HookError {
    /// Persistent state is keyed by name, so it may not be empty.
    #[error("hook persistent name is empty")]
    EmptyPersistentName,

    /// Box bounds along an axis are not finite or have `min > max`.
    #[error("hook box bounds on the {axis} axis are not finite or are inverted")]
    InvalidBounds {
        /// The first offending axis.
        axis: Axis,
    },

    /// Sphere radius is zero, negative, or not finite.
    #[error("hook radius must be positive and finite, got {radius}")]
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },
}
