// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal 3D geometry shared by entities and hooks.
//!
//! These types only describe volumes; intersection tests belong to the
//! matching runtime.

use core::ops::{Add, Mul, Sub};

/// A 3D vector or point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// The all-ones vector.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all components set to `v`.
    #[must_use]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Axis of a 3D box, used when reporting which bound is invalid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3 {
    /// Creates a box from its corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from six per-axis bounds.
    ///
    /// ```
    /// use understory_gadget::geometry::{Aabb3, Vec3};
    ///
    /// let b = Aabb3::from_bounds(-1.0, 1.0, 0.0, 2.0, -0.5, 0.5);
    /// assert_eq!(b.center(), Vec3::new(0.0, 1.0, 0.0));
    /// assert_eq!(b.half_extents(), Vec3::new(1.0, 1.0, 0.5));
    /// ```
    #[must_use]
    pub const fn from_bounds(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        z_min: f64,
        z_max: f64,
    ) -> Self {
        Self::new(Vec3::new(x_min, y_min, z_min), Vec3::new(x_max, y_max, z_max))
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box size along each axis.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns the first axis whose bounds are non-finite or inverted.
    ///
    /// Degenerate (zero-width) axes are accepted.
    #[must_use]
    pub fn invalid_axis(&self) -> Option<Axis> {
        let axes = [
            (Axis::X, self.min.x, self.max.x),
            (Axis::Y, self.min.y, self.max.y),
            (Axis::Z, self.min.z, self.max.z),
        ];
        axes.into_iter()
            .find(|(_, min, max)| !(min.is_finite() && max.is_finite() && min <= max))
            .map(|(axis, _, _)| axis)
    }
}

/// A region used by the matching runtime to decide spatial candidacy.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Volume {
    /// Matches nothing.
    #[default]
    Empty,
    /// Matches everything.
    Infinite,
    /// A sphere around the entity origin.
    Sphere {
        /// Sphere radius.
        radius: f64,
    },
    /// An axis-aligned box in entity space.
    Box {
        /// Box bounds.
        bounds: Aabb3,
    },
}

impl Volume {
    /// A sphere volume.
    #[must_use]
    pub const fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// A box volume.
    #[must_use]
    pub const fn aabb(bounds: Aabb3) -> Self {
        Self::Box { bounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_center_and_half_extents() {
        let b = Aabb3::from_bounds(-1.0, 1.0, 0.0, 2.0, -0.5, 0.5);
        assert_eq!(b.center(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(b.half_extents(), Vec3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn invalid_axis_reports_first_offender() {
        assert_eq!(Aabb3::from_bounds(0.0, 1.0, 0.0, 1.0, 0.0, 1.0).invalid_axis(), None);
        assert_eq!(
            Aabb3::from_bounds(0.0, 1.0, 2.0, 1.0, 3.0, 1.0).invalid_axis(),
            Some(Axis::Y)
        );
        assert_eq!(
            Aabb3::from_bounds(f64::NAN, 1.0, 0.0, 1.0, 0.0, 1.0).invalid_axis(),
            Some(Axis::X)
        );
    }

    #[test]
    fn zero_width_box_is_valid() {
        let flat = Aabb3::from_bounds(0.0, 1.0, 0.5, 0.5, 0.0, 1.0);
        assert_eq!(flat.invalid_axis(), None);
        assert_eq!(flat.half_extents().y, 0.0);
    }
}
