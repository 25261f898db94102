//! Unit types for physical quantities.
//!
//! Angles are carried as [`Degrees`] so they cannot be confused with step counts.

use core::ops::{Add, AddAssign, Neg, Sub};

use serde::Deserialize;

/// Angular position or displacement in degrees.
///
/// Signed and unbounded: positions accumulate without wrapping at 360.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Zero degrees.
    pub const ZERO: Self = Self(0.0);

    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Magnitude of the angle.
    #[inline]
    pub fn abs(self) -> Self {
        Self(libm::fabs(self.0))
    }

    /// `true` for strictly negative angles.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Degrees {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Degrees {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl core::fmt::Display for Degrees {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Degrees.
    fn degrees(self) -> Degrees;
}

impl UnitExt for f64 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self)
    }
}
