//! Fixed-point horizontal coordinates.
//!
//! Contour offsets are summed across threads and many levels of nesting, so
//! the engine works in integer units of 1/65536 instead of floats. Equal
//! inputs always produce bit-identical positions and the minimum-distance
//! check never suffers from rounding drift.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Serialize, Serializer};

/// Horizontal coordinate in 1/65536 units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Coord(i64);

impl Coord {
    /// Number of fractional bits.
    pub const FRACTIONAL_BITS: u32 = 16;

    /// Raw units per whole unit.
    pub const SCALE: i64 = 1 << Self::FRACTIONAL_BITS;

    pub const ZERO: Coord = Coord(0);

    /// Smallest representable step.
    pub const EPSILON: Coord = Coord(1);

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn from_int(units: i64) -> Self {
        Self(units * Self::SCALE)
    }

    /// Nearest representable coordinate to `units`.
    #[inline]
    pub fn from_f64(units: f64) -> Self {
        Self((units * Self::SCALE as f64).round() as i64)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Round half up to the nearest whole unit.
    #[inline]
    pub const fn round(self) -> i64 {
        (self.0 + Self::SCALE / 2).div_euclid(Self::SCALE)
    }

    /// Floor of half this value, so `x.half() * 2` never exceeds `x`.
    #[inline]
    pub const fn half(self) -> Self {
        Self(self.0.div_euclid(2))
    }

    /// Split into `parts` shares: `(share, remainder)` with
    /// `share * parts + remainder == self` and `0 <= remainder < parts`.
    #[inline]
    pub fn split(self, parts: usize) -> (Coord, Coord) {
        let parts = parts.max(1) as i64;
        (Self(self.0.div_euclid(parts)), Self(self.0.rem_euclid(parts)))
    }
}

impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Coord {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Coord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Coord {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Coord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Coord {
    fn sum<I: Iterator<Item = Coord>>(iter: I) -> Self {
        iter.fold(Coord::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Coord> for Coord {
    fn sum<I: Iterator<Item = &'a Coord>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.to_f64();
        if v.fract() == 0.0 {
            write!(f, "{}", v as i64)
        } else {
            write!(f, "{:.2}", v)
        }
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}
