//! Fixed-point point amounts.
//!
//! Amounts are stored in hundredths of a point so that sums over a group
//! are exact. Only the MPCR multiplication rounds.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Four decimal places of a scaling coefficient.
const FACTOR_SCALE: i128 = 10_000;

/// An amount of experimental points with two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(i64);

impl Currency {
    pub const ZERO: Currency = Currency(0);

    /// Largest magnitude, in points, accepted from fractional input.
    pub const MAX_POINTS: f64 = 1e12;

    /// Creates an amount from whole points.
    pub const fn from_points(points: i64) -> Self {
        Self(points * 100)
    }

    /// Creates an amount from hundredths of a point.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Creates an amount from a fractional point value, rounding to the
    /// nearest hundredth (half away from zero).
    ///
    /// Returns `None` for non-finite values and magnitudes above
    /// [`Currency::MAX_POINTS`].
    pub fn from_f64(points: f64) -> Option<Self> {
        if !points.is_finite() || points.abs() > Self::MAX_POINTS {
            return None;
        }
        Some(Self((points * 100.0).round() as i64))
    }

    /// Returns the amount in hundredths of a point.
    pub fn hundredths(&self) -> i64 {
        self.0
    }

    /// Returns the amount as fractional points.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiplies by a coefficient, rounding to the nearest hundredth
    /// (half away from zero).
    ///
    /// The coefficient is taken to four decimal places first, so exact
    /// halves such as 0.05 × 0.7 round up instead of falling short in
    /// binary floating point.
    pub fn scaled(&self, factor: f64) -> Self {
        let basis = (factor * FACTOR_SCALE as f64).round() as i128;
        let product = (self.0 as i128).saturating_mul(basis);
        let half = FACTOR_SCALE / 2;
        let rounded = if product >= 0 {
            product.saturating_add(half) / FACTOR_SCALE
        } else {
            product.saturating_sub(half) / FACTOR_SCALE
        };
        Self(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

impl Add for Currency {
    type Output = Currency;

    fn add(self, rhs: Currency) -> Currency {
        Currency(self.0 + rhs.0)
    }
}

impl Sub for Currency {
    type Output = Currency;

    fn sub(self, rhs: Currency) -> Currency {
        Currency(self.0 - rhs.0)
    }
}

impl Sum for Currency {
    fn sum<I: Iterator<Item = Currency>>(iter: I) -> Currency {
        iter.fold(Currency::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Currency> for Currency {
    fn sum<I: Iterator<Item = &'a Currency>>(iter: I) -> Currency {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02} points", sign, abs / 100, abs % 100)
    }
}
