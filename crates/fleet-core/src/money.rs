//! # Money Module
//!
//! Provides the `Money` type for rental costs and fines, and the
//! `Multiplier` type used for discounts and overdue penalties.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    100.0 × 7 × 0.9 = 630.0000000000001  ❌ WRONG!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    10000 cents × 7 = 70000 cents                                        │
//! │    70000 × 9000 bps / 10000 = 63000 cents = 630.00 exactly              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fleet_core::money::{Money, Multiplier};
//!
//! let daily = Money::from_major(100);
//! let week = daily * 7;
//! let discounted = week.scale(Multiplier::from_bps(9_000));
//! assert_eq!(discounted.cents(), 63_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic stays closed under subtraction; the
///   non-negativity of costs and fines is enforced by validation
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No currency**: localisation is out of scope, amounts are plain decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use fleet_core::money::Money;
    ///
    /// let price = Money::from_cents(4_550); // 45.50
    /// assert_eq!(price.cents(), 4_550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a multiplier, rounding half-up to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The `+5000` provides
    /// rounding (5000/10000 = 0.5). The product is taken in i128 and clamped
    /// back into the i64 range.
    ///
    /// ## Example
    /// ```rust
    /// use fleet_core::money::{Money, Multiplier};
    ///
    /// let overdue = Money::from_major(200);          // 2 days at 100
    /// let fine = overdue.scale(Multiplier::from_bps(15_000));
    /// assert_eq!(fine, Money::from_major(300));
    /// ```
    pub fn scale(&self, multiplier: Multiplier) -> Money {
        let scaled = (self.0 as i128 * multiplier.bps() as i128 + 5_000) / 10_000;
        Money::from_cents(scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a number of billable days, saturating at the i64 bounds.
    #[inline]
    pub const fn multiply_days(&self, days: i64) -> Self {
        Money(self.0.saturating_mul(days))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`630.00`), no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, days: i64) -> Self {
        self.multiply_days(days)
    }
}

// =============================================================================
// Multiplier
// =============================================================================

/// A price factor represented in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// - 9000 bps  = ×0.9 (weekly discount)
/// - 8000 bps  = ×0.8 (monthly discount)
/// - 15000 bps = ×1.5 (default overdue fine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Multiplier(u32);

impl Multiplier {
    /// Identity multiplier (×1.0).
    pub const ONE: Multiplier = Multiplier(10_000);

    /// Creates a multiplier from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Multiplier(bps)
    }

    /// Creates a multiplier from a decimal factor such as `1.5`.
    ///
    /// The factor is rounded to the nearest basis point.
    ///
    /// ## Example
    /// ```rust
    /// use fleet_core::money::Multiplier;
    ///
    /// assert_eq!(Multiplier::from_factor(1.5).unwrap().bps(), 15_000);
    /// assert!(Multiplier::from_factor(-1.0).is_err());
    /// ```
    pub fn from_factor(factor: f64) -> Result<Self, ValidationError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(ValidationError::InvalidFormat {
                field: "multiplier".to_string(),
                reason: format!("{factor} is not a non-negative number"),
            });
        }

        let bps = (factor * 10_000.0).round();
        if bps > u32::MAX as f64 {
            return Err(ValidationError::InvalidFormat {
                field: "multiplier".to_string(),
                reason: format!("{factor} is too large"),
            });
        }

        Ok(Multiplier(bps as u32))
    }

    /// Returns the multiplier in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the multiplier as a decimal factor (for display only).
    #[inline]
    pub fn factor(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Checks if the multiplier is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.factor())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
