//! Exact rational arithmetic for chart positions.
//!
//! Chart offsets are accumulated from thousands of steps like 1/24 or 1/192
//! of a measure. Floating point drifts far enough over a song to misclassify
//! beats, so parser state is kept as a reduced `Fraction` and only converted
//! to `f64` when an `Arrow` is emitted.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// Rational number with a positive denominator, always stored reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };

    /// Creates a reduced fraction. The sign is carried by the numerator.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        debug_assert!(denominator != 0, "fraction with zero denominator");
        let divisor = gcd(numerator.abs(), denominator.abs()).max(1);
        Self {
            numerator: numerator / divisor * denominator.signum(),
            denominator: denominator.abs() / divisor,
        }
    }

    pub fn from_integer(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    /// Largest integer not greater than this value.
    pub fn floor(&self) -> i64 {
        self.numerator.div_euclid(self.denominator)
    }

    /// The part in `[0, 1)` left after removing `floor()`.
    pub fn fract(&self) -> Self {
        Self::new(self.numerator.rem_euclid(self.denominator), self.denominator)
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Fraction {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Fraction::new(
            self.numerator * other.denominator + other.numerator * self.denominator,
            self.denominator * other.denominator,
        )
    }
}

impl AddAssign for Fraction {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Fraction {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Fraction::new(
            self.numerator * other.denominator - other.numerator * self.denominator,
            self.denominator * other.denominator,
        )
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numerator * other.denominator;
        let rhs = other.numerator * self.denominator;
        lhs.cmp(&rhs)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}
