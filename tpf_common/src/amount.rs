use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "USD";

//--------------------------------------      Amount       -----------------------------------------------------------
/// A currency amount in minor units (cents). Payment processors take integer minor units on the wire, so amounts are
/// stored that way and only converted to major units at the API boundary.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Amount(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a currency amount: {0}")]
pub struct AmountConversionError(String);

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Amount {}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl TryFrom<f64> for Amount {
    type Error = AmountConversionError;

    fn try_from(major: f64) -> Result<Self, Self::Error> {
        if !major.is_finite() || major < 0.0 {
            return Err(AmountConversionError(format!("{major} is not a non-negative amount")));
        }
        let minor = (major * 100.0).round();
        if minor > i64::MAX as f64 {
            return Err(AmountConversionError(format!("{major} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(minor as i64))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

impl Amount {
    /// The amount in minor units.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// Convert a major-unit amount using the `round(major * 100)` convention that single-phase processors expect.
    pub fn from_major(major: f64) -> Result<Self, AmountConversionError> {
        Self::try_from(major)
    }

    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The major-unit decimal string ("20.00") that two-phase order processors expect on the wire.
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }

    /// Split the amount evenly into `n` shares. The division remainder (at most `n - 1` minor units) is carried by
    /// the first share, so the shares always sum to the original amount.
    pub fn split_even(&self, n: usize) -> Vec<Amount> {
        if n <= 1 {
            return vec![*self];
        }
        let n = n as i64;
        let share = self.0 / n;
        let remainder = self.0 - share * n;
        let mut shares = vec![Amount(share); n as usize];
        shares[0] = Amount(share + remainder);
        shares
    }
}
