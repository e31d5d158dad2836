use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const USD_CURRENCY_CODE: &str = "usd";

//--------------------------------------        Cents        ---------------------------------------------------------
/// An exact amount of money in minor currency units (US cents).
///
/// All arithmetic and storage is integral; amounts only become floating point at the JSON boundary,
/// where values are expressed in major units (`19.99` on the wire is 1999 internally).
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, SubAssign, sub_assign);
op!(unary Cents, Neg, neg);

impl Mul<i64> for Cents {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in cents: {0}")]
pub struct CentsConversionError(String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Cents {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Cents {}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Converts a major-unit amount (e.g. `19.99` dollars) into cents with standard currency
    /// rounding. `19.99` converts to exactly 1999, never 1998 or 2000.
    pub fn from_major_units(value: f64) -> Result<Self, CentsConversionError> {
        if !value.is_finite() {
            return Err(CentsConversionError(format!("{value} is not a finite amount")));
        }
        let minor = (value * 100.0).round();
        if minor.abs() > (i64::MAX / 2) as f64 {
            return Err(CentsConversionError(format!("{value} is too large to convert to cents")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(minor as i64))
    }

    /// Parses an exact decimal string such as `"19.99"` or `"5"` into cents. At most two fractional
    /// digits are accepted; short fractions are scaled (`"1.5"` is 150 cents).
    pub fn from_decimal_str(amount: &str) -> Result<Self, CentsConversionError> {
        let mut parts = amount.trim().split('.');
        let whole = parts
            .next()
            .ok_or_else(|| CentsConversionError(format!("Invalid amount: {amount}")))?
            .parse::<i64>()
            .map_err(|e| CentsConversionError(format!("Invalid amount: {amount}. {e}.")))?;
        let cents = match parts.next() {
            None => 0,
            Some(frac) if frac.is_empty() || frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(CentsConversionError(format!("Invalid fractional part in amount: {amount}")));
            },
            Some(frac) => {
                let scale = if frac.len() == 1 { 10 } else { 1 };
                frac.parse::<i64>().map_err(|e| CentsConversionError(format!("Invalid amount: {amount}. {e}.")))? *
                    scale
            },
        };
        if parts.next().is_some() {
            return Err(CentsConversionError(format!("Invalid amount: {amount}")));
        }
        let signum = if amount.trim_start().starts_with('-') { -1 } else { 1 };
        Ok(Self(100 * whole + signum * cents))
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02} USD", self.0 / 100, (self.0 % 100).abs())
    }
}

// Wire format is a major-unit number, so that clients deal in dollars while the engine deals in
// integer cents.
impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Cents::from_major_units(value).map_err(serde::de::Error::custom)
    }
}
