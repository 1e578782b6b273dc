use std::{fmt, str::FromStr};

use thiserror::Error;

/// Maximum number of digits (integer + fractional) an amount may carry.
pub const MAX_DIGITS: usize = 12;

/// Number of fractional digits of every amount.
pub const DECIMAL_PLACES: usize = 2;

/// Ledger amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine to avoid
/// floating-point drift. The database stores the raw cents.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (rejects more than 2 decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

/// Reasons an amount string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("A valid number is required.")]
    Invalid,
    #[error("Ensure that there are no more than {MAX_DIGITS} digits in total.")]
    TooManyDigits,
    #[error("Ensure that there are no more than {DECIMAL_PLACES} decimal places.")]
    TooManyDecimals,
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts an optional leading `+`/`-` and `.` as decimal separator.
    /// Trailing fractional zeros beyond the second place are tolerated
    /// (`"1.500"`), any other third decimal is rejected. Sign is kept so the
    /// caller can report non-positive amounts with its own message.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let (units_str, frac_str) = match rest.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (rest, ""),
        };

        if units_str.is_empty() && frac_str.is_empty() {
            return Err(AmountError::Invalid);
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(units_str) || !all_digits(frac_str) {
            return Err(AmountError::Invalid);
        }

        let frac_str = frac_str.trim_end_matches('0');
        if frac_str.len() > DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimals);
        }

        let units_str = units_str.trim_start_matches('0');
        if units_str.len() + DECIMAL_PLACES > MAX_DIGITS {
            return Err(AmountError::TooManyDigits);
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| AmountError::Invalid)?
        };
        let cents: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10,
            _ => frac_str.parse().map_err(|_| AmountError::Invalid)?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::TooManyDigits)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}
