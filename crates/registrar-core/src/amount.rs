//! Fixed-point coin amounts
//!
//! Prices, balances and totals are carried as integer base units
//! (1 PHP = 100,000,000 units). The registry speaks both decimal strings and
//! JSON numbers; amounts always serialize back as decimal strings.

use crate::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fraction digits carried by an amount
pub const DECIMALS: u32 = 8;

/// Base units per whole coin
pub const COIN: u64 = 100_000_000;

/// Minimum fraction digits when rendering
const MIN_DISPLAY_DECIMALS: usize = 2;

/// Non-negative coin amount in base units
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    /// Zero
    pub const ZERO: Amount = Amount(0);

    /// From raw base units
    pub const fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    /// Raw base units
    pub const fn base_units(&self) -> u64 {
        self.0
    }

    /// Whole coins only
    pub const fn from_coins(coins: u64) -> Self {
        Self(coins * COIN)
    }

    /// Whether the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal string such as `"2.50"` or `"10"`
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidAmount("empty amount".to_string()));
        }

        let (whole, fraction) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAmount(format!("not a decimal amount: {}", text)));
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAmount(format!("not a decimal amount: {}", text)));
        }
        if fraction.len() > DECIMALS as usize {
            return Err(Error::InvalidAmount(format!(
                "{} has more than {} decimal places",
                text, DECIMALS
            )));
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| Error::AmountOverflow(text.to_string()))?;
        let mut fraction_units: u64 = 0;
        if !fraction.is_empty() {
            let padded = format!("{:0<width$}", fraction, width = DECIMALS as usize);
            fraction_units = padded
                .parse()
                .map_err(|_| Error::InvalidAmount(text.to_string()))?;
        }

        whole
            .checked_mul(COIN)
            .and_then(|units| units.checked_add(fraction_units))
            .map(Amount)
            .ok_or_else(|| Error::AmountOverflow(text.to_string()))
    }

    /// Convert from a JSON floating point number, rounding to base units
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidAmount(format!("{} is not a valid amount", value)));
        }
        Self::parse(&format!("{:.*}", DECIMALS as usize, value))
    }

    /// Checked addition
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Saturating addition
    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Percentage of this amount, rounded down to the base unit
    pub fn percent(self, percent: u64) -> Amount {
        Amount(((self.0 as u128 * percent as u128) / 100) as u64)
    }

    /// Sum a sequence, failing on overflow
    pub fn sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Result<Amount> {
        amounts.into_iter().try_fold(Amount::ZERO, |acc, a| {
            acc.checked_add(a)
                .ok_or_else(|| Error::AmountOverflow("sum exceeds u64".to_string()))
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / COIN;
        let fraction = format!("{:0width$}", self.0 % COIN, width = DECIMALS as usize);
        let trimmed = fraction.trim_end_matches('0');
        if trimmed.len() >= MIN_DISPLAY_DECIMALS {
            write!(f, "{}.{}", whole, trimmed)
        } else {
            write!(f, "{}.{}", whole, &fraction[..MIN_DISPLAY_DECIMALS])
        }
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal amount as a string or number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
        v.checked_mul(COIN)
            .map(Amount)
            .ok_or_else(|| E::custom(format!("amount {} overflows", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
        if v < 0 {
            return Err(E::custom(format!("negative amount {}", v)));
        }
        self.visit_u64(v as u64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
        Amount::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        Amount::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
