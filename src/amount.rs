//! Fixed-point token amounts.
//!
//! Everything below the display layer is expressed in minor units
//! (1 SUI = 1_000_000_000 MIST). Decimal strings are converted here, once.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DECIMALS: u32 = 9;
pub const MINOR_UNITS_PER_TOKEN: u64 = 1_000_000_000;
pub const TOKEN_SYMBOL: &str = "SUI";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Please enter a valid amount")]
    Invalid,
    #[error("Amount is too large")]
    Overflow,
}

/// Amount in the chain's smallest unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(pub u64);

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    pub fn new(minor: u64) -> Self { Self(minor) }

    pub fn from_whole(tokens: u64) -> Option<Self> {
        tokens.checked_mul(MINOR_UNITS_PER_TOKEN).map(Self)
    }

    pub fn get(self) -> u64 { self.0 }

    pub fn is_zero(self) -> bool { self.0 == 0 }

    pub fn checked_sub(self, other: MinorUnits) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a user-entered decimal token amount ("1.5") into minor units.
    ///
    /// Digits past the ninth decimal place are truncated. Zero, negative and
    /// non-numeric input are rejected.
    pub fn parse_decimal(input: &str) -> Result<Self, AmountError> {
        let s = input.trim();
        if s.is_empty() || s.starts_with('-') || s.starts_with('+') {
            return Err(AmountError::Invalid);
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::Invalid);
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Invalid);
        }

        let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| AmountError::Overflow)? };
        let mut frac_minor: u64 = 0;
        for (i, b) in frac.bytes().take(DECIMALS as usize).enumerate() {
            frac_minor += u64::from(b - b'0') * 10u64.pow(DECIMALS - 1 - i as u32);
        }

        let minor = whole
            .checked_mul(MINOR_UNITS_PER_TOKEN)
            .and_then(|w| w.checked_add(frac_minor))
            .ok_or(AmountError::Overflow)?;
        if minor == 0 {
            return Err(AmountError::Invalid);
        }
        Ok(Self(minor))
    }

    /// Two-decimal display string, e.g. `"1.50 SUI"`. Rounds half up.
    pub fn display(self) -> String {
        let cents = (u128::from(self.0) * 100 + u128::from(MINOR_UNITS_PER_TOKEN) / 2) / u128::from(MINOR_UNITS_PER_TOKEN);
        format!("{}.{:02} {}", cents / 100, cents % 100, TOKEN_SYMBOL)
    }
}

impl From<u64> for MinorUnits {
    fn from(value: u64) -> Self { Self(value) }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MINOR_UNITS_PER_TOKEN;
        let frac = self.0 % MINOR_UNITS_PER_TOKEN;
        write!(f, "{}.{:09}", whole, frac)
    }
}
