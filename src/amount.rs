//! Fixed-point stable-coin amounts.
//!
//! Amounts travel as integer counts of the smallest USDC unit (6 decimals),
//! so `1.5` dollars is stored as `1_500_000`. Parsing works on the decimal
//! string directly to avoid floating-point truncation surprises.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IngestError;

/// Number of decimals of the payout token.
pub const USDC_DECIMALS: u32 = 6;

const UNIT: u64 = 10u64.pow(USDC_DECIMALS);

/// Amount in the smallest USDC unit ("wei").
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UsdcAmount(pub u64);

impl UsdcAmount {
    pub fn new(wei: u64) -> Self {
        Self(wei)
    }

    pub fn wei(self) -> u64 {
        self.0
    }

    /// Parse a dollar amount such as `"2.50"` into smallest units.
    ///
    /// Digits past the sixth decimal are truncated. Signs other than a
    /// leading `+`, exponents and empty strings are rejected.
    pub fn parse_usd(text: &str) -> Result<Self, IngestError> {
        let invalid = || IngestError::InvalidAmount(text.to_string());

        let trimmed = text.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut frac_wei = 0u64;
        let mut scale = UNIT;
        for digit in frac.bytes().take(USDC_DECIMALS as usize) {
            scale /= 10;
            frac_wei += u64::from(digit - b'0') * scale;
        }

        whole
            .checked_mul(UNIT)
            .and_then(|w| w.checked_add(frac_wei))
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Sum of `amounts`, or `None` if it does not fit in a `u64`.
    pub fn checked_total<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::default(), Self::checked_add)
    }

    /// Value in dollars, for display only.
    pub fn usd(self) -> f64 {
        self.0 as f64 / UNIT as f64
    }

    /// Wire representation used by the batch-pay endpoint.
    pub fn to_decimal_string(self) -> String {
        self.0.to_string()
    }
}

/// Renders dollars with thousands separators and two decimals, e.g. `1,234.50`.
impl fmt::Display for UsdcAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Round half up to cents; widened so u64::MAX cannot overflow.
        let unit = u128::from(UNIT);
        let cents = (u128::from(self.0) + unit / 200) / (unit / 100);
        let whole = (cents / 100).to_string();
        let frac = cents % 100;

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}.{:02}", grouped, frac)
    }
}
