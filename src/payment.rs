//! Payment records produced by the CSV ingestor.
//!
//! Defines [`RiseId`], the opaque recipient address, and [`Payment`], a single
//! outgoing transfer. Payments are immutable once built.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::UsdcAmount;

/// Recipient identifier: a `0x`-prefixed 40-hex-digit address, case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiseId(String);

impl RiseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RiseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One outgoing transfer.
///
/// The salt is drawn once at construction and makes otherwise identical
/// payments distinct on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    recipient: RiseId,
    amount: UsdcAmount,
    salt: u32,
}

impl Payment {
    pub fn new(recipient: RiseId, amount: UsdcAmount) -> Self {
        Self::with_salt(recipient, amount, rand::random())
    }

    /// Build a payment with a fixed salt.
    pub fn with_salt(recipient: RiseId, amount: UsdcAmount, salt: u32) -> Self {
        Self {
            recipient,
            amount,
            salt,
        }
    }

    pub fn recipient(&self) -> &RiseId {
        &self.recipient
    }

    pub fn amount(&self) -> UsdcAmount {
        self.amount
    }

    pub fn salt(&self) -> u32 {
        self.salt
    }
}
