use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Canonical activity kind. Direction of a trade lives here, never in a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Buy,
    Sell,
    Dividend,
    Interest,
    Fee,
    Refund,
}

impl ActivityType {
    pub const ALL: [Self; 6] = [
        Self::Buy,
        Self::Sell,
        Self::Dividend,
        Self::Interest,
        Self::Fee,
        Self::Refund,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Dividend => "DIVIDEND",
            Self::Interest => "INTEREST",
            Self::Fee => "FEE",
            Self::Refund => "REFUND",
        }
    }

    /// Cash-only activities carry no instrument and skip resolution.
    pub const fn needs_instrument(self) -> bool {
        matches!(self, Self::Buy | Self::Sell | Self::Dividend)
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the symbol of an activity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Confirmed by the reference-data lookup.
    External,
    /// Entered by hand; no market data behind it.
    Manual,
}

/// One normalized transaction, independent of the broker that produced it.
///
/// Field order is fixed to keep the JSON output stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalActivity {
    pub account_id: String,
    pub comment: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub currency: String,
    pub data_source: DataSource,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CanonicalActivity {
    /// Checks the record-level invariants every emitted activity must hold.
    pub fn is_well_formed(&self) -> bool {
        let symbol_ok = !self.activity_type.needs_instrument() || !self.symbol.trim().is_empty();
        symbol_ok
            && !self.fee.is_sign_negative()
            && !self.quantity.is_sign_negative()
            && !self.unit_price.is_sign_negative()
    }
}
