//! # Domain Models
//!
//! Canonical types shared by every stage of a conversion run.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CanonicalActivity`] | Normalized transaction record |
//! | [`ActivityType`] | BUY, SELL, DIVIDEND, INTEREST, FEE, REFUND |
//! | [`DataSource`] | EXTERNAL (looked up) or MANUAL |
//! | [`InstrumentQuery`] | ISIN / ticker / name tuple plus expected currency |
//! | [`SecurityReference`] | Resolved symbol and currency |
//!
//! Quantities, prices and fees are `rust_decimal::Decimal` and are kept
//! non-negative; the direction of a transaction is carried by its type.

mod activity;
mod instrument;

pub use activity::{ActivityType, CanonicalActivity, DataSource};
pub use instrument::{
    currency_alias, currency_matches, InstrumentQuery, LookupKey, SecurityReference,
};
