//! Degiro account statements.
//!
//! The legacy export has Dutch headers; v3 renamed them to English and
//! writes descriptions in the account language. Both share the column
//! layout, including the two unnamed amount columns after `Mutatie`/`Change`
//! and `Saldo`/`Balance`. Trades only state quantity and price inside the
//! description (`Koop 10 @ 45,12 EUR`), so both are derived.

use crate::domain::ActivityType;
use crate::schema::{
    Column, ColumnKind, CurrencyField, DateFormat, DecimalStyle, Derived, FieldMap, PriceRule,
    SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::text("Time"),
    Column::text("Value date"),
    Column::text("Product"),
    Column::text("ISIN"),
    Column::action("Description"),
    Column::decimal("FX"),
    Column::text("Change currency"),
    Column::decimal("Change"),
    Column::text("Balance currency"),
    Column::decimal("Balance"),
    Column::text("Order Id"),
];

const DERIVED: &[Derived] = &[
    Derived {
        name: "Quantity",
        source: "Description",
        pattern: r"(?i)^(?:koop|verkoop|buy|sell)\s+(?P<value>[\d.]+)\s+@",
        kind: ColumnKind::Decimal,
    },
    Derived {
        name: "Price",
        source: "Description",
        pattern: r"@\s*(?P<value>[\d.,]+)",
        kind: ColumnKind::Decimal,
    },
];

const FIELDS: FieldMap = FieldMap {
    date: "Date",
    time: Some("Time"),
    action: "Description",
    isin: Some("ISIN"),
    name: Some("Product"),
    quantity: Some("Quantity"),
    unit_price: Some("Price"),
    amount: Some("Change"),
    currency: CurrencyField::Column("Change currency"),
    ..FieldMap::NONE
};

const DATE_FORMAT: DateFormat = DateFormat::Pattern {
    date: "[day]-[month]-[year]",
    time: Some("[hour]:[minute]"),
};

const LEGACY_ACTIONS: &[(&str, ActivityType)] = &[
    ("koop", ActivityType::Buy),
    ("verkoop", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("kapitaalsuitkering", ActivityType::Dividend),
    ("rente", ActivityType::Interest),
    ("degiro transactiekosten", ActivityType::Fee),
    ("degiro aansluitingskosten", ActivityType::Fee),
    ("restitutie", ActivityType::Refund),
];

const V3_ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("koop", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("verkoop", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("capital return", ActivityType::Dividend),
    ("kapitaalsuitkering", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("flatex interest", ActivityType::Interest),
    ("rente", ActivityType::Interest),
    ("degiro transaction and/or third party fees", ActivityType::Fee),
    ("degiro exchange connection fee", ActivityType::Fee),
    ("degiro transactiekosten", ActivityType::Fee),
    ("degiro aansluitingskosten", ActivityType::Fee),
    ("fee rebate", ActivityType::Refund),
    ("restitutie", ActivityType::Refund),
];

const ADMINISTRATIVE: &[&str] = &[
    "ideal deposit",
    "ideal storting",
    "storting",
    "terugstorting",
    "valuta debitering",
    "valuta creditering",
    "dividendbelasting",
    "overboeking",
    "deposit",
    "withdrawal",
    "currency debit",
    "currency credit",
    "dividend tax",
    "cash sweep transfer",
    "flatex deposit",
    "flatex withdrawal",
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any("Description", ADMINISTRATIVE)
}

pub static LEGACY: SchemaMapping = SchemaMapping {
    broker: BrokerId::Degiro,
    delimiter: b',',
    signatures: &["Datum,Tijd,Valutadatum,Product,ISIN,Omschrijving,FX,Mutatie,,Saldo,,Order Id"],
    columns: COLUMNS,
    decimal: DecimalStyle::Comma,
    date_format: DATE_FORMAT,
    actions: LEGACY_ACTIONS,
    fields: FIELDS,
    derived: DERIVED,
    price: PriceRule::Stated,
    is_ignored,
};

pub static V3: SchemaMapping = SchemaMapping {
    broker: BrokerId::DegiroV3,
    delimiter: b',',
    signatures: &["Date,Time,Value date,Product,ISIN,Description,FX,Change,,Balance,,Order Id"],
    columns: COLUMNS,
    decimal: DecimalStyle::Comma,
    date_format: DATE_FORMAT,
    actions: V3_ACTIONS,
    fields: FIELDS,
    derived: DERIVED,
    price: PriceRule::Stated,
    is_ignored,
};
