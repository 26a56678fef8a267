use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Transaction ID"),
    Column::text("Timezone"),
    Column::text("Date"),
    Column::text("Time"),
    Column::action("Type"),
    Column::text("Currency"),
    Column::decimal("Amount"),
    Column::text("Quote Currency"),
    Column::decimal("Quote Price"),
    Column::text("Received / Paid Currency"),
    Column::decimal("Received / Paid Amount"),
    Column::text("Fee currency"),
    Column::decimal("Fee amount"),
    Column::text("Status"),
    Column::text("Address"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("staking", ActivityType::Interest),
    ("rebate", ActivityType::Refund),
    ("affiliate", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any("Type", &["deposit", "withdrawal"])
        || !row.matches_any("Status", &["completed", "distributed"])
}

/// Euro-only exchange; the base asset code doubles as the ticker.
pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Bitvavo,
    delimiter: b',',
    signatures: &["Transaction ID,Timezone,Date,Time,Type,Currency,Amount,Quote Currency,Quote Price,Received / Paid Currency,Received / Paid Amount,Fee currency,Fee amount,Status,Address"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day]",
        time: Some("[hour]:[minute]:[second]"),
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        time: Some("Time"),
        action: "Type",
        ticker: Some("Currency"),
        quantity: Some("Amount"),
        unit_price: Some("Quote Price"),
        amount: Some("Received / Paid Amount"),
        fee: Some("Fee amount"),
        currency: CurrencyField::Fixed("EUR"),
        comment: Some("Transaction ID"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
