use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("date"),
    Column::text("time"),
    Column::text("status"),
    Column::text("reference"),
    Column::text("description"),
    Column::text("assetType"),
    Column::action("type"),
    Column::text("isin"),
    Column::decimal("shares"),
    Column::decimal("price"),
    Column::decimal("amount"),
    Column::decimal("fee"),
    Column::decimal("tax"),
    Column::text("currency"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("savings plan", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("distribution", ActivityType::Dividend),
    ("dividend", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("fee", ActivityType::Fee),
    ("refund", ActivityType::Refund),
];

/// Only executed bookings count; cancelled and pending orders stay in the export.
fn is_ignored(row: &TypedRow) -> bool {
    !row.matches_any("status", &["executed"])
        || row.matches_any(
            "type",
            &["deposit", "withdrawal", "security transfer", "corporate action"],
        )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Scalable,
    delimiter: b';',
    signatures: &["date;time;status;reference;description;assetType;type;isin;shares;price;amount;fee;tax;currency"],
    columns: COLUMNS,
    decimal: DecimalStyle::Comma,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day]",
        time: Some("[hour]:[minute]:[second]"),
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "date",
        time: Some("time"),
        action: "type",
        isin: Some("isin"),
        name: Some("description"),
        quantity: Some("shares"),
        unit_price: Some("price"),
        amount: Some("amount"),
        fee: Some("fee"),
        currency: CurrencyField::Column("currency"),
        comment: Some("reference"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
