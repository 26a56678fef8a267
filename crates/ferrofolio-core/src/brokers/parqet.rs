use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("datetime"),
    Column::text("date"),
    Column::text("time"),
    Column::decimal("price"),
    Column::decimal("shares"),
    Column::decimal("amount"),
    Column::decimal("tax"),
    Column::decimal("fee"),
    Column::decimal("realizedgains"),
    Column::action("type"),
    Column::text("broker"),
    Column::text("assettype"),
    Column::text("identifier"),
    Column::text("currency"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("cost", ActivityType::Fee),
    ("refund", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "type",
        &["transferin", "transferout", "deposit", "withdrawal", "split"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Parqet,
    delimiter: b';',
    signatures: &["datetime;date;time;price;shares;amount;tax;fee;realizedgains;type;broker;assettype;identifier;currency"],
    columns: COLUMNS,
    decimal: DecimalStyle::Comma,
    date_format: DateFormat::Pattern {
        date: "[day].[month].[year]",
        time: Some("[hour]:[minute]:[second]"),
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "date",
        time: Some("time"),
        action: "type",
        isin: Some("identifier"),
        quantity: Some("shares"),
        unit_price: Some("price"),
        amount: Some("amount"),
        fee: Some("fee"),
        currency: CurrencyField::Column("currency"),
        comment: Some("broker"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
