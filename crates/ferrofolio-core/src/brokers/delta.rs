use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::action("Way"),
    Column::text("Base type"),
    Column::decimal("Base amount"),
    Column::text("Base currency (name)"),
    Column::text("Base currency (type)"),
    Column::decimal("Quote amount"),
    Column::text("Quote currency"),
    Column::text("Exchange"),
    Column::text("Sent/Received from"),
    Column::text("Sent to"),
    Column::decimal("Fee amount"),
    Column::text("Fee currency (name)"),
    Column::text("Broker"),
    Column::text("Notes"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("income", ActivityType::Interest),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any("Way", &["deposit", "withdraw", "transfer"])
}

/// Delta only reports totals, so the unit price is derived from them.
pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Delta,
    delimiter: b',',
    signatures: &["Date,Way,Base type,Base amount,Base currency (name),Base currency (type),Quote amount,Quote currency,Exchange,Sent/Received from,Sent to,Fee amount,Fee currency (name),Broker,Notes"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Rfc3339,
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        action: "Way",
        ticker: Some("Base currency (name)"),
        quantity: Some("Base amount"),
        amount: Some("Quote amount"),
        fee: Some("Fee amount"),
        currency: CurrencyField::Column("Quote currency"),
        comment: Some("Notes"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::PerUnit { scale: 6 },
    is_ignored,
};
