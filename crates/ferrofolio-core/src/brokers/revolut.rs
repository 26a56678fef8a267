use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::text("Ticker"),
    Column::action("Type"),
    Column::decimal("Quantity"),
    Column::decimal("Price per share"),
    Column::decimal("Total Amount"),
    Column::text("Currency"),
    Column::decimal("FX Rate"),
];

// "BUY - MARKET", "SELL - LIMIT", "DIVIDEND"
const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("custody fee", ActivityType::Fee),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Type",
        &["cash top-up", "cash withdrawal", "transfer from", "stock split"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Revolut,
    delimiter: b',',
    signatures: &["Date,Ticker,Type,Quantity,Price per share,Total Amount,Currency,FX Rate"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Rfc3339,
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        action: "Type",
        ticker: Some("Ticker"),
        quantity: Some("Quantity"),
        unit_price: Some("Price per share"),
        amount: Some("Total Amount"),
        currency: CurrencyField::Column("Currency"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
