use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Trade Date"),
    Column::text("Value Date"),
    Column::text("Type"),
    Column::action("Event"),
    Column::text("Instrument"),
    Column::text("Instrument ISIN"),
    Column::text("Instrument Symbol"),
    Column::text("Instrument currency"),
    Column::decimal("Quantity"),
    Column::decimal("Price"),
    Column::decimal("Booked Amount"),
    Column::decimal("Commission"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("cash dividend", ActivityType::Dividend),
    ("dividend", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("custody fee", ActivityType::Fee),
    ("platform fee", ActivityType::Fee),
    ("fee rebate", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any("Type", &["cash transfer", "transfer"])
        || row.matches_any("Event", &["deposit", "withdrawal", "withholding tax"])
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Saxo,
    delimiter: b',',
    signatures: &["Trade Date,Value Date,Type,Event,Instrument,Instrument ISIN,Instrument Symbol,Instrument currency,Quantity,Price,Booked Amount,Commission"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[day]-[month]-[year]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Trade Date",
        action: "Event",
        isin: Some("Instrument ISIN"),
        ticker: Some("Instrument Symbol"),
        name: Some("Instrument"),
        quantity: Some("Quantity"),
        unit_price: Some("Price"),
        amount: Some("Booked Amount"),
        fee: Some("Commission"),
        currency: CurrencyField::Column("Instrument currency"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
