use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::action("Category"),
    Column::text("Asset Name"),
    Column::text("ISIN"),
    Column::decimal("Number of Shares"),
    Column::text("Asset Currency"),
    Column::decimal("Currency Rate"),
    Column::decimal("Asset Price in CHF"),
    Column::decimal("Cash Flow"),
    Column::decimal("Balance"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("flat-rate administrative fee", ActivityType::Fee),
    ("fee refund", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any("Category", &["deposit", "withdrawal", "transfer", "tax refund"])
}

/// Pillar 3a accounts settle everything in CHF.
pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Finpension,
    delimiter: b';',
    signatures: &["Date;Category;Asset Name;ISIN;Number of Shares;Asset Currency;Currency Rate;Asset Price in CHF;Cash Flow;Balance"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        action: "Category",
        isin: Some("ISIN"),
        name: Some("Asset Name"),
        quantity: Some("Number of Shares"),
        unit_price: Some("Asset Price in CHF"),
        amount: Some("Cash Flow"),
        currency: CurrencyField::Fixed("CHF"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
