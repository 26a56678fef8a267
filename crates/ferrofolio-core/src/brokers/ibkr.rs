use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::action("Buy/Sell"),
    Column::text("TradeDate"),
    Column::text("ISIN"),
    Column::text("Symbol"),
    Column::text("Description"),
    Column::decimal("Quantity"),
    Column::decimal("TradePrice"),
    Column::decimal("IBCommission"),
    Column::text("CurrencyPrimary"),
    Column::decimal("NetCash"),
    Column::text("Notes/Codes"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("dividends", ActivityType::Dividend),
    ("payment in lieu of dividends", ActivityType::Dividend),
    ("broker interest received", ActivityType::Interest),
    ("bond interest received", ActivityType::Interest),
    ("other fees", ActivityType::Fee),
    ("commission adjustments", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Buy/Sell",
        &["deposits/withdrawals", "withholding tax", "broker interest paid"],
    )
}

/// Flex query export; every header cell is quoted.
pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Ibkr,
    delimiter: b',',
    signatures: &["Buy/Sell,TradeDate,ISIN,Symbol,Description,Quantity,TradePrice,IBCommission,CurrencyPrimary,NetCash,Notes/Codes"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[year][month][day]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "TradeDate",
        action: "Buy/Sell",
        isin: Some("ISIN"),
        ticker: Some("Symbol"),
        name: Some("Description"),
        quantity: Some("Quantity"),
        unit_price: Some("TradePrice"),
        amount: Some("NetCash"),
        fee: Some("IBCommission"),
        currency: CurrencyField::Column("CurrencyPrimary"),
        comment: Some("Notes/Codes"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
