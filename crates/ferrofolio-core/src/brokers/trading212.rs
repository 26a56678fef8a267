use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, DividendRule, FieldMap, PriceRule,
    SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::action("Action"),
    Column::text("Time"),
    Column::text("ISIN"),
    Column::text("Ticker"),
    Column::text("Name"),
    Column::decimal("No. of shares"),
    Column::decimal("Price / share"),
    Column::text("Currency (Price / share)"),
    Column::decimal("Exchange rate"),
    Column::decimal("Result"),
    Column::text("Currency (Result)"),
    Column::decimal("Total"),
    Column::text("Currency (Total)"),
    Column::decimal("Withholding tax"),
    Column::text("Currency (Withholding tax)"),
    Column::text("Notes"),
    Column::text("ID"),
    Column::decimal("Currency conversion fee"),
    Column::text("Currency (Currency conversion fee)"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("market buy", ActivityType::Buy),
    ("limit buy", ActivityType::Buy),
    ("stop buy", ActivityType::Buy),
    ("market sell", ActivityType::Sell),
    ("limit sell", ActivityType::Sell),
    ("stop sell", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("interest on cash", ActivityType::Interest),
    ("lending interest", ActivityType::Interest),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Action",
        &["deposit", "withdrawal", "currency conversion", "card debit"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Trading212,
    delimiter: b',',
    signatures: &["Action,Time,ISIN,Ticker,Name,No. of shares,Price / share,Currency (Price / share),Exchange rate,Result,Currency (Result),Total,Currency (Total),Withholding tax,Currency (Withholding tax),Notes,ID,Currency conversion fee,Currency (Currency conversion fee)"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day] [hour]:[minute]:[second]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Time",
        action: "Action",
        isin: Some("ISIN"),
        ticker: Some("Ticker"),
        name: Some("Name"),
        quantity: Some("No. of shares"),
        unit_price: Some("Price / share"),
        amount: Some("Total"),
        fee: Some("Currency conversion fee"),
        fee_currency: Some("Currency (Currency conversion fee)"),
        // Interest rows have no price currency.
        currency: CurrencyField::FirstOf(&["Currency (Price / share)", "Currency (Total)"]),
        comment: Some("Notes"),
        // Total is in the account currency, not the listing currency.
        dividend: DividendRule::PriceTimesQuantity,
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
