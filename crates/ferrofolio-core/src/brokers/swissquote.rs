use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::text("Order #"),
    Column::action("Transaction"),
    Column::text("Symbol"),
    Column::text("Name"),
    Column::text("ISIN"),
    Column::decimal("Quantity"),
    Column::decimal("Unit price"),
    Column::decimal("Costs"),
    Column::decimal("Accrued Interest"),
    Column::decimal("Net Amount"),
    Column::decimal("Balance"),
    Column::text("Currency"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("capital gain", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("custody fees", ActivityType::Fee),
    ("fees refund", ActivityType::Refund),
    ("fees", ActivityType::Fee),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Transaction",
        &[
            "payment",
            "cash transfer",
            "forex credit",
            "forex debit",
            "withholding tax",
            "credit",
            "debit",
        ],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Swissquote,
    delimiter: b';',
    signatures: &["Date;Order #;Transaction;Symbol;Name;ISIN;Quantity;Unit price;Costs;Accrued Interest;Net Amount;Balance;Currency"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[day]-[month]-[year] [hour]:[minute]:[second]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        action: "Transaction",
        isin: Some("ISIN"),
        ticker: Some("Symbol"),
        name: Some("Name"),
        quantity: Some("Quantity"),
        unit_price: Some("Unit price"),
        amount: Some("Net Amount"),
        fee: Some("Costs"),
        currency: CurrencyField::Column("Currency"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
