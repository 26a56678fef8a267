use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Transaction Time (CET)"),
    Column::text("Transaction Category"),
    Column::action("Transaction Type"),
    Column::text("Asset Id"),
    Column::text("Asset Name"),
    Column::text("Asset Currency"),
    Column::text("Transaction Currency"),
    Column::text("Currency Pair"),
    Column::decimal("Exchange Rate"),
    Column::decimal("Transaction Amount"),
    Column::decimal("Trade Amount"),
    Column::decimal("Trade Price"),
    Column::decimal("Trade Quantity"),
    Column::decimal("Cash Balance Amount"),
    Column::decimal("Profit And Loss Amount"),
    Column::text("Profit And Loss Currency"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("buy trade", ActivityType::Buy),
    ("sell trade", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("interest", ActivityType::Interest),
    ("connectivity fee", ActivityType::Fee),
    ("fee refund", ActivityType::Refund),
    ("fee", ActivityType::Fee),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Transaction Category",
        &["deposits", "withdrawals", "transfers"],
    ) || row.matches_any("Transaction Type", &["dividend tax", "reward"])
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Bux,
    delimiter: b',',
    signatures: &["Transaction Time (CET),Transaction Category,Transaction Type,Asset Id,Asset Name,Asset Currency,Transaction Currency,Currency Pair,Exchange Rate,Transaction Amount,Trade Amount,Trade Price,Trade Quantity,Cash Balance Amount,Profit And Loss Amount,Profit And Loss Currency"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day] [hour]:[minute]:[second]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Transaction Time (CET)",
        action: "Transaction Type",
        isin: Some("Asset Id"),
        name: Some("Asset Name"),
        quantity: Some("Trade Quantity"),
        unit_price: Some("Trade Price"),
        amount: Some("Transaction Amount"),
        currency: CurrencyField::FirstOf(&["Asset Currency", "Transaction Currency"]),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
