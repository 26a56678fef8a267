use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::action("Action"),
    Column::text("Symbol"),
    Column::text("Description"),
    Column::decimal("Quantity"),
    Column::decimal("Price"),
    Column::decimal("Fees & Comm"),
    Column::decimal("Amount"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("reinvest shares", ActivityType::Buy),
    ("reinvest dividend", ActivityType::Dividend),
    ("qual div reinvest", ActivityType::Dividend),
    ("qualified dividend", ActivityType::Dividend),
    ("non-qualified div", ActivityType::Dividend),
    ("cash dividend", ActivityType::Dividend),
    ("special dividend", ActivityType::Dividend),
    ("buy", ActivityType::Buy),
    ("sell", ActivityType::Sell),
    ("bank interest", ActivityType::Interest),
    ("credit interest", ActivityType::Interest),
    ("adr mgmt fee", ActivityType::Fee),
    ("service fee", ActivityType::Fee),
    ("fee reimbursement", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any("Date", &["transactions total"])
        || row.matches_any(
            "Action",
            &[
                "moneylink transfer",
                "moneylink deposit",
                "wire funds",
                "wire received",
                "journal",
                "journaled shares",
                "nra tax adj",
                "nra withholding",
                "foreign tax paid",
            ],
        )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Schwab,
    delimiter: b',',
    signatures: &["Date,Action,Symbol,Description,Quantity,Price,Fees & Comm,Amount"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[month]/[day]/[year]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        action: "Action",
        ticker: Some("Symbol"),
        name: Some("Description"),
        quantity: Some("Quantity"),
        unit_price: Some("Price"),
        amount: Some("Amount"),
        fee: Some("Fees & Comm"),
        currency: CurrencyField::Fixed("USD"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
