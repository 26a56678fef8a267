use crate::domain::ActivityType;
use crate::schema::{
    Column, ColumnKind, CurrencyField, DateFormat, DecimalStyle, Derived, FieldMap, PriceRule,
    SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date"),
    Column::action("Type"),
    Column::text("Details"),
    Column::decimal("Amount"),
    Column::decimal("Units"),
    Column::decimal("Realized Equity Change"),
    Column::decimal("Realized Equity"),
    Column::decimal("Balance"),
    Column::text("Position ID"),
    Column::text("Asset type"),
    Column::decimal("NWA"),
];

// Details reads "AAPL/USD".
const DERIVED: &[Derived] = &[
    Derived {
        name: "Ticker",
        source: "Details",
        pattern: r"^(?P<value>[A-Za-z0-9.\-]+)/[A-Za-z]{3}$",
        kind: ColumnKind::Text,
    },
    Derived {
        name: "Currency",
        source: "Details",
        pattern: r"/(?P<value>[A-Za-z]{3})$",
        kind: ColumnKind::Text,
    },
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("open position", ActivityType::Buy),
    ("position closed", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("interest payment", ActivityType::Interest),
    ("overnight fee", ActivityType::Fee),
    ("sdrt", ActivityType::Fee),
    ("refund", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Type",
        &["deposit", "withdraw request", "withdraw fee cancelled", "adjustment"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Etoro,
    delimiter: b',',
    signatures: &["Date,Type,Details,Amount,Units,Realized Equity Change,Realized Equity,Balance,Position ID,Asset type,NWA"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[day]/[month]/[year] [hour]:[minute]:[second]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date",
        action: "Type",
        ticker: Some("Ticker"),
        quantity: Some("Units"),
        amount: Some("Amount"),
        currency: CurrencyField::Column("Currency"),
        comment: Some("Position ID"),
        ..FieldMap::NONE
    },
    derived: DERIVED,
    price: PriceRule::PerUnit { scale: 6 },
    is_ignored,
};
