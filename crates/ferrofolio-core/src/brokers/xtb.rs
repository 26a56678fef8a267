use crate::domain::ActivityType;
use crate::schema::{
    Column, ColumnKind, CurrencyField, DateFormat, DecimalStyle, Derived, FieldMap, PriceRule,
    SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("ID"),
    Column::action("Type"),
    Column::text("Time"),
    Column::text("Comment"),
    Column::text("Symbol"),
    Column::decimal("Amount"),
];

// Comment reads "OPEN BUY 5 @ 123.45" or "CLOSE BUY 2/5 @ 130.00".
const DERIVED: &[Derived] = &[
    Derived {
        name: "Quantity",
        source: "Comment",
        pattern: r"(?i)(?:buy|sell)\s+(?P<value>[\d.]+)(?:/[\d.]+)?\s+@",
        kind: ColumnKind::Decimal,
    },
    Derived {
        name: "Price",
        source: "Comment",
        pattern: r"@\s*(?P<value>[\d.]+)",
        kind: ColumnKind::Decimal,
    },
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("stocks/etf purchase", ActivityType::Buy),
    ("stock purchase", ActivityType::Buy),
    ("stocks/etf sale", ActivityType::Sell),
    ("stock sale", ActivityType::Sell),
    ("divident", ActivityType::Dividend),
    ("dividend", ActivityType::Dividend),
    ("free-funds interest", ActivityType::Interest),
    ("sec fee", ActivityType::Fee),
    ("commission", ActivityType::Fee),
    ("fee refund", ActivityType::Refund),
];

/// Cash movements, tax rows and the unnumbered totals footer.
fn is_ignored(row: &TypedRow) -> bool {
    row.is_blank("ID")
        || row.matches_any(
            "Type",
            &[
                "deposit",
                "withdrawal",
                "ike deposit",
                "transfer",
                "withholding tax",
                "free-funds interest tax",
            ],
        )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Xtb,
    delimiter: b';',
    signatures: &["ID;Type;Time;Comment;Symbol;Amount"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[day].[month].[year] [hour]:[minute]:[second]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Time",
        action: "Type",
        ticker: Some("Symbol"),
        quantity: Some("Quantity"),
        unit_price: Some("Price"),
        amount: Some("Amount"),
        currency: CurrencyField::Fixed("EUR"),
        comment: Some("ID"),
        ..FieldMap::NONE
    },
    derived: DERIVED,
    price: PriceRule::Stated,
    is_ignored,
};
