use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Datum"),
    Column::action("Type mutatie"),
    Column::text("Omschrijving"),
    Column::text("Fonds"),
    Column::text("ISIN"),
    Column::decimal("Aantal"),
    Column::decimal("Koers"),
    Column::text("Valuta koers"),
    Column::decimal("Bedrag"),
    Column::text("Valuta"),
    Column::decimal("Kosten"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("koop", ActivityType::Buy),
    ("herbelegging", ActivityType::Buy),
    ("verkoop", ActivityType::Sell),
    ("dividend", ActivityType::Dividend),
    ("rente", ActivityType::Interest),
    ("kosten", ActivityType::Fee),
    ("servicefee", ActivityType::Fee),
    ("restitutie", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Type mutatie",
        &["storting", "opname", "overboeking", "dividendbelasting"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Rabobank,
    delimiter: b';',
    signatures: &["Datum;Type mutatie;Omschrijving;Fonds;ISIN;Aantal;Koers;Valuta koers;Bedrag;Valuta;Kosten"],
    columns: COLUMNS,
    decimal: DecimalStyle::Comma,
    date_format: DateFormat::Pattern {
        date: "[day]-[month]-[year]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Datum",
        action: "Type mutatie",
        isin: Some("ISIN"),
        name: Some("Fonds"),
        quantity: Some("Aantal"),
        unit_price: Some("Koers"),
        amount: Some("Bedrag"),
        fee: Some("Kosten"),
        currency: CurrencyField::FirstOf(&["Valuta koers", "Valuta"]),
        comment: Some("Omschrijving"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
