use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Datum"),
    Column::text("Konto"),
    Column::action("Typ av transaktion"),
    Column::text("Värdepapper/beskrivning"),
    Column::decimal("Antal"),
    Column::decimal("Kurs"),
    Column::decimal("Belopp"),
    Column::decimal("Courtage"),
    Column::text("Valuta"),
    Column::text("ISIN"),
    Column::decimal("Resultat"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("köp", ActivityType::Buy),
    ("sälj", ActivityType::Sell),
    ("utdelning", ActivityType::Dividend),
    ("räntor", ActivityType::Interest),
    ("inlåningsränta", ActivityType::Interest),
    ("avgift", ActivityType::Fee),
    ("återbetalning", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Typ av transaktion",
        &[
            "insättning",
            "uttag",
            "valutaväxling",
            "överföring",
            "utländsk källskatt",
            "preliminärskatt",
        ],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Avanza,
    delimiter: b';',
    signatures: &["Datum;Konto;Typ av transaktion;Värdepapper/beskrivning;Antal;Kurs;Belopp;Courtage;Valuta;ISIN;Resultat"],
    columns: COLUMNS,
    decimal: DecimalStyle::Comma,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Datum",
        action: "Typ av transaktion",
        isin: Some("ISIN"),
        name: Some("Värdepapper/beskrivning"),
        quantity: Some("Antal"),
        unit_price: Some("Kurs"),
        amount: Some("Belopp"),
        fee: Some("Courtage"),
        currency: CurrencyField::Column("Valuta"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
