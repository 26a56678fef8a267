use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Data operazione"),
    Column::text("Data valuta"),
    Column::action("Tipo operazione"),
    Column::text("Ticker"),
    Column::text("Isin"),
    Column::text("Protocollo"),
    Column::text("Descrizione"),
    Column::decimal("Quantità"),
    Column::decimal("Importo euro"),
    Column::decimal("Importo Divisa"),
    Column::text("Divisa"),
    Column::text("Riferimento ordine"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("acquisto", ActivityType::Buy),
    ("vendita", ActivityType::Sell),
    ("dividendi", ActivityType::Dividend),
    ("provento etf", ActivityType::Dividend),
    ("interessi", ActivityType::Interest),
    ("commissioni", ActivityType::Fee),
    ("rimborso", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Tipo operazione",
        &["bonifico", "prelievo", "conferimento", "ritenuta", "storno"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Directa,
    delimiter: b',',
    signatures: &["Data operazione,Data valuta,Tipo operazione,Ticker,Isin,Protocollo,Descrizione,Quantità,Importo euro,Importo Divisa,Divisa,Riferimento ordine"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[day]-[month]-[year]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Data operazione",
        action: "Tipo operazione",
        isin: Some("Isin"),
        ticker: Some("Ticker"),
        name: Some("Descrizione"),
        quantity: Some("Quantità"),
        amount: Some("Importo euro"),
        currency: CurrencyField::Fixed("EUR"),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::PerUnit { scale: 6 },
    is_ignored,
};
