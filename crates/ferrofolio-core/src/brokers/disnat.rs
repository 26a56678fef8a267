use crate::domain::ActivityType;
use crate::schema::{
    Column, CurrencyField, DateFormat, DecimalStyle, FieldMap, PriceRule, SchemaMapping, TypedRow,
};
use crate::BrokerId;

const COLUMNS: &[Column] = &[
    Column::text("Date de transaction"),
    Column::text("Date de règlement"),
    Column::action("Type de transaction"),
    Column::text("Classe d'actif"),
    Column::text("Symbole"),
    Column::text("Description"),
    Column::text("Marché"),
    Column::decimal("Quantité"),
    Column::decimal("Prix"),
    Column::text("Devise du prix"),
    Column::decimal("Commission payée"),
    Column::decimal("Montant de l'opération"),
    Column::text("Devise du compte"),
];

const ACTIONS: &[(&str, ActivityType)] = &[
    ("achat", ActivityType::Buy),
    ("vente", ActivityType::Sell),
    ("dividende", ActivityType::Dividend),
    ("distribution", ActivityType::Dividend),
    ("intérêts", ActivityType::Interest),
    ("interet", ActivityType::Interest),
    ("frais", ActivityType::Fee),
    ("remboursement", ActivityType::Refund),
];

fn is_ignored(row: &TypedRow) -> bool {
    row.matches_any(
        "Type de transaction",
        &["dépôt", "depot", "retrait", "transfert", "conversion", "impôt"],
    )
}

pub static MAPPING: SchemaMapping = SchemaMapping {
    broker: BrokerId::Disnat,
    delimiter: b',',
    signatures: &["Date de transaction,Date de règlement,Type de transaction,Classe d'actif,Symbole,Description,Marché,Quantité,Prix,Devise du prix,Commission payée,Montant de l'opération,Devise du compte"],
    columns: COLUMNS,
    decimal: DecimalStyle::Point,
    date_format: DateFormat::Pattern {
        date: "[year]-[month]-[day]",
        time: None,
    },
    actions: ACTIONS,
    fields: FieldMap {
        date: "Date de transaction",
        action: "Type de transaction",
        ticker: Some("Symbole"),
        name: Some("Description"),
        quantity: Some("Quantité"),
        unit_price: Some("Prix"),
        amount: Some("Montant de l'opération"),
        fee: Some("Commission payée"),
        currency: CurrencyField::FirstOf(&["Devise du prix", "Devise du compte"]),
        ..FieldMap::NONE
    },
    derived: &[],
    price: PriceRule::Stated,
    is_ignored,
};
