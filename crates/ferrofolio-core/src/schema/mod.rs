//! Data-described broker schemas and the shared parse/cast contract.
//!
//! A [`SchemaMapping`] is a plain value: delimiter, header signatures,
//! ordered columns with their cast kinds, locale, date format, action keyword
//! table, field map, and an ignore predicate. Every broker is one such value;
//! the row state machine in [`crate::mapper`] is shared by all of them.

mod cast;
mod parse;

pub use cast::{keyword_matches, normalize_action, parse_decimal, NotANumber, TimestampFormat};
pub use parse::{cast_rows, parse, read_rows};

use rust_decimal::Decimal;

use crate::brokers::BrokerId;
use crate::domain::ActivityType;

/// Decimal notation used by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// `1,234.56`
    Point,
    /// `1.234,56`
    Comma,
}

/// How the activity timestamp is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Full RFC 3339 timestamp in the date column.
    Rfc3339,
    /// `time` format-description patterns for the date column and an
    /// optional separate time column. Parsed values are taken as UTC.
    Pattern {
        date: &'static str,
        time: Option<&'static str>,
    },
}

/// Cast applied to a column's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Decimal,
    Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }

    pub const fn decimal(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Decimal,
        }
    }

    pub const fn action(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Action,
        }
    }
}

/// Extra cell extracted from another column with a regex.
///
/// The pattern must define a named group `value`; rows where it does not
/// match get an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    pub name: &'static str,
    pub source: &'static str,
    pub pattern: &'static str,
    pub kind: ColumnKind,
}

/// Currency of a row: read from a column or fixed for the whole export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyField {
    Column(&'static str),
    /// First non-blank of several columns, e.g. price currency then cash currency.
    FirstOf(&'static [&'static str]),
    Fixed(&'static str),
}

impl CurrencyField {
    pub fn resolve<'a>(&self, row: &'a TypedRow) -> Option<&'a str> {
        match self {
            Self::Column(column) => row.text(column),
            Self::FirstOf(columns) => columns.iter().find_map(|column| row.text(column)),
            Self::Fixed(currency) => Some(*currency).filter(|value| !value.is_empty()),
        }
    }
}

/// How the per-unit price of a trade is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRule {
    /// The export states the price per share.
    Stated,
    /// `|amount| / quantity`, rounded to `scale` decimal places.
    PerUnit { scale: u32 },
}

/// Where the gross value of a dividend row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividendRule {
    /// The amount column, or price times quantity when it is blank.
    Amount,
    /// `|price| * |quantity|`, for exports whose amount is in the account currency.
    PriceTimesQuantity,
}

/// Which column feeds each canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    pub date: &'static str,
    pub time: Option<&'static str>,
    pub action: &'static str,
    pub isin: Option<&'static str>,
    pub ticker: Option<&'static str>,
    pub name: Option<&'static str>,
    pub quantity: Option<&'static str>,
    pub unit_price: Option<&'static str>,
    pub amount: Option<&'static str>,
    pub fee: Option<&'static str>,
    /// Currency of the fee column. A fee in another currency than the row is dropped.
    pub fee_currency: Option<&'static str>,
    pub currency: CurrencyField,
    pub comment: Option<&'static str>,
    pub dividend: DividendRule,
}

impl FieldMap {
    /// Starting point for struct-update syntax in broker tables.
    pub const NONE: Self = Self {
        date: "",
        time: None,
        action: "",
        isin: None,
        ticker: None,
        name: None,
        quantity: None,
        unit_price: None,
        amount: None,
        fee: None,
        fee_currency: None,
        currency: CurrencyField::Fixed(""),
        comment: None,
        dividend: DividendRule::Amount,
    };
}

/// Complete description of one broker export format.
#[derive(Clone, Copy)]
pub struct SchemaMapping {
    pub broker: BrokerId,
    pub delimiter: u8,
    /// Canonical header lines, without quotes.
    pub signatures: &'static [&'static str],
    /// Positional column list; names are the keys rows are read by.
    pub columns: &'static [Column],
    pub decimal: DecimalStyle,
    pub date_format: DateFormat,
    /// Keyword to activity type, first match wins.
    pub actions: &'static [(&'static str, ActivityType)],
    pub fields: FieldMap,
    pub derived: &'static [Derived],
    pub price: PriceRule,
    /// Administrative rows: deposits, withdrawals, FX, transfers, totals.
    pub is_ignored: fn(&TypedRow) -> bool,
}

impl std::fmt::Debug for SchemaMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaMapping")
            .field("broker", &self.broker)
            .field("delimiter", &self.delimiter_char())
            .field("columns", &self.columns.len())
            .finish_non_exhaustive()
    }
}

impl SchemaMapping {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn delimiter_char(&self) -> char {
        char::from(self.delimiter)
    }
}

/// One CSV record keyed by the schema's column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    line: u64,
    cells: Vec<(&'static str, String)>,
}

impl RawRow {
    pub fn new(line: u64, cells: Vec<(&'static str, String)>) -> Self {
        Self { line, cells }
    }

    pub const fn line(&self) -> u64 {
        self.line
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn cells(&self) -> &[(&'static str, String)] {
        &self.cells
    }
}

/// Typed value of a cell after casting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Empty,
    Text,
    Decimal(Decimal),
    Action(ActivityType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedCell {
    pub column: &'static str,
    pub raw: String,
    pub value: Value,
}

/// A [`RawRow`] after casting, plus derived cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedRow {
    line: u64,
    cells: Vec<TypedCell>,
}

impl TypedRow {
    pub fn new(line: u64, cells: Vec<TypedCell>) -> Self {
        Self { line, cells }
    }

    pub const fn line(&self) -> u64 {
        self.line
    }

    pub fn cell(&self, column: &str) -> Option<&TypedCell> {
        self.cells.iter().find(|cell| cell.column == column)
    }

    /// Trimmed raw text, `None` when blank or missing.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cell(column)
            .map(|cell| cell.raw.trim())
            .filter(|raw| !raw.is_empty())
    }

    pub fn decimal(&self, column: &str) -> Option<Decimal> {
        match self.cell(column).map(|cell| &cell.value) {
            Some(Value::Decimal(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn action(&self, column: &str) -> Option<ActivityType> {
        match self.cell(column).map(|cell| &cell.value) {
            Some(Value::Action(action)) => Some(*action),
            _ => None,
        }
    }

    /// Case-insensitive keyword test on a column, same rule as action matching.
    pub fn matches_any(&self, column: &str, keywords: &[&str]) -> bool {
        self.text(column).is_some_and(|text| {
            let text = text.to_lowercase();
            keywords.iter().any(|keyword| keyword_matches(&text, keyword))
        })
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.text(column).is_none()
    }
}
