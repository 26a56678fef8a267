use csv::{ReaderBuilder, StringRecord};
use regex::Regex;

use super::{cast, ColumnKind, RawRow, SchemaMapping, TypedCell, TypedRow, Value};
use crate::error::ParseError;

/// Splits CSV text into keyed rows using the mapping's column list.
///
/// The first record is the header; its width must equal the schema's column
/// count and every data record must be exactly as wide as the header.
/// Fully blank records are skipped.
pub fn read_rows(text: &str, mapping: &SchemaMapping) -> Result<Vec<RawRow>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(mapping.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|error| csv_error(1, &error))?,
        None => return Err(ParseError::NoRows),
    };
    if header.len() != mapping.columns.len() {
        return Err(ParseError::HeaderMismatch {
            broker: mapping.broker.as_str(),
            expected: mapping.columns.len(),
            found: header.len(),
        });
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|error| {
            let line = error.position().map_or(0, csv::Position::line);
            csv_error(line, &error)
        })?;
        let line = record.position().map_or(0, csv::Position::line);

        if is_blank_record(&record) {
            continue;
        }
        if record.len() != header.len() {
            return Err(ParseError::ColumnCount {
                line,
                expected: header.len(),
                found: record.len(),
            });
        }

        let cells = mapping
            .columns
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.name, value.to_owned()))
            .collect();
        rows.push(RawRow::new(line, cells));
    }

    if rows.is_empty() {
        return Err(ParseError::NoRows);
    }

    Ok(rows)
}

/// Applies per-column casts and extracts derived cells.
///
/// A cell that fails its cast only fails the run when the row is not an
/// administrative one; ignored rows keep such cells as text.
pub fn cast_rows(rows: Vec<RawRow>, mapping: &SchemaMapping) -> Result<Vec<TypedRow>, ParseError> {
    let derived = mapping
        .derived
        .iter()
        .map(|spec| {
            Regex::new(spec.pattern)
                .map(|regex| (spec, regex))
                .map_err(|error| ParseError::InvalidPattern {
                    column: spec.name,
                    message: error.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|row| {
            let line = row.line();
            let mut cells = Vec::with_capacity(row.cells().len() + derived.len());
            let mut rejected = None;

            for column in mapping.columns {
                let raw = row.get(column.name).unwrap_or_default();
                let value = cast_cell(mapping, line, column.name, column.kind, raw)
                    .unwrap_or_else(|error| {
                        rejected.get_or_insert(error);
                        Value::Text
                    });
                cells.push(TypedCell {
                    column: column.name,
                    raw: raw.to_owned(),
                    value,
                });
            }

            for (spec, regex) in &derived {
                let captured = row
                    .get(spec.source)
                    .and_then(|source| regex.captures(source))
                    .and_then(|captures| captures.name("value"))
                    .map(|value| value.as_str().to_owned())
                    .unwrap_or_default();
                let value = cast_cell(mapping, line, spec.name, spec.kind, &captured)
                    .unwrap_or_else(|error| {
                        rejected.get_or_insert(error);
                        Value::Text
                    });
                cells.push(TypedCell {
                    column: spec.name,
                    raw: captured,
                    value,
                });
            }

            let row = TypedRow::new(line, cells);
            match rejected {
                Some(error) if !(mapping.is_ignored)(&row) => Err(error),
                _ => Ok(row),
            }
        })
        .collect()
}

/// `read_rows` followed by `cast_rows`.
pub fn parse(text: &str, mapping: &SchemaMapping) -> Result<Vec<TypedRow>, ParseError> {
    cast_rows(read_rows(text, mapping)?, mapping)
}

fn cast_cell(
    mapping: &SchemaMapping,
    line: u64,
    column: &'static str,
    kind: ColumnKind,
    raw: &str,
) -> Result<Value, ParseError> {
    if raw.trim().is_empty() {
        return Ok(Value::Empty);
    }

    match kind {
        ColumnKind::Text => Ok(Value::Text),
        ColumnKind::Decimal => match cast::parse_decimal(raw, mapping.decimal) {
            Ok(Some(value)) => Ok(Value::Decimal(value)),
            Ok(None) => Ok(Value::Empty),
            Err(_) => Err(ParseError::InvalidNumber {
                line,
                column,
                value: raw.trim().to_owned(),
            }),
        },
        ColumnKind::Action => Ok(cast::normalize_action(raw, mapping.actions)
            .map_or(Value::Text, Value::Action)),
    }
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn csv_error(line: u64, error: &csv::Error) -> ParseError {
    ParseError::Csv {
        line,
        message: error.to_string(),
    }
}
