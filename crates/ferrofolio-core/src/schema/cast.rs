use std::str::FromStr;

use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::format_description::{self, OwnedFormatItem};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use super::{DateFormat, DecimalStyle};
use crate::domain::ActivityType;
use crate::error::ParseError;

/// Raw text that should have been a number but is not one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotANumber;

/// Locale-aware decimal parsing.
///
/// Currency symbols, ISO codes, spaces and apostrophe grouping are dropped.
/// A leading `-` or surrounding parentheses make the value negative.
/// Blank input, `-` and `--` mean "no value".
pub fn parse_decimal(raw: &str, style: DecimalStyle) -> Result<Option<Decimal>, NotANumber> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "--" {
        return Ok(None);
    }

    let (decimal_mark, group_mark) = match style {
        DecimalStyle::Point => ('.', ','),
        DecimalStyle::Comma => (',', '.'),
    };

    let mut negative = false;
    let mut normalized = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' => normalized.push(ch),
            '-' | '\u{2212}' | '(' => negative = true,
            ch if ch == decimal_mark => normalized.push('.'),
            ch if ch == group_mark => {}
            _ => {}
        }
    }

    if !normalized.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(NotANumber);
    }

    let value = Decimal::from_str(&normalized).map_err(|_| NotANumber)?;
    Ok(Some(if negative { -value } else { value }))
}

/// Keyword rule shared by action tables and ignore predicates.
///
/// `text` must already be lowercase. Matches when the text equals the keyword
/// or starts with it followed by a non-alphanumeric character.
pub fn keyword_matches(text: &str, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    match text.strip_prefix(keyword.as_str()) {
        Some("") => true,
        Some(rest) => rest.chars().next().is_some_and(|ch| !ch.is_alphanumeric()),
        None => false,
    }
}

/// Maps a broker's action text onto the closed activity vocabulary.
pub fn normalize_action(raw: &str, table: &[(&str, ActivityType)]) -> Option<ActivityType> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    table
        .iter()
        .find(|(keyword, _)| keyword_matches(&text, keyword))
        .map(|(_, activity)| *activity)
}

/// A [`DateFormat`] whose format descriptions are parsed once per mapping.
#[derive(Debug, Clone)]
pub enum TimestampFormat {
    Rfc3339,
    Pattern {
        date: OwnedFormatItem,
        /// Date pattern, a space, then the time pattern.
        date_time: Option<OwnedFormatItem>,
        date_has_space: bool,
    },
}

impl TimestampFormat {
    pub fn compile(format: &DateFormat) -> Result<Self, ParseError> {
        match *format {
            DateFormat::Rfc3339 => Ok(Self::Rfc3339),
            DateFormat::Pattern { date, time } => Ok(Self::Pattern {
                date: describe(date, date)?,
                date_time: time
                    .map(|time| describe(&format!("{date} {time}"), date))
                    .transpose()?,
                date_has_space: date.contains(' '),
            }),
        }
    }

    /// Reads a row timestamp; pattern-based values are taken as UTC.
    pub fn parse(&self, date: &str, time_of_day: Option<&str>) -> Option<OffsetDateTime> {
        let date = date.trim();
        if date.is_empty() {
            return None;
        }

        let (date_description, date_time, date_has_space) = match self {
            Self::Rfc3339 => return OffsetDateTime::parse(date, &Rfc3339).ok(),
            Self::Pattern {
                date: description,
                date_time,
                date_has_space,
            } => (description, date_time, *date_has_space),
        };

        // "09/28/2023 as of 09/27/2023" style suffixes.
        let date_value = if date_has_space {
            date
        } else {
            date.split_whitespace().next()?
        };

        let time_value = time_of_day.map(str::trim).filter(|value| !value.is_empty());
        match (date_time, time_value) {
            (Some(description), Some(time_value)) => {
                PrimitiveDateTime::parse(&format!("{date_value} {time_value}"), description)
                    .ok()
                    .map(PrimitiveDateTime::assume_utc)
            }
            _ => PrimitiveDateTime::parse(date_value, date_description)
                .map(PrimitiveDateTime::assume_utc)
                .or_else(|_| {
                    Date::parse(date_value, date_description).map(|day| day.midnight().assume_utc())
                })
                .ok(),
        }
    }
}

fn describe(pattern: &str, reported: &'static str) -> Result<OwnedFormatItem, ParseError> {
    format_description::parse_owned::<2>(pattern).map_err(|error| ParseError::InvalidDateFormat {
        pattern: reported,
        message: error.to_string(),
    })
}
