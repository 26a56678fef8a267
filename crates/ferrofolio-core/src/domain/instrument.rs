use serde::{Deserialize, Serialize};

use crate::domain::DataSource;
use crate::ValidationError;

/// Weak identifier tuple for one instrument, as found on a broker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentQuery {
    isin: Option<String>,
    ticker: Option<String>,
    name: Option<String>,
    expected_currency: String,
}

impl InstrumentQuery {
    /// Builds a query; blank identifiers count as absent.
    pub fn new(
        isin: Option<&str>,
        ticker: Option<&str>,
        name: Option<&str>,
        expected_currency: &str,
    ) -> Result<Self, ValidationError> {
        let isin = non_blank(isin).map(|value| value.to_ascii_uppercase());
        let ticker = non_blank(ticker).map(str::to_owned);
        let name = non_blank(name).map(str::to_owned);

        if isin.is_none() && ticker.is_none() && name.is_none() {
            return Err(ValidationError::EmptyInstrumentQuery);
        }

        let expected_currency = expected_currency.trim();
        if expected_currency.is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }

        Ok(Self {
            isin,
            ticker,
            name,
            expected_currency: expected_currency.to_owned(),
        })
    }

    pub fn isin(&self) -> Option<&str> {
        self.isin.as_deref()
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expected_currency(&self) -> &str {
        &self.expected_currency
    }

    /// Lookup terms in cascade order: ISIN, then ticker, then name.
    pub fn cascade(&self) -> impl Iterator<Item = (LookupKey, &str)> {
        [
            (LookupKey::Isin, self.isin()),
            (LookupKey::Ticker, self.ticker()),
            (LookupKey::Name, self.name()),
        ]
        .into_iter()
        .filter_map(|(key, term)| term.map(|term| (key, term)))
    }
}

/// Identifier used for one cascade step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    Isin,
    Ticker,
    Name,
}

impl LookupKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isin => "isin",
            Self::Ticker => "ticker",
            Self::Name => "name",
        }
    }
}

/// Confirmed instrument. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReference {
    symbol: String,
    currency: String,
    data_source: DataSource,
}

impl SecurityReference {
    pub fn new(symbol: impl Into<String>, currency: impl Into<String>, data_source: DataSource) -> Self {
        Self {
            symbol: symbol.into(),
            currency: currency.into(),
            data_source,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub const fn data_source(&self) -> DataSource {
        self.data_source
    }
}

/// Pence quotes show up as `GBX` in some feeds and `GBp` in others.
pub fn currency_alias(code: &str) -> &str {
    match code {
        "GBX" => "GBp",
        other => other,
    }
}

/// Exact currency comparison after applying [`currency_alias`] to both sides.
pub fn currency_matches(candidate: &str, expected: &str) -> bool {
    currency_alias(candidate.trim()) == currency_alias(expected.trim())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
