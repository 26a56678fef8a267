//! Shared row state machine: typed rows in, canonical activities out.
//!
//! Per row, in input order:
//!
//! 1. ignored rows are skipped;
//! 2. rows whose action is outside the vocabulary are skipped with a warning;
//! 3. interest, fee and refund rows become MANUAL activities;
//! 4. everything else is resolved to a symbol first, and dropped with a
//!    "manual entry required" warning when the lookup finds nothing.
//!
//! A lookup-service failure aborts the whole run.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::{currency_matches, ActivityType, CanonicalActivity, DataSource, InstrumentQuery};
use crate::error::{ConvertError, ParseError};
use crate::resolver::{InstrumentResolver, ResolutionCache};
use crate::schema::{DividendRule, PriceRule, SchemaMapping, TimestampFormat, TypedRow};

/// Decimal places for amounts booked as manual activities.
const CASH_SCALE: u32 = 2;

/// Row that needed an instrument but could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedRow {
    pub line: u64,
    pub isin: Option<String>,
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub currency: String,
}

/// Row skipped because its action text matched no keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnrecognizedAction {
    pub line: u64,
    pub action: String,
}

/// What happened to the rows of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub rows_read: usize,
    pub ignored: usize,
    pub emitted: usize,
    pub unresolved: Vec<UnresolvedRow>,
    pub unrecognized: Vec<UnrecognizedAction>,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Maps typed rows of one schema to canonical activities.
#[derive(Debug)]
pub struct ActivityMapper<'a> {
    mapping: &'a SchemaMapping,
    resolver: &'a InstrumentResolver,
    account_id: &'a str,
    tags: &'a [String],
}

impl<'a> ActivityMapper<'a> {
    pub fn new(
        mapping: &'a SchemaMapping,
        resolver: &'a InstrumentResolver,
        account_id: &'a str,
    ) -> Self {
        Self {
            mapping,
            resolver,
            account_id,
            tags: &[],
        }
    }

    pub fn with_tags(mut self, tags: &'a [String]) -> Self {
        self.tags = tags;
        self
    }

    /// Runs the state machine over `rows`, strictly in order.
    pub async fn map_rows(
        &self,
        rows: &[TypedRow],
        cache: &mut ResolutionCache,
    ) -> Result<(Vec<CanonicalActivity>, RunSummary), ConvertError> {
        let mut activities = Vec::with_capacity(rows.len());
        let mut summary = RunSummary::default();
        let fields = &self.mapping.fields;
        let timestamps = TimestampFormat::compile(&self.mapping.date_format)?;

        for row in rows {
            summary.rows_read += 1;
            let line = row.line();

            if (self.mapping.is_ignored)(row) {
                debug!(line, "administrative row ignored");
                summary.ignored += 1;
                continue;
            }

            let Some(activity_type) = row.action(fields.action) else {
                let action = row.text(fields.action).unwrap_or_default().to_owned();
                warn!(line, action = %action, "unrecognized action, row skipped");
                summary.unrecognized.push(UnrecognizedAction { line, action });
                continue;
            };

            let timestamp = self.timestamp(row, &timestamps)?;
            let currency = fields
                .currency
                .resolve(row)
                .ok_or(ParseError::MissingField {
                    line,
                    field: "currency",
                })?;
            let fee = self.fee(row, currency);
            let comment = fields
                .comment
                .and_then(|column| row.text(column))
                .map(str::to_owned);

            if !activity_type.needs_instrument() {
                let value = self
                    .absolute(row, fields.amount)
                    .or_else(|| self.absolute(row, fields.unit_price))
                    .ok_or(ParseError::MissingField {
                        line,
                        field: "amount",
                    })?
                    .round_dp_with_strategy(CASH_SCALE, RoundingStrategy::MidpointAwayFromZero);
                let symbol = self
                    .text(row, fields.name)
                    .or_else(|| self.text(row, fields.ticker))
                    .unwrap_or_default();

                activities.push(self.activity(Draft {
                    activity_type,
                    quantity: Decimal::ONE,
                    unit_price: value,
                    fee: value,
                    currency: currency.to_owned(),
                    data_source: DataSource::Manual,
                    timestamp,
                    symbol: symbol.to_owned(),
                    comment,
                }));
                continue;
            }

            let (quantity, unit_price) = self.pricing(row, activity_type)?;

            let isin = self.text(row, fields.isin);
            let ticker = self.text(row, fields.ticker);
            let name = self.text(row, fields.name);
            let unresolved = || UnresolvedRow {
                line,
                isin: isin.map(str::to_owned),
                ticker: ticker.map(str::to_owned),
                name: name.map(str::to_owned),
                currency: currency.to_owned(),
            };

            let query = match InstrumentQuery::new(isin, ticker, name, currency) {
                Ok(query) => query,
                Err(error) => {
                    warn!(line, %error, "manual entry required");
                    summary.unresolved.push(unresolved());
                    continue;
                }
            };

            match self.resolver.resolve(&query, cache).await? {
                Some(security) => activities.push(self.activity(Draft {
                    activity_type,
                    quantity,
                    unit_price,
                    fee,
                    currency: security.currency().to_owned(),
                    data_source: security.data_source(),
                    timestamp,
                    symbol: security.symbol().to_owned(),
                    comment,
                })),
                None => {
                    warn!(
                        line,
                        isin = isin.unwrap_or_default(),
                        ticker = ticker.unwrap_or_default(),
                        name = name.unwrap_or_default(),
                        "manual entry required"
                    );
                    summary.unresolved.push(unresolved());
                }
            }
        }

        summary.emitted = activities.len();
        summary.cache_hits = cache.hits();
        summary.cache_misses = cache.misses();
        Ok((activities, summary))
    }

    fn timestamp(
        &self,
        row: &TypedRow,
        timestamps: &TimestampFormat,
    ) -> Result<OffsetDateTime, ParseError> {
        let fields = &self.mapping.fields;
        let line = row.line();
        let date = row.text(fields.date).ok_or(ParseError::MissingField {
            line,
            field: "date",
        })?;
        let time_of_day = fields.time.and_then(|column| row.text(column));

        timestamps.parse(date, time_of_day).ok_or_else(|| {
            ParseError::InvalidDate {
                line,
                value: match time_of_day {
                    Some(time_of_day) => format!("{date} {time_of_day}"),
                    None => date.to_owned(),
                },
            }
        })
    }

    /// Quantity and unit price of an instrument row.
    fn pricing(
        &self,
        row: &TypedRow,
        activity_type: ActivityType,
    ) -> Result<(Decimal, Decimal), ParseError> {
        let fields = &self.mapping.fields;
        let line = row.line();
        let quantity = self.absolute(row, fields.quantity);

        if activity_type == ActivityType::Dividend {
            let price_times_quantity = || {
                let price = self.absolute(row, fields.unit_price)?;
                quantity.map(|quantity| price * quantity)
            };
            let gross = match fields.dividend {
                DividendRule::Amount => self
                    .absolute(row, fields.amount)
                    .or_else(price_times_quantity)
                    .ok_or(ParseError::MissingField {
                        line,
                        field: "amount",
                    })?,
                DividendRule::PriceTimesQuantity => {
                    price_times_quantity().ok_or(ParseError::MissingField {
                        line,
                        field: "unit price",
                    })?
                }
            };
            return Ok((Decimal::ONE, gross));
        }

        let quantity = quantity.ok_or(ParseError::MissingField {
            line,
            field: "quantity",
        })?;

        let unit_price = match self.mapping.price {
            PriceRule::Stated => self.absolute(row, fields.unit_price).ok_or(
                ParseError::MissingField {
                    line,
                    field: "unit price",
                },
            )?,
            PriceRule::PerUnit { scale } => {
                if quantity.is_zero() {
                    return Err(ParseError::ZeroQuantity { line });
                }
                let amount = self.absolute(row, fields.amount).ok_or(ParseError::MissingField {
                    line,
                    field: "amount",
                })?;
                amount
                    .checked_div(quantity)
                    .ok_or(ParseError::ZeroQuantity { line })?
                    .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
            }
        };

        Ok((quantity, unit_price))
    }

    /// Fee of an instrument row, zero when it is charged in another currency.
    fn fee(&self, row: &TypedRow, currency: &str) -> Decimal {
        let fields = &self.mapping.fields;
        let Some(fee) = self.absolute(row, fields.fee) else {
            return Decimal::ZERO;
        };
        match self.text(row, fields.fee_currency) {
            Some(fee_currency) if !currency_matches(fee_currency, currency) => {
                debug!(
                    line = row.line(),
                    fee = %fee,
                    fee_currency,
                    currency,
                    "fee in another currency dropped"
                );
                Decimal::ZERO
            }
            _ => fee,
        }
    }

    fn absolute(&self, row: &TypedRow, column: Option<&str>) -> Option<Decimal> {
        column.and_then(|column| row.decimal(column)).map(|value| value.abs())
    }

    fn text<'r>(&self, row: &'r TypedRow, column: Option<&str>) -> Option<&'r str> {
        column.and_then(|column| row.text(column))
    }

    fn activity(&self, draft: Draft) -> CanonicalActivity {
        CanonicalActivity {
            account_id: self.account_id.to_owned(),
            comment: draft.comment,
            fee: draft.fee,
            quantity: draft.quantity,
            activity_type: draft.activity_type,
            unit_price: draft.unit_price,
            currency: draft.currency,
            data_source: draft.data_source,
            timestamp: draft.timestamp,
            symbol: draft.symbol,
            tags: (!self.tags.is_empty()).then(|| self.tags.to_vec()),
        }
    }
}

struct Draft {
    activity_type: ActivityType,
    quantity: Decimal,
    unit_price: Decimal,
    fee: Decimal,
    currency: String,
    data_source: DataSource,
    timestamp: OffsetDateTime,
    symbol: String,
    comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};
    use crate::resolver::LookupClient;
    use crate::schema::parse;
    use crate::BrokerId;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use time::macros::datetime;

    struct OfflineHttpClient;

    impl HttpClient for OfflineHttpClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async { Err(HttpError::non_retryable("offline")) })
        }
    }

    fn offline_resolver() -> InstrumentResolver {
        InstrumentResolver::new(LookupClient::new(
            Arc::new(OfflineHttpClient),
            "http://lookup.test",
            "secret",
        ))
    }

    const SCHWAB_HEADER: &str =
        "Date,Action,Symbol,Description,Quantity,Price,Fees & Comm,Amount\n";

    #[tokio::test]
    async fn cash_rows_become_manual_activities_without_lookups() {
        let text = format!(
            "{SCHWAB_HEADER}\
01/31/2024,Bank Interest,,BANK INT 010124-013124,,,,$1.235\n\
02/01/2024,ADR Mgmt Fee,TSM,TAIWAN SEMICONDUCTOR,,,,-$0.40\n\
02/02/2024,Journal,,JOURNAL,,,,$100.00\n\
02/03/2024,Stock Split,AAPL,APPLE INC,4,,,\n"
        );
        let rows = parse(&text, BrokerId::Schwab.mapping()).expect("rows");
        let resolver = offline_resolver();
        let tags = vec![String::from("import")];
        let mapper = ActivityMapper::new(BrokerId::Schwab.mapping(), &resolver, "acc-1")
            .with_tags(&tags);
        let mut cache = ResolutionCache::new();

        let (activities, summary) = mapper
            .map_rows(&rows, &mut cache)
            .await
            .expect("no lookups needed");

        assert_eq!(activities.len(), 2);
        let interest = &activities[0];
        assert_eq!(interest.activity_type, ActivityType::Interest);
        assert_eq!(interest.data_source, DataSource::Manual);
        assert_eq!(interest.quantity, Decimal::ONE);
        assert_eq!(interest.unit_price, Decimal::new(124, 2));
        assert_eq!(interest.fee, interest.unit_price);
        assert_eq!(interest.symbol, "BANK INT 010124-013124");
        assert_eq!(interest.currency, "USD");
        assert_eq!(interest.timestamp, datetime!(2024-01-31 00:00:00 UTC));
        assert_eq!(interest.tags.as_deref(), Some(&[String::from("import")][..]));

        let fee = &activities[1];
        assert_eq!(fee.activity_type, ActivityType::Fee);
        assert_eq!(fee.unit_price, Decimal::new(40, 2));

        assert_eq!(summary.rows_read, 4);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.emitted, 2);
        assert_eq!(
            summary.unrecognized,
            vec![UnrecognizedAction {
                line: 5,
                action: String::from("Stock Split"),
            }]
        );
    }

    #[tokio::test]
    async fn lookup_failure_aborts_the_run() {
        let text = format!("{SCHWAB_HEADER}01/02/2024,Buy,VTI,VANGUARD,1,$200.00,,-$200.00\n");
        let rows = parse(&text, BrokerId::Schwab.mapping()).expect("rows");
        let resolver = offline_resolver();
        let mapper = ActivityMapper::new(BrokerId::Schwab.mapping(), &resolver, "acc-1");

        let error = mapper
            .map_rows(&rows, &mut ResolutionCache::new())
            .await
            .expect_err("remote failure");

        assert!(matches!(error, ConvertError::Remote(_)));
    }

    #[tokio::test]
    async fn unreadable_date_is_a_parse_error() {
        let text = format!("{SCHWAB_HEADER}2024-01-02,Bank Interest,,INT,,,,$1.00\n");
        let rows = parse(&text, BrokerId::Schwab.mapping()).expect("rows");
        let resolver = offline_resolver();
        let mapper = ActivityMapper::new(BrokerId::Schwab.mapping(), &resolver, "acc-1");

        let error = mapper
            .map_rows(&rows, &mut ResolutionCache::new())
            .await
            .expect_err("bad date");

        assert!(matches!(
            error,
            ConvertError::Parse(ParseError::InvalidDate { line: 2, .. })
        ));
    }

    const T212_HEADER: &str = "Action,Time,ISIN,Ticker,Name,No. of shares,Price / share,Currency (Price / share),Exchange rate,Result,Currency (Result),Total,Currency (Total),Withholding tax,Currency (Withholding tax),Notes,ID,Currency conversion fee,Currency (Currency conversion fee)\n";

    #[test]
    fn dividends_in_a_foreign_listing_use_price_times_shares() {
        let text = format!(
            "{T212_HEADER}\
Dividend (Ordinary),2023-02-17 12:00:00,US0378331005,AAPL,Apple,2,0.23,USD,,,,0.37,EUR,0.07,USD,,,,\n\
Dividend (Ordinary),2023-09-21 12:00:00,GB00B10RZP78,ULVR,Unilever,2,36.74,GBX,,,,0.84,EUR,,,,,,\n"
        );
        let rows = parse(&text, BrokerId::Trading212.mapping()).expect("rows");
        let resolver = offline_resolver();
        let mapper = ActivityMapper::new(BrokerId::Trading212.mapping(), &resolver, "acc-1");

        assert_eq!(
            mapper.pricing(&rows[0], ActivityType::Dividend),
            Ok((Decimal::ONE, Decimal::new(46, 2)))
        );
        assert_eq!(
            mapper.pricing(&rows[1], ActivityType::Dividend),
            Ok((Decimal::ONE, Decimal::new(7348, 2)))
        );
    }

    #[test]
    fn dividend_without_price_is_missing_a_field_under_price_times_shares() {
        let text = format!(
            "{T212_HEADER}Dividend (Ordinary),2023-02-17 12:00:00,US0378331005,AAPL,Apple,2,,USD,,,,0.37,EUR,,,,,,\n"
        );
        let rows = parse(&text, BrokerId::Trading212.mapping()).expect("rows");
        let resolver = offline_resolver();
        let mapper = ActivityMapper::new(BrokerId::Trading212.mapping(), &resolver, "acc-1");

        assert_eq!(
            mapper.pricing(&rows[0], ActivityType::Dividend),
            Err(ParseError::MissingField {
                line: 2,
                field: "unit price",
            })
        );
    }

    #[test]
    fn fee_in_another_currency_than_the_trade_is_dropped() {
        let text = format!(
            "{T212_HEADER}\
Market buy,2023-01-03 14:31:07,US0378331005,AAPL,Apple,2,125.07,USD,1.07,,,234.12,EUR,,,,EOF1,0.35,EUR\n\
Market buy,2023-01-04 10:02:11,IE00B3RBWM25,VWRL,Vanguard,3,92.10,EUR,1.00,,,276.40,EUR,,,,EOF2,0.10,EUR\n"
        );
        let rows = parse(&text, BrokerId::Trading212.mapping()).expect("rows");
        let resolver = offline_resolver();
        let mapper = ActivityMapper::new(BrokerId::Trading212.mapping(), &resolver, "acc-1");

        assert_eq!(mapper.fee(&rows[0], "USD"), Decimal::ZERO);
        assert_eq!(mapper.fee(&rows[1], "EUR"), Decimal::new(10, 2));
    }
}
