//! Behavior tests for whole conversion runs
//!
//! These tests verify WHAT a user gets back when converting a broker export:
//! the activity list, the rows that were skipped, and the run summary.

mod support;

use ferrofolio_core::{
    ActivityType, BrokerId, ConfigError, ConvertError, DataSource, ExportDocument, HttpResponse,
    Settings,
};
use rust_decimal::Decimal;
use time::macros::datetime;

use support::{converter, converter_with, fixture, test_settings, LookupServiceDouble, ACCOUNT_ID};

fn catalog() -> std::sync::Arc<LookupServiceDouble> {
    let service = LookupServiceDouble::new();
    service.add_candidate("US0378331005", "AAPL", "USD");
    service.add_candidate("IE00B3RBWM25", "VWRL.AS", "EUR");
    service.add_candidate("GB00B10RZP78", "ULVR.L", "GBp");
    service.add_candidate("US5949181045", "MSFT", "USD");
    service
}

fn dec(value: &str) -> Decimal {
    value.parse().expect("test decimal")
}

// =============================================================================
// Full conversion
// =============================================================================

#[tokio::test]
async fn trading212_export_with_full_resolution_yields_one_activity_per_trade() {
    // Given: A Trading 212 export with 18 trades and dividends plus a deposit
    //        and a currency conversion, and a service that knows every ISIN
    let service = catalog();
    let converter = converter(&service);

    // When: The export is converted without naming the broker
    let outcome = converter
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("conversion succeeds");

    // Then: The broker is detected and every trade and dividend becomes an activity
    assert_eq!(outcome.broker, BrokerId::Trading212);
    assert_eq!(outcome.document.len(), 18);
    assert!(outcome
        .document
        .activities
        .iter()
        .all(|activity| !activity.symbol.is_empty()));
    assert!(outcome
        .document
        .activities
        .iter()
        .all(|activity| activity.account_id == ACCOUNT_ID));

    // And: The run summary accounts for every row
    assert_eq!(outcome.summary.rows_read, 20);
    assert_eq!(outcome.summary.ignored, 2);
    assert_eq!(outcome.summary.emitted, 18);
    assert!(outcome.summary.unresolved.is_empty());
    assert!(outcome.summary.unrecognized.is_empty());

    // And: Each ISIN was looked up exactly once
    assert_eq!(service.lookup_queries().len(), 4);
    assert_eq!(outcome.summary.cache_misses, 4);
    assert_eq!(outcome.summary.cache_hits, 14);
}

#[tokio::test]
async fn activity_fields_follow_the_broker_row() {
    let service = catalog();
    let outcome = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("conversion succeeds");
    let activities = &outcome.document.activities;

    let count = |kind: ActivityType| {
        activities
            .iter()
            .filter(|activity| activity.activity_type == kind)
            .count()
    };
    assert_eq!(count(ActivityType::Buy), 10);
    assert_eq!(count(ActivityType::Sell), 3);
    assert_eq!(count(ActivityType::Dividend), 5);

    let first = &activities[0];
    assert_eq!(first.activity_type, ActivityType::Buy);
    assert_eq!(first.symbol, "AAPL");
    assert_eq!(first.quantity, dec("2"));
    assert_eq!(first.unit_price, dec("125.07"));
    // The conversion fee is charged in EUR, so a USD trade carries none.
    assert_eq!(first.fee, Decimal::ZERO);
    assert_eq!(first.currency, "USD");
    assert_eq!(first.data_source, DataSource::External);
    assert_eq!(first.timestamp, datetime!(2023-01-03 14:31:07 UTC));
    assert_eq!(first.comment, None);

    // Pence listing keeps the currency of the resolved security.
    let unilever = &activities[2];
    assert_eq!(unilever.symbol, "ULVR.L");
    assert_eq!(unilever.currency, "GBp");

    // Dividends are booked as one unit of shares times the per-share payout.
    let dividend = activities
        .iter()
        .find(|activity| activity.timestamp == datetime!(2023-03-29 12:00:00 UTC))
        .expect("march dividend");
    assert_eq!(dividend.activity_type, ActivityType::Dividend);
    assert_eq!(dividend.symbol, "VWRL.AS");
    assert_eq!(dividend.quantity, Decimal::ONE);
    assert_eq!(dividend.unit_price, dec("1.1904"));
    assert_eq!(dividend.fee, Decimal::ZERO);

    // Sells keep a positive quantity; direction lives in the type.
    let sell = activities
        .iter()
        .find(|activity| activity.activity_type == ActivityType::Sell)
        .expect("a sell");
    assert!(sell.quantity > Decimal::ZERO);
}

#[tokio::test]
async fn dividends_are_booked_in_the_listing_currency() {
    // Given: Trading 212 dividends whose Total column is in the EUR account
    //        currency while the securities are listed in USD and GBX
    let service = catalog();

    // When: The export is converted
    let outcome = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("conversion succeeds");
    let dividend_on = |symbol: &str, day: time::OffsetDateTime| {
        outcome
            .document
            .activities
            .iter()
            .find(|activity| {
                activity.activity_type == ActivityType::Dividend
                    && activity.symbol == symbol
                    && activity.timestamp == day
            })
            .cloned()
            .expect("dividend emitted")
    };

    // Then: The value is shares times the per-share payout, in the listing currency
    let apple = dividend_on("AAPL", datetime!(2023-02-17 12:00:00 UTC));
    assert_eq!(apple.quantity, Decimal::ONE);
    assert_eq!(apple.unit_price, dec("0.46"));
    assert_eq!(apple.currency, "USD");

    let unilever = dividend_on("ULVR.L", datetime!(2023-09-21 12:00:00 UTC));
    assert_eq!(unilever.unit_price, dec("73.48"));
    assert_eq!(unilever.currency, "GBp");

    let microsoft = dividend_on("MSFT", datetime!(2023-06-08 12:00:00 UTC));
    assert_eq!(microsoft.unit_price, dec("0.68"));
    assert_eq!(microsoft.currency, "USD");

    // And: No EUR amount from the Total column leaks into a foreign listing
    assert_ne!(apple.unit_price, dec("0.37"));
    assert_ne!(unilever.unit_price, dec("0.84"));
}

#[tokio::test]
async fn account_currency_fees_never_land_on_foreign_trades() {
    // Given: A Trading 212 export whose conversion fees are all charged in EUR
    let service = catalog();

    // When: It is converted
    let outcome = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("conversion succeeds");

    // Then: No USD or GBp activity carries a fee in the wrong currency
    assert!(outcome
        .document
        .activities
        .iter()
        .filter(|activity| activity.currency != "EUR")
        .all(|activity| activity.fee.is_zero()));
}

#[tokio::test]
async fn activities_keep_file_order() {
    let service = catalog();
    let outcome = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("conversion succeeds");

    let timestamps: Vec<_> = outcome
        .document
        .activities
        .iter()
        .map(|activity| activity.timestamp)
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted, "fixture rows are chronological");
}

#[tokio::test]
async fn export_document_survives_a_json_round_trip() {
    // Given: A converted export
    let service = catalog();
    let outcome = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("conversion succeeds");

    // When: It is written as JSON and read back
    let json = outcome.document.to_json(true).expect("serialize");
    let restored = ExportDocument::from_json(&json).expect("deserialize");

    // Then: The activity list is identical
    assert_eq!(restored.activities, outcome.document.activities);
    assert_eq!(restored.meta, outcome.document.meta);
}

#[tokio::test]
async fn configured_tags_are_attached_to_every_activity() {
    let service = catalog();
    let mut settings = test_settings();
    settings.tags = vec![String::from("t212"), String::from("2023")];

    let outcome = converter_with(settings, &service)
        .convert(&fixture("trading212_2023.csv"), Some(BrokerId::Trading212))
        .await
        .expect("conversion succeeds");

    assert!(outcome.document.activities.iter().all(|activity| {
        activity.tags.as_deref() == Some(&[String::from("t212"), String::from("2023")][..])
    }));
}

// =============================================================================
// Skipped and manual rows
// =============================================================================

#[tokio::test]
async fn administrative_rows_never_become_activities() {
    // Given: A Schwab export with interest, a fee, a transfer and a totals line
    let service = LookupServiceDouble::new();
    let converter = converter(&service);

    // When: It is converted
    let outcome = converter
        .convert(&fixture("schwab_cash.csv"), None)
        .await
        .expect("conversion succeeds");

    // Then: Only the interest and the fee are emitted, as manual entries
    assert_eq!(outcome.broker, BrokerId::Schwab);
    assert_eq!(outcome.summary.ignored, 2);
    let types: Vec<ActivityType> = outcome
        .document
        .activities
        .iter()
        .map(|activity| activity.activity_type)
        .collect();
    assert_eq!(types, vec![ActivityType::Interest, ActivityType::Fee]);

    let interest = &outcome.document.activities[0];
    assert_eq!(interest.data_source, DataSource::Manual);
    assert_eq!(interest.quantity, Decimal::ONE);
    assert_eq!(interest.unit_price, dec("1.27"));
    assert_eq!(interest.currency, "USD");
    assert_eq!(outcome.document.activities[1].unit_price, dec("0.42"));

    // And: Cash rows never reach the lookup service
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn totals_footer_without_a_number_is_skipped_like_any_other() {
    // Given: A Schwab export whose totals line carries text in the Amount column
    let input = "\
Date,Action,Symbol,Description,Quantity,Price,Fees & Comm,Amount
03/01/2024,Credit Interest,,SCHWAB1 INT 01/30-02/28,,,,$1.27
Transactions Total,,,,,,,see statement
";
    let service = LookupServiceDouble::new();

    // When: It is converted
    let outcome = converter(&service)
        .convert(input, None)
        .await
        .expect("footer does not fail the run");

    // Then: The interest row is emitted and the footer is counted as ignored
    assert_eq!(outcome.document.len(), 1);
    assert_eq!(outcome.summary.ignored, 1);
    assert_eq!(outcome.document.activities[0].unit_price, dec("1.27"));
}

#[tokio::test]
async fn unresolved_instruments_are_reported_and_asked_for_every_time() {
    // Given: A service that does not know Microsoft under any identifier
    let service = LookupServiceDouble::new();
    service.add_candidate("US0378331005", "AAPL", "USD");
    service.add_candidate("IE00B3RBWM25", "VWRL.AS", "EUR");
    service.add_candidate("GB00B10RZP78", "ULVR.L", "GBp");

    // When: The export is converted
    let outcome = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect("unresolved rows do not fail the run");

    // Then: The four Microsoft rows are left for manual entry
    assert_eq!(outcome.document.len(), 14);
    assert_eq!(outcome.summary.unresolved.len(), 4);
    assert!(outcome
        .summary
        .unresolved
        .iter()
        .all(|row| row.isin.as_deref() == Some("US5949181045") && row.currency == "USD"));

    // And: Each occurrence ran the full cascade again
    assert_eq!(service.lookups_for("US5949181045"), 4);
    assert_eq!(service.lookups_for("MSFT"), 4);
    assert_eq!(service.lookups_for("Microsoft"), 4);
}

// =============================================================================
// Run-level failures
// =============================================================================

#[tokio::test]
async fn lookup_outage_aborts_without_partial_output() {
    let service = LookupServiceDouble::new();
    for _ in 0..3 {
        service.script_lookup(Ok(HttpResponse::with_status(401)));
    }

    let error = converter(&service)
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect_err("remote failure is fatal");

    assert!(matches!(error, ConvertError::Remote(_)));
}

#[tokio::test]
async fn missing_account_id_fails_before_anything_is_read() {
    // Given: Settings without an account id
    let service = catalog();
    let converter = converter_with(Settings::default(), &service);

    // When: A valid export is converted
    let error = converter
        .convert(&fixture("trading212_2023.csv"), None)
        .await
        .expect_err("account id is required");

    // Then: The run stops with a configuration error and no lookups
    assert!(matches!(
        error,
        ConvertError::Config(ConfigError::MissingAccountId)
    ));
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn second_concurrent_run_is_rejected_as_busy() {
    // Given: One converter and two exports submitted at the same time
    let service = catalog();
    let converter = converter(&service);
    let input = fixture("trading212_2023.csv");

    // When: Both runs are driven concurrently
    let (first, second) = tokio::join!(
        converter.convert(&input, None),
        converter.convert(&input, None)
    );

    // Then: The first completes and the second is turned away immediately
    assert_eq!(first.expect("first run").document.len(), 18);
    assert!(matches!(second, Err(ConvertError::Busy)));

    // And: The converter accepts work again afterwards
    assert!(!converter.is_running());
    assert!(converter.convert(&input, None).await.is_ok());
}
