use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::CanonicalActivity;

/// Version tag written into every export document.
pub const SCHEMA_VERSION: &str = "v0";

/// Metadata of one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMeta {
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    #[serde(rename = "version")]
    pub schema_version: String,
}

/// Document handed to the portfolio tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    pub activities: Vec<CanonicalActivity>,
}

impl ExportDocument {
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

/// Wraps activities with run metadata, keeping their order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportAssembler;

impl ExportAssembler {
    pub fn assemble(activities: Vec<CanonicalActivity>) -> ExportDocument {
        Self::assemble_at(activities, OffsetDateTime::now_utc())
    }

    pub fn assemble_at(
        activities: Vec<CanonicalActivity>,
        generated_at: OffsetDateTime,
    ) -> ExportDocument {
        ExportDocument {
            meta: ExportMeta {
                generated_at,
                schema_version: String::from(SCHEMA_VERSION),
            },
            activities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityType, DataSource};
    use rust_decimal::Decimal;
    use time::macros::datetime;

    fn activity(symbol: &str, activity_type: ActivityType) -> CanonicalActivity {
        CanonicalActivity {
            account_id: String::from("acc-1"),
            comment: None,
            fee: Decimal::new(99, 2),
            quantity: Decimal::new(15, 1),
            activity_type,
            unit_price: Decimal::new(1102, 1),
            currency: String::from("EUR"),
            data_source: DataSource::External,
            timestamp: datetime!(2024-03-01 10:02:11 UTC),
            symbol: String::from(symbol),
            tags: None,
        }
    }

    #[test]
    fn json_shape_matches_the_tracker_import_format() {
        let document = ExportAssembler::assemble_at(
            vec![activity("VWCE.DE", ActivityType::Buy)],
            datetime!(2024-03-02 08:00:00 UTC),
        );
        let value: serde_json::Value =
            serde_json::from_str(&document.to_json(false).expect("serialize")).expect("json");

        assert_eq!(value["meta"]["version"], "v0");
        assert_eq!(value["meta"]["date"], "2024-03-02T08:00:00Z");

        let first = &value["activities"][0];
        assert_eq!(first["accountId"], "acc-1");
        assert_eq!(first["type"], "BUY");
        assert_eq!(first["dataSource"], "EXTERNAL");
        assert_eq!(first["date"], "2024-03-01T10:02:11Z");
        assert_eq!(first["unitPrice"], 110.2);
        assert_eq!(first["quantity"], 1.5);
        assert!(first["comment"].is_null());
        assert!(first.get("tags").is_none());
    }

    #[test]
    fn assembled_order_is_preserved() {
        let document = ExportAssembler::assemble(vec![
            activity("B", ActivityType::Sell),
            activity("A", ActivityType::Buy),
        ]);

        let symbols: Vec<&str> = document
            .activities
            .iter()
            .map(|activity| activity.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["B", "A"]);
        assert_eq!(document.meta.schema_version, SCHEMA_VERSION);
    }
}
