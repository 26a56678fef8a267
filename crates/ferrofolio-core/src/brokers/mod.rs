//! Supported broker exports.
//!
//! Each submodule holds one or two [`SchemaMapping`] statics. Nothing here
//! contains conversion logic; the shared row state machine lives in
//! [`crate::mapper`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::SchemaMapping;
use crate::ValidationError;

mod avanza;
mod bitvavo;
mod bux;
mod degiro;
mod delta;
mod directa;
mod disnat;
mod etoro;
mod finpension;
mod ibkr;
mod parqet;
mod rabobank;
mod revolut;
mod saxo;
mod schwab;
mod scalable;
mod swissquote;
mod trading212;
mod xtb;

/// Canonical broker identifiers, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrokerId {
    Avanza,
    Bitvavo,
    Bux,
    Degiro,
    #[serde(rename = "degiro-v3")]
    DegiroV3,
    Delta,
    Directa,
    Disnat,
    Etoro,
    Finpension,
    Ibkr,
    Parqet,
    Rabobank,
    Revolut,
    Saxo,
    Schwab,
    Scalable,
    Swissquote,
    Trading212,
    Xtb,
}

impl BrokerId {
    pub const ALL: [Self; 20] = [
        Self::Avanza,
        Self::Bitvavo,
        Self::Bux,
        Self::Degiro,
        Self::DegiroV3,
        Self::Delta,
        Self::Directa,
        Self::Disnat,
        Self::Etoro,
        Self::Finpension,
        Self::Ibkr,
        Self::Parqet,
        Self::Rabobank,
        Self::Revolut,
        Self::Saxo,
        Self::Schwab,
        Self::Scalable,
        Self::Swissquote,
        Self::Trading212,
        Self::Xtb,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avanza => "avanza",
            Self::Bitvavo => "bitvavo",
            Self::Bux => "bux",
            Self::Degiro => "degiro",
            Self::DegiroV3 => "degiro-v3",
            Self::Delta => "delta",
            Self::Directa => "directa",
            Self::Disnat => "disnat",
            Self::Etoro => "etoro",
            Self::Finpension => "finpension",
            Self::Ibkr => "ibkr",
            Self::Parqet => "parqet",
            Self::Rabobank => "rabobank",
            Self::Revolut => "revolut",
            Self::Saxo => "saxo",
            Self::Schwab => "schwab",
            Self::Scalable => "scalable",
            Self::Swissquote => "swissquote",
            Self::Trading212 => "trading212",
            Self::Xtb => "xtb",
        }
    }

    /// The export schema for this broker.
    pub fn mapping(self) -> &'static SchemaMapping {
        match self {
            Self::Avanza => &avanza::MAPPING,
            Self::Bitvavo => &bitvavo::MAPPING,
            Self::Bux => &bux::MAPPING,
            Self::Degiro => &degiro::LEGACY,
            Self::DegiroV3 => &degiro::V3,
            Self::Delta => &delta::MAPPING,
            Self::Directa => &directa::MAPPING,
            Self::Disnat => &disnat::MAPPING,
            Self::Etoro => &etoro::MAPPING,
            Self::Finpension => &finpension::MAPPING,
            Self::Ibkr => &ibkr::MAPPING,
            Self::Parqet => &parqet::MAPPING,
            Self::Rabobank => &rabobank::MAPPING,
            Self::Revolut => &revolut::MAPPING,
            Self::Saxo => &saxo::MAPPING,
            Self::Schwab => &schwab::MAPPING,
            Self::Scalable => &scalable::MAPPING,
            Self::Swissquote => &swissquote::MAPPING,
            Self::Trading212 => &trading212::MAPPING,
            Self::Xtb => &xtb::MAPPING,
        }
    }
}

impl Display for BrokerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrokerId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|broker| broker.as_str() == normalized)
            .ok_or(ValidationError::InvalidBroker { value: normalized })
    }
}

/// Every mapping in registry order.
pub fn all_mappings() -> impl Iterator<Item = &'static SchemaMapping> {
    BrokerId::ALL.into_iter().map(BrokerId::mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnKind, CurrencyField, DividendRule, PriceRule, TimestampFormat};

    #[test]
    fn ids_round_trip_through_from_str() {
        for broker in BrokerId::ALL {
            assert_eq!(broker.as_str().parse::<BrokerId>(), Ok(broker));
        }
        assert_eq!(" Degiro-V3 ".parse::<BrokerId>(), Ok(BrokerId::DegiroV3));
    }

    #[test]
    fn unknown_id_is_a_validation_error() {
        assert_eq!(
            "robinhood".parse::<BrokerId>(),
            Err(ValidationError::InvalidBroker {
                value: String::from("robinhood")
            })
        );
    }

    #[test]
    fn serde_uses_cli_ids() {
        let json = serde_json::to_string(&BrokerId::DegiroV3).expect("serialize");
        assert_eq!(json, "\"degiro-v3\"");
        let json = serde_json::to_string(&BrokerId::Trading212).expect("serialize");
        assert_eq!(json, "\"trading212\"");
    }

    #[test]
    fn every_mapping_is_registered_under_its_own_id() {
        for broker in BrokerId::ALL {
            assert_eq!(broker.mapping().broker, broker);
        }
        assert_eq!(all_mappings().count(), 20);
    }

    #[test]
    fn field_map_only_names_declared_columns() {
        for mapping in all_mappings() {
            let names: Vec<&str> = mapping
                .columns
                .iter()
                .map(|column| column.name)
                .chain(mapping.derived.iter().map(|derived| derived.name))
                .collect();
            let fields = mapping.fields;
            let mut referenced = vec![fields.date, fields.action];
            referenced.extend(
                [
                    fields.time,
                    fields.isin,
                    fields.ticker,
                    fields.name,
                    fields.quantity,
                    fields.unit_price,
                    fields.amount,
                    fields.fee,
                    fields.fee_currency,
                    fields.comment,
                ]
                .into_iter()
                .flatten(),
            );
            match fields.currency {
                CurrencyField::Column(column) => referenced.push(column),
                CurrencyField::FirstOf(columns) => referenced.extend(columns.iter().copied()),
                CurrencyField::Fixed(currency) => assert!(!currency.is_empty()),
            }

            for name in referenced {
                assert!(
                    names.contains(&name),
                    "{} maps unknown column '{name}'",
                    mapping.broker
                );
            }
        }
    }

    #[test]
    fn signatures_are_as_wide_as_the_column_list() {
        for mapping in all_mappings() {
            assert!(!mapping.signatures.is_empty(), "{}", mapping.broker);
            for signature in mapping.signatures {
                let width = signature.split(mapping.delimiter_char()).count();
                assert_eq!(width, mapping.columns.len(), "{}", mapping.broker);
            }
        }
    }

    #[test]
    fn action_column_is_cast_as_action() {
        for mapping in all_mappings() {
            let action = mapping.column(mapping.fields.action);
            assert_eq!(
                action.map(|column| column.kind),
                Some(ColumnKind::Action),
                "{}",
                mapping.broker
            );
        }
    }

    #[test]
    fn per_unit_brokers_map_amount_and_quantity() {
        for mapping in all_mappings() {
            match mapping.price {
                PriceRule::PerUnit { .. } => {
                    assert!(mapping.fields.amount.is_some(), "{}", mapping.broker);
                    assert!(mapping.fields.quantity.is_some(), "{}", mapping.broker);
                }
                PriceRule::Stated => {
                    assert!(mapping.fields.unit_price.is_some(), "{}", mapping.broker);
                }
            }
        }
    }

    #[test]
    fn price_times_quantity_dividends_map_both_columns() {
        for mapping in all_mappings() {
            if mapping.fields.dividend == DividendRule::PriceTimesQuantity {
                assert!(mapping.fields.unit_price.is_some(), "{}", mapping.broker);
                assert!(mapping.fields.quantity.is_some(), "{}", mapping.broker);
            }
        }
    }

    #[test]
    fn every_date_format_compiles() {
        for mapping in all_mappings() {
            assert!(
                TimestampFormat::compile(&mapping.date_format).is_ok(),
                "{}",
                mapping.broker
            );
        }
    }
}
