use ferrofolio_core::BrokerId;
use serde::Serialize;

use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct BrokerSummary {
    id: BrokerId,
    delimiter: String,
    columns: usize,
}

pub fn run(pretty: bool) -> Result<(), CliError> {
    let brokers: Vec<BrokerSummary> = BrokerId::ALL
        .iter()
        .map(|broker| {
            let mapping = broker.mapping();
            BrokerSummary {
                id: *broker,
                delimiter: char::from(mapping.delimiter).to_string(),
                columns: mapping.columns.len(),
            }
        })
        .collect();

    output::write_json(&brokers, pretty, None)
}
