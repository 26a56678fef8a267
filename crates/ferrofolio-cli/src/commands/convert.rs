use std::str::FromStr;

use ferrofolio_core::config::split_tags;
use ferrofolio_core::{BrokerId, Converter, Settings};
use tracing::warn;

use crate::cli::ConvertArgs;
use crate::error::CliError;
use crate::output;

use super::read_input;

pub async fn run(args: &ConvertArgs, pretty: bool) -> Result<(), CliError> {
    let broker = args
        .broker
        .as_deref()
        .map(BrokerId::from_str)
        .transpose()?;
    let settings = settings_for(args)?;
    let input = read_input(&args.file)?;

    let converter = Converter::from_settings(settings);
    let outcome = converter.convert(&input, broker).await?;

    for row in &outcome.summary.unresolved {
        warn!(
            line = row.line,
            isin = row.isin.as_deref().unwrap_or("-"),
            ticker = row.ticker.as_deref().unwrap_or("-"),
            name = row.name.as_deref().unwrap_or("-"),
            "no symbol found, add this activity manually"
        );
    }

    output::write_json(&outcome.document, pretty, args.output.as_deref())
}

/// Environment settings with command-line flags layered on top.
fn settings_for(args: &ConvertArgs) -> Result<Settings, CliError> {
    let mut settings = Settings::from_env()?;

    if let Some(account_id) = &args.account_id {
        settings.account_id = Some(account_id.clone());
    }
    if let Some(lookup_url) = &args.lookup_url {
        settings.lookup.base_url = lookup_url.clone();
    }
    if args.degiro_force_v3 {
        settings.redirects.degiro_force_v3 = true;
    }
    for tag in args.tags.iter().flat_map(|tag| split_tags(tag)) {
        if !settings.tags.contains(&tag) {
            settings.tags.push(tag);
        }
    }

    settings.require_account_id()?;
    Ok(settings)
}
