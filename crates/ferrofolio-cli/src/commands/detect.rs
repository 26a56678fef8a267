use ferrofolio_core::{ConvertError, FormatDetector};

use crate::cli::DetectArgs;
use crate::error::CliError;
use crate::output;

use super::read_input;

pub fn run(args: &DetectArgs, pretty: bool) -> Result<(), CliError> {
    let input = read_input(&args.file)?;
    let detection = FormatDetector::new()
        .detect_text(&input)
        .ok_or(ConvertError::UnknownFormat)?;

    output::write_json(&detection, pretty, None)
}
