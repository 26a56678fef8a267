use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation and contract errors raised by domain constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument query needs at least one of isin, ticker or name")]
    EmptyInstrumentQuery,
    #[error("instrument query currency cannot be empty")]
    EmptyCurrency,
    #[error("invalid broker '{value}', run `ferrofolio brokers` for the supported list")]
    InvalidBroker { value: String },
}

/// Missing or malformed run configuration. Raised before any parsing starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("account id is required (set FERROFOLIO_ACCOUNT_ID or pass --account-id)")]
    MissingAccountId,
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Input could not be turned into typed rows. Always fatal for the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed csv: {message}")]
    Csv { line: u64, message: String },

    #[error("header declares {found} columns but the {broker} schema expects {expected}")]
    HeaderMismatch {
        broker: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: expected {expected} fields (as declared by the header) but found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("export contains no data rows")]
    NoRows,

    #[error("line {line}: column '{column}' holds '{value}', which is not a number")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: cannot read date '{value}'")]
    InvalidDate { line: u64, value: String },

    #[error("line {line}: required field '{field}' is empty")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: trade quantity is zero")]
    ZeroQuantity { line: u64 },

    #[error("derived column '{column}' has an invalid pattern: {message}")]
    InvalidPattern {
        column: &'static str,
        message: String,
    },

    #[error("date format '{pattern}' is invalid: {message}")]
    InvalidDateFormat {
        pattern: &'static str,
        message: String,
    },
}

impl ParseError {
    /// Source line the error refers to, when it is tied to one.
    pub const fn line(&self) -> Option<u64> {
        match self {
            Self::Csv { line, .. }
            | Self::ColumnCount { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidDate { line, .. }
            | Self::MissingField { line, .. }
            | Self::ZeroQuantity { line } => Some(*line),
            Self::HeaderMismatch { .. } => Some(1),
            Self::NoRows | Self::InvalidPattern { .. } | Self::InvalidDateFormat { .. } => None,
        }
    }
}

/// Lookup-backend failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Credentials rejected, or still rejected after the attempt budget.
    Unauthorized,
    /// Transport failure or retryable status that outlived the attempt budget.
    Unavailable,
    /// Non-retryable status code.
    Status,
    /// Response body did not match the expected shape.
    Decode,
}

/// Failure of the instrument lookup service itself. Fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    kind: RemoteErrorKind,
    message: String,
    attempts: u32,
}

impl RemoteError {
    pub fn authentication_failed(attempts: u32) -> Self {
        Self {
            kind: RemoteErrorKind::Unauthorized,
            message: String::from("authentication failed"),
            attempts,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Unauthorized,
            message: message.into(),
            attempts: 1,
        }
    }

    pub fn unavailable(message: impl Into<String>, attempts: u32) -> Self {
        Self {
            kind: RemoteErrorKind::Unavailable,
            message: message.into(),
            attempts,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            kind: RemoteErrorKind::Status,
            message: format!("lookup service returned status {status}"),
            attempts: 1,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Decode,
            message: message.into(),
            attempts: 1,
        }
    }

    pub const fn kind(&self) -> RemoteErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.attempts > 1 {
            write!(f, "{} (after {} attempts)", self.message, self.attempts)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for RemoteError {}

/// Run-level error: every way a conversion can fail as a whole.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("export format not recognised; pass the broker explicitly")]
    UnknownFormat,

    #[error("instrument lookup failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("another conversion is already running")]
    Busy,
}
