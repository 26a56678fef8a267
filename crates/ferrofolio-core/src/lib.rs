//! Core contracts for ferrofolio.
//!
//! This crate contains:
//! - Canonical activity and instrument models
//! - Per-broker schema mappings and the CSV parse/cast contract
//! - Header-based format detection
//! - Instrument resolution against the symbol-lookup service
//! - The row-to-activity mapper and export assembly
//! - The run orchestrator and its configuration

pub mod brokers;
pub mod config;
pub mod detect;
pub mod domain;
pub mod error;
pub mod export;
pub mod http_client;
pub mod mapper;
pub mod pipeline;
pub mod resolver;
pub mod retry;
pub mod schema;
pub mod throttling;

pub use brokers::{all_mappings, BrokerId};
pub use config::{LookupSettings, Settings};
pub use detect::{Detection, FormatDetector, FormatRedirects, DETECTION_THRESHOLD};
pub use domain::{
    ActivityType, CanonicalActivity, DataSource, InstrumentQuery, LookupKey, SecurityReference,
};
pub use error::{
    ConfigError, ConvertError, ParseError, RemoteError, RemoteErrorKind, ValidationError,
};
pub use export::{ExportAssembler, ExportDocument, ExportMeta, SCHEMA_VERSION};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use mapper::{ActivityMapper, RunSummary, UnrecognizedAction, UnresolvedRow};
pub use pipeline::{ConversionOutcome, Converter, RunGate, RunPermit};
pub use resolver::{InstrumentResolver, LookupCandidate, LookupClient, ResolutionCache};
pub use retry::{Backoff, RetryConfig};
pub use schema::{SchemaMapping, TypedRow};
pub use throttling::LookupThrottle;
