//! Run orchestration: detect, parse, map, assemble.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::brokers::BrokerId;
use crate::config::Settings;
use crate::detect::FormatDetector;
use crate::error::ConvertError;
use crate::export::{ExportAssembler, ExportDocument};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::mapper::{ActivityMapper, RunSummary};
use crate::resolver::{InstrumentResolver, LookupClient, ResolutionCache};
use crate::schema;
use crate::throttling::LookupThrottle;

/// Single-slot guard: at most one conversion per [`Converter`].
#[derive(Debug, Default)]
pub struct RunGate {
    active: AtomicBool,
}

impl RunGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot, or `None` when a run already holds it.
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit { gate: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop, including on early error returns.
#[derive(Debug)]
pub struct RunPermit<'a> {
    gate: &'a RunGate,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.gate.active.store(false, Ordering::Release);
    }
}

/// Result of one successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutcome {
    pub broker: BrokerId,
    pub document: ExportDocument,
    pub summary: RunSummary,
}

#[derive(Debug)]
pub struct Converter {
    settings: Settings,
    resolver: InstrumentResolver,
    detector: FormatDetector,
    gate: RunGate,
}

impl Converter {
    pub fn new(settings: Settings, resolver: InstrumentResolver) -> Self {
        Self {
            settings,
            resolver,
            detector: FormatDetector::new(),
            gate: RunGate::new(),
        }
    }

    /// Wires the lookup client from `settings` over the production transport.
    pub fn from_settings(settings: Settings) -> Self {
        Self::with_http(settings, Arc::new(ReqwestHttpClient::new()))
    }

    /// Same as [`Converter::from_settings`] over an arbitrary transport.
    pub fn with_http(settings: Settings, http: Arc<dyn HttpClient>) -> Self {
        let lookup = &settings.lookup;
        let mut client = LookupClient::new(http, lookup.base_url.clone(), lookup.access_token.clone())
            .with_retry(lookup.retry.clone())
            .with_timeout_ms(lookup.timeout_ms);
        if let Some(rate) = lookup.rate_per_minute {
            client = client.with_throttle(LookupThrottle::per_minute(rate));
        }
        Self::new(settings, InstrumentResolver::new(client))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn detector(&self) -> &FormatDetector {
        &self.detector
    }

    pub fn is_running(&self) -> bool {
        self.gate.is_active()
    }

    /// Converts one export. `broker` skips detection when given.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Busy`] when another run holds this converter
    /// - [`ConvertError::Config`] when no account id is configured, before any parsing
    /// - [`ConvertError::UnknownFormat`] when detection finds no schema
    /// - [`ConvertError::Parse`] / [`ConvertError::Remote`] from the run itself
    pub async fn convert(
        &self,
        input: &str,
        broker: Option<BrokerId>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let _permit = self.gate.try_acquire().ok_or(ConvertError::Busy)?;
        let span = tracing::info_span!("conversion", run_id = %Uuid::new_v4());
        self.run(input, broker).instrument(span).await
    }

    async fn run(
        &self,
        input: &str,
        broker: Option<BrokerId>,
    ) -> Result<ConversionOutcome, ConvertError> {
        let account_id = self.settings.require_account_id()?;

        let broker = match broker {
            Some(broker) => broker,
            None => {
                self.detector
                    .detect_text(input)
                    .ok_or(ConvertError::UnknownFormat)?
                    .broker
            }
        };
        let broker = self.settings.redirects.remap(broker);
        let mapping = broker.mapping();
        info!(broker = %broker, "conversion started");

        let rows = schema::parse(input, mapping)?;

        let mut cache = ResolutionCache::new();
        let mapper = ActivityMapper::new(mapping, &self.resolver, account_id)
            .with_tags(&self.settings.tags);
        let (activities, summary) = mapper.map_rows(&rows, &mut cache).await?;

        info!(
            broker = %broker,
            rows = summary.rows_read,
            emitted = summary.emitted,
            ignored = summary.ignored,
            unresolved = summary.unresolved.len(),
            "conversion finished"
        );

        Ok(ConversionOutcome {
            broker,
            document: ExportAssembler::assemble(activities),
            summary,
        })
    }
}
